//! Rating filter mode toggle
//!
//! The form shows one star value plus a selector for how it applies:
//! "at least" (`min_rating`) or "exactly" (`exact_rating`). Only one of the
//! two keys may hold a value.

use super::FilterSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatingMode {
    #[default]
    Min,
    Exact,
}

impl RatingMode {
    pub fn id(&self) -> &'static str {
        match self {
            RatingMode::Min => "min",
            RatingMode::Exact => "exact",
        }
    }

    pub fn from_id(id: &str) -> Option<RatingMode> {
        match id {
            "min" => Some(RatingMode::Min),
            "exact" => Some(RatingMode::Exact),
            _ => None,
        }
    }
}

/// Which rating key currently holds a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingState {
    Unset,
    Min(u8),
    Exact(u8),
}

impl RatingState {
    pub fn of(filters: &FilterSet) -> Self {
        match (filters.exact_rating, filters.min_rating) {
            (Some(exact), _) => RatingState::Exact(exact),
            (None, Some(min)) => RatingState::Min(min),
            (None, None) => RatingState::Unset,
        }
    }

    pub fn value(&self) -> Option<u8> {
        match self {
            RatingState::Unset => None,
            RatingState::Min(v) | RatingState::Exact(v) => Some(*v),
        }
    }
}

/// UI-side state of the mode selector.
///
/// The selector remembers its mode even while no value is set, so clearing
/// the stars and picking a new value stays in the mode the user chose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingControl {
    mode: RatingMode,
}

impl RatingControl {
    /// Selector state matching whatever the filters currently hold
    pub fn from_filters(filters: &FilterSet) -> Self {
        let mode = match RatingState::of(filters) {
            RatingState::Exact(_) => RatingMode::Exact,
            _ => RatingMode::Min,
        };
        Self { mode }
    }

    pub fn mode(&self) -> RatingMode {
        self.mode
    }

    /// Switch modes, moving any current value over to the other key.
    pub fn select_mode(&mut self, mode: RatingMode, filters: &mut FilterSet) {
        self.mode = mode;
        let value = RatingState::of(filters).value();
        if value.is_some() {
            self.write(value, filters);
        }
    }

    /// Set or clear the star value in the current mode.
    pub fn set_value(&mut self, value: Option<u8>, filters: &mut FilterSet) {
        match value {
            Some(_) => self.write(value, filters),
            None => {
                filters.min_rating = None;
                filters.exact_rating = None;
            }
        }
    }

    fn write(&self, value: Option<u8>, filters: &mut FilterSet) {
        match self.mode {
            RatingMode::Min => filters.set_min_rating(value),
            RatingMode::Exact => filters.set_exact_rating(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_mode_moves_value() {
        let mut filters = FilterSet::default();
        let mut control = RatingControl::from_filters(&filters);
        control.set_value(Some(3), &mut filters);
        assert_eq!(RatingState::of(&filters), RatingState::Min(3));

        control.select_mode(RatingMode::Exact, &mut filters);
        assert_eq!(filters.min_rating, None);
        assert_eq!(filters.exact_rating, Some(3));

        control.select_mode(RatingMode::Min, &mut filters);
        assert_eq!(RatingState::of(&filters), RatingState::Min(3));
    }

    #[test]
    fn test_clear_returns_to_unset_and_keeps_mode() {
        let mut filters = FilterSet::default();
        let mut control = RatingControl::default();
        control.select_mode(RatingMode::Exact, &mut filters);
        assert_eq!(RatingState::of(&filters), RatingState::Unset);

        control.set_value(Some(5), &mut filters);
        control.set_value(None, &mut filters);
        assert_eq!(RatingState::of(&filters), RatingState::Unset);
        assert_eq!(control.mode(), RatingMode::Exact);

        control.set_value(Some(2), &mut filters);
        assert_eq!(RatingState::of(&filters), RatingState::Exact(2));
    }

    #[test]
    fn test_from_filters_picks_up_exact_mode() {
        let filters = FilterSet { exact_rating: Some(1), ..Default::default() };
        assert_eq!(RatingControl::from_filters(&filters).mode(), RatingMode::Exact);
        assert_eq!(RatingControl::from_filters(&FilterSet::default()).mode(), RatingMode::Min);
    }

    #[test]
    fn test_mode_ids() {
        assert_eq!(RatingMode::from_id(RatingMode::Exact.id()), Some(RatingMode::Exact));
        assert_eq!(RatingMode::from_id("between"), None);
    }
}
