//! Responsive column counts for the thumbnail grid
//!
//! Breakpoints follow Tailwind's screen widths, extended with three extra
//! tiers for very wide displays.

use serde::{Deserialize, Serialize};

/// Thumbnail size tier chosen by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    #[serde(alias = "small")]
    Compact,
    #[default]
    #[serde(alias = "medium")]
    Standard,
    #[serde(alias = "large")]
    Comfortable,
}

impl Density {
    pub fn all() -> &'static [Density] {
        &[Density::Compact, Density::Standard, Density::Comfortable]
    }

    /// Stable identifier used in `<select>` values
    pub fn id(&self) -> &'static str {
        match self {
            Density::Compact => "compact",
            Density::Standard => "standard",
            Density::Comfortable => "comfortable",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Density::Compact => "Small",
            Density::Standard => "Medium",
            Density::Comfortable => "Large",
        }
    }

    pub fn from_id(id: &str) -> Option<Density> {
        match id {
            "compact" | "small" => Some(Density::Compact),
            "standard" | "medium" => Some(Density::Standard),
            "comfortable" | "large" => Some(Density::Comfortable),
            _ => None,
        }
    }

    /// Column count below the narrowest breakpoint
    pub fn base_columns(&self) -> u32 {
        match self {
            Density::Compact => 3,
            Density::Standard => 2,
            Density::Comfortable => 1,
        }
    }

    fn columns_by_breakpoint(&self) -> &'static [u32; BREAKPOINTS.len()] {
        match self {
            Density::Compact => &[4, 5, 6, 8, 10, 12, 14, 16],
            Density::Standard => &[3, 4, 5, 5, 8, 10, 12, 14],
            Density::Comfortable => &[2, 3, 4, 4, 5, 6, 8, 10],
        }
    }
}

/// Minimum viewport widths in px, narrowest first (sm, md, lg, xl, 2xl, 3xl, 4xl, 5xl)
pub const BREAKPOINTS: [f64; 8] = [640.0, 768.0, 1024.0, 1280.0, 1536.0, 1920.0, 2560.0, 3200.0];

/// Number of grid columns for a viewport width.
///
/// Breakpoints are checked from the widest down and the first one the width
/// meets or exceeds wins. Widths below every breakpoint (including negative
/// or NaN widths) get the density's base count.
pub fn resolve_columns(viewport_width: f64, density: Density) -> u32 {
    let counts = density.columns_by_breakpoint();
    BREAKPOINTS
        .iter()
        .zip(counts.iter())
        .rev()
        .find(|(threshold, _)| viewport_width >= **threshold)
        .map(|(_, columns)| *columns)
        .unwrap_or_else(|| density.base_columns())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_counts_below_first_breakpoint() {
        assert_eq!(resolve_columns(320.0, Density::Compact), 3);
        assert_eq!(resolve_columns(639.9, Density::Standard), 2);
        assert_eq!(resolve_columns(0.0, Density::Comfortable), 1);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(resolve_columns(640.0, Density::Standard), 3);
        assert_eq!(resolve_columns(1024.0, Density::Compact), 6);
        assert_eq!(resolve_columns(3200.0, Density::Comfortable), 10);
        assert_eq!(resolve_columns(10_000.0, Density::Standard), 14);
    }

    #[test]
    fn test_counts_at_1280() {
        assert_eq!(resolve_columns(1280.0, Density::Standard), 5);
        assert_eq!(resolve_columns(1280.0, Density::Compact), 8);
        assert_eq!(resolve_columns(1280.0, Density::Comfortable), 4);
    }

    #[test]
    fn test_degenerate_widths_fall_back_to_base() {
        assert_eq!(resolve_columns(-50.0, Density::Compact), 3);
        assert_eq!(resolve_columns(f64::NAN, Density::Standard), 2);
        assert_eq!(resolve_columns(f64::INFINITY, Density::Standard), 14);
    }

    #[test]
    fn test_monotonic_in_width() {
        for density in Density::all() {
            let mut previous = 0;
            for width in (0..4000).step_by(7) {
                let columns = resolve_columns(width as f64, *density);
                assert!(columns >= 1);
                assert!(
                    columns >= previous,
                    "{:?}: {} columns at {}px after {}",
                    density,
                    columns,
                    width,
                    previous
                );
                previous = columns;
            }
        }
    }

    #[test]
    fn test_density_ids_round_trip() {
        for density in Density::all() {
            assert_eq!(Density::from_id(density.id()), Some(*density));
        }
        assert_eq!(Density::from_id("medium"), Some(Density::Standard));
        assert_eq!(Density::from_id("huge"), None);
    }

    #[test]
    fn test_density_accepts_legacy_names() {
        let density: Density = serde_json::from_str("\"large\"").unwrap();
        assert_eq!(density, Density::Comfortable);
        assert_eq!(serde_json::to_string(&Density::Compact).unwrap(), "\"compact\"");
    }
}
