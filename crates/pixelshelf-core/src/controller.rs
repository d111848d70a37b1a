//! Search state reconciliation
//!
//! [`SearchController`] owns the committed search (filters plus pagination)
//! and keeps three things in step with it: the address bar, the list of
//! saved presets / smart folders that match it, and the list request that
//! is allowed to update the gallery.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ApiError, ValidationError};
use crate::filters::{self, filters_equal, has_active_conditions, FilterSet};
use crate::models::{
    Preset, PresetCreate, PresetUpdate, SavedSearch, SmartFolder, SmartFolderCreate, SmartFolderUpdate,
    MAX_NAME_LEN,
};
use crate::notices::Notices;
use crate::params::{clamp_per_page, parse_per_page, SearchParams};

/// Access to the browser location.
///
/// Filter changes only ever replace the current history entry, so the back
/// button does not walk through every edit.
pub trait UrlPort {
    /// Current query string, with or without the leading `?`
    fn read_query(&self) -> String;

    /// Replace the query string of the current history entry
    fn replace_query(&mut self, query: &str);
}

/// Handle for one list request, tied to the params it was issued for
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTicket {
    seq: u64,
    params: SearchParams,
}

impl QueryTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }
}

/// First saved search whose filters equal `filters`.
///
/// A search with no active conditions never matches, even if a saved entry
/// happens to hold only defaults. Ties go to list order.
pub fn find_match<'a, S: SavedSearch>(filters: &FilterSet, saved: &'a [S]) -> Option<&'a S> {
    if !has_active_conditions(filters) {
        return None;
    }
    saved.iter().find(|entry| filters_equal(entry.filters(), filters))
}

/// Trimmed, length-checked name for a new preset or smart folder
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong { len, max: MAX_NAME_LEN });
    }
    Ok(name.to_string())
}

pub struct SearchController<U: UrlPort> {
    url: U,
    committed: SearchParams,
    presets: Vec<Preset>,
    smart_folders: Vec<SmartFolder>,
    matched_preset: Option<Uuid>,
    matched_smart_folder: Option<Uuid>,
    notices: Notices,
    next_seq: u64,
}

impl<U: UrlPort> SearchController<U> {
    /// Read the initial search from the URL. `per_page` is used when the URL
    /// does not specify a page size. Returns the ticket for the first load.
    pub fn mount(url: U, per_page: u32) -> (Self, QueryTicket) {
        let query = url.read_query();
        let mut committed = SearchParams::parse(&query);
        let has_page_size = filters::decode_query(&query)
            .iter()
            .any(|(k, v)| k == "per_page" && parse_per_page(v).is_some());
        if !has_page_size {
            committed.per_page = clamp_per_page(per_page);
        }
        debug!(query = %query, "mounted search controller");

        let mut controller = Self {
            url,
            committed,
            presets: Vec::new(),
            smart_folders: Vec::new(),
            matched_preset: None,
            matched_smart_folder: None,
            notices: Notices::default(),
            next_seq: 0,
        };
        controller.refresh_matches();
        let ticket = controller.issue();
        (controller, ticket)
    }

    pub fn committed(&self) -> &SearchParams {
        &self.committed
    }

    pub fn filters(&self) -> &FilterSet {
        &self.committed.filters
    }

    pub fn url(&self) -> &U {
        &self.url
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn smart_folders(&self) -> &[SmartFolder] {
        &self.smart_folders
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    /// Commit edited filters. Starts over at page 1.
    pub fn commit(&mut self, mut filters: FilterSet) -> QueryTicket {
        filters.normalize_rating();
        let params = SearchParams {
            filters,
            page: 1,
            per_page: self.committed.per_page,
        };
        self.commit_params(params)
    }

    pub fn set_page(&mut self, page: u32) -> QueryTicket {
        let params = SearchParams {
            page: page.max(1),
            ..self.committed.clone()
        };
        self.commit_params(params)
    }

    pub fn set_per_page(&mut self, per_page: u32) -> QueryTicket {
        let params = SearchParams {
            page: 1,
            per_page: clamp_per_page(per_page),
            ..self.committed.clone()
        };
        self.commit_params(params)
    }

    /// Ticket for fetching the committed search again, after the images
    /// themselves changed. The URL is left alone.
    pub fn reload(&mut self) -> QueryTicket {
        debug!("reloading committed search");
        self.issue()
    }

    /// Drop every filter, keeping the page size
    pub fn reset(&mut self) -> QueryTicket {
        self.commit(FilterSet::with_default_sort())
    }

    fn commit_params(&mut self, params: SearchParams) -> QueryTicket {
        self.committed = params;
        let query = self.committed.to_query_string();
        self.url.replace_query(&query);
        self.refresh_matches();
        debug!(query = %query, "committed search");
        self.issue()
    }

    fn issue(&mut self) -> QueryTicket {
        self.next_seq += 1;
        QueryTicket {
            seq: self.next_seq,
            params: self.committed.clone(),
        }
    }

    /// Whether a ticket still describes the committed search
    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        ticket.params == self.committed
    }

    /// Pass a list response through only if it answers the committed search.
    /// Responses for superseded searches are dropped.
    pub fn accept<T>(&self, ticket: &QueryTicket, response: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(response)
        } else {
            debug!(seq = ticket.seq, "discarding stale list response");
            None
        }
    }

    fn refresh_matches(&mut self) {
        let filters = &self.committed.filters;
        self.matched_preset = find_match(filters, &self.presets).map(|p| p.id);
        self.matched_smart_folder = find_match(filters, &self.smart_folders).map(|f| f.id);
    }

    pub fn matched_preset(&self) -> Option<&Preset> {
        let id = self.matched_preset?;
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn matched_smart_folder(&self) -> Option<&SmartFolder> {
        let id = self.matched_smart_folder?;
        self.smart_folders.iter().find(|f| f.id == id)
    }

    /// Offer "save as preset" when something is filtered and no preset has it yet
    pub fn should_offer_save(&self) -> bool {
        has_active_conditions(&self.committed.filters) && self.matched_preset.is_none()
    }

    pub fn set_presets(&mut self, presets: Vec<Preset>) {
        self.presets = presets;
        self.refresh_matches();
    }

    pub fn set_smart_folders(&mut self, folders: Vec<SmartFolder>) {
        self.smart_folders = folders;
        self.refresh_matches();
    }

    /// Replace the committed filters with a preset's
    pub fn apply_preset(&mut self, id: Uuid) -> Result<QueryTicket, ValidationError> {
        let filters = self
            .presets
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.filters.clone())
            .ok_or(ValidationError::UnknownSavedSearch(id))?;
        Ok(self.commit(filters))
    }

    pub fn apply_smart_folder(&mut self, id: Uuid) -> Result<QueryTicket, ValidationError> {
        let filters = self
            .smart_folders
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.filters.clone())
            .ok_or(ValidationError::UnknownSavedSearch(id))?;
        Ok(self.commit(filters))
    }

    /// Request body for saving the committed filters under `name`
    pub fn prepare_preset(&self, name: &str) -> Result<PresetCreate, ValidationError> {
        Ok(PresetCreate {
            name: validate_name(name)?,
            filters: self.committed.filters.clone(),
        })
    }

    /// Request body overwriting a preset's filters with the committed ones
    pub fn prepare_preset_overwrite(&self, id: Uuid) -> Result<PresetUpdate, ValidationError> {
        if !self.presets.iter().any(|p| p.id == id) {
            return Err(ValidationError::UnknownSavedSearch(id));
        }
        Ok(PresetUpdate {
            name: None,
            filters: Some(self.committed.filters.clone()),
        })
    }

    pub fn prepare_smart_folder(&self, name: &str, icon: Option<String>) -> Result<SmartFolderCreate, ValidationError> {
        Ok(SmartFolderCreate {
            name: validate_name(name)?,
            icon: icon.filter(|i| !i.trim().is_empty()),
            filters: self.committed.filters.clone(),
        })
    }

    /// Request body pointing a smart folder at the committed filters
    pub fn prepare_smart_folder_overwrite(&self, id: Uuid) -> Result<SmartFolderUpdate, ValidationError> {
        if !self.smart_folders.iter().any(|f| f.id == id) {
            return Err(ValidationError::UnknownSavedSearch(id));
        }
        Ok(SmartFolderUpdate {
            filters: Some(self.committed.filters.clone()),
            ..Default::default()
        })
    }

    pub fn on_presets_loaded(&mut self, result: Result<Vec<Preset>, ApiError>) {
        match result {
            Ok(presets) => self.set_presets(presets),
            Err(e) => self.sync_failed("load presets", &e),
        }
    }

    pub fn on_preset_created(&mut self, result: Result<Preset, ApiError>) {
        match result {
            Ok(preset) => {
                self.notices.success(format!("Saved preset \"{}\"", preset.name));
                // Newest first, matching the server's ordering.
                self.presets.insert(0, preset);
                self.refresh_matches();
            }
            Err(e) => self.sync_failed("save preset", &e),
        }
    }

    pub fn on_preset_updated(&mut self, result: Result<Preset, ApiError>) {
        match result {
            Ok(preset) => {
                if let Some(existing) = self.presets.iter_mut().find(|p| p.id == preset.id) {
                    *existing = preset;
                }
                self.refresh_matches();
            }
            Err(e) => self.sync_failed("update preset", &e),
        }
    }

    pub fn on_preset_deleted(&mut self, id: Uuid, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.presets.retain(|p| p.id != id);
                self.refresh_matches();
            }
            Err(e) => self.sync_failed("delete preset", &e),
        }
    }

    pub fn on_smart_folders_loaded(&mut self, result: Result<Vec<SmartFolder>, ApiError>) {
        match result {
            Ok(folders) => self.set_smart_folders(folders),
            Err(e) => self.sync_failed("load smart folders", &e),
        }
    }

    pub fn on_smart_folder_created(&mut self, result: Result<SmartFolder, ApiError>) {
        match result {
            Ok(folder) => {
                self.notices.success(format!("Created smart folder \"{}\"", folder.name));
                self.smart_folders.push(folder);
                self.refresh_matches();
            }
            Err(e) => self.sync_failed("create smart folder", &e),
        }
    }

    pub fn on_smart_folder_updated(&mut self, result: Result<SmartFolder, ApiError>) {
        match result {
            Ok(folder) => {
                if let Some(existing) = self.smart_folders.iter_mut().find(|f| f.id == folder.id) {
                    *existing = folder;
                }
                self.refresh_matches();
            }
            Err(e) => self.sync_failed("update smart folder", &e),
        }
    }

    pub fn on_smart_folder_deleted(&mut self, id: Uuid, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.smart_folders.retain(|f| f.id != id);
                self.refresh_matches();
            }
            Err(e) => self.sync_failed("delete smart folder", &e),
        }
    }

    /// Report a failed sync without touching local state
    fn sync_failed(&mut self, action: &str, error: &ApiError) {
        warn!(action, error = %error, "saved search sync failed");
        self.notices.error(format!("Failed to {}: {}", action, error));
    }
}
