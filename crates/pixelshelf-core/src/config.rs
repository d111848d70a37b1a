//! Client configuration

/// Where and how the frontend talks to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for every REST path, e.g. `/api`
    pub api_base: String,
    /// Page to send unauthenticated users to
    pub login_path: String,
    /// Number of tags requested for the suggestion list
    pub tag_suggestion_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            login_path: "/login".to_string(),
            tag_suggestion_limit: 10,
        }
    }
}

impl ClientConfig {
    /// Absolute path for an endpoint below the API base
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Clamp a suggestion limit to what the tags endpoint accepts
    pub fn suggestion_limit(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.tag_suggestion_limit).clamp(1, 100)
    }
}
