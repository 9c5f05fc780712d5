use serde::Deserialize;

/// Read-only snapshot of the privacy configuration, built once at startup
/// from `Settings` and injected into every handler. Never mutated after
/// process start, so concurrent reads need no synchronization.
#[derive(Debug, Clone, Deserialize)]
pub struct PrivacyOptions {
    pub allow_blocklist: bool,
    pub allow_export: bool,
    pub allow_wipe: bool,
    pub individual_tracking: bool,
    pub public_subscription_page: bool,
    /// Allow-list of exportable sections: `profile`, `subscriptions`,
    /// `campaign_views`, `link_clicks`.
    #[serde(default)]
    pub exportable: Vec<String>,
}

impl PrivacyOptions {
    pub fn exports(&self, section: &str) -> bool {
        self.exportable.iter().any(|s| s == section)
    }
}
