/// All form mappings live under this partition.
pub const CONTACT_FORM_PARTITION: &str = "contact-form";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingsKey {
    pub partition_key: String,
    pub row_key: String,
}

impl SettingsKey {
    #[must_use]
    pub fn for_form(site_url: &str, form_name: &str) -> Self {
        Self { partition_key: CONTACT_FORM_PARTITION.to_string(), row_key: format!("{site_url}-{form_name}") }
    }
}

/// Delivery settings for one (site, form) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSettings {
    pub from_address: String,
    pub to_address: String,
    pub template_id: Option<String>,
}

impl FormSettings {
    /// Builds settings, treating an empty template id as "no template".
    #[must_use]
    pub fn new(from_address: impl Into<String>, to_address: impl Into<String>, template_id: Option<String>) -> Self {
        Self {
            from_address: from_address.into(),
            to_address: to_address.into(),
            template_id: template_id.filter(|t| !t.is_empty()),
        }
    }
}
