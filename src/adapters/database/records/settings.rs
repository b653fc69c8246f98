use crate::domain::settings::FormSettings;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct FormSettingsRecord {
    pub(crate) from_address: String,
    pub(crate) to_address: String,
    pub(crate) template_id: Option<String>,
}

impl From<FormSettingsRecord> for FormSettings {
    fn from(record: FormSettingsRecord) -> Self {
        Self::new(record.from_address, record.to_address, record.template_id)
    }
}
