use crate::domain::submission::{ContactInfo, Field, Submission};
use serde::Deserialize;
use serde_json::Value;

/// The subset of a Netlify form-submission webhook this service reads.
#[derive(Debug, Deserialize)]
pub struct NetlifyPayload {
    pub id: String,
    pub site_url: String,
    pub form_name: String,
    #[serde(default)]
    pub ordered_human_fields: Vec<NetlifyField>,
}

#[derive(Debug, Deserialize)]
pub struct NetlifyField {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

fn render(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<NetlifyPayload> for Submission {
    fn from(payload: NetlifyPayload) -> Self {
        let fields: Vec<Field> =
            payload.ordered_human_fields.into_iter().map(|f| Field { name: f.name, value: render(f.value) }).collect();
        let contact = ContactInfo::from_fields(&fields);

        Self { id: payload.id, site_url: payload.site_url, form_name: payload.form_name, fields, contact }
    }
}
