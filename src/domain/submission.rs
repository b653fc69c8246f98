use serde::{Deserialize, Serialize};

/// A single posted form value. Submissions keep these in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Contact block, present only when the source form carried any of these fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ContactInfo {
    /// Collects the contact block from well-known field names.
    /// Returns `None` when none of them were submitted.
    #[must_use]
    pub fn from_fields(fields: &[Field]) -> Option<Self> {
        let lookup = |key: &str| {
            fields
                .iter()
                .find(|f| f.name.eq_ignore_ascii_case(key))
                .map(|f| f.value.clone())
        };

        let contact = Self { name: lookup("name"), email: lookup("email"), phone: lookup("phone") };

        if contact.name.is_none() && contact.email.is_none() && contact.phone.is_none() {
            None
        } else {
            Some(contact)
        }
    }
}

/// One form post, as it travels through the submission queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub site_url: String,
    pub form_name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, rename = "contactInfo")]
    pub contact: Option<ContactInfo>,
}

impl Submission {
    /// Returns the value of the first field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value.as_str())
    }
}
