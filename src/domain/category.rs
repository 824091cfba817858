use serde::{Deserialize, Serialize};

/// One crawlable catalog section
///
/// The display name doubles as the export file title. On disk the field is
/// stored as `name` to stay compatible with existing `categories.json` files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub url: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

impl Category {
    pub fn new(url: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            display_name: display_name.into(),
        }
    }
}
