use serde::{Deserialize, Serialize};
use validator::Validate;

/// A person credited on one or more bricks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Author {
    #[validate(length(min = 1, message = "Author id must not be empty"))]
    pub id: String,
    pub name: String,
    pub email: String,
    pub orcid: String,
    pub affiliation: String,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}
