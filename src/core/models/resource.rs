use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::filter::Searchable;
use crate::core::validate::{Validate, Validator};

pub const KINDS: [&str; 6] = ["article", "video", "course", "tool", "documentation", "other"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tags: Vec<String>,
    pub created: DateTime<Utc>,
}

impl Searchable for Resource {
    fn haystack(&self) -> Vec<&str> {
        let mut h = vec![self.title.as_str(), self.description.as_str()];
        h.extend(self.tags.iter().map(String::as_str));
        h
    }

    fn kind(&self) -> Option<&str> {
        Some(self.kind.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Create {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Validate for Create {
    fn check(&self, v: &mut Validator) {
        v.required("title", &self.title).url("url", &self.url).one_of("type", &self.kind, &KINDS);
    }
}

pub type Update = Create;

#[derive(Debug, Clone)]
pub struct Insert {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub kind: String,
    pub tags: Vec<String>,
    pub created: DateTime<Utc>,
}

impl From<Create> for Insert {
    fn from(c: Create) -> Self {
        Insert {
            id: super::common::new_id(),
            title: c.title.trim().to_owned(),
            description: c.description.trim().to_owned(),
            url: c.url.trim().to_owned(),
            kind: c.kind,
            tags: c.tags.into_iter().map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty()).collect(),
            created: Utc::now(),
        }
    }
}

impl From<Insert> for Resource {
    fn from(i: Insert) -> Self {
        Resource {
            id: i.id,
            title: i.title,
            description: i.description,
            url: i.url,
            kind: i.kind,
            tags: i.tags,
            created: i.created,
        }
    }
}
