use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::filter::Searchable;
use crate::core::validate::{Validate, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created: DateTime<Utc>,
}

impl Searchable for Team {
    fn haystack(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

/// Team with its member count, as shown in list views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamWithMembers {
    #[serde(flatten)]
    pub team: Team,
    pub member_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Create {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for Create {
    fn check(&self, v: &mut Validator) {
        v.required("name", &self.name).max_chars("name", &self.name, 80).max_chars("description", &self.description, 1000);
    }
}

pub type Update = Create;

#[derive(Debug, Clone)]
pub struct Insert {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created: DateTime<Utc>,
}

impl From<Create> for Insert {
    fn from(c: Create) -> Self {
        Insert {
            id: super::common::new_id(),
            name: c.name.trim().to_owned(),
            description: c.description.trim().to_owned(),
            created: Utc::now(),
        }
    }
}

impl From<Insert> for Team {
    fn from(i: Insert) -> Self {
        Team {
            id: i.id,
            name: i.name,
            description: i.description,
            created: i.created,
        }
    }
}
