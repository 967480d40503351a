//! Board of Students roster.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::filter::Searchable;
use crate::core::validate::{Validate, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BosMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub position: String,
    pub batch: String,
    pub department: String,
    pub photo: Option<String>,
    pub socials: Vec<String>,
    pub achievements: Vec<String>,
    pub created: DateTime<Utc>,
}

impl Searchable for BosMember {
    fn haystack(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.position.as_str(), self.department.as_str(), self.batch.as_str()]
    }
}

/// Onboarding form. Arrives as JSON or as multipart text fields, where the
/// list fields are JSON-stringified arrays.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Create {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub socials: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

impl Validate for Create {
    fn check(&self, v: &mut Validator) {
        v.required("name", &self.name)
            .email("email", &self.email)
            .required("position", &self.position)
            .required("batch", &self.batch)
            .required("department", &self.department);
        for s in &self.socials {
            v.url("socials", s);
        }
    }
}

pub type Update = Create;

#[derive(Debug, Clone)]
pub struct Insert {
    pub id: String,
    pub name: String,
    pub email: String,
    pub position: String,
    pub batch: String,
    pub department: String,
    pub photo: Option<String>,
    pub socials: Vec<String>,
    pub achievements: Vec<String>,
    pub created: DateTime<Utc>,
}

impl From<Create> for Insert {
    fn from(c: Create) -> Self {
        Insert {
            id: super::common::new_id(),
            name: c.name.trim().to_owned(),
            email: c.email.trim().to_lowercase(),
            position: c.position.trim().to_owned(),
            batch: c.batch.trim().to_owned(),
            department: c.department.trim().to_owned(),
            photo: c.photo,
            socials: c.socials.into_iter().filter(|s| !s.trim().is_empty()).collect(),
            achievements: c.achievements.into_iter().filter(|s| !s.trim().is_empty()).collect(),
            created: Utc::now(),
        }
    }
}

impl From<Insert> for BosMember {
    fn from(i: Insert) -> Self {
        BosMember {
            id: i.id,
            name: i.name,
            email: i.email,
            position: i.position,
            batch: i.batch,
            department: i.department,
            photo: i.photo,
            socials: i.socials,
            achievements: i.achievements,
            created: i.created,
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub(crate) fn bos(name: &str) -> Create {
        Create {
            name: name.into(),
            email: format!("{}@nodex.club", name.to_lowercase()),
            position: "President".into(),
            batch: "2026".into(),
            department: "ECE".into(),
            photo: None,
            socials: vec!["https://linkedin.com/in/someone".into()],
            achievements: vec!["Led Hackfest".into()],
        }
    }

    #[test]
    fn test_socials_must_be_urls() {
        let mut c = bos("Linus");
        assert!(c.validate().is_ok());
        c.socials.push("@linus".into());
        assert!(c.validate().is_err());
    }
}
