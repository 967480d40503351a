use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::filter::Searchable;
use crate::core::validate::{Validate, Validator};

pub const KINDS: [&str; 5] = ["workshop", "hackathon", "talk", "meetup", "other"];
pub const STATUSES: [&str; 3] = ["upcoming", "ongoing", "completed"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub registration_link: Option<String>,
    pub cover_image: Option<String>,
    pub created: DateTime<Utc>,
}

impl Searchable for Event {
    fn haystack(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str(), self.location.as_str()]
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn kind(&self) -> Option<&str> {
        Some(self.kind.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Create {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub registration_link: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

impl Validate for Create {
    fn check(&self, v: &mut Validator) {
        v.required("title", &self.title)
            .max_chars("title", &self.title, 150)
            .required("description", &self.description)
            .one_of("type", &self.kind, &KINDS)
            .one_of("status", &self.status, &STATUSES)
            .required("location", &self.location)
            .optional_url("registrationLink", self.registration_link.as_deref())
            .optional_url("coverImage", self.cover_image.as_deref());
    }
}

pub type Update = Create;

#[derive(Debug, Clone)]
pub struct Insert {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub status: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub registration_link: Option<String>,
    pub cover_image: Option<String>,
    pub created: DateTime<Utc>,
}

impl From<Create> for Insert {
    fn from(c: Create) -> Self {
        Insert {
            id: super::common::new_id(),
            title: c.title.trim().to_owned(),
            description: c.description.trim().to_owned(),
            kind: c.kind,
            status: c.status,
            starts_at: c.starts_at,
            location: c.location.trim().to_owned(),
            registration_link: c.registration_link.filter(|l| !l.trim().is_empty()),
            cover_image: c.cover_image.filter(|l| !l.trim().is_empty()),
            created: Utc::now(),
        }
    }
}

impl From<Insert> for Event {
    fn from(i: Insert) -> Self {
        Event {
            id: i.id,
            title: i.title,
            description: i.description,
            kind: i.kind,
            status: i.status,
            starts_at: i.starts_at,
            location: i.location,
            registration_link: i.registration_link,
            cover_image: i.cover_image,
            created: i.created,
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use chrono::Duration;

    pub(crate) fn event(title: &str, kind: &str, status: &str, days_from_now: i64) -> Create {
        Create {
            title: title.into(),
            description: format!("{} for the club", title),
            kind: kind.into(),
            status: status.into(),
            starts_at: Utc::now() + Duration::days(days_from_now),
            location: "Main auditorium".into(),
            registration_link: Some("https://forms.nodex.club/register".into()),
            cover_image: None,
        }
    }

    #[test]
    fn test_type_is_the_wire_name() {
        let e: Create = serde_json::from_str(
            r#"{"title":"Rustathon","description":"d","type":"hackathon","status":"upcoming","startsAt":"2026-11-01T09:00:00Z","location":"Lab 3"}"#,
        )
        .unwrap();
        assert_eq!(e.kind, "hackathon");
        assert!(e.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_type() {
        assert!(event("Mixer", "party", "upcoming", 3).validate().is_err());
    }
}
