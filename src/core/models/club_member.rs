use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::filter::Searchable;
use crate::core::validate::{Validate, Validator};

pub const STATUSES: [&str; 3] = ["active", "inactive", "alumni"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClubMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub title: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub status: String,
    pub teams: Vec<String>,
    pub photo: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub created: DateTime<Utc>,
}

impl Searchable for ClubMember {
    fn haystack(&self) -> Vec<&str> {
        let mut h: Vec<&str> = self.skills.iter().map(String::as_str).collect();
        h.push(&self.bio);
        h.push(&self.title);
        h
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn teams(&self) -> &[String] {
        &self.teams
    }
}

fn default_status() -> String {
    "active".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Create {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
}

impl Validate for Create {
    fn check(&self, v: &mut Validator) {
        v.required("name", &self.name)
            .email("email", &self.email)
            .required("title", &self.title)
            .max_chars("bio", &self.bio, 1000)
            .one_of("status", &self.status, &STATUSES)
            .optional_url("photo", self.photo.as_deref())
            .optional_url("github", self.github.as_deref())
            .optional_url("linkedin", self.linkedin.as_deref());
    }
}

pub type Update = Create;

#[derive(Debug, Clone)]
pub struct Insert {
    pub id: String,
    pub name: String,
    pub email: String,
    pub title: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub status: String,
    pub teams: Vec<String>,
    pub photo: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub created: DateTime<Utc>,
}

fn blank_to_none(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

impl From<Create> for Insert {
    fn from(c: Create) -> Self {
        Insert {
            id: super::common::new_id(),
            name: c.name.trim().to_owned(),
            email: c.email.trim().to_lowercase(),
            title: c.title.trim().to_owned(),
            bio: c.bio.trim().to_owned(),
            skills: c.skills.into_iter().map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()).collect(),
            status: c.status,
            teams: c.teams,
            photo: blank_to_none(c.photo),
            github: blank_to_none(c.github),
            linkedin: blank_to_none(c.linkedin),
            created: Utc::now(),
        }
    }
}

impl From<Insert> for ClubMember {
    fn from(i: Insert) -> Self {
        ClubMember {
            id: i.id,
            name: i.name,
            email: i.email,
            title: i.title,
            bio: i.bio,
            skills: i.skills,
            status: i.status,
            teams: i.teams,
            photo: i.photo,
            github: i.github,
            linkedin: i.linkedin,
            created: i.created,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamsUpdate {
    pub teams: Vec<String>,
}
