use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::filter::Searchable;
use crate::core::validate::{Validate, Validator};
use crate::error::Error;

pub const MIN_WHY_JOIN_CHARS: usize = 50;

/// Logical review state of an application, derived from its `markedData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Approved,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::Approved, Status::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(Error::BusinessError(format!("invalid application status({})", s))),
        }
    }
}

/// The two outcomes a reviewer can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        }
    }
}

impl From<Decision> for Status {
    fn from(d: Decision) -> Self {
        match d {
            Decision::Approved => Status::Approved,
            Decision::Rejected => Status::Rejected,
        }
    }
}

impl FromStr for Decision {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(Error::BusinessError(format!("invalid decision({})", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkedData {
    pub status: Decision,
    pub remarks: String,
    pub decided_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub batch: String,
    pub roll_number: String,
    pub registration_number: String,
    pub department: String,
    #[serde(default)]
    pub interested_tracks: Vec<String>,
    pub why_join: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub projects: String,
    #[serde(default)]
    pub other_remarks: String,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked_data: Option<MarkedData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_remarks: Option<String>,
}

impl Application {
    pub fn status(&self) -> Status {
        match &self.marked_data {
            None => Status::Pending,
            Some(m) => m.status.into(),
        }
    }
}

impl Searchable for Application {
    fn haystack(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.department.as_str(), self.roll_number.as_str()]
    }
}

/// Public join form payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub roll_number: String,
    #[serde(default)]
    pub registration_number: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub interested_tracks: Vec<String>,
    #[serde(default)]
    pub why_join: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub projects: String,
    #[serde(default)]
    pub other_remarks: String,
    #[serde(default, alias = "turnstileToken", alias = "cf-turnstile-response")]
    pub token: String,
}

impl Validate for JoinRequest {
    fn check(&self, v: &mut Validator) {
        v.required("name", &self.name)
            .max_chars("name", &self.name, 100)
            .email("email", &self.email)
            .phone("phone", &self.phone)
            .required("batch", &self.batch)
            .required("rollNumber", &self.roll_number)
            .required("registrationNumber", &self.registration_number)
            .required("department", &self.department)
            .non_empty_list("interestedTracks", &self.interested_tracks)
            .min_chars("whyJoin", &self.why_join, MIN_WHY_JOIN_CHARS)
            .max_chars("whyJoin", &self.why_join, 2000);
        if self.token.trim().is_empty() {
            v.fail("token", "complete the captcha");
        }
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub batch: String,
    pub roll_number: String,
    pub registration_number: String,
    pub department: String,
    pub interested_tracks: Vec<String>,
    pub why_join: String,
    pub experience: String,
    pub projects: String,
    pub other_remarks: String,
    pub created: DateTime<Utc>,
}

impl From<JoinRequest> for Insert {
    fn from(r: JoinRequest) -> Self {
        Insert {
            id: super::common::new_id(),
            name: r.name.trim().to_owned(),
            email: r.email.trim().to_lowercase(),
            phone: r.phone.trim().to_owned(),
            batch: r.batch.trim().to_owned(),
            roll_number: r.roll_number.trim().to_owned(),
            registration_number: r.registration_number.trim().to_owned(),
            department: r.department.trim().to_owned(),
            interested_tracks: r.interested_tracks.into_iter().map(|t| t.trim().to_owned()).filter(|t| !t.is_empty()).collect(),
            why_join: r.why_join.trim().to_owned(),
            experience: r.experience,
            projects: r.projects,
            other_remarks: r.other_remarks,
            created: Utc::now(),
        }
    }
}

impl From<Insert> for Application {
    fn from(i: Insert) -> Self {
        Application {
            id: i.id,
            name: i.name,
            email: i.email,
            phone: i.phone,
            batch: i.batch,
            roll_number: i.roll_number,
            registration_number: i.registration_number,
            department: i.department,
            interested_tracks: i.interested_tracks,
            why_join: i.why_join,
            experience: i.experience,
            projects: i.projects,
            other_remarks: i.other_remarks,
            created: i.created,
            marked_data: None,
            mod_remarks: None,
        }
    }
}

/// Review columns written by a transition.
#[derive(Debug, Clone)]
pub struct ReviewUpdate {
    pub marked_data: Option<MarkedData>,
    pub mod_remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRequest {
    pub application_id: String,
    pub status: Decision,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackRequest {
    pub application_id: String,
    #[serde(default)]
    pub reason: String,
}
