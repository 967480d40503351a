use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Recruiter {
    pub id: String,
    pub username: String,
    pub assignee: String,
    pub password: String,
    pub salt: String,
    pub exec: bool,
    pub team_mgmt: bool,
    pub created: DateTime<Utc>,
}

/// The authenticated reviewer attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterInfo {
    pub id: String,
    pub assignee: String,
    #[serde(default)]
    pub exec: bool,
    #[serde(default)]
    pub team_mgmt: bool,
}

impl From<&Recruiter> for RecruiterInfo {
    fn from(r: &Recruiter) -> Self {
        RecruiterInfo {
            id: r.id.clone(),
            assignee: r.assignee.clone(),
            exec: r.exec,
            team_mgmt: r.team_mgmt,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub id: String,
    pub username: String,
    pub assignee: String,
    pub password: String,
    pub salt: String,
    pub exec: bool,
    pub team_mgmt: bool,
    pub created: DateTime<Utc>,
}

impl From<Insert> for Recruiter {
    fn from(i: Insert) -> Self {
        Recruiter {
            id: i.id,
            username: i.username,
            assignee: i.assignee,
            password: i.password,
            salt: i.salt,
            exec: i.exec,
            team_mgmt: i.team_mgmt,
            created: i.created,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}
