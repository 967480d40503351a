use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::core::models::application::{Application, MarkedData};
use crate::error::Error;

/// `applications` row; the verdict is spread over the `marked_*` columns.
#[derive(Debug, FromRow)]
pub struct ApplicationRow {
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
    pub marked_status: Option<String>,
    pub marked_remarks: Option<String>,
    pub marked_at: Option<DateTime<Utc>>,
    pub marked_by: Option<String>,
    pub mod_remarks: Option<String>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = Error;

    fn try_from(r: ApplicationRow) -> Result<Self, Self::Error> {
        let marked_data = match (r.marked_status, r.marked_at) {
            (Some(status), Some(decided_at)) => Some(MarkedData {
                status: status.parse()?,
                remarks: r.marked_remarks.unwrap_or_default(),
                decided_at,
                decided_by: r.marked_by,
            }),
            _ => None,
        };
        Ok(Application {
            id: r.id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            batch: r.batch,
            roll_number: r.roll_number,
            registration_number: r.registration_number,
            department: r.department,
            interested_tracks: r.interested_tracks,
            why_join: r.why_join,
            experience: r.experience,
            projects: r.projects,
            other_remarks: r.other_remarks,
            created: r.created,
            marked_data,
            mod_remarks: r.mod_remarks,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::application::{Decision, Status};

    fn row(status: Option<&str>) -> ApplicationRow {
        ApplicationRow {
            id: "a1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: "9876543210".into(),
            batch: "2027".into(),
            roll_number: "21CS042".into(),
            registration_number: "RA21".into(),
            department: "CSE".into(),
            interested_tracks: vec!["web".into()],
            why_join: "x".repeat(60),
            experience: String::new(),
            projects: String::new(),
            other_remarks: String::new(),
            created: Utc::now(),
            marked_status: status.map(str::to_owned),
            marked_remarks: status.map(|_| "ok".to_owned()),
            marked_at: status.map(|_| Utc::now()),
            marked_by: None,
            mod_remarks: None,
        }
    }

    #[test]
    fn test_marked_columns() {
        assert_eq!(Application::try_from(row(None)).unwrap().status(), Status::Pending);
        let app = Application::try_from(row(Some("rejected"))).unwrap();
        assert_eq!(app.marked_data.unwrap().status, Decision::Rejected);
        assert!(Application::try_from(row(Some("maybe"))).is_err());
    }
}
