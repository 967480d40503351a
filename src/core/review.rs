//! Review state machine for membership applications.
//!
//! ```text
//!            decide(approved)            rollback
//!   Pending ─────────────────► Approved ─────────► Pending
//!      │     decide(rejected)            rollback
//!      └─────────────────────► Rejected ─────────► Pending
//! ```
//!
//! Every edge needs a non-empty justification: remarks when deciding, a
//! reason when rolling back. The functions here are pure; the server
//! service and the dashboard board both run them before touching storage
//! or the network.

use chrono::{DateTime, Utc};

use crate::core::models::application::{Decision, MarkedData, Status};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub remarks: String,
    pub decided_at: DateTime<Utc>,
    pub decided_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationState {
    Pending,
    Approved(Verdict),
    Rejected(Verdict),
}

impl ApplicationState {
    pub fn status(&self) -> Status {
        match self {
            ApplicationState::Pending => Status::Pending,
            ApplicationState::Approved(_) => Status::Approved,
            ApplicationState::Rejected(_) => Status::Rejected,
        }
    }

    pub fn into_marked_data(self) -> Option<MarkedData> {
        let (status, v) = match self {
            ApplicationState::Pending => return None,
            ApplicationState::Approved(v) => (Decision::Approved, v),
            ApplicationState::Rejected(v) => (Decision::Rejected, v),
        };
        Some(MarkedData {
            status,
            remarks: v.remarks,
            decided_at: v.decided_at,
            decided_by: v.decided_by,
        })
    }
}

impl From<Option<MarkedData>> for ApplicationState {
    fn from(m: Option<MarkedData>) -> Self {
        match m {
            None => ApplicationState::Pending,
            Some(m) => {
                let v = Verdict {
                    remarks: m.remarks,
                    decided_at: m.decided_at,
                    decided_by: m.decided_by,
                };
                match m.status {
                    Decision::Approved => ApplicationState::Approved(v),
                    Decision::Rejected => ApplicationState::Rejected(v),
                }
            }
        }
    }
}

/// Checks the remarks before anything else so a blank form never reaches
/// storage or the network, whatever state the application is in.
pub fn decide(state: &ApplicationState, decision: Decision, remarks: &str, at: DateTime<Utc>, by: Option<&str>) -> Result<ApplicationState, Error> {
    let remarks = remarks.trim();
    if remarks.is_empty() {
        return Err(Error::RemarksRequired);
    }
    if *state != ApplicationState::Pending {
        return Err(Error::InvalidTransition {
            from: state.status(),
            action: "decide",
        });
    }
    let v = Verdict {
        remarks: remarks.to_owned(),
        decided_at: at,
        decided_by: by.map(str::to_owned),
    };
    Ok(match decision {
        Decision::Approved => ApplicationState::Approved(v),
        Decision::Rejected => ApplicationState::Rejected(v),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollback {
    pub previous: Status,
    pub reason: String,
}

pub fn rollback(state: &ApplicationState, reason: &str) -> Result<Rollback, Error> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(Error::ReasonRequired);
    }
    match state {
        ApplicationState::Pending => Err(Error::InvalidTransition {
            from: Status::Pending,
            action: "roll back",
        }),
        s => Ok(Rollback {
            previous: s.status(),
            reason: reason.to_owned(),
        }),
    }
}

pub fn history_entry(at: DateTime<Utc>, actor: &str, previous: Status, reason: &str) -> String {
    format!("[{}] {} ({}): {}", at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true), actor, previous, reason)
}

/// Appends one line to the rollback history; earlier lines are kept as-is.
pub fn append_history(history: Option<&str>, entry: &str) -> String {
    match history {
        Some(h) if !h.trim().is_empty() => format!("{}\n{}", h.trim_end(), entry),
        _ => entry.to_owned(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_decide_from_pending() {
        let s = decide(&ApplicationState::Pending, Decision::Approved, "  ok  ", at(), Some("r1")).unwrap();
        assert_eq!(s.status(), Status::Approved);
        let m = s.into_marked_data().unwrap();
        assert_eq!(m.remarks, "ok");
        assert_eq!(m.status, Decision::Approved);
        assert_eq!(m.decided_by.as_deref(), Some("r1"));
    }

    #[test]
    fn test_decide_requires_remarks_in_every_state() {
        let approved = decide(&ApplicationState::Pending, Decision::Approved, "ok", at(), None).unwrap();
        for s in [ApplicationState::Pending, approved] {
            for remarks in ["", "   ", "\n\t"] {
                assert!(matches!(decide(&s, Decision::Rejected, remarks, at(), None), Err(Error::RemarksRequired)));
            }
        }
    }

    #[test]
    fn test_decide_twice_is_rejected() {
        let s = decide(&ApplicationState::Pending, Decision::Rejected, "weak answers", at(), None).unwrap();
        match decide(&s, Decision::Approved, "changed my mind", at(), None) {
            Err(Error::InvalidTransition { from, .. }) => assert_eq!(from, Status::Rejected),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rollback_requires_reason() {
        for d in [Decision::Approved, Decision::Rejected] {
            let s = decide(&ApplicationState::Pending, d, "ok", at(), None).unwrap();
            assert!(matches!(rollback(&s, "  "), Err(Error::ReasonRequired)));
            let r = rollback(&s, " mis-click ").unwrap();
            assert_eq!(r.previous, Status::from(d));
            assert_eq!(r.reason, "mis-click");
        }
    }

    #[test]
    fn test_rollback_from_pending_is_rejected() {
        assert!(matches!(rollback(&ApplicationState::Pending, "why"), Err(Error::InvalidTransition { .. })));
    }

    #[test]
    fn test_marked_data_round_trip() {
        let s = decide(&ApplicationState::Pending, Decision::Rejected, "late", at(), None).unwrap();
        let back = ApplicationState::from(s.clone().into_marked_data());
        assert_eq!(back, s);
        assert_eq!(ApplicationState::from(None), ApplicationState::Pending);
    }

    #[test]
    fn test_history_is_cumulative() {
        let first = history_entry(at(), "Grace", Status::Approved, "wrong applicant");
        assert_eq!(first, "[2026-03-01T10:30:00Z] Grace (approved): wrong applicant");
        let h = append_history(None, &first);
        let h = append_history(Some(&h), "second");
        assert_eq!(h, format!("{}\nsecond", first));
        assert_eq!(append_history(Some("  "), "only"), "only");
    }
}
