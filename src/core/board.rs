//! Client-side bookkeeping for the recruitment dashboard.
//!
//! [`ReviewBoard`] keeps the three application lists a reviewer sees and
//! drives the review state machine against a [`ReviewApi`]. Input is checked
//! before any call goes out, and the lists only change once the server has
//! accepted the transition.

use chrono::Utc;

use crate::core::models::application::{Application, Decision, Status};
use crate::core::models::audit;
use crate::core::review::{self, ApplicationState};
use crate::error::Error;

/// The review endpoints the board talks to.
pub trait ReviewApi {
    async fn list(&self, status: Status) -> Result<Vec<Application>, Error>;
    async fn mark(&self, id: &str, decision: Decision, remarks: &str) -> Result<(), Error>;
    /// Returns the application's history after the rollback was recorded.
    async fn rollback(&self, id: &str, reason: &str) -> Result<String, Error>;
    async fn record(&self, entry: audit::Create) -> Result<(), Error>;
}

pub struct ReviewBoard<A: ReviewApi> {
    api: A,
    pending: Vec<Application>,
    approved: Vec<Application>,
    rejected: Vec<Application>,
    submitting: bool,
}

impl<A: ReviewApi> ReviewBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            pending: Vec::new(),
            approved: Vec::new(),
            rejected: Vec::new(),
            submitting: false,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn submitting(&self) -> bool {
        self.submitting
    }

    pub fn list(&self, status: Status) -> &[Application] {
        match status {
            Status::Pending => &self.pending,
            Status::Approved => &self.approved,
            Status::Rejected => &self.rejected,
        }
    }

    fn list_mut(&mut self, status: Status) -> &mut Vec<Application> {
        match status {
            Status::Pending => &mut self.pending,
            Status::Approved => &mut self.approved,
            Status::Rejected => &mut self.rejected,
        }
    }

    fn find(&self, status: Status, id: &str) -> Result<usize, Error> {
        self.list(status)
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| Error::NotFound(format!("application({})", id)))
    }

    /// Reloads all three lists. On failure the previous lists are kept.
    pub async fn load(&mut self) -> Result<(), Error> {
        self.submitting = true;
        let res = self.fetch_all().await;
        self.submitting = false;
        let (pending, approved, rejected) = res?;
        self.pending = pending;
        self.approved = approved;
        self.rejected = rejected;
        Ok(())
    }

    async fn fetch_all(&self) -> Result<(Vec<Application>, Vec<Application>, Vec<Application>), Error> {
        let pending = self.api.list(Status::Pending).await?;
        let approved = self.api.list(Status::Approved).await?;
        let rejected = self.api.list(Status::Rejected).await?;
        Ok((pending, approved, rejected))
    }

    pub async fn decide(&mut self, id: &str, decision: Decision, remarks: &str) -> Result<(), Error> {
        if remarks.trim().is_empty() {
            return Err(Error::RemarksRequired);
        }
        let idx = self.find(Status::Pending, id)?;
        let next = review::decide(&ApplicationState::Pending, decision, remarks, Utc::now(), None)?;
        self.submitting = true;
        let res = self.api.mark(id, decision, remarks.trim()).await;
        self.submitting = false;
        res?;
        let mut app = self.pending.remove(idx);
        app.marked_data = next.into_marked_data();
        self.list_mut(decision.into()).insert(0, app);
        self.audit(decision.as_str(), id, remarks.trim()).await;
        Ok(())
    }

    pub async fn rollback(&mut self, id: &str, reason: &str) -> Result<(), Error> {
        if reason.trim().is_empty() {
            return Err(Error::ReasonRequired);
        }
        let (from, idx) = match self.find(Status::Approved, id) {
            Ok(idx) => (Status::Approved, idx),
            Err(_) => (Status::Rejected, self.find(Status::Rejected, id)?),
        };
        let state = ApplicationState::from(self.list(from)[idx].marked_data.clone());
        let rb = review::rollback(&state, reason)?;
        self.submitting = true;
        let res = self.api.rollback(id, &rb.reason).await;
        self.submitting = false;
        let history = res?;
        let mut app = self.list_mut(from).remove(idx);
        app.marked_data = None;
        app.mod_remarks = Some(history);
        self.pending.insert(0, app);
        self.audit("rollback", id, &rb.reason).await;
        Ok(())
    }

    async fn audit(&self, action: &str, id: &str, details: &str) {
        let entry = audit::Create {
            action: action.into(),
            resource_type: "application".into(),
            resource_id: id.into(),
            details: details.into(),
        };
        if let Err(e) = self.api.record(entry).await {
            log::warn!("failed to record audit entry for application {}: {}", id, e);
        }
    }
}
