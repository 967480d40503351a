use std::fmt::{self, Display};

use crate::core::models::recruiter::RecruiterInfo;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Object {
    Application,
    Team,
    ClubMember,
    Event,
    Resource,
    Bos,
    Collaboration,
    Log,
}

impl Object {
    pub fn as_str(&self) -> &'static str {
        match self {
            Object::Application => "application",
            Object::Team => "team",
            Object::ClubMember => "club_member",
            Object::Event => "event",
            Object::Resource => "resource",
            Object::Bos => "bos",
            Object::Collaboration => "collaboration",
            Object::Log => "log",
        }
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Delete => "delete",
        }
    }
}

/// Roles a recruiter acts under; every recruiter holds `recruiter`.
pub fn roles(r: &RecruiterInfo) -> Vec<&'static str> {
    let mut roles = vec!["recruiter"];
    if r.team_mgmt {
        roles.push("team_mgmt");
    }
    if r.exec {
        roles.push("exec");
    }
    roles
}

pub trait Authorizer: 'static {
    fn check(&self, recruiter: &RecruiterInfo, obj: Object, act: Action) -> Result<bool, Error>;
}

pub fn ensure<A: Authorizer>(authorizer: &A, recruiter: &RecruiterInfo, obj: Object, act: Action) -> Result<(), Error> {
    if !authorizer.check(recruiter, obj, act)? {
        log::warn!("recruiter {} denied {} on {}", recruiter.id, act.as_str(), obj);
        return Err(Error::PermissionDenied);
    }
    Ok(())
}
