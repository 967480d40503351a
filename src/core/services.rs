pub mod application;
pub mod audit;
pub mod bos;
pub mod club_member;
pub mod collaboration;
pub mod event;
pub mod metadata;
pub mod recruiter;
pub mod resource;
pub mod team;

#[cfg(test)]
pub(crate) mod test {
    use crate::core::models::recruiter::RecruiterInfo;

    pub(crate) fn recruiter(exec: bool, team_mgmt: bool) -> RecruiterInfo {
        RecruiterInfo {
            id: "r1".into(),
            assignee: "Grace".into(),
            exec,
            team_mgmt,
        }
    }
}
