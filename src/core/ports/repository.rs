use crate::core::filter::Filter;
use crate::core::models::{
    application::{Application, Insert as ApplicationInsert, ReviewUpdate, Status},
    audit::{AuditEntry, Insert as AuditInsert},
    bos::{BosMember, Insert as BosInsert},
    club_member::{ClubMember, Insert as ClubMemberInsert},
    collaboration::{Collaboration, Insert as CollaborationInsert},
    common::Pagination,
    event::{Event, Insert as EventInsert},
    recruiter::{Insert as RecruiterInsert, Recruiter},
    resource::{Insert as ResourceInsert, Resource},
    team::{Insert as TeamInsert, Team},
};
use crate::error::Error;

pub trait ApplicationCommon {
    async fn insert(&mut self, data: ApplicationInsert) -> Result<String, Error>;
    async fn query(&mut self, status: Option<Status>, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Application>, Error>;
    async fn count(&mut self, status: Option<Status>, filter: &Filter) -> Result<i64, Error>;
    async fn get(&mut self, id: &str) -> Result<Application, Error>;
    async fn get_for_update(&mut self, id: &str) -> Result<Application, Error>;
    async fn update_review(&mut self, id: &str, update: ReviewUpdate) -> Result<(), Error>;
    async fn exists_email(&mut self, email: &str) -> Result<bool, Error>;
}

pub trait TeamCommon {
    async fn insert(&mut self, data: TeamInsert) -> Result<String, Error>;
    async fn update(&mut self, id: &str, data: TeamInsert) -> Result<(), Error>;
    async fn get(&mut self, id: &str) -> Result<Team, Error>;
    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Team>, Error>;
    async fn count(&mut self, filter: &Filter) -> Result<i64, Error>;
    async fn delete(&mut self, id: &str) -> Result<(), Error>;
    async fn exists_name(&mut self, name: &str, except: Option<&str>) -> Result<bool, Error>;
    async fn exists_all(&mut self, ids: &[String]) -> Result<bool, Error>;
}

pub trait ClubMemberCommon {
    async fn insert(&mut self, data: ClubMemberInsert) -> Result<String, Error>;
    async fn update(&mut self, id: &str, data: ClubMemberInsert) -> Result<(), Error>;
    async fn get(&mut self, id: &str) -> Result<ClubMember, Error>;
    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<ClubMember>, Error>;
    async fn count(&mut self, filter: &Filter) -> Result<i64, Error>;
    async fn delete(&mut self, id: &str) -> Result<(), Error>;
    async fn set_teams(&mut self, id: &str, teams: &[String]) -> Result<(), Error>;
    /// Strips a team from every member's list, returning how many changed.
    async fn remove_team(&mut self, team_id: &str) -> Result<u64, Error>;
    /// Member counts for the given teams in one query. Teams without members are absent.
    async fn count_by_team(&mut self, team_ids: &[String]) -> Result<Vec<(String, i64)>, Error>;
}

pub trait EventCommon {
    async fn insert(&mut self, data: EventInsert) -> Result<String, Error>;
    async fn update(&mut self, id: &str, data: EventInsert) -> Result<(), Error>;
    async fn get(&mut self, id: &str) -> Result<Event, Error>;
    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Event>, Error>;
    async fn count(&mut self, filter: &Filter) -> Result<i64, Error>;
    async fn delete(&mut self, id: &str) -> Result<(), Error>;
}

pub trait ResourceCommon {
    async fn insert(&mut self, data: ResourceInsert) -> Result<String, Error>;
    async fn update(&mut self, id: &str, data: ResourceInsert) -> Result<(), Error>;
    async fn get(&mut self, id: &str) -> Result<Resource, Error>;
    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Resource>, Error>;
    async fn count(&mut self, filter: &Filter) -> Result<i64, Error>;
    async fn delete(&mut self, id: &str) -> Result<(), Error>;
}

pub trait BosCommon {
    async fn insert(&mut self, data: BosInsert) -> Result<String, Error>;
    async fn update(&mut self, id: &str, data: BosInsert) -> Result<(), Error>;
    async fn get(&mut self, id: &str) -> Result<BosMember, Error>;
    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<BosMember>, Error>;
    async fn count(&mut self, filter: &Filter) -> Result<i64, Error>;
    async fn delete(&mut self, id: &str) -> Result<(), Error>;
}

pub trait CollaborationCommon {
    async fn insert(&mut self, data: CollaborationInsert) -> Result<String, Error>;
    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Collaboration>, Error>;
    async fn count(&mut self, filter: &Filter) -> Result<i64, Error>;
}

pub trait RecruiterCommon {
    async fn insert(&mut self, data: RecruiterInsert) -> Result<String, Error>;
    async fn get(&mut self, id: &str) -> Result<Recruiter, Error>;
    async fn get_by_username(&mut self, username: &str) -> Result<Option<Recruiter>, Error>;
}

pub trait AuditCommon {
    async fn insert(&mut self, data: AuditInsert) -> Result<String, Error>;
    async fn query(&mut self, pagination: Option<Pagination>) -> Result<Vec<AuditEntry>, Error>;
    async fn count(&mut self) -> Result<i64, Error>;
}

pub trait Common:
    ApplicationCommon + TeamCommon + ClubMemberCommon + EventCommon + ResourceCommon + BosCommon + CollaborationCommon + RecruiterCommon + AuditCommon
{
}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

/// Hands out plain and transactional stores; registered as app data.
pub trait Manager: 'static {
    type Store: Store;
    type TxStore: TxStore;
    async fn db(&self) -> Result<Self::Store, Error>;
    async fn tx(&self) -> Result<Self::TxStore, Error>;
}
