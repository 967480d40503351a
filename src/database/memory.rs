//! Process-local store used for development (`STORE=memory`) and tests.
//!
//! Plain stores lock the tables per call. A transactional store holds the
//! lock until it is committed or dropped, and restores its snapshot unless
//! it was committed. Test builds also count store calls, read back through
//! `MemoryManager::calls`.

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::core::filter::{Filter, Searchable};
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
use crate::core::ports::repository::{
    ApplicationCommon, AuditCommon, BosCommon, ClubMemberCommon, CollaborationCommon, Common, EventCommon, Manager, RecruiterCommon, ResourceCommon, Store, TeamCommon,
    TxStore,
};
use crate::error::Error;

trait Keyed {
    fn key(&self) -> &str;
}

macro_rules! keyed {
    ($($t:ty),*) => {
        $(impl Keyed for $t {
            fn key(&self) -> &str {
                &self.id
            }
        })*
    };
}

keyed!(Application, Team, ClubMember, Event, Resource, BosMember, Collaboration, Recruiter, AuditEntry);

#[derive(Debug, Default, Clone)]
pub struct Tables {
    applications: Vec<Application>,
    teams: Vec<Team>,
    club_members: Vec<ClubMember>,
    events: Vec<Event>,
    resources: Vec<Resource>,
    bos: Vec<BosMember>,
    collaborations: Vec<Collaboration>,
    recruiters: Vec<Recruiter>,
    audit: Vec<AuditEntry>,
    #[cfg(test)]
    calls: u64,
}

fn not_found() -> Error {
    Error::DatabaseError(sqlx::Error::RowNotFound)
}

fn position<T: Keyed>(rows: &[T], id: &str) -> Result<usize, Error> {
    rows.iter().position(|r| r.key() == id).ok_or_else(not_found)
}

fn find<T: Keyed + Clone>(rows: &[T], id: &str) -> Result<T, Error> {
    Ok(rows[position(rows, id)?].clone())
}

fn replace<T: Keyed>(rows: &mut [T], id: &str, row: T) -> Result<(), Error> {
    let i = position(rows, id)?;
    rows[i] = row;
    Ok(())
}

fn remove<T: Keyed>(rows: &mut Vec<T>, id: &str) -> Result<(), Error> {
    let i = position(rows, id)?;
    rows.remove(i);
    Ok(())
}

/// Newest first, like the SQL store's `ORDER BY created DESC`.
fn select<'a, T: Searchable + Clone + 'a>(rows: impl DoubleEndedIterator<Item = &'a T>, filter: &Filter, pagination: Option<Pagination>) -> Vec<T> {
    let matched: Vec<T> = rows.rev().filter(|r| filter.matches(*r)).cloned().collect();
    match pagination {
        Some(p) => p.slice(matched),
        None => matched,
    }
}

fn count<'a, T: Searchable + 'a>(rows: impl Iterator<Item = &'a T>, filter: &Filter) -> i64 {
    rows.filter(|r| filter.matches(*r)).count() as i64
}

enum Handle {
    Shared(Arc<Mutex<Tables>>),
    Tx { guard: OwnedMutexGuard<Tables>, backup: Option<Tables> },
}

pub struct MemoryStore {
    handle: Handle,
}

impl MemoryStore {
    async fn with<R>(&mut self, f: impl FnOnce(&mut Tables) -> R) -> R {
        match &mut self.handle {
            Handle::Shared(tables) => {
                let mut t = tables.lock().await;
                #[cfg(test)]
                {
                    t.calls += 1;
                }
                f(&mut *t)
            }
            Handle::Tx { guard, .. } => {
                #[cfg(test)]
                {
                    guard.calls += 1;
                }
                f(&mut **guard)
            }
        }
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        if let Handle::Tx { guard, backup } = &mut self.handle {
            if let Some(b) = backup.take() {
                #[cfg(test)]
                let calls = guard.calls;
                **guard = b;
                #[cfg(test)]
                {
                    guard.calls = calls;
                }
            }
        }
    }
}

impl ApplicationCommon for MemoryStore {
    async fn insert(&mut self, data: ApplicationInsert) -> Result<String, Error> {
        let id = data.id.clone();
        self.with(|t| t.applications.push(data.into())).await;
        Ok(id)
    }

    async fn query(&mut self, status: Option<Status>, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Application>, Error> {
        Ok(self.with(|t| select(t.applications.iter().filter(|a| status.map_or(true, |s| a.status() == s)), filter, pagination)).await)
    }

    async fn count(&mut self, status: Option<Status>, filter: &Filter) -> Result<i64, Error> {
        Ok(self.with(|t| count(t.applications.iter().filter(|a| status.map_or(true, |s| a.status() == s)), filter)).await)
    }

    async fn get(&mut self, id: &str) -> Result<Application, Error> {
        self.with(|t| find(&t.applications, id)).await
    }

    async fn get_for_update(&mut self, id: &str) -> Result<Application, Error> {
        ApplicationCommon::get(self, id).await
    }

    async fn update_review(&mut self, id: &str, update: ReviewUpdate) -> Result<(), Error> {
        self.with(|t| -> Result<(), Error> {
            let i = position(&t.applications, id)?;
            t.applications[i].marked_data = update.marked_data;
            t.applications[i].mod_remarks = update.mod_remarks;
            Ok(())
        })
        .await
    }

    async fn exists_email(&mut self, email: &str) -> Result<bool, Error> {
        let email = email.to_lowercase();
        Ok(self.with(|t| t.applications.iter().any(|a| a.email.to_lowercase() == email)).await)
    }
}

impl TeamCommon for MemoryStore {
    async fn insert(&mut self, data: TeamInsert) -> Result<String, Error> {
        let id = data.id.clone();
        self.with(|t| t.teams.push(data.into())).await;
        Ok(id)
    }

    async fn update(&mut self, id: &str, data: TeamInsert) -> Result<(), Error> {
        self.with(|t| -> Result<(), Error> {
            let i = position(&t.teams, id)?;
            let team = &mut t.teams[i];
            team.name = data.name;
            team.description = data.description;
            Ok(())
        })
        .await
    }

    async fn get(&mut self, id: &str) -> Result<Team, Error> {
        self.with(|t| find(&t.teams, id)).await
    }

    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Team>, Error> {
        Ok(self.with(|t| select(t.teams.iter(), filter, pagination)).await)
    }

    async fn count(&mut self, filter: &Filter) -> Result<i64, Error> {
        Ok(self.with(|t| count(t.teams.iter(), filter)).await)
    }

    async fn delete(&mut self, id: &str) -> Result<(), Error> {
        self.with(|t| remove(&mut t.teams, id)).await
    }

    async fn exists_name(&mut self, name: &str, except: Option<&str>) -> Result<bool, Error> {
        let name = name.to_lowercase();
        Ok(self.with(|t| t.teams.iter().any(|team| team.name.to_lowercase() == name && Some(team.id.as_str()) != except)).await)
    }

    async fn exists_all(&mut self, ids: &[String]) -> Result<bool, Error> {
        Ok(self.with(|t| ids.iter().all(|id| t.teams.iter().any(|team| &team.id == id))).await)
    }
}

impl ClubMemberCommon for MemoryStore {
    async fn insert(&mut self, data: ClubMemberInsert) -> Result<String, Error> {
        let id = data.id.clone();
        self.with(|t| t.club_members.push(data.into())).await;
        Ok(id)
    }

    async fn update(&mut self, id: &str, data: ClubMemberInsert) -> Result<(), Error> {
        self.with(|t| -> Result<(), Error> {
            let i = position(&t.club_members, id)?;
            let mut row = ClubMember::from(data);
            row.id = t.club_members[i].id.clone();
            row.created = t.club_members[i].created;
            t.club_members[i] = row;
            Ok(())
        })
        .await
    }

    async fn get(&mut self, id: &str) -> Result<ClubMember, Error> {
        self.with(|t| find(&t.club_members, id)).await
    }

    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<ClubMember>, Error> {
        Ok(self.with(|t| select(t.club_members.iter(), filter, pagination)).await)
    }

    async fn count(&mut self, filter: &Filter) -> Result<i64, Error> {
        Ok(self.with(|t| count(t.club_members.iter(), filter)).await)
    }

    async fn delete(&mut self, id: &str) -> Result<(), Error> {
        self.with(|t| remove(&mut t.club_members, id)).await
    }

    async fn set_teams(&mut self, id: &str, teams: &[String]) -> Result<(), Error> {
        self.with(|t| -> Result<(), Error> {
            let i = position(&t.club_members, id)?;
            t.club_members[i].teams = teams.to_vec();
            Ok(())
        })
        .await
    }

    async fn remove_team(&mut self, team_id: &str) -> Result<u64, Error> {
        Ok(self
            .with(|t| {
                let mut changed = 0;
                for m in t.club_members.iter_mut().filter(|m| m.teams.iter().any(|x| x == team_id)) {
                    m.teams.retain(|x| x != team_id);
                    changed += 1;
                }
                changed
            })
            .await)
    }

    async fn count_by_team(&mut self, team_ids: &[String]) -> Result<Vec<(String, i64)>, Error> {
        Ok(self
            .with(|t| {
                team_ids
                    .iter()
                    .map(|id| (id.clone(), t.club_members.iter().filter(|m| m.teams.contains(id)).count() as i64))
                    .filter(|(_, n)| *n > 0)
                    .collect()
            })
            .await)
    }
}

impl EventCommon for MemoryStore {
    async fn insert(&mut self, data: EventInsert) -> Result<String, Error> {
        let id = data.id.clone();
        self.with(|t| t.events.push(data.into())).await;
        Ok(id)
    }

    async fn update(&mut self, id: &str, data: EventInsert) -> Result<(), Error> {
        self.with(|t| -> Result<(), Error> {
            let old = find(&t.events, id)?;
            let mut row = Event::from(data);
            row.id = old.id;
            row.created = old.created;
            replace(&mut t.events, id, row)
        })
        .await
    }

    async fn get(&mut self, id: &str) -> Result<Event, Error> {
        self.with(|t| find(&t.events, id)).await
    }

    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Event>, Error> {
        Ok(self.with(|t| select(t.events.iter(), filter, pagination)).await)
    }

    async fn count(&mut self, filter: &Filter) -> Result<i64, Error> {
        Ok(self.with(|t| count(t.events.iter(), filter)).await)
    }

    async fn delete(&mut self, id: &str) -> Result<(), Error> {
        self.with(|t| remove(&mut t.events, id)).await
    }
}

impl ResourceCommon for MemoryStore {
    async fn insert(&mut self, data: ResourceInsert) -> Result<String, Error> {
        let id = data.id.clone();
        self.with(|t| t.resources.push(data.into())).await;
        Ok(id)
    }

    async fn update(&mut self, id: &str, data: ResourceInsert) -> Result<(), Error> {
        self.with(|t| -> Result<(), Error> {
            let old = find(&t.resources, id)?;
            let mut row = Resource::from(data);
            row.id = old.id;
            row.created = old.created;
            replace(&mut t.resources, id, row)
        })
        .await
    }

    async fn get(&mut self, id: &str) -> Result<Resource, Error> {
        self.with(|t| find(&t.resources, id)).await
    }

    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Resource>, Error> {
        Ok(self.with(|t| select(t.resources.iter(), filter, pagination)).await)
    }

    async fn count(&mut self, filter: &Filter) -> Result<i64, Error> {
        Ok(self.with(|t| count(t.resources.iter(), filter)).await)
    }

    async fn delete(&mut self, id: &str) -> Result<(), Error> {
        self.with(|t| remove(&mut t.resources, id)).await
    }
}

impl BosCommon for MemoryStore {
    async fn insert(&mut self, data: BosInsert) -> Result<String, Error> {
        let id = data.id.clone();
        self.with(|t| t.bos.push(data.into())).await;
        Ok(id)
    }

    async fn update(&mut self, id: &str, data: BosInsert) -> Result<(), Error> {
        self.with(|t| -> Result<(), Error> {
            let old = find(&t.bos, id)?;
            let mut row = BosMember::from(data);
            row.id = old.id;
            row.created = old.created;
            replace(&mut t.bos, id, row)
        })
        .await
    }

    async fn get(&mut self, id: &str) -> Result<BosMember, Error> {
        self.with(|t| find(&t.bos, id)).await
    }

    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<BosMember>, Error> {
        Ok(self.with(|t| select(t.bos.iter(), filter, pagination)).await)
    }

    async fn count(&mut self, filter: &Filter) -> Result<i64, Error> {
        Ok(self.with(|t| count(t.bos.iter(), filter)).await)
    }

    async fn delete(&mut self, id: &str) -> Result<(), Error> {
        self.with(|t| remove(&mut t.bos, id)).await
    }
}

impl CollaborationCommon for MemoryStore {
    async fn insert(&mut self, data: CollaborationInsert) -> Result<String, Error> {
        let id = data.id.clone();
        self.with(|t| t.collaborations.push(data.into())).await;
        Ok(id)
    }

    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Collaboration>, Error> {
        Ok(self.with(|t| select(t.collaborations.iter(), filter, pagination)).await)
    }

    async fn count(&mut self, filter: &Filter) -> Result<i64, Error> {
        Ok(self.with(|t| count(t.collaborations.iter(), filter)).await)
    }
}

impl RecruiterCommon for MemoryStore {
    async fn insert(&mut self, data: RecruiterInsert) -> Result<String, Error> {
        let id = data.id.clone();
        self.with(|t| t.recruiters.push(data.into())).await;
        Ok(id)
    }

    async fn get(&mut self, id: &str) -> Result<Recruiter, Error> {
        self.with(|t| find(&t.recruiters, id)).await
    }

    async fn get_by_username(&mut self, username: &str) -> Result<Option<Recruiter>, Error> {
        Ok(self.with(|t| t.recruiters.iter().find(|r| r.username == username).cloned()).await)
    }
}

impl AuditCommon for MemoryStore {
    async fn insert(&mut self, data: AuditInsert) -> Result<String, Error> {
        let id = data.id.clone();
        self.with(|t| t.audit.push(data.into())).await;
        Ok(id)
    }

    async fn query(&mut self, pagination: Option<Pagination>) -> Result<Vec<AuditEntry>, Error> {
        Ok(self
            .with(|t| {
                let rows: Vec<AuditEntry> = t.audit.iter().rev().cloned().collect();
                match pagination {
                    Some(p) => p.slice(rows),
                    None => rows,
                }
            })
            .await)
    }

    async fn count(&mut self) -> Result<i64, Error> {
        Ok(self.with(|t| t.audit.len() as i64).await)
    }
}

impl Common for MemoryStore {}
impl Store for MemoryStore {}

impl TxStore for MemoryStore {
    async fn commit(mut self) -> Result<(), Error> {
        if let Handle::Tx { backup, .. } = &mut self.handle {
            *backup = None;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryManager {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store calls made so far, reads included. Rolled-back calls still count.
    #[cfg(test)]
    pub async fn calls(&self) -> u64 {
        self.tables.lock().await.calls
    }
}

impl Manager for MemoryManager {
    type Store = MemoryStore;
    type TxStore = MemoryStore;

    async fn db(&self) -> Result<MemoryStore, Error> {
        Ok(MemoryStore {
            handle: Handle::Shared(self.tables.clone()),
        })
    }

    async fn tx(&self) -> Result<MemoryStore, Error> {
        let guard = self.tables.clone().lock_owned().await;
        let backup = Some((*guard).clone());
        Ok(MemoryStore {
            handle: Handle::Tx { guard, backup },
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::club_member::test::member;

    #[tokio::test]
    async fn test_uncommitted_tx_is_discarded() {
        let m = MemoryManager::new();
        let mut tx = m.tx().await.unwrap();
        TeamCommon::insert(&mut tx, TeamInsert::from(crate::core::models::team::Create { name: "Web".into(), description: String::new() })).await.unwrap();
        drop(tx);
        let mut db = m.db().await.unwrap();
        assert_eq!(TeamCommon::count(&mut db, &Filter::default()).await.unwrap(), 0);

        let mut tx = m.tx().await.unwrap();
        TeamCommon::insert(&mut tx, TeamInsert::from(crate::core::models::team::Create { name: "Web".into(), description: String::new() })).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(TeamCommon::count(&mut db, &Filter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_calls_survive_rollback() {
        let m = MemoryManager::new();
        let mut db = m.db().await.unwrap();
        TeamCommon::count(&mut db, &Filter::default()).await.unwrap();
        assert_eq!(m.calls().await, 1);
        let mut tx = m.tx().await.unwrap();
        assert!(TeamCommon::get(&mut tx, "nope").await.is_err());
        drop(tx);
        assert_eq!(m.calls().await, 2);
    }

    #[tokio::test]
    async fn test_remove_team_counts_changed_members() {
        let m = MemoryManager::new();
        let mut db = m.db().await.unwrap();
        let mut a = member("Ada", "Lead", &[], "active");
        a.teams = vec!["t1".into(), "t2".into()];
        let mut b = member("Bob", "Dev", &[], "active");
        b.teams = vec!["t2".into()];
        let a_id = ClubMemberCommon::insert(&mut db, a.into()).await.unwrap();
        ClubMemberCommon::insert(&mut db, b.into()).await.unwrap();
        ClubMemberCommon::insert(&mut db, member("Cy", "Dev", &[], "active").into()).await.unwrap();
        assert_eq!(db.remove_team("t2").await.unwrap(), 2);
        assert_eq!(ClubMemberCommon::get(&mut db, &a_id).await.unwrap().teams, vec!["t1".to_owned()]);
    }

    #[tokio::test]
    async fn test_missing_rows_are_not_found() {
        let m = MemoryManager::new();
        let mut db = m.db().await.unwrap();
        assert!(matches!(EventCommon::get(&mut db, "nope").await, Err(Error::DatabaseError(sqlx::Error::RowNotFound))));
        assert!(matches!(BosCommon::delete(&mut db, "nope").await, Err(Error::DatabaseError(sqlx::Error::RowNotFound))));
    }
}
