use std::collections::HashMap;

use crate::core::filter::Filter;
use crate::core::models::{
    club_member::ClubMember,
    common::Pagination,
    team::{Create, Insert, Team, TeamWithMembers, Update},
};
use crate::core::ports::repository::{ClubMemberCommon, Store, TeamCommon, TxStore};
use crate::core::validate::Validate;
use crate::error::Error;

fn members_of(team_id: &str) -> Filter {
    Filter {
        team: Some(team_id.into()),
        ..default::default()
    }
}

pub async fn list<S>(db: &mut S, filter: &Filter, pagination: Option<Pagination>) -> Result<(Vec<TeamWithMembers>, i64), Error>
where
    S: Store,
{
    let teams = TeamCommon::query(db, filter, pagination).await?;
    let total = TeamCommon::count(db, filter).await?;
    let ids: Vec<String> = teams.iter().map(|t| t.id.clone()).collect();
    let counts: HashMap<String, i64> = db.count_by_team(&ids).await?.into_iter().collect();
    let list = teams
        .into_iter()
        .map(|team| {
            let member_count = counts.get(&team.id).copied().unwrap_or(0);
            TeamWithMembers { team, member_count }
        })
        .collect();
    Ok((list, total))
}

pub async fn get<S>(db: &mut S, id: &str) -> Result<Team, Error>
where
    S: Store,
{
    TeamCommon::get(db, id).await
}

pub async fn create<S>(db: &mut S, data: Create) -> Result<String, Error>
where
    S: Store,
{
    data.validate()?;
    if db.exists_name(data.name.trim(), None).await? {
        return Err(Error::Conflict(format!("team {} already exists", data.name.trim())));
    }
    TeamCommon::insert(db, Insert::from(data)).await
}

pub async fn update<S>(db: &mut S, id: &str, data: Update) -> Result<(), Error>
where
    S: Store,
{
    data.validate()?;
    TeamCommon::get(db, id).await?;
    if db.exists_name(data.name.trim(), Some(id)).await? {
        return Err(Error::Conflict(format!("team {} already exists", data.name.trim())));
    }
    TeamCommon::update(db, id, Insert::from(data)).await
}

/// Deletes the team and strips it from every member in one transaction.
pub async fn delete<T>(mut tx: T, id: &str) -> Result<u64, Error>
where
    T: TxStore,
{
    TeamCommon::get(&mut tx, id).await?;
    let detached = tx.remove_team(id).await?;
    TeamCommon::delete(&mut tx, id).await?;
    tx.commit().await?;
    log::info!("team {} deleted, detached from {} members", id, detached);
    Ok(detached)
}

pub async fn members<S>(db: &mut S, id: &str, pagination: Option<Pagination>) -> Result<(Vec<ClubMember>, i64), Error>
where
    S: Store,
{
    TeamCommon::get(db, id).await?;
    let filter = members_of(id);
    let list = ClubMemberCommon::query(db, &filter, pagination).await?;
    let total = ClubMemberCommon::count(db, &filter).await?;
    Ok((list, total))
}
