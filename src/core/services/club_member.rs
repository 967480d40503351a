use itertools::Itertools;

use crate::core::filter::Filter;
use crate::core::models::{
    club_member::{ClubMember, Create, Insert, TeamsUpdate, Update},
    common::Pagination,
};
use crate::core::ports::repository::{ClubMemberCommon, Store, TeamCommon};
use crate::core::validate::Validate;
use crate::error::{Error, FieldError};

async fn ensure_teams<S>(db: &mut S, teams: &[String]) -> Result<(), Error>
where
    S: Store,
{
    if !teams.is_empty() && !db.exists_all(teams).await? {
        return Err(Error::Validation(vec![FieldError::new("teams", "unknown team")]));
    }
    Ok(())
}

pub async fn list<S>(db: &mut S, filter: &Filter, pagination: Option<Pagination>) -> Result<(Vec<ClubMember>, i64), Error>
where
    S: Store,
{
    let list = ClubMemberCommon::query(db, filter, pagination).await?;
    let total = ClubMemberCommon::count(db, filter).await?;
    Ok((list, total))
}

pub async fn get<S>(db: &mut S, id: &str) -> Result<ClubMember, Error>
where
    S: Store,
{
    ClubMemberCommon::get(db, id).await
}

pub async fn create<S>(db: &mut S, data: Create) -> Result<String, Error>
where
    S: Store,
{
    data.validate()?;
    ensure_teams(db, &data.teams).await?;
    ClubMemberCommon::insert(db, Insert::from(data)).await
}

pub async fn update<S>(db: &mut S, id: &str, data: Update) -> Result<(), Error>
where
    S: Store,
{
    data.validate()?;
    ensure_teams(db, &data.teams).await?;
    ClubMemberCommon::update(db, id, Insert::from(data)).await
}

pub async fn set_teams<S>(db: &mut S, id: &str, data: TeamsUpdate) -> Result<(), Error>
where
    S: Store,
{
    let teams: Vec<String> = data.teams.into_iter().map(|t| t.trim().to_owned()).filter(|t| !t.is_empty()).unique().collect();
    ensure_teams(db, &teams).await?;
    db.set_teams(id, &teams).await
}

pub async fn delete<S>(db: &mut S, id: &str) -> Result<(), Error>
where
    S: Store,
{
    ClubMemberCommon::delete(db, id).await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::club_member::test::member;
    use crate::core::ports::repository::Manager;
    use crate::database::memory::MemoryManager;

    #[tokio::test]
    async fn test_search_and_status_intersect() {
        let m = MemoryManager::new();
        let mut db = m.db().await.unwrap();
        let mut with_bio = member("Bea", "Designer", &["figma"], "active");
        with_bio.bio = "Ships React Native apps".into();
        for c in [
            member("Ada", "Frontend", &["React", "TypeScript"], "active"),
            member("Ben", "Backend", &["react"], "alumni"),
            member("ReactFan", "Backend", &["go"], "active"),
            member("Cy", "react lead", &[], "active"),
            with_bio,
        ] {
            create(&mut db, c).await.unwrap();
        }
        let filter = Filter {
            search: Some("react".into()),
            status: Some("active".into()),
            ..Default::default()
        }
        .normalized();
        let (found, total) = list(&mut db, &filter, None).await.unwrap();
        let mut names: Vec<_> = found.into_iter().map(|m| m.name).collect();
        names.sort();
        assert_eq!(names, vec!["Ada", "Bea", "Cy"]);
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_unknown_team_rejected() {
        let m = MemoryManager::new();
        let mut db = m.db().await.unwrap();
        let id = create(&mut db, member("Ada", "Lead", &[], "active")).await.unwrap();
        let err = set_teams(&mut db, &id, TeamsUpdate { teams: vec!["ghost".into()] }).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        set_teams(&mut db, &id, TeamsUpdate { teams: vec![] }).await.unwrap();
    }

    #[tokio::test]
    async fn test_pagination() {
        let m = MemoryManager::new();
        let mut db = m.db().await.unwrap();
        for i in 0..5 {
            create(&mut db, member(&format!("M{}", i), "Dev", &[], "active")).await.unwrap();
        }
        let (page, total) = list(&mut db, &Filter::default(), Some(Pagination::page(2, 2))).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(), vec!["M2", "M1"]);
    }
}
