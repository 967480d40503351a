use crate::core::filter::Filter;
use crate::core::models::{
    common::Pagination,
    event::{Create, Event, Insert, Update},
};
use crate::core::ports::repository::{EventCommon, Store};
use crate::core::validate::Validate;
use crate::error::Error;

pub async fn list<S>(db: &mut S, filter: &Filter, pagination: Option<Pagination>) -> Result<(Vec<Event>, i64), Error>
where
    S: Store,
{
    let list = EventCommon::query(db, filter, pagination).await?;
    let total = EventCommon::count(db, filter).await?;
    Ok((list, total))
}

/// Upcoming events, soonest first.
pub async fn upcoming<S>(db: &mut S, limit: usize) -> Result<Vec<Event>, Error>
where
    S: Store,
{
    let filter = Filter {
        status: Some("upcoming".into()),
        ..default::default()
    };
    let mut events = EventCommon::query(db, &filter, None).await?;
    events.sort_by_key(|e| e.starts_at);
    events.truncate(limit);
    Ok(events)
}

pub async fn get<S>(db: &mut S, id: &str) -> Result<Event, Error>
where
    S: Store,
{
    EventCommon::get(db, id).await
}

pub async fn create<S>(db: &mut S, data: Create) -> Result<String, Error>
where
    S: Store,
{
    data.validate()?;
    EventCommon::insert(db, Insert::from(data)).await
}

pub async fn update<S>(db: &mut S, id: &str, data: Update) -> Result<(), Error>
where
    S: Store,
{
    data.validate()?;
    EventCommon::update(db, id, Insert::from(data)).await
}

pub async fn delete<S>(db: &mut S, id: &str) -> Result<(), Error>
where
    S: Store,
{
    EventCommon::delete(db, id).await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::event::test::event;
    use crate::core::ports::repository::Manager;
    use crate::database::memory::MemoryManager;

    #[tokio::test]
    async fn test_type_and_status_filters() {
        let m = MemoryManager::new();
        let mut db = m.db().await.unwrap();
        create(&mut db, event("Rust 101", "workshop", "upcoming", 10)).await.unwrap();
        create(&mut db, event("Hack Night", "hackathon", "upcoming", 3)).await.unwrap();
        create(&mut db, event("Old Talk", "talk", "completed", -30)).await.unwrap();

        let filter = Filter {
            kind: Some("hackathon".into()),
            status: Some("upcoming".into()),
            ..Default::default()
        };
        let (found, total) = list(&mut db, &filter, None).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(found[0].title, "Hack Night");

        let soon = upcoming(&mut db, 5).await.unwrap();
        assert_eq!(soon.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(), vec!["Hack Night", "Rust 101"]);
    }

    #[tokio::test]
    async fn test_invalid_kind_is_not_stored() {
        let m = MemoryManager::new();
        let mut db = m.db().await.unwrap();
        assert!(matches!(create(&mut db, event("X", "party", "upcoming", 1)).await, Err(Error::Validation(_))));
        assert_eq!(list(&mut db, &Filter::default(), None).await.unwrap().1, 0);
    }
}
