use serde::Serialize;

use crate::core::filter::Filter;
use crate::core::models::event::Event;
use crate::core::ports::repository::{BosCommon, ClubMemberCommon, EventCommon, ResourceCommon, Store, TeamCommon};
use crate::core::services::event;
use crate::error::Error;

pub const UPCOMING_LIMIT: usize = 6;

/// Counters and teasers for the public home page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebMetadata {
    pub members: i64,
    pub teams: i64,
    pub events: i64,
    pub resources: i64,
    pub bos: i64,
    pub upcoming_events: Vec<Event>,
}

pub async fn web_metadata<S>(db: &mut S) -> Result<WebMetadata, Error>
where
    S: Store,
{
    let all = Filter::default();
    let active = Filter {
        status: Some("active".into()),
        ..default::default()
    };
    Ok(WebMetadata {
        members: ClubMemberCommon::count(db, &active).await?,
        teams: TeamCommon::count(db, &all).await?,
        events: EventCommon::count(db, &all).await?,
        resources: ResourceCommon::count(db, &all).await?,
        bos: BosCommon::count(db, &all).await?,
        upcoming_events: event::upcoming(db, UPCOMING_LIMIT).await?,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::club_member::test::member;
    use crate::core::models::event::test::event as new_event;
    use crate::core::ports::repository::Manager;
    use crate::core::services::club_member;
    use crate::database::memory::MemoryManager;

    #[tokio::test]
    async fn test_counts_active_members_only() {
        let m = MemoryManager::new();
        let mut db = m.db().await.unwrap();
        club_member::create(&mut db, member("Ada", "Lead", &[], "active")).await.unwrap();
        club_member::create(&mut db, member("Old", "Lead", &[], "alumni")).await.unwrap();
        for d in 1..=8 {
            event::create(&mut db, new_event(&format!("E{}", d), "talk", "upcoming", d)).await.unwrap();
        }
        let meta = web_metadata(&mut db).await.unwrap();
        assert_eq!(meta.members, 1);
        assert_eq!(meta.events, 8);
        assert_eq!(meta.upcoming_events.len(), UPCOMING_LIMIT);
        assert_eq!(meta.upcoming_events[0].title, "E1");
    }
}
