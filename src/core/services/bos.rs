use crate::core::filter::Filter;
use crate::core::models::{
    bos::{BosMember, Create, Insert, Update},
    common::Pagination,
};
use crate::core::ports::repository::{BosCommon, Store};
use crate::core::validate::Validate;
use crate::error::Error;

pub async fn list<S>(db: &mut S, filter: &Filter, pagination: Option<Pagination>) -> Result<(Vec<BosMember>, i64), Error>
where
    S: Store,
{
    let list = BosCommon::query(db, filter, pagination).await?;
    let total = BosCommon::count(db, filter).await?;
    Ok((list, total))
}

pub async fn get<S>(db: &mut S, id: &str) -> Result<BosMember, Error>
where
    S: Store,
{
    BosCommon::get(db, id).await
}

pub async fn create<S>(db: &mut S, data: Create) -> Result<String, Error>
where
    S: Store,
{
    data.validate()?;
    BosCommon::insert(db, Insert::from(data)).await
}

/// Keeps the stored photo when the update carries none.
pub async fn update<S>(db: &mut S, id: &str, mut data: Update) -> Result<(), Error>
where
    S: Store,
{
    data.validate()?;
    if data.photo.is_none() {
        data.photo = BosCommon::get(db, id).await?.photo;
    }
    BosCommon::update(db, id, Insert::from(data)).await
}

pub async fn delete<S>(db: &mut S, id: &str) -> Result<(), Error>
where
    S: Store,
{
    BosCommon::delete(db, id).await
}
