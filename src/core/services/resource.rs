use crate::core::filter::Filter;
use crate::core::models::{
    common::Pagination,
    resource::{Create, Insert, Resource, Update},
};
use crate::core::ports::repository::{ResourceCommon, Store};
use crate::core::validate::Validate;
use crate::error::Error;

pub async fn list<S>(db: &mut S, filter: &Filter, pagination: Option<Pagination>) -> Result<(Vec<Resource>, i64), Error>
where
    S: Store,
{
    let list = ResourceCommon::query(db, filter, pagination).await?;
    let total = ResourceCommon::count(db, filter).await?;
    Ok((list, total))
}

pub async fn get<S>(db: &mut S, id: &str) -> Result<Resource, Error>
where
    S: Store,
{
    ResourceCommon::get(db, id).await
}

pub async fn create<S>(db: &mut S, data: Create) -> Result<String, Error>
where
    S: Store,
{
    data.validate()?;
    ResourceCommon::insert(db, Insert::from(data)).await
}

pub async fn update<S>(db: &mut S, id: &str, data: Update) -> Result<(), Error>
where
    S: Store,
{
    data.validate()?;
    ResourceCommon::update(db, id, Insert::from(data)).await
}

pub async fn delete<S>(db: &mut S, id: &str) -> Result<(), Error>
where
    S: Store,
{
    ResourceCommon::delete(db, id).await
}
