use crate::core::models::{
    audit::{AuditEntry, Create, Insert},
    common::Pagination,
};
use crate::core::models::recruiter::RecruiterInfo;
use crate::core::ports::repository::{AuditCommon, Store};
use crate::core::validate::Validate;
use crate::error::Error;

pub async fn record<S>(db: &mut S, recruiter: &RecruiterInfo, data: Create) -> Result<String, Error>
where
    S: Store,
{
    data.validate()?;
    AuditCommon::insert(db, Insert::new(&recruiter.id, data)).await
}

pub async fn list<S>(db: &mut S, pagination: Option<Pagination>) -> Result<(Vec<AuditEntry>, i64), Error>
where
    S: Store,
{
    let list = AuditCommon::query(db, pagination).await?;
    let total = AuditCommon::count(db).await?;
    Ok((list, total))
}
