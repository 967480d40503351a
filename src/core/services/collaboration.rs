use crate::core::captcha::CaptchaVerifier;
use crate::core::filter::Filter;
use crate::core::models::{
    collaboration::{Collaboration, Create, Insert},
    common::Pagination,
};
use crate::core::ports::repository::{CollaborationCommon, Store};
use crate::core::validate::Validate;
use crate::error::Error;

pub async fn submit<S, V>(db: &mut S, verifier: &V, data: Create, remote_ip: Option<&str>) -> Result<String, Error>
where
    S: Store,
    V: CaptchaVerifier,
{
    data.validate()?;
    if !verifier.verify(data.token.trim(), remote_ip).await? {
        return Err(Error::CaptchaFailed);
    }
    let id = CollaborationCommon::insert(db, Insert::from(data)).await?;
    log::info!("collaboration request {} received", id);
    Ok(id)
}

pub async fn list<S>(db: &mut S, filter: &Filter, pagination: Option<Pagination>) -> Result<(Vec<Collaboration>, i64), Error>
where
    S: Store,
{
    let list = CollaborationCommon::query(db, filter, pagination).await?;
    let total = CollaborationCommon::count(db, filter).await?;
    Ok((list, total))
}
