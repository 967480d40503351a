use actix_web::web::{Data, Json, Query};
use actix_web::HttpResponse;

use crate::core::authorizer::{ensure, Action, Authorizer, Object};
use crate::core::models::{
    audit::{AuditEntry, Create},
    recruiter::RecruiterInfo,
};
use crate::core::ports::repository::Manager;
use crate::core::services::audit;
use crate::error::Error;
use crate::request::PageParams;
use crate::response::{Created, List};

pub async fn record<M, A>(Json(body): Json<Create>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<HttpResponse, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Log, Action::Write)?;
    let mut db = manager.db().await?;
    let id = audit::record(&mut db, &recruiter, body).await?;
    Ok(HttpResponse::Created().json(Created { id }))
}

pub async fn list<M, A>(Query(params): Query<PageParams>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<List<AuditEntry>>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Log, Action::Read)?;
    let mut db = manager.db().await?;
    Ok(Json(audit::list(&mut db, Some(params.pagination())).await?.into()))
}
