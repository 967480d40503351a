use actix_web::web::{Data, Json, Query};
use serde::Serialize;
use serde_json::json;

use crate::core::authorizer::{ensure, Action, Authorizer, Object};
use crate::core::filter::Filter;
use crate::core::models::application::{Application, MarkRequest, RollbackRequest, Status};
use crate::core::models::recruiter::RecruiterInfo;
use crate::core::ports::repository::Manager;
use crate::core::services::application;
use crate::error::Error;
use crate::request::ApplicationParams;
use crate::response::Success;

#[derive(Serialize)]
pub struct Applications {
    applications: Vec<Application>,
}

pub async fn list<M, A>(Query(params): Query<ApplicationParams>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Applications>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Application, Action::Read)?;
    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => Status::Pending,
        Some(s) => s.parse()?,
    };
    let filter = Filter {
        search: params.search,
        ..default::default()
    }
    .normalized();
    let mut db = manager.db().await?;
    let applications = application::list(&mut db, status, &filter).await?;
    Ok(Json(Applications { applications }))
}

pub async fn mark<M, A>(Json(body): Json<MarkRequest>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Success>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Application, Action::Write)?;
    application::mark(manager.tx().await?, &recruiter, body).await?;
    Ok(Json(Success::ok()))
}

pub async fn rollback<M, A>(Json(body): Json<RollbackRequest>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<serde_json::Value>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Application, Action::Write)?;
    let history = application::rollback(manager.tx().await?, &recruiter, body).await?;
    Ok(Json(json!({ "modRemarks": history })))
}
