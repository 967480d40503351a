use actix_web::web::{Data, Json, Path, Query};
use actix_web::HttpResponse;

use crate::core::authorizer::{ensure, Action, Authorizer, Object};
use crate::core::models::{
    event::{Create, Event, Update},
    recruiter::RecruiterInfo,
};
use crate::core::ports::repository::Manager;
use crate::core::services::event;
use crate::error::Error;
use crate::request::ListParams;
use crate::response::{Created, List, Success};

pub async fn list<M, A>(Query(params): Query<ListParams>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<List<Event>>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Event, Action::Read)?;
    let mut db = manager.db().await?;
    Ok(Json(event::list(&mut db, &params.filter(), Some(params.pagination())).await?.into()))
}

pub async fn detail<M, A>(id: Path<String>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Event>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Event, Action::Read)?;
    let mut db = manager.db().await?;
    Ok(Json(event::get(&mut db, &id).await?))
}

pub async fn create<M, A>(Json(body): Json<Create>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<HttpResponse, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Event, Action::Write)?;
    let mut db = manager.db().await?;
    let id = event::create(&mut db, body).await?;
    Ok(HttpResponse::Created().json(Created { id }))
}

pub async fn update<M, A>(id: Path<String>, Json(body): Json<Update>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Success>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Event, Action::Write)?;
    let mut db = manager.db().await?;
    event::update(&mut db, &id, body).await?;
    Ok(Json(Success::ok()))
}

pub async fn delete<M, A>(id: Path<String>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Success>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Event, Action::Delete)?;
    let mut db = manager.db().await?;
    event::delete(&mut db, &id).await?;
    Ok(Json(Success::ok()))
}
