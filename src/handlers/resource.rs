use actix_web::web::{Data, Json, Path, Query};
use actix_web::HttpResponse;

use crate::core::authorizer::{ensure, Action, Authorizer, Object};
use crate::core::models::{
    resource::{Create, Resource, Update},
    recruiter::RecruiterInfo,
};
use crate::core::ports::repository::Manager;
use crate::core::services::resource;
use crate::error::Error;
use crate::request::ListParams;
use crate::response::{Created, List, Success};

pub async fn list<M, A>(Query(params): Query<ListParams>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<List<Resource>>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Resource, Action::Read)?;
    let mut db = manager.db().await?;
    Ok(Json(resource::list(&mut db, &params.filter(), Some(params.pagination())).await?.into()))
}

pub async fn detail<M, A>(id: Path<String>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Resource>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Resource, Action::Read)?;
    let mut db = manager.db().await?;
    Ok(Json(resource::get(&mut db, &id).await?))
}

pub async fn create<M, A>(Json(body): Json<Create>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<HttpResponse, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Resource, Action::Write)?;
    let mut db = manager.db().await?;
    let id = resource::create(&mut db, body).await?;
    Ok(HttpResponse::Created().json(Created { id }))
}

pub async fn update<M, A>(id: Path<String>, Json(body): Json<Update>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Success>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Resource, Action::Write)?;
    let mut db = manager.db().await?;
    resource::update(&mut db, &id, body).await?;
    Ok(Json(Success::ok()))
}

pub async fn delete<M, A>(id: Path<String>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Success>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Resource, Action::Delete)?;
    let mut db = manager.db().await?;
    resource::delete(&mut db, &id).await?;
    Ok(Json(Success::ok()))
}
