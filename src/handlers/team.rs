use actix_web::web::{Data, Json, Path, Query};
use actix_web::HttpResponse;

use crate::core::authorizer::{ensure, Action, Authorizer, Object};
use crate::core::models::{
    club_member::ClubMember,
    recruiter::RecruiterInfo,
    team::{Create, Team, TeamWithMembers, Update},
};
use crate::core::ports::repository::Manager;
use crate::core::services::team;
use crate::error::Error;
use crate::request::{ListParams, PageParams};
use crate::response::{Created, List, Success};

pub async fn list<M, A>(Query(params): Query<ListParams>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<List<TeamWithMembers>>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Team, Action::Read)?;
    let mut db = manager.db().await?;
    Ok(Json(team::list(&mut db, &params.filter(), Some(params.pagination())).await?.into()))
}

pub async fn detail<M, A>(id: Path<String>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Team>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Team, Action::Read)?;
    let mut db = manager.db().await?;
    Ok(Json(team::get(&mut db, &id).await?))
}

pub async fn create<M, A>(Json(body): Json<Create>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<HttpResponse, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Team, Action::Write)?;
    let mut db = manager.db().await?;
    let id = team::create(&mut db, body).await?;
    Ok(HttpResponse::Created().json(Created { id }))
}

pub async fn update<M, A>(id: Path<String>, Json(body): Json<Update>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Success>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Team, Action::Write)?;
    let mut db = manager.db().await?;
    team::update(&mut db, &id, body).await?;
    Ok(Json(Success::ok()))
}

pub async fn delete<M, A>(id: Path<String>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Success>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Team, Action::Delete)?;
    team::delete(manager.tx().await?, &id).await?;
    Ok(Json(Success::ok()))
}

pub async fn members<M, A>(id: Path<String>, Query(params): Query<PageParams>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<List<ClubMember>>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Team, Action::Read)?;
    let mut db = manager.db().await?;
    Ok(Json(team::members(&mut db, &id, Some(params.pagination())).await?.into()))
}
