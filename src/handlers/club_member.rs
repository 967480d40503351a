use actix_web::web::{Data, Json, Path, Query};
use actix_web::HttpResponse;

use crate::core::authorizer::{ensure, Action, Authorizer, Object};
use crate::core::models::{
    club_member::{ClubMember, Create, TeamsUpdate, Update},
    recruiter::RecruiterInfo,
};
use crate::core::ports::repository::Manager;
use crate::core::services::club_member;
use crate::error::Error;
use crate::request::ListParams;
use crate::response::{Created, List, Success};

pub async fn list<M, A>(Query(params): Query<ListParams>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<List<ClubMember>>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::ClubMember, Action::Read)?;
    let mut db = manager.db().await?;
    Ok(Json(club_member::list(&mut db, &params.filter(), Some(params.pagination())).await?.into()))
}

pub async fn detail<M, A>(id: Path<String>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<ClubMember>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::ClubMember, Action::Read)?;
    let mut db = manager.db().await?;
    Ok(Json(club_member::get(&mut db, &id).await?))
}

pub async fn create<M, A>(Json(body): Json<Create>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<HttpResponse, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::ClubMember, Action::Write)?;
    let mut db = manager.db().await?;
    let id = club_member::create(&mut db, body).await?;
    Ok(HttpResponse::Created().json(Created { id }))
}

pub async fn update<M, A>(id: Path<String>, Json(body): Json<Update>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Success>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::ClubMember, Action::Write)?;
    let mut db = manager.db().await?;
    club_member::update(&mut db, &id, body).await?;
    Ok(Json(Success::ok()))
}

pub async fn set_teams<M, A>(id: Path<String>, Json(body): Json<TeamsUpdate>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Success>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::ClubMember, Action::Write)?;
    let mut db = manager.db().await?;
    club_member::set_teams(&mut db, &id, body).await?;
    Ok(Json(Success::ok()))
}

pub async fn delete<M, A>(id: Path<String>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Success>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::ClubMember, Action::Delete)?;
    let mut db = manager.db().await?;
    club_member::delete(&mut db, &id).await?;
    Ok(Json(Success::ok()))
}
