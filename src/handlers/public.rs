//! Read-only endpoints behind the public pages.

use actix_web::web::{Data, Json, Query};

use crate::core::models::{bos::BosMember, club_member::ClubMember, event::Event, resource::Resource, team::TeamWithMembers};
use crate::core::ports::repository::Manager;
use crate::core::services::{bos, club_member, event, metadata, resource, team};
use crate::error::Error;
use crate::request::ListParams;
use crate::response::List;

pub async fn teams<M: Manager>(Query(params): Query<ListParams>, manager: Data<M>) -> Result<Json<List<TeamWithMembers>>, Error> {
    let mut db = manager.db().await?;
    Ok(Json(team::list(&mut db, &params.filter(), Some(params.pagination())).await?.into()))
}

pub async fn members<M: Manager>(Query(params): Query<ListParams>, manager: Data<M>) -> Result<Json<List<ClubMember>>, Error> {
    let mut db = manager.db().await?;
    Ok(Json(club_member::list(&mut db, &params.filter(), Some(params.pagination())).await?.into()))
}

pub async fn events<M: Manager>(Query(params): Query<ListParams>, manager: Data<M>) -> Result<Json<List<Event>>, Error> {
    let mut db = manager.db().await?;
    Ok(Json(event::list(&mut db, &params.filter(), Some(params.pagination())).await?.into()))
}

pub async fn resources<M: Manager>(Query(params): Query<ListParams>, manager: Data<M>) -> Result<Json<List<Resource>>, Error> {
    let mut db = manager.db().await?;
    Ok(Json(resource::list(&mut db, &params.filter(), Some(params.pagination())).await?.into()))
}

pub async fn bos<M: Manager>(Query(params): Query<ListParams>, manager: Data<M>) -> Result<Json<List<BosMember>>, Error> {
    let mut db = manager.db().await?;
    Ok(Json(bos::list(&mut db, &params.filter(), Some(params.pagination())).await?.into()))
}

pub async fn web_metadata<M: Manager>(manager: Data<M>) -> Result<Json<metadata::WebMetadata>, Error> {
    let mut db = manager.db().await?;
    Ok(Json(metadata::web_metadata(&mut db).await?))
}
