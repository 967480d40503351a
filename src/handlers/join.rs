use std::net::SocketAddr;

use actix_web::web::{Data, Json, Query};
use actix_web::HttpRequest;

use crate::core::authorizer::{ensure, Action, Authorizer, Object};
use crate::core::captcha::CaptchaVerifier;
use crate::core::models::{
    application::JoinRequest,
    collaboration::{Collaboration, Create as CollaborationCreate},
    recruiter::RecruiterInfo,
};
use crate::core::ports::repository::Manager;
use crate::core::services::{application, collaboration};
use crate::error::Error;
use crate::request::ListParams;
use crate::response::{List, Success};

fn remote_ip(req: &HttpRequest) -> Option<String> {
    let info = req.connection_info();
    let addr = info.realip_remote_addr()?;
    Some(addr.parse::<SocketAddr>().map(|s| s.ip().to_string()).unwrap_or_else(|_| addr.to_owned()))
}

pub async fn join<M, V>(req: HttpRequest, Json(body): Json<JoinRequest>, manager: Data<M>, verifier: Data<V>) -> Result<Json<Success>, Error>
where
    M: Manager,
    V: CaptchaVerifier,
{
    let ip = remote_ip(&req);
    let mut db = manager.db().await?;
    application::join(&mut db, verifier.get_ref(), body, ip.as_deref()).await?;
    Ok(Json(Success::ok()))
}

pub async fn collaborate<M, V>(req: HttpRequest, Json(body): Json<CollaborationCreate>, manager: Data<M>, verifier: Data<V>) -> Result<Json<Success>, Error>
where
    M: Manager,
    V: CaptchaVerifier,
{
    let ip = remote_ip(&req);
    let mut db = manager.db().await?;
    collaboration::submit(&mut db, verifier.get_ref(), body, ip.as_deref()).await?;
    Ok(Json(Success::ok()))
}

pub async fn collaborations<M, A>(
    Query(params): Query<ListParams>,
    recruiter: RecruiterInfo,
    manager: Data<M>,
    authorizer: Data<A>,
) -> Result<Json<List<Collaboration>>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Collaboration, Action::Read)?;
    let mut db = manager.db().await?;
    Ok(Json(collaboration::list(&mut db, &params.filter(), Some(params.pagination())).await?.into()))
}
