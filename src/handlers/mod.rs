pub mod application;
pub mod audit;
pub mod bos;
pub mod club_member;
pub mod event;
pub mod join;
pub mod public;
pub mod resource;
pub mod team;

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::web::{Data, Json};
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;

use crate::core::models::recruiter::{Login, RecruiterInfo};
use crate::core::ports::repository::Manager;
use crate::core::services::recruiter;
use crate::core::tokener::Tokener;
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;
use crate::middlewares::session::{verify_session, Claim, AUTH_COOKIE, SESSION_DAYS};

fn session_cookie(value: String, max_age: CookieDuration) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .finish()
}

#[derive(Serialize)]
struct LoggedIn {
    success: bool,
    recruiter: RecruiterInfo,
}

pub async fn login<M>(Json(body): Json<Login>, manager: Data<M>, tokener: Data<JWT>) -> Result<HttpResponse, Error>
where
    M: Manager,
{
    let mut db = manager.db().await?;
    let info = recruiter::login(&mut db, body).await?;
    let token = tokener.gen_token(&Claim::new(&info))?;
    log::info!("recruiter {} logged in", info.id);
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, CookieDuration::days(SESSION_DAYS)))
        .json(LoggedIn {
            success: true,
            recruiter: info,
        }))
}

pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(session_cookie(String::new(), CookieDuration::ZERO))
        .json(crate::response::Success::ok())
}

#[derive(Serialize)]
pub struct AuthCheck {
    authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    recruiter: Option<RecruiterInfo>,
}

/// Never fails: a missing or invalid session is reported, not rejected.
pub async fn auth_check(req: HttpRequest, tokener: Data<JWT>) -> Json<AuthCheck> {
    let recruiter = verify_session(&tokener, &req).ok();
    Json(AuthCheck {
        authenticated: recruiter.is_some(),
        recruiter,
    })
}
