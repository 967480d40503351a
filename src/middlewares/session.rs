use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpMessage, HttpRequest, ResponseError};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::models::recruiter::RecruiterInfo;
use crate::core::tokener::{Payload, Tokener};
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;

pub const AUTH_COOKIE: &str = "auth-key";
pub const SESSION_DAYS: i64 = 30;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Claim {
    pub sub: String,
    pub assignee: String,
    #[serde(default)]
    pub exec: bool,
    #[serde(default)]
    pub team_mgmt: bool,
    pub exp: i64,
}

impl Claim {
    pub fn new(r: &RecruiterInfo) -> Self {
        Claim {
            sub: r.id.clone(),
            assignee: r.assignee.clone(),
            exec: r.exec,
            team_mgmt: r.team_mgmt,
            exp: (Utc::now() + Duration::days(SESSION_DAYS)).timestamp(),
        }
    }
}

impl Payload for Claim {
    fn subject(&self) -> &str {
        &self.sub
    }
}

impl From<Claim> for RecruiterInfo {
    fn from(c: Claim) -> Self {
        RecruiterInfo {
            id: c.sub,
            assignee: c.assignee,
            exec: c.exec,
            team_mgmt: c.team_mgmt,
        }
    }
}

/// Session token from the `auth-key` cookie, or a bearer token.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(c) = req.cookie(AUTH_COOKIE) {
        return Some(c.value().to_owned());
    }
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned)
}

pub fn verify_session(tokener: &JWT, req: &HttpRequest) -> Result<RecruiterInfo, Error> {
    let token = session_token(req).ok_or(Error::Unauthorized)?;
    let claim = <JWT as Tokener<Claim>>::verify_token(tokener, &token)?;
    Ok(claim.into())
}

/// Rejects requests without a valid session and hands the recruiter to
/// handlers through request extensions.
pub struct SessionMiddleware {
    secret: Vec<u8>,
}

impl SessionMiddleware {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = actix_web::Error;
    type Response = ServiceResponse<EitherBody<B>>;
    type Transform = SessionService<S>;
    type InitError = ();
    type Future = Pin<Box<dyn Future<Output = Result<Self::Transform, Self::InitError>>>>;
    fn new_transform(&self, service: S) -> Self::Future {
        let secret = self.secret.clone();
        Box::pin(async move {
            Ok(SessionService {
                tokener: Rc::new(JWT::new(secret)),
                next_service: service,
            })
        })
    }
}

pub struct SessionService<S> {
    tokener: Rc<JWT>,
    next_service: S,
}

impl<S, B> Service<ServiceRequest> for SessionService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    actix_web::dev::forward_ready!(next_service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match verify_session(&self.tokener, req.request()) {
            Err(e) => {
                log::debug!("rejected {} {}: {}", req.method(), req.path(), e);
                let res = req.into_response(Error::Unauthorized.error_response()).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
            Ok(recruiter) => {
                req.extensions_mut().insert(recruiter);
                let res_fut = self.next_service.call(req);
                Box::pin(async move { res_fut.await.map(ServiceResponse::map_into_left_body) })
            }
        }
    }
}
