use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};

use crate::core::models::recruiter::RecruiterInfo;
use crate::error::Error;

/// Available on routes behind the session middleware.
impl FromRequest for RecruiterInfo {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(req.extensions().get::<Self>().cloned().ok_or(Error::Unauthorized))
    }
}
