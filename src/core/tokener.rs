use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;

/// Claims carried inside a session token.
pub trait Payload: Serialize + DeserializeOwned {
    /// Id of the recruiter the token was issued to.
    fn subject(&self) -> &str;
}

/// Issues and checks signed session tokens.
pub trait Tokener<P: Payload> {
    fn gen_token(&self, payload: &P) -> Result<String, Error>;
    fn verify_token(&self, token: &str) -> Result<P, Error>;
}
