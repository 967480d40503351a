use serde::{Deserialize, Serialize};

use crate::core::captcha::CaptchaVerifier;
use crate::error::Error;

pub const SITEVERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

#[derive(Serialize)]
struct VerifyForm<'a> {
    secret: &'a str,
    response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    remoteip: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Cloudflare Turnstile siteverify client.
#[derive(Clone)]
pub struct Turnstile {
    client: reqwest::Client,
    secret: String,
    verify_url: String,
}

impl Turnstile {
    pub fn new(secret: impl Into<String>, verify_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret: secret.into(),
            verify_url: verify_url.into(),
        }
    }
}

impl CaptchaVerifier for Turnstile {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<bool, Error> {
        let form = VerifyForm {
            secret: &self.secret,
            response: token,
            remoteip: remote_ip,
        };
        let resp = self
            .client
            .post(&self.verify_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        if !resp.status().is_success() {
            log::error!("turnstile siteverify answered {}", resp.status());
            return Err(Error::Remote {
                status: 502,
                message: "Captcha verification is unavailable".into(),
            });
        }
        let body: VerifyResponse = resp.json().await.map_err(|e| Error::Network(e.to_string()))?;
        if !body.success {
            log::info!("turnstile rejected token: {:?}", body.error_codes);
        }
        Ok(body.success)
    }
}
