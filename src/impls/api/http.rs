use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::board::ReviewApi;
use crate::core::models::application::{Application, Decision, Status};
use crate::core::models::audit;
use crate::error::Error;
use crate::middlewares::session::AUTH_COOKIE;

const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Deserialize)]
struct Applications {
    applications: Vec<Application>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RolledBack {
    #[serde(default)]
    mod_remarks: String,
}

/// Review endpoints over HTTP, authenticated with the session cookie.
pub struct HttpReviewApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReviewApi {
    pub fn new(base_url: &str, auth_key: &str) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let cookie = HeaderValue::from_str(&format!("{}={}", AUTH_COOKIE, auth_key)).map_err(|_| Error::BusinessError("invalid auth key".into()))?;
        headers.insert(COOKIE, cookie);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::ServerError(format!("failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, Error> {
        let resp = req.send().await.map_err(|e| {
            log::warn!("review request failed: {}", e);
            Error::Network(e.to_string())
        })?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body: Option<Value> = resp.json().await.ok();
        Err(Error::Remote {
            status,
            message: server_message(body.as_ref()),
        })
    }

    async fn json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, Error> {
        self.send(req).await?.json().await.map_err(|e| Error::Network(e.to_string()))
    }
}

/// The server's `message` or `error` field, verbatim.
fn server_message(body: Option<&Value>) -> String {
    body.and_then(|b| b.get("message").or_else(|| b.get("error")))
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(GENERIC_FAILURE)
        .to_owned()
}

impl ReviewApi for HttpReviewApi {
    async fn list(&self, status: Status) -> Result<Vec<Application>, Error> {
        let req = self.client.get(self.url("/api/applications")).query(&[("type", status.as_str())]);
        let body: Applications = self.json(req).await?;
        Ok(body.applications)
    }

    async fn mark(&self, id: &str, decision: Decision, remarks: &str) -> Result<(), Error> {
        let req = self.client.post(self.url("/api/mark-application")).json(&json!({
            "applicationId": id,
            "status": decision,
            "remarks": remarks,
        }));
        let body: Value = self.json(req).await?;
        if body.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(Error::Remote {
                status: 200,
                message: server_message(Some(&body)),
            });
        }
        Ok(())
    }

    async fn rollback(&self, id: &str, reason: &str) -> Result<String, Error> {
        let req = self.client.post(self.url("/api/rollback-application")).json(&json!({
            "applicationId": id,
            "reason": reason,
        }));
        let body: RolledBack = self.json(req).await?;
        Ok(body.mod_remarks)
    }

    async fn record(&self, entry: audit::Create) -> Result<(), Error> {
        self.send(self.client.post(self.url("/api/logs")).json(&entry)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::board::ReviewBoard;
    use crate::core::models::application::test::application;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn list_mock(server: &MockServer, status: &str, apps: Vec<Application>) {
        Mock::given(method("GET"))
            .and(path("/api/applications"))
            .and(query_param("type", status))
            .and(header("cookie", "auth-key=tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "applications": apps })))
            .mount(server)
            .await;
    }

    async fn loaded(server: &MockServer) -> ReviewBoard<HttpReviewApi> {
        list_mock(server, "pending", vec![application("a1")]).await;
        list_mock(server, "approved", vec![]).await;
        list_mock(server, "rejected", vec![]).await;
        let mut board = ReviewBoard::new(HttpReviewApi::new(&server.uri(), "tok").unwrap());
        board.load().await.unwrap();
        board
    }

    #[tokio::test]
    async fn test_mark_through_board() {
        let server = MockServer::start().await;
        let mut board = loaded(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/mark-application"))
            .and(body_json(json!({"applicationId": "a1", "status": "approved", "remarks": "ok"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/logs"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        board.decide("a1", Decision::Approved, "ok").await.unwrap();
        assert_eq!(board.list(Status::Approved)[0].id, "a1");
    }

    #[tokio::test]
    async fn test_server_message_is_verbatim() {
        let server = MockServer::start().await;
        let mut board = loaded(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/mark-application"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "cannot decide an application that is approved"})))
            .mount(&server)
            .await;
        let err = board.decide("a1", Decision::Rejected, "late").await.unwrap_err();
        assert_eq!(err.to_string(), "cannot decide an application that is approved");
        assert_eq!(board.list(Status::Pending).len(), 1);
    }

    #[test]
    fn test_error_field_and_generic_fallback() {
        assert_eq!(server_message(Some(&json!({"error": "Forbidden"}))), "Forbidden");
        assert_eq!(server_message(Some(&json!({"detail": "x"}))), GENERIC_FAILURE);
        assert_eq!(server_message(None), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn test_network_failure() {
        let api = HttpReviewApi::new("http://127.0.0.1:1", "tok").unwrap();
        let err = api.list(Status::Pending).await.unwrap_err();
        assert_eq!(err.to_string(), "Network error, please check your connection");
    }
}
