#![allow(async_fn_in_trait)]

pub mod config;
mod context;
pub mod core;
pub mod database;
pub mod error;
pub mod handlers;
pub mod impls;
pub mod middlewares;
pub mod privilege;
pub mod request;
pub mod response;
pub mod storer;

use actix_web::web::{delete, get, post, put, resource, scope, ServiceConfig};

use crate::core::authorizer::Authorizer;
use crate::core::captcha::CaptchaVerifier;
use crate::core::ports::repository::Manager;
use crate::middlewares::session::SessionMiddleware;
use crate::storer::FileStorer;

/// Registers every `/api` route. App data must carry `Data<M>`, `Data<A>`,
/// `Data<V>`, `Data<F>` and `Data<JWT>`.
pub fn configure<M, A, V, F>(cfg: &mut ServiceConfig, secret: Vec<u8>)
where
    M: Manager,
    A: Authorizer,
    V: CaptchaVerifier,
    F: FileStorer,
{
    cfg.service(
        scope("/api")
            .route("/login", post().to(handlers::login::<M>))
            .route("/logout", post().to(handlers::logout))
            .route("/auth-check", get().to(handlers::auth_check))
            .route("/join", post().to(handlers::join::join::<M, V>))
            .route("/collaborate", post().to(handlers::join::collaborate::<M, V>))
            .route("/web-metadata", get().to(handlers::public::web_metadata::<M>))
            .route("/teams", get().to(handlers::public::teams::<M>))
            .route("/members", get().to(handlers::public::members::<M>))
            .route("/events", get().to(handlers::public::events::<M>))
            .route("/resources", get().to(handlers::public::resources::<M>))
            .route("/bos", get().to(handlers::public::bos::<M>))
            .service(
                scope("")
                    .wrap(SessionMiddleware::new(secret))
                    .route("/applications", get().to(handlers::application::list::<M, A>))
                    .route("/mark-application", post().to(handlers::application::mark::<M, A>))
                    .route("/rollback-application", post().to(handlers::application::rollback::<M, A>))
                    .service(
                        resource("/logs")
                            .route(get().to(handlers::audit::list::<M, A>))
                            .route(post().to(handlers::audit::record::<M, A>)),
                    )
                    .service(
                        scope("/dashboard")
                            .route("/collaborations", get().to(handlers::join::collaborations::<M, A>))
                            .service(
                                scope("/teams")
                                    .route("", get().to(handlers::team::list::<M, A>))
                                    .route("", post().to(handlers::team::create::<M, A>))
                                    .route("/{id}", get().to(handlers::team::detail::<M, A>))
                                    .route("/{id}", put().to(handlers::team::update::<M, A>))
                                    .route("/{id}", delete().to(handlers::team::delete::<M, A>))
                                    .route("/{id}/members", get().to(handlers::team::members::<M, A>)),
                            )
                            .service(
                                scope("/club-members")
                                    .route("", get().to(handlers::club_member::list::<M, A>))
                                    .route("", post().to(handlers::club_member::create::<M, A>))
                                    .route("/{id}", get().to(handlers::club_member::detail::<M, A>))
                                    .route("/{id}", put().to(handlers::club_member::update::<M, A>))
                                    .route("/{id}", delete().to(handlers::club_member::delete::<M, A>))
                                    .route("/{id}/teams", put().to(handlers::club_member::set_teams::<M, A>)),
                            )
                            .service(
                                scope("/events")
                                    .route("", get().to(handlers::event::list::<M, A>))
                                    .route("", post().to(handlers::event::create::<M, A>))
                                    .route("/{id}", get().to(handlers::event::detail::<M, A>))
                                    .route("/{id}", put().to(handlers::event::update::<M, A>))
                                    .route("/{id}", delete().to(handlers::event::delete::<M, A>)),
                            )
                            .service(
                                scope("/resources")
                                    .route("", get().to(handlers::resource::list::<M, A>))
                                    .route("", post().to(handlers::resource::create::<M, A>))
                                    .route("/{id}", get().to(handlers::resource::detail::<M, A>))
                                    .route("/{id}", put().to(handlers::resource::update::<M, A>))
                                    .route("/{id}", delete().to(handlers::resource::delete::<M, A>)),
                            )
                            .service(
                                scope("/bos")
                                    .route("", get().to(handlers::bos::list::<M, A>))
                                    .route("", post().to(handlers::bos::create::<M, A, F>))
                                    .route("/{id}", get().to(handlers::bos::detail::<M, A>))
                                    .route("/{id}", put().to(handlers::bos::update::<M, A, F>))
                                    .route("/{id}", delete().to(handlers::bos::delete::<M, A>)),
                            ),
                    ),
            ),
    );
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::captcha::test::FixedVerifier;
    use crate::core::models::bos::test::bos;
    use crate::core::models::recruiter::RecruiterInfo;
    use crate::core::services::{self, recruiter::NewRecruiter};
    use crate::core::tokener::Tokener;
    use crate::database::memory::MemoryManager;
    use crate::impls::tokener::jwt::JWT;
    use crate::middlewares::session::{Claim, AUTH_COOKIE};
    use crate::privilege::casbin::CasbinAuthorizer;
    use crate::storer::LocalStorer;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
    use actix_web::web::Data;
    use actix_web::App;
    use serde_json::{json, Value};

    const SECRET: &[u8] = b"test-secret";

    struct Harness {
        manager: MemoryManager,
        _uploads: tempfile::TempDir,
        storer: LocalStorer,
    }

    impl Harness {
        fn new() -> Self {
            let uploads = tempfile::tempdir().unwrap();
            let storer = LocalStorer::new(uploads.path().to_str().unwrap()).unwrap();
            Harness {
                manager: MemoryManager::new(),
                _uploads: uploads,
                storer,
            }
        }
    }

    /// Builds the app over the harness' store and upload directory.
    macro_rules! app {
        ($h:expr) => {
            init_service(
                App::new()
                    .app_data(Data::new($h.manager.clone()))
                    .app_data(Data::new(CasbinAuthorizer::new().await.unwrap()))
                    .app_data(Data::new(FixedVerifier(true)))
                    .app_data(Data::new(LocalStorer::new($h.storer.path().to_str().unwrap()).unwrap()))
                    .app_data(Data::new(JWT::new(SECRET.to_vec())))
                    .configure(|cfg| configure::<MemoryManager, CasbinAuthorizer, FixedVerifier, LocalStorer>(cfg, SECRET.to_vec())),
            )
            .await
        };
    }

    fn session(exec: bool) -> Cookie<'static> {
        let info = RecruiterInfo {
            id: "r1".into(),
            assignee: "Grace".into(),
            exec,
            team_mgmt: false,
        };
        let token = JWT::new(SECRET.to_vec()).gen_token(&Claim::new(&info)).unwrap();
        Cookie::new(AUTH_COOKIE, token)
    }

    fn join_body(why_join_len: usize) -> Value {
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "+919876543210",
            "batch": "2027",
            "rollNumber": "21CS042",
            "registrationNumber": "RA2111003010042",
            "department": "CSE",
            "interestedTracks": ["web"],
            "whyJoin": "x".repeat(why_join_len),
            "token": "token",
        })
    }

    #[actix_web::test]
    async fn test_login_auth_check_logout() {
        let h = Harness::new();
        let mut db = h.manager.db().await.unwrap();
        services::recruiter::ensure_recruiter(
            &mut db,
            NewRecruiter {
                username: "grace",
                password: "hunter22",
                assignee: "Grace",
                exec: true,
                team_mgmt: false,
            },
        )
        .await
        .unwrap();
        let app = app!(h);

        let req = TestRequest::post().uri("/api/login").set_json(json!({"username": "grace", "password": "nope"})).to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = TestRequest::post().uri("/api/login").set_json(json!({"username": "grace", "password": "hunter22"})).to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp.response().cookies().find(|c| c.name() == AUTH_COOKIE).unwrap().into_owned();
        assert!(cookie.http_only().unwrap_or(false));

        let req = TestRequest::get().uri("/api/auth-check").cookie(cookie.clone()).to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["recruiter"]["assignee"], "Grace");
        assert_eq!(body["recruiter"]["exec"], true);

        let req = TestRequest::get().uri("/api/auth-check").to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        assert_eq!(body, json!({"authenticated": false}));

        let req = TestRequest::post().uri("/api/logout").to_request();
        let resp = call_service(&app, req).await;
        let expired = resp.response().cookies().find(|c| c.name() == AUTH_COOKIE).unwrap();
        assert_eq!(expired.value(), "");
    }

    #[actix_web::test]
    async fn test_dashboard_requires_session() {
        let h = Harness::new();
        let app = app!(h);
        let req = TestRequest::get().uri("/api/applications").to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
        let req = TestRequest::get().uri("/api/dashboard/teams").cookie(Cookie::new(AUTH_COOKIE, "garbage")).to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
        let req = TestRequest::get().uri("/api/dashboard/teams").cookie(session(false)).to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_bos_delete_needs_exec() {
        let h = Harness::new();
        let mut db = h.manager.db().await.unwrap();
        let id = services::bos::create(&mut db, bos("Linus")).await.unwrap();
        let app = app!(h);
        let uri = format!("/api/dashboard/bos/{}", id);

        let calls = h.manager.calls().await;
        let req = TestRequest::delete().uri(&uri).cookie(session(false)).to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["message"], "Permission Denied");
        assert_eq!(h.manager.calls().await, calls);

        let req = TestRequest::delete().uri(&uri).cookie(session(true)).to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::OK);
        let req = TestRequest::get().uri(&uri).cookie(session(true)).to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_join_why_join_boundary() {
        let h = Harness::new();
        let app = app!(h);

        let req = TestRequest::post().uri("/api/join").set_json(join_body(49)).to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["errors"][0]["field"], "whyJoin");
        let mut db = h.manager.db().await.unwrap();
        assert_eq!(services::application::list(&mut db, crate::core::models::application::Status::Pending, &Default::default()).await.unwrap().len(), 0);

        let req = TestRequest::post().uri("/api/join").set_json(join_body(50)).to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body, json!({"success": true}));

        let req = TestRequest::post().uri("/api/join").set_json(join_body(60)).to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_review_over_http() {
        let h = Harness::new();
        let app = app!(h);
        let req = TestRequest::post().uri("/api/join").set_json(join_body(80)).to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::OK);

        let req = TestRequest::get().uri("/api/applications").cookie(session(false)).to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        let id = body["applications"][0]["id"].as_str().unwrap().to_owned();

        let req = TestRequest::post()
            .uri("/api/mark-application")
            .cookie(session(false))
            .set_json(json!({"applicationId": id, "status": "approved", "remarks": "  "}))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["message"], "Remarks Required");

        let req = TestRequest::post()
            .uri("/api/mark-application")
            .cookie(session(false))
            .set_json(json!({"applicationId": id, "status": "approved", "remarks": "ok"}))
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::OK);

        let req = TestRequest::get().uri("/api/applications?type=approved").cookie(session(false)).to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        assert_eq!(body["applications"][0]["markedData"]["remarks"], "ok");

        let req = TestRequest::post()
            .uri("/api/rollback-application")
            .cookie(session(false))
            .set_json(json!({"applicationId": id, "reason": " "}))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["message"], "Reason Required");

        let req = TestRequest::post()
            .uri("/api/rollback-application")
            .cookie(session(false))
            .set_json(json!({"applicationId": id, "reason": "wrong applicant"}))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_body_json(resp).await;
        assert!(body["modRemarks"].as_str().unwrap().ends_with("Grace (approved): wrong applicant"));

        let req = TestRequest::get().uri("/api/applications").cookie(session(false)).to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        assert_eq!(body["applications"].as_array().unwrap().len(), 1);
        assert!(body["applications"][0]["markedData"].is_null());
    }

    #[actix_web::test]
    async fn test_bos_multipart_with_photo() {
        let h = Harness::new();
        let app = app!(h);
        let boundary = "nodexboundary";
        let mut body = Vec::new();
        for (name, value) in [
            ("name", "Linus"),
            ("email", "linus@nodex.club"),
            ("position", "President"),
            ("batch", "2026"),
            ("department", "ECE"),
            ("socials", r#"["https://github.com/linus"]"#),
            ("achievements", r#"["Led Hackfest"]"#),
        ] {
            body.extend_from_slice(format!("--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n", boundary, name, value).as_bytes());
        }
        body.extend_from_slice(
            format!("--{}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"me.png\"\r\nContent-Type: image/png\r\n\r\n", boundary).as_bytes(),
        );
        body.extend_from_slice(b"\x89PNG fake image");
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        let req = TestRequest::post()
            .uri("/api/dashboard/bos")
            .cookie(session(false))
            .insert_header(("content-type", format!("multipart/form-data; boundary={}", boundary)))
            .set_payload(body)
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = read_body_json(resp).await;

        let uri = format!("/api/dashboard/bos/{}", created["id"].as_str().unwrap());
        let req = TestRequest::get().uri(&uri).cookie(session(false)).to_request();
        let member: Value = read_body_json(call_service(&app, req).await).await;
        let photo = member["photo"].as_str().unwrap();
        assert!(photo.starts_with("/uploads/") && photo.ends_with(".png"));
        assert_eq!(member["socials"], json!(["https://github.com/linus"]));
        assert_eq!(std::fs::read_dir(h.storer.path()).unwrap().count(), 1);
    }

    #[actix_web::test]
    async fn test_bos_rejected_form_stores_no_photo() {
        let h = Harness::new();
        let app = app!(h);
        let boundary = "nodexboundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nLinus\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!("--{}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"me.png\"\r\nContent-Type: image/png\r\n\r\n", boundary).as_bytes(),
        );
        body.extend_from_slice(b"\x89PNG fake image");
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        let req = TestRequest::post()
            .uri("/api/dashboard/bos")
            .cookie(session(false))
            .insert_header(("content-type", format!("multipart/form-data; boundary={}", boundary)))
            .set_payload(body)
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(std::fs::read_dir(h.storer.path()).unwrap().count(), 0);
    }

    #[actix_web::test]
    async fn test_bos_oversized_bodies() {
        let h = Harness::new();
        let app = app!(h);

        let form = json!({
            "name": "x".repeat(crate::handlers::bos::MAX_JSON_SIZE),
            "email": "linus@nodex.club",
            "position": "President",
            "batch": "2026",
            "department": "ECE",
        });
        let req = TestRequest::post().uri("/api/dashboard/bos").cookie(session(false)).set_json(form).to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let boundary = "nodexboundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n", boundary).as_bytes());
        body.extend_from_slice("y".repeat(crate::handlers::bos::MAX_FIELD_SIZE + 1).as_bytes());
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
        let req = TestRequest::post()
            .uri("/api/dashboard/bos")
            .cookie(session(false))
            .insert_header(("content-type", format!("multipart/form-data; boundary={}", boundary)))
            .set_payload(body)
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["errors"][0]["field"], "name");

        let mut db = h.manager.db().await.unwrap();
        let (list, total) = services::bos::list(&mut db, &Default::default(), None).await.unwrap();
        assert!(list.is_empty() && total == 0);
    }

    #[actix_web::test]
    async fn test_page_past_i64_range() {
        let h = Harness::new();
        let app = app!(h);
        let req = TestRequest::get().uri(&format!("/api/teams?page={}", i64::MAX)).to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["list"], json!([]));
    }

    #[actix_web::test]
    async fn test_team_delete_detaches_members() {
        let h = Harness::new();
        let app = app!(h);
        let manager = RecruiterInfo {
            id: "r2".into(),
            assignee: "Tim".into(),
            exec: false,
            team_mgmt: true,
        };
        let cookie = Cookie::new(AUTH_COOKIE, JWT::new(SECRET.to_vec()).gen_token(&Claim::new(&manager)).unwrap());

        let req = TestRequest::post()
            .uri("/api/dashboard/teams")
            .cookie(session(false))
            .set_json(json!({"name": "Web", "description": "Frontend and backend"}))
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = TestRequest::post()
            .uri("/api/dashboard/teams")
            .cookie(cookie.clone())
            .set_json(json!({"name": "Web", "description": "Frontend and backend"}))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let team: Value = read_body_json(resp).await;
        let team_id = team["id"].as_str().unwrap().to_owned();

        let req = TestRequest::get().uri("/api/teams").to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        assert_eq!(body["total"], 1);

        let req = TestRequest::delete().uri(&format!("/api/dashboard/teams/{}", team_id)).cookie(cookie).to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::OK);
        let req = TestRequest::get().uri("/api/teams").to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        assert_eq!(body["total"], 0);
    }
}
