use chrono::Utc;

use crate::core::captcha::CaptchaVerifier;
use crate::core::filter::Filter;
use crate::core::models::application::{Application, Insert, JoinRequest, MarkRequest, ReviewUpdate, RollbackRequest, Status};
use crate::core::models::recruiter::RecruiterInfo;
use crate::core::ports::repository::{ApplicationCommon, Store, TxStore};
use crate::core::review::{self, ApplicationState};
use crate::core::validate::Validate;
use crate::error::Error;

pub async fn list<S>(db: &mut S, status: Status, filter: &Filter) -> Result<Vec<Application>, Error>
where
    S: Store,
{
    ApplicationCommon::query(db, Some(status), filter, None).await
}

/// Public intake. Nothing is written unless the form is valid, the captcha
/// passes and the email has not applied before.
pub async fn join<S, V>(db: &mut S, verifier: &V, req: JoinRequest, remote_ip: Option<&str>) -> Result<String, Error>
where
    S: Store,
    V: CaptchaVerifier,
{
    req.validate()?;
    if !verifier.verify(req.token.trim(), remote_ip).await? {
        return Err(Error::CaptchaFailed);
    }
    let insert = Insert::from(req);
    if db.exists_email(&insert.email).await? {
        return Err(Error::Conflict("An application with this email already exists".into()));
    }
    let id = ApplicationCommon::insert(db, insert).await?;
    log::info!("application {} received", id);
    Ok(id)
}

pub async fn mark<T>(mut tx: T, recruiter: &RecruiterInfo, req: MarkRequest) -> Result<Application, Error>
where
    T: TxStore,
{
    if req.remarks.trim().is_empty() {
        return Err(Error::RemarksRequired);
    }
    let mut app = tx.get_for_update(&req.application_id).await?;
    let state = ApplicationState::from(app.marked_data.take());
    let next = review::decide(&state, req.status, &req.remarks, Utc::now(), Some(&recruiter.assignee))?;
    app.marked_data = next.into_marked_data();
    tx.update_review(
        &app.id,
        ReviewUpdate {
            marked_data: app.marked_data.clone(),
            mod_remarks: app.mod_remarks.clone(),
        },
    )
    .await?;
    tx.commit().await?;
    log::info!("application {} marked {} by {}", app.id, req.status.as_str(), recruiter.id);
    Ok(app)
}

/// Returns the application's full history after appending this rollback.
pub async fn rollback<T>(mut tx: T, recruiter: &RecruiterInfo, req: RollbackRequest) -> Result<String, Error>
where
    T: TxStore,
{
    if req.reason.trim().is_empty() {
        return Err(Error::ReasonRequired);
    }
    let app = tx.get_for_update(&req.application_id).await?;
    let rb = review::rollback(&ApplicationState::from(app.marked_data), &req.reason)?;
    let now = Utc::now();
    let entry = review::history_entry(now, &recruiter.assignee, rb.previous, &rb.reason);
    let history = review::append_history(app.mod_remarks.as_deref(), &entry);
    tx.update_review(
        &app.id,
        ReviewUpdate {
            marked_data: None,
            mod_remarks: Some(history.clone()),
        },
    )
    .await?;
    tx.commit().await?;
    log::info!("application {} rolled back from {} by {}", app.id, rb.previous, recruiter.id);
    Ok(history)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::captcha::test::FixedVerifier;
    use crate::core::models::application::test::join_request;
    use crate::core::models::application::Decision;
    use crate::core::ports::repository::Manager;
    use crate::core::services::test::recruiter;
    use crate::database::memory::MemoryManager;

    async fn seeded(m: &MemoryManager, n: usize) -> Vec<String> {
        let mut db = m.db().await.unwrap();
        let mut ids = Vec::new();
        for i in 0..n {
            let mut req = join_request(60);
            req.email = format!("applicant{}@example.com", i);
            ids.push(join(&mut db, &FixedVerifier(true), req, None).await.unwrap());
        }
        ids
    }

    fn mark_req(id: &str, status: Decision, remarks: &str) -> MarkRequest {
        MarkRequest {
            application_id: id.into(),
            status,
            remarks: remarks.into(),
        }
    }

    #[tokio::test]
    async fn test_join_boundary() {
        let m = MemoryManager::new();
        let mut db = m.db().await.unwrap();
        assert!(matches!(join(&mut db, &FixedVerifier(true), join_request(49), None).await, Err(Error::Validation(_))));
        assert_eq!(ApplicationCommon::count(&mut db, None, &Filter::default()).await.unwrap(), 0);
        join(&mut db, &FixedVerifier(true), join_request(50), None).await.unwrap();
        assert_eq!(ApplicationCommon::count(&mut db, None, &Filter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_join_rejects_failed_captcha_and_duplicates() {
        let m = MemoryManager::new();
        let mut db = m.db().await.unwrap();
        assert!(matches!(join(&mut db, &FixedVerifier(false), join_request(60), None).await, Err(Error::CaptchaFailed)));
        join(&mut db, &FixedVerifier(true), join_request(60), None).await.unwrap();
        let mut again = join_request(60);
        again.email = "ADA@example.com".into();
        assert!(matches!(join(&mut db, &FixedVerifier(true), again, None).await, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_each_application_in_exactly_one_list() {
        let m = MemoryManager::new();
        let ids = seeded(&m, 4).await;
        let r = recruiter(false, false);
        mark(m.tx().await.unwrap(), &r, mark_req(&ids[0], Decision::Approved, "ok")).await.unwrap();
        mark(m.tx().await.unwrap(), &r, mark_req(&ids[1], Decision::Rejected, "no")).await.unwrap();
        mark(m.tx().await.unwrap(), &r, mark_req(&ids[2], Decision::Approved, "ok")).await.unwrap();
        rollback(
            m.tx().await.unwrap(),
            &r,
            RollbackRequest {
                application_id: ids[2].clone(),
                reason: "duplicate".into(),
            },
        )
        .await
        .unwrap();

        let mut db = m.db().await.unwrap();
        let mut seen = Vec::new();
        for s in Status::ALL {
            seen.extend(list(&mut db, s, &Filter::default()).await.unwrap().into_iter().map(|a| a.id));
        }
        seen.sort();
        let mut expected = ids.clone();
        expected.sort();
        assert_eq!(seen, expected);
        assert_eq!(list(&mut db, Status::Pending, &Filter::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_mark_twice_conflicts() {
        let m = MemoryManager::new();
        let ids = seeded(&m, 1).await;
        let r = recruiter(false, false);
        let app = mark(m.tx().await.unwrap(), &r, mark_req(&ids[0], Decision::Approved, " ok ")).await.unwrap();
        let marked = app.marked_data.unwrap();
        assert_eq!(marked.remarks, "ok");
        assert_eq!(marked.decided_by.as_deref(), Some("Grace"));
        let err = mark(m.tx().await.unwrap(), &r, mark_req(&ids[0], Decision::Rejected, "again")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { from: Status::Approved, .. }));
    }

    #[tokio::test]
    async fn test_blank_remarks_touch_nothing() {
        let m = MemoryManager::new();
        let ids = seeded(&m, 1).await;
        let before = m.calls().await;
        let err = mark(m.tx().await.unwrap(), &recruiter(false, false), mark_req(&ids[0], Decision::Approved, "  ")).await.unwrap_err();
        assert!(matches!(err, Error::RemarksRequired));
        assert_eq!(m.calls().await, before);
    }

    #[tokio::test]
    async fn test_rollback_appends_history() {
        let m = MemoryManager::new();
        let ids = seeded(&m, 1).await;
        let r = recruiter(false, false);
        let back = |reason: &str| RollbackRequest {
            application_id: ids[0].clone(),
            reason: reason.into(),
        };
        assert!(matches!(rollback(m.tx().await.unwrap(), &r, back("early")).await, Err(Error::InvalidTransition { .. })));
        mark(m.tx().await.unwrap(), &r, mark_req(&ids[0], Decision::Approved, "ok")).await.unwrap();
        let first = rollback(m.tx().await.unwrap(), &r, back("wrong batch")).await.unwrap();
        mark(m.tx().await.unwrap(), &r, mark_req(&ids[0], Decision::Rejected, "no")).await.unwrap();
        let second = rollback(m.tx().await.unwrap(), &r, back("re-interview")).await.unwrap();

        let lines: Vec<&str> = second.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], first);
        assert!(lines[0].ends_with("Grace (approved): wrong batch"));
        assert!(lines[1].ends_with("Grace (rejected): re-interview"));

        let mut db = m.db().await.unwrap();
        let app = ApplicationCommon::get(&mut db, &ids[0]).await.unwrap();
        assert!(app.marked_data.is_none());
        assert_eq!(app.mod_remarks.as_deref(), Some(second.as_str()));
    }

    #[tokio::test]
    async fn test_unknown_application() {
        let m = MemoryManager::new();
        let err = mark(m.tx().await.unwrap(), &recruiter(false, false), mark_req("missing", Decision::Approved, "ok")).await.unwrap_err();
        assert!(matches!(err, Error::DatabaseError(sqlx::Error::RowNotFound)));
    }
}
