use chrono::Utc;
use hex::ToHex;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

use crate::core::models::common::new_id;
use crate::core::models::recruiter::{Insert, Login, RecruiterInfo};
use crate::core::ports::repository::{RecruiterCommon, Store};
use crate::error::Error;

const SALT_CHARS: &[u8] = b"1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

pub fn random_salt() -> String {
    let mut rng = thread_rng();
    (0..32).map(|_| SALT_CHARS[rng.gen_range(0..SALT_CHARS.len())] as char).collect()
}

pub async fn login<S>(db: &mut S, Login { username, password }: Login) -> Result<RecruiterInfo, Error>
where
    S: Store,
{
    match db.get_by_username(username.trim()).await? {
        Some(r) if hash_password(&password, &r.salt) == r.password => Ok(RecruiterInfo::from(&r)),
        _ => {
            log::warn!("failed login for {}", username);
            Err(Error::Unauthorized)
        }
    }
}

pub struct NewRecruiter<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub assignee: &'a str,
    pub exec: bool,
    pub team_mgmt: bool,
}

/// Creates the account unless the username is taken; returns the new id.
pub async fn ensure_recruiter<S>(db: &mut S, n: NewRecruiter<'_>) -> Result<Option<String>, Error>
where
    S: Store,
{
    if db.get_by_username(n.username).await?.is_some() {
        return Ok(None);
    }
    let salt = random_salt();
    let id = RecruiterCommon::insert(
        db,
        Insert {
            id: new_id(),
            username: n.username.into(),
            assignee: n.assignee.into(),
            password: hash_password(n.password, &salt),
            salt,
            exec: n.exec,
            team_mgmt: n.team_mgmt,
            created: Utc::now(),
        },
    )
    .await?;
    log::info!("recruiter {} created as {}", n.username, id);
    Ok(Some(id))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::ports::repository::Manager;
    use crate::database::memory::MemoryManager;
    use hex_literal::hex;

    #[test]
    fn test_hash_password() {
        // sha256("password" + "salt")
        let expected = hex!("7a37b85c8918eac19a9089c0fa5a2ab4dce3f90528dcdeec108b23ddf3607b99");
        assert_eq!(hash_password("password", "salt"), hex::encode(expected));
    }

    #[test]
    fn test_random_salt() {
        let s = random_salt();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(s, random_salt());
    }

    #[tokio::test]
    async fn test_login() {
        let m = MemoryManager::new();
        let mut db = m.db().await.unwrap();
        let new = || NewRecruiter {
            username: "grace",
            password: "hopper",
            assignee: "Grace",
            exec: true,
            team_mgmt: false,
        };
        assert!(ensure_recruiter(&mut db, new()).await.unwrap().is_some());
        assert!(ensure_recruiter(&mut db, new()).await.unwrap().is_none());
        let info = login(
            &mut db,
            Login {
                username: "grace".into(),
                password: "hopper".into(),
            },
        )
        .await
        .unwrap();
        assert!(info.exec);
        assert_eq!(info.assignee, "Grace");
        let bad = Login {
            username: "grace".into(),
            password: "wrong".into(),
        };
        assert!(matches!(login(&mut db, bad).await, Err(Error::Unauthorized)));
    }
}
