use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::core::tokener::{Payload, Tokener};
use crate::error::Error;

/// HS256 tokens; `exp` is enforced on verification.
#[derive(Clone)]
pub struct JWT {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JWT {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
        }
    }
}

impl<P> Tokener<P> for JWT
where
    P: Payload,
{
    fn gen_token(&self, payload: &P) -> Result<String, Error> {
        Ok(encode(&Header::new(Algorithm::HS256), payload, &self.encoding)?)
    }

    fn verify_token(&self, token: &str) -> Result<P, Error> {
        let data = decode::<P>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::middlewares::session::Claim;
    use chrono::{Duration, Utc};

    fn claim(sub: &str, exec: bool, exp: i64) -> Claim {
        Claim {
            sub: sub.into(),
            assignee: "Grace".into(),
            exec,
            team_mgmt: false,
            exp,
        }
    }

    #[test]
    fn test_gen_and_verify_token() {
        let jwt = JWT::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0]);
        let c = claim("r1", true, (Utc::now() + Duration::days(1)).timestamp());
        let token = jwt.gen_token(&c).unwrap();
        let back: Claim = jwt.verify_token(&token).unwrap();
        assert_eq!(back.subject(), "r1");
        assert!(back.exec);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let a = JWT::new(b"first secret".to_vec());
        let b = JWT::new(b"second secret".to_vec());
        let token = a.gen_token(&claim("r1", false, (Utc::now() + Duration::days(1)).timestamp())).unwrap();
        assert!(matches!(<JWT as Tokener<Claim>>::verify_token(&b, &token), Err(Error::JWTError(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = JWT::new(b"secret".to_vec());
        let token = jwt.gen_token(&claim("r1", false, (Utc::now() - Duration::days(1)).timestamp())).unwrap();
        assert!(<JWT as Tokener<Claim>>::verify_token(&jwt, &token).is_err());
    }
}
