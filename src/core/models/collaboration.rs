use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::filter::Searchable;
use crate::core::validate::{Validate, Validator};

pub const MIN_MESSAGE_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Collaboration {
    pub id: String,
    pub name: String,
    pub email: String,
    pub organization: String,
    pub message: String,
    pub created: DateTime<Utc>,
}

impl Searchable for Collaboration {
    fn haystack(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.organization.as_str(), self.message.as_str()]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Create {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "turnstileToken", alias = "cf-turnstile-response")]
    pub token: String,
}

impl Validate for Create {
    fn check(&self, v: &mut Validator) {
        v.required("name", &self.name)
            .email("email", &self.email)
            .required("organization", &self.organization)
            .min_chars("message", &self.message, MIN_MESSAGE_CHARS)
            .max_chars("message", &self.message, 5000);
        if self.token.trim().is_empty() {
            v.fail("token", "complete the captcha");
        }
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub id: String,
    pub name: String,
    pub email: String,
    pub organization: String,
    pub message: String,
    pub created: DateTime<Utc>,
}

impl From<Create> for Insert {
    fn from(c: Create) -> Self {
        Insert {
            id: super::common::new_id(),
            name: c.name.trim().to_owned(),
            email: c.email.trim().to_lowercase(),
            organization: c.organization.trim().to_owned(),
            message: c.message.trim().to_owned(),
            created: Utc::now(),
        }
    }
}

impl From<Insert> for Collaboration {
    fn from(i: Insert) -> Self {
        Collaboration {
            id: i.id,
            name: i.name,
            email: i.email,
            organization: i.organization,
            message: i.message,
            created: i.created,
        }
    }
}
