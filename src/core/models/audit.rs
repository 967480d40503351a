use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::validate::{Validate, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub actor: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub details: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Create {
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    #[serde(default)]
    pub details: String,
}

impl Validate for Create {
    fn check(&self, v: &mut Validator) {
        v.required("action", &self.action).required("resourceType", &self.resource_type).required("resourceId", &self.resource_id);
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub id: String,
    pub actor: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub details: String,
    pub created: DateTime<Utc>,
}

impl Insert {
    pub fn new(actor: &str, c: Create) -> Self {
        Insert {
            id: super::common::new_id(),
            actor: actor.to_owned(),
            action: c.action,
            resource_type: c.resource_type,
            resource_id: c.resource_id,
            details: c.details,
            created: Utc::now(),
        }
    }
}

impl From<Insert> for AuditEntry {
    fn from(i: Insert) -> Self {
        AuditEntry {
            id: i.id,
            actor: i.actor,
            action: i.action,
            resource_type: i.resource_type,
            resource_id: i.resource_id,
            details: i.details,
            created: i.created,
        }
    }
}
