use casbin::{CoreApi, DefaultModel, Enforcer, MemoryAdapter, MgmtApi};

use crate::core::authorizer::{roles, Action, Authorizer, Object};
use crate::core::models::recruiter::RecruiterInfo;
use crate::error::Error;

const MODEL: &str = include_str!("casbin.conf");
const POLICIES: &str = include_str!("policies.csv");

/// Role policy backed by a casbin ACL whose subjects are role names.
pub struct CasbinAuthorizer {
    enforcer: Enforcer,
}

fn parse_policies(csv: &str) -> Vec<Vec<String>> {
    csv.lines()
        .map(str::trim)
        .filter(|l| l.starts_with("p,"))
        .map(|l| l.split(',').skip(1).map(|f| f.trim().to_owned()).collect())
        .collect()
}

impl CasbinAuthorizer {
    pub async fn new() -> Result<Self, Error> {
        let model = DefaultModel::from_str(MODEL).await?;
        let mut enforcer = Enforcer::new(model, MemoryAdapter::default()).await?;
        enforcer.add_policies(parse_policies(POLICIES)).await?;
        Ok(Self { enforcer })
    }
}

impl Authorizer for CasbinAuthorizer {
    fn check(&self, recruiter: &RecruiterInfo, obj: Object, act: Action) -> Result<bool, Error> {
        for role in roles(recruiter) {
            if self.enforcer.enforce((role, obj.as_str(), act.as_str()))? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
