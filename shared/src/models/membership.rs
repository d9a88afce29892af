//! Membership Model (shop subscription plan)

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Subscription plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Free,
    Basic,
    Premium,
}

impl Plan {
    /// Maximum number of active products, `None` = unlimited
    pub fn product_limit(&self) -> Option<u64> {
        match self {
            Plan::Free => Some(50),
            Plan::Basic => Some(500),
            Plan::Premium => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Basic => "basic",
            Plan::Premium => "premium",
        }
    }
}

/// Membership embedded in the user document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MembershipInfo {
    pub plan: Plan,
    pub started_at: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl MembershipInfo {
    pub fn free(now: i64) -> Self {
        Self {
            plan: Plan::Free,
            started_at: now,
            expires_at: None,
        }
    }

    /// Whether a paid plan has run past its expiry
    pub fn is_expired(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(exp) if exp <= now)
    }

    /// Plan in force at `now` (expired paid plans fall back to free)
    pub fn effective_plan(&self, now: i64) -> Plan {
        if self.plan != Plan::Free && self.is_expired(now) {
            Plan::Free
        } else {
            self.plan
        }
    }
}

/// Subscribe payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubscribeRequest {
    pub plan: Plan,
    #[validate(range(min = 1, max = 24, message = "months must be between 1 and 24"))]
    #[serde(default = "default_months")]
    pub months: u32,
}

fn default_months() -> u32 {
    1
}

/// Membership view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub plan: Plan,
    pub effective_plan: Plan,
    pub started_at: i64,
    pub expires_at: Option<i64>,
    pub is_expired: bool,
    pub product_limit: Option<u64>,
    pub product_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_paid_plan_falls_back_to_free() {
        let m = MembershipInfo {
            plan: Plan::Basic,
            started_at: 0,
            expires_at: Some(1_000),
        };
        assert_eq!(m.effective_plan(999), Plan::Basic);
        assert_eq!(m.effective_plan(1_000), Plan::Free);
        assert!(m.is_expired(2_000));
    }

    #[test]
    fn plan_limits() {
        assert_eq!(Plan::Free.product_limit(), Some(50));
        assert_eq!(Plan::Basic.product_limit(), Some(500));
        assert_eq!(Plan::Premium.product_limit(), None);
    }
}
