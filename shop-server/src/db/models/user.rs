//! User Model (shop owner account)

use super::{impl_document, serde_helpers};
use serde::{Deserialize, Serialize};
use shared::models::{MembershipInfo, UserProfile, UserRole};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Lowercased, unique
    pub email: String,
    /// Argon2 PHC string; only ever leaves the server as [`UserProfile`] (without it)
    pub hash_pass: String,
    pub name: String,
    pub shop_name: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    #[serde(default)]
    pub membership: MembershipInfo,
    pub created_at: i64,
    pub updated_at: i64,
}

impl_document!(User, "user");

fn default_true() -> bool {
    true
}

impl User {
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            email: self.email.clone(),
            name: self.name.clone(),
            shop_name: self.shop_name.clone(),
            phone: self.phone.clone(),
            role: self.role,
            is_active: self.is_active,
            membership: self.membership.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
