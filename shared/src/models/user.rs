//! User Model (shop owner accounts)

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::membership::MembershipInfo;

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Owner,
    Staff,
}

/// Register payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "shop_name is required"))]
    pub shop_name: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user (password hash never leaves the server)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub shop_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub membership: MembershipInfo,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Register / login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: UserProfile,
}

/// Update profile payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[validate(length(max = 32))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Change password payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
