//! The authenticated identity a service call acts on behalf of.

use serde::{Deserialize, Serialize};

use crate::models::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Resident,
    BuildingAdmin,
    /// Manages several buildings
    Manager,
    SuperAdmin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    /// Shown as the author on posts and comments
    pub display_name: String,
    pub role: Role,
}

impl Session {
    pub const DEMO_USER_ID: &'static str = "demo-user-001";

    pub fn new(user_id: impl Into<UserId>, email: impl Into<String>, role: Role) -> Self {
        let email = email.into();
        let display_name = display_name_from_email(&email);
        Self {
            user_id: user_id.into(),
            email,
            display_name,
            role,
        }
    }

    /// The identity the demo build runs as.
    pub fn demo() -> Self {
        Self::new(Self::DEMO_USER_ID, "demo@abos.ge", Role::BuildingAdmin)
    }

    /// Building administration (e.g. registering buildings) is open to
    /// every role except residents.
    pub fn is_admin(&self) -> bool {
        matches!(
            self.role,
            Role::BuildingAdmin | Role::Manager | Role::SuperAdmin
        )
    }
}

/// "nika.m@example.com" -> "Nika.m"
fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
