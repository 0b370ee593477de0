//! # User Documents
//!
//! Users are keyed by email; the email in a verified token is the identity
//! every ownership filter (carts, donations, payments) is built from.

use crate::error::{ShelfError, ShelfResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Privilege level stored on a user document.
///
/// Registration never writes a role; promotion sets `admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Unique identity key
    pub email: String,

    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Absent for ordinary users
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Free-form profile fields (photo URL etc.) carried as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Some(Role::Admin))
    }

    /// Boundary validation for registration payloads
    pub fn validate(&self) -> ShelfResult<()> {
        if self.email.trim().is_empty() {
            return Err(ShelfError::Validation("user email is required".into()));
        }
        if !self.email.contains('@') {
            return Err(ShelfError::Validation(format!(
                "invalid email address: {}",
                self.email
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_round_trip() {
        let user: User = serde_json::from_value(json!({
            "email": "admin@example.com",
            "role": "admin",
            "photoURL": "https://example.com/a.png"
        }))
        .unwrap();

        assert!(user.is_admin());
        assert_eq!(user.extra["photoURL"], json!("https://example.com/a.png"));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["role"], json!("admin"));
        assert!(back.get("_id").is_none());
    }

    #[test]
    fn test_missing_role_is_not_admin() {
        let user: User =
            serde_json::from_value(json!({ "email": "reader@example.com" })).unwrap();
        assert!(!user.is_admin());
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut user: User =
            serde_json::from_value(json!({ "email": "reader@example.com" })).unwrap();
        assert!(user.validate().is_ok());

        user.email = "  ".into();
        assert!(user.validate().is_err());

        user.email = "not-an-address".into();
        assert!(user.validate().is_err());
    }
}
