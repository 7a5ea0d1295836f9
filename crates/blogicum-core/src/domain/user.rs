use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainResult;
use crate::validation::{MAX_NAME_LEN, Validator, is_username};

pub const MIN_PASSWORD_LEN: usize = 8;

/// User entity - an author of posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    /// Staff members manage categories, locations and accounts.
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(registration: Registration, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: registration.username,
            first_name: registration.first_name,
            last_name: registration.last_name,
            email: registration.email,
            password_hash,
            is_staff: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Roles embedded into access tokens.
    pub fn roles(&self) -> Vec<String> {
        let mut roles = vec!["user".to_string()];
        if self.is_staff {
            roles.push("admin".to_string());
        }
        roles
    }

    pub fn apply(&mut self, changes: ProfileChanges) {
        self.username = changes.username;
        self.first_name = changes.first_name;
        self.last_name = changes.last_name;
        self.email = changes.email;
        self.updated_at = Utc::now();
    }
}

/// Sign-up form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl Registration {
    pub fn validate(&self) -> DomainResult<()> {
        let mut v = Validator::new();
        validate_identity(&mut v, &self.username, &self.email, &self.first_name, &self.last_name);
        v.check(
            self.password.chars().count() >= MIN_PASSWORD_LEN,
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        );
        v.finish()
    }
}

/// Editable profile fields.
#[derive(Debug, Clone)]
pub struct ProfileChanges {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl ProfileChanges {
    pub fn validate(&self) -> DomainResult<()> {
        let mut v = Validator::new();
        validate_identity(&mut v, &self.username, &self.email, &self.first_name, &self.last_name);
        v.finish()
    }
}

fn validate_identity(v: &mut Validator, username: &str, email: &str, first: &str, last: &str) {
    v.check(
        is_username(username),
        "username may contain only letters, digits and @/./+/-/_",
    )
    .max_len("username", username, MAX_NAME_LEN)
    .check(email.contains('@'), "email must be a valid address")
    .max_len("first_name", first, MAX_NAME_LEN)
    .max_len("last_name", last, MAX_NAME_LEN);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DomainError;

    fn registration() -> Registration {
        Registration {
            username: "anna".to_string(),
            email: "anna@example.com".to_string(),
            password: "karenina1877".to_string(),
            first_name: "Anna".to_string(),
            last_name: String::new(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn test_short_password_and_bad_email() {
        let mut reg = registration();
        reg.password = "short".to_string();
        reg.email = "anna.example.com".to_string();

        match reg.validate() {
            Err(DomainError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_staff_gets_admin_role() {
        let mut user = User::new(registration(), "hash".to_string());
        assert_eq!(user.roles(), vec!["user".to_string()]);

        user.is_staff = true;
        assert!(user.roles().contains(&"admin".to_string()));
    }
}
