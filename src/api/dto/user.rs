use serde::Deserialize;

use super::{Fields, Validate};
use crate::database::models::UserStatus;

pub const USERNAME_LENGTH: (usize, usize) = (1, 15);
pub const PASSWORD_LENGTH: (usize, usize) = (6, 12);

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserDto {
    pub username: String,
    pub email: String,
    pub password: String,
    pub status: UserStatus,
}

impl Validate for CreateUserDto {
    fn validate(fields: &mut Fields<'_>) {
        if let Some(username) = fields.required::<String>("username") {
            fields.length("username", &username, USERNAME_LENGTH);
        }
        credentials(fields);
        fields.required::<UserStatus>("status");
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUserDto {
    pub email: String,
    pub password: String,
}

impl Validate for LoginUserDto {
    fn validate(fields: &mut Fields<'_>) {
        credentials(fields);
    }
}

fn credentials(fields: &mut Fields<'_>) {
    if let Some(email) = fields.required::<String>("email") {
        fields.email(&email);
    }
    if let Some(password) = fields.required::<String>("password") {
        fields.length("password", &password, PASSWORD_LENGTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::rejected;
    use serde_json::json;

    #[test]
    fn short_password_and_bad_email_both_reported() {
        let fields = rejected::<CreateUserDto>(json!({
            "username": "kate",
            "email": "kate-at-mail",
            "password": "123",
            "status": "regular"
        }));
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[test]
    fn status_outside_enum_is_reported_on_status() {
        let fields = rejected::<CreateUserDto>(json!({
            "username": "kate",
            "email": "k@mail.com",
            "password": "123456",
            "status": "admin"
        }));
        assert_eq!(fields, vec!["status"]);
    }

    #[test]
    fn login_needs_both_fields() {
        assert_eq!(rejected::<LoginUserDto>(json!({})), vec!["email", "password"]);
    }
}
