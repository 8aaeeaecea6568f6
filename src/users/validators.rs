use super::models::{CreateUserRequest, UpdateUserRequest};
use crate::common::{ValidationResult, Validator};

fn check_email(result: &mut ValidationResult, email: &str) {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || !parts[1].contains('.') {
        result.add_error("email", "Email must be a valid address");
    }
}

impl Validator<CreateUserRequest> for CreateUserRequest {
    fn validate(&self, data: &CreateUserRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().is_empty() {
            result.add_error("name", "Name is required");
        }
        if data.name.len() > 255 {
            result.add_error("name", "Name must not exceed 255 characters");
        }
        check_email(&mut result, &data.email);
        if data.password_hash.trim().is_empty() {
            result.add_error("password_hash", "Password hash is required");
        }

        result
    }
}

impl Validator<UpdateUserRequest> for UpdateUserRequest {
    fn validate(&self, data: &UpdateUserRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(name) = &data.name {
            if name.trim().is_empty() {
                result.add_error("name", "Name cannot be empty");
            }
        }
        if let Some(email) = &data.email {
            check_email(&mut result, email);
        }
        if let Some(password_hash) = &data.password_hash {
            if password_hash.trim().is_empty() {
                result.add_error("password_hash", "Password hash cannot be empty");
            }
        }

        result
    }
}
