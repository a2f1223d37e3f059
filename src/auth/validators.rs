//! Validation for auth request payloads

use super::models::{LoginRequest, SignupRequest};
use crate::common::{ValidationResult, Validator};

const MAX_EMAIL_LENGTH: usize = 255;
const MIN_PASSWORD_LENGTH: usize = 8;
const MIN_NICKNAME_LENGTH: usize = 2;
const MAX_NICKNAME_LENGTH: usize = 30;

fn validate_email(result: &mut ValidationResult, email: &str) {
    if email.trim().is_empty() {
        result.add_error("email", "Email is required");
    } else if !email.contains('@') {
        result.add_error("email", "Email must be a valid address");
    } else if email.len() > MAX_EMAIL_LENGTH {
        result.add_error("email", "Email must be 255 characters or less");
    }
}

impl Validator<SignupRequest> for SignupRequest {
    fn validate(&self, data: &SignupRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        validate_email(&mut result, &data.email);

        if data.password.len() < MIN_PASSWORD_LENGTH {
            result.add_error("password", "Password must be at least 8 characters");
        }

        let nickname = data.nickname.trim();
        if nickname.len() < MIN_NICKNAME_LENGTH || nickname.len() > MAX_NICKNAME_LENGTH {
            result.add_error("nickname", "Nickname must be between 2 and 30 characters");
        }

        result
    }
}

impl Validator<LoginRequest> for LoginRequest {
    fn validate(&self, data: &LoginRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        validate_email(&mut result, &data.email);

        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        }

        result
    }
}
