//! Validation for post request payloads

use super::models::CreatePostRequest;
use crate::common::{ValidationResult, Validator};

const MAX_TITLE_LENGTH: usize = 255;
const MAX_CONTENT_LENGTH: usize = 10_000;

impl Validator<CreatePostRequest> for CreatePostRequest {
    fn validate(&self, data: &CreatePostRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        let title = data.title.trim();
        if title.is_empty() {
            result.add_error("title", "Title is required");
        } else if title.len() > MAX_TITLE_LENGTH {
            result.add_error("title", "Title must be 255 characters or less");
        }

        if data.content.trim().is_empty() {
            result.add_error("content", "Content is required");
        } else if data.content.len() > MAX_CONTENT_LENGTH {
            result.add_error("content", "Content must be 10000 characters or less");
        }

        result
    }
}
