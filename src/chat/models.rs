//! Chat proxy request payloads

use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct QuestionRequest {
    pub question: String,
}
