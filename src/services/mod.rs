// Services module - outbound integrations

pub mod gpt;

pub use gpt::{GptConfig, GptService};
