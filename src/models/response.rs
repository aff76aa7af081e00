use serde::{Deserialize, Serialize};

pub const SUBMISSION_SUCCESS_MESSAGE: &str = "Form submitted successfully and sent via email!";
pub const TEST_EMAIL_SUCCESS_MESSAGE: &str = "Test email sent successfully!";
pub const SERVER_RUNNING_MESSAGE: &str = "Server is running!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
