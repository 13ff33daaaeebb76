use serde::{Deserialize, Serialize};

/// The uniform envelope every backend response arrives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    /// Collapses `message` and the optional `errors` list into one line.
    pub fn error_text(&self) -> String {
        match &self.errors {
            Some(errors) if !errors.is_empty() => {
                format!("{}: {}", self.message, errors.join("; "))
            }
            _ => self.message.clone(),
        }
    }
}
