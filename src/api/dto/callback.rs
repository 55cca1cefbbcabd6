/*
 * Responsibility
 * - Query string Discord sends back to /callback
 * - Success: ?code=...  Cancelled/denied consent: ?error=...&error_description=...
 */
use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackQuery {
    /// The authorization code, or MissingCode when it is absent or empty.
    pub fn code(&self) -> Result<&str, AppError> {
        match self.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Ok(code),
            _ => Err(AppError::MissingCode),
        }
    }
}
