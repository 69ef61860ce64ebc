use crate::error::AppError;

/// Shared password every generation request must carry.
#[derive(Debug, Clone)]
pub struct SharedSecret {
    secret: String,
}

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Check a submitted password before any work is done for the request.
    pub fn verify(&self, candidate: &str) -> Result<(), AppError> {
        if candidate.is_empty() || candidate != self.secret {
            tracing::warn!("Rejected request with invalid password");
            return Err(AppError::Unauthorized("Invalid password".to_string()));
        }
        Ok(())
    }
}
