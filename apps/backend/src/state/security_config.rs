use jsonwebtoken::Algorithm;

/// JWT signing configuration shared across the app.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// Signing algorithm (HS256)
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
        }
    }

    /// Read the secret from `BACKEND_JWT_SECRET`.
    pub fn from_env() -> Result<Self, crate::error::AppError> {
        let secret = std::env::var("BACKEND_JWT_SECRET")
            .map_err(|_| {
                crate::error::AppError::config("BACKEND_JWT_SECRET is not set".to_string())
            })?;
        if secret.len() < 16 {
            return Err(crate::error::AppError::config(
                "BACKEND_JWT_SECRET must be at least 16 bytes".to_string(),
            ));
        }
        Ok(Self::new(secret))
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(b"test_secret_not_for_production".to_vec())
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
