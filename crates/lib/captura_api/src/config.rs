//! API server configuration.

use captura_core::auth::jwt::resolve_secret;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3400").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Secret signing short-lived access tokens.
    pub access_token_secret: String,
    /// Independent secret signing long-lived refresh tokens.
    pub refresh_token_secret: String,
    /// Language model handed to the OCR engine (ISO 639-2 code).
    pub ocr_lang: String,
    /// Executable invoked for text recognition.
    pub ocr_command: String,
    /// Upper bound on a single engine invocation, in seconds.
    pub ocr_timeout_secs: u64,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable               | Default                                  |
    /// |------------------------|------------------------------------------|
    /// | `BIND_ADDR`            | `127.0.0.1:3400`                         |
    /// | `DATABASE_URL`         | `postgres://localhost:5432/captura`      |
    /// | `ACCESS_TOKEN_SECRET`  | generated & persisted to file            |
    /// | `REFRESH_TOKEN_SECRET` | generated & persisted to file            |
    /// | `OCR_LANG`             | `por`                                    |
    /// | `OCR_COMMAND`          | `tesseract`                              |
    /// | `OCR_TIMEOUT_SECS`     | `30`                                     |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3400".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/captura".into()),
            access_token_secret: resolve_secret("ACCESS_TOKEN_SECRET", "access-token-secret"),
            refresh_token_secret: resolve_secret("REFRESH_TOKEN_SECRET", "refresh-token-secret"),
            ocr_lang: std::env::var("OCR_LANG").unwrap_or_else(|_| "por".into()),
            ocr_command: std::env::var("OCR_COMMAND").unwrap_or_else(|_| "tesseract".into()),
            ocr_timeout_secs: std::env::var("OCR_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}
