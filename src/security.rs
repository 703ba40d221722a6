use std::env;
use std::fs;
use std::path::PathBuf;

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::core::errors::ApiError;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
pub struct SessionToken {
    value: String,
}

impl SessionToken {
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Resolve the per-process session token.
///
/// `DOCNAVI_SESSION_TOKEN` wins when set; otherwise a fresh token is
/// generated and written next to the user data so a local UI shell can
/// pick it up.
pub fn init_session_token(user_data_dir: &std::path::Path) -> SessionToken {
    if let Ok(token) = env::var("DOCNAVI_SESSION_TOKEN") {
        if !token.trim().is_empty() {
            return SessionToken { value: token };
        }
    }

    let token = format!("{}{}", Uuid::new_v4(), Uuid::new_v4());
    let token_path = session_token_path(user_data_dir);
    if let Some(parent) = token_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Err(err) = fs::write(&token_path, &token) {
        tracing::warn!("Failed to write session token: {}", err);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(&token_path) {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            let _ = fs::set_permissions(&token_path, perms);
        }
    }

    SessionToken { value: token }
}

pub fn require_api_key(headers: &HeaderMap, token: &SessionToken) -> Result<(), ApiError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if provided.is_empty() || provided != token.value() {
        return Err(ApiError::Unauthorized);
    }

    Ok(())
}

fn session_token_path(user_data_dir: &std::path::Path) -> PathBuf {
    user_data_dir.join(".session_token")
}
