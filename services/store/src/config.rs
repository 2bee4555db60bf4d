use std::path::PathBuf;

/// Storefront service configuration loaded from environment variables.
#[derive(Debug)]
pub struct StoreConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing JWT access tokens.
    pub jwt_secret: String,
    /// TCP port to listen on (default 5000). Env var: `STORE_PORT`.
    pub store_port: u16,
    /// Directory uploaded images are written to and served from (default `uploads`).
    pub upload_dir: PathBuf,
    /// Allowed browser origin. Any origin is allowed when unset.
    pub cors_origin: Option<String>,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            store_port: std::env::var("STORE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            cors_origin: std::env::var("CORS_ORIGIN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }
}
