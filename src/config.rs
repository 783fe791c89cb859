use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    /// Slot file holding the serialized reservation collection.
    pub store_path: PathBuf,
    /// Optional override for the bundled catalog document.
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "studyspot".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "studyspot-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let store_path = std::env::var("STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("studyspot_bookings.json"));
        let catalog_path = std::env::var("CATALOG_PATH").ok().map(PathBuf::from);
        Ok(Self {
            jwt,
            store_path,
            catalog_path,
        })
    }
}
