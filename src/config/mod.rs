use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request body cap for JSON/urlencoded payloads, in bytes.
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
    /// Body cap for multipart upload routes, in bytes.
    #[serde(default = "default_upload_limit")]
    pub upload_limit: usize,
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    #[serde(default = "default_access_expiry_minutes")]
    pub access_expiry_minutes: i64,
    #[serde(default = "default_refresh_expiry_days")]
    pub refresh_expiry_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Base URL under which uploaded objects are publicly reachable.
    pub public_base_url: String,
    /// Optional custom endpoint (MinIO and friends).
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_body_limit() -> usize {
    15 * 1024
}

fn default_upload_limit() -> usize {
    512 * 1024 * 1024
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_access_expiry_minutes() -> i64 {
    60
}

fn default_refresh_expiry_days() -> i64 {
    10
}

fn default_upload_timeout_secs() -> u64 {
    60
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("database.url", "postgres://localhost/vidtube")?
            .set_default("database.max_connections", 10)?
            .set_default("cors.origin", "http://localhost:3000")?
            .set_default("jwt.access_secret", "development-access-secret")?
            .set_default("jwt.refresh_secret", "development-refresh-secret")?
            .set_default("storage.bucket", "vidtube-media")?
            .set_default("storage.region", "us-east-1")?
            .set_default(
                "storage.public_base_url",
                "https://vidtube-media.s3.amazonaws.com",
            )?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
