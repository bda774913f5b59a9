use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PUBLIC_DIR: &str = "public";

/// Configuration for the server, read once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on (PORT)
    pub port: u16,
    /// Directory the static assets are served from (PUBLIC_DIR)
    pub public_root: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let public_root = std::env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PUBLIC_DIR));

        Self { port, public_root }
    }
}
