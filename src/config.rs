//! Server configuration from the environment

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

/// Server settings.
///
/// Defaults match the reference deployment: port 3000, `data/` and
/// `uploads/` under the working directory.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let bind_addr = match env::var("ARTICLE_BIND_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "invalid ARTICLE_BIND_ADDR, using default");
                Self::default_addr()
            }),
            Err(_) => Self::default_addr(),
        };

        let data_dir = env::var("ARTICLE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let upload_dir = env::var("ARTICLE_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        Self {
            bind_addr,
            data_dir,
            upload_dir,
        }
    }

    fn default_addr() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 3000))
    }
}
