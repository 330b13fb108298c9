use std::path::PathBuf;

use crate::env_or;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the front-end pages (`index.html`, `teacher.html`, ...).
    pub client_dir: PathBuf,
    pub metrics_port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_or("PORT", "5000").parse().unwrap_or(5000),
            client_dir: PathBuf::from(env_or("CLIENT_DIR", "client")),
            metrics_port: env_or("METRICS_PORT", "9090").parse().unwrap_or(9090),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            client_dir: PathBuf::from("client"),
            metrics_port: 9090,
        }
    }
}
