use std::sync::Arc;

use welding_admin_config::{
    AuthConfig, ConfigError, CorsConfig, FirebaseConfig, ServerConfig, WebClientConfig,
};
use welding_admin_firebase::{FirebaseClient, Provider, ProviderError};

#[derive(Clone, Debug)]
pub struct AppState {
    pub provider: Provider,
    pub auth_config: AuthConfig,
    pub web_client_config: WebClientConfig,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to initialise provider client: {0}")]
    Provider(#[from] ProviderError),
}

impl AppState {
    /// State with default server, CORS and web-client settings.
    pub fn new(provider: Provider, auth_config: AuthConfig) -> Self {
        Self {
            provider,
            auth_config,
            web_client_config: WebClientConfig::default(),
            cors_config: CorsConfig::default(),
            server_config: ServerConfig::default(),
        }
    }
}

pub fn init_app_state() -> Result<AppState, StartupError> {
    let firebase_config = FirebaseConfig::from_env()?;
    let client = Arc::new(FirebaseClient::new(&firebase_config)?);
    let provider = Provider::new(client.clone(), client, firebase_config.timeout);

    Ok(AppState {
        provider,
        auth_config: AuthConfig::from_env()?,
        web_client_config: WebClientConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        server_config: ServerConfig::from_env(),
    })
}
