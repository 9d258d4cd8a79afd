pub mod api;

use crate::config::GatewayConfig;
use crate::gateway::ChatGateway;
use std::error::Error;
use std::net::SocketAddr;
use log::{ info, warn };

pub struct Server {
    config: GatewayConfig,
    gateway: ChatGateway,
}

impl Server {
    pub fn new(config: GatewayConfig, gateway: ChatGateway) -> Self {
        if config.primary.api_token.is_none() {
            warn!("No HF_API_TOKEN configured. Upstream requests are anonymous and heavily rate limited.");
        }

        Self { config, gateway }
    }

    pub async fn run(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.config.server_addr
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid server address '{}': {}", self.config.server_addr, e))?;

        if self.config.tls.is_none() {
            info!("TLS not enabled. Running plain HTTP server.");
        }

        let state = api::AppState { gateway: self.gateway };
        api::serve_http(addr, state, self.config.tls).await
    }
}
