pub mod cli;
pub mod client;
pub mod config;
pub mod gateway;
pub mod llm;
pub mod models;
pub mod server;

use cli::{ Args, ChatArgs, Command, ServeArgs };
use client::HttpGatewayClient;
use config::GatewayConfig;
use gateway::ChatGateway;
use log::info;
use server::Server;
use std::error::Error;
use std::time::Duration;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    match args.command {
        Some(Command::Chat(chat_args)) => run_chat(chat_args).await,
        Some(Command::Serve) | None => run_server(args.serve).await,
    }
}

async fn run_server(args: ServeArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = GatewayConfig::from_args(&args)?;

    info!("--- Core Configuration ---");
    info!("Server Address: {}", config.server_addr);
    info!("Primary Provider: {}", config.primary.endpoint);
    info!("Fallback Provider: {}", config.fallback.endpoint);
    info!("Upstream Timeout: {:?}", config.primary.timeout);
    info!("Generation Parameters: {:?}", config.primary.parameters);
    info!("API Token Set: {}", config.primary.api_token.is_some());
    info!("TLS Enabled: {}", config.tls.is_some());
    info!("-------------------------");

    let primary = llm::inference::new_client(&config.primary)?;
    let fallback = llm::inference::new_client(&config.fallback)?;
    let gateway = ChatGateway::new(primary, fallback);

    Server::new(config, gateway).run().await
}

async fn run_chat(args: ChatArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let base_url = config::validate_url("gateway URL", &args.gateway_url)?;
    let transport = HttpGatewayClient::new(&base_url, Duration::from_secs(args.timeout_secs.max(1)))?;
    info!("Chatting with gateway at {}", base_url);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    client::repl::run_chat(stdin, tokio::io::stdout(), &transport).await?;
    Ok(())
}
