use clap::{ Parser, Subcommand };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub serve: ServeArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the chat gateway HTTP server (default).
    Serve,
    /// Chat with a running gateway from the terminal.
    Chat(ChatArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    // --- Upstream Provider Args ---
    /// Text-generation endpoint tried first.
    #[arg(long, env = "PRIMARY_URL", default_value = crate::llm::DEFAULT_PRIMARY_URL)]
    pub primary_url: String,

    /// Endpoint used when the primary answers with a non-success status.
    #[arg(long, env = "FALLBACK_URL", default_value = crate::llm::DEFAULT_FALLBACK_URL)]
    pub fallback_url: String,

    /// Hugging Face API token. Requests are anonymous when unset.
    #[arg(long, env = "HF_API_TOKEN")]
    pub hf_api_token: Option<String>,

    /// Timeout in seconds applied to each upstream call.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "30")]
    pub upstream_timeout_secs: u64,

    // --- Generation Args (primary only) ---
    #[arg(long, env = "MAX_NEW_TOKENS", default_value = "500")]
    pub max_new_tokens: u32,

    #[arg(long, env = "TEMPERATURE", default_value = "0.7")]
    pub temperature: f32,

    #[arg(long, env = "TOP_P", default_value = "0.95")]
    pub top_p: f32,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ChatArgs {
    /// Base URL of the gateway (e.g., http://127.0.0.1:3000)
    #[arg(long, env = "GATEWAY_URL", default_value = "http://127.0.0.1:3000")]
    pub gateway_url: String,

    /// Timeout in seconds for each gateway request.
    #[arg(long, env = "GATEWAY_TIMEOUT_SECS", default_value = "120")]
    pub timeout_secs: u64,
}
