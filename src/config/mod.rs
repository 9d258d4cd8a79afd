use crate::cli::ServeArgs;
use crate::llm::{ GenerationParameters, ProviderConfig };
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name} '{value}': {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("{name} must use http or https, got '{scheme}'")]
    UnsupportedScheme {
        name: &'static str,
        scheme: String,
    },
    #[error("upstream timeout must be at least one second")]
    ZeroTimeout,
    #[error("both --tls-cert-path and --tls-key-path must be provided to enable TLS")]
    IncompleteTls,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

/// Validated server settings derived from the command line.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub server_addr: String,
    pub primary: ProviderConfig,
    pub fallback: ProviderConfig,
    pub tls: Option<TlsPaths>,
}

impl GatewayConfig {
    pub fn from_args(args: &ServeArgs) -> Result<Self, ConfigError> {
        if args.upstream_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        let timeout = Duration::from_secs(args.upstream_timeout_secs);
        let api_token = args.hf_api_token.clone().filter(|t| !t.trim().is_empty());

        let mut primary = ProviderConfig::primary(validate_url("primary URL", &args.primary_url)?);
        primary.api_token = api_token.clone();
        primary.timeout = timeout;
        primary.parameters = Some(GenerationParameters {
            max_new_tokens: args.max_new_tokens,
            temperature: args.temperature,
            top_p: args.top_p,
            return_full_text: false,
        });

        let mut fallback = ProviderConfig::fallback(
            validate_url("fallback URL", &args.fallback_url)?
        );
        fallback.api_token = api_token;
        fallback.timeout = timeout;

        let tls = if args.enable_tls {
            match (&args.tls_cert_path, &args.tls_key_path) {
                (Some(cert_path), Some(key_path)) =>
                    Some(TlsPaths { cert_path: cert_path.clone(), key_path: key_path.clone() }),
                _ => {
                    return Err(ConfigError::IncompleteTls);
                }
            }
        } else {
            None
        };

        Ok(Self {
            server_addr: args.server_addr.clone(),
            primary,
            fallback,
            tls,
        })
    }
}

pub fn validate_url(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        source,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(value.to_string()),
        other => Err(ConfigError::UnsupportedScheme { name, scheme: other.to_string() }),
    }
}
