use std::env;

/// The Truffle wildcard network selector: accept whichever network the
/// artifact records a deployment for.
pub const ANY_NETWORK: &str = "*";

#[derive(Debug, Clone)]
pub struct Config {
    pub chain: ChainConfig,
    pub artifact_path: String,
    pub images: ImageConfig,
}

#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub host: String,
    pub port: u16,
    pub network_id: String,
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub input_path: String,
    pub output_path: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            chain: ChainConfig {
                host: env::var("CHAIN_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("CHAIN_PORT")
                    .unwrap_or_else(|_| "7545".to_string())
                    .parse()
                    .map_err(|_| ConfigError::Invalid("CHAIN_PORT"))?,
                network_id: env::var("NETWORK_ID").unwrap_or_else(|_| ANY_NETWORK.to_string()),
            },
            artifact_path: env::var("ARTIFACT_PATH")
                .unwrap_or_else(|_| "build/contracts/ImageStore.json".to_string()),
            images: ImageConfig {
                input_path: env::var("IMAGE_PATH")
                    .unwrap_or_else(|_| "images/image.txt".to_string()),
                output_path: env::var("OUTPUT_PATH")
                    .unwrap_or_else(|_| "images/retrieved_image.txt".to_string()),
            },
        })
    }

    /// Get the HTTP RPC endpoint of the development chain
    pub fn rpc_url(&self) -> String {
        format!("http://{}:{}", self.chain.host, self.chain.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for: {0}")]
    Invalid(&'static str),
}
