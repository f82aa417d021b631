use std::env;

use crate::constants::{
    DEFAULT_CHAIN_POLL_INTERVAL_SECS, DEFAULT_RECEIPT_POLL_INTERVAL_MS, DEFAULT_TX_CONFIRMATIONS,
};
use crate::models::Network;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,

    // Wallet
    pub wallet_rpc_url: Option<String>,
    pub target_network: Network,

    // Polling
    pub chain_poll_interval_secs: u64,
    pub receipt_poll_interval_ms: u64,
    pub tx_confirmations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            environment: "development".to_string(),
            wallet_rpc_url: None,
            target_network: Network::default(),
            chain_poll_interval_secs: DEFAULT_CHAIN_POLL_INTERVAL_SECS,
            receipt_poll_interval_ms: DEFAULT_RECEIPT_POLL_INTERVAL_MS,
            tx_confirmations: DEFAULT_TX_CONFIRMATIONS,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let defaults = Config::default();

        Ok(Config {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),

            wallet_rpc_url: env::var("WALLET_RPC_URL")
                .ok()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            target_network: match env::var("TARGET_NETWORK") {
                Ok(value) => value.parse()?,
                Err(_) => defaults.target_network,
            },

            chain_poll_interval_secs: env::var("CHAIN_POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| defaults.chain_poll_interval_secs.to_string())
                .parse()?,
            receipt_poll_interval_ms: env::var("RECEIPT_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| defaults.receipt_poll_interval_ms.to_string())
                .parse()?,
            tx_confirmations: env::var("TX_CONFIRMATIONS")
                .unwrap_or_else(|_| defaults.tx_confirmations.to_string())
                .parse()?,
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(url) = &self.wallet_rpc_url {
            let parsed = url::Url::parse(url)
                .map_err(|e| anyhow::anyhow!("WALLET_RPC_URL is not a valid URL: {}", e))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("WALLET_RPC_URL must be http(s), got {}", parsed.scheme());
            }
            if parsed.host_str() == Some("0.0.0.0") || url.contains("YOUR_") {
                tracing::warn!("WALLET_RPC_URL looks like a placeholder: {}", url);
            }
        }

        if self.chain_poll_interval_secs == 0 {
            anyhow::bail!("CHAIN_POLL_INTERVAL_SECS must be > 0");
        }
        if self.receipt_poll_interval_ms == 0 {
            anyhow::bail!("RECEIPT_POLL_INTERVAL_MS must be > 0");
        }
        if self.tx_confirmations == 0 {
            anyhow::bail!("TX_CONFIRMATIONS must be > 0");
        }

        let deployment = self.target_network.deployment();
        if deployment.fund_me_address.starts_with("0x0000") {
            tracing::warn!("Using placeholder FundMe address");
        }

        if !self.is_testnet() {
            tracing::warn!(
                "Environment {} targets {}, which is a testnet",
                self.environment,
                self.target_network
            );
        }

        Ok(())
    }

    pub fn is_testnet(&self) -> bool {
        self.environment == "development" || self.environment == "testnet"
    }
}
