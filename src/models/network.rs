use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEPLOYMENTS, OPTIMISM_SEPOLIA_DEPLOYMENT, SEPOLIA_DEPLOYMENT};
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Static description of a chain the wallet can be asked to switch to or add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainDescriptor {
    pub chain_id: u64,
    pub display_name: &'static str,
    pub native_currency: NativeCurrency,
    pub rpc_urls: &'static [&'static str],
    pub explorer_urls: &'static [&'static str],
}

impl ChainDescriptor {
    /// Chain id in the `0x`-prefixed form wallets expect.
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }

    pub fn explorer_tx_url(&self, tx_hash: H256) -> Option<String> {
        self.explorer_urls
            .first()
            .map(|base| format!("{}/tx/{:#x}", base.trim_end_matches('/'), tx_hash))
    }

    pub fn add_chain_params(&self) -> AddChainParams {
        AddChainParams {
            chain_id: self.chain_id_hex(),
            chain_name: self.display_name.to_string(),
            native_currency: AddChainCurrency {
                name: self.native_currency.name.to_string(),
                symbol: self.native_currency.symbol.to_string(),
                decimals: self.native_currency.decimals,
            },
            rpc_urls: self.rpc_urls.iter().map(|url| url.to_string()).collect(),
            block_explorer_urls: self.explorer_urls.iter().map(|url| url.to_string()).collect(),
        }
    }
}

/// Parameter object of `wallet_addEthereumChain` (EIP-3085).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: AddChainCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddChainCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// FundMe deployment on a specific chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub chain: &'static ChainDescriptor,
    pub fund_me_address: &'static str,
    pub price_feed_address: &'static str,
}

impl Deployment {
    pub fn fund_me(&self) -> Result<Address> {
        parse_address(self.fund_me_address)
    }

    pub fn price_feed(&self) -> Result<Address> {
        parse_address(self.price_feed_address)
    }

    pub fn for_chain_id(chain_id: u64) -> Option<&'static Deployment> {
        DEPLOYMENTS
            .iter()
            .copied()
            .find(|deployment| deployment.chain.chain_id == chain_id)
    }
}

fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value)
        .map_err(|e| AppError::Internal(format!("Invalid contract address {}: {}", value, e)))
}

/// Networks this front-end knows how to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    Sepolia,
    #[default]
    OptimismSepolia,
}

impl Network {
    pub fn deployment(&self) -> &'static Deployment {
        match self {
            Network::Sepolia => &SEPOLIA_DEPLOYMENT,
            Network::OptimismSepolia => &OPTIMISM_SEPOLIA_DEPLOYMENT,
        }
    }

    pub fn chain(&self) -> &'static ChainDescriptor {
        self.deployment().chain
    }
}

impl FromStr for Network {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sepolia" | "11155111" | "0xaa36a7" => Ok(Network::Sepolia),
            "optimism-sepolia" | "op-sepolia" | "optimism_sepolia" | "11155420" | "0xaa37dc" => {
                Ok(Network::OptimismSepolia)
            }
            other => Err(AppError::Config(format!("Unknown target network: {}", other))),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Sepolia => write!(f, "sepolia"),
            Network::OptimismSepolia => write!(f, "optimism-sepolia"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::OPTIMISM_SEPOLIA;

    #[test]
    fn chain_id_hex_matches_wallet_format() {
        // Ensures descriptors render the same hex ids wallets report
        assert_eq!(Network::Sepolia.chain().chain_id_hex(), "0xaa36a7");
        assert_eq!(Network::OptimismSepolia.chain().chain_id_hex(), "0xaa37dc");
    }

    #[test]
    fn add_chain_params_serialize_camel_case() {
        let params = OPTIMISM_SEPOLIA.add_chain_params();
        let json = serde_json::to_value(&params).expect("serializable");
        assert_eq!(json["chainId"], "0xaa37dc");
        assert_eq!(json["chainName"], "OP Sepolia Testnet");
        assert_eq!(json["nativeCurrency"]["decimals"], 18);
        assert_eq!(json["rpcUrls"][0], "https://sepolia.optimism.io");
        assert_eq!(
            json["blockExplorerUrls"][0],
            "https://sepolia-optimistic.etherscan.io"
        );
    }

    #[test]
    fn explorer_link_uses_full_hash() {
        let hash = H256::repeat_byte(0xab);
        let url = OPTIMISM_SEPOLIA.explorer_tx_url(hash).expect("explorer configured");
        assert_eq!(
            url,
            format!("https://sepolia-optimistic.etherscan.io/tx/0x{}", "ab".repeat(32))
        );
    }

    #[test]
    fn deployments_resolve_by_chain_id() {
        let deployment = Deployment::for_chain_id(11_155_420).expect("known chain");
        assert_eq!(deployment.chain.display_name, "OP Sepolia Testnet");
        assert!(deployment.fund_me().is_ok());
        assert!(deployment.price_feed().is_ok());
        assert!(Deployment::for_chain_id(1).is_none());
    }

    #[test]
    fn network_parses_aliases() {
        assert_eq!("Optimism-Sepolia".parse::<Network>().ok(), Some(Network::OptimismSepolia));
        assert_eq!("0xaa36a7".parse::<Network>().ok(), Some(Network::Sepolia));
        assert!("mainnet".parse::<Network>().is_err());
        assert_eq!(Network::default(), Network::OptimismSepolia);
    }
}
