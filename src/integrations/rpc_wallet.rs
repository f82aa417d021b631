use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, PendingTransaction, Provider, ProviderError, RpcError},
    types::{Address, Bytes, TransactionReceipt, TransactionRequest, H256},
};
use serde_json::json;
use std::time::Duration;

use crate::{
    config::Config,
    error::{AppError, Result},
    models::AddChainParams,
};

use super::wallet::{WalletProvider, WalletResult, WalletRpcError};

// JSON-RPC "internal error"; used when the transport failed before the
// wallet produced an error object of its own.
const TRANSPORT_ERROR_CODE: i64 = -32603;

/// Wallet bridged over JSON-RPC: every EIP-1193 request is forwarded to an
/// endpoint that holds the user's accounts (a wallet bridge or a dev node
/// with unlocked accounts).
pub struct RpcWallet {
    provider: Provider<Http>,
    receipt_poll_interval: Duration,
}

impl RpcWallet {
    pub fn new(rpc_url: &str, receipt_poll_interval: Duration) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| AppError::Config(format!("Invalid wallet RPC URL: {}", e)))?;
        Ok(Self {
            provider,
            receipt_poll_interval,
        })
    }

    /// `None` when no wallet endpoint is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let Some(url) = config.wallet_rpc_url.as_deref() else {
            return Ok(None);
        };
        let wallet = Self::new(
            url,
            Duration::from_millis(config.receipt_poll_interval_ms),
        )?;
        Ok(Some(wallet))
    }
}

/// Translates a provider failure into the EIP-1193 error shape, pulling
/// revert data out of the JSON-RPC error body when present.
pub fn wallet_error_from_provider(err: ProviderError) -> WalletRpcError {
    match RpcError::as_error_response(&err) {
        Some(response) => {
            let mut wallet_err = WalletRpcError::new(response.code, response.message.clone());
            wallet_err.revert_data = response.as_revert_data().filter(|data| !data.is_empty());
            wallet_err
        }
        None => WalletRpcError::new(TRANSPORT_ERROR_CODE, err.to_string()),
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn request_accounts(&self) -> WalletResult<Vec<Address>> {
        self.provider
            .request::<_, Vec<Address>>("eth_requestAccounts", ())
            .await
            .map_err(wallet_error_from_provider)
    }

    async fn accounts(&self) -> WalletResult<Vec<Address>> {
        self.provider
            .request::<_, Vec<Address>>("eth_accounts", ())
            .await
            .map_err(wallet_error_from_provider)
    }

    async fn chain_id(&self) -> WalletResult<String> {
        self.provider
            .request::<_, String>("eth_chainId", ())
            .await
            .map_err(wallet_error_from_provider)
    }

    async fn switch_chain(&self, chain_id_hex: &str) -> WalletResult<()> {
        self.provider
            .request::<_, serde_json::Value>(
                "wallet_switchEthereumChain",
                [json!({ "chainId": chain_id_hex })],
            )
            .await
            .map(|_| ())
            .map_err(wallet_error_from_provider)
    }

    async fn add_chain(&self, params: &AddChainParams) -> WalletResult<()> {
        self.provider
            .request::<_, serde_json::Value>("wallet_addEthereumChain", [params])
            .await
            .map(|_| ())
            .map_err(wallet_error_from_provider)
    }

    async fn call(&self, tx: &TransactionRequest) -> WalletResult<Bytes> {
        self.provider
            .call(&tx.clone().into(), None)
            .await
            .map_err(wallet_error_from_provider)
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> WalletResult<H256> {
        // The wallet fills gas, fees and nonce, as a browser wallet would.
        self.provider
            .request::<_, H256>("eth_sendTransaction", [tx])
            .await
            .map_err(wallet_error_from_provider)
    }

    async fn wait_for_confirmation(
        &self,
        tx_hash: H256,
        confirmations: usize,
    ) -> WalletResult<Option<TransactionReceipt>> {
        PendingTransaction::new(tx_hash, &self.provider)
            .confirmations(confirmations)
            .interval(self.receipt_poll_interval)
            .await
            .map_err(wallet_error_from_provider)
    }
}
