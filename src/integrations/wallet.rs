use async_trait::async_trait;
use ethers::types::{Address, Bytes, TransactionReceipt, TransactionRequest, H256};
use thiserror::Error;

use crate::constants::{UNRECOGNIZED_CHAIN_CODE, USER_REJECTED_CODE};
use crate::models::AddChainParams;

/// Provider error as reported by an EIP-1193 wallet. `revert_data` carries
/// the raw return data when a call or transaction reverted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("wallet error {code}: {message}")]
pub struct WalletRpcError {
    pub code: i64,
    pub message: String,
    pub revert_data: Option<Bytes>,
}

impl WalletRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            revert_data: None,
        }
    }

    pub fn with_revert_data(mut self, data: Bytes) -> Self {
        self.revert_data = Some(data);
        self
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == USER_REJECTED_CODE
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == UNRECOGNIZED_CHAIN_CODE
    }
}

pub type WalletResult<T> = std::result::Result<T, WalletRpcError>;

/// The subset of the EIP-1193 surface this front-end drives.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `eth_requestAccounts`; may prompt the user.
    async fn request_accounts(&self) -> WalletResult<Vec<Address>>;

    /// `eth_accounts`; never prompts.
    async fn accounts(&self) -> WalletResult<Vec<Address>>;

    /// `eth_chainId`, as the wallet reports it (usually `0x` hex).
    async fn chain_id(&self) -> WalletResult<String>;

    async fn switch_chain(&self, chain_id_hex: &str) -> WalletResult<()>;

    async fn add_chain(&self, params: &AddChainParams) -> WalletResult<()>;

    async fn call(&self, tx: &TransactionRequest) -> WalletResult<Bytes>;

    async fn send_transaction(&self, tx: &TransactionRequest) -> WalletResult<H256>;

    /// Resolves once the transaction has `confirmations` confirmations.
    /// `None` means the transaction was dropped from the mempool.
    async fn wait_for_confirmation(
        &self,
        tx_hash: H256,
        confirmations: usize,
    ) -> WalletResult<Option<TransactionReceipt>>;

    /// First authorized account, if any.
    async fn current_account(&self) -> WalletResult<Option<Address>> {
        Ok(self.accounts().await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_classified() {
        assert!(WalletRpcError::new(4001, "User rejected the request.").is_user_rejection());
        assert!(WalletRpcError::new(4902, "Unrecognized chain ID").is_unrecognized_chain());
        assert!(!WalletRpcError::new(-32603, "Internal error").is_user_rejection());
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = WalletRpcError::new(-32000, "nonce too low");
        assert_eq!(err.to_string(), "wallet error -32000: nonce too low");
    }
}
