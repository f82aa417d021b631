use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::integrations::wallet::WalletRpcError;
use crate::services::contract_errors::ContractRevert;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("No wallet provider available")]
    WalletAbsent,

    #[error("Wrong network: expected chain {expected}, wallet is on {actual}")]
    NetworkMismatch { expected: u64, actual: u64 },

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Request rejected by user")]
    UserRejected,

    #[error("Invalid input: {0}")]
    InputInvalid(String),

    #[error("Minimum funding: {minimum_eth:.6} ETH (${minimum_usd} USD)")]
    BelowMinimum {
        minimum_eth: Decimal,
        minimum_usd: Decimal,
    },

    #[error("Contract reverted: {0}")]
    Revert(ContractRevert),

    #[error("Withdrawal locked for {0}")]
    WithdrawalLocked(String),

    #[error("Blockchain RPC error: {0}")]
    BlockchainRPC(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Classifies a wallet/RPC failure. Rejections are recognized by their
    /// EIP-1193 code, reverts by their selector.
    pub fn from_wallet(err: WalletRpcError) -> Self {
        if err.is_user_rejection() {
            return AppError::UserRejected;
        }
        if let Some(data) = err.revert_data.as_ref() {
            return AppError::Revert(ContractRevert::decode(data));
        }
        tracing::debug!("Wallet request failed with code {}", err.code);
        AppError::BlockchainRPC(err.message)
    }

    pub fn is_user_rejection(&self) -> bool {
        matches!(self, AppError::UserRejected)
    }
}

impl From<WalletRpcError> for AppError {
    fn from(err: WalletRpcError) -> Self {
        AppError::from_wallet(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// Stable code plus the text shown to the user.
    pub fn detail(&self) -> ErrorDetail {
        let (code, message) = match self {
            AppError::WalletAbsent => (
                "WALLET_ABSENT",
                "Please install a wallet to continue".to_string(),
            ),
            AppError::NetworkMismatch { .. } => ("NETWORK_MISMATCH", "Wrong network".to_string()),
            AppError::NotConnected => (
                "NOT_CONNECTED",
                "Please connect your wallet first.".to_string(),
            ),
            AppError::UserRejected => ("USER_REJECTED", "Request rejected by user".to_string()),
            AppError::InputInvalid(_) => (
                "INPUT_INVALID",
                "Please enter a valid ETH amount".to_string(),
            ),
            AppError::BelowMinimum { .. } => ("BELOW_MINIMUM", self.to_string()),
            AppError::Revert(revert) => ("CONTRACT_REVERT", revert.user_message()),
            AppError::WithdrawalLocked(remaining) => (
                "WITHDRAWAL_LOCKED",
                format!("Withdrawal available in {}", remaining),
            ),
            AppError::BlockchainRPC(msg) => ("RPC_ERROR", msg.clone()),
            AppError::Config(msg) => ("CONFIG_ERROR", msg.clone()),
            AppError::Internal(msg) => ("INTERNAL_ERROR", msg.clone()),
        };

        ErrorDetail {
            code: code.to_string(),
            message,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
