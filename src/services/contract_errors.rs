// Revert decoding for the FundMe contract. Reverts are identified by their
// 4-byte selector; human-readable reason strings are not matched.

use ethers::abi::AbiDecode;
use ethers::utils::id;
use std::fmt;

const ERROR_STRING_SIGNATURE: &str = "Error(string)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractRevert {
    InsufficientFunds,
    NoContributionsFound,
    NoFundsAvailable,
    TransferFailed,
    WithdrawalLocked,
    /// Standard `Error(string)` revert.
    Reason(String),
    /// Selector this front-end does not know, hex encoded. Empty when the
    /// revert carried no data.
    Unknown(String),
}

impl ContractRevert {
    pub const CUSTOM: [ContractRevert; 5] = [
        ContractRevert::InsufficientFunds,
        ContractRevert::NoContributionsFound,
        ContractRevert::NoFundsAvailable,
        ContractRevert::TransferFailed,
        ContractRevert::WithdrawalLocked,
    ];

    /// Solidity signature of a custom error variant.
    pub fn signature(&self) -> Option<&'static str> {
        match self {
            ContractRevert::InsufficientFunds => Some("FundMe__InsufficientFunds()"),
            ContractRevert::NoContributionsFound => Some("FundMe__NoContributionsFound()"),
            ContractRevert::NoFundsAvailable => Some("FundMe__NoFundsAvailable()"),
            ContractRevert::TransferFailed => Some("FundMe__TransferFailed()"),
            ContractRevert::WithdrawalLocked => Some("FundMe__WithdrawalLocked()"),
            ContractRevert::Reason(_) | ContractRevert::Unknown(_) => None,
        }
    }

    pub fn selector(&self) -> Option<[u8; 4]> {
        self.signature().map(id)
    }

    /// Decodes raw revert data as returned by the node.
    pub fn decode(data: &[u8]) -> Self {
        if data.len() < 4 {
            return ContractRevert::Unknown(hex::encode(data));
        }
        let selector: [u8; 4] = [data[0], data[1], data[2], data[3]];

        if let Some(known) = Self::CUSTOM
            .iter()
            .find(|candidate| candidate.selector() == Some(selector))
        {
            return known.clone();
        }

        if selector == id(ERROR_STRING_SIGNATURE) {
            if let Ok(reason) = String::decode(&data[4..]) {
                return ContractRevert::Reason(reason);
            }
        }

        ContractRevert::Unknown(format!("0x{}", hex::encode(selector)))
    }

    pub fn user_message(&self) -> String {
        match self {
            ContractRevert::InsufficientFunds => "Amount is below the contract minimum".to_string(),
            ContractRevert::NoContributionsFound => "No contributions found for this account".to_string(),
            ContractRevert::NoFundsAvailable => "No funds available for withdrawal.".to_string(),
            ContractRevert::TransferFailed => "Contract transfer failed".to_string(),
            ContractRevert::WithdrawalLocked => "Withdrawal is still locked".to_string(),
            ContractRevert::Reason(reason) => format!("Transaction reverted: {}", reason),
            ContractRevert::Unknown(selector) if selector.is_empty() => {
                "Transaction reverted".to_string()
            }
            ContractRevert::Unknown(selector) => format!("Transaction reverted ({})", selector),
        }
    }
}

impl fmt::Display for ContractRevert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.signature() {
            Some(signature) => write!(f, "{}", signature),
            None => write!(f, "{}", self.user_message()),
        }
    }
}
