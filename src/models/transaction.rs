use chrono::{DateTime, Utc};
use ethers::types::H256;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    Fund,
    Withdraw,
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxKind::Fund => write!(f, "fund"),
            TxKind::Withdraw => write!(f, "withdraw"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxState {
    Submitted,
    Confirmed,
    Failed,
}

/// A transaction between submission and its final receipt. Lives only for
/// the duration of one submit-and-wait call.
#[derive(Debug, Clone, Serialize)]
pub struct PendingTransaction {
    pub hash: H256,
    pub kind: TxKind,
    pub state: TxState,
    pub submitted_at: DateTime<Utc>,
}

impl PendingTransaction {
    pub fn submitted(hash: H256, kind: TxKind) -> Self {
        Self {
            hash,
            kind,
            state: TxState::Submitted,
            submitted_at: Utc::now(),
        }
    }

    pub fn confirmed(self) -> Self {
        Self {
            state: TxState::Confirmed,
            ..self
        }
    }

    pub fn failed(self) -> Self {
        Self {
            state: TxState::Failed,
            ..self
        }
    }
}
