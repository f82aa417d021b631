// src/models/mod.rs
pub mod network;
pub mod transaction;

pub use network::{AddChainParams, ChainDescriptor, Deployment, Network};
pub use transaction::{PendingTransaction, TxKind};
