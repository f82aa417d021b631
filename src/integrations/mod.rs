pub mod rpc_wallet;
pub mod wallet;

#[cfg(test)]
pub mod mock_wallet;

pub use rpc_wallet::RpcWallet;
pub use wallet::{WalletProvider, WalletRpcError};
