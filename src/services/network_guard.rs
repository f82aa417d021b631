use crate::{
    error::{AppError, Result},
    integrations::{WalletProvider, WalletRpcError},
    models::ChainDescriptor,
};

/// Normalizes a chain id as reported by a wallet (`0x` hex) or written in
/// configuration (decimal) to the same integer.
pub fn normalize_chain_id(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|_| AppError::BlockchainRPC(format!("Invalid chain id: {:?}", raw)))
}

/// Checks the wallet's active chain against the single target chain and
/// asks the wallet to switch (or add) it when needed.
#[derive(Debug, Clone, Copy)]
pub struct NetworkGuard {
    target: &'static ChainDescriptor,
}

impl NetworkGuard {
    pub fn new(target: &'static ChainDescriptor) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &'static ChainDescriptor {
        self.target
    }

    pub async fn current_chain_id(&self, wallet: &dyn WalletProvider) -> Result<u64> {
        let raw = wallet.chain_id().await?;
        normalize_chain_id(&raw)
    }

    /// No side effects beyond the `eth_chainId` round trip.
    pub async fn validate_network(&self, wallet: &dyn WalletProvider) -> Result<bool> {
        Ok(self.current_chain_id(wallet).await? == self.target.chain_id)
    }

    /// `Err(NetworkMismatch)` unless the wallet is on the target chain.
    pub async fn ensure_network(&self, wallet: &dyn WalletProvider) -> Result<()> {
        let actual = self.current_chain_id(wallet).await?;
        if actual != self.target.chain_id {
            return Err(AppError::NetworkMismatch {
                expected: self.target.chain_id,
                actual,
            });
        }
        Ok(())
    }

    /// Asks the wallet to switch to the target chain, adding it first when
    /// the wallet does not know it. Rejection by the user is `Ok(false)`.
    pub async fn switch_or_add_network(&self, wallet: &dyn WalletProvider) -> Result<bool> {
        let chain_id_hex = self.target.chain_id_hex();
        match wallet.switch_chain(&chain_id_hex).await {
            Ok(()) => {
                tracing::info!("Switched wallet to {}", self.target.display_name);
                Ok(true)
            }
            Err(err) if err.is_unrecognized_chain() => self.add_network(wallet).await,
            Err(err) => Ok(declined("switch", &err)),
        }
    }

    async fn add_network(&self, wallet: &dyn WalletProvider) -> Result<bool> {
        tracing::info!(
            "Wallet does not know chain {}; requesting add",
            self.target.chain_id
        );
        match wallet.add_chain(&self.target.add_chain_params()).await {
            Ok(()) => Ok(true),
            Err(err) => Ok(declined("add", &err)),
        }
    }
}

fn declined(action: &str, err: &WalletRpcError) -> bool {
    if err.is_user_rejection() {
        tracing::info!("User rejected network {} request", action);
    } else {
        tracing::warn!("Network {} failed: {}", action, err);
    }
    false
}
