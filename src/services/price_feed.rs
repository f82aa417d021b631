use ethers::abi::{AbiEncode, ParamType};
use ethers::types::{Address, TransactionRequest, I256};
use rust_decimal::Decimal;

use crate::{
    constants::PRICE_FEED_DECIMALS,
    error::{AppError, Result},
    integrations::WalletProvider,
    utils::fixed_point_to_decimal,
};

/// Chainlink ETH/USD aggregator, read through the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceFeed {
    address: Address,
    decimals: u32,
}

impl PriceFeed {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            decimals: PRICE_FEED_DECIMALS,
        }
    }

    /// Raw signed answer of the latest round.
    pub async fn latest_answer(&self, wallet: &dyn WalletProvider) -> Result<I256> {
        let tx = TransactionRequest::new()
            .to(self.address)
            .data(LatestRoundDataCall.encode());
        let raw = wallet.call(&tx).await?;
        decode_round_answer(&raw)
    }

    /// Latest ETH price in USD.
    pub async fn eth_usd(&self, wallet: &dyn WalletProvider) -> Result<Decimal> {
        let answer = self.latest_answer(wallet).await?;
        if !answer.is_positive() {
            return Err(AppError::BlockchainRPC(format!(
                "Price feed returned non-positive answer: {}",
                answer
            )));
        }
        let price = fixed_point_to_decimal(answer.into_raw(), self.decimals)?;
        tracing::debug!("ETH/USD price: {}", price);
        Ok(price)
    }
}

fn decode_round_answer(raw: &[u8]) -> Result<I256> {
    let tokens = ethers::abi::decode(
        &[
            ParamType::Uint(80),
            ParamType::Int(256),
            ParamType::Uint(256),
            ParamType::Uint(256),
            ParamType::Uint(80),
        ],
        raw,
    )
    .map_err(|e| AppError::BlockchainRPC(format!("Invalid round data: {}", e)))?;

    tokens
        .get(1)
        .cloned()
        .and_then(|token| token.into_int())
        .map(I256::from_raw)
        .ok_or_else(|| AppError::BlockchainRPC("Round data missing answer".to_string()))
}

ethers::contract::abigen!(
    AggregatorV3,
    r#"[
        function latestRoundData() view returns (uint80, int256, uint256, uint256, uint80)
    ]"#
);
