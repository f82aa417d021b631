use ethers::abi::{AbiDecode, AbiEncode};
use ethers::types::{Address, TransactionRequest, U256};
use rust_decimal::Decimal;

use crate::{
    constants::MINIMUM_USD_DECIMALS,
    error::{AppError, Result},
    integrations::WalletProvider,
    models::Deployment,
    services::{
        contract_errors::ContractRevert, price_feed::PriceFeed, withdrawal_timer::WithdrawalTimer,
    },
    utils::fixed_point_to_decimal,
};

/// Address-bound handle for the FundMe contract. Reads go through
/// `eth_call`; writes are built as transactions for the wallet to sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundMeContract {
    address: Address,
}

impl FundMeContract {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    async fn read_uint(
        &self,
        wallet: &dyn WalletProvider,
        from: Option<Address>,
        calldata: Vec<u8>,
    ) -> Result<U256> {
        let mut tx = TransactionRequest::new().to(self.address).data(calldata);
        if let Some(from) = from {
            tx = tx.from(from);
        }
        let raw = wallet.call(&tx).await?;
        U256::decode(&raw)
            .map_err(|e| AppError::BlockchainRPC(format!("Invalid uint256 return data: {}", e)))
    }

    /// `MINIMUM_USD`, 6-decimal fixed point.
    pub async fn minimum_usd(&self, wallet: &dyn WalletProvider) -> Result<U256> {
        self.read_uint(wallet, None, MinimumUsdCall.encode()).await
    }

    pub async fn minimum_usd_decimal(&self, wallet: &dyn WalletProvider) -> Result<Decimal> {
        let raw = self.minimum_usd(wallet).await?;
        fixed_point_to_decimal(raw, MINIMUM_USD_DECIMALS)
    }

    pub async fn lock_duration(&self, wallet: &dyn WalletProvider) -> Result<U256> {
        self.read_uint(wallet, None, WithdrawalLockDurationCall.encode())
            .await
    }

    pub async fn version(&self, wallet: &dyn WalletProvider) -> Result<U256> {
        self.read_uint(wallet, None, GetVersionCall.encode()).await
    }

    pub async fn amount_funded(&self, wallet: &dyn WalletProvider, funder: Address) -> Result<U256> {
        let call = GetAddressToAmountFundedCall {
            funding_address: funder,
        };
        self.read_uint(wallet, Some(funder), call.encode()).await
    }

    /// Reverts with `FundMe__NoContributionsFound()` for accounts that never
    /// funded or already withdrew.
    pub async fn time_remaining(&self, wallet: &dyn WalletProvider, funder: Address) -> Result<U256> {
        let call = GetTimeRemainingForWithdrawalCall { funder };
        self.read_uint(wallet, Some(funder), call.encode()).await
    }

    pub fn fund_tx(&self, from: Address, value: U256) -> TransactionRequest {
        TransactionRequest::new()
            .from(from)
            .to(self.address)
            .value(value)
            .data(FundCall.encode())
    }

    pub fn withdraw_tx(&self, from: Address) -> TransactionRequest {
        TransactionRequest::new()
            .from(from)
            .to(self.address)
            .data(WithdrawCall.encode())
    }
}

/// Everything bound to one connected account on the target chain. Built
/// whole and replaced whole: nothing here is mutated after construction
/// except the local countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractSession {
    account: Address,
    contract: FundMeContract,
    price_feed: PriceFeed,
    balance: U256,
    timer: WithdrawalTimer,
}

impl ContractSession {
    /// Binds the wallet's active account to the deployment and loads its
    /// balance and withdrawal lock.
    pub async fn initialize(
        wallet: &dyn WalletProvider,
        deployment: &Deployment,
    ) -> Result<Self> {
        let account = wallet
            .current_account()
            .await?
            .ok_or(AppError::NotConnected)?;
        let contract = FundMeContract::new(deployment.fund_me()?);
        let price_feed = PriceFeed::new(deployment.price_feed()?);
        Self::load(wallet, account, contract, price_feed).await
    }

    async fn load(
        wallet: &dyn WalletProvider,
        account: Address,
        contract: FundMeContract,
        price_feed: PriceFeed,
    ) -> Result<Self> {
        let (balance, timer) = match contract.time_remaining(wallet, account).await {
            Ok(seconds) => {
                let balance = contract.amount_funded(wallet, account).await?;
                (balance, WithdrawalTimer::from_seconds(saturating_seconds(seconds)))
            }
            // Expected for accounts without a recorded contribution.
            Err(AppError::Revert(ContractRevert::NoContributionsFound)) => {
                tracing::debug!("No contributions recorded for {:?}", account);
                (U256::zero(), WithdrawalTimer::unknown())
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            "Session ready for {:?}: balance={} wei, lock={:?}s",
            account,
            balance,
            timer.remaining()
        );

        Ok(Self {
            account,
            contract,
            price_feed,
            balance,
            timer,
        })
    }

    /// Fresh session for the same account and contract.
    pub async fn refresh(&self, wallet: &dyn WalletProvider) -> Result<Self> {
        Self::load(wallet, self.account, self.contract, self.price_feed).await
    }

    pub async fn get_balance(&self, wallet: &dyn WalletProvider, address: Address) -> Result<U256> {
        self.contract.amount_funded(wallet, address).await
    }

    pub async fn get_time_remaining(
        &self,
        wallet: &dyn WalletProvider,
        address: Address,
    ) -> Result<u64> {
        let seconds = self.contract.time_remaining(wallet, address).await?;
        Ok(saturating_seconds(seconds))
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn contract(&self) -> &FundMeContract {
        &self.contract
    }

    pub fn price_feed(&self) -> &PriceFeed {
        &self.price_feed
    }

    pub fn balance(&self) -> U256 {
        self.balance
    }

    pub fn timer(&self) -> &WithdrawalTimer {
        &self.timer
    }

    /// Advances the local countdown by one second.
    pub fn tick(&mut self) -> bool {
        self.timer.tick()
    }
}

fn saturating_seconds(value: U256) -> u64 {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.as_u64()
    }
}

ethers::contract::abigen!(
    FundMe,
    r#"[
        function MINIMUM_USD() view returns (uint256)
        function WITHDRAWAL_LOCK_DURATION() view returns (uint256)
        function fund() payable
        function withdraw()
        function getAddressToAmountFunded(address fundingAddress) view returns (uint256)
        function getTimeRemainingForWithdrawal(address funder) view returns (uint256)
        function getVersion() view returns (uint256)
    ]"#
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::OPTIMISM_SEPOLIA_DEPLOYMENT;
    use crate::integrations::mock_wallet::{account, encode_uint, revert_with, MockWallet};

    fn time_remaining_prefix() -> Vec<u8> {
        GetTimeRemainingForWithdrawalCall {
            funder: Address::zero(),
        }
        .encode()[..4]
            .to_vec()
    }

    fn time_remaining_for(funder: Address) -> Vec<u8> {
        GetTimeRemainingForWithdrawalCall { funder }.encode()
    }

    fn balance_for(funder: Address) -> Vec<u8> {
        GetAddressToAmountFundedCall {
            funding_address: funder,
        }
        .encode()
    }

    #[test]
    fn calldata_uses_contract_selectors() {
        // Ensures generated bindings hash the same signatures the contract exposes
        assert_eq!(hex::encode(FundCall.encode()), "b60d4288");
        assert_eq!(hex::encode(WithdrawCall.encode()), "3ccfd60b");
        assert_eq!(hex::encode(MinimumUsdCall.encode()), "6b69a592");
        assert_eq!(hex::encode(time_remaining_prefix()), "274da4dc");
        assert_eq!(hex::encode(&balance_for(Address::zero())[..4]), "0343fb25");
    }

    #[test]
    fn fund_tx_carries_value_and_sender() {
        let contract = FundMeContract::new(Address::repeat_byte(0x84));
        let tx = contract.fund_tx(account(0x11), U256::from(42u64));
        assert_eq!(tx.value, Some(U256::from(42u64)));
        assert_eq!(tx.from, Some(account(0x11)));
        assert_eq!(tx.data.as_deref(), Some(&FundCall.encode()[..]));
    }

    #[tokio::test]
    async fn initialize_reads_balance_and_lock() {
        let wallet = MockWallet::on_chain(11_155_420).authorized();
        let me = account(0x11);
        wallet.respond(time_remaining_for(me), Ok(encode_uint(U256::from(65u64))));
        wallet.respond(balance_for(me), Ok(encode_uint(U256::exp10(16))));

        let session = ContractSession::initialize(&wallet, &OPTIMISM_SEPOLIA_DEPLOYMENT)
            .await
            .expect("session");
        assert_eq!(session.account(), me);
        assert_eq!(session.balance(), U256::exp10(16));
        assert_eq!(session.timer().remaining(), Some(65));
    }

    #[tokio::test]
    async fn no_contribution_is_zero_balance_not_error() {
        let wallet = MockWallet::on_chain(11_155_420).authorized();
        wallet.respond(
            time_remaining_prefix(),
            Err(revert_with(ContractRevert::NoContributionsFound.selector().unwrap())),
        );

        let session = ContractSession::initialize(&wallet, &OPTIMISM_SEPOLIA_DEPLOYMENT)
            .await
            .expect("zero-balance session");
        assert_eq!(session.balance(), U256::zero());
        assert_eq!(session.timer().remaining(), None);
        assert_eq!(wallet.count("eth_call"), 1);
    }

    #[tokio::test]
    async fn other_read_failures_propagate() {
        let wallet = MockWallet::on_chain(11_155_420).authorized();
        wallet.respond(
            time_remaining_prefix(),
            Err(revert_with(ContractRevert::TransferFailed.selector().unwrap())),
        );
        let result = ContractSession::initialize(&wallet, &OPTIMISM_SEPOLIA_DEPLOYMENT).await;
        assert_eq!(
            result.err(),
            Some(AppError::Revert(ContractRevert::TransferFailed))
        );
    }

    #[tokio::test]
    async fn initialize_requires_an_account() {
        let wallet = MockWallet::on_chain(11_155_420);
        let result = ContractSession::initialize(&wallet, &OPTIMISM_SEPOLIA_DEPLOYMENT).await;
        assert_eq!(result.err(), Some(AppError::NotConnected));
    }

    #[tokio::test]
    async fn refresh_returns_new_values_for_same_account() {
        let wallet = MockWallet::on_chain(11_155_420).authorized();
        let me = account(0x11);
        wallet.respond(time_remaining_for(me), Ok(encode_uint(U256::from(10u64))));
        wallet.respond(balance_for(me), Ok(encode_uint(U256::from(1u64))));
        let session = ContractSession::initialize(&wallet, &OPTIMISM_SEPOLIA_DEPLOYMENT)
            .await
            .unwrap();

        wallet.respond(time_remaining_for(me), Ok(encode_uint(U256::from(60u64))));
        wallet.respond(balance_for(me), Ok(encode_uint(U256::from(2u64))));
        let refreshed = session.refresh(&wallet).await.unwrap();

        assert_eq!(refreshed.account(), me);
        assert_eq!(refreshed.balance(), U256::from(2u64));
        assert_eq!(refreshed.timer().remaining(), Some(60));
        assert_eq!(session.balance(), U256::from(1u64));
    }

    #[tokio::test]
    async fn minimum_usd_decimal_uses_six_decimals() {
        let wallet = MockWallet::on_chain(11_155_420);
        wallet.respond(MinimumUsdCall.encode(), Ok(encode_uint(U256::from(25_000_000u64))));
        let contract = FundMeContract::new(Address::repeat_byte(0x84));
        let minimum = contract.minimum_usd_decimal(&wallet).await.unwrap();
        assert_eq!(minimum, Decimal::from(25));
    }
}
