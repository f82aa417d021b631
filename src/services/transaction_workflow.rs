use ethers::types::{TransactionRequest, H256, U256, U64};
use ethers::utils::parse_ether;
use futures_util::future::try_join;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::{
    constants::ETHER_DECIMALS,
    error::{AppError, Result},
    integrations::WalletProvider,
    models::{PendingTransaction, TxKind},
    services::{
        contract_errors::ContractRevert, contract_session::ContractSession,
        network_guard::NetworkGuard,
    },
    utils::format_mm_ss,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Validating,
    Pricing,
    Submitted,
    Confirmed,
    Failed,
}

/// One fund or withdraw attempt. Every transition is recorded; illegal
/// transitions are refused.
#[derive(Debug, Clone)]
pub struct Workflow {
    kind: TxKind,
    state: WorkflowState,
    history: Vec<WorkflowState>,
    pending: Option<PendingTransaction>,
}

impl Workflow {
    pub fn new(kind: TxKind) -> Self {
        Self {
            kind,
            state: WorkflowState::Idle,
            history: vec![WorkflowState::Idle],
            pending: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn history(&self) -> &[WorkflowState] {
        &self.history
    }

    pub fn pending(&self) -> Option<&PendingTransaction> {
        self.pending.as_ref()
    }

    pub fn allows(&self, next: WorkflowState) -> bool {
        use WorkflowState::*;
        match (self.state, next) {
            (Idle, Validating) => true,
            (Validating, Pricing) => self.kind == TxKind::Fund,
            (Pricing, Submitted) => self.kind == TxKind::Fund,
            (Validating, Submitted) => self.kind == TxKind::Withdraw,
            (Submitted, Confirmed) => true,
            (Validating | Pricing | Submitted, Failed) => true,
            _ => false,
        }
    }

    pub fn advance(&mut self, next: WorkflowState) -> Result<()> {
        if !self.allows(next) {
            return Err(AppError::Internal(format!(
                "Illegal {} transition {:?} -> {:?}",
                self.kind, self.state, next
            )));
        }
        tracing::debug!("{} workflow: {:?} -> {:?}", self.kind, self.state, next);
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Moves to `Failed` when still in flight; terminal states are kept.
    pub fn fail(&mut self) {
        if self.allows(WorkflowState::Failed) {
            self.state = WorkflowState::Failed;
            self.history.push(WorkflowState::Failed);
            self.pending = self.pending.take().map(PendingTransaction::failed);
        }
    }

    fn record_submitted(&mut self, pending: PendingTransaction) -> Result<()> {
        self.advance(WorkflowState::Submitted)?;
        self.pending = Some(pending);
        Ok(())
    }

    fn record_confirmed(&mut self) -> Result<PendingTransaction> {
        self.advance(WorkflowState::Confirmed)?;
        let confirmed = self
            .pending
            .take()
            .map(PendingTransaction::confirmed)
            .ok_or_else(|| AppError::Internal("Confirmed without a transaction".to_string()))?;
        self.pending = Some(confirmed.clone());
        Ok(confirmed)
    }
}

/// Parses the user-entered ETH amount. Empty, non-numeric, non-positive or
/// sub-wei amounts are rejected.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InputInvalid("amount is empty".to_string()));
    }
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| AppError::InputInvalid(format!("not a number: {}", trimmed)))?;
    if amount <= Decimal::ZERO {
        return Err(AppError::InputInvalid(format!("not positive: {}", trimmed)));
    }
    // Trailing zeros are not precision.
    let amount = amount.normalize();
    if amount.scale() > ETHER_DECIMALS {
        return Err(AppError::InputInvalid(format!(
            "more than {} decimals: {}",
            ETHER_DECIMALS, trimmed
        )));
    }
    Ok(amount)
}

pub fn to_wei(amount: Decimal) -> Result<U256> {
    parse_ether(amount.to_string())
        .map_err(|e| AppError::InputInvalid(format!("cannot convert {} to wei: {}", amount, e)))
}

/// `minimum_usd / eth_price`, exact.
pub fn minimum_eth(minimum_usd: Decimal, eth_price: Decimal) -> Result<Decimal> {
    if eth_price <= Decimal::ZERO {
        return Err(AppError::BlockchainRPC(format!(
            "Invalid ETH price: {}",
            eth_price
        )));
    }
    minimum_usd
        .checked_div(eth_price)
        .ok_or_else(|| AppError::Internal("Minimum amount overflow".to_string()))
}

pub fn check_minimum(amount: Decimal, minimum_usd: Decimal, eth_price: Decimal) -> Result<()> {
    let minimum = minimum_eth(minimum_usd, eth_price)?;
    if amount < minimum {
        return Err(AppError::BelowMinimum {
            minimum_eth: minimum,
            minimum_usd: minimum_usd.normalize(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Confirmation {
    pub transaction: PendingTransaction,
    pub explorer_url: Option<String>,
}

/// Drives fund and withdraw submissions for the session current at call
/// time. No retries: every error ends the attempt.
pub struct TransactionWorkflow<'a> {
    wallet: &'a dyn WalletProvider,
    guard: NetworkGuard,
    confirmations: usize,
}

impl<'a> TransactionWorkflow<'a> {
    pub fn new(wallet: &'a dyn WalletProvider, guard: NetworkGuard, confirmations: usize) -> Self {
        Self {
            wallet,
            guard,
            confirmations: confirmations.max(1),
        }
    }

    pub async fn fund(
        &self,
        flow: &mut Workflow,
        session: &ContractSession,
        amount_input: &str,
    ) -> Result<Confirmation> {
        let result = self.run_fund(flow, session, amount_input).await;
        if let Err(e) = &result {
            tracing::warn!("Funding failed: {}", e);
            flow.fail();
        }
        result
    }

    async fn run_fund(
        &self,
        flow: &mut Workflow,
        session: &ContractSession,
        amount_input: &str,
    ) -> Result<Confirmation> {
        flow.advance(WorkflowState::Validating)?;
        self.guard.ensure_network(self.wallet).await?;
        let amount = parse_amount(amount_input)?;

        flow.advance(WorkflowState::Pricing)?;
        let (minimum_usd, eth_price) = try_join(
            session.contract().minimum_usd_decimal(self.wallet),
            session.price_feed().eth_usd(self.wallet),
        )
        .await?;
        check_minimum(amount, minimum_usd, eth_price)?;

        let value = to_wei(amount)?;
        tracing::info!("Funding {} ETH from {:?}", amount, session.account());
        let tx = session.contract().fund_tx(session.account(), value);
        self.submit_and_wait(flow, tx, TxKind::Fund).await
    }

    pub async fn withdraw(
        &self,
        flow: &mut Workflow,
        session: Option<&ContractSession>,
    ) -> Result<Confirmation> {
        let result = self.run_withdraw(flow, session).await;
        if let Err(e) = &result {
            tracing::warn!("Withdrawal failed: {}", e);
            flow.fail();
        }
        result
    }

    async fn run_withdraw(
        &self,
        flow: &mut Workflow,
        session: Option<&ContractSession>,
    ) -> Result<Confirmation> {
        flow.advance(WorkflowState::Validating)?;
        self.guard.ensure_network(self.wallet).await?;
        let session = session.ok_or(AppError::NotConnected)?;

        let balance = session
            .get_balance(self.wallet, session.account())
            .await?;
        if balance.is_zero() {
            return Err(AppError::Revert(ContractRevert::NoFundsAvailable));
        }
        // The local countdown only drives the display; the lock is read fresh.
        let remaining = session
            .get_time_remaining(self.wallet, session.account())
            .await?;
        if remaining > 0 {
            return Err(AppError::WithdrawalLocked(format_mm_ss(remaining)));
        }

        tracing::info!("Withdrawing {} wei to {:?}", balance, session.account());
        let tx = session.contract().withdraw_tx(session.account());
        self.submit_and_wait(flow, tx, TxKind::Withdraw).await
    }

    async fn submit_and_wait(
        &self,
        flow: &mut Workflow,
        tx: TransactionRequest,
        kind: TxKind,
    ) -> Result<Confirmation> {
        let hash = self.wallet.send_transaction(&tx).await?;
        flow.record_submitted(PendingTransaction::submitted(hash, kind))?;
        tracing::info!("{} transaction submitted: {:#x}", kind, hash);

        self.await_receipt(hash).await?;
        let transaction = flow.record_confirmed()?;
        tracing::info!("{} transaction confirmed: {:#x}", kind, hash);

        Ok(Confirmation {
            explorer_url: self.guard.target().explorer_tx_url(hash),
            transaction,
        })
    }

    async fn await_receipt(&self, hash: H256) -> Result<()> {
        let receipt = self
            .wallet
            .wait_for_confirmation(hash, self.confirmations)
            .await?
            .ok_or_else(|| {
                AppError::BlockchainRPC(format!("Transaction {:#x} was dropped", hash))
            })?;
        if receipt.status != Some(U64::from(1u64)) {
            return Err(AppError::Revert(ContractRevert::Unknown(String::new())));
        }
        Ok(())
    }
}
