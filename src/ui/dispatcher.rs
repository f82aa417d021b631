use ethers::types::Address;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::{
    constants::{TIMER_TICK_SECS, WALLET_INSTALL_URL},
    error::{AppError, Result},
    integrations::WalletProvider,
    models::{Deployment, Network, TxKind},
    services::{
        network_guard::normalize_chain_id, Confirmation, ContractSession, NetworkGuard,
        TransactionWorkflow, Workflow,
    },
    ui::view::{ConnectStatus, ViewState},
};

/// External events the front-end reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ConnectClicked,
    /// Whole field value replaced (paste).
    AmountInput(String),
    /// Individual keystrokes into the amount field.
    KeysTyped(String),
    FundClicked,
    WithdrawClicked,
    ChainChanged(String),
    AccountsChanged(Vec<Address>),
    Tick,
}

/// Maps each event to a state transition. Owns the only session; every
/// handler runs to completion before the next event is dispatched.
pub struct App {
    wallet: Option<Arc<dyn WalletProvider>>,
    guard: NetworkGuard,
    deployment: &'static Deployment,
    confirmations: usize,
    session: Option<ContractSession>,
    view: ViewState,
}

impl App {
    pub fn new(
        wallet: Option<Arc<dyn WalletProvider>>,
        network: Network,
        confirmations: usize,
    ) -> Self {
        let deployment = network.deployment();
        Self {
            wallet,
            guard: NetworkGuard::new(deployment.chain),
            deployment,
            confirmations,
            session: None,
            view: ViewState::default(),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn session(&self) -> Option<&ContractSession> {
        self.session.as_ref()
    }

    pub async fn dispatch(&mut self, event: UiEvent) {
        tracing::debug!("Dispatching {:?}", event);
        match event {
            UiEvent::ConnectClicked => self.connect().await,
            UiEvent::AmountInput(text) => self.view.amount.set(&text),
            UiEvent::KeysTyped(keys) => self.view.amount.type_str(&keys),
            UiEvent::FundClicked => self.fund().await,
            UiEvent::WithdrawClicked => self.withdraw().await,
            UiEvent::ChainChanged(raw) => {
                match normalize_chain_id(&raw).map(|id| (id, Deployment::for_chain_id(id))) {
                    Ok((chain_id, Some(deployment))) => tracing::info!(
                        "Wallet chain changed to {} ({})",
                        chain_id,
                        deployment.chain.display_name
                    ),
                    Ok((chain_id, None)) => {
                        tracing::info!("Wallet chain changed to unsupported chain {}", chain_id)
                    }
                    Err(e) => tracing::warn!("{}", e),
                }
                self.sync_from_wallet().await;
            }
            UiEvent::AccountsChanged(accounts) => {
                tracing::info!("Wallet accounts changed: {:?}", accounts);
                self.sync_from_wallet().await;
            }
            UiEvent::Tick => self.tick(),
        }
    }

    fn wallet_missing(&mut self) {
        self.view.connect = ConnectStatus::InstallWallet;
        self.view.alert(format!(
            "{}: {}",
            AppError::WalletAbsent.detail().message,
            WALLET_INSTALL_URL
        ));
    }

    async fn connect(&mut self) {
        let Some(wallet) = self.wallet.clone() else {
            self.wallet_missing();
            return;
        };
        self.view.connect = ConnectStatus::Connecting;

        match self.guard.validate_network(wallet.as_ref()).await {
            Ok(true) => {}
            Ok(false) => {
                self.view.connect = ConnectStatus::SwitchingNetwork;
                match self.guard.switch_or_add_network(wallet.as_ref()).await {
                    Ok(true) => {}
                    Ok(false) => {
                        self.drop_session();
                        self.view.connect = ConnectStatus::WrongNetwork;
                        self.view
                            .alert(format!("Please switch to {}", self.guard.target().display_name));
                        return;
                    }
                    Err(e) => return self.connect_failed(&e),
                }
            }
            Err(e) => return self.connect_failed(&e),
        }

        if let Err(e) = wallet.request_accounts().await {
            return self.connect_failed(&AppError::from(e));
        }
        self.sync_from_wallet().await;
    }

    fn connect_failed(&mut self, err: &AppError) {
        tracing::warn!("Connect failed: {}", err);
        self.view.connect = ConnectStatus::Connect;
        self.view.error(err);
    }

    /// Re-derives connection state from the wallet itself; cached state is
    /// never trusted. The old session is dropped before any new read.
    pub async fn sync_from_wallet(&mut self) {
        let Some(wallet) = self.wallet.clone() else {
            self.view.connect = ConnectStatus::InstallWallet;
            return;
        };
        self.drop_session();

        let on_target = match self.guard.validate_network(wallet.as_ref()).await {
            Ok(valid) => valid,
            Err(e) => return self.connect_failed(&e),
        };
        let account = match wallet.current_account().await {
            Ok(account) => account,
            Err(e) => return self.connect_failed(&AppError::from(e)),
        };

        let status = match (account, on_target) {
            (None, _) => ConnectStatus::Connect,
            (Some(_), false) => ConnectStatus::WrongNetwork,
            (Some(_), true) => match ContractSession::initialize(wallet.as_ref(), self.deployment)
                .await
            {
                Ok(session) => {
                    self.session = Some(session);
                    ConnectStatus::Connected
                }
                Err(e) => {
                    tracing::warn!("Session initialization failed: {}", e);
                    self.view.error(&e);
                    ConnectStatus::Connect
                }
            },
        };
        self.view.connect = status;
        self.view.sync_session(self.session.as_ref());
    }

    fn drop_session(&mut self) {
        if let Some(old) = self.session.take() {
            tracing::debug!("Dropping session for {:?}", old.account());
        }
        self.view.sync_session(None);
    }

    async fn fund(&mut self) {
        let Some(wallet) = self.wallet.clone() else {
            return self.wallet_missing();
        };
        let Some(session) = self.session.as_ref() else {
            return self.view.error(&AppError::NotConnected);
        };
        let workflow = TransactionWorkflow::new(wallet.as_ref(), self.guard, self.confirmations);
        let mut flow = Workflow::new(TxKind::Fund);
        let result = workflow
            .fund(&mut flow, session, self.view.amount.value())
            .await;
        self.finish(wallet.as_ref(), TxKind::Fund, result).await;
    }

    async fn withdraw(&mut self) {
        let Some(wallet) = self.wallet.clone() else {
            return self.wallet_missing();
        };
        let workflow = TransactionWorkflow::new(wallet.as_ref(), self.guard, self.confirmations);
        let mut flow = Workflow::new(TxKind::Withdraw);
        let result = workflow.withdraw(&mut flow, self.session.as_ref()).await;
        self.finish(wallet.as_ref(), TxKind::Withdraw, result).await;
    }

    async fn finish(
        &mut self,
        wallet: &dyn WalletProvider,
        kind: TxKind,
        result: Result<Confirmation>,
    ) {
        match result {
            Ok(confirmation) => {
                let message = match kind {
                    TxKind::Fund => "Funding confirmed",
                    TxKind::Withdraw => "Withdrawal confirmed",
                };
                self.view.set_status(message, confirmation.explorer_url);
                self.view.success(message);
                if kind == TxKind::Fund {
                    self.view.amount.clear();
                }
                self.refresh_session(wallet).await;
            }
            // Wrong chain aborts without a banner; the session belonged to
            // the target chain and goes with it.
            Err(AppError::NetworkMismatch { .. }) => {
                self.drop_session();
                self.view.connect = ConnectStatus::WrongNetwork;
            }
            Err(e) => self.view.transaction_error(kind, &e),
        }
        self.view.sync_session(self.session.as_ref());
    }

    async fn refresh_session(&mut self, wallet: &dyn WalletProvider) {
        let Some(current) = self.session.as_ref() else {
            return;
        };
        let refreshed = current.refresh(wallet).await;
        match refreshed {
            Ok(session) => self.session = Some(session),
            Err(e) => {
                tracing::warn!("Session refresh failed: {}", e);
                self.view.error(&e);
            }
        }
    }

    fn tick(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.tick();
        }
        self.view.sync_session(self.session.as_ref());
        self.view.tick_banner();
    }
}

/// One-second countdown ticker. Ticks that fall due while a handler awaits
/// the wallet are skipped, never replayed; the caller resets it after such
/// handlers so a freshly read lock is not decremented for time already spent.
pub fn countdown_ticker() -> Interval {
    let mut ticker = interval(Duration::from_secs(TIMER_TICK_SECS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Stands in for the wallet's `chainChanged`/`accountsChanged`
/// subscriptions by polling and diffing.
#[derive(Debug, Default)]
pub struct WalletWatcher {
    chain_id: Option<String>,
    accounts: Option<Vec<Address>>,
}

impl WalletWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events for whatever changed since the last poll. The first poll
    /// only records a baseline.
    pub async fn poll(&mut self, wallet: &dyn WalletProvider) -> Vec<UiEvent> {
        let mut events = Vec::new();

        match wallet.chain_id().await {
            Ok(chain_id) => {
                if let Some(previous) = self.chain_id.replace(chain_id.clone()) {
                    if previous != chain_id {
                        events.push(UiEvent::ChainChanged(chain_id));
                    }
                }
            }
            Err(e) => tracing::warn!("Failed to poll chain id: {}", e),
        }

        match wallet.accounts().await {
            Ok(accounts) => {
                if let Some(previous) = self.accounts.replace(accounts.clone()) {
                    if previous != accounts {
                        events.push(UiEvent::AccountsChanged(accounts));
                    }
                }
            }
            Err(e) => tracing::warn!("Failed to poll accounts: {}", e),
        }

        events
    }
}
