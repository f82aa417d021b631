use crate::{
    constants::BANNER_TTL_TICKS,
    error::AppError,
    models::TxKind,
    services::ContractSession,
    ui::input_filter::AmountField,
    utils::display_ether,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectStatus {
    #[default]
    Connect,
    Connecting,
    SwitchingNetwork,
    Connected,
    WrongNetwork,
    InstallWallet,
}

impl ConnectStatus {
    /// Text of the connect button.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectStatus::Connect => "Connect",
            ConnectStatus::Connecting => "Connecting...",
            ConnectStatus::SwitchingNetwork => "Switching Network...",
            ConnectStatus::Connected => "Connected",
            ConnectStatus::WrongNetwork => "Wrong Network",
            ConnectStatus::InstallWallet => "Install Wallet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Alert,
    Error,
}

/// Transient message; gone after a few ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    ttl: u8,
}

impl Banner {
    fn new(kind: BannerKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            ttl: BANNER_TTL_TICKS,
        }
    }
}

/// Persistent status line, e.g. the last confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub message: String,
    pub link: Option<String>,
}

/// Everything the user sees. Rebuilt from the session after each event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub connect: ConnectStatus,
    pub amount: AmountField,
    balance: Option<String>,
    countdown: Option<String>,
    withdraw_enabled: bool,
    status: Option<StatusLine>,
    banner: Option<Banner>,
}

impl ViewState {
    pub fn balance(&self) -> Option<&str> {
        self.balance.as_deref()
    }

    pub fn countdown(&self) -> Option<&str> {
        self.countdown.as_deref()
    }

    pub fn withdraw_enabled(&self) -> bool {
        self.withdraw_enabled
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Balance, countdown and withdraw button from the current session;
    /// all cleared without one.
    pub fn sync_session(&mut self, session: Option<&ContractSession>) {
        match session {
            Some(session) => {
                self.balance = Some(format!("{} ETH", display_ether(session.balance())));
                self.countdown = session.timer().display();
                self.withdraw_enabled = !session.timer().withdraw_locked();
            }
            None => {
                self.balance = None;
                self.countdown = None;
                self.withdraw_enabled = false;
            }
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>, link: Option<String>) {
        self.status = Some(StatusLine {
            message: message.into(),
            link,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.banner = Some(Banner::new(BannerKind::Success, message));
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.banner = Some(Banner::new(BannerKind::Alert, message));
    }

    /// User rejections are shown as alerts, everything else as errors.
    pub fn error(&mut self, err: &AppError) {
        let kind = if err.is_user_rejection() {
            BannerKind::Alert
        } else {
            BannerKind::Error
        };
        self.banner = Some(Banner::new(kind, err.detail().message));
    }

    /// Fund/withdraw failure. Rejections and on-chain or RPC failures are
    /// named after the action; validation errors keep their own text.
    pub fn transaction_error(&mut self, kind: TxKind, err: &AppError) {
        let (rejected, failed) = match kind {
            TxKind::Fund => ("Transaction rejected by user", "Transaction failed"),
            TxKind::Withdraw => ("Withdrawal cancelled by user", "Withdrawal failed"),
        };
        match err {
            AppError::UserRejected => self.alert(rejected),
            AppError::Revert(_) | AppError::BlockchainRPC(_) | AppError::Internal(_) => {
                self.banner = Some(Banner::new(
                    BannerKind::Error,
                    format!("{}: {}", failed, err.detail().message),
                ));
            }
            _ => self.error(err),
        }
    }

    pub fn tick_banner(&mut self) {
        if let Some(banner) = self.banner.as_mut() {
            banner.ttl = banner.ttl.saturating_sub(1);
            if banner.ttl == 0 {
                self.banner = None;
            }
        }
    }
}
