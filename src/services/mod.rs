// Chain-facing services
pub mod contract_errors;
pub mod contract_session;
pub mod network_guard;
pub mod price_feed;
pub mod transaction_workflow;
pub mod withdrawal_timer;

// Re-export for convenience
pub use contract_session::{ContractSession, FundMeContract};
pub use network_guard::NetworkGuard;
pub use transaction_workflow::{Confirmation, TransactionWorkflow, Workflow};
