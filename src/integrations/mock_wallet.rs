//! Scripted in-memory wallet for exercising the connect and transaction
//! flows without a real provider. Every request is recorded by method name.

use async_trait::async_trait;
use ethers::abi::{AbiEncode, Token};
use ethers::types::{
    Address, Bytes, TransactionReceipt, TransactionRequest, H256, I256, U256, U64,
};
use std::sync::Mutex;

use crate::models::AddChainParams;

use super::wallet::{WalletProvider, WalletResult, WalletRpcError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchBehavior {
    Accept,
    Reject,
    UnknownChain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddBehavior {
    Accept,
    Reject,
    Fail,
}

type CallResponse = WalletResult<Bytes>;

struct MockState {
    chain_id: u64,
    accounts: Vec<Address>,
    authorized: bool,
    reject_accounts: bool,
    switch: SwitchBehavior,
    add: AddBehavior,
    // Matched by calldata prefix; later entries win.
    responses: Vec<(Vec<u8>, CallResponse)>,
    after_send: Vec<(Vec<u8>, CallResponse)>,
    send_error: Option<WalletRpcError>,
    receipt_status: u64,
    dropped: bool,
    next_hash: u8,
    requests: Vec<String>,
    sent: Vec<TransactionRequest>,
}

pub struct MockWallet {
    state: Mutex<MockState>,
}

pub fn account(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn encode_uint(value: U256) -> Bytes {
    Bytes::from(value.encode())
}

/// `latestRoundData()` return data with the given answer.
pub fn encode_round(answer: I256) -> Bytes {
    Bytes::from(ethers::abi::encode(&[
        Token::Uint(U256::from(1u64)),
        Token::Int(answer.into_raw()),
        Token::Uint(U256::from(1_700_000_000u64)),
        Token::Uint(U256::from(1_700_000_000u64)),
        Token::Uint(U256::from(1u64)),
    ]))
}

pub fn revert_with(selector: [u8; 4]) -> WalletRpcError {
    WalletRpcError::new(3, "execution reverted").with_revert_data(Bytes::from(selector.to_vec()))
}

pub fn rejection() -> WalletRpcError {
    WalletRpcError::new(4001, "User rejected the request.")
}

impl MockWallet {
    /// Wallet on `chain_id` holding a single account; not yet authorized.
    pub fn on_chain(chain_id: u64) -> Self {
        Self {
            state: Mutex::new(MockState {
                chain_id,
                accounts: vec![account(0x11)],
                authorized: false,
                reject_accounts: false,
                switch: SwitchBehavior::Accept,
                add: AddBehavior::Accept,
                responses: Vec::new(),
                after_send: Vec::new(),
                send_error: None,
                receipt_status: 1,
                dropped: false,
                next_hash: 1,
                requests: Vec::new(),
                sent: Vec::new(),
            }),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut guard = self.state.lock().expect("mock wallet lock");
        f(&mut guard)
    }

    pub fn authorized(self) -> Self {
        self.with_state(|s| s.authorized = true);
        self
    }

    pub fn set_chain(&self, chain_id: u64) {
        self.with_state(|s| s.chain_id = chain_id);
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.with_state(|s| s.accounts = accounts);
    }

    pub fn reject_accounts(&self) {
        self.with_state(|s| s.reject_accounts = true);
    }

    pub fn set_switch(&self, behavior: SwitchBehavior) {
        self.with_state(|s| s.switch = behavior);
    }

    pub fn set_add(&self, behavior: AddBehavior) {
        self.with_state(|s| s.add = behavior);
    }

    pub fn respond(&self, calldata_prefix: impl Into<Vec<u8>>, response: CallResponse) {
        let prefix = calldata_prefix.into();
        self.with_state(|s| s.responses.push((prefix, response)));
    }

    /// Response that takes effect once a transaction has been sent.
    pub fn respond_after_send(&self, calldata_prefix: impl Into<Vec<u8>>, response: CallResponse) {
        let prefix = calldata_prefix.into();
        self.with_state(|s| s.after_send.push((prefix, response)));
    }

    pub fn fail_send(&self, err: WalletRpcError) {
        self.with_state(|s| s.send_error = Some(err));
    }

    pub fn fail_receipt(&self) {
        self.with_state(|s| s.receipt_status = 0);
    }

    pub fn drop_transactions(&self) {
        self.with_state(|s| s.dropped = true);
    }

    pub fn count(&self, method: &str) -> usize {
        self.with_state(|s| s.requests.iter().filter(|m| m.as_str() == method).count())
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.with_state(|s| s.sent.clone())
    }

    pub fn chain(&self) -> u64 {
        self.with_state(|s| s.chain_id)
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> WalletResult<Vec<Address>> {
        self.with_state(|s| {
            s.requests.push("eth_requestAccounts".to_string());
            if s.reject_accounts {
                return Err(rejection());
            }
            s.authorized = true;
            Ok(s.accounts.clone())
        })
    }

    async fn accounts(&self) -> WalletResult<Vec<Address>> {
        self.with_state(|s| {
            s.requests.push("eth_accounts".to_string());
            Ok(if s.authorized { s.accounts.clone() } else { Vec::new() })
        })
    }

    async fn chain_id(&self) -> WalletResult<String> {
        self.with_state(|s| {
            s.requests.push("eth_chainId".to_string());
            Ok(format!("0x{:x}", s.chain_id))
        })
    }

    async fn switch_chain(&self, chain_id_hex: &str) -> WalletResult<()> {
        self.with_state(|s| {
            s.requests.push("wallet_switchEthereumChain".to_string());
            match s.switch {
                SwitchBehavior::Accept => {
                    s.chain_id = u64::from_str_radix(chain_id_hex.trim_start_matches("0x"), 16)
                        .expect("hex chain id");
                    Ok(())
                }
                SwitchBehavior::Reject => Err(rejection()),
                SwitchBehavior::UnknownChain => {
                    Err(WalletRpcError::new(4902, "Unrecognized chain ID"))
                }
            }
        })
    }

    async fn add_chain(&self, params: &AddChainParams) -> WalletResult<()> {
        self.with_state(|s| {
            s.requests.push("wallet_addEthereumChain".to_string());
            match s.add {
                AddBehavior::Accept => {
                    s.chain_id =
                        u64::from_str_radix(params.chain_id.trim_start_matches("0x"), 16)
                            .expect("hex chain id");
                    s.switch = SwitchBehavior::Accept;
                    Ok(())
                }
                AddBehavior::Reject => Err(rejection()),
                AddBehavior::Fail => Err(WalletRpcError::new(-32603, "Internal error")),
            }
        })
    }

    async fn call(&self, tx: &TransactionRequest) -> WalletResult<Bytes> {
        self.with_state(|s| {
            s.requests.push("eth_call".to_string());
            let data = tx.data.clone().unwrap_or_default();
            s.responses
                .iter()
                .rev()
                .find(|(prefix, _)| data.as_ref().starts_with(prefix))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| Err(WalletRpcError::new(-32000, "no scripted response")))
        })
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> WalletResult<H256> {
        self.with_state(|s| {
            s.requests.push("eth_sendTransaction".to_string());
            if let Some(err) = s.send_error.clone() {
                return Err(err);
            }
            s.sent.push(tx.clone());
            let pending = std::mem::take(&mut s.after_send);
            s.responses.extend(pending);
            let hash = H256::repeat_byte(s.next_hash);
            s.next_hash = s.next_hash.wrapping_add(1);
            Ok(hash)
        })
    }

    async fn wait_for_confirmation(
        &self,
        tx_hash: H256,
        _confirmations: usize,
    ) -> WalletResult<Option<TransactionReceipt>> {
        self.with_state(|s| {
            s.requests.push("eth_getTransactionReceipt".to_string());
            if s.dropped {
                return Ok(None);
            }
            Ok(Some(TransactionReceipt {
                transaction_hash: tx_hash,
                status: Some(U64::from(s.receipt_status)),
                ..Default::default()
            }))
        })
    }
}
