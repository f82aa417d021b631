/// Application constants
use crate::models::network::{ChainDescriptor, Deployment, NativeCurrency};

// Chains
pub const SEPOLIA: ChainDescriptor = ChainDescriptor {
    chain_id: 11_155_111, // 0xaa36a7
    display_name: "Sepolia Test Network",
    native_currency: NativeCurrency {
        name: "Sepolia ETH",
        symbol: "ETH",
        decimals: 18,
    },
    rpc_urls: &["https://rpc.sepolia.org"],
    explorer_urls: &["https://sepolia.etherscan.io"],
};

pub const OPTIMISM_SEPOLIA: ChainDescriptor = ChainDescriptor {
    chain_id: 11_155_420, // 0xaa37dc
    display_name: "OP Sepolia Testnet",
    native_currency: NativeCurrency {
        name: "Optimism Sepolia ETH",
        symbol: "ETH",
        decimals: 18,
    },
    rpc_urls: &["https://sepolia.optimism.io"],
    explorer_urls: &["https://sepolia-optimistic.etherscan.io"],
};

// Deployed FundMe contracts and their Chainlink ETH/USD feeds
pub const SEPOLIA_DEPLOYMENT: Deployment = Deployment {
    chain: &SEPOLIA,
    fund_me_address: "0xdadaD79811F69c8F520f18d2b6B04F7f25ED467d",
    price_feed_address: "0x694AA1769357215DE4FAC081bf1f309aDC325306",
};

pub const OPTIMISM_SEPOLIA_DEPLOYMENT: Deployment = Deployment {
    chain: &OPTIMISM_SEPOLIA,
    fund_me_address: "0x847FfbeCFe0bD5a40F5f29351bB4f471D51F2853",
    price_feed_address: "0x61Ec26aA57019C486B10502285c5A3D4A4750AD7",
};

pub const DEPLOYMENTS: [&Deployment; 2] = [&SEPOLIA_DEPLOYMENT, &OPTIMISM_SEPOLIA_DEPLOYMENT];

// Fixed-point scales
pub const MINIMUM_USD_DECIMALS: u32 = 6;
pub const PRICE_FEED_DECIMALS: u32 = 8;
pub const ETHER_DECIMALS: u32 = 18;

// EIP-1193 provider error codes
pub const USER_REJECTED_CODE: i64 = 4001;
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

pub const WALLET_INSTALL_URL: &str = "https://metamask.io";

// UI timing
pub const TIMER_TICK_SECS: u64 = 1;
pub const BANNER_TTL_TICKS: u8 = 3;

// Defaults for tunables read from the environment
pub const DEFAULT_CHAIN_POLL_INTERVAL_SECS: u64 = 4;
pub const DEFAULT_TX_CONFIRMATIONS: usize = 1;
pub const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 2_000;
