// Terminal front-end: event dispatch and rendering
pub mod dispatcher;
pub mod input_filter;
pub mod terminal;
pub mod view;

pub use dispatcher::{countdown_ticker, App, UiEvent, WalletWatcher};
