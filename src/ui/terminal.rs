//! Line-oriented front-end: stdin commands in, one summary line per change
//! out.

use crate::ui::dispatcher::UiEvent;
use crate::ui::view::{BannerKind, ViewState};

pub const HELP: &str =
    "commands: connect | amount <text> | type <chars> | fund [amount] | withdraw | status | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Vec<UiEvent>),
    Status,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "connect" => Command::Dispatch(vec![UiEvent::ConnectClicked]),
        "amount" => Command::Dispatch(vec![UiEvent::AmountInput(rest.to_string())]),
        "type" => Command::Dispatch(vec![UiEvent::KeysTyped(rest.to_string())]),
        "fund" if rest.is_empty() => Command::Dispatch(vec![UiEvent::FundClicked]),
        "fund" => Command::Dispatch(vec![
            UiEvent::AmountInput(rest.to_string()),
            UiEvent::FundClicked,
        ]),
        "withdraw" => Command::Dispatch(vec![UiEvent::WithdrawClicked]),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "" => Command::Dispatch(Vec::new()),
        _ => Command::Unknown(line.to_string()),
    }
}

pub fn render(view: &ViewState) -> String {
    let mut out = format!("[{}]", view.connect.label());
    if let Some(balance) = view.balance() {
        out.push_str(&format!(" balance: {}", balance));
    }
    if let Some(countdown) = view.countdown() {
        out.push_str(&format!(" | withdrawal in {}", countdown));
    }
    out.push_str(if view.withdraw_enabled() {
        " | withdraw: ready"
    } else {
        " | withdraw: locked"
    });
    if !view.amount.value().is_empty() {
        out.push_str(&format!(" | amount: {}", view.amount.value()));
    }

    if let Some(status) = view.status() {
        out.push_str(&format!("\n  {}", status.message));
        if let Some(link) = &status.link {
            out.push_str(&format!(" {}", link));
        }
    }
    if let Some(banner) = view.banner() {
        let tag = match banner.kind {
            BannerKind::Success => "ok",
            BannerKind::Alert => "!",
            BannerKind::Error => "error",
        };
        out.push_str(&format!("\n  {}: {}", tag, banner.message));
    }
    out
}
