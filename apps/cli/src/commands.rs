//! Runs one cart operation and renders the result.

use std::fmt::Write as _;

use rocketshoes_cart::{CartSnapshot, CartStore, LoadOutcome};
use rocketshoes_core::{AmountUpdate, Notice, ProductId};
use rocketshoes_inventory::InventoryService;
use rocketshoes_storage::KeyValueStore;
use serde::Serialize;
use tokio::sync::broadcast::error::TryRecvError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Show,
    Add(ProductId),
    Remove(ProductId),
    Update(AmountUpdate),
}

/// What the user sees after a command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub snapshot: CartSnapshot,
    pub notices: Vec<Notice>,
    /// Set when the stored cart had to be discarded at start-up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_reason: Option<String>,
}

/// Runs `command` against the store and collects the notices it emitted.
///
/// Operation failures are not returned; they reach the user as notices.
pub async fn execute<I, S>(store: &CartStore<I, S>, command: Command) -> Report
where
    I: InventoryService,
    S: KeyValueStore,
{
    let mut notices = store.subscribe_notices();

    let _ = match command {
        Command::Show => Ok(store.snapshot()),
        Command::Add(id) => store.add_product(id).await,
        Command::Remove(id) => store.remove_product(id).await,
        Command::Update(update) => store.update_product_amount(update).await,
    };

    let reset_reason = match store.load_outcome() {
        LoadOutcome::Recovered(e) => Some(e.to_string()),
        _ => None,
    };

    Report {
        snapshot: store.snapshot(),
        notices: drain(&mut notices),
        reset_reason,
    }
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<Notice>) -> Vec<Notice> {
    let mut out = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(notice) => out.push(notice),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return out,
        }
    }
}

/// Plain-text rendering for a terminal.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let cart = &report.snapshot.cart;

    if let Some(ref reason) = report.reset_reason {
        let _ = writeln!(out, "! Stored cart was discarded ({})", reason);
    }

    if cart.is_empty() {
        out.push_str("Cart is empty\n");
    } else {
        let totals = cart.totals();
        let _ = writeln!(
            out,
            "Cart: {} products, {} items",
            totals.item_count, totals.total_quantity
        );
        for product in cart {
            let _ = writeln!(
                out,
                "  #{:<6} {:<32} x {}",
                product.id.get(),
                product.title().unwrap_or("-"),
                product.amount
            );
        }
    }

    for notice in &report.notices {
        let _ = writeln!(out, "! {}", notice);
    }

    out
}

pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
