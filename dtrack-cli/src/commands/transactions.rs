//! Transactions command - list the merged transaction snapshot

use anyhow::Result;
use colored::Colorize;
use dtrack_core::services::logging::EVENT_COMMAND_EXECUTED;
use dtrack_core::services::{export_transactions_csv, format_currency, truncate_principal};
use dtrack_core::LogEvent;

use super::{collect_snapshot, get_context, get_logger, log_event, resolve_now, SnapshotArgs};
use crate::output::{create_table, format_timestamp};

pub fn run(args: SnapshotArgs, limit: Option<usize>, json: bool, csv: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    log_event(&logger, LogEvent::new(EVENT_COMMAND_EXECUTED).with_command("transactions"));

    let tz = ctx.timezone();
    let now = resolve_now(args.now.as_deref(), tz)?;
    let snapshot = collect_snapshot(&ctx, &args, now.timestamp_millis(), "transactions", &logger)?;

    let shown = match limit {
        Some(n) => &snapshot.transactions[..n.min(snapshot.transactions.len())],
        None => &snapshot.transactions[..],
    };

    if csv {
        export_transactions_csv(shown, &tz, std::io::stdout().lock())?;
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Date", "Account", "Label", "Amount", "ID"]);
    for tx in shown {
        let amount = format_currency(tx.amount_usd);
        let amount = if tx.is_inbound() {
            amount.green().to_string()
        } else {
            amount
        };
        let label = if tx.is_custom {
            format!("{} {}", tx.label, "(custom)".dimmed())
        } else {
            tx.label.clone()
        };
        table.add_row(vec![
            format_timestamp(tx.timestamp_ms, &tz),
            truncate_principal(&tx.account_label),
            label,
            amount,
            truncate_principal(&tx.id),
        ]);
    }
    println!("{}", table);

    if shown.len() < snapshot.transactions.len() {
        println!(
            "{}",
            format!("Showing {} of {} transactions", shown.len(), snapshot.transactions.len()).dimmed()
        );
    }

    Ok(())
}
