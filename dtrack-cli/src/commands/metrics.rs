//! Metrics command - dashboard figures for a transaction snapshot

use anyhow::Result;
use colored::Colorize;
use dtrack_core::services::format_currency;
use dtrack_core::services::logging::{EVENT_COMMAND_EXECUTED, EVENT_METRICS_COMPUTED};
use dtrack_core::{FinancialMetrics, LogEvent};

use super::{collect_snapshot, get_context, get_logger, log_event, resolve_now, SnapshotArgs};
use crate::output::{create_table, signed_change};

pub fn run(args: SnapshotArgs, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    log_event(&logger, LogEvent::new(EVENT_COMMAND_EXECUTED).with_command("metrics"));

    let now = resolve_now(args.now.as_deref(), ctx.timezone())?;
    let snapshot = collect_snapshot(&ctx, &args, now.timestamp_millis(), "metrics", &logger)?;
    let metrics = ctx.metrics_service.financial_metrics(&snapshot.transactions, &now);

    log_event(
        &logger,
        LogEvent::new(EVENT_METRICS_COMPUTED)
            .with_command("metrics")
            .with_count(snapshot.transactions.len()),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Financial Overview".bold(),
        format!("(as of {})", now.format("%Y-%m-%d %H:%M %:z")).dimmed()
    );
    println!();
    print_summary(&metrics);
    print_revenue_chart(&metrics);
    print_frequency(&metrics);

    Ok(())
}

fn print_summary(metrics: &FinancialMetrics) {
    let mut table = create_table();
    table.set_header(vec!["", "Total", "vs last month"]);

    table.add_row(vec![
        "Total Revenue".to_string(),
        format_currency(metrics.total_revenue),
        signed_change(metrics.total_revenue_change, false),
    ]);
    table.add_row(vec![
        "Net Profit".to_string(),
        format_currency(metrics.net_profit),
        signed_change(metrics.net_profit_change, false),
    ]);
    table.add_row(vec![
        "Total Expenses".to_string(),
        format_currency(metrics.total_expenses),
        // expenses are negative: a drop is good news
        signed_change(metrics.total_expenses_change, true),
    ]);
    println!("{}", table);
    println!();

    let mut split = create_table();
    split.set_header(vec!["Revenue source", "Total"]);
    for slice in &metrics.revenue_breakdown {
        split.add_row(vec![slice.name.clone(), format_currency(slice.value)]);
    }
    split.add_row(vec![
        "On-chain transactions".to_string(),
        metrics.total_on_chain_transactions.to_string(),
    ]);
    println!("{}", split);
    println!();
}

fn print_revenue_chart(metrics: &FinancialMetrics) {
    println!("{}", "On-chain revenue, last 6 months".bold());
    let mut table = create_table();
    table.set_header(vec!["Month", "Revenue"]);
    for point in &metrics.on_chain_revenue_chart {
        table.add_row(vec![point.name.clone(), format_currency(point.on_chain_revenue)]);
    }
    println!("{}", table);
    println!();
}

fn print_frequency(metrics: &FinancialMetrics) {
    if metrics.monthly_frequency.is_empty() {
        println!("No inbound on-chain transactions.");
        return;
    }

    println!("{}", "Inbound on-chain transactions".bold());
    let mut table = create_table();
    table.set_header(vec!["Month", "Count"]);
    for point in &metrics.monthly_frequency {
        table.add_row(vec![point.name.clone(), point.count.to_string()]);
    }
    println!("{}", table);

    let weeks = metrics
        .weekly_frequency
        .iter()
        .map(|p| format!("{}: {}", p.name, p.count))
        .collect::<Vec<_>>()
        .join(", ");
    println!("By ISO week: {}", weeks);
}
