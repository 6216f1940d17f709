//! Buckets command - received totals per day or month

use anyhow::Result;
use colored::Colorize;
use dtrack_core::domain::BucketMetric;
use dtrack_core::services::logging::EVENT_COMMAND_EXECUTED;
use dtrack_core::services::{bucket_totals, bucket_trend, export_buckets_csv, format_currency};
use dtrack_core::{Granularity, LogEvent};

use super::{collect_snapshot, get_context, get_logger, log_event, resolve_now, SnapshotArgs};
use crate::output::{create_table, signed_change};

pub fn run(args: SnapshotArgs, granularity: Granularity, json: bool, csv: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    log_event(&logger, LogEvent::new(EVENT_COMMAND_EXECUTED).with_command("buckets"));

    let tz = ctx.timezone();
    let now = resolve_now(args.now.as_deref(), tz)?;
    let snapshot = collect_snapshot(&ctx, &args, now.timestamp_millis(), "buckets", &logger)?;
    let buckets = ctx.metrics_service.buckets(&snapshot.transactions, granularity, &tz);

    if csv {
        export_buckets_csv(&buckets, std::io::stdout().lock())?;
        return Ok(());
    }

    let totals = bucket_totals(&buckets);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "granularity": granularity,
                "buckets": buckets,
                "totals": totals,
                "trend": {
                    "totalReceived": bucket_trend(&buckets, BucketMetric::TotalReceived),
                    "transactionCount": bucket_trend(&buckets, BucketMetric::TransactionCount),
                },
            }))?
        );
        return Ok(());
    }

    if buckets.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!("{}", format!("Received per {}", granularity).bold());
    let mut table = create_table();
    table.set_header(vec!["Period", "Received", "Transactions"]);
    for bucket in &buckets {
        table.add_row(vec![
            bucket.period_key.clone(),
            format_currency(bucket.total_received),
            bucket.transaction_count.to_string(),
        ]);
    }
    table.add_row(vec![
        "Total".bold().to_string(),
        format_currency(totals.total_received),
        totals.transaction_count.to_string(),
    ]);
    println!("{}", table);

    println!(
        "Last {} vs previous: received {}, transactions {}",
        granularity,
        signed_change(bucket_trend(&buckets, BucketMetric::TotalReceived), false),
        signed_change(bucket_trend(&buckets, BucketMetric::TransactionCount), false),
    );

    Ok(())
}
