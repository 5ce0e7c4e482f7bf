//! Structured logging setup and domain-specific log helpers. Console
//! output stays compact for interactive use; when `logging.log_dir` names a
//! directory, a second JSON layer writes daily-rolled files for offline
//! analysis.

use std::fs;

use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Initializes the global subscriber. Must be called at most once per
/// process; a second call is a programmer error in the host binary, not
/// something this crate guards against.
pub fn init_logger(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact();

    match &config.log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "pool-state-engine.log");
            let file_layer = fmt::layer()
                .with_writer(file_appender)
                .json()
                .with_target(false)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true);
            registry.with(console_layer).with(file_layer).init();
        }
        None => {
            registry.with(console_layer).init();
        }
    }

    info!("logger initialized");
    Ok(())
}

/// A cache write was rejected as stale — logged at debug rather than warn
/// since out-of-order delivery from the ingress transport is routine, not
/// exceptional.
pub fn log_cache_rejection(
    cache_type: &str,
    pubkey: &str,
    candidate_slot: u64,
    existing_slot: u64,
    existing_write_version: u64,
) {
    tracing::debug!(
        cache_type = cache_type,
        pubkey = pubkey,
        candidate_slot = candidate_slot,
        existing_slot = existing_slot,
        existing_write_version = existing_write_version,
        "cache write rejected as stale"
    );
}

/// A pool's lifecycle state changed.
pub fn log_topology_transition(pool: &str, from: &str, to: &str, reason: Option<&str>, slot: u64) {
    info!(
        pool = pool,
        from = from,
        to = to,
        reason = reason.unwrap_or("n/a"),
        slot = slot,
        "topology transition"
    );
}

/// A decode attempt failed at the decoder boundary. The account is
/// unaffected — this is purely observability for the rejected buffer.
pub fn log_decode_failure(owner: &str, pubkey: &str, data_length: usize, error: &str) {
    warn!(
        owner = owner,
        pubkey = pubkey,
        data_length = data_length,
        error = error,
        "account decode failed"
    );
}

/// A completed quote request, successful or not.
pub fn log_quote(pool: &str, amount_in: u64, direction: &str, outcome: Result<u64, &str>) {
    match outcome {
        Ok(amount_out) => info!(
            pool = pool,
            amount_in = amount_in,
            direction = direction,
            amount_out = amount_out,
            "quote computed"
        ),
        Err(error) => warn!(
            pool = pool,
            amount_in = amount_in,
            direction = direction,
            error = error,
            "quote failed"
        ),
    }
}

/// Surfaces the BUY-side fee-placement ambiguity: whether the protocol
/// cut of a buy's input-side fee is 5 bps (25 bps total) or 4 bps (24 bps
/// total) is not observable from on-chain state alone. Rather than pick
/// silently, every buy quote logs the fee actually applied against what a
/// 1-bps-lower rate would have taken, so the residual is there to review.
pub fn log_buy_fee_placement_residual(
    pool: &str,
    amount_in: u64,
    applied_trade_bps: u64,
    fee_in: u64,
    residual_at_one_bps_lower: u64,
) {
    tracing::debug!(
        pool = pool,
        amount_in = amount_in,
        applied_trade_bps = applied_trade_bps,
        fee_in = fee_in,
        residual_at_one_bps_lower = residual_at_one_bps_lower,
        "buy fee placement diagnostic"
    );
}

/// A tick/bin array update landed outside a pool's frozen coverage window.
/// Informational only — it does not by itself invalidate the topology.
pub fn log_out_of_frozen_range(pool: &str, cache_type: &str, index: i64) {
    tracing::debug!(
        pool = pool,
        cache_type = cache_type,
        index = index,
        "update outside frozen coverage window"
    );
}
