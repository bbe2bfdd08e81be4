//! Cache Replay - drives a cache with a trace read from stdin
//!
//! Configuration comes from `CACHE_CAPACITY` and `CACHE_POLICY`; see
//! [`policy_cache::replay`] for the trace format. Results go to stdout, logs
//! to stderr.

use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use policy_cache::replay;
use policy_cache::{Cache, Config};

/// Main entry point for the replay driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache, rejecting a non-positive capacity
/// 4. Apply each trace line in order
/// 5. Print final statistics
fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "policy_cache=info,cache_replay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        capacity = config.capacity,
        policy = %config.policy,
        "Configuration loaded"
    );

    let mut cache: Cache<String, String> =
        Cache::from_config(&config).context("cannot build cache from configuration")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let applied = replay::run(&mut cache, stdin.lock(), &mut out)?;

    let stats = cache.stats();
    info!(
        commands = applied,
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        hit_rate = stats.hit_rate(),
        "Replay complete"
    );
    Ok(())
}
