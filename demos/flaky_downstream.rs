//! # Example: flaky_downstream
//!
//! Demonstrates how a [`Pool`] degrades to a single serial resolver while its
//! downstream is unavailable, and expands back to full parallelism once it recovers.
//!
//! The "downstream" goes away for item 7 and stays down for two more calls.
//!
//! ## Flow
//! ```text
//! Pool::start()
//!   ├─► GenerationStarted(gen=1)     4 workers
//!   ├─► item 7 → Err("connection refused")
//!   ├─► WorkerFailed / ItemRequeued
//!   ├─► GenerationStopped(gen=1)
//!   ├─► ResolverEngaged
//!   │     ├─► pace(1) ≈100ms → Err → ResolverAttemptFailed
//!   │     ├─► pace(2) ≈200ms → Err → ResolverAttemptFailed
//!   │     └─► pace(3) ≈400ms → Ok  → Resolved
//!   ├─► GenerationStarted(gen=2)
//!   └─► token.cancel() → ShutdownRequested → PoolStopped
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example flaky_downstream --features logging
//! ```

use std::{
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use degrade_pool::{
    BackoffPolicy, JitterPolicy, LogWriter, OperationError, OperationFn, Pool, PoolConfig,
    Subscribe,
};
use tokio_util::sync::CancellationToken;

static OUTAGE: AtomicU32 = AtomicU32::new(0);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Configure the pool (4 workers, 2s per call, 5s grace period)
    let cfg = PoolConfig {
        parallelism: 4,
        timeout: Duration::from_secs(2),
        grace: Duration::from_secs(5),
        ..PoolConfig::default()
    };

    // 2. Print every pool event
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];

    // 3. Define the operation: item 7 knocks the downstream over for three calls
    let store = OperationFn::arc("store", |n: u32, _ctx: CancellationToken| async move {
        if n == 7 {
            OUTAGE.compare_exchange(0, 3, Ordering::SeqCst, Ordering::SeqCst).ok();
        }
        let down = OUTAGE
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if down {
            return Err(OperationError::fail("connection refused"));
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        println!("[store] item {n} stored");
        Ok(())
    });

    // 4. Resolver pacing (exponential * jitter)
    let backoff = BackoffPolicy {
        first: Duration::from_millis(100),
        max: Duration::from_secs(2),
        factor: 2.0,
        jitter: JitterPolicy::Equal,
    };

    // 5. Build and start
    let token = CancellationToken::new();
    let pool = Pool::<u32>::builder(token.clone(), store, Arc::new(backoff))
        .with_config(cfg)
        .with_subscribers(subs)
        .build()?;
    pool.start()?;

    // 6. Produce items, then shut down
    for n in 0..20 {
        pool.push(n).await;
    }
    tokio::time::sleep(Duration::from_secs(2)).await;

    token.cancel();
    pool.join().await?;

    println!("[main] done after {} generations.", pool.generation());
    Ok(())
}
