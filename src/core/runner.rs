//! # Invoke the operation once.
//!
//! [`invoke`] is the single entry point workers and the resolver use to run the
//! user [`Operation`] on one item.
//!
//! - **Derive a child token** from the pool lifetime token and hand it to the operation
//! - **Apply the timeout** if configured (wraps execution in `tokio::time::timeout`)
//! - **Race pool shutdown**, dropping the in-flight invocation when it fires
//! - **Catch panics** and report them as ordinary failures
//!
//! ## Outcome mapping
//! ```text
//! Ok(())                          → Ok(())
//! Err(Fail)                       → Err(Fail)
//! timeout exceeded                → cancel child → publish TimeoutHit → Err(Timeout)
//! panic                           → Err(Fail { "panicked: .." })
//! pool shutdown                   → Err(Canceled)
//! Err(Canceled) without shutdown  → Err(Fail)
//! ```

use std::time::Duration;

use futures::FutureExt;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    error::OperationError,
    events::{Bus, Event, EventKind},
    ops::{Item, Operation},
};

/// Where an invocation happens; used to tag events.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Site {
    pub generation: u64,
}

/// Runs `op` on `item` once.
///
/// Only returns [`OperationError::Canceled`] when `shutdown` is cancelled.
pub(crate) async fn invoke<T: Item>(
    op: &dyn Operation<T>,
    item: &T,
    shutdown: &CancellationToken,
    timeout: Option<Duration>,
    site: Site,
    bus: &Bus,
) -> Result<(), OperationError> {
    let child = shutdown.child_token();

    let call = async {
        let run = std::panic::AssertUnwindSafe(op.run(item, child.clone())).catch_unwind();
        let res = match timeout.filter(|d| *d > Duration::ZERO) {
            Some(dur) => match time::timeout(dur, run).await {
                Ok(r) => r,
                Err(_elapsed) => {
                    child.cancel();
                    publish_timeout(bus, op.name(), dur, site);
                    return Err(OperationError::Timeout { timeout: dur });
                }
            },
            None => run.await,
        };
        res.unwrap_or_else(|panic_err| Err(OperationError::fail(panic_message(&*panic_err))))
    };

    let res = tokio::select! {
        biased;
        _ = shutdown.cancelled() => return Err(OperationError::Canceled),
        res = call => res,
    };

    match res {
        Err(OperationError::Canceled) if !shutdown.is_cancelled() => Err(OperationError::fail(
            "operation reported cancellation outside shutdown",
        )),
        other => other,
    }
}

fn panic_message(panic_err: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic_err.downcast_ref::<&'static str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = panic_err.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}

fn publish_timeout(bus: &Bus, name: &str, dur: Duration, site: Site) {
    bus.publish(
        Event::new(EventKind::TimeoutHit)
            .with_operation(name)
            .with_generation(site.generation)
            .with_timeout(dur),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::OperationFn;

    const SITE: Site = Site { generation: 1 };

    #[tokio::test(start_paused = true)]
    async fn timeout_becomes_failure_and_is_published() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let op = OperationFn::new("slow", |_: u8, _ctx: CancellationToken| async {
            time::sleep(Duration::from_secs(10)).await;
            Ok::<(), OperationError>(())
        });

        let res = invoke(
            &op,
            &1u8,
            &CancellationToken::new(),
            Some(Duration::from_millis(50)),
            SITE,
            &bus,
        )
        .await;

        assert_eq!(
            res,
            Err(OperationError::Timeout {
                timeout: Duration::from_millis(50)
            })
        );
        let ev = rx.recv().await.expect("timeout event");
        assert_eq!(ev.kind, EventKind::TimeoutHit);
        assert_eq!(ev.timeout_ms, Some(50));
    }

    #[tokio::test]
    async fn panic_is_reported_as_failure() {
        let op = OperationFn::new("panics", |n: u8, _ctx: CancellationToken| async move {
            if n > 0 {
                panic!("kaboom");
            }
            Ok::<(), OperationError>(())
        });

        let res = invoke(&op, &1u8, &CancellationToken::new(), None, SITE, &Bus::new(1)).await;
        assert_eq!(res, Err(OperationError::fail("panicked: kaboom")));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_aborts_in_flight_invocation() {
        let shutdown = CancellationToken::new();
        let op = OperationFn::new("stuck", |_: u8, _ctx: CancellationToken| async {
            std::future::pending::<()>().await;
            Ok::<(), OperationError>(())
        });

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let res = invoke(&op, &1u8, &shutdown, None, SITE, &Bus::new(1)).await;
        assert_eq!(res, Err(OperationError::Canceled));
    }

    #[tokio::test]
    async fn self_reported_cancel_outside_shutdown_is_a_failure() {
        let op = OperationFn::new("liar", |_: u8, _ctx: CancellationToken| async {
            Err::<(), _>(OperationError::Canceled)
        });

        let res = invoke(&op, &1u8, &CancellationToken::new(), None, SITE, &Bus::new(1)).await;
        assert!(matches!(res, Err(OperationError::Fail { .. })));
    }
}
