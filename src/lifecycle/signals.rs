//! OS signal handling.
//!
//! SIGINT and SIGTERM (ctrl-c elsewhere) trigger shutdown. The loop stops at
//! its next check point, which may be a full probe deadline away; a second
//! signal exits the process immediately.

use tokio::sync::mpsc;

use crate::lifecycle::Shutdown;

/// Exit status used when a second signal forces the process down.
pub const FORCED_EXIT_CODE: i32 = 130;

/// Spawn a task that triggers `shutdown` on the first termination signal
/// and exits the process on the second.
pub fn spawn_signal_handler(shutdown: Shutdown) -> tokio::task::JoinHandle<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(forward_signals(tx));

    tokio::spawn(async move {
        if escalate(&shutdown, rx).await {
            std::process::exit(FORCED_EXIT_CODE);
        }
    })
}

/// Consume signal events: the first triggers `shutdown`, the second returns
/// `true`. Returns `false` if the event source goes away first.
pub async fn escalate(shutdown: &Shutdown, mut signals: mpsc::UnboundedReceiver<()>) -> bool {
    if signals.recv().await.is_none() {
        return false;
    }
    tracing::info!("Termination signal received, stopping monitor");
    shutdown.trigger();

    if signals.recv().await.is_none() {
        return false;
    }
    tracing::warn!("Second termination signal received, exiting without waiting for the cycle");
    true
}

#[cfg(unix)]
async fn forward_signals(tx: mpsc::UnboundedSender<()>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => Some(term),
        Err(e) => {
            tracing::warn!(error = %e, "Cannot listen for SIGTERM, relying on ctrl-c");
            None
        }
    };

    loop {
        let received = match term.as_mut() {
            Some(term) => tokio::select! {
                r = tokio::signal::ctrl_c() => r.is_ok(),
                r = term.recv() => r.is_some(),
            },
            None => tokio::signal::ctrl_c().await.is_ok(),
        };
        if !received || tx.send(()).is_err() {
            return;
        }
    }
}

#[cfg(not(unix))]
async fn forward_signals(tx: mpsc::UnboundedSender<()>) {
    while tokio::signal::ctrl_c().await.is_ok() {
        if tx.send(()).is_err() {
            return;
        }
    }
}
