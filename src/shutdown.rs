use tokio::sync::broadcast;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Broadcast channel size for shutdown notifications (single signal fan-out).
const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

pub(crate) type ShutdownSender = broadcast::Sender<u16>;
pub(crate) type ShutdownReceiver = broadcast::Receiver<u16>;

#[must_use]
pub(crate) fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    broadcast::channel::<u16>(SHUTDOWN_CHANNEL_CAPACITY)
}

pub(crate) fn setup_signal_shutdown_handler(
    shutdown_tx: &ShutdownSender,
) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        let mut shutdown_rx = shutdown_tx.subscribe();

        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(term_signal) => Some(term_signal),
            Err(err) => {
                eprintln!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                _ = shutdown_rx.recv() => {}
                _ = tokio::signal::ctrl_c() => {
                    drop(shutdown_tx.send(130));
                }
                () = async {
                    if let Some(term_signal) = term_signal.as_mut() {
                        term_signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    drop(shutdown_tx.send(130));
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                _ = shutdown_rx.recv() => {}
                _ = tokio::signal::ctrl_c() => {
                    drop(shutdown_tx.send(130));
                }
            }
        }
    })
}
