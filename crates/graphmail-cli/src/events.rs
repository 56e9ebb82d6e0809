//! Bridge between the dispatcher's status broadcasts and the terminal.

use log::{debug, info, warn};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tokio::task::JoinHandle;

use graphmail::StatusEvent;

/// Logs every status update until the broadcaster is dropped.
pub fn start_status_bridge(mut rx: Receiver<StatusEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) if event.message.is_empty() => {
                    debug!("Status reset");
                }
                Ok(event) => {
                    info!(
                        "[{}] status: {} (succeeded: {})",
                        event.timestamp.to_rfc3339(),
                        event.message,
                        event.succeeded
                    );
                }
                Err(RecvError::Lagged(n)) => {
                    warn!("Status bridge lagged, missed {} events", n);
                }
                Err(RecvError::Closed) => {
                    debug!("Status broadcaster closed, stopping status bridge");
                    break;
                }
            }
        }
    })
}
