// Backend event channels

use super::core::ProgressSample;
use std::sync::mpsc::{self, Receiver, Sender};

/// Name of the channel carrying progress samples for the active conversion
pub const CONVERSION_PROGRESS: &str = "conversion-progress";

/// Sending half of the `conversion-progress` channel.
///
/// Delivery is at-most-once: a sample sent after the listener is gone is dropped.
#[derive(Debug, Clone)]
pub struct ProgressEmitter {
    tx: Sender<ProgressSample>,
}

impl ProgressEmitter {
    pub fn emit(&self, sample: ProgressSample) {
        if self.tx.send(sample).is_err() {
            tracing::trace!(channel = CONVERSION_PROGRESS, "no listener, sample dropped");
        }
    }

    /// Emitter whose samples go nowhere (dry runs, catalog-only backends)
    pub fn disconnected() -> Self {
        let (tx, _) = mpsc::channel();
        Self { tx }
    }
}

/// Open the `conversion-progress` channel
pub fn progress_channel() -> (ProgressEmitter, Receiver<ProgressSample>) {
    let (tx, rx) = mpsc::channel();
    (ProgressEmitter { tx }, rx)
}
