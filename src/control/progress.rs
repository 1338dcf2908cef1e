// Listener on the conversion-progress channel

use super::job::{Dispatch, JobController};
use crate::engine::{CONVERSION_PROGRESS, ProgressSample};
use std::sync::mpsc::{Receiver, TryRecvError};

/// Feeds progress samples to the job controller in emission order.
///
/// Samples carry no job identity; anything that arrives while the controller
/// is idle is dropped by the controller.
pub struct ProgressSubscriber {
    rx: Option<Receiver<ProgressSample>>,
}

impl ProgressSubscriber {
    pub fn subscribe(rx: Receiver<ProgressSample>) -> Self {
        tracing::debug!(channel = CONVERSION_PROGRESS, "subscribed");
        Self { rx: Some(rx) }
    }

    /// Subscriber with no channel behind it
    pub fn detached() -> Self {
        Self { rx: None }
    }

    pub fn is_connected(&self) -> bool {
        self.rx.is_some()
    }

    /// Forward one sample. Returns whether the controller kept it.
    pub fn deliver<D: Dispatch>(
        &self,
        sample: ProgressSample,
        controller: &mut JobController<D>,
    ) -> bool {
        controller.apply_progress(sample)
    }

    /// Forward every pending sample; returns how many were applied
    pub fn drain<D: Dispatch>(&mut self, controller: &mut JobController<D>) -> usize {
        let Some(rx) = self.rx.as_ref() else {
            return 0;
        };

        let mut applied = 0;
        loop {
            match rx.try_recv() {
                Ok(sample) => {
                    if self.deliver(sample, controller) {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::debug!(channel = CONVERSION_PROGRESS, "emitter gone, unsubscribing");
                    self.rx = None;
                    break;
                }
            }
        }
        applied
    }
}
