// Conversion backend - independent of UI

pub mod backend;
pub mod core;
pub mod events;
pub mod worker;

pub use backend::{Backend, BackendError, FfmpegBackend};
pub use core::*;
pub use events::{CONVERSION_PROGRESS, ProgressEmitter, progress_channel};
pub use worker::{BackendEvent, Worker, WorkerHandle};
