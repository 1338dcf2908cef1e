// Conversion-request lifecycle: catalog, settings, validation, job state

pub mod catalog;
pub mod job;
pub mod progress;
pub mod settings;
pub mod submission;
pub mod validate;

pub use catalog::CatalogStore;
pub use job::{Dispatch, JobController, JobOutcome, JobPhase, JobTicket, SubmitError};
pub use progress::ProgressSubscriber;
pub use settings::{AdvancedFields, ConversionSettings, Field, Mode, resolve};
pub use submission::{DestinationPicker, DestinationRequest, begin, complete, prepare};
pub use validate::{ValidationError, validate_request};
