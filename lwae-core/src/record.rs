//! Types for recording training metrics.
//!
//! [`Record`] is a key-value container filled by the objects in the training
//! loop; a [`Recorder`] decides where those values end up. The trainer only
//! depends on the trait, so the output destination is swappable.
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
