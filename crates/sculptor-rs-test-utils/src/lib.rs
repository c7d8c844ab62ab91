//! Test helpers shared across Sculptor crates.

pub mod completion;
pub mod service;
pub mod store;

pub use completion::{
    FailingCompletion, FixedCompletion, RecordingCompletion, UnreachableCompletion,
};
pub use service::{ScriptedService, ServiceCall};
pub use store::{FailingStore, UncountableStore, record};
