//! The boundary between a plugin and whatever hosts it.
//!
//! A plugin is split in two halves: the [Processor], which lives on the audio thread, and the
//! [Editor], which lives on the main/UI thread and talks to the processor through shared,
//! lock-free state.
pub mod editor;
pub mod error;
pub mod port;
pub mod processor;

pub use editor::{Editor, capabilities};
pub use error::Error;
pub use port::Port;
pub use processor::Processor;
