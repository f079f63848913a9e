pub mod audio;
pub use audio::{Arena, Audio, Owned};

/// Required alignment of every scratch channel, in bytes.
pub const ALIGN: usize = 16;
