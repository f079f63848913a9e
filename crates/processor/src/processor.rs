use crate::{Editor, Error};
use context as cx;

/// An abstract interface into a real-time audio processing node.
///
/// The host calls [Processor::activate] before any audio flows and never concurrently with
/// [Processor::process]. Everything a processor needs on the audio thread must be allocated
/// during activation.
pub trait Processor
where
    Self: Send + 'static,
{
    /// Create the editor handle.
    fn editor(&self) -> Box<dyn Editor>;

    /// Prepare for processing with the given sample rate, block size and ports.
    fn activate(&mut self, context: cx::Activate<'_>) -> Result<(), Error>;

    /// Called before beginning audio processing.
    fn start(&mut self) -> bool {
        true
    }

    /// Called after processing has stopped.
    fn stop(&mut self) -> bool {
        true
    }

    /// Real time processing. Must not allocate, lock or fail.
    fn process(&mut self, context: cx::Process<'_>) -> Processed;

    /// Release the resources acquired in [Processor::activate].
    fn reset(&mut self);
}

/// Data returned from [Processor::process].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Processed {
    pub status: Status,

    /// A hint about the number of future frames that this processor will need to render.
    pub tail_frames: Option<usize>,
}

/// What a processor did with a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// The effect was applied.
    Processed,

    /// The effect is switched off; the output was left untouched.
    Bypassed,

    /// The block could not be processed; the output holds the main input (or silence).
    Passthrough,
}

impl Processed {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            tail_frames: None,
        }
    }
}

pub mod context {
    use crate::port;

    pub struct Process<'a> {
        pub sample_rate: f64,
        pub num_frames: usize,
        /// Main input first, then any auxiliary inputs.
        pub audio_inputs: &'a [buffer::Audio],
        pub audio_outputs: &'a mut [buffer::Audio],
    }

    pub struct Activate<'a> {
        /// The sample rate for processing.
        pub sample_rate: f64,

        /// The maximum number of frames that will be passed to the audio thread.
        pub max_num_frames: usize,

        /// The negotiated ports.
        pub ports: &'a [port::Port],
    }
}
