//! A sidechain ducking effect.
//!
//! The main input is attenuated by the instantaneous magnitude of a sidechain input and mixed
//! back with the dry signal. Both inputs are shown as live waveforms.
//!
//! - [params]: the lock-free parameter store.
//! - [layout]: bus layout negotiation.
//! - [signal]: the per-sample math.
//! - [RingMod]: the processor tying them together.
//! - [RingModEditor]: parameter text, state persistence and port negotiation for UIs and hosts.
pub mod display;
pub mod editor;
pub mod layout;
pub mod params;
pub mod plugin;
pub mod signal;
pub mod state;

pub use display::DisplayHandle;
pub use editor::RingModEditor;
pub use plugin::RingMod;

/// Construction options.
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Shape of both waveform displays.
    pub scope: scope::Options,
}

/// Create one processor instance for a host.
pub fn create(options: &Options) -> Box<dyn processor::Processor> {
    Box::new(RingMod::new(options))
}
