//! Waveform visualization.
//!
//! A [Visualizer] sits on the audio thread, folds pushed blocks into min/max [Level]s and keeps
//! a fixed length rolling history per channel, overwriting the oldest level. After every block
//! that completes a level it publishes the history to its paired [Scope] through a triple
//! buffer, so neither side ever waits and the display always sees the newest levels. The
//! [Scope] lives on the display side and is refreshed from a [Ticker] at the repaint rate.
//! Nothing here ever feeds back into the audio signal.
pub mod history;
pub mod ticker;
pub mod visualizer;

pub use history::Scope;
pub use ticker::Ticker;
pub use visualizer::Visualizer;

/// Anything that accepts blocks of audio for display.
pub trait Sink: Send {
    /// Append a block to the history. Must not block, allocate, or modify the block.
    fn push_buffer(&mut self, block: &buffer::Audio);

    /// Forget everything pushed so far.
    fn clear(&mut self);
}

#[derive(Clone, Debug)]
pub struct Options {
    /// Number of channels drawn. Extra channels in a pushed block are ignored.
    pub num_channels: usize,

    /// Number of [Level]s kept per channel.
    pub buffer_size: usize,

    /// Number of input samples folded into one [Level].
    pub samples_per_level: usize,

    /// How often the display is refreshed, in Hz.
    pub repaint_rate: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            num_channels: 1,
            buffer_size: 256,
            samples_per_level: 256,
            repaint_rate: 60,
        }
    }
}

/// The range of sample values covered by one point of the waveform.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Level {
    pub min: f32,
    pub max: f32,
}

impl Level {
    pub fn point(sample: f32) -> Self {
        Self {
            min: sample,
            max: sample,
        }
    }

    pub fn union(self, sample: f32) -> Self {
        Self {
            min: self.min.min(sample),
            max: self.max.max(sample),
        }
    }
}

/// Create a connected visualizer/scope pair.
pub fn channel(options: &Options) -> (Visualizer, Scope) {
    let frame = Frame::new(options.num_channels, options.buffer_size.max(1));
    let (input, output) = triple_buffer::triple_buffer(&frame);
    let visualizer = Visualizer::new(frame, input, options.samples_per_level);
    let scope = Scope::new(output, options);
    (visualizer, scope)
}

/// The rolling histories of every displayed channel, as published to the display.
#[derive(Clone, Debug)]
pub(crate) struct Frame {
    pub(crate) channels: Vec<Ring>,
}

/// A fixed length history of levels. `next` is the slot the next level overwrites.
#[derive(Clone, Debug)]
pub(crate) struct Ring {
    pub(crate) levels: Box<[Level]>,
    pub(crate) next: usize,

    /// Levels written since construction. Clearing does not rewind it.
    pub(crate) written: u64,
}

impl Frame {
    fn new(num_channels: usize, buffer_size: usize) -> Self {
        let channels = (0..num_channels).map(|_| Ring::new(buffer_size)).collect();
        Self { channels }
    }

    /// Copy `other` into `self` without allocating. Both must have the same shape.
    pub(crate) fn copy_from(&mut self, other: &Frame) {
        for (ring, other) in self.channels.iter_mut().zip(&other.channels) {
            ring.levels.copy_from_slice(&other.levels);
            ring.next = other.next;
            ring.written = other.written;
        }
    }
}

impl Ring {
    fn new(buffer_size: usize) -> Self {
        Self {
            levels: vec![Level::default(); buffer_size].into_boxed_slice(),
            next: 0,
            written: 0,
        }
    }

    pub(crate) fn push(&mut self, level: Level) {
        self.levels[self.next] = level;
        self.next = (self.next + 1) % self.levels.len();
        self.written += 1;
    }

    pub(crate) fn reset(&mut self) {
        self.levels.fill(Level::default());
        self.next = 0;
    }

    /// Oldest first.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Level> + '_ {
        let (newer, older) = self.levels.split_at(self.next);
        older.iter().chain(newer)
    }
}

#[cfg(test)]
mod tests {
    use super::{Level, Ring};

    #[test]
    fn level_union() {
        let level = Level::point(0.25).union(-0.5).union(0.1);
        assert_eq!(level, Level { min: -0.5, max: 0.25 });
    }

    #[test]
    fn ring_overwrites_the_oldest() {
        let mut ring = Ring::new(3);
        for value in 0..5 {
            ring.push(Level::point(value as f32));
        }
        let maxima: Vec<_> = ring.iter().map(|level| level.max).collect();
        assert_eq!(maxima, [2.0, 3.0, 4.0]);
        assert_eq!(ring.written, 5);

        ring.reset();
        assert!(ring.iter().all(|level| *level == Level::default()));
        assert_eq!(ring.written, 5);
    }
}
