use util::collections::Array;

use crate::{Frame, Level, Sink};

/// The audio-thread half of a visualizer/scope pair. See [crate::channel].
///
/// Owns the history itself: completed levels overwrite the oldest ones right here, and the whole
/// history is published to the [crate::Scope] after each block that changed it. A display that
/// falls behind only skips intermediate states; the next refresh still sees the newest levels.
pub struct Visualizer {
    channels: Array<Channel>,
    samples_per_level: usize,
    num_pushes: u64,
    history: Frame,
    publisher: triple_buffer::Input<Frame>,
}

#[derive(Default)]
struct Channel {
    pending: Level,
    count: usize,
}

impl Visualizer {
    pub(crate) fn new(
        history: Frame,
        publisher: triple_buffer::Input<Frame>,
        samples_per_level: usize,
    ) -> Self {
        let channels = (0..history.channels.len())
            .map(|_| Channel::default())
            .collect::<Vec<_>>();
        Self {
            channels: Array::from(channels),
            samples_per_level: samples_per_level.max(1),
            num_pushes: 0,
            history,
            publisher,
        }
    }

    /// The number of channels drawn.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// How many blocks have been pushed since construction.
    pub fn num_pushes(&self) -> u64 {
        self.num_pushes
    }

    fn publish(&mut self) {
        self.publisher.input_buffer_mut().copy_from(&self.history);
        self.publisher.publish();
    }
}

impl Channel {
    /// Returns the level completed by `sample`, if any.
    fn push_sample(&mut self, sample: f32, samples_per_level: usize) -> Option<Level> {
        self.pending = if self.count == 0 {
            Level::point(sample)
        } else {
            self.pending.union(sample)
        };
        self.count += 1;
        if self.count < samples_per_level {
            return None;
        }
        self.count = 0;
        Some(self.pending)
    }
}

impl Sink for Visualizer {
    fn push_buffer(&mut self, block: &buffer::Audio) {
        self.num_pushes += 1;
        let mut changed = false;
        let channels = self.channels.iter_mut().zip(&mut self.history.channels);
        for ((channel, ring), samples) in channels.zip(block.iter()) {
            for &sample in samples {
                if let Some(level) = channel.push_sample(sample, self.samples_per_level) {
                    ring.push(level);
                    changed = true;
                }
            }
        }
        if changed {
            self.publish();
        }
    }

    fn clear(&mut self) {
        for channel in self.channels.iter_mut() {
            *channel = Channel::default();
        }
        for ring in &mut self.history.channels {
            ring.reset();
        }
        self.publish();
    }
}
