use std::time::Duration;

use crate::{Frame, Level, Options};

/// The display half of a visualizer/scope pair. See [crate::channel].
///
/// Shows the latest history published by the [crate::Visualizer]: the last `buffer_size` levels
/// per channel, oldest first, padded with silence at startup and after a clear.
pub struct Scope {
    frame: triple_buffer::Output<Frame>,
    cleared_at: Box<[u64]>,
    repaint_rate: u32,
    buffer_size: usize,
}

impl Scope {
    pub(crate) fn new(frame: triple_buffer::Output<Frame>, options: &Options) -> Self {
        Self {
            frame,
            cleared_at: vec![0; options.num_channels].into_boxed_slice(),
            repaint_rate: options.repaint_rate.max(1),
            buffer_size: options.buffer_size.max(1),
        }
    }

    /// Pick up the history most recently published by the visualizer. Returns true if the
    /// display changed and needs repainting.
    pub fn refresh(&mut self) -> bool {
        self.frame.update()
    }

    /// Forget the history shown so far. Only levels completed after this call are drawn.
    pub fn clear(&mut self) {
        self.frame.update();
        let frame = self.frame.peek_output_buffer();
        for (cleared_at, ring) in self.cleared_at.iter_mut().zip(&frame.channels) {
            *cleared_at = ring.written;
        }
    }

    pub fn num_channels(&self) -> usize {
        self.cleared_at.len()
    }

    /// Number of levels kept per channel.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn repaint_rate(&self) -> u32 {
        self.repaint_rate
    }

    /// Time between two refreshes at the repaint rate.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.repaint_rate))
    }

    /// The history of `channel`, oldest first. Always [Scope::buffer_size] levels long.
    ///
    /// # Panics
    /// If `channel` is out of range.
    pub fn levels(&self, channel: usize) -> impl Iterator<Item = Level> + '_ {
        let ring = &self.frame.peek_output_buffer().channels[channel];
        let cleared_at = self.cleared_at[channel];
        let len = ring.levels.len() as u64;
        // Slot `index` holds level number `written - len + index`.
        ring.iter().enumerate().map(move |(index, level)| {
            if ring.written + index as u64 >= cleared_at + len {
                *level
            } else {
                Level::default()
            }
        })
    }

    /// A closed outline of `channel` fitted into `width` x `height`: the maxima from left to
    /// right, then the minima back from right to left. The first level sits on the left edge
    /// and the newest on the right. Full scale maps to the top and bottom edges, silence to the
    /// middle.
    pub fn outline(&self, channel: usize, width: f32, height: f32) -> Vec<(f32, f32)> {
        let step = width / (self.buffer_size - 1).max(1) as f32;
        let x = |index: usize| index as f32 * step;
        let y = |value: f32| (1.0 - value.clamp(-1.0, 1.0)) * 0.5 * height;

        let levels: Vec<_> = self.levels(channel).collect();
        let mut points = Vec::with_capacity(levels.len() * 2);
        points.extend(
            levels
                .iter()
                .enumerate()
                .map(|(index, level)| (x(index), y(level.max))),
        );
        points.extend(
            levels
                .iter()
                .enumerate()
                .rev()
                .map(|(index, level)| (x(index), y(level.min))),
        );
        points
    }
}
