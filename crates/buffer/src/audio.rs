//! Audio buffer types.
//!
//! - [Audio]: a non-owning view of a bus, one pointer per channel. Hosts bind their buffers
//!   into it every block without allocating.
//! - [Arena]: a single pre-allocated slab that hands out channel storage for scratch buffers.
//! - [Owned]: heap storage with an [Audio] view over it, for offline hosts and tests.
//!
use std::{
    alloc::{Layout, alloc_zeroed, dealloc, handle_alloc_error},
    marker::PhantomData,
    ops::{Index, IndexMut},
    ptr::NonNull,
};

use util::collections::{Array, Stack};

use crate::ALIGN;

/// A bus of `num_channels` channels, each `num_frames` samples long.
pub struct Audio {
    num_channels: usize,
    num_frames: usize,
    channels: Array<*mut f32>,
}

pub struct AudioIter<'a> {
    channels: std::slice::Iter<'a, *mut f32>,
    num_frames: usize,
}

pub struct AudioIterMut<'a> {
    channels: std::slice::Iter<'a, *mut f32>,
    num_frames: usize,
    _p: PhantomData<&'a mut f32>,
}

pub struct Arena {
    slab: NonNull<f32>,
    layout: Layout,
    max_num_channels: usize,
    max_num_frames: usize,
    stride: usize,
    stack: Stack<*mut f32>,
}

pub struct Owned {
    audio: Audio,
    _data: Vec<Box<[f32]>>,
}

impl Audio {
    /// Create an unbound view with room for `max_num_channels` channel pointers. Until it is
    /// bound every channel reads as empty.
    pub fn new(max_num_channels: usize) -> Self {
        let channels = Array::filled(max_num_channels, NonNull::<f32>::dangling().as_ptr());
        Self {
            num_channels: max_num_channels,
            num_frames: 0,
            channels,
        }
    }

    /// Create a view over `num_channels` host channel pointers.
    ///
    /// # Safety
    /// `channels` must point to `num_channels` non-null pointers, each valid for reads and
    /// writes of `num_frames` samples for as long as the view is used.
    pub unsafe fn from_raw(channels: *const *mut f32, num_channels: usize, num_frames: usize) -> Self {
        let mut this = Self::new(num_channels);
        unsafe { this.bind(channels, num_channels, num_frames) };
        this
    }

    /// Rebind this view to a new set of host channels without allocating.
    ///
    /// # Safety
    /// Same contract as [Audio::from_raw]. `num_channels` must not exceed [Audio::capacity].
    pub unsafe fn bind(&mut self, channels: *const *mut f32, num_channels: usize, num_frames: usize) {
        debug_assert!(num_channels <= self.capacity(), "too many channels to bind");
        let num_channels = num_channels.min(self.capacity());
        for index in 0..num_channels {
            let ptr = unsafe { *channels.add(index) };
            debug_assert!(!ptr.is_null() && ptr.is_aligned());
            self.channels[index] = ptr;
        }
        self.num_channels = num_channels;
        self.num_frames = num_frames;
    }

    /// Get the number of channels in the buffer.
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Return the number of frames per channel.
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// The maximum number of channels this view can be bound to.
    pub fn capacity(&self) -> usize {
        self.channels.len()
    }

    /// Update the number of frames in the buffer. The caller guarantees the bound storage is
    /// at least this long.
    pub fn set_num_frames(&mut self, num_frames: usize) {
        self.num_frames = num_frames;
    }

    /// Use only the first `num_channels` bound channels.
    pub fn set_num_channels(&mut self, num_channels: usize) {
        debug_assert!(num_channels <= self.capacity());
        self.num_channels = num_channels.min(self.capacity());
    }

    /// Return the raw channel pointers.
    pub fn raw(&self) -> *const *const f32 {
        self.channels.as_ptr().cast()
    }

    pub fn raw_mut(&mut self) -> *mut *mut f32 {
        self.channels.as_mut_ptr()
    }

    /// Returns true if `channel` of both views starts at the same address, i.e. the host is
    /// processing that channel in place.
    pub fn shares_channel(&self, other: &Audio, channel: usize) -> bool {
        channel < self.num_channels
            && channel < other.num_channels
            && std::ptr::eq(self.channels[channel], other.channels[channel])
    }

    /// Copy every channel of `src` into this buffer, multiplied by `gain`. Channels are copied
    /// up to the smaller of the two channel counts, frames up to this buffer's length.
    pub fn copy_scaled_from(&mut self, src: &Audio, gain: f32) {
        debug_assert!(src.num_frames >= self.num_frames, "source block is too short");
        for (dst, src) in self.iter_mut().zip(src.iter()) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = *s * gain;
            }
        }
    }

    /// Copy `src` into this buffer unchanged, skipping channels that are already shared.
    pub fn copy_from(&mut self, src: &Audio) {
        let num_channels = self.num_channels.min(src.num_channels);
        for channel in 0..num_channels {
            if self.shares_channel(src, channel) {
                continue;
            }
            let len = self.num_frames.min(src.num_frames);
            self[channel][..len].copy_from_slice(&src[channel][..len]);
        }
    }

    /// Set every sample to `value`.
    pub fn fill(&mut self, value: f32) {
        for channel in self.iter_mut() {
            channel.fill(value);
        }
    }

    /// Iterate channels.
    pub fn iter(&self) -> AudioIter<'_> {
        AudioIter {
            channels: self.channels.as_slice()[..self.num_channels].iter(),
            num_frames: self.num_frames,
        }
    }

    pub fn iter_mut(&mut self) -> AudioIterMut<'_> {
        AudioIterMut {
            channels: self.channels.as_slice()[..self.num_channels].iter(),
            num_frames: self.num_frames,
            _p: PhantomData,
        }
    }
}

impl Index<usize> for Audio {
    type Output = [f32];
    fn index(&self, index: usize) -> &Self::Output {
        let ptr = self.channels.as_slice()[..self.num_channels][index];
        unsafe { std::slice::from_raw_parts(ptr, self.num_frames) }
    }
}

impl IndexMut<usize> for Audio {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let ptr = self.channels.as_slice()[..self.num_channels][index];
        unsafe { std::slice::from_raw_parts_mut(ptr, self.num_frames) }
    }
}

impl<'a> IntoIterator for &'a Audio {
    type IntoIter = AudioIter<'a>;
    type Item = &'a [f32];
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut Audio {
    type IntoIter = AudioIterMut<'a>;
    type Item = &'a mut [f32];
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<'a> Iterator for AudioIter<'a> {
    type Item = &'a [f32];
    fn next(&mut self) -> Option<Self::Item> {
        let ptr = *self.channels.next()?;
        Some(unsafe { std::slice::from_raw_parts(ptr, self.num_frames) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.channels.size_hint()
    }
}

impl<'a> Iterator for AudioIterMut<'a> {
    type Item = &'a mut [f32];
    fn next(&mut self) -> Option<Self::Item> {
        let ptr = *self.channels.next()?;
        Some(unsafe { std::slice::from_raw_parts_mut(ptr, self.num_frames) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.channels.size_hint()
    }
}

unsafe impl Send for Audio {}

impl Arena {
    /// Create a new scratch allocator holding `max_num_channels` channels of `max_num_frames`.
    /// This is the only allocation; acquiring channels never allocates.
    pub fn new(max_num_channels: usize, max_num_frames: usize) -> Self {
        // Keep every channel aligned by padding the stride to a whole number of ALIGN chunks.
        let per_chunk = ALIGN / std::mem::size_of::<f32>();
        let stride = max_num_frames.div_ceil(per_chunk).max(1) * per_chunk;
        let size = (max_num_channels.max(1) * stride) * std::mem::size_of::<f32>();
        let layout = Layout::from_size_align(size, ALIGN).expect("invalid arena layout");

        let slab = unsafe { alloc_zeroed(layout) }.cast::<f32>();
        let Some(slab) = NonNull::new(slab) else {
            handle_alloc_error(layout);
        };

        let mut this = Self {
            slab,
            layout,
            max_num_channels,
            max_num_frames,
            stride,
            stack: Stack::new(max_num_channels),
        };
        this.refill();
        this
    }

    /// Bind `audio.num_channels()` zeroed channels to `audio`. Returns false, leaving `audio`
    /// untouched, if there are not enough free channels.
    pub fn acquire(&mut self, audio: &mut Audio) -> bool {
        let num_channels = audio.num_channels();
        if self.stack.len() < num_channels {
            return false;
        }
        for index in 0..num_channels {
            let Some(channel) = self.stack.pop() else {
                return false;
            };
            unsafe { std::ptr::write_bytes(channel, 0, self.max_num_frames) };
            audio.channels[index] = channel;
        }
        audio.num_frames = 0;
        true
    }

    fn refill(&mut self) {
        self.stack.clear();
        for index in (0..self.max_num_channels).rev() {
            let channel = unsafe { self.slab.as_ptr().add(index * self.stride) };
            self.stack.push(channel);
        }
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        unsafe { dealloc(self.slab.as_ptr().cast(), self.layout) };
    }
}

unsafe impl Send for Arena {}

impl Owned {
    /// Allocate `num_channels` silent channels of `num_frames` samples.
    pub fn new(num_channels: usize, num_frames: usize) -> Self {
        Self::from_channels(vec![vec![0.0; num_frames]; num_channels])
    }

    /// Take ownership of a set of equally sized channels.
    pub fn from_channels<C>(channels: impl IntoIterator<Item = C>) -> Self
    where
        C: Into<Vec<f32>>,
    {
        let mut data = channels
            .into_iter()
            .map(|channel| channel.into().into_boxed_slice())
            .collect::<Vec<_>>();
        let num_frames = data.first().map_or(0, |channel| channel.len());
        assert!(
            data.iter().all(|channel| channel.len() == num_frames),
            "all channels must have the same length"
        );
        let ptrs = data
            .iter_mut()
            .map(|channel| channel.as_mut_ptr())
            .collect::<Vec<_>>();
        let audio = unsafe { Audio::from_raw(ptrs.as_ptr(), ptrs.len(), num_frames) };
        Self { audio, _data: data }
    }

    pub fn audio(&self) -> &Audio {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut Audio {
        &mut self.audio
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.audio[index]
    }

    /// Copy the contents out, one `Vec` per channel.
    pub fn to_vecs(&self) -> Vec<Vec<f32>> {
        self.audio.iter().map(<[f32]>::to_vec).collect()
    }
}
