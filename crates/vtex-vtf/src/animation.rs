//! Decoded frame sequences and the sink that receives them.

use crate::{PixelBuffer, Result};

/// Nominal delay between animation frames, in the host's time units.
pub const FRAME_DELAY: u32 = 8;

/// An ordered sequence of decoded frames.
#[derive(Debug, Clone)]
pub struct Animation {
    width: u32,
    height: u32,
    delay: u32,
    looping: bool,
    frames: Vec<PixelBuffer>,
}

impl Animation {
    /// Create an empty, non-looping animation.
    pub fn new(width: u32, height: u32, delay: u32) -> Self {
        Self {
            width,
            height,
            delay,
            looping: false,
            frames: Vec::new(),
        }
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Delay between frames.
    pub fn delay(&self) -> u32 {
        self.delay
    }

    /// Whether playback restarts after the last frame.
    pub fn is_loop(&self) -> bool {
        self.looping
    }

    /// Set whether playback restarts after the last frame.
    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Append a frame.
    pub fn add_frame(&mut self, frame: PixelBuffer) {
        self.frames.push(frame);
    }

    /// All frames in order.
    pub fn frames(&self) -> &[PixelBuffer] {
        &self.frames
    }

    /// Frame at `index`.
    pub fn frame(&self, index: usize) -> Option<&PixelBuffer> {
        self.frames.get(index)
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frame has been added yet.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Iterate over the frames in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PixelBuffer> {
        self.frames.iter()
    }

    /// Take ownership of the frames.
    pub fn into_frames(self) -> Vec<PixelBuffer> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a Animation {
    type Item = &'a PixelBuffer;
    type IntoIter = std::slice::Iter<'a, PixelBuffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Receiver of decoded frames.
///
/// The loader calls, for every frame in order: [`allocate_frame`], then
/// (first frame only) [`notify_geometry`], then [`append_frame`]. Nothing is
/// called when the header fails to validate or the format has no decoder.
///
/// [`allocate_frame`]: ImageSink::allocate_frame
/// [`notify_geometry`]: ImageSink::notify_geometry
/// [`append_frame`]: ImageSink::append_frame
pub trait ImageSink {
    /// Provide a buffer for one frame. The decoder honours its row stride.
    fn allocate_frame(&mut self, width: u32, height: u32, has_alpha: bool) -> Result<PixelBuffer> {
        PixelBuffer::new(width, height, has_alpha)
    }

    /// The first frame decoded; image dimensions are final.
    fn notify_geometry(&mut self, _width: u32, _height: u32, _animation: &Animation) {}

    /// Register a completed frame.
    fn append_frame(&mut self, animation: &mut Animation, frame: PixelBuffer) {
        animation.add_frame(frame);
    }
}

/// Sink that keeps every frame with default allocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSink;

impl ImageSink for DefaultSink {}

impl<S: ImageSink + ?Sized> ImageSink for &mut S {
    fn allocate_frame(&mut self, width: u32, height: u32, has_alpha: bool) -> Result<PixelBuffer> {
        (**self).allocate_frame(width, height, has_alpha)
    }

    fn notify_geometry(&mut self, width: u32, height: u32, animation: &Animation) {
        (**self).notify_geometry(width, height, animation)
    }

    fn append_frame(&mut self, animation: &mut Animation, frame: PixelBuffer) {
        (**self).append_frame(animation, frame)
    }
}
