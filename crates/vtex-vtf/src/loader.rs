//! Load lifecycle: accumulate bytes, validate, decode every frame.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use vtex_common::BinaryReader;

use crate::accumulator::{Accumulator, INITIAL_CAPACITY};
use crate::animation::{Animation, DefaultSink, ImageSink, FRAME_DELAY};
use crate::decode::{decode_surface, supported_encoding};
use crate::layout::{self, MipLevel};
use crate::{Error, Result, VtfHeader};

/// Chunk size used when pulling from a reader.
const READ_CHUNK: usize = 64 * 1024;

/// Tunables for a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Capacity reserved before the first chunk arrives.
    pub initial_capacity: usize,
    /// Delay stored in the resulting animation.
    pub frame_delay: u32,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            initial_capacity: INITIAL_CAPACITY,
            frame_delay: FRAME_DELAY,
        }
    }
}

/// Incremental VTF loader.
///
/// Feed the file with [`load_increment`](Self::load_increment) in chunks of
/// any size, then call [`stop_load`](Self::stop_load) to decode. Dropping
/// the loader before that discards everything received.
///
/// # Example
///
/// ```no_run
/// use vtex_vtf::{DefaultSink, VtfLoader};
///
/// let data = std::fs::read("texture.vtf")?;
/// let mut loader = VtfLoader::new()?;
/// for chunk in data.chunks(4096) {
///     loader.load_increment(chunk)?;
/// }
/// let animation = loader.stop_load(&mut DefaultSink)?;
/// println!("{} frame(s)", animation.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct VtfLoader {
    buffer: Accumulator,
    options: LoaderOptions,
}

impl VtfLoader {
    /// Begin a load with default options.
    pub fn new() -> Result<Self> {
        Self::with_options(LoaderOptions::default())
    }

    /// Begin a load with the given options.
    pub fn with_options(options: LoaderOptions) -> Result<Self> {
        Ok(Self {
            buffer: Accumulator::with_capacity(options.initial_capacity)?,
            options,
        })
    }

    /// Append the next chunk of the file.
    pub fn load_increment(&mut self, chunk: &[u8]) -> Result<()> {
        self.buffer.append(chunk)
    }

    /// Bytes received so far.
    pub fn bytes_read(&self) -> usize {
        self.buffer.len()
    }

    /// Finish the load and decode every frame into `sink`.
    pub fn stop_load<S: ImageSink + ?Sized>(self, sink: &mut S) -> Result<Animation> {
        let data = self.buffer.into_inner();
        decode_file(&data, sink, &self.options)
    }
}

/// Decode a complete VTF file.
///
/// Frames are handed to `sink` in order. On failure the partially built
/// animation is dropped.
pub fn decode_file<S: ImageSink + ?Sized>(data: &[u8], sink: &mut S, options: &LoaderOptions) -> Result<Animation> {
    let header = VtfHeader::parse(data)?;
    let format = header.high_res_format;
    let encoding = supported_encoding(format)?;

    let base = layout::high_res_start(&header, data.len())?;
    let (width, height) = (u32::from(header.width), u32::from(header.height));

    let mut animation = Animation::new(width, height, options.frame_delay);
    animation.set_loop(true);

    for frame in 0..header.frames {
        let offset = layout::offset(&header, u32::from(frame), 0, 0, MipLevel::Level(0));
        let position = usize::try_from(offset)
            .ok()
            .and_then(|offset| base.checked_add(offset))
            .ok_or_else(|| Error::Corrupt(format!("frame {} offset {} out of range", frame, offset)))?;
        debug!("frame {} of {}: {} at byte {}", frame + 1, header.frames, format, position);

        // The surface must be present before the sink is asked for a buffer.
        let surface = encoding.surface_size(width, height);
        let end = u64::try_from(position).ok().and_then(|p| p.checked_add(surface));
        if end.map_or(true, |end| end > data.len() as u64) {
            return Err(Error::Corrupt(format!(
                "frame {} needs {} bytes at {}, file has {}",
                frame,
                surface,
                position,
                data.len()
            )));
        }

        let mut reader = BinaryReader::new_at(data, position)?;
        let mut pixels = sink.allocate_frame(width, height, encoding.has_alpha())?;
        if pixels.width() != width || pixels.height() != height {
            return Err(Error::BufferMismatch(format!(
                "sink returned {}x{} for a {}x{} frame",
                pixels.width(),
                pixels.height(),
                width,
                height
            )));
        }

        decode_surface(format, &mut reader, &mut pixels)?;

        if frame == 0 {
            sink.notify_geometry(width, height, &animation);
        }
        sink.append_frame(&mut animation, pixels);
    }

    Ok(animation)
}

/// Decode a VTF file held in memory with the default sink.
pub fn load_bytes(data: &[u8]) -> Result<Animation> {
    decode_file(data, &mut DefaultSink, &LoaderOptions::default())
}

/// Read a VTF file from `reader` chunk by chunk and decode it into `sink`.
pub fn load_reader<R: Read, S: ImageSink + ?Sized>(mut reader: R, sink: &mut S) -> Result<Animation> {
    let mut loader = VtfLoader::new()?;
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        loader.load_increment(&chunk[..read])?;
    }

    loader.stop_load(sink)
}

/// Load a VTF file from disk with the default sink.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Animation> {
    let file = File::open(path)?;
    load_reader(file, &mut DefaultSink)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba_file(frames: u16, payload: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; VtfHeader::SIZE];
        data[0..4].copy_from_slice(b"VTF\0");
        data[4..8].copy_from_slice(&7u32.to_le_bytes());
        data[8..12].copy_from_slice(&2u32.to_le_bytes());
        data[12..16].copy_from_slice(&80u32.to_le_bytes());
        data[16..18].copy_from_slice(&2u16.to_le_bytes());
        data[18..20].copy_from_slice(&2u16.to_le_bytes());
        data[24..26].copy_from_slice(&frames.to_le_bytes());
        data[52..56].copy_from_slice(&0i32.to_le_bytes());
        data[56] = 1;
        data[57..61].copy_from_slice(&(-1i32).to_le_bytes());
        data[63..65].copy_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn test_loader_chunks() {
        let payload: Vec<u8> = (0..32).collect();
        let file = rgba_file(2, &payload);

        let mut loader = VtfLoader::with_options(LoaderOptions {
            initial_capacity: 16,
            ..Default::default()
        })
        .unwrap();
        for chunk in file.chunks(7) {
            loader.load_increment(chunk).unwrap();
        }
        assert_eq!(loader.bytes_read(), file.len());

        let animation = loader.stop_load(&mut DefaultSink).unwrap();
        assert_eq!(animation.len(), 2);
        assert!(animation.is_loop());
        assert_eq!(animation.delay(), FRAME_DELAY);
        assert_eq!(animation.frames()[0].pixel(0, 0), &[0, 1, 2, 3]);
        assert_eq!(animation.frames()[1].pixel(0, 0), &[16, 17, 18, 19]);
        assert_eq!(animation.frames()[1].pixel(1, 1), &[28, 29, 30, 31]);
    }

    #[test]
    fn test_load_reader_matches_bytes() {
        let payload: Vec<u8> = (100..116).collect();
        let file = rgba_file(1, &payload);

        let from_reader = load_reader(std::io::Cursor::new(&file), &mut DefaultSink).unwrap();
        let from_bytes = load_bytes(&file).unwrap();
        assert_eq!(from_reader.frames(), from_bytes.frames());
    }

    #[test]
    fn test_short_payload_is_corrupt() {
        let file = rgba_file(200, &[0u8; 20]);
        let err = load_bytes(&file).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::CorruptImage);
    }

    #[test]
    fn test_missing_surface_rejected_before_allocation() {
        struct CountingSink(usize);
        impl ImageSink for CountingSink {
            fn allocate_frame(&mut self, width: u32, height: u32, has_alpha: bool) -> Result<crate::PixelBuffer> {
                self.0 += 1;
                crate::PixelBuffer::new(width, height, has_alpha)
            }
        }

        // mipmap_count = 0 sizes the payload at nothing.
        let mut file = rgba_file(1, &[]);
        file[16..18].copy_from_slice(&8192u16.to_le_bytes());
        file[18..20].copy_from_slice(&8192u16.to_le_bytes());
        file[56] = 0;
        let mut sink = CountingSink(0);
        let err = decode_file(&file, &mut sink, &LoaderOptions::default()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::CorruptImage);
        assert_eq!(sink.0, 0);

        // 2x2 RGBA8888 needs 16 bytes; 12 are present.
        let file = rgba_file(1, &[0u8; 12]);
        let mut sink = CountingSink(0);
        let err = decode_file(&file, &mut sink, &LoaderOptions::default()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::CorruptImage);
        assert_eq!(sink.0, 0);
    }

    #[test]
    fn test_custom_frame_delay() {
        let file = rgba_file(1, &[0u8; 16]);
        let options = LoaderOptions {
            frame_delay: 40,
            ..Default::default()
        };
        let animation = decode_file(&file, &mut DefaultSink, &options).unwrap();
        assert_eq!(animation.delay(), 40);
    }
}
