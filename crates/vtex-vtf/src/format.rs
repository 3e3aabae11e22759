//! VTF image format tags.

/// High- or low-resolution image format as stored in the VTF header.
///
/// Every tag of the VTF format enumeration is named. Tags outside the
/// enumeration are kept as [`ImageFormat::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    None,
    Rgba8888,
    Abgr8888,
    Rgb888,
    Bgr888,
    Rgb565,
    I8,
    Ia88,
    P8,
    A8,
    Rgb888Bluescreen,
    Bgr888Bluescreen,
    Argb8888,
    Bgra8888,
    Dxt1,
    Dxt3,
    Dxt5,
    Bgrx8888,
    Bgr565,
    Bgrx5551,
    Bgra4444,
    Dxt1OneBitAlpha,
    Bgra5551,
    Uv88,
    Uvwq8888,
    Rgba16161616F,
    Rgba16161616,
    Uvlx8888,
    Unknown(i32),
}

/// How a decodable format stores its texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// A fixed number of bytes per pixel.
    Pixel { bytes: u32, alpha: bool },
    /// A fixed number of bytes per 4x4 block.
    Block { bytes: u32 },
}

impl Encoding {
    /// Byte size of a `width` x `height` surface in this encoding.
    pub fn surface_size(self, width: u32, height: u32) -> u64 {
        let (width, height) = (u64::from(width), u64::from(height));
        match self {
            Encoding::Pixel { bytes, .. } => width * height * u64::from(bytes),
            Encoding::Block { bytes } => {
                width.div_ceil(4) * height.div_ceil(4) * u64::from(bytes)
            }
        }
    }

    /// Whether decoded pixels carry an alpha channel.
    pub fn has_alpha(self) -> bool {
        match self {
            Encoding::Pixel { alpha, .. } => alpha,
            Encoding::Block { .. } => true,
        }
    }

    /// Number of 8-bit channels in decoded pixels.
    pub fn channels(self) -> usize {
        if self.has_alpha() {
            4
        } else {
            3
        }
    }
}

impl From<i32> for ImageFormat {
    fn from(tag: i32) -> Self {
        match tag {
            -1 => Self::None,
            0 => Self::Rgba8888,
            1 => Self::Abgr8888,
            2 => Self::Rgb888,
            3 => Self::Bgr888,
            4 => Self::Rgb565,
            5 => Self::I8,
            6 => Self::Ia88,
            7 => Self::P8,
            8 => Self::A8,
            9 => Self::Rgb888Bluescreen,
            10 => Self::Bgr888Bluescreen,
            11 => Self::Argb8888,
            12 => Self::Bgra8888,
            13 => Self::Dxt1,
            14 => Self::Dxt3,
            15 => Self::Dxt5,
            16 => Self::Bgrx8888,
            17 => Self::Bgr565,
            18 => Self::Bgrx5551,
            19 => Self::Bgra4444,
            20 => Self::Dxt1OneBitAlpha,
            21 => Self::Bgra5551,
            22 => Self::Uv88,
            23 => Self::Uvwq8888,
            24 => Self::Rgba16161616F,
            25 => Self::Rgba16161616,
            26 => Self::Uvlx8888,
            other => Self::Unknown(other),
        }
    }
}

impl ImageFormat {
    /// The raw tag value as stored in the header.
    pub const fn tag(self) -> i32 {
        match self {
            Self::None => -1,
            Self::Rgba8888 => 0,
            Self::Abgr8888 => 1,
            Self::Rgb888 => 2,
            Self::Bgr888 => 3,
            Self::Rgb565 => 4,
            Self::I8 => 5,
            Self::Ia88 => 6,
            Self::P8 => 7,
            Self::A8 => 8,
            Self::Rgb888Bluescreen => 9,
            Self::Bgr888Bluescreen => 10,
            Self::Argb8888 => 11,
            Self::Bgra8888 => 12,
            Self::Dxt1 => 13,
            Self::Dxt3 => 14,
            Self::Dxt5 => 15,
            Self::Bgrx8888 => 16,
            Self::Bgr565 => 17,
            Self::Bgrx5551 => 18,
            Self::Bgra4444 => 19,
            Self::Dxt1OneBitAlpha => 20,
            Self::Bgra5551 => 21,
            Self::Uv88 => 22,
            Self::Uvwq8888 => 23,
            Self::Rgba16161616F => 24,
            Self::Rgba16161616 => 25,
            Self::Uvlx8888 => 26,
            Self::Unknown(tag) => tag,
        }
    }

    /// Canonical upper-case format name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Rgba8888 => "RGBA8888",
            Self::Abgr8888 => "ABGR8888",
            Self::Rgb888 => "RGB888",
            Self::Bgr888 => "BGR888",
            Self::Rgb565 => "RGB565",
            Self::I8 => "I8",
            Self::Ia88 => "IA88",
            Self::P8 => "P8",
            Self::A8 => "A8",
            Self::Rgb888Bluescreen => "RGB888_BLUESCREEN",
            Self::Bgr888Bluescreen => "BGR888_BLUESCREEN",
            Self::Argb8888 => "ARGB8888",
            Self::Bgra8888 => "BGRA8888",
            Self::Dxt1 => "DXT1",
            Self::Dxt3 => "DXT3",
            Self::Dxt5 => "DXT5",
            Self::Bgrx8888 => "BGRX8888",
            Self::Bgr565 => "BGR565",
            Self::Bgrx5551 => "BGRX5551",
            Self::Bgra4444 => "BGRA4444",
            Self::Dxt1OneBitAlpha => "DXT1_ONEBITALPHA",
            Self::Bgra5551 => "BGRA5551",
            Self::Uv88 => "UV88",
            Self::Uvwq8888 => "UVWQ8888",
            Self::Rgba16161616F => "RGBA16161616F",
            Self::Rgba16161616 => "RGBA16161616",
            Self::Uvlx8888 => "UVLX8888",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    /// Storage layout for formats this crate can decode, `None` otherwise.
    pub const fn encoding(self) -> Option<Encoding> {
        let encoding = match self {
            Self::Rgba8888 | Self::Abgr8888 | Self::Argb8888 | Self::Bgra8888 => {
                Encoding::Pixel { bytes: 4, alpha: true }
            }
            Self::Rgb888 | Self::Bgr888 => Encoding::Pixel { bytes: 3, alpha: false },
            Self::Rgb565 => Encoding::Pixel { bytes: 2, alpha: false },
            Self::I8 => Encoding::Pixel { bytes: 1, alpha: false },
            Self::Ia88 => Encoding::Pixel { bytes: 2, alpha: true },
            Self::A8 => Encoding::Pixel { bytes: 1, alpha: true },
            Self::Dxt1 => Encoding::Block { bytes: 8 },
            Self::Dxt5 => Encoding::Block { bytes: 16 },
            _ => return None,
        };
        Some(encoding)
    }

    /// Whether this crate has a decoder for the format.
    pub const fn is_supported(self) -> bool {
        self.encoding().is_some()
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(tag) => write!(f, "UNKNOWN({})", tag),
            other => f.write_str(other.name()),
        }
    }
}
