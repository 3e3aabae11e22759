//! DXT1 and DXT5 block decompression.
//!
//! Each block covers a 4x4 tile. Texels are produced in row-major order as
//! RGBA quadruplets.

use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, KnownLayout};

/// Texels of one decoded 4x4 tile, row-major.
pub type Tile = [[u8; 4]; 16];

/// Expand a packed RGB565 word to 8 bits per channel.
///
/// The high bits of each field are replicated into the low bits, so the
/// extremes map to 0 and 255.
#[inline]
pub fn expand_rgb565(value: u16) -> [u8; 3] {
    let r = (value >> 11) & 0x1f;
    let g = (value >> 5) & 0x3f;
    let b = value & 0x1f;
    [
        ((r << 3) | (r >> 2)) as u8,
        ((g << 2) | (g >> 4)) as u8,
        ((b << 3) | (b >> 2)) as u8,
    ]
}

/// Colour half of a DXT block: two RGB565 endpoints and 2-bit selectors.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ColorBlock {
    /// First endpoint.
    pub color0: U16,
    /// Second endpoint.
    pub color1: U16,
    /// Sixteen 2-bit palette indices, first texel in the low bits.
    pub selectors: U32,
}

/// DXT1 block (8 bytes).
pub type Dxt1Block = ColorBlock;

/// Alpha half of a DXT5 block: two endpoints and 3-bit selectors.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct AlphaBlock {
    /// First endpoint.
    pub alpha0: u8,
    /// Second endpoint.
    pub alpha1: u8,
    /// Sixteen 3-bit palette indices, 48-bit little endian.
    pub selectors: [u8; 6],
}

/// DXT5 block (16 bytes).
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Dxt5Block {
    pub alpha: AlphaBlock,
    pub color: ColorBlock,
}

impl ColorBlock {
    /// Build the four-entry palette.
    ///
    /// With `punch_through` set and `color0 <= color1`, the block uses the
    /// three-colour mode whose last entry is transparent black. Otherwise
    /// both middle entries are interpolated at thirds.
    pub fn palette(&self, punch_through: bool) -> [[u8; 4]; 4] {
        let raw0 = self.color0.get();
        let raw1 = self.color1.get();
        let c0 = expand_rgb565(raw0).map(u16::from);
        let c1 = expand_rgb565(raw1).map(u16::from);

        let lerp = |w0: u16, w1: u16, bias: u16, div: u16| -> [u8; 4] {
            let mix = |i: usize| ((w0 * c0[i] + w1 * c1[i] + bias) / div) as u8;
            [mix(0), mix(1), mix(2), 255]
        };

        let opaque = |c: [u16; 3]| [c[0] as u8, c[1] as u8, c[2] as u8, 255];

        if !punch_through || raw0 > raw1 {
            [opaque(c0), opaque(c1), lerp(4, 2, 3, 6), lerp(2, 4, 3, 6)]
        } else {
            [opaque(c0), opaque(c1), lerp(1, 1, 1, 2), [0, 0, 0, 0]]
        }
    }

    /// Palette index of texel `i`.
    #[inline]
    fn index(&self, i: usize) -> usize {
        ((self.selectors.get() >> (2 * i)) & 3) as usize
    }
}

impl AlphaBlock {
    /// Build the eight-entry alpha palette.
    pub fn palette(&self) -> [u8; 8] {
        let a0 = u16::from(self.alpha0);
        let a1 = u16::from(self.alpha1);
        let lerp = |w0: u16, w1: u16, bias: u16, div: u16| ((w0 * a0 + w1 * a1 + bias) / div) as u8;

        if a0 > a1 {
            [
                self.alpha0,
                self.alpha1,
                lerp(12, 2, 7, 14),
                lerp(10, 4, 7, 14),
                lerp(8, 6, 7, 14),
                lerp(6, 8, 7, 14),
                lerp(4, 10, 7, 14),
                lerp(2, 12, 7, 14),
            ]
        } else {
            [
                self.alpha0,
                self.alpha1,
                lerp(8, 2, 5, 10),
                lerp(6, 4, 5, 10),
                lerp(4, 6, 5, 10),
                lerp(2, 8, 5, 10),
                0,
                255,
            ]
        }
    }

    #[inline]
    fn selector_bits(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes[..6].copy_from_slice(&self.selectors);
        u64::from_le_bytes(bytes)
    }
}

/// Decode a DXT1 block.
pub fn decode_dxt1(block: &Dxt1Block) -> Tile {
    let palette = block.palette(true);
    std::array::from_fn(|i| palette[block.index(i)])
}

/// Decode a DXT5 block.
pub fn decode_dxt5(block: &Dxt5Block) -> Tile {
    let alphas = block.alpha.palette();
    let bits = block.alpha.selector_bits();
    let colors = block.color.palette(false);

    std::array::from_fn(|i| {
        let [r, g, b, _] = colors[block.color.index(i)];
        let a = alphas[((bits >> (3 * i)) & 7) as usize];
        [r, g, b, a]
    })
}
