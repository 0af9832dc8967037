/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The ARGB color pipeline
//!
//! Pixels move through this library as packed 32-bit values,
//! bits 31-24 alpha, 23-16 red, 15-8 green, 7-0 blue, assembled
//! with explicit shifts so the layout is independent of machine
//! byte order. Alpha is linear and non-premultiplied, the RGB
//! channels are sRGB encoded.
//!
//! [`Argb`] is the parsed form. Channels are `i32` so intermediate
//! values may be out of range, clamping only happens when a color
//! is packed or down-converted.

/// A parsed ARGB color.
///
/// Each channel is logically in the range `[0, 255]` but values
/// are not required to be clamped until [`Argb::pack`] is called.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Argb {
    pub a: i32,
    pub r: i32,
    pub g: i32,
    pub b: i32
}

#[inline]
fn clamp_channel(v: i32) -> i32 {
    v.clamp(0, 255)
}

impl Argb {
    pub const fn new(a: i32, r: i32, g: i32, b: i32) -> Argb {
        Argb { a, r, g, b }
    }

    /// Pack the color into a 32-bit value.
    ///
    /// Each channel is clamped to `[0, 255]` independently before
    /// being shifted into place.
    pub fn pack(self) -> u32 {
        let a = clamp_channel(self.a) as u32;
        let r = clamp_channel(self.r) as u32;
        let g = clamp_channel(self.g) as u32;
        let b = clamp_channel(self.b) as u32;

        (a << 24) | (r << 16) | (g << 8) | b
    }

    /// Extract a packed 32-bit value into its four channels.
    ///
    /// The inverse of [`Argb::pack`], no clamping is needed.
    pub const fn unpack(c: u32) -> Argb {
        Argb {
            a: ((c >> 24) & 0xff) as i32,
            r: ((c >> 16) & 0xff) as i32,
            g: ((c >> 8) & 0xff) as i32,
            b: (c & 0xff) as i32
        }
    }

    /// Down-convert the color to fully opaque RGB.
    ///
    /// All four channels are clamped first. A fully opaque color is
    /// left unchanged, a fully transparent color becomes opaque
    /// white, and partial alpha is approximated by compositing
    /// against an opaque white background with integer arithmetic.
    /// Gamma is ignored.
    pub fn down_rgb(&mut self) {
        self.a = clamp_channel(self.a);
        self.r = clamp_channel(self.r);
        self.g = clamp_channel(self.g);
        self.b = clamp_channel(self.b);

        if self.a == 0 {
            *self = Argb::new(255, 255, 255, 255);
            return;
        }

        if self.a < 255 {
            // Integer division here truncates toward zero, which is
            // part of the observable output and must stay that way.
            self.r = 255 + ((self.a * (self.r - 255)) / 255);
            self.g = 255 + ((self.a * (self.g - 255)) / 255);
            self.b = 255 + ((self.a * (self.b - 255)) / 255);
            self.a = 255;

            self.r = clamp_channel(self.r);
            self.g = clamp_channel(self.g);
            self.b = clamp_channel(self.b);
        }
    }

    /// Down-convert the color to an opaque gray.
    ///
    /// Applies [`Argb::down_rgb`] first. If the RGB channels already
    /// agree nothing more is done, otherwise they are replaced by
    /// the BT.709 luma `(2126*r + 7152*g + 722*b) / 10000`.
    pub fn down_gray(&mut self) {
        self.down_rgb();

        if self.r != self.g || self.r != self.b {
            let luma = (2126 * self.r + 7152 * self.g + 722 * self.b) / 10000;

            let luma = clamp_channel(luma);

            self.r = luma;
            self.g = luma;
            self.b = luma;
        }
    }
}

/// Serialize a scanline of packed pixels into RGBA bytes.
pub(crate) fn encode_row_rgba(scan: &[u32], data: &mut [u8]) {
    assert_eq!(data.len(), scan.len() * 4, "rgba row buffer size mismatch");

    for (pix, out) in scan.iter().zip(data.chunks_exact_mut(4)) {
        let argb = Argb::unpack(*pix);

        out[0] = argb.r as u8;
        out[1] = argb.g as u8;
        out[2] = argb.b as u8;
        out[3] = argb.a as u8;
    }
}

/// Serialize a scanline of packed pixels into RGB bytes,
/// down-converting each pixel first.
pub(crate) fn encode_row_rgb(scan: &[u32], data: &mut [u8]) {
    assert_eq!(data.len(), scan.len() * 3, "rgb row buffer size mismatch");

    for (pix, out) in scan.iter().zip(data.chunks_exact_mut(3)) {
        let mut argb = Argb::unpack(*pix);
        argb.down_rgb();

        out[0] = argb.r as u8;
        out[1] = argb.g as u8;
        out[2] = argb.b as u8;
    }
}

/// Serialize a scanline of packed pixels into grayscale bytes,
/// one luma byte per pixel.
pub(crate) fn encode_row_gray(scan: &[u32], data: &mut [u8]) {
    assert_eq!(data.len(), scan.len(), "gray row buffer size mismatch");

    for (pix, out) in scan.iter().zip(data.iter_mut()) {
        let mut argb = Argb::unpack(*pix);
        argb.down_gray();

        // after down_gray the channels agree, blue is as good as any
        *out = argb.b as u8;
    }
}

/// Decode raw codec bytes into packed pixels.
///
/// `channels` selects the layout, 1 is grayscale, 2 is grayscale
/// plus alpha, 3 is RGB and 4 is RGBA. Grayscale values are
/// replicated into all three color channels, missing alpha becomes
/// fully opaque.
pub(crate) fn decode_row(data: &[u8], scan: &mut [u32], channels: usize) {
    assert!((1..=4).contains(&channels), "invalid channel count");
    assert_eq!(
        data.len(),
        scan.len() * channels,
        "raw row buffer size mismatch"
    );

    for (raw, pix) in data.chunks_exact(channels).zip(scan.iter_mut()) {
        let argb = match channels {
            1 => Argb::new(255, i32::from(raw[0]), i32::from(raw[0]), i32::from(raw[0])),
            2 => Argb::new(
                i32::from(raw[1]),
                i32::from(raw[0]),
                i32::from(raw[0]),
                i32::from(raw[0])
            ),
            3 => Argb::new(
                255,
                i32::from(raw[0]),
                i32::from(raw[1]),
                i32::from(raw[2])
            ),
            4 => Argb::new(
                i32::from(raw[3]),
                i32::from(raw[0]),
                i32::from(raw[1]),
                i32::from(raw[2])
            ),
            _ => unreachable!()
        };
        *pix = argb.pack();
    }
}

#[cfg(test)]
mod tests {
    use nanorand::Rng;

    use super::*;

    #[test]
    fn pack_unpack_round_trip() {
        let mut rng = nanorand::WyRand::new_seed(0x5ca9_71c5);

        for _ in 0..10_000 {
            let argb = Argb::new(
                (rng.generate::<u32>() % 256) as i32,
                (rng.generate::<u32>() % 256) as i32,
                (rng.generate::<u32>() % 256) as i32,
                (rng.generate::<u32>() % 256) as i32
            );
            assert_eq!(Argb::unpack(argb.pack()), argb);
        }
        // every packed value survives an unpack/pack cycle
        for _ in 0..10_000 {
            let c = rng.generate::<u32>();
            assert_eq!(Argb::unpack(c).pack(), c);
        }
    }

    #[test]
    fn pack_layout() {
        let c = Argb::new(0x12, 0x34, 0x56, 0x78).pack();
        assert_eq!(c, 0x1234_5678);
    }

    #[test]
    fn pack_clamps_out_of_range_channels() {
        let wild = Argb::new(-5, 300, 0, 0).pack();
        let tame = Argb::new(0, 255, 0, 0).pack();
        assert_eq!(wild, tame);
    }

    #[test]
    fn down_rgb_opaque_is_identity() {
        let mut argb = Argb::new(255, 13, 200, 96);
        argb.down_rgb();
        assert_eq!(argb, Argb::new(255, 13, 200, 96));
    }

    #[test]
    fn down_rgb_transparent_is_white() {
        let mut argb = Argb::new(0, 13, 200, 96);
        argb.down_rgb();
        assert_eq!(argb, Argb::new(255, 255, 255, 255));

        // negative alpha clamps to zero first
        let mut argb = Argb::new(-20, 1, 2, 3);
        argb.down_rgb();
        assert_eq!(argb, Argb::new(255, 255, 255, 255));
    }

    #[test]
    fn down_rgb_partial_alpha_truncates() {
        // 255 + (128 * (0 - 255)) / 255 == 255 - 128 == 127,
        // integer truncation, not a float approximation
        let mut argb = Argb::new(128, 0, 255, 255);
        argb.down_rgb();
        assert_eq!(argb, Argb::new(255, 127, 255, 255));

        let mut argb = Argb::new(1, 0, 0, 0);
        argb.down_rgb();
        assert_eq!(argb, Argb::new(255, 254, 254, 254));
    }

    #[test]
    fn down_gray_skips_equal_channels() {
        let mut argb = Argb::new(255, 100, 100, 100);
        argb.down_gray();
        assert_eq!(argb, Argb::new(255, 100, 100, 100));
    }

    #[test]
    fn down_gray_luma() {
        // (2126 * 255) / 10000 == 54 for pure red
        let mut argb = Argb::new(255, 255, 0, 0);
        argb.down_gray();
        assert_eq!(argb, Argb::new(255, 54, 54, 54));
    }

    #[test]
    fn down_gray_is_idempotent() {
        let mut rng = nanorand::WyRand::new_seed(0xdead_cafe);

        for _ in 0..10_000 {
            let mut once = Argb::unpack(rng.generate::<u32>());
            once.down_gray();

            let mut twice = once;
            twice.down_gray();

            assert_eq!(once, twice);
        }
    }

    #[test]
    fn row_decode_layouts() {
        let mut scan = [0_u32; 2];

        decode_row(&[7, 200], &mut scan, 1);
        assert_eq!(scan[0], Argb::new(255, 7, 7, 7).pack());
        assert_eq!(scan[1], Argb::new(255, 200, 200, 200).pack());

        decode_row(&[7, 40, 200, 80], &mut scan, 2);
        assert_eq!(scan[0], Argb::new(40, 7, 7, 7).pack());
        assert_eq!(scan[1], Argb::new(80, 200, 200, 200).pack());

        decode_row(&[1, 2, 3, 4, 5, 6], &mut scan, 3);
        assert_eq!(scan[0], Argb::new(255, 1, 2, 3).pack());
        assert_eq!(scan[1], Argb::new(255, 4, 5, 6).pack());

        decode_row(&[1, 2, 3, 4, 5, 6, 7, 8], &mut scan, 4);
        assert_eq!(scan[0], Argb::new(4, 1, 2, 3).pack());
        assert_eq!(scan[1], Argb::new(8, 5, 6, 7).pack());
    }

    #[test]
    fn row_encode_rgba_preserves_channels() {
        let scan = [Argb::new(9, 1, 2, 3).pack(), Argb::new(10, 4, 5, 6).pack()];
        let mut data = [0_u8; 8];

        encode_row_rgba(&scan, &mut data);
        assert_eq!(data, [1, 2, 3, 9, 4, 5, 6, 10]);
    }

    #[test]
    fn row_encode_gray_uses_down_converted_luma() {
        let scan = [Argb::new(255, 255, 0, 0).pack()];
        let mut data = [0_u8; 1];

        encode_row_gray(&scan, &mut data);
        assert_eq!(data, [54]);
    }
}
