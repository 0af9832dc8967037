/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::enums::DownConvert;

/// Options for constructing an [`ImageWriter`](crate::ImageWriter).
///
/// ```
/// use scanpix::{DownConvert, WriterOptions};
///
/// let options = WriterOptions::new()
///     .set_down_convert(DownConvert::Gray)
///     .set_quality(75);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct WriterOptions {
    down_convert: DownConvert,
    quality: i32
}

impl WriterOptions {
    pub fn new() -> WriterOptions {
        WriterOptions::default()
    }

    /// Down-conversion applied to every scanline before encoding.
    pub const fn down_convert(&self) -> DownConvert {
        self.down_convert
    }

    pub fn set_down_convert(mut self, down_convert: DownConvert) -> Self {
        self.down_convert = down_convert;
        self
    }

    /// Compression quality, `-1` for the default of 90.
    ///
    /// Values outside `[0, 100]` are clamped at construction. Has
    /// no observable effect under the PNG codec, it is only
    /// meaningful for lossy targets.
    pub const fn quality(&self) -> i32 {
        self.quality
    }

    pub fn set_quality(mut self, quality: i32) -> Self {
        self.quality = quality;
        self
    }
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            down_convert: DownConvert::None,
            quality: -1
        }
    }
}
