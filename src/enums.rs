/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::upper_case_acronyms)]

use std::path::Path;

/// Image types the path dispatcher understands.
///
/// JPEG is recognized by the dispatcher but the JPEG codec is not
/// implemented, constructing a reader or writer for it is a fatal
/// fault.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImageType {
    PNG,
    JPEG
}

impl ImageType {
    /// Determine the image type from a file path extension.
    ///
    /// The trailing three characters are treated as the extension
    /// when the fourth character from the end is a dot, otherwise
    /// the trailing four characters when the fifth from the end is
    /// a dot. The match is ASCII case-insensitive, `.png`, `.jpg`
    /// and `.jpeg` are recognized.
    ///
    /// Returns `None` when no extension is found or the extension
    /// is not in the table.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<ImageType> {
        let path = path.as_ref().to_string_lossy();
        let bytes = path.as_bytes();
        let len = bytes.len();

        let ext_len = if len >= 4 && bytes[len - 4] == b'.' {
            3
        } else if len >= 5 && bytes[len - 5] == b'.' {
            4
        } else {
            return None;
        };

        // uppercase the extension and pack it big-endian
        let mut code: u32 = 0;

        for i in (1..=ext_len).rev() {
            let c = bytes[len - i].to_ascii_uppercase();
            code = (code << 8) | u32::from(c);
        }

        match code {
            0x0050_4E47 => Some(ImageType::PNG),
            0x004A_5047 | 0x4A50_4547 => Some(ImageType::JPEG),
            _ => None
        }
    }
}

/// Down-conversion applied to each scanline before it is encoded.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DownConvert {
    /// Keep the full ARGB data, encoded as RGBA.
    #[default]
    None,
    /// Composite against opaque white and drop the alpha channel.
    Rgb,
    /// Composite against opaque white and reduce to one luma
    /// channel.
    Gray
}

impl DownConvert {
    /// Number of bytes one pixel occupies in the encode buffer.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            DownConvert::None => 4,
            DownConvert::Rgb => 3,
            DownConvert::Gray => 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_png_extensions() {
        assert_eq!(ImageType::from_path("a.png"), Some(ImageType::PNG));
        assert_eq!(ImageType::from_path("A.PNG"), Some(ImageType::PNG));
        assert_eq!(ImageType::from_path("dir.d/photo.pNg"), Some(ImageType::PNG));
    }

    #[test]
    fn recognizes_jpeg_extensions() {
        assert_eq!(ImageType::from_path("x.jpeg"), Some(ImageType::JPEG));
        assert_eq!(ImageType::from_path("x.JPEG"), Some(ImageType::JPEG));
        assert_eq!(ImageType::from_path("photo.JPG"), Some(ImageType::JPEG));
    }

    #[test]
    fn rejects_everything_else() {
        assert_eq!(ImageType::from_path("noext"), None);
        assert_eq!(ImageType::from_path("a.bmp"), None);
        assert_eq!(ImageType::from_path("a.webp"), None);
        assert_eq!(ImageType::from_path("png"), None);
        assert_eq!(ImageType::from_path(""), None);
        // only the trailing extension counts
        assert_eq!(ImageType::from_path("a.png.bak"), None);
    }

    #[test]
    fn bare_extension_still_dispatches() {
        // ".png" is four characters with the dot fourth from last
        assert_eq!(ImageType::from_path(".png"), Some(ImageType::PNG));
        assert_eq!(ImageType::from_path(".jpeg"), Some(ImageType::JPEG));
    }

    #[test]
    fn down_convert_pixel_sizes() {
        assert_eq!(DownConvert::None.bytes_per_pixel(), 4);
        assert_eq!(DownConvert::Rgb.bytes_per_pixel(), 3);
        assert_eq!(DownConvert::Gray.bytes_per_pixel(), 1);
    }
}
