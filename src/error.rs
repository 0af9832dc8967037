/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Display, Formatter};

/// Recoverable data and environment errors.
///
/// These travel through `Result` and are always recoverable by the
/// caller. Contract violations, reading past the declared scanline
/// count, invalid construction parameters or constructing the
/// unimplemented JPEG codec, are programming errors and panic
/// instead of appearing here.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImageErrors {
    /// An error the codec did not describe further
    Unknown,
    /// The source image is interlaced, only sequential scanline
    /// order is supported
    Interlaced,
    /// The source image stores more than eight bits per channel
    BitDepthTooHigh,
    /// Width or height exceeds [`MAX_DIMENSIONS`](crate::MAX_DIMENSIONS)
    DimensionsTooLarge,
    /// The file path extension does not map to a known image type
    UnrecognizedFileType,
    /// The file could not be opened or created
    CannotOpenFile,
    /// The codec failed while decoding image data mid-stream
    ReadDataError
}

impl Display for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageErrors::Unknown => {
                write!(f, "Unknown image error")
            }
            ImageErrors::Interlaced => {
                write!(f, "Interlaced images are not supported")
            }
            ImageErrors::BitDepthTooHigh => {
                write!(f, "Channel bit depth exceeds eight bits")
            }
            ImageErrors::DimensionsTooLarge => {
                write!(f, "Image dimensions are too large")
            }
            ImageErrors::UnrecognizedFileType => {
                write!(f, "Unrecognized image file type")
            }
            ImageErrors::CannotOpenFile => {
                write!(f, "Cannot open image file")
            }
            ImageErrors::ReadDataError => {
                write!(f, "Error reading image data")
            }
        }
    }
}

impl std::error::Error for ImageErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptions_are_fixed_strings() {
        assert_eq!(ImageErrors::Unknown.to_string(), "Unknown image error");
        assert_eq!(
            ImageErrors::UnrecognizedFileType.to_string(),
            "Unrecognized image file type"
        );
        // capitalized, unpunctuated
        for err in [
            ImageErrors::Unknown,
            ImageErrors::Interlaced,
            ImageErrors::BitDepthTooHigh,
            ImageErrors::DimensionsTooLarge,
            ImageErrors::UnrecognizedFileType,
            ImageErrors::CannotOpenFile,
            ImageErrors::ReadDataError
        ] {
            let msg = err.to_string();
            assert!(msg.chars().next().unwrap().is_ascii_uppercase());
            assert!(!msg.ends_with(&['.', '!'][..]));
        }
    }
}
