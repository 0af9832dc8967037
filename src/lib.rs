/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Scanline oriented ARGB image reading and writing
//!
//! This crate gives every image one uniform in-memory form, packed
//! 32-bit ARGB samples, and streams them one scanline at a time
//! over a row based PNG codec. Color space handling and lossy
//! down-conversion to RGB or grayscale live here, the compressed
//! bitstream itself is delegated to the [`png`] crate.
//!
//! # Features
//! - Packed ARGB pixels, independent of machine byte order
//! - Strictly sequential scanline decode and encode
//! - RGB and grayscale down-conversion against a white background
//! - File type dispatch from the path extension
//!
//! # Usage
//!
//! Copy an image row by row, re-encoding it completely:
//!
//! ```no_run
//! use scanpix::{ImageReader, ImageWriter, WriterOptions};
//!
//! let mut reader = ImageReader::open("input.png").unwrap();
//!
//! let mut writer = ImageWriter::create(
//!     "output.png",
//!     reader.width(),
//!     reader.height(),
//!     WriterOptions::default()
//! )
//! .unwrap();
//!
//! for _ in 0..reader.height() {
//!     let row = reader.read_row().unwrap().to_vec();
//!
//!     writer.row_mut().copy_from_slice(&row);
//!     writer.write_row().unwrap();
//! }
//! ```
//!
//! # Error handling
//!
//! Data and environment failures, an unopenable file, an
//! unsupported image, a stream that goes bad mid-decode, are
//! reported through [`ImageErrors`] and are always recoverable.
//! Contract violations, such as reading past the declared height or
//! constructing the unimplemented JPEG codec, panic. A reader that
//! hits a mid-stream decode error latches permanently and keeps
//! reporting the error over a zeroed row.

pub use argb::Argb;
pub use constants::MAX_DIMENSIONS;
pub use decoder::ImageReader;
pub use encoder::ImageWriter;
pub use enums::{DownConvert, ImageType};
pub use error::ImageErrors;
pub use options::WriterOptions;

mod argb;
mod codec;
mod constants;
mod decoder;
mod encoder;
mod enums;
mod error;
mod options;
