/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Sequential scanline decoding into packed ARGB pixels

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::trace;

use crate::argb::decode_row;
use crate::codec::PngReadSession;
use crate::constants::MAX_DIMENSIONS;
use crate::enums::ImageType;
use crate::error::ImageErrors;

/// Decode progress of a reader.
///
/// `Errored` is a permanent latch, once a mid-stream decode failure
/// has been observed the reader never attempts to resync the
/// stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ReaderState {
    /// Constructed, no row read yet.
    Ready,
    /// At least one row decoded successfully.
    Reading,
    /// A decode failure was latched, every further read reports an
    /// error over a zeroed buffer.
    Errored
}

/// A sequential scanline image reader.
///
/// Owns its input stream and codec session. Rows are decoded one at
/// a time into an internal buffer of packed ARGB pixels, width
/// pixels long, whose contents are valid until the next call to
/// [`read_row`](ImageReader::read_row).
///
/// Calling `read_row` more than [`height`](ImageReader::height)
/// times on a healthy reader is a contract violation and panics.
pub struct ImageReader<R: Read> {
    session: PngReadSession<R>,
    width: usize,
    height: usize,
    channels: usize,
    scan_count: usize,
    state: ReaderState,
    /// Packed ARGB output row.
    scan: Vec<u32>,
    /// Raw codec bytes, `width * channels` long.
    data: Vec<u8>
}

impl ImageReader<File> {
    /// Open an image file, dispatching the codec on the path
    /// extension.
    ///
    /// Fails with [`ImageErrors::UnrecognizedFileType`] when the
    /// extension is not in the dispatch table and with
    /// [`ImageErrors::CannotOpenFile`] when the file cannot be
    /// opened for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ImageReader<File>, ImageErrors> {
        let Some(itype) = ImageType::from_path(path.as_ref()) else {
            return Err(ImageErrors::UnrecognizedFileType);
        };

        let file = File::open(path.as_ref()).map_err(|_| ImageErrors::CannotOpenFile)?;

        ImageReader::new(file, itype)
    }
}

impl<R: Read> ImageReader<R> {
    /// Construct a reader over an open stream.
    ///
    /// Parses the image header, validates it and sizes the internal
    /// buffers. On any failure every partially acquired resource is
    /// released before returning, a half built reader never
    /// escapes.
    ///
    /// # Panics
    /// If `itype` is [`ImageType::JPEG`], the JPEG codec is
    /// declared but not implemented.
    pub fn new(source: R, itype: ImageType) -> Result<ImageReader<R>, ImageErrors> {
        match itype {
            ImageType::PNG => {}
            ImageType::JPEG => unimplemented!("the JPEG codec is not implemented")
        }

        let session = PngReadSession::open(source)?;
        let header = session.header();

        if header.width > MAX_DIMENSIONS || header.height > MAX_DIMENSIONS {
            return Err(ImageErrors::DimensionsTooLarge);
        }
        if header.interlaced {
            return Err(ImageErrors::Interlaced);
        }
        if header.bit_depth > 8 {
            return Err(ImageErrors::BitDepthTooHigh);
        }

        trace!(
            "png: {}x{} pixels, {} channels, {} bit",
            header.width,
            header.height,
            header.channels,
            header.bit_depth
        );

        Ok(ImageReader {
            session,
            width: header.width,
            height: header.height,
            channels: header.channels,
            scan_count: 0,
            state: ReaderState::Ready,
            scan: vec![0; header.width],
            data: vec![0; header.width * header.channels]
        })
    }

    /// Width of the image in pixels.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height of the image in pixels, the number of rows
    /// [`read_row`](ImageReader::read_row) will produce.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Channel count of the source image in range `1..=4`,
    /// including an alpha channel derived from a transparency
    /// side-channel.
    pub const fn channels(&self) -> usize {
        self.channels
    }

    /// Decode the next scanline.
    ///
    /// Returns the internal row of packed ARGB pixels, valid until
    /// the next call. A mid-stream decode failure zeroes the row,
    /// latches the error permanently and returns
    /// [`ImageErrors::ReadDataError`], as does every call after
    /// that. After the last row the codec session is finalized,
    /// best effort.
    ///
    /// # Panics
    /// If called more than [`height`](ImageReader::height) times on
    /// a reader that has not latched an error.
    pub fn read_row(&mut self) -> Result<&[u32], ImageErrors> {
        if self.state == ReaderState::Errored {
            self.scan.fill(0);
            return Err(ImageErrors::ReadDataError);
        }

        assert!(
            self.scan_count < self.height,
            "read past the declared scanline count ({} rows)",
            self.height
        );

        if let Err(e) = self.session.read_row(&mut self.data) {
            self.scan.fill(0);
            self.state = ReaderState::Errored;
            return Err(e);
        }

        decode_row(&self.data, &mut self.scan, self.channels);

        self.state = ReaderState::Reading;
        self.scan_count += 1;

        if self.scan_count == self.height {
            // trailing metadata, failure here is not surfaced
            self.session.finalize();
        }

        Ok(&self.scan)
    }
}
