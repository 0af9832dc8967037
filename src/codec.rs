/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The codec adapter boundary
//!
//! Everything below the scanline state machines is delegated to the
//! row oriented [`png`] crate, treated as a black box. This module
//! owns the only code that talks to it, maps its errors into
//! [`ImageErrors`] and wraps its decode and encode state in
//! single-owner session handles so that a session is torn down
//! exactly once, structurally.

use std::io::{Read, Write};

use log::{trace, warn};
use png::ColorType;

use crate::error::ImageErrors;

/// Header fields of the source image, read before normalization.
#[derive(Copy, Clone, Debug)]
pub(crate) struct RasterHeader {
    pub width: usize,
    pub height: usize,
    pub bit_depth: u8,
    pub interlaced: bool,
    /// Channel count after the transparency side-channel, if any,
    /// has been folded into an alpha channel.
    pub channels: usize
}

/// An open PNG decode session.
///
/// Owns the input stream for its whole lifetime. Rows come out in
/// the normalized form requested at open time, eight bits per
/// channel with palettes expanded and transparency folded into an
/// alpha channel.
pub(crate) struct PngReadSession<R: Read> {
    reader: png::Reader<R>,
    finished: bool
}

impl<R: Read> PngReadSession<R> {
    /// Initialize a decode session and parse the image header.
    ///
    /// Normalization is requested up front, palette and low bit
    /// depth data expand to full byte samples per channel and a
    /// transparency chunk becomes an explicit alpha channel.
    pub fn open(source: R) -> Result<PngReadSession<R>, ImageErrors> {
        let mut decoder = png::Decoder::new(source);
        decoder.set_transformations(png::Transformations::EXPAND);

        let reader = decoder.read_info().map_err(|e| {
            warn!("png: could not parse header: {e}");
            ImageErrors::Unknown
        })?;

        Ok(PngReadSession {
            reader,
            finished: false
        })
    }

    /// Header fields of the source image.
    pub fn header(&self) -> RasterHeader {
        let info = self.reader.info();

        // a tRNS chunk adds an alpha channel to color types that
        // do not already carry one
        let has_trns = info.trns.is_some();

        let channels = match info.color_type {
            ColorType::Grayscale => 1 + usize::from(has_trns),
            ColorType::GrayscaleAlpha => 2,
            ColorType::Indexed | ColorType::Rgb => 3 + usize::from(has_trns),
            ColorType::Rgba => 4
        };

        RasterHeader {
            width: info.width as usize,
            height: info.height as usize,
            bit_depth: info.bit_depth as u8,
            interlaced: info.interlaced,
            channels
        }
    }

    /// Decode the next raw row into `row`.
    ///
    /// `row` must be exactly `width * channels` bytes. Any codec
    /// failure, including a stream that ends early, is reported as
    /// [`ImageErrors::ReadDataError`].
    pub fn read_row(&mut self, row: &mut [u8]) -> Result<(), ImageErrors> {
        match self.reader.next_row() {
            Ok(Some(data)) => {
                row.copy_from_slice(data.data());
                Ok(())
            }
            Ok(None) => {
                warn!("png: row stream ended before the declared height");
                Err(ImageErrors::ReadDataError)
            }
            Err(e) => {
                warn!("png: row decode failed: {e}");
                Err(ImageErrors::ReadDataError)
            }
        }
    }

    /// Drive the stream to its trailing metadata, best effort.
    ///
    /// Called once after the last row, failure is not surfaced.
    pub fn finalize(&mut self) {
        if !self.finished {
            self.finished = true;

            if let Err(e) = self.reader.finish() {
                trace!("png: ignoring error in trailing data: {e}");
            }
        }
    }
}

/// An open PNG encode session.
///
/// Owns the output stream. The header is written eagerly when the
/// session opens, rows are handed over one at a time and trailing
/// metadata is written by [`PngWriteSession::finalize`], which is
/// guarded so it runs at most once.
pub(crate) struct PngWriteSession<W: Write + 'static> {
    stream: Option<png::StreamWriter<'static, W>>
}

impl<W: Write + 'static> PngWriteSession<W> {
    /// Initialize an encode session and emit header metadata,
    /// eight bit channels, non-interlaced, before any row.
    pub fn open(
        sink: W, width: u32, height: u32, color: ColorType, row_bytes: usize
    ) -> Result<PngWriteSession<W>, ImageErrors> {
        let mut encoder = png::Encoder::new(sink, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);

        let writer = encoder.write_header().map_err(|e| {
            warn!("png: could not write header: {e}");
            ImageErrors::Unknown
        })?;

        let stream = writer.into_stream_writer_with_size(row_bytes).map_err(|e| {
            warn!("png: could not start row stream: {e}");
            ImageErrors::Unknown
        })?;

        Ok(PngWriteSession {
            stream: Some(stream)
        })
    }

    /// Hand one serialized row to the codec.
    pub fn write_row(&mut self, row: &[u8]) -> Result<(), ImageErrors> {
        let stream = self
            .stream
            .as_mut()
            .expect("write on a finalized codec session");

        stream.write_all(row).map_err(|e| {
            warn!("png: row encode failed: {e}");
            ImageErrors::Unknown
        })
    }

    /// Write trailing metadata and close the codec, exactly once.
    pub fn finalize(&mut self) -> Result<(), ImageErrors> {
        if let Some(stream) = self.stream.take() {
            stream.finish().map_err(|e| {
                warn!("png: could not finalize stream: {e}");
                ImageErrors::Unknown
            })?;
        }
        Ok(())
    }
}
