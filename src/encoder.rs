/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Sequential scanline encoding from packed ARGB pixels

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{trace, warn};

use crate::argb::{encode_row_gray, encode_row_rgb, encode_row_rgba};
use crate::codec::PngWriteSession;
use crate::constants::{DEFAULT_QUALITY, MAX_DIMENSIONS};
use crate::enums::{DownConvert, ImageType};
use crate::error::ImageErrors;
use crate::options::WriterOptions;

/// A sequential scanline image writer.
///
/// Owns its output stream and codec session. The caller fills the
/// row exposed by [`row_mut`](ImageWriter::row_mut) with packed
/// ARGB pixels and calls [`write_row`](ImageWriter::write_row) once
/// per scanline, exactly [`height`](ImageWriter::height) times.
/// The codec session is finalized inside the call that writes the
/// last row.
///
/// Dropping the writer before all rows are written is accepted and
/// deliberately leaves a truncated output with no validity
/// guarantee.
///
/// The sink must own its destination (`W: 'static`), ownership of
/// the stream transfers into the writer for its whole lifetime.
pub struct ImageWriter<W: Write + 'static> {
    session: PngWriteSession<W>,
    width: usize,
    height: usize,
    down: DownConvert,
    quality: i32,
    scan_count: usize,
    /// Packed ARGB input row, caller mutable. Not cleared between
    /// writes.
    scan: Vec<u32>,
    /// Serialized codec bytes, sized by the down-conversion mode.
    data: Vec<u8>
}

impl ImageWriter<BufWriter<File>> {
    /// Create an image file, dispatching the codec on the path
    /// extension.
    ///
    /// Fails with [`ImageErrors::UnrecognizedFileType`] when the
    /// extension is not in the dispatch table and with
    /// [`ImageErrors::CannotOpenFile`] when the file cannot be
    /// created. When the target codec requires a down-conversion
    /// and none was requested, RGB is selected silently.
    pub fn create<P: AsRef<Path>>(
        path: P, width: usize, height: usize, options: WriterOptions
    ) -> Result<ImageWriter<BufWriter<File>>, ImageErrors> {
        let Some(itype) = ImageType::from_path(path.as_ref()) else {
            return Err(ImageErrors::UnrecognizedFileType);
        };

        let file = File::create(path.as_ref()).map_err(|_| ImageErrors::CannotOpenFile)?;

        // lossy targets cannot carry an alpha channel
        let options = if itype == ImageType::JPEG && options.down_convert() == DownConvert::None {
            options.set_down_convert(DownConvert::Rgb)
        } else {
            options
        };

        ImageWriter::new(BufWriter::new(file), itype, width, height, options)
    }
}

impl<W: Write + 'static> ImageWriter<W> {
    /// Construct a writer over an open stream and eagerly emit the
    /// header metadata, before any row is supplied.
    ///
    /// A quality of `-1` selects the default of 90, other values
    /// are clamped to `[0, 100]`. Quality is stored but has no
    /// observable effect under the PNG codec.
    ///
    /// # Panics
    /// If `width` or `height` is outside `[1, MAX_DIMENSIONS]`, or
    /// if `itype` is [`ImageType::JPEG`], the JPEG codec is
    /// declared but not implemented.
    pub fn new(
        sink: W, itype: ImageType, width: usize, height: usize, options: WriterOptions
    ) -> Result<ImageWriter<W>, ImageErrors> {
        assert!(
            (1..=MAX_DIMENSIONS).contains(&width),
            "width out of range [1, {MAX_DIMENSIONS}]"
        );
        assert!(
            (1..=MAX_DIMENSIONS).contains(&height),
            "height out of range [1, {MAX_DIMENSIONS}]"
        );

        match itype {
            ImageType::PNG => {}
            ImageType::JPEG => unimplemented!("the JPEG codec is not implemented")
        }

        let quality = if options.quality() == -1 {
            DEFAULT_QUALITY
        } else {
            if !(0..=100).contains(&options.quality()) {
                warn!("quality {} out of range, clamping", options.quality());
            }
            options.quality().clamp(0, 100)
        };

        let down = options.down_convert();

        let color = match down {
            DownConvert::None => png::ColorType::Rgba,
            DownConvert::Rgb => png::ColorType::Rgb,
            DownConvert::Gray => png::ColorType::Grayscale
        };

        let row_bytes = width * down.bytes_per_pixel();
        let session = PngWriteSession::open(sink, width as u32, height as u32, color, row_bytes)?;

        trace!("png: writing {width}x{height} pixels, {down:?} down-conversion");

        Ok(ImageWriter {
            session,
            width,
            height,
            down,
            quality,
            scan_count: 0,
            scan: vec![0; width],
            data: vec![0; row_bytes]
        })
    }

    /// Width of the image in pixels.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height of the image in pixels, the number of times
    /// [`write_row`](ImageWriter::write_row) must be called.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// The normalized compression quality in `[0, 100]`.
    pub const fn quality(&self) -> i32 {
        self.quality
    }

    /// The scanline buffer, width packed ARGB pixels.
    ///
    /// Fill the whole row before each
    /// [`write_row`](ImageWriter::write_row), the buffer is not
    /// cleared between calls.
    pub fn row_mut(&mut self) -> &mut [u32] {
        &mut self.scan
    }

    /// Encode the current scanline buffer.
    ///
    /// Converts the row through the pipeline selected by the
    /// down-conversion mode and hands it to the codec. The call
    /// that writes the last row also finalizes the codec session,
    /// synchronously. An encode failure is an environment fault
    /// reported as [`ImageErrors::Unknown`], the writer does not
    /// latch.
    ///
    /// # Panics
    /// If called more than [`height`](ImageWriter::height) times.
    pub fn write_row(&mut self) -> Result<(), ImageErrors> {
        assert!(
            self.scan_count < self.height,
            "wrote past the declared scanline count ({} rows)",
            self.height
        );

        match self.down {
            DownConvert::None => encode_row_rgba(&self.scan, &mut self.data),
            DownConvert::Rgb => encode_row_rgb(&self.scan, &mut self.data),
            DownConvert::Gray => encode_row_gray(&self.scan, &mut self.data)
        }

        self.session.write_row(&self.data)?;
        self.scan_count += 1;

        if self.scan_count == self.height {
            self.session.finalize()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::enums::{DownConvert, ImageType};
    use crate::encoder::ImageWriter;
    use crate::options::WriterOptions;

    #[test]
    fn quality_sentinel_and_clamping() {
        let writer =
            ImageWriter::new(Vec::new(), ImageType::PNG, 1, 1, WriterOptions::default()).unwrap();
        assert_eq!(writer.quality(), 90);
        drop(writer);

        let writer = ImageWriter::new(
            Vec::new(),
            ImageType::PNG,
            1,
            1,
            WriterOptions::new().set_quality(300)
        )
        .unwrap();
        assert_eq!(writer.quality(), 100);
    }

    #[test]
    #[should_panic(expected = "width out of range")]
    fn zero_width_is_a_contract_violation() {
        let _ = ImageWriter::new(Vec::new(), ImageType::PNG, 0, 1, WriterOptions::default());
    }

    #[test]
    fn encode_buffer_sized_by_mode() {
        for (mode, bpp) in [
            (DownConvert::None, 4),
            (DownConvert::Rgb, 3),
            (DownConvert::Gray, 1)
        ] {
            let writer = ImageWriter::new(
                Vec::new(),
                ImageType::PNG,
                5,
                2,
                WriterOptions::new().set_down_convert(mode)
            )
            .unwrap();
            assert_eq!(writer.data.len(), 5 * bpp);
            assert_eq!(writer.scan.len(), 5);
        }
    }
}
