/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::Write;

use pixconv_core::raster::Raster;

use crate::errors::PPMEncodeErrors;

/// Return the P6 header for an image of the given dimensions
///
/// The layout is fixed: magic, dimensions and max value each on their own line.
pub fn ppm_header(width: u32, height: u32) -> String {
    format!("P6\n{width} {height}\n255\n")
}

/// A PPM encoder
///
/// Writes binary `P6` images with a max value of 255
/// into any [`Write`] sink.
pub struct PPMEncoder<'a, W: Write> {
    writer: &'a mut W
}

impl<'a, W: Write> PPMEncoder<'a, W> {
    /// Create a new PPM encoder that writes to `writer`
    pub fn new(writer: &'a mut W) -> PPMEncoder<'a, W> {
        Self { writer }
    }

    /// Encode `raster` as a P6 file
    ///
    /// Pixels are written in one bulk copy, rows are not padded.
    pub fn encode(&mut self, raster: &Raster) -> Result<(), PPMEncodeErrors> {
        let header = ppm_header(raster.width(), raster.height());

        self.writer.write_all(header.as_bytes())?;
        self.writer.write_all(raster.as_bytes())?;

        Ok(())
    }
}
