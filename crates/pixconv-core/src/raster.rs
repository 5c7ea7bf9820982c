/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The in-memory image shared by all codecs
//!
//! A [`Raster`] is always 8 bit RGB with interleaved samples
//! stored top to bottom, left to right in one contiguous buffer.
use core::fmt::{Debug, Display, Formatter};

use crate::colorspace::ColorSpace;

/// Errors raised when constructing a raster
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum RasterError {
    /// The pixel buffer does not hold exactly `width*height*3` bytes
    ///
    /// expected, found
    DataLength(usize, usize),
    /// `width*height*3` does not fit in memory
    TooLarge(u32, u32)
}

impl Debug for RasterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            RasterError::DataLength(expected, found) => {
                writeln!(
                    f,
                    "Pixel data length does not match dimensions, expected {expected} bytes but found {found}"
                )
            }
            RasterError::TooLarge(width, height) => {
                writeln!(f, "Raster of {width}x{height} pixels is too large")
            }
        }
    }
}

impl Display for RasterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for RasterError {}

/// An 8 bit RGB image
///
/// # Invariant
/// `data.len() == width * height * 3`, upheld by every constructor.
#[derive(Clone, Eq, PartialEq)]
pub struct Raster {
    width:  u32,
    height: u32,
    data:   Vec<u8>
}

impl Raster {
    /// Number of bytes a `width x height` RGB raster occupies
    ///
    /// Returns an error if the size overflows `usize`
    pub fn byte_size(width: u32, height: u32) -> Result<usize, RasterError> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|x| x.checked_mul(ColorSpace::RGB.num_components()))
            .ok_or(RasterError::TooLarge(width, height))
    }

    /// Create a raster from packed, interleaved RGB bytes
    ///
    /// # Example
    /// ```
    /// use pixconv_core::raster::Raster;
    /// let raster = Raster::new(1, 2, vec![255, 0, 0, 0, 255, 0]).unwrap();
    /// assert_eq!(raster.pixel(0, 1), [0, 255, 0]);
    ///
    /// assert!(Raster::new(2, 2, vec![0; 3]).is_err());
    /// ```
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Raster, RasterError> {
        let expected = Raster::byte_size(width, height)?;

        if data.len() != expected {
            return Err(RasterError::DataLength(expected, data.len()));
        }
        Ok(Raster {
            width,
            height,
            data
        })
    }

    /// Create a raster from a list of `[R,G,B]` pixels in row-major order
    pub fn from_pixels(width: u32, height: u32, pixels: &[[u8; 3]]) -> Result<Raster, RasterError> {
        let data = pixels.iter().flatten().copied().collect();

        Raster::new(width, height, data)
    }

    /// Create a raster where every pixel has the same color
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Result<Raster, RasterError> {
        let size = Raster::byte_size(width, height)?;

        let data = color.iter().copied().cycle().take(size).collect();

        Raster::new(width, height, data)
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Return `(width, height)`
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Colorspace of the stored samples, always RGB
    pub const fn colorspace(&self) -> ColorSpace {
        ColorSpace::RGB
    }

    /// Interleaved RGB bytes, row-major, top to bottom
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the interleaved RGB bytes
    ///
    /// The length is fixed so the raster invariant cannot be broken through it
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Iterate over all pixels in row-major order
    pub fn pixels(&self) -> impl ExactSizeIterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(3).map(|x| [x[0], x[1], x[2]])
    }

    /// Return the pixel at column `x` of row `y`
    ///
    /// # Panics
    /// If `x` or `y` lie outside the raster
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        assert!(x < self.width && y < self.height, "Pixel out of bounds");

        let pos = (y as usize * self.width as usize + x as usize) * 3;

        [self.data[pos], self.data[pos + 1], self.data[pos + 2]]
    }

    /// Return the row `y` as interleaved RGB bytes
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 3;
        let start = y as usize * stride;

        &self.data[start..start + stride]
    }
}

impl Debug for Raster {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        // pixels are intentionally left out, they are rarely readable
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}
