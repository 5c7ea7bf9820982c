/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during PPM decoding and encoding
use core::fmt::{Debug, Display, Formatter};
use std::io;

use pixconv_core::bytestream::ByteIoError;
use pixconv_core::raster::RasterError;

/// Errors possible during decoding
#[non_exhaustive]
pub enum PPMDecodeErrors {
    /// The first token of the file is not `P6`
    InvalidMagic([u8; 2]),
    /// A header token is missing or malformed
    InvalidHeader(String),
    /// Maximum channel value other than 255
    UnsupportedMaxValue(usize),
    /// Fewer pixel bytes than the header promises
    TruncatedData { expected: usize, found: usize },
    /// Image dimensions exceed the configured limits
    ///
    /// limit, found
    LargeDimensions(usize, usize),
    /// Width or height is zero
    ZeroDimensions,
    /// Bytes after the pixel data, only reported in strict mode
    TrailingBytes(usize),
    /// The decoded pixels could not form a raster
    Raster(RasterError),
    /// An error reported by the byte reader
    GenericStatic(&'static str)
}

impl Debug for PPMDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidMagic(magic) => {
                writeln!(
                    f,
                    "Invalid magic bytes, expected P6 but found {:?}",
                    String::from_utf8_lossy(magic)
                )
            }
            Self::InvalidHeader(val) => {
                writeln!(f, "Invalid header, reason: {val}")
            }
            Self::UnsupportedMaxValue(val) => {
                writeln!(f, "Unsupported max value {val}, only 255 is supported")
            }
            Self::TruncatedData { expected, found } => {
                writeln!(
                    f,
                    "Truncated pixel data, expected {expected} bytes but found {found}"
                )
            }
            Self::LargeDimensions(expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions, expected a value less than {expected} but found {found}"
                )
            }
            Self::ZeroDimensions => {
                writeln!(f, "Zero found as image width or height")
            }
            Self::TrailingBytes(count) => {
                writeln!(f, "Found {count} bytes after pixel data")
            }
            Self::Raster(err) => writeln!(f, "{err:?}"),
            Self::GenericStatic(val) => writeln!(f, "{val}")
        }
    }
}

impl Display for PPMDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for PPMDecodeErrors {}

impl From<ByteIoError> for PPMDecodeErrors {
    fn from(value: ByteIoError) -> Self {
        match value {
            ByteIoError::NotEnoughBytes(expected, found) => {
                PPMDecodeErrors::TruncatedData { expected, found }
            }
            ByteIoError::Generic(err) => PPMDecodeErrors::GenericStatic(err)
        }
    }
}

impl From<RasterError> for PPMDecodeErrors {
    fn from(value: RasterError) -> Self {
        PPMDecodeErrors::Raster(value)
    }
}

/// Errors occurring during encoding
pub enum PPMEncodeErrors {
    IoErrors(io::Error)
}

impl From<io::Error> for PPMEncodeErrors {
    fn from(err: io::Error) -> Self {
        PPMEncodeErrors::IoErrors(err)
    }
}

impl Debug for PPMEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            PPMEncodeErrors::IoErrors(ref err) => {
                writeln!(f, "{err}")
            }
        }
    }
}

impl Display for PPMEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for PPMEncodeErrors {}
