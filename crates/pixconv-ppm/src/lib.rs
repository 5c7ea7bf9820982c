/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A binary Portable Pixmap (P6) decoder and encoder
//!
//! Only 8 bit RGB files (`P6`, max value 255) are supported,
//! ASCII and greyscale variants are rejected.
//!
//! # Example
//! ```
//! use pixconv_core::raster::Raster;
//!
//! let raster = Raster::filled(2, 2, [255, 0, 0]).unwrap();
//! let bytes = pixconv_ppm::encode(&raster);
//!
//! assert!(bytes.starts_with(b"P6\n2 2\n255\n"));
//! assert_eq!(pixconv_ppm::decode(&bytes).unwrap(), raster);
//! ```
pub use decoder::{PPMDecoder, SUPPORTED_MAX_VALUE};
pub use encoder::{ppm_header, PPMEncoder};
pub use errors::{PPMDecodeErrors, PPMEncodeErrors};
pub use pixconv_core;
use pixconv_core::raster::Raster;

mod decoder;
mod encoder;
mod errors;

/// Encode a raster into an in-memory P6 file
pub fn encode(raster: &Raster) -> Vec<u8> {
    let header = ppm_header(raster.width(), raster.height());

    let mut out = Vec::with_capacity(header.len() + raster.as_bytes().len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(raster.as_bytes());

    out
}

/// Decode an in-memory P6 file with default options
pub fn decode(data: &[u8]) -> Result<Raster, PPMDecodeErrors> {
    PPMDecoder::new(data).decode()
}
