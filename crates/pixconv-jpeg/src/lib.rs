/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A baseline JPEG encoder and decoder
//!
//! The decoder handles sequential, Huffman coded, 8 bit JPEG images
//! with one (grayscale) or three (YCbCr) components and chroma
//! subsampling up to 2x2. Progressive, arithmetic coded, lossless and
//! hierarchical files are recognised and rejected with
//! [`DecodeErrors::Unsupported`](crate::errors::DecodeErrors::Unsupported).
//!
//! The encoder writes JFIF files with either 4:4:4 or 4:2:0 chroma,
//! optionally with Huffman tables tuned to the image and restart markers.
//!
//! Both sides work on a [`Raster`](pixconv_core::raster::Raster), an 8 bit
//! RGB image.
//!
//! # Examples
//!
//! ## Round trip an image
//! ```
//! use pixconv_core::options::{EncoderOptions, Subsampling};
//! use pixconv_core::raster::Raster;
//! use pixconv_jpeg::{JpegDecoder, JpegEncoder};
//!
//! let raster = Raster::filled(20, 10, [10, 120, 240]).unwrap();
//!
//! let options = EncoderOptions::default().set_subsampling(Subsampling::Yuv444);
//! let jpeg = JpegEncoder::new(&raster, options).encode().unwrap();
//!
//! let decoded = JpegDecoder::new(&jpeg).decode().unwrap();
//! assert_eq!(decoded.dimensions(), (20, 10));
//! ```
//!
//! ## Read image information without decoding pixels
//! ```no_run
//! use pixconv_jpeg::JpegDecoder;
//!
//! let data = std::fs::read("a_jpeg_file.jpg").unwrap();
//! let mut decoder = JpegDecoder::new(&data);
//! decoder.decode_headers().unwrap();
//!
//! let info = decoder.info().unwrap();
//! println!("{}x{}, {} components", info.width, info.height, info.components);
//! ```
//!
//! The decoder tries to decode as many images as possible, files with
//! stray bytes or unknown markers only produce warnings. Set
//! `DecoderOptions::set_strict_mode` to reject them instead.
#![warn(
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::panic
)]
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::inline_always,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
#![forbid(unsafe_code)]

pub use pixconv_core;

pub use crate::decoder::{ImageInfo, JpegDecoder};
pub use crate::encoder::JpegEncoder;
pub use crate::errors::{DecodeErrors, EncodeErrors};

pub mod bitstream;
mod color_convert;
mod components;
pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod fdct;
mod headers;
pub mod huffman;
pub mod idct;
pub mod marker;
mod mcu;
pub mod misc;
pub mod quant;
mod upsampler;
