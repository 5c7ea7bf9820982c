/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Pixel adjustments for [`Raster`](pixconv_core::raster::Raster) images
//!
//! Every adjustment works in place on 8 bit samples and clamps
//! its results to `0..=255`.
//!
//! # Example
//! - Brighten an image by 50
//! ```
//! use pixconv_core::raster::Raster;
//! use pixconv_imageprocs::brighten::Brighten;
//! use pixconv_imageprocs::traits::OperationsTrait;
//!
//! let mut raster = Raster::filled(4, 4, [10, 220, 128]).unwrap();
//! Brighten::new(50).execute(&mut raster);
//! assert_eq!(raster.pixel(0, 0), [60, 255, 178]);
//! ```
#![warn(
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::inline_always,
    clippy::panic
)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::module_name_repetitions
)]

pub mod brighten;
pub mod contrast;
pub mod invert;
pub mod saturation;
pub mod traits;
