/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by the pixconv codecs
//!
//! This crate provides a set of core routines shared
//! by the PPM and JPEG codecs under the `pixconv` umbrella
//!
//! It currently contains
//!
//! - A bytestream reader and writer with big endian aware reads and writes
//! - The [`Raster`](crate::raster::Raster), the single in-memory RGB image type
//!   every codec consumes and produces
//! - Colorspace information shared by images
//! - Image decoder and encoder options
//! - A logging shim which forwards to the `log` crate when the `log` feature is enabled
//!
//! # Features
//!  - `log`: Route logging macros to the [log](https://docs.rs/log) crate.
//!
//!  - `serde`: Enables serializing of some of the data structures
//!     present in the crate
//!
#![macro_use]

pub mod bytestream;
pub mod colorspace;
pub mod log;
pub mod options;
pub mod raster;
pub mod serde;
