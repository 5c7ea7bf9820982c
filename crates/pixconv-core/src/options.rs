/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoder and Encoder options
//!
//! This module exposes structs for which all implemented
//! decoders and encoders get shared options
//!
//! All supported options are put into one struct per direction to allow for
//! global configuration, i.e the same `DecoderOptions` can be reused for the
//! PPM and the JPEG decoder
//!
pub use decoder::DecoderOptions;
pub use encoder::{EncoderOptions, Subsampling};

mod decoder;
mod encoder;
