/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Adjust the saturation of an image
//!
//! ## Algorithm
//! Each channel is pushed away from (or pulled towards) the mean of
//! its pixel's three channels
//!
//! ```text
//! mean = (r + g + b) / 3
//! c'   = mean + (c - mean) * factor
//! ```
//!
//! This works directly on RGB data, no HSV round trip is made.
use pixconv_core::log::trace;
use pixconv_core::raster::Raster;

use crate::traits::OperationsTrait;

/// Scale the saturation of an RGB image
///
/// A factor of 0.0 produces a gray image, 1.0 has no effect
/// and values above 1.0 produce more vivid colors.
#[derive(Copy, Clone, Debug)]
pub struct Saturation {
    factor: f32
}

impl Saturation {
    #[must_use]
    pub fn new(factor: f32) -> Saturation {
        Saturation { factor }
    }
}

impl OperationsTrait for Saturation {
    fn name(&self) -> &'static str {
        "Saturation"
    }

    fn execute(&self, raster: &mut Raster) {
        trace!("Scaling saturation by {}", self.factor);
        saturate(raster.as_bytes_mut(), self.factor);
    }
}

/// Scale saturation of interleaved RGB samples
///
/// Trailing bytes that do not form a whole pixel are left untouched
pub fn saturate(rgb: &mut [u8], factor: f32) {
    for pixel in rgb.chunks_exact_mut(3) {
        let mean = pixel.iter().map(|x| f32::from(*x)).sum::<f32>() / 3.0;

        for channel in pixel {
            let value = mean + (f32::from(*channel) - mean) * factor;

            *channel = value.clamp(0.0, 255.0) as u8;
        }
    }
}
