/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Stretch or compress sample values around mid-gray
use pixconv_core::log::trace;
use pixconv_core::raster::Raster;

use crate::traits::OperationsTrait;

/// Scale the distance of every sample from 128 by a factor
///
/// Factors above 1.0 increase contrast, factors between 0.0 and 1.0
/// flatten the image towards gray.
#[derive(Copy, Clone, Debug)]
pub struct Contrast {
    factor: f32
}

impl Contrast {
    #[must_use]
    pub fn new(factor: f32) -> Contrast {
        Contrast { factor }
    }
}

impl OperationsTrait for Contrast {
    fn name(&self) -> &'static str {
        "Contrast"
    }

    fn execute(&self, raster: &mut Raster) {
        trace!("Adjusting contrast by {}", self.factor);
        contrast(raster.as_bytes_mut(), self.factor);
    }
}

/// Compute `(x - 128) * factor + 128` for every sample
///
/// Results are clamped to `0..=255` and truncated towards zero
pub fn contrast(channel: &mut [u8], factor: f32) {
    for pix in channel {
        let value = (f32::from(*pix) - 128.0) * factor + 128.0;

        *pix = value.clamp(0.0, 255.0) as u8;
    }
}

#[cfg(test)]
mod tests {
    use nanorand::{Rng, WyRand};

    use crate::contrast::contrast;

    #[test]
    fn doubling_clamps_both_ends() {
        let mut data = [0, 63, 100, 128, 129, 191, 192, 255];
        contrast(&mut data, 2.0);
        assert_eq!(data, [0, 0, 72, 128, 130, 254, 255, 255]);
    }

    #[test]
    fn halving_truncates() {
        let mut data = [0, 127, 255];
        contrast(&mut data, 0.5);
        assert_eq!(data, [64, 127, 191]);
    }

    #[test]
    fn zero_factor_is_mid_gray() {
        let mut data = [0, 17, 200, 255];
        contrast(&mut data, 0.0);
        assert_eq!(data, [128; 4]);
    }

    #[test]
    fn unit_factor_is_identity() {
        let mut rand = WyRand::new();
        let mut data = vec![0_u8; 300];
        rand.fill(&mut data);

        let expected = data.clone();
        contrast(&mut data, 1.0);
        assert_eq!(data, expected);
    }
}
