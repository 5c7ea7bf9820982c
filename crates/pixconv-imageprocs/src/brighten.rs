/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Brighten or darken an image
use pixconv_core::log::trace;
use pixconv_core::raster::Raster;

use crate::traits::OperationsTrait;

/// Add a constant to every sample of an image
///
/// Negative values darken the image
#[derive(Copy, Clone, Debug)]
pub struct Brighten {
    value: i16
}

impl Brighten {
    #[must_use]
    pub fn new(value: i16) -> Brighten {
        Brighten { value }
    }
}

impl OperationsTrait for Brighten {
    fn name(&self) -> &'static str {
        "Brighten"
    }

    fn execute(&self, raster: &mut Raster) {
        trace!("Brightening by {}", self.value);
        brighten(raster.as_bytes_mut(), self.value);
    }
}

/// Add `value` to each sample, saturating at 0 and 255
pub fn brighten(channel: &mut [u8], value: i16) {
    channel
        .iter_mut()
        .for_each(|x| *x = i16::from(*x).saturating_add(value).clamp(0, 255) as u8);
}

#[cfg(test)]
mod tests {
    use pixconv_core::raster::Raster;

    use crate::brighten::{brighten, Brighten};
    use crate::traits::OperationsTrait;

    #[test]
    fn saturates_at_white() {
        let mut data = [0, 100, 205, 206, 255];
        brighten(&mut data, 50);
        assert_eq!(data, [50, 150, 255, 255, 255]);
    }

    #[test]
    fn negative_values_saturate_at_black() {
        let mut data = [0, 30, 31, 255];
        brighten(&mut data, -31);
        assert_eq!(data, [0, 0, 0, 224]);
    }

    #[test]
    fn extreme_values_do_not_wrap() {
        let mut data = [0, 128, 255];
        brighten(&mut data, i16::MAX);
        assert_eq!(data, [255; 3]);

        let mut data = [0, 128, 255];
        brighten(&mut data, i16::MIN);
        assert_eq!(data, [0; 3]);
    }

    #[test]
    fn raster_is_brightened() {
        let mut raster = Raster::from_pixels(2, 1, &[[0, 10, 250], [100, 200, 255]]).unwrap();
        Brighten::new(50).execute(&mut raster);

        assert_eq!(raster.pixel(0, 0), [50, 60, 255]);
        assert_eq!(raster.pixel(1, 0), [150, 250, 255]);
        assert_eq!(raster.dimensions(), (2, 1));
    }
}
