/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use pixconv_core::raster::Raster;

use crate::traits::OperationsTrait;

/// Invert the colors of an image
#[derive(Copy, Clone, Debug, Default)]
pub struct Invert;

impl Invert {
    #[must_use]
    pub fn new() -> Invert {
        Invert
    }
}

impl OperationsTrait for Invert {
    fn name(&self) -> &'static str {
        "Invert"
    }

    fn execute(&self, raster: &mut Raster) {
        invert(raster.as_bytes_mut());
    }
}

///Invert a pixel
///
/// The formula for inverting a 8 bit pixel
///  is `pixel[x,y] = 255-pixel[x,y]`
pub fn invert(in_image: &mut [u8]) {
    in_image.iter_mut().for_each(|x| *x = u8::MAX - *x);
}

#[cfg(test)]
mod tests {
    use nanorand::{Rng, WyRand};
    use pixconv_core::raster::Raster;

    use crate::invert::{invert, Invert};
    use crate::traits::OperationsTrait;

    #[test]
    fn extremes_swap() {
        let mut data = [0, 1, 127, 128, 255];
        invert(&mut data);
        assert_eq!(data, [255, 254, 128, 127, 0]);
    }

    #[test]
    fn inverting_twice_restores_raster() {
        let mut rand = WyRand::new();
        let mut data = vec![0_u8; 5 * 3 * 3];
        rand.fill(&mut data);

        let original = Raster::new(5, 3, data).unwrap();
        let mut raster = original.clone();

        Invert::new().execute(&mut raster);
        assert_ne!(raster, original);
        Invert::new().execute(&mut raster);
        assert_eq!(raster, original);
    }
}
