/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image Colorspace information

/// Colorspaces understood by the pixconv codecs
///
/// Rasters are always RGB, the other variants describe
/// what a codec stores internally (e.g. a JPEG scan).
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ColorSpace {
    /// Red, Green , Blue
    RGB,
    /// Luma and two chroma difference channels, as stored by JPEG
    YCbCr,
    /// Grayscale colorspace
    Luma,
    /// The colorspace is unknown
    Unknown
}

impl ColorSpace {
    /// Number of color channels present for a certain colorspace
    ///
    /// E.g. RGB returns 3 since it contains R,G and B colors to make up a pixel
    pub const fn num_components(&self) -> usize {
        match self {
            Self::RGB | Self::YCbCr => 3,
            Self::Luma => 1,
            Self::Unknown => 0
        }
    }

    pub const fn is_grayscale(&self) -> bool {
        matches!(self, Self::Luma)
    }
}

#[cfg(test)]
mod tests {
    use crate::colorspace::ColorSpace;

    #[test]
    fn component_counts() {
        assert_eq!(ColorSpace::RGB.num_components(), 3);
        assert_eq!(ColorSpace::YCbCr.num_components(), 3);
        assert_eq!(ColorSpace::Luma.num_components(), 1);
        assert!(ColorSpace::Luma.is_grayscale());
        assert!(!ColorSpace::RGB.is_grayscale());
    }
}
