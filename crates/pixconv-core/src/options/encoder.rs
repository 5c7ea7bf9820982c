/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Global Encoder options

/// Chroma subsampling used by the JPEG encoder
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Subsampling {
    /// Chroma is stored at full resolution
    Yuv444,
    /// Chroma is stored at half horizontal and half vertical
    /// resolution
    #[default]
    Yuv420
}

impl Subsampling {
    /// Horizontal and vertical sampling factors of the luma component,
    /// chroma always has factors of (1,1)
    pub const fn luma_factors(self) -> (usize, usize) {
        match self {
            Subsampling::Yuv444 => (1, 1),
            Subsampling::Yuv420 => (2, 2)
        }
    }
}

/// Encoder options
///
/// Not all options are respected by encoders,
/// the PPM encoder is lossless and ignores all of them.
#[derive(Debug, Copy, Clone)]
pub struct EncoderOptions {
    /// JPEG quality between 1 and 100
    ///
    /// - Default value: 90
    quality:          u8,
    /// Chroma subsampling
    ///
    /// - Default value: [`Subsampling::Yuv420`]
    subsampling:      Subsampling,
    /// Build Huffman tables from the image statistics
    /// instead of using the example tables of the JPEG standard.
    ///
    /// This needs one extra pass over the coefficients but
    /// gives smaller files.
    ///
    /// - Default value: true
    optimize_huffman: bool,
    /// Number of MCUs between restart markers, 0 disables
    /// restart markers
    ///
    /// - Default value: 0
    restart_interval: u16
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            quality:          90,
            subsampling:      Subsampling::default(),
            optimize_huffman: true,
            restart_interval: 0
        }
    }
}

impl EncoderOptions {
    /// Create the default encoder options
    #[must_use]
    pub fn new() -> EncoderOptions {
        EncoderOptions::default()
    }

    pub const fn quality(&self) -> u8 {
        self.quality
    }

    pub const fn subsampling(&self) -> Subsampling {
        self.subsampling
    }

    pub const fn optimize_huffman(&self) -> bool {
        self.optimize_huffman
    }

    pub const fn restart_interval(&self) -> u16 {
        self.restart_interval
    }

    /// Set the encoding quality
    ///
    /// Values outside 1..=100 are rejected by the encoder
    #[must_use]
    pub fn set_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    #[must_use]
    pub fn set_subsampling(mut self, subsampling: Subsampling) -> Self {
        self.subsampling = subsampling;
        self
    }

    #[must_use]
    pub fn set_optimize_huffman(mut self, yes: bool) -> Self {
        self.optimize_huffman = yes;
        self
    }

    #[must_use]
    pub fn set_restart_interval(mut self, interval: u16) -> Self {
        self.restart_interval = interval;
        self
    }
}
