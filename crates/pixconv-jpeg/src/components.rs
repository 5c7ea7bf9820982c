/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! This module exports a single struct to store information about
//! JPEG image components
//!
//! The data is extracted from a SOF header.

use crate::errors::DecodeErrors;

/// Component Data from start of frame
#[derive(Clone)]
pub(crate) struct Components {
    /// The type of component that has the metadata below, can be Y,Cb or Cr
    pub id: u8,
    /// Sub-sampling ratio of this component in the x-plane
    pub horizontal_sample: usize,
    /// Sub-sampling ratio of this component in the y-plane
    pub vertical_sample: usize,
    /// Quantization table number
    pub quantization_table_number: u8,
    /// DC huffman table position
    pub dc_huff_table: usize,
    /// AC huffman table position for this element.
    pub ac_huff_table: usize,
    /// Current dc prediction for this component
    pub dc_pred: i32,
    /// Number of samples in one row of `plane`
    pub width_stride: usize,
    /// Decoded samples, whole blocks
    pub plane: Vec<i16>
}

impl Components {
    /// Create a new instance from three bytes from the start of frame
    #[inline]
    pub fn from(a: [u8; 3], pos: u8) -> Result<Components, DecodeErrors> {
        let horizontal_sample = usize::from(a[1] >> 4);
        let vertical_sample = usize::from(a[1] & 0x0f);
        let quantization_table_number = a[2];

        if !(1..=4).contains(&horizontal_sample) || !(1..=4).contains(&vertical_sample) {
            return Err(DecodeErrors::SofError(format!(
                "Invalid sampling factors ({horizontal_sample},{vertical_sample}) for component {pos}"
            )));
        }
        // confirm quantization number is between 0 and MAX_COMPONENTS
        if usize::from(quantization_table_number) >= crate::decoder::MAX_COMPONENTS {
            return Err(DecodeErrors::SofError(format!(
                "Too large quantization number :{quantization_table_number}, expected value between 0 and {}",
                crate::decoder::MAX_COMPONENTS
            )));
        }

        Ok(Components {
            id: a[0],
            horizontal_sample,
            vertical_sample,
            quantization_table_number,
            dc_huff_table: 0,
            ac_huff_table: 0,
            dc_pred: 0,
            width_stride: 0,
            plane: Vec::new()
        })
    }
}
