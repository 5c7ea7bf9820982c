/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Quantization tables and (de)quantization of coefficient blocks
use crate::misc::UN_ZIGZAG;

/// Example luminance table from ITU T.81 Annex K.1, natural order
#[rustfmt::skip]
const ANNEX_K_LUMA: [u16; 64] = [
    16, 11, 10, 16,  24,  40,  51,  61,
    12, 12, 14, 19,  26,  58,  60,  55,
    14, 13, 16, 24,  40,  57,  69,  56,
    14, 17, 22, 29,  51,  87,  80,  62,
    18, 22, 37, 56,  68, 109, 103,  77,
    24, 35, 55, 64,  81, 104, 113,  92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103,  99
];

/// Example chrominance table from ITU T.81 Annex K.1, natural order
#[rustfmt::skip]
const ANNEX_K_CHROMA: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99
];

/// 64 quantizer steps stored in natural (row-major) order
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct QuantTable {
    values: [u16; 64]
}

impl QuantTable {
    /// Create a table from values in natural order
    ///
    /// Zero steps are raised to 1.
    pub fn new(mut values: [u16; 64]) -> QuantTable {
        values.iter_mut().for_each(|x| *x = (*x).max(1));

        QuantTable { values }
    }

    /// Create a table from values in zig-zag order, as stored in a DQT segment
    pub fn from_zigzag(zigzag: &[u16; 64]) -> QuantTable {
        let mut values = [0; 64];

        for (&pos, &value) in UN_ZIGZAG.iter().zip(zigzag.iter()) {
            values[pos] = value;
        }
        QuantTable::new(values)
    }

    /// Scale an example table with the IJG quality curve
    ///
    /// `quality` is clamped to `1..=100`, 100 gives a table of ones
    fn scaled(base: &[u16; 64], quality: u8) -> QuantTable {
        let quality = u32::from(quality.clamp(1, 100));

        let scale = if quality < 50 {
            5000 / quality
        } else {
            200 - quality * 2
        };

        let mut values = [0; 64];

        for (out, &value) in values.iter_mut().zip(base.iter()) {
            let scaled = (u32::from(value) * scale + 50) / 100;
            // baseline tables are limited to 8 bit entries
            *out = scaled.clamp(1, 255) as u16;
        }
        QuantTable { values }
    }

    /// Luminance table for `quality` (1..=100)
    pub fn luma(quality: u8) -> QuantTable {
        QuantTable::scaled(&ANNEX_K_LUMA, quality)
    }

    /// Chrominance table for `quality` (1..=100)
    pub fn chroma(quality: u8) -> QuantTable {
        QuantTable::scaled(&ANNEX_K_CHROMA, quality)
    }

    /// Values in natural order
    pub const fn values(&self) -> &[u16; 64] {
        &self.values
    }

    /// Values in zig-zag order, the order used by DQT segments
    pub fn zigzag(&self) -> [u16; 64] {
        let mut out = [0; 64];

        for (value, &pos) in out.iter_mut().zip(UN_ZIGZAG.iter()) {
            *value = self.values[pos];
        }
        out
    }

    /// DQT precision, 0 for 8 bit entries and 1 for 16 bit entries
    pub fn precision(&self) -> u8 {
        u8::from(self.values.iter().any(|&x| x > 255))
    }
}

/// Divide coefficients by their quantizer step, rounding half away from zero
#[allow(clippy::cast_possible_truncation)]
pub fn quantize(coefficients: &[f32; 64], table: &QuantTable) -> [i32; 64] {
    let mut out = [0; 64];

    for ((out, &coeff), &step) in out
        .iter_mut()
        .zip(coefficients.iter())
        .zip(table.values.iter())
    {
        *out = (coeff / f32::from(step)).round() as i32;
    }
    out
}

/// Multiply quantized coefficients (natural order) by their quantizer step
pub fn dequantize(coefficients: &mut [i32; 64], table: &QuantTable) {
    for (coeff, &step) in coefficients.iter_mut().zip(table.values.iter()) {
        *coeff = coeff.wrapping_mul(i32::from(step));
    }
}

#[cfg(test)]
mod tests {
    use crate::quant::{dequantize, quantize, QuantTable, ANNEX_K_LUMA};

    #[test]
    fn quality_50_is_the_example_table() {
        assert_eq!(QuantTable::luma(50).values(), &ANNEX_K_LUMA);
    }

    #[test]
    fn quality_100_is_all_ones() {
        assert!(QuantTable::luma(100).values().iter().all(|&x| x == 1));
        assert!(QuantTable::chroma(100).values().iter().all(|&x| x == 1));
    }

    #[test]
    fn low_quality_is_clamped_to_8_bits() {
        let table = QuantTable::chroma(1);

        assert!(table.values().iter().all(|&x| (1..=255).contains(&x)));
        assert_eq!(table.precision(), 0);
        // quality 0 behaves like 1
        assert_eq!(QuantTable::chroma(0), table);
    }

    #[test]
    fn steps_shrink_with_quality() {
        let low = QuantTable::luma(20);
        let high = QuantTable::luma(80);

        assert!(low
            .values()
            .iter()
            .zip(high.values())
            .all(|(a, b)| a >= b));
    }

    #[test]
    fn zigzag_order() {
        let table = QuantTable::luma(50);
        let zigzag = table.zigzag();

        // first entries in zig-zag order are (0,0), (0,1), (1,0), (2,0)
        assert_eq!(&zigzag[..4], &[16, 11, 12, 14]);
        assert_eq!(QuantTable::from_zigzag(&zigzag), table);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let table = QuantTable::new([2; 64]);

        let mut block = [0.0; 64];
        block[0] = 3.0;
        block[1] = -3.0;
        block[2] = 2.9;
        block[3] = -0.9;

        let quantized = quantize(&block, &table);
        assert_eq!(&quantized[..4], &[2, -2, 1, 0]);

        let mut restored = quantized;
        dequantize(&mut restored, &table);
        assert_eq!(&restored[..4], &[4, -4, 2, 0]);
    }
}
