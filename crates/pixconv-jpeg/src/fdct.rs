/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Forward DCT
//!
//! A separable type II DCT computed as `C * block * C^T` where `C` is the
//! orthonormal 8 point cosine matrix, which gives the scaling used by JPEG
//! (a flat block of value `v` has a DC coefficient of `8 * v`).
#![allow(clippy::excessive_precision, clippy::unreadable_literal)]

/// `COSINE[u][x] = c(u) * cos((2x + 1) * u * PI / 16)` with
/// `c(0) = sqrt(1/8)` and `c(u) = sqrt(2/8)` otherwise
#[rustfmt::skip]
const COSINE: [[f32; 8]; 8] = [
    [0.353553391, 0.353553391, 0.353553391, 0.353553391, 0.353553391, 0.353553391, 0.353553391, 0.353553391],
    [0.490392640, 0.415734806, 0.277785117, 0.097545161, -0.097545161, -0.277785117, -0.415734806, -0.490392640],
    [0.461939766, 0.191341716, -0.191341716, -0.461939766, -0.461939766, -0.191341716, 0.191341716, 0.461939766],
    [0.415734806, -0.097545161, -0.490392640, -0.277785117, 0.277785117, 0.490392640, 0.097545161, -0.415734806],
    [0.353553391, -0.353553391, -0.353553391, 0.353553391, 0.353553391, -0.353553391, -0.353553391, 0.353553391],
    [0.277785117, -0.490392640, 0.097545161, 0.415734806, -0.415734806, -0.097545161, 0.490392640, -0.277785117],
    [0.191341716, -0.461939766, 0.461939766, -0.191341716, -0.191341716, 0.461939766, -0.461939766, 0.191341716],
    [0.097545161, -0.277785117, 0.415734806, -0.490392640, 0.490392640, -0.415734806, 0.277785117, -0.097545161],
];

/// Transform one block of level shifted samples (`-128..=127`, row-major)
/// into DCT coefficients in natural order.
#[allow(clippy::cast_precision_loss)]
pub fn forward_dct(block: &[i32; 64]) -> [f32; 64] {
    let mut rows = [0.0_f32; 64];

    // rows: rows[y][u] = sum_x block[y][x] * C[u][x]
    for (input, output) in block.chunks_exact(8).zip(rows.chunks_exact_mut(8)) {
        for (out, cosine) in output.iter_mut().zip(COSINE.iter()) {
            *out = input
                .iter()
                .zip(cosine)
                .map(|(&sample, &c)| sample as f32 * c)
                .sum();
        }
    }

    // columns: out[v][u] = sum_y C[v][y] * rows[y][u]
    let mut coefficients = [0.0_f32; 64];

    for (v, cosine) in COSINE.iter().enumerate() {
        for u in 0..8 {
            coefficients[v * 8 + u] = cosine
                .iter()
                .enumerate()
                .map(|(y, &c)| c * rows[y * 8 + u])
                .sum();
        }
    }
    coefficients
}

#[cfg(test)]
mod tests {
    use core::f64::consts::PI;

    use nanorand::{Rng, WyRand};

    use crate::fdct::forward_dct;

    /// Textbook form of the 2D DCT
    fn direct_dct(block: &[i32; 64]) -> [f64; 64] {
        let c = |k: usize| if k == 0 { 1.0 / 2_f64.sqrt() } else { 1.0 };
        let mut out = [0.0; 64];

        for v in 0..8 {
            for u in 0..8 {
                let mut sum = 0.0;

                for y in 0..8 {
                    for x in 0..8 {
                        sum += f64::from(block[y * 8 + x])
                            * (((2 * x + 1) as f64 * u as f64 * PI) / 16.0).cos()
                            * (((2 * y + 1) as f64 * v as f64 * PI) / 16.0).cos();
                    }
                }
                out[v * 8 + u] = 0.25 * c(u) * c(v) * sum;
            }
        }
        out
    }

    #[test]
    fn flat_block_has_only_dc() {
        let coefficients = forward_dct(&[100; 64]);

        assert!((coefficients[0] - 800.0).abs() < 1e-2);
        assert!(coefficients[1..].iter().all(|x| x.abs() < 1e-2));
    }

    #[test]
    fn matches_direct_form() {
        let mut rng = WyRand::new_seed(7);

        for _ in 0..10 {
            let mut block = [0_i32; 64];
            block
                .iter_mut()
                .for_each(|x| *x = rng.generate_range(0_i32..=255) - 128);

            let fast = forward_dct(&block);
            let slow = direct_dct(&block);

            for (a, b) in fast.iter().zip(slow.iter()) {
                assert!((f64::from(*a) - b).abs() < 1e-2, "{a} vs {b}");
            }
        }
    }
}
