/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Colorspace conversion between RGB and YCbCr (BT.601, full range)

// Bt.601 Full Range inverse coefficients computed with 14 bits of precision.
const Y_CF: i32 = 16384;
const CR_CF: i32 = 22970;
const CB_CF: i32 = 29032;
const C_G_CR_COEF_1: i32 = -11700;
const C_G_CB_COEF_2: i32 = -5638;
const YUV_PREC: i32 = 14;
// Rounding const for YUV -> RGB conversion: floating equivalent 0.499(9).
const YUV_RND: i32 = (1 << (YUV_PREC - 1)) - 1;

/// Limit values to 0 and 255
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp(a: i32) -> u8 {
    a.clamp(0, 255) as u8
}

/// Convert one YCbCr sample triple to RGB
#[inline]
pub(crate) fn ycbcr_to_rgb_pixel(y: i16, cb: i16, cr: i16) -> [u8; 3] {
    let cr = i32::from(cr) - 128;
    let cb = i32::from(cb) - 128;

    let y0 = i32::from(y) * Y_CF + YUV_RND;

    let r = (y0 + cr * CR_CF) >> YUV_PREC;
    let g = (y0 + cr * C_G_CR_COEF_1 + cb * C_G_CB_COEF_2) >> YUV_PREC;
    let b = (y0 + cb * CB_CF) >> YUV_PREC;

    [clamp(r), clamp(g), clamp(b)]
}

/// Convert a row of full resolution Y, Cb and Cr samples into interleaved RGB
///
/// `output` must hold `3 * width` bytes where `width` is its length divided by three,
/// extra input samples (block padding) are ignored.
pub(crate) fn ycbcr_to_rgb(y: &[i16], cb: &[i16], cr: &[i16], output: &mut [u8]) {
    for (((&y, &cb), &cr), out) in y
        .iter()
        .zip(cb.iter())
        .zip(cr.iter())
        .zip(output.chunks_exact_mut(3))
    {
        out.copy_from_slice(&ycbcr_to_rgb_pixel(y, cb, cr));
    }
}

/// Expand a row of luma samples into interleaved RGB with R=G=B
#[allow(clippy::cast_sign_loss)]
pub(crate) fn luma_to_rgb(y: &[i16], output: &mut [u8]) {
    for (&y, out) in y.iter().zip(output.chunks_exact_mut(3)) {
        out.fill(clamp(i32::from(y)));
    }
}

/// Convert interleaved RGB pixels into separate Y, Cb and Cr planes
///
/// Samples keep their fractional part, rounding happens when blocks are formed.
pub(crate) fn rgb_to_ycbcr(rgb: &[u8], y: &mut [f32], cb: &mut [f32], cr: &mut [f32]) {
    for ((pixel, y), (cb, cr)) in rgb
        .chunks_exact(3)
        .zip(y.iter_mut())
        .zip(cb.iter_mut().zip(cr.iter_mut()))
    {
        let r = f32::from(pixel[0]);
        let g = f32::from(pixel[1]);
        let b = f32::from(pixel[2]);

        *y = 0.299 * r + 0.587 * g + 0.114 * b;
        *cb = -0.168_736 * r - 0.331_264 * g + 0.5 * b + 128.0;
        *cr = 0.5 * r - 0.418_688 * g - 0.081_312 * b + 128.0;
    }
}
