/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Up-sampling routines
//!
//! Subsampled chroma is expanded with the libjpeg "fancy" triangle filter
//! where each output sample is `(3*A+B)/4`, `A` being the input sample
//! closest to the output and `B` the next closest.
//!
//! ```text
//! +---+---+
//! | A | B |
//! +---+---+
//! +-+-+-+-+
//! | |P| | |
//! +-+-+-+-+
//! ```
//!
//! Horizontal and vertical halving use the filter, the vertical pass runs
//! first for 2x2 subsampling. Ratios without a fancy filter (only
//! vertical halving) use nearest neighbour replication.

/// Double a row horizontally
pub(crate) fn upsample_horizontal(input: &[i16], output: &mut [i16]) {
    assert_eq!(
        input.len() * 2,
        output.len(),
        "Input length is not half the size of the output length"
    );

    if input.len() < 3 {
        // too short for the filter
        for (out, &sample) in output.chunks_exact_mut(2).zip(input) {
            out.fill(sample);
        }
        return;
    }

    output[0] = input[0];
    output[1] = (input[0] * 3 + input[1] + 2) >> 2;

    // The output of a pixel is determined by its surrounding neighbours but we attach more
    // weight to its nearest neighbour (input[i]) than to the next nearest neighbour.
    for (output_window, input_window) in output[2..].chunks_exact_mut(2).zip(input.windows(3)) {
        let sample = 3 * input_window[1] + 2;

        output_window[0] = (sample + input_window[0]) >> 2;
        output_window[1] = (sample + input_window[2]) >> 2;
    }

    let out_len = output.len() - 2;
    let input_len = input.len() - 2;

    let f_out = &mut output[out_len..];
    let i_last = &input[input_len..];

    f_out[0] = (3 * i_last[1] + i_last[0] + 2) >> 2;
    f_out[1] = i_last[1];
}

/// Produce the output rows above and below the centre of `near`,
/// `far_above` and `far_below` are the neighbouring input rows
/// (or `near` itself at the plane edges)
pub(crate) fn upsample_vertical(
    near: &[i16], far_above: &[i16], far_below: &[i16], out_top: &mut [i16],
    out_bottom: &mut [i16]
) {
    for ((((&near, &above), &below), top), bottom) in near
        .iter()
        .zip(far_above)
        .zip(far_below)
        .zip(out_top.iter_mut())
        .zip(out_bottom.iter_mut())
    {
        *top = ((3 * near) + 2 + above) >> 2;
        *bottom = ((3 * near) + 2 + below) >> 2;
    }
}

/// Expand a `width x height` plane by `ratio_x`, `ratio_y` (each 1 or 2)
///
/// Returns a plane of `width*ratio_x x height*ratio_y` samples.
pub(crate) fn upsample_plane(
    plane: &[i16], width: usize, height: usize, ratio_x: usize, ratio_y: usize
) -> Vec<i16> {
    let out_width = width * ratio_x;
    let mut output = vec![0; out_width * height * ratio_y];

    match (ratio_x, ratio_y) {
        (1, 1) => output.copy_from_slice(&plane[..width * height]),
        (2, 1) => {
            for (input, out) in plane
                .chunks_exact(width)
                .zip(output.chunks_exact_mut(out_width))
            {
                upsample_horizontal(input, out);
            }
        }
        (2, 2) => {
            let mut top = vec![0; width];
            let mut bottom = vec![0; width];

            for y in 0..height {
                let near = &plane[y * width..(y + 1) * width];
                let above = &plane[y.saturating_sub(1) * width..][..width];
                let below = &plane[(y + 1).min(height - 1) * width..][..width];

                upsample_vertical(near, above, below, &mut top, &mut bottom);

                let (out_top, out_bottom) =
                    output[2 * y * out_width..(2 * y + 2) * out_width].split_at_mut(out_width);

                upsample_horizontal(&top, out_top);
                upsample_horizontal(&bottom, out_bottom);
            }
        }
        _ => {
            // nearest neighbour
            for (y, row) in output.chunks_exact_mut(out_width).enumerate() {
                let input = &plane[(y / ratio_y) * width..][..width];

                for (x, out) in row.iter_mut().enumerate() {
                    *out = input[x / ratio_x];
                }
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use crate::upsampler::{upsample_horizontal, upsample_plane};

    #[test]
    fn horizontal_filter() {
        let mut out = [0; 8];
        upsample_horizontal(&[0, 40, 80, 120], &mut out);
        assert_eq!(out, [0, 10, 30, 50, 70, 90, 110, 120]);
    }

    #[test]
    fn flat_planes_stay_flat() {
        let plane = vec![77; 8 * 8];

        for (rx, ry) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            let out = upsample_plane(&plane, 8, 8, rx, ry);

            assert_eq!(out.len(), 64 * rx * ry);
            assert!(out.iter().all(|&x| x == 77));
        }
    }

    #[test]
    fn vertical_nearest() {
        let plane = [1, 2, 3, 4];
        let out = upsample_plane(&plane, 2, 2, 1, 2);
        assert_eq!(out, [1, 2, 1, 2, 3, 4, 3, 4]);
    }

    #[test]
    fn hv_filter_weights() {
        // a vertical edge between rows
        let mut plane = vec![0; 4 * 2];
        plane[4..].fill(100);

        let out = upsample_plane(&plane, 4, 2, 2, 2);
        let column: Vec<_> = out.chunks_exact(8).map(|row| row[3]).collect();

        assert_eq!(column, [0, 25, 75, 100]);
    }
}
