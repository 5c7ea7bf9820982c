use nanorand::{Rng, WyRand};
use pixconv_core::options::{EncoderOptions, Subsampling};
use pixconv_core::raster::Raster;
use pixconv_jpeg::{EncodeErrors, JpegDecoder, JpegEncoder};

fn mean_abs_error(a: &Raster, b: &Raster) -> f64 {
    assert_eq!(a.dimensions(), b.dimensions());

    let total: u64 = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes())
        .map(|(&x, &y)| u64::from(x.abs_diff(y)))
        .sum();

    total as f64 / a.as_bytes().len() as f64
}

/// Diagonal color ramps with a gentle ripple
fn smooth_image(width: u32, height: u32) -> Raster {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);

    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(2)) as u8;
            let g = (y * 255 / height.max(2)) as u8;
            let b = (128.0 + 60.0 * ((x + y) as f32 / 9.0).sin()) as u8;
            pixels.extend_from_slice(&[r, g, b]);
        }
    }
    Raster::new(width, height, pixels).unwrap()
}

fn noisy_image(width: u32, height: u32, seed: u64) -> Raster {
    let mut rng = WyRand::new_seed(seed);
    let mut pixels = vec![0_u8; (width * height * 3) as usize];
    rng.fill(&mut pixels);

    Raster::new(width, height, pixels).unwrap()
}

fn roundtrip(raster: &Raster, options: EncoderOptions) -> Raster {
    let jpeg = JpegEncoder::new(raster, options).encode().unwrap();
    JpegDecoder::new(&jpeg).decode().unwrap()
}

#[test]
fn quality_100_is_close() {
    let raster = smooth_image(64, 48);

    for subsampling in [Subsampling::Yuv444, Subsampling::Yuv420] {
        let options = EncoderOptions::default()
            .set_quality(100)
            .set_subsampling(subsampling);

        let decoded = roundtrip(&raster, options);
        let error = mean_abs_error(&raster, &decoded);

        assert!(error < 5.0, "{subsampling:?} mean error {error}");
    }
}

#[test]
fn quality_100_noise_without_subsampling() {
    let raster = noisy_image(24, 24, 77);
    let options = EncoderOptions::default()
        .set_quality(100)
        .set_subsampling(Subsampling::Yuv444);

    let error = mean_abs_error(&raster, &roundtrip(&raster, options));
    assert!(error < 5.0, "mean error {error}");
}

#[test]
fn error_shrinks_with_quality() {
    let raster = smooth_image(96, 64);
    let mut previous = f64::MAX;

    for quality in [10, 30, 50, 70, 90, 100] {
        let options = EncoderOptions::default().set_quality(quality);
        let error = mean_abs_error(&raster, &roundtrip(&raster, options));

        assert!(
            error <= previous,
            "quality {quality} gave {error}, more than {previous}"
        );
        previous = error;
    }
}

#[test]
fn odd_dimensions() {
    let color = [40, 180, 90];

    for (width, height) in [(1, 1), (17, 9), (33, 1), (1, 23), (15, 16)] {
        let raster = Raster::filled(width, height, color).unwrap();

        for subsampling in [Subsampling::Yuv444, Subsampling::Yuv420] {
            let options = EncoderOptions::default().set_subsampling(subsampling);
            let decoded = roundtrip(&raster, options);

            assert_eq!(decoded.dimensions(), (width, height));
            assert!(mean_abs_error(&raster, &decoded) < 5.0);
        }
    }
}

#[test]
fn restart_markers_do_not_change_pixels() {
    let raster = noisy_image(40, 40, 3);
    let plain = roundtrip(&raster, EncoderOptions::default());

    for interval in [1, 2, 3, 7] {
        let options = EncoderOptions::default().set_restart_interval(interval);
        let jpeg = JpegEncoder::new(&raster, options).encode().unwrap();

        // DRI segment and at least the first restart marker
        assert!(jpeg.windows(2).any(|x| x == [0xFF, 0xDD]));
        assert!(jpeg.windows(2).any(|x| x == [0xFF, 0xD0]));

        let decoded = JpegDecoder::new(&jpeg).decode().unwrap();
        assert_eq!(decoded, plain, "interval {interval}");
    }
}

#[test]
fn optimized_tables_are_smaller_and_lossless() {
    let raster = smooth_image(128, 128);

    let standard = EncoderOptions::default().set_optimize_huffman(false);
    let optimized = EncoderOptions::default().set_optimize_huffman(true);

    let standard_jpeg = JpegEncoder::new(&raster, standard).encode().unwrap();
    let optimized_jpeg = JpegEncoder::new(&raster, optimized).encode().unwrap();

    assert!(optimized_jpeg.len() < standard_jpeg.len());

    let a = JpegDecoder::new(&standard_jpeg).decode().unwrap();
    let b = JpegDecoder::new(&optimized_jpeg).decode().unwrap();
    assert_eq!(a, b);
}

#[test]
fn output_structure() {
    let raster = smooth_image(16, 16);
    let jpeg = JpegEncoder::new(&raster, EncoderOptions::default())
        .encode()
        .unwrap();

    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    assert_eq!(&jpeg[2..4], &[0xFF, 0xE0]);
    assert_eq!(&jpeg[6..11], b"JFIF\0");
    assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
}

#[test]
fn rejects_bad_input() {
    let empty = Raster::new(0, 4, vec![]).unwrap();
    let err = JpegEncoder::new(&empty, EncoderOptions::default())
        .encode()
        .unwrap_err();
    assert!(matches!(err, EncodeErrors::ZeroDimensions));

    let wide = Raster::filled(70_000, 1, [0, 0, 0]).unwrap();
    let err = JpegEncoder::new(&wide, EncoderOptions::default())
        .encode()
        .unwrap_err();
    assert!(matches!(err, EncodeErrors::TooLargeDimensions(70_000, 1)));

    let raster = Raster::filled(8, 8, [1, 2, 3]).unwrap();

    for quality in [0, 101] {
        let options = EncoderOptions::default().set_quality(quality);
        let err = JpegEncoder::new(&raster, options).encode().unwrap_err();

        assert!(matches!(err, EncodeErrors::InvalidQuality(q) if q == quality));
    }
}
