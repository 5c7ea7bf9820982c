use nanorand::{Rng, WyRand};
use pixconv_core::options::DecoderOptions;
use pixconv_core::raster::Raster;
use pixconv_ppm::{PPMDecodeErrors, PPMDecoder, PPMEncoder};

#[test]
fn red_2x2_exact_bytes() {
    let raster = Raster::filled(2, 2, [255, 0, 0]).unwrap();
    let bytes = pixconv_ppm::encode(&raster);

    let mut expected = b"P6\n2 2\n255\n".to_vec();
    for _ in 0..4 {
        expected.extend_from_slice(&[0xFF, 0x00, 0x00]);
    }
    assert_eq!(bytes, expected);
}

#[test]
fn encoder_matches_in_memory_encode() {
    let raster = Raster::new(3, 1, (0..9).collect()).unwrap();
    let mut sink = Vec::new();

    PPMEncoder::new(&mut sink).encode(&raster).unwrap();

    assert_eq!(sink, pixconv_ppm::encode(&raster));
}

#[test]
fn random_rasters_roundtrip() {
    let mut rng = WyRand::new_seed(0x5050_4d36);

    for _ in 0..50 {
        let width = rng.generate_range(1_u32..=64);
        let height = rng.generate_range(1_u32..=64);

        let mut pixels = vec![0_u8; (width * height * 3) as usize];
        rng.fill(&mut pixels);

        let raster = Raster::new(width, height, pixels).unwrap();
        let decoded = pixconv_ppm::decode(&pixconv_ppm::encode(&raster)).unwrap();

        assert_eq!(decoded, raster);
    }
}

#[test]
fn comments_between_tokens() {
    let data = b"P6 # magic\n# a full line\n1 # width\n1\n#max\n255\n\x01\x02\x03";
    let raster = pixconv_ppm::decode(data).unwrap();

    assert_eq!(raster.dimensions(), (1, 1));
    assert_eq!(raster.pixel(0, 0), [1, 2, 3]);
}

#[test]
fn single_whitespace_after_max_value() {
    // the second space is the first pixel byte
    let data = b"P6\n1 1\n255  \x07\x08";
    let raster = pixconv_ppm::decode(data).unwrap();

    assert_eq!(raster.pixel(0, 0), [b' ', 7, 8]);
}

#[test]
fn headers_only() {
    let mut decoder = PPMDecoder::new(b"P6\n4 3\n255\n");

    assert!(decoder.dimensions().is_none());
    decoder.decode_headers().unwrap();
    assert_eq!(decoder.dimensions(), Some((4, 3)));
    assert!(decoder.colorspace().is_some());
}

#[test]
fn bad_magic() {
    for data in [&b"P3\n1 1\n255\n1 2 3"[..], b"P5\n1 1\n255\n\0", b"P61 1\n255\n\0\0\0"] {
        let err = pixconv_ppm::decode(data).unwrap_err();
        assert!(matches!(err, PPMDecodeErrors::InvalidMagic(_)), "{err:?}");
    }
}

#[test]
fn unsupported_max_value() {
    let err = pixconv_ppm::decode(b"P6\n1 1\n65535\n\0\0\0\0\0\0").unwrap_err();
    assert!(matches!(err, PPMDecodeErrors::UnsupportedMaxValue(65535)));

    let err = pixconv_ppm::decode(b"P6\n1 1\n15\n\0\0\0").unwrap_err();
    assert!(matches!(err, PPMDecodeErrors::UnsupportedMaxValue(15)));
}

#[test]
fn truncated_pixels() {
    let err = pixconv_ppm::decode(b"P6\n2 2\n255\n\0\0\0\0\0").unwrap_err();

    assert!(matches!(
        err,
        PPMDecodeErrors::TruncatedData {
            expected: 12,
            found:    5
        }
    ));
}

#[test]
fn missing_tokens() {
    let err = pixconv_ppm::decode(b"P6\n2\n").unwrap_err();
    assert!(matches!(err, PPMDecodeErrors::InvalidHeader(_)), "{err:?}");

    let err = pixconv_ppm::decode(b"P6\nx 2\n255\n").unwrap_err();
    assert!(matches!(err, PPMDecodeErrors::InvalidHeader(_)), "{err:?}");
}

#[test]
fn zero_dimensions() {
    let err = pixconv_ppm::decode(b"P6\n0 2\n255\n").unwrap_err();
    assert!(matches!(err, PPMDecodeErrors::ZeroDimensions));
}

#[test]
fn dimension_limits() {
    let options = DecoderOptions::default().set_max_height(2);
    let mut decoder = PPMDecoder::new_with_options(options, b"P6\n1 3\n255\n\0\0\0\0\0\0\0\0\0");

    assert!(matches!(
        decoder.decode(),
        Err(PPMDecodeErrors::LargeDimensions(2, 3))
    ));
}

#[test]
fn trailing_bytes() {
    let data = b"P6\n1 1\n255\n\x01\x02\x03\x04";

    let raster = pixconv_ppm::decode(data).unwrap();
    assert_eq!(raster.as_bytes(), &[1, 2, 3]);

    let options = DecoderOptions::default().set_strict_mode(true);
    let err = PPMDecoder::new_with_options(options, data).decode().unwrap_err();
    assert!(matches!(err, PPMDecodeErrors::TrailingBytes(1)));
}
