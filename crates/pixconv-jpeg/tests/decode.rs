use nanorand::{Rng, WyRand};
use pixconv_core::options::{DecoderOptions, EncoderOptions};
use pixconv_core::raster::Raster;
use pixconv_jpeg::bitstream::BitWriter;
use pixconv_jpeg::decoder::DecoderState;
use pixconv_jpeg::errors::UnsupportedSchemes;
use pixconv_jpeg::huffman::{HuffmanEncodeTable, HuffmanSpec};
use pixconv_jpeg::misc::SOFMarkers;
use pixconv_jpeg::{DecodeErrors, JpegDecoder, JpegEncoder};

fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
    let raster = Raster::filled(width, height, [90, 160, 220]).unwrap();

    JpegEncoder::new(&raster, EncoderOptions::default())
        .encode()
        .unwrap()
}

fn segment(out: &mut Vec<u8>, marker: u8, payload: &[u8]) {
    out.extend_from_slice(&[0xFF, marker]);
    out.extend_from_slice(&(payload.len() as u16 + 2).to_be_bytes());
    out.extend_from_slice(payload);
}

fn huffman_segment(out: &mut Vec<u8>, id: u8, spec: &HuffmanSpec) {
    let mut payload = vec![id];
    payload.extend_from_slice(spec.bits());
    payload.extend_from_slice(spec.values());

    segment(out, 0xC4, &payload);
}

/// Headers of a grayscale image up to and including the SOS segment
fn grayscale_headers(width: u16, height: u16, dc_spec: &HuffmanSpec) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];

    let mut dqt = vec![0x00];
    dqt.extend_from_slice(&[1; 64]);
    segment(&mut out, 0xDB, &dqt);

    let mut sof = vec![8];
    sof.extend_from_slice(&height.to_be_bytes());
    sof.extend_from_slice(&width.to_be_bytes());
    sof.extend_from_slice(&[1, 1, 0x11, 0]);
    segment(&mut out, 0xC0, &sof);

    huffman_segment(&mut out, 0x00, dc_spec);
    huffman_segment(&mut out, 0x10, &HuffmanSpec::std_ac_luma());

    segment(&mut out, 0xDA, &[1, 1, 0x00, 0, 63, 0]);
    out
}

/// Grayscale image of 8x8 blocks, each holding one flat value
fn grayscale_jpeg(width: u16, height: u16, block_values: &[i32]) -> Vec<u8> {
    let dc_spec = HuffmanSpec::std_dc_luma();
    let ac_spec = HuffmanSpec::std_ac_luma();

    let mut out = grayscale_headers(width, height, &dc_spec);

    let dc = HuffmanEncodeTable::new(&dc_spec);
    let ac = HuffmanEncodeTable::new(&ac_spec);

    let mut writer = BitWriter::new(&mut out);
    let mut pred = 0;

    for value in block_values {
        let coefficient = 8 * (value - 128);
        let diff = coefficient - pred;
        pred = coefficient;

        let size = 32 - diff.unsigned_abs().leading_zeros();
        let bits = (if diff < 0 { diff - 1 } else { diff }) & ((1 << size) - 1);

        dc.encode_symbol(&mut writer, size as u8);
        writer.put_bits(bits as u16, size as u8);
        // end of block
        ac.encode_symbol(&mut writer, 0x00);
    }
    writer.flush();

    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

#[test]
fn grayscale_is_replicated() {
    let jpeg = grayscale_jpeg(13, 5, &[192, 64]);
    let raster = JpegDecoder::new(&jpeg).decode().unwrap();

    assert_eq!(raster.dimensions(), (13, 5));

    for y in 0..5 {
        for x in 0..13 {
            let [r, g, b] = raster.pixel(x, y);
            let expected = if x < 8 { 192 } else { 64 };

            assert_eq!(r, g);
            assert_eq!(g, b);
            assert!(r.abs_diff(expected) <= 1, "{x},{y} = {r}");
        }
    }
}

#[test]
fn headers_and_info() {
    let jpeg = sample_jpeg(40, 30);
    let mut decoder = JpegDecoder::new(&jpeg);

    assert!(decoder.info().is_none());
    assert_eq!(decoder.state(), DecoderState::ExpectSoi);

    decoder.decode_headers().unwrap();
    assert_eq!(decoder.state(), DecoderState::ReadingScanData);

    let info = decoder.info().unwrap();
    assert_eq!((info.width, info.height), (40, 30));
    assert_eq!(info.components, 3);
    assert_eq!(info.sof, SOFMarkers::BaselineDct);
    assert!(info.jfif);
    assert_eq!((info.density_units, info.x_density, info.y_density), (0, 1, 1));

    let raster = decoder.decode().unwrap();
    assert_eq!(raster.dimensions(), (40, 30));
    assert_eq!(decoder.state(), DecoderState::Done);
}

#[test]
fn missing_end_of_image() {
    let jpeg = sample_jpeg(16, 16);
    let err = JpegDecoder::new(&jpeg[..jpeg.len() - 2])
        .decode()
        .unwrap_err();

    assert!(matches!(err, DecodeErrors::Truncated), "{err:?}");
}

#[test]
fn truncated_scan() {
    let jpeg = noisy_jpeg_cut_mid_scan();
    let err = JpegDecoder::new(&jpeg).decode().unwrap_err();

    assert!(matches!(err, DecodeErrors::Truncated), "{err:?}");
}

/// A noisy image whose entropy coded data cannot be decoded from a prefix
fn noisy_jpeg_cut_mid_scan() -> Vec<u8> {
    let mut rng = WyRand::new_seed(11);
    let mut pixels = vec![0_u8; 64 * 64 * 3];
    rng.fill(&mut pixels);

    let raster = Raster::new(64, 64, pixels).unwrap();
    let jpeg = JpegEncoder::new(&raster, EncoderOptions::default())
        .encode()
        .unwrap();

    let sos = jpeg.windows(2).position(|x| x == [0xFF, 0xDA]).unwrap();
    let cut = sos + 14 + (jpeg.len() - sos) / 2;

    jpeg[..cut].to_vec()
}

#[test]
fn truncated_scan_before_end_of_image() {
    let mut jpeg = noisy_jpeg_cut_mid_scan();
    jpeg.extend_from_slice(&[0xFF, 0xD9]);

    let err = JpegDecoder::new(&jpeg).decode().unwrap_err();

    assert!(matches!(err, DecodeErrors::Truncated), "{err:?}");
}

#[test]
fn foreign_marker_inside_scan() {
    let mut jpeg = noisy_jpeg_cut_mid_scan();
    // a DHT segment where entropy coded data should continue
    jpeg.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x02, 0xFF, 0xD9]);

    let err = JpegDecoder::new(&jpeg).decode().unwrap_err();

    assert!(matches!(err, DecodeErrors::Bitstream(0xC4)), "{err:?}");
}

#[test]
fn undecodable_entropy_data() {
    // a single DC code "0", so a run of ones matches nothing
    let mut bits = [0; 16];
    bits[0] = 1;
    let dc_spec = HuffmanSpec::new(bits, &[0]).unwrap();

    let mut jpeg = grayscale_headers(8, 8, &dc_spec);
    jpeg.extend_from_slice(&[0xFE; 8]);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);

    let err = JpegDecoder::new(&jpeg).decode().unwrap_err();

    assert!(matches!(err, DecodeErrors::InvalidCode), "{err:?}");
}

#[test]
fn later_tables_replace_earlier_ones() {
    let jpeg = sample_jpeg(24, 16);

    let mut patched = jpeg[..2].to_vec();
    // wrong tables under the ids the image uses, redefined by its own segments
    huffman_segment(&mut patched, 0x00, &HuffmanSpec::std_ac_luma());
    huffman_segment(&mut patched, 0x11, &HuffmanSpec::std_dc_chroma());

    let mut dqt = vec![0x00];
    dqt.extend_from_slice(&[99; 64]);
    dqt.push(0x01);
    dqt.extend_from_slice(&[99; 64]);
    segment(&mut patched, 0xDB, &dqt);

    patched.extend_from_slice(&jpeg[2..]);

    let a = JpegDecoder::new(&jpeg).decode().unwrap();
    let b = JpegDecoder::new(&patched).decode().unwrap();
    assert_eq!(a, b);
}

#[test]
fn hierarchical_is_unsupported() {
    let jpeg = sample_jpeg(8, 8);

    for marker in [0xDE, 0xDF] {
        let mut patched = jpeg[..2].to_vec();
        segment(&mut patched, marker, &[0x00, 0x00]);
        patched.extend_from_slice(&jpeg[2..]);

        let err = JpegDecoder::new(&patched).decode().unwrap_err();

        assert!(
            matches!(
                err,
                DecodeErrors::Unsupported(UnsupportedSchemes::Hierarchical)
            ),
            "{marker:X}: {err:?}"
        );
    }
}

#[test]
fn short_and_bad_magic() {
    for data in [&[][..], &[0xFF][..]] {
        let err = JpegDecoder::new(data).decode().unwrap_err();
        assert!(matches!(err, DecodeErrors::Truncated));
    }
    let err = JpegDecoder::new(b"P6\n1 1\n255\n\0\0\0").decode().unwrap_err();
    assert!(matches!(err, DecodeErrors::IllegalMagicBytes(0x5036)));
}

#[test]
fn progressive_is_unsupported() {
    let mut jpeg = sample_jpeg(16, 16);
    let sof = jpeg.windows(2).position(|x| x == [0xFF, 0xC0]).unwrap();
    jpeg[sof + 1] = 0xC2;

    let err = JpegDecoder::new(&jpeg).decode().unwrap_err();

    assert!(matches!(
        err,
        DecodeErrors::Unsupported(UnsupportedSchemes::ProgressiveDctHuffman)
    ));
}

#[test]
fn arithmetic_coding_is_unsupported() {
    let jpeg = sample_jpeg(8, 8);
    let mut patched = jpeg[..2].to_vec();
    segment(&mut patched, 0xCC, &[0x00, 0x10]);
    patched.extend_from_slice(&jpeg[2..]);

    let err = JpegDecoder::new(&patched).decode().unwrap_err();

    assert!(matches!(
        err,
        DecodeErrors::Unsupported(UnsupportedSchemes::ArithmeticCoding)
    ));
}

#[test]
fn comments_and_app_segments_are_skipped() {
    let jpeg = sample_jpeg(8, 8);
    let mut patched = jpeg[..2].to_vec();
    segment(&mut patched, 0xFE, b"made by hand");
    segment(&mut patched, 0xE1, b"Exif\0\0");
    patched.extend_from_slice(&jpeg[2..]);

    let a = JpegDecoder::new(&jpeg).decode().unwrap();
    let b = JpegDecoder::new(&patched).decode().unwrap();
    assert_eq!(a, b);
}

#[test]
fn strict_mode_rejects_junk_between_segments() {
    let jpeg = sample_jpeg(8, 8);
    let mut patched = jpeg[..2].to_vec();
    patched.extend_from_slice(&[0x12, 0x34, 0x56]);
    patched.extend_from_slice(&jpeg[2..]);

    assert!(JpegDecoder::new(&patched).decode().is_ok());

    let options = DecoderOptions::default().set_strict_mode(true);
    let err = JpegDecoder::new_with_options(options, &patched)
        .decode()
        .unwrap_err();
    assert!(matches!(err, DecodeErrors::FormatStatic(_)));
}

#[test]
fn dimension_limits() {
    let jpeg = sample_jpeg(40, 30);

    let options = DecoderOptions::default().set_max_width(16);
    let err = JpegDecoder::new_with_options(options, &jpeg)
        .decode()
        .unwrap_err();
    assert!(matches!(err, DecodeErrors::LargeDimensions(16, 40)));

    let options = DecoderOptions::default().set_max_height(29);
    let err = JpegDecoder::new_with_options(options, &jpeg)
        .decode()
        .unwrap_err();
    assert!(matches!(err, DecodeErrors::LargeDimensions(29, 30)));
}

#[test]
fn missing_huffman_table() {
    let jpeg = grayscale_jpeg(8, 8, &[100]);
    // change the scan to reference table 1 which was never defined
    let sos = jpeg.windows(2).position(|x| x == [0xFF, 0xDA]).unwrap();
    let mut patched = jpeg.clone();
    patched[sos + 6] = 0x11;

    assert!(JpegDecoder::new(&patched).decode().is_err());
}
