/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsStr;

use clap::ArgMatches;
use log::info;
use pixconv_core::colorspace::ColorSpace;
use pixconv_core::options::DecoderOptions;
use pixconv_jpeg::{DecodeErrors, JpegDecoder};
use pixconv_ppm::PPMDecoder;

use crate::errors::CliErrors;
use crate::file_io::read_file;
use crate::formats::ImageFormat;
use crate::serde::Metadata;

/// Read the headers of `data` and collect its metadata
pub fn probe_data(file: &OsStr, data: &[u8]) -> Result<Metadata, CliErrors> {
    // only headers are read, so size limits do not matter
    let options = DecoderOptions::new()
        .set_max_width(usize::MAX)
        .set_max_height(usize::MAX);

    let size = data.len() as u64;

    match ImageFormat::guess_format(data) {
        Some(ImageFormat::Ppm) => {
            let mut decoder = PPMDecoder::new_with_options(options, data);
            decoder.decode_headers()?;

            let dimensions = decoder.dimensions().unwrap_or_default();
            let colorspace = decoder.colorspace().unwrap_or(ColorSpace::RGB);

            Ok(Metadata::new_ppm(file.to_os_string(), size, dimensions, colorspace))
        }
        Some(ImageFormat::Jpeg) => {
            let mut decoder = JpegDecoder::new_with_options(options, data);
            decoder.decode_headers()?;

            let info = decoder
                .info()
                .ok_or(DecodeErrors::FormatStatic("No image information after headers"))?;

            Ok(Metadata::new_jpeg(file.to_os_string(), size, info))
        }
        None => Err(CliErrors::UnknownInputFormat(file.to_os_string()))
    }
}

/// Probe input files, extract metadata, and print to standard output.
pub fn probe_input_files(args: &ArgMatches) -> Result<(), CliErrors> {
    for in_file in args.get_raw("in").into_iter().flatten() {
        info!("Probing {:?}", in_file);

        let data = read_file(in_file)?;
        let metadata = probe_data(in_file, &data)?;

        println!("{}", serde_json::to_string_pretty(&metadata)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use pixconv_core::options::EncoderOptions;
    use pixconv_core::raster::Raster;
    use pixconv_jpeg::JpegEncoder;

    use crate::errors::CliErrors;
    use crate::probe_files::probe_data;

    #[test]
    fn headers_of_both_formats() {
        let raster = Raster::filled(9, 4, [1, 2, 3]).unwrap();

        let ppm = pixconv_ppm::encode(&raster);
        let value = serde_json::to_value(probe_data(OsStr::new("a.ppm"), &ppm).unwrap()).unwrap();
        assert_eq!(value["width"], 9);
        assert_eq!(value["height"], 4);

        let jpeg = JpegEncoder::new(&raster, EncoderOptions::default())
            .encode()
            .unwrap();
        let value = serde_json::to_value(probe_data(OsStr::new("a.jpg"), &jpeg).unwrap()).unwrap();
        assert_eq!(value["format"], "jpeg");
        assert_eq!(value["jpeg"]["jfif"], true);
    }

    #[test]
    fn unknown_data() {
        let err = probe_data(OsStr::new("a.bin"), b"GIF89a").unwrap_err();
        assert!(matches!(err, CliErrors::UnknownInputFormat(_)));
    }
}
