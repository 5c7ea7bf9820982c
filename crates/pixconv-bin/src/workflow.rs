/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsStr;

use clap::ArgMatches;
use log::{debug, info};
use pixconv_core::options::{DecoderOptions, EncoderOptions};
use pixconv_imageprocs::traits::OperationsTrait;

use crate::cmd_parsers::operations::get_operations;
use crate::cmd_parsers::{get_decoder_options, get_encoder_options};
use crate::errors::CliErrors;
use crate::file_io::{read_file, write_file};
use crate::formats::ImageFormat;

/// Convert every `-i` file into the matching `-o` file
pub(crate) fn create_and_exec_workflow_from_cmd(args: &ArgMatches) -> Result<(), CliErrors> {
    info!("Creating workflows from input");

    let inputs: Vec<&OsStr> = args.get_raw("in").into_iter().flatten().collect();
    let outputs: Vec<&OsStr> = args.get_raw("out").into_iter().flatten().collect();

    if inputs.len() != outputs.len() {
        return Err(CliErrors::MismatchedFiles(inputs.len(), outputs.len()));
    }
    let decoder_options = get_decoder_options(args);
    let encoder_options = get_encoder_options(args);
    let operations = get_operations(args);

    debug!("Decoder options: {:?}", decoder_options);
    debug!("Encoder options: {:?}", encoder_options);

    for (in_file, out_file) in inputs.into_iter().zip(outputs) {
        convert_file(
            in_file,
            out_file,
            decoder_options,
            encoder_options,
            &operations
        )?;
    }
    Ok(())
}

/// Decode `in_file` and write it to `out_file` in the format named by its extension
pub fn convert_file(
    in_file: &OsStr, out_file: &OsStr, decoder_options: DecoderOptions,
    encoder_options: EncoderOptions, operations: &[Box<dyn OperationsTrait>]
) -> Result<(), CliErrors> {
    verify_file_paths(in_file, out_file)?;

    let out_format = ImageFormat::from_extension(out_file)
        .ok_or_else(|| CliErrors::UnknownOutputFormat(out_file.to_os_string()))?;

    let data = read_file(in_file)?;
    let output = convert(
        &data,
        in_file,
        out_format,
        decoder_options,
        encoder_options,
        operations
    )?;

    write_file(out_file, &output)
}

/// Convert an in-memory file into `out_format`
///
/// `operations` run in order on the decoded image before it is encoded
pub fn convert(
    data: &[u8], name: &OsStr, out_format: ImageFormat, decoder_options: DecoderOptions,
    encoder_options: EncoderOptions, operations: &[Box<dyn OperationsTrait>]
) -> Result<Vec<u8>, CliErrors> {
    let in_format = ImageFormat::guess_format(data)
        .ok_or_else(|| CliErrors::UnknownInputFormat(name.to_os_string()))?;

    debug!("Treating {:?} as a {} file", name, in_format.name());

    let mut raster = in_format.decode(data, decoder_options)?;

    for operation in operations {
        debug!("Running {} operation", operation.name());
        operation.execute(&mut raster);
    }

    info!(
        "Decoded {}x{} image, encoding as {}",
        raster.width(),
        raster.height(),
        out_format.name()
    );

    out_format.encode(&raster, encoder_options)
}

fn verify_file_paths(p0: &OsStr, p1: &OsStr) -> Result<(), CliErrors> {
    if p0 == p1 {
        return Err(CliErrors::SamePath(p0.to_os_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use pixconv_core::options::{DecoderOptions, EncoderOptions};
    use pixconv_core::raster::Raster;
    use pixconv_imageprocs::brighten::Brighten;
    use pixconv_imageprocs::contrast::Contrast;
    use pixconv_imageprocs::invert::Invert;
    use pixconv_imageprocs::saturation::Saturation;
    use pixconv_imageprocs::traits::OperationsTrait;

    use crate::errors::CliErrors;
    use crate::formats::ImageFormat;
    use crate::workflow::{convert, convert_file};

    #[test]
    fn ppm_to_jpeg_and_back() {
        let raster = Raster::filled(12, 7, [30, 60, 90]).unwrap();
        let ppm = pixconv_ppm::encode(&raster);

        let name = OsStr::new("in.ppm");
        let jpeg = convert(
            &ppm,
            name,
            ImageFormat::Jpeg,
            DecoderOptions::default(),
            EncoderOptions::default(),
            &[]
        )
        .unwrap();
        assert_eq!(ImageFormat::guess_format(&jpeg), Some(ImageFormat::Jpeg));

        let back = convert(
            &jpeg,
            name,
            ImageFormat::Ppm,
            DecoderOptions::default(),
            EncoderOptions::default(),
            &[]
        )
        .unwrap();
        let decoded = pixconv_ppm::decode(&back).unwrap();
        assert_eq!(decoded.dimensions(), (12, 7));
    }

    #[test]
    fn operations_run_in_order_before_encoding() {
        let raster = Raster::from_pixels(2, 1, &[[0, 100, 250], [128, 129, 200]]).unwrap();
        let ppm = pixconv_ppm::encode(&raster);

        let operations: [Box<dyn OperationsTrait>; 2] =
            [Box::new(Brighten::new(50)), Box::new(Invert::new())];
        let output = convert(
            &ppm,
            OsStr::new("in.ppm"),
            ImageFormat::Ppm,
            DecoderOptions::default(),
            EncoderOptions::default(),
            &operations
        )
        .unwrap();
        let result = pixconv_ppm::decode(&output).unwrap();
        assert_eq!(result.pixel(0, 0), [205, 105, 0]);
        assert_eq!(result.pixel(1, 0), [77, 76, 5]);

        let operations: [Box<dyn OperationsTrait>; 2] = [
            Box::new(Contrast::new(2.0)),
            Box::new(Saturation::new(1.0))
        ];
        let output = convert(
            &ppm,
            OsStr::new("in.ppm"),
            ImageFormat::Ppm,
            DecoderOptions::default(),
            EncoderOptions::default(),
            &operations
        )
        .unwrap();
        let result = pixconv_ppm::decode(&output).unwrap();
        assert_eq!(result.pixel(0, 0), [0, 72, 255]);
        assert_eq!(result.pixel(1, 0), [128, 130, 255]);
    }

    #[test]
    fn same_path_is_rejected() {
        let path = OsStr::new("image.ppm");
        let err = convert_file(
            path,
            path,
            DecoderOptions::default(),
            EncoderOptions::default(),
            &[]
        )
        .unwrap_err();

        assert!(matches!(err, CliErrors::SamePath(_)));
    }

    #[test]
    fn unknown_output_extension() {
        let err = convert_file(
            OsStr::new("image.ppm"),
            OsStr::new("image.png"),
            DecoderOptions::default(),
            EncoderOptions::default(),
            &[]
        )
        .unwrap_err();

        assert!(matches!(err, CliErrors::UnknownOutputFormat(_)));
    }
}
