/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use pixconv_core::options::{DecoderOptions, EncoderOptions};

use crate::cmd_args::SubsamplingArg;

pub mod global_options;
pub mod operations;

/// Build decoder options from the `DECODING` arguments
pub fn get_decoder_options(options: &ArgMatches) -> DecoderOptions {
    let max_width = options.get_one::<usize>("max-width").copied();
    let max_height = options.get_one::<usize>("max-height").copied();
    let strict_mode = options.get_flag("strict");

    let defaults = DecoderOptions::default();

    DecoderOptions::new()
        .set_max_width(max_width.unwrap_or(defaults.max_width()))
        .set_max_height(max_height.unwrap_or(defaults.max_height()))
        .set_strict_mode(strict_mode)
}

/// Build encoder options from the `ENCODING` arguments
pub fn get_encoder_options(options: &ArgMatches) -> EncoderOptions {
    let defaults = EncoderOptions::default();

    let quality = options
        .get_one::<u8>("quality")
        .copied()
        .unwrap_or(defaults.quality());
    let subsampling = options
        .get_one::<SubsamplingArg>("subsampling")
        .map_or(defaults.subsampling(), |x| (*x).into());
    let restart_interval = options
        .get_one::<u16>("restart-interval")
        .copied()
        .unwrap_or(defaults.restart_interval());
    let optimize_huffman = !options.get_flag("no-optimize");

    EncoderOptions::new()
        .set_quality(quality)
        .set_subsampling(subsampling)
        .set_restart_interval(restart_interval)
        .set_optimize_huffman(optimize_huffman)
}

#[cfg(test)]
mod tests {
    use pixconv_core::options::Subsampling;

    use crate::cmd_args::create_cmd_args;
    use crate::cmd_parsers::{get_decoder_options, get_encoder_options};

    #[test]
    fn defaults_match_library_defaults() {
        let matches = create_cmd_args()
            .try_get_matches_from(["pixconv", "-i", "a.ppm", "-o", "b.jpg"])
            .unwrap();

        let encoder = get_encoder_options(&matches);
        assert_eq!(encoder.quality(), 90);
        assert_eq!(encoder.subsampling(), Subsampling::Yuv420);
        assert!(encoder.optimize_huffman());
        assert_eq!(encoder.restart_interval(), 0);

        let decoder = get_decoder_options(&matches);
        assert_eq!(decoder.max_width(), 16384);
        assert!(!decoder.strict_mode());
    }

    #[test]
    fn flags_are_mapped() {
        let args = [
            "pixconv",
            "-i",
            "a.jpg",
            "-o",
            "b.jpg",
            "--quality",
            "55",
            "--subsampling",
            "444",
            "--restart-interval",
            "4",
            "--no-optimize",
            "--strict",
            "--max-width",
            "100"
        ];
        let matches = create_cmd_args().try_get_matches_from(args).unwrap();

        let encoder = get_encoder_options(&matches);
        assert_eq!(encoder.quality(), 55);
        assert_eq!(encoder.subsampling(), Subsampling::Yuv444);
        assert_eq!(encoder.restart_interval(), 4);
        assert!(!encoder.optimize_huffman());

        let decoder = get_decoder_options(&matches);
        assert_eq!(decoder.max_width(), 100);
        assert!(decoder.strict_mode());
    }
}
