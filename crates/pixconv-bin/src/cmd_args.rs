/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

pub(crate) mod help_strings;

use clap::builder::PossibleValue;
use clap::{value_parser, Arg, ArgAction, Command, ValueEnum};
use pixconv_core::options::Subsampling;

use crate::cmd_args::help_strings::{
    BRIGHTEN_HELP, CONTRAST_HELP, PROBE_HELP, QUALITY_HELP, RESTART_HELP, SATURATE_HELP,
    SUBSAMPLING_HELP
};

/// Chroma subsampling as spelled on the command line
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum SubsamplingArg {
    S444,
    S420
}

impl ValueEnum for SubsamplingArg {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::S420, Self::S444]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Self::S444 => PossibleValue::new("444"),
            Self::S420 => PossibleValue::new("420")
        })
    }
}

impl From<SubsamplingArg> for Subsampling {
    fn from(value: SubsamplingArg) -> Self {
        match value {
            SubsamplingArg::S444 => Subsampling::Yuv444,
            SubsamplingArg::S420 => Subsampling::Yuv420
        }
    }
}

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("pixconv")
        .about("Convert images between binary PPM and baseline JPEG")
        .arg(Arg::new("in")
            .short('i')
            .help("Input file to read data from")
            .long("input")
            .action(ArgAction::Append)
            .value_parser(value_parser!(std::ffi::OsString))
            .required(true))
        .arg(Arg::new("out")
            .short('o')
            .help("Output to write the data to")
            .long("output")
            .action(ArgAction::Append)
            .value_parser(value_parser!(std::ffi::OsString))
            .required_unless_present("probe"))
        .arg(Arg::new("probe")
            .long("probe")
            .action(ArgAction::SetTrue)
            .help("Print information about the input files and exit")
            .long_help(PROBE_HELP))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the decoding options"))
        .arg(Arg::new("quality")
            .long("quality")
            .help_heading("ENCODING")
            .help("JPEG quality between 1 and 100")
            .long_help(QUALITY_HELP)
            .default_value("90")
            .value_parser(value_parser!(u8).range(1..=100)))
        .arg(Arg::new("subsampling")
            .long("subsampling")
            .help_heading("ENCODING")
            .help("Chroma subsampling of JPEG output")
            .long_help(SUBSAMPLING_HELP)
            .default_value("420")
            .value_parser(value_parser!(SubsamplingArg)))
        .arg(Arg::new("restart-interval")
            .long("restart-interval")
            .help_heading("ENCODING")
            .help("Number of MCUs between JPEG restart markers, 0 disables them")
            .long_help(RESTART_HELP)
            .default_value("0")
            .value_parser(value_parser!(u16)))
        .arg(Arg::new("no-optimize")
            .long("no-optimize")
            .help_heading("ENCODING")
            .action(ArgAction::SetTrue)
            .help("Use the standard Huffman tables instead of tables built for the image"))
        .arg(Arg::new("strict")
            .long("strict")
            .help_heading("DECODING")
            .action(ArgAction::SetTrue)
            .help("Treat recoverable format violations as errors"))
        .arg(Arg::new("max-width")
            .long("max-width")
            .help_heading("DECODING")
            .help("Largest image width the decoders accept")
            .default_value("16384")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("max-height")
            .long("max-height")
            .help_heading("DECODING")
            .help("Largest image height the decoders accept")
            .default_value("16384")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("brighten")
            .long("brighten")
            .help_heading("OPERATIONS")
            .help("Brighten or darken the image by a value")
            .long_help(BRIGHTEN_HELP)
            .allow_negative_numbers(true)
            .value_parser(value_parser!(i16)))
        .arg(Arg::new("saturate")
            .long("saturate")
            .help_heading("OPERATIONS")
            .help("Scale color saturation by a factor")
            .long_help(SATURATE_HELP)
            .value_parser(value_parser!(f32)))
        .arg(Arg::new("contrast")
            .long("contrast")
            .help_heading("OPERATIONS")
            .help("Scale contrast around mid-gray by a factor")
            .long_help(CONTRAST_HELP)
            .allow_negative_numbers(true)
            .value_parser(value_parser!(f32)))
        .arg(Arg::new("invert")
            .long("invert")
            .help_heading("OPERATIONS")
            .action(ArgAction::SetTrue)
            .help("Invert the colors of the image"))
}

#[cfg(test)]
mod tests {
    use crate::cmd_args::create_cmd_args;

    #[test]
    fn command_is_well_formed() {
        create_cmd_args().debug_assert();
    }

    #[test]
    fn output_is_optional_when_probing() {
        let matches = create_cmd_args().try_get_matches_from(["pixconv", "-i", "a.jpg", "--probe"]);
        assert!(matches.is_ok());

        let matches = create_cmd_args().try_get_matches_from(["pixconv", "-i", "a.jpg"]);
        assert!(matches.is_err());
    }

    #[test]
    fn quality_is_range_checked() {
        let args = ["pixconv", "-i", "a.ppm", "-o", "b.jpg", "--quality", "101"];
        assert!(create_cmd_args().try_get_matches_from(args).is_err());
    }
}
