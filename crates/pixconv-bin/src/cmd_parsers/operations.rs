/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::parser::ValueSource;
use clap::ArgMatches;
use log::debug;
use pixconv_imageprocs::brighten::Brighten;
use pixconv_imageprocs::contrast::Contrast;
use pixconv_imageprocs::invert::Invert;
use pixconv_imageprocs::saturation::Saturation;
use pixconv_imageprocs::traits::OperationsTrait;

/// Position of `id` on the command line, `None` if it was not given there
fn cli_position(args: &ArgMatches, id: &str) -> Option<usize> {
    if args.value_source(id) != Some(ValueSource::CommandLine) {
        return None;
    }
    Some(args.index_of(id).unwrap_or(usize::MAX))
}

/// Collect the `OPERATIONS` arguments in the order they appear on the command line
pub fn get_operations(args: &ArgMatches) -> Vec<Box<dyn OperationsTrait>> {
    let mut operations: Vec<(usize, Box<dyn OperationsTrait>)> = Vec::new();

    if let (Some(pos), Some(value)) = (
        cli_position(args, "brighten"),
        args.get_one::<i16>("brighten")
    ) {
        debug!("Added brighten operation with {:?}", value);
        operations.push((pos, Box::new(Brighten::new(*value))));
    }
    if let (Some(pos), Some(value)) = (
        cli_position(args, "saturate"),
        args.get_one::<f32>("saturate")
    ) {
        debug!("Added saturation operation with {:?}", value);
        operations.push((pos, Box::new(Saturation::new(*value))));
    }
    if let (Some(pos), Some(value)) = (
        cli_position(args, "contrast"),
        args.get_one::<f32>("contrast")
    ) {
        debug!("Added contrast operation with {:?}", value);
        operations.push((pos, Box::new(Contrast::new(*value))));
    }
    if let Some(pos) = cli_position(args, "invert") {
        if args.get_flag("invert") {
            debug!("Added invert operation");
            operations.push((pos, Box::new(Invert::new())));
        }
    }
    operations.sort_by_key(|(pos, _)| *pos);

    operations.into_iter().map(|(_, op)| op).collect()
}

#[cfg(test)]
mod tests {
    use crate::cmd_args::create_cmd_args;
    use crate::cmd_parsers::operations::get_operations;

    fn names(args: &[&str]) -> Vec<&'static str> {
        let matches = create_cmd_args().try_get_matches_from(args).unwrap();

        get_operations(&matches).iter().map(|x| x.name()).collect()
    }

    #[test]
    fn no_operations_by_default() {
        assert!(names(&["pixconv", "-i", "a.ppm", "-o", "b.jpg"]).is_empty());
    }

    #[test]
    fn operations_follow_command_line_order() {
        let args = [
            "pixconv", "-i", "a.ppm", "-o", "b.ppm", "--contrast", "2.0", "--brighten", "50"
        ];
        assert_eq!(names(&args), ["Contrast", "Brighten"]);

        let args = [
            "pixconv", "-i", "a.ppm", "-o", "b.ppm", "--brighten", "50", "--saturate", "1.5",
            "--contrast", "2.0"
        ];
        assert_eq!(names(&args), ["Brighten", "Saturation", "Contrast"]);
    }

    #[test]
    fn invert_and_negative_brighten() {
        let args = ["pixconv", "-i", "a.ppm", "-o", "b.ppm", "--invert", "--brighten", "-20"];
        let found = names(&args);

        assert_eq!(found.len(), 2);
        assert!(found.contains(&"Invert"));
        assert!(found.contains(&"Brighten"));
    }
}
