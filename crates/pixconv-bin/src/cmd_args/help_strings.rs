/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

pub static QUALITY_HELP: &str = "JPEG encoding quality

Range is between 1 and 100. Higher values give larger files
closer to the input, 100 disables most of the quantization.
Ignored when writing PPM files.";

pub static SUBSAMPLING_HELP: &str = "Chroma subsampling of JPEG output

420 stores color at half the horizontal and vertical resolution,
444 keeps it at full resolution.";

pub static RESTART_HELP: &str = "Number of MCUs between JPEG restart markers

Restart markers let a decoder resynchronise after corrupt data.
0 disables them.";

pub static PROBE_HELP: &str = "Print information about the input files and exit

Only the headers are read, the output is JSON written to standard output.";


pub static BRIGHTEN_HELP: &str = "Add a value to every sample

Negative values darken the image. Results are clamped
between 0 and 255.";

pub static SATURATE_HELP: &str = "Scale color saturation

Every channel is moved away from the mean of its pixel by this factor.
0.0 produces a gray image, 1.0 leaves the image as is.";

pub static CONTRAST_HELP: &str = "Scale contrast around mid-gray

Every sample becomes (x - 128) * factor + 128, clamped between 0 and 255.";
