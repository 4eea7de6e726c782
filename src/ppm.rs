//! Plain-text portable pixmap (`P3`) output and input.
//!
//! This is the ASCII variant of the PPM format: a `P3` magic number, the
//! image dimensions, the maximum channel value, and then one decimal sample
//! per channel. Every viewer under the sun reads it, which makes it a handy
//! lowest common denominator for render output and for golden files.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::Image;

/// Channels are clamped just shy of 1 before quantization, so a fully
/// saturated channel maps to 255 rather than overflowing to 256.
const CLAMP_MAX: f64 = 0.9999;

/// Errors from [`read_ppm`].
#[derive(Debug, Error)]
pub enum PpmError {
    #[error("i/o error reading image: {0}")]
    Io(#[from] io::Error),
    #[error("not a P3 image (magic number {0:?})")]
    BadMagic(String),
    #[error("malformed header field or sample: {0:?}")]
    BadToken(String),
    #[error("only 8-bit images are supported (max value {0})")]
    BadMaxValue(u32),
    #[error("expected {expected} samples, found {found}")]
    SampleCount { expected: usize, found: usize },
}

/// Quantizes one gamma-corrected channel in `[0, 1]` to the 0-255 integer the
/// text format stores.
pub fn quantize(channel: f64) -> u8 {
    (256. * channel.max(0.).min(CLAMP_MAX)) as u8
}

/// Writes `image` in the `P3` format, one pixel's triplet per line.
pub fn write_ppm(image: &Image, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "P3\n{} {}\n255", image.width(), image.height())?;
    for pixel in image.channels().chunks(3) {
        writeln!(
            out,
            "{} {} {}",
            quantize(pixel[0]),
            quantize(pixel[1]),
            quantize(pixel[2])
        )?;
    }
    Ok(())
}

/// A parsed `P3` image: dimensions plus one quantized value per channel, in
/// the same row-major order the renderer writes.
#[derive(Clone, Debug, PartialEq)]
pub struct Ppm {
    pub width: usize,
    pub height: usize,
    pub samples: Vec<u8>,
}

/// Reads a `P3` image back from `input`.
///
/// Whitespace is free-form and `#` comments are ignored, per the format.
pub fn read_ppm(input: &mut impl BufRead) -> Result<Ppm, PpmError> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    let mut tokens = text
        .lines()
        .flat_map(|line| line.split('#').next().unwrap_or("").split_whitespace());

    match tokens.next() {
        Some("P3") => {}
        other => return Err(PpmError::BadMagic(other.unwrap_or("").to_string())),
    }
    let width: usize = parse_field(tokens.next())?;
    let height: usize = parse_field(tokens.next())?;
    let max_value: u32 = parse_field(tokens.next())?;
    if max_value != 255 {
        return Err(PpmError::BadMaxValue(max_value));
    }

    let expected = width * height * 3;
    let mut samples = Vec::with_capacity(expected);
    for token in tokens {
        let value: u32 = parse_field(Some(token))?;
        if value > 255 {
            return Err(PpmError::BadToken(token.to_string()));
        }
        samples.push(value as u8);
    }
    if samples.len() != expected {
        return Err(PpmError::SampleCount {
            expected,
            found: samples.len(),
        });
    }

    Ok(Ppm {
        width,
        height,
        samples,
    })
}

fn parse_field<T: std::str::FromStr>(token: Option<&str>) -> Result<T, PpmError> {
    let token = token.ok_or_else(|| PpmError::BadToken(String::new()))?;
    token
        .parse()
        .map_err(|_| PpmError::BadToken(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::Vec3;

    fn sample_image() -> Image {
        let mut image = Image::with_size(2, 2);
        image.push_pixel(Vec3(0., 0.25, 1.), 1);
        image.push_pixel(Vec3(0.5, 0.5, 0.5), 1);
        image.push_pixel(Vec3::from(1.), 1);
        image.push_pixel(Vec3::default(), 1);
        image
    }

    #[test]
    fn quantize_clamps_and_truncates() {
        assert_eq!(quantize(0.), 0);
        assert_eq!(quantize(-0.5), 0);
        assert_eq!(quantize(1.), 255);
        assert_eq!(quantize(2.), 255);
        assert_eq!(quantize(0.5), 128);
    }

    #[test]
    fn header_matches_the_format() {
        let image = sample_image();
        let mut out = Vec::new();
        write_ppm(&image, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("P3\n2 2\n255\n"));
        assert_eq!(text.lines().count(), 3 + 4);
    }

    #[test]
    fn round_trip_recovers_the_quantized_samples() {
        let image = sample_image();
        let mut out = Vec::new();
        write_ppm(&image, &mut out).unwrap();

        let parsed = read_ppm(&mut out.as_slice()).unwrap();
        assert_eq!(parsed.width, 2);
        assert_eq!(parsed.height, 2);
        let expected: Vec<u8> = image.channels().iter().copied().map(quantize).collect();
        assert_eq!(parsed.samples, expected);
    }

    #[test]
    fn comments_and_odd_whitespace_are_tolerated() {
        let text = "P3 # ascii pixmap\n2 1\n255\n0 1 2   3\n4 5\n";
        let parsed = read_ppm(&mut text.as_bytes()).unwrap();
        assert_eq!(parsed.width, 2);
        assert_eq!(parsed.samples, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        assert!(matches!(
            read_ppm(&mut "P6 2 2 255".as_bytes()),
            Err(PpmError::BadMagic(_))
        ));
        assert!(matches!(
            read_ppm(&mut "P3 2 1 255 0 0 0".as_bytes()),
            Err(PpmError::SampleCount {
                expected: 6,
                found: 3
            })
        ));
        assert!(matches!(
            read_ppm(&mut "P3 1 1 255 0 0 300".as_bytes()),
            Err(PpmError::BadToken(_))
        ));
        assert!(matches!(
            read_ppm(&mut "P3 1 1 65535 0 0 0".as_bytes()),
            Err(PpmError::BadMaxValue(65535))
        ));
    }
}
