
//! Reading and writing the netpbm PPM image container.
//!
//! Supports the binary `P6` variant with one or two bytes per sample
//! (two-byte samples are big endian, as the container demands),
//! and reading the plain ASCII `P3` variant.

use crate::error::{Error, Result, UnitResult};
use crate::image::{Grid, Image, Rgb};
use crate::io::{text, Data, PeekRead, Read, Write};
use crate::math::Vec2;
use crate::meta::MAX_PIXEL_COUNT;
use std::convert::TryFrom;

/// The largest `max_sample` the container can express (two bytes per sample).
pub const MAX_SAMPLE_LIMIT: u64 = 65_535;

// do not allocate more than 2 MiB at once while reading the raster
const SOFT_MAX_SAMPLES: usize = 2 * 1024 * 1024;

const SAMPLES_PER_PIXEL: usize = 3;


/// Read a PPM image, either binary `P6` or plain `P3`.
/// Fails with `Error::Invalid` when the content does not respect the container format.
pub fn read(read: impl Read) -> Result<Image> {
    let mut read = PeekRead::new(read);

    let mut identifier = [0_u8; 2];
    u8::read_slice(&mut read, &mut identifier).map_err(|_| Error::invalid("ppm identifier"))?;

    let plain = match &identifier {
        b"P6" => false,
        b"P3" => true,
        _ => return Err(Error::invalid("ppm identifier")),
    };

    let resolution = Vec2(
        parse_header_number(&mut read)?,
        parse_header_number(&mut read)?,
    );

    if resolution.x() == 0 || resolution.y() == 0 {
        return Err(Error::invalid("ppm dimensions must not be zero"));
    }

    if resolution.area() > MAX_PIXEL_COUNT {
        return Err(Error::invalid("ppm resolution too large"));
    }

    skip_whitespace_and_comments(&mut read)?;
    let max_sample = text::parse_uint(&mut read)?;

    if max_sample == 0 || max_sample > MAX_SAMPLE_LIMIT {
        return Err(Error::invalid("ppm maximum sample value out of range"));
    }

    let max_sample = max_sample as u16;

    // exactly one whitespace byte separates the header from the raster
    let separator = u8::read(&mut read)?;
    if !separator.is_ascii_whitespace() {
        return Err(Error::invalid("expected whitespace before the ppm raster"));
    }

    let sample_count = resolution.area() * SAMPLES_PER_PIXEL;

    let samples: Vec<u16> =
        if plain { read_plain_samples(&mut read, sample_count)? }
        else if max_sample < 256 {
            u8::read_vec(&mut read, sample_count, SOFT_MAX_SAMPLES)?
                .into_iter().map(u16::from).collect()
        }
        else {
            u16::read_vec(&mut read, sample_count, SOFT_MAX_SAMPLES)?
        };

    if samples.iter().any(|&sample| sample > max_sample) {
        return Err(Error::invalid("ppm sample value exceeds the declared maximum"));
    }

    let pixels = samples.chunks(SAMPLES_PER_PIXEL)
        .map(|pixel| Rgb { red: pixel[0], green: pixel[1], blue: pixel[2] })
        .collect();

    Ok(Image { pixels: Grid::new(resolution, pixels), max_sample })
}

/// Write an image as a binary `P6` PPM,
/// with two bytes per sample where the maximum sample value demands it.
pub fn write(write: &mut impl Write, image: &Image) -> UnitResult {
    let resolution = image.resolution();

    write!(
        write, "P6\n{} {}\n{}\n",
        resolution.x(), resolution.y(), image.max_sample
    )?;

    let mut samples = Vec::with_capacity(resolution.area() * SAMPLES_PER_PIXEL);
    for pixel in image.pixels.elements() {
        samples.push(pixel.red);
        samples.push(pixel.green);
        samples.push(pixel.blue);
    }

    if image.max_sample < 256 {
        let bytes: Vec<u8> = samples.into_iter().map(|sample| sample as u8).collect();
        u8::write_slice(write, &bytes)
    }
    else {
        u16::write_slice(write, &samples)
    }
}


fn parse_header_number(read: &mut PeekRead<impl Read>) -> Result<usize> {
    skip_whitespace_and_comments(read)?;
    let value = text::parse_uint(read)?;
    usize::try_from(value).map_err(|_| Error::invalid("ppm header number too large"))
}

/// Consume any amount of whitespace, including `#` comments that run until a line break.
fn skip_whitespace_and_comments(read: &mut PeekRead<impl Read>) -> UnitResult {
    loop {
        if read.skip_if(|byte| byte.is_ascii_whitespace())?.is_some() {
            continue;
        }

        if read.skip_if_eq(b'#')? {
            while read.skip_if(|byte| byte != b'\n')?.is_some() {}
            continue;
        }

        return Ok(());
    }
}

fn read_plain_samples(read: &mut PeekRead<impl Read>, sample_count: usize) -> Result<Vec<u16>> {
    let mut samples = Vec::with_capacity(sample_count.min(SOFT_MAX_SAMPLES));

    for _ in 0 .. sample_count {
        skip_whitespace_and_comments(read)?;
        let sample = text::parse_uint(read)?;

        if sample > MAX_SAMPLE_LIMIT {
            return Err(Error::invalid("ppm sample value out of range"));
        }

        samples.push(sample as u16);
    }

    Ok(samples)
}


#[cfg(test)]
mod test {
    use super::*;

    fn tiny_image() -> Image {
        Image {
            max_sample: 255,
            pixels: Grid::new(Vec2(2, 2), vec![
                Rgb { red: 255, green: 0, blue: 0 },
                Rgb { red: 0, green: 255, blue: 0 },
                Rgb { red: 0, green: 0, blue: 255 },
                Rgb { red: 128, green: 128, blue: 128 },
            ]),
        }
    }

    #[test]
    fn roundtrip_p6() {
        let image = tiny_image();

        let mut bytes = Vec::new();
        write(&mut bytes, &image).unwrap();

        assert!(bytes.starts_with(b"P6\n2 2\n255\n"));
        assert_eq!(bytes.len(), b"P6\n2 2\n255\n".len() + 12);

        assert_eq!(read(bytes.as_slice()).unwrap(), image);
    }

    #[test]
    fn roundtrip_p6_wide_samples() {
        let image = Image {
            max_sample: 1023,
            pixels: Grid::new(Vec2(1, 2), vec![
                Rgb { red: 1023, green: 0, blue: 512 },
                Rgb { red: 7, green: 300, blue: 999 },
            ]),
        };

        let mut bytes = Vec::new();
        write(&mut bytes, &image).unwrap();

        // two bytes per sample, big endian
        assert_eq!(bytes.len(), b"P6\n1 2\n1023\n".len() + 12);
        assert_eq!(read(bytes.as_slice()).unwrap(), image);
    }

    #[test]
    fn reads_plain_p3() {
        let text = "P3\n# a comment\n2 2\n255\n\
                    255 0 0  0 255 0\n\
                    0 0 255  128 128 128\n";

        assert_eq!(read(text.as_bytes()).unwrap(), tiny_image());
    }

    #[test]
    fn rejects_malformed_content() {
        assert!(read(&b"P5\n2 2\n255\nxxxx"[..]).is_err()); // graymap, not a pixmap
        assert!(read(&b"P6\n0 2\n255\n"[..]).is_err()); // zero dimension
        assert!(read(&b"P6\n2 2\n0\n"[..]).is_err()); // zero maximum
        assert!(read(&b"P6\n2 2\n70000\n"[..]).is_err()); // maximum too large
        assert!(read(&b"P6\n2 2\n255\nxx"[..]).is_err()); // truncated raster
        assert!(read(&b"P3\n1 1\n255\n1 2"[..]).is_err()); // missing sample
        assert!(read(&b"P3\n1 1\n9\n1 2 10"[..]).is_err()); // sample above maximum
    }

    #[test]
    fn accepts_header_comments() {
        let bytes = b"P6 # tiny\n# another comment\n1 1\n# last one\n255\n\x01\x02\x03";
        let image = read(&bytes[..]).unwrap();
        assert_eq!(image.pixels.get(Vec2(0, 0)), &Rgb { red: 1, green: 2, blue: 3 });
    }
}
