
//! End-to-end scenarios over the whole pipeline:
//! PPM in, compressed stream out, and back again.

use rpeg::compression::{self, DECOMPRESSED_MAX_SAMPLE};
use rpeg::image::{ppm, Grid, Image, Rgb};
use rpeg::math::Vec2;
use rpeg::meta::magic;


fn gray_image(resolution: Vec2<usize>, sample: u16) -> Image {
    Image {
        max_sample: 255,
        pixels: Grid::from_fn(resolution, |_| Rgb { red: sample, green: sample, blue: sample }),
    }
}

fn header_length(width: usize, height: usize) -> usize {
    magic::BYTES.len() + format!("{} {}\n", width, height).len()
}

fn max_channel_difference(left: &Image, right: &Image) -> i32 {
    assert_eq!(left.resolution(), right.resolution());

    left.pixels.elements().iter().zip(right.pixels.elements())
        .flat_map(|(left, right)| vec![
            i32::from(left.red) - i32::from(right.red),
            i32::from(left.green) - i32::from(right.green),
            i32::from(left.blue) - i32::from(right.blue),
        ])
        .map(i32::abs).max().unwrap()
}


#[test]
fn tiny_gray_image_compresses_to_one_word() {
    let image = gray_image(Vec2(2, 2), 128);
    let bytes = compression::compress_to_vec(&image).unwrap();

    assert_eq!(bytes.len(), header_length(2, 2) + 4);

    let decompressed = compression::decompress(&mut bytes.as_slice()).unwrap();
    assert_eq!(decompressed.resolution(), Vec2(2, 2));
    assert_eq!(decompressed.max_sample, DECOMPRESSED_MAX_SAMPLE);

    // all four pixels decode identically,
    // within the bound dominated by the innermost chroma level
    let first = decompressed.pixels.get(Vec2(0, 0));
    for pixel in decompressed.pixels.elements() {
        assert_eq!(pixel, first);
    }

    assert!(max_channel_difference(&decompressed, &image) <= 6);
}

#[test]
fn two_tiles_compress_to_two_words() {
    let colors = [
        Rgb { red: 10, green: 20, blue: 30 }, Rgb { red: 40, green: 50, blue: 60 },
        Rgb { red: 70, green: 80, blue: 90 }, Rgb { red: 100, green: 110, blue: 120 },
        Rgb { red: 130, green: 140, blue: 150 }, Rgb { red: 160, green: 170, blue: 180 },
        Rgb { red: 190, green: 200, blue: 210 }, Rgb { red: 220, green: 230, blue: 240 },
    ];

    let image = Image {
        max_sample: 255,
        pixels: Grid::from_fn(Vec2(4, 2), |position| colors[position.y() * 4 + position.x()]),
    };

    let bytes = compression::compress_to_vec(&image).unwrap();

    // exactly one code word per 2×2 tile: eight bytes of pixel data after the header
    assert_eq!(bytes.len(), header_length(4, 2) + 8);
}

#[test]
fn odd_dimensions_are_trimmed_before_compression() {
    let image = gray_image(Vec2(5, 3), 100);
    let bytes = compression::compress_to_vec(&image).unwrap();

    let header = format!("{}4 2\n", String::from_utf8(magic::BYTES.to_vec()).unwrap());
    assert!(bytes.starts_with(header.as_bytes()));
    assert_eq!(bytes.len(), header.len() + 2 * 4);

    let decompressed = compression::decompress(&mut bytes.as_slice()).unwrap();
    assert_eq!(decompressed.resolution(), Vec2(4, 2));
}

#[test]
fn gentle_gradients_survive_the_pipeline() {
    // neighboring lumas differ by little, so no stage clamps hard
    let image = Image {
        max_sample: 255,
        pixels: Grid::from_fn(Vec2(16, 8), |position| {
            let sample = 40 + position.x() as u16 * 8 + position.y() as u16 * 4;
            Rgb { red: sample, green: sample, blue: sample }
        }),
    };

    let bytes = compression::compress_to_vec(&image).unwrap();
    assert_eq!(bytes.len(), header_length(16, 8) + 8 * 4 * 4);

    // luma quantization, chroma snapping to the innermost table level,
    // and sample rounding each contribute a few steps at most
    let decompressed = compression::decompress(&mut bytes.as_slice()).unwrap();
    assert!(max_channel_difference(&decompressed, &image) <= 10);
}

#[test]
fn compressed_size_is_independent_of_the_contents() {
    let noise = Image {
        max_sample: 255,
        pixels: Grid::from_fn(Vec2(32, 20), |_| Rgb {
            red: u16::from(rand::random::<u8>()),
            green: u16::from(rand::random::<u8>()),
            blue: u16::from(rand::random::<u8>()),
        }),
    };

    let flat = gray_image(Vec2(32, 20), 77);

    let noise_bytes = compression::compress_to_vec(&noise).unwrap();
    let flat_bytes = compression::compress_to_vec(&flat).unwrap();

    let expected = header_length(32, 20) + (32 / 2) * (20 / 2) * 4;
    assert_eq!(noise_bytes.len(), expected);
    assert_eq!(flat_bytes.len(), expected);
}

#[test]
fn decompression_rejects_corrupted_streams() {
    let bytes = compression::compress_to_vec(&gray_image(Vec2(4, 4), 10)).unwrap();

    // truncated word stream
    let truncated = &bytes[.. bytes.len() - 3];
    assert!(compression::decompress(&mut &truncated[..]).is_err());

    // broken identification line
    let mut wrong_magic = bytes.clone();
    wrong_magic[0] = b'X';
    assert!(compression::decompress(&mut wrong_magic.as_slice()).is_err());

    // empty stream
    assert!(compression::decompress(&mut &b""[..]).is_err());
}

#[test]
fn compressing_a_decompressed_image_yields_the_same_resolution() {
    let image = gray_image(Vec2(6, 4), 200);

    let first = compression::compress_to_vec(&image).unwrap();
    let decompressed = compression::decompress(&mut first.as_slice()).unwrap();
    let second = compression::compress_to_vec(&decompressed).unwrap();

    assert_eq!(first.len(), second.len());
    assert_eq!(decompressed.resolution(), image.resolution());
}

#[test]
fn ppm_to_compressed_to_ppm() {
    // the full journey of the command line tool, in memory
    let image = gray_image(Vec2(4, 2), 128);

    let mut ppm_bytes = Vec::new();
    ppm::write(&mut ppm_bytes, &image).unwrap();

    let parsed = ppm::read(ppm_bytes.as_slice()).unwrap();
    let compressed = compression::compress_to_vec(&parsed).unwrap();
    let decompressed = compression::decompress(&mut compressed.as_slice()).unwrap();

    let mut out_bytes = Vec::new();
    ppm::write(&mut out_bytes, &decompressed).unwrap();

    let reread = ppm::read(out_bytes.as_slice()).unwrap();
    assert_eq!(reread, decompressed);
    assert!(max_channel_difference(&reread, &image) <= 6);
}
