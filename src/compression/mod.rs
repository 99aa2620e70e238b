
//! The compression pipeline and its exact inverse.
//!
//! Compression chains color conversion, the 2×2 block transform,
//! quantization and word packing over the whole image, then emits the
//! header and the big-endian code word stream. Decompression runs the
//! same stages in opposite order. Every stage is one eager pass that
//! consumes the previous stage's grid and produces a fresh one.

pub mod bitpack;

mod csc;
mod dct;
mod quantize;
mod word;

use crate::error::{Result, UnitResult};
use crate::image::{Grid, Image};
use crate::io::{Data, PeekRead, Read, Write};
use crate::meta::MetaData;


/// A byte vector.
pub type ByteVec = Vec<u8>;

/// The maximum sample value of decompressed images.
/// The wire format does not record the denominator of the source image.
pub const DECOMPRESSED_MAX_SAMPLE: u16 = 255;

const BYTES_PER_WORD: usize = 4;

// do not allocate more than 2 MiB at once while reading the word stream
const SOFT_MAX_BYTES: usize = 2 * 1024 * 1024;


/// Compress an image, writing the header and the code word stream.
/// Images with an odd dimension are trimmed to the largest
/// even-dimensioned sub-rectangle anchored at the top left corner.
pub fn compress(image: &Image, write: &mut impl Write) -> UnitResult {
    let trimmed;
    let image =
        if image.has_even_resolution() { image }
        else { trimmed = image.cropped_to_even(); &trimmed };

    let meta = MetaData::new(image.resolution());

    let pixels = csc::image_to_ypbpr(image);
    let blocks = dct::forward(&pixels);
    let quantized = quantize::quantize(&blocks);
    let words = pack_all(&quantized)?;

    meta.write(write)?;
    write_words(&words, write)
}

/// Compress an image into a freshly allocated byte vector.
pub fn compress_to_vec(image: &Image) -> Result<ByteVec> {
    let mut bytes = Vec::new();
    compress(image, &mut bytes)?;
    Ok(bytes)
}

/// Decompress a complete stream back into an image.
/// Fails with `Error::Invalid` on malformed headers and truncated streams.
pub fn decompress(read: &mut impl Read) -> Result<Image> {
    let mut read = PeekRead::new(read);

    let meta = MetaData::read(&mut read)?;
    let words = read_words(&meta, &mut read)?;

    let quantized = unpack_all(&words);
    let blocks = quantize::dequantize(&quantized);
    let pixels = dct::inverse(&blocks);

    Ok(csc::ypbpr_to_image(&pixels, DECOMPRESSED_MAX_SAMPLE))
}


fn pack_all(blocks: &Grid<quantize::QuantizedBlock>) -> Result<Grid<u32>> {
    let mut words = Vec::with_capacity(blocks.elements().len());

    for block in blocks.elements() {
        words.push(word::pack(block)?);
    }

    Ok(Grid::new(blocks.resolution(), words))
}

fn unpack_all(words: &Grid<u32>) -> Grid<quantize::QuantizedBlock> {
    Grid::from_fn(words.resolution(), |position| word::unpack(*words.get(position)))
}

/// Emit all code words in row major order,
/// each split into four byte fields, most significant byte first.
fn write_words(words: &Grid<u32>, write: &mut impl Write) -> UnitResult {
    let mut bytes = Vec::with_capacity(words.elements().len() * BYTES_PER_WORD);

    for &word in words.elements() {
        let word = u64::from(word);

        for byte_index in (0 .. BYTES_PER_WORD).rev() {
            bytes.push(bitpack::get_unsigned(word, 8, byte_index as u32 * 8) as u8);
        }
    }

    u8::write_slice(write, &bytes)
}

/// Read exactly the word count the header declares,
/// reassembling each word from its four big-endian byte fields.
fn read_words(meta: &MetaData, read: &mut impl Read) -> Result<Grid<u32>> {
    let byte_count = meta.word_count() * BYTES_PER_WORD;
    let bytes = u8::read_vec(read, byte_count, SOFT_MAX_BYTES)?;

    let mut words = Vec::with_capacity(meta.word_count());

    for word_bytes in bytes.chunks(BYTES_PER_WORD) {
        let mut word = 0_u64;

        for (byte_index, &byte) in word_bytes.iter().enumerate() {
            let lsb = (BYTES_PER_WORD - 1 - byte_index) as u32 * 8;
            word = bitpack::new_unsigned(word, 8, lsb, u64::from(byte))?;
        }

        words.push(word as u32);
    }

    Ok(Grid::new(meta.block_resolution(), words))
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Vec2;

    #[test]
    fn words_are_big_endian_on_the_wire() {
        let words = Grid::new(Vec2(2, 1), vec![0x0102_0304, 0xf00d_beef]);

        let mut bytes = Vec::new();
        write_words(&words, &mut bytes).unwrap();
        assert_eq!(bytes, [0x01, 0x02, 0x03, 0x04, 0xf0, 0x0d, 0xbe, 0xef]);

        let meta = MetaData::new(Vec2(4, 2));
        let read_back = read_words(&meta, &mut bytes.as_slice()).unwrap();
        assert_eq!(read_back, words);
    }

    #[test]
    fn truncated_word_streams_are_invalid() {
        let meta = MetaData::new(Vec2(4, 2));
        let too_short = [0_u8; 7];

        assert!(read_words(&meta, &mut &too_short[..]).is_err());
    }
}
