
//! Scalar quantization between the floating point cosine blocks
//! and the fixed width integer codes of the packed code word.
//!
//! The number of quantization levels derives from the bit widths declared
//! in the word layout, as `2^width - 1` steps, so the quantizer and the
//! word packer can never disagree about a field. Inputs are clamped into
//! the representable range first, so quantization of any finite value
//! succeeds and re-quantizing a dequantized value is idempotent.

mod table;

pub use table::{CHROMA_LEVELS, chroma_of_index, index_of_chroma};

use crate::compression::dct::CosineBlock;
use crate::compression::word::{A_WIDTH, B_WIDTH};
use crate::image::Grid;


// quantization steps per field, derived from the field widths
const A_LEVELS: f32 = ((1_u32 << A_WIDTH) - 1) as f32;
const BCD_LEVELS: f32 = ((1_u32 << (B_WIDTH - 1)) - 1) as f32;

/// Luma differences are clamped to this magnitude before quantization;
/// larger differences are rare and not worth the extra bits.
const BCD_MAX_MAGNITUDE: f32 = 0.3;


/// One 2×2 tile with all fields quantized
/// to the bit widths of the packed code word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuantizedBlock {

    /// The 9 bit unsigned code for the average brightness.
    pub a: u16,

    /// The 5 bit signed code for the top/bottom brightness difference.
    pub b: i8,

    /// The 5 bit signed code for the left/right brightness difference.
    pub c: i8,

    /// The 5 bit signed code for the diagonal brightness difference.
    pub d: i8,

    /// The 4 bit index of the averaged blue difference chroma.
    pub pb_index: u8,

    /// The 4 bit index of the averaged red difference chroma.
    pub pr_index: u8,
}


/// Quantize all fields of a single cosine block.
pub fn quantize_block(block: &CosineBlock) -> QuantizedBlock {
    QuantizedBlock {
        a: (block.a.max(0.0).min(1.0) * A_LEVELS).round() as u16,
        b: quantize_difference(block.b),
        c: quantize_difference(block.c),
        d: quantize_difference(block.d),
        pb_index: table::index_of_chroma(block.avg_pb),
        pr_index: table::index_of_chroma(block.avg_pr),
    }
}

/// Reconstruct the floating point cosine block a quantized block describes.
pub fn dequantize_block(block: &QuantizedBlock) -> CosineBlock {
    CosineBlock {
        a: f32::from(block.a) / A_LEVELS,
        b: dequantize_difference(block.b),
        c: dequantize_difference(block.c),
        d: dequantize_difference(block.d),
        avg_pb: table::chroma_of_index(block.pb_index),
        avg_pr: table::chroma_of_index(block.pr_index),
    }
}

#[inline]
fn quantize_difference(value: f32) -> i8 {
    let clamped = value.max(-BCD_MAX_MAGNITUDE).min(BCD_MAX_MAGNITUDE);
    (clamped * BCD_LEVELS / BCD_MAX_MAGNITUDE).round() as i8
}

#[inline]
fn dequantize_difference(code: i8) -> f32 {
    f32::from(code) * BCD_MAX_MAGNITUDE / BCD_LEVELS
}


/// Quantize a whole grid of cosine blocks.
pub fn quantize(blocks: &Grid<CosineBlock>) -> Grid<QuantizedBlock> {
    Grid::from_fn(blocks.resolution(), |position| quantize_block(blocks.get(position)))
}

/// Dequantize a whole grid of quantized blocks.
pub fn dequantize(blocks: &Grid<QuantizedBlock>) -> Grid<CosineBlock> {
    Grid::from_fn(blocks.resolution(), |position| dequantize_block(blocks.get(position)))
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn derived_level_counts() {
        assert_eq!(A_LEVELS, 511.0);
        assert_eq!(BCD_LEVELS, 15.0);
    }

    #[test]
    fn codes_stay_inside_their_field_widths() {
        let extreme = CosineBlock {
            a: 1.0, b: 10.0, c: -10.0, d: 0.31,
            avg_pb: 0.5, avg_pr: -0.5,
        };

        let quantized = quantize_block(&extreme);
        assert_eq!(quantized.a, 511);
        assert_eq!(quantized.b, 15);
        assert_eq!(quantized.c, -15);
        assert_eq!(quantized.d, 15);
        assert_eq!(quantized.pb_index, 15);
        assert_eq!(quantized.pr_index, 0);
    }

    #[test]
    fn requantizing_is_idempotent() {
        let samples = [
            CosineBlock { a: 0.5, b: 0.1, c: -0.1, d: 0.05, avg_pb: 0.0, avg_pr: 0.2 },
            CosineBlock { a: 0.123, b: -0.29, c: 0.3, d: -0.007, avg_pb: -0.4, avg_pr: 0.011 },
            CosineBlock { a: 1.0, b: 0.0, c: 0.0, d: 0.0, avg_pb: 0.0, avg_pr: 0.0 },
        ];

        for block in &samples {
            let quantized = quantize_block(block);
            let requantized = quantize_block(&dequantize_block(&quantized));
            assert_eq!(requantized, quantized);
        }
    }

    #[test]
    fn average_luma_code_is_precise() {
        // the nine bit code resolves the average brightness
        // to about one fifth of an eight bit sample step
        let block = CosineBlock { a: 0.5, b: 0.0, c: 0.0, d: 0.0, avg_pb: 0.0, avg_pr: 0.0 };
        let restored = dequantize_block(&quantize_block(&block));
        assert!((restored.a - 0.5).abs() <= 0.5 / 511.0);
    }
}
