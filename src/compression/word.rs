
//! The 32 bit code word that stores one quantized 2×2 tile.
//!
//! All six fields are packed contiguously, most significant field first,
//! with no padding. The field widths declared here are the single source
//! of truth: the quantizer derives its level counts from them.

use crate::compression::bitpack;
use crate::compression::quantize::QuantizedBlock;
use crate::error::Result;


/// Bit width of the unsigned average brightness code.
pub const A_WIDTH: u32 = 9;

/// Bit width of the first signed brightness difference code.
pub const B_WIDTH: u32 = 5;

/// Bit width of the second signed brightness difference code.
pub const C_WIDTH: u32 = 5;

/// Bit width of the third signed brightness difference code.
pub const D_WIDTH: u32 = 5;

/// Bit width of the unsigned blue difference chroma index.
pub const PB_WIDTH: u32 = 4;

/// Bit width of the unsigned red difference chroma index.
pub const PR_WIDTH: u32 = 4;

/// Number of bits in one code word.
pub const WORD_SIZE: u32 = 32;

// least significant bit of each field,
// computed from the cumulative widths downwards from bit 31
const A_LSB: u32 = WORD_SIZE - A_WIDTH;
const B_LSB: u32 = A_LSB - B_WIDTH;
const C_LSB: u32 = B_LSB - C_WIDTH;
const D_LSB: u32 = C_LSB - D_WIDTH;
const PB_LSB: u32 = D_LSB - PB_WIDTH;
const PR_LSB: u32 = PB_LSB - PR_WIDTH;


/// Serialize a quantized block into a single code word.
/// Fails with `Error::Overflow` if any field does not fit its declared
/// width, which cannot happen for blocks produced by the quantizer.
pub fn pack(block: &QuantizedBlock) -> Result<u32> {
    let mut word = 0_u64;

    word = bitpack::new_unsigned(word, A_WIDTH, A_LSB, u64::from(block.a))?;
    word = bitpack::new_signed(word, B_WIDTH, B_LSB, i64::from(block.b))?;
    word = bitpack::new_signed(word, C_WIDTH, C_LSB, i64::from(block.c))?;
    word = bitpack::new_signed(word, D_WIDTH, D_LSB, i64::from(block.d))?;
    word = bitpack::new_unsigned(word, PB_WIDTH, PB_LSB, u64::from(block.pb_index))?;
    word = bitpack::new_unsigned(word, PR_WIDTH, PR_LSB, u64::from(block.pr_index))?;

    Ok(word as u32)
}

/// Deserialize a code word back into a quantized block.
/// Total for all possible words, as every bit pattern describes some block.
pub fn unpack(word: u32) -> QuantizedBlock {
    let word = u64::from(word);

    QuantizedBlock {
        a: bitpack::get_unsigned(word, A_WIDTH, A_LSB) as u16,
        b: bitpack::get_signed(word, B_WIDTH, B_LSB) as i8,
        c: bitpack::get_signed(word, C_WIDTH, C_LSB) as i8,
        d: bitpack::get_signed(word, D_WIDTH, D_LSB) as i8,
        pb_index: bitpack::get_unsigned(word, PB_WIDTH, PB_LSB) as u8,
        pr_index: bitpack::get_unsigned(word, PR_WIDTH, PR_LSB) as u8,
    }
}
