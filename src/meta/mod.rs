
//! Describes the header of a compressed image stream.

use crate::error::{Error, Result, UnitResult};
use crate::io::{text, PeekRead, Read, Write};
use crate::math::Vec2;
use std::convert::TryFrom;


/// Number of pixels a header may declare before it is rejected as insane.
/// Keeps malformed headers from requesting giant allocations.
pub const MAX_PIXEL_COUNT: usize = 1024 * 1024 * 1024;


/// The identification line of every compressed image stream.
/// Kept byte-identical to the pre-existing implementations of this format,
/// so that compressed streams remain interchangeable between tools.
pub mod magic {
    use super::*;

    /// The exact bytes of the line that starts every compressed image stream.
    pub const BYTES: &[u8] = b"COMP40 Compressed image format 2\n";

    /// Without validity check, write this identification line to the byte stream.
    pub fn write(write: &mut impl Write) -> UnitResult {
        use crate::io::Data;
        u8::write_slice(write, BYTES)
    }

    /// Consume the identification line,
    /// returning an error if the stream contains anything else.
    pub fn validate(read: &mut impl Read) -> UnitResult {
        text::expect_bytes(read, BYTES, "compressed image identifier")
    }
}


/// The complete meta data of a compressed image:
/// the pixel resolution that the code words in the stream describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaData {

    /// Pixel dimensions of the compressed image, width and height. Always even,
    /// because each code word describes a full 2×2 pixel tile.
    pub resolution: Vec2<usize>,
}

impl MetaData {

    /// Meta data for the specified pixel resolution.
    pub fn new(resolution: Vec2<usize>) -> Self {
        MetaData { resolution }
    }

    /// Validate the invariants that all code in this crate relies on.
    pub fn validate(&self) -> UnitResult {
        if self.resolution.x() % 2 != 0 || self.resolution.y() % 2 != 0 {
            return Err(Error::invalid("image dimensions must be even"));
        }

        if self.resolution.area() > MAX_PIXEL_COUNT {
            return Err(Error::invalid("image resolution too large"));
        }

        Ok(())
    }

    /// Dimensions of the grid of 2×2 tiles, and therefore of the code words.
    pub fn block_resolution(&self) -> Vec2<usize> {
        self.resolution.map(|length| length / 2)
    }

    /// Number of code words that follow this header in the stream.
    pub fn word_count(&self) -> usize {
        self.block_resolution().area()
    }

    /// Validate the meta data and write the complete stream header.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.validate()?;

        magic::write(write)?;
        write!(write, "{} {}\n", self.resolution.x(), self.resolution.y())?;
        Ok(())
    }

    /// Parse the complete stream header, leaving the reader
    /// at the first byte of the first code word.
    pub fn read(read: &mut PeekRead<impl Read>) -> Result<Self> {
        magic::validate(read)?;

        let width = parse_dimension(read)?;

        if !read.skip_if_eq(b' ')? {
            return Err(Error::invalid("expected a space between the image dimensions"));
        }

        let height = parse_dimension(read)?;

        if !read.skip_if_eq(b'\n')? {
            return Err(Error::invalid("expected a line break after the image dimensions"));
        }

        let meta = MetaData::new(Vec2(width, height));
        meta.validate()?;
        Ok(meta)
    }
}

fn parse_dimension(read: &mut PeekRead<impl Read>) -> Result<usize> {
    let value = text::parse_uint(read)?;
    usize::try_from(value).map_err(|_| Error::invalid("image dimension too large"))
}
