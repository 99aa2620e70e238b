
//! Lossy, fixed-ratio compression for PPM raster images.
//!
//! Every 2×2 pixel tile of the source image is converted to a luma/chroma
//! representation, decorrelated with a tiny cosine transform, quantized to
//! fixed bit widths, and packed into a single 32 bit code word. The emitted
//! stream therefore always has the same size for the same resolution,
//! independent of the pixel contents. Decompression runs the exact inverse
//! of each stage.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod io;
pub mod math;
pub mod meta;
pub mod image;
pub mod compression;
pub mod error;


pub mod prelude {

    //! Exports the main entry points of this crate.

    pub use crate::compression::{compress, compress_to_vec, decompress};
    pub use crate::image::{Grid, Image, Rgb, ppm};
    pub use crate::meta::MetaData;
    pub use crate::error::{Error, Result, UnitResult};
    pub use crate::math::Vec2;
}
