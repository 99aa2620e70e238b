
//! The discrete cosine transform over 2×2 pixel tiles, and its exact inverse.
//!
//! Each tile of four luma values is decorrelated into an average `a` and
//! three difference coefficients `b`, `c`, `d`. Chroma is averaged over the
//! tile, which is where this codec discards per-pixel chroma detail.

use crate::compression::csc::YPbPr;
use crate::image::Grid;
use crate::math::Vec2;


/// The transform of one 2×2 pixel tile.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CosineBlock {

    /// The average brightness of the tile.
    pub a: f32,

    /// The top/bottom brightness difference.
    pub b: f32,

    /// The left/right brightness difference.
    pub c: f32,

    /// The diagonal brightness difference.
    pub d: f32,

    /// The blue difference chroma, averaged over the tile.
    pub avg_pb: f32,

    /// The red difference chroma, averaged over the tile.
    pub avg_pr: f32,
}


/// Transform every 2×2 tile of the pixel grid into one cosine block.
/// Panics if either dimension is odd, as the caller trims the image beforehand.
pub fn forward(pixels: &Grid<YPbPr>) -> Grid<CosineBlock> {
    let resolution = pixels.resolution();

    assert!(
        resolution.x() % 2 == 0 && resolution.y() % 2 == 0,
        "the block transform requires even image dimensions"
    );

    Grid::from_fn(resolution.map(|length| length / 2), |block_position| {
        let Vec2(x, y) = block_position.map(|position| position * 2);

        // tile pixels in raster order
        block_of_tile([
            *pixels.get(Vec2(x, y)),
            *pixels.get(Vec2(x + 1, y)),
            *pixels.get(Vec2(x, y + 1)),
            *pixels.get(Vec2(x + 1, y + 1)),
        ])
    })
}

/// Reconstruct the pixel grid from the cosine blocks. All four pixels of a
/// tile receive the block's averaged chroma.
pub fn inverse(blocks: &Grid<CosineBlock>) -> Grid<YPbPr> {
    Grid::from_fn(blocks.resolution().map(|length| length * 2), |position| {
        let block = blocks.get(position.map(|position| position / 2));

        let y = match (position.x() % 2, position.y() % 2) {
            (0, 0) => block.a - block.b - block.c + block.d,
            (1, 0) => block.a - block.b + block.c - block.d,
            (0, 1) => block.a + block.b - block.c - block.d,
            _ =>      block.a + block.b + block.c + block.d,
        };

        YPbPr { y, pb: block.avg_pb, pr: block.avg_pr }
    })
}

fn block_of_tile(tile: [YPbPr; 4]) -> CosineBlock {
    let (y1, y2, y3, y4) = (tile[0].y, tile[1].y, tile[2].y, tile[3].y);

    CosineBlock {
        a: (y4 + y3 + y2 + y1) / 4.0,
        b: (y4 + y3 - y2 - y1) / 4.0,
        c: (y4 - y3 + y2 - y1) / 4.0,
        d: (y4 - y3 - y2 + y1) / 4.0,
        avg_pb: (tile[0].pb + tile[1].pb + tile[2].pb + tile[3].pb) / 4.0,
        avg_pr: (tile[0].pr + tile[1].pr + tile[2].pr + tile[3].pr) / 4.0,
    }
}
