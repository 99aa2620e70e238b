
//! Color space conversion between the raster's RGB samples
//! and the luma/chroma representation the codec operates on.
//!
//! Uses the ITU-R BT.601 coefficients for Y/Pb/Pr component video.
//! Values are clamped into their declared ranges after each conversion,
//! even where the linear formula alone could exceed them.

use crate::image::{Grid, Image, Rgb};


/// A pixel in component video space: luma `y` in `[0, 1]`,
/// chroma `pb` and `pr` in `[-0.5, 0.5]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YPbPr {

    /// The brightness of this pixel.
    pub y: f32,

    /// The blue difference chroma component.
    pub pb: f32,

    /// The red difference chroma component.
    pub pr: f32,
}


/// Convert a single pixel to component video space,
/// normalizing each sample by the image's maximum sample value.
#[inline]
pub fn pixel_to_ypbpr(pixel: Rgb, max_sample: u16) -> YPbPr {
    let max = f32::from(max_sample);
    let r = f32::from(pixel.red) / max;
    let g = f32::from(pixel.green) / max;
    let b = f32::from(pixel.blue) / max;

    YPbPr {
        y: (0.299 * r + 0.587 * g + 0.114 * b).max(0.0).min(1.0),
        pb: (-0.168_736 * r - 0.331_264 * g + 0.5 * b).max(-0.5).min(0.5),
        pr: (0.5 * r - 0.418_688 * g - 0.081_312 * b).max(-0.5).min(0.5),
    }
}

/// Convert a single pixel back to RGB samples scaled by the maximum sample
/// value, rounding to the nearest integer sample.
#[inline]
pub fn pixel_to_rgb(pixel: YPbPr, max_sample: u16) -> Rgb {
    let r = pixel.y + 1.402 * pixel.pr;
    let g = pixel.y - 0.344_136 * pixel.pb - 0.714_136 * pixel.pr;
    let b = pixel.y + 1.772 * pixel.pb;

    Rgb {
        red: scale_to_sample(r, max_sample),
        green: scale_to_sample(g, max_sample),
        blue: scale_to_sample(b, max_sample),
    }
}

#[inline]
fn scale_to_sample(channel: f32, max_sample: u16) -> u16 {
    (channel.max(0.0).min(1.0) * f32::from(max_sample)).round() as u16
}


/// Convert the whole image to component video space.
pub fn image_to_ypbpr(image: &Image) -> Grid<YPbPr> {
    let pixels = &image.pixels;
    let max_sample = image.max_sample;

    Grid::from_fn(pixels.resolution(), |position| {
        pixel_to_ypbpr(*pixels.get(position), max_sample)
    })
}

/// Convert a grid in component video space back to an RGB image
/// with the specified maximum sample value.
pub fn ypbpr_to_image(pixels: &Grid<YPbPr>, max_sample: u16) -> Image {
    Image {
        max_sample,
        pixels: Grid::from_fn(pixels.resolution(), |position| {
            pixel_to_rgb(*pixels.get(position), max_sample)
        }),
    }
}
