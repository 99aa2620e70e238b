
//! The uncompressed raster image and the two-dimensional storage it lives in.

pub mod ppm;

use crate::math::Vec2;

#[cfg(feature = "rayon")]
use rayon::prelude::*;


/// One pixel of an uncompressed raster image.
/// Each component ranges from zero to the image's `max_sample`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {

    /// The red component of this pixel.
    pub red: u16,

    /// The green component of this pixel.
    pub green: u16,

    /// The blue component of this pixel.
    pub blue: u16,
}


/// A rectangular array of elements, stored flat in row major order
/// (the column index varies fastest).
///
/// Each pipeline stage reads one of these and produces a freshly
/// allocated one, so no stage ever mutates shared state.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    resolution: Vec2<usize>,
    elements: Vec<T>,
}

impl<T> Grid<T> {

    /// A grid over the specified elements, which must be in row major order.
    /// Panics if the element count does not match the resolution.
    pub fn new(resolution: Vec2<usize>, elements: Vec<T>) -> Self {
        assert_eq!(
            resolution.area(), elements.len(),
            "grid element count does not match its resolution"
        );

        Grid { resolution, elements }
    }

    /// A grid where each element is computed from its own position.
    ///
    /// All elements are independent of each other, so they may be
    /// computed in parallel (enabled with the `rayon` feature).
    /// The traversal order is not observable from the outside.
    pub fn from_fn<F>(resolution: Vec2<usize>, generate: F) -> Self
        where T: Send, F: Fn(Vec2<usize>) -> T + Send + Sync
    {
        let width = resolution.x();
        let area = resolution.area();

        #[cfg(feature = "rayon")]
        let elements = (0 .. area).into_par_iter()
            .map(|index| generate(Vec2(index % width, index / width)))
            .collect();

        #[cfg(not(feature = "rayon"))]
        let elements = (0 .. area)
            .map(|index| generate(Vec2(index % width, index / width)))
            .collect();

        Grid { resolution, elements }
    }

    /// Width and height of this grid.
    pub fn resolution(&self) -> Vec2<usize> {
        self.resolution
    }

    /// The element at the specified position.
    /// Panics for positions outside the grid, which are a programming error.
    pub fn get(&self, position: Vec2<usize>) -> &T {
        assert!(
            position.x() < self.resolution.x() && position.y() < self.resolution.y(),
            "grid position out of bounds"
        );

        &self.elements[position.y() * self.resolution.x() + position.x()]
    }

    /// All elements in row major order.
    pub fn elements(&self) -> &[T] {
        &self.elements
    }
}


/// An uncompressed raster image, as read from and written to the PPM container.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {

    /// The pixel contents of this image.
    pub pixels: Grid<Rgb>,

    /// The maximum value of each color sample, commonly 255.
    /// Also called the denominator of the image.
    pub max_sample: u16,
}

impl Image {

    /// Width and height of this image in pixels.
    pub fn resolution(&self) -> Vec2<usize> {
        self.pixels.resolution()
    }

    /// Whether both dimensions are divisible by two.
    pub fn has_even_resolution(&self) -> bool {
        self.resolution().x() % 2 == 0 && self.resolution().y() % 2 == 0
    }

    /// The largest image with even dimensions that fits into this image,
    /// anchored at the top left corner. Discards at most one row and one column.
    pub fn cropped_to_even(&self) -> Image {
        let resolution = self.resolution().map(|length| length - length % 2);

        Image {
            pixels: Grid::from_fn(resolution, |position| *self.pixels.get(position)),
            max_sample: self.max_sample,
        }
    }
}
