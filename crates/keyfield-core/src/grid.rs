//! Dense row-major grids of pixels and responses.

use crate::error::GridError;

/// 8-bit RGB sample. No alpha channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel { r: 0, g: 0, b: 0 };

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Per-pixel response triple.
///
/// Values are unbounded: sign, magnitude and finiteness are whatever the
/// producing transform decides. Consumers must not assume `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Response {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Response {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn channels(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Dense grid in row-major layout, indexed by `(x, y)`.
///
/// The shape is fixed at construction and every in-range cell holds a value.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    w: usize,
    h: usize,
    data: Vec<T>,
}

/// Grid of RGB pixels.
pub type PixelGrid = Grid<Pixel>;
/// Grid of response triples, same shape as the pixel grid it came from.
pub type ResponseGrid = Grid<Response>;

impl<T: Clone + Default> Grid<T> {
    /// Allocate a `width x height` grid filled with `T::default()`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            w: width,
            h: height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Wrap an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, GridError> {
        let expected = width * height;
        if data.len() != expected {
            return Err(GridError::BufferSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            w: width,
            h: height,
            data,
        })
    }

    /// Internal constructor for buffers whose length is known to match.
    #[cfg_attr(not(feature = "rayon"), allow(dead_code))]
    pub(crate) fn from_parts(width: usize, height: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            w: width,
            h: height,
            data,
        }
    }

    /// Build a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            w: width,
            h: height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.w && y < self.h
    }

    /// Row-major view of all cells.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Cell at `(x, y)`. Panics when out of range; use [`Grid::get`] for a
    /// checked lookup.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> &T {
        &self.data[y * self.w + x]
    }

    /// Checked lookup.
    pub fn get(&self, x: usize, y: usize) -> Result<T, GridError>
    where
        T: Copy,
    {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Checked store.
    pub fn set(&mut self, x: usize, y: usize, value: T) -> Result<(), GridError> {
        let i = self.index(x, y)?;
        self.data[i] = value;
        Ok(())
    }

    /// Apply `f` to every cell, keeping the shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            w: self.w,
            h: self.h,
            data: self.data.iter().map(f).collect(),
        }
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if !self.contains(x, y) {
            return Err(GridError::OutOfRange {
                x,
                y,
                width: self.w,
                height: self.h,
            });
        }
        Ok(y * self.w + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_black_and_keeps_its_shape() {
        let grid = PixelGrid::new(4, 3);
        assert_eq!(grid.dimensions(), (4, 3));
        assert_eq!(grid.len(), 12);
        assert!(grid.as_slice().iter().all(|&p| p == Pixel::BLACK));
    }

    #[test]
    fn get_and_set_are_bounds_checked() {
        let mut grid = PixelGrid::new(3, 2);
        grid.set(2, 1, Pixel::new(1, 2, 3)).unwrap();
        assert_eq!(grid.get(2, 1), Ok(Pixel::new(1, 2, 3)));
        assert_eq!(*grid.at(2, 1), Pixel::new(1, 2, 3));

        let err = GridError::OutOfRange {
            x: 3,
            y: 0,
            width: 3,
            height: 2,
        };
        assert_eq!(grid.get(3, 0), Err(err));
        assert_eq!(grid.set(3, 0, Pixel::BLACK), Err(err));
        assert!(matches!(
            grid.get(0, 2),
            Err(GridError::OutOfRange { y: 2, .. })
        ));
    }

    #[test]
    fn from_vec_validates_length() {
        let err = Grid::from_vec(2, 2, vec![0u8; 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::BufferSize {
                expected: 4,
                got: 3
            }
        );
        let grid = Grid::from_vec(2, 2, vec![1u8, 2, 3, 4]).unwrap();
        assert_eq!(*grid.at(1, 0), 2);
        assert_eq!(*grid.at(0, 1), 3);
    }

    #[test]
    fn from_fn_is_row_major() {
        let grid = Grid::from_fn(3, 2, |x, y| (x, y));
        assert_eq!(
            grid.as_slice(),
            &[(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]
        );
    }

    #[test]
    fn zero_sized_grids_are_empty() {
        let grid = ResponseGrid::new(0, 5);
        assert!(grid.is_empty());
        assert!(grid.get(0, 0).is_err());
    }
}
