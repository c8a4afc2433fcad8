//! Response transform contract and the dimension postcondition check.
use crate::error::GridError;
#[cfg(feature = "rayon")]
use crate::grid::Grid;
use crate::grid::{Pixel, PixelGrid, Response, ResponseGrid};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Strategy that turns a pixel grid into a per-pixel response grid.
///
/// Implementations must return a grid with exactly the input's dimensions.
/// Nothing is assumed about the range of the produced values.
pub trait ResponseTransform {
    fn response(&self, grid: &PixelGrid) -> ResponseGrid;
}

impl<F> ResponseTransform for F
where
    F: Fn(&PixelGrid) -> ResponseGrid,
{
    fn response(&self, grid: &PixelGrid) -> ResponseGrid {
        self(grid)
    }
}

/// Lifts a per-pixel function into a [`ResponseTransform`].
///
/// Every location is evaluated independently, so the `rayon` feature can
/// spread the work over threads without changing the result.
#[derive(Clone, Copy, Debug)]
pub struct PerPixel<F>(pub F);

#[cfg(not(feature = "rayon"))]
impl<F> ResponseTransform for PerPixel<F>
where
    F: Fn(Pixel) -> Response,
{
    fn response(&self, grid: &PixelGrid) -> ResponseGrid {
        grid.map(|&p| (self.0)(p))
    }
}

#[cfg(feature = "rayon")]
impl<F> ResponseTransform for PerPixel<F>
where
    F: Fn(Pixel) -> Response + Sync,
{
    fn response(&self, grid: &PixelGrid) -> ResponseGrid {
        let data: Vec<Response> = grid.as_slice().par_iter().map(|&p| (self.0)(p)).collect();
        Grid::from_parts(grid.width(), grid.height(), data)
    }
}

/// Synthetic transform that copies each channel as `value / 255`.
///
/// This is not a feature detector. It gives a runnable pipeline whose
/// visualization reproduces the input and whose keypoints are the pixels with
/// a red channel above `0.15 * 255`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NormalizedChannels;

impl NormalizedChannels {
    #[inline]
    pub fn response_at(p: Pixel) -> Response {
        Response::new(
            f32::from(p.r) / 255.0,
            f32::from(p.g) / 255.0,
            f32::from(p.b) / 255.0,
        )
    }
}

impl ResponseTransform for NormalizedChannels {
    fn response(&self, grid: &PixelGrid) -> ResponseGrid {
        PerPixel(Self::response_at).response(grid)
    }
}

/// Run `transform` on `grid` and enforce its shape postcondition.
///
/// A transform that returns a differently sized grid is a contract failure and
/// is reported as [`GridError::DimensionMismatch`]; the output is never
/// cropped or padded to fit.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(grid, transform), fields(w = grid.width(), h = grid.height()))
)]
pub fn compute_response<T>(grid: &PixelGrid, transform: &T) -> Result<ResponseGrid, GridError>
where
    T: ResponseTransform + ?Sized,
{
    let resp = transform.response(grid);
    if resp.dimensions() != grid.dimensions() {
        return Err(GridError::DimensionMismatch {
            expected: grid.dimensions(),
            got: resp.dimensions(),
        });
    }
    Ok(resp)
}
