//! Mapping response values back to displayable pixels.
//!
//! Every channel is scaled by 255, made absolute and rounded, then saturated
//! into `[0, 255]`. There is no failure path: overflow saturates at 255 and
//! `NaN` maps to 0.
#[cfg(feature = "rayon")]
use crate::grid::Grid;
use crate::grid::{Pixel, PixelGrid, Response, ResponseGrid};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// `round(|v| * 255)` saturated into `[0, 255]`.
#[inline]
pub fn channel_to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    // `abs` makes -inf saturate at 255 too
    (v.abs() * 255.0).round().min(255.0) as u8
}

#[inline]
pub fn response_to_pixel(resp: Response) -> Pixel {
    Pixel::new(
        channel_to_u8(resp.r),
        channel_to_u8(resp.g),
        channel_to_u8(resp.b),
    )
}

/// Render a response grid as pixels of the same dimensions.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(resp), fields(w = resp.width(), h = resp.height()))
)]
pub fn visualize_response(resp: &ResponseGrid) -> PixelGrid {
    #[cfg(feature = "rayon")]
    let vis = {
        let data: Vec<Pixel> = resp
            .as_slice()
            .par_iter()
            .map(|&r| response_to_pixel(r))
            .collect();
        Grid::from_parts(resp.width(), resp.height(), data)
    };

    #[cfg(not(feature = "rayon"))]
    let vis = resp.map(|&r| response_to_pixel(r));

    vis
}
