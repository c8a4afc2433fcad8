//! Keypoint extraction on top of a dense response grid.
use crate::error::GridError;
use crate::grid::{PixelGrid, Response, ResponseGrid};
use crate::response::{compute_response, ResponseTransform};
use crate::visualize::visualize_response;
use std::time::Instant;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::{debug, instrument};

/// Red-channel response a location must exceed to become a keypoint.
pub const KEYPOINT_THRESHOLD: f32 = 0.15;

/// A detected location, normalized by the grid dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    /// `x / width`.
    pub x: f32,
    /// `y / height`.
    pub y: f32,
}

/// Timed pipeline outcome: keypoints, the visualization and per-stage timings.
pub struct PipelineResult {
    /// Keypoints in x-major, y-minor scan order.
    pub keypoints: Vec<Keypoint>,
    /// Response rendered as pixels, same dimensions as the input.
    pub visualization: PixelGrid,
    /// Time spent in the response transform (milliseconds).
    pub resp_ms: f64,
    /// Time spent extracting keypoints (milliseconds).
    pub detect_ms: f64,
    /// Time spent rendering the visualization (milliseconds).
    pub visualize_ms: f64,
}

/// Only the red channel is tested, with a strict comparison. `NaN` never
/// qualifies.
#[inline]
pub fn is_keypoint(resp: Response) -> bool {
    resp.r > KEYPOINT_THRESHOLD
}

/// Threshold every location of `resp` into normalized keypoints.
///
/// Locations are visited with `x` in the outer loop and `y` in the inner
/// loop, and keypoints are emitted in that order. Every qualifying location
/// yields exactly one keypoint.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(resp), fields(w = resp.width(), h = resp.height()))
)]
pub fn extract_keypoints(resp: &ResponseGrid) -> Vec<Keypoint> {
    let (w, h) = resp.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }

    #[cfg(feature = "rayon")]
    let keypoints: Vec<Keypoint> = (0..w)
        .into_par_iter()
        .flat_map_iter(|x| column_keypoints(resp, x))
        .collect();

    #[cfg(not(feature = "rayon"))]
    let keypoints: Vec<Keypoint> = (0..w).flat_map(|x| column_keypoints(resp, x)).collect();

    #[cfg(feature = "tracing")]
    debug!(count = keypoints.len(), "extracted keypoints");

    keypoints
}

fn column_keypoints(resp: &ResponseGrid, x: usize) -> impl Iterator<Item = Keypoint> + '_ {
    let w = resp.width() as f32;
    let h = resp.height() as f32;
    (0..resp.height())
        .filter(move |&y| is_keypoint(*resp.at(x, y)))
        .map(move |y| Keypoint {
            x: x as f32 / w,
            y: y as f32 / h,
        })
}

/// Run `transform` on `grid` and extract keypoints from its response.
pub fn find_keypoints<T>(grid: &PixelGrid, transform: &T) -> Result<Vec<Keypoint>, GridError>
where
    T: ResponseTransform + ?Sized,
{
    let resp = compute_response(grid, transform)?;
    Ok(extract_keypoints(&resp))
}

/// Full pipeline with per-stage timings.
///
/// This combines:
/// - the response transform (with its dimension check)
/// - keypoint extraction
/// - response visualization
pub fn run_pipeline<T>(grid: &PixelGrid, transform: &T) -> Result<PipelineResult, GridError>
where
    T: ResponseTransform + ?Sized,
{
    let resp_started = Instant::now();
    let resp = compute_response(grid, transform)?;
    let resp_ms = resp_started.elapsed().as_secs_f64() * 1000.0;

    let detect_started = Instant::now();
    let keypoints = extract_keypoints(&resp);
    let detect_ms = detect_started.elapsed().as_secs_f64() * 1000.0;

    let visualize_started = Instant::now();
    let visualization = visualize_response(&resp);
    let visualize_ms = visualize_started.elapsed().as_secs_f64() * 1000.0;

    Ok(PipelineResult {
        keypoints,
        visualization,
        resp_ms,
        detect_ms,
        visualize_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Pixel;
    use crate::response::NormalizedChannels;

    fn with_hits(w: usize, h: usize, hits: &[(usize, usize)]) -> ResponseGrid {
        let mut resp = ResponseGrid::new(w, h);
        for &(x, y) in hits {
            resp.set(x, y, Response::new(0.9, 0.0, 0.0)).unwrap();
        }
        resp
    }

    fn assert_close(actual: &[Keypoint], expected: &[(f32, f32)]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?}");
        for (k, &(x, y)) in actual.iter().zip(expected) {
            assert!((k.x - x).abs() < 1e-3 && (k.y - y).abs() < 1e-3, "{k:?} vs ({x}, {y})");
        }
    }

    #[test]
    fn three_by_three_example() {
        let resp = with_hits(3, 3, &[(0, 0), (2, 1)]);
        let kps = extract_keypoints(&resp);
        assert_close(&kps, &[(0.0, 0.0), (0.667, 0.333)]);
    }

    #[test]
    fn scan_is_x_major() {
        // (1, 0) comes after (0, 2) because x is the outer loop.
        let resp = with_hits(2, 3, &[(1, 0), (0, 2), (0, 1)]);
        let kps = extract_keypoints(&resp);
        assert_close(&kps, &[(0.0, 1.0 / 3.0), (0.0, 2.0 / 3.0), (0.5, 0.0)]);
    }

    #[test]
    fn threshold_is_strict_and_red_only() {
        let mut resp = ResponseGrid::new(4, 1);
        resp.set(0, 0, Response::new(KEYPOINT_THRESHOLD, 0.0, 0.0)).unwrap();
        resp.set(1, 0, Response::new(0.1, 5.0, 5.0)).unwrap();
        resp.set(2, 0, Response::new(f32::NAN, 0.0, 0.0)).unwrap();
        resp.set(3, 0, Response::new(f32::INFINITY, 0.0, 0.0)).unwrap();
        let kps = extract_keypoints(&resp);
        assert_eq!(kps, vec![Keypoint { x: 0.75, y: 0.0 }]);
    }

    #[test]
    fn zero_response_has_no_keypoints() {
        assert!(extract_keypoints(&ResponseGrid::new(6, 6)).is_empty());
        assert!(extract_keypoints(&ResponseGrid::new(0, 0)).is_empty());
    }

    #[test]
    fn pipeline_reports_keypoints_and_visualization() {
        let grid = PixelGrid::from_fn(4, 2, |x, _| {
            if x == 3 {
                Pixel::new(200, 10, 10)
            } else {
                Pixel::new(20, 200, 200)
            }
        });
        let res = run_pipeline(&grid, &NormalizedChannels).unwrap();
        assert_eq!(
            res.keypoints,
            vec![Keypoint { x: 0.75, y: 0.0 }, Keypoint { x: 0.75, y: 0.5 }]
        );
        assert_eq!(res.visualization, grid);
        assert!(res.resp_ms >= 0.0 && res.detect_ms >= 0.0 && res.visualize_ms >= 0.0);
    }

    #[test]
    fn pipeline_surfaces_dimension_mismatch() {
        let grid = PixelGrid::new(3, 3);
        let cropped = |g: &PixelGrid| ResponseGrid::new(g.width() - 1, g.height());
        assert!(matches!(
            run_pipeline(&grid, &cropped),
            Err(GridError::DimensionMismatch { .. })
        ));
        assert!(find_keypoints(&grid, &cropped).is_err());
    }
}
