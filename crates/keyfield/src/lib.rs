//! Keypoint extraction and response visualization for `image::RgbImage` inputs.
//!
//! - [`image`] – conversions between `image` buffers and pixel grids, plus
//!   single-call helpers on `RgbImage`.
//! - [`app`] – configuration, file output and the run loop shared by the CLI
//!   and the examples.

pub mod app;
pub mod image;

// Re-export the core types most callers need. Lower-level pieces stay
// reachable through `keyfield_core` directly.
pub use keyfield_core::detect::{run_pipeline, PipelineResult};
pub use keyfield_core::*;

pub use crate::image::{
    find_keypoints_image, image_from_pixel_grid, pixel_grid_from_dynamic, pixel_grid_from_image,
    response_image, visualize_response_image,
};
