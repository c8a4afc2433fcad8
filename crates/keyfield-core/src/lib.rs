//! Core primitives for computing per-pixel responses and extracting keypoints.
//!
//! # Overview
//!
//! This crate exposes four building blocks:
//!
//! - [`grid`] – dense row-major [`Grid`] storage, with the [`PixelGrid`] and
//!   [`ResponseGrid`] aliases used by the rest of the pipeline.
//! - [`response`] – the [`ResponseTransform`] contract that turns a pixel grid
//!   into a same-shaped response grid, plus a couple of synthetic transforms.
//! - [`detect`] – thresholding of a response grid into normalized
//!   [`Keypoint`]s, and timed helpers that run the whole pipeline.
//! - [`visualize`] – mapping responses back to displayable pixels with
//!   saturating clamping.
//!
//! The response transform is deliberately a strategy: the pipeline only relies
//! on its output having the same dimensions as its input, which is checked by
//! [`response::compute_response`].
//!
//! # Features
//!
//! - `rayon` – processes independent columns/rows in parallel using the `rayon`
//!   crate. Results are identical to the sequential path, including keypoint
//!   order.
//! - `tracing` – instruments the pipeline stages with `tracing` spans.

pub mod detect;
pub mod error;
pub mod grid;
pub mod response;
pub mod visualize;

pub use crate::detect::{Keypoint, KEYPOINT_THRESHOLD};
pub use crate::error::GridError;
pub use crate::grid::{Grid, Pixel, PixelGrid, Response, ResponseGrid};
pub use crate::response::{NormalizedChannels, PerPixel, ResponseTransform};
