//! `image` crate interop for the keypoint pipeline.
//!
//! Decoding and encoding stay with the `image` crate; these helpers only move
//! RGB samples between its buffers and [`PixelGrid`]s.

use image::{DynamicImage, Rgb, RgbImage};
use keyfield_core::detect::{find_keypoints, Keypoint};
use keyfield_core::response::{compute_response, ResponseTransform};
use keyfield_core::visualize::visualize_response;
use keyfield_core::{GridError, Pixel, PixelGrid, ResponseGrid};

/// Copy an `RgbImage` into a pixel grid.
pub fn pixel_grid_from_image(img: &RgbImage) -> PixelGrid {
    PixelGrid::from_fn(img.width() as usize, img.height() as usize, |x, y| {
        let Rgb([r, g, b]) = *img.get_pixel(x as u32, y as u32);
        Pixel::new(r, g, b)
    })
}

/// Convert any decoded image to RGB8 (alpha is dropped) and copy it.
pub fn pixel_grid_from_dynamic(img: &DynamicImage) -> PixelGrid {
    pixel_grid_from_image(&img.to_rgb8())
}

/// Copy a pixel grid into an `RgbImage` ready for encoding.
pub fn image_from_pixel_grid(grid: &PixelGrid) -> RgbImage {
    RgbImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
        Rgb(grid.at(x as usize, y as usize).channels())
    })
}

/// Compute the response grid for an `RgbImage`.
#[inline]
pub fn response_image<T>(img: &RgbImage, transform: &T) -> Result<ResponseGrid, GridError>
where
    T: ResponseTransform + ?Sized,
{
    compute_response(&pixel_grid_from_image(img), transform)
}

/// Detect normalized keypoints on an `RgbImage`.
#[inline]
pub fn find_keypoints_image<T>(img: &RgbImage, transform: &T) -> Result<Vec<Keypoint>, GridError>
where
    T: ResponseTransform + ?Sized,
{
    find_keypoints(&pixel_grid_from_image(img), transform)
}

/// Render a response grid as an `RgbImage`.
#[inline]
pub fn visualize_response_image(resp: &ResponseGrid) -> RgbImage {
    image_from_pixel_grid(&visualize_response(resp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use keyfield_core::NormalizedChannels;

    #[test]
    fn grid_and_image_agree_on_coordinates() {
        let img = RgbImage::from_fn(5, 3, |x, y| Rgb([x as u8, y as u8, 7]));
        let grid = pixel_grid_from_image(&img);
        assert_eq!(grid.dimensions(), (5, 3));
        assert_eq!(grid.get(4, 2), Ok(Pixel::new(4, 2, 7)));
        assert_eq!(image_from_pixel_grid(&grid), img);
    }

    #[test]
    fn alpha_is_dropped() {
        let rgba = RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 0]));
        let grid = pixel_grid_from_dynamic(&DynamicImage::ImageRgba8(rgba));
        assert!(grid.as_slice().iter().all(|&p| p == Pixel::new(10, 20, 30)));
    }

    #[test]
    fn visualization_of_normalized_response_is_the_input() {
        let img = RgbImage::from_fn(6, 4, |x, y| Rgb([(x * 40) as u8, (y * 60) as u8, 255]));
        let resp = response_image(&img, &NormalizedChannels).unwrap();
        assert_eq!(visualize_response_image(&resp), img);
    }
}
