// src/overlay.rs - Render detected contours on the mask for display

use image::{GrayImage, Rgb, RgbImage};

use crate::contour::find_external_contours;

/// Color used to paint detected region boundaries
const CONTOUR_COLOR: [u8; 3] = [0, 255, 0];

/// Promote a binary mask to RGB and paint every external contour green,
/// for reports and debug output
pub fn draw_contour_overlay(mask: &GrayImage) -> RgbImage {
    let (width, height) = mask.dimensions();

    let mut overlay = RgbImage::new(width, height);
    for (x, y, pixel) in mask.enumerate_pixels() {
        let v = pixel[0];
        overlay.put_pixel(x, y, Rgb([v, v, v]));
    }

    for contour in find_external_contours(mask) {
        for &(x, y) in &contour.points {
            overlay.put_pixel(x, y, Rgb(CONTOUR_COLOR));
        }
    }

    overlay
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn overlay_preserves_dimensions() {
        let mask = GrayImage::new(40, 30);
        let overlay = draw_contour_overlay(&mask);
        assert_eq!(overlay.dimensions(), (40, 30));
    }

    #[test]
    fn contour_pixels_are_painted_green() {
        let mut mask = GrayImage::new(32, 32);
        for y in 8..24 {
            for x in 8..24 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }

        let overlay = draw_contour_overlay(&mask);

        // Corner of the block is on the boundary
        assert_eq!(*overlay.get_pixel(8, 8), Rgb(CONTOUR_COLOR));
        // Interior stays white, background stays black
        assert_eq!(*overlay.get_pixel(16, 16), Rgb([255, 255, 255]));
        assert_eq!(*overlay.get_pixel(0, 0), Rgb([0, 0, 0]));
    }
}
