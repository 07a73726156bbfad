// src/segmentation.rs - Otsu binarization and morphological cleanup

use image::GrayImage;
use imageproc::contrast::{otsu_level, threshold};
use imageproc::distance_transform::Norm;
use imageproc::morphology::open;

/// Radius of the square structuring element (LInf radius 2 = 5x5 kernel)
const OPENING_KERNEL_RADIUS: u8 = 2;

/// Binarize a normalized scan with an automatic Otsu threshold, then apply
/// a morphological opening to remove small noise blobs and thin spurious
/// connections. Output values are strictly 0 or 255.
pub fn segment(image: &GrayImage) -> GrayImage {
    let level = otsu_level(image);
    let binary = threshold(image, level);
    open(&binary, Norm::LInf, OPENING_KERNEL_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn output_is_strictly_binary() {
        let mut image = GrayImage::new(48, 48);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = Luma([((x * 5 + y * 3) % 256) as u8]);
        }

        let mask = segment(&image);
        assert_eq!(mask.dimensions(), image.dimensions());
        for pixel in mask.pixels() {
            assert!(pixel[0] == 0 || pixel[0] == 255, "non-binary value {}", pixel[0]);
        }
    }

    #[test]
    fn bright_block_survives_opening() {
        // 20x20 bright block on a dark background: well above any
        // structuring element size
        let mut image = GrayImage::from_pixel(64, 64, Luma([20]));
        for y in 20..40 {
            for x in 20..40 {
                image.put_pixel(x, y, Luma([230]));
            }
        }

        let mask = segment(&image);
        assert_eq!(mask.get_pixel(30, 30)[0], 255);
        assert_eq!(mask.get_pixel(5, 5)[0], 0);
    }

    #[test]
    fn isolated_speckles_are_removed() {
        let mut image = GrayImage::from_pixel(64, 64, Luma([20]));
        // Large foreground block plus isolated single-pixel speckles
        for y in 10..40 {
            for x in 10..40 {
                image.put_pixel(x, y, Luma([230]));
            }
        }
        image.put_pixel(55, 55, Luma([230]));
        image.put_pixel(50, 60, Luma([230]));

        let mask = segment(&image);
        assert_eq!(mask.get_pixel(55, 55)[0], 0);
        assert_eq!(mask.get_pixel(50, 60)[0], 0);
        assert_eq!(mask.get_pixel(20, 20)[0], 255);
    }
}
