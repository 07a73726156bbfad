// src/preprocess.rs - Grayscale conversion, denoising and contrast equalization

use image::{GrayImage, RgbImage};
use image::imageops;
use imageproc::contrast::equalize_histogram;
use imageproc::filter::gaussian_blur_f32;

/// Smoothing kernel size; sigma is derived from it rather than set
/// independently
const BLUR_KERNEL_SIZE: u32 = 5;

/// Sigma for the kernel size, 0.3 * ((k - 1) / 2 - 1) + 0.8
const BLUR_SIGMA: f32 = 0.3 * ((BLUR_KERNEL_SIZE as f32 - 1.0) * 0.5 - 1.0) + 0.8;

/// Convert a scan to a single normalized intensity channel:
/// luminance grayscale, 5x5 Gaussian smoothing to suppress sensor noise,
/// then global histogram equalization to spread the intensity range.
pub fn normalize(image: &RgbImage) -> GrayImage {
    let gray = imageops::grayscale(image);
    let blurred = gaussian_blur_f32(&gray, BLUR_SIGMA);
    equalize_histogram(&blurred)
}
