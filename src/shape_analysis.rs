// src/shape_analysis.rs - Scalar geometry of a single contour

use std::f64::consts::PI;

/// Calculate the perimeter of a closed contour polyline
pub fn contour_perimeter(contour_points: &[(u32, u32)]) -> f64 {
    if contour_points.len() < 2 {
        return 0.0;
    }

    let mut perimeter = 0.0;
    let n = contour_points.len();

    for i in 0..n {
        let (x1, y1) = contour_points[i];
        let (x2, y2) = contour_points[(i + 1) % n]; // Wrap around to first point

        let dx = x2 as f64 - x1 as f64;
        let dy = y2 as f64 - y1 as f64;
        perimeter += (dx * dx + dy * dy).sqrt();
    }

    perimeter
}

/// Calculate the enclosed area of a closed contour via the shoelace
/// formula. The absolute value makes the result independent of contour
/// orientation; fewer than 3 points enclose nothing.
pub fn contour_area(contour_points: &[(u32, u32)]) -> f64 {
    if contour_points.len() < 3 {
        return 0.0;
    }

    let n = contour_points.len();
    let mut twice_area = 0.0;

    for i in 0..n {
        let (x1, y1) = contour_points[i];
        let (x2, y2) = contour_points[(i + 1) % n];

        twice_area += (x1 as f64) * (y2 as f64) - (x2 as f64) * (y1 as f64);
    }

    twice_area.abs() / 2.0
}

/// Calculate circularity of a shape (4π * Area / Perimeter²):
/// 1.0 for a perfect circle, approaching 0 as the shape elongates
pub fn circularity(area: f64, perimeter: f64) -> f64 {
    if perimeter <= 0.0 {
        return 0.0;
    }

    (4.0 * PI * area) / (perimeter * perimeter)
}

/// Calculate shape complexity (Perimeter² / (4π * Area)), the reciprocal
/// of circularity: >= 1 for closed shapes, growing with irregularity
pub fn shape_complexity(area: f64, perimeter: f64) -> f64 {
    (perimeter * perimeter) / (4.0 * PI * area)
}
