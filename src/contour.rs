// src/contour.rs - External boundary detection on binary masks

use std::collections::{HashMap, HashSet};

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};

/// Ordered outer boundary polyline of one connected foreground region.
/// Holes inside a region are never recorded.
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<(u32, u32)>,
}

/// Moore neighborhood in clockwise order
static MOORE_NEIGHBORHOOD: [(i32, i32); 8] = [
    (1, 0),   // right
    (1, 1),   // down-right
    (0, 1),   // down
    (-1, 1),  // down-left
    (-1, 0),  // left
    (-1, -1), // up-left
    (0, -1),  // up
    (1, -1),  // up-right
];

/// Find the external contour of every connected foreground region in a
/// binary mask. Regions are labelled with 8-connectivity; each region's
/// outer boundary is then traced from its topmost-leftmost pixel.
/// A single-pixel region yields a one-point contour.
pub fn find_external_contours(mask: &GrayImage) -> Vec<Contour> {
    let labeled = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    // First pixel of each label in row-major order: topmost row, then
    // leftmost column, which guarantees background above the start point
    let mut starts: HashMap<u32, (u32, u32)> = HashMap::new();
    let mut label_order: Vec<u32> = Vec::new();

    for (x, y, label) in labeled.enumerate_pixels() {
        let label_val = label[0];
        if label_val == 0 {
            continue; // Skip background
        }
        if !starts.contains_key(&label_val) {
            starts.insert(label_val, (x, y));
            label_order.push(label_val);
        }
    }

    label_order
        .into_iter()
        .map(|label| {
            let start = starts[&label];
            Contour {
                points: trace_region_boundary(&labeled, label, start),
            }
        })
        .collect()
}

/// A region pixel is on the boundary when any of its 4 direct neighbors
/// is background (a different label) or outside the image. For an
/// 8-connected region this boundary set forms a single-pixel-wide,
/// 8-connected closed curve.
fn is_border_pixel(labeled: &ImageBuffer<Luma<u32>, Vec<u32>>, label: u32, x: u32, y: u32) -> bool {
    let (width, height) = labeled.dimensions();

    for &(dx, dy) in &[(1, 0), (0, 1), (-1, 0), (0, -1)] {
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;

        if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
            return true;
        }
        if labeled.get_pixel(nx as u32, ny as u32)[0] != label {
            return true;
        }
    }

    false
}

/// Trace the outer boundary of one labelled region using Moore-Neighbor
/// tracing with a visited set, so no pixel is recorded twice. Only border
/// pixels are eligible, which keeps the walk from drifting into the
/// region's interior.
fn trace_region_boundary(
    labeled: &ImageBuffer<Luma<u32>, Vec<u32>>,
    label: u32,
    start: (u32, u32),
) -> Vec<(u32, u32)> {
    let (width, height) = labeled.dimensions();
    let (start_x, start_y) = start;

    let mut contour = vec![(start_x, start_y)];
    let mut visited: HashSet<(u32, u32)> = HashSet::new();
    visited.insert((start_x, start_y));

    let mut current = (start_x, start_y);
    let mut backtrack_idx = 0; // Start looking from the first Moore neighbor

    // Safety limit: the boundary can't exceed the pixel count
    let max_contour_size = (width as usize) * (height as usize);

    loop {
        let mut found_next = false;

        // Search the Moore neighborhood, starting from the backtrack direction
        for i in 0..8 {
            let idx = (backtrack_idx + i) % 8;
            let (dx, dy) = MOORE_NEIGHBORHOOD[idx];
            let nx = current.0 as i32 + dx;
            let ny = current.1 as i32 + dy;

            if nx >= 0 && ny >= 0 && nx < width as i32 && ny < height as i32 {
                let next = (nx as u32, ny as u32);

                if labeled.get_pixel(next.0, next.1)[0] == label
                    && !visited.contains(&next)
                    && is_border_pixel(labeled, label, next.0, next.1)
                {
                    contour.push(next);
                    visited.insert(next);

                    current = next;
                    backtrack_idx = (idx + 4) % 8; // Backtrack direction

                    found_next = true;
                    break;
                }
            }
        }

        if contour.len() > max_contour_size {
            break;
        }

        // No unvisited boundary neighbor left: the trace is closed
        if !found_next {
            break;
        }
    }

    contour
}
