//! Per-shape sparkle renderers
//!
//! Each renderer assumes the caller has already applied the particle's
//! global alpha inside a save/restore scope.

use std::f64::consts::{PI, TAU};

use glam::DVec2;

use crate::canvas::SparkleCanvas;

/// Fill color of circle sparkles
pub const CIRCLE_FILL: &str = "white";

/// Fill color of star sparkles
pub const STAR_FILL: &str = "yellow";

/// Number of points on a star sparkle
pub const STAR_SPIKES: usize = 5;

/// Highlight offset and radius as a fraction of the bubble radius
const BUBBLE_HIGHLIGHT_SCALE: f64 = 0.3;

/// CSS `rgba()` color string
pub fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> String {
    format!("rgba({r}, {g}, {b}, {alpha})")
}

/// Filled disc
pub fn draw_circle<C: SparkleCanvas + ?Sized>(canvas: &mut C, center: DVec2, radius: f64) {
    canvas.set_fill_style(CIRCLE_FILL);
    canvas.begin_path();
    canvas.arc(center.x, center.y, radius, 0.0, TAU);
    canvas.fill();
}

/// Vertices of a star polygon, alternating outer and inner radius.
///
/// The first vertex is the outer point straight above `center`.
pub fn star_outline(center: DVec2, spikes: usize, outer_radius: f64, inner_radius: f64) -> Vec<DVec2> {
    let step = PI / spikes as f64;
    let mut rotation = PI / 2.0 * 3.0;
    let mut points = Vec::with_capacity(spikes * 2);

    for _ in 0..spikes {
        points.push(center + DVec2::new(rotation.cos(), rotation.sin()) * outer_radius);
        rotation += step;
        points.push(center + DVec2::new(rotation.cos(), rotation.sin()) * inner_radius);
        rotation += step;
    }

    points
}

/// Filled five-point star whose outer radius is twice `size`
pub fn draw_star<C: SparkleCanvas + ?Sized>(canvas: &mut C, center: DVec2, size: f64) {
    let outer_radius = size * 2.0;
    let top = center - DVec2::new(0.0, outer_radius);

    canvas.set_fill_style(STAR_FILL);
    canvas.begin_path();
    canvas.move_to(top.x, top.y);
    for point in star_outline(center, STAR_SPIKES, outer_radius, size) {
        canvas.line_to(point.x, point.y);
    }
    canvas.line_to(top.x, top.y);
    canvas.close_path();
    canvas.fill();
}

/// Outlined, lightly filled disc with a small highlight toward the upper-left
pub fn draw_bubble<C: SparkleCanvas + ?Sized>(canvas: &mut C, center: DVec2, radius: f64, opacity: f64) {
    canvas.set_stroke_style(&rgba(200, 200, 255, opacity));
    canvas.set_fill_style(&rgba(255, 255, 255, opacity * 0.2));
    canvas.set_line_width(1.0);
    canvas.begin_path();
    canvas.arc(center.x, center.y, radius, 0.0, TAU);
    canvas.fill();
    canvas.stroke();

    let offset = radius * BUBBLE_HIGHLIGHT_SCALE;
    canvas.begin_path();
    canvas.arc(center.x - offset, center.y - offset, offset, 0.0, TAU);
    canvas.set_fill_style(&rgba(255, 255, 255, opacity * 0.8));
    canvas.fill();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{DrawOp, RecordingCanvas};

    #[test]
    fn test_star_outline_vertices() {
        let points = star_outline(DVec2::ZERO, 5, 2.0, 1.0);
        assert_eq!(points.len(), 10);

        // First point is the top outer vertex
        assert!((points[0] - DVec2::new(0.0, -2.0)).length() < 1e-9);

        for (i, p) in points.iter().enumerate() {
            let expected = if i % 2 == 0 { 2.0 } else { 1.0 };
            assert!((p.length() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_circle_ops() {
        let mut canvas = RecordingCanvas::new(100, 100);
        draw_circle(&mut canvas, DVec2::new(10.0, 20.0), 3.0);

        assert_eq!(canvas.fill_count(), 1);
        assert!(canvas.ops().contains(&DrawOp::FillStyle(CIRCLE_FILL.to_string())));
        assert!(canvas.ops().contains(&DrawOp::Arc {
            x: 10.0,
            y: 20.0,
            radius: 3.0
        }));
    }

    #[test]
    fn test_star_is_closed_polygon() {
        let mut canvas = RecordingCanvas::new(100, 100);
        draw_star(&mut canvas, DVec2::new(50.0, 50.0), 2.0);

        let line_count = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::LineTo(..)))
            .count();
        assert_eq!(line_count, STAR_SPIKES * 2 + 1);
        assert!(canvas.ops().contains(&DrawOp::MoveTo(50.0, 46.0)));
        assert!(canvas.ops().contains(&DrawOp::ClosePath));
        assert_eq!(canvas.fill_count(), 1);
    }

    #[test]
    fn test_bubble_strokes_and_highlights() {
        let mut canvas = RecordingCanvas::new(100, 100);
        draw_bubble(&mut canvas, DVec2::new(50.0, 50.0), 4.0, 0.5);

        assert_eq!(canvas.fill_count(), 2);
        assert_eq!(canvas.stroke_count(), 1);
        assert!(canvas.ops().contains(&DrawOp::StrokeStyle(rgba(200, 200, 255, 0.5))));
        assert!(canvas.ops().contains(&DrawOp::FillStyle(rgba(255, 255, 255, 0.4))));
        assert!(canvas.ops().iter().any(|op| matches!(
            op,
            DrawOp::Arc { x, y, .. } if *x < 50.0 && *y < 50.0
        )));
    }

    #[test]
    fn test_rgba_format() {
        assert_eq!(rgba(255, 0, 10, 0.25), "rgba(255, 0, 10, 0.25)");
    }
}
