//! Outline generation for 2D primitives
//!
//! These produce points in local (untransformed) space; `Painter` turns them
//! into triangles.

use glam::Vec2;
use std::f32::consts::TAU;

/// Points on an ellipse outline, rotated by `rotation`, not closed
pub fn ellipse(center: Vec2, radii: Vec2, rotation: f32, segments: u32) -> Vec<Vec2> {
    let rot = Vec2::from_angle(rotation);
    (0..segments)
        .map(|i| {
            let theta = i as f32 / segments as f32 * TAU;
            center + rot.rotate(Vec2::new(radii.x * theta.cos(), radii.y * theta.sin()))
        })
        .collect()
}

/// Points on a circular arc from `start` to `end` (radians), both ends included
pub fn arc(center: Vec2, radius: f32, start: f32, end: f32, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let theta = start + (end - start) * i as f32 / segments as f32;
            center + Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}

/// Points along a quadratic Bézier, excluding the start point
pub fn quad_curve(start: Vec2, control: Vec2, end: Vec2, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(1);
    (1..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let u = 1.0 - t;
            start * (u * u) + control * (2.0 * u * t) + end * (t * t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipse_points_lie_on_outline() {
        let pts = ellipse(Vec2::new(5.0, 5.0), Vec2::new(4.0, 2.0), 0.0, 16);
        assert_eq!(pts.len(), 16);
        for p in pts {
            let d = p - Vec2::new(5.0, 5.0);
            let v = (d.x / 4.0).powi(2) + (d.y / 2.0).powi(2);
            assert!((v - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_rotated_ellipse() {
        let pts = ellipse(Vec2::ZERO, Vec2::new(4.0, 1.0), std::f32::consts::FRAC_PI_2, 4);
        // First point sits on the major axis, which is now vertical
        assert!(pts[0].x.abs() < 1e-5);
        assert!((pts[0].y - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_arc_endpoints() {
        let pts = arc(Vec2::ZERO, 2.0, 0.0, std::f32::consts::PI, 8);
        assert_eq!(pts.len(), 9);
        assert!((pts[0] - Vec2::new(2.0, 0.0)).length() < 1e-5);
        assert!((pts[8] - Vec2::new(-2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_quad_curve_ends_at_end() {
        let pts = quad_curve(Vec2::ZERO, Vec2::new(1.0, 2.0), Vec2::new(2.0, 0.0), 10);
        assert_eq!(pts.len(), 10);
        assert!((pts[9] - Vec2::new(2.0, 0.0)).length() < 1e-6);
        // Midpoint of a symmetric curve sits at half the control height
        assert!((pts[4] - Vec2::new(1.0, 1.0)).length() < 1e-5);
    }
}
