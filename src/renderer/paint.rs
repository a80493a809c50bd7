//! Canvas-style painter that tessellates into triangles
//!
//! Mirrors the small subset of a 2D canvas the pond needs: a save/restore
//! transform stack, global alpha, filled circles/ellipses/polygons, strokes,
//! linear and radial gradients, and soft glows that stand in for shadow blur.
//! Output is a triangle list in surface pixels.

use glam::{Affine2, Vec2};
use std::f32::consts::TAU;

use super::shapes;
use super::vertex::{Color, Vertex, fade, mix};

/// Something that can color a point in local space
pub trait Fill {
    fn color_at(&self, p: Vec2) -> Color;
}

impl Fill for Color {
    #[inline]
    fn color_at(&self, _p: Vec2) -> Color {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Ramp {
    Linear { from: Vec2, to: Vec2 },
    Radial { center: Vec2, r0: f32, r1: f32 },
}

/// Color ramp with stops in `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    ramp: Ramp,
    stops: Vec<(f32, Color)>,
}

impl Gradient {
    /// Gradient along the line `from` → `to`
    pub fn linear(from: Vec2, to: Vec2) -> Self {
        Self {
            ramp: Ramp::Linear { from, to },
            stops: Vec::new(),
        }
    }

    /// Gradient between two concentric circles
    pub fn radial(center: Vec2, r0: f32, r1: f32) -> Self {
        Self {
            ramp: Ramp::Radial { center, r0, r1 },
            stops: Vec::new(),
        }
    }

    /// Add a stop. Stops must be added in increasing offset order.
    pub fn stop(mut self, offset: f32, color: Color) -> Self {
        self.stops.push((offset.clamp(0.0, 1.0), color));
        self
    }

    /// Position of `p` along the ramp, clamped to `[0, 1]`
    fn offset(&self, p: Vec2) -> f32 {
        let t = match self.ramp {
            Ramp::Linear { from, to } => {
                let axis = to - from;
                let len2 = axis.length_squared();
                if len2 <= f32::EPSILON {
                    0.0
                } else {
                    (p - from).dot(axis) / len2
                }
            }
            Ramp::Radial { center, r0, r1 } => {
                let span = r1 - r0;
                if span.abs() <= f32::EPSILON {
                    0.0
                } else {
                    (p.distance(center) - r0) / span
                }
            }
        };
        t.clamp(0.0, 1.0)
    }

    /// Color at ramp offset `t`
    pub fn sample(&self, t: f32) -> Color {
        let Some(&(first_t, first)) = self.stops.first() else {
            return [0.0; 4];
        };
        if t <= first_t {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                let u = if span <= f32::EPSILON { 1.0 } else { (t - t0) / span };
                return mix(c0, c1, u);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

impl Fill for Gradient {
    fn color_at(&self, p: Vec2) -> Color {
        self.sample(self.offset(p))
    }
}

/// Tessellating 2D painter
pub struct Painter {
    vertices: Vec<Vertex>,
    transform: Affine2,
    alpha: f32,
    stack: Vec<(Affine2, f32)>,
    max_segments: u32,
}

impl Painter {
    /// `max_segments` caps the subdivision of curves (quality dependent)
    pub fn new(max_segments: u32) -> Self {
        Self {
            vertices: Vec::with_capacity(16 * 1024),
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            stack: Vec::new(),
            max_segments: max_segments.max(8),
        }
    }

    /// Hand over the triangle list
    pub fn finish(self) -> Vec<Vertex> {
        self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // === State ===

    pub fn save(&mut self) {
        self.stack.push((self.transform, self.alpha));
    }

    pub fn restore(&mut self) {
        if let Some((transform, alpha)) = self.stack.pop() {
            self.transform = transform;
            self.alpha = alpha;
        }
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.transform = self.transform * Affine2::from_translation(offset);
    }

    pub fn rotate(&mut self, angle: f32) {
        self.transform = self.transform * Affine2::from_angle(angle);
    }

    pub fn scale(&mut self, factor: f32) {
        self.transform = self.transform * Affine2::from_scale(Vec2::splat(factor));
    }

    /// Global alpha applied to everything painted until restore
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Subdivision for a curve of the given local radius
    fn segments_for(&self, radius: f32) -> u32 {
        let scale = self.transform.matrix2.x_axis.length().max(1e-3);
        ((radius * scale * 0.75) as u32).clamp(8, self.max_segments)
    }

    // === Raw output ===

    fn emit(&mut self, p: Vec2, color: Color) {
        let p = self.transform.transform_point2(p);
        self.vertices.push(Vertex::new(p.x, p.y, fade(color, self.alpha)));
    }

    fn triangle(&mut self, a: (Vec2, Color), b: (Vec2, Color), c: (Vec2, Color)) {
        if a.1[3] <= 0.0 && b.1[3] <= 0.0 && c.1[3] <= 0.0 {
            return;
        }
        self.emit(a.0, a.1);
        self.emit(b.0, b.1);
        self.emit(c.0, c.1);
    }

    fn quad(&mut self, a: (Vec2, Color), b: (Vec2, Color), c: (Vec2, Color), d: (Vec2, Color)) {
        self.triangle(a, b, c);
        self.triangle(c, b, d);
    }

    // === Fills ===

    /// Axis-aligned rectangle with a vertical gradient (`stops` over top → bottom)
    pub fn fill_rect_vertical(&mut self, min: Vec2, max: Vec2, stops: &[(f32, Color)]) {
        for pair in stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            let y0 = min.y + (max.y - min.y) * t0;
            let y1 = min.y + (max.y - min.y) * t1;
            self.quad(
                (Vec2::new(min.x, y0), c0),
                (Vec2::new(max.x, y0), c0),
                (Vec2::new(min.x, y1), c1),
                (Vec2::new(max.x, y1), c1),
            );
        }
    }

    /// Filled star-shaped polygon, fanned from its first point
    pub fn fill_polygon(&mut self, points: &[Vec2], fill: &impl Fill) {
        if points.len() < 3 {
            return;
        }
        let origin = points[0];
        let c0 = fill.color_at(origin);
        for pair in points[1..].windows(2) {
            let (a, b) = (pair[0], pair[1]);
            self.triangle((origin, c0), (a, fill.color_at(a)), (b, fill.color_at(b)));
        }
    }

    /// Filled ellipse. Shaded fills are sampled on an inner ring as well as
    /// the rim so gradients read smoothly.
    pub fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, fill: &impl Fill) {
        let segments = self.segments_for(radii.x.max(radii.y));
        let outer = shapes::ellipse(center, radii, rotation, segments);
        let inner = shapes::ellipse(center, radii * 0.5, rotation, segments);
        let c_center = fill.color_at(center);

        for i in 0..outer.len() {
            let j = (i + 1) % outer.len();
            let (i0, i1) = (inner[i], inner[j]);
            let (o0, o1) = (outer[i], outer[j]);
            let (ci0, ci1) = (fill.color_at(i0), fill.color_at(i1));
            self.triangle((center, c_center), (i0, ci0), (i1, ci1));
            self.quad(
                (i0, ci0),
                (o0, fill.color_at(o0)),
                (i1, ci1),
                (o1, fill.color_at(o1)),
            );
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, fill: &impl Fill) {
        if radius <= 0.0 {
            return;
        }
        self.fill_ellipse(center, Vec2::splat(radius), 0.0, fill);
    }

    /// Disc whose color runs from `inner` at the center to `outer` at the rim
    pub fn fill_radial(&mut self, center: Vec2, radius: f32, inner: Color, outer: Color) {
        if radius <= 0.0 {
            return;
        }
        let segments = self.segments_for(radius);
        let rim = shapes::ellipse(center, Vec2::splat(radius), 0.0, segments);
        for i in 0..rim.len() {
            let j = (i + 1) % rim.len();
            self.triangle((center, inner), (rim[i], outer), (rim[j], outer));
        }
    }

    /// Soft halo just outside a circle, fading from `color` to transparent
    pub fn glow(&mut self, center: Vec2, radius: f32, spread: f32, color: Color) {
        if spread <= 0.0 {
            return;
        }
        let clear = fade(color, 0.0);
        self.band(center, radius.max(0.0), radius.max(0.0) + spread, 0.0, TAU, color, clear);
    }

    // === Strokes ===

    /// Ring between `r_in` and `r_out` over the angle range, colored per edge
    #[allow(clippy::too_many_arguments)]
    fn band(
        &mut self,
        center: Vec2,
        r_in: f32,
        r_out: f32,
        start: f32,
        end: f32,
        c_in: Color,
        c_out: Color,
    ) {
        let sweep = (end - start).abs() / TAU;
        let segments = ((self.segments_for(r_out) as f32 * sweep).ceil() as u32).max(2);
        let inner = shapes::arc(center, r_in, start, end, segments);
        let outer = shapes::arc(center, r_out, start, end, segments);
        for i in 0..segments as usize {
            self.quad(
                (inner[i], c_in),
                (outer[i], c_out),
                (inner[i + 1], c_in),
                (outer[i + 1], c_out),
            );
        }
    }

    /// Circle outline of the given line width
    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, fill: &impl Fill) {
        self.stroke_arc(center, radius, 0.0, TAU, width, fill);
    }

    /// Arc outline from `start` to `end` (radians, clockwise on screen)
    pub fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
        fill: &impl Fill,
    ) {
        if radius <= 0.0 || width <= 0.0 {
            return;
        }
        let half = width * 0.5;
        let r_in = (radius - half).max(0.0);
        let r_out = radius + half;
        let mid = (start + end) * 0.5;
        let dir = Vec2::new(mid.cos(), mid.sin());
        let c_in = fill.color_at(center + dir * r_in);
        let c_out = fill.color_at(center + dir * r_out);
        self.band(center, r_in, r_out, start, end, c_in, c_out);
    }

    /// Straight line segment of the given width
    pub fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Color) {
        let dir = (b - a).normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        let perp = dir.perp() * (width * 0.5);
        self.quad(
            (a + perp, color),
            (a - perp, color),
            (b + perp, color),
            (b - perp, color),
        );
    }
}
