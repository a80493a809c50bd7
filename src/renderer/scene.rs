//! Pond scene painting
//!
//! Builds one frame's triangle list from the pond state. Layers, back to
//! front: water gradient, ambient color blooms, lily pads, fountain, koi,
//! ripples. Nothing here keeps state between frames; wall-clock time only
//! drives the ambient blooms and the fountain droplets.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::paint::{Gradient, Painter};
use super::shapes;
use super::vertex::{Color, Vertex, colors, fade, hex};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Fish, LilyPad, PondState, Ripple};

/// Knobs derived from settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintOptions {
    /// Upper bound on curve subdivision
    pub max_segments: u32,
    /// Draw the drifting background blooms
    pub ambient_blooms: bool,
    /// Let wall-clock time move the blooms and fountain droplets
    pub ambient_motion: bool,
}

impl Default for PaintOptions {
    fn default() -> Self {
        Self {
            max_segments: 32,
            ambient_blooms: true,
            ambient_motion: true,
        }
    }
}

impl PaintOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_segments: settings.quality.circle_segments(),
            ambient_blooms: settings.quality.ambient_blooms(),
            ambient_motion: !settings.reduced_motion,
        }
    }
}

/// One painted frame, in surface pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Extent the frame was painted for
    pub size: (u32, u32),
    pub vertices: Vec<Vertex>,
}

/// Paint the whole pond. `time_secs` is wall-clock seconds.
pub fn paint_frame(state: &PondState, time_secs: f64, options: &PaintOptions) -> Frame {
    let time = if options.ambient_motion { time_secs } else { 0.0 };
    let viewport = state.viewport;
    let mut p = Painter::new(options.max_segments);

    paint_background(&mut p, viewport);
    if options.ambient_blooms {
        paint_blooms(&mut p, viewport, time);
    }
    for (index, pad) in state.lily_pads.iter().enumerate() {
        paint_lily_pad(&mut p, pad, index, viewport);
    }
    paint_fountain(&mut p, viewport, time);
    for fish in &state.fish {
        paint_fish(&mut p, fish);
    }
    for ripple in &state.ripples {
        paint_ripple(&mut p, ripple);
    }

    Frame {
        size: (viewport.x.max(0.0) as u32, viewport.y.max(0.0) as u32),
        vertices: p.finish(),
    }
}

/// Vertical water gradient covering the full viewport
pub fn paint_background(p: &mut Painter, viewport: Vec2) {
    p.fill_rect_vertical(
        Vec2::ZERO,
        viewport,
        &[
            (0.0, hex(colors::WATER_TOP, 1.0)),
            (0.3, hex(colors::WATER_UPPER, 1.0)),
            (0.6, hex(colors::WATER_LOWER, 1.0)),
            (1.0, hex(colors::WATER_BOTTOM, 1.0)),
        ],
    );
}

/// Six soft tints drifting slowly up and down
fn paint_blooms(p: &mut Painter, viewport: Vec2, time: f64) {
    let drift = time * 0.1;
    for i in 0..6 {
        let center = Vec2::new(
            viewport.x * (0.15 + i as f32 * 0.15),
            viewport.y * (0.25 + (drift + i as f64).sin() as f32 * 0.12),
        );
        let (inner, outer) = if i % 2 == 0 {
            (
                hex(colors::PALE_TURQUOISE, 0.2),
                hex(colors::PALE_GREEN, 0.0),
            )
        } else {
            (
                hex(colors::POWDER_BLUE, 0.2),
                hex(colors::PALE_TURQUOISE, 0.0),
            )
        };
        p.fill_radial(center, viewport.x * 0.35, inner, outer);
    }
}

fn paint_lily_pad(p: &mut Painter, pad: &LilyPad, index: usize, viewport: Vec2) {
    let size = crate::lily_pad_radius(index);
    let t = pad.animation as f32;
    let (bounce, scale) = if pad.is_animating() {
        ((t * 0.3).sin() * 5.0, 1.0 + (t * 0.2).sin() * 0.1)
    } else {
        (0.0, 1.0)
    };

    p.save();
    p.translate(pad.center(viewport) + Vec2::new(0.0, bounce));
    p.scale(scale);

    // Pad with its notch and veins
    p.glow(Vec2::ZERO, size, 10.0, hex(colors::BLACK, 0.2));
    p.fill_circle(Vec2::ZERO, size, &hex(colors::LILY_PAD, 1.0));
    p.fill_polygon(
        &[
            Vec2::new(size * 0.7, 0.0),
            Vec2::ZERO,
            Vec2::new(size * 0.5, -size * 0.3),
        ],
        &hex(colors::LILY_NOTCH, 1.0),
    );
    let vein = hex(colors::BLACK, 0.15);
    for i in 0..6 {
        let angle = i as f32 / 6.0 * TAU;
        let tip = Vec2::new(angle.cos(), angle.sin()) * size * 0.8;
        p.stroke_line(Vec2::ZERO, tip, 1.5, vein);
    }

    // Flower
    p.rotate(pad.petal_rotation);
    let petal = hex(pad.flower_color, 1.0);
    for i in 0..6 {
        let petal_scale = if pad.is_animating() {
            1.0 + (t * 0.4 + i as f32).sin() * 0.15
        } else {
            1.0
        };
        p.save();
        p.rotate(i as f32 / 6.0 * TAU);
        p.scale(petal_scale);
        p.fill_ellipse(
            Vec2::new(size * 0.3, 0.0),
            Vec2::new(size * 0.15, size * 0.25),
            0.0,
            &petal,
        );
        p.restore();
    }

    let center = hex(pad.center_color, 1.0);
    if pad.is_animating() {
        p.glow(Vec2::ZERO, size * 0.15, 15.0, center);
    }
    p.fill_circle(Vec2::ZERO, size * 0.15, &center);

    p.restore();
}

fn paint_fountain(p: &mut Painter, viewport: Vec2, time: f64) {
    let origin = viewport * Vec2::new(FOUNTAIN_X, FOUNTAIN_Y);
    let size = FOUNTAIN_SIZE;

    // Base with a soft shadow
    let base = origin + Vec2::new(0.0, size * 0.5);
    p.fill_ellipse(
        base,
        Vec2::new(size * 1.2 + 8.0, size * 0.4 + 8.0),
        0.0,
        &hex(colors::BLACK, 0.08),
    );
    p.fill_ellipse(
        base,
        Vec2::new(size * 1.2, size * 0.4),
        0.0,
        &hex(colors::FOUNTAIN_BASE, 1.0),
    );

    // Bowl: upper half disc closed by a shallow curve underneath
    let mut bowl = shapes::arc(origin, size, 0.0, -PI, 16);
    bowl.extend(shapes::quad_curve(
        origin - Vec2::new(size, 0.0),
        origin + Vec2::new(0.0, size * 0.3),
        origin + Vec2::new(size, 0.0),
        8,
    ));
    p.fill_polygon(&bowl, &hex(colors::FOUNTAIN_BOWL, 1.0));

    // Droplets bobbing above the bowl
    let droplet = hex(colors::WHITE, 0.6);
    for i in 0..5 {
        let angle = (time + i as f64).rem_euclid(std::f64::consts::TAU);
        let height = angle.sin().abs() as f32 * size * 0.8;
        let pos = Vec2::new(origin.x + (i as f32).cos() * size * 0.3, origin.y - height);
        p.glow(pos, size * 0.1, 5.0, fade(droplet, 0.5));
        p.fill_circle(pos, size * 0.1, &droplet);
    }
}

fn paint_fish(p: &mut Painter, fish: &Fish) {
    let s = fish.size;
    let tail_wave = fish.tail_phase.sin() * 0.2;
    let fin_wave = fish.fin_phase.sin() * 0.15;
    let primary = hex(fish.color, 1.0);
    let secondary = hex(fish.secondary_color, 1.0);

    p.save();
    p.translate(fish.pos);
    p.rotate(fish.heading);

    // Shadow beneath the body
    p.fill_ellipse(
        Vec2::new(0.0, s * 0.1),
        Vec2::new(s * 0.9, s * 0.3),
        0.0,
        &hex(colors::BLACK, 0.15),
    );

    // Tail fin
    let tw = tail_wave * s;
    let tail_root = Vec2::new(-s * 0.9, 0.0);
    let upper_tip = Vec2::new(-s * 1.6, -s * 0.4 + tw);
    let lower_tip = Vec2::new(-s * 1.6, s * 0.4 - tw);
    let mut tail = vec![tail_root];
    tail.extend(shapes::quad_curve(
        tail_root,
        Vec2::new(-s * 1.4, -s * 0.7 + tw),
        upper_tip,
        8,
    ));
    tail.push(Vec2::new(-s * 1.5, tw * 0.5));
    tail.push(lower_tip);
    tail.extend(shapes::quad_curve(
        lower_tip,
        Vec2::new(-s * 1.4, s * 0.7 - tw),
        tail_root,
        8,
    ));
    p.fill_polygon(&tail, &secondary);

    // Body
    let body = Gradient::linear(Vec2::new(s, -s * 0.4), Vec2::new(-s * 0.5, s * 0.4))
        .stop(0.0, primary)
        .stop(0.5, secondary)
        .stop(1.0, primary);
    p.fill_ellipse(Vec2::ZERO, Vec2::new(s, s * 0.45), 0.0, &body);

    // Pattern spots
    p.save();
    p.set_alpha(0.4);
    for i in 0..3 {
        let spot = Vec2::new(-s * 0.3 + i as f32 * s * 0.3, -s * 0.15 + (i % 2) as f32 * s * 0.2);
        p.fill_circle(spot, s * 0.15, &secondary);
    }
    p.restore();

    // Dorsal fin
    let fw = fin_wave * s;
    let dorsal_start = Vec2::new(-s * 0.2, -s * 0.45);
    let mut dorsal = vec![dorsal_start];
    dorsal.extend(shapes::quad_curve(
        dorsal_start,
        Vec2::new(-s * 0.1, -s * 0.8 + fw * 0.3),
        Vec2::new(s * 0.1, -s * 0.45),
        6,
    ));
    dorsal.push(Vec2::new(s * 0.05, -s * 0.4));
    dorsal.push(Vec2::new(-s * 0.15, -s * 0.4));
    p.fill_polygon(&dorsal, &secondary);

    // Pectoral fin
    p.save();
    p.set_alpha(0.6);
    p.fill_ellipse(
        Vec2::new(s * 0.2, s * 0.3 + fw * 0.2),
        Vec2::new(s * 0.3, s * 0.15),
        0.5,
        &primary,
    );
    p.restore();

    // Scales
    let scale_line = hex(colors::WHITE, 0.15);
    for i in -3..4 {
        for j in -1..2 {
            let c = Vec2::new(i as f32 * s * 0.15, j as f32 * s * 0.2);
            p.stroke_circle(c, s * 0.1, 0.5, &scale_line);
        }
    }

    // Eye
    p.fill_circle(Vec2::new(s * 0.6, -s * 0.05), s * 0.1, &hex(colors::KOI_EYE, 1.0));
    p.fill_circle(Vec2::new(s * 0.62, -s * 0.08), s * 0.04, &hex(colors::WHITE, 0.8));

    // Body highlight
    p.fill_ellipse(
        Vec2::new(s * 0.3, -s * 0.2),
        Vec2::new(s * 0.5, s * 0.15),
        -0.2,
        &hex(colors::WHITE, 0.35),
    );

    // Mouth
    p.stroke_arc(
        Vec2::new(s * 0.95, 0.0),
        s * 0.08,
        0.3,
        TAU - 0.3,
        1.5,
        &hex(colors::BLACK, 0.2),
    );

    p.restore();
}

fn paint_ripple(p: &mut Painter, ripple: &Ripple) {
    let a = ripple.alpha.max(0.0);
    let origin = ripple.origin;
    let pulse = 1.0 + (ripple.age as f32 * 0.3).sin() * 0.1;
    let main_radius = ripple.radius * pulse;

    // Outer glow
    p.stroke_circle(origin, main_radius + 5.0, 8.0, &hex(colors::RIPPLE_GLOW, a * 0.3));

    // Main ring
    let ring = Gradient::radial(origin, (main_radius - 10.0).max(0.0), main_radius + 10.0)
        .stop(0.0, hex(colors::RIPPLE_RING, a * 0.6))
        .stop(0.5, hex(colors::RIPPLE_RING_BRIGHT, a))
        .stop(1.0, hex(colors::RIPPLE_RING, a * 0.4));
    p.stroke_circle(origin, main_radius, 4.0, &ring);

    if ripple.radius > 15.0 {
        p.stroke_circle(origin, main_radius * 0.6, 2.0, &hex(colors::RIPPLE_INNER, a * 0.5));
    }

    // Droplets with short trails
    let trail = hex(colors::RIPPLE_TRAIL, a * 0.4);
    for particle in &ripple.particles {
        let dir = Vec2::new(particle.angle.cos(), particle.angle.sin());
        let pos = particle.position(origin);
        p.stroke_line(origin + dir * (particle.distance - 10.0), pos, 1.0, trail);

        let pa = (a * (1.0 - particle.distance / ripple.max_radius)).max(0.0);
        p.glow(pos, particle.size, 5.0, hex(colors::DROPLET_GLOW, pa * 0.6));
        p.fill_circle(pos, particle.size, &hex(colors::DROPLET, pa));
    }

    // Splash burst while young
    if ripple.age < 10 {
        let age = ripple.age as f32;
        let burst = a * (1.0 - age / 10.0);
        let burst_radius = 8.0 - age * 0.5;
        p.glow(origin, burst_radius, 20.0, hex(colors::DROPLET, burst * 0.5));
        p.fill_circle(origin, burst_radius, &hex(colors::WHITE, burst * 0.6));

        let line = hex(colors::BURST_LINE, burst * 0.5);
        let length = age * 3.0;
        for i in 0..8 {
            let angle = i as f32 / 8.0 * TAU;
            p.stroke_line(origin, origin + Vec2::new(angle.cos(), angle.sin()) * length, 2.0, line);
        }
    }
}

/// Color of the water at the top edge, used to clear the surface
pub fn clear_color() -> Color {
    hex(colors::WATER_TOP, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{ScriptedRng, seeded};
    use crate::sim::{Particle, tick};

    fn pond(viewport: Vec2) -> PondState {
        PondState::new(viewport, FISH_COUNT, &mut seeded(11))
    }

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        vertices.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(min, max), v| {
                let p = Vec2::from(v.position);
                (min.min(p), max.max(p))
            },
        )
    }

    fn background_len(viewport: Vec2) -> usize {
        let mut p = Painter::new(32);
        paint_background(&mut p, viewport);
        p.vertex_count()
    }

    #[test]
    fn test_frame_starts_with_full_background() {
        let state = pond(Vec2::new(800.0, 600.0));
        let frame = paint_frame(&state, 0.0, &PaintOptions::default());
        let n = background_len(state.viewport);
        assert_eq!(frame.size, (800, 600));
        assert_eq!(bounds(&frame.vertices[..n]), (Vec2::ZERO, Vec2::new(800.0, 600.0)));
        assert!(frame.vertices.len() > n);
    }

    #[test]
    fn test_resize_repaints_new_extent() {
        let mut state = pond(Vec2::new(800.0, 600.0));
        let options = PaintOptions::default();
        let _ = paint_frame(&state, 1.0, &options);

        state.resize(Vec2::new(1280.0, 400.0));
        let frame = paint_frame(&state, 1.0, &options);
        let n = background_len(state.viewport);
        assert_eq!(frame.size, (1280, 400));
        assert_eq!(bounds(&frame.vertices[..n]), (Vec2::ZERO, Vec2::new(1280.0, 400.0)));
    }

    #[test]
    fn test_painting_is_pure() {
        let state = pond(Vec2::new(800.0, 600.0));
        let options = PaintOptions::default();
        let a = paint_frame(&state, 12.5, &options);
        let b = paint_frame(&state, 12.5, &options);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ambient_motion_follows_time() {
        let state = pond(Vec2::new(800.0, 600.0));
        let moving = PaintOptions::default();
        assert_ne!(
            paint_frame(&state, 0.0, &moving).vertices,
            paint_frame(&state, 3.0, &moving).vertices
        );

        let still = PaintOptions {
            ambient_motion: false,
            ..moving
        };
        assert_eq!(
            paint_frame(&state, 0.0, &still).vertices,
            paint_frame(&state, 3.0, &still).vertices
        );
    }

    #[test]
    fn test_ripples_add_geometry_until_culled() {
        let mut state = PondState::new(Vec2::new(800.0, 600.0), 0, &mut ScriptedRng::constant(0.5));
        let options = PaintOptions::default();
        let empty = paint_frame(&state, 0.0, &options).vertices.len();

        state.ripples.push(Ripple::new(
            Vec2::new(400.0, 300.0),
            80.0,
            0.5,
            vec![Particle {
                angle: 0.0,
                distance: 0.0,
                speed: 1.0,
                size: 3.0,
            }],
        ));
        let mut rng = ScriptedRng::constant(0.5);
        tick(&mut state, &mut rng);
        assert!(paint_frame(&state, 0.0, &options).vertices.len() > empty);

        while !state.ripples.is_empty() {
            tick(&mut state, &mut rng);
        }
        assert_eq!(paint_frame(&state, 0.0, &options).vertices.len(), empty);
    }

    #[test]
    fn test_skipping_blooms_saves_geometry() {
        let state = pond(Vec2::new(800.0, 600.0));
        let full = paint_frame(&state, 0.0, &PaintOptions::default());
        let lean = paint_frame(
            &state,
            0.0,
            &PaintOptions {
                ambient_blooms: false,
                ..Default::default()
            },
        );
        assert!(lean.vertices.len() < full.vertices.len());
    }

    #[test]
    fn test_animated_lily_pad_moves() {
        let mut state = PondState::new(Vec2::new(800.0, 600.0), 0, &mut ScriptedRng::constant(0.5));
        let options = PaintOptions::default();
        let idle = paint_frame(&state, 0.0, &options);
        state.lily_pads[0].trigger();
        state.lily_pads[0].animation = 40;
        state.lily_pads[0].petal_rotation = 0.5;
        let busy = paint_frame(&state, 0.0, &options);
        assert_ne!(idle.vertices, busy.vertices);
    }
}
