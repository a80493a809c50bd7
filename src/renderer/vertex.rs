//! Vertex types and colors for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Linear RGBA
pub type Color = [f32; 4];

#[inline]
fn srgb_channel_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear color from 8-bit sRGB channels
pub fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Color {
    [
        srgb_channel_to_linear(r as f32 / 255.0),
        srgb_channel_to_linear(g as f32 / 255.0),
        srgb_channel_to_linear(b as f32 / 255.0),
        alpha.clamp(0.0, 1.0),
    ]
}

/// Linear color from a 0xRRGGBB sRGB hex value
pub fn hex(rgb: u32, alpha: f32) -> Color {
    rgba(
        ((rgb >> 16) & 0xFF) as u8,
        ((rgb >> 8) & 0xFF) as u8,
        (rgb & 0xFF) as u8,
        alpha,
    )
}

/// Same color with alpha scaled by `factor`
#[inline]
pub fn fade(color: Color, factor: f32) -> Color {
    [color[0], color[1], color[2], (color[3] * factor).clamp(0.0, 1.0)]
}

/// Component-wise blend from `a` (t = 0) to `b` (t = 1)
#[inline]
pub fn mix(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Colors for pond elements (sRGB hex)
pub mod colors {
    pub const WATER_TOP: u32 = 0xD4F1F4;
    pub const WATER_UPPER: u32 = 0xC8E9E9;
    pub const WATER_LOWER: u32 = 0xB8E0D4;
    pub const WATER_BOTTOM: u32 = 0xA8D8D0;

    pub const PALE_TURQUOISE: u32 = 0xAFEEEE;
    pub const PALE_GREEN: u32 = 0x98FB98;
    pub const POWDER_BLUE: u32 = 0xB0E0E6;

    pub const LILY_PAD: u32 = 0x90D090;
    pub const LILY_NOTCH: u32 = 0x78B878;

    pub const FOUNTAIN_BASE: u32 = 0x8B9B8B;
    pub const FOUNTAIN_BOWL: u32 = 0x9EAAA0;

    pub const KOI_EYE: u32 = 0x3D4F4F;

    pub const RIPPLE_GLOW: u32 = 0x96DCF0;
    pub const RIPPLE_RING: u32 = 0x64D2F0;
    pub const RIPPLE_RING_BRIGHT: u32 = 0x8CE6FA;
    pub const RIPPLE_INNER: u32 = 0xB4F0FF;
    pub const RIPPLE_TRAIL: u32 = 0x78DCF0;
    pub const DROPLET: u32 = 0xC8F0FF;
    pub const DROPLET_GLOW: u32 = 0x96E6FA;
    pub const BURST_LINE: u32 = 0xDCF5FF;

    pub const WHITE: u32 = 0xFFFFFF;
    pub const BLACK: u32 = 0x000000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_endpoints() {
        assert_eq!(hex(0xFFFFFF, 1.0), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(hex(0x000000, 0.5), [0.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_hex_is_linearized() {
        let c = hex(0x808080, 1.0);
        // sRGB mid gray is about 0.216 linear
        assert!((c[0] - 0.216).abs() < 0.01);
        assert_eq!(c[0], c[1]);
    }

    #[test]
    fn test_fade_and_mix() {
        let c = fade([1.0, 0.5, 0.0, 0.8], 0.5);
        assert!((c[3] - 0.4).abs() < 1e-6);
        let m = mix([0.0; 4], [1.0; 4], 0.25);
        assert_eq!(m, [0.25; 4]);
        assert_eq!(mix([0.0; 4], [1.0; 4], 2.0), [1.0; 4]);
    }
}
