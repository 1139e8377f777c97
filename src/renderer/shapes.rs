//! Shape tessellation for 2D primitives
//!
//! Everything is emitted as a plain triangle list in screen pixels.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Segments used for a full ellipse when the caller has no preference
pub const DEFAULT_SEGMENTS: u32 = 48;

fn push_tri(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

fn push_quad(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    push_tri(out, a, b, c, color);
    push_tri(out, c, b, d, color);
}

fn on_ellipse(center: Vec2, radii: Vec2, theta: f32) -> Vec2 {
    center + Vec2::new(theta.cos(), theta.sin()) * radii
}

/// Filled ellipse as a triangle fan
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;
        push_tri(
            &mut vertices,
            center,
            on_ellipse(center, radii, theta1),
            on_ellipse(center, radii, theta2),
            color,
        );
    }

    vertices
}

/// Filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Elliptical band of `width` pixels centred on the ellipse outline
pub fn ellipse_ring(
    center: Vec2,
    radii: Vec2,
    width: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let half = Vec2::splat(width * 0.5);
    let inner_radii = (radii - half).max(Vec2::ZERO);
    let outer_radii = radii + half;
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Two triangles per segment
        push_quad(
            &mut vertices,
            on_ellipse(center, inner_radii, theta1),
            on_ellipse(center, outer_radii, theta1),
            on_ellipse(center, inner_radii, theta2),
            on_ellipse(center, outer_radii, theta2),
            color,
        );
    }

    vertices
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        min,
        Vec2::new(max.x, min.y),
        Vec2::new(min.x, max.y),
        max,
        color,
    );
    vertices
}

/// Thick line segment. Degenerate segments produce nothing.
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let Some(dir) = (to - from).try_normalize() else {
        return Vec::new();
    };
    let perp = dir.perp() * (width * 0.5);
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        from + perp,
        from - perp,
        to + perp,
        to - perp,
        color,
    );
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_ellipse_vertices_on_outline() {
        let center = Vec2::new(600.0, 400.0);
        let radii = Vec2::new(580.0, 380.0);
        let verts = ellipse(center, radii, WHITE, 32);
        assert_eq!(verts.len(), 32 * 3);
        for v in verts.iter().skip(1).step_by(3) {
            let p = (Vec2::from(v.position) - center) / radii;
            assert!((p.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_segments_floor() {
        assert_eq!(circle(Vec2::ZERO, 5.0, WHITE, 0).len(), 9);
    }

    #[test]
    fn test_ring_band_width() {
        let verts = ellipse_ring(Vec2::ZERO, Vec2::new(100.0, 50.0), 4.0, WHITE, 16);
        assert_eq!(verts.len(), 16 * 6);
        // First quad corner pair on the +x axis
        assert!((verts[0].position[0] - 98.0).abs() < 1e-4);
        assert!((verts[1].position[0] - 102.0).abs() < 1e-4);
    }

    #[test]
    fn test_line_and_rect() {
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, WHITE).is_empty());
        let verts = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, WHITE);
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().all(|v| v.position[1].abs() <= 1.0 + 1e-6));

        let verts = rect(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), WHITE);
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().any(|v| v.position == [4.0, 6.0]));
    }
}
