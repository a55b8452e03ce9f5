//! Polygonal ring geometry
//!
//! The ring is a regular `side_count`-gon inscribed in a circle of the arena
//! radius. Slot `i` spans the sample angles
//!
//! ```text
//! θ_i = i * step + rotation        step = 2π / side_count
//! ```
//!
//! and is filled by a straight wall whose length is the chord
//! `2 r sin(π / n)`. Slots whose (unrotated) midpoint falls inside the gap arc
//! are left empty, so the opening spins together with the ring.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{cartesian_to_polar, normalize_angle, polar_to_cartesian};

/// One straight wall of the ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    /// Slot index within the ring (0..side_count)
    pub slot: u32,
    /// Chord midpoint (world space)
    pub midpoint: Vec2,
    /// Tangent angle of the segment (radians)
    pub orientation: f32,
    pub half_length: f32,
    /// Wall thickness, centered on the chord
    pub thickness: f32,
    /// Unit normal pointing toward the arena center
    pub inward_normal: Vec2,
}

impl WallSegment {
    /// Unit direction along the segment
    #[inline]
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.orientation.cos(), self.orientation.sin())
    }

    /// Both chord endpoints
    pub fn endpoints(&self) -> (Vec2, Vec2) {
        let half = self.direction() * self.half_length;
        (self.midpoint - half, self.midpoint + half)
    }

    /// Closest point on the chord to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let dir = self.direction();
        let t = (point - self.midpoint)
            .dot(dir)
            .clamp(-self.half_length, self.half_length);
        self.midpoint + dir * t
    }
}

/// Snapshot of the ring for one rotation angle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundary {
    pub center: Vec2,
    pub radius: f32,
    pub side_count: u32,
    pub gap_width: f32,
    pub gap_center: f32,
    pub rotation: f32,
    /// Present walls in slot order
    pub segments: Vec<WallSegment>,
    /// slot -> index into `segments` (None inside the gap)
    slots: Vec<Option<usize>>,
}

/// Angular step between ring samples
#[inline]
pub fn slot_step(side_count: u32) -> f32 {
    std::f32::consts::TAU / side_count as f32
}

/// Whether slot `i` lies inside the gap arc (rotation-independent)
pub fn is_gap_slot(slot: u32, side_count: u32, gap_width: f32, gap_center: f32) -> bool {
    if gap_width <= 0.0 {
        return false;
    }
    let mid = (slot as f32 + 0.5) * slot_step(side_count);
    normalize_angle(mid - gap_center).abs() < gap_width / 2.0
}

/// Number of slots the gap removes
pub fn count_gap_slots(side_count: u32, gap_width: f32, gap_center: f32) -> usize {
    (0..side_count)
        .filter(|&i| is_gap_slot(i, side_count, gap_width, gap_center))
        .count()
}

/// Build the ring for the given rotation
pub fn build_boundary(
    center: Vec2,
    radius: f32,
    side_count: u32,
    gap_width: f32,
    gap_center: f32,
    rotation: f32,
    thickness: f32,
) -> Boundary {
    let step = slot_step(side_count);
    let half_length = radius * (step / 2.0).sin();
    let apothem = radius * (step / 2.0).cos();

    let mut segments = Vec::with_capacity(side_count as usize);
    let mut slots = Vec::with_capacity(side_count as usize);

    for i in 0..side_count {
        if is_gap_slot(i, side_count, gap_width, gap_center) {
            slots.push(None);
            continue;
        }

        let mid_theta = (i as f32 + 0.5) * step + rotation;
        let radial = Vec2::new(mid_theta.cos(), mid_theta.sin());

        slots.push(Some(segments.len()));
        segments.push(WallSegment {
            slot: i,
            midpoint: center + radial * apothem,
            orientation: normalize_angle(mid_theta + std::f32::consts::FRAC_PI_2),
            half_length,
            thickness,
            inward_normal: -radial,
        });
    }

    Boundary {
        center,
        radius,
        side_count,
        gap_width,
        gap_center,
        rotation,
        segments,
        slots,
    }
}

impl Boundary {
    /// Rebuild every segment for a new rotation angle
    pub fn rotated(&self, rotation: f32) -> Boundary {
        let thickness = self.segments.first().map_or(0.0, |s| s.thickness);
        build_boundary(
            self.center,
            self.radius,
            self.side_count,
            self.gap_width,
            self.gap_center,
            normalize_angle(rotation),
            thickness,
        )
    }

    /// Slots omitted by the gap
    pub fn gap_segment_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// Sum of all wall lengths (approximates 2πr minus the gap arc)
    pub fn total_length(&self) -> f32 {
        self.segments.iter().map(|s| 2.0 * s.half_length).sum()
    }

    /// Distance from the center to every chord
    pub fn apothem(&self) -> f32 {
        self.radius * (slot_step(self.side_count) / 2.0).cos()
    }

    /// Slot under a world-space point
    pub fn slot_at(&self, point: Vec2) -> u32 {
        let (_, theta) = cartesian_to_polar(point - self.center);
        let theta = (theta - self.rotation).rem_euclid(std::f32::consts::TAU);
        ((theta / slot_step(self.side_count)) as u32).min(self.side_count - 1)
    }

    /// Present segments that a disc of radius `reach` around `point` could touch
    ///
    /// Scans every slot within the disc's angular half-width, seen from the
    /// center, plus one slot either side for the segment extent.
    pub fn segments_near(
        &self,
        point: Vec2,
        reach: f32,
    ) -> impl Iterator<Item = &WallSegment> + '_ {
        let n = self.side_count;
        let (offset, _) = cartesian_to_polar(point - self.center);
        let reach = reach.max(0.0);
        let span = if reach >= offset {
            n
        } else {
            let half_width = (reach / offset).asin();
            ((half_width / slot_step(n)).ceil() as u32).saturating_add(1).min(n)
        };

        // The window covers the whole ring once it reaches halfway round
        let (first, count) = if span >= n / 2 {
            (0, n)
        } else {
            ((self.slot_at(point) + n - span) % n, 2 * span + 1)
        };
        (0..count)
            .map(move |k| (first + k) % n)
            .filter_map(move |s| self.slots[s as usize])
            .map(move |idx| &self.segments[idx])
    }

    /// World position of a sample vertex (for rendering or debugging)
    pub fn vertex(&self, slot: u32) -> Vec2 {
        let theta = slot as f32 * slot_step(self.side_count) + self.rotation;
        self.center + polar_to_cartesian(self.radius, theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_closed_ring_has_every_segment() {
        let ring = build_boundary(Vec2::ZERO, 400.0, 64, 0.0, PI, 0.0, 5.0);
        assert_eq!(ring.segments.len(), 64);
        assert_eq!(ring.gap_segment_count(), 0);
    }

    #[test]
    fn test_gap_removes_slots_around_center_angle() {
        let ring = build_boundary(Vec2::ZERO, 400.0, 1000, TAU * 0.1, PI, 0.0, 5.0);
        assert_eq!(ring.gap_segment_count(), 100);
        assert_eq!(ring.segments.len(), 1000 - ring.gap_segment_count());
        // Nothing near angle π
        let near_gap = polar_to_cartesian(399.0, PI);
        assert_eq!(ring.segments_near(near_gap, 1.0).count(), 0);
        // Opposite side is walled
        let walled = polar_to_cartesian(399.0, 0.1);
        assert!(ring.segments_near(walled, 1.0).count() > 0);
    }

    #[test]
    fn test_segment_is_chord_between_samples() {
        let ring = build_boundary(Vec2::new(10.0, -5.0), 100.0, 8, 0.0, 0.0, 0.3, 2.0);
        for seg in &ring.segments {
            let (a, b) = seg.endpoints();
            let va = ring.vertex(seg.slot);
            let vb = ring.vertex((seg.slot + 1) % ring.side_count);
            let matches_forward = a.distance(va) < 1e-3 && b.distance(vb) < 1e-3;
            let matches_backward = a.distance(vb) < 1e-3 && b.distance(va) < 1e-3;
            assert!(matches_forward || matches_backward);
            // Inward normal points at the center
            assert!(seg.inward_normal.dot(ring.center - seg.midpoint) > 0.0);
        }
    }

    #[test]
    fn test_rotation_rebuilds_segments() {
        let ring = build_boundary(Vec2::ZERO, 200.0, 12, 0.5, 0.0, 0.0, 4.0);
        let spun = ring.rotated(0.2);
        assert_eq!(ring.segments.len(), spun.segments.len());
        assert!((spun.rotation - 0.2).abs() < 1e-6);
        assert!(ring.segments[0].midpoint.distance(spun.segments[0].midpoint) > 1.0);
        // The gap travels with the ring
        assert_eq!(ring.segments[0].slot, spun.segments[0].slot);
    }

    #[test]
    fn test_triangle_neighbour_lookup_has_no_duplicates() {
        let ring = build_boundary(Vec2::ZERO, 50.0, 3, 0.0, 0.0, 0.0, 1.0);
        let near = ring.segments_near(Vec2::new(10.0, 1.0), 0.5).count();
        assert_eq!(near, 3);
    }

    proptest! {
        #[test]
        fn total_length_approximates_circumference(sides in 3u32..2000, radius in 10.0f32..1000.0) {
            let ring = build_boundary(Vec2::ZERO, radius, sides, 0.0, 0.0, 0.0, 1.0);
            let circumference = TAU * radius;
            let error = (circumference - ring.total_length()).abs() / circumference;
            // Inscribed polygon perimeter error shrinks with the side count
            prop_assert!(error <= 2.0 / sides as f32 + 1e-4);
            prop_assert!(ring.total_length() <= circumference + 1e-2 * radius);
        }

        #[test]
        fn segment_count_matches_gap(sides in 3u32..500, gap in 0.0f32..3.0, center in -PI..PI) {
            let ring = build_boundary(Vec2::ZERO, 100.0, sides, gap, center, 0.0, 1.0);
            prop_assert_eq!(
                ring.segments.len(),
                sides as usize - count_gap_slots(sides, gap, center)
            );
        }
    }
}
