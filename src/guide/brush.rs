//! Discrete brush commands against the guide hair set.
//!
//! The editor's mouse-driven stroke handling lives with the host; this
//! module only models the effect of one stroke sample on the guides, so
//! the same operations work from any input loop (or from tests).

use glam::Vec3;

use crate::guide::GuideHairSet;
use crate::physics::collider::SphereCollider;

/// One sample of a brush stroke, already projected into world space by
/// the host.
#[derive(Clone, Copy, Debug)]
pub struct StrokeSample {
    /// Brush center.
    pub position: Vec3,
    /// Points within this distance of the center are affected.
    pub radius: f32,
    /// Blend factor per sample, 0..1.
    pub opacity: f32,
}

/// Move brush: drags affected control points by a world-space offset,
/// then re-establishes guide constraints.
#[derive(Clone, Copy, Debug)]
pub struct MoveBrush {
    /// World-space displacement for this sample.
    pub delta: Vec3,
    /// Extra straightening applied while dragging (0 = none).
    pub drag_stiffness: f32,
}

/// Property brush payloads. Length and length-variation act on the whole
/// guide; the rest act per affected point.
#[derive(Clone, Copy, Debug)]
pub enum PropertyBrush {
    Color([f32; 3]),
    Length(f32),
    LengthVariation(f32),
    Thickness(f32),
    Stiffness(f32),
    Retention(f32),
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Apply one move-brush sample. Affected guides are collided against the
/// spheres, optionally straightened, then restretched around the middle
/// affected point so segment lengths stay uniform.
///
/// Returns true if any guide changed (the host should schedule a rebuild).
pub fn apply_move_brush(
    set: &mut GuideHairSet,
    stroke: &StrokeSample,
    brush: &MoveBrush,
    colliders: &[SphereCollider],
) -> bool {
    let move_by = brush.delta * stroke.opacity;
    let mut any = false;

    for guide in set.iter_mut() {
        let mut affected: Vec<usize> = Vec::new();

        // Root (index 0) is welded to the scalp and never brushed.
        for c in 1..guide.point_count() {
            if (guide.points[c] - stroke.position).length() < stroke.radius {
                guide.points[c] += move_by;
                affected.push(c);
            }
        }

        if affected.is_empty() {
            continue;
        }

        guide.collide_against_spheres(colliders);
        if brush.drag_stiffness > 0.0 {
            guide.straighten(brush.drag_stiffness * stroke.opacity);
        }
        guide.restretch_from(affected[affected.len() / 2]);
        any = true;
    }

    any
}

/// Apply one property-brush sample. Returns true if any guide changed.
pub fn apply_property_brush(
    set: &mut GuideHairSet,
    stroke: &StrokeSample,
    brush: &PropertyBrush,
) -> bool {
    let mut any = false;

    for guide in set.iter_mut() {
        let affected: Vec<usize> = (0..guide.point_count())
            .filter(|&c| (guide.points[c] - stroke.position).length() < stroke.radius)
            .collect();
        if affected.is_empty() {
            continue;
        }
        any = true;

        match *brush {
            PropertyBrush::Color(target) => {
                for &c in &affected {
                    for k in 0..3 {
                        guide.colors[c][k] = lerp(guide.colors[c][k], target[k], stroke.opacity);
                    }
                }
            }
            PropertyBrush::Length(target) => {
                let new_len = lerp(guide.length, target, stroke.opacity);
                guide.change_length(new_len);
            }
            PropertyBrush::LengthVariation(target) => {
                guide.length_variation = lerp(guide.length_variation, target, stroke.opacity);
            }
            PropertyBrush::Thickness(target) => {
                for &c in &affected {
                    guide.thickness[c] = lerp(guide.thickness[c], target, stroke.opacity);
                }
            }
            PropertyBrush::Stiffness(target) => {
                for &c in &affected {
                    guide.stiffness[c] = lerp(guide.stiffness[c], target, stroke.opacity);
                }
            }
            PropertyBrush::Retention(target) => {
                for &c in &affected {
                    guide.retention[c] = lerp(guide.retention[c], target, stroke.opacity);
                }
            }
        }
    }

    any
}
