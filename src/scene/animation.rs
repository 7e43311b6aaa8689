//! Reactant → product animation.
//!
//! Reactants start on a ring around the origin and converge on it; at the
//! mix frame they disappear and the products, which have been rising from
//! below into an inner ring, become visible and hold until the end frame.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::model::Role;
use crate::options::AnimationOptions;
use crate::util::easing::EasingFunction;

/// Smallest radius of the product ring.
const MIN_PRODUCT_RING_RADIUS: f32 = 1.2;

/// Product ring radius as a fraction of the reactant ring radius.
const PRODUCT_RING_SCALE: f32 = 0.4;

/// Translation and visibility of one molecule at one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Frame number.
    pub frame: u32,
    /// Offset of the molecule's root.
    pub translate: Vec3,
    /// Whether the molecule is shown from this frame on.
    pub visible: bool,
}

/// Keyframes driving one molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Which side of the reaction the molecule is on.
    pub role: Role,
    /// Index into the reactant or product list.
    pub index: usize,
    /// Molecule display name.
    pub name: String,
    /// Keyframes in ascending frame order.
    pub keyframes: Vec<Keyframe>,
}

impl Track {
    /// Translation and visibility at `frame`.
    ///
    /// Translation is interpolated between the surrounding keyframes through
    /// `easing`; visibility holds the value of the last keyframe at or
    /// before `frame`. Frames outside the keyframe range clamp to the ends.
    #[must_use]
    pub fn sample(&self, frame: f32, easing: EasingFunction) -> (Vec3, bool) {
        let (Some(first), Some(last)) =
            (self.keyframes.first(), self.keyframes.last())
        else {
            return (Vec3::ZERO, true);
        };
        if frame <= first.frame as f32 {
            return (first.translate, first.visible);
        }
        if frame >= last.frame as f32 {
            return (last.translate, last.visible);
        }

        for pair in self.keyframes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (fa, fb) = (a.frame as f32, b.frame as f32);
            if frame >= fa && frame < fb {
                let t = easing.evaluate((frame - fa) / (fb - fa));
                return (a.translate.lerp(b.translate, t), a.visible);
            }
        }
        (last.translate, last.visible)
    }
}

/// Positions evenly spaced on a circle of `radius` in the XZ plane,
/// starting on +X.
#[must_use]
pub fn ring_layout(count: usize, radius: f32) -> Vec<Vec3> {
    let step = TAU / count.max(1) as f32;
    (0..count)
        .map(|i| {
            let angle = i as f32 * step;
            Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
        })
        .collect()
}

/// Complete reaction animation: a track per molecule and the frame range.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionAnimation {
    /// First frame.
    pub start_frame: u32,
    /// Frame at which reactants vanish and products appear.
    pub mix_frame: u32,
    /// Last frame.
    pub end_frame: u32,
    /// Playback rate.
    pub frames_per_second: f32,
    /// Curve applied between translation keyframes.
    pub easing: EasingFunction,
    /// Reactant tracks first, then product tracks, in record order.
    pub tracks: Vec<Track>,
}

impl ReactionAnimation {
    /// Build tracks for the named reactants and products.
    #[must_use]
    pub fn build(
        reactants: &[&str],
        products: &[&str],
        options: &AnimationOptions,
    ) -> Self {
        let start = 0;
        let mix = options.react_frames.max(1);
        let end = mix + options.hold_frames;

        let outer = ring_layout(reactants.len(), options.ring_radius);
        let inner_radius = (options.ring_radius * PRODUCT_RING_SCALE)
            .max(MIN_PRODUCT_RING_RADIUS);
        let inner = ring_layout(products.len(), inner_radius);
        let rise = Vec3::Y * options.product_rise;

        let mut tracks = Vec::with_capacity(reactants.len() + products.len());
        for (index, (name, pos)) in reactants.iter().zip(outer).enumerate() {
            tracks.push(Track {
                role: Role::Reactant,
                index,
                name: (*name).to_owned(),
                keyframes: vec![
                    Keyframe {
                        frame: start,
                        translate: pos,
                        visible: true,
                    },
                    Keyframe {
                        frame: mix,
                        translate: Vec3::ZERO,
                        visible: false,
                    },
                ],
            });
        }
        for (index, (name, pos)) in products.iter().zip(inner).enumerate() {
            tracks.push(Track {
                role: Role::Product,
                index,
                name: (*name).to_owned(),
                keyframes: vec![
                    Keyframe {
                        frame: start,
                        translate: pos - rise,
                        visible: false,
                    },
                    Keyframe {
                        frame: mix,
                        translate: pos,
                        visible: true,
                    },
                    Keyframe {
                        frame: end,
                        translate: pos,
                        visible: true,
                    },
                ],
            });
        }

        Self {
            start_frame: start,
            mix_frame: mix,
            end_frame: end,
            frames_per_second: options.frames_per_second,
            easing: options.easing,
            tracks,
        }
    }

    /// Sample one track at `frame` with this animation's easing.
    #[must_use]
    pub fn sample(&self, track: &Track, frame: f32) -> (Vec3, bool) {
        track.sample(frame, self.easing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < EPS
    }

    #[test]
    fn ring_layout_spaces_evenly() {
        let ring = ring_layout(4, 2.0);
        assert_eq!(ring.len(), 4);
        assert!(close(ring[0], Vec3::new(2.0, 0.0, 0.0)));
        assert!(close(ring[1], Vec3::new(0.0, 0.0, 2.0)));
        assert!(close(ring[2], Vec3::new(-2.0, 0.0, 0.0)));
        assert!(ring.iter().all(|p| (p.length() - 2.0).abs() < EPS));
        assert!(ring_layout(0, 2.0).is_empty());
    }

    #[test]
    fn frame_range_follows_options() {
        let anim = ReactionAnimation::build(
            &["H2", "O2"],
            &["H2O"],
            &AnimationOptions::default(),
        );
        assert_eq!(anim.start_frame, 0);
        assert_eq!(anim.mix_frame, 24);
        assert_eq!(anim.end_frame, 48);
        assert_eq!(anim.tracks.len(), 3);
        assert_eq!(anim.tracks[2].role, Role::Product);
    }

    #[test]
    fn reactants_converge_and_vanish() {
        let anim = ReactionAnimation::build(
            &["H2", "O2"],
            &["H2O"],
            &AnimationOptions::default(),
        );
        let h2 = &anim.tracks[0];
        let (p0, v0) = anim.sample(h2, 0.0);
        assert!(close(p0, Vec3::new(5.0, 0.0, 0.0)));
        assert!(v0);

        let (mid, v_mid) = anim.sample(h2, 12.0);
        assert!(close(mid, Vec3::new(2.5, 0.0, 0.0)));
        assert!(v_mid);

        let (p_mix, v_mix) = anim.sample(h2, 24.0);
        assert!(close(p_mix, Vec3::ZERO));
        assert!(!v_mix);
        assert!(!anim.sample(h2, 40.0).1);
    }

    #[test]
    fn products_rise_into_inner_ring() {
        let anim = ReactionAnimation::build(
            &["H2"],
            &["H2O"],
            &AnimationOptions::default(),
        );
        let water = &anim.tracks[1];
        // Inner ring radius is max(1.2, 0.4 * 5.0) = 2.0.
        let slot = Vec3::new(2.0, 0.0, 0.0);
        let (start, shown) = anim.sample(water, 0.0);
        assert!(close(start, slot - Vec3::Y * 2.0));
        assert!(!shown);
        let (at_mix, shown) = anim.sample(water, 24.0);
        assert!(close(at_mix, slot));
        assert!(shown);
        assert!(close(anim.sample(water, 100.0).0, slot));
    }

    #[test]
    fn easing_shapes_intermediate_frames() {
        let options = AnimationOptions {
            easing: EasingFunction::QuadraticIn,
            ..AnimationOptions::default()
        };
        let anim = ReactionAnimation::build(&["A"], &[], &options);
        let (mid, _) = anim.sample(&anim.tracks[0], 12.0);
        // Quadratic ease-in covers a quarter of the way at half time.
        assert!(close(mid, Vec3::new(3.75, 0.0, 0.0)));
    }

    #[test]
    fn zero_react_frames_still_advances() {
        let options = AnimationOptions {
            react_frames: 0,
            hold_frames: 0,
            ..AnimationOptions::default()
        };
        let anim = ReactionAnimation::build(&["A"], &["B"], &options);
        assert_eq!(anim.mix_frame, 1);
        assert_eq!(anim.end_frame, 1);
    }
}
