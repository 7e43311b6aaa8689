use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::easing::EasingFunction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
/// Reactant → product animation timing and placement.
pub struct AnimationOptions {
    /// Radius of the ring the reactants start on.
    #[schemars(title = "Ring Radius", range(min = 1.0, max = 20.0), extend("step" = 0.5))]
    pub ring_radius: f32,
    /// Frames for reactants to converge on the origin.
    #[schemars(title = "React Frames", range(min = 1, max = 240))]
    pub react_frames: u32,
    /// Frames the products are held after the mix.
    #[schemars(title = "Hold Frames", range(min = 0, max = 240))]
    pub hold_frames: u32,
    /// How far below their final slot the products start.
    #[schemars(skip)]
    pub product_rise: f32,
    /// Playback rate written into the stage.
    #[schemars(title = "Frames Per Second", range(min = 1.0, max = 120.0))]
    pub frames_per_second: f32,
    /// Curve applied to translations between keyframes.
    #[schemars(skip)]
    pub easing: EasingFunction,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            ring_radius: 5.0,
            react_frames: 24,
            hold_frames: 24,
            product_rise: 2.0,
            frames_per_second: 24.0,
            easing: EasingFunction::Linear,
        }
    }
}
