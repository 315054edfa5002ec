use serde::{Deserialize, Serialize};

use crate::ecs::Component;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Component for Position {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Component for Velocity {}

/// Synthetic load used to compare ECS iteration throughput.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comflabulation {
    pub thingy: f32,
    pub dingy: i32,
    pub mingy: bool,
}

impl Default for Comflabulation {
    fn default() -> Self {
        Self {
            thingy: 1.0,
            dingy: 0,
            mingy: false,
        }
    }
}

impl Component for Comflabulation {}
