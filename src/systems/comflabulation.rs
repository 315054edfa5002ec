use crate::components::Comflabulation;
use crate::ecs::Entity;

use super::{ComponentSystem, SystemRefs};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComflabulationSystem;

impl ComflabulationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl ComponentSystem for ComflabulationSystem {
    type Required = (Comflabulation,);

    const NAME: &'static str = "comflabulation";

    fn update_entity(&self, _entity: Entity, (comflab,): SystemRefs<'_, Self>, _dt: f32) {
        comflab.thingy *= 1.000001;
        comflab.mingy = !comflab.mingy;
        comflab.dingy += 1;
    }
}
