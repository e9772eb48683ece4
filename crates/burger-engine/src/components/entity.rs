use std::fmt;

use glam::Vec2;

use crate::api::game::FrameContext;
use crate::api::types::EntityId;
use crate::components::character::CharacterAction;
use crate::components::collision::Gates;
use crate::components::snapshot::Snapshot;
use crate::core::geometry::{BoundingBox, Rect};

/// A unit of behaviour owned by exactly one entity.
pub trait Component: fmt::Debug {
    /// Advance by `dt` seconds. The owning entity is passed in mutably; its
    /// component list is empty for the duration of the call.
    fn update(&mut self, entity: &mut Entity, ctx: &mut FrameContext<'_>, dt: f32);

    /// Describe the owning entity in the step snapshot.
    fn publish(&self, _entity: &Entity, _snapshot: &mut Snapshot) {}
}

/// Fat Entity — position, optional collision data and an ordered component list.
#[derive(Debug)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by role.
    pub tag: String,
    /// Position in world space (top-left of the bounding box).
    pub pos: Vec2,
    /// Bounding box (optional — entities without one are not collidable).
    pub bbox: Option<BoundingBox>,
    /// Gate results from the last collision probe, if the entity is collision-gated.
    pub gates: Option<Gates>,
    /// Observable character state for presentation.
    pub action: CharacterAction,
    active: bool,
    components: Vec<Box<dyn Component>>,
}

impl Entity {
    /// Create a new enabled entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            pos: Vec2::ZERO,
            bbox: None,
            gates: None,
            action: CharacterAction::Idle,
            active: true,
            components: Vec::new(),
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Mark the entity as collision-gated, starting with `gates`.
    pub fn with_gates(mut self, gates: Gates) -> Self {
        self.gates = Some(gates);
        self
    }

    pub fn with_component(mut self, component: impl Component + 'static) -> Self {
        self.add_component(component);
        self
    }

    /// Append a component; it updates after every component added before it.
    pub fn add_component(&mut self, component: impl Component + 'static) {
        self.components.push(Box::new(component));
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// World-space rectangle, recomputed from the current position.
    pub fn rect(&self) -> Option<Rect> {
        self.bbox.map(|b| b.at(self.pos))
    }

    pub fn enable(&mut self) {
        self.active = true;
    }

    pub fn disable(&mut self) {
        self.active = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.active
    }

    /// Tick every component in insertion order. Disabled entities do nothing.
    pub fn update(&mut self, ctx: &mut FrameContext<'_>, dt: f32) {
        if !self.active {
            return;
        }
        let mut components = std::mem::take(&mut self.components);
        for component in components.iter_mut() {
            component.update(self, ctx, dt);
        }
        // keep anything a component attached during its update
        components.append(&mut self.components);
        self.components = components;
    }

    pub fn publish(&self, snapshot: &mut Snapshot) {
        if !self.active {
            return;
        }
        for component in &self.components {
            component.publish(self, snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::game::GameConfig;
    use crate::core::dispatcher::MessageDispatcher;
    use crate::level::Level;

    /// Moves its entity right by `speed * dt` and records the order it ran in.
    #[derive(Debug)]
    struct Mover {
        speed: f32,
        label: u32,
    }

    impl Component for Mover {
        fn update(&mut self, entity: &mut Entity, _ctx: &mut FrameContext<'_>, dt: f32) {
            entity.pos.x += self.speed * dt;
            entity.pos.y = entity.pos.y * 10.0 + self.label as f32;
        }

        fn publish(&self, entity: &Entity, snapshot: &mut Snapshot) {
            snapshot.player = entity.rect();
        }
    }

    fn run(entity: &mut Entity, dt: f32) {
        let mut dispatcher = MessageDispatcher::new();
        let level = Level::default();
        let snapshot = Snapshot::new();
        let config = GameConfig::default();
        let mut sounds = Vec::new();
        let mut ctx = FrameContext::new(&mut dispatcher, &level, &snapshot, &config, &mut sounds);
        entity.update(&mut ctx, dt);
    }

    #[test]
    fn components_update_in_insertion_order() {
        let mut e = Entity::new(EntityId(1))
            .with_component(Mover { speed: 1.0, label: 1 })
            .with_component(Mover { speed: 1.0, label: 2 });
        run(&mut e, 1.0);
        assert_eq!(e.pos, Vec2::new(2.0, 12.0));
        assert_eq!(e.component_count(), 2);
    }

    #[test]
    fn disabled_entity_skips_update_and_publish() {
        let mut e = Entity::new(EntityId(1))
            .with_bbox(BoundingBox::new(16.0, 32.0))
            .with_component(Mover { speed: 5.0, label: 0 });
        e.disable();
        run(&mut e, 1.0);
        assert_eq!(e.pos, Vec2::ZERO);

        let mut snapshot = Snapshot::new();
        e.publish(&mut snapshot);
        assert!(snapshot.player.is_none());

        e.enable();
        e.publish(&mut snapshot);
        assert!(snapshot.player.is_some());
    }

    #[test]
    fn rect_follows_position() {
        let mut e = Entity::new(EntityId(1)).with_bbox(BoundingBox::new(16.0, 32.0));
        e.set_pos(Vec2::new(10.0, 20.0));
        let r = e.rect().unwrap();
        assert_eq!(r.min, Vec2::new(10.0, 20.0));
        assert_eq!(r.max, Vec2::new(26.0, 52.0));
        assert!(Entity::new(EntityId(2)).rect().is_none());
    }
}
