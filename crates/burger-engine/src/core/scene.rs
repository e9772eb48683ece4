use crate::api::game::FrameContext;
use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::components::snapshot::Snapshot;

/// Arena of top-level entities, stored by value in a flat Vec.
/// Sized for a level's worth of actors (tens, not thousands).
pub struct Scene {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
            next_id: 1,
        }
    }

    /// Allocate a fresh entity ID. IDs are never reused within a scene's lifetime.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an entity to the scene. It updates after every entity spawned before it.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Look up an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Look up an entity by ID for mutation.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Entities in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Entities in spawn order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    /// Find all entities with the given tag.
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<&Entity> {
        self.entities.iter().filter(|e| e.tag == tag).collect()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether nothing has been spawned since the last clear.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every entity (and with it every component) at once.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Describe every enabled entity in `snapshot`, replacing what it held.
    pub fn publish(&self, snapshot: &mut Snapshot) {
        snapshot.clear();
        for entity in &self.entities {
            entity.publish(snapshot);
        }
    }

    /// Update every enabled entity in spawn order.
    pub fn update(&mut self, ctx: &mut FrameContext<'_>, dt: f32) {
        for entity in &mut self.entities {
            entity.update(ctx, dt);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
