//! Game World
//!
//! The World is the container for every non-player object in a level:
//! - Entity allocation and lifetime tracking
//! - Component storage for bodies and the per-kind behaviour state
//! - Deferred entity despawn (to avoid iterator invalidation)
//! - The physics bounds of the room the player is in
//!
//! Components are stored in typed fields rather than a HashMap<TypeId, ...>
//! because we know exactly what components the level needs.

use macroquad::prelude::{Rect, Vec2};
use super::entity::{Entity, EntityAllocator};
use super::component::ComponentStorage;
use super::body::Body;
use crate::coin_spin::CoinSpin;
use crate::enemies::{Enemy, EnemyKind};
use crate::fireball::Fireball;
use crate::power_ups::{PowerUp, PowerUpKind};

pub struct World {
    entities: EntityAllocator,

    /// Entities queued for despawn at end of frame
    despawn_queue: Vec<Entity>,

    /// Physics bodies, one per moving entity
    pub bodies: ComponentStorage<Body>,

    pub enemies: ComponentStorage<Enemy>,
    pub power_ups: ComponentStorage<PowerUp>,
    pub fireballs: ComponentStorage<Fireball>,
    /// Spinning coins popped from blocks (no body, purely visual)
    pub coins: ComponentStorage<CoinSpin>,

    /// Room rectangle bodies live in; falling below it kills
    pub bounds: Rect,
}

impl World {
    pub fn new(bounds: Rect) -> Self {
        Self {
            entities: EntityAllocator::new(),
            despawn_queue: Vec::new(),
            bodies: ComponentStorage::new(),
            enemies: ComponentStorage::new(),
            power_ups: ComponentStorage::new(),
            fireballs: ComponentStorage::new(),
            coins: ComponentStorage::new(),
            bounds,
        }
    }

    // =========================================================================
    // Entity Management
    // =========================================================================

    pub fn spawn(&mut self) -> Entity {
        self.entities.allocate()
    }

    /// Spawn an entity with a physics body.
    pub fn spawn_body(&mut self, body: Body) -> Entity {
        let entity = self.spawn();
        self.bodies.insert(entity, body);
        entity
    }

    /// Queue an entity for despawn at end of frame.
    pub fn despawn(&mut self, entity: Entity) {
        if self.is_alive(entity) && !self.despawn_queue.contains(&entity) {
            self.despawn_queue.push(entity);
        }
    }

    /// Immediately despawn an entity and all its components.
    /// Prefer `despawn()` during gameplay to avoid iterator issues.
    pub fn despawn_immediate(&mut self, entity: Entity) {
        if !self.entities.free(entity) {
            return;
        }
        self.bodies.remove(entity);
        self.enemies.remove(entity);
        self.power_ups.remove(entity);
        self.fireballs.remove(entity);
        self.coins.remove(entity);
    }

    /// Process all queued despawns. Call at end of frame.
    pub fn flush_despawns(&mut self) {
        let queue = std::mem::take(&mut self.despawn_queue);
        for entity in queue {
            self.despawn_immediate(entity);
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    // =========================================================================
    // Convenience Spawners
    // =========================================================================

    /// Spawn an enemy standing with its feet at `(x, y)`.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, x: f32, y: f32) -> Entity {
        let entity = self.spawn_body(Enemy::body(kind, x, y));
        self.enemies.insert(entity, Enemy::new(kind));
        entity
    }

    /// Spawn a power-up emerging from the block whose top-left is `(x, y)`.
    pub fn spawn_power_up(&mut self, kind: PowerUpKind, x: f32, y: f32) -> Entity {
        let (power_up, body) = PowerUp::emerge(kind, x, y);
        let entity = self.spawn_body(body);
        self.power_ups.insert(entity, power_up);
        entity
    }

    pub fn spawn_fireball(&mut self, center: Vec2, facing_left: bool) -> Entity {
        let (fireball, body) = Fireball::launch(center, facing_left);
        let entity = self.spawn_body(body);
        self.fireballs.insert(entity, fireball);
        entity
    }

    pub fn spawn_coin(&mut self, x: f32, y: f32) -> Entity {
        let entity = self.spawn();
        self.coins.insert(entity, CoinSpin::new(x, y));
        entity
    }

    /// An enemy together with its body.
    pub fn enemy_mut(&mut self, entity: Entity) -> Option<(&mut Enemy, &mut Body)> {
        Some((self.enemies.get_mut(entity)?, self.bodies.get_mut(entity)?))
    }

    pub fn power_up_mut(&mut self, entity: Entity) -> Option<(&mut PowerUp, &mut Body)> {
        Some((self.power_ups.get_mut(entity)?, self.bodies.get_mut(entity)?))
    }

    pub fn fireball_mut(&mut self, entity: Entity) -> Option<(&mut Fireball, &mut Body)> {
        Some((self.fireballs.get_mut(entity)?, self.bodies.get_mut(entity)?))
    }

    /// Fireballs still flying or exploding.
    pub fn live_fireballs(&self) -> usize {
        self.fireballs.iter().filter(|(_, f)| f.is_active()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(Rect::new(0.0, 0.0, 400.0, 240.0))
    }

    #[test]
    fn test_spawn_and_despawn() {
        let mut world = world();

        let e1 = world.spawn_enemy(EnemyKind::Goomba, 100.0, 200.0);
        let e2 = world.spawn_coin(40.0, 40.0);
        assert_eq!(world.entity_count(), 2);
        assert!(world.bodies.contains(e1));
        assert!(!world.bodies.contains(e2));

        world.despawn_immediate(e1);
        assert_eq!(world.entity_count(), 1);
        assert!(!world.is_alive(e1));
        assert!(!world.enemies.contains(e1));
        assert!(world.is_alive(e2));
    }

    #[test]
    fn test_deferred_despawn_waits_for_flush() {
        let mut world = world();
        let e = world.spawn_power_up(PowerUpKind::Mushroom, 32.0, 64.0);

        world.despawn(e);
        world.despawn(e);
        assert!(world.is_alive(e));

        world.flush_despawns();
        assert!(!world.is_alive(e));
        assert!(!world.power_ups.contains(e));
    }

    #[test]
    fn test_reused_slot_does_not_alias_old_components() {
        let mut world = world();
        let old = world.spawn_enemy(EnemyKind::Turtle, 0.0, 0.0);
        world.despawn_immediate(old);
        let new = world.spawn_coin(0.0, 0.0);

        assert_eq!(old.index(), new.index());
        assert!(world.enemies.get(new).is_none());
        assert!(world.coins.get(old).is_none());
    }
}
