//! Enemy spawning and pooling
//!
//! Enemies listed in the level are only created once the player comes
//! within a screen width of them. Enemies that die or wander too far from
//! the player are switched off and parked in a pool, and the next spawn of
//! the same kind takes one from there instead of allocating.

use macroquad::prelude::Vec2;
use crate::game::{Entity, World};
use crate::level::EnemySpawn;

/// Extra distance beyond the canvas before an enemy is parked
pub const DESPAWN_MARGIN: f32 = 500.0;

pub struct EnemyGroup {
    pending: Vec<EnemySpawn>,
    members: Vec<Entity>,
    pool: Vec<Entity>,
}

impl EnemyGroup {
    pub fn new(spawns: Vec<EnemySpawn>) -> Self {
        Self {
            pending: spawns,
            members: Vec::new(),
            pool: Vec::new(),
        }
    }

    /// Active enemies.
    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    fn create(&mut self, world: &mut World, spawn: EnemySpawn) -> Entity {
        let pooled = self
            .pool
            .iter()
            .position(|&e| world.enemies.get(e).is_some_and(|enemy| enemy.kind == spawn.kind));

        if let Some(idx) = pooled {
            let entity = self.pool.swap_remove(idx);
            if let Some((enemy, body)) = world.enemy_mut(entity) {
                enemy.restore(body, spawn.x, spawn.y);
                return entity;
            }
        }
        world.spawn_enemy(spawn.kind, spawn.x, spawn.y)
    }

    /// Spawn enemies the player has come close to, park the ones that have
    /// died or fallen out of range, and face sprites along their velocity.
    pub fn update(&mut self, world: &mut World, player: Vec2, canvas: Vec2) {
        let mut due = Vec::new();
        self.pending.retain(|spawn| {
            let close = (player.x - spawn.x).abs() < canvas.x;
            if close {
                due.push(*spawn);
            }
            !close
        });
        for spawn in due {
            let entity = self.create(world, spawn);
            log::debug!("Spawned {:?} at ({}, {})", spawn.kind, spawn.x, spawn.y);
            self.members.push(entity);
        }

        let max = Vec2::new(DESPAWN_MARGIN + canvas.x, DESPAWN_MARGIN + canvas.y);
        let mut parked = Vec::new();
        for &entity in &self.members {
            let Some((enemy, body)) = world.enemy_mut(entity) else {
                parked.push(entity);
                continue;
            };
            if enemy.active {
                let offset = (player - body.center()).abs();
                if offset.x > max.x || offset.y > max.y {
                    enemy.active = false;
                    body.disable();
                }
                enemy.flip_x = body.velocity.x < 0.0;
            }
            if !enemy.active {
                parked.push(entity);
            }
        }

        for entity in parked {
            self.members.retain(|&e| e != entity);
            if world.is_alive(entity) {
                self.pool.push(entity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::prelude::Rect;
    use crate::enemies::EnemyKind;
    use crate::game::Events;

    const CANVAS: Vec2 = Vec2::new(400.0, 240.0);

    fn world() -> World {
        World::new(Rect::new(0.0, 0.0, 4000.0, 240.0))
    }

    fn spawn(kind: EnemyKind, x: f32) -> EnemySpawn {
        EnemySpawn { kind, x, y: 208.0 }
    }

    #[test]
    fn test_spawns_only_near_player() {
        let mut world = world();
        let mut group = EnemyGroup::new(vec![
            spawn(EnemyKind::Goomba, 300.0),
            spawn(EnemyKind::Goomba, 900.0),
        ]);

        group.update(&mut world, Vec2::new(48.0, 200.0), CANVAS);
        assert_eq!(group.members().len(), 1);
        assert_eq!(group.pending_len(), 1);

        group.update(&mut world, Vec2::new(600.0, 200.0), CANVAS);
        assert_eq!(group.members().len(), 2);
        assert_eq!(group.pending_len(), 0);
    }

    #[test]
    fn test_far_enemies_are_parked() {
        let mut world = world();
        let mut group = EnemyGroup::new(vec![spawn(EnemyKind::Goomba, 300.0)]);
        group.update(&mut world, Vec2::new(48.0, 200.0), CANVAS);
        let entity = group.members()[0];

        let far_right = Vec2::new(300.0 + DESPAWN_MARGIN + CANVAS.x + 10.0, 200.0);
        group.update(&mut world, far_right, CANVAS);

        assert!(group.members().is_empty());
        assert_eq!(group.pool_len(), 1);
        assert!(!world.enemies.get(entity).unwrap().active);
        assert!(!world.bodies.get(entity).unwrap().enabled);
    }

    #[test]
    fn test_dead_enemy_is_reused_for_same_kind() {
        let mut world = world();
        let mut events = Events::new();
        let mut group = EnemyGroup::new(vec![
            spawn(EnemyKind::Goomba, 100.0),
            spawn(EnemyKind::Turtle, 1000.0),
            spawn(EnemyKind::Goomba, 1200.0),
        ]);
        group.update(&mut world, Vec2::new(48.0, 200.0), CANVAS);
        let first = group.members()[0];

        let (enemy, body) = world.enemy_mut(first).unwrap();
        enemy.die(body, false, &mut events);
        enemy.update(body, 1.0);
        group.update(&mut world, Vec2::new(48.0, 200.0), CANVAS);
        assert_eq!(group.pool_len(), 1);

        // the turtle can't take the goomba's slot; the second goomba can
        group.update(&mut world, Vec2::new(1000.0, 200.0), CANVAS);
        assert_eq!(group.pool_len(), 0);
        assert!(group.members().contains(&first));
        assert_eq!(world.enemies.count(), 2);

        let (enemy, body) = (world.enemies.get(first).unwrap(), world.bodies.get(first).unwrap());
        assert!(enemy.active && !enemy.dead);
        assert_eq!(body.center().x, 1200.0);
    }

    #[test]
    fn test_sprite_faces_velocity() {
        let mut world = world();
        let mut group = EnemyGroup::new(vec![spawn(EnemyKind::Goomba, 100.0)]);
        group.update(&mut world, Vec2::new(48.0, 200.0), CANVAS);
        let entity = group.members()[0];

        world.bodies.get_mut(entity).unwrap().velocity.x = 30.0;
        group.update(&mut world, Vec2::new(48.0, 200.0), CANVAS);
        assert!(!world.enemies.get(entity).unwrap().flip_x);
    }
}
