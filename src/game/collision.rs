//! Collision System
//!
//! Arcade-style body integration against the tile grid, plus the
//! body-vs-body contact test used by overlap callbacks.
//!
//! Bodies move one axis at a time: X first, then Y. After each axis the
//! body is pushed out of any solid tile face it crossed, and every tile it
//! was stopped by is reported so the scene can run its collider callbacks.
//! A face only stops a body that was outside it at the start of the step,
//! which lets the player jump up through a hidden block's open sides.

use macroquad::prelude::Vec2;
use crate::level::{TileMap, TILE_SIZE};
use super::body::{Body, Faces};

/// Small inset so touching edges don't count as overlapping the next cell.
const EDGE_EPSILON: f32 = 0.01;

/// Pixels of vertical slack when deciding an overlap was a stomp.
const STOMP_TOLERANCE: f32 = 4.0;

/// Which side of the body met the tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Up,
    Down,
    Left,
    Right,
}

/// A tile that stopped a body this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileHit {
    pub col: i32,
    pub row: i32,
    pub side: Side,
}

/// Integrate one step of motion and resolve against the tile map.
pub fn step_body(body: &mut Body, map: &TileMap, gravity: f32, dt: f32) -> Vec<TileHit> {
    let mut hits = Vec::new();
    body.prev_pos = body.pos;
    body.blocked = Faces::NONE;
    body.touching = Faces::NONE;

    if !body.enabled {
        return hits;
    }

    if body.allow_gravity {
        body.velocity.y += gravity * dt;
    }
    body.velocity += body.acceleration * dt;

    if body.acceleration.x == 0.0 && body.drag_x > 0.0 {
        let slow = body.drag_x * dt;
        body.velocity.x = if body.velocity.x.abs() <= slow {
            0.0
        } else {
            body.velocity.x - slow * body.velocity.x.signum()
        };
    }

    body.velocity = body.velocity.clamp(-body.max_velocity, body.max_velocity);

    body.pos.x += body.velocity.x * dt;
    if body.check_collision {
        resolve_x(body, map, &mut hits);
    }

    body.pos.y += body.velocity.y * dt;
    if body.check_collision {
        resolve_y(body, map, &mut hits);
    }

    hits
}

fn tile_span(start: f32, end: f32) -> std::ops::RangeInclusive<i32> {
    let first = (start / TILE_SIZE).floor() as i32;
    let last = ((end - EDGE_EPSILON) / TILE_SIZE).floor() as i32;
    first..=last
}

fn resolve_x(body: &mut Body, map: &TileMap, hits: &mut Vec<TileHit>) {
    let rows = tile_span(body.top(), body.bottom());

    if body.velocity.x > 0.0 {
        let prev_right = body.prev_pos.x + body.size.x;
        for col in tile_span(prev_right, body.right() + EDGE_EPSILON) {
            let tile_left = col as f32 * TILE_SIZE;
            if prev_right > tile_left + EDGE_EPSILON {
                continue;
            }
            let stopping: Vec<i32> = rows
                .clone()
                .filter(|&row| map.get(col, row).is_some_and(|t| t.collides_left()))
                .collect();
            if !stopping.is_empty() && body.right() > tile_left {
                body.pos.x = tile_left - body.size.x;
                body.velocity.x = 0.0;
                body.blocked.right = true;
                let side = Side::Right;
                hits.extend(stopping.into_iter().map(|row| TileHit { col, row, side }));
                return;
            }
        }
    } else if body.velocity.x < 0.0 {
        let prev_left = body.prev_pos.x;
        for col in tile_span(body.left(), prev_left).rev() {
            let tile_right = (col + 1) as f32 * TILE_SIZE;
            if prev_left < tile_right - EDGE_EPSILON {
                continue;
            }
            let stopping: Vec<i32> = rows
                .clone()
                .filter(|&row| map.get(col, row).is_some_and(|t| t.collides_right()))
                .collect();
            if !stopping.is_empty() && body.left() < tile_right {
                body.pos.x = tile_right;
                body.velocity.x = 0.0;
                body.blocked.left = true;
                hits.extend(stopping.into_iter().map(|row| TileHit { col, row, side: Side::Left }));
                return;
            }
        }
    }
}

fn resolve_y(body: &mut Body, map: &TileMap, hits: &mut Vec<TileHit>) {
    let cols = tile_span(body.left(), body.right());

    if body.velocity.y > 0.0 {
        let prev_bottom = body.prev_bottom();
        for row in tile_span(prev_bottom, body.bottom() + EDGE_EPSILON) {
            let tile_top = row as f32 * TILE_SIZE;
            if prev_bottom > tile_top + EDGE_EPSILON {
                continue;
            }
            let stopping: Vec<i32> = cols
                .clone()
                .filter(|&col| map.get(col, row).is_some_and(|t| t.collides_top()))
                .collect();
            if !stopping.is_empty() && body.bottom() > tile_top - EDGE_EPSILON {
                body.pos.y = tile_top - body.size.y;
                body.velocity.y =
                    if body.bounce_y > 0.0 { -body.velocity.y * body.bounce_y } else { 0.0 };
                body.blocked.down = true;
                hits.extend(stopping.into_iter().map(|col| TileHit { col, row, side: Side::Down }));
                return;
            }
        }
    } else if body.velocity.y < 0.0 {
        let prev_top = body.prev_top();
        for row in tile_span(body.top(), prev_top).rev() {
            let tile_bottom = (row + 1) as f32 * TILE_SIZE;
            if prev_top < tile_bottom - EDGE_EPSILON {
                continue;
            }
            let stopping: Vec<i32> = cols
                .clone()
                .filter(|&col| map.get(col, row).is_some_and(|t| t.collides_bottom()))
                .collect();
            if !stopping.is_empty() && body.top() < tile_bottom {
                body.pos.y = tile_bottom;
                body.velocity.y = 0.0;
                body.blocked.up = true;
                hits.extend(stopping.into_iter().map(|col| TileHit { col, row, side: Side::Up }));
                return;
            }
        }
    }
}

/// AABB overlap test between two enabled bodies.
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.enabled && b.enabled && a.rect().overlaps(&b.rect())
}

/// Work out which faces of two overlapping bodies are touching, and record
/// them on both bodies. Vertical contact wins when `a` was above `b` at the
/// start of the step, or when the vertical penetration is the shallower one.
pub fn touch(a: &mut Body, b: &mut Body) {
    let overlap_x = a.right().min(b.right()) - a.left().max(b.left());
    let overlap_y = a.bottom().min(b.bottom()) - a.top().max(b.top());
    let a_center: Vec2 = a.center();
    let b_center: Vec2 = b.center();

    let was_above = a.prev_bottom() <= b.prev_top() + STOMP_TOLERANCE;
    let was_below = b.prev_bottom() <= a.prev_top() + STOMP_TOLERANCE;

    if was_above || was_below || overlap_y <= overlap_x {
        if was_above || (!was_below && a_center.y < b_center.y) {
            a.touching.down = true;
            b.touching.up = true;
        } else {
            a.touching.up = true;
            b.touching.down = true;
        }
    } else if a_center.x < b_center.x {
        a.touching.right = true;
        b.touching.left = true;
    } else {
        a.touching.left = true;
        b.touching.right = true;
    }
}

/// The player landed on top of the enemy: player touching down, enemy
/// touching up, and the player actually moving vertically.
pub fn is_stomp(player: &Body, enemy: &Body) -> bool {
    player.touching.down && enemy.touching.up && player.velocity.y != 0.0
}
