//! Shape sprites
//!
//! Everything in the level is drawn from rectangles, circles and triangles
//! in world space. The world camera is already set when these run.

use macroquad::prelude::*;
use crate::brick::Brick;
use crate::coin_spin::CoinSpin;
use crate::enemies::{Enemy, EnemyKind, EnemyState};
use crate::fireball::Fireball;
use crate::game::Body;
use crate::level::{TileKind, TileMap};
use crate::player::{Anim, Avatar, Form};
use crate::power_ups::{PowerUp, PowerUpKind};
use crate::scene::Scene;

/// `0xRRGGBB` to an opaque color.
pub const fn rgb(hex: u32) -> Color {
    Color::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    )
}

const GROUND: Color = rgb(0xc84c0c);
const GROUND_DARK: Color = rgb(0x7c2c00);
const BRICK: Color = rgb(0xb0400c);
const MORTAR: Color = rgb(0x301000);
const BLOCK: Color = rgb(0x9c4a00);
const BLOCK_LIGHT: Color = rgb(0xe09060);
const QUESTION: [Color; 4] = [rgb(0xfcbc3c), rgb(0xe09c20), rgb(0xc87c10), rgb(0xe09c20)];
const USED: Color = rgb(0x885818);
const PIPE: Color = rgb(0x00a800);
const PIPE_LIGHT: Color = rgb(0x80d010);
const PIPE_DARK: Color = rgb(0x005800);
const POLE: Color = rgb(0x80d010);
const FLAG: Color = rgb(0xf8f8f8);
const BUSH: Color = rgb(0x58d854);
const HILL: Color = rgb(0x00a844);
const OUTLINE: Color = rgb(0x101010);

const CAP: Color = rgb(0xd82800);
const SKIN: Color = rgb(0xfca044);
const OVERALLS: Color = rgb(0x2038ec);
const FIRE_CAP: Color = rgb(0xf8f8f8);
const FIRE_OVERALLS: Color = rgb(0xd82800);

const GOOMBA: Color = rgb(0xa04000);
const GOOMBA_FEET: Color = rgb(0x301000);
const SHELL: Color = rgb(0x00a800);
const SHELL_RIM: Color = rgb(0xf8f8f8);

const MUSHROOM: Color = rgb(0xd82800);
const ONE_UP: Color = rgb(0x00a800);
const STEM: Color = rgb(0xfcd8a8);
const FLOWER: Color = rgb(0xf87800);
const STAR: Color = rgb(0xfcd800);
const FIRE: Color = rgb(0xf87800);
const FIRE_CORE: Color = rgb(0xfcd800);
const COIN: Color = rgb(0xfcbc3c);

/// Coin widths through the spin
const COIN_WIDTHS: [f32; 4] = [8.0, 5.0, 2.0, 5.0];

fn mul(color: Color, tint: Color, alpha: f32) -> Color {
    Color::new(color.r * tint.r, color.g * tint.g, color.b * tint.b, color.a * tint.a * alpha)
}

/// The whole level in draw order.
pub fn draw_world(scene: &Scene, view: Rect) {
    // emerging power-ups rise from behind their block
    for (entity, power_up) in scene.world.power_ups.iter() {
        if let Some(body) = scene.world.bodies.get(entity) {
            draw_power_up(power_up, body);
        }
    }
    if scene.player.avatar.in_pipe {
        draw_avatar(&scene.player.avatar);
    }

    draw_tiles(&scene.map, &scene.brick, scene.animated.frame(), view);

    for (_, coin) in scene.world.coins.iter() {
        draw_coin(coin);
    }
    for (entity, enemy) in scene.world.enemies.iter() {
        if let Some(body) = scene.world.bodies.get(entity) {
            if enemy.active && body.enabled {
                draw_enemy(enemy, body);
            }
        }
    }
    for (entity, fireball) in scene.world.fireballs.iter() {
        if let Some(body) = scene.world.bodies.get(entity) {
            if fireball.is_active() {
                draw_fireball(fireball, body);
            }
        }
    }

    if !scene.player.avatar.in_pipe {
        draw_avatar(&scene.player.avatar);
    }
    scene.particles.draw();
}

pub fn draw_tiles(map: &TileMap, brick: &Brick, frame: usize, view: Rect) {
    for (col, row, tile) in map.cells_in(view) {
        if !tile.kind.is_visible() {
            continue;
        }
        let mut rect = TileMap::tile_rect(col, row);
        if brick.cell() == Some((col, row)) {
            rect.y -= brick.offset();
        }
        draw_tile(tile.kind, rect, frame);
    }
}

fn draw_tile(kind: TileKind, r: Rect, frame: usize) {
    match kind {
        TileKind::Empty | TileKind::Hidden => {}
        TileKind::Ground => {
            draw_rectangle(r.x, r.y, r.w, r.h, GROUND);
            draw_line(r.x, r.y + 0.5, r.right(), r.y + 0.5, 1.0, BLOCK_LIGHT);
            draw_line(r.x + r.w / 2.0, r.y + 1.0, r.x + r.w / 2.0, r.bottom(), 1.0, GROUND_DARK);
            draw_line(r.x, r.y + r.h / 2.0, r.right(), r.y + r.h / 2.0, 1.0, GROUND_DARK);
        }
        TileKind::Brick => {
            draw_rectangle(r.x, r.y, r.w, r.h, BRICK);
            for i in 0..4 {
                let y = r.y + i as f32 * 4.0;
                draw_line(r.x, y + 0.5, r.right(), y + 0.5, 1.0, MORTAR);
                let offset = if i % 2 == 0 { 4.0 } else { 12.0 };
                draw_line(r.x + offset, y, r.x + offset, y + 4.0, 1.0, MORTAR);
            }
        }
        TileKind::Block => {
            draw_rectangle(r.x, r.y, r.w, r.h, BLOCK);
            draw_rectangle(r.x, r.y, r.w, 2.0, BLOCK_LIGHT);
            draw_rectangle(r.x, r.y, 2.0, r.h, BLOCK_LIGHT);
            draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, OUTLINE);
        }
        TileKind::Question => {
            draw_rectangle(r.x, r.y, r.w, r.h, QUESTION[frame % QUESTION.len()]);
            draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, OUTLINE);
            // the "?" glyph
            draw_rectangle(r.x + 5.0, r.y + 3.0, 6.0, 2.0, GROUND_DARK);
            draw_rectangle(r.x + 10.0, r.y + 4.0, 2.0, 3.0, GROUND_DARK);
            draw_rectangle(r.x + 7.0, r.y + 7.0, 3.0, 2.0, GROUND_DARK);
            draw_rectangle(r.x + 7.0, r.y + 11.0, 2.0, 2.0, GROUND_DARK);
        }
        TileKind::Used => {
            draw_rectangle(r.x, r.y, r.w, r.h, USED);
            draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, OUTLINE);
        }
        TileKind::PipeTopLeft | TileKind::PipeTopRight => {
            draw_rectangle(r.x, r.y, r.w, r.h, PIPE);
            let light_x = if kind == TileKind::PipeTopLeft { r.x + 3.0 } else { r.x + 1.0 };
            draw_rectangle(light_x, r.y + 1.0, 2.0, r.h - 2.0, PIPE_LIGHT);
            draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, PIPE_DARK);
        }
        TileKind::PipeLeft | TileKind::PipeRight => {
            let x = if kind == TileKind::PipeLeft { r.x + 2.0 } else { r.x };
            let w = r.w - 2.0;
            draw_rectangle(x, r.y, w, r.h, PIPE);
            if kind == TileKind::PipeLeft {
                draw_rectangle(x + 3.0, r.y, 2.0, r.h, PIPE_LIGHT);
                draw_line(x + 0.5, r.y, x + 0.5, r.bottom(), 1.0, PIPE_DARK);
            } else {
                draw_line(x + w - 0.5, r.y, x + w - 0.5, r.bottom(), 1.0, PIPE_DARK);
            }
        }
        TileKind::PipeSideTop | TileKind::PipeSideBottom => {
            draw_rectangle(r.x, r.y, r.w, r.h, PIPE);
            let light_y = if kind == TileKind::PipeSideTop { r.y + 3.0 } else { r.y + 1.0 };
            draw_rectangle(r.x + 1.0, light_y, r.w - 2.0, 2.0, PIPE_LIGHT);
            draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, PIPE_DARK);
        }
        TileKind::Pole => {
            let cx = r.x + r.w / 2.0;
            draw_rectangle(cx - 1.0, r.y, 2.0, r.h, POLE);
        }
        TileKind::FlagTop => {
            let cx = r.x + r.w / 2.0;
            draw_rectangle(cx - 1.0, r.y + 6.0, 2.0, r.h - 6.0, POLE);
            draw_circle(cx, r.y + 4.0, 3.0, PIPE_DARK);
            draw_triangle(
                vec2(cx - 1.0, r.y + 8.0),
                vec2(cx - 1.0, r.bottom() + 6.0),
                vec2(cx - 15.0, r.y + 8.0),
                FLAG,
            );
        }
        TileKind::Bush => {
            draw_circle(r.x + 4.0, r.bottom() - 4.0, 5.0, BUSH);
            draw_circle(r.x + 10.0, r.bottom() - 6.0, 6.0, BUSH);
            draw_rectangle(r.x, r.bottom() - 4.0, r.w, 4.0, BUSH);
        }
        TileKind::Hill => {
            draw_circle(r.x + r.w / 2.0, r.bottom(), r.w / 2.0 + 2.0, HILL);
        }
    }
}

pub fn draw_avatar(avatar: &Avatar) {
    let body = avatar.body;
    let size = body.size * avatar.scale;
    // squash keeps the feet on the ground
    let x = body.center().x - size.x / 2.0;
    let y = body.bottom() - size.y;
    let (cap, overalls) = match avatar.form {
        Form::Fire => (FIRE_CAP, FIRE_OVERALLS),
        Form::Small | Form::Super => (CAP, OVERALLS),
    };
    let tint = avatar.tint;
    let alpha = avatar.alpha;

    let crouch = avatar.anim == Anim::Bend;
    let (y, h) = if crouch { (y + size.y * 0.4, size.y * 0.6) } else { (y, size.y) };

    let head = (h * 0.35).min(8.0);
    draw_rectangle(x, y + head, size.x, h - head, mul(overalls, tint, alpha));
    draw_rectangle(x, y + head, size.x, (h - head) * 0.4, mul(cap, tint, alpha));
    draw_rectangle(x + 1.0, y + 2.0, size.x - 2.0, head - 2.0, mul(SKIN, tint, alpha));
    draw_rectangle(x - 1.0, y, size.x + 2.0, 3.0, mul(cap, tint, alpha));

    let eye_x = if avatar.facing_left { x + 1.0 } else { x + size.x - 3.0 };
    draw_rectangle(eye_x, y + 3.0, 2.0, 2.0, mul(OUTLINE, WHITE, alpha));

    if avatar.anim == Anim::Throw {
        let hand_x = if avatar.facing_left { x - 3.0 } else { x + size.x };
        draw_rectangle(hand_x, y + head + 1.0, 3.0, 3.0, mul(SKIN, tint, alpha));
    }
    if avatar.anim == Anim::Dead {
        draw_line(x + 1.0, y + 2.0, x + size.x - 1.0, y + head - 1.0, 1.0, OUTLINE);
    }
}

fn draw_enemy(enemy: &Enemy, body: &Body) {
    let r = body.rect();
    // knocked-out enemies fall upside down
    let flipped = enemy.dead && !enemy.squashed;
    match (enemy.kind, enemy.state) {
        (EnemyKind::Goomba, _) if enemy.squashed => {
            draw_rectangle(r.x, r.bottom() - 6.0, r.w, 6.0, GOOMBA);
            draw_rectangle(r.x + 1.0, r.bottom() - 2.0, r.w - 2.0, 2.0, GOOMBA_FEET);
        }
        (EnemyKind::Goomba, _) => {
            let (dome_y, feet_y) =
                if flipped { (r.bottom() - 6.0, r.y) } else { (r.y + 6.0, r.bottom() - 4.0) };
            draw_circle(r.x + r.w / 2.0, dome_y, r.w / 2.0, GOOMBA);
            draw_rectangle(r.x + 2.0, r.y + 5.0, r.w - 4.0, r.h - 8.0, GOOMBA);
            let step = if (enemy.anim_time * 6.0) as usize % 2 == 0 { 0.0 } else { 2.0 };
            draw_rectangle(r.x + step, feet_y, 6.0, 4.0, GOOMBA_FEET);
            draw_rectangle(r.right() - 6.0 - step, feet_y, 6.0, 4.0, GOOMBA_FEET);
            if !flipped {
                draw_rectangle(r.x + 4.0, r.y + 5.0, 2.0, 3.0, WHITE);
                draw_rectangle(r.right() - 6.0, r.y + 5.0, 2.0, 3.0, WHITE);
            }
        }
        (EnemyKind::Turtle, EnemyState::Walk) => {
            let head_x = if enemy.flip_x { r.x } else { r.right() - 6.0 };
            draw_rectangle(head_x, r.y, 6.0, 8.0, BUSH);
            draw_shell(Rect::new(r.x + 1.0, r.y + 8.0, r.w - 2.0, r.h - 10.0), flipped);
            draw_rectangle(r.x + 3.0, r.bottom() - 3.0, 4.0, 3.0, SKIN);
            draw_rectangle(r.right() - 7.0, r.bottom() - 3.0, 4.0, 3.0, SKIN);
        }
        (EnemyKind::Turtle, _) => draw_shell(r, flipped),
    }
}

fn draw_shell(r: Rect, flipped: bool) {
    let rim_y = if flipped { r.y } else { r.bottom() - 3.0 };
    draw_rectangle(r.x, r.y, r.w, r.h, SHELL);
    draw_rectangle(r.x, rim_y, r.w, 3.0, SHELL_RIM);
    draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, PIPE_DARK);
}

fn draw_power_up(power_up: &PowerUp, body: &Body) {
    let r = body.rect();
    let c = body.center();
    match power_up.kind {
        PowerUpKind::Mushroom | PowerUpKind::OneUp => {
            let cap = if power_up.kind == PowerUpKind::Mushroom { MUSHROOM } else { ONE_UP };
            draw_rectangle(r.x + 4.0, r.y + 8.0, r.w - 8.0, r.h - 8.0, STEM);
            draw_circle(c.x, r.y + 8.0, 8.0, cap);
            draw_rectangle(r.x, r.y + 8.0, r.w, 2.0, cap);
            draw_circle(c.x, r.y + 4.0, 2.0, WHITE);
            draw_circle(r.x + 3.0, r.y + 8.0, 1.5, WHITE);
            draw_circle(r.right() - 3.0, r.y + 8.0, 1.5, WHITE);
        }
        PowerUpKind::Flower => {
            draw_rectangle(c.x - 1.0, r.y + 8.0, 2.0, r.h - 8.0, PIPE);
            draw_rectangle(r.x + 3.0, r.bottom() - 4.0, r.w - 6.0, 2.0, PIPE);
            let pulse = if (power_up.anim_time * 8.0) as usize % 2 == 0 { FLOWER } else { STAR };
            draw_circle(c.x, r.y + 5.0, 5.0, pulse);
            draw_circle(c.x, r.y + 5.0, 2.5, WHITE);
        }
        PowerUpKind::Star => {
            let spin = power_up.anim_time * 180.0;
            draw_poly(c.x, c.y, 3, 7.0, spin - 90.0, STAR);
            draw_poly(c.x, c.y, 3, 7.0, spin + 90.0, STAR);
            draw_rectangle(c.x - 3.0, c.y - 2.0, 1.0, 3.0, OUTLINE);
            draw_rectangle(c.x + 2.0, c.y - 2.0, 1.0, 3.0, OUTLINE);
        }
    }
}

fn draw_fireball(fireball: &Fireball, body: &Body) {
    let c = body.center();
    if fireball.is_exploding() {
        let frame = ((fireball.anim_time * 30.0) as usize).min(2);
        let radius = 3.0 + frame as f32 * 2.5;
        draw_circle_lines(c.x, c.y, radius, 1.5, FIRE);
        draw_circle(c.x, c.y, radius * 0.5, FIRE_CORE);
        return;
    }
    let angle = fireball.anim_time * 20.0;
    draw_circle(c.x, c.y, 4.0, FIRE);
    draw_circle(c.x + angle.cos() * 1.5, c.y + angle.sin() * 1.5, 2.0, FIRE_CORE);
}

fn draw_coin(coin: &CoinSpin) {
    let pos = coin.pos();
    let w = COIN_WIDTHS[coin.frame() % COIN_WIDTHS.len()];
    draw_rectangle(pos.x - w / 2.0, pos.y - 7.0, w, 14.0, COIN);
    draw_rectangle_lines(pos.x - w / 2.0, pos.y - 7.0, w, 14.0, 1.0, GROUND_DARK);
}
