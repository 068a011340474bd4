//! Text and screen overlays: HUD, floating tips, help, fades, game over
//! and the debug view.

use macroquad::prelude::*;
use crate::hud::Hud;
use crate::scene::{HelpText, Scene};
use super::sprites::rgb;

const FONT_SIZE: u16 = 10;
const LINE_HEIGHT: f32 = 10.0;
const TEXT: Color = rgb(0xf8f8f8);
const SHADOW: Color = Color::new(0.0, 0.0, 0.0, 0.6);

/// Text with a 1 px drop shadow, `x` being the center of the line.
fn draw_centered(line: &str, x: f32, y: f32, scale: f32, color: Color) {
    let size = measure_text(line, None, FONT_SIZE, scale);
    let left = (x - size.width / 2.0).round();
    let params =
        |color| TextParams { font_size: FONT_SIZE, font_scale: scale, color, ..Default::default() };
    draw_text_ex(line, left + 1.0, y + 1.0, params(Color::new(0.0, 0.0, 0.0, SHADOW.a * color.a)));
    draw_text_ex(line, left, y, params(color));
}

fn draw_left(line: &str, x: f32, y: f32, color: Color) {
    let params =
        |color| TextParams { font_size: FONT_SIZE, font_scale: 1.0, color, ..Default::default() };
    draw_text_ex(line, x + 1.0, y + 1.0, params(Color::new(0.0, 0.0, 0.0, SHADOW.a * color.a)));
    draw_text_ex(line, x, y, params(color));
}

/// HUD items in view space. Positions and scale come from `Hud::layout`.
pub fn draw_hud(hud: &Hud) {
    for item in hud.items() {
        let scale = item.scale();
        for (i, line) in item.text().lines().enumerate() {
            let y = item.y + (i as f32 + 1.0) * LINE_HEIGHT * scale;
            draw_centered(line, item.x, y, scale, TEXT);
        }
    }
}

/// Floating "+1" tips, in world space.
pub fn draw_tips(scene: &Scene) {
    for tip in &scene.tips {
        let pos = tip.pos();
        draw_centered(&tip.text, pos.x, pos.y, 1.0, Color { a: tip.alpha(), ..TEXT });
    }
}

/// Controls hint in the bottom-left corner of the view.
pub fn draw_help(help: &HelpText, view: Vec2) {
    let lines: Vec<&str> = help.text.lines().collect();
    let top = view.y - 6.0 - lines.len() as f32 * LINE_HEIGHT;
    for (i, line) in lines.iter().enumerate() {
        draw_left(line, 6.0, top + (i as f32 + 1.0) * LINE_HEIGHT, Color { a: help.alpha, ..TEXT });
    }
}

pub fn draw_fade(amount: f32, view: Vec2) {
    if amount > 0.0 {
        draw_rectangle(0.0, 0.0, view.x, view.y, Color::new(0.0, 0.0, 0.0, amount.min(1.0)));
    }
}

pub fn draw_game_over(score: i64, view: Vec2) {
    draw_rectangle(0.0, 0.0, view.x, view.y, Color::new(0.0, 0.0, 0.0, 0.65));
    let cx = view.x / 2.0;
    let cy = view.y / 2.0;
    draw_centered("GAME OVER", cx, cy - 12.0, 2.0, TEXT);
    draw_centered(&format!("SCORE {}", score), cx, cy + 8.0, 1.0, TEXT);
    draw_centered("PRESS ENTER TO PLAY AGAIN", cx, cy + 24.0, 1.0, TEXT);
}

/// Body outlines, in world space.
pub fn draw_debug_bodies(scene: &Scene) {
    let outline = |rect: Rect, color: Color| {
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, color)
    };

    let player = &scene.player.avatar;
    outline(player.body.rect(), if player.protected { YELLOW } else { GREEN });
    for (entity, body) in scene.world.bodies.iter() {
        if !body.enabled {
            continue;
        }
        let color = if scene.world.enemies.contains(entity) {
            RED
        } else if scene.world.power_ups.contains(entity) {
            SKYBLUE
        } else {
            ORANGE
        };
        outline(body.rect(), color);
    }
    if let Some(rect) = scene.brick.rect() {
        outline(rect, MAGENTA);
    }
    if let Some(flag) = &scene.flag {
        outline(flag.rect, WHITE);
    }
    let bounds = scene.world.bounds;
    outline(bounds, Color::new(1.0, 1.0, 1.0, 0.4));
}

/// Counters for the debug view, in view space.
pub fn draw_debug_stats(scene: &Scene) {
    let c = scene.player.avatar.center();
    let lines = [
        scene.level_name().to_uppercase(),
        format!("POS {:.0},{:.0}", c.x, c.y),
        format!(
            "CLOCK {}{}",
            scene.countdown.remaining(),
            if scene.flag.as_ref().is_some_and(|f| f.reached()) { " CLEAR" } else { "" }
        ),
        format!("ENTITIES {}", scene.world.entity_count()),
        format!(
            "ENEMIES {} PENDING {} POOLED {}",
            scene.enemies.members().len(),
            scene.enemies.pending_len(),
            scene.enemies.pool_len()
        ),
        format!("PARTICLES {}", scene.particles.alive_count()),
        format!("POWERS {:?}", scene.player.powers.active().collect::<Vec<_>>()),
        match scene.transit_step() {
            Some(step) => format!("RUN {} PIPE {:?}", scene.runs, step),
            None => format!("RUN {}", scene.runs),
        },
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_left(line, 6.0, 32.0 + i as f32 * LINE_HEIGHT, YELLOW);
    }
}
