//! Drawing
//!
//! The game renders at a fixed low resolution and is scaled up to the
//! window. A frame is built in three passes:
//! 1. sprites and tiles into a transparent layer, in world space
//! 2. sky, parallax clouds, the sprite layer (optionally outlined), then
//!    tips, HUD and overlays into the canvas
//! 3. the canvas onto the window, envelop-scaled and centered, optionally
//!    through the vignette

mod fx;
mod overlay;
mod sprites;

use macroquad::prelude::*;
use ::rand::{rngs::StdRng, Rng, SeedableRng};
use crate::scene::Scene;
use fx::PostFx;
use sprites::rgb;

const SKY: Color = rgb(0x5c94fc);
const CLOUD: Color = rgb(0xf8f8f8);
const CLOUD_SHADE: Color = rgb(0xa8d8fc);

/// Scroll factors of the two cloud layers
const CLOUD_LAYERS: [f32; 2] = [0.2, 0.5];
const CLOUDS_PER_LAYER: usize = 6;
/// Clouds repeat every this many canvas pixels
const CLOUD_SPAN: f32 = 640.0;
const BOB_AMPLITUDE: f32 = 2.0;
const BOB_SPEED: f32 = 0.8;

#[derive(Debug, Clone, Copy)]
struct Cloud {
    x: f32,
    y: f32,
    size: f32,
    factor: f32,
    phase: f32,
}

/// Largest rectangle covering `screen` with the aspect of `canvas`,
/// centered. Edges of the canvas may fall outside the window.
pub fn envelop(screen: Vec2, canvas: Vec2) -> Rect {
    let scale = (screen.x / canvas.x).max(screen.y / canvas.y);
    let size = canvas * scale;
    let offset = (screen - size) / 2.0;
    Rect::new(offset.x, offset.y, size.x, size.y)
}

/// Screen x of something at `x` in a layer scrolling at `factor`, wrapped
/// so the layer repeats every `span` pixels.
pub fn parallax_x(x: f32, scroll_x: f32, factor: f32, span: f32) -> f32 {
    (x - scroll_x * factor).rem_euclid(span) - span / 4.0
}

fn make_target(size: Vec2) -> RenderTarget {
    let target = render_target(size.x as u32, size.y as u32);
    target.texture.set_filter(FilterMode::Nearest);
    target
}

/// Camera drawing `area` onto the whole of `target`.
fn target_camera(target: &RenderTarget, area: Rect) -> Camera2D {
    let mut camera = Camera2D::from_display_rect(area);
    camera.render_target = Some(target.clone());
    camera
}

fn blit(target: &RenderTarget, dest: Rect) {
    draw_texture_ex(
        &target.texture,
        dest.x,
        dest.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(dest.w, dest.h)),
            flip_y: true,
            ..Default::default()
        },
    );
}

pub struct Renderer {
    canvas: Vec2,
    layer: RenderTarget,
    frame: RenderTarget,
    fx: PostFx,
    clouds: Vec<Cloud>,
    time: f32,
}

impl Renderer {
    pub fn new(canvas: Vec2) -> Self {
        let mut rng = StdRng::seed_from_u64(7);
        let clouds = CLOUD_LAYERS
            .iter()
            .flat_map(|&factor| {
                (0..CLOUDS_PER_LAYER)
                    .map(|i| Cloud {
                        x: i as f32 * CLOUD_SPAN / CLOUDS_PER_LAYER as f32
                            + rng.gen_range(0.0..40.0),
                        y: rng.gen_range(12.0..canvas.y * 0.4),
                        size: rng.gen_range(6.0..12.0) * (0.6 + factor),
                        factor,
                        phase: rng.gen_range(0.0..std::f32::consts::TAU),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        Self {
            canvas,
            layer: make_target(canvas),
            frame: make_target(canvas),
            fx: PostFx::new(canvas),
            clouds,
            time: 0.0,
        }
    }

    pub fn draw(&mut self, scene: &Scene, dt: f32) {
        self.time += dt;
        let scroll = scene.camera.pixel_scroll();
        let view_size = scene.camera.view_size();
        let world = Rect::new(scroll.x, scroll.y, view_size.x, view_size.y);
        let view = Rect::new(0.0, 0.0, view_size.x, view_size.y);
        let canvas = Rect::new(0.0, 0.0, self.canvas.x, self.canvas.y);

        set_camera(&target_camera(&self.layer, world));
        clear_background(BLANK);
        sprites::draw_world(scene, world);

        set_camera(&target_camera(&self.frame, canvas));
        clear_background(SKY);
        self.draw_clouds(scroll.x);
        self.fx.with_outline(scene.config.fx.outline, || blit(&self.layer, canvas));

        set_camera(&target_camera(&self.frame, world));
        overlay::draw_tips(scene);
        if scene.debug {
            overlay::draw_debug_bodies(scene);
        }

        set_camera(&target_camera(&self.frame, view));
        overlay::draw_hud(&scene.hud);
        overlay::draw_help(&scene.help, view_size);
        overlay::draw_fade(scene.camera.fade_amount(), view_size);
        if scene.is_game_over() {
            overlay::draw_game_over(scene.hud.get_int(crate::game::HudKey::Score), view_size);
        }
        if scene.debug {
            overlay::draw_debug_stats(scene);
        }

        set_default_camera();
        clear_background(BLACK);
        let dest = envelop(vec2(screen_width(), screen_height()), self.canvas);
        self.fx.with_vignette(scene.config.fx.vignette, || blit(&self.frame, dest));
    }

    fn draw_clouds(&self, scroll_x: f32) {
        for cloud in &self.clouds {
            let x = parallax_x(cloud.x, scroll_x, cloud.factor, CLOUD_SPAN);
            if x > self.canvas.x + cloud.size * 3.0 {
                continue;
            }
            let y = cloud.y + (self.time * BOB_SPEED + cloud.phase).sin() * BOB_AMPLITUDE;
            let s = cloud.size;
            draw_circle(x, y + 2.0, s, CLOUD_SHADE);
            draw_circle(x - s, y + s * 0.3, s * 0.7, CLOUD);
            draw_circle(x + s, y + s * 0.3, s * 0.7, CLOUD);
            draw_circle(x, y, s, CLOUD);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelop_covers_wide_window() {
        let dest = envelop(vec2(1920.0, 1080.0), vec2(400.0, 240.0));
        // 1920/400 = 4.8 beats 1080/240 = 4.5
        let expected = Rect::new(0.0, -36.0, 1920.0, 1152.0);
        let pairs = [
            (dest.x, expected.x),
            (dest.y, expected.y),
            (dest.w, expected.w),
            (dest.h, expected.h),
        ];
        for (got, want) in pairs {
            assert!((got - want).abs() < 0.01, "{} != {}", got, want);
        }
    }

    #[test]
    fn test_envelop_exact_fit() {
        let dest = envelop(vec2(800.0, 480.0), vec2(400.0, 240.0));
        assert_eq!(dest, Rect::new(0.0, 0.0, 800.0, 480.0));
    }

    #[test]
    fn test_parallax_scrolls_slower_than_world() {
        let near = parallax_x(300.0, 100.0, 0.5, 640.0);
        let far = parallax_x(300.0, 100.0, 0.2, 640.0);
        assert_eq!(near, 300.0 - 50.0 - 160.0);
        assert_eq!(far, 300.0 - 20.0 - 160.0);
    }

    #[test]
    fn test_parallax_wraps() {
        let a = parallax_x(10.0, 0.0, 0.5, 640.0);
        let b = parallax_x(10.0, 1280.0, 0.5, 640.0);
        assert_eq!(a, b);
    }
}
