//! The main scene
//!
//! Owns one run of a level: the tile map, every object in it, the HUD and
//! the camera. `tick` advances the simulation by `dt` and then drains the
//! event queues into the HUD, particles, camera and tips. Sound
//! events are left queued for the audio system to pick up.
//!
//! While a pipe transit plays, physics is paused: only timers, the camera
//! and the transit itself advance.

use std::collections::VecDeque;
use std::rc::Rc;
use macroquad::prelude::{Rect, Vec2};
use crate::brick::Brick;
use crate::camera::Camera;
use crate::coin_spin::{self, FloatingTip};
use crate::config::GameConfig;
use crate::countdown::{Countdown, Tick};
use crate::enemies::EnemyGroup;
use crate::flag::Flag;
use crate::game::tween::{Ease, Tween};
use crate::game::{
    is_stomp, overlaps, step_body, touch, Entity, Events, HudEvent, HudKey, ParticlePool,
    PlayerEvent, Side, SoundEvent, TileHit, World,
};
use crate::hud::{Hud, HudItem, HudValue};
use crate::input::{Action, Controls};
use crate::level::{AnimatedTiles, Level, TileMap};
use crate::player::Player;
use crate::power_ups::{PowerUp, PowerUpKind};
use crate::powers::{PipeTransit, PowerCommand, PowerCtx, PowerKind, TransitStep};

/// Seconds between dying and coming back
const REVIVE_DELAY: f32 = 1.2;
/// Upward kick after stomping an enemy
const STOMP_BOUNCE: f32 = -80.0;

const HELP_ALPHA: f32 = 0.6;
const HELP_DIM_ALPHA: f32 = 0.25;
const HELP_HOLD: f32 = 3.0;
const HELP_FADE: f32 = 0.8;

/// Reads the current frame rate for the HUD.
pub type FpsProvider = Rc<dyn Fn() -> i64>;

/// What survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carry {
    pub coins: i64,
    pub lives: i64,
}

/// Control hints in the corner, dimmed after a few seconds.
#[derive(Debug, Clone)]
pub struct HelpText {
    pub text: String,
    pub alpha: f32,
    hold: f32,
    fade: Option<Tween>,
}

impl HelpText {
    pub fn new(text: &str) -> Self {
        Self { text: text.to_string(), alpha: HELP_ALPHA, hold: HELP_HOLD, fade: None }
    }

    pub fn update(&mut self, dt: f32) {
        if self.hold > 0.0 {
            self.hold -= dt;
            if self.hold <= 0.0 {
                self.fade = Some(Tween::new(HELP_ALPHA, HELP_DIM_ALPHA, HELP_FADE, Ease::SineOut));
            }
        } else if let Some(fade) = self.fade.as_mut() {
            self.alpha = fade.update(dt);
            if fade.is_done() {
                self.fade = None;
            }
        }
    }
}

/// Of the tiles the player's head hit, keep only the one nearest the
/// middle of the player, so a jump under two blocks strikes one.
fn nearest_head_hit(hits: Vec<TileHit>, center_x: f32) -> Vec<TileHit> {
    let (head, mut rest): (Vec<TileHit>, Vec<TileHit>) =
        hits.into_iter().partition(|h| h.side == Side::Up);
    let distance =
        |hit: &TileHit| (TileMap::tile_rect(hit.col, hit.row).center().x - center_x).abs();
    if let Some(nearest) = head.into_iter().min_by(|a, b| distance(a).total_cmp(&distance(b))) {
        rest.push(nearest);
    }
    rest
}

pub struct Scene {
    pub config: GameConfig,
    /// The level as loaded, kept for restarts
    level: Level,
    pub map: TileMap,
    pub world: World,
    pub player: Player,
    pub enemies: EnemyGroup,
    pub brick: Brick,
    pub flag: Option<Flag>,
    pub hud: Hud,
    pub countdown: Countdown,
    pub camera: Camera,
    pub animated: AnimatedTiles,
    pub particles: ParticlePool,
    pub tips: Vec<FloatingTip>,
    pub help: HelpText,
    pub events: Events,
    transit: Option<PipeTransit>,
    revive_timer: Option<f32>,
    game_over: bool,
    restart: Option<Option<Carry>>,
    fps: FpsProvider,
    pub debug: bool,
    /// Restarts since the game started
    pub runs: u32,
}

impl Scene {
    pub fn create(
        level: Level,
        config: GameConfig,
        carry: Option<Carry>,
        fps: FpsProvider,
    ) -> Self {
        let canvas = Vec2::new(config.canvas_width, config.canvas_height);
        let room = level.start_room().rect();
        let map = level.map.clone();

        let mut player = Player::new(config.init_x, config.init_y, &PowerKind::DEFAULT_ORDER);
        for kind in [PowerKind::Move, PowerKind::Jump, PowerKind::EnterPipe, PowerKind::HitBrick] {
            player.grant(kind);
        }

        let coins = carry.map_or(0, |c| c.coins);
        let lives = if config.infinite_lives {
            HudValue::Infinite
        } else {
            HudValue::Int(carry.map_or(config.lives, |c| c.lives))
        };
        let fps_source = fps.clone();
        let mut hud = Hud::new(vec![
            HudItem::new(HudKey::Score, "SCORE", HudValue::Int(0)),
            HudItem::new(HudKey::Coins, "COINS", HudValue::Int(coins)),
            HudItem::new(HudKey::Time, "TIME", HudValue::Int(config.play_time as i64)),
            HudItem::new(HudKey::Lives, "LIVES", lives),
            HudItem::provided(HudKey::Fps, "FPS", Box::new(move || fps_source())),
        ]);
        hud.layout(canvas.x, config.zoom);

        let mut countdown = Countdown::new();
        countdown.start(config.play_time);

        let mut camera = Camera::new(canvas, room);
        camera.set_zoom(config.zoom);
        camera.follow(player.avatar.center());

        let flag = Flag::from_map(&map);
        if flag.is_none() {
            log::warn!("Level '{}' has no flag, it can't be cleared", level.name);
        }

        let mut events = Events::new();
        events.sounds.send(SoundEvent::ResumeMusic);

        log::info!("Starting level '{}' with {} enemies", level.name, level.enemies.len());

        Self {
            enemies: EnemyGroup::new(level.enemies.clone()),
            help: HelpText::new(&config.help_text),
            world: World::new(room),
            brick: Brick::new(),
            animated: AnimatedTiles::new(),
            particles: ParticlePool::new(),
            tips: Vec::new(),
            transit: None,
            revive_timer: None,
            game_over: false,
            restart: None,
            debug: false,
            runs: 0,
            config,
            level,
            map,
            player,
            flag,
            hud,
            countdown,
            camera,
            events,
            fps,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn in_transit(&self) -> bool {
        self.transit.is_some()
    }

    /// Where the pipe transit is, if one is playing.
    pub fn transit_step(&self) -> Option<TransitStep> {
        self.transit.as_ref().map(PipeTransit::step)
    }

    pub fn level_name(&self) -> &str {
        &self.level.name
    }

    /// Sound events for the audio system.
    pub fn drain_sounds(&mut self) -> Vec<SoundEvent> {
        self.events.sounds.drain().collect()
    }

    /// Start the level over, keeping queued sounds.
    pub fn restart(&mut self, carry: Option<Carry>) {
        let pending: Vec<SoundEvent> = self.events.sounds.drain().collect();
        let runs = self.runs + 1;
        let debug = self.debug;
        *self = Scene::create(self.level.clone(), self.config.clone(), carry, self.fps.clone());
        self.runs = runs;
        self.debug = debug;

        let fresh: Vec<SoundEvent> = self.events.sounds.drain().collect();
        for sound in pending.into_iter().chain(fresh) {
            self.events.sounds.send(sound);
        }
        log::info!("Level restarted (run {})", runs);
    }

    /// The view was resized to `width × height` canvas pixels.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.camera.resize(Vec2::new(width, height));
        self.camera.set_zoom(self.config.zoom);
        self.hud.layout(width, self.config.zoom);
    }

    pub fn tick(&mut self, dt: f32, controls: &Controls) {
        if controls.pressed(Action::ToggleDebug) {
            self.debug = !self.debug;
        }

        if self.game_over {
            if controls.pressed(Action::Confirm) {
                self.restart = Some(None);
            }
            self.finish_tick();
            return;
        }

        self.camera.update(dt);
        self.help.update(dt);
        self.hud.update(dt);
        self.particles.update(dt);
        self.tips.retain_mut(|tip| tip.update(dt));
        self.update_coins(dt);
        self.update_clock(dt);
        self.update_revive(dt);

        if let Some(transit) = self.transit.as_mut() {
            let rooms = self.level.rooms_by_x();
            let step = transit.update(
                &mut self.player.avatar,
                &rooms,
                &mut self.world,
                &mut self.events,
                dt,
            );
            if step == TransitStep::Done {
                self.transit = None;
            }
            self.finish_tick();
            return;
        }

        self.animated.update(dt);
        self.update_player(dt, controls);
        self.update_enemies(dt, controls);
        self.update_power_ups(dt);
        self.update_fireballs(dt);
        self.update_brick(dt);
        self.check_flag();
        self.finish_tick();
    }

    fn finish_tick(&mut self) {
        // a relocate has to reach the camera before it follows
        for event in self.events.camera.drain() {
            self.camera.apply(event);
        }
        self.camera.follow(self.player.avatar.center());

        for event in self.events.hud.drain() {
            self.hud.apply(event);
        }
        for burst in self.events.bursts.drain() {
            self.particles.spawn_burst(burst);
        }
        for tip in self.events.tips.drain() {
            self.tips.push(FloatingTip::new(tip));
        }
        let died = self.events.player.drain().any(|e| e == PlayerEvent::Died);
        if died {
            self.on_player_died();
        }

        self.world.flush_despawns();

        if let Some(carry) = self.restart.take() {
            self.restart(carry);
        }
    }

    fn on_player_died(&mut self) {
        let out_of_lives =
            matches!(self.hud.get_value(HudKey::Lives), Some(HudValue::Int(n)) if *n <= 0);
        if out_of_lives {
            self.game_over = true;
            self.countdown.stop();
            log::info!("Game over");
        } else {
            self.revive_timer = Some(REVIVE_DELAY);
        }
    }

    fn update_revive(&mut self, dt: f32) {
        let Some(timer) = self.revive_timer.as_mut() else {
            return;
        };
        *timer -= dt;
        if *timer > 0.0 {
            return;
        }
        self.revive_timer = None;

        let avatar = &mut self.player.avatar;
        let point = avatar.respawn_point(self.world.bounds);
        avatar.revive_at(point, &mut self.events);
        self.events.sounds.send(SoundEvent::ResumeMusic);
        if !self.countdown.is_running() {
            self.countdown.start(self.config.play_time);
            self.events.hud.send(HudEvent::Set(HudKey::Time, self.config.play_time as i64));
        }
        log::info!("Player revived at ({:.0}, {:.0})", point.x, point.y);
    }

    fn update_clock(&mut self, dt: f32) {
        for tick in self.countdown.update(dt) {
            match tick {
                Tick::Interval(left) => {
                    self.events.hud.send(HudEvent::Set(HudKey::Time, left as i64))
                }
                Tick::End => {
                    log::info!("Time up");
                    self.player.die(&mut self.events);
                }
            }
        }
    }

    fn update_coins(&mut self, dt: f32) {
        let mut done = Vec::new();
        for (entity, coin) in self.world.coins.iter_mut() {
            if coin.update(dt, &mut self.events) {
                done.push(entity);
            }
        }
        for entity in done {
            self.world.despawn(entity);
        }
    }

    fn update_player(&mut self, dt: f32, controls: &Controls) {
        let mut ctx = PowerCtx::new(
            controls,
            &mut self.map,
            &mut self.world,
            &mut self.events,
            &self.config,
            dt,
        );
        self.player.update(&mut ctx);
        let mut commands = ctx.commands;

        let hits = step_body(&mut self.player.avatar.body, &self.map, self.config.gravity, dt);
        for hit in nearest_head_hit(hits, self.player.avatar.center().x) {
            let mut ctx = PowerCtx::new(
                controls,
                &mut self.map,
                &mut self.world,
                &mut self.events,
                &self.config,
                dt,
            );
            self.player.collider_world(&mut ctx, hit);
            commands.extend(ctx.commands);
        }

        self.apply_commands(commands, controls, dt);
    }

    fn update_enemies(&mut self, dt: f32, controls: &Controls) {
        let canvas = Vec2::new(self.config.canvas_width, self.config.canvas_height);
        self.enemies.update(&mut self.world, self.player.avatar.center(), canvas);
        let members = self.enemies.members().to_vec();

        for &entity in &members {
            let Some((enemy, body)) = self.world.enemy_mut(entity) else {
                continue;
            };
            enemy.update(body, dt);
            if !enemy.active {
                continue;
            }
            for hit in step_body(body, &self.map, self.config.gravity, dt) {
                enemy.collider_world(body, hit);
            }
        }

        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                self.enemies_meet(a, b);
            }
        }

        let mut commands = Vec::new();
        for &entity in &members {
            self.player_meets_enemy(entity, controls, dt, &mut commands);
        }
        self.apply_commands(commands, controls, dt);
    }

    fn enemies_meet(&mut self, a: Entity, b: Entity) {
        let (Some(&enemy_b), Some(&body_b)) = (self.world.enemies.get(b), self.world.bodies.get(b))
        else {
            return;
        };
        let Some(&body_a) = self.world.bodies.get(a) else {
            return;
        };
        if !enemy_b.active || !overlaps(&body_a, &body_b) {
            return;
        }

        if let Some((enemy, body)) = self.world.enemy_mut(a) {
            enemy.overlap_enemy(body, &enemy_b, &body_b, &mut self.events);
        }
        let (Some(&enemy_a), Some(&body_a)) = (self.world.enemies.get(a), self.world.bodies.get(a))
        else {
            return;
        };
        if let Some((enemy, body)) = self.world.enemy_mut(b) {
            enemy.overlap_enemy(body, &enemy_a, &body_a, &mut self.events);
        }
    }

    fn player_meets_enemy(
        &mut self,
        entity: Entity,
        controls: &Controls,
        dt: f32,
        commands: &mut Vec<PowerCommand>,
    ) {
        if self.player.avatar.dead {
            return;
        }
        let enemy = self.world.enemies.get(entity);
        let (Some(enemy), Some(enemy_body)) = (enemy, self.world.bodies.get_mut(entity)) else {
            return;
        };
        if enemy.dead || !enemy.active || !overlaps(&self.player.avatar.body, enemy_body) {
            return;
        }
        touch(&mut self.player.avatar.body, enemy_body);
        let step_on = is_stomp(&self.player.avatar.body, enemy_body);

        let mut ctx = PowerCtx::new(
            controls,
            &mut self.map,
            &mut self.world,
            &mut self.events,
            &self.config,
            dt,
        );
        let handled = self.player.overlap_enemy(&mut ctx, entity, step_on);
        commands.extend(ctx.commands);
        if handled {
            return;
        }

        let player_body = self.player.avatar.body;
        let Some((enemy, body)) = self.world.enemy_mut(entity) else {
            return;
        };
        if enemy.overlap_player(body, &player_body, step_on, &mut self.events) {
            return;
        }

        if step_on {
            self.player.avatar.body.velocity.y = STOMP_BOUNCE;
        } else if !self.player.avatar.protected && enemy.attacks() {
            self.player.die(&mut self.events);
        }
    }

    fn update_power_ups(&mut self, dt: f32) {
        let player_body = self.player.avatar.body;
        let player_alive = !self.player.avatar.dead;
        let bounds = self.world.bounds;
        let mut granted = Vec::new();
        let mut gone = Vec::new();

        for entity in self.world.power_ups.entities() {
            let Some((power_up, body)) = self.world.power_up_mut(entity) else {
                continue;
            };
            power_up.update(body, dt);
            for hit in step_body(body, &self.map, self.config.gravity, dt) {
                power_up.collider_world(body, hit);
            }

            if player_alive && !power_up.is_emerging() && overlaps(body, &player_body) {
                if let Some(kind) = power_up.collect(&mut self.events) {
                    granted.push(kind);
                }
                gone.push(entity);
            } else if PowerUp::fell_out(body, bounds) {
                gone.push(entity);
            }
        }

        for kind in granted {
            log::debug!("Collected power {:?}", kind);
            self.player.grant(kind);
        }
        for entity in gone {
            self.world.despawn(entity);
        }
    }

    fn update_fireballs(&mut self, dt: f32) {
        let view = self.camera.view();
        let trails = self.config.fx.trails;
        let members = self.enemies.members().to_vec();

        for entity in self.world.fireballs.entities() {
            let Some((fireball, body)) = self.world.fireball_mut(entity) else {
                continue;
            };
            fireball.update(body, dt, view, trails, &mut self.events);
            if !fireball.is_active() {
                continue;
            }
            for hit in step_body(body, &self.map, self.config.gravity, dt) {
                fireball.collider_world(body, hit, &mut self.events);
            }
            if fireball.is_exploding() {
                continue;
            }

            let fireball_body = *body;
            for &target in &members {
                let Some((enemy, enemy_body)) = self.world.enemy_mut(target) else {
                    continue;
                };
                if enemy.dead || !enemy.active || !overlaps(&fireball_body, enemy_body) {
                    continue;
                }
                enemy.die(enemy_body, true, &mut self.events);
                if let Some((fireball, body)) = self.world.fireball_mut(entity) {
                    fireball.explode(body, &mut self.events);
                }
                break;
            }
        }
    }

    fn update_brick(&mut self, dt: f32) {
        self.brick.update(dt);
        if !self.brick.is_active() {
            return;
        }

        let large = self.player.powers.has(PowerKind::Large);
        for entity in self.enemies.members().to_vec() {
            let Some((enemy, body)) = self.world.enemy_mut(entity) else {
                continue;
            };
            if enemy.dead || !enemy.active || !self.brick.strikes(entity, body) {
                continue;
            }
            if large {
                enemy.die(body, true, &mut self.events);
            }
        }

        for entity in self.world.power_ups.entities() {
            if let Some((power_up, body)) = self.world.power_up_mut(entity) {
                if self.brick.strikes(entity, body) {
                    power_up.pop(body);
                }
            }
        }
    }

    fn check_flag(&mut self) {
        if self.player.avatar.dead {
            return;
        }
        let Some(flag) = self.flag.as_mut() else {
            return;
        };
        if flag.overlap(&self.player.avatar.body, &mut self.events) {
            self.restart = Some(None);
        }
    }

    /// Apply what powers asked for. Removing a power can queue more work
    /// (shrinking drops fire), which runs in the same pass.
    fn apply_commands(&mut self, commands: Vec<PowerCommand>, controls: &Controls, dt: f32) {
        let mut queue = VecDeque::from(commands);
        while let Some(command) = queue.pop_front() {
            match command {
                PowerCommand::Remove(kind) => {
                    let mut ctx = PowerCtx::new(
                        controls,
                        &mut self.map,
                        &mut self.world,
                        &mut self.events,
                        &self.config,
                        dt,
                    );
                    self.player.powers.remove(kind, &mut self.player.avatar, &mut ctx);
                    queue.extend(ctx.commands);
                }
                PowerCommand::BeginTransit { enter, dest } => {
                    // both halves of a pipe mouth report the same entry
                    if self.transit.is_some() {
                        continue;
                    }
                    match self.level.dests.get(&dest) {
                        Some(dest) => {
                            self.transit = Some(PipeTransit::begin(
                                &mut self.player.avatar,
                                enter,
                                dest.clone(),
                                &mut self.events,
                            ));
                        }
                        None => log::warn!("Pipe leads to unknown dest '{}'", dest),
                    }
                }
                PowerCommand::SpawnPowerUp { name, col, row } => {
                    self.create_power_up(&name, col, row)
                }
                PowerCommand::BumpBrick { col, row } => self.brick.bump(col, row),
            }
        }
    }

    /// Release the contents of the block at `(col, row)`. Anything that
    /// isn't a known power-up comes out as a coin.
    pub fn create_power_up(&mut self, name: &str, col: i32, row: i32) {
        let large = self.player.powers.has(PowerKind::Large);
        match PowerUpKind::from_name(name, large) {
            Some(kind) => {
                let block = TileMap::tile_rect(col, row);
                self.world.spawn_power_up(kind, block.x, block.y);
                log::debug!("{:?} emerging at ({}, {})", kind, col, row);
            }
            None => {
                let above = TileMap::tile_rect(col, row - 1).center();
                coin_spin::spawn(&mut self.world, above, &mut self.events);
            }
        }
    }

    /// Camera rectangle in world space.
    pub fn view(&self) -> Rect {
        self.camera.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::EnemyKind;
    use crate::game::Sfx;
    use crate::level::parse_level;
    use crate::player::{Form, SMALL_SIZE};
    use macroquad::prelude::WHITE;

    const DT: f32 = 1.0 / 60.0;
    const FLAT: &[&str] = &[
        "....................",
        "....................",
        "....................",
        "....................",
        "....................",
        "....................",
        "....................",
        "####################",
    ];

    fn level(rows: &[&str], enemies: &str, modifiers: &str) -> Level {
        let rows: Vec<String> = rows.iter().map(|r| format!("{:?}", r)).collect();
        let text = format!(
            "(name: \"test\", rows: [{}], enemies: [{}], modifiers: [{}])",
            rows.join(", "),
            enemies,
            modifiers,
        );
        parse_level(&text).unwrap()
    }

    fn room1() -> &'static str {
        "Room(name: \"room1\", x: 0.0, y: 0.0, width: 320.0, height: 128.0)"
    }

    fn config(x: f32, y: f32) -> GameConfig {
        GameConfig { init_x: x, init_y: y, ..GameConfig::default() }
    }

    fn scene(level: Level, config: GameConfig) -> Scene {
        Scene::create(level, config, None, Rc::new(|| 60))
    }

    fn run(
        scene: &mut Scene,
        controls: &Controls,
        ticks: usize,
        until: impl Fn(&Scene) -> bool,
    ) -> bool {
        for _ in 0..ticks {
            scene.tick(DT, controls);
            if until(scene) {
                return true;
            }
        }
        false
    }

    fn first_enemy(scene: &Scene) -> Option<(Entity, crate::enemies::Enemy)> {
        let entity = *scene.enemies.members().first()?;
        Some((entity, *scene.world.enemies.get(entity)?))
    }

    fn idle() -> Controls {
        Controls::default()
    }

    #[test]
    fn test_create_sets_up_run() {
        let level = level(FLAT, "", room1());
        let carry = Some(Carry { coins: 7, lives: 2 });
        let mut scene = Scene::create(level, config(40.0, 104.0), carry, Rc::new(|| 60));

        assert_eq!(scene.hud.get_int(HudKey::Coins), 7);
        assert_eq!(scene.hud.get_int(HudKey::Lives), 2);
        assert_eq!(scene.hud.get_int(HudKey::Time), 300);
        for kind in [PowerKind::Move, PowerKind::Jump, PowerKind::EnterPipe, PowerKind::HitBrick] {
            assert!(scene.player.powers.has(kind), "{:?}", kind);
        }
        assert!(!scene.player.powers.has(PowerKind::Large));
        assert_eq!(scene.world.bounds, Rect::new(0.0, 0.0, 320.0, 128.0));
        assert_eq!(scene.camera.bounds(), scene.world.bounds);
        assert!(scene.drain_sounds().contains(&SoundEvent::ResumeMusic));
    }

    #[test]
    fn test_stomping_goomba_bounces_player() {
        let level = level(FLAT, "(kind: Goomba, x: 64.0, y: 112.0)", room1());
        let mut scene = scene(level, config(56.0, 60.0));

        let squashed =
            run(&mut scene, &idle(), 60, |s| first_enemy(s).is_some_and(|(_, e)| e.dead));

        assert!(squashed);
        let (_, goomba) = first_enemy(&scene).unwrap();
        assert!(goomba.squashed);
        assert!(!scene.player.avatar.dead);
        assert_eq!(scene.player.avatar.body.velocity.y, STOMP_BOUNCE);
        assert_eq!(scene.hud.get_int(HudKey::Score), 100);
    }

    #[test]
    fn test_walking_into_goomba_kills_then_revives() {
        let level = level(FLAT, "(kind: Goomba, x: 100.0, y: 112.0)", room1());
        let mut scene = scene(level, config(40.0, 104.0));

        assert!(run(&mut scene, &idle(), 200, |s| s.player.avatar.dead));
        assert_eq!(scene.hud.get_int(HudKey::Lives), 2);
        assert!(!scene.is_game_over());

        assert!(run(&mut scene, &idle(), 90, |s| !s.player.avatar.dead));
        assert!(scene.player.avatar.protected);
        assert_eq!(scene.player.avatar.center(), Vec2::new(40.0, 104.0));
        assert!(scene.drain_sounds().contains(&SoundEvent::ResumeMusic));
    }

    #[test]
    fn test_last_life_ends_game_and_confirm_restarts() {
        let level = level(FLAT, "(kind: Goomba, x: 100.0, y: 112.0)", room1());
        let mut scene = scene(level, GameConfig { lives: 1, ..config(40.0, 104.0) });

        assert!(run(&mut scene, &idle(), 200, |s| s.player.avatar.dead));
        assert!(scene.is_game_over());

        // nothing but confirm gets through
        scene.tick(DT, &idle());
        assert!(scene.is_game_over());

        scene.tick(DT, &Controls::holding(&[Action::Confirm]));
        assert!(!scene.is_game_over());
        assert!(!scene.player.avatar.dead);
        assert_eq!(scene.runs, 1);
        assert_eq!(scene.hud.get_int(HudKey::Lives), 1);
    }

    #[test]
    fn test_infinite_lives_never_end_the_game() {
        let level = level(FLAT, "(kind: Goomba, x: 100.0, y: 112.0)", room1());
        let config = GameConfig { lives: 1, infinite_lives: true, ..config(40.0, 104.0) };
        let mut scene = scene(level, config);
        assert_eq!(scene.hud.get_value(HudKey::Lives), Some(&HudValue::Infinite));

        assert!(run(&mut scene, &idle(), 200, |s| s.player.avatar.dead));
        assert!(!scene.is_game_over());
        assert!(run(&mut scene, &idle(), 100, |s| !s.player.avatar.dead));
        assert_eq!(scene.hud.get_value(HudKey::Lives), Some(&HudValue::Infinite));
    }

    #[test]
    fn test_hit_while_fire_shrinks_to_small() {
        let level = level(FLAT, "(kind: Goomba, x: 100.0, y: 112.0)", room1());
        let mut scene = scene(level, config(40.0, 104.0));
        scene.player.grant(PowerKind::Large);
        scene.player.grant(PowerKind::Fire);
        assert_eq!(scene.player.avatar.form, Form::Fire);

        assert!(run(&mut scene, &idle(), 200, |s| !s.player.powers.has(PowerKind::Large)));

        let avatar = &scene.player.avatar;
        assert!(!scene.player.powers.has(PowerKind::Fire));
        assert_eq!(avatar.form, Form::Small);
        assert_eq!(avatar.body.size, SMALL_SIZE);
        assert!(avatar.protected);
        assert!(!avatar.dead);
        assert!(scene.drain_sounds().contains(&SoundEvent::Play(Sfx::Pipe)));

        // the goomba walks through while the blink lasts
        run(&mut scene, &idle(), 60, |_| false);
        assert!(!scene.player.avatar.dead);
        assert_eq!(scene.hud.get_int(HudKey::Lives), 3);
    }

    #[test]
    fn test_star_power_wears_off() {
        let level = level(FLAT, "", room1());
        let mut scene = scene(level, config(40.0, 104.0));
        scene.player.grant(PowerKind::Invincible);

        scene.tick(DT, &idle());
        assert!(scene.player.powers.has(PowerKind::Invincible));
        run(&mut scene, &idle(), 120, |_| false);
        assert!(scene.player.powers.has(PowerKind::Invincible));

        assert!(run(&mut scene, &idle(), 600, |s| !s.player.powers.has(PowerKind::Invincible)));
        assert_eq!(scene.player.avatar.tint, WHITE);
        assert!(scene.player.powers.has(PowerKind::Move));
    }

    #[test]
    fn test_time_up_kills_player() {
        let level = level(FLAT, "", room1());
        let mut scene = scene(level, GameConfig { play_time: 1, ..config(40.0, 104.0) });

        run(&mut scene, &idle(), 61, |s| s.player.avatar.dead);

        assert!(scene.player.avatar.dead);
        assert_eq!(scene.hud.get_int(HudKey::Time), 0);
    }

    #[test]
    fn test_block_contents() {
        let level = level(FLAT, "", room1());
        let mut scene = scene(level, config(40.0, 104.0));

        scene.create_power_up("coin", 3, 4);
        scene.tick(DT, &idle());
        assert_eq!(scene.hud.get_int(HudKey::Coins), 1);
        assert_eq!(scene.world.coins.count(), 1);

        scene.create_power_up("mushroom", 5, 4);
        scene.player.grant(PowerKind::Large);
        scene.create_power_up("mushroom", 8, 4);
        let kinds: Vec<PowerUpKind> = scene.world.power_ups.iter().map(|(_, p)| p.kind).collect();
        assert_eq!(kinds, vec![PowerUpKind::Mushroom, PowerUpKind::Flower]);
    }

    #[test]
    fn test_coin_spin_leaves_tip() {
        let level = level(FLAT, "", room1());
        let mut scene = scene(level, config(40.0, 104.0));

        scene.create_power_up("coin", 3, 4);
        run(&mut scene, &idle(), 30, |s| !s.tips.is_empty());

        assert_eq!(scene.world.coins.count(), 0);
        assert_eq!(scene.tips[0].text, "+1");
    }

    #[test]
    fn test_pipe_transit_moves_player_to_next_room() {
        let rows = [
            "........................................",
            "........................................",
            "........................................",
            "........................................",
            "........................................",
            "....[]..................................",
            "....()..................................",
            "########################################",
        ];
        let modifiers = "Pipe(name: \"under\", x: 64.0, y: 80.0, direction: down), \
            Pipe(name: \"under\", x: 80.0, y: 80.0, direction: down), \
            Dest(name: \"under\", x: 352.0, y: 16.0), \
            Room(name: \"room1\", x: 0.0, y: 0.0, width: 320.0, height: 128.0), \
            Room(name: \"room2\", x: 320.0, y: 0.0, width: 320.0, height: 128.0)";
        let mut scene = scene(level(&rows, "", modifiers), config(80.0, 72.0));
        let down = Controls::holding(&[Action::Down]);

        scene.tick(DT, &down);
        assert!(scene.in_transit());
        assert!(scene.player.avatar.in_pipe);

        assert!(run(&mut scene, &down, 150, |s| !s.in_transit()));
        assert_eq!(scene.player.avatar.center(), Vec2::new(368.0, 24.0));
        assert!(!scene.player.avatar.in_pipe);
        assert_eq!(scene.world.bounds, Rect::new(320.0, 0.0, 320.0, 128.0));
        assert_eq!(scene.camera.bounds(), scene.world.bounds);
    }

    #[test]
    fn test_reaching_flag_restarts_without_carry() {
        let rows = [
            "....................",
            "....................",
            "....................",
            "....................",
            "......F.............",
            "......|.............",
            "......|.............",
            "####################",
        ];
        let mut scene = scene(level(&rows, "", room1()), config(100.0, 104.0));
        scene.hud.set_value(HudKey::Coins, HudValue::Int(12));

        scene.tick(DT, &idle());

        assert_eq!(scene.runs, 1);
        assert_eq!(scene.hud.get_int(HudKey::Coins), 0);
        let sounds = scene.drain_sounds();
        let clear = sounds.iter().position(|s| *s == SoundEvent::Play(Sfx::StageClear));
        let music = sounds.iter().position(|s| *s == SoundEvent::ResumeMusic);
        assert!(clear.is_some() && music.is_some());
    }

    #[test]
    fn test_bumped_brick_knocks_enemy_only_when_large() {
        for large in [false, true] {
            let level = level(FLAT, "(kind: Goomba, x: 64.0, y: 112.0)", room1());
            let mut scene = scene(level, config(16.0, 104.0));
            scene.tick(DT, &idle());
            if large {
                scene.player.grant(PowerKind::Large);
            }

            scene.brick.bump(4, 7);
            scene.tick(DT, &idle());

            let (_, goomba) = first_enemy(&scene).unwrap();
            assert_eq!(goomba.dead, large);
            assert!(!goomba.squashed);
        }
    }

    #[test]
    fn test_fireball_knocks_out_goomba() {
        let level = level(FLAT, "(kind: Goomba, x: 120.0, y: 112.0)", room1());
        let mut scene = scene(level, config(40.0, 104.0));
        scene.player.grant(PowerKind::Large);
        scene.player.grant(PowerKind::Fire);

        scene.tick(DT, &Controls::holding(&[Action::Fire]));
        assert_eq!(scene.world.live_fireballs(), 1);

        let hit = run(&mut scene, &idle(), 60, |s| first_enemy(s).is_some_and(|(_, e)| e.dead));
        assert!(hit);
        assert_eq!(scene.hud.get_int(HudKey::Score), 100);
        assert_eq!(first_enemy(&scene).map(|(_, e)| e.kind), Some(EnemyKind::Goomba));
    }

    #[test]
    fn test_nearest_head_hit_only() {
        let hits = vec![
            TileHit { col: 2, row: 1, side: Side::Up },
            TileHit { col: 3, row: 1, side: Side::Up },
            TileHit { col: 5, row: 4, side: Side::Down },
        ];
        let kept = nearest_head_hit(hits, 50.0);
        assert_eq!(kept, vec![
            TileHit { col: 5, row: 4, side: Side::Down },
            TileHit { col: 3, row: 1, side: Side::Up },
        ]);
    }

    #[test]
    fn test_help_text_dims() {
        let mut help = HelpText::new("hint");
        help.update(2.9);
        assert_eq!(help.alpha, HELP_ALPHA);
        help.update(0.2);
        help.update(1.0);
        assert!((help.alpha - HELP_DIM_ALPHA).abs() < 1e-4);
    }
}
