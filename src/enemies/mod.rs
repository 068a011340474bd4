//! Enemies
//!
//! Goombas and turtles share one `Enemy` component; the kind only changes
//! how a stomp is answered. Turtles have three states: walking, hiding in
//! a still shell, and sliding after being kicked. A sliding shell knocks
//! out any other enemy it runs into.

mod group;

pub use group::EnemyGroup;

use serde::{Serialize, Deserialize};
use crate::game::{Body, BurstKind, Events, HudKey, Sfx, Side, TileHit};

pub const WALK_SPEED: f32 = 30.0;
pub const SLIDE_SPEED: f32 = 200.0;
pub const KILL_SCORE: i64 = 100;
/// Seconds a squashed goomba stays on screen
const SQUASH_TIME: f32 = 0.5;
/// Seconds a knocked-out enemy keeps falling before it's pooled
const KNOCKED_TIME: f32 = 1.5;
const KNOCK_VELOCITY: f32 = -200.0;
/// A freshly kicked shell can't hurt the player who kicked it
const KICK_GRACE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Goomba,
    Turtle,
}

impl EnemyKind {
    /// Body size while walking.
    pub fn size(self) -> (f32, f32) {
        match self {
            EnemyKind::Goomba => (16.0, 16.0),
            EnemyKind::Turtle => (16.0, 24.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Walk,
    /// Turtle tucked into a still shell
    Shell,
    /// Kicked shell
    Slide,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub state: EnemyState,
    pub dead: bool,
    /// Squashed flat rather than knocked out
    pub squashed: bool,
    /// Whether touching it hurts the player
    pub attack_power: bool,
    /// Direction of travel
    pub facing_left: bool,
    /// Sprite mirrored to face the velocity
    pub flip_x: bool,
    /// Counts down after death; the enemy is pooled when it runs out
    pub dead_timer: Option<f32>,
    /// Inactive enemies are returned to the pool
    pub active: bool,
    pub anim_time: f32,
    kick_grace: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind) -> Self {
        Self {
            kind,
            state: EnemyState::Walk,
            dead: false,
            squashed: false,
            attack_power: true,
            facing_left: true,
            flip_x: true,
            dead_timer: None,
            active: true,
            anim_time: 0.0,
            kick_grace: 0.0,
        }
    }

    /// Walking body with its feet centered on `(x, y)`.
    pub fn body(kind: EnemyKind, x: f32, y: f32) -> Body {
        let (w, h) = kind.size();
        let mut body = Body::standing(x, y, w, h);
        body.velocity.x = -WALK_SPEED;
        body
    }

    /// Reset a pooled enemy to walk again from `(x, y)`.
    pub fn restore(&mut self, body: &mut Body, x: f32, y: f32) {
        *self = Enemy::new(self.kind);
        *body = Enemy::body(self.kind, x, y);
    }

    /// Touching this enemy hurts.
    pub fn attacks(&self) -> bool {
        self.attack_power && !self.dead && self.kick_grace <= 0.0
    }

    fn speed(&self) -> f32 {
        match self.state {
            EnemyState::Walk => WALK_SPEED,
            EnemyState::Shell => 0.0,
            EnemyState::Slide => SLIDE_SPEED,
        }
    }

    pub fn update(&mut self, body: &mut Body, dt: f32) {
        if !self.active {
            return;
        }
        self.anim_time += dt;
        self.kick_grace = (self.kick_grace - dt).max(0.0);

        if self.dead {
            if let Some(timer) = self.dead_timer.as_mut() {
                *timer -= dt;
                if *timer <= 0.0 {
                    self.active = false;
                    body.disable();
                }
            }
            return;
        }

        let dir = if self.facing_left { -1.0 } else { 1.0 };
        body.velocity.x = dir * self.speed();
    }

    /// Walls turn walkers and shells around.
    pub fn collider_world(&mut self, _body: &mut Body, hit: TileHit) {
        if self.dead {
            return;
        }
        match hit.side {
            Side::Left => self.facing_left = false,
            Side::Right => self.facing_left = true,
            _ => {}
        }
    }

    /// React to overlapping another enemy (`other` is a snapshot).
    pub fn overlap_enemy(
        &mut self,
        body: &mut Body,
        other: &Enemy,
        other_body: &Body,
        events: &mut Events,
    ) {
        if self.dead || other.dead {
            return;
        }
        if other.state == EnemyState::Slide && self.state != EnemyState::Slide {
            self.die(body, true, events);
            return;
        }
        if self.state == EnemyState::Walk {
            let other_is_left = other_body.center().x < body.center().x;
            if other_is_left == self.facing_left {
                self.facing_left = !self.facing_left;
            }
        }
    }

    /// React to the player. Returns true when the enemy handled the contact
    /// and the scene should do nothing more.
    pub fn overlap_player(
        &mut self,
        body: &mut Body,
        player: &Body,
        step_on: bool,
        events: &mut Events,
    ) -> bool {
        if self.dead {
            return false;
        }
        match (self.kind, self.state) {
            (EnemyKind::Goomba, _) if step_on => {
                self.die(body, false, events);
                false
            }
            (EnemyKind::Turtle, EnemyState::Walk | EnemyState::Slide) if step_on => {
                self.enter_shell(body, events);
                false
            }
            (EnemyKind::Turtle, EnemyState::Shell) => {
                self.kick(body, player, events);
                true
            }
            _ => false,
        }
    }

    fn enter_shell(&mut self, body: &mut Body, events: &mut Events) {
        self.state = EnemyState::Shell;
        self.attack_power = false;
        self.anim_time = 0.0;
        body.velocity.x = 0.0;
        body.resize_keep_bottom(16.0, 16.0);
        events.play(Sfx::Stomp);
        events.inc_dec(HudKey::Score, KILL_SCORE);
    }

    fn kick(&mut self, body: &mut Body, player: &Body, events: &mut Events) {
        self.state = EnemyState::Slide;
        self.attack_power = true;
        self.kick_grace = KICK_GRACE;
        self.facing_left = player.center().x > body.center().x;
        body.velocity.x = if self.facing_left { -SLIDE_SPEED } else { SLIDE_SPEED };
        events.play(Sfx::Kick);
    }

    /// Kill the enemy. A `hit` (star, fireball, shell, bumped brick) knocks
    /// it off the level; otherwise it's squashed flat.
    pub fn die(&mut self, body: &mut Body, hit: bool, events: &mut Events) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.attack_power = false;
        self.anim_time = 0.0;
        events.inc_dec(HudKey::Score, KILL_SCORE);

        if hit {
            body.check_collision = false;
            body.velocity.y = KNOCK_VELOCITY;
            self.dead_timer = Some(KNOCKED_TIME);
            events.play(Sfx::Kick);
        } else {
            self.squashed = true;
            body.stop();
            events.burst(BurstKind::Dust, body.center());
            self.dead_timer = Some(SQUASH_TIME);
            events.play(Sfx::Stomp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::HudEvent;

    fn goomba() -> (Enemy, Body) {
        (Enemy::new(EnemyKind::Goomba), Enemy::body(EnemyKind::Goomba, 100.0, 200.0))
    }

    fn turtle() -> (Enemy, Body) {
        (Enemy::new(EnemyKind::Turtle), Enemy::body(EnemyKind::Turtle, 100.0, 200.0))
    }

    #[test]
    fn test_walker_reverses_on_wall() {
        let (mut enemy, mut body) = goomba();
        enemy.update(&mut body, 0.016);
        assert_eq!(body.velocity.x, -WALK_SPEED);

        enemy.collider_world(&mut body, TileHit { col: 5, row: 12, side: Side::Left });
        enemy.update(&mut body, 0.016);
        assert_eq!(body.velocity.x, WALK_SPEED);

        // floors don't turn anything around
        enemy.collider_world(&mut body, TileHit { col: 5, row: 13, side: Side::Down });
        enemy.update(&mut body, 0.016);
        assert_eq!(body.velocity.x, WALK_SPEED);
    }

    #[test]
    fn test_stomped_goomba_squashes_then_deactivates() {
        let (mut enemy, mut body) = goomba();
        let mut events = Events::new();
        let player = Body::standing(100.0, 184.0, 8.0, 16.0);

        let handled = enemy.overlap_player(&mut body, &player, true, &mut events);

        assert!(!handled);
        assert!(enemy.dead && enemy.squashed);
        assert!(!enemy.attacks());
        assert!(events.hud.iter().any(|e| *e == HudEvent::IncDec(HudKey::Score, KILL_SCORE)));

        enemy.update(&mut body, 0.3);
        assert!(enemy.active);
        enemy.update(&mut body, 0.3);
        assert!(!enemy.active);
        assert!(!body.enabled);
    }

    #[test]
    fn test_side_contact_is_left_to_scene() {
        let (mut enemy, mut body) = goomba();
        let mut events = Events::new();
        let player = Body::standing(90.0, 200.0, 8.0, 16.0);
        assert!(!enemy.overlap_player(&mut body, &player, false, &mut events));
        assert!(enemy.attacks());
    }

    #[test]
    fn test_turtle_shell_kick_and_stop() {
        let (mut enemy, mut body) = turtle();
        let mut events = Events::new();
        let player = Body::standing(92.0, 176.0, 8.0, 16.0);

        assert!(!enemy.overlap_player(&mut body, &player, true, &mut events));
        assert_eq!(enemy.state, EnemyState::Shell);
        assert_eq!(body.size.y, 16.0);
        assert_eq!(body.bottom(), 200.0);
        assert!(!enemy.attacks());

        // touching the shell from the left kicks it right
        assert!(enemy.overlap_player(&mut body, &player, false, &mut events));
        assert_eq!(enemy.state, EnemyState::Slide);
        assert!(!enemy.facing_left);
        assert!(!enemy.attacks());
        enemy.update(&mut body, 0.3);
        assert_eq!(body.velocity.x, SLIDE_SPEED);
        assert!(enemy.attacks());

        // stomping a sliding shell stops it again
        assert!(!enemy.overlap_player(&mut body, &player, true, &mut events));
        assert_eq!(enemy.state, EnemyState::Shell);
    }

    #[test]
    fn test_sliding_shell_knocks_out_walker() {
        let (mut walker, mut walker_body) = goomba();
        let (mut shell, shell_body) = turtle();
        shell.state = EnemyState::Slide;
        let mut events = Events::new();

        walker.overlap_enemy(&mut walker_body, &shell, &shell_body, &mut events);

        assert!(walker.dead);
        assert!(!walker.squashed);
        assert!(!walker_body.check_collision);
        assert_eq!(walker_body.velocity.y, KNOCK_VELOCITY);
    }

    #[test]
    fn test_walkers_turn_away_from_each_other() {
        let (mut a, mut a_body) = goomba();
        let b = Enemy::new(EnemyKind::Goomba);
        let b_body = Enemy::body(EnemyKind::Goomba, 90.0, 200.0);
        let mut events = Events::new();

        // a walks left into b
        a.overlap_enemy(&mut a_body, &b, &b_body, &mut events);
        assert!(!a.facing_left);

        // already walking away: no change
        a.overlap_enemy(&mut a_body, &b, &b_body, &mut events);
        assert!(!a.facing_left);
    }

    #[test]
    fn test_die_twice_scores_once() {
        let (mut enemy, mut body) = goomba();
        let mut events = Events::new();
        enemy.die(&mut body, true, &mut events);
        enemy.die(&mut body, false, &mut events);
        assert_eq!(events.hud.len(), 1);
        assert!(!enemy.squashed);
    }

    #[test]
    fn test_restore_resets_everything() {
        let (mut enemy, mut body) = turtle();
        let mut events = Events::new();
        enemy.die(&mut body, true, &mut events);
        enemy.update(&mut body, 2.0);
        assert!(!enemy.active);

        enemy.restore(&mut body, 300.0, 208.0);

        assert!(enemy.active && !enemy.dead);
        assert_eq!(enemy.state, EnemyState::Walk);
        assert!(body.enabled && body.check_collision);
        assert_eq!(body.bottom(), 208.0);
        assert_eq!(body.center().x, 300.0);
    }
}
