//! Heads-up display
//!
//! A row of titled counters across the top of the screen. Numeric values
//! count towards a new value instead of jumping, and `inc_dec` gives the
//! item a small pulse so pickups are noticeable.

use std::fmt;
use crate::game::tween::{Ease, Tween};
use crate::game::{HudEvent, HudKey};

const COUNT_TIME: f32 = 0.3;
const PULSE_SCALE: f32 = 1.15;
const PULSE_TIME: f32 = 0.12;
/// Horizontal slots as fractions of the screen width
const SLOTS: [f32; 5] = [0.20, 0.35, 0.50, 0.65, 0.80];
const MARGIN: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub enum HudValue {
    Int(i64),
    Infinite,
}

impl HudValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            HudValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for HudValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HudValue::Int(n) => f.write_str(&group_thousands(*n)),
            HudValue::Infinite => f.write_str("INF"),
        }
    }
}

/// `1234567` → `"1,234,567"`
fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub type Provider = Box<dyn Fn() -> i64>;

pub struct HudItem {
    pub key: HudKey,
    pub title: &'static str,
    value: HudValue,
    /// Value currently shown while counting
    counting: Option<Tween>,
    pulse: Option<Tween>,
    provider: Option<Provider>,
    pub x: f32,
    pub y: f32,
    /// Base scale from the layout, before any pulse
    pub base_scale: f32,
}

impl HudItem {
    pub fn new(key: HudKey, title: &'static str, value: HudValue) -> Self {
        Self {
            key,
            title,
            value,
            counting: None,
            pulse: None,
            provider: None,
            x: 0.0,
            y: MARGIN,
            base_scale: 1.0,
        }
    }

    /// An item whose value is read from `provider` every frame.
    pub fn provided(key: HudKey, title: &'static str, provider: Provider) -> Self {
        let value = HudValue::Int(provider());
        Self { provider: Some(provider), ..Self::new(key, title, value) }
    }

    fn shown(&self) -> HudValue {
        match (&self.counting, &self.value) {
            (Some(tween), HudValue::Int(_)) => HudValue::Int(tween.value().floor() as i64),
            _ => self.value.clone(),
        }
    }

    /// `"TITLE\nVALUE"`
    pub fn text(&self) -> String {
        format!("{}\n{}", self.title, self.shown())
    }

    pub fn scale(&self) -> f32 {
        self.base_scale * self.pulse.map_or(1.0, |p| p.value())
    }
}

pub struct Hud {
    items: Vec<HudItem>,
}

impl Hud {
    pub fn new(items: Vec<HudItem>) -> Self {
        Self { items }
    }

    fn item(&self, key: HudKey) -> Option<&HudItem> {
        self.items.iter().find(|i| i.key == key)
    }

    fn item_mut(&mut self, key: HudKey) -> Option<&mut HudItem> {
        self.items.iter_mut().find(|i| i.key == key)
    }

    pub fn items(&self) -> &[HudItem] {
        &self.items
    }

    pub fn get_value(&self, key: HudKey) -> Option<&HudValue> {
        self.item(key).map(|i| &i.value)
    }

    pub fn get_int(&self, key: HudKey) -> i64 {
        self.get_value(key).and_then(HudValue::as_int).unwrap_or(0)
    }

    /// Numbers count towards the new value; anything else is set at once.
    pub fn set_value(&mut self, key: HudKey, value: HudValue) {
        let Some(item) = self.item_mut(key) else {
            return;
        };
        match (&item.value, &value) {
            (HudValue::Int(old), HudValue::Int(new)) => {
                if old != new {
                    let from = match &item.counting {
                        Some(t) => t.value(),
                        None => *old as f32,
                    };
                    item.counting = Some(Tween::new(from, *new as f32, COUNT_TIME, Ease::SineOut));
                }
            }
            _ => item.counting = None,
        }
        item.value = value;
    }

    /// Add `delta` and pulse the item.
    pub fn inc_dec(&mut self, key: HudKey, delta: i64) {
        let Some(item) = self.item_mut(key) else {
            return;
        };
        if let HudValue::Int(n) = item.value {
            item.value = HudValue::Int(n + delta);
            item.counting = None;
        }
        item.pulse = Some(Tween::new(1.0, PULSE_SCALE, PULSE_TIME, Ease::SineOut).yoyo());
    }

    pub fn apply(&mut self, event: HudEvent) {
        match event {
            HudEvent::IncDec(key, delta) => self.inc_dec(key, delta),
            HudEvent::Set(key, value) => self.set_value(key, HudValue::Int(value)),
        }
    }

    pub fn update(&mut self, dt: f32) {
        for item in &mut self.items {
            if let Some(provider) = &item.provider {
                let now = provider();
                item.value = HudValue::Int(now);
            }
            if let Some(tween) = item.counting.as_mut() {
                tween.update(dt);
                if tween.is_done() {
                    item.counting = None;
                }
            }
            if let Some(pulse) = item.pulse.as_mut() {
                pulse.update(dt);
                if pulse.is_done() {
                    item.pulse = None;
                }
            }
        }
    }

    /// Spread the items over the screen width. Positions and scale are in
    /// camera space, so they're divided by the zoom.
    pub fn layout(&mut self, width: f32, zoom: f32) {
        let zoom = if zoom > 0.0 { zoom } else { 1.0 };
        let count = self.items.len().max(1) as f32;
        for (index, item) in self.items.iter_mut().enumerate() {
            let fraction = SLOTS.get(index).copied().unwrap_or(index as f32 / count);
            let px = (width * fraction).round();
            let px = if index == 0 { px.max(MARGIN) } else { px };
            item.x = px / zoom;
            item.y = MARGIN / zoom;
            item.base_scale = 1.0 / zoom;
        }
    }
}
