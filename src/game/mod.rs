//! Game Foundation Module
//!
//! A lightweight ECS-inspired framework for the side-scroller. Inspired by
//! Bevy's patterns but simplified for what a tile-based platformer needs.
//!
//! Key concepts:
//! - Entity: Generational index for safe entity references
//! - Component: Plain data structs attached to entities
//! - World: Container for all entities and their components
//! - Body / collision: Arcade AABB physics against the tile grid
//! - Event: Decoupled communication between systems
//!
//! Design philosophy:
//! - Simple over flexible (we know what game we're making)
//! - No runtime type registration (compile-time known components)

pub mod entity;
pub mod component;
pub mod world;
pub mod event;
pub mod body;
pub mod collision;
pub mod tween;
pub mod particles;

// Re-export main types
pub use entity::Entity;
pub use world::World;
pub use body::Body;
pub use collision::{step_body, overlaps, touch, is_stomp, Side, TileHit};
pub use event::*;
pub use particles::ParticlePool;
