//! # Netquest - RPG Progression Engine for a Portfolio Character Sheet
//!
//! Netquest treats a developer portfolio as a cyberpunk RPG character sheet:
//! completing quests and unlocking skills grants experience points, drives
//! level-ups, and grows five named attributes, with every progression event
//! recorded in an append-only activity feed.
//!
//! ## Features
//!
//! - **Leveling Calculator**: Pure threshold math (`floor(100 * level^1.5)`)
//!   with multi-level carry-over for large XP grants.
//! - **Attribute Growth**: Five attribute tracks, each crossing a value point
//!   per 100 attribute XP, plus flat permanent bonuses from skills.
//! - **Quests & Skills**: One-shot quest completion and level-gated skill
//!   unlocks, both idempotent and both committed atomically with the player
//!   sheet and the activity feed.
//! - **Embedded Persistence**: Sled-backed document store with bincode-encoded
//!   records and per-record schema versioning.
//! - **Activity Feed**: Append-only, timestamp-ordered progression log;
//!   operations return the entries they create so callers never have to poll.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netquest::config::Config;
//! use netquest::rpg::{self, RpgStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("netquest.toml").await?;
//!     let store = RpgStore::open(config.store_path())?;
//!
//!     rpg::initialize_player(&store, &config.player)?;
//!     let outcome = rpg::complete_quest(&store, "ship-the-redesign")?;
//!     for entry in outcome.entries() {
//!         println!("{}", entry.message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`rpg`] - Progression engine: data model, calculators, store, operations
//! - [`config`] - Configuration management
//! - [`logutil`] - Log sanitization helpers

pub mod config;
pub mod logutil;
pub mod rpg;
