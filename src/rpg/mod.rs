//! Progression engine: data model, pure calculators, sled-backed persistence,
//! and the quest/skill/XP orchestration that drives the character sheet.

pub mod activity;
pub mod content;
pub mod errors;
pub mod leveling;
pub mod player;
pub mod quest;
pub mod skill;
pub mod state;
pub mod storage;
pub mod types;

pub use activity::{format_activity_feed, format_entry, log_activity, recent_activity};
pub use content::{
    format_experience_timeline, format_project_list, list_experience, list_projects,
};
pub use errors::RpgError;
pub use leveling::{
    apply_attribute_xp, apply_xp, xp_threshold, LevelProgress, ATTRIBUTE_XP_PER_POINT, BASE_XP,
    LEVEL_EXPONENT,
};
pub use player::{
    add_attribute_xp, add_xp, format_player_sheet, initialize_player, AttributeGain, XpGrant,
};
pub use quest::{complete_quest, format_quest_list, QuestCompletion};
pub use skill::{format_skill_tree, unlock_skill, SkillUnlock};
pub use state::{default_player_sheet, seed_demo_content};
pub use storage::{ProgressTx, RpgStore, RpgStoreBuilder};
pub use types::*;
