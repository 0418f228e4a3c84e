use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rpg::errors::RpgError;
use crate::rpg::leveling;

pub const PLAYER_SCHEMA_VERSION: u8 = 1;
pub const QUEST_SCHEMA_VERSION: u8 = 1;
pub const SKILL_SCHEMA_VERSION: u8 = 1;
pub const ACTIVITY_SCHEMA_VERSION: u8 = 1;
pub const CONTENT_SCHEMA_VERSION: u8 = 1;

/// The five character attributes grown through play.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Learning,
    Collaboration,
    Technical,
    Intelligence,
    Creative,
}

impl Attribute {
    /// Canonical display order (matches the pentagon chart, clockwise).
    pub const ALL: [Attribute; 5] = [
        Attribute::Learning,
        Attribute::Collaboration,
        Attribute::Technical,
        Attribute::Intelligence,
        Attribute::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Learning => "learning",
            Attribute::Collaboration => "collaboration",
            Attribute::Technical => "technical",
            Attribute::Intelligence => "intelligence",
            Attribute::Creative => "creative",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = RpgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "learning" => Ok(Attribute::Learning),
            "collaboration" => Ok(Attribute::Collaboration),
            "technical" => Ok(Attribute::Technical),
            "intelligence" => Ok(Attribute::Intelligence),
            "creative" => Ok(Attribute::Creative),
            other => Err(RpgError::UnknownAttribute(other.to_string())),
        }
    }
}

/// Identity fields for the player sheet, supplied by configuration so the
/// seeded sheet matches whoever owns the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub status: String,
    pub location: String,
    pub bio: String,
}

impl Default for PlayerIdentity {
    fn default() -> Self {
        Self {
            name: "Runner".to_string(),
            class_name: "Netrunner".to_string(),
            status: "Online".to_string(),
            location: "Night City".to_string(),
            bio: "Full Stack Developer | Creative Technologist".to_string(),
        }
    }
}

/// The singleton player sheet. Invariants maintained by the engine:
/// `current_xp < xp_to_next_level` after every mutation (overflow carries
/// into level-ups), `total_xp` never decreases, and every attribute XP
/// counter stays in `[0, 100)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSheet {
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub level: u32,
    pub current_xp: u64,
    pub xp_to_next_level: u64,
    pub total_xp: u64,
    pub status: String,
    pub location: String,
    pub bio: String,
    pub attributes: HashMap<Attribute, u32>,
    pub attribute_xp: HashMap<Attribute, u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl PlayerSheet {
    pub fn new(identity: &PlayerIdentity) -> Self {
        let now = Utc::now();
        let mut attributes = HashMap::new();
        let mut attribute_xp = HashMap::new();
        for attribute in Attribute::ALL {
            attributes.insert(attribute, 5);
            attribute_xp.insert(attribute, 0);
        }
        Self {
            name: identity.name.clone(),
            class_name: identity.class_name.clone(),
            level: 1,
            current_xp: 0,
            xp_to_next_level: leveling::xp_threshold(1),
            total_xp: 0,
            status: identity.status.clone(),
            location: identity.location.clone(),
            bio: identity.bio.clone(),
            attributes,
            attribute_xp,
            created_at: now,
            updated_at: now,
            schema_version: PLAYER_SCHEMA_VERSION,
        }
    }

    pub fn attribute(&self, attribute: Attribute) -> u32 {
        self.attributes.get(&attribute).copied().unwrap_or(0)
    }

    pub fn attribute_xp(&self, attribute: Attribute) -> u32 {
        self.attribute_xp.get(&attribute).copied().unwrap_or(0)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Quest lifecycle. Created available, completed exactly once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Available,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub xp_reward: u64,
    #[serde(default)]
    pub attribute_reward: HashMap<Attribute, u32>,
    pub status: QuestStatus,
    pub is_daily: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl QuestRecord {
    pub fn new(id: &str, title: &str, description: &str, xp_reward: u64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            xp_reward,
            attribute_reward: HashMap::new(),
            status: QuestStatus::Available,
            is_daily: false,
            completed_at: None,
            created_at: Utc::now(),
            schema_version: QUEST_SCHEMA_VERSION,
        }
    }

    pub fn with_attribute_reward(mut self, attribute: Attribute, amount: u32) -> Self {
        self.attribute_reward.insert(attribute, amount);
        self
    }

    pub fn daily(mut self) -> Self {
        self.is_daily = true;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == QuestStatus::Completed
    }
}

/// Skill lifecycle. The engine only drives `Locked -> Unlocked`; `Mastered`
/// is an editor-authored terminal state that unlocking treats as already
/// unlocked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkillStatus {
    Locked,
    Unlocked,
    Mastered,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillRecord {
    pub id: String,
    pub label: String,
    pub category: String,
    pub status: SkillStatus,
    /// Tree edge to the prerequisite skill, if any.
    pub parent_id: Option<String>,
    pub required_level: u32,
    pub xp_reward: u64,
    /// Flat permanent attribute increments applied on unlock, bypassing the
    /// attribute-XP track.
    #[serde(default)]
    pub attribute_bonus: HashMap<Attribute, u32>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl SkillRecord {
    pub fn new(id: &str, label: &str, category: &str, required_level: u32, xp_reward: u64) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            category: category.to_string(),
            status: SkillStatus::Locked,
            parent_id: None,
            required_level,
            xp_reward,
            attribute_bonus: HashMap::new(),
            description: None,
            created_at: Utc::now(),
            schema_version: SKILL_SCHEMA_VERSION,
        }
    }

    pub fn with_parent(mut self, parent_id: &str) -> Self {
        self.parent_id = Some(parent_id.to_string());
        self
    }

    pub fn with_attribute_bonus(mut self, attribute: Attribute, amount: u32) -> Self {
        self.attribute_bonus.insert(attribute, amount);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn is_locked(&self) -> bool {
        self.status == SkillStatus::Locked
    }
}

/// Category of a progression event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Quest,
    Skill,
    Project,
    Achievement,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Quest => "quest",
            ActivityKind::Skill => "skill",
            ActivityKind::Project => "project",
            ActivityKind::Achievement => "achievement",
        }
    }
}

/// One append-only progression event. Never mutated after it is written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub id: String,
    pub message: String,
    pub xp_gained: u64,
    pub level_up: bool,
    pub timestamp: DateTime<Utc>,
    pub kind: ActivityKind,
    pub schema_version: u8,
}

impl ActivityEntry {
    pub fn new(message: String, xp_gained: u64, level_up: bool, kind: ActivityKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message,
            xp_gained,
            level_up,
            timestamp: Utc::now(),
            kind,
            schema_version: ACTIVITY_SCHEMA_VERSION,
        }
    }
}

/// Portfolio project entry, displayed on the projects page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    pub order: u32,
    #[serde(default)]
    pub xp_granted: Option<u64>,
    #[serde(default)]
    pub attribute_bonus: HashMap<Attribute, u32>,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl ProjectRecord {
    pub fn new(id: &str, title: &str, description: &str, order: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            tech_stack: Vec::new(),
            demo_url: None,
            repo_url: None,
            order,
            xp_granted: None,
            attribute_bonus: HashMap::new(),
            created_at: Utc::now(),
            schema_version: CONTENT_SCHEMA_VERSION,
        }
    }

    pub fn with_tech(mut self, tech: &[&str]) -> Self {
        self.tech_stack = tech.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_repo(mut self, url: &str) -> Self {
        self.repo_url = Some(url.to_string());
        self
    }
}

/// Timeline entry kind for the experience page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceKind {
    Work,
    Education,
}

/// Work or education timeline entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperienceRecord {
    pub id: String,
    pub role: String,
    pub company: String,
    pub period: String,
    pub description: String,
    pub kind: ExperienceKind,
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl ExperienceRecord {
    pub fn new(
        id: &str,
        role: &str,
        company: &str,
        period: &str,
        kind: ExperienceKind,
        order: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            role: role.to_string(),
            company: company.to_string(),
            period: period.to_string(),
            description: String::new(),
            kind,
            order,
            created_at: Utc::now(),
            schema_version: CONTENT_SCHEMA_VERSION,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}
