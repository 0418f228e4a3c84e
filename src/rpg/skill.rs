//! Skill unlock orchestration and skill tree display.
//!
//! Unlocking is level-gated and permanent. The XP reward flows through the
//! leveling calculator; the attribute bonus is a flat permanent increment to
//! the attribute value, bypassing the attribute-XP track entirely.

use log::info;

use crate::logutil::escape_log;
use crate::rpg::errors::RpgError;
use crate::rpg::player::{grant_xp, XpGrant};
use crate::rpg::storage::RpgStore;
use crate::rpg::types::{ActivityEntry, ActivityKind, PlayerSheet, SkillRecord, SkillStatus};

/// Outcome of [`unlock_skill`]. When `already_unlocked` is set the call was
/// a no-op: the skill was not locked and nothing was written.
#[derive(Debug, Clone)]
pub struct SkillUnlock {
    pub skill: SkillRecord,
    pub already_unlocked: bool,
    pub sheet: Option<PlayerSheet>,
    pub xp: Option<XpGrant>,
    pub entry: Option<ActivityEntry>,
}

impl SkillUnlock {
    /// Feed entries created by this unlock, in append order.
    pub fn entries(&self) -> Vec<&ActivityEntry> {
        let mut entries = Vec::new();
        if let Some(grant) = &self.xp {
            if let Some(level_entry) = &grant.level_entry {
                entries.push(level_entry);
            }
        }
        if let Some(entry) = &self.entry {
            entries.push(entry);
        }
        entries
    }
}

/// Unlock a locked skill. Missing skills report [`RpgError::NotFound`];
/// unlocking a non-locked skill is a no-op; a player below the skill's
/// required level gets [`RpgError::LevelRequirement`] with nothing mutated.
pub fn unlock_skill(store: &RpgStore, skill_id: &str) -> Result<SkillUnlock, RpgError> {
    let outcome = store.transact(|tx| {
        let Some(mut skill) = tx.get_skill(skill_id)? else {
            return tx.fail(RpgError::NotFound(format!("skill: {}", skill_id)));
        };

        if !skill.is_locked() {
            return Ok(SkillUnlock {
                skill,
                already_unlocked: true,
                sheet: None,
                xp: None,
                entry: None,
            });
        }

        let Some(mut sheet) = tx.get_player()? else {
            return tx.fail(RpgError::NotFound("player sheet".to_string()));
        };

        if sheet.level < skill.required_level {
            return tx.fail(RpgError::LevelRequirement {
                required: skill.required_level,
                current: sheet.level,
            });
        }

        skill.status = SkillStatus::Unlocked;
        let xp = grant_xp(tx, &mut sheet, skill.xp_reward)?;

        // Flat permanent bonus: increments the value directly, leaving the
        // attribute-XP counter alone.
        for (attribute, bonus) in &skill.attribute_bonus {
            let value = sheet.attributes.entry(*attribute).or_insert(0);
            *value += *bonus;
        }

        sheet.touch();
        tx.put_skill(&skill)?;
        tx.put_player(&sheet)?;

        let entry = ActivityEntry::new(
            format!("Unlocked skill: {}", skill.label),
            skill.xp_reward,
            false,
            ActivityKind::Skill,
        );
        tx.append_activity(&entry)?;

        Ok(SkillUnlock {
            skill,
            already_unlocked: false,
            sheet: Some(sheet),
            xp: Some(xp),
            entry: Some(entry),
        })
    })?;

    if outcome.already_unlocked {
        info!("skill {} is not locked; ignoring unlock", skill_id);
    } else {
        info!(
            "unlocked skill {} ({}): +{} xp",
            skill_id,
            escape_log(&outcome.skill.label),
            outcome.skill.xp_reward
        );
    }
    Ok(outcome)
}

/// Render the skill tree for terminal display, indenting children under
/// their `parent_id`.
pub fn format_skill_tree(skills: &[SkillRecord]) -> String {
    if skills.is_empty() {
        return "No skills defined.".to_string();
    }
    let mut out = String::from("=== SKILL TREE ===\n");
    let roots: Vec<&SkillRecord> = skills.iter().filter(|s| s.parent_id.is_none()).collect();
    for root in roots {
        format_skill_branch(skills, root, 0, &mut out);
    }
    out
}

fn format_skill_branch(skills: &[SkillRecord], node: &SkillRecord, depth: usize, out: &mut String) {
    let marker = match node.status {
        SkillStatus::Locked => " ",
        SkillStatus::Unlocked => "x",
        SkillStatus::Mastered => "*",
    };
    out.push_str(&format!(
        "{}[{}] {} (Lv{}, {} xp)\n",
        "  ".repeat(depth),
        marker,
        node.label,
        node.required_level,
        node.xp_reward
    ));
    for child in skills
        .iter()
        .filter(|s| s.parent_id.as_deref() == Some(node.id.as_str()))
    {
        format_skill_branch(skills, child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpg::player::{add_xp, initialize_player};
    use crate::rpg::storage::RpgStoreBuilder;
    use crate::rpg::types::{Attribute, PlayerIdentity};
    use tempfile::TempDir;

    fn setup() -> (TempDir, RpgStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = RpgStoreBuilder::new(dir.path()).open().expect("store");
        initialize_player(&store, &PlayerIdentity::default()).expect("init");
        (dir, store)
    }

    #[test]
    fn unlock_grants_xp_and_flat_bonus() {
        let (_dir, store) = setup();
        let skill = SkillRecord::new("rust", "Rust", "backend", 1, 60)
            .with_attribute_bonus(Attribute::Intelligence, 2);
        store.put_skill(skill).expect("put");

        let outcome = unlock_skill(&store, "rust").expect("unlock");
        assert!(!outcome.already_unlocked);
        assert_eq!(outcome.skill.status, SkillStatus::Unlocked);

        let sheet = store.get_player().expect("get");
        assert_eq!(sheet.total_xp, 60);
        // Flat bonus bypasses the attribute-XP track.
        assert_eq!(sheet.attribute(Attribute::Intelligence), 7);
        assert_eq!(sheet.attribute_xp(Attribute::Intelligence), 0);

        let entries = outcome.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, ActivityKind::Skill);
    }

    #[test]
    fn unlock_is_idempotent() {
        let (_dir, store) = setup();
        store
            .put_skill(SkillRecord::new("rust", "Rust", "backend", 1, 60))
            .expect("put");

        unlock_skill(&store, "rust").expect("first");
        let second = unlock_skill(&store, "rust").expect("second");
        assert!(second.already_unlocked);
        assert!(second.entries().is_empty());

        let sheet = store.get_player().expect("get");
        assert_eq!(sheet.total_xp, 60);
        assert_eq!(store.activity_count().expect("count"), 1);
    }

    #[test]
    fn mastered_skill_is_treated_as_unlocked() {
        let (_dir, store) = setup();
        let mut skill = SkillRecord::new("rust", "Rust", "backend", 1, 60);
        skill.status = SkillStatus::Mastered;
        store.put_skill(skill).expect("put");

        let outcome = unlock_skill(&store, "rust").expect("unlock");
        assert!(outcome.already_unlocked);
        assert_eq!(store.get_player().expect("get").total_xp, 0);
    }

    #[test]
    fn level_gate_blocks_and_mutates_nothing() {
        let (_dir, store) = setup();
        store
            .put_skill(
                SkillRecord::new("threejs", "Three.js", "web", 5, 120)
                    .with_attribute_bonus(Attribute::Creative, 2),
            )
            .expect("put");

        let err = unlock_skill(&store, "threejs").expect_err("should be gated");
        assert!(matches!(
            err,
            RpgError::LevelRequirement {
                required: 5,
                current: 1
            }
        ));

        // Nothing changed: skill still locked, player untouched, feed empty.
        let skill = store.get_skill("threejs").expect("get skill");
        assert!(skill.is_locked());
        let sheet = store.get_player().expect("get player");
        assert_eq!(sheet.total_xp, 0);
        assert_eq!(sheet.attribute(Attribute::Creative), 5);
        assert_eq!(store.activity_count().expect("count"), 0);
    }

    #[test]
    fn missing_skill_reports_not_found() {
        let (_dir, store) = setup();
        assert!(matches!(
            unlock_skill(&store, "nope"),
            Err(RpgError::NotFound(_))
        ));
    }

    #[test]
    fn gate_opens_after_leveling() {
        let (_dir, store) = setup();
        store
            .put_skill(SkillRecord::new("react", "React", "web", 2, 75))
            .expect("put");

        assert!(unlock_skill(&store, "react").is_err());
        add_xp(&store, 150).expect("level to 2");
        let outcome = unlock_skill(&store, "react").expect("unlock");
        assert!(!outcome.already_unlocked);
    }

    #[test]
    fn tree_formatting_indents_children() {
        let skills = vec![
            SkillRecord::new("systems", "Systems", "backend", 1, 50),
            SkillRecord::new("rust", "Rust", "backend", 3, 100).with_parent("systems"),
        ];
        let rendered = format_skill_tree(&skills);
        assert!(rendered.contains("[ ] Systems"));
        assert!(rendered.contains("  [ ] Rust (Lv3, 100 xp)"));
    }
}
