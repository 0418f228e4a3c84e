//! Quest completion orchestration.
//!
//! Completing a quest marks it completed with a timestamp, grants its XP
//! reward through the leveling calculator, grants each attribute reward
//! through the attribute-XP track, and appends a quest feed entry, all in
//! one transaction. A level-up triggered by the XP grant appends its own
//! separate feed entry.

use chrono::Utc;
use log::info;

use crate::logutil::escape_log;
use crate::rpg::errors::RpgError;
use crate::rpg::player::{grant_attribute_xp, grant_xp, XpGrant};
use crate::rpg::storage::RpgStore;
use crate::rpg::types::{ActivityEntry, ActivityKind, PlayerSheet, QuestRecord, QuestStatus};

/// Outcome of [`complete_quest`]. When `already_completed` is set the call
/// was a no-op: nothing was written and no entries were created.
#[derive(Debug, Clone)]
pub struct QuestCompletion {
    pub quest: QuestRecord,
    pub already_completed: bool,
    pub sheet: Option<PlayerSheet>,
    pub xp: Option<XpGrant>,
    pub entry: Option<ActivityEntry>,
}

impl QuestCompletion {
    /// Feed entries created by this completion, in append order.
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

/// Complete a quest exactly once. Missing quests report [`RpgError::NotFound`];
/// re-completing is a no-op with no duplicate rewards or feed entries.
pub fn complete_quest(store: &RpgStore, quest_id: &str) -> Result<QuestCompletion, RpgError> {
    let outcome = store.transact(|tx| {
        let Some(mut quest) = tx.get_quest(quest_id)? else {
            return tx.fail(RpgError::NotFound(format!("quest: {}", quest_id)));
        };

        if quest.is_completed() {
            return Ok(QuestCompletion {
                quest,
                already_completed: true,
                sheet: None,
                xp: None,
                entry: None,
            });
        }

        let Some(mut sheet) = tx.get_player()? else {
            return tx.fail(RpgError::NotFound("player sheet".to_string()));
        };

        let xp = grant_xp(tx, &mut sheet, quest.xp_reward)?;
        for (attribute, amount) in &quest.attribute_reward {
            grant_attribute_xp(&mut sheet, *attribute, *amount);
        }

        quest.status = QuestStatus::Completed;
        quest.completed_at = Some(Utc::now());
        sheet.touch();
        tx.put_quest(&quest)?;
        tx.put_player(&sheet)?;

        let entry = ActivityEntry::new(
            format!("Completed quest: {}", quest.title),
            quest.xp_reward,
            false,
            ActivityKind::Quest,
        );
        tx.append_activity(&entry)?;

        Ok(QuestCompletion {
            quest,
            already_completed: false,
            sheet: Some(sheet),
            xp: Some(xp),
            entry: Some(entry),
        })
    })?;

    if outcome.already_completed {
        info!("quest {} already completed; ignoring", quest_id);
    } else {
        info!(
            "completed quest {} ({}): +{} xp",
            quest_id,
            escape_log(&outcome.quest.title),
            outcome.quest.xp_reward
        );
    }
    Ok(outcome)
}

/// Format the quest log for terminal display.
pub fn format_quest_list(quests: &[QuestRecord]) -> String {
    if quests.is_empty() {
        return "No quests available.".to_string();
    }
    let mut out = String::from("=== QUEST LOG ===\n");
    for quest in quests {
        let marker = if quest.is_completed() { "x" } else { " " };
        let daily = if quest.is_daily { " (daily)" } else { "" };
        out.push_str(&format!(
            "[{}] {} — {} xp{}\n    {}\n",
            marker, quest.title, quest.xp_reward, daily, quest.description
        ));
    }
    out
}
