//! Player sheet operations: idempotent seeding, direct XP grants, attribute
//! training, and character sheet display.

use log::info;
use sled::transaction::ConflictableTransactionResult;

use crate::rpg::errors::RpgError;
use crate::rpg::leveling;
use crate::rpg::state;
use crate::rpg::storage::{ProgressTx, RpgStore};
use crate::rpg::types::{ActivityEntry, ActivityKind, Attribute, PlayerIdentity, PlayerSheet};

/// Outcome of applying an XP grant to the player sheet. Carries the level-up
/// activity entry (if one was created) so callers can surface it directly.
#[derive(Debug, Clone)]
pub struct XpGrant {
    pub level: u32,
    pub current_xp: u64,
    pub xp_to_next_level: u64,
    pub total_xp: u64,
    pub leveled_up: bool,
    pub levels_gained: u32,
    pub level_entry: Option<ActivityEntry>,
}

/// Outcome of an attribute XP grant.
#[derive(Debug, Clone, Copy)]
pub struct AttributeGain {
    pub attribute: Attribute,
    pub value: u32,
    pub attribute_xp: u32,
    pub points_gained: u32,
}

/// Seed the singleton player sheet if it does not exist yet. Existing sheets
/// are never overwritten. Returns the sheet plus whether it was created.
pub fn initialize_player(
    store: &RpgStore,
    identity: &PlayerIdentity,
) -> Result<(PlayerSheet, bool), RpgError> {
    let (sheet, created) = store.transact(|tx| {
        if let Some(existing) = tx.get_player()? {
            return Ok((existing, false));
        }
        let sheet = state::default_player_sheet(identity);
        tx.put_player(&sheet)?;
        Ok((sheet, true))
    })?;
    if created {
        info!("player sheet initialized for {}", sheet.name);
    }
    Ok((sheet, created))
}

/// Apply an XP grant to a loaded sheet inside an open transaction: run the
/// leveling calculator, write the level-up feed entry if a level was gained.
/// The caller is responsible for persisting the sheet.
pub(crate) fn grant_xp(
    tx: &ProgressTx<'_>,
    sheet: &mut PlayerSheet,
    amount: u64,
) -> ConflictableTransactionResult<XpGrant, RpgError> {
    let progress = leveling::apply_xp(
        sheet.level,
        sheet.current_xp,
        sheet.total_xp,
        sheet.xp_to_next_level,
        amount,
    );
    sheet.level = progress.level;
    sheet.current_xp = progress.current_xp;
    sheet.total_xp = progress.total_xp;
    sheet.xp_to_next_level = progress.xp_to_next_level;

    let level_entry = if progress.leveled_up {
        let entry = ActivityEntry::new(
            format!("Leveled up to Level {}!", progress.level),
            0,
            true,
            ActivityKind::Achievement,
        );
        tx.append_activity(&entry)?;
        Some(entry)
    } else {
        None
    };

    Ok(XpGrant {
        level: progress.level,
        current_xp: progress.current_xp,
        xp_to_next_level: progress.xp_to_next_level,
        total_xp: progress.total_xp,
        leveled_up: progress.leveled_up,
        levels_gained: progress.levels_gained,
        level_entry,
    })
}

/// Apply attribute XP to a loaded sheet. Every 100 attribute XP converts into
/// one attribute value point.
pub(crate) fn grant_attribute_xp(
    sheet: &mut PlayerSheet,
    attribute: Attribute,
    amount: u32,
) -> AttributeGain {
    let xp = sheet.attribute_xp(attribute);
    let value = sheet.attribute(attribute);
    let (new_xp, new_value) = leveling::apply_attribute_xp(xp, value, amount);
    sheet.attribute_xp.insert(attribute, new_xp);
    sheet.attributes.insert(attribute, new_value);
    AttributeGain {
        attribute,
        value: new_value,
        attribute_xp: new_xp,
        points_gained: new_value - value,
    }
}

/// Grant XP directly to the player, resolving level-ups atomically with the
/// level-up feed entry.
pub fn add_xp(store: &RpgStore, amount: u64) -> Result<XpGrant, RpgError> {
    let grant = store.transact(|tx| {
        let Some(mut sheet) = tx.get_player()? else {
            return tx.fail(RpgError::NotFound("player sheet".to_string()));
        };
        let grant = grant_xp(tx, &mut sheet, amount)?;
        sheet.touch();
        tx.put_player(&sheet)?;
        Ok(grant)
    })?;
    if grant.leveled_up {
        info!(
            "xp grant of {} leveled player to {} ({} level(s))",
            amount, grant.level, grant.levels_gained
        );
    }
    Ok(grant)
}

/// Grant XP to one attribute track.
pub fn add_attribute_xp(
    store: &RpgStore,
    attribute: Attribute,
    amount: u32,
) -> Result<AttributeGain, RpgError> {
    store.transact(|tx| {
        let Some(mut sheet) = tx.get_player()? else {
            return tx.fail(RpgError::NotFound("player sheet".to_string()));
        };
        let gain = grant_attribute_xp(&mut sheet, attribute, amount);
        sheet.touch();
        tx.put_player(&sheet)?;
        Ok(gain)
    })
}

/// Render the character sheet for terminal display.
pub fn format_player_sheet(sheet: &PlayerSheet) -> String {
    let mut out = format!(
        "=== {} — Level {} {} ===\n",
        sheet.name, sheet.level, sheet.class_name
    );
    out.push_str(&format!(
        "{} | {}\n{}\n",
        sheet.status, sheet.location, sheet.bio
    ));
    out.push_str(&format!(
        "XP: {}/{} (total {})\n",
        sheet.current_xp, sheet.xp_to_next_level, sheet.total_xp
    ));
    out.push_str(&format!("{}\n", xp_bar(sheet.current_xp, sheet.xp_to_next_level)));
    out.push_str("Attributes:\n");
    for attribute in Attribute::ALL {
        out.push_str(&format!(
            "  {:<14} {:>3}  (xp {:>2}/100)\n",
            attribute.as_str(),
            sheet.attribute(attribute),
            sheet.attribute_xp(attribute)
        ));
    }
    out
}

fn xp_bar(current: u64, threshold: u64) -> String {
    const WIDTH: u64 = 24;
    let filled = if threshold == 0 {
        0
    } else {
        (current * WIDTH / threshold).min(WIDTH)
    };
    let mut bar = String::with_capacity(WIDTH as usize + 2);
    bar.push('[');
    for i in 0..WIDTH {
        bar.push(if i < filled { '#' } else { '.' });
    }
    bar.push(']');
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpg::storage::RpgStoreBuilder;
    use tempfile::TempDir;

    fn setup() -> (TempDir, RpgStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = RpgStoreBuilder::new(dir.path()).open().expect("store");
        (dir, store)
    }

    #[test]
    fn initialize_player_is_idempotent() {
        let (_dir, store) = setup();
        let identity = PlayerIdentity::default();

        let (sheet, created) = initialize_player(&store, &identity).expect("init");
        assert!(created);
        assert_eq!(sheet.level, 1);

        // Mutate the sheet, then re-run the seed: the edit must survive.
        let mut edited = store.get_player().expect("get");
        edited.name = "Edited Runner".to_string();
        edited.total_xp = 500;
        store.put_player(edited).expect("put");

        let (sheet, created) = initialize_player(&store, &identity).expect("reinit");
        assert!(!created);
        assert_eq!(sheet.name, "Edited Runner");
        assert_eq!(sheet.total_xp, 500);
    }

    #[test]
    fn add_xp_levels_up_and_logs_once() {
        let (_dir, store) = setup();
        initialize_player(&store, &PlayerIdentity::default()).expect("init");

        let grant = add_xp(&store, 350).expect("grant");
        assert!(grant.leveled_up);
        assert_eq!(grant.level, 2);
        assert_eq!(grant.current_xp, 250);
        assert_eq!(grant.xp_to_next_level, 282);

        let entry = grant.level_entry.expect("level entry");
        assert!(entry.level_up);
        assert_eq!(entry.kind, ActivityKind::Achievement);
        assert_eq!(entry.message, "Leveled up to Level 2!");

        // Exactly one feed entry for the level-up.
        assert_eq!(store.activity_count().expect("count"), 1);

        let sheet = store.get_player().expect("get");
        assert_eq!(sheet.level, 2);
        assert!(sheet.current_xp < sheet.xp_to_next_level);
        assert_eq!(sheet.total_xp, 350);
    }

    #[test]
    fn add_xp_without_level_up_logs_nothing() {
        let (_dir, store) = setup();
        initialize_player(&store, &PlayerIdentity::default()).expect("init");

        let grant = add_xp(&store, 50).expect("grant");
        assert!(!grant.leveled_up);
        assert!(grant.level_entry.is_none());
        assert_eq!(store.activity_count().expect("count"), 0);
    }

    #[test]
    fn add_xp_without_player_reports_not_found() {
        let (_dir, store) = setup();
        assert!(matches!(add_xp(&store, 10), Err(RpgError::NotFound(_))));
    }

    #[test]
    fn add_attribute_xp_crosses_marks() {
        let (_dir, store) = setup();
        initialize_player(&store, &PlayerIdentity::default()).expect("init");

        let gain = add_attribute_xp(&store, Attribute::Learning, 250).expect("train");
        assert_eq!(gain.points_gained, 2);
        assert_eq!(gain.value, 7);
        assert_eq!(gain.attribute_xp, 50);

        let sheet = store.get_player().expect("get");
        assert_eq!(sheet.attribute(Attribute::Learning), 7);
        assert_eq!(sheet.attribute_xp(Attribute::Learning), 50);
        // Other tracks untouched.
        assert_eq!(sheet.attribute(Attribute::Creative), 5);
    }

    #[test]
    fn sheet_formatting_lists_all_attributes() {
        let sheet = PlayerSheet::new(&PlayerIdentity::default());
        let rendered = format_player_sheet(&sheet);
        assert!(rendered.contains("Level 1 Netrunner"));
        assert!(rendered.contains("XP: 0/100"));
        for attribute in Attribute::ALL {
            assert!(rendered.contains(attribute.as_str()));
        }
    }
}
