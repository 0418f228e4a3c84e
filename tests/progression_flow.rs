//! End-to-end progression flow against a real on-disk store: seed a player,
//! install demo content, complete quests, climb levels, and unlock gated
//! skills, checking the character sheet and activity feed along the way.

use tempfile::TempDir;

use netquest::rpg::{self, Attribute, PlayerIdentity, RpgError, RpgStore, RpgStoreBuilder};

fn fresh_store(dir: &TempDir) -> RpgStore {
    RpgStoreBuilder::new(dir.path()).open().expect("store")
}

fn seeded_store(dir: &TempDir) -> RpgStore {
    let store = fresh_store(dir);
    let identity = PlayerIdentity::default();
    let (sheet, created) = rpg::initialize_player(&store, &identity).expect("initialize");
    assert!(created);
    assert_eq!(sheet.level, 1);
    rpg::seed_demo_content(&store).expect("seed");
    store
}

#[test]
fn quest_completion_updates_sheet_and_feed() {
    let dir = TempDir::new().expect("tempdir");
    let store = seeded_store(&dir);

    let outcome = rpg::complete_quest(&store, "write-a-postmortem").expect("complete");
    assert!(!outcome.already_completed);
    assert!(outcome.quest.is_completed());
    assert!(outcome.quest.completed_at.is_some());

    // 80 xp at level 1 (threshold 100): no level-up yet.
    let sheet = outcome.sheet.expect("sheet");
    assert_eq!(sheet.level, 1);
    assert_eq!(sheet.current_xp, 80);
    assert_eq!(sheet.total_xp, 80);
    assert_eq!(sheet.attribute_xp(Attribute::Learning), 25);
    assert_eq!(sheet.attribute(Attribute::Learning), 5);

    let feed = rpg::recent_activity(&store, 10).expect("feed");
    assert_eq!(feed.len(), 1);
    assert!(feed[0].message.contains("Write a postmortem"));
    assert_eq!(feed[0].xp_gained, 80);
    assert!(!feed[0].level_up);
}

#[test]
fn quest_xp_overflow_levels_up_and_logs_both_entries() {
    let dir = TempDir::new().expect("tempdir");
    let store = seeded_store(&dir);

    // 150 xp crosses the level-1 threshold of 100.
    let outcome = rpg::complete_quest(&store, "ship-the-redesign").expect("complete");
    let sheet = outcome.sheet.clone().expect("sheet");
    assert_eq!(sheet.level, 2);
    assert_eq!(sheet.current_xp, 50);
    assert_eq!(sheet.total_xp, 150);
    assert_eq!(sheet.xp_to_next_level, rpg::xp_threshold(2));

    let entries = outcome.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].message.contains("Leveled up to Level 2"));
    assert!(entries[0].level_up);
    assert!(entries[1].message.contains("Ship the portfolio redesign"));

    // The feed is newest-first, so the quest entry comes back first.
    let feed = rpg::recent_activity(&store, 10).expect("feed");
    assert_eq!(feed.len(), 2);
    assert!(feed[0].message.contains("Ship the portfolio redesign"));
    assert!(feed[1].level_up);
}

#[test]
fn completing_a_quest_twice_grants_nothing_extra() {
    let dir = TempDir::new().expect("tempdir");
    let store = seeded_store(&dir);

    rpg::complete_quest(&store, "review-a-pull-request").expect("first");
    let repeat = rpg::complete_quest(&store, "review-a-pull-request").expect("second");
    assert!(repeat.already_completed);
    assert!(repeat.sheet.is_none());
    assert!(repeat.entries().is_empty());

    let sheet = store.get_player().expect("player");
    assert_eq!(sheet.total_xp, 40);
    assert_eq!(rpg::recent_activity(&store, 10).expect("feed").len(), 1);
}

#[test]
fn level_gate_blocks_then_opens() {
    let dir = TempDir::new().expect("tempdir");
    let store = seeded_store(&dir);

    // "rust" requires level 3; a level-1 player is turned away untouched.
    let err = rpg::unlock_skill(&store, "rust").expect_err("should be gated");
    match err {
        RpgError::LevelRequirement { required, current } => {
            assert_eq!(required, 3);
            assert_eq!(current, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    let skill = store.get_skill("rust").expect("skill");
    assert!(skill.is_locked());
    assert!(rpg::recent_activity(&store, 10).expect("feed").is_empty());

    // Level 3 needs 100 + 282 total xp.
    rpg::add_xp(&store, 400).expect("grind");
    let sheet = store.get_player().expect("player");
    assert!(sheet.level >= 3);
    let technical_before = sheet.attribute(Attribute::Technical);

    let outcome = rpg::unlock_skill(&store, "rust").expect("unlock");
    assert!(!outcome.already_unlocked);
    assert!(!outcome.skill.is_locked());

    // Flat attribute bonuses land directly on the sheet, skipping the xp track.
    let sheet = outcome.sheet.expect("sheet");
    assert_eq!(sheet.attribute(Attribute::Technical), technical_before + 1);
    assert_eq!(sheet.attribute_xp(Attribute::Technical), 0);
}

#[test]
fn reinitializing_preserves_progress() {
    let dir = TempDir::new().expect("tempdir");
    let store = seeded_store(&dir);

    rpg::complete_quest(&store, "ship-the-redesign").expect("complete");

    let identity = PlayerIdentity::default();
    let (sheet, created) = rpg::initialize_player(&store, &identity).expect("reinit");
    assert!(!created);
    assert_eq!(sheet.level, 2);
    assert_eq!(sheet.total_xp, 150);
}

#[test]
fn store_reopen_sees_persisted_progress() {
    let dir = TempDir::new().expect("tempdir");
    {
        let store = seeded_store(&dir);
        rpg::complete_quest(&store, "read-a-paper").expect("complete");
    }

    let store = fresh_store(&dir);
    let sheet = store.get_player().expect("player");
    assert_eq!(sheet.total_xp, 60);
    let quest = store.get_quest("read-a-paper").expect("quest");
    assert!(quest.is_completed());
    assert_eq!(rpg::recent_activity(&store, 10).expect("feed").len(), 1);
}
