//! Canonical seed data: the default player sheet and the demo content
//! installed by `netquest init --demo`. Seeding only ever fills gaps; ids
//! that already exist in the store are left untouched.

use crate::rpg::errors::RpgError;
use crate::rpg::storage::RpgStore;
use crate::rpg::types::{
    Attribute, ExperienceKind, ExperienceRecord, PlayerIdentity, PlayerSheet, ProjectRecord,
    QuestRecord, SkillRecord,
};

/// Fresh level-1 sheet: all five attributes at 5, all attribute XP at 0.
pub fn default_player_sheet(identity: &PlayerIdentity) -> PlayerSheet {
    PlayerSheet::new(identity)
}

pub fn seed_demo_quests() -> Vec<QuestRecord> {
    vec![
        QuestRecord::new(
            "ship-the-redesign",
            "Ship the portfolio redesign",
            "Rebuild the landing page and push it live.",
            150,
        )
        .with_attribute_reward(Attribute::Creative, 30)
        .with_attribute_reward(Attribute::Technical, 20),
        QuestRecord::new(
            "write-a-postmortem",
            "Write a postmortem",
            "Document what went wrong in the last deploy and what changed.",
            80,
        )
        .with_attribute_reward(Attribute::Learning, 25),
        QuestRecord::new(
            "review-a-pull-request",
            "Review a pull request",
            "Leave a thorough review on a teammate's change.",
            40,
        )
        .with_attribute_reward(Attribute::Collaboration, 15)
        .daily(),
        QuestRecord::new(
            "read-a-paper",
            "Read a systems paper",
            "Read one paper end to end and take notes.",
            60,
        )
        .with_attribute_reward(Attribute::Intelligence, 20)
        .daily(),
    ]
}

pub fn seed_demo_skills() -> Vec<SkillRecord> {
    vec![
        SkillRecord::new("frontend", "Frontend", "web", 1, 50)
            .with_description("Component-driven UI work."),
        SkillRecord::new("react", "React", "web", 2, 75)
            .with_parent("frontend")
            .with_attribute_bonus(Attribute::Technical, 1),
        SkillRecord::new("threejs", "Three.js", "web", 4, 120)
            .with_parent("react")
            .with_attribute_bonus(Attribute::Creative, 2),
        SkillRecord::new("systems", "Systems", "backend", 1, 50)
            .with_description("Servers, storage, and the plumbing between them."),
        SkillRecord::new("rust", "Rust", "backend", 3, 100)
            .with_parent("systems")
            .with_attribute_bonus(Attribute::Intelligence, 1)
            .with_attribute_bonus(Attribute::Technical, 1),
        SkillRecord::new("databases", "Databases", "backend", 2, 75)
            .with_parent("systems")
            .with_attribute_bonus(Attribute::Technical, 1),
    ]
}

pub fn seed_demo_projects() -> Vec<ProjectRecord> {
    vec![
        ProjectRecord::new(
            "netquest",
            "Netquest",
            "This progression engine: quests, skills, and an XP-driven character sheet.",
            1,
        )
        .with_tech(&["rust", "sled", "tokio"])
        .with_repo("https://github.com/bhomikgoyal/netquest"),
        ProjectRecord::new(
            "night-market",
            "Night Market",
            "Real-time auction board with optimistic bidding.",
            2,
        )
        .with_tech(&["typescript", "websockets"]),
    ]
}

pub fn seed_demo_experience() -> Vec<ExperienceRecord> {
    vec![
        ExperienceRecord::new(
            "fullstack-2023",
            "Full Stack Developer",
            "Arasaka Labs",
            "2023 - present",
            ExperienceKind::Work,
            1,
        )
        .with_description("Web platforms, internal tooling, too many dashboards."),
        ExperienceRecord::new(
            "bsc-cs",
            "B.Sc. Computer Science",
            "Night City University",
            "2019 - 2023",
            ExperienceKind::Education,
            2,
        ),
    ]
}

/// Install demo quests, skills, projects, and timeline entries for any id not
/// already present. Returns the number of records inserted.
pub fn seed_demo_content(store: &RpgStore) -> Result<usize, RpgError> {
    let mut inserted = 0usize;
    for quest in seed_demo_quests() {
        if !store.quest_exists(&quest.id)? {
            store.put_quest(quest)?;
            inserted += 1;
        }
    }
    for skill in seed_demo_skills() {
        if !store.skill_exists(&skill.id)? {
            store.put_skill(skill)?;
            inserted += 1;
        }
    }
    for project in seed_demo_projects() {
        if !store.project_exists(&project.id)? {
            store.put_project(project)?;
            inserted += 1;
        }
    }
    for experience in seed_demo_experience() {
        if !store.experience_exists(&experience.id)? {
            store.put_experience(experience)?;
            inserted += 1;
        }
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpg::storage::RpgStoreBuilder;
    use tempfile::TempDir;

    #[test]
    fn demo_skill_parents_exist() {
        let skills = seed_demo_skills();
        for skill in &skills {
            if let Some(parent_id) = &skill.parent_id {
                assert!(
                    skills.iter().any(|s| &s.id == parent_id),
                    "skill {} references missing parent {}",
                    skill.id,
                    parent_id
                );
            }
        }
    }

    #[test]
    fn seeding_is_idempotent() {
        let dir = TempDir::new().expect("tempdir");
        let store = RpgStoreBuilder::new(dir.path()).open().expect("store");
        let first = seed_demo_content(&store).expect("seed");
        assert!(first > 0);
        let second = seed_demo_content(&store).expect("reseed");
        assert_eq!(second, 0, "should not reseed existing records");
    }

    #[test]
    fn seeding_preserves_edits() {
        let dir = TempDir::new().expect("tempdir");
        let store = RpgStoreBuilder::new(dir.path()).open().expect("store");
        seed_demo_content(&store).expect("seed");

        let mut quest = store.get_quest("ship-the-redesign").expect("get");
        quest.xp_reward = 999;
        store.put_quest(quest).expect("put");

        seed_demo_content(&store).expect("reseed");
        let quest = store.get_quest("ship-the-redesign").expect("get again");
        assert_eq!(quest.xp_reward, 999);
    }
}
