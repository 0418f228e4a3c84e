//! Read-side helpers for portfolio content: the projects grid and the
//! work/education timeline. The engine does not mutate these beyond seeding;
//! they live in the same store so one backup covers everything.

use crate::rpg::errors::RpgError;
use crate::rpg::storage::RpgStore;
use crate::rpg::types::{ExperienceKind, ExperienceRecord, ProjectRecord};

/// Fetch all projects sorted by display order.
pub fn list_projects(store: &RpgStore) -> Result<Vec<ProjectRecord>, RpgError> {
    let mut projects = store.list_projects()?;
    projects.sort_by_key(|p| p.order);
    Ok(projects)
}

/// Fetch the timeline sorted by display order.
pub fn list_experience(store: &RpgStore) -> Result<Vec<ExperienceRecord>, RpgError> {
    let mut entries = store.list_experience()?;
    entries.sort_by_key(|e| e.order);
    Ok(entries)
}

pub fn format_project_list(projects: &[ProjectRecord]) -> String {
    if projects.is_empty() {
        return "No projects yet.".to_string();
    }
    let mut out = String::from("=== PROJECTS ===\n");
    for project in projects {
        out.push_str(&format!("{} — {}\n", project.title, project.description));
        if !project.tech_stack.is_empty() {
            out.push_str(&format!("    [{}]\n", project.tech_stack.join(", ")));
        }
        if let Some(repo) = &project.repo_url {
            out.push_str(&format!("    {}\n", repo));
        }
    }
    out
}

pub fn format_experience_timeline(entries: &[ExperienceRecord]) -> String {
    if entries.is_empty() {
        return "No timeline entries yet.".to_string();
    }
    let mut out = String::from("=== TIMELINE ===\n");
    for entry in entries {
        let tag = match entry.kind {
            ExperienceKind::Work => "work",
            ExperienceKind::Education => "edu ",
        };
        out.push_str(&format!(
            "[{}] {} — {} @ {}\n",
            tag, entry.period, entry.role, entry.company
        ));
        if !entry.description.is_empty() {
            out.push_str(&format!("       {}\n", entry.description));
        }
    }
    out
}
