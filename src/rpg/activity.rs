//! Activity feed operations and display.
//!
//! The feed is append-only; progression operations write their own entries
//! transactionally and hand them back to the caller, so nothing here needs a
//! "was this recent?" timestamp heuristic. These helpers cover manual entries
//! (e.g. shipping a project) and read-side rendering.

use crate::rpg::errors::RpgError;
use crate::rpg::storage::RpgStore;
use crate::rpg::types::{ActivityEntry, ActivityKind};

/// Append one feed entry and return it. Store errors propagate to the caller;
/// there is no fire-and-forget path.
pub fn log_activity(
    store: &RpgStore,
    message: &str,
    xp_gained: u64,
    level_up: bool,
    kind: ActivityKind,
) -> Result<ActivityEntry, RpgError> {
    let entry = ActivityEntry::new(message.to_string(), xp_gained, level_up, kind);
    store.append_activity(&entry)?;
    Ok(entry)
}

/// Fetch up to `limit` entries, newest first.
pub fn recent_activity(store: &RpgStore, limit: usize) -> Result<Vec<ActivityEntry>, RpgError> {
    store.recent_activity(limit)
}

/// Render one entry as a single feed line.
pub fn format_entry(entry: &ActivityEntry) -> String {
    let xp = if entry.xp_gained > 0 {
        format!(" (+{} xp)", entry.xp_gained)
    } else {
        String::new()
    };
    let flag = if entry.level_up { " ^LEVEL UP^" } else { "" };
    format!(
        "{} [{}] {}{}{}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.kind.as_str(),
        entry.message,
        xp,
        flag
    )
}

/// Render the feed for terminal display, newest first.
pub fn format_activity_feed(entries: &[ActivityEntry]) -> String {
    if entries.is_empty() {
        return "No activity yet.".to_string();
    }
    let mut out = String::from("=== ACTIVITY FEED ===\n");
    for entry in entries {
        out.push_str(&format_entry(entry));
        out.push('\n');
    }
    out
}
