//! Pure leveling and attribute-growth calculators.
//!
//! All state transitions in the engine reduce to these two while-loops:
//! player XP crossing level thresholds, and attribute XP crossing fixed
//! 100-point marks. Keeping them free of storage concerns makes the
//! threshold semantics directly testable.

/// XP required to finish level 1.
pub const BASE_XP: u64 = 100;

/// Growth exponent for the level curve.
pub const LEVEL_EXPONENT: f64 = 1.5;

/// Attribute XP consumed per attribute value point.
pub const ATTRIBUTE_XP_PER_POINT: u32 = 100;

/// XP required to advance past `level`: `floor(100 * level^1.5)`.
/// Strictly increasing for `level >= 1`.
pub fn xp_threshold(level: u32) -> u64 {
    (BASE_XP as f64 * (level as f64).powf(LEVEL_EXPONENT)).floor() as u64
}

/// Result of applying an XP grant to the leveling track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    pub current_xp: u64,
    pub total_xp: u64,
    pub xp_to_next_level: u64,
    pub leveled_up: bool,
    pub levels_gained: u32,
}

/// Add `gained` XP and resolve any level-ups. The loop carries overflow
/// across as many thresholds as the grant crosses, recomputing the threshold
/// at each new level. A grant of zero passes through unchanged.
pub fn apply_xp(
    level: u32,
    current_xp: u64,
    total_xp: u64,
    xp_to_next_level: u64,
    gained: u64,
) -> LevelProgress {
    let mut level = level;
    let mut current_xp = current_xp + gained;
    let total_xp = total_xp + gained;
    let mut xp_to_next_level = xp_to_next_level;
    let mut levels_gained = 0u32;

    while current_xp >= xp_to_next_level {
        current_xp -= xp_to_next_level;
        level += 1;
        levels_gained += 1;
        xp_to_next_level = xp_threshold(level);
    }

    LevelProgress {
        level,
        current_xp,
        total_xp,
        xp_to_next_level,
        leveled_up: levels_gained > 0,
        levels_gained,
    }
}

/// Add `gained` attribute XP, converting each full 100 points into one
/// attribute value point. Same iterative carry semantics as [`apply_xp`];
/// the value has no upper bound.
pub fn apply_attribute_xp(attr_xp: u32, attr_value: u32, gained: u32) -> (u32, u32) {
    let mut attr_xp = attr_xp + gained;
    let mut attr_value = attr_value;

    while attr_xp >= ATTRIBUTE_XP_PER_POINT {
        attr_xp -= ATTRIBUTE_XP_PER_POINT;
        attr_value += 1;
    }

    (attr_xp, attr_value)
}
