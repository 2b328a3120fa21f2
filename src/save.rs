//! Game snapshot persistence.
//!
//! One TOML file holds the progress needed to resume a game: state, scores,
//! lives, shield and the full weapon payload.  Entity positions are not
//! saved; a restored game starts from a clean arena.
//!
//! ```toml
//! version = 1
//! saved_at_unix = 1760000000
//! gamestate = "Playing"
//! highscore = 42000
//! score = 12000
//! lives = 2
//! level = 0
//! shield = 80
//! selected_weapon = 1
//!
//! [[weapons]]
//! wpn_class = "Laser"
//! ammo = 80
//! temp = 2
//! ```
//!
//! Files written before the `version` field existed are migrated in place on
//! load.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::simulation::GameState;
use crate::weapon::WeaponBayEntry;

pub const SAVE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SaveSnapshot {
    pub version: u32,
    pub saved_at_unix: u64,
    pub gamestate: GameState,
    pub highscore: u32,
    pub score: u32,
    pub lives: i32,
    pub level: u32,
    pub shield: i32,
    pub selected_weapon: usize,
    pub weapons: Vec<WeaponBayEntry>,
}

pub fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Decode a snapshot, upgrading older layouts first.
pub fn parse_snapshot_with_migration(contents: &str) -> SimResult<SaveSnapshot> {
    let mut value: toml::Value = toml::from_str(contents)
        .map_err(|err| SimError::SaveFormat(format!("failed to parse save TOML: {err}")))?;

    migrate_snapshot_value(&mut value)?;

    value
        .try_into::<SaveSnapshot>()
        .map_err(|err| SimError::SaveFormat(format!("failed to decode save snapshot: {err}")))
}

fn migrate_snapshot_value(value: &mut toml::Value) -> SimResult<()> {
    let table = value
        .as_table_mut()
        .ok_or_else(|| SimError::SaveFormat("save file root must be a TOML table".to_string()))?;

    if !table.contains_key("version") {
        table.insert(
            "version".to_string(),
            toml::Value::Integer(i64::from(SAVE_VERSION)),
        );
    }
    if !table.contains_key("saved_at_unix") {
        table.insert("saved_at_unix".to_string(), toml::Value::Integer(0));
    }
    if !table.contains_key("highscore") {
        let score = table
            .get("score")
            .and_then(toml::Value::as_integer)
            .unwrap_or(0);
        table.insert("highscore".to_string(), toml::Value::Integer(score));
    }

    let version = table
        .get("version")
        .and_then(toml::Value::as_integer)
        .ok_or_else(|| SimError::SaveFormat("save version is missing or invalid".to_string()))?;

    if version != i64::from(SAVE_VERSION) {
        return Err(SimError::UnsupportedSaveVersion {
            found: version,
            expected: SAVE_VERSION,
        });
    }
    Ok(())
}

/// Read the snapshot at `path`.  A missing file is `Ok(None)`.
pub fn load_snapshot(path: &Path) -> SimResult<Option<SaveSnapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|err| SimError::SaveIo {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    parse_snapshot_with_migration(&contents).map(Some)
}

/// Write `snapshot` to `path`, creating parent directories as needed.
pub fn write_snapshot(path: &Path, snapshot: &SaveSnapshot) -> SimResult<()> {
    let io_err = |err: std::io::Error| SimError::SaveIo {
        path: path.display().to_string(),
        reason: err.to_string(),
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_err)?;
    }

    let serialized = toml::to_string_pretty(snapshot)
        .map_err(|err| SimError::SaveFormat(format!("failed to serialize save TOML: {err}")))?;

    fs::write(path, serialized).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapon::WeaponKind;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("spacehunter-save-{}-{name}", std::process::id()))
            .join("gamestate.toml")
    }

    fn snapshot() -> SaveSnapshot {
        SaveSnapshot {
            version: SAVE_VERSION,
            saved_at_unix: 1_760_000_000,
            gamestate: GameState::Playing,
            highscore: 42_000,
            score: 12_000,
            lives: 2,
            level: 0,
            shield: 80,
            selected_weapon: 1,
            weapons: vec![
                WeaponBayEntry::new(WeaponKind::Laser, 80, 2),
                WeaponBayEntry::new(WeaponKind::Gatling, 300, 0),
            ],
        }
    }

    #[test]
    fn snapshot_round_trips_through_a_file() {
        let path = scratch_path("roundtrip");
        write_snapshot(&path, &snapshot()).unwrap();
        let loaded = load_snapshot(&path).unwrap().unwrap();
        assert_eq!(loaded, snapshot());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = scratch_path("missing");
        assert_eq!(load_snapshot(&path), Ok(None));
    }

    #[test]
    fn legacy_file_without_version_is_migrated() {
        let legacy = r#"
gamestate = "Paused"
score = 500
lives = 1
level = 0
shield = 100
selected_weapon = 0

[[weapons]]
wpn_class = "Mine"
ammo = 5
temp = 0
"#;
        let loaded = parse_snapshot_with_migration(legacy).unwrap();
        assert_eq!(loaded.version, SAVE_VERSION);
        assert_eq!(loaded.highscore, 500);
        assert_eq!(loaded.gamestate, GameState::Paused);
        assert_eq!(loaded.weapons, vec![WeaponBayEntry::full(WeaponKind::Mine)]);
    }

    #[test]
    fn malformed_and_future_files_are_rejected() {
        assert!(matches!(
            parse_snapshot_with_migration("score = [oops"),
            Err(SimError::SaveFormat(_))
        ));
        assert!(matches!(
            parse_snapshot_with_migration("version = 9\nscore = 1"),
            Err(SimError::UnsupportedSaveVersion { found: 9, .. })
        ));
    }
}
