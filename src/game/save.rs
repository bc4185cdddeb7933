//! # Save Records
//!
//! The persisted snapshot of a session and the storage it goes to.
//!
//! Every field of [`SaveRecord`] is optional on read so older or hand-edited
//! saves still load. Values are clamped into range when restored; a record
//! that cannot be parsed at all is discarded and the session starts fresh.

use crate::config::GameConfig;
use crate::game::crafting::{CraftedCounts, ItemKind};
use crate::game::quest::{Quest, QuestFlags};
use crate::game::resources::{Inventory, ResourceType};
use crate::game::state::GameSession;
use crate::{IslesError, IslesResult};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Reads any JSON number as an `i64`, saturating at the bounds and
/// truncating fractions. Null, NaN and non-numbers read as 0.
pub(crate) fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Number(number) = value else {
        return Ok(0);
    };
    if let Some(int) = number.as_i64() {
        return Ok(int);
    }
    if number.as_u64().is_some() {
        return Ok(i64::MAX);
    }
    // `as` saturates and maps NaN to 0.
    Ok(number.as_f64().map_or(0, |float| float as i64))
}

/// Reads a JSON bool; anything else reads as false.
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// Reads a nested value, falling back to its default if it has the wrong
/// shape.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Persisted material counts. Signed so negative values can be floored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryRecord {
    #[serde(deserialize_with = "lenient_int")]
    pub wood: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub stone: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub fiber: i64,
}

/// Persisted crafted counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CraftedRecord {
    #[serde(deserialize_with = "lenient_int")]
    pub raft_kit: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub bug_lantern: i64,
}

/// Snapshot of everything that survives a restart.
///
/// ```json
/// { "islandIndex": 1, "inventory": { "wood": 2, "stone": 0, "fiber": 1 },
///   "crafted": { "raftKit": 0, "bugLantern": 1 }, "selectedRecipe": 1,
///   "quest": { "lanternRequested": true, "lanternDelivered": false },
///   "cameraZoom": 1.5 }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveRecord {
    #[serde(deserialize_with = "lenient_int")]
    pub island_index: i64,
    #[serde(deserialize_with = "or_default")]
    pub inventory: InventoryRecord,
    #[serde(deserialize_with = "or_default")]
    pub crafted: CraftedRecord,
    #[serde(deserialize_with = "lenient_int")]
    pub selected_recipe: i64,
    #[serde(deserialize_with = "or_default")]
    pub quest: QuestFlags,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "or_default")]
    pub camera_zoom: Option<f32>,
}

fn clamp_count(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

fn clamp_index(value: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    value.clamp(0, len as i64 - 1) as usize
}

impl SaveRecord {
    /// Builds a record from session values.
    pub fn capture(
        island_index: usize,
        inventory: &Inventory,
        crafted: &CraftedCounts,
        selected_recipe: usize,
        quest: Quest,
        camera_zoom: Option<f32>,
    ) -> Self {
        Self {
            island_index: island_index as i64,
            inventory: InventoryRecord {
                wood: inventory.count(ResourceType::Wood) as i64,
                stone: inventory.count(ResourceType::Stone) as i64,
                fiber: inventory.count(ResourceType::Fiber) as i64,
            },
            crafted: CraftedRecord {
                raft_kit: crafted.count(ItemKind::RaftKit) as i64,
                bug_lantern: crafted.count(ItemKind::BugLantern) as i64,
            },
            selected_recipe: selected_recipe as i64,
            quest: quest.to_flags(),
            camera_zoom,
        }
    }

    /// Island index clamped into `[0, island_count - 1]`.
    pub fn clamped_island_index(&self, island_count: usize) -> usize {
        clamp_index(self.island_index, island_count)
    }

    /// Recipe index clamped into `[0, recipe_count - 1]`.
    pub fn clamped_recipe_index(&self, recipe_count: usize) -> usize {
        clamp_index(self.selected_recipe, recipe_count)
    }

    /// Inventory with negative counts floored at zero.
    pub fn inventory(&self) -> Inventory {
        Inventory::with_counts(
            clamp_count(self.inventory.wood),
            clamp_count(self.inventory.stone),
            clamp_count(self.inventory.fiber),
        )
    }

    /// Crafted counts with negative values floored at zero.
    pub fn crafted(&self) -> CraftedCounts {
        let mut crafted = CraftedCounts::new();
        crafted.set(ItemKind::RaftKit, clamp_count(self.crafted.raft_kit));
        crafted.set(ItemKind::BugLantern, clamp_count(self.crafted.bug_lantern));
        crafted
    }

    /// Quest progress implied by the flags.
    pub fn quest(&self) -> Quest {
        Quest::from_flags(self.quest)
    }

    /// Serializes the record.
    pub fn to_json(&self) -> IslesResult<String> {
        serde_json::to_string(self).map_err(IslesError::from)
    }

    /// Parses a record.
    ///
    /// Missing, unknown, null and mistyped fields are tolerated; only input
    /// that is not a JSON object fails.
    pub fn from_json(json: &str) -> IslesResult<Self> {
        serde_json::from_str(json).map_err(IslesError::from)
    }
}

/// Where snapshots are kept. Implemented by the platform layer.
pub trait SaveStore {
    /// Reads the stored snapshot, or `None` if nothing was saved yet.
    fn load(&self) -> IslesResult<Option<String>>;

    /// Replaces the stored snapshot.
    fn save(&mut self, data: &str) -> IslesResult<()>;
}

/// Keeps the snapshot in a JSON file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    path: PathBuf,
}

impl FileSaveStore {
    /// Creates a store for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("save.json");
        self.path.with_file_name(format!("{file_name}.tmp"))
    }
}

impl SaveStore for FileSaveStore {
    fn load(&self) -> IslesResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&mut self, data: &str) -> IslesResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp_path = self.temp_path();
        fs::write(&tmp_path, data)?;
        if let Err(error) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(error.into());
        }
        Ok(())
    }
}

/// In-memory store for tests and sessions that must not touch the disk.
#[derive(Debug, Clone, Default)]
pub struct MemorySaveStore {
    pub data: Option<String>,
    pub writes: usize,
}

impl MemorySaveStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with a snapshot.
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            writes: 0,
        }
    }
}

impl SaveStore for MemorySaveStore {
    fn load(&self) -> IslesResult<Option<String>> {
        Ok(self.data.clone())
    }

    fn save(&mut self, data: &str) -> IslesResult<()> {
        self.data = Some(data.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Writes the session's snapshot to a store.
pub fn persist(session: &GameSession, store: &mut dyn SaveStore) -> IslesResult<()> {
    #[cfg(feature = "dev-tools")]
    let _span = tracing::debug_span!("persist", island = session.island_index()).entered();

    let json = session.snapshot().to_json()?;
    store.save(&json)?;
    info!("Saved session on island {}", session.island_index());
    Ok(())
}

/// Creates a session, restoring the stored snapshot if there is a usable one.
///
/// A missing, unreadable or corrupt snapshot is logged and discarded; the
/// session then starts in its default state. Restoring is all-or-nothing.
pub fn load_session_or_default(config: &GameConfig, store: &dyn SaveStore) -> IslesResult<GameSession> {
    let session = GameSession::new(config)?;

    let text = match store.load() {
        Ok(Some(text)) => text,
        Ok(None) => {
            info!("No save found, starting a new game");
            return Ok(session);
        }
        Err(error) => {
            warn!("Could not read save, starting a new game: {}", error);
            return Ok(session);
        }
    };

    let record = match SaveRecord::from_json(&text) {
        Ok(record) => record,
        Err(error) => {
            warn!("Discarding corrupt save: {}", error);
            return Ok(session);
        }
    };

    let mut restored = session.clone();
    match restored.restore(&record) {
        Ok(()) => Ok(restored),
        Err(error) => {
            warn!("Discarding save that could not be restored: {}", error);
            Ok(session)
        }
    }
}

/// Decides when the scene should write a snapshot.
///
/// A save is due right after any mutation and otherwise once per interval.
#[derive(Debug, Clone, PartialEq)]
pub struct AutosaveClock {
    interval: f32,
    elapsed: f32,
}

impl AutosaveClock {
    /// Creates a clock that fires every `interval` seconds.
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Advances by `dt` seconds. Returns true if a save is due now.
    pub fn tick(&mut self, dt: f32, dirty: bool) -> bool {
        self.elapsed += dt.max(0.0);
        if dirty || self.elapsed >= self.interval {
            self.elapsed = 0.0;
            return true;
        }
        false
    }
}
