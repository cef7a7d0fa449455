//! Sparse action-value storage.
//!
//! Only states that were actually visited get an entry. A 6x7 board has on
//! the order of 10^12 reachable positions, so the table is a hash map from
//! a canonical [`StateKey`] to one value per column, filled lazily.

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::game::GameState;

/// Canonical encoding of a board snapshot: one digit per cell in row-major
/// order, then `/` and the digit of the player to move.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    pub fn encode(state: &GameState) -> Self {
        let mut key = String::with_capacity(state.cells().len() + 2);
        key.extend(state.cells().iter().map(|cell| cell.code()));
        key.push('/');
        key.push(state.current_player().code());
        StateKey(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lazily materialized Q(s, a) table with a fixed number of actions.
#[derive(Debug, Clone)]
pub struct SparseQTable {
    values: HashMap<StateKey, Vec<f64>>,
    num_actions: usize,
    default_value: f64,
}

impl SparseQTable {
    pub fn new(num_actions: usize) -> Self {
        SparseQTable {
            values: HashMap::new(),
            num_actions,
            default_value: 0.0,
        }
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Number of materialized states.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Q(state, action). Creates a zeroed entry for unseen states.
    ///
    /// Panics if `action >= num_actions`.
    pub fn get_value(&mut self, state: &GameState, action: usize) -> f64 {
        self.values(state)[action]
    }

    /// Overwrite Q(state, action), creating the entry if needed.
    ///
    /// Panics if `action >= num_actions`.
    pub fn set_value(&mut self, state: &GameState, action: usize, value: f64) {
        self.entry(state)[action] = value;
    }

    /// The whole action-value row for `state`, materializing it if unseen.
    pub fn values(&mut self, state: &GameState) -> &[f64] {
        self.entry(state)
    }

    /// Stored row for `key`, without materializing anything.
    pub fn peek(&self, key: &StateKey) -> Option<&[f64]> {
        self.values.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &[f64])> {
        self.values.iter().map(|(key, row)| (key, row.as_slice()))
    }

    fn entry(&mut self, state: &GameState) -> &mut Vec<f64> {
        let (num_actions, default_value) = (self.num_actions, self.default_value);
        self.values
            .entry(StateKey::encode(state))
            .or_insert_with(|| vec![default_value; num_actions])
    }

    /// Write every entry to `path` as a JSON object of key -> values.
    ///
    /// The file is written next to its destination and renamed into place.
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        // Sorted so that identical tables produce identical files
        let sorted: BTreeMap<&StateKey, &Vec<f64>> = self.values.iter().collect();
        let json = serde_json::to_string(&sorted)?;

        write_atomic(path, json)
    }

    /// Replace the table contents with the mapping stored at `path`.
    ///
    /// On error the current contents are left untouched.
    pub fn load(&mut self, path: &Path) -> Result<(), PersistenceError> {
        let json = fs::read_to_string(path).map_err(|e| PersistenceError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let values: HashMap<StateKey, Vec<f64>> =
            serde_json::from_str(&json).map_err(|e| PersistenceError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        if let Some((key, row)) = values.iter().find(|(_, row)| row.len() != self.num_actions) {
            return Err(PersistenceError::ActionCount {
                key: key.to_string(),
                expected: self.num_actions,
                found: row.len(),
            });
        }

        self.values = values;
        Ok(())
    }
}

/// Write `contents` to a `.tmp` sibling of `path`, then rename it into place.
pub(crate) fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), PersistenceError> {
    let tmp_path = tmp_sibling(path);
    fs::write(&tmp_path, contents).map_err(|e| PersistenceError::Write {
        path: tmp_path.clone(),
        source: e,
    })?;
    fs::rename(&tmp_path, path).map_err(|e| PersistenceError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

pub(crate) fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
