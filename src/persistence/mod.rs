//! Saving and loading processed storages.
//!
//! A [`Snapshot`] bundles the storage with the results computed from it.
//! [`Repository`] is the seam to whatever store keeps snapshots; two
//! implementations ship with the crate.

mod json;
mod memory;

pub use json::JsonRepository;
pub use memory::MemoryRepository;

use crate::analysis::AnalysisResults;
use crate::core::Storage;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A storage together with its analysis results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub created_at: DateTime<Utc>,
    pub storage: Storage,
    pub results: AnalysisResults,
}

impl Snapshot {
    pub fn new(storage: Storage, results: AnalysisResults) -> Self {
        Self {
            created_at: Utc::now(),
            storage,
            results,
        }
    }
}

/// Store for snapshots. Saving replaces the previously saved snapshot.
pub trait Repository {
    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Load the last saved snapshot, `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<Snapshot>>;
}
