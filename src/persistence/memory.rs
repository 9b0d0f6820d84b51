use super::{Repository, Snapshot};
use crate::error::Result;

/// Keeps the last snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    snapshot: Option<Snapshot>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for MemoryRepository {
    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.snapshot.clone())
    }
}
