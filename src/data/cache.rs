use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::error::Result;

use super::loader::{self, DataSource, LoadOutcome, SourceId};
use super::model::RecordTable;

// ---------------------------------------------------------------------------
// TableCache – memoized loads keyed by source identity
// ---------------------------------------------------------------------------

/// Memoizes loaded tables so repeated renders of the same report skip the
/// source read. Keyed by [`SourceId`], so a re-upload (new bytes, new
/// identity) naturally misses and replaces the stale entry. Tables are
/// read-only once loaded, hence the `Arc`.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: BTreeMap<SourceId, Arc<RecordTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load through the cache. `AwaitingUpload` outcomes are never cached;
    /// there is nothing to remember until bytes arrive.
    pub fn get_or_load(
        &mut self,
        source: &DataSource,
        required_columns: &[&str],
    ) -> Result<Option<Arc<RecordTable>>> {
        let id = source.identity();
        if let Some(table) = self.entries.get(&id) {
            debug!("cache hit for {id}");
            return Ok(Some(Arc::clone(table)));
        }

        match loader::load(source, required_columns)? {
            LoadOutcome::AwaitingUpload => Ok(None),
            LoadOutcome::Table(table) => {
                let table = Arc::new(table);
                self.retain_only(&id);
                self.entries.insert(id, Arc::clone(&table));
                Ok(Some(table))
            }
        }
    }

    /// Drop entries superseded by the same source, e.g. the previous upload
    /// under the same name. Bundled/path identities are stable so this only
    /// evicts replaced uploads.
    fn retain_only(&mut self, new_id: &SourceId) {
        if let SourceId::Upload { name, .. } = new_id {
            self.entries
                .retain(|id, _| !matches!(id, SourceId::Upload { name: n, .. } if n == name));
        }
    }

    /// Forget everything (e.g. when the user clears a session).
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
