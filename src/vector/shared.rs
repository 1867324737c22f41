//! The process-wide pool of shared data sources.
//!
//! Shared data sources are reference counted and deduplicated by name and requested mode.
//! Pool entries are addressed by [`SharedId`]s that carry a generation, so an id whose
//! entry was closed never resolves to a later occupant of the same slot.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::driver::DriverManager;
use crate::errors::*;
use crate::options::OpenFlags;
use crate::vector::DataSource;

struct SharedEntry {
    name: String,
    update: bool,
    ref_count: usize,
    dataset: Arc<Mutex<DataSource>>,
}

#[derive(Default)]
struct Slot {
    generation: u32,
    entry: Option<SharedEntry>,
}

static POOL: Mutex<Vec<Slot>> = Mutex::new(Vec::new());

fn pool() -> MutexGuard<'static, Vec<Slot>> {
    match POOL.lock() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

/// Identifies one shared data source in the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SharedId {
    index: usize,
    generation: u32,
}

/// A reference on a shared data source.
///
/// Each handle accounts for one reference and must be given back with
/// [`SharedDataSource::release`]. A handle that is dropped instead keeps the data source open
/// in the pool.
#[derive(Debug)]
pub struct SharedDataSource {
    id: SharedId,
    dataset: Arc<Mutex<DataSource>>,
}

impl SharedDataSource {
    pub fn id(&self) -> SharedId {
        self.id
    }

    /// Lock the data source for use. Holders of other references wait meanwhile.
    pub fn lock(&self) -> MutexGuard<'_, DataSource> {
        match self.dataset.lock() {
            Ok(guard) => guard,
            Err(poison_error) => poison_error.into_inner(),
        }
    }

    /// Number of references currently held on the data source.
    pub fn reference_count(&self) -> Result<usize> {
        let pool = pool();
        entry(&pool, self.id, "reference_count").map(|e| e.ref_count)
    }

    /// Give back this reference. Returns the remaining count; at zero the data source is
    /// closed.
    pub fn release(self) -> Result<usize> {
        let SharedDataSource { id, dataset } = self;
        drop(dataset);
        DriverManager::release_data_source(id)
    }
}

fn entry<'p>(pool: &'p [Slot], id: SharedId, method_name: &'static str) -> Result<&'p SharedEntry> {
    pool.get(id.index)
        .filter(|slot| slot.generation == id.generation)
        .and_then(|slot| slot.entry.as_ref())
        .ok_or(OgrError::StaleHandle { method_name })
}

fn handle(pool: &mut [Slot], index: usize) -> Option<SharedDataSource> {
    let slot = pool.get_mut(index)?;
    let entry = slot.entry.as_mut()?;
    entry.ref_count += 1;
    tracing::debug!(
        data_source = %entry.name,
        references = entry.ref_count,
        "shared data source referenced"
    );
    Some(SharedDataSource {
        id: SharedId {
            index,
            generation: slot.generation,
        },
        dataset: Arc::clone(&entry.dataset),
    })
}

fn find(pool: &[Slot], name: &str, update: bool) -> Option<usize> {
    pool.iter().position(|slot| {
        slot.entry
            .as_ref()
            .is_some_and(|e| e.name == name && e.update == update)
    })
}

/// Shared data source methods of the [`DriverManager`].
impl DriverManager {
    /// Open a data source in shared mode.
    ///
    /// If a data source of the same name was already opened shared with the same `update`
    /// request, a new reference on it is returned instead of opening it again.
    pub fn open_shared(name: &str, update: bool) -> Result<SharedDataSource> {
        {
            let mut pool = pool();
            if let Some(index) = find(&pool, name, update) {
                if let Some(shared) = handle(&mut pool, index) {
                    return Ok(shared);
                }
            }
        }

        let dataset = DriverManager::open_ex(
            name,
            crate::DataSourceOptions {
                open_flags: OpenFlags::from(update),
                ..Default::default()
            },
        )?;

        let mut pool = pool();
        // another thread may have opened it meanwhile
        if let Some(index) = find(&pool, name, update) {
            if let Some(shared) = handle(&mut pool, index) {
                drop(pool);
                drop(dataset);
                return Ok(shared);
            }
        }
        let entry = SharedEntry {
            name: name.to_string(),
            update,
            ref_count: 0,
            dataset: Arc::new(Mutex::new(dataset)),
        };
        let index = match pool.iter().position(|slot| slot.entry.is_none()) {
            Some(index) => index,
            None => {
                pool.push(Slot::default());
                pool.len() - 1
            }
        };
        pool[index].entry = Some(entry);
        handle(&mut pool, index).ok_or(OgrError::ogr(OgrErr::Failure, "open_shared"))
    }

    /// Number of data sources currently in the shared pool.
    pub fn open_shared_count() -> usize {
        pool().iter().filter(|slot| slot.entry.is_some()).count()
    }

    /// Take a new reference on the `idx`-th data source of the shared pool.
    ///
    /// The returned handle must be released like any other.
    pub fn open_shared_by_index(idx: usize) -> Result<SharedDataSource> {
        let mut pool = pool();
        let index = pool
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.entry.is_some())
            .map(|(index, _)| index)
            .nth(idx)
            .ok_or(OgrError::ogr(OgrErr::InvalidHandle, "open_shared_by_index"))?;
        handle(&mut pool, index).ok_or(OgrError::ogr(OgrErr::InvalidHandle, "open_shared_by_index"))
    }

    /// Drop one reference on a shared data source, closing it when none remain.
    ///
    /// Returns the remaining count. Fails with [`OgrErr::InvalidHandle`] if `id` does not
    /// name a data source of the pool, e.g. because it was already closed.
    pub fn release_data_source(id: SharedId) -> Result<usize> {
        let mut pool = pool();
        entry(&pool, id, "release_data_source")?;
        let slot = &mut pool[id.index];
        let remaining = match slot.entry.as_mut() {
            Some(entry) => {
                entry.ref_count -= 1;
                entry.ref_count
            }
            None => {
                return Err(OgrError::StaleHandle {
                    method_name: "release_data_source",
                })
            }
        };
        if remaining > 0 {
            return Ok(remaining);
        }

        slot.generation = slot.generation.wrapping_add(1);
        let Some(entry) = slot.entry.take() else {
            return Ok(0);
        };
        drop(pool);
        tracing::debug!(data_source = %entry.name, "shared data source closed");
        if let Ok(dataset) = Arc::try_unwrap(entry.dataset) {
            let dataset = match dataset.into_inner() {
                Ok(dataset) => dataset,
                Err(poison_error) => poison_error.into_inner(),
            };
            dataset.destroy()?;
        }
        Ok(0)
    }
}
