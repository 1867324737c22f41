//! The built-in `Memory` driver.
//!
//! Data sources live in a process-wide store keyed by name. Creating a data source registers
//! its name; syncing or closing an updatable one stores a snapshot of its layers, which later
//! opens start from.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, MutexGuard};

use crate::cpl::CslStringList;
use crate::driver::{Driver, DriverImpl};
use crate::errors::*;
use crate::options::OpenFlags;
use crate::vector::caps::{self, Capabilities};
use crate::vector::{DataSource, DataSourceBackend, Layer};

pub(crate) const DRIVER_NAME: &str = "Memory";

static STORE: LazyLock<Mutex<HashMap<String, Vec<Layer>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn store() -> MutexGuard<'static, HashMap<String, Vec<Layer>>> {
    match STORE.lock() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

fn snapshot(layers: &[Layer]) -> Vec<Layer> {
    layers.iter().map(|l| l.duplicate(l.name())).collect()
}

/// Driver keeping data sources in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryDriver;

impl MemoryDriver {
    fn data_source(driver: &Driver, name: &str, update: bool) -> DataSource {
        DataSource::new(name, driver, update, Box::new(MemoryBackend)).with_capabilities(
            [
                caps::dataset::CREATE_LAYER,
                caps::dataset::DELETE_LAYER,
                caps::dataset::CREATE_GEOM_FIELD_AFTER_CREATE_LAYER,
            ]
            .into_iter()
            .collect(),
            caps::layer::ALL.iter().copied().collect::<Capabilities>(),
        )
    }
}

impl DriverImpl for MemoryDriver {
    fn short_name(&self) -> &str {
        DRIVER_NAME
    }

    fn long_name(&self) -> &str {
        "In Memory"
    }

    fn open(
        &self,
        driver: &Driver,
        name: &str,
        flags: OpenFlags,
        _options: &CslStringList,
    ) -> Result<Option<DataSource>> {
        let Some(layers) = store().get(name).map(|layers| snapshot(layers)) else {
            return Ok(None);
        };
        let mut ds = MemoryDriver::data_source(driver, name, flags.is_update());
        for layer in layers {
            ds.attach_layer(layer);
        }
        Ok(Some(ds))
    }

    /// Replaces any data source of the same name.
    fn create(&self, driver: &Driver, name: &str, _options: &CslStringList) -> Result<DataSource> {
        store().insert(name.to_string(), Vec::new());
        Ok(MemoryDriver::data_source(driver, name, true))
    }

    fn delete(&self, name: &str) -> Result<()> {
        store()
            .remove(name)
            .map(|_| ())
            .ok_or(OgrError::ogr(OgrErr::Failure, "delete"))
    }

    fn test_capability(&self, capability: &str) -> bool {
        [
            caps::driver::CREATE_DATA_SOURCE,
            caps::driver::DELETE_DATA_SOURCE,
        ]
        .iter()
        .any(|c| c.eq_ignore_ascii_case(capability))
    }
}

struct MemoryBackend;

impl DataSourceBackend for MemoryBackend {
    fn sync(&mut self, name: &str, layers: &[Layer]) -> Result<()> {
        let layers = snapshot(layers);
        store().insert(name.to_string(), layers);
        Ok(())
    }
}
