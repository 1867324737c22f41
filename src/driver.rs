use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config;
use crate::cpl::CslStringList;
use crate::errors::*;
use crate::options::{DataSourceOptions, OpenFlags};
use crate::vector::caps;
use crate::vector::memory::MemoryDriver;
use crate::vector::DataSource;

/// A storage backend implementation, see [`Driver`].
pub trait DriverImpl: Send + Sync {
    /// Unique name of the driver within the registry.
    fn short_name(&self) -> &str;

    fn long_name(&self) -> &str {
        self.short_name()
    }

    /// Open `name`. Returns `Ok(None)` when `name` is not a data source of this driver, so
    /// that the next driver can be tried.
    ///
    /// A driver may open read-only although [`OpenFlags::UPDATE`] was requested.
    fn open(
        &self,
        driver: &Driver,
        name: &str,
        flags: OpenFlags,
        options: &CslStringList,
    ) -> Result<Option<DataSource>>;

    /// Create a new, updatable data source.
    fn create(
        &self,
        _driver: &Driver,
        _name: &str,
        _options: &CslStringList,
    ) -> Result<DataSource> {
        Err(OgrError::ogr(OgrErr::UnsupportedOperation, "create"))
    }

    fn delete(&self, _name: &str) -> Result<()> {
        Err(OgrError::ogr(OgrErr::UnsupportedOperation, "delete"))
    }

    /// See [`caps::driver`].
    fn test_capability(&self, _capability: &str) -> bool {
        false
    }
}

/// Vector driver
///
/// A cheaply cloneable handle on a registered (or registrable) [`DriverImpl`].
#[derive(Clone)]
pub struct Driver {
    inner: Arc<dyn DriverImpl>,
}

impl Driver {
    pub fn new(driver: impl DriverImpl + 'static) -> Driver {
        Driver {
            inner: Arc::new(driver),
        }
    }

    /// Returns the short name of the driver.
    pub fn short_name(&self) -> String {
        self.inner.short_name().to_string()
    }

    /// Returns the long name of the driver.
    pub fn long_name(&self) -> String {
        self.inner.long_name().to_string()
    }

    /// Open `name` with this driver only.
    pub fn open(&self, name: &str, flags: OpenFlags) -> Result<DataSource> {
        self.inner
            .open(self, name, flags, &CslStringList::new())?
            .ok_or_else(|| OgrError::OpenFailed {
                name: name.to_string(),
            })
    }

    /// Create a new data source called `name`.
    pub fn create(&self, name: &str) -> Result<DataSource> {
        self.create_with_options(name, &[])
    }

    /// Create a new data source, passing `KEY=VALUE` creation options to the driver.
    pub fn create_with_options(&self, name: &str, options: &[&str]) -> Result<DataSource> {
        if !self.test_capability(caps::driver::CREATE_DATA_SOURCE) {
            return Err(OgrError::ogr(OgrErr::UnsupportedOperation, "create"));
        }
        let options = CslStringList::try_from(options)?;
        let ds = self.inner.create(self, name, &options)?;
        tracing::debug!(
            driver = %self.inner.short_name(),
            data_source = name,
            "data source created"
        );
        Ok(ds)
    }

    /// Create a data source called `name` holding copies of all layers of `source`.
    pub fn copy(&self, source: &DataSource, name: &str, options: &[&str]) -> Result<DataSource> {
        let mut ds = self.create_with_options(name, options)?;
        for layer in source.layers() {
            ds.copy_layer(layer, layer.name(), None)?;
        }
        Ok(ds)
    }

    /// Delete the data source called `name`.
    pub fn delete(&self, name: &str) -> Result<()> {
        if !self.test_capability(caps::driver::DELETE_DATA_SOURCE) {
            return Err(OgrError::ogr(OgrErr::UnsupportedOperation, "delete"));
        }
        self.inner.delete(name)?;
        tracing::debug!(
            driver = %self.inner.short_name(),
            data_source = name,
            "data source deleted"
        );
        Ok(())
    }

    /// Test if this driver supports the named capability, see [`caps::driver`].
    pub fn test_capability(&self, capability: &str) -> bool {
        self.inner.test_capability(capability)
    }

    /// Register this driver, see [`DriverManager::register_driver`].
    pub fn register(&self) -> usize {
        DriverManager::register_driver(self)
    }

    /// Deregister this driver, see [`DriverManager::deregister_driver`].
    pub fn deregister(&self) {
        DriverManager::deregister_driver(self)
    }

    fn ptr_eq(&self, other: &Driver) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Debug for Driver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("short_name", &self.inner.short_name())
            .finish()
    }
}

static DRIVERS: RwLock<Vec<Driver>> = RwLock::new(Vec::new());
static AUTO_REGISTER: AtomicBool = AtomicBool::new(true);
static START: Once = Once::new();

fn drivers() -> RwLockReadGuard<'static, Vec<Driver>> {
    match DRIVERS.read() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

fn drivers_mut() -> RwLockWriteGuard<'static, Vec<Driver>> {
    match DRIVERS.write() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

/// The process-wide driver registry.
///
/// Built-in drivers are registered on first use unless
/// [`DriverManager::prevent_auto_registration`] is called first.
///
/// ```
/// use ogr::DriverManager;
///
/// let driver = DriverManager::get_driver_by_name("Memory").unwrap();
/// assert_eq!(driver.short_name(), "Memory");
/// assert!(DriverManager::count() > 0);
/// ```
pub struct DriverManager;

impl DriverManager {
    fn ensure_registered() {
        if AUTO_REGISTER.load(Ordering::SeqCst) {
            START.call_once(DriverManager::register_all);
        }
    }

    /// Returns the number of registered drivers.
    pub fn count() -> usize {
        DriverManager::ensure_registered();
        drivers().len()
    }

    /// Returns the driver at `index` in registration order.
    pub fn get_driver(index: usize) -> Result<Driver> {
        DriverManager::ensure_registered();
        drivers()
            .get(index)
            .cloned()
            .ok_or(OgrError::InvalidDriverIndex(index))
    }

    /// Get one of the registered drivers by its short name.
    pub fn get_driver_by_name(name: &str) -> Result<Driver> {
        DriverManager::ensure_registered();
        drivers()
            .iter()
            .find(|d| d.inner.short_name() == name)
            .cloned()
            .ok_or_else(|| OgrError::InvalidDriverName(name.to_string()))
    }

    /// Register a driver. Returns its index.
    ///
    /// A driver that is already registered, or whose name is taken, keeps its index.
    pub fn register_driver(driver: &Driver) -> usize {
        let mut drivers = drivers_mut();
        if let Some(index) = drivers
            .iter()
            .position(|d| d.ptr_eq(driver) || d.inner.short_name() == driver.inner.short_name())
        {
            return index;
        }
        drivers.push(driver.clone());
        tracing::debug!(driver = %driver.inner.short_name(), "driver registered");
        drivers.len() - 1
    }

    /// Remove a driver from the registry. Later drivers move down one index.
    pub fn deregister_driver(driver: &Driver) {
        let mut drivers = drivers_mut();
        let before = drivers.len();
        drivers.retain(|d| !d.ptr_eq(driver));
        if drivers.len() != before {
            tracing::debug!(driver = %driver.inner.short_name(), "driver deregistered");
        }
    }

    /// Register the built-in drivers, except those named in the `OGR_SKIP` config option.
    pub fn register_all() {
        let skip = config::get_config_option("OGR_SKIP", "").unwrap_or_default();
        let skipped = |name: &str| {
            skip.split([',', ' '])
                .any(|s| s.trim().eq_ignore_ascii_case(name))
        };
        let built_in = [Driver::new(MemoryDriver)];
        for driver in built_in {
            if skipped(driver.inner.short_name()) {
                tracing::debug!(driver = %driver.inner.short_name(), "driver skipped");
                continue;
            }
            DriverManager::register_driver(&driver);
        }
    }

    /// Prevent the automatic registration of built-in drivers on first use.
    pub fn prevent_auto_registration() {
        AUTO_REGISTER.store(false, Ordering::SeqCst);
    }

    /// Deregister all drivers.
    pub fn destroy() {
        drivers_mut().clear();
        tracing::debug!("driver registry cleared");
    }

    /// Open a data source, trying each registered driver in order.
    pub fn open(name: &str, update: bool) -> Result<DataSource> {
        DriverManager::open_ex(
            name,
            DataSourceOptions {
                open_flags: OpenFlags::from(update),
                ..Default::default()
            },
        )
    }

    /// Open a data source with extended options.
    ///
    /// Drivers are tried in registration order, restricted to `allowed_drivers` if given.
    /// The first driver recognising `name` opens it; its errors are returned as is. Fails
    /// with [`OgrError::OpenFailed`] when no driver recognises `name`.
    pub fn open_ex(name: &str, options: DataSourceOptions<'_>) -> Result<DataSource> {
        DriverManager::ensure_registered();
        let open_options = match options.open_options {
            Some(open_options) => CslStringList::try_from(open_options)?,
            None => CslStringList::new(),
        };
        let candidates: Vec<Driver> = drivers()
            .iter()
            .filter(|d| {
                options.allowed_drivers.map_or(true, |allowed| {
                    allowed
                        .iter()
                        .any(|a| a.eq_ignore_ascii_case(d.inner.short_name()))
                })
            })
            .cloned()
            .collect();

        for driver in &candidates {
            if let Some(ds) = driver
                .inner
                .open(driver, name, options.open_flags, &open_options)?
            {
                tracing::debug!(
                    driver = %driver.inner.short_name(),
                    data_source = name,
                    update = ds.is_update(),
                    "data source opened"
                );
                return Ok(ds);
            }
        }

        if options.open_flags.contains(OpenFlags::VERBOSE_ERROR) {
            tracing::warn!(data_source = name, "no driver could open data source");
        }
        Err(OgrError::OpenFailed {
            name: name.to_string(),
        })
    }
}
