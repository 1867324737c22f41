use std::fmt::{Debug, Formatter};

use crate::cpl::CslStringList;
use crate::driver::Driver;
use crate::errors::*;
use crate::vector::caps::{self, Capabilities};
use crate::vector::{Layer, LayerOptions};

/// The storage side of a [`DataSource`], implemented by drivers.
///
/// The catalog keeps layers in memory; a backend persists them and may run SQL against
/// them.
pub trait DataSourceBackend: Send {
    /// Flush `layers` of the data source called `name` to storage.
    ///
    /// Called by [`DataSource::sync`] and when an updatable data source is closed.
    fn sync(&mut self, name: &str, layers: &[Layer]) -> Result<()>;

    /// Run `statement` and return its result layer, or `None` for statements without
    /// result set. `dialect` is empty for the backend's default dialect.
    fn execute_sql(
        &self,
        _statement: &str,
        _layers: &[Layer],
        _dialect: &str,
    ) -> Result<Option<Layer>> {
        Err(OgrError::ogr(OgrErr::UnsupportedOperation, "execute_sql"))
    }
}

/// Capabilities a read-only data source never reports.
const WRITE_CAPABILITIES: &[&str] = &[
    caps::dataset::CREATE_LAYER,
    caps::dataset::DELETE_LAYER,
    caps::dataset::CREATE_GEOM_FIELD_AFTER_CREATE_LAYER,
];

/// Vector data source
///
/// One open connection to a backend. A data source owns its layers; borrowing a layer
/// borrows the data source, so no layer outlives it.
///
/// An updatable data source is synced when dropped. Use [`DataSource::destroy`] to see the
/// outcome of that final sync.
pub struct DataSource {
    name: String,
    driver: Driver,
    update: bool,
    layers: Vec<Layer>,
    capabilities: Capabilities,
    layer_capabilities: Capabilities,
    backend: Box<dyn DataSourceBackend>,
    closed: bool,
}

impl DataSource {
    /// Creates an empty data source without capabilities. Meant for driver implementations.
    pub fn new(
        name: &str,
        driver: &Driver,
        update: bool,
        backend: Box<dyn DataSourceBackend>,
    ) -> DataSource {
        DataSource {
            name: name.to_string(),
            driver: driver.clone(),
            update,
            layers: Vec::new(),
            capabilities: Capabilities::new(),
            layer_capabilities: Capabilities::new(),
            backend,
            closed: false,
        }
    }

    /// Set the capabilities of the data source, and those given to layers it creates.
    pub fn with_capabilities(mut self, dataset: Capabilities, layer: Capabilities) -> Self {
        self.capabilities = dataset;
        self.layer_capabilities = layer;
        self
    }

    /// Add an existing layer, e.g. one read from storage while opening.
    ///
    /// Layers of a read-only data source become read-only.
    pub fn attach_layer(&mut self, mut layer: Layer) {
        if !self.update {
            layer.set_read_only(true);
        }
        self.layers.push(layer);
    }

    /// The name the data source was opened or created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The driver that opened this data source.
    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    /// Whether the data source was opened for update. A driver may open read-only even
    /// when update was requested.
    pub fn is_update(&self) -> bool {
        self.update
    }

    /// Get the number of layers in this data source.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Get a layer by index.
    pub fn layer(&self, idx: usize) -> Result<&Layer> {
        self.layers.get(idx).ok_or(OgrError::InvalidLayerIndex {
            index: idx,
            method_name: "layer",
        })
    }

    pub fn layer_mut(&mut self, idx: usize) -> Result<&mut Layer> {
        self.layers.get_mut(idx).ok_or(OgrError::InvalidLayerIndex {
            index: idx,
            method_name: "layer_mut",
        })
    }

    fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name() == name)
    }

    /// Get a layer by name.
    pub fn layer_by_name(&self, name: &str) -> Result<&Layer> {
        match self.layer_index(name) {
            Some(idx) => Ok(&self.layers[idx]),
            None => Err(OgrError::InvalidLayerName {
                name: name.to_string(),
                method_name: "layer_by_name",
            }),
        }
    }

    pub fn layer_by_name_mut(&mut self, name: &str) -> Result<&mut Layer> {
        match self.layer_index(name) {
            Some(idx) => Ok(&mut self.layers[idx]),
            None => Err(OgrError::InvalidLayerName {
                name: name.to_string(),
                method_name: "layer_by_name_mut",
            }),
        }
    }

    /// Returns an iterator over the layers of the data source.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Test if this data source supports the named capability, see [`caps::dataset`].
    pub fn test_capability(&self, capability: &str) -> bool {
        if !self.update
            && WRITE_CAPABILITIES
                .iter()
                .any(|c| c.eq_ignore_ascii_case(capability))
        {
            return false;
        }
        self.capabilities.contains(capability)
    }

    fn check_new_layer(&self, name: &str, method_name: &'static str) -> Result<()> {
        if !self.test_capability(caps::dataset::CREATE_LAYER) {
            return Err(OgrError::ogr(OgrErr::UnsupportedOperation, method_name));
        }
        if self.layer_index(name).is_some() {
            return Err(OgrError::ogr(OgrErr::Failure, method_name));
        }
        Ok(())
    }

    fn push_layer(&mut self, mut layer: Layer, options: Option<&[&str]>) -> Result<&mut Layer> {
        if let Some(options) = options {
            layer.set_creation_options(CslStringList::try_from(options)?);
        }
        tracing::debug!(data_source = %self.name, layer = %layer.name(), "layer created");
        self.layers.push(layer);
        let idx = self.layers.len() - 1;
        Ok(&mut self.layers[idx])
    }

    /// Create a new layer.
    ///
    /// Fails with [`OgrErr::UnsupportedOperation`] unless the data source is updatable and
    /// supports [`caps::dataset::CREATE_LAYER`], and with [`OgrErr::Failure`] if a layer of
    /// that name exists.
    ///
    /// ```
    /// use ogr::vector::{GeometryType, LayerOptions};
    /// use ogr::DriverManager;
    ///
    /// let driver = DriverManager::get_driver_by_name("Memory").unwrap();
    /// let mut ds = driver.create("create_layer_doc").unwrap();
    /// let layer = ds
    ///     .create_layer(LayerOptions {
    ///         name: "points",
    ///         ty: GeometryType::Point,
    ///         ..Default::default()
    ///     })
    ///     .unwrap();
    /// assert_eq!(layer.geometry_type(), GeometryType::Point);
    /// ```
    pub fn create_layer(&mut self, options: LayerOptions<'_>) -> Result<&mut Layer> {
        self.check_new_layer(options.name, "create_layer")?;
        let layer = Layer::new(
            options.name,
            options.srs,
            options.ty,
            self.layer_capabilities.clone(),
        );
        self.push_layer(layer, options.options)
    }

    /// Copy the schema and all features of `source` into a new layer called `name`.
    pub fn copy_layer(
        &mut self,
        source: &Layer,
        name: &str,
        options: Option<&[&str]>,
    ) -> Result<&mut Layer> {
        self.check_new_layer(name, "copy_layer")?;
        let copy = self.adopt(source, name);
        self.push_layer(copy, options)
    }

    /// Like [`DataSource::copy_layer`], with a source layer of this data source.
    pub fn duplicate_layer(
        &mut self,
        idx: usize,
        name: &str,
        options: Option<&[&str]>,
    ) -> Result<&mut Layer> {
        self.check_new_layer(name, "duplicate_layer")?;
        let copy = self.adopt(self.layer(idx)?, name);
        self.push_layer(copy, options)
    }

    /// A copy of `layer` named `name`, with this data source's layer capabilities.
    fn adopt(&self, layer: &Layer, name: &str) -> Layer {
        let mut copy = layer.duplicate(name);
        copy.set_capabilities(self.layer_capabilities.clone());
        copy
    }

    /// Remove the layer at `idx`.
    pub fn delete_layer(&mut self, idx: usize) -> Result<()> {
        if !self.test_capability(caps::dataset::DELETE_LAYER) {
            return Err(OgrError::ogr(OgrErr::UnsupportedOperation, "delete_layer"));
        }
        if idx >= self.layers.len() {
            return Err(OgrError::InvalidLayerIndex {
                index: idx,
                method_name: "delete_layer",
            });
        }
        let layer = self.layers.remove(idx);
        tracing::debug!(data_source = %self.name, layer = %layer.name(), "layer deleted");
        Ok(())
    }

    /// Flush pending writes to storage. A read-only data source has nothing to flush.
    pub fn sync(&mut self) -> Result<()> {
        if !self.update {
            return Ok(());
        }
        self.backend.sync(&self.name, &self.layers)
    }

    pub(crate) fn backend(&self) -> &dyn DataSourceBackend {
        self.backend.as_ref()
    }

    pub(crate) fn layer_slice(&self) -> &[Layer] {
        &self.layers
    }

    /// Sync and close the data source.
    pub fn destroy(mut self) -> Result<()> {
        self.closed = true;
        let result = self.sync();
        tracing::debug!(data_source = %self.name, "data source closed");
        result
    }
}

impl Drop for DataSource {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.sync() {
            tracing::warn!(data_source = %self.name, error = %e, "sync on close failed");
        }
        tracing::debug!(data_source = %self.name, "data source closed");
    }
}

impl Debug for DataSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSource")
            .field("name", &self.name)
            .field("driver", &self.driver.short_name())
            .field("update", &self.update)
            .field(
                "layers",
                &self.layers.iter().map(Layer::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
