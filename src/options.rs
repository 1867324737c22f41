use bitflags::bitflags;

/// Open options for [`DriverManager::open_ex`](crate::DriverManager::open_ex)
#[derive(Debug, Default)]
pub struct DataSourceOptions<'a> {
    pub open_flags: OpenFlags,
    /// Only try these drivers, by name, in registration order.
    pub allowed_drivers: Option<&'a [&'a str]>,
    /// Driver-specific open options in the form `name=value`.
    pub open_options: Option<&'a [&'a str]>,
}

bitflags! {
    /// Flags controlling how a data source is opened.
    ///
    /// Requesting [`OpenFlags::UPDATE`] is a request, not a guarantee: a driver may hand back
    /// a read-only data source, see
    /// [`DataSource::is_update`](crate::vector::DataSource::is_update).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        /// Open in read-only mode (default).
        const READONLY = 0x00;
        /// Open in update mode.
        const UPDATE = 0x01;
        /// Log a warning when no driver accepts the data source.
        const VERBOSE_ERROR = 0x40;
    }
}

impl Default for OpenFlags {
    fn default() -> OpenFlags {
        OpenFlags::READONLY
    }
}

impl OpenFlags {
    pub fn is_update(&self) -> bool {
        self.contains(OpenFlags::UPDATE)
    }
}

impl From<bool> for OpenFlags {
    fn from(update: bool) -> OpenFlags {
        if update {
            OpenFlags::UPDATE
        } else {
            OpenFlags::READONLY
        }
    }
}
