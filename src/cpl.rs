//! Option lists
//!
//! Creation and open calls accept an open-ended set of backend-specific `KEY=VALUE`
//! options. The core never interprets them; it only checks their syntax and forwards them
//! in order to the backend.

use std::fmt::{Debug, Formatter};

use crate::errors::{OgrError, Result};

/// An ordered list of `KEY=VALUE` options.
///
/// Keys are unique; setting an existing key overwrites its value in place.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CslStringList {
    entries: Vec<(String, String)>,
}

impl CslStringList {
    /// Creates an empty string list.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Assigns `value` to `name`.
    ///
    /// Overwrites duplicate `name`s.
    ///
    /// Returns `Err<OgrError>` if `name` is empty or contains `=` or line breaks, or
    /// `value` has line breaks.
    pub fn set_name_value(&mut self, name: &str, value: &str) -> Result<()> {
        if name.is_empty() || name.contains(['=', '\n', '\r']) {
            return Err(OgrError::BadArgument(format!(
                "Invalid characters in name: '{}'",
                name
            )));
        }
        if value.contains(['\n', '\r']) {
            return Err(OgrError::BadArgument(format!(
                "Invalid characters in value: '{}'",
                value
            )));
        }
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Looks up the value corresponding to `key`.
    pub fn fetch_name_value(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Determine the number of entries in the list.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Determine if the list has any values
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an iterator over the name/value elements of the list.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Debug for CslStringList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (k, v) in self.iter() {
            f.write_fmt(format_args!("{k}={v}\n"))?;
        }
        Ok(())
    }
}

/// Parses `KEY=VALUE` strings.
impl TryFrom<&[&str]> for CslStringList {
    type Error = OgrError;

    fn try_from(options: &[&str]) -> Result<Self> {
        let mut result = Self::new();
        for option in options {
            let (k, v) = option.split_once('=').ok_or_else(|| {
                OgrError::BadArgument(format!("Option '{}' is not of the form KEY=VALUE", option))
            })?;
            result.set_name_value(k, v)?;
        }
        Ok(result)
    }
}

/// Creates a [`CslStringList`] from a slice of _key_/_value_ tuples.
impl<const N: usize> TryFrom<&[(&str, &str); N]> for CslStringList {
    type Error = OgrError;

    fn try_from(pairs: &[(&str, &str); N]) -> Result<Self> {
        let mut result = Self::new();
        for (k, v) in pairs {
            result.set_name_value(k, v)?;
        }
        Ok(result)
    }
}
