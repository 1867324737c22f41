//! Runtime Configuration
//!
//! The library can be configured at runtime using environment variables or by using
//! functions in this module. Options set by calling functions in this module override
//! options set in environment variables, and thread-local options override process-wide
//! ones.
//!
//! ```
//! use ogr::config::*;
//!
//! // Keep the Memory driver out of the registry
//! set_config_option("OGR_SKIP", "Memory").unwrap();
//!
//! assert_eq!(get_config_option("OGR_SKIP", "").unwrap(), "Memory");
//!
//! clear_config_option("OGR_SKIP").unwrap();
//!
//! assert_eq!(get_config_option("OGR_SKIP", "XXX").unwrap(), "XXX");
//! ```
//!
//! Recognised options:
//!
//! * `OGR_SKIP`: comma or space separated driver names that
//!   [`DriverManager::register_all`](crate::DriverManager::register_all) leaves out.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

use crate::errors::{OgrError, Result};

static CONFIG: LazyLock<RwLock<HashMap<String, String>>> = LazyLock::new(Default::default);

thread_local! {
    static THREAD_CONFIG: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains(['=', '\0']) {
        return Err(OgrError::BadArgument(format!(
            "Invalid configuration key: '{}'",
            key
        )));
    }
    Ok(())
}

fn check_value(value: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(OgrError::BadArgument(format!(
            "Invalid configuration value: '{}'",
            value
        )));
    }
    Ok(())
}

/// Set a library configuration option
pub fn set_config_option(key: &str, value: &str) -> Result<()> {
    check_key(key)?;
    check_value(value)?;
    let mut config = match CONFIG.write() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    };
    config.insert(key.to_string(), value.to_string());
    Ok(())
}

/// Get the value of a library configuration option
///
/// Thread-local options win over process-wide options, which win over environment variables.
/// If the config option specified by `key` is not found anywhere, the value passed in the
/// `default` parameter is returned.
pub fn get_config_option(key: &str, default: &str) -> Result<String> {
    check_key(key)?;
    if let Some(value) = THREAD_CONFIG.with(|config| config.borrow().get(key).cloned()) {
        return Ok(value);
    }
    let global = match CONFIG.read() {
        Ok(guard) => guard.get(key).cloned(),
        Err(poison_error) => poison_error.into_inner().get(key).cloned(),
    };
    if let Some(value) = global {
        return Ok(value);
    }
    Ok(std::env::var(key).unwrap_or_else(|_| default.to_string()))
}

/// Clear the value of a library configuration option
pub fn clear_config_option(key: &str) -> Result<()> {
    check_key(key)?;
    let mut config = match CONFIG.write() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    };
    config.remove(key);
    Ok(())
}

/// Set a library configuration option
/// with **thread local** scope
pub fn set_thread_local_config_option(key: &str, value: &str) -> Result<()> {
    check_key(key)?;
    check_value(value)?;
    THREAD_CONFIG.with(|config| {
        config
            .borrow_mut()
            .insert(key.to_string(), value.to_string())
    });
    Ok(())
}

/// Get the value of a library configuration option
/// with **thread local** scope
///
/// If the config option specified by `key` is not found, the value passed in the `default`
/// parameter is returned.
pub fn get_thread_local_config_option(key: &str, default: &str) -> Result<String> {
    check_key(key)?;
    Ok(THREAD_CONFIG
        .with(|config| config.borrow().get(key).cloned())
        .unwrap_or_else(|| default.to_string()))
}

/// Clear the value of a library configuration option
/// with **thread local** scope
pub fn clear_thread_local_config_option(key: &str) -> Result<()> {
    check_key(key)?;
    THREAD_CONFIG.with(|config| config.borrow_mut().remove(key));
    Ok(())
}
