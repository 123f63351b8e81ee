//! Built-in peripheral drivers.
//!
//! These drivers model GPIO hardware in memory so the daemon can be exercised
//! without a board attached. An `add` document selects a driver through its
//! `type` field.

mod analog;
mod led;

use std::str::FromStr;

use periphery_registry::{CommandDocument, ConfigurationError, PeripheralFactory, PeripheralHandle};
use strum::{Display, EnumString};

pub use analog::{AnalogInput, FULL_SCALE, MAX_SAMPLES};
pub use led::Led;

/// Highest GPIO number a driver may bind to.
pub const MAX_PIN: u8 = 39;

/// Peripheral types understood by [`BuiltinPeripheralFactory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PeripheralKind {
    /// A digital output driving an LED.
    Led,
    /// An ADC channel.
    Analog,
}

/// Factory building the built-in drivers.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinPeripheralFactory;

impl BuiltinPeripheralFactory {
    /// Builds a new factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PeripheralFactory for BuiltinPeripheralFactory {
    fn create(&self, document: &CommandDocument) -> Result<PeripheralHandle, ConfigurationError> {
        let type_name = document
            .peripheral_type()
            .ok_or_else(|| ConfigurationError::new("missing property: type (string)"))?;
        let kind = PeripheralKind::from_str(type_name).map_err(|_| {
            ConfigurationError::new(format!("unknown peripheral type '{type_name}'"))
        })?;

        match kind {
            PeripheralKind::Led => Ok(Led::from_document(document)?.into_handle()),
            PeripheralKind::Analog => Ok(AnalogInput::from_document(document)?.into_handle()),
        }
    }
}

/// Reads the required `pin` field.
///
/// Values that fit a `u8` are accepted here; drivers report pins above
/// [`MAX_PIN`] through `is_valid`.
fn required_pin(document: &CommandDocument) -> Result<u8, ConfigurationError> {
    let raw = document
        .u64_field("pin")
        .ok_or_else(|| ConfigurationError::new("missing property: pin (unsigned integer)"))?;
    u8::try_from(raw).map_err(|_| ConfigurationError::new(format!("pin {raw} is out of range")))
}

/// Reads an optional `u16` field, falling back to `default`.
fn optional_u16(
    document: &CommandDocument,
    key: &str,
    default: u16,
) -> Result<u16, ConfigurationError> {
    match document.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_u64()
            .and_then(|raw| u16::try_from(raw).ok())
            .ok_or_else(|| ConfigurationError::new(format!("{key} must be an integer in 0..=65535"))),
    }
}

/// Reads an optional boolean field, falling back to `default`.
fn optional_bool(
    document: &CommandDocument,
    key: &str,
    default: bool,
) -> Result<bool, ConfigurationError> {
    match document.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| ConfigurationError::new(format!("{key} must be a boolean"))),
    }
}

/// Lower-cased task selector, or `default` when the document names none.
fn selected_task(document: &CommandDocument, default: &str) -> String {
    document.task().unwrap_or(default).to_ascii_lowercase()
}

#[cfg(test)]
mod tests;
