//! ADC channel with a fixed simulated reading.

use std::any::Any;
use std::sync::Arc;

use periphery_registry::{
    CommandDocument, ConfigurationError, Peripheral, PeripheralHandle, PeripheralTask, TaskError,
    TaskFactory, TaskOutcome,
};
use serde_json::{Value, json};

use super::{MAX_PIN, optional_u16, required_pin, selected_task};

const ANALOG_TYPE: &str = "analog";
const READ_TASK: &str = "read";
const DEFAULT_REFERENCE_MV: u16 = 3300;

/// Largest raw value of the 12-bit converter.
pub const FULL_SCALE: u16 = 4095;

/// Upper bound on samples averaged by one `read`.
pub const MAX_SAMPLES: u64 = 64;

/// An analog input on one GPIO pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalogInput {
    pin: u8,
    reference_mv: u16,
    raw: u16,
}

impl AnalogInput {
    /// Creates an input returning `raw` on every sample.
    #[must_use]
    pub const fn new(pin: u8, reference_mv: u16, raw: u16) -> Self {
        Self {
            pin,
            reference_mv,
            raw,
        }
    }

    pub(super) fn from_document(document: &CommandDocument) -> Result<Self, ConfigurationError> {
        let pin = required_pin(document)?;
        let reference_mv = optional_u16(document, "reference_mv", DEFAULT_REFERENCE_MV)?;
        let raw = optional_u16(document, "raw", 0)?;
        if raw > FULL_SCALE {
            return Err(ConfigurationError::new(format!(
                "raw reading {raw} exceeds full scale {FULL_SCALE}"
            )));
        }
        Ok(Self::new(pin, reference_mv, raw))
    }

    pub(super) fn into_handle(self) -> PeripheralHandle {
        Arc::new(self)
    }

    /// Converts the raw reading to millivolts against the reference voltage.
    #[must_use]
    pub fn millivolts(&self) -> u32 {
        (u32::from(self.raw) * u32::from(self.reference_mv))
            .checked_div(u32::from(FULL_SCALE))
            .unwrap_or_default()
    }
}

impl Peripheral for AnalogInput {
    fn peripheral_type(&self) -> &str {
        ANALOG_TYPE
    }

    fn is_valid(&self) -> bool {
        self.pin <= MAX_PIN
    }

    fn task_factory(&self, document: &CommandDocument) -> Result<&dyn TaskFactory, TaskError> {
        match selected_task(document, READ_TASK).as_str() {
            READ_TASK => Ok(&ReadFactory),
            other => Err(TaskError::unsupported(other)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct ReadFactory;

impl TaskFactory for ReadFactory {
    fn task_name(&self) -> &str {
        READ_TASK
    }

    fn create_task(
        &self,
        peripheral: PeripheralHandle,
        parameter: &Value,
    ) -> Result<Box<dyn PeripheralTask>, TaskError> {
        let options = parameter
            .as_object()
            .ok_or_else(|| TaskError::invalid_parameter("read expects an object"))?;
        let samples = match options.get("samples") {
            None => 1,
            Some(value) => value
                .as_u64()
                .filter(|count| (1..=MAX_SAMPLES).contains(count))
                .ok_or_else(|| {
                    TaskError::invalid_parameter(format!(
                        "samples must be an integer in 1..={MAX_SAMPLES}"
                    ))
                })?,
        };
        Ok(Box::new(ReadTask {
            peripheral,
            samples,
        }))
    }
}

struct ReadTask {
    peripheral: PeripheralHandle,
    samples: u64,
}

impl PeripheralTask for ReadTask {
    fn run(self: Box<Self>) -> Result<TaskOutcome, TaskError> {
        let input = self
            .peripheral
            .downcast_ref::<AnalogInput>()
            .ok_or_else(|| TaskError::failed("task is bound to a peripheral that is not analog"))?;
        Ok(TaskOutcome::with_output(json!({
            "pin": input.pin,
            "raw": input.raw,
            "millivolts": input.millivolts(),
            "samples": self.samples,
        })))
    }
}
