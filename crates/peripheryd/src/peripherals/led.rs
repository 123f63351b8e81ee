//! Digital output driving an LED.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use periphery_registry::{
    CommandDocument, ConfigurationError, Peripheral, PeripheralHandle, PeripheralTask, TaskError,
    TaskFactory, TaskOutcome,
};
use serde_json::{Value, json};

use super::{MAX_PIN, optional_bool, required_pin, selected_task};

const LED_TYPE: &str = "led";
const SET_TASK: &str = "set";
const TOGGLE_TASK: &str = "toggle";

/// An LED on one GPIO pin.
///
/// `active_low` LEDs are lit when the pin is driven low; task results report
/// both the logical state and the resulting pin level.
#[derive(Debug)]
pub struct Led {
    pin: u8,
    active_low: bool,
    lit: AtomicBool,
}

impl Led {
    /// Creates an LED that starts switched off.
    #[must_use]
    pub const fn new(pin: u8, active_low: bool) -> Self {
        Self {
            pin,
            active_low,
            lit: AtomicBool::new(false),
        }
    }

    pub(super) fn from_document(document: &CommandDocument) -> Result<Self, ConfigurationError> {
        let pin = required_pin(document)?;
        let active_low = optional_bool(document, "active_low", false)?;
        Ok(Self::new(pin, active_low))
    }

    pub(super) fn into_handle(self) -> PeripheralHandle {
        Arc::new(self)
    }

    /// GPIO pin the LED is wired to.
    #[must_use]
    pub const fn pin(&self) -> u8 {
        self.pin
    }

    /// Returns `true` while the LED is lit.
    #[must_use]
    pub fn is_lit(&self) -> bool {
        self.lit.load(Ordering::SeqCst)
    }

    fn report(&self, lit: bool) -> Value {
        json!({
            "pin": self.pin,
            "state": lit,
            "level": lit != self.active_low,
        })
    }
}

impl Peripheral for Led {
    fn peripheral_type(&self) -> &str {
        LED_TYPE
    }

    fn is_valid(&self) -> bool {
        self.pin <= MAX_PIN
    }

    fn task_factory(&self, document: &CommandDocument) -> Result<&dyn TaskFactory, TaskError> {
        match selected_task(document, SET_TASK).as_str() {
            SET_TASK => Ok(&SetFactory),
            TOGGLE_TASK => Ok(&ToggleFactory),
            other => Err(TaskError::unsupported(other)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn led(handle: &PeripheralHandle) -> Result<&Led, TaskError> {
    handle
        .downcast_ref::<Led>()
        .ok_or_else(|| TaskError::failed("task is bound to a peripheral that is not an led"))
}

struct SetFactory;

impl TaskFactory for SetFactory {
    fn task_name(&self) -> &str {
        SET_TASK
    }

    fn create_task(
        &self,
        peripheral: PeripheralHandle,
        parameter: &Value,
    ) -> Result<Box<dyn PeripheralTask>, TaskError> {
        let lit = parameter
            .get("state")
            .and_then(Value::as_bool)
            .ok_or_else(|| TaskError::invalid_parameter("set expects {\"state\": <bool>}"))?;
        Ok(Box::new(SetTask { peripheral, lit }))
    }
}

struct SetTask {
    peripheral: PeripheralHandle,
    lit: bool,
}

impl PeripheralTask for SetTask {
    fn run(self: Box<Self>) -> Result<TaskOutcome, TaskError> {
        let target = led(&self.peripheral)?;
        target.lit.store(self.lit, Ordering::SeqCst);
        Ok(TaskOutcome::with_output(target.report(self.lit)))
    }
}

struct ToggleFactory;

impl TaskFactory for ToggleFactory {
    fn task_name(&self) -> &str {
        TOGGLE_TASK
    }

    fn create_task(
        &self,
        peripheral: PeripheralHandle,
        _parameter: &Value,
    ) -> Result<Box<dyn PeripheralTask>, TaskError> {
        Ok(Box::new(ToggleTask { peripheral }))
    }
}

struct ToggleTask {
    peripheral: PeripheralHandle,
}

impl PeripheralTask for ToggleTask {
    fn run(self: Box<Self>) -> Result<TaskOutcome, TaskError> {
        let target = led(&self.peripheral)?;
        let lit = !target.lit.fetch_xor(true, Ordering::SeqCst);
        Ok(TaskOutcome::with_output(target.report(lit)))
    }
}
