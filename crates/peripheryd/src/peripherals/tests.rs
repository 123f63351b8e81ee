//! Unit tests for the built-in drivers.

use std::sync::Arc;

use periphery_registry::{
    CommandDocument, ErrorKind, PeripheralFactory, PeripheralRegistry, RegistryError,
    TracingErrorSink,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;

fn document(value: Value) -> CommandDocument {
    CommandDocument::try_from(value).expect("test documents are objects")
}

#[fixture]
fn registry() -> PeripheralRegistry {
    PeripheralRegistry::new(
        Arc::new(BuiltinPeripheralFactory::new()),
        Arc::new(TracingErrorSink::new()),
    )
}

fn execute(
    registry: &PeripheralRegistry,
    name: &str,
    task: Option<&str>,
    parameter: Value,
) -> Result<Value, RegistryError> {
    let mut request = document(json!({ "name": name, "parameter": parameter }));
    if let Some(selected) = task {
        request = request.with("task", selected);
    }
    registry
        .execute(&request)
        .map(|outcome| outcome.output().clone())
}

#[rstest]
#[case::lowercase("led", "led")]
#[case::mixed_case("LeD", "led")]
#[case::analog("analog", "analog")]
fn factory_selects_driver_by_type(#[case] type_name: &str, #[case] expected: &str) {
    let handle = BuiltinPeripheralFactory::new()
        .create(&document(json!({"type": type_name, "pin": 4})))
        .expect("driver built");

    assert_eq!(handle.peripheral_type(), expected);
    assert!(handle.is_valid());
}

#[rstest]
#[case::unknown_type(json!({"type": "servo", "pin": 4}), "unknown peripheral type 'servo'")]
#[case::missing_type(json!({"pin": 4}), "missing property: type")]
#[case::missing_pin(json!({"type": "led"}), "missing property: pin")]
#[case::pin_overflow(json!({"type": "led", "pin": 300}), "pin 300 is out of range")]
#[case::active_low_type(json!({"type": "led", "pin": 4, "active_low": 1}), "active_low")]
#[case::raw_above_scale(json!({"type": "analog", "pin": 4, "raw": 5000}), "exceeds full scale")]
fn factory_rejects_bad_configuration(#[case] raw: Value, #[case] expected: &str) {
    let Err(error) = BuiltinPeripheralFactory::new().create(&document(raw)) else {
        panic!("configuration should be rejected");
    };
    assert!(error.message().contains(expected), "got: {error}");
}

#[rstest]
fn pins_above_gpio_range_fail_validation(mut registry: PeripheralRegistry) {
    let error = registry
        .add(&document(json!({"name": "led9", "type": "led", "pin": 40})))
        .expect_err("invalid pin");

    assert_eq!(error.kind(), ErrorKind::InvalidConfiguration);
    assert!(error.to_string().contains("led peripheral failed validation"));
}

#[rstest]
fn led_set_and_toggle_track_state(mut registry: PeripheralRegistry) {
    registry
        .add(&document(json!({"name": "led0", "type": "led", "pin": 2})))
        .expect("add led");

    let on = execute(&registry, "led0", None, json!({"state": true})).expect("set");
    assert_eq!(on, json!({"pin": 2, "state": true, "level": true}));

    let off = execute(&registry, "led0", Some("toggle"), json!({})).expect("toggle");
    assert_eq!(off["state"], false);

    let handle = registry.get_peripheral("led0").expect("registered");
    let led = handle.downcast_ref::<Led>().expect("led driver");
    assert!(!led.is_lit());
    assert_eq!(led.pin(), 2);
}

#[rstest]
fn active_low_led_inverts_level(mut registry: PeripheralRegistry) {
    registry
        .add(&document(
            json!({"name": "status", "type": "led", "pin": 5, "active_low": true}),
        ))
        .expect("add led");

    let output = execute(&registry, "status", Some("SET"), json!({"state": true})).expect("set");
    assert_eq!(output["level"], false);
}

#[rstest]
#[case::missing_state(Some("set"), json!({}))]
#[case::string_state(Some("set"), json!({"state": "on"}))]
#[case::unsupported_task(Some("blink"), json!({}))]
fn led_rejects_incompatible_tasks(
    mut registry: PeripheralRegistry,
    #[case] task: Option<&str>,
    #[case] parameter: Value,
) {
    registry
        .add(&document(json!({"name": "led0", "type": "led", "pin": 2})))
        .expect("add led");

    let error = execute(&registry, "led0", task, parameter).expect_err("incompatible");
    assert_eq!(error.kind(), ErrorKind::TaskIncompatible);
}

#[rstest]
fn analog_read_reports_millivolts(mut registry: PeripheralRegistry) {
    registry
        .add(&document(
            json!({"name": "adc0", "type": "analog", "pin": 34, "raw": 2048}),
        ))
        .expect("add analog");

    let output = execute(&registry, "adc0", None, json!({"samples": 8})).expect("read");
    assert_eq!(
        output,
        json!({"pin": 34, "raw": 2048, "millivolts": 1650, "samples": 8})
    );
}

#[rstest]
#[case::zero_samples(json!({"samples": 0}))]
#[case::too_many_samples(json!({"samples": 65}))]
#[case::not_an_object(json!([1]))]
fn analog_read_validates_parameter(mut registry: PeripheralRegistry, #[case] parameter: Value) {
    registry
        .add(&document(json!({"name": "adc0", "type": "analog", "pin": 34})))
        .expect("add analog");

    let error = execute(&registry, "adc0", Some("read"), parameter).expect_err("rejected");
    assert_eq!(error.kind(), ErrorKind::TaskIncompatible);
}

#[rstest]
fn led_task_is_incompatible_with_analog_input(mut registry: PeripheralRegistry) {
    registry
        .add(&document(json!({"name": "adc0", "type": "analog", "pin": 34})))
        .expect("add analog");

    let error = execute(&registry, "adc0", Some("toggle"), json!({})).expect_err("wrong type");
    assert!(error.to_string().contains("of type 'analog'"), "got: {error}");
}

#[test]
fn millivolts_scale_against_reference() {
    assert_eq!(AnalogInput::new(0, 3300, FULL_SCALE).millivolts(), 3300);
    assert_eq!(AnalogInput::new(0, 1100, 0).millivolts(), 0);
}
