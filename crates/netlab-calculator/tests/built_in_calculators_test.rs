use netlab_calculator::{
    CalculatorError, CalculatorRegistry, InputKind, InputValue, InputValues, LabConfig,
    ResultValue, compute, compute_json, list_calculators,
};
use netlab_calculator::built_in::subnet_hosts::SubnetHostsCalculator;
use serde_json::json;

fn inputs(pairs: &[(&str, InputValue)]) -> InputValues {
    pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
}

fn number(result: &netlab_calculator::CalculatorResult) -> f64 {
    result.value.as_number().unwrap()
}

#[test]
fn fiber_loss_calculator_works() {
    let result = compute(
        "fiber_loss",
        &inputs(&[("distanceKm", InputValue::Number(10.0)), ("splices", InputValue::Integer(4))]),
    )
    .unwrap();
    // 10 * 0.35 + 4 * 0.10 + 1.0
    assert!((number(&result) - 4.9).abs() < 1e-9);
    assert_eq!(result.unit, "dB");
    assert_eq!(result.display, "4.90 dB");
    assert!(result.valid);
}

#[test]
fn fiber_loss_accepts_form_text() {
    let result = compute(
        "fiber_loss",
        &inputs(&[("distanceKm", InputValue::from(" 4 ")), ("splices", InputValue::from("0"))]),
    )
    .unwrap();
    assert_eq!(result.display, "2.40 dB");
}

#[test]
fn fiber_loss_rejects_negative_distance() {
    let err = compute(
        "fiber_loss",
        &inputs(&[("distanceKm", InputValue::Number(-1.0)), ("splices", InputValue::Integer(0))]),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "distanceKm must be >= 0");
}

#[test]
fn download_time_calculator_works() {
    let result = compute(
        "download_time",
        &inputs(&[("sizeGB", InputValue::Number(50.0)), ("speedMbps", InputValue::Number(300.0))]),
    )
    .unwrap();
    assert!((number(&result) - 50.0 * 8000.0 / 300.0).abs() < 1e-9);
    assert_eq!(result.display, "22.2m");
    assert_eq!(result.details["megabits"], ResultValue::Number(400_000.0));
}

#[test]
fn download_time_display_units() {
    let seconds = compute(
        "download_time",
        &inputs(&[("sizeGB", InputValue::Number(1.0)), ("speedMbps", InputValue::Number(1000.0))]),
    )
    .unwrap();
    assert_eq!(seconds.display, "8s");

    let hours = compute(
        "download_time",
        &inputs(&[("sizeGB", InputValue::Number(100.0)), ("speedMbps", InputValue::Number(10.0))]),
    )
    .unwrap();
    assert_eq!(hours.display, "22.2h");
}

#[test]
fn download_time_rejects_zero_speed() {
    let err = compute(
        "download_time",
        &inputs(&[("sizeGB", InputValue::Number(1.0)), ("speedMbps", InputValue::Number(0.0))]),
    )
    .unwrap_err();
    assert_eq!(err, CalculatorError::invalid("speedMbps", "> 0"));
}

#[test]
fn subnet_hosts_calculator_works() {
    for (prefix, hosts, display) in
        [(24, 254, "254 hosts"), (30, 2, "2 hosts"), (16, 65_534, "65,534 hosts")]
    {
        let result =
            compute("subnet_hosts", &inputs(&[("prefixLength", InputValue::Integer(prefix))]))
                .unwrap();
        assert_eq!(result.value, ResultValue::Integer(hosts));
        assert_eq!(result.display, display);
    }
}

#[test]
fn subnet_hosts_outside_window_fail() {
    for prefix in [15, 31] {
        let err = compute("subnet_hosts", &inputs(&[("prefixLength", InputValue::Integer(prefix))]))
            .unwrap_err();
        assert_eq!(err.to_string(), "prefixLength must be in [16,30]");
    }
    let err = compute("subnet_hosts", &inputs(&[("prefixLength", InputValue::Number(24.5))]))
        .unwrap_err();
    assert_eq!(err.to_string(), "prefixLength must be an integer");
}

#[test]
fn raid_capacity_calculator_works() {
    let result = compute(
        "raid5_capacity",
        &inputs(&[("diskCount", InputValue::Integer(4)), ("diskSizeTB", InputValue::Number(2.0))]),
    )
    .unwrap();
    assert_eq!(result.value, ResultValue::Number(6.0));
    assert_eq!(result.display, "6 TB");

    let err = compute(
        "raid5_capacity",
        &inputs(&[("diskCount", InputValue::Integer(1)), ("diskSizeTB", InputValue::Number(2.0))]),
    )
    .unwrap_err();
    assert_eq!(err.field(), Some("diskCount"));
}

#[test]
fn sla_downtime_calculator_works() {
    let result =
        compute("sla_downtime", &inputs(&[("slaPercent", InputValue::Number(99.9))])).unwrap();
    assert!((number(&result) - 525.6).abs() < 1e-6);
    assert_eq!(result.display, "525.6 min/year");

    let perfect =
        compute("sla_downtime", &inputs(&[("slaPercent", InputValue::Integer(100))])).unwrap();
    assert_eq!(number(&perfect), 0.0);

    let err =
        compute("sla_downtime", &inputs(&[("slaPercent", InputValue::Integer(0))])).unwrap_err();
    assert_eq!(err.to_string(), "slaPercent must be in (0,100]");
}

#[test]
fn data_units_calculator_works() {
    let result = compute("data_units", &inputs(&[("gigabytes", InputValue::Integer(2))])).unwrap();
    assert_eq!(result.value, ResultValue::Number(2048.0));
    assert_eq!(result.details["megabits"], ResultValue::Number(16_384.0));
    assert_eq!(result.display, "2,048 MB / 16,384 Mb");

    assert!(compute("data_units", &inputs(&[("gigabytes", InputValue::Number(-0.5))])).is_err());
}

#[test]
fn power_calculator_works() {
    let cases = [(0.0, 1.0, "1.0000 mW"), (10.0, 10.0, "10.0000 mW"), (-10.0, 0.1, "0.1000 mW")];
    for (dbm, mw, display) in cases {
        let result = compute("power_dbm", &inputs(&[("dBm", InputValue::Number(dbm))])).unwrap();
        assert!((number(&result) - mw).abs() < 1e-12);
        assert_eq!(result.display, display);
    }
}

#[test]
fn mac_address_calculator_classifies() {
    let classify = |mac: &str| {
        compute("mac_address", &inputs(&[("macString", InputValue::from(mac))])).unwrap()
    };

    let valid = classify("AA:BB:CC:DD:EE:FF");
    assert_eq!(valid.value, ResultValue::Text("valid".into()));
    assert!(valid.valid);

    assert!(classify("AA-BB-CC-DD-EE-FF").valid);

    let invalid = classify("AABBCCDDEEFF");
    assert_eq!(invalid.value, ResultValue::Text("invalid".into()));
    assert!(!invalid.valid);

    let awaiting = classify("");
    assert_eq!(awaiting.value, ResultValue::Text("awaiting".into()));
    assert!(!awaiting.valid);
    assert_ne!(awaiting, invalid);

    // Untouched widget
    let untouched = compute("mac_address", &InputValues::new()).unwrap();
    assert_eq!(untouched, awaiting);
}

#[test]
fn missing_inputs_are_invalid_not_nan() {
    let err = compute("fiber_loss", &inputs(&[("splices", InputValue::Integer(1))])).unwrap_err();
    assert_eq!(err.to_string(), "distanceKm must be provided");

    let err = compute(
        "download_time",
        &inputs(&[("sizeGB", InputValue::from("")), ("speedMbps", InputValue::Integer(10))]),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "sizeGB must be a number");
}

#[test]
fn listing_describes_every_form() {
    let specs = list_calculators();
    assert_eq!(specs.len(), 8);

    let subnet = specs.iter().find(|s| s.id == "subnet_hosts").unwrap();
    assert_eq!(subnet.inputs.len(), 1);
    assert_eq!(subnet.inputs[0].key, "prefixLength");
    assert_eq!(subnet.inputs[0].kind, InputKind::Integer);
    assert_eq!(subnet.inputs[0].range_constraint().as_deref(), Some("in [16,30]"));

    let mac = specs.iter().find(|s| s.id == "mac_address").unwrap();
    assert!(mac.inputs[0].pattern.is_some());

    // Every default must compute
    for spec in &specs {
        let defaults: InputValues =
            spec.inputs.iter().map(|i| (i.key.clone(), i.default.clone())).collect();
        assert!(compute(&spec.id, &defaults).is_ok(), "{} defaults rejected", spec.id);
    }
}

#[test]
fn overridden_constants_reach_the_formulas() {
    let config = LabConfig::from_toml_str(
        r#"
        [fiber]
        attenuation_db_per_km = 0.5
        connector_count = 0

        [subnet]
        min_prefix = 8
        "#,
    )
    .unwrap();
    let registry = CalculatorRegistry::with_config(&config).unwrap();

    let fiber = registry
        .compute(
            "fiber_loss",
            &inputs(&[("distanceKm", InputValue::Number(10.0)), ("splices", InputValue::Integer(0))]),
        )
        .unwrap();
    assert_eq!(fiber.value, ResultValue::Number(5.0));

    let subnet =
        registry.compute("subnet_hosts", &inputs(&[("prefixLength", InputValue::Integer(8))])).unwrap();
    assert_eq!(subnet.value, ResultValue::Integer(16_777_214));
    assert!(compute("subnet_hosts", &inputs(&[("prefixLength", InputValue::Integer(8))])).is_err());
}

#[test]
fn hand_built_config_cannot_widen_subnets_past_thirty() {
    let mut config = LabConfig::default();
    config.subnet.max_prefix = 32;
    assert!(CalculatorRegistry::with_config(&config).is_err());

    // The calculator itself caps the window whatever table it is given.
    let mut registry = CalculatorRegistry::new();
    registry.register(Box::new(SubnetHostsCalculator::new(config.subnet.clone())));
    for prefix in [31, 32, 40] {
        let err = registry
            .compute("subnet_hosts", &inputs(&[("prefixLength", InputValue::Integer(prefix))]))
            .unwrap_err();
        assert_eq!(err.to_string(), "prefixLength must be in [16,30]");
    }
}

#[test]
fn overflowing_results_are_invalid_input() {
    let err = compute("power_dbm", &inputs(&[("dBm", InputValue::Number(4000.0))])).unwrap_err();
    assert_eq!(err.field(), Some("dBm"));

    let err =
        compute("data_units", &inputs(&[("gigabytes", InputValue::Number(1e308))])).unwrap_err();
    assert_eq!(err.field(), Some("gigabytes"));

    assert!(matches!(
        compute_json("power_dbm", &json!({ "dBm": 4000 })),
        Err(CalculatorError::InvalidInput { .. })
    ));
}

#[test]
fn json_bridge() {
    let out = compute_json("subnet_hosts", &json!({ "prefixLength": 24 })).unwrap();
    assert_eq!(out["value"], json!(254));
    assert_eq!(out["display"], json!("254 hosts"));

    let out = compute_json("mac_address", &json!({ "macString": "aa-bb-cc-dd-ee-ff" })).unwrap();
    assert_eq!(out["value"], json!("valid"));

    assert!(matches!(
        compute_json("subnet_hosts", &json!("24")),
        Err(CalculatorError::MalformedPayload(_))
    ));
    assert!(matches!(
        compute_json("traceroute", &json!({})),
        Err(CalculatorError::UnknownCalculator(_))
    ));
}
