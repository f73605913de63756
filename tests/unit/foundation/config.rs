use super::*;

fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }
}

#[test]
fn empty_json_yields_defaults() {
    let opts = DeviceOptions::from_json_str("{}").unwrap();
    assert_eq!(opts, DeviceOptions::default());
    assert_eq!(opts.transfer_mode, TransferModePreference::Auto);
    assert_eq!(opts.power_preference, PowerPreference::HighPerformance);
}

#[test]
fn json_uses_kebab_case_names() {
    let opts = DeviceOptions::from_json_str(
        r#"{"power_preference":"low-power","transfer_mode":"packed-byte","label":"x"}"#,
    )
    .unwrap();
    assert_eq!(opts.power_preference, PowerPreference::LowPower);
    assert_eq!(opts.transfer_mode, TransferModePreference::PackedByte);
    assert_eq!(opts.label.as_deref(), Some("x"));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = DeviceOptions::from_json_str(r#"{"mode":"packed-byte"}"#).unwrap_err();
    assert!(err.to_string().contains("config error:"));
}

#[test]
fn overrides_replace_file_values() {
    let opts = DeviceOptions {
        transfer_mode: TransferModePreference::NativeFloat,
        ..DeviceOptions::default()
    }
    .with_overrides(lookup(&[
        (ENV_TRANSFER_MODE, "packed"),
        (ENV_FORCE_FALLBACK_ADAPTER, "TRUE"),
    ]))
    .unwrap();
    assert_eq!(opts.transfer_mode, TransferModePreference::PackedByte);
    assert!(opts.force_fallback_adapter);
}

#[test]
fn absent_overrides_leave_options_alone() {
    let base = DeviceOptions {
        force_fallback_adapter: true,
        ..DeviceOptions::default()
    };
    let opts = base.clone().with_overrides(lookup(&[])).unwrap();
    assert_eq!(opts, base);
}

#[test]
fn bad_transfer_mode_override_is_config_error() {
    let err = DeviceOptions::default()
        .with_overrides(lookup(&[(ENV_TRANSFER_MODE, "half")]))
        .unwrap_err();
    assert!(matches!(err, ComputeError::Config(_)));
    assert!(err.to_string().contains("half"));
}

#[test]
fn missing_file_is_wrapped_with_path() {
    let err = DeviceOptions::from_path(Path::new("does/not/exist.json")).unwrap_err();
    assert!(err.to_string().contains("does/not/exist.json"));
}
