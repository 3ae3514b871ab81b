//! Build and board files the ESP-IDF image depends on.

const MANIFEST: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));

/// Lines of the `[header]` table, up to the next table.
fn table(header: &str) -> Vec<&'static str> {
    MANIFEST
        .lines()
        .skip_while(|l| l.trim() != header)
        .skip(1)
        .take_while(|l| !l.trim_start().starts_with('['))
        .collect()
}

#[test]
fn framework_crates_follow_the_target() {
    let target = table("[target.'cfg(target_os = \"espidf\")'.dependencies]");
    for krate in ["esp-idf-svc", "esp-idf-hal", "esp_idf_logger"] {
        let line = target
            .iter()
            .find(|l| l.starts_with(krate))
            .unwrap_or_else(|| panic!("{krate} missing from the ESP-IDF table"));
        assert!(!line.contains("optional"), "{krate} must not hide behind a feature");
    }
    assert!(table("[dependencies]").iter().all(|l| !l.starts_with("esp-idf")));
}

#[test]
fn build_script_keys_off_the_target() {
    let script = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/build.rs"));
    assert!(script.contains("CARGO_CFG_TARGET_OS"));
    assert!(!script.contains("feature = \"espidf\""));
}

#[test]
fn sdkconfig_gives_the_loop_a_one_ms_tick() {
    let sdkconfig = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sdkconfig.defaults"));
    assert!(sdkconfig.lines().any(|l| l.trim() == "CONFIG_FREERTOS_HZ=1000"));
}
