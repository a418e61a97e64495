use super::*;

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = resolve_settings(None, env_from(&[])).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.max_body_bytes, 64 * 1024);
    assert_eq!(settings.max_submissions, None);
}

#[test]
fn file_values_override_defaults() {
    let file = r#"
        bind_addr = "0.0.0.0:8080"
        max_body_bytes = 1024
        max_submissions = 50
    "#;
    let settings = resolve_settings(Some(file), env_from(&[])).expect("settings");
    assert_eq!(settings.bind_addr, "0.0.0.0:8080");
    assert_eq!(settings.max_body_bytes, 1024);
    assert_eq!(settings.max_submissions, Some(50));
    assert_eq!(settings.log_filter, Settings::default().log_filter);
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let file = r#"bind_addr = "0.0.0.0:8080""#;
    let env = env_from(&[
        ("SERVER_BIND", "10.0.0.1:1"),
        ("APP__BIND_ADDR", "10.0.0.2:2"),
        ("RUST_LOG", "debug"),
        ("APP__LOG_FILTER", "warn"),
        ("APP__MAX_BODY_BYTES", "2048"),
    ]);
    let settings = resolve_settings(Some(file), env).expect("settings");
    assert_eq!(settings.bind_addr, "10.0.0.2:2");
    assert_eq!(settings.log_filter, "warn");
    assert_eq!(settings.max_body_bytes, 2048);
}

#[test]
fn rust_log_is_used_when_no_app_filter_is_set() {
    let settings =
        resolve_settings(None, env_from(&[("RUST_LOG", "server=trace")])).expect("settings");
    assert_eq!(settings.log_filter, "server=trace");
}

#[test]
fn malformed_inputs_are_reported() {
    assert!(resolve_settings(Some("bind_addr = 5"), env_from(&[])).is_err());
    assert!(resolve_settings(Some("database_url = \"x\""), env_from(&[])).is_err());

    let error = resolve_settings(None, env_from(&[("APP__MAX_BODY_BYTES", "lots")]))
        .expect_err("not a number");
    assert!(error.to_string().contains("APP__MAX_BODY_BYTES"));
}

#[test]
fn submission_routes_are_opt_in() {
    let settings = resolve_settings(None, env_from(&[])).expect("settings");
    assert!(!settings.expose_submissions);
    assert!(settings.bind_addr.starts_with("127.0.0.1:"));

    let settings =
        resolve_settings(Some("expose_submissions = true"), env_from(&[])).expect("settings");
    assert!(settings.expose_submissions);

    let env = env_from(&[("APP__EXPOSE_SUBMISSIONS", "false")]);
    let settings = resolve_settings(Some("expose_submissions = true"), env).expect("settings");
    assert!(!settings.expose_submissions);

    assert!(resolve_settings(None, env_from(&[("APP__EXPOSE_SUBMISSIONS", "yes")])).is_err());
}
