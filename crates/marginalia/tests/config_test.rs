//! Tests for layered configuration loading.

use marginalia::MarginaliaConfig;
use serial_test::serial;

#[test]
fn test_bundled_defaults_match_code_defaults() {
    let config = MarginaliaConfig::from_toml_str("").unwrap();
    assert_eq!(config, MarginaliaConfig::default());
    assert_eq!(*config.engine.max_iterations(), 10);
    assert_eq!(*config.catalog.fallback_truncate_chars(), 200);
}

#[test]
fn test_overrides_merge_with_defaults() {
    let config = MarginaliaConfig::from_toml_str(
        r#"
        [engine]
        max_iterations = 4

        [generator]
        enabled = false
        model = "llama-3.2-1b-instruct"

        [lookup]
        cache_ttl_secs = 60
        "#,
    )
    .unwrap();

    assert_eq!(*config.engine.max_iterations(), 4);
    assert!(!*config.generator.enabled());
    assert_eq!(config.generator.model(), "llama-3.2-1b-instruct");
    assert_eq!(*config.lookup.cache_ttl_secs(), 60);
    assert_eq!(*config.lookup.timeout_secs(), 10);
    assert_eq!(config.generator.base_url(), "http://localhost:8080");
}

#[test]
fn test_zero_iteration_cap_rejected() {
    let result = MarginaliaConfig::from_toml_str("[engine]\nmax_iterations = 0\n");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("max_iterations"));
}

#[test]
fn test_out_of_range_temperature_rejected() {
    assert!(MarginaliaConfig::from_toml_str("[catalog]\ntemperature = 5.0\n").is_err());
}

#[test]
fn test_malformed_toml_rejected() {
    assert!(MarginaliaConfig::from_toml_str("[engine\nmax_iterations = 3").is_err());
}

#[test]
fn test_from_file() {
    let path = std::env::temp_dir().join(format!("marginalia-config-{}.toml", std::process::id()));
    std::fs::write(&path, "[catalog]\ndeterministic = true\n").unwrap();

    let config = MarginaliaConfig::from_file(&path);
    std::fs::remove_file(&path).unwrap();

    let config = config.unwrap();
    assert!(*config.catalog.deterministic());
    assert_eq!(*config.engine.max_iterations(), 10);
}

#[test]
fn test_missing_file_rejected() {
    assert!(MarginaliaConfig::from_file("/nonexistent/marginalia.toml").is_err());
}

#[test]
fn test_validate_ignores_disabled_generator() {
    let mut config = MarginaliaConfig::default();
    config.generator = config.generator.clone().with_enabled(false).with_model("");
    assert!(config.validate().is_ok());

    config.generator = config.generator.clone().with_enabled(true);
    assert!(config.validate().is_err());
}

/// Sets environment variables for one test and restores them on drop.
struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn set(vars: &[(&'static str, &str)]) -> Self {
        let saved = vars
            .iter()
            .map(|(key, value)| {
                let old = std::env::var(key).ok();
                // SAFETY: callers are #[serial], so no other thread touches the environment.
                unsafe { std::env::set_var(key, value) };
                (*key, old)
            })
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.saved {
            // SAFETY: see EnvGuard::set.
            unsafe {
                match old {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}

#[test]
#[serial]
fn test_load_applies_environment_overrides() {
    let home = tempfile::tempdir().unwrap();
    let _env = EnvGuard::set(&[
        ("HOME", home.path().to_str().unwrap()),
        ("MARGINALIA__ENGINE__MAX_ITERATIONS", "3"),
        ("MARGINALIA__GENERATOR__BASE_URL", "http://x:1"),
        ("MARGINALIA__CATALOG__DETERMINISTIC", "true"),
    ]);

    let config = MarginaliaConfig::load().unwrap();

    assert_eq!(*config.engine.max_iterations(), 3);
    assert_eq!(config.generator.base_url(), "http://x:1");
    assert!(*config.catalog.deterministic());
    assert_eq!(*config.lookup.timeout_secs(), 10);
}

#[test]
#[serial]
fn test_environment_beats_home_config() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join(".config/marginalia");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("marginalia.toml"),
        "[engine]\nmax_iterations = 5\n\n[lookup]\ncache_ttl_secs = 42\n",
    )
    .unwrap();
    let _env = EnvGuard::set(&[
        ("HOME", home.path().to_str().unwrap()),
        ("MARGINALIA__ENGINE__MAX_ITERATIONS", "7"),
    ]);

    let config = MarginaliaConfig::load().unwrap();

    assert_eq!(*config.engine.max_iterations(), 7);
    assert_eq!(*config.lookup.cache_ttl_secs(), 42);
}

#[test]
#[serial]
fn test_invalid_environment_override_rejected() {
    let home = tempfile::tempdir().unwrap();
    let _env = EnvGuard::set(&[
        ("HOME", home.path().to_str().unwrap()),
        ("MARGINALIA__ENGINE__MAX_ITERATIONS", "0"),
    ]);

    assert!(MarginaliaConfig::load().is_err());
}
