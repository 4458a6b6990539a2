use ferrous_inject::config::ENV_PREFIX;
use ferrous_inject::{Container, ContainerConfig};
use serial_test::serial;
use std::env;

const KEYS: [&str; 3] = ["CAPACITY", "STRICT_STRATEGIES", "LOG_WIRING"];

fn clear() {
    for key in KEYS {
        env::remove_var(format!("{ENV_PREFIX}_{key}"));
    }
}

fn set(key: &str, value: &str) {
    env::set_var(format!("{ENV_PREFIX}_{key}"), value);
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear();
    assert_eq!(ContainerConfig::from_env(), ContainerConfig::default());
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear();
    set("CAPACITY", "128");
    set("STRICT_STRATEGIES", "yes");
    set("LOG_WIRING", "1");

    let config = ContainerConfig::from_env();
    clear();

    assert_eq!(config.capacity, 128);
    assert!(config.strict_strategies);
    assert!(config.log_wiring);
}

#[test]
#[serial]
fn test_unparsable_values_keep_defaults() {
    clear();
    set("CAPACITY", "lots");
    set("STRICT_STRATEGIES", "perhaps");

    let config = ContainerConfig::from_env();
    clear();

    assert_eq!(config.capacity, ContainerConfig::default().capacity);
    assert!(!config.strict_strategies);
}

#[test]
#[serial]
fn test_container_keeps_its_config() {
    clear();
    set("STRICT_STRATEGIES", "true");

    let container = Container::with_config(ContainerConfig::from_env());
    clear();

    assert!(container.config().strict_strategies);
}
