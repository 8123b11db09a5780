use std::{env, process};

use traph::{
    magic::{ENV_CONFIG_PATH, ENV_VALIDATION},
    prelude::*,
};

fn echo_rules() -> Rules<Record> {
    Rules::<Record>::new()
        .rule("x", |i, _| Ok(i.get("x")?.clone()))
}

// The environment is process-wide: every case touching it stays in this single test.
#[test]
fn config_follows_environment() {
    let dir = env::temp_dir().join(format!("traph-env-{}", process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("traph.toml");
    std::fs::write(&path, "validation = \"pass-through\"\n").unwrap();

    // SAFETY: no other thread of this test binary touches the environment.
    unsafe {
        env::remove_var(ENV_CONFIG_PATH);
        env::remove_var(ENV_VALIDATION);
    }
    assert_eq!(TraphConfig::from_env().unwrap(), TraphConfig::default());

    unsafe { env::set_var(ENV_CONFIG_PATH, &path) };
    assert_eq!(
        TraphConfig::from_env().unwrap().validation,
        ValidationMode::PassThrough
    );

    // Explicit mode wins over the file
    unsafe { env::set_var(ENV_VALIDATION, "strict") };
    let transform = Transformer::from_env(echo_rules()).unwrap();
    assert_eq!(transform.config().validation, ValidationMode::Strict);
    let input = Record::new();
    let err = transform.apply(&input).unwrap_err();
    assert!(err.is_missing_input_field());

    unsafe { env::set_var(ENV_VALIDATION, "OFF") };
    let transform = Transformer::from_env(echo_rules()).unwrap();
    let output = transform.apply(&input).unwrap();
    assert!(output.get("x").unwrap().is_null());

    unsafe { env::set_var(ENV_VALIDATION, "sometimes") };
    match TraphConfig::from_env().unwrap_err() {
        TraphError::InvalidEnvValue { var, value } => {
            assert_eq!(var, ENV_VALIDATION);
            assert_eq!(value, "sometimes");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(Transformer::from_env(echo_rules()).is_err());

    unsafe {
        env::remove_var(ENV_VALIDATION);
        env::set_var(ENV_CONFIG_PATH, dir.join("absent.toml"));
    }
    assert!(TraphConfig::from_env().unwrap_err().is_io_error());

    unsafe { env::remove_var(ENV_CONFIG_PATH) };
    std::fs::remove_dir_all(&dir).unwrap();
}
