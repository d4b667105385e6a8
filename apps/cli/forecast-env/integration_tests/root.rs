use forecast_env::cli::resolve_root;
use forecast_env::error::ForecastEnvError;

use provision_core::error::CoreError;
use provision_core::error::config::ConfigError;

use tempfile::TempDir;

#[test]
fn given_explicit_directory_when_resolving_root_then_used_as_is() {
    let temp = TempDir::new().unwrap();

    let root = resolve_root(Some(temp.path().to_path_buf())).unwrap();

    assert_eq!(root, temp.path());
}

#[test]
fn given_missing_directory_when_resolving_root_then_root_directory_error() {
    let temp = TempDir::new().unwrap();

    let result = resolve_root(Some(temp.path().join("absent")));

    assert!(matches!(
        result,
        Err(ForecastEnvError::Core(CoreError::Config(ConfigError::RootDirectory { .. })))
    ));
}

/// **VALUE**: Verifies the default root is the executable's directory, not the cwd.
#[test]
fn given_no_root_when_resolving_then_executable_directory() {
    let expected = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();

    assert_eq!(resolve_root(None).unwrap(), expected);
}
