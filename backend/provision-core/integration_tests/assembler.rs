use provision_core::assembler::assemble_environment;
use provision_core::config::EnvironmentFiles;
use provision_core::error::assembly::AssemblyError;

use std::path::Path;

use tempfile::TempDir;

fn seed_environment(root: &Path, files: &[(&str, &[u8])]) {
    let dir = root.join("workflow-forecast/environment");
    std::fs::create_dir_all(&dir).unwrap();
    for (name, contents) in files {
        std::fs::write(dir.join(name), contents).unwrap();
    }
}

/// **VALUE**: Verifies the environment files land at the root byte-for-byte.
///
/// **WHY THIS MATTERS**: The forecast starts from `startup.m` in the run
/// directory. Any transformation (line endings, encoding) changes what the
/// scripting runtime executes.
#[test]
fn given_installed_workflow_when_assembled_then_files_copied_verbatim_in_order() {
    // GIVEN: All three environment files, one with non-UTF-8 bytes
    let temp = TempDir::new().unwrap();
    seed_environment(
        temp.path(),
        &[
            ("startup.m", b"addpath('model');\r\n"),
            ("run_forecast.m", b"run();\n"),
            ("apply_new_judgment.m", &[0xff, 0x00, 0x25]),
        ],
    );

    // WHEN: Assembling with the default file list
    let copied = assemble_environment(temp.path(), &EnvironmentFiles::default()).unwrap();

    // THEN: Configured order, identical bytes
    assert_eq!(
        copied,
        vec![
            temp.path().join("startup.m"),
            temp.path().join("run_forecast.m"),
            temp.path().join("apply_new_judgment.m"),
        ]
    );
    assert_eq!(std::fs::read(&copied[0]).unwrap(), b"addpath('model');\r\n");
    assert_eq!(std::fs::read(&copied[2]).unwrap(), vec![0xff, 0x00, 0x25]);
}

#[test]
fn given_existing_file_at_root_when_assembled_then_overwritten() {
    let temp = TempDir::new().unwrap();
    seed_environment(
        temp.path(),
        &[("startup.m", b"new"), ("run_forecast.m", b"new"), ("apply_new_judgment.m", b"new")],
    );
    std::fs::write(temp.path().join("startup.m"), "old and longer").unwrap();

    assemble_environment(temp.path(), &EnvironmentFiles::default()).unwrap();

    assert_eq!(std::fs::read_to_string(temp.path().join("startup.m")).unwrap(), "new");
}

/// **VALUE**: Verifies a missing source aborts before anything is copied.
///
/// **BUG THIS CATCHES**: Would catch a half-assembled root where `startup.m` is
/// fresh but `apply_new_judgment.m` is from a previous round.
#[test]
fn given_missing_source_when_assembled_then_error_and_nothing_copied() {
    // GIVEN: Only two of three files
    let temp = TempDir::new().unwrap();
    seed_environment(temp.path(), &[("startup.m", b"x"), ("run_forecast.m", b"y")]);

    // WHEN: Assembling
    let result = assemble_environment(temp.path(), &EnvironmentFiles::default());

    // THEN: MissingSource naming the absent file, root untouched
    match result {
        Err(AssemblyError::MissingSource { path, .. }) => {
            assert!(path.ends_with("workflow-forecast/environment/apply_new_judgment.m"));
        }
        other => panic!("Expected MissingSource, got {other:?}"),
    }
    assert!(!temp.path().join("startup.m").exists());
}

#[test]
fn given_custom_environment_when_assembled_then_uses_configured_subtree() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("analyst-tools/matlab/env");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("init.m"), "init").unwrap();
    let environment = EnvironmentFiles {
        dependency: "analyst-tools".to_string(),
        subdirectory: "matlab/env".into(),
        files: vec!["init.m".to_string()],
    };

    let copied = assemble_environment(temp.path(), &environment).unwrap();

    assert_eq!(copied, vec![temp.path().join("init.m")]);
    assert!(!temp.path().join("init.m.partial").exists());
}
