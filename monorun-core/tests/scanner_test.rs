use std::fs;
use tempfile::TempDir;

use monorun_core::error::Error;
use monorun_core::scanner::Scanner;

fn create_test_project(root: &std::path::Path, dir: &str, name: &str, deps: &[&str]) {
    let project_dir = root.join(dir);
    fs::create_dir_all(&project_dir).unwrap();

    let deps_str = deps
        .iter()
        .map(|d| format!("\"{}\": \"workspace:*\"", d))
        .collect::<Vec<_>>()
        .join(", ");

    let manifest = format!(
        r#"{{
  "name": "{}",
  "version": "1.0.0",
  "scripts": {{ "start": "node index.js" }},
  "dependencies": {{ {} }}
}}
"#,
        name, deps_str
    );

    fs::write(project_dir.join("package.json"), manifest).unwrap();
}

#[test]
fn test_scan_projects() {
    let temp_dir = TempDir::new().unwrap();

    create_test_project(temp_dir.path(), "web", "@acme/web", &["@acme/core"]);
    create_test_project(temp_dir.path(), "core", "@acme/core", &[]);

    let workspace = Scanner::new(temp_dir.path()).scan().unwrap();

    assert_eq!(workspace.len(), 2);
    assert_eq!(workspace.root(), temp_dir.path());
    assert_eq!(workspace.names(), vec!["@acme/core", "@acme/web"]);
    let web = workspace.get("@acme/web").unwrap();
    assert_eq!(web.dirname(), "web");
    assert_eq!(web.version(), Some("1.0.0"));
    assert_eq!(web.manifest.dependency_names(), vec!["@acme/core"]);
    assert!(web.manifest.has_script("start"));
}

#[test]
fn test_scan_skips_directories_without_manifest() {
    let temp_dir = TempDir::new().unwrap();

    create_test_project(temp_dir.path(), "api", "api", &[]);
    fs::create_dir_all(temp_dir.path().join("docs")).unwrap();
    fs::create_dir_all(temp_dir.path().join("node_modules/left-pad")).unwrap();
    fs::write(temp_dir.path().join("package.json"), r#"{"name": "root"}"#).unwrap();
    fs::write(temp_dir.path().join("README.md"), "# repo").unwrap();

    let workspace = Scanner::new(temp_dir.path()).scan().unwrap();

    assert_eq!(workspace.names(), vec!["api"]);
}

#[test]
fn test_scan_does_not_descend() {
    let temp_dir = TempDir::new().unwrap();

    create_test_project(temp_dir.path(), "api", "api", &[]);
    create_test_project(&temp_dir.path().join("api"), "nested", "nested", &[]);

    let workspace = Scanner::new(temp_dir.path()).scan().unwrap();

    assert_eq!(workspace.names(), vec!["api"]);
}

#[test]
fn test_scan_detects_pipfile_lock() {
    let temp_dir = TempDir::new().unwrap();

    create_test_project(temp_dir.path(), "ml", "ml", &[]);
    create_test_project(temp_dir.path(), "ui", "ui", &[]);
    fs::write(temp_dir.path().join("ml/Pipfile.lock"), "{}").unwrap();

    let workspace = Scanner::new(temp_dir.path()).scan().unwrap();

    assert!(workspace.get("ml").unwrap().pipfile_lock);
    assert!(!workspace.get("ui").unwrap().pipfile_lock);
}

#[test]
fn test_scan_order_is_by_directory_name() {
    let temp_dir = TempDir::new().unwrap();

    create_test_project(temp_dir.path(), "c-dir", "alpha", &[]);
    create_test_project(temp_dir.path(), "a-dir", "gamma", &[]);
    create_test_project(temp_dir.path(), "b-dir", "beta", &[]);

    let workspace = Scanner::new(temp_dir.path()).scan().unwrap();

    assert_eq!(workspace.names(), vec!["gamma", "beta", "alpha"]);
    assert_eq!(workspace.position("alpha"), Some(2));
}

#[test]
fn test_scan_accepts_null_dependency_maps() {
    let temp_dir = TempDir::new().unwrap();

    create_test_project(temp_dir.path(), "api", "api", &[]);
    fs::create_dir_all(temp_dir.path().join("cli")).unwrap();
    fs::write(
        temp_dir.path().join("cli/package.json"),
        r#"{"name": "cli", "version": "1.0.0", "dependencies": null, "scripts": null}"#,
    )
    .unwrap();

    let workspace = Scanner::new(temp_dir.path()).scan().unwrap();

    assert_eq!(workspace.names(), vec!["api", "cli"]);
    assert!(workspace.get("cli").unwrap().manifest.dependency_names().is_empty());
}

#[test]
fn test_scan_invalid_manifest_aborts() {
    let temp_dir = TempDir::new().unwrap();

    create_test_project(temp_dir.path(), "good", "good", &[]);
    fs::create_dir_all(temp_dir.path().join("broken")).unwrap();
    fs::write(temp_dir.path().join("broken/package.json"), "{ \"name\": ").unwrap();

    let result = Scanner::new(temp_dir.path()).scan();

    match result {
        Err(Error::Manifest { path, .. }) => {
            assert!(path.ends_with("broken/package.json"));
        }
        other => panic!("expected manifest error, got {:?}", other),
    }
}

#[test]
fn test_scan_duplicate_names() {
    let temp_dir = TempDir::new().unwrap();

    create_test_project(temp_dir.path(), "one", "same", &[]);
    create_test_project(temp_dir.path(), "two", "same", &[]);

    let result = Scanner::new(temp_dir.path()).scan();

    assert!(matches!(result, Err(Error::DuplicateProject { name, .. }) if name == "same"));
}

#[test]
fn test_scan_missing_root() {
    let temp_dir = TempDir::new().unwrap();

    let result = Scanner::new(temp_dir.path().join("missing")).scan();

    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_scan_empty_root() {
    let temp_dir = TempDir::new().unwrap();

    let workspace = Scanner::new(temp_dir.path()).scan().unwrap();

    assert!(workspace.is_empty());
}
