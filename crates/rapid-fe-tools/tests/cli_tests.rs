//! Integration tests for the rapid-fe-tools binary.

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn template() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "index.html", "<div id=\"root\"></div>");
    write(root, "index.js", "#!/usr/bin/env node");
    write(root, "public/vite.svg", "<svg/>");
    write(root, "src/main.tsx", "import App from './App'");
    for folder in ["components-materialUi", "components-antd", "components-tailwind"] {
        write(root, &format!("src/{folder}/hook/useAuth.ts"), folder);
        write(root, &format!("src/{folder}/App.tsx"), folder);
        write(root, &format!("src/{folder}/package.json"), folder);
    }
    dir
}

fn command(cwd: &Path) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("rapid-fe-tools");
    cmd.current_dir(cwd)
        .env_remove("RAPID_FE_TEMPLATE")
        .env_remove("RAPID_FE_PACKAGE_MANAGER")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_flag() {
    let cwd = TempDir::new().unwrap();
    command(cwd.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--variant"))
        .stdout(predicate::str::contains("--on-existing"));
}

#[test]
fn test_version_flag() {
    let cwd = TempDir::new().unwrap();
    command(cwd.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_package_manager_rejected_by_parser() {
    let cwd = TempDir::new().unwrap();
    command(cwd.path())
        .args(["--package-manager", "pip"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_unknown_variant_exits_without_creating_project() {
    let tpl = template();
    let cwd = TempDir::new().unwrap();

    command(cwd.path())
        .args(["create", "--name", "app", "--variant", "bootstrap", "--no-install", "--yes"])
        .arg("--template-dir")
        .arg(tpl.path())
        .assert()
        .failure()
        .code(2);

    assert!(!cwd.path().join("app").exists());
}

#[test]
fn test_create_with_local_template() {
    let tpl = template();
    let cwd = TempDir::new().unwrap();

    command(cwd.path())
        .args(["--name", "app", "--variant", "antd", "--no-install", "--yes"])
        .arg("--template-dir")
        .arg(tpl.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("run dev"))
        .stdout(predicate::str::contains("https://github.com/mnisrei/test#readme"));

    let app = cwd.path().join("app");
    assert_eq!(
        fs::read_to_string(app.join("src/App.tsx")).unwrap(),
        "components-antd"
    );
    assert_eq!(
        fs::read_to_string(app.join("package.json")).unwrap(),
        "components-antd"
    );
    assert!(app.join("src/hooks/useAuth.ts").is_file());
    assert!(!app.join("src/components-antd").exists());
    assert!(!app.join("index.js").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let tpl = template();
    let cwd = TempDir::new().unwrap();

    command(cwd.path())
        .args(["create", "--name", "app", "--variant", "tailwind", "--dry-run", "--yes"])
        .arg("--template-dir")
        .arg(tpl.path())
        .assert()
        .success();

    assert!(!cwd.path().join("app").exists());
}

#[test]
fn test_refuse_policy_keeps_existing_folder() {
    let tpl = template();
    let cwd = TempDir::new().unwrap();
    write(cwd.path(), "app/notes.md", "keep me");

    command(cwd.path())
        .args(["--name", "app", "--variant", "antd", "--no-install", "--yes"])
        .args(["--on-existing", "refuse"])
        .arg("--template-dir")
        .arg(tpl.path())
        .assert()
        .failure()
        .code(1);

    assert_eq!(
        fs::read_to_string(cwd.path().join("app/notes.md")).unwrap(),
        "keep me"
    );
    assert!(!cwd.path().join("app/src").exists());
}

#[test]
fn test_dry_run_honours_refuse_policy() {
    let tpl = template();
    let cwd = TempDir::new().unwrap();
    write(cwd.path(), "app/notes.md", "keep me");

    command(cwd.path())
        .args(["--name", "app", "--variant", "antd", "--dry-run", "--yes"])
        .args(["--on-existing", "refuse"])
        .arg("--template-dir")
        .arg(tpl.path())
        .assert()
        .failure()
        .code(1);

    assert!(!cwd.path().join("app/src").exists());
}
