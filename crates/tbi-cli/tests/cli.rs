//! End-to-end tests that run the `tbi` binary against a temporary home.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Test context that sets up a temporary home directory
struct TestContext {
    temp_dir: TempDir,
    home: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let home = temp_dir.path().join("home");
        std::fs::create_dir_all(&home).expect("failed to create home");
        Self { temp_dir, home }
    }

    fn tbi_cmd(&self) -> Command {
        let bin_path = env!("CARGO_BIN_EXE_tbi");
        let mut cmd = Command::new(bin_path);
        cmd.env("HOME", &self.home);
        cmd.env("TBI_HOME", &self.home);
        cmd.env("TBI_NO_DESKTOP_REFRESH", "true");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.tbi_cmd().args(args).output().expect("failed to run tbi")
    }

    fn registry(&self) -> Vec<serde_json::Value> {
        let path = self
            .home
            .join(".local/share/tarball-installer/installations.json");
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).expect("registry is a JSON array"),
            Err(_) => Vec::new(),
        }
    }

    /// Write `foo-3.2.tar.gz` with a binary, a desktop entry and an icon.
    fn package(&self) -> PathBuf {
        let path = self.temp_dir.path().join("foo-3.2.tar.gz");
        let mut binary = vec![0x7f, b'E', b'L', b'F'];
        binary.resize(256, 0x90);
        let desktop = "[Desktop Entry]\nName=Foo Editor\nVersion=3.2\nExec=foo %F\nIcon=foo\n";
        write_tar_gz(
            &path,
            &[
                ("foo-3.2/bin/foo", binary.as_slice(), 0o755),
                ("foo-3.2/foo.desktop", desktop.as_bytes(), 0o644),
                ("foo-3.2/icons/foo.svg", "<svg/>".as_bytes(), 0o644),
            ],
        );
        path
    }

    /// Leave a marker for an installation the registry does not know about.
    fn plant_untracked_marker(&self) -> PathBuf {
        let dir = self.home.join("Applications/old");
        std::fs::create_dir_all(&dir).unwrap();
        let marker = dir.join(".tarball-installer-marker.json");
        let body = serde_json::json!({
            "app_id": UNTRACKED_ID,
            "app_name": "Old Tool",
            "tarball_source": "old-1.0.tar.gz",
        });
        std::fs::write(&marker, body.to_string()).unwrap();
        marker
    }

    /// Every file under the home directory with its contents.
    fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        collect_files(&self.home, &mut files);
        files
    }
}

const UNTRACKED_ID: &str = "tarball_installer_aaaaaaaaaaaa";

fn collect_files(dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(&path, files);
        } else {
            let data = std::fs::read(&path).unwrap();
            files.insert(path, data);
        }
    }
}

fn write_tar_gz(path: &Path, files: &[(&str, &[u8], u32)]) {
    let file = File::create(path).unwrap();
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data, mode) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(*mode);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn app_id(record: &serde_json::Value) -> String {
    record["app_id"].as_str().unwrap().to_string()
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage:"));
}

#[test]
fn test_list_empty_home() {
    let ctx = TestContext::new();
    let output = ctx.run(&["list"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No applications tracked"));
}

#[test]
fn test_unsupported_archive_is_rejected() {
    let ctx = TestContext::new();
    let archive = ctx.temp_dir.path().join("foo.zip");
    std::fs::write(&archive, "not a tarball").unwrap();

    let output = ctx.run(&["install", archive.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(ctx.registry().is_empty());
}

#[test]
fn test_dry_run_install_writes_nothing() {
    let ctx = TestContext::new();
    let archive = ctx.package();

    ctx.plant_untracked_marker();
    let before = ctx.snapshot();

    let output = ctx.run(&["--dry-run", "install", archive.to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(ctx.snapshot(), before);
    assert!(ctx.registry().is_empty());
    assert!(!ctx.home.join("Applications/foo-3.2").exists());
}

#[cfg(unix)]
#[test]
fn test_dry_run_uninstall_changes_nothing() {
    let ctx = TestContext::new();
    let archive = ctx.package();
    assert!(ctx.run(&["install", archive.to_str().unwrap()]).status.success());
    let id = app_id(&ctx.registry()[0]);
    ctx.plant_untracked_marker();
    let before = ctx.snapshot();

    let output = ctx.run(&["--dry-run", "uninstall", &id, "-y"]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(ctx.snapshot(), before);
    let registry = ctx.registry();
    assert_eq!(registry.len(), 1);
    assert_eq!(app_id(&registry[0]), id);
}

#[test]
fn test_dry_run_scan_and_cleanup_change_nothing() {
    let ctx = TestContext::new();
    let marker = ctx.plant_untracked_marker();
    let before = ctx.snapshot();

    let scan = ctx.run(&["--dry-run", "scan"]);
    assert!(scan.status.success(), "{scan:?}");
    assert!(stdout(&scan).contains("1 untracked installation(s) would be added"));
    assert_eq!(ctx.snapshot(), before);

    let cleanup = ctx.run(&["--dry-run", "cleanup", "-y"]);
    assert!(cleanup.status.success(), "{cleanup:?}");
    assert_eq!(ctx.snapshot(), before);
    assert!(marker.is_file());
    assert!(ctx.registry().is_empty());
}

#[cfg(unix)]
#[test]
fn test_install_list_and_uninstall() {
    let ctx = TestContext::new();
    let archive = ctx.package();

    let output = ctx.run(&["install", archive.to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");

    let registry = ctx.registry();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry[0]["app_name"], "Foo Editor");
    assert_eq!(registry[0]["install_type"], "user");
    let launcher = ctx.home.join(".local/bin/foo");
    assert!(launcher.is_file());
    assert!(ctx.home.join("Applications/foo-3.2/bin/foo").is_file());

    let list = ctx.run(&["list"]);
    assert!(stdout(&list).contains("Foo Editor"));

    let id = app_id(&registry[0]);
    let info = ctx.run(&["info", &id]);
    assert!(info.status.success());
    assert!(stdout(&info).contains(&id));

    let output = ctx.run(&["uninstall", &id, "-y"]);
    assert!(output.status.success(), "{output:?}");
    assert!(!launcher.exists());
    assert!(!ctx.home.join("Applications/foo-3.2").exists());
    assert!(ctx.registry().is_empty());
}

#[cfg(unix)]
#[test]
fn test_untrack_then_scan_rediscovers() {
    let ctx = TestContext::new();
    let archive = ctx.package();
    assert!(ctx.run(&["install", archive.to_str().unwrap()]).status.success());
    let id = app_id(&ctx.registry()[0]);

    assert!(ctx.run(&["untrack", &id]).status.success());
    assert!(ctx.registry().is_empty());
    assert!(ctx.home.join(".local/bin/foo").exists());

    assert!(ctx.run(&["scan"]).status.success());
    let registry = ctx.registry();
    assert_eq!(registry.len(), 1);
    assert_eq!(app_id(&registry[0]), id);
    assert_eq!(registry[0]["discovered"], true);
}

#[cfg(unix)]
#[test]
fn test_cleanup_removes_untracked_markers() {
    let ctx = TestContext::new();
    let archive = ctx.package();
    assert!(ctx.run(&["install", archive.to_str().unwrap()]).status.success());
    let id = app_id(&ctx.registry()[0]);
    let marker = ctx
        .home
        .join("Applications/foo-3.2/.tarball-installer-marker.json");
    assert!(marker.is_file());

    assert!(ctx.run(&["untrack", &id]).status.success());
    let output = ctx.run(&["cleanup", "-y"]);
    assert!(output.status.success(), "{output:?}");
    assert!(!marker.exists());

    // nothing left to rediscover
    assert!(ctx.run(&["scan"]).status.success());
    assert!(ctx.registry().is_empty());
}

#[test]
fn test_unknown_app_id_fails() {
    let ctx = TestContext::new();
    assert!(!ctx.run(&["info", "tarball_installer_000000000000"]).status.success());
    assert!(!ctx.run(&["untrack", "tarball_installer_000000000000"]).status.success());
}
