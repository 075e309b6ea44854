//! Tarball installation.
//!
//! A user install:
//!
//! 1. Extracts the tarball to a scratch directory (or reuses one).
//! 2. Analyzes the extraction root and picks a main binary.
//! 3. Copies the whole tree to `~/Applications/<name>` and drops a marker there.
//! 4. Writes a launcher script into `~/.local/bin` for every candidate binary.
//! 5. Copies desktop entries with `Exec=` pointed at the launchers.
//! 6. Copies icons into the `hicolor` theme.
//!
//! The returned [`InstallationRecord`] lists every file written outside the
//! copied tree; registering it is the caller's job.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tbi_schema::{
    APP_ID_PREFIX, AppId, INSTALLED_BY, INSTALLER_VERSION, InstallType, InstallationRecord,
    MarkerFile,
};
use tracing::{info, warn};

use super::{Context, InstallError, refresh_desktop_database};
use crate::analyzer::desktop::rewrite_exec_lines;
use crate::analyzer::{DesktopEntry, PackageAnalyzer, PackageContents};
use crate::io::extract::{app_name_from_archive, archive_stem, extract_tarball, extraction_root};
use crate::marker::write_marker;

const ICON_SIZES: [&str; 7] = [
    "16x16", "32x32", "48x48", "64x64", "128x128", "256x256", "512x512",
];

/// What to install and how.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub archive: PathBuf,
    pub install_type: InstallType,
    /// Main binary chosen by hand, relative to the package root.
    pub selected_binary: Option<PathBuf>,
    /// Reuse an extraction made earlier (e.g. during analysis).
    pub extracted_dir: Option<PathBuf>,
}

impl InstallRequest {
    pub fn new(archive: impl Into<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
            install_type: InstallType::User,
            selected_binary: None,
            extracted_dir: None,
        }
    }
}

/// Identifier for an archive: prefix plus 12 hex digits of SHA-256 of its path.
///
/// The same path always gives the same id, so reinstalling updates the
/// existing record instead of adding a second one.
pub fn app_id_for(archive: &Path) -> AppId {
    let digest = Sha256::digest(archive.to_string_lossy().as_bytes());
    let hex = hex::encode(digest);
    AppId::new(format!("{APP_ID_PREFIX}{}", &hex[..12]))
}

/// Local time in ISO-8601, microsecond precision.
pub fn install_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Install a tarball for the current user.
///
/// # Errors
///
/// Returns an error if extraction fails or any file in the user layout
/// cannot be written.
pub fn install(ctx: &Context, request: &InstallRequest) -> Result<InstallationRecord, InstallError> {
    let reporter = &ctx.reporter;
    let archive = std::path::absolute(&request.archive)?;
    let source_filename = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| InstallError::context("Invalid archive path", archive.display()))?;
    let app_id = app_id_for(&archive);

    reporter.section("Installing");
    reporter.info(&format!("Starting installation of {source_filename}"));

    // Keeps a fresh extraction alive until the copy is done
    let mut scratch = None;
    let extracted = match request.extracted_dir.as_deref().filter(|d| d.exists()) {
        Some(dir) => {
            reporter.progress("Using existing extraction...", 30);
            dir.to_path_buf()
        }
        None => {
            reporter.progress("Preparing installation...", 10);
            let tmp = tempfile::Builder::new()
                .prefix("tarball_installer_")
                .tempdir()?;
            reporter.info(&format!(
                "Extracting to temporary directory: {}",
                tmp.path().display()
            ));
            if let Err(err) = extract_tarball(&archive, tmp.path()) {
                reporter.error(&format!("Extraction failed: {err}"));
                return Err(err.into());
            }
            let dir = tmp.path().to_path_buf();
            scratch = Some(tmp);
            dir
        }
    };

    reporter.progress("Analyzing package contents...", 70);
    let root = extraction_root(&extracted);
    let contents =
        PackageAnalyzer::new(&root).analyze_with_selection(request.selected_binary.as_deref());

    reporter.info(&format!(
        "Found: {} desktop files, {} binaries, {} icons",
        contents.desktop_files.len(),
        contents.binaries.len(),
        contents.icons.len()
    ));
    if let Some(name) = contents.main_binary.as_deref().and_then(Path::file_name) {
        reporter.info(&format!("Using binary: {}", name.to_string_lossy()));
    }

    let (app_name, app_version) = match contents.primary_desktop_entry() {
        Some(DesktopEntry {
            name: Some(name),
            version,
            ..
        }) => (name, version),
        _ => (app_name_from_archive(&source_filename), "1.0".to_string()),
    };

    if request.install_type == InstallType::System {
        warn!("system-wide install requested, falling back to user install");
        reporter.warning(
            "System-wide installation not yet implemented. Falling back to user installation.",
        );
    }

    let dir_name = if root == extracted {
        archive_stem(&source_filename)
    } else {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| archive_stem(&source_filename))
    };

    let marker = MarkerFile {
        installed_by: INSTALLED_BY.to_string(),
        installer_version: INSTALLER_VERSION.to_string(),
        app_id: app_id.clone(),
        app_name: app_name.clone(),
        app_version: app_version.clone(),
        install_time: install_timestamp(),
        install_type: InstallType::User,
        tarball_source: source_filename.clone(),
    };

    let placed = install_to_user(ctx, &contents, &dir_name, &marker)?;

    reporter.progress("Cleaning up...", 95);
    drop(scratch);

    let main_binary = contents.main_binary.as_deref().map(|main| {
        main.strip_prefix(&root)
            .map_or_else(|_| main.to_path_buf(), |rel| placed.app_dir.join(rel))
    });

    info!(app_id = %app_id, app_dir = %placed.app_dir.display(), "installed");
    reporter.progress("Installation complete!", 100);
    reporter.success(&format!("Installed {app_name}"));

    Ok(InstallationRecord {
        app_id,
        app_name,
        app_version,
        source_filename,
        install_time: marker.install_time,
        install_type: InstallType::User,
        installed_files: placed.installed_files,
        marker_files: placed.marker_files,
        discovered: false,
        source_file: Some(archive),
        main_binary,
        app_install_dir: Some(placed.app_dir),
        installer_version: Some(INSTALLER_VERSION.to_string()),
    })
}

/// Files placed by a user install.
struct Placed {
    app_dir: PathBuf,
    installed_files: Vec<PathBuf>,
    marker_files: Vec<PathBuf>,
}

fn install_to_user(
    ctx: &Context,
    contents: &PackageContents,
    dir_name: &str,
    marker: &MarkerFile,
) -> Result<Placed, InstallError> {
    let layout = &ctx.layout;
    let reporter = &ctx.reporter;
    let local_bin = layout.local_bin();
    let applications = layout.applications_dir();
    let icons_root = layout.icons_dir();
    let apps_root = layout.apps_root();

    for dir in [&local_bin, &applications, &icons_root, &apps_root] {
        fs::create_dir_all(dir)?;
    }

    let mut installed_files: Vec<PathBuf> = Vec::new();
    let mut track = |path: PathBuf| {
        if !installed_files.contains(&path) {
            installed_files.push(path);
        }
    };

    // Whole package tree
    let app_dir = apps_root.join(dir_name);
    if app_dir.exists() {
        fs::remove_dir_all(&app_dir)?;
    }
    copy_dir_all(&contents.root, &app_dir)?;

    let marker_path = write_marker(&app_dir, marker)?;
    reporter.info(&format!("Created marker file: {}", marker_path.display()));

    // Launchers
    for binary in &contents.binaries {
        let Some(name) = binary.file_name() else {
            continue;
        };
        let relative = binary.strip_prefix(&contents.root).unwrap_or(binary);
        let launcher = local_bin.join(name);
        fs::write(&launcher, launcher_script(&app_dir, relative))?;
        set_executable(&launcher)?;
        reporter.info(&format!("Created launcher: {}", launcher.display()));
        track(launcher);
    }

    // Desktop entries
    for desktop in &contents.desktop_files {
        let Some(name) = desktop.file_name() else {
            continue;
        };
        let dest = applications.join(name);
        match fs::read_to_string(desktop) {
            Ok(content) => fs::write(&dest, rewrite_exec_lines(&content, &local_bin))?,
            Err(err) => {
                reporter.warning(&format!("Could not update desktop file: {err}"));
                fs::copy(desktop, &dest)?;
            }
        }
        reporter.info(&format!("Installed desktop entry: {}", dest.display()));
        track(dest);
    }

    // Icons
    for icon in &contents.icons {
        let Some(name) = icon.file_name() else {
            continue;
        };
        let dest_dir = icons_root
            .join("hicolor")
            .join(icon_size_dir(icon))
            .join("apps");
        fs::create_dir_all(&dest_dir)?;
        let dest = dest_dir.join(name);
        fs::copy(icon, &dest)?;
        track(dest);
    }

    if !contents.desktop_files.is_empty() {
        refresh_desktop_database(ctx, &applications);
    }

    Ok(Placed {
        app_dir,
        installed_files,
        marker_files: vec![marker_path],
    })
}

/// Shell launcher that runs `relative` from inside `app_dir`.
fn launcher_script(app_dir: &Path, relative: &Path) -> String {
    format!(
        "#!/bin/bash\ncd \"{}\"\nexec \"./{}\" \"$@\"\n",
        app_dir.display(),
        relative.display()
    )
}

/// `hicolor` size directory for an icon.
///
/// PNGs whose path mentions a standard size (`48x48`, or `4848` in the file
/// name) go there; everything else is `scalable`.
fn icon_size_dir(icon: &Path) -> &'static str {
    let is_png = icon
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    if !is_png {
        return "scalable";
    }

    let full = icon.to_string_lossy();
    let name = icon
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    ICON_SIZES
        .iter()
        .find(|size| full.contains(*size) || name.contains(&size.replace('x', "")))
        .copied()
        .unwrap_or("scalable")
}

/// Recursively copy a directory tree from `src` to `dst`.
fn copy_dir_all(src: &Path, dst: &Path) -> Result<(), InstallError> {
    fs::create_dir_all(dst)?;
    fs_extra::dir::copy(
        src,
        dst,
        &fs_extra::dir::CopyOptions::new()
            .content_only(true)
            .overwrite(true),
    )
    .map_err(|e| InstallError::context("Copy failed", e))?;
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs::File;
    use std::sync::Arc;

    use crate::paths::Layout;
    use crate::reporter::NullReporter;

    pub(crate) fn test_context(home: &Path) -> Context {
        Context::new(Layout::new(home), Arc::new(NullReporter)).without_desktop_refresh()
    }

    /// Package with a main binary, a helper script, a desktop entry and an icon.
    pub(crate) fn build_package(path: &Path) {
        let elf = {
            let mut data = crate::analyzer::ELF_MAGIC.to_vec();
            data.resize(256, 0x90);
            data
        };
        let desktop = "[Desktop Entry]\nName=Foo Editor\nVersion=3.2\nExec=foo %F\nIcon=foo\n";
        let files: [(&str, &[u8], u32); 4] = [
            ("foo-3.2/bin/foo", elf.as_slice(), 0o755),
            ("foo-3.2/uninstall.sh", "#!/bin/sh\n".as_bytes(), 0o755),
            ("foo-3.2/foo.desktop", desktop.as_bytes(), 0o644),
            ("foo-3.2/icons/48x48/foo.png", "png".as_bytes(), 0o644),
        ];

        let file = File::create(path).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, data, mode) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(mode);
            header.set_cksum();
            builder.append_data(&mut header, name, data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_install_places_files_and_returns_record() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("home");
        let archive = tmp.path().join("foo-3.2.tar.gz");
        build_package(&archive);

        let ctx = test_context(&home);
        let record = install(&ctx, &InstallRequest::new(&archive)).unwrap();

        assert_eq!(record.app_id, app_id_for(&archive));
        assert_eq!(record.app_name, "Foo Editor");
        assert_eq!(record.app_version, "3.2");
        assert_eq!(record.source_filename, "foo-3.2.tar.gz");
        assert!(!record.discovered);

        let app_dir = home.join("Applications/foo-3.2");
        assert_eq!(record.app_install_dir.as_deref(), Some(app_dir.as_path()));
        assert_eq!(record.main_binary, Some(app_dir.join("bin/foo")));
        assert!(app_dir.join("bin/foo").is_file());
        assert_eq!(record.marker_files, vec![app_dir.join(tbi_schema::MARKER_FILE_NAME)]);

        let launcher = home.join(".local/bin/foo");
        let script = fs::read_to_string(&launcher).unwrap();
        assert!(script.contains(&format!("cd \"{}\"", app_dir.display())));
        assert!(script.contains("exec \"./bin/foo\" \"$@\""));
        assert!(record.installed_files.contains(&launcher));

        let desktop = fs::read_to_string(home.join(".local/share/applications/foo.desktop")).unwrap();
        assert!(desktop.contains(&format!("Exec={}/foo %F", home.join(".local/bin").display())));

        let icon = home.join(".local/share/icons/hicolor/48x48/apps/foo.png");
        assert!(icon.is_file());
        assert!(record.installed_files.contains(&icon));

        let marker = crate::marker::read_marker(&record.marker_files[0]).unwrap();
        assert_eq!(marker.app_id, record.app_id);
        assert_eq!(marker.tarball_source, "foo-3.2.tar.gz");
    }

    #[cfg(unix)]
    #[test]
    fn test_reinstall_replaces_app_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("home");
        let archive = tmp.path().join("foo-3.2.tar.gz");
        build_package(&archive);
        let ctx = test_context(&home);

        install(&ctx, &InstallRequest::new(&archive)).unwrap();
        let stale = home.join("Applications/foo-3.2/stale.txt");
        fs::write(&stale, "old").unwrap();

        let again = install(&ctx, &InstallRequest::new(&archive)).unwrap();
        assert!(!stale.exists());
        assert_eq!(again.app_id, app_id_for(&archive));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_install_falls_back_to_user() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("home");
        let archive = tmp.path().join("foo-3.2.tar.gz");
        build_package(&archive);

        let mut request = InstallRequest::new(&archive);
        request.install_type = InstallType::System;
        let record = install(&test_context(&home), &request).unwrap();
        assert_eq!(record.install_type, InstallType::User);
        assert!(home.join("Applications/foo-3.2").is_dir());
    }

    #[derive(Default)]
    struct RecordingReporter {
        errors: std::sync::Mutex<Vec<String>>,
    }

    impl crate::Reporter for RecordingReporter {
        fn section(&self, _: &str) {}
        fn progress(&self, _: &str, _: u8) {}
        fn info(&self, _: &str) {}
        fn success(&self, _: &str) {}
        fn warning(&self, _: &str) {}
        fn error(&self, msg: &str) {
            self.errors.lock().unwrap().push(msg.to_string());
        }
    }

    #[test]
    fn test_corrupt_archive_reports_error() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("home");
        let archive = tmp.path().join("broken.tar.gz");
        fs::write(&archive, "this is not gzip").unwrap();
        let reporter = Arc::new(RecordingReporter::default());
        let ctx = Context::new(Layout::new(&home), reporter.clone()).without_desktop_refresh();

        assert!(install(&ctx, &InstallRequest::new(&archive)).is_err());
        let errors = reporter.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Extraction failed"));
        assert!(!home.join("Applications").exists());
    }

    #[test]
    fn test_app_id_is_stable_and_prefixed() {
        let a = app_id_for(Path::new("/downloads/tool-1.0.tar.gz"));
        let b = app_id_for(Path::new("/downloads/tool-1.0.tar.gz"));
        let c = app_id_for(Path::new("/downloads/tool-1.1.tar.gz"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with(APP_ID_PREFIX));
        assert_eq!(a.len(), APP_ID_PREFIX.len() + 12);
    }

    #[test]
    fn test_icon_size_dir() {
        assert_eq!(icon_size_dir(Path::new("/p/icons/48x48/apps/foo.png")), "48x48");
        assert_eq!(icon_size_dir(Path::new("/p/foo-256256.png")), "256x256");
        assert_eq!(icon_size_dir(Path::new("/p/foo.png")), "scalable");
        assert_eq!(icon_size_dir(Path::new("/p/48x48/foo.svg")), "scalable");
    }

    #[test]
    fn test_launcher_script() {
        let script = launcher_script(Path::new("/home/u/Applications/tool"), Path::new("bin/tool"));
        assert_eq!(
            script,
            "#!/bin/bash\ncd \"/home/u/Applications/tool\"\nexec \"./bin/tool\" \"$@\"\n"
        );
    }
}
