use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Returns the home directory every layout path hangs off, or None if it cannot be resolved.
///
/// `TBI_HOME` overrides the real home directory.
pub fn try_tbi_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("TBI_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir()
}

/// User-level install locations, all relative to one home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    home: PathBuf,
}

impl Layout {
    /// Layout rooted at `home`.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Layout rooted at [`try_tbi_home`].
    pub fn from_env() -> Option<Self> {
        try_tbi_home().map(Self::new)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Launcher scripts: ~/.local/bin
    pub fn local_bin(&self) -> PathBuf {
        self.home.join(".local").join("bin")
    }

    /// Desktop entries: ~/.local/share/applications
    pub fn applications_dir(&self) -> PathBuf {
        self.home.join(".local").join("share").join("applications")
    }

    /// Icon theme root: ~/.local/share/icons
    pub fn icons_dir(&self) -> PathBuf {
        self.home.join(".local").join("share").join("icons")
    }

    /// Copied package trees: ~/Applications
    pub fn apps_root(&self) -> PathBuf {
        self.home.join("Applications")
    }

    /// Legacy personal bin: ~/bin
    pub fn user_bin(&self) -> PathBuf {
        self.home.join("bin")
    }

    /// Tool data: ~/.local/share/tarball-installer
    pub fn data_dir(&self) -> PathBuf {
        self.home.join(".local").join("share").join("tarball-installer")
    }

    /// Registry file: ~/.local/share/tarball-installer/installations.json
    pub fn registry_path(&self) -> PathBuf {
        self.data_dir().join("installations.json")
    }

    /// Directories searched for markers by a reconciliation scan.
    pub fn scan_roots(&self) -> Vec<PathBuf> {
        vec![
            self.local_bin(),
            self.applications_dir(),
            self.icons_dir(),
            self.apps_root(),
            self.user_bin(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = Layout::new("/home/u");
        assert_eq!(layout.local_bin(), PathBuf::from("/home/u/.local/bin"));
        assert_eq!(
            layout.registry_path(),
            PathBuf::from("/home/u/.local/share/tarball-installer/installations.json")
        );
        assert_eq!(layout.scan_roots().len(), 5);
        assert!(layout.scan_roots().contains(&PathBuf::from("/home/u/Applications")));
    }
}
