//! Main-binary scoring.
//!
//! Each candidate is reduced to a [`BinaryTraits`] flag set and scored by a
//! pure function, so the weights live in one place.

use std::cmp::Reverse;
use std::path::{Component, Path, PathBuf};

/// Candidate sits under a directory named `bin`.
pub const BIN_DIR_WEIGHT: i32 = 10;
/// Candidate basename has no extension (typical for native executables).
pub const NO_EXTENSION_WEIGHT: i32 = 8;
/// Candidate is a `.sh`, `.py` or `.pl` script.
pub const SCRIPT_EXT_WEIGHT: i32 = 3;
/// Candidate name contains a common launcher word.
pub const COMMON_NAME_WEIGHT: i32 = 5;
/// Candidate looks like an uninstaller.
pub const UNINSTALL_PENALTY: i32 = -3;

const SCRIPT_EXTENSIONS: [&str; 3] = [".sh", ".py", ".pl"];
const COMMON_NAMES: [&str; 5] = ["app", "main", "run", "start", "launch"];
const UNINSTALL_NAMES: [&str; 2] = ["uninstall", "remove"];

/// The facts about a candidate that feed its score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryTraits {
    pub in_bin_dir: bool,
    pub has_no_extension: bool,
    pub is_script_ext: bool,
    pub name_matches_common_pattern: bool,
    pub name_matches_uninstall_pattern: bool,
}

impl BinaryTraits {
    /// Derive traits from a candidate path.
    pub fn of(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let lower = name.to_lowercase();

        let in_bin_dir = path.parent().is_some_and(|parent| {
            parent.components().any(|c| match c {
                Component::Normal(part) => part.eq_ignore_ascii_case("bin"),
                _ => false,
            })
        });
        let has_no_extension = !name.contains('.');

        Self {
            in_bin_dir,
            has_no_extension,
            is_script_ext: !has_no_extension && SCRIPT_EXTENSIONS.iter().any(|e| name.ends_with(e)),
            name_matches_common_pattern: COMMON_NAMES.iter().any(|n| lower.contains(n)),
            name_matches_uninstall_pattern: UNINSTALL_NAMES.iter().any(|n| lower.contains(n)),
        }
    }

    /// Weighted sum of the traits.
    pub fn score(&self) -> i32 {
        let mut score = 0;
        if self.in_bin_dir {
            score += BIN_DIR_WEIGHT;
        }
        if self.has_no_extension {
            score += NO_EXTENSION_WEIGHT;
        } else if self.is_script_ext {
            score += SCRIPT_EXT_WEIGHT;
        }
        if self.name_matches_common_pattern {
            score += COMMON_NAME_WEIGHT;
        }
        if self.name_matches_uninstall_pattern {
            score += UNINSTALL_PENALTY;
        }
        score
    }
}

/// A scored executable, only alive during selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateBinary {
    pub path: PathBuf,
    pub score: i32,
}

/// Score every candidate and sort best-first.
///
/// The sort is stable, so ties keep discovery order.
pub fn rank(binaries: &[PathBuf]) -> Vec<CandidateBinary> {
    let mut ranked: Vec<CandidateBinary> = binaries
        .iter()
        .map(|path| CandidateBinary {
            score: BinaryTraits::of(path).score(),
            path: path.clone(),
        })
        .collect();
    ranked.sort_by_key(|c| Reverse(c.score));
    ranked
}
