//! Paths named inside a character definition file.
//!
//! Definition files name their sprite file and color tables relative to their own folder,
//! with either slash.
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

/// Folder holding the definition file.
pub fn def_dir(def_path: &Path) -> &Path {
    def_path.parent().unwrap_or(Path::new(""))
}

/// Resolves `relative` against the folder of the definition file at `def_path`.
pub fn resolve(def_path: impl AsRef<Path>, relative: &str) -> PathBuf {
    let relative = relative.trim();

    if Path::new(relative).is_absolute() {
        return PathBuf::from(relative);
    }

    relative
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .fold(def_dir(def_path.as_ref()).to_path_buf(), |path, part| {
            path.join(part)
        })
}

/// Every `.act` file below the definition's folder.
pub fn find_act_files(def_path: impl AsRef<Path>) -> Vec<String> {
    find_palette_files(def_path, "act")
}

/// Every file with `extension` below the definition's folder, as sorted slash-separated
/// paths relative to that folder.
pub fn find_palette_files(def_path: impl AsRef<Path>, extension: &str) -> Vec<String> {
    let root = def_dir(def_path.as_ref());

    let mut res: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(to_slash_path))
        .collect();

    res.sort();
    res
}

fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
