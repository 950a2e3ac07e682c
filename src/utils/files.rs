//! Filesystem helpers for the document lifecycle
//!
//! This module covers the plumbing around a build:
//! - making sure the output directory exists
//! - deriving the sibling `.tex` / `.pdf` names from the output path
//! - resolving figure paths to absolute form
//! - removing compiler byproducts that share the buffer's base name

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::error::{DocumentError, DocumentResult};

/// Sibling artifact paths derived from a document's output path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Directory that receives the kept source and the final PDF
    pub output_dir: PathBuf,
    /// Where the generated source is copied when it is kept
    pub source: PathBuf,
    /// Where the compiled PDF is copied
    pub pdf: PathBuf,
}

impl ArtifactPaths {
    /// Derive `<stem>.tex` and `<stem>.pdf` next to `output`.
    ///
    /// Only the last extension is replaced, so `report.v2.pdf` maps to
    /// `report.v2.tex`. A path without an extension gains one.
    pub fn for_output(output: &Path) -> Self {
        let output_dir = output_dir_of(output);
        let stem = output
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| "document".into());
        let sibling = |extension: &str| {
            let mut name = stem.clone();
            name.push(".");
            name.push(extension);
            output_dir.join(name)
        };
        Self {
            source: sibling("tex"),
            pdf: sibling("pdf"),
            output_dir,
        }
    }
}

/// Directory part of an output path, `.` when the path is bare
pub fn output_dir_of(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Ensure `dir` exists, attempting a single creation when it does not.
pub fn ensure_output_dir(dir: &Path) -> DocumentResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    log::info!("Output directory {} not found, creating it", dir.display());
    fs::create_dir(dir).map_err(|source| DocumentError::OutputDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

/// Resolve `path` against the current directory without touching the disk.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Files in `dir` named `<stem>.<anything>`
pub fn find_byproducts(dir: &Path, stem: &str) -> io::Result<Vec<PathBuf>> {
    let prefix = format!("{}.", stem);
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let matches = name
            .to_str()
            .map(|n| n.starts_with(&prefix))
            .unwrap_or(false);
        if matches && entry.file_type()?.is_file() {
            found.push(entry.path());
        }
    }
    found.sort();
    Ok(found)
}

/// Remove every byproduct of `stem` in `dir`.
///
/// Returns the removed paths and the failures, so the caller can keep
/// going after a file that refuses to go away.
pub fn remove_byproducts(dir: &Path, stem: &str) -> (Vec<PathBuf>, Vec<(PathBuf, io::Error)>) {
    let candidates = match find_byproducts(dir, stem) {
        Ok(c) => c,
        Err(e) => return (Vec::new(), vec![(dir.to_path_buf(), e)]),
    };

    let mut removed = Vec::new();
    let mut failed = Vec::new();
    for path in candidates {
        log::debug!("Cleaning up {}", path.display());
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(e) => failed.push((path, e)),
        }
    }
    (removed, failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_artifact_paths_replace_extension() {
        let paths = ArtifactPaths::for_output(Path::new("out/report.pdf"));
        assert_eq!(paths.output_dir, PathBuf::from("out"));
        assert_eq!(paths.source, PathBuf::from("out/report.tex"));
        assert_eq!(paths.pdf, PathBuf::from("out/report.pdf"));
    }

    #[test]
    fn test_artifact_paths_multiple_dots() {
        let paths = ArtifactPaths::for_output(Path::new("out/report.v2.pdf"));
        assert_eq!(paths.source, PathBuf::from("out/report.v2.tex"));
        assert_eq!(paths.pdf, PathBuf::from("out/report.v2.pdf"));

        // Versioned outputs in one directory must not share artifacts
        let v1 = ArtifactPaths::for_output(Path::new("out/report.v1.pdf"));
        assert_ne!(v1.source, paths.source);
        assert_ne!(v1.pdf, paths.pdf);
    }

    #[test]
    fn test_artifact_paths_dotted_directory() {
        let paths = ArtifactPaths::for_output(Path::new("runs.2024/summary"));
        assert_eq!(paths.source, PathBuf::from("runs.2024/summary.tex"));
        assert_eq!(paths.pdf, PathBuf::from("runs.2024/summary.pdf"));
    }

    #[test]
    fn test_artifact_paths_bare_name() {
        let paths = ArtifactPaths::for_output(Path::new("summary"));
        assert_eq!(paths.output_dir, PathBuf::from("."));
        assert_eq!(paths.pdf, PathBuf::from("./summary.pdf"));
    }

    #[test]
    fn test_ensure_output_dir_creates_once() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("reports");
        ensure_output_dir(&target).unwrap();
        assert!(target.is_dir());
        // Second call is a no-op
        ensure_output_dir(&target).unwrap();
    }

    #[test]
    fn test_ensure_output_dir_nested_fails() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a").join("b");
        let err = ensure_output_dir(&target).unwrap_err();
        assert!(matches!(err, DocumentError::OutputDirectory { .. }));
    }

    #[test]
    fn test_remove_byproducts_only_matching_stem() {
        let dir = tempdir().unwrap();
        for name in ["tmpab12.aux", "tmpab12.log", "tmpab12.pdf", "tmpab123.log", "other.aux"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        let (removed, failed) = remove_byproducts(dir.path(), "tmpab12");
        assert_eq!(removed.len(), 3);
        assert!(failed.is_empty());
        assert!(dir.path().join("tmpab123.log").exists());
        assert!(dir.path().join("other.aux").exists());
    }

    #[test]
    fn test_absolutize_relative() {
        let abs = absolutize(Path::new("figure.png")).unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("figure.png"));
    }
}
