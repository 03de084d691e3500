use std::{fs, io, path::Path, time::SystemTime};

use askama::Template;
use chrono::{DateTime, Local};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Static directory unavailable: {0}")]
    DirectoryUnavailable(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

struct FileEntry {
    name: String,
    size: u64,
    created: String,
}

#[derive(Template)]
#[template(path = "files.html")]
struct FilesTemplate {
    entries: Vec<FileEntry>,
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(TIMESTAMP_FORMAT).to_string()
}

/// Enumerates `dir` and renders the listing page. The directory is read
/// fresh on every call so the page always reflects current state.
pub fn render_listing(dir: &Path) -> Result<String> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        // Not every filesystem records a birth time.
        let created = metadata.created().or_else(|_| metadata.modified())?;

        entries.push(FileEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            size: metadata.len(),
            created: format_timestamp(created),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(FilesTemplate { entries }.render().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_files_with_sizes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.bmp"), vec![0u8; 64]).unwrap();
        fs::write(dir.path().join("b.bmp"), vec![0u8; 128]).unwrap();

        let page = render_listing(dir.path()).unwrap();

        assert!(page.contains("a.bmp"));
        assert!(page.contains("b.bmp"));
        assert!(page.contains("64"));
        assert!(page.contains("128"));
    }

    #[test]
    fn test_listing_is_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("z.bmp"), b"z").unwrap();
        fs::write(dir.path().join("a.bmp"), b"a").unwrap();

        let page = render_listing(dir.path()).unwrap();

        assert!(page.find("a.bmp").unwrap() < page.find("z.bmp").unwrap());
    }

    #[test]
    fn test_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("a.bmp"), b"a").unwrap();

        let page = render_listing(dir.path()).unwrap();

        assert!(page.contains("a.bmp"));
        assert!(!page.contains("nested"));
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        assert!(matches!(
            render_listing(Path::new("/nonexistent/static-dir")),
            Err(Error::DirectoryUnavailable(_))
        ));
    }
}
