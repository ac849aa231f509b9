// Bundles generated tickets into a single zip for download.

use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;

pub fn default_archive_name() -> String {
    format!("hall_tickets_{}.zip", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Writes each file under its bare name, in order. Returns the entry count.
pub fn write_archive(files: &[PathBuf], zip_path: &Path) -> Result<usize, ArchiveError> {
    let mut writer = ZipWriter::new(BufWriter::new(File::create(zip_path)?));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0;
    for path in files {
        let Some(name) = path.file_name() else {
            continue;
        };
        writer.start_file(name.to_string_lossy(), options)?;
        writer.write_all(&std::fs::read(path)?)?;
        entries += 1;
    }

    writer.finish()?.flush()?;
    info!(entries, path = %zip_path.display(), "archive written");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn archive_holds_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = ["hallticket_A.pdf", "hallticket_B.pdf"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                std::fs::write(&path, name.as_bytes()).unwrap();
                path
            })
            .collect();

        let zip_path = dir.path().join("bundle.zip");
        assert_eq!(write_archive(&files, &zip_path).unwrap(), 2);

        let mut archive = ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        let mut entry = archive.by_index(1).unwrap();
        assert_eq!(entry.name(), "hallticket_B.pdf");
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "hallticket_B.pdf");
    }

    #[test]
    fn default_name_is_timestamped() {
        let name = default_archive_name();
        assert!(name.starts_with("hall_tickets_"));
        assert!(name.ends_with(".zip"));
        assert_eq!(name.len(), "hall_tickets_20250101_120000.zip".len());
    }
}
