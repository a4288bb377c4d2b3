//! Asset archive creation and executable merging.
//!
//! LÖVE Potion looks for its game archive appended to its own executable, so
//! the final artifact is simply `executable ++ zip`. Nothing here needs to
//! know how the runtime finds the archive.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    fs::File,
    io::{self, BufWriter},
    path::Path,
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Writes every file under `dir` into a new zip at `archive`.
///
/// Entry names are relative to `dir` and always use `/` separators. Entry
/// order follows the directory walk and is not guaranteed.
pub async fn zip_directory(dir: &Path, archive: &Path) -> Result<()> {
    let dir = dir.to_path_buf();
    let archive = archive.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let file = File::create(&archive).fs_context("creating archive", &archive)?;
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in walkdir::WalkDir::new(&dir).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() || entry.path() == archive {
                continue;
            }

            let name = entry_name(entry.path().strip_prefix(&dir)?);
            zip.start_file(name, options)?;

            let mut source = File::open(entry.path()).fs_context("opening", entry.path())?;
            io::copy(&mut source, &mut zip).fs_context("archiving", entry.path())?;
        }

        zip.finish()?;
        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Archive task panicked: {}", e)))?
}

/// `a/b/c.t3x` regardless of the host separator.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Writes `binary` immediately followed by `archive` to `output`.
///
/// `output` may be the same path as `binary`; both inputs are read fully
/// before anything is written.
pub async fn merge_files(binary: &Path, archive: &Path, output: &Path) -> Result<()> {
    let mut merged = tokio::fs::read(binary)
        .await
        .fs_context("reading executable", binary)?;
    let archive_data = tokio::fs::read(archive)
        .await
        .fs_context("reading archive", archive)?;

    merged.extend_from_slice(&archive_data);

    tokio::fs::write(output, &merged)
        .await
        .fs_context("writing merged executable", output)?;

    log::debug!(
        "Merged {} + {} into {} ({} bytes)",
        binary.display(),
        archive.display(),
        output.display(),
        merged.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[tokio::test]
    async fn zip_entries_are_relative_to_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("game");
        std::fs::create_dir_all(dir.join("assets/fonts")).unwrap();
        std::fs::write(dir.join("main.lua"), "love.draw = nil").unwrap();
        std::fs::write(dir.join("assets/fonts/vera.bcfnt"), [7u8; 16]).unwrap();
        let archive = tmp.path().join("game-bundle.zip");

        zip_directory(&dir, &archive).await.unwrap();

        let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let mut names: Vec<_> = zip.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, ["assets/fonts/vera.bcfnt", "main.lua"]);

        let mut contents = String::new();
        zip.by_name("main.lua")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "love.draw = nil");
    }

    #[tokio::test]
    async fn merged_output_splits_back_into_inputs() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = tmp.path().join("SuperGame.3dsx");
        let archive = tmp.path().join("SuperGame-bundle.zip");
        let binary_bytes: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let archive_bytes = b"PK\x03\x04 archive payload".to_vec();
        std::fs::write(&binary, &binary_bytes).unwrap();
        std::fs::write(&archive, &archive_bytes).unwrap();

        merge_files(&binary, &archive, &binary).await.unwrap();

        let merged = std::fs::read(&binary).unwrap();
        let (head, tail) = merged.split_at(binary_bytes.len());
        assert_eq!(head, binary_bytes.as_slice());
        assert_eq!(tail, archive_bytes.as_slice());
    }

    #[tokio::test]
    async fn merge_reports_missing_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = tmp.path().join("game.nro");
        std::fs::write(&binary, b"NRO").unwrap();

        let err = merge_files(&binary, &tmp.path().join("missing.zip"), &binary)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fs { context: "reading archive", .. }));
        assert_eq!(std::fs::read(&binary).unwrap(), b"NRO");
    }
}
