//! Sample dataset retrieval: stream an archive to disk, unpack it, clean up

use crate::io::configuration::{DOWNLOAD_BLOCK_SIZE, TEMP_ARCHIVE_NAME};
use crate::io::error::{DatasetError, Result, file_system};
use log::info;
use reqwest::blocking::Response;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use zip::ZipArchive;

/// Download the archive at `url` and unpack it into `target_dir`
///
/// The body is written to `temp.zip` inside `target_dir`, `on_progress` is
/// called with the cumulative and total byte counts once before the first
/// block and after every block, and the archive is deleted after extraction.
/// Failures are not retried; an interrupted download leaves the temporary
/// archive behind.
///
/// # Errors
///
/// Returns an error if the request fails or returns a non-success status, the
/// body can't be written, or the archive can't be extracted or removed
pub fn download_sample_data<F>(
    target_dir: impl AsRef<Path>,
    url: &str,
    mut on_progress: F,
) -> Result<()>
where
    F: FnMut(u64, Option<u64>),
{
    let target_dir = target_dir.as_ref();
    let archive = target_dir.join(TEMP_ARCHIVE_NAME);

    info!("Downloading {url} to {}", archive.display());
    let response = reqwest::blocking::get(url)
        .and_then(Response::error_for_status)
        .map_err(|source| DatasetError::Download {
            url: url.to_string(),
            source,
        })?;
    let total = response.content_length();

    let written = stream_to_file(response, total, &archive, &mut on_progress)?;
    info!("Downloaded {written} bytes");

    unpack_archive(&archive, target_dir)?;
    fs::remove_file(&archive).map_err(file_system(&archive, "remove temporary archive"))?;

    Ok(())
}

/// Copy `reader` into a new file at `destination` block by block
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns an error if reading the source or writing the file fails
pub fn stream_to_file<R, F>(
    mut reader: R,
    total: Option<u64>,
    destination: &Path,
    on_progress: &mut F,
) -> Result<u64>
where
    R: Read,
    F: FnMut(u64, Option<u64>),
{
    let mut file = File::create(destination).map_err(file_system(destination, "create file"))?;
    let mut buffer = vec![0u8; DOWNLOAD_BLOCK_SIZE];
    let mut downloaded = 0u64;

    on_progress(downloaded, total);
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(file_system(destination, "read download stream")(e)),
        };
        if let Some(block) = buffer.get(..read) {
            file.write_all(block).map_err(file_system(destination, "write download block"))?;
        }
        downloaded += read as u64;
        on_progress(downloaded, total);
    }

    file.flush().map_err(file_system(destination, "flush download"))?;
    Ok(downloaded)
}

/// Extract a zip archive into `target_dir`
///
/// # Errors
///
/// Returns an error if the archive can't be opened, is corrupt, or an entry
/// can't be written
pub fn unpack_archive(archive: &Path, target_dir: &Path) -> Result<()> {
    let archive_error = |source: zip::result::ZipError| DatasetError::Archive {
        path: archive.to_path_buf(),
        source,
    };

    let file = File::open(archive).map_err(file_system(archive, "open archive"))?;
    let mut zip = ZipArchive::new(file).map_err(archive_error)?;
    info!(
        "Extracting {} entries into {}",
        zip.len(),
        target_dir.display()
    );
    zip.extract(target_dir).map_err(archive_error)?;

    Ok(())
}
