//! Manifest acquisition: copy or download the manifest into a user's home.
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use crate::config::manifest::Manifest;
use crate::error::ManifestError;
use crate::logging::Log;

/// Where a resource URL points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source<'a> {
    /// A file on this machine (`file://` URL or plain path).
    Local(&'a Path),
    /// An `http://` or `https://` URL.
    Http(&'a str),
}

/// Classify a resource URL.
///
/// For `file://host/path` the host is kept as the first path component.
///
/// # Errors
///
/// Returns [`ManifestError::UnsupportedUrl`] for any other scheme.
pub fn parse_source(url: &str) -> Result<Source<'_>, ManifestError> {
    if let Some(rest) = url.strip_prefix("file://") {
        return Ok(Source::Local(Path::new(rest)));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(Source::Http(url));
    }
    if url.contains("://") {
        return Err(ManifestError::UnsupportedUrl(url.to_string()));
    }
    Ok(Source::Local(Path::new(url)))
}

/// A manifest fetched into a user's home.
///
/// The parsed manifest comes from the fetched bytes, never from the file on
/// disk. The file is removed when this value is dropped.
#[derive(Debug)]
pub struct DownloadedManifest {
    path: PathBuf,
    manifest: Manifest,
}

impl DownloadedManifest {
    /// Location of the downloaded file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The manifest parsed from the fetched content.
    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

impl Drop for DownloadedManifest {
    fn drop(&mut self) {
        // Already gone is fine; anything else is left for the next run to replace.
        fs::remove_file(&self.path).ok();
    }
}

/// Fetch `url`, store a copy at `dest` and parse it.
///
/// Whatever already sits at `dest` (a stale download, or a symlink planted
/// by the home's owner) is unlinked first, and the copy is written to a
/// freshly created file that is never followed through a link. The copy is
/// removed again if parsing fails.
///
/// # Errors
///
/// Returns an error if the URL is unsupported, the source cannot be read,
/// the HTTP request fails (including non-success statuses), `dest` cannot be
/// written or the content is not a valid manifest.
pub fn download(url: &str, dest: &Path, log: &dyn Log) -> Result<DownloadedManifest, ManifestError> {
    log.info(&format!("downloading manifest from {url}"));

    let bytes = match parse_source(url)? {
        Source::Local(src) => {
            log.debug(&format!(
                "copying {} to {}",
                src.display(),
                dest.display()
            ));
            fs::read(src).map_err(io_err(src))?
        }
        Source::Http(url) => {
            let download_err = |source: ureq::Error| ManifestError::Download {
                url: url.to_string(),
                source: Box::new(source),
            };
            let mut response = ureq::get(url).call().map_err(download_err)?;
            response.body_mut().read_to_vec().map_err(download_err)?
        }
    };

    let path = write_fresh(dest, &bytes)?;
    match serde_json::from_slice(&bytes) {
        Ok(manifest) => Ok(DownloadedManifest { path, manifest }),
        Err(source) => {
            fs::remove_file(&path).ok();
            Err(ManifestError::Parse { path, source })
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> ManifestError + use<> {
    let path = path.to_path_buf();
    move |source| ManifestError::Io { path, source }
}

/// Replace whatever is at `dest` with a new regular file holding `bytes`.
///
/// Returns the path once the new file exists, so the caller owns its removal.
fn write_fresh(dest: &Path, bytes: &[u8]) -> Result<PathBuf, ManifestError> {
    match fs::symlink_metadata(dest) {
        Ok(meta) if meta.is_dir() => {
            return Err(ManifestError::Io {
                path: dest.to_path_buf(),
                source: io::Error::new(io::ErrorKind::IsADirectory, "destination is a directory"),
            });
        }
        // Unlinks a symlink itself, never its target.
        Ok(_) => fs::remove_file(dest).map_err(io_err(dest))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(dest)(e)),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt as _;
        options.custom_flags(nix::libc::O_NOFOLLOW);
    }
    let mut file = options.open(dest).map_err(io_err(dest))?;
    let written = file.write_all(bytes).map_err(io_err(dest));
    if let Err(e) = written {
        fs::remove_file(dest).ok();
        return Err(e);
    }
    Ok(dest.to_path_buf())
}
