use crate::load::load_json;
use crate::schema::{CatalogIndex, EntityMeta};
use anyhow::{bail, Context};
use cinder_core::{CatalogSource, Entity, LoadError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const META_FILE: &str = "meta.json";
pub const INDEX_FILE: &str = "catalog.json";
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug)]
pub struct CatalogReport {
    pub entities: Vec<Entity>,
    pub warnings: Vec<String>,
}

/// Loads entities from `<root>/<folder>/meta.json` plus the image files
/// next to it. A broken folder is skipped with a warning; only an
/// unreadable root fails the whole load.
#[derive(Debug, Clone)]
pub struct FileSystemCatalog {
    root: PathBuf,
}

impl FileSystemCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn load_all(&self) -> anyhow::Result<CatalogReport> {
        if !self.root.is_dir() {
            bail!("catalog root {} is not a directory", self.root.display());
        }
        let mut entities = Vec::new();
        let mut warnings = Vec::new();
        for folder in self.folders()? {
            let dir = self.root.join(&folder);
            if !dir.is_dir() {
                warnings.push(format!("missing entity folder {}", dir.display()));
                continue;
            }
            if !dir.join(META_FILE).is_file() {
                warnings.push(format!("no {META_FILE} in {}", dir.display()));
                continue;
            }
            match load_entity(&dir, &folder, &mut warnings) {
                Ok(entity) => entities.push(entity),
                Err(err) => warnings.push(format!("{err:#}")),
            }
        }
        for warning in &warnings {
            warn!(root = %self.root.display(), "{warning}");
        }
        info!(
            root = %self.root.display(),
            entities = entities.len(),
            warnings = warnings.len(),
            "catalog scanned"
        );
        Ok(CatalogReport { entities, warnings })
    }

    fn folders(&self) -> anyhow::Result<Vec<String>> {
        let index_path = self.root.join(INDEX_FILE);
        if index_path.is_file() {
            let index: CatalogIndex = load_json(&index_path)?;
            return Ok(index.folders());
        }
        let mut folders = Vec::new();
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("read catalog root {}", self.root.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("read {}", self.root.display()))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                folders.push(name.to_string());
            }
        }
        folders.sort();
        Ok(folders)
    }
}

impl CatalogSource for FileSystemCatalog {
    fn load_catalog(&self) -> Result<Vec<Entity>, LoadError> {
        self.load_all()
            .map(|report| report.entities)
            .map_err(|err| classify_error(&err))
    }
}

fn classify_error(err: &anyhow::Error) -> LoadError {
    let message = format!("{err:#}");
    if err.chain().any(|cause| cause.is::<serde_json::Error>()) {
        LoadError::Parse(message)
    } else if err.chain().any(|cause| cause.is::<std::io::Error>()) {
        LoadError::Io(message)
    } else {
        LoadError::Message(message)
    }
}

fn load_entity(dir: &Path, folder: &str, warnings: &mut Vec<String>) -> anyhow::Result<Entity> {
    let mut meta: EntityMeta = load_json(dir.join(META_FILE))?;
    let images = match meta.images.take() {
        Some(listed) => listed_images(dir, &listed, warnings),
        None => scan_images(dir)?,
    };
    if images.is_empty() {
        warnings.push(format!("no images for {}", dir.display()));
    }
    Ok(meta.into_entity(folder, images))
}

fn listed_images(dir: &Path, listed: &[String], warnings: &mut Vec<String>) -> Vec<String> {
    let mut images = Vec::with_capacity(listed.len());
    for name in listed {
        let path = dir.join(name);
        if path.is_file() {
            images.push(path.to_string_lossy().into_owned());
        } else {
            warnings.push(format!("image not found: {}", path.display()));
        }
    }
    images
}

fn scan_images(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry
            .with_context(|| format!("read {}", dir.display()))?
            .path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths
        .into_iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! image_case {
        ($name:ident, $file:expr, $expected:expr) => {
            #[test]
            fn $name() {
                assert_eq!(is_image(Path::new($file)), $expected);
            }
        };
    }

    image_case!(image_jpg, "IMG_0040.JPG", true);
    image_case!(image_jpeg, "IMG_0011.JPEG", true);
    image_case!(image_png, "a.png", true);
    image_case!(image_webp, "a.webp", true);
    image_case!(image_json, "meta.json", false);
    image_case!(image_no_ext, "README", false);

    #[test]
    fn io_failures_keep_their_kind_and_context() {
        let err = anyhow::Error::new(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ))
        .context("read catalog root /cats");
        match classify_error(&err) {
            LoadError::Io(message) => {
                assert!(message.contains("read catalog root /cats"));
                assert!(message.contains("denied"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn plain_failures_stay_messages() {
        let err = anyhow::anyhow!("catalog root /cats is not a directory");
        assert!(matches!(classify_error(&err), LoadError::Message(_)));
    }
}
