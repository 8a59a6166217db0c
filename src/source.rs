//! The two boundary contracts: where raw per-category documents come from
//! and where the finished document goes.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::model::GameData;
use crate::raw::value_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    Weapons,
    Equipment,
    Modifications,
    Materials,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Weapons,
        SourceKind::Equipment,
        SourceKind::Modifications,
        SourceKind::Materials,
    ];

    /// File name the scrapers write.
    pub fn file_name(&self) -> &'static str {
        match self {
            SourceKind::Weapons => "weapons_data.json",
            SourceKind::Equipment => "equipment_data.json",
            SourceKind::Modifications => "modifications_data.json",
            SourceKind::Materials => "materials_data.json",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::Weapons => "weapons",
            SourceKind::Equipment => "equipment",
            SourceKind::Modifications => "modifications",
            SourceKind::Materials => "materials",
        };
        f.write_str(s)
    }
}

/// Image paths by category, then by item id. A `null` path means the image
/// scraper found nothing for that item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageLookup {
    paths: BTreeMap<String, BTreeMap<String, Option<String>>>,
}

impl ImageLookup {
    pub fn from_value(value: Value) -> Self {
        let Value::Object(categories) = value else {
            warn!("image lookup is not an object, ignoring it");
            return Self::default();
        };
        let paths = categories
            .into_iter()
            .filter_map(|(category, ids)| match ids {
                Value::Object(ids) => {
                    let ids = ids
                        .into_iter()
                        .map(|(id, path)| (id, value_text(&path)))
                        .collect();
                    Some((category, ids))
                }
                _ => None,
            })
            .collect();
        ImageLookup { paths }
    }

    pub fn insert(&mut self, category: &str, id: &str, path: Option<&str>) {
        self.paths
            .entry(category.to_string())
            .or_default()
            .insert(id.to_string(), path.map(str::to_string));
    }

    /// Missing category, missing id and a `null` entry all read as no image.
    pub fn get(&self, category: &str, id: &str) -> Option<String> {
        self.paths
            .get(category)
            .and_then(|ids| ids.get(id))
            .cloned()
            .flatten()
    }
}

/// Supplies the raw per-category documents.
pub trait SourceProvider {
    /// A required document. Failing to obtain it aborts the run.
    fn load(&self, kind: SourceKind) -> Result<Value>;

    /// The optional image lookup; absence is not an error.
    fn images(&self) -> Result<ImageLookup>;
}

/// Accepts the finished document for durable storage.
pub trait DocumentSink {
    fn store(&self, data: &GameData) -> Result<()>;
}

/// Reads the scrapers' JSON files from one directory.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub const IMAGES_FILE: &'static str = "images.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonDirSource { dir: dir.into() }
    }

    fn read(&self, kind: SourceKind) -> Result<(PathBuf, String)> {
        let path = self.dir.join(kind.file_name());
        match fs::read_to_string(&path) {
            Ok(s) => Ok((path, s)),
            Err(source) => Err(Error::MissingSource { kind, path, source }),
        }
    }
}

impl SourceProvider for JsonDirSource {
    fn load(&self, kind: SourceKind) -> Result<Value> {
        let (path, text) = self.read(kind)?;
        serde_json::from_str(&text).map_err(|source| Error::UnreadableSource { kind, path, source })
    }

    fn images(&self) -> Result<ImageLookup> {
        let path = self.dir.join(Self::IMAGES_FILE);
        let text = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no image lookup, items get no images");
                return Ok(ImageLookup::default());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "image lookup unreadable, ignoring it");
                return Ok(ImageLookup::default());
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Ok(ImageLookup::from_value(value)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "image lookup is not JSON, ignoring it");
                Ok(ImageLookup::default())
            }
        }
    }
}

/// Documents already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub documents: BTreeMap<SourceKind, Value>,
    pub images: ImageLookup,
}

impl SourceProvider for MemorySource {
    fn load(&self, kind: SourceKind) -> Result<Value> {
        self.documents
            .get(&kind)
            .cloned()
            .ok_or_else(|| Error::MissingSource {
                kind,
                path: PathBuf::from(kind.file_name()),
                source: std::io::Error::new(ErrorKind::NotFound, "not supplied"),
            })
    }

    fn images(&self) -> Result<ImageLookup> {
        Ok(self.images.clone())
    }
}

/// Writes pretty JSON next to the target and renames it into place, so an
/// aborted run never leaves a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSink { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSink for JsonFileSink {
    fn store(&self, data: &GameData) -> Result<()> {
        let store_err = |source| Error::Store {
            path: self.path.clone(),
            source,
        };

        let mut json = serde_json::to_string_pretty(data)
            .map_err(|e| store_err(std::io::Error::new(ErrorKind::InvalidData, e)))?;
        json.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(store_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(store_err)?;
        fs::rename(&tmp, &self.path).map_err(store_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn image_lookup_absent_entries() {
        let lookup = ImageLookup::from_value(json!({
            "weapons": {"kettle": "images/weapons/kettle.png", "ferro": null},
            "broken": 4,
        }));
        assert_eq!(lookup.get("weapons", "kettle").as_deref(), Some("images/weapons/kettle.png"));
        assert_eq!(lookup.get("weapons", "ferro"), None);
        assert_eq!(lookup.get("weapons", "anvil"), None);
        assert_eq!(lookup.get("broken", "x"), None);
        assert_eq!(lookup.get("shields", "x"), None);
    }

    #[test]
    fn dir_source_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonDirSource::new(dir.path()).load(SourceKind::Weapons).unwrap_err();
        assert!(matches!(err, Error::MissingSource { kind: SourceKind::Weapons, .. }));
    }

    #[test]
    fn dir_source_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("materials_data.json"), "{ nope").unwrap();
        let err = JsonDirSource::new(dir.path()).load(SourceKind::Materials).unwrap_err();
        assert!(matches!(err, Error::UnreadableSource { .. }));
    }

    #[test]
    fn dir_source_images_optional() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonDirSource::new(dir.path());
        assert_eq!(source.images().unwrap(), ImageLookup::default());

        fs::write(dir.path().join("images.json"), "not json").unwrap();
        assert_eq!(source.images().unwrap(), ImageLookup::default());
    }
}
