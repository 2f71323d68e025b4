use crate::error::{Error, Result};
use crate::value::write_escaped_string;
use crate::{Value, path, statics};
use chrono::NaiveDateTime;
use std::{
    ffi::OsString,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// The header fields shown above the qualities.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveSummary {
    pub player_name: Option<String>,
    pub current_port: Option<String>,
    pub in_game_date: NaiveDateTime,
}

impl SaveSummary {
    fn from_root(root: &Value) -> Result<Self> {
        let raw_date = path::get_str(root, &[statics::SS_IN_GAME_DATE]).ok_or_else(|| {
            Error::MalformedInput(format!("missing {}", statics::SS_IN_GAME_DATE))
        })?;
        let in_game_date = NaiveDateTime::parse_from_str(raw_date, statics::SS_DATE_FORMAT)
            .map_err(|e| {
                Error::MalformedInput(format!(
                    "{} {raw_date:?} is not a timestamp: {e}",
                    statics::SS_IN_GAME_DATE
                ))
            })?;
        Ok(Self {
            player_name: path::get_str(root, &[statics::SS_NAME]).map(str::to_string),
            current_port: path::get_str(root, &[statics::SS_CURRENT_PORT, statics::SS_NAME])
                .map(str::to_string),
            in_game_date,
        })
    }
}

/// A loaded save file, preserving its original bytes so an unmodified save is written back
/// byte-for-byte.
///
/// The possessed-qualities list is handed out once with [`SaveDocument::take_qualities`] and
/// supplied again when generating bytes, so the editor can own and mutate it directly.
#[derive(Debug, Clone)]
pub struct SaveDocument {
    pub source_path: Option<PathBuf>,
    pub original_bytes: Vec<u8>,
    pub has_bom: bool,
    pub dirty: bool,
    root: Value,
    summary: SaveSummary,
}

impl SaveDocument {
    pub fn load_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        Self::from_bytes(bytes, Some(path)).map_err(|e| match e {
            Error::Json(message) => Error::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse a save. Nothing is returned unless the whole header is usable.
    pub fn from_bytes(bytes: Vec<u8>, source_path: Option<&Path>) -> Result<Self> {
        let has_bom = bytes.starts_with(statics::UTF8_BOM);
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| Error::Json(format!("save file is not valid UTF-8: {e}")))?;
        let root = Value::parse(text)?;
        if root.as_object().is_none() {
            return Err(Error::MalformedInput(format!(
                "save must be an object, found {}",
                root.type_name()
            )));
        }
        let summary = SaveSummary::from_root(&root)?;

        Ok(Self {
            source_path: source_path.map(Path::to_path_buf),
            original_bytes: bytes,
            has_bom,
            dirty: false,
            root,
            summary,
        })
    }

    pub fn summary(&self) -> &SaveSummary {
        &self.summary
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Move the possessed-qualities records out, leaving an empty list in their place.
    /// Returns nothing if the save has no such list.
    pub fn take_qualities(&mut self) -> Vec<Value> {
        path::get_array_mut(&mut self.root, &[statics::SS_QUALITIES_POSSESSED])
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Serialize the document with `qualities` standing in for the possessed-qualities list.
    pub fn generate_bytes(&self, qualities: &[Value]) -> Vec<u8> {
        let mut out = String::new();
        let Some(map) = self.root.as_object() else {
            self.root.write_json(&mut out);
            return out.into_bytes();
        };

        let write_qualities = |out: &mut String| {
            out.push('[');
            for (i, v) in qualities.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                v.write_json(out);
            }
            out.push(']');
        };

        out.push('{');
        for (i, (k, v)) in map.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_escaped_string(&mut out, k);
            out.push(':');
            // A null list stays null until something is put in it.
            if k == statics::SS_QUALITIES_POSSESSED && (v.as_array().is_some() || !qualities.is_empty())
            {
                write_qualities(&mut out);
            } else {
                v.write_json(&mut out);
            }
        }
        if !map.contains_key(statics::SS_QUALITIES_POSSESSED) && !qualities.is_empty() {
            if !map.is_empty() {
                out.push(',');
            }
            write_escaped_string(&mut out, statics::SS_QUALITIES_POSSESSED);
            out.push(':');
            write_qualities(&mut out);
        }
        out.push('}');

        let mut bytes = Vec::with_capacity(out.len() + statics::UTF8_BOM.len());
        if self.has_bom {
            bytes.extend_from_slice(statics::UTF8_BOM);
        }
        bytes.extend_from_slice(out.as_bytes());
        bytes
    }

    /// The original bytes while unmodified, otherwise freshly generated ones.
    pub fn save_bytes(&self, qualities: &[Value]) -> Vec<u8> {
        if !self.dirty {
            return self.original_bytes.clone();
        }
        self.generate_bytes(qualities)
    }

    /// Write to `path` (with `.json` appended when it has no extension) and return the path used.
    ///
    /// The new content goes to a temporary file next to the target first. An existing target
    /// is copied to `<target>.bak`, replacing any previous backup, and the temporary file is
    /// then renamed over the target.
    pub fn save_to_path(&mut self, path: &Path, qualities: &[Value]) -> Result<PathBuf> {
        let target = json_target_path(path);
        let bytes = self.save_bytes(qualities);
        write_with_backup(&target, &bytes)?;
        tracing::info!(path = ?target, bytes = bytes.len(), "saved");

        self.source_path = Some(target.clone());
        self.original_bytes = bytes;
        self.dirty = false;
        Ok(target)
    }
}

pub fn json_target_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        return path.to_path_buf();
    }
    path.with_extension(statics::SS_EXT_JSON)
}

pub fn backup_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".");
    name.push(statics::SS_EXT_BACKUP);
    PathBuf::from(name)
}

fn write_with_backup(target: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(tmp.path(), e))?;

    if target.exists() {
        let backup = backup_path(target);
        fs::copy(target, &backup).map_err(|e| Error::io(&backup, e))?;
        tracing::info!(path = ?backup, "kept backup of previous save");
    }

    tmp.persist(target).map_err(|e| Error::io(target, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r#"{"Name":"Cpt","CurrentPort":{"Name":"Fallen London"},"InGameDate":"1863-04-02T10:11:12.130","QualitiesPossessedList":[{"AssociatedQualityId":102027,"Level":3}],"Tail":true}"#;

    #[test]
    fn summary_reads_header_fields() {
        let doc = SaveDocument::from_bytes(MINIMAL.as_bytes().to_vec(), None).unwrap();
        let summary = doc.summary();
        assert_eq!(summary.player_name.as_deref(), Some("Cpt"));
        assert_eq!(summary.current_port.as_deref(), Some("Fallen London"));
        assert_eq!(
            summary.in_game_date.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            "1863-04-02 10:11:12.130"
        );
    }

    #[test]
    fn missing_or_bad_date_is_malformed() {
        let missing = br#"{"Name":"Cpt"}"#.to_vec();
        assert!(matches!(
            SaveDocument::from_bytes(missing, None),
            Err(Error::MalformedInput(_))
        ));
        let bad = br#"{"InGameDate":"yesterday"}"#.to_vec();
        assert!(matches!(
            SaveDocument::from_bytes(bad, None),
            Err(Error::MalformedInput(_))
        ));
        let not_json = b"{ oops".to_vec();
        assert!(matches!(
            SaveDocument::from_bytes(not_json, None),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn taken_qualities_are_written_back_in_place() {
        let mut doc = SaveDocument::from_bytes(MINIMAL.as_bytes().to_vec(), None).unwrap();
        let qualities = doc.take_qualities();
        assert_eq!(qualities.len(), 1);
        let bytes = doc.generate_bytes(&qualities);
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), MINIMAL);
    }

    #[test]
    fn clean_document_returns_original_bytes() {
        let text = "{ \"InGameDate\": \"1863-04-02T10:11:12.130\",\n  \"QualitiesPossessedList\": [] }\n";
        let mut doc = SaveDocument::from_bytes(text.as_bytes().to_vec(), None).unwrap();
        let qualities = doc.take_qualities();
        assert_eq!(doc.save_bytes(&qualities), text.as_bytes());
        doc.mark_dirty();
        assert_ne!(doc.save_bytes(&qualities), text.as_bytes());
    }

    #[test]
    fn byte_order_mark_is_kept() {
        let mut bytes = statics::UTF8_BOM.to_vec();
        bytes.extend_from_slice(br#"{"InGameDate":"1863-04-02T10:11:12.130"}"#);
        let doc = SaveDocument::from_bytes(bytes.clone(), None).unwrap();
        assert!(doc.has_bom);
        assert_eq!(doc.generate_bytes(&[]), bytes);
    }

    #[test]
    fn missing_list_is_appended_when_needed() {
        let doc =
            SaveDocument::from_bytes(br#"{"InGameDate":"1863-04-02T10:11:12.130"}"#.to_vec(), None)
                .unwrap();
        let bytes = doc.generate_bytes(&[Value::from(1i64)]);
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"InGameDate":"1863-04-02T10:11:12.130","QualitiesPossessedList":[1]}"#
        );
    }

    #[test]
    fn non_array_list_is_replaced_in_place() {
        let text = r#"{"InGameDate":"1863-04-02T10:11:12.130","QualitiesPossessedList":null,"Tail":1}"#;
        let mut doc = SaveDocument::from_bytes(text.as_bytes().to_vec(), None).unwrap();
        assert!(doc.take_qualities().is_empty());

        assert_eq!(std::str::from_utf8(&doc.generate_bytes(&[])).unwrap(), text);
        let bytes = doc.generate_bytes(&[Value::from(7i64)]);
        let written = std::str::from_utf8(&bytes).unwrap();
        assert_eq!(
            written,
            r#"{"InGameDate":"1863-04-02T10:11:12.130","QualitiesPossessedList":[7],"Tail":1}"#
        );
        assert_eq!(written.matches(statics::SS_QUALITIES_POSSESSED).count(), 1);
    }

    #[test]
    fn target_path_gets_json_extension_only_when_missing() {
        assert_eq!(json_target_path(Path::new("dir/save")), PathBuf::from("dir/save.json"));
        assert_eq!(
            json_target_path(Path::new("dir/save.json")),
            PathBuf::from("dir/save.json")
        );
        // Any extension counts, not just `.json`.
        assert_eq!(
            json_target_path(Path::new("dir/save.v2")),
            PathBuf::from("dir/save.v2")
        );
        assert_eq!(json_target_path(Path::new("slot.1")), PathBuf::from("slot.1"));
        assert_eq!(
            backup_path(Path::new("dir/save.json")),
            PathBuf::from("dir/save.json.bak")
        );
    }

    #[test]
    fn saving_over_a_file_keeps_a_backup() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("autosave.json");
        fs::write(&target, b"old")?;
        fs::write(backup_path(&target), b"older")?;

        let mut doc = SaveDocument::from_bytes(MINIMAL.as_bytes().to_vec(), None)?;
        let qualities = doc.take_qualities();
        doc.mark_dirty();
        let written = doc.save_to_path(&target, &qualities)?;

        assert_eq!(written, target);
        assert_eq!(fs::read(&target)?, MINIMAL.as_bytes());
        assert_eq!(fs::read(backup_path(&target))?, b"old");
        assert!(!doc.dirty);
        Ok(())
    }
}
