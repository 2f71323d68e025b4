#![allow(dead_code)]

use ssse::{Editor, EditorOptions, QualityCatalog, SaveDocument, Value};
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

pub const DEFINITIONS: &str = r#"[
  { "Category": "Ship", "Id": 106000, "Name": "Mersey-class Steamer" },
  { "Category": "Goods", "Id": 102027, "Name": "Fuel" },
  { "Category": "Goods", "Id": 102026, "Name": "Supplies" },
  { "Category": "Goods", "Id": 107000, "Name": "Sunlight" },
  { "Category": "Goods", "Id": 107001, "Name": "Deck Gun", "AssignToSlot": { "Name": "Forward" } },
  { "Category": "Curiosity", "Id": 108001, "Name": "Zee-Bat Tooth" },
  { "Category": "Curiosity", "Id": 108000, "Name": "Amber Shell" },
  { "Category": "Companion", "Id": 109000, "Name": "The Cook from Khan's" },
  { "Category": "Story", "Id": 110000, "Name": "Visited Hunter's Keep" }
]"#;

// Records: 0 ship slot, 1 companion, 2 fuel, 3 supplies, 4 echoes, 5 hull, 6 sunlight,
// 7 amber shell, 8 unknown.
pub const SAVE: &str = r#"{
  "Name": "Captain Test",
  "CurrentPort": { "Name": "Fallen London" },
  "InGameDate": "1865-03-01T12:00:00.000",
  "QualitiesPossessedList": [
    { "AssociatedQualityId": 102889, "Level": 1, "EquippedPossession": {
        "AssociatedQualityId": 106000,
        "AssociatedQuality": { "Category": "Ship", "Id": 106000, "Name": "Mersey-class Steamer",
          "Enhancements": [
            { "Level": 10, "AssociatedQuality": { "Name": "Quarters" } },
            { "Level": 40, "AssociatedQuality": { "Name": "MaxHull" } },
            { "Level": 60, "AssociatedQuality": { "Name": "Hold" } },
            { "Level": 3, "AssociatedQuality": { "Name": "Ship Weight" } }
          ] } } },
    { "AssociatedQualityId": 102771, "Level": 1, "EquippedPossession": {
        "AssociatedQualityId": 109000,
        "AssociatedQuality": { "Category": "Companion", "Id": 109000, "Name": "The Cook from Khan's",
          "AssignToSlot": { "Name": "Cook" } } } },
    { "AssociatedQualityId": 102027, "Level": 12, "EquippedPossession": null },
    { "AssociatedQualityId": 102026, "Level": 8, "EquippedPossession": null },
    { "AssociatedQualityId": 102028, "Level": 250, "EquippedPossession": null },
    { "AssociatedQualityId": 102029, "Level": 35, "EquippedPossession": null },
    { "AssociatedQualityId": 107000, "Level": 5, "EquippedPossession": null },
    { "AssociatedQualityId": 108000, "Level": 2, "EquippedPossession": null },
    { "AssociatedQualityId": 999001, "Level": 4, "EquippedPossession": null }
  ]
}
"#;

pub const SHIP_TAG: i64 = 106000;
pub const SUNLIGHT: i64 = 107000;
pub const DECK_GUN: i64 = 107001;
pub const AMBER_SHELL: i64 = 108000;
pub const ZEE_BAT_TOOTH: i64 = 108001;
pub const UNKNOWN_TAG: i64 = 999001;

pub fn catalog() -> Result<QualityCatalog> {
    Ok(QualityCatalog::from_definitions(Value::parse(DEFINITIONS)?)?)
}

pub fn editor_for(text: &str, catalog: &mut QualityCatalog, options: EditorOptions) -> Result<Editor> {
    let document = SaveDocument::from_bytes(text.as_bytes().to_vec(), None)?;
    Ok(Editor::load(document, catalog, options)?)
}

pub fn editor(catalog: &mut QualityCatalog) -> Result<Editor> {
    editor_for(SAVE, catalog, EditorOptions::default())
}

pub fn write_save(dir: &Path, name: &str, text: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, text.as_bytes())?;
    Ok(path)
}

/// Level of the first record tagged `tag` in `records`.
pub fn level_of(records: &[Value], tag: i64) -> Option<i64> {
    records
        .iter()
        .find(|r| ssse::path::get_i64(r, &["AssociatedQualityId"]) == Some(tag))
        .and_then(|r| ssse::path::get_i64(r, &["Level"]))
}
