use crate::catalog::QualityCatalog;
use crate::quality::QualityItem;
use crate::{Value, path, statics};
use std::collections::BTreeMap;

/// Which document a [`QualitiesList`] was read from; decides where each record keeps its quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    /// `qualities.json`: every element is a definition.
    Definitions,
    /// `QualitiesPossessedList` of a save: the definition sits at
    /// `EquippedPossession.AssociatedQuality`, and elements without one are not classified.
    Save,
}

/// A classified item and the position of the record it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub record: usize,
    pub item: QualityItem,
}

/// A document's list of quality records plus a per-category index of what they classify as.
#[derive(Debug, Clone)]
pub struct QualitiesList {
    source: ListSource,
    records: Vec<Value>,
    by_category: BTreeMap<String, Vec<Loaded>>,
}

impl QualitiesList {
    pub fn empty(source: ListSource) -> Self {
        Self {
            source,
            records: Vec::new(),
            by_category: BTreeMap::new(),
        }
    }

    /// Classify every record, registering unseen categories and new items in `catalog`.
    pub fn new(records: Vec<Value>, source: ListSource, catalog: &mut QualityCatalog) -> Self {
        let mut list = Self {
            source,
            records,
            by_category: BTreeMap::new(),
        };
        for idx in 0..list.records.len() {
            list.load(idx, catalog);
        }
        tracing::debug!(
            ?source,
            records = list.records.len(),
            categories = list.by_category.len(),
            "classified qualities"
        );
        list
    }

    pub fn source(&self) -> ListSource {
        self.source
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn record(&self, idx: usize) -> Option<&Value> {
        self.records.get(idx)
    }

    pub fn record_mut(&mut self, idx: usize) -> Option<&mut Value> {
        self.records.get_mut(idx)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<Value> {
        self.records
    }

    /// Items of `category` in record order; `None` if this list never saw the category.
    pub fn category_items(&self, category: &str) -> Option<&[Loaded]> {
        self.by_category.get(category).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.by_category.keys().map(String::as_str)
    }

    /// Position of the first record whose top-level `AssociatedQualityId` is `tag`.
    pub fn find_by_tag(&self, tag: i64) -> Option<usize> {
        self.records
            .iter()
            .position(|r| path::get_i64(r, &[statics::SS_ASSOCIATED_QUALITY_ID]) == Some(tag))
    }

    /// Append a record and classify it like the loaded ones. Returns its position.
    pub fn add_quality(&mut self, record: Value, catalog: &mut QualityCatalog) -> usize {
        self.records.push(record);
        let idx = self.records.len() - 1;
        self.load(idx, catalog);
        idx
    }

    /// Remove the record at `idx`, dropping its index entries and shifting later positions down.
    pub fn remove_quality(&mut self, idx: usize) -> Option<Value> {
        if idx >= self.records.len() {
            return None;
        }
        let removed = self.records.remove(idx);
        for items in self.by_category.values_mut() {
            items.retain(|loaded| loaded.record != idx);
            for loaded in items.iter_mut() {
                if loaded.record > idx {
                    loaded.record -= 1;
                }
            }
        }
        self.by_category.retain(|_, items| !items.is_empty());
        Some(removed)
    }

    fn load(&mut self, idx: usize, catalog: &mut QualityCatalog) {
        let Some(item) = classify(&self.records[idx], self.source, catalog) else {
            return;
        };
        match self.source {
            ListSource::Definitions => catalog.register_instance(item.clone()),
            ListSource::Save => catalog.register_if_absent(item.clone()),
        }
        self.by_category
            .entry(item.category.clone())
            .or_default()
            .push(Loaded { record: idx, item });
    }
}

fn classify(record: &Value, source: ListSource, catalog: &mut QualityCatalog) -> Option<QualityItem> {
    let quality = match source {
        ListSource::Definitions => record,
        ListSource::Save => path::get_value(
            record,
            &[statics::SS_EQUIPPED_POSSESSION, statics::SS_ASSOCIATED_QUALITY],
        )
        .filter(|v| v.as_object().is_some())?,
    };
    if quality.as_object().is_none() {
        return None;
    }
    let category = path::get_str(quality, &[statics::SS_CATEGORY])?;
    let factory = catalog.factory_or_generic(category);
    let item = factory.build(quality);
    if item.is_none() {
        tracing::warn!(category, "skipping quality without an integer Id");
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;

    fn possessed(tag: i64, category: &str, id: i64, name: &str) -> Value {
        Value::parse(&format!(
            r#"{{ "AssociatedQualityId": {tag}, "Level": 1,
                 "EquippedPossession": {{ "AssociatedQualityId": {id},
                    "AssociatedQuality": {{ "Category": "{category}", "Id": {id}, "Name": "{name}" }} }} }}"#
        ))
        .unwrap()
    }

    fn plain(tag: i64, level: i64) -> Value {
        Value::parse(&format!(
            r#"{{ "AssociatedQualityId": {tag}, "Level": {level}, "EquippedPossession": null }}"#
        ))
        .unwrap()
    }

    #[test]
    fn save_records_classify_through_equipped_possession() {
        let mut catalog = QualityCatalog::new();
        let list = QualitiesList::new(
            vec![
                possessed(102771, "Companion", 500, "The Cook"),
                plain(102027, 12),
                possessed(102966, "Goods", 600, "Deck Gun"),
            ],
            ListSource::Save,
            &mut catalog,
        );
        assert_eq!(list.len(), 3);
        let companions = list.category_items("Companion").unwrap();
        assert_eq!(companions.len(), 1);
        assert_eq!(companions[0].record, 0);
        assert_eq!(companions[0].item.name, "The Cook");
        assert_eq!(list.category_items("Goods").unwrap()[0].record, 2);
        assert!(list.category_items("Ship").is_none());
    }

    #[test]
    fn definitions_are_their_own_records() {
        let mut catalog = QualityCatalog::new();
        let defs = Value::parse(
            r#"[ { "Category": "Curiosity", "Id": 1, "Name": "Shell" },
                 { "Name": "No category", "Id": 2 },
                 "not an object" ]"#,
        )
        .unwrap();
        let Value::Array(records) = defs else { panic!("array") };
        let list = QualitiesList::new(records, ListSource::Definitions, &mut catalog);
        assert_eq!(list.categories().collect::<Vec<_>>(), vec!["Curiosity"]);
        assert!(catalog.factory_for("Curiosity").is_some());
        assert_eq!(catalog.instance_by_tag(1).map(|i| i.name.as_str()), Some("Shell"));
    }

    #[test]
    fn remove_prunes_and_reindexes() {
        let mut catalog = QualityCatalog::new();
        let mut list = QualitiesList::new(
            vec![
                possessed(1, "Companion", 500, "A"),
                plain(2, 3),
                possessed(3, "Companion", 501, "B"),
            ],
            ListSource::Save,
            &mut catalog,
        );
        let removed = list.remove_quality(0).unwrap();
        assert_eq!(path::get_i64(&removed, &[statics::SS_ASSOCIATED_QUALITY_ID]), Some(1));
        let companions = list.category_items("Companion").unwrap();
        assert_eq!(companions.len(), 1);
        assert_eq!(companions[0].item.name, "B");
        assert_eq!(companions[0].record, 1);
        assert_eq!(list.find_by_tag(3), Some(1));
        assert!(list.remove_quality(9).is_none());
    }

    #[test]
    fn add_then_find() {
        let mut catalog = QualityCatalog::new();
        let mut list = QualitiesList::new(vec![plain(2, 3)], ListSource::Save, &mut catalog);
        let idx = list.add_quality(plain(7, 0), &mut catalog);
        assert_eq!(idx, 1);
        assert_eq!(list.find_by_tag(7), Some(1));
        assert_eq!(list.find_by_tag(99), None);
    }

    #[test]
    fn save_items_do_not_replace_known_definitions() {
        let mut catalog = QualityCatalog::new();
        let defs = Value::parse(r#"[ { "Category": "Companion", "Id": 500, "Name": "Defined" } ]"#)
            .unwrap();
        let Value::Array(records) = defs else { panic!("array") };
        QualitiesList::new(records, ListSource::Definitions, &mut catalog);

        QualitiesList::new(
            vec![possessed(102771, "Companion", 500, "From save")],
            ListSource::Save,
            &mut catalog,
        );
        assert_eq!(catalog.instance_by_tag(500).map(|i| i.name.as_str()), Some("Defined"));
    }
}
