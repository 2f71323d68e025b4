use crate::error::{Error, Result};
use crate::qualities::{ListSource, QualitiesList};
use crate::quality::{QualityClass, QualityFactory, QualityItem};
use crate::{Value, statics};
use std::collections::BTreeMap;
use std::path::Path;

/// The always-shown stats and stores, bound by fixed tag rather than by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrackedQuality {
    Echoes,
    Fuel,
    Supplies,
    Terror,
    Hull,
    Mirrors,
    Iron,
    Pages,
    Hearts,
    Veils,
    Crew,
}

impl TrackedQuality {
    pub const ALL: [TrackedQuality; 11] = [
        TrackedQuality::Echoes,
        TrackedQuality::Fuel,
        TrackedQuality::Supplies,
        TrackedQuality::Terror,
        TrackedQuality::Hull,
        TrackedQuality::Mirrors,
        TrackedQuality::Iron,
        TrackedQuality::Pages,
        TrackedQuality::Hearts,
        TrackedQuality::Veils,
        TrackedQuality::Crew,
    ];

    pub fn tag(self) -> i64 {
        match self {
            TrackedQuality::Echoes => statics::TAG_ECHOES,
            TrackedQuality::Fuel => statics::TAG_FUEL,
            TrackedQuality::Supplies => statics::TAG_SUPPLIES,
            TrackedQuality::Terror => statics::TAG_TERROR,
            TrackedQuality::Hull => statics::TAG_HULL,
            TrackedQuality::Mirrors => statics::TAG_MIRRORS,
            TrackedQuality::Iron => statics::TAG_IRON,
            TrackedQuality::Pages => statics::TAG_PAGES,
            TrackedQuality::Hearts => statics::TAG_HEARTS,
            TrackedQuality::Veils => statics::TAG_VEILS,
            TrackedQuality::Crew => statics::TAG_CREW,
        }
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// The hard-coded item. Only Fuel and Supplies have a category (Goods).
    pub fn item(self) -> QualityItem {
        match self {
            TrackedQuality::Echoes => QualityItem::builtin("Echos", self.tag()),
            TrackedQuality::Fuel => QualityItem::builtin_good("Fuel", self.tag()),
            TrackedQuality::Supplies => QualityItem::builtin_good("Supplies", self.tag()),
            TrackedQuality::Terror => QualityItem::builtin("Terror level", self.tag()),
            TrackedQuality::Hull => QualityItem::builtin("Ship's Hull.", self.tag()),
            TrackedQuality::Mirrors => QualityItem::builtin("Mirrors", self.tag()),
            TrackedQuality::Iron => QualityItem::builtin("Iron", self.tag()),
            TrackedQuality::Pages => QualityItem::builtin("Pages", self.tag()),
            TrackedQuality::Hearts => QualityItem::builtin("Hearts", self.tag()),
            TrackedQuality::Veils => QualityItem::builtin("Veils", self.tag()),
            TrackedQuality::Crew => QualityItem::builtin("Crew", self.tag()),
        }
    }
}

/// Everything known about qualities: which factory serves each category, and one item per tag.
///
/// Built from the definitions document, then handed to every save load, which may add
/// categories and items it has not seen before.
#[derive(Debug, Clone)]
pub struct QualityCatalog {
    factories: BTreeMap<String, QualityFactory>,
    items: BTreeMap<i64, QualityItem>,
    definitions: QualitiesList,
}

impl Default for QualityCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityCatalog {
    /// A catalog holding only the built-ins.
    pub fn new() -> Self {
        let mut catalog = Self {
            factories: BTreeMap::new(),
            items: BTreeMap::new(),
            definitions: QualitiesList::empty(ListSource::Definitions),
        };
        for tracked in TrackedQuality::ALL {
            catalog.register_instance(tracked.item());
        }
        catalog
    }

    /// Build the catalog from a parsed `qualities.json`, which must be a list of definitions.
    pub fn from_definitions(document: Value) -> Result<Self> {
        let records = match document {
            Value::Array(records) => records,
            other => {
                return Err(Error::MalformedInput(format!(
                    "definitions must be a list, found {}",
                    other.type_name()
                )));
            }
        };
        let mut catalog = Self::new();
        let definitions = QualitiesList::new(records, ListSource::Definitions, &mut catalog);
        catalog.definitions = definitions;
        tracing::debug!(
            items = catalog.items.len(),
            categories = catalog.factories.len(),
            "loaded quality definitions"
        );
        Ok(catalog)
    }

    pub fn load_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        let text = std::str::from_utf8(&bytes).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let document = Value::parse(text).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_definitions(document)
    }

    pub fn definitions(&self) -> &QualitiesList {
        &self.definitions
    }

    /// Replaces any factory already registered for `category`.
    pub fn register_factory(&mut self, category: &str, factory: QualityFactory) {
        self.factories.insert(category.to_string(), factory);
    }

    pub fn factory_for(&self, category: &str) -> Option<&QualityFactory> {
        self.factories.get(category)
    }

    /// The factory for `category`, registering one on first sight.
    pub fn factory_or_generic(&mut self, category: &str) -> &QualityFactory {
        self.factories
            .entry(category.to_string())
            .or_insert_with(|| {
                let class = QualityClass::for_category(category);
                if class == QualityClass::Generic {
                    tracing::debug!(category, "registering generic quality category");
                }
                QualityFactory::new(category, class)
            })
    }

    /// Last registration for a tag wins.
    pub fn register_instance(&mut self, item: QualityItem) {
        self.items.insert(item.tag, item);
    }

    /// Keep the item already known for this tag, if any.
    pub fn register_if_absent(&mut self, item: QualityItem) {
        self.items.entry(item.tag).or_insert(item);
    }

    pub fn instance_by_tag(&self, tag: i64) -> Option<&QualityItem> {
        self.items.get(&tag)
    }

    pub fn contains_tag(&self, tag: i64) -> bool {
        self.items.contains_key(&tag)
    }

    /// Ascending.
    pub fn all_tags(&self) -> impl Iterator<Item = i64> + '_ {
        self.items.keys().copied()
    }

    /// Sorted, so panels come out in the same order on every run.
    pub fn all_categories(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Items of `category` sorted by display name. Items sharing a name are all kept.
    pub fn items_in_category(&self, category: &str) -> Vec<&QualityItem> {
        let mut items: Vec<&QualityItem> = self
            .items
            .values()
            .filter(|item| item.category == category)
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    /// A ship definition by tag, looked up among the definitions' Ship category.
    pub fn ship_definition(&self, tag: i64) -> Option<&QualityItem> {
        self.definitions
            .category_items(statics::SS_CATEGORY_SHIP)?
            .iter()
            .map(|loaded| &loaded.item)
            .find(|item| item.tag == tag)
    }
}
