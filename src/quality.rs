use crate::{Value, path, statics};
use indexmap::IndexMap;

/// Which specialization a category maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityClass {
    Generic,
    Ship,
    Companion,
    Good,
}

impl QualityClass {
    /// Categories with a specialization; everything else is generic.
    pub fn for_category(category: &str) -> Self {
        match category {
            statics::SS_CATEGORY_SHIP => QualityClass::Ship,
            statics::SS_CATEGORY_COMPANION => QualityClass::Companion,
            statics::SS_CATEGORY_GOODS => QualityClass::Good,
            _ => QualityClass::Generic,
        }
    }
}

/// The specialization of a [`QualityItem`] and whatever it extracted from its record.
#[derive(Debug, Clone, PartialEq)]
pub enum QualityKind {
    Generic,
    Ship(Ship),
    Companion,
    Good,
}

/// One known quality: a stat, a possession, a companion, a ship.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityItem {
    pub tag: i64,
    pub name: String,
    /// Empty for the hard-coded built-ins that have no category.
    pub category: String,
    /// Where the quality is equipped or assigned, if anywhere.
    pub slot: Option<String>,
    pub kind: QualityKind,
}

impl QualityItem {
    /// A built-in quality with no category.
    pub fn builtin(name: &str, tag: i64) -> Self {
        Self {
            tag,
            name: name.to_string(),
            category: String::new(),
            slot: None,
            kind: QualityKind::Generic,
        }
    }

    /// A built-in Good, e.g. Fuel.
    pub fn builtin_good(name: &str, tag: i64) -> Self {
        Self {
            tag,
            name: name.to_string(),
            category: statics::SS_CATEGORY_GOODS.to_string(),
            slot: None,
            kind: QualityKind::Good,
        }
    }

    /// Placeholder for a tag found in a save but in no definition.
    pub fn unknown(tag: i64) -> Self {
        Self::builtin(&format!("{}{tag}", statics::EN_UNKNOWN_PREFIX), tag)
    }

    /// Goods occupy hold space.
    pub fn is_cargo(&self) -> bool {
        matches!(self.kind, QualityKind::Good)
    }

    /// Cargo that counts against the hold: not equipped anywhere.
    pub fn is_stowed_cargo(&self) -> bool {
        self.is_cargo() && self.slot.as_deref().is_none_or(str::is_empty)
    }

    pub fn as_ship(&self) -> Option<&Ship> {
        match &self.kind {
            QualityKind::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    /// An empty possessed-quality record for this item, shaped like the game's own.
    pub fn template_record(&self) -> Value {
        let mut record = IndexMap::new();
        let mut put = |key: &str, value: Value| {
            record.insert(key.to_string(), value);
        };
        put(statics::SS_ASSOCIATED_QUALITY, Value::Null);
        put(statics::SS_EFFECTIVE_LEVEL_MODIFIER, Value::from(0));
        put(statics::SS_QUALITY_NAME, Value::Null);
        put(statics::SS_TARGET_LEVEL, Value::Null);
        put(statics::SS_ASSOCIATED_QUALITY_ID, Value::from(self.tag));
        put(statics::SS_TARGET_QUALITY, Value::Null);
        put(statics::SS_NAME, Value::Null);
        put(statics::SS_QUALITY_DESCRIPTION, Value::Null);
        put(statics::SS_QUALITY_ALLOWED_ON, Value::Null);
        put(statics::SS_RELATIONSHIPS, Value::Array(Vec::new()));
        put(statics::SS_QUALITY_IMAGE, Value::Null);
        put(statics::SS_EQUIPPED_POSSESSION, Value::Null);
        put(statics::SS_QUALITY_CATEGORY, Value::Null);
        put(statics::SS_XP, Value::from(0));
        put(statics::SS_LEVEL, Value::from(0));
        put(statics::SS_QUALITY_NATURE, Value::Null);
        put(statics::SS_ID, Value::from(0));
        put(statics::SS_COMPLETION_MESSAGE, Value::Null);
        Value::Object(record)
    }
}

impl std::fmt::Display for QualityItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.tag, self.name)
    }
}

/// Builds [`QualityItem`]s for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityFactory {
    category: String,
    class: QualityClass,
}

impl QualityFactory {
    pub fn new(category: &str, class: QualityClass) -> Self {
        Self {
            category: category.to_string(),
            class,
        }
    }

    /// Generic factory for a category nobody specialized.
    pub fn generic(category: &str) -> Self {
        Self::new(category, QualityClass::Generic)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn class(&self) -> QualityClass {
        self.class
    }

    pub fn classifies(&self, record: &Value) -> bool {
        path::get_str(record, &[statics::SS_CATEGORY]) == Some(self.category.as_str())
    }

    /// `None` when the record has no integer `Id`.
    pub fn build(&self, record: &Value) -> Option<QualityItem> {
        let tag = path::get_i64(record, &[statics::SS_ID])?;
        let name = path::get_str(record, &[statics::SS_NAME])
            .unwrap_or(statics::EN_EMPTY)
            .to_string();
        let slot = path::get_str(record, &[statics::SS_ASSIGN_TO_SLOT, statics::SS_NAME])
            .map(str::to_string);
        let kind = match self.class {
            QualityClass::Generic => QualityKind::Generic,
            QualityClass::Ship => QualityKind::Ship(Ship::from_record(record)),
            QualityClass::Companion => QualityKind::Companion,
            QualityClass::Good => QualityKind::Good,
        };
        Some(QualityItem {
            tag,
            name,
            category: self.category.clone(),
            slot,
            kind,
        })
    }
}

/// Ship attributes kept as enhancement sub-records of a ship quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShipAttribute {
    CrewCapacity,
    Weight,
    MaxHull,
    HoldCapacity,
}

impl ShipAttribute {
    pub const ALL: [ShipAttribute; 4] = [
        ShipAttribute::CrewCapacity,
        ShipAttribute::Weight,
        ShipAttribute::MaxHull,
        ShipAttribute::HoldCapacity,
    ];

    /// `AssociatedQuality.Name` of the enhancement holding this attribute.
    pub fn enhancement_name(self) -> &'static str {
        match self {
            ShipAttribute::CrewCapacity => statics::SS_ENHANCEMENT_QUARTERS,
            ShipAttribute::Weight => statics::SS_ENHANCEMENT_WEIGHT,
            ShipAttribute::MaxHull => statics::SS_ENHANCEMENT_MAX_HULL,
            ShipAttribute::HoldCapacity => statics::SS_ENHANCEMENT_HOLD,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShipAttribute::CrewCapacity => statics::EN_SHIP_CREW_CAPACITY,
            ShipAttribute::Weight => statics::EN_SHIP_WEIGHT,
            ShipAttribute::MaxHull => statics::EN_SHIP_MAX_HULL,
            ShipAttribute::HoldCapacity => statics::EN_SHIP_HOLD,
        }
    }

    fn from_enhancement_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|attr| attr.enhancement_name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::str::FromStr for ShipAttribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crew" | "quarters" | "crew-capacity" => Ok(ShipAttribute::CrewCapacity),
            "weight" => Ok(ShipAttribute::Weight),
            "hull" | "max-hull" | "maxhull" => Ok(ShipAttribute::MaxHull),
            "hold" | "hold-capacity" => Ok(ShipAttribute::HoldCapacity),
            other => Err(format!("unknown ship attribute {other:?}")),
        }
    }
}

/// Where a ship record keeps its attributes: positions inside its `Enhancements` list.
///
/// The positions refer to the record the ship was built from; reading and writing
/// go through that same record so edits land in the node that gets saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ship {
    enhancements: [Option<usize>; 4],
}

impl Ship {
    pub fn from_record(record: &Value) -> Self {
        let mut ship = Ship::default();
        let Some(enhancements) = path::get_array(record, &[statics::SS_ENHANCEMENTS]) else {
            return ship;
        };
        for (idx, enhancement) in enhancements.iter().enumerate() {
            let Some(name) =
                path::get_str(enhancement, &[statics::SS_ASSOCIATED_QUALITY, statics::SS_NAME])
            else {
                continue;
            };
            if let Some(attr) = ShipAttribute::from_enhancement_name(name) {
                // Later duplicates win.
                ship.enhancements[attr.index()] = Some(idx);
            }
        }
        ship
    }

    pub fn has(&self, attr: ShipAttribute) -> bool {
        self.enhancements[attr.index()].is_some()
    }

    /// Level of `attr` in `record`; 0 when the ship has no such enhancement.
    pub fn level(&self, attr: ShipAttribute, record: &Value) -> i64 {
        self.enhancement(attr, record)
            .and_then(|e| path::get_i64(e, &[statics::SS_LEVEL]))
            .unwrap_or(0)
    }

    /// Write `level` into the enhancement for `attr`. Returns false when there is none.
    pub fn set_level(&self, attr: ShipAttribute, record: &mut Value, level: i64) -> bool {
        let Some(idx) = self.enhancements[attr.index()] else {
            return false;
        };
        let Some(enhancement) = path::get_array_mut(record, &[statics::SS_ENHANCEMENTS])
            .and_then(|list| list.get_mut(idx))
            .and_then(Value::as_object_mut)
        else {
            return false;
        };
        enhancement.insert(statics::SS_LEVEL.to_string(), Value::from(level));
        true
    }

    pub fn crew_capacity(&self, record: &Value) -> i64 {
        self.level(ShipAttribute::CrewCapacity, record)
    }

    pub fn weight(&self, record: &Value) -> i64 {
        self.level(ShipAttribute::Weight, record)
    }

    pub fn max_hull(&self, record: &Value) -> i64 {
        self.level(ShipAttribute::MaxHull, record)
    }

    pub fn hold_capacity(&self, record: &Value) -> i64 {
        self.level(ShipAttribute::HoldCapacity, record)
    }

    fn enhancement<'a>(&self, attr: ShipAttribute, record: &'a Value) -> Option<&'a Value> {
        let idx = self.enhancements[attr.index()]?;
        path::get_array(record, &[statics::SS_ENHANCEMENTS])?.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship_record() -> Value {
        Value::parse(
            r#"{
                "Category": "Ship",
                "Name": "Mersey-class Steamer",
                "Id": 106000,
                "Enhancements": [
                    { "Level": 5, "AssociatedQuality": { "Name": "Quarters", "Id": 106992 } },
                    { "Level": 9, "AssociatedQuality": { "Name": "Ship Weight" } },
                    { "Level": 1, "AssociatedQuality": null },
                    { "Level": 20, "AssociatedQuality": { "Name": "Hold" } }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn ship_reads_enhancement_levels() {
        let record = ship_record();
        let ship = Ship::from_record(&record);
        assert_eq!(ship.crew_capacity(&record), 5);
        assert_eq!(ship.weight(&record), 9);
        assert_eq!(ship.hold_capacity(&record), 20);
        assert_eq!(ship.max_hull(&record), 0);
        assert!(!ship.has(ShipAttribute::MaxHull));
    }

    #[test]
    fn ship_writes_through_to_its_record() {
        let mut record = ship_record();
        let ship = Ship::from_record(&record);
        assert!(ship.set_level(ShipAttribute::HoldCapacity, &mut record, 45));
        assert!(!ship.set_level(ShipAttribute::MaxHull, &mut record, 100));
        assert_eq!(ship.hold_capacity(&record), 45);
        assert_eq!(
            path::get_array(&record, &[statics::SS_ENHANCEMENTS]).map(<[Value]>::len),
            Some(4)
        );
    }

    #[test]
    fn factory_classifies_by_category_string() {
        let factory = QualityFactory::new("Ship", QualityClass::Ship);
        assert!(factory.classifies(&ship_record()));
        let other = Value::parse(r#"{ "Category": "Goods", "Id": 1 }"#).unwrap();
        assert!(!factory.classifies(&other));
        let missing = Value::parse(r#"{ "Id": 1 }"#).unwrap();
        assert!(!factory.classifies(&missing));
    }

    #[test]
    fn factory_builds_the_specialization() {
        let record = ship_record();
        let item = QualityFactory::new("Ship", QualityClass::Ship)
            .build(&record)
            .unwrap();
        assert_eq!(item.tag, 106000);
        assert_eq!(item.name, "Mersey-class Steamer");
        let ship = item.as_ship().unwrap();
        assert_eq!(ship.crew_capacity(&record), 5);
    }

    #[test]
    fn factory_reads_slot_and_skips_records_without_id() {
        let record = Value::parse(
            r#"{ "Category": "Companion", "Name": "The Cook", "Id": 7,
                 "AssignToSlot": { "Name": "Cook", "Id": 102771 } }"#,
        )
        .unwrap();
        let factory = QualityFactory::new("Companion", QualityClass::Companion);
        let item = factory.build(&record).unwrap();
        assert_eq!(item.slot.as_deref(), Some("Cook"));
        assert_eq!(item.kind, QualityKind::Companion);

        let no_id = Value::parse(r#"{ "Category": "Companion", "Name": "Nobody" }"#).unwrap();
        assert!(factory.build(&no_id).is_none());
    }

    #[test]
    fn only_unequipped_goods_are_stowed_cargo() {
        let mut good = QualityItem::builtin_good("Fuel", statics::TAG_FUEL);
        assert!(good.is_stowed_cargo());
        good.slot = Some("Deck".to_string());
        assert!(good.is_cargo());
        assert!(!good.is_stowed_cargo());
        assert!(!QualityItem::builtin("Echos", statics::TAG_ECHOES).is_cargo());
    }

    #[test]
    fn template_record_has_the_full_key_set() {
        let item = QualityItem::builtin("Mirrors", statics::TAG_MIRRORS);
        let record = item.template_record();
        let obj = record.as_object().unwrap();
        assert_eq!(obj.len(), 18);
        assert_eq!(
            path::get_i64(&record, &[statics::SS_ASSOCIATED_QUALITY_ID]),
            Some(statics::TAG_MIRRORS)
        );
        assert_eq!(path::get_i64(&record, &[statics::SS_LEVEL]), Some(0));
        assert_eq!(
            path::get_array(&record, &[statics::SS_RELATIONSHIPS]).map(<[Value]>::len),
            Some(0)
        );
        assert_eq!(
            path::get_value(&record, &[statics::SS_EQUIPPED_POSSESSION]),
            Some(&Value::Null)
        );
    }

    #[test]
    fn class_table_covers_the_specialized_categories() {
        assert_eq!(QualityClass::for_category("Ship"), QualityClass::Ship);
        assert_eq!(QualityClass::for_category("Companion"), QualityClass::Companion);
        assert_eq!(QualityClass::for_category("Goods"), QualityClass::Good);
        assert_eq!(QualityClass::for_category("Curiosity"), QualityClass::Generic);
    }

    #[test]
    fn ship_attribute_parses_cli_names() {
        assert_eq!("hold".parse::<ShipAttribute>(), Ok(ShipAttribute::HoldCapacity));
        assert_eq!("Crew".parse::<ShipAttribute>(), Ok(ShipAttribute::CrewCapacity));
        assert!("sails".parse::<ShipAttribute>().is_err());
    }
}
