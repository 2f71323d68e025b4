// Central place for user-facing strings, document keys and well-known tags.
// Keep these out of the loaders/editor to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "SSSE: Sunless Sea Save Editor";

pub const EN_HEADING_CAPTAIN: &str = "Captain";
pub const EN_HEADING_PORT: &str = "Port";
pub const EN_HEADING_DATE: &str = "Date";
pub const EN_HEADING_SHIP: &str = "Ship";
pub const EN_HEADING_OFFICERS: &str = "Officers";
pub const EN_HEADING_TRACKED: &str = "Qualities";
pub const EN_HEADING_CARGO: &str = "Cargo";
pub const EN_HEADING_EQUIPPED: &str = "Equipped";
pub const EN_PANEL_OTHER: &str = "Other";

pub const EN_NO_SHIP: &str = "No ship?";
pub const EN_UNSET: &str = "-unset-";
pub const EN_ABSENT: &str = "(absent)";
pub const EN_VACANT: &str = "(vacant)";
pub const EN_UNKNOWN_PREFIX: &str = "Unknown #";

pub const EN_SHIP_CREW_CAPACITY: &str = "Crew capacity";
pub const EN_SHIP_HOLD: &str = "Hold";
pub const EN_SHIP_MAX_HULL: &str = "Max hull";
pub const EN_SHIP_WEIGHT: &str = "Weight";

pub const EN_SAVED_TO: &str = "Saved to";
pub const EN_WARN_HULL_ABOVE_MAX: &str = "Hull value is above maximum";
pub const EN_HINT_FORCE: &str = "re-run with --force to save anyway";

pub const EN_EMPTY: &str = "";

// Save document keys (SS_ prefix)
pub const SS_NAME: &str = "Name";
pub const SS_CURRENT_PORT: &str = "CurrentPort";
pub const SS_IN_GAME_DATE: &str = "InGameDate";
pub const SS_QUALITIES_POSSESSED: &str = "QualitiesPossessedList";

// Keys of a possessed-quality record.
pub const SS_ASSOCIATED_QUALITY: &str = "AssociatedQuality";
pub const SS_ASSOCIATED_QUALITY_ID: &str = "AssociatedQualityId";
pub const SS_EQUIPPED_POSSESSION: &str = "EquippedPossession";
pub const SS_LEVEL: &str = "Level";

// Keys of a quality definition.
pub const SS_CATEGORY: &str = "Category";
pub const SS_ID: &str = "Id";
pub const SS_ASSIGN_TO_SLOT: &str = "AssignToSlot";
pub const SS_ENHANCEMENTS: &str = "Enhancements";

// Remaining keys of a freshly added possessed-quality record.
pub const SS_EFFECTIVE_LEVEL_MODIFIER: &str = "EffectiveLevelModifier";
pub const SS_QUALITY_NAME: &str = "QualityName";
pub const SS_TARGET_LEVEL: &str = "TargetLevel";
pub const SS_TARGET_QUALITY: &str = "TargetQuality";
pub const SS_QUALITY_DESCRIPTION: &str = "QualityDescription";
pub const SS_QUALITY_ALLOWED_ON: &str = "QualityAllowedOn";
pub const SS_RELATIONSHIPS: &str = "Relationships";
pub const SS_QUALITY_IMAGE: &str = "QualityImage";
pub const SS_QUALITY_CATEGORY: &str = "QualityCategory";
pub const SS_XP: &str = "XP";
pub const SS_QUALITY_NATURE: &str = "QualityNature";
pub const SS_COMPLETION_MESSAGE: &str = "CompletionMessage";

// Timestamp layout of InGameDate, e.g. 2016-03-04T12:30:00.000
pub const SS_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

// Categories with their own specialization.
pub const SS_CATEGORY_SHIP: &str = "Ship";
pub const SS_CATEGORY_COMPANION: &str = "Companion";
pub const SS_CATEGORY_GOODS: &str = "Goods";

// Ship enhancement names.
pub const SS_ENHANCEMENT_QUARTERS: &str = "Quarters";
pub const SS_ENHANCEMENT_WEIGHT: &str = "Ship Weight";
pub const SS_ENHANCEMENT_MAX_HULL: &str = "MaxHull";
pub const SS_ENHANCEMENT_HOLD: &str = "Hold";

// Officer roles (AssignToSlot.Name of a companion).
pub const SS_ROLE_COOK: &str = "Cook";
pub const SS_ROLE_FIRST_OFFICER: &str = "First Officer";
pub const SS_ROLE_CHIEF_ENGINEER: &str = "Chief Engineer";
pub const SS_ROLE_GUNNERY_OFFICER: &str = "Gunnery Officer";
pub const SS_ROLE_MASCOT: &str = "Mascot";
pub const SS_ROLE_SURGEON: &str = "Surgeon";

// Well-known quality tags (TAG_ prefix). Most of these have no Category.
pub const TAG_CURRENT_SHIP: i64 = 102889;
pub const TAG_ECHOES: i64 = 102028;
pub const TAG_FUEL: i64 = 102027;
pub const TAG_SUPPLIES: i64 = 102026;
pub const TAG_TERROR: i64 = 102025;
pub const TAG_HULL: i64 = 102029;
pub const TAG_CREW: i64 = 102030;
pub const TAG_MIRRORS: i64 = 102895;
pub const TAG_IRON: i64 = 102894;
pub const TAG_PAGES: i64 = 102898;
pub const TAG_HEARTS: i64 = 102897;
pub const TAG_VEILS: i64 = 102896;

// Game data layout.
pub const SS_DIR_SAVES: &str = "saves";
pub const SS_DIR_ENTITIES: &str = "entities";
pub const SS_FILE_QUALITIES: &str = "qualities.json";
pub const SS_EXT_JSON: &str = "json";
pub const SS_EXT_BACKUP: &str = "bak";

// UTF-8 byte order mark some Unity builds prefix their JSON with.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
