use crate::catalog::{QualityCatalog, TrackedQuality};
use crate::error::{Error, Result};
use crate::qualities::{ListSource, QualitiesList};
use crate::quality::{QualityItem, Ship, ShipAttribute};
use crate::save::{SaveDocument, SaveSummary};
use crate::{Value, path, statics};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Switches for how a save is reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorOptions {
    /// Also show save records whose tag no definition knows about.
    pub show_unknown: bool,
}

/// Officer roles a companion can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OfficerRole {
    Cook,
    FirstOfficer,
    ChiefEngineer,
    GunneryOfficer,
    Mascot,
    Surgeon,
}

impl OfficerRole {
    pub const ALL: [OfficerRole; 6] = [
        OfficerRole::FirstOfficer,
        OfficerRole::ChiefEngineer,
        OfficerRole::GunneryOfficer,
        OfficerRole::Surgeon,
        OfficerRole::Cook,
        OfficerRole::Mascot,
    ];

    /// The slot name the game uses for this role.
    pub fn slot_name(self) -> &'static str {
        match self {
            OfficerRole::Cook => statics::SS_ROLE_COOK,
            OfficerRole::FirstOfficer => statics::SS_ROLE_FIRST_OFFICER,
            OfficerRole::ChiefEngineer => statics::SS_ROLE_CHIEF_ENGINEER,
            OfficerRole::GunneryOfficer => statics::SS_ROLE_GUNNERY_OFFICER,
            OfficerRole::Mascot => statics::SS_ROLE_MASCOT,
            OfficerRole::Surgeon => statics::SS_ROLE_SURGEON,
        }
    }

    /// `None` for slots that aren't officer posts, e.g. equipment slots.
    pub fn from_slot(slot: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.slot_name() == slot)
    }
}

/// Whether a displayed field is backed by a save record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    /// Not in the save; only an "add" affordance.
    Absent,
    /// Bound to the record at `record` in the possessed-qualities list. `text` is what the
    /// user currently has in the field, which may not be a number yet.
    Present { record: usize, text: String },
}

/// A displayed quality and its binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub item: QualityItem,
    pub presence: Presence,
    /// Panel fields can be added and removed; the fixed stats cannot.
    pub editable: bool,
}

impl Field {
    pub fn is_present(&self) -> bool {
        matches!(self.presence, Presence::Present { .. })
    }

    pub fn record(&self) -> Option<usize> {
        match &self.presence {
            Presence::Present { record, .. } => Some(*record),
            Presence::Absent => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.presence {
            Presence::Present { text, .. } => Some(text),
            Presence::Absent => None,
        }
    }
}

/// One category's fields, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub category: String,
    pub tags: Vec<i64>,
}

/// The player's current ship: named by its definition, read from and written to the save's
/// own copy of the ship quality.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipView {
    pub item: QualityItem,
    record: usize,
    ship: Ship,
}

/// How a single edit moved the cargo total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CargoDelta {
    pub old: i64,
    pub new: i64,
}

impl CargoDelta {
    pub const NONE: CargoDelta = CargoDelta { old: 0, new: 0 };

    /// `new - old`, or `None` when that doesn't fit in an `i64`.
    pub fn delta(self) -> Option<i64> {
        self.new.checked_sub(self.old)
    }
}

/// Things worth confirming before a save is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveWarning {
    HullAboveMaximum { hull: i64, max: i64 },
}

impl std::fmt::Display for SaveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveWarning::HullAboveMaximum { hull, max } => {
                write!(f, "{} ({hull} > {max})", statics::EN_WARN_HULL_ABOVE_MAX)
            }
        }
    }
}

/// An open save reconciled against the quality catalog.
///
/// Owns the save document and its possessed-qualities list; every field binding is a position
/// in that list, kept valid across additions and removals.
#[derive(Debug, Clone)]
pub struct Editor {
    document: SaveDocument,
    qualities: QualitiesList,
    options: EditorOptions,
    ship: Option<ShipView>,
    fields: BTreeMap<i64, Field>,
    panels: Vec<Panel>,
    officers: BTreeMap<OfficerRole, String>,
    equipped_goods: Vec<QualityItem>,
    stowed_goods: Vec<QualityItem>,
    cargo: i64,
}

impl Editor {
    pub fn open(path: &Path, catalog: &mut QualityCatalog, options: EditorOptions) -> Result<Self> {
        let document = SaveDocument::load_path(path)?;
        Self::load(document, catalog, options)
    }

    /// Reconcile `document` against `catalog`. Categories and items first seen in the save
    /// are added to the catalog.
    ///
    /// Fails when the saved cargo levels don't add up to a representable total.
    pub fn load(
        mut document: SaveDocument,
        catalog: &mut QualityCatalog,
        options: EditorOptions,
    ) -> Result<Self> {
        let records = document.take_qualities();
        let qualities = QualitiesList::new(records, ListSource::Save, catalog);

        let mut editor = Self {
            document,
            qualities,
            options,
            ship: None,
            fields: BTreeMap::new(),
            panels: Vec::new(),
            officers: BTreeMap::new(),
            equipped_goods: Vec::new(),
            stowed_goods: Vec::new(),
            cargo: 0,
        };

        let mut consumed: BTreeSet<i64> = TrackedQuality::ALL.iter().map(|t| t.tag()).collect();
        consumed.insert(statics::TAG_CURRENT_SHIP);

        editor.bind_tracked();
        editor.bind_ship(catalog, &mut consumed);
        editor.collect_officers();
        editor.collect_goods();
        let flat = editor.flat_index(catalog, &consumed);
        editor.build_panels(catalog, &consumed, &flat);
        editor.cargo = editor.recompute_cargo().ok_or_else(|| {
            Error::MalformedInput("cargo levels overflow the cargo total".to_string())
        })?;

        tracing::debug!(
            records = editor.qualities.len(),
            fields = editor.fields.len(),
            panels = editor.panels.len(),
            ship = editor.ship.as_ref().map(|s| s.item.name.as_str()),
            cargo = editor.cargo,
            "reconciled save"
        );
        Ok(editor)
    }

    fn bind_tracked(&mut self) {
        for tracked in TrackedQuality::ALL {
            let presence = self
                .qualities
                .find_by_tag(tracked.tag())
                .and_then(|idx| self.present_at(idx))
                .unwrap_or(Presence::Absent);
            self.fields.insert(
                tracked.tag(),
                Field {
                    item: tracked.item(),
                    presence,
                    editable: false,
                },
            );
        }
    }

    fn bind_ship(&mut self, catalog: &QualityCatalog, consumed: &mut BTreeSet<i64>) {
        let Some(idx) = self.qualities.find_by_tag(statics::TAG_CURRENT_SHIP) else {
            return;
        };
        let record = &self.qualities.records()[idx];
        let Some(ship_tag) = path::get_i64(
            record,
            &[statics::SS_EQUIPPED_POSSESSION, statics::SS_ASSOCIATED_QUALITY_ID],
        ) else {
            return;
        };
        let Some(definition) = catalog.ship_definition(ship_tag) else {
            tracing::warn!(ship_tag, "current ship is not among the known ships");
            return;
        };
        let ship = ship_quality(record)
            .map(Ship::from_record)
            .unwrap_or_default();
        consumed.insert(definition.tag);
        self.ship = Some(ShipView {
            item: definition.clone(),
            record: idx,
            ship,
        });
    }

    fn collect_officers(&mut self) {
        let Some(companions) = self.qualities.category_items(statics::SS_CATEGORY_COMPANION) else {
            return;
        };
        for loaded in companions {
            let Some(role) = loaded.item.slot.as_deref().and_then(OfficerRole::from_slot) else {
                continue;
            };
            self.officers.insert(role, loaded.item.name.clone());
        }
    }

    fn collect_goods(&mut self) {
        let Some(goods) = self.qualities.category_items(statics::SS_CATEGORY_GOODS) else {
            return;
        };
        for loaded in goods {
            if loaded.item.slot.as_deref().is_some_and(|s| !s.is_empty()) {
                self.equipped_goods.push(loaded.item.clone());
            } else {
                self.stowed_goods.push(loaded.item.clone());
            }
        }
    }

    /// Tag to record for plain (non-equipped) save records carrying a level.
    fn flat_index(&self, catalog: &QualityCatalog, consumed: &BTreeSet<i64>) -> BTreeMap<i64, usize> {
        let mut flat = BTreeMap::new();
        for (idx, record) in self.qualities.records().iter().enumerate() {
            let Some(tag) = path::get_i64(record, &[statics::SS_ASSOCIATED_QUALITY_ID]) else {
                continue;
            };
            let equipped = path::get_value(record, &[statics::SS_EQUIPPED_POSSESSION])
                .is_some_and(|v| !v.is_null());
            let has_level = path::get_value(record, &[statics::SS_LEVEL]).is_some_and(|v| !v.is_null());
            if equipped || !has_level || consumed.contains(&tag) {
                continue;
            }
            if !catalog.contains_tag(tag) && !self.options.show_unknown {
                continue;
            }
            flat.entry(tag).or_insert(idx);
        }
        flat
    }

    fn build_panels(
        &mut self,
        catalog: &QualityCatalog,
        consumed: &BTreeSet<i64>,
        flat: &BTreeMap<i64, usize>,
    ) {
        for category in catalog.all_categories() {
            let mut tags = Vec::new();
            for item in catalog.items_in_category(category) {
                if consumed.contains(&item.tag) || self.fields.contains_key(&item.tag) {
                    continue;
                }
                let presence = match flat.get(&item.tag) {
                    Some(&idx) => match self.present_at(idx) {
                        Some(presence) => presence,
                        // A level that is not an integer can't be edited as one.
                        None => continue,
                    },
                    None => Presence::Absent,
                };
                self.fields.insert(
                    item.tag,
                    Field {
                        item: item.clone(),
                        presence,
                        editable: true,
                    },
                );
                tags.push(item.tag);
            }
            self.panels.push(Panel {
                category: category.to_string(),
                tags,
            });
        }

        let mut unknown = Vec::new();
        for (&tag, &idx) in flat {
            if catalog.contains_tag(tag) {
                continue;
            }
            let Some(presence) = self.present_at(idx) else {
                continue;
            };
            self.fields.insert(
                tag,
                Field {
                    item: QualityItem::unknown(tag),
                    presence,
                    editable: true,
                },
            );
            unknown.push(tag);
        }
        if !unknown.is_empty() {
            self.panels.push(Panel {
                category: statics::EN_PANEL_OTHER.to_string(),
                tags: unknown,
            });
        }
    }

    fn present_at(&self, idx: usize) -> Option<Presence> {
        let level = self.record_level(idx)?;
        Some(Presence::Present {
            record: idx,
            text: level.to_string(),
        })
    }

    fn record_level(&self, idx: usize) -> Option<i64> {
        path::get_i64(self.qualities.record(idx)?, &[statics::SS_LEVEL])
    }

    /// Sum of the saved levels of every bound, unequipped Good (Fuel and Supplies included).
    /// `None` if the sum overflows.
    pub fn recompute_cargo(&self) -> Option<i64> {
        self.fields
            .values()
            .filter(|field| field.item.is_stowed_cargo())
            .filter_map(Field::record)
            .filter_map(|idx| self.record_level(idx))
            .try_fold(0i64, i64::checked_add)
    }

    /// The cargo total once `delta` is applied.
    fn cargo_after(&self, delta: CargoDelta, field: &Field, text: &str) -> Result<i64> {
        delta
            .delta()
            .and_then(|d| self.cargo.checked_add(d))
            .ok_or_else(|| Error::LevelOutOfRange {
                name: field.item.name.clone(),
                text: text.to_string(),
            })
    }

    pub fn cargo(&self) -> i64 {
        self.cargo
    }

    pub fn summary(&self) -> &SaveSummary {
        self.document.summary()
    }

    pub fn document(&self) -> &SaveDocument {
        &self.document
    }

    pub fn qualities(&self) -> &QualitiesList {
        &self.qualities
    }

    pub fn options(&self) -> EditorOptions {
        self.options
    }

    pub fn is_dirty(&self) -> bool {
        self.document.dirty
    }

    pub fn ship(&self) -> Option<&ShipView> {
        self.ship.as_ref()
    }

    /// Current value of a ship attribute, `None` without a ship.
    pub fn ship_level(&self, attr: ShipAttribute) -> Option<i64> {
        let view = self.ship.as_ref()?;
        let record = self.qualities.record(view.record)?;
        Some(ship_quality(record).map_or(0, |q| view.ship.level(attr, q)))
    }

    /// Write a ship attribute through to the save. False without a ship or without that
    /// enhancement.
    pub fn set_ship_attribute(&mut self, attr: ShipAttribute, level: i64) -> bool {
        let Some(view) = self.ship.as_ref() else {
            return false;
        };
        let Some(quality) = self
            .qualities
            .record_mut(view.record)
            .and_then(ship_quality_mut)
        else {
            return false;
        };
        if view.ship.has(attr) && view.ship.level(attr, quality) == level {
            return true;
        }
        if !view.ship.set_level(attr, quality, level) {
            return false;
        }
        self.document.mark_dirty();
        true
    }

    pub fn field(&self, tag: i64) -> Option<&Field> {
        self.fields.get(&tag)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn tracked_field(&self, tracked: TrackedQuality) -> Option<&Field> {
        self.fields.get(&tracked.tag())
    }

    /// The saved level behind a bound field.
    pub fn field_level(&self, tag: i64) -> Option<i64> {
        self.record_level(self.fields.get(&tag)?.record()?)
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn officers(&self) -> &BTreeMap<OfficerRole, String> {
        &self.officers
    }

    pub fn equipped_goods(&self) -> &[QualityItem] {
        &self.equipped_goods
    }

    pub fn stowed_goods(&self) -> &[QualityItem] {
        &self.stowed_goods
    }

    /// Replace a bound field's text. A numeric edit to a cargo field is written through at once
    /// and moves the cargo total; anything else waits for [`Editor::flush`].
    ///
    /// A cargo level that would overflow the total is rejected with
    /// [`Error::LevelOutOfRange`], leaving the field and its record as they were.
    pub fn apply_edit(&mut self, tag: i64, text: &str) -> Result<CargoDelta> {
        let field = self.fields.get(&tag).ok_or(Error::UnknownQuality(tag))?;
        let Some(record) = field.record() else {
            return Err(Error::NotPresent(tag));
        };

        let cargo_change = match text.trim().parse::<i64>() {
            Ok(new) if field.item.is_stowed_cargo() => {
                let old = self.record_level(record).unwrap_or(0);
                let delta = CargoDelta { old, new };
                Some((delta, self.cargo_after(delta, field, text)?))
            }
            _ => None,
        };

        if let Some(Presence::Present { text: current, .. }) =
            self.fields.get_mut(&tag).map(|f| &mut f.presence)
        {
            *current = text.to_string();
        }
        let Some((delta, total)) = cargo_change else {
            return Ok(CargoDelta::NONE);
        };
        let Some(level_holder) = self.qualities.record_mut(record).and_then(Value::as_object_mut)
        else {
            return Ok(CargoDelta::NONE);
        };
        if delta.old != delta.new {
            level_holder.insert(statics::SS_LEVEL.to_string(), Value::from(delta.new));
            self.document.mark_dirty();
        }
        self.cargo = total;
        Ok(delta)
    }

    /// Write every bound field's text into its record's `Level`.
    ///
    /// All fields are checked first, so a non-numeric entry leaves every record untouched.
    pub fn flush(&mut self) -> Result<()> {
        let mut updates = Vec::new();
        for field in self.fields.values() {
            let Presence::Present { record, text } = &field.presence else {
                continue;
            };
            let level = text
                .trim()
                .parse::<i64>()
                .map_err(|_| Error::NonNumericEntry {
                    name: field.item.name.clone(),
                    text: text.clone(),
                })?;
            updates.push((*record, level));
        }

        for (record, level) in updates {
            let Some(obj) = self.qualities.record_mut(record).and_then(Value::as_object_mut) else {
                continue;
            };
            if obj.get(statics::SS_LEVEL).and_then(Value::as_i64) != Some(level) {
                obj.insert(statics::SS_LEVEL.to_string(), Value::from(level));
                self.document.mark_dirty();
            }
        }
        Ok(())
    }

    pub fn save_warnings(&self) -> Vec<SaveWarning> {
        let mut warnings = Vec::new();
        let hull = self
            .tracked_field(TrackedQuality::Hull)
            .and_then(Field::text)
            .and_then(|t| t.trim().parse::<i64>().ok());
        if let (Some(hull), Some(max)) = (hull, self.ship_level(ShipAttribute::MaxHull)) {
            if hull > max {
                warnings.push(SaveWarning::HullAboveMaximum { hull, max });
            }
        }
        warnings
    }

    /// The bytes a save would write right now, without flushing field text.
    pub fn save_bytes(&self) -> Vec<u8> {
        self.document.save_bytes(self.qualities.records())
    }

    /// Flush the fields and write the save. Returns the path actually written.
    pub fn save_to_path(&mut self, path: &Path) -> Result<PathBuf> {
        self.flush()?;
        self.document.save_to_path(path, self.qualities.records())
    }

    /// Give an absent quality a fresh record in the save.
    pub fn add_quality(&mut self, tag: i64, catalog: &mut QualityCatalog) -> Result<()> {
        let field = self.fields.get(&tag).ok_or(Error::UnknownQuality(tag))?;
        if !field.editable {
            return Err(Error::NotEditable(tag));
        }
        if field.is_present() {
            return Err(Error::AlreadyPresent(tag));
        }
        let template = field.item.template_record();
        let record = self.qualities.add_quality(template, catalog);

        if let Some(field) = self.fields.get_mut(&tag) {
            field.presence = Presence::Present {
                record,
                text: 0.to_string(),
            };
        }
        self.document.mark_dirty();
        tracing::debug!(tag, record, "added quality");
        Ok(())
    }

    /// Drop a present quality's record from the save.
    pub fn remove_quality(&mut self, tag: i64) -> Result<CargoDelta> {
        let field = self.fields.get(&tag).ok_or(Error::UnknownQuality(tag))?;
        if !field.editable {
            return Err(Error::NotEditable(tag));
        }
        let Some(record) = field.record() else {
            return Err(Error::NotPresent(tag));
        };
        let delta = if field.item.is_stowed_cargo() {
            CargoDelta {
                old: self.record_level(record).unwrap_or(0),
                new: 0,
            }
        } else {
            CargoDelta::NONE
        };
        let total = self.cargo_after(delta, field, &delta.old.to_string())?;

        if let Some(field) = self.fields.get_mut(&tag) {
            field.presence = Presence::Absent;
        }
        self.qualities.remove_quality(record);
        self.reindex_after_removal(record);
        self.cargo = total;
        self.document.mark_dirty();
        tracing::debug!(tag, record, "removed quality");
        Ok(delta)
    }

    fn reindex_after_removal(&mut self, removed: usize) {
        for field in self.fields.values_mut() {
            if let Presence::Present { record, .. } = &mut field.presence {
                if *record > removed {
                    *record -= 1;
                }
            }
        }
        if let Some(view) = self.ship.as_mut() {
            if view.record > removed {
                view.record -= 1;
            }
        }
    }
}

/// The save's own copy of the ship quality inside the current-ship slot record.
fn ship_quality(slot_record: &Value) -> Option<&Value> {
    path::get_value(
        slot_record,
        &[statics::SS_EQUIPPED_POSSESSION, statics::SS_ASSOCIATED_QUALITY],
    )
    .filter(|v| v.as_object().is_some())
}

fn ship_quality_mut(slot_record: &mut Value) -> Option<&mut Value> {
    path::get_value_mut(
        slot_record,
        &[statics::SS_EQUIPPED_POSSESSION, statics::SS_ASSOCIATED_QUALITY],
    )
    .filter(|v| v.as_object().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn officer_roles_match_slot_names() {
        assert_eq!(OfficerRole::from_slot("First Officer"), Some(OfficerRole::FirstOfficer));
        assert_eq!(OfficerRole::from_slot("Surgeon"), Some(OfficerRole::Surgeon));
        assert_eq!(OfficerRole::from_slot("Deck"), None);
        for role in OfficerRole::ALL {
            assert_eq!(OfficerRole::from_slot(role.slot_name()), Some(role));
        }
    }

    #[test]
    fn cargo_delta_is_new_minus_old() {
        assert_eq!(CargoDelta { old: 12, new: 20 }.delta(), Some(8));
        assert_eq!(CargoDelta { old: 5, new: 0 }.delta(), Some(-5));
        assert_eq!(CargoDelta::NONE.delta(), Some(0));
    }

    #[test]
    fn cargo_delta_reports_overflow() {
        assert_eq!(CargoDelta { old: 12, new: i64::MIN }.delta(), None);
        assert_eq!(CargoDelta { old: -1, new: i64::MAX }.delta(), None);
        assert_eq!(CargoDelta { old: 0, new: i64::MAX }.delta(), Some(i64::MAX));
    }

    #[test]
    fn field_accessors_follow_presence() {
        let mut field = Field {
            item: QualityItem::builtin("Echos", statics::TAG_ECHOES),
            presence: Presence::Absent,
            editable: false,
        };
        assert!(!field.is_present());
        assert_eq!(field.text(), None);
        field.presence = Presence::Present {
            record: 4,
            text: "12".to_string(),
        };
        assert_eq!(field.record(), Some(4));
        assert_eq!(field.text(), Some("12"));
    }

    #[test]
    fn hull_warning_mentions_both_values() {
        let text = SaveWarning::HullAboveMaximum { hull: 90, max: 80 }.to_string();
        assert!(text.contains("90 > 80"));
    }
}
