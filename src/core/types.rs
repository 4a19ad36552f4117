//! Core types - value types read from and written to host objects
//!
//! Definitions (recipes, things, special filters, modes) are owned by the
//! game. The core only ever sees them as name-keyed descriptors handed out
//! by a [`DefDatabase`](super::traits::DefDatabase).

use std::fmt;

use num_enum::TryFromPrimitive;

use super::constants::{
    RANGE_DELIMITER, REPEAT_MODE_REPEAT_COUNT, STORE_MODE_BEST_STOCKPILE,
    STORE_MODE_SPECIFIC_STOCKPILE,
};

// =============================================================================
// RANGES
// =============================================================================

/// Inclusive integer range, written as `min~max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.min, RANGE_DELIMITER, self.max)
    }
}

/// Inclusive float range, written as `min~max`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// The full 0..1 fraction range
    pub fn zero_to_one() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl fmt::Display for FloatRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.min, RANGE_DELIMITER, self.max)
    }
}

// =============================================================================
// QUALITY
// =============================================================================

/// Item quality levels, lowest first
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive)]
pub enum QualityCategory {
    Awful = 0,
    Poor = 1,
    Normal = 2,
    Good = 3,
    Excellent = 4,
    Masterwork = 5,
    Legendary = 6,
}

impl QualityCategory {
    const ALL: [QualityCategory; 7] = [
        QualityCategory::Awful,
        QualityCategory::Poor,
        QualityCategory::Normal,
        QualityCategory::Good,
        QualityCategory::Excellent,
        QualityCategory::Masterwork,
        QualityCategory::Legendary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            QualityCategory::Awful => "Awful",
            QualityCategory::Poor => "Poor",
            QualityCategory::Normal => "Normal",
            QualityCategory::Good => "Good",
            QualityCategory::Excellent => "Excellent",
            QualityCategory::Masterwork => "Masterwork",
            QualityCategory::Legendary => "Legendary",
        }
    }

    /// Parse a quality by name (case-insensitive) or by ordinal
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(q) = Self::ALL.iter().find(|q| q.name().eq_ignore_ascii_case(s)) {
            return Some(*q);
        }
        s.parse::<u8>().ok().and_then(|n| Self::try_from(n).ok())
    }
}

impl fmt::Display for QualityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive quality range, written as `min~max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityRange {
    pub min: QualityCategory,
    pub max: QualityCategory,
}

impl QualityRange {
    pub fn new(min: QualityCategory, max: QualityCategory) -> Self {
        Self { min, max }
    }

    pub fn all() -> Self {
        Self::new(QualityCategory::Awful, QualityCategory::Legendary)
    }
}

impl fmt::Display for QualityRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.min, RANGE_DELIMITER, self.max)
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Hauling priority of a storage building or stockpile
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive)]
pub enum StoragePriority {
    Unstored = 0,
    Low = 1,
    Normal = 2,
    Preferred = 3,
    Important = 4,
    Critical = 5,
}

impl StoragePriority {
    const ALL: [StoragePriority; 6] = [
        StoragePriority::Unstored,
        StoragePriority::Low,
        StoragePriority::Normal,
        StoragePriority::Preferred,
        StoragePriority::Important,
        StoragePriority::Critical,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StoragePriority::Unstored => "Unstored",
            StoragePriority::Low => "Low",
            StoragePriority::Normal => "Normal",
            StoragePriority::Preferred => "Preferred",
            StoragePriority::Important => "Important",
            StoragePriority::Critical => "Critical",
        }
    }

    /// Parse a priority by name (case-insensitive) or by ordinal
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(p) = Self::ALL.iter().find(|p| p.name().eq_ignore_ascii_case(s)) {
            return Some(*p);
        }
        s.parse::<u8>().ok().and_then(|n| Self::try_from(n).ok())
    }
}

impl fmt::Display for StoragePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// RGBA zone color, components in 0..1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

// =============================================================================
// DEFINITION DESCRIPTORS
// =============================================================================

/// An item definition that a filter can allow
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThingDef {
    pub def_name: String,
}

impl ThingDef {
    pub fn new(def_name: impl Into<String>) -> Self {
        Self {
            def_name: def_name.into(),
        }
    }
}

/// A special filter rule ("rotten", "burnable", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecialFilterDef {
    pub def_name: String,
    /// Only configurable rules are exposed to the player and restored on load
    pub configurable: bool,
}

impl SpecialFilterDef {
    pub fn new(def_name: impl Into<String>, configurable: bool) -> Self {
        Self {
            def_name: def_name.into(),
            configurable,
        }
    }
}

/// A crafting or surgery recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDef {
    pub def_name: String,
    pub label: String,
    /// Research project that must be finished before the recipe is usable
    pub research_prerequisite: Option<String>,
    /// Surgery recipes that apply to a specific body part
    pub targets_body_part: bool,
}

impl RecipeDef {
    pub fn new(def_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            def_name: def_name.into(),
            label: label.into(),
            research_prerequisite: None,
            targets_body_part: false,
        }
    }

    pub fn with_research(mut self, project: impl Into<String>) -> Self {
        self.research_prerequisite = Some(project.into());
        self
    }

    pub fn targeting_body_part(mut self) -> Self {
        self.targets_body_part = true;
        self
    }
}

/// How a bill repeats (forever, N times, until N in stock, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepeatModeDef {
    pub def_name: String,
}

impl RepeatModeDef {
    pub fn new(def_name: impl Into<String>) -> Self {
        Self {
            def_name: def_name.into(),
        }
    }
}

/// Where finished products are hauled
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreModeDef {
    pub def_name: String,
}

impl StoreModeDef {
    pub fn new(def_name: impl Into<String>) -> Self {
        Self {
            def_name: def_name.into(),
        }
    }

    pub fn best_stockpile() -> Self {
        Self::new(STORE_MODE_BEST_STOCKPILE)
    }

    pub fn specific_stockpile() -> Self {
        Self::new(STORE_MODE_SPECIFIC_STOCKPILE)
    }

    pub fn is_specific_stockpile(&self) -> bool {
        self.def_name == STORE_MODE_SPECIFIC_STOCKPILE
    }
}

// =============================================================================
// BILLS
// =============================================================================

/// Production bill flavour; "Uft" bills produce an unfinished thing first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillKind {
    Production,
    ProductionWithUft,
}

/// Scalar settings of a production bill
#[derive(Debug, Clone, PartialEq)]
pub struct BillSettings {
    pub suspended: bool,
    pub include_equipped: bool,
    pub include_tainted: bool,
    pub allowed_skill_range: IntRange,
    pub ingredient_search_radius: f32,
    pub repeat_mode: RepeatModeDef,
    pub repeat_count: i32,
    pub target_count: i32,
    pub pause_when_satisfied: bool,
    pub unpause_when_you_have: i32,
    pub hp_range: FloatRange,
    pub quality_range: QualityRange,
    pub limit_to_allowed_stuff: bool,
    pub store_mode: StoreModeDef,
    /// Label of the destination stockpile when `store_mode` is specific
    pub store_zone: Option<String>,
    /// Label of the stockpile ingredients are restricted to
    pub include_from_zone: Option<String>,
}

impl BillSettings {
    /// Route products to the named stockpile
    pub fn set_store_zone(&mut self, label: impl Into<String>) {
        self.store_mode = StoreModeDef::specific_stockpile();
        self.store_zone = Some(label.into());
    }

    pub fn set_store_mode(&mut self, mode: StoreModeDef) {
        self.store_mode = mode;
        self.store_zone = None;
    }
}

impl Default for BillSettings {
    fn default() -> Self {
        Self {
            suspended: false,
            include_equipped: true,
            include_tainted: false,
            allowed_skill_range: IntRange::new(0, 20),
            ingredient_search_radius: 999.0,
            repeat_mode: RepeatModeDef::new(REPEAT_MODE_REPEAT_COUNT),
            repeat_count: 1,
            target_count: 10,
            pause_when_satisfied: false,
            unpause_when_you_have: 5,
            hp_range: FloatRange::zero_to_one(),
            quality_range: QualityRange::all(),
            limit_to_allowed_stuff: false,
            store_mode: StoreModeDef::best_stockpile(),
            store_zone: None,
            include_from_zone: None,
        }
    }
}

// =============================================================================
// DRUG POLICY
// =============================================================================

/// One row of a drug policy table
#[derive(Debug, Clone, PartialEq)]
pub struct DrugPolicyEntry {
    pub drug: ThingDef,
    pub allowed_for_addiction: bool,
    pub allowed_for_joy: bool,
    pub allow_scheduled: bool,
    pub days_frequency: f32,
    pub only_if_joy_below: f32,
    pub only_if_mood_below: f32,
    pub take_to_inventory: i32,
    pub take_to_inventory_temp_buffer: Option<String>,
}

impl DrugPolicyEntry {
    pub fn new(drug: ThingDef) -> Self {
        Self {
            drug,
            allowed_for_addiction: false,
            allowed_for_joy: false,
            allow_scheduled: false,
            days_frequency: 1.0,
            only_if_joy_below: 1.0,
            only_if_mood_below: 1.0,
            take_to_inventory: 0,
            take_to_inventory_temp_buffer: None,
        }
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// A body part record of a pawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPart {
    /// Display label, unique among the parts a pawn currently has
    pub label: String,
    pub def_name: String,
}

impl BodyPart {
    pub fn new(label: impl Into<String>, def_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            def_name: def_name.into(),
        }
    }
}

/// A queued surgery
#[derive(Debug, Clone, PartialEq)]
pub struct MedicalBill {
    pub recipe: RecipeDef,
    pub suspended: bool,
    pub part: Option<BodyPart>,
}

impl MedicalBill {
    pub fn new(recipe: RecipeDef) -> Self {
        Self {
            recipe,
            suspended: false,
            part: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_from_name_case_insensitive() {
        assert_eq!(
            QualityCategory::from_name("masterwork"),
            Some(QualityCategory::Masterwork)
        );
        assert_eq!(
            QualityCategory::from_name("LEGENDARY"),
            Some(QualityCategory::Legendary)
        );
    }

    #[test]
    fn test_quality_from_ordinal() {
        assert_eq!(QualityCategory::from_name("2"), Some(QualityCategory::Normal));
        assert_eq!(QualityCategory::from_name("7"), None);
        assert_eq!(QualityCategory::from_name("Shoddy"), None);
    }

    #[test]
    fn test_priority_from_name() {
        assert_eq!(
            StoragePriority::from_name("Preferred"),
            Some(StoragePriority::Preferred)
        );
        assert_eq!(
            StoragePriority::from_name("critical"),
            Some(StoragePriority::Critical)
        );
        assert_eq!(StoragePriority::from_name("0"), Some(StoragePriority::Unstored));
        assert_eq!(StoragePriority::from_name("urgent"), None);
    }

    #[test]
    fn test_range_display() {
        assert_eq!(IntRange::new(3, 20).to_string(), "3~20");
        assert_eq!(FloatRange::new(0.25, 1.0).to_string(), "0.25~1");
        assert_eq!(QualityRange::all().to_string(), "Awful~Legendary");
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::new(1.0, 0.5, 0.25, 1.0).to_string(), "1,0.5,0.25,1");
    }

    #[test]
    fn test_bill_settings_store_zone() {
        let mut settings = BillSettings::default();
        assert_eq!(settings.store_mode, StoreModeDef::best_stockpile());

        settings.set_store_zone("Stockpile zone 2");
        assert!(settings.store_mode.is_specific_stockpile());
        assert_eq!(settings.store_zone.as_deref(), Some("Stockpile zone 2"));

        settings.set_store_mode(StoreModeDef::best_stockpile());
        assert_eq!(settings.store_zone, None);
    }
}
