//! Core traits - the game objects the containers read and mutate
//!
//! The game owns every one of these objects. The mod's glue layer wraps the
//! real game types in implementations of these traits; tests use the
//! in-memory mocks at the bottom of this file.

use super::types::{
    BillKind, BillSettings, BodyPart, Color, DrugPolicyEntry, FloatRange, MedicalBill,
    QualityRange, RecipeDef, RepeatModeDef, SpecialFilterDef, StoragePriority, StoreModeDef,
    ThingDef,
};

// =============================================================================
// GAME SERVICES
// =============================================================================

/// Kind of on-screen message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Operation finished
    TaskCompletion,
    /// Informational, no sound
    SilentInput,
    /// Operation refused or failed
    RejectInput,
}

/// Player-facing message toasts
pub trait MessageSink {
    fn message(&self, text: &str, kind: MessageKind);
}

/// Definition lookup by name
pub trait DefDatabase {
    fn recipe(&self, def_name: &str) -> Option<RecipeDef>;

    fn thing(&self, def_name: &str) -> Option<ThingDef>;

    /// Every special filter rule known to the game
    fn special_filters(&self) -> Vec<SpecialFilterDef>;

    fn store_mode(&self, def_name: &str) -> Option<StoreModeDef>;

    fn is_research_finished(&self, project: &str) -> bool;
}

/// Zones on the current map
pub trait ZoneLookup {
    fn has_stockpile(&self, label: &str) -> bool;
}

/// Repeat modes contributed by another mod
///
/// Injected when that mod is loaded; absent otherwise.
pub trait RepeatModeProvider {
    fn repeat_mode(&self, def_name: &str) -> Option<RepeatModeDef>;
}

// =============================================================================
// THING FILTER
// =============================================================================

/// Raw access to a filter's allow/disallow state
///
/// The game does not expose these collections directly; implementations
/// reach into the filter. Mutations through the `_mut` accessors take effect
/// immediately but the game only recomputes derived state after
/// [`ThingFilter::settings_changed`].
pub trait ThingFilter {
    /// Every definition this filter could allow
    fn storable_defs(&self) -> Vec<ThingDef>;

    fn allowed_defs(&self) -> &[ThingDef];

    fn allowed_defs_mut(&mut self) -> &mut Vec<ThingDef>;

    fn disallowed_special_filters(&self) -> &[SpecialFilterDef];

    fn disallowed_special_filters_mut(&mut self) -> &mut Vec<SpecialFilterDef>;

    fn hit_points_configurable(&self) -> bool;

    fn allowed_hit_points(&self) -> FloatRange;

    fn set_allowed_hit_points(&mut self, range: FloatRange);

    fn qualities_configurable(&self) -> bool;

    fn allowed_qualities(&self) -> QualityRange;

    fn set_allowed_qualities(&mut self, range: QualityRange);

    fn settings_changed(&mut self);
}

// =============================================================================
// AGGREGATES
// =============================================================================

/// A production bill on a work table
pub trait ProductionBill {
    type Filter: ThingFilter;

    fn recipe(&self) -> &RecipeDef;

    fn kind(&self) -> BillKind;

    fn settings(&self) -> &BillSettings;

    fn settings_mut(&mut self) -> &mut BillSettings;

    fn ingredient_filter(&self) -> &Self::Filter;

    fn ingredient_filter_mut(&mut self) -> &mut Self::Filter;
}

/// Entry of a bill stack as seen by the exporter
pub enum StackedBill<'a, B> {
    Production(&'a B),
    /// Any other bill type; never exported
    Other,
}

/// A work table's bill queue
pub trait BillStack {
    type Bill: ProductionBill;

    fn bills(&self) -> Vec<StackedBill<'_, Self::Bill>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    fn add_bill(&mut self, bill: Self::Bill);

    /// Create a detached bill with the game's defaults for `recipe`
    fn make_bill(&self, recipe: &RecipeDef, kind: BillKind) -> Self::Bill;
}

/// A drug policy; its entry set is fixed by the game
pub trait DrugPolicy {
    fn label(&self) -> &str;

    fn set_label(&mut self, label: String);

    fn entries(&self) -> &[DrugPolicyEntry];

    fn entries_mut(&mut self) -> &mut [DrugPolicyEntry];
}

/// A pawn's queue of surgeries
pub trait OperationQueue {
    /// Short pawn name for log lines
    fn pawn_name(&self) -> String;

    fn medical_bills(&self) -> Vec<MedicalBill>;

    fn clear_bills(&mut self);

    fn add_bill(&mut self, bill: MedicalBill);

    /// Parts the pawn currently has
    fn present_parts(&self) -> Vec<BodyPart>;

    /// Every part of the pawn's body definition, missing or not
    fn all_body_parts(&self) -> Vec<BodyPart>;
}

/// Anything configured through a single thing filter
///
/// Storage buildings, stockpile zones, food restrictions and apparel
/// policies. Optional fields are only exported by targets that have them.
pub trait FilterSettingsTarget {
    type Filter: ThingFilter;

    fn filter(&self) -> &Self::Filter;

    fn filter_mut(&mut self) -> &mut Self::Filter;

    /// Policy name (food restrictions, apparel policies)
    fn label(&self) -> Option<&str> {
        None
    }

    fn set_label(&mut self, _label: String) {}

    /// Hauling priority (storage buildings, stockpiles)
    fn priority(&self) -> Option<StoragePriority> {
        None
    }

    fn set_priority(&mut self, _priority: StoragePriority) {}

    /// Zone color (stockpiles)
    fn color(&self) -> Option<Color> {
        None
    }

    /// Apply a zone color; implementations also drop the cached zone
    /// material and redraw the zone's cells
    fn set_color(&mut self, _color: Color) {}
}

// =============================================================================
// TEST MOCKS
// =============================================================================
