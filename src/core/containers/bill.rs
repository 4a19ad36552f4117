//! Bill queue container - every production bill of a work table
//!
//! One record per bill. Loading builds every bill first and only then
//! touches the table: in replace mode the queue is cleared once at least
//! one bill was parsed, and bills beyond the table's capacity are dropped.

use std::fmt;
use std::io::{self, BufRead, Write};

use once_cell::unsync::OnceCell;
use tracing::{debug, warn};

use crate::core::constants::{
    BILL_STACK_MAX_COUNT, EXTENSION_REPEAT_MODES, KEY_COUNT_EQUIPPED, KEY_COUNT_TAINTED,
    KEY_HP_RANGE, KEY_LOOK_IN, KEY_ONLY_ALLOWED_INGREDIENTS, KEY_PAUSE_WHEN_SATISFIED,
    KEY_QUALITY_RANGE, KEY_RECIPE, KEY_RECIPE_UFT, KEY_REPEAT_COUNT, KEY_REPEAT_MODE,
    KEY_SEARCH_RADIUS, KEY_SKILL_RANGE, KEY_STORE_MODE, KEY_STORE_ZONE, KEY_SUSPENDED,
    KEY_TARGET_COUNT, KEY_UNPAUSE_WHEN_YOU_HAVE, RANGE_DELIMITER, REPEAT_MODE_FOREVER,
    REPEAT_MODE_REPEAT_COUNT, REPEAT_MODE_TARGET_COUNT,
};
use crate::core::envelope::{SaveableContainer, Version};
use crate::core::filter::{write_filter_fields, FilterProjection};
use crate::core::format::{
    format_bool, parse_bool, parse_float, parse_float_range, parse_int, parse_int_range,
    parse_quality_range, require, FieldWriter, InvalidValue,
};
use crate::core::reader::{closed_records, read_records, Record};
use crate::core::traits::{
    BillStack, MessageSink, ProductionBill, RepeatModeProvider, StackedBill,
};
use crate::core::types::{BillKind, BillSettings, RepeatModeDef, StoreModeDef};

use super::{GameContext, CONTAINER_VERSION};

// =============================================================================
// REPEAT MODES
// =============================================================================

/// Resolves repeat mode names, built-in or contributed by another mod
///
/// Extension modes are asked of the provider once, on first use.
pub struct RepeatModeResolver<'p> {
    provider: Option<&'p dyn RepeatModeProvider>,
    extensions: OnceCell<Vec<RepeatModeDef>>,
}

impl<'p> RepeatModeResolver<'p> {
    pub fn new(provider: Option<&'p dyn RepeatModeProvider>) -> Self {
        Self {
            provider,
            extensions: OnceCell::new(),
        }
    }

    pub fn with_provider(provider: &'p dyn RepeatModeProvider) -> Self {
        Self::new(Some(provider))
    }

    /// Resolver that only knows the game's own modes
    pub fn builtin_only() -> Self {
        Self::new(None)
    }

    pub fn resolve(&self, name: &str) -> Option<RepeatModeDef> {
        if [
            REPEAT_MODE_FOREVER,
            REPEAT_MODE_REPEAT_COUNT,
            REPEAT_MODE_TARGET_COUNT,
        ]
        .contains(&name)
        {
            return Some(RepeatModeDef::new(name));
        }

        if !EXTENSION_REPEAT_MODES.contains(&name) {
            return None;
        }

        self.extensions()
            .iter()
            .find(|m| m.def_name == name)
            .cloned()
    }

    fn extensions(&self) -> &[RepeatModeDef] {
        self.extensions.get_or_init(|| {
            let Some(provider) = self.provider else {
                debug!("[bills] No repeat mode provider, extension modes unavailable");
                return Vec::new();
            };
            let found: Vec<RepeatModeDef> = EXTENSION_REPEAT_MODES
                .iter()
                .filter_map(|name| provider.repeat_mode(name))
                .collect();
            debug!(count = found.len(), "[bills] Resolved extension repeat modes");
            found
        })
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Why a bill record was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillRecordError {
    /// Neither recipe key is present
    MissingRecipe,
    UnknownRecipe(String),
    /// The recipe's research prerequisite is not finished
    ResearchNotFinished { recipe: String },
    UnknownRepeatMode { mode: String, recipe: String },
    InvalidValue(InvalidValue),
}

impl BillRecordError {
    /// Whether the player is told, not just the log
    fn is_player_facing(&self) -> bool {
        matches!(
            self,
            BillRecordError::UnknownRecipe(_) | BillRecordError::ResearchNotFinished { .. }
        )
    }
}

impl fmt::Display for BillRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillRecordError::MissingRecipe => write!(f, "Bill record has no recipe"),
            BillRecordError::UnknownRecipe(name) => {
                write!(f, "Unable to load bill with recipe [{}]", name)
            }
            BillRecordError::ResearchNotFinished { recipe } => {
                write!(f, "Research is not done for [{}]", recipe)
            }
            BillRecordError::UnknownRepeatMode { mode, recipe } => {
                write!(f, "Unknown repeat mode [{}] for bill [{}]", mode, recipe)
            }
            BillRecordError::InvalidValue(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for BillRecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BillRecordError::InvalidValue(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvalidValue> for BillRecordError {
    fn from(e: InvalidValue) -> Self {
        BillRecordError::InvalidValue(e)
    }
}

// =============================================================================
// CONTAINER
// =============================================================================

/// Saves and loads the production bills of one work table
///
/// The target and the append flag can be changed between calls so one
/// container serves a whole dialog session.
pub struct BillContainer<'a, S: BillStack> {
    bills: &'a mut S,
    append: bool,
    ctx: GameContext<'a>,
    repeat_modes: &'a RepeatModeResolver<'a>,
}

impl<'a, S: BillStack> BillContainer<'a, S> {
    pub fn new(
        bills: &'a mut S,
        append: bool,
        ctx: GameContext<'a>,
        repeat_modes: &'a RepeatModeResolver<'a>,
    ) -> Self {
        Self {
            bills,
            append,
            ctx,
            repeat_modes,
        }
    }

    pub fn target(&self) -> &S {
        &*self.bills
    }

    pub fn set_target(&mut self, bills: &'a mut S) {
        self.bills = bills;
    }

    pub fn is_append(&self) -> bool {
        self.append
    }

    /// Keep existing bills on load instead of replacing them
    pub fn set_append(&mut self, append: bool) {
        self.append = append;
    }

    fn write_bill<W: Write>(&self, writer: &mut FieldWriter<W>, bill: &S::Bill) -> io::Result<()> {
        let recipe_key = match bill.kind() {
            BillKind::Production => KEY_RECIPE,
            BillKind::ProductionWithUft => KEY_RECIPE_UFT,
        };
        let s = bill.settings();

        writer.write_field(recipe_key, &bill.recipe().def_name)?;
        writer.write_field(KEY_SUSPENDED, format_bool(s.suspended))?;
        writer.write_field(KEY_COUNT_EQUIPPED, format_bool(s.include_equipped))?;
        writer.write_field(KEY_COUNT_TAINTED, format_bool(s.include_tainted))?;
        writer.write_field(KEY_SKILL_RANGE, s.allowed_skill_range)?;
        writer.write_field(KEY_SEARCH_RADIUS, s.ingredient_search_radius)?;
        writer.write_field(KEY_REPEAT_MODE, &s.repeat_mode.def_name)?;
        writer.write_field(KEY_REPEAT_COUNT, s.repeat_count)?;
        writer.write_field(KEY_TARGET_COUNT, s.target_count)?;
        writer.write_field(KEY_PAUSE_WHEN_SATISFIED, format_bool(s.pause_when_satisfied))?;
        writer.write_field(KEY_UNPAUSE_WHEN_YOU_HAVE, s.unpause_when_you_have)?;
        writer.write_field(KEY_HP_RANGE, s.hp_range)?;
        writer.write_field(KEY_QUALITY_RANGE, s.quality_range)?;
        writer.write_field(KEY_ONLY_ALLOWED_INGREDIENTS, format_bool(s.limit_to_allowed_stuff))?;

        writer.write_field(KEY_STORE_MODE, &s.store_mode.def_name)?;
        if s.store_mode.is_specific_stockpile() {
            writer.write_field(KEY_STORE_ZONE, s.store_zone.as_deref().unwrap_or_default())?;
        }
        if let Some(zone) = &s.include_from_zone {
            writer.write_field(KEY_LOOK_IN, zone)?;
        }

        write_filter_fields(writer, bill.ingredient_filter())?;
        writer.write_separator()
    }

    /// Build a detached bill from one record
    fn create_bill(&self, record: &Record) -> Result<S::Bill, BillRecordError> {
        let (kind, name) = match (record.get(KEY_RECIPE), record.get(KEY_RECIPE_UFT)) {
            (Some(name), _) => (BillKind::Production, name),
            (None, Some(name)) => (BillKind::ProductionWithUft, name),
            (None, None) => return Err(BillRecordError::MissingRecipe),
        };
        let name = name.unwrap_or_default();

        let recipe = self
            .ctx
            .defs
            .recipe(name)
            .ok_or_else(|| BillRecordError::UnknownRecipe(name.to_string()))?;

        if let Some(project) = &recipe.research_prerequisite {
            if !self.ctx.defs.is_research_finished(project) {
                return Err(BillRecordError::ResearchNotFinished {
                    recipe: recipe.label.clone(),
                });
            }
        }

        let mut bill = self.bills.make_bill(&recipe, kind);

        for (key, value) in record.iter() {
            self.apply_setting(bill.settings_mut(), &recipe.def_name, key, value)?;
        }

        let mut projection = FilterProjection::new(bill.ingredient_filter_mut());
        for (key, value) in record.iter() {
            projection.apply_field(key, value, self.ctx.defs)?;
        }
        projection.finish();

        Ok(bill)
    }

    fn apply_setting(
        &self,
        s: &mut BillSettings,
        recipe: &str,
        key: &str,
        value: Option<&str>,
    ) -> Result<(), BillRecordError> {
        match key {
            KEY_SUSPENDED => s.suspended = require(key, value, parse_bool)?,
            KEY_COUNT_EQUIPPED => s.include_equipped = require(key, value, parse_bool)?,
            KEY_COUNT_TAINTED => s.include_tainted = require(key, value, parse_bool)?,
            KEY_SKILL_RANGE => s.allowed_skill_range = require(key, value, parse_int_range)?,
            KEY_SEARCH_RADIUS => s.ingredient_search_radius = require(key, value, parse_float)?,
            KEY_REPEAT_MODE => {
                let mode = value.unwrap_or_default();
                s.repeat_mode = self.repeat_modes.resolve(mode).ok_or_else(|| {
                    BillRecordError::UnknownRepeatMode {
                        mode: mode.to_string(),
                        recipe: recipe.to_string(),
                    }
                })?;
            }
            KEY_REPEAT_COUNT => s.repeat_count = require(key, value, parse_int)?,
            KEY_TARGET_COUNT => s.target_count = require(key, value, parse_int)?,
            KEY_PAUSE_WHEN_SATISFIED => s.pause_when_satisfied = require(key, value, parse_bool)?,
            KEY_UNPAUSE_WHEN_YOU_HAVE => s.unpause_when_you_have = require(key, value, parse_int)?,
            KEY_HP_RANGE => s.hp_range = require(key, value, parse_float_range)?,
            KEY_QUALITY_RANGE => {
                // Older files may carry a bare quality here; keep the default
                if value.is_some_and(|v| v.contains(RANGE_DELIMITER)) {
                    s.quality_range =
                        require(key, value, |v| parse_quality_range(v, RANGE_DELIMITER))?;
                }
            }
            KEY_ONLY_ALLOWED_INGREDIENTS => {
                s.limit_to_allowed_stuff = require(key, value, parse_bool)?
            }
            KEY_STORE_MODE => {
                let mode = value
                    .and_then(|v| self.ctx.defs.store_mode(v))
                    .filter(|m| !m.is_specific_stockpile())
                    .unwrap_or_else(StoreModeDef::best_stockpile);
                s.set_store_mode(mode);
            }
            KEY_STORE_ZONE => match value.filter(|z| self.ctx.zones.has_stockpile(z)) {
                Some(zone) => s.set_store_zone(zone),
                None => s.set_store_mode(StoreModeDef::best_stockpile()),
            },
            KEY_LOOK_IN => {
                s.include_from_zone = value
                    .filter(|z| self.ctx.zones.has_stockpile(z))
                    .map(str::to_string);
            }
            _ => {}
        }
        Ok(())
    }
}

impl<S: BillStack> SaveableContainer for BillContainer<'_, S> {
    const NAME: &'static str = "bills";

    fn version(&self) -> Version {
        CONTAINER_VERSION
    }

    fn messages(&self) -> &dyn MessageSink {
        self.ctx.messages
    }

    fn save_fields<W: Write>(&self, writer: &mut FieldWriter<W>) -> io::Result<()> {
        for entry in self.bills.bills() {
            if let StackedBill::Production(bill) = entry {
                self.write_bill(writer, bill)?;
            }
        }
        Ok(())
    }

    fn load_fields<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        let records = read_records(reader)?;

        let mut parsed = Vec::new();
        for record in closed_records(&records) {
            match self.create_bill(record) {
                Ok(bill) => parsed.push(bill),
                Err(e) => self.ctx.skip_record(Self::NAME, &e, e.is_player_facing()),
            }
        }

        debug!(
            parsed = parsed.len(),
            records = closed_records(&records).len(),
            append = self.append,
            "[bills] Parsed bill records"
        );

        if !self.append && !parsed.is_empty() {
            self.bills.clear();
        }

        for bill in parsed {
            if self.bills.len() < BILL_STACK_MAX_COUNT {
                self.bills.add_bill(bill);
            } else {
                warn!(
                    recipe = %bill.recipe().def_name,
                    "[bills] Work table has too many bills, bill will not be added"
                );
            }
        }

        Ok(())
    }
}
