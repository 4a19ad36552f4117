//! Drug policy container - the rows of one drug policy table
//!
//! The table's rows are fixed by the game (one per drug). Loading only
//! overwrites rows whose drug is named in the file; it never adds rows.

use std::fmt;
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::core::constants::{
    KEY_ALLOWED_FOR_ADDICTION, KEY_ALLOWED_FOR_JOY, KEY_ALLOW_SCHEDULED, KEY_DAYS_FREQUENCY,
    KEY_DRUG_DEF, KEY_DRUG_INDEX, KEY_NAME, KEY_ONLY_IF_JOY_BELOW, KEY_ONLY_IF_MOOD_BELOW,
    KEY_TAKE_TO_INVENTORY, KEY_TAKE_TO_INVENTORY_TEMP_BUFFER,
};
use crate::core::envelope::{SaveableContainer, Version};
use crate::core::format::{
    format_bool, parse_bool, parse_float, parse_int, require, round_to, FieldWriter,
    InvalidValue,
};
use crate::core::reader::{closed_records, read_records, Record};
use crate::core::traits::{DrugPolicy, MessageSink};
use crate::core::types::DrugPolicyEntry;

use super::{GameContext, CONTAINER_VERSION};

/// Why a drug record was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrugRecordError {
    MissingDrug,
    UnknownDrug(String),
    /// The drug exists but the policy has no row for it
    NotInPolicy(String),
    InvalidValue(InvalidValue),
}

impl fmt::Display for DrugRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrugRecordError::MissingDrug => write!(f, "Drug record has no drug"),
            DrugRecordError::UnknownDrug(name) => {
                write!(f, "Unable to load drug policy with drug of [{}]", name)
            }
            DrugRecordError::NotInPolicy(name) => {
                write!(f, "Drug policy has no entry for [{}]", name)
            }
            DrugRecordError::InvalidValue(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DrugRecordError {}

impl From<InvalidValue> for DrugRecordError {
    fn from(e: InvalidValue) -> Self {
        DrugRecordError::InvalidValue(e)
    }
}

/// Saves and loads one drug policy
pub struct DrugPolicyContainer<'a, P: DrugPolicy> {
    policy: &'a mut P,
    ctx: GameContext<'a>,
}

impl<'a, P: DrugPolicy> DrugPolicyContainer<'a, P> {
    pub fn new(policy: &'a mut P, ctx: GameContext<'a>) -> Self {
        Self { policy, ctx }
    }

    fn create_entry(&self, record: &Record) -> Result<DrugPolicyEntry, DrugRecordError> {
        let name = record
            .get(KEY_DRUG_DEF)
            .ok_or(DrugRecordError::MissingDrug)?
            .unwrap_or_default();
        let drug = self
            .ctx
            .defs
            .thing(name)
            .ok_or_else(|| DrugRecordError::UnknownDrug(name.to_string()))?;

        let mut entry = DrugPolicyEntry::new(drug);
        for (key, value) in record.iter() {
            match key {
                KEY_ALLOWED_FOR_ADDICTION => {
                    entry.allowed_for_addiction = require(key, value, parse_bool)?
                }
                KEY_ALLOWED_FOR_JOY => entry.allowed_for_joy = require(key, value, parse_bool)?,
                KEY_ALLOW_SCHEDULED => entry.allow_scheduled = require(key, value, parse_bool)?,
                KEY_DAYS_FREQUENCY => entry.days_frequency = require(key, value, parse_float)?,
                KEY_ONLY_IF_JOY_BELOW => {
                    entry.only_if_joy_below = require(key, value, parse_float)?
                }
                KEY_ONLY_IF_MOOD_BELOW => {
                    entry.only_if_mood_below = require(key, value, parse_float)?
                }
                KEY_TAKE_TO_INVENTORY => {
                    entry.take_to_inventory = require(key, value, parse_int)?
                }
                KEY_TAKE_TO_INVENTORY_TEMP_BUFFER => {
                    entry.take_to_inventory_temp_buffer = value.map(str::to_string)
                }
                _ => {}
            }
        }
        Ok(entry)
    }

    /// Overwrite every row for the entry's drug; returns how many matched
    fn replace_entry(&mut self, entry: &DrugPolicyEntry) -> usize {
        let mut matched = 0;
        for slot in self
            .policy
            .entries_mut()
            .iter_mut()
            .filter(|e| e.drug.def_name == entry.drug.def_name)
        {
            *slot = entry.clone();
            matched += 1;
        }
        matched
    }
}

impl<P: DrugPolicy> SaveableContainer for DrugPolicyContainer<'_, P> {
    const NAME: &'static str = "drugs";

    fn version(&self) -> Version {
        CONTAINER_VERSION
    }

    fn messages(&self) -> &dyn MessageSink {
        self.ctx.messages
    }

    fn save_fields<W: Write>(&self, writer: &mut FieldWriter<W>) -> io::Result<()> {
        writer.write_field(KEY_NAME, self.policy.label())?;

        for (i, entry) in self.policy.entries().iter().enumerate() {
            writer.write_field(KEY_DRUG_INDEX, i)?;
            writer.write_field(KEY_DRUG_DEF, &entry.drug.def_name)?;
            writer.write_field(KEY_ALLOWED_FOR_ADDICTION, format_bool(entry.allowed_for_addiction))?;
            writer.write_field(KEY_ALLOWED_FOR_JOY, format_bool(entry.allowed_for_joy))?;
            writer.write_field(KEY_ALLOW_SCHEDULED, format_bool(entry.allow_scheduled))?;
            writer.write_field(KEY_DAYS_FREQUENCY, round_to(entry.days_frequency, 1))?;
            writer.write_field(KEY_ONLY_IF_JOY_BELOW, round_to(entry.only_if_joy_below, 2))?;
            writer.write_field(KEY_ONLY_IF_MOOD_BELOW, round_to(entry.only_if_mood_below, 2))?;
            writer.write_field(KEY_TAKE_TO_INVENTORY, entry.take_to_inventory)?;
            writer.write_field(
                KEY_TAKE_TO_INVENTORY_TEMP_BUFFER,
                entry
                    .take_to_inventory_temp_buffer
                    .as_deref()
                    .unwrap_or_default(),
            )?;
            writer.write_separator()?;
        }
        Ok(())
    }

    fn load_fields<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        let records = read_records(reader)?;

        for record in closed_records(&records) {
            if let Some(name) = record.get(KEY_NAME) {
                self.policy.set_label(name.unwrap_or_default().to_string());
            }

            let result = self.create_entry(record).and_then(|entry| {
                match self.replace_entry(&entry) {
                    0 => Err(DrugRecordError::NotInPolicy(entry.drug.def_name)),
                    n => {
                        debug!(drug = %entry.drug.def_name, rows = n, "[drugs] Entry restored");
                        Ok(())
                    }
                }
            });
            if let Err(e) = result {
                self.ctx.skip_record(Self::NAME, &e, false);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::envelope::ContainerError;
    use crate::core::traits::mocks::{MockDefs, MockDrugPolicy, MockMessages, MockZones};
    use std::io::Cursor;

    struct Fixture {
        defs: MockDefs,
        zones: MockZones,
        messages: MockMessages,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                defs: MockDefs::new(),
                zones: MockZones::default(),
                messages: MockMessages::new(),
            }
        }

        fn ctx(&self) -> GameContext<'_> {
            GameContext::new(&self.defs, &self.zones, &self.messages)
        }

        fn save(&self, policy: &mut MockDrugPolicy) -> String {
            let container = DrugPolicyContainer::new(policy, self.ctx());
            let mut out = Vec::new();
            container.write_to(&mut out).unwrap();
            String::from_utf8(out).unwrap()
        }

        fn load(&self, policy: &mut MockDrugPolicy, text: &str) -> Result<(), ContainerError> {
            let mut container = DrugPolicyContainer::new(policy, self.ctx());
            container.read_from(Cursor::new(text.as_bytes()))
        }
    }

    fn social_policy() -> MockDrugPolicy {
        let mut policy = MockDrugPolicy::new("Social drugs", &["Beer", "Smokeleaf"]);
        let beer = &mut policy.entries[0];
        beer.allowed_for_joy = true;
        beer.days_frequency = 2.5;
        beer.only_if_mood_below = 0.333;
        beer.take_to_inventory = 2;
        policy
    }

    #[test]
    fn test_save_writes_name_then_rows() {
        let fx = Fixture::new();
        let mut policy = social_policy();
        let text = fx.save(&mut policy);
        assert_eq!(
            text,
            "Version:1.0\n\
             name:Social drugs\n\
             drug:0\n\
             defName:Beer\n\
             allowedForAddiction:False\n\
             allowedForJoy:True\n\
             allowScheduled:False\n\
             daysFrequency:2.5\n\
             onlyIfJoyBelow:1\n\
             onlyIfMoodBelow:0.33\n\
             takeToInventory:2\n\
             takeToInventoryTempBuffer:null\n\
             ---{{BREAK}}---\n\
             drug:1\n\
             defName:Smokeleaf\n\
             allowedForAddiction:False\n\
             allowedForJoy:False\n\
             allowScheduled:False\n\
             daysFrequency:1\n\
             onlyIfJoyBelow:1\n\
             onlyIfMoodBelow:1\n\
             takeToInventory:0\n\
             takeToInventoryTempBuffer:null\n\
             ---{{BREAK}}---\n"
        );
    }

    #[test]
    fn test_save_then_load_into_other_policy() {
        let fx = Fixture::new();
        let text = fx.save(&mut social_policy());

        let mut policy = MockDrugPolicy::new("Unrestricted", &["Beer", "Smokeleaf"]);
        fx.load(&mut policy, &text).unwrap();

        assert_eq!(policy.label, "Social drugs");
        let beer = &policy.entries[0];
        assert!(beer.allowed_for_joy);
        assert_eq!(beer.days_frequency, 2.5);
        assert_eq!(beer.only_if_mood_below, 0.33);
        assert_eq!(beer.take_to_inventory, 2);
        assert_eq!(policy.entries[1], DrugPolicyEntry::new(policy.entries[1].drug.clone()));
    }

    #[test]
    fn test_rows_are_never_added() {
        let fx = Fixture::new();
        let text = "Version:1.0\n\
                    defName:Gold\nallowedForJoy:True\n---{{BREAK}}---\n\
                    defName:Yayo\nallowedForJoy:True\n---{{BREAK}}---\n\
                    defName:Smokeleaf\nallowedForJoy:True\n---{{BREAK}}---\n";

        let mut policy = MockDrugPolicy::new("Social drugs", &["Beer", "Smokeleaf"]);
        fx.load(&mut policy, text).unwrap();

        let names: Vec<&str> = policy
            .entries
            .iter()
            .map(|e| e.drug.def_name.as_str())
            .collect();
        assert_eq!(names, vec!["Beer", "Smokeleaf"]);
        assert!(!policy.entries[0].allowed_for_joy);
        assert!(policy.entries[1].allowed_for_joy);
    }

    #[test]
    fn test_invalid_value_skips_only_that_row() {
        let fx = Fixture::new();
        let text = "Version:1.0\n\
                    defName:Beer\ntakeToInventory:two\n---{{BREAK}}---\n\
                    defName:Smokeleaf\ntakeToInventory:3\n---{{BREAK}}---\n";

        let mut policy = MockDrugPolicy::new("Social drugs", &["Beer", "Smokeleaf"]);
        fx.load(&mut policy, text).unwrap();
        assert_eq!(policy.entries[0].take_to_inventory, 0);
        assert_eq!(policy.entries[1].take_to_inventory, 3);
    }

    #[test]
    fn test_integer_days_frequency_still_loads() {
        let fx = Fixture::new();
        let mut policy = MockDrugPolicy::new("Social drugs", &["Beer"]);
        fx.load(
            &mut policy,
            "Version:1.0\ndefName:Beer\ndaysFrequency:3\n---{{BREAK}}---\n",
        )
        .unwrap();
        assert_eq!(policy.entries[0].days_frequency, 3.0);
    }

    #[test]
    fn test_null_name_clears_label() {
        let fx = Fixture::new();
        let mut policy = MockDrugPolicy::new("Social drugs", &["Beer"]);
        fx.load(&mut policy, "Version:1.0\nname:null\n---{{BREAK}}---\n")
            .unwrap();
        assert_eq!(policy.label, "");
    }

    #[test]
    fn test_temp_buffer_is_kept() {
        let fx = Fixture::new();
        let mut policy = MockDrugPolicy::new("Social drugs", &["Beer"]);
        fx.load(
            &mut policy,
            "Version:1.0\ndefName:Beer\ntakeToInventoryTempBuffer:5\n---{{BREAK}}---\n",
        )
        .unwrap();
        assert_eq!(
            policy.entries[0].take_to_inventory_temp_buffer.as_deref(),
            Some("5")
        );
    }

    #[test]
    fn test_version_mismatch_leaves_policy() {
        let fx = Fixture::new();
        let mut policy = social_policy();
        let before = policy.entries.clone();
        let result = fx.load(
            &mut policy,
            "Version:0.9\nname:Other\ndefName:Beer\n---{{BREAK}}---\n",
        );
        assert!(result.is_err());
        assert_eq!(policy.label, "Social drugs");
        assert_eq!(policy.entries, before);
    }
}
