//! Filter-settings container - storage buildings, stockpiles, food
//! restrictions and apparel policies
//!
//! All of them are a single thing filter plus a few optional fields. The
//! file holds one record; a value that cannot be parsed skips that field
//! only.

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::core::constants::{KEY_COLOR, KEY_NAME, KEY_PRIORITY};
use crate::core::envelope::{SaveableContainer, Version};
use crate::core::filter::{write_filter_fields, FilterProjection};
use crate::core::format::{parse_color, require, FieldWriter, InvalidValue};
use crate::core::reader::read_records;
use crate::core::traits::{FilterSettingsTarget, MessageSink};
use crate::core::types::StoragePriority;

use super::{GameContext, CONTAINER_VERSION};

/// Saves and loads anything configured through one thing filter
pub struct FilterSettingsContainer<'a, T: FilterSettingsTarget> {
    target: &'a mut T,
    ctx: GameContext<'a>,
}

impl<'a, T: FilterSettingsTarget> FilterSettingsContainer<'a, T> {
    pub fn new(target: &'a mut T, ctx: GameContext<'a>) -> Self {
        Self { target, ctx }
    }

    /// Apply one of the target's own fields; returns whether it changed
    /// filter-relevant state
    fn apply_target_field(&mut self, key: &str, value: Option<&str>) -> Result<bool, InvalidValue> {
        match key {
            KEY_NAME => {
                self.target.set_label(value.unwrap_or_default().to_string());
                Ok(true)
            }
            KEY_COLOR => {
                let color = require(key, value, parse_color)?;
                self.target.set_color(color);
                Ok(false)
            }
            KEY_PRIORITY => {
                let priority = require(key, value, StoragePriority::from_name)?;
                self.target.set_priority(priority);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl<T: FilterSettingsTarget> SaveableContainer for FilterSettingsContainer<'_, T> {
    const NAME: &'static str = "settings";

    fn version(&self) -> Version {
        CONTAINER_VERSION
    }

    fn messages(&self) -> &dyn MessageSink {
        self.ctx.messages
    }

    fn save_fields<W: Write>(&self, writer: &mut FieldWriter<W>) -> io::Result<()> {
        if let Some(label) = self.target.label() {
            writer.write_field(KEY_NAME, label)?;
        }
        if let Some(color) = self.target.color() {
            writer.write_field(KEY_COLOR, color)?;
        }
        if let Some(priority) = self.target.priority() {
            writer.write_field(KEY_PRIORITY, priority)?;
        }
        write_filter_fields(writer, self.target.filter())
    }

    fn load_fields<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        let records = read_records(reader)?;
        let Some(record) = records.first() else {
            return Ok(());
        };
        if records.len() > 1 {
            debug!(
                records = records.len(),
                "[settings] Ignoring fields after the first record"
            );
        }

        let mut changed = false;
        for (key, value) in record.iter() {
            match self.apply_target_field(key, value) {
                Ok(c) => changed |= c,
                Err(e) => warn!(error = %e, "[settings] Skipping field"),
            }
        }

        let defs = self.ctx.defs;
        let mut projection = FilterProjection::new(self.target.filter_mut());
        if changed {
            projection.mark_changed();
        }
        for (key, value) in record.iter() {
            if let Err(e) = projection.apply_field(key, value, defs) {
                warn!(error = %e, "[settings] Skipping field");
            }
        }
        projection.finish();

        Ok(())
    }
}
