//! Filter projection - batch edits of a thing filter's allow/disallow state
//!
//! Both the bill container and the filter-settings container restore the
//! same four filter fields. Lists are replaced wholesale: cleared, then
//! refilled with the saved names that still match a live definition. The
//! game is told about the change once, when the projection is finished.

use std::io::{self, Write};

use tracing::debug;

use super::constants::{
    FILTER_RANGE_DELIMITER, KEY_ALLOWED_DEFS, KEY_ALLOWED_HIT_POINTS, KEY_ALLOWED_QUALITIES,
    KEY_DISALLOWED_SPECIALS,
};
use super::format::{
    format_hit_points, format_qualities, join_names, parse_hit_points, parse_quality_range,
    require, split_names, FieldWriter, InvalidValue,
};
use super::traits::{DefDatabase, ThingFilter};

/// Write the four filter fields in file order
pub fn write_filter_fields<W: Write, F: ThingFilter + ?Sized>(
    writer: &mut FieldWriter<W>,
    filter: &F,
) -> io::Result<()> {
    let allowed = join_names(filter.allowed_defs().iter().map(|t| t.def_name.as_str()));
    writer.write_field(KEY_ALLOWED_DEFS, allowed)?;

    if filter.hit_points_configurable() {
        writer.write_field(
            KEY_ALLOWED_HIT_POINTS,
            format_hit_points(filter.allowed_hit_points()),
        )?;
    }

    if filter.qualities_configurable() {
        writer.write_field(
            KEY_ALLOWED_QUALITIES,
            format_qualities(filter.allowed_qualities()),
        )?;
    }

    let disallowed = join_names(
        filter
            .disallowed_special_filters()
            .iter()
            .map(|s| s.def_name.as_str()),
    );
    writer.write_field(KEY_DISALLOWED_SPECIALS, disallowed)
}

/// Mutable view over one filter for the duration of one load
pub struct FilterProjection<'a, F: ThingFilter + ?Sized> {
    filter: &'a mut F,
    changed: bool,
}

impl<'a, F: ThingFilter + ?Sized> FilterProjection<'a, F> {
    pub fn new(filter: &'a mut F) -> Self {
        Self {
            filter,
            changed: false,
        }
    }

    /// Replace the allowed list with the storable defs named in `names`
    ///
    /// Order follows the filter's storable list; unknown names are dropped.
    pub fn replace_allowed(&mut self, names: Option<&str>) {
        let universe = self.filter.storable_defs();
        let allowed = self.filter.allowed_defs_mut();
        allowed.clear();

        if let Some(names) = names {
            let expected = split_names(names);
            allowed.extend(
                universe
                    .into_iter()
                    .filter(|t| expected.contains(t.def_name.as_str())),
            );
        }

        self.changed = true;
    }

    /// Replace the disallowed special rules with the configurable ones named
    pub fn replace_disallowed_specials(&mut self, names: Option<&str>, defs: &dyn DefDatabase) {
        let disallowed = self.filter.disallowed_special_filters_mut();
        disallowed.clear();

        if let Some(names) = names.filter(|n| !n.is_empty()) {
            let expected = split_names(names);
            disallowed.extend(
                defs.special_filters()
                    .into_iter()
                    .filter(|s| s.configurable && expected.contains(s.def_name.as_str())),
            );
        }

        self.changed = true;
    }

    /// Set the hit point range from `min:max`; other shapes are ignored
    pub fn set_hit_points(&mut self, value: Option<&str>) -> Result<(), InvalidValue> {
        if !is_filter_range(value) {
            return Ok(());
        }
        let range = require(KEY_ALLOWED_HIT_POINTS, value, parse_hit_points)?;
        self.filter.set_allowed_hit_points(range);
        self.changed = true;
        Ok(())
    }

    /// Set the quality range from `min:max`; other shapes are ignored
    pub fn set_qualities(&mut self, value: Option<&str>) -> Result<(), InvalidValue> {
        if !is_filter_range(value) {
            return Ok(());
        }
        let range = require(KEY_ALLOWED_QUALITIES, value, |v| {
            parse_quality_range(v, FILTER_RANGE_DELIMITER)
        })?;
        self.filter.set_allowed_qualities(range);
        self.changed = true;
        Ok(())
    }

    /// Apply one field if it is a filter field
    ///
    /// Returns `Ok(false)` for keys this projection does not own.
    pub fn apply_field(
        &mut self,
        key: &str,
        value: Option<&str>,
        defs: &dyn DefDatabase,
    ) -> Result<bool, InvalidValue> {
        match key {
            KEY_ALLOWED_DEFS => self.replace_allowed(value),
            KEY_ALLOWED_HIT_POINTS => self.set_hit_points(value)?,
            KEY_ALLOWED_QUALITIES => self.set_qualities(value)?,
            KEY_DISALLOWED_SPECIALS => self.replace_disallowed_specials(value, defs),
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Record a change made outside the projection (priority, label, ...)
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Notify the game if anything changed; returns whether it did
    pub fn finish(self) -> bool {
        if self.changed {
            debug!("[filter] Settings changed, notifying");
            self.filter.settings_changed();
        }
        self.changed
    }
}

fn is_filter_range(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty() && v.contains(FILTER_RANGE_DELIMITER))
}
