//! Containers - one save/load unit per record shape
//!
//! Each container borrows its live target for the duration of one call and
//! reads game state through a [`GameContext`].

pub mod bill;
pub mod drug_policy;
pub mod filter_settings;
pub mod operation;

pub use bill::{BillContainer, BillRecordError, RepeatModeResolver};
pub use drug_policy::{DrugPolicyContainer, DrugRecordError};
pub use filter_settings::FilterSettingsContainer;
pub use operation::{OperationContainer, OperationRecordError};

use tracing::warn;

use super::envelope::Version;
use super::traits::{DefDatabase, MessageKind, MessageSink, ZoneLookup};

/// Format version shared by every container
pub const CONTAINER_VERSION: Version = Version::new(1, 0);

/// Game services a container consults while loading
#[derive(Clone, Copy)]
pub struct GameContext<'a> {
    pub defs: &'a dyn DefDatabase,
    pub zones: &'a dyn ZoneLookup,
    pub messages: &'a dyn MessageSink,
}

impl<'a> GameContext<'a> {
    pub fn new(
        defs: &'a dyn DefDatabase,
        zones: &'a dyn ZoneLookup,
        messages: &'a dyn MessageSink,
    ) -> Self {
        Self {
            defs,
            zones,
            messages,
        }
    }

    /// Log a dropped record, and tell the player when `toast` is set
    pub(crate) fn skip_record(&self, component: &str, reason: &dyn std::fmt::Display, toast: bool) {
        warn!(reason = %reason, "[{}] Skipping record", component);
        if toast {
            self.messages
                .message(&reason.to_string(), MessageKind::SilentInput);
        }
    }
}
