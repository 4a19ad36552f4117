//! Core module - platform-independent codec and reconstruction

pub mod constants;
pub mod containers;
pub mod envelope;
pub mod filter;
pub mod format;
pub mod reader;
pub mod traits;
pub mod types;

pub use containers::{
    BillContainer, DrugPolicyContainer, FilterSettingsContainer, GameContext, OperationContainer,
    RepeatModeResolver,
};
pub use envelope::{BadHeader, ContainerError, SaveableContainer, Version};
pub use filter::FilterProjection;
pub use reader::{read_records, Record};
