//! Format constants - sentinels, field keys, built-in definition names
//!
//! Everything that ends up verbatim in a settings file lives here so the
//! writers and readers cannot drift apart.

// =============================================================================
// SENTINELS
// =============================================================================

/// Line marking the end of one record and the start of the next
pub const SEPARATOR: &str = "---{{BREAK}}---";

/// Token written in place of an empty or absent value
pub const NULL_TOKEN: &str = "null";

/// Key of the leading envelope field (compared case-insensitively on load)
pub const VERSION_KEY: &str = "version";

/// Written by some text editors in front of the first line; skipped on read
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// Key actually written by the envelope
pub const VERSION_KEY_WRITTEN: &str = "Version";

/// Joins definition names inside list-valued fields
pub const LIST_DELIMITER: char = '/';

/// Joins the two ends of a scalar range field (`skillRange`, `hpRange`, ...)
pub const RANGE_DELIMITER: char = '~';

/// Joins the two ends of a filter range field (`allowedQualities`, ...)
pub const FILTER_RANGE_DELIMITER: char = ':';

// =============================================================================
// SHARED FILTER KEYS
// =============================================================================

pub const KEY_NAME: &str = "name";
pub const KEY_COLOR: &str = "color";
pub const KEY_PRIORITY: &str = "priority";
pub const KEY_ALLOWED_DEFS: &str = "allowedDefs";
pub const KEY_ALLOWED_HIT_POINTS: &str = "allowedHitPointsPercents";
pub const KEY_ALLOWED_QUALITIES: &str = "allowedQualities";
pub const KEY_DISALLOWED_SPECIALS: &str = "disallowedSpecialFilters";

// =============================================================================
// BILL KEYS
// =============================================================================

pub const KEY_RECIPE: &str = "recipeDefName";
pub const KEY_RECIPE_UFT: &str = "recipeDefNameUft";
pub const KEY_SUSPENDED: &str = "suspended";
pub const KEY_COUNT_EQUIPPED: &str = "countEquipped";
pub const KEY_COUNT_TAINTED: &str = "countTainted";
pub const KEY_SKILL_RANGE: &str = "skillRange";
pub const KEY_SEARCH_RADIUS: &str = "ingSearchRadius";
pub const KEY_REPEAT_MODE: &str = "repeatMode";
pub const KEY_REPEAT_COUNT: &str = "repeatCount";
pub const KEY_TARGET_COUNT: &str = "targetCount";
pub const KEY_PAUSE_WHEN_SATISFIED: &str = "pauseWhenSatisfied";
pub const KEY_UNPAUSE_WHEN_YOU_HAVE: &str = "unpauseWhenYouHave";
pub const KEY_HP_RANGE: &str = "hpRange";
pub const KEY_QUALITY_RANGE: &str = "qualityRange";
pub const KEY_ONLY_ALLOWED_INGREDIENTS: &str = "onlyAllowedIngredients";
pub const KEY_STORE_MODE: &str = "storeMode";
pub const KEY_STORE_ZONE: &str = "storeZone";
pub const KEY_LOOK_IN: &str = "lookIn";

/// Maximum number of bills a work table can hold
pub const BILL_STACK_MAX_COUNT: usize = 15;

// =============================================================================
// DRUG POLICY KEYS
// =============================================================================

pub const KEY_DRUG_INDEX: &str = "drug";
pub const KEY_DRUG_DEF: &str = "defName";
pub const KEY_ALLOWED_FOR_ADDICTION: &str = "allowedForAddiction";
pub const KEY_ALLOWED_FOR_JOY: &str = "allowedForJoy";
pub const KEY_ALLOW_SCHEDULED: &str = "allowScheduled";
pub const KEY_DAYS_FREQUENCY: &str = "daysFrequency";
pub const KEY_ONLY_IF_JOY_BELOW: &str = "onlyIfJoyBelow";
pub const KEY_ONLY_IF_MOOD_BELOW: &str = "onlyIfMoodBelow";
pub const KEY_TAKE_TO_INVENTORY: &str = "takeToInventory";
pub const KEY_TAKE_TO_INVENTORY_TEMP_BUFFER: &str = "takeToInventoryTempBuffer";

// =============================================================================
// OPERATION KEYS
// =============================================================================

pub const KEY_PART: &str = "part";

/// Recipes whose name starts with this remove a part the pawn still has
pub const REMOVAL_PREFIX: &str = "Remove";

/// Recipes whose name starts with this install into any part of the body
pub const INSTALLATION_PREFIX: &str = "Install";

// =============================================================================
// BUILT-IN DEFINITION NAMES
// =============================================================================

pub const REPEAT_MODE_FOREVER: &str = "Forever";
pub const REPEAT_MODE_REPEAT_COUNT: &str = "RepeatCount";
pub const REPEAT_MODE_TARGET_COUNT: &str = "TargetCount";

/// Repeat modes only present when the "Everybody Gets One" mod is loaded
pub const EXTENSION_REPEAT_MODES: [&str; 3] =
    ["TD_ColonistCount", "TD_XPerColonist", "TD_WithSurplusIng"];

pub const STORE_MODE_BEST_STOCKPILE: &str = "BestStockpile";
pub const STORE_MODE_DROP_ON_FLOOR: &str = "DropOnFloor";
pub const STORE_MODE_SPECIFIC_STOCKPILE: &str = "SpecificStockpile";
