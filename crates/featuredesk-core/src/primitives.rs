//! # Fixed Limits and Names
//!
//! Constants compiled into the binary. Validation, storage, config and
//! the CLI read from here.

/// Maximum length of a feature name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length of a feature status, in characters.
pub const MAX_STATUS_LENGTH: usize = 50;

/// Maximum length of a feature category, in characters.
pub const MAX_CATEGORY_LENGTH: usize = 50;

/// Maximum length of an icon class string, in characters.
pub const MAX_ICON_LENGTH: usize = 200;

/// Name of the one table FeatureDesk owns.
pub const FEATURES_TABLE: &str = "Features";

/// Connection string used when none is configured.
pub const DEFAULT_CONNECTION_STRING: &str = "sqlite://featuredesk.db";

/// Statuses the seed data and UI know about, with their display colour.
pub const STATUS_COLORS: [(&str, &str); 3] =
    [("Active", "green"), ("Pending", "yellow"), ("Disabled", "red")];

/// Display colour of a status. Matching is exact; anything unknown is gray.
#[must_use]
pub fn status_color(status: &str) -> &'static str {
    STATUS_COLORS
        .iter()
        .find(|&&(known, _)| known == status)
        .map_or("gray", |&(_, color)| color)
}
