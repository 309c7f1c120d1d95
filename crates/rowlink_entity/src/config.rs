//! Entity configuration.

use serde::{Deserialize, Serialize};

use crate::xlink::RemovalMode;

/// Configuration applied to a [`BusinessEntity`](crate::BusinessEntity) and
/// the tables of its store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Whether writing an unknown column creates it.
    pub auto_create_columns: bool,
    /// Removal mode used when neither the call nor the link spec names one.
    pub default_removal: RemovalMode,
    /// Whether [`dump`](crate::BusinessEntity::dump) pretty-prints.
    pub pretty_dump: bool,
    /// Whether every field write is logged at debug level.
    pub log_field_writes: bool,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            auto_create_columns: true,
            default_removal: RemovalMode::LinkRecordOnly,
            pretty_dump: true,
            log_field_writes: false,
        }
    }
}

impl EntityConfig {
    /// Configuration that rejects writes to undeclared columns.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            auto_create_columns: false,
            ..Self::default()
        }
    }

    /// Sets column auto-creation.
    #[must_use]
    pub const fn with_auto_create_columns(mut self, enabled: bool) -> Self {
        self.auto_create_columns = enabled;
        self
    }

    /// Sets the fallback removal mode.
    #[must_use]
    pub const fn with_default_removal(mut self, mode: RemovalMode) -> Self {
        self.default_removal = mode;
        self
    }

    /// Sets whether dumps are pretty-printed.
    #[must_use]
    pub const fn with_pretty_dump(mut self, pretty: bool) -> Self {
        self.pretty_dump = pretty;
        self
    }

    /// Sets whether field writes are logged.
    #[must_use]
    pub const fn with_log_field_writes(mut self, enabled: bool) -> Self {
        self.log_field_writes = enabled;
        self
    }
}
