//! Backend selection.
//!
//! The configuration can be layered the usual way: defaults, then `Yaogc.toml`, then
//! `YAOGC_`-prefixed environment variables (e.g. `YAOGC_SCHEME=row_reduction`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::{
    scheme::{GarblingScheme, SchemeKind},
    tables::TableLayout,
    Error,
};

/// Configuration file read by [`GarblingConfig::figment`].
pub const CONFIG_FILE: &str = "Yaogc.toml";
/// Prefix of the environment variables read by [`GarblingConfig::figment`].
pub const ENV_PREFIX: &str = "YAOGC_";

/// Selects the garbling backend and the layout of its tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GarblingConfig {
    /// How non-free gates are garbled.
    pub scheme: SchemeKind,
    /// How the garbled tables are stored.
    pub layout: TableLayout,
}

impl GarblingConfig {
    /// Creates a configuration from its parts.
    pub fn new(scheme: SchemeKind, layout: TableLayout) -> Self {
        Self { scheme, layout }
    }

    /// Defaults, merged with [`CONFIG_FILE`] and [`ENV_PREFIX`] variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(GarblingConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extracts the configuration from any figment.
    pub fn from_figment(figment: &Figment) -> Result<Self, Error> {
        figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Loads the configuration from [`GarblingConfig::figment`].
    pub fn load() -> Result<Self, Error> {
        Self::from_figment(&Self::figment())
    }

    /// Builds the configured backend.
    pub fn scheme(&self) -> Box<dyn GarblingScheme> {
        self.scheme.build()
    }
}
