//! Search configuration: limits, primality rounds, order-check strategy and an
//! optional user modulus.
//!
//! Layering, lowest precedence first: built-in defaults, the `[search]` table
//! of a TOML file, then environment variables / CLI flags (applied by the
//! binary on top of whatever this module returns).
//!
//! ```toml
//! [search]
//! max_order = 5000000
//! mr_rounds = 30
//! check = "exhaustive"
//! modulus = [2, 1, 1]   # x^2 + x + 2, constant term first
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::primitive::OrderCheck;

/// Largest field order searched unless configured otherwise.
pub const DEFAULT_MAX_ORDER: u64 = 1_000_000;

/// Miller–Rabin rounds for classification.
pub const DEFAULT_MR_ROUNDS: u32 = 25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Upper bound on p^k; larger fields fail with `FieldTooLarge`.
    pub max_order: u64,
    pub mr_rounds: u32,
    pub check: OrderCheck,
    /// Defining polynomial for GF(p^k), constant term first, leading 1.
    pub modulus: Option<Vec<u64>>,
    /// Stop at the first generator.
    pub first_only: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_order: DEFAULT_MAX_ORDER,
            mr_rounds: DEFAULT_MR_ROUNDS,
            check: OrderCheck::default(),
            modulus: None,
            first_only: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    search: SearchConfig,
}

impl SearchConfig {
    /// Parse the `[search]` table of a TOML document. Missing keys keep their
    /// defaults; unknown keys are an error.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).context("invalid config TOML")?;
        file.search.validate()?;
        Ok(file.search)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_order < 2 {
            anyhow::bail!("search.max_order must be at least 2 (got {})", self.max_order);
        }
        if self.mr_rounds == 0 {
            anyhow::bail!("search.mr_rounds must be at least 1");
        }
        if let Some(modulus) = &self.modulus {
            if modulus.len() < 2 {
                anyhow::bail!("search.modulus needs at least two coefficients (degree >= 1)");
            }
            if modulus.last() != Some(&1) {
                anyhow::bail!(
                    "search.modulus must be monic: the last coefficient is {:?}, expected 1",
                    modulus.last()
                );
            }
        }
        Ok(())
    }
}

/// Parse a comma-separated coefficient list, constant term first: `"2,1,1"`.
pub fn parse_modulus(s: &str) -> Result<Vec<u64>> {
    s.split(',')
        .map(|c| {
            c.trim()
                .parse::<u64>()
                .with_context(|| format!("bad modulus coefficient {:?}", c.trim()))
        })
        .collect()
}
