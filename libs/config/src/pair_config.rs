//! Pair Configuration Module
//!
//! Provides the creation-time parameters of a pair: fee tier per curve
//! variant, oracle ring geometry and the chain id bound into permit
//! signatures. Supports loading from TOML files with environment-specific
//! overrides. A pair reads these once at creation and never again.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::protocol::MAX_FEE_BPS;

/// Main pair configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PairConfig {
    /// Swap fee tiers
    pub fees: FeeSettings,

    /// TWAP observation ring
    pub oracle: OracleSettings,

    /// Signature-based approval domain
    pub permit: PermitSettings,
}

/// Swap fee tiers, fixed into each pair at creation
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct FeeSettings {
    /// Fee for stable-curve pairs in basis points (2 = 0.02%)
    pub stable_fee_bps: u64,
    /// Fee for volatile-curve pairs in basis points (20 = 0.2%)
    pub volatile_fee_bps: u64,
}

/// Observation ring geometry
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct OracleSettings {
    /// Span covered by the whole ring, in seconds
    pub window_size: u64,
    /// Number of slots in the ring
    pub granularity: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct PermitSettings {
    pub chain_id: u64,
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self {
            stable_fee_bps: 2,
            volatile_fee_bps: 20,
        }
    }
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            window_size: 86_400, // 24h
            granularity: 12,
        }
    }
}

impl Default for PermitSettings {
    fn default() -> Self {
        Self { chain_id: 1 }
    }
}

impl OracleSettings {
    /// Seconds covered by a single observation slot
    pub fn period_size(&self) -> u64 {
        if self.granularity == 0 {
            return 0;
        }
        self.window_size / self.granularity
    }
}

impl PairConfig {
    /// Load configuration from files with environment overrides
    ///
    /// Layers, lowest precedence first: `base_path` (default
    /// `config/pair.toml`), `environments/<env>.toml` next to the base file,
    /// then `PAIR_`-prefixed environment variables with `__` between nested
    /// keys (`PAIR_FEES__STABLE_FEE_BPS=4`).
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base = base_path.unwrap_or(Path::new("config/pair.toml"));

        let mut builder = Config::builder().add_source(File::from(base).required(true));

        // Add environment-specific overrides if specified
        if let Some(env) = environment {
            let env_file = base
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("config"))
                .join("environments")
                .join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("PAIR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: PairConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        debug!("Loaded pair configuration: {:?}", config);
        Ok(config)
    }

    /// Fee tier for the given curve variant
    pub fn fee_bps(&self, stable: bool) -> u64 {
        if stable {
            self.fees.stable_fee_bps
        } else {
            self.fees.volatile_fee_bps
        }
    }

    /// Reject parameter sets a pair cannot be created with
    pub fn validate(&self) -> Result<()> {
        let fees = &self.fees;
        if fees.stable_fee_bps > MAX_FEE_BPS || fees.volatile_fee_bps > MAX_FEE_BPS {
            bail!(
                "fee tiers {}/{} bps exceed maximum of {} bps",
                fees.stable_fee_bps,
                fees.volatile_fee_bps,
                MAX_FEE_BPS
            );
        }
        if fees.stable_fee_bps > fees.volatile_fee_bps {
            bail!(
                "stable fee {} bps must not exceed volatile fee {} bps",
                fees.stable_fee_bps,
                fees.volatile_fee_bps
            );
        }

        let oracle = &self.oracle;
        if oracle.granularity <= 1 {
            bail!("oracle granularity must be > 1, got {}", oracle.granularity);
        }
        if oracle.window_size % oracle.granularity != 0 {
            bail!(
                "oracle window {}s is not evenly divisible by granularity {}",
                oracle.window_size,
                oracle.granularity
            );
        }
        if oracle.period_size() == 0 {
            bail!("oracle period size must be non-zero");
        }

        Ok(())
    }
}

/// Convenience function to load configuration with defaults
pub fn load_config(environment: Option<&str>) -> Result<PairConfig> {
    PairConfig::load(None, environment)
}
