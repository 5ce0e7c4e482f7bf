//! Engine configuration: TOML on disk, environment overrides, and the
//! deployment constants the decoders/topology layer need but can't derive
//! from account data (program ids, cache sizing, logging setup).
//!
//! Loading pattern follows the rest of this codebase's conventions: read a
//! TOML file, deserialize with `serde`, then let a handful of env vars
//! override individual fields before a final `validate()` pass.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::decode::account::ProgramIds;
use crate::topology::VenuePrograms;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid pubkey in field {field}: {value}")]
    InvalidPubkey { field: String, value: String },
    #[error("{0}")]
    Invalid(String),
}

/// On-disk program-id set, base58 strings until [`ProgramsConfig::resolve`]
/// turns them into real `Pubkey`s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramsConfig {
    pub raydium_v4_program: String,
    pub raydium_clmm_program: String,
    pub meteora_dlmm_program: String,
    pub fee_program: String,
    pub fee_config_seed_program: String,
    pub pumpswap_global_config: String,
}

impl ProgramsConfig {
    fn parse_field(field: &str, value: &str) -> Result<Pubkey, ConfigError> {
        Pubkey::from_str(value).map_err(|_| ConfigError::InvalidPubkey {
            field: field.to_string(),
            value: value.to_string(),
        })
    }

    pub fn resolve(&self, bin_array_radius: i64) -> Result<(ProgramIds, VenuePrograms), ConfigError> {
        let raydium_v4_program = Self::parse_field("raydium_v4_program", &self.raydium_v4_program)?;
        let raydium_clmm_program =
            Self::parse_field("raydium_clmm_program", &self.raydium_clmm_program)?;
        let meteora_dlmm_program =
            Self::parse_field("meteora_dlmm_program", &self.meteora_dlmm_program)?;
        let fee_program = Self::parse_field("fee_program", &self.fee_program)?;
        let fee_config_seed_program =
            Self::parse_field("fee_config_seed_program", &self.fee_config_seed_program)?;
        let pumpswap_global_config =
            Self::parse_field("pumpswap_global_config", &self.pumpswap_global_config)?;

        let program_ids = ProgramIds { raydium_v4: raydium_v4_program };
        let venue_programs = VenuePrograms {
            raydium_v4_program,
            raydium_clmm_program,
            meteora_dlmm_program,
            fee_program,
            fee_config_seed_program,
            pumpswap_global_config,
            bin_array_radius,
        };
        Ok((program_ids, venue_programs))
    }
}

/// Per-kind cache capacity. Mirrors `cache::store::CacheStore::DEFAULT_CAPACITY`
/// (16_384) but lets each kind be tuned independently — tick-array and
/// bin-array churn is driven by price, not pool count, so they warrant a
/// different default than the pool/vault maps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheConfig {
    pub max_pools: usize,
    pub max_vaults: usize,
    pub max_tick_arrays: usize,
    pub max_bin_arrays: usize,
    pub max_configs: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_pools: 16_384,
            max_vaults: 16_384,
            max_tick_arrays: 16_384,
            max_bin_arrays: 16_384,
            max_configs: 4_096,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive string, e.g. `"info"` or
    /// `"pool_state_engine=debug,info"`.
    pub filter: String,
    /// Directory daily-rolled JSON log files are written under. `None`
    /// disables the file layer and logs to stdout only.
    pub log_dir: Option<String>,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            log_dir: None,
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub programs: ProgramsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Radius (in arrays either side of the active one) the MeteoraDlmm
    /// topology resolver freezes around `activeId`. Exposed here rather
    /// than hardcoded since it trades coverage against freeze cost.
    #[serde(default = "default_bin_array_radius")]
    pub bin_array_radius: i64,
    /// RPC endpoint the bootstrap fetcher hits for accounts the live
    /// ingress stream hasn't delivered yet.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
}

fn default_bin_array_radius() -> i64 {
    1
}

fn default_rpc_url() -> String {
    "https://api.mainnet-beta.solana.com".to_string()
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: EngineConfig = toml::from_str(&raw)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Env-var overrides, same shape as the rest of this codebase's config
    /// layering: `POOL_STATE_ENGINE_LOG_FILTER` wins over the file value
    /// when set.
    fn apply_env_overrides(&mut self) {
        if let Ok(filter) = std::env::var("POOL_STATE_ENGINE_LOG_FILTER") {
            self.logging.filter = filter;
        }
        if let Ok(dir) = std::env::var("POOL_STATE_ENGINE_LOG_DIR") {
            self.logging.log_dir = Some(dir);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bin_array_radius < 0 {
            return Err(ConfigError::Invalid(
                "bin_array_radius must be non-negative".to_string(),
            ));
        }
        if self.cache.max_pools == 0 {
            return Err(ConfigError::Invalid(
                "cache.max_pools must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_toml() -> &'static str {
        r#"
        [programs]
        raydium_v4_program = "11111111111111111111111111111111111111111"
        raydium_clmm_program = "11111111111111111111111111111111111111111"
        meteora_dlmm_program = "11111111111111111111111111111111111111111"
        fee_program = "11111111111111111111111111111111111111111"
        fee_config_seed_program = "11111111111111111111111111111111111111111"
        pumpswap_global_config = "11111111111111111111111111111111111111111"
        "#
    }

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config: EngineConfig = toml::from_str(sample_toml()).unwrap();
        assert_eq!(config.bin_array_radius, 1);
        assert_eq!(config.cache.max_pools, 16_384);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.rpc_url, "https://api.mainnet-beta.solana.com");
    }

    #[test]
    fn resolves_program_ids() {
        let config: EngineConfig = toml::from_str(sample_toml()).unwrap();
        let (program_ids, venue_programs) = config.programs.resolve(config.bin_array_radius).unwrap();
        assert_eq!(program_ids.raydium_v4, venue_programs.raydium_v4_program);
        assert_eq!(venue_programs.bin_array_radius, 1);
    }

    #[test]
    fn rejects_malformed_pubkey() {
        let mut config: EngineConfig = toml::from_str(sample_toml()).unwrap();
        config.programs.raydium_v4_program = "not-a-pubkey".to_string();
        let err = config.programs.resolve(1).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPubkey { .. }));
    }

    #[test]
    fn rejects_negative_bin_array_radius() {
        let mut config: EngineConfig = toml::from_str(sample_toml()).unwrap();
        config.bin_array_radius = -1;
        assert!(config.validate().is_err());
    }
}
