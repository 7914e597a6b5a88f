use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::protocol::gadgets::MAX_BIT_WIDTH;
use crate::{Error, OpeningMode, Result};

/// Environment variable naming the scenario file.
pub const CONFIG_PATH_VAR: &str = "BUDGET_ZKP_CONFIG_PATH";

/// Scenario file used when [`CONFIG_PATH_VAR`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/scenario.toml";

/// Prefix of environment variables overriding scenario fields.
pub const ENV_PREFIX: &str = "BUDGET_ZKP_";

/// Prime-order group to run the protocols over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GroupChoice {
    /// Ristretto255 over Curve25519.
    #[default]
    Ristretto255,
    /// NIST P-256.
    P256,
}

/// One proving run: the secrets, their range and the public linear system.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Bit width `N`; every value must lie in `[0, 2^N)`.
    pub bit_width: usize,
    /// Opening used by the range proof.
    pub opening: OpeningMode,
    /// Group to run over.
    pub group: GroupChoice,
    /// Secret values `x`.
    pub values: Vec<u64>,
    /// Public matrix `A`, one row per equation.
    pub matrix: Vec<Vec<i64>>,
    /// Public right-hand side `b`.
    pub rhs: Vec<i64>,
    /// Session context bound into every transcript.
    pub context: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            bit_width: 16,
            opening: OpeningMode::InnerProduct,
            group: GroupChoice::Ristretto255,
            values: vec![10, 20, 30, 40],
            matrix: vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 10, 11, 12]],
            rhs: vec![300, 700, 1100],
            context: "budget-zkp-demo".to_string(),
        }
    }
}

impl ScenarioConfig {
    /// Loads configuration from the file named by [`CONFIG_PATH_VAR`] and the environment.
    ///
    /// Configuration priority: environment variables > TOML file > defaults.
    /// A `.env` file is read first if present. A file named by
    /// [`CONFIG_PATH_VAR`] must exist; [`DEFAULT_CONFIG_PATH`] may be absent.
    ///
    /// # Environment Variable Examples
    /// ```bash
    /// BUDGET_ZKP_CONFIG_PATH=config/scenario.toml
    /// BUDGET_ZKP_BIT_WIDTH=32
    /// BUDGET_ZKP_GROUP=p256
    /// BUDGET_ZKP_OPENING=explicit
    /// ```
    ///
    /// # Errors
    /// Returns [`Error::Config`] if a source is missing or malformed.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_path(path),
            Err(_) => Self::load(Path::new(DEFAULT_CONFIG_PATH), false),
        }
    }

    /// Loads configuration from `path` and the environment.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `path` does not exist or is malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(path.as_ref(), true)
    }

    fn load(path: &Path, required: bool) -> Result<Self> {
        use figment::providers::{Env, Format, Serialized, Toml};
        use figment::Figment;

        if required && !path.is_file() {
            return Err(Error::Config(format!(
                "Scenario file not found: {}",
                path.display()
            )));
        }

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config_path"]))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Checks that the scenario describes a well-formed proving run.
    ///
    /// # Errors
    /// Returns [`Error::Config`] describing the first violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.values.is_empty() {
            return Err(Error::Config("At least one value is required".to_string()));
        }
        if self.bit_width == 0 || self.bit_width > MAX_BIT_WIDTH {
            return Err(Error::Config(format!(
                "bit_width must be in 1..={MAX_BIT_WIDTH}, got {}",
                self.bit_width
            )));
        }
        if self.matrix.is_empty() {
            return Err(Error::Config("matrix needs at least one row".to_string()));
        }
        if let Some((i, row)) = self
            .matrix
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.values.len())
        {
            return Err(Error::Config(format!(
                "matrix row {i} has {} columns, expected {}",
                row.len(),
                self.values.len()
            )));
        }
        if self.rhs.len() != self.matrix.len() {
            return Err(Error::Config(format!(
                "rhs has {} entries, expected {}",
                self.rhs.len(),
                self.matrix.len()
            )));
        }
        Ok(())
    }
}
