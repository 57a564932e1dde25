//! Session configuration, optionally read from `glyph.toml`.
//!
//! Searches the current directory then its ancestors. A missing file means
//! every setting keeps its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "glyph.toml";

/// Largest accepted float mantissa precision, in bits.
pub const MAX_FLOAT_PREC: u32 = 1 << 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Settings the evaluator reads on every float construction and random draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mantissa precision, in bits, for newly created floats.
    pub float_prec: u32,
    /// Index origin: 0 or 1.
    pub origin: i64,
    /// 0 means decimal with C-style prefixes.
    pub input_base: u32,
    /// 0 means decimal.
    pub output_base: u32,
    pub seed: u64,
    /// 0 disables the check.
    pub max_bits: u64,
    /// 0 disables the check.
    pub max_digits: u64,
    pub max_stack: usize,
    /// Significant digits shown when printing floats.
    pub float_digits: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            float_prec: 256,
            origin: 1,
            input_base: 0,
            output_base: 0,
            seed: 0,
            max_bits: 1_000_000,
            max_digits: 10_000,
            max_stack: 100_000,
            float_digits: 12,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `glyph.toml`, searching the current dir then its parents.
    /// Returns `Default` when no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn find() -> Option<PathBuf> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.exists() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_FLOAT_PREC).contains(&self.float_prec) {
            return Err(ConfigError::Invalid(format!(
                "float_prec must be between 1 and {}, got {}",
                MAX_FLOAT_PREC, self.float_prec
            )));
        }
        if self.origin != 0 && self.origin != 1 {
            return Err(ConfigError::Invalid(format!(
                "origin must be 0 or 1, got {}",
                self.origin
            )));
        }
        for (name, base) in [("input_base", self.input_base), ("output_base", self.output_base)] {
            if base != 0 && !(2..=36).contains(&base) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be 0 or between 2 and 36, got {}",
                    name, base
                )));
            }
        }
        if self.max_stack == 0 {
            return Err(ConfigError::Invalid("max_stack must be positive".into()));
        }
        if self.float_digits == 0 {
            return Err(ConfigError::Invalid("float_digits must be positive".into()));
        }
        Ok(())
    }

    /// Effective output radix (decimal when unset).
    pub fn output_radix(&self) -> u32 {
        if self.output_base == 0 {
            10
        } else {
            self.output_base
        }
    }

    // The builders clamp out-of-range settings to the nearest valid one,
    // so a chain of them always passes `validate`.

    pub fn with_float_prec(mut self, bits: u32) -> Self {
        self.float_prec = bits.clamp(1, MAX_FLOAT_PREC);
        self
    }

    pub fn with_origin(mut self, origin: i64) -> Self {
        self.origin = origin.clamp(0, 1);
        self
    }

    /// 0 keeps decimal output.
    pub fn with_output_base(mut self, base: u32) -> Self {
        self.output_base = if base == 0 { 0 } else { base.clamp(2, 36) };
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_bits(mut self, bits: u64) -> Self {
        self.max_bits = bits;
        self
    }

    pub fn with_max_digits(mut self, digits: u64) -> Self {
        self.max_digits = digits;
        self
    }

    pub fn with_max_stack(mut self, depth: usize) -> Self {
        self.max_stack = depth.max(1);
        self
    }

    pub fn with_float_digits(mut self, digits: usize) -> Self {
        self.float_digits = digits.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.float_prec, 256);
        assert_eq!(cfg.origin, 1);
        assert_eq!(cfg.max_bits, 1_000_000);
        assert_eq!(cfg.output_radix(), 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = Config::from_toml_str("origin = 0\nfloat_prec = 64\n").unwrap();
        assert_eq!(cfg.origin, 0);
        assert_eq!(cfg.float_prec, 64);
        assert_eq!(cfg.max_stack, 100_000);
    }

    #[test]
    fn test_rejects_bad_origin() {
        let err = Config::from_toml_str("origin = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_base() {
        let bad = Config {
            output_base: 1,
            ..Config::new()
        };
        assert!(bad.validate().is_err());
        assert!(Config::new().with_output_base(16).validate().is_ok());
    }

    #[test]
    fn test_builders_clamp_into_range() {
        let cfg = Config::new()
            .with_float_prec(0)
            .with_origin(7)
            .with_output_base(99)
            .with_max_stack(0)
            .with_float_digits(0);
        assert_eq!(cfg.float_prec, 1);
        assert_eq!(cfg.origin, 1);
        assert_eq!(cfg.output_base, 36);
        assert_eq!(cfg.max_stack, 1);
        assert_eq!(cfg.float_digits, 1);
        assert!(cfg.validate().is_ok());
        assert_eq!(Config::new().with_float_prec(u32::MAX).float_prec, MAX_FLOAT_PREC);
        assert_eq!(Config::new().with_origin(-3).origin, 0);
        assert_eq!(Config::new().with_output_base(1).output_base, 2);
    }

    #[test]
    fn test_rejects_huge_float_prec() {
        let err = Config::from_toml_str("float_prec = 4000000000").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml_str("origin = \"one\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "seed = 42\nmax_bits = 8").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.max_bits, 8);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load_from(Path::new("/nonexistent/glyph.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
