//! Application configuration.
//!
//! Configuration comes entirely from the process environment (a `.env` file
//! is loaded into it by the binary before this runs):
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GRID_ENVIRONMENT` | `sandbox` or `production` | `sandbox` |
//! | `GRID_SANDBOX_API_KEY` | API key used in sandbox | required in sandbox |
//! | `GRID_PRODUCTION_API_KEY` | API key used in production | required in production |
//! | `GRID_BASE_URL` | Grid API host | `https://grid.squads.xyz` |
//! | `SOLANA_RPC_URL` | RPC endpoint override | devnet / mainnet-beta public RPC |
//! | `DEBUG` | `true` enables verbose output | `false` |

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Default Grid API host
pub const DEFAULT_BASE_URL: &str = "https://grid.squads.xyz";

pub const ENVIRONMENT_VAR: &str = "GRID_ENVIRONMENT";
pub const SANDBOX_API_KEY_VAR: &str = "GRID_SANDBOX_API_KEY";
pub const PRODUCTION_API_KEY_VAR: &str = "GRID_PRODUCTION_API_KEY";
pub const BASE_URL_VAR: &str = "GRID_BASE_URL";
pub const RPC_URL_VAR: &str = "SOLANA_RPC_URL";
pub const DEBUG_VAR: &str = "DEBUG";

const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";
const MAINNET_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

const DEVNET_USDC_MINT: &str = "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU";
const MAINNET_USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid GRID_ENVIRONMENT '{0}' - expected 'sandbox' or 'production'")]
    InvalidEnvironment(String),

    #[error(
        "{var} is not set. Add it to your environment or a .env file \
         (API keys are issued from the Grid dashboard) to use the {environment} environment."
    )]
    MissingApiKey {
        environment: Environment,
        var: &'static str,
    },
}

/// Grid environment. Each one is bound to a Solana cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }

    /// Name of the variable holding this environment's API key
    pub fn api_key_var(self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_API_KEY_VAR,
            Environment::Production => PRODUCTION_API_KEY_VAR,
        }
    }

    /// Cluster name as used by the block explorer
    pub fn cluster(self) -> &'static str {
        match self {
            Environment::Sandbox => "devnet",
            Environment::Production => "mainnet-beta",
        }
    }

    pub fn default_rpc_url(self) -> &'static str {
        match self {
            Environment::Sandbox => DEVNET_RPC_URL,
            Environment::Production => MAINNET_RPC_URL,
        }
    }

    /// USDC mint on this environment's cluster
    pub fn usdc_mint(self) -> &'static str {
        match self {
            Environment::Sandbox => DEVNET_USDC_MINT,
            Environment::Production => MAINNET_USDC_MINT,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Environment::Sandbox),
            "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub environment: Environment,
    api_key: String,
    pub base_url: String,
    pub rpc_url: String,
    pub debug: bool,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let environment = match get(ENVIRONMENT_VAR) {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };

        let var = environment.api_key_var();
        let api_key = get(var).ok_or(ConfigError::MissingApiKey { environment, var })?;

        let base_url = get(BASE_URL_VAR)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let rpc_url =
            get(RPC_URL_VAR).unwrap_or_else(|| environment.default_rpc_url().to_string());

        let debug = get(DEBUG_VAR)
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            environment,
            api_key,
            base_url,
            rpc_url,
            debug,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("rpc_url", &self.rpc_url)
            .field("debug", &self.debug)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults_to_sandbox() {
        let config = load(&[(SANDBOX_API_KEY_VAR, "sk_test")]).unwrap();
        assert_eq!(config.environment, Environment::Sandbox);
        assert_eq!(config.api_key(), "sk_test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.rpc_url, DEVNET_RPC_URL);
        assert!(!config.debug);
    }

    #[test]
    fn test_production_selects_production_key() {
        let config = load(&[
            (ENVIRONMENT_VAR, "Production"),
            (SANDBOX_API_KEY_VAR, "sk_test"),
            (PRODUCTION_API_KEY_VAR, "sk_live"),
        ])
        .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api_key(), "sk_live");
        assert_eq!(config.rpc_url, MAINNET_RPC_URL);
    }

    #[test]
    fn test_missing_key_names_variable() {
        let err = load(&[(ENVIRONMENT_VAR, "production"), (SANDBOX_API_KEY_VAR, "sk_test")])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingApiKey {
                environment: Environment::Production,
                var: PRODUCTION_API_KEY_VAR,
            }
        );
        assert!(err.to_string().contains("GRID_PRODUCTION_API_KEY"));
    }

    #[test]
    fn test_blank_key_is_missing() {
        assert!(load(&[(SANDBOX_API_KEY_VAR, "   ")]).is_err());
    }

    #[test]
    fn test_invalid_environment() {
        let err = load(&[(ENVIRONMENT_VAR, "staging"), (SANDBOX_API_KEY_VAR, "k")]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidEnvironment("staging".to_string()));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            (SANDBOX_API_KEY_VAR, "k"),
            (BASE_URL_VAR, "http://localhost:8080/"),
            (RPC_URL_VAR, "http://localhost:8899"),
            (DEBUG_VAR, "TRUE"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.rpc_url, "http://localhost:8899");
        assert!(config.debug);
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let config = load(&[(SANDBOX_API_KEY_VAR, "sk_secret_value")]).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk_secret_value"));
    }

    #[test]
    fn test_environment_network_binding() {
        assert_eq!(Environment::Sandbox.cluster(), "devnet");
        assert_eq!(Environment::Production.cluster(), "mainnet-beta");
        assert_ne!(
            Environment::Sandbox.usdc_mint(),
            Environment::Production.usdc_mint()
        );
    }
}
