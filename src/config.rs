// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into an [`AppConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ANKR_API_URL` | Aggregator JSON-RPC endpoint | Built from `ANKR_API_KEY` |
//! | `ANKR_API_KEY` | Aggregator key, used when `ANKR_API_URL` is unset | Required if no URL |
//! | `CHAIN_RPC_URL` | Endpoint for `eth_call` on the known-token path | Aggregator endpoint |
//! | `BLOCKCHAIN` | Aggregator chain identifier | `base` |
//! | `TOKEN_BALANCE_SOURCE` | `aggregator`, `known-tokens` or `quicknode` | `aggregator` |
//! | `QUICKNODE_PROVIDER_URL` | Endpoint for `qn_getWalletTokenBalance` | Required for `quicknode` |
//! | `KNOWN_TOKENS` | JSON array of `{address,symbol,name,decimals}` | Base WETH + USDbC |
//! | `UPSTREAM_TIMEOUT_SECS` | Hard upstream request timeout | `30` |
//! | `PUBLIC_BASE_URL` | Scheme and host used for `nextPageUrl` | Derived from request |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{net::SocketAddr, time::Duration};

use url::Url;

use crate::{
    blockchain::{
        aggregate::{KnownToken, KnownTokenList},
        amount::MAX_SCALE,
        types::DEFAULT_BLOCKCHAIN,
        upstream::DEFAULT_UPSTREAM_TIMEOUT,
    },
    services::BalanceSource,
};

/// Full aggregator endpoint. Takes precedence over `ANKR_API_KEY`.
pub const ANKR_API_URL_ENV: &str = "ANKR_API_URL";

/// Aggregator key appended to [`ANKR_MULTICHAIN_BASE_URL`].
pub const ANKR_API_KEY_ENV: &str = "ANKR_API_KEY";

pub const ANKR_MULTICHAIN_BASE_URL: &str = "https://rpc.ankr.com/multichain";

/// Plain EVM JSON-RPC endpoint for `eth_call`.
pub const CHAIN_RPC_URL_ENV: &str = "CHAIN_RPC_URL";

pub const BLOCKCHAIN_ENV: &str = "BLOCKCHAIN";

pub const TOKEN_BALANCE_SOURCE_ENV: &str = "TOKEN_BALANCE_SOURCE";

/// QuickNode endpoint with the Token API add-on enabled.
pub const QUICKNODE_PROVIDER_URL_ENV: &str = "QUICKNODE_PROVIDER_URL";

/// JSON array overriding the default known-token table.
///
/// # Example
/// `[{"address":"0x4200000000000000000000000000000000000006","symbol":"WETH","name":"Wrapped Ether","decimals":18}]`
pub const KNOWN_TOKENS_ENV: &str = "KNOWN_TOKENS";

pub const UPSTREAM_TIMEOUT_SECS_ENV: &str = "UPSTREAM_TIMEOUT_SECS";

/// Public origin used when building `nextPageUrl` behind a proxy.
pub const PUBLIC_BASE_URL_ENV: &str = "PUBLIC_BASE_URL";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// `json` selects JSON log lines; anything else is human readable.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: set {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Settings resolved at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub aggregator_url: String,
    pub chain_rpc_url: String,
    pub blockchain: String,
    pub balance_source: BalanceSource,
    pub quicknode_url: Option<String>,
    pub known_tokens: KnownTokenList,
    pub upstream_timeout: Duration,
    pub public_base_url: Option<Url>,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let aggregator_url = match (get(ANKR_API_URL_ENV), get(ANKR_API_KEY_ENV)) {
            (Some(url), _) => url,
            (None, Some(key)) => format!("{ANKR_MULTICHAIN_BASE_URL}/{key}"),
            (None, None) => return Err(ConfigError::Missing("ANKR_API_URL or ANKR_API_KEY")),
        };
        parse_url(ANKR_API_URL_ENV, &aggregator_url)?;

        let chain_rpc_url = match get(CHAIN_RPC_URL_ENV) {
            Some(url) => {
                parse_url(CHAIN_RPC_URL_ENV, &url)?;
                url
            }
            None => aggregator_url.clone(),
        };

        let blockchain = get(BLOCKCHAIN_ENV).unwrap_or_else(|| DEFAULT_BLOCKCHAIN.to_string());

        let balance_source = match get(TOKEN_BALANCE_SOURCE_ENV) {
            Some(raw) => raw.parse::<BalanceSource>().map_err(|reason| ConfigError::Invalid {
                name: TOKEN_BALANCE_SOURCE_ENV,
                reason,
            })?,
            None => BalanceSource::default(),
        };

        let quicknode_url = get(QUICKNODE_PROVIDER_URL_ENV)
            .map(|url| parse_url(QUICKNODE_PROVIDER_URL_ENV, &url).map(|_| url))
            .transpose()?;
        if balance_source == BalanceSource::QuickNode && quicknode_url.is_none() {
            return Err(ConfigError::Missing(QUICKNODE_PROVIDER_URL_ENV));
        }

        let known_tokens = match get(KNOWN_TOKENS_ENV) {
            Some(raw) => parse_known_tokens(&raw)?,
            None => KnownTokenList::base_defaults(),
        };

        let upstream_timeout = match get(UPSTREAM_TIMEOUT_SECS_ENV) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|e| ConfigError::Invalid {
                    name: UPSTREAM_TIMEOUT_SECS_ENV,
                    reason: format!("{e}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        name: UPSTREAM_TIMEOUT_SECS_ENV,
                        reason: "must be greater than zero".into(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_UPSTREAM_TIMEOUT,
        };

        let public_base_url = get(PUBLIC_BASE_URL_ENV)
            .map(|raw| parse_url(PUBLIC_BASE_URL_ENV, &raw))
            .transpose()?;

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: HOST_ENV,
                reason: format!("{e}"),
            })?;

        Ok(Self {
            aggregator_url,
            chain_rpc_url,
            blockchain,
            balance_source,
            quicknode_url,
            known_tokens,
            upstream_timeout,
            public_base_url,
            bind_addr,
        })
    }
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name,
        reason: format!("{e}"),
    })
}

fn parse_known_tokens(raw: &str) -> Result<KnownTokenList, ConfigError> {
    let tokens: Vec<KnownToken> = serde_json::from_str(raw).map_err(|e| ConfigError::Invalid {
        name: KNOWN_TOKENS_ENV,
        reason: format!("{e}"),
    })?;
    if let Some(bad) = tokens.iter().find(|t| crate::models::WalletAddress::parse(&t.address).is_err()) {
        return Err(ConfigError::Invalid {
            name: KNOWN_TOKENS_ENV,
            reason: format!("invalid token address {}", bad.address),
        });
    }
    if let Some(bad) = tokens.iter().find(|t| t.decimals > MAX_SCALE) {
        return Err(ConfigError::Invalid {
            name: KNOWN_TOKENS_ENV,
            reason: format!("{} decimals exceed {MAX_SCALE}", bad.symbol),
        });
    }
    Ok(KnownTokenList::new(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_from_api_key() {
        let cfg = config(&[("ANKR_API_KEY", "secret")]).unwrap();
        assert_eq!(cfg.aggregator_url, "https://rpc.ankr.com/multichain/secret");
        assert_eq!(cfg.chain_rpc_url, cfg.aggregator_url);
        assert_eq!(cfg.blockchain, "base");
        assert_eq!(cfg.balance_source, BalanceSource::Aggregator);
        assert_eq!(cfg.known_tokens, KnownTokenList::base_defaults());
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(30));
        assert!(cfg.public_base_url.is_none());
        assert!(cfg.quicknode_url.is_none());
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn test_url_takes_precedence_over_key() {
        let cfg = config(&[
            ("ANKR_API_URL", "http://localhost:9000/rpc"),
            ("ANKR_API_KEY", "ignored"),
            ("CHAIN_RPC_URL", "http://localhost:8545"),
        ])
        .unwrap();
        assert_eq!(cfg.aggregator_url, "http://localhost:9000/rpc");
        assert_eq!(cfg.chain_rpc_url, "http://localhost:8545");
    }

    #[test]
    fn test_missing_endpoint_is_error() {
        let err = config(&[("ANKR_API_KEY", "   ")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("ANKR_API_URL or ANKR_API_KEY"));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("ANKR_API_KEY", "k"),
            ("BLOCKCHAIN", "eth"),
            ("TOKEN_BALANCE_SOURCE", "known-tokens"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
            ("PUBLIC_BASE_URL", "https://wallet.example.com"),
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            (
                "KNOWN_TOKENS",
                r#"[{"address":"0x4200000000000000000000000000000000000006","symbol":"WETH","name":"Wrapped Ether","decimals":18}]"#,
            ),
        ])
        .unwrap();
        assert_eq!(cfg.blockchain, "eth");
        assert_eq!(cfg.balance_source, BalanceSource::KnownTokens);
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(5));
        assert_eq!(
            cfg.public_base_url.as_ref().map(Url::as_str),
            Some("https://wallet.example.com/")
        );
        assert_eq!(cfg.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(cfg.known_tokens.len(), 1);
    }

    #[test]
    fn test_invalid_values() {
        let cases: &[(&str, &str, &str)] = &[
            ("TOKEN_BALANCE_SOURCE", "covalent", "TOKEN_BALANCE_SOURCE"),
            ("UPSTREAM_TIMEOUT_SECS", "0", "UPSTREAM_TIMEOUT_SECS"),
            ("UPSTREAM_TIMEOUT_SECS", "soon", "UPSTREAM_TIMEOUT_SECS"),
            ("PORT", "99999", "PORT"),
            ("PUBLIC_BASE_URL", "not a url", "PUBLIC_BASE_URL"),
            ("KNOWN_TOKENS", "{}", "KNOWN_TOKENS"),
            (
                "KNOWN_TOKENS",
                r#"[{"address":"0x42","symbol":"X","name":"X","decimals":18}]"#,
                "KNOWN_TOKENS",
            ),
            (
                "KNOWN_TOKENS",
                r#"[{"address":"0x4200000000000000000000000000000000000006","symbol":"X","name":"X","decimals":70000}]"#,
                "KNOWN_TOKENS",
            ),
            ("QUICKNODE_PROVIDER_URL", "not a url", "QUICKNODE_PROVIDER_URL"),
        ];
        for (key, value, expected) in cases {
            match config(&[("ANKR_API_KEY", "k"), (*key, *value)]) {
                Err(ConfigError::Invalid { name, .. }) => assert_eq!(name, *expected),
                other => panic!("{key}={value}: expected invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_quicknode_source_requires_provider_url() {
        let err = config(&[("ANKR_API_KEY", "k"), ("TOKEN_BALANCE_SOURCE", "quicknode")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("QUICKNODE_PROVIDER_URL"));

        let cfg = config(&[
            ("ANKR_API_KEY", "k"),
            ("TOKEN_BALANCE_SOURCE", "quicknode"),
            ("QUICKNODE_PROVIDER_URL", "https://example.base-mainnet.quiknode.pro/token/"),
        ])
        .unwrap();
        assert_eq!(cfg.balance_source, BalanceSource::QuickNode);
        assert_eq!(
            cfg.quicknode_url.as_deref(),
            Some("https://example.base-mainnet.quiknode.pro/token/")
        );
    }
}
