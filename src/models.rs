// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Client-facing entities produced by the normalization pipeline. All types
//! derive `Serialize` and `ToSchema` for JSON responses and OpenAPI
//! documentation. Field names are camelCase to keep the schema stable for
//! existing clients.
//!
//! ## Model Categories
//!
//! - **Addresses**: [`WalletAddress`], validated `0x` + 40 hex characters
//! - **Fungible tokens**: [`Token`]
//! - **NFTs**: [`Nft`], [`NftType`], [`Trait`], [`TraitValue`]

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use utoipa::ToSchema;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Ethereum-compatible wallet address wrapper.
///
/// Format: `0x` followed by 40 hexadecimal characters (20 bytes). The
/// original casing is preserved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String")]
pub struct WalletAddress(String);

/// Returned when a string is not a `0x` + 40 hex character address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid Ethereum address format: {0}")]
pub struct InvalidAddress(pub String);

impl WalletAddress {
    /// Validate and wrap an address.
    pub fn parse(raw: &str) -> Result<Self, InvalidAddress> {
        let valid = raw.len() == 42
            && raw.starts_with("0x")
            && raw[2..].chars().all(|c| c.is_ascii_hexdigit());
        if valid {
            Ok(WalletAddress(raw.to_string()))
        } else {
            Err(InvalidAddress(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = InvalidAddress;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        WalletAddress::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// Token Models
// =============================================================================

/// Token type reported when upstream does not say.
pub const DEFAULT_TOKEN_TYPE: &str = "ERC20";

/// A fungible token holding.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Contract address (zero address for the chain's native asset).
    pub address: String,
    /// Ticker symbol, e.g. `WETH`.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Power-of-ten scale applied to the raw balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    /// Token standard (`ERC20` unless upstream reports otherwise).
    #[serde(rename = "type")]
    pub token_type: String,
    /// Raw integer balance exactly as returned upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    /// Balance scaled by `decimals`, e.g. `"0.024897432"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_balance: Option<String>,
    /// Unit price in USD.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<String>,
    /// Holding value in USD.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_usd: Option<String>,
    /// Token logo URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

// =============================================================================
// NFT Models
// =============================================================================

/// Supported NFT contract standards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub enum NftType {
    #[serde(rename = "ERC721")]
    Erc721,
    #[serde(rename = "ERC1155")]
    Erc1155,
}

impl NftType {
    /// Exact, case-sensitive match on the upstream contract type.
    pub fn from_contract_type(raw: &str) -> Option<Self> {
        match raw {
            "ERC721" => Some(NftType::Erc721),
            "ERC1155" => Some(NftType::Erc1155),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NftType::Erc721 => "ERC721",
            NftType::Erc1155 => "ERC1155",
        }
    }
}

/// Attribute value as upstream typed it.
///
/// Serialized as a single string: strings pass through, everything else is
/// rendered as its JSON text (`7`, `true`, `{"a":1}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraitValue {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    Raw(Value),
}

impl TraitValue {
    pub fn to_display_string(&self) -> String {
        match self {
            TraitValue::String(s) => s.clone(),
            TraitValue::Number(n) => n.to_string(),
            TraitValue::Bool(b) => b.to_string(),
            TraitValue::Raw(v) => v.to_string(),
        }
    }
}

impl From<Value> for TraitValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => TraitValue::String(s),
            Value::Number(n) => TraitValue::Number(n),
            Value::Bool(b) => TraitValue::Bool(b),
            other => TraitValue::Raw(other),
        }
    }
}

impl Serialize for TraitValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_display_string())
    }
}

/// A single NFT attribute.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct Trait {
    pub trait_type: String,
    #[schema(value_type = String)]
    pub value: TraitValue,
}

/// A non-fungible asset held by a wallet.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Nft {
    pub contract_address: String,
    /// Token identifier as upstream formats it (decimal or hex).
    pub token_id: String,
    #[serde(rename = "type")]
    pub nft_type: NftType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Always present; empty when upstream has none.
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub attributes: Vec<Trait>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    /// Units held (ERC-1155).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}
