// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Normalization of upstream asset records into [`Token`] and [`Nft`].
//!
//! Upstream shapes differ per source: the aggregator's asset list carries a
//! decimal `balanceRawInteger`, while `eth_call` yields a hex word. Both are
//! funnelled through [`UpstreamAsset`] so the zero filter and decimal scaling
//! behave identically.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::amount::{AmountError, RawBalance};
use super::types::NATIVE_TOKEN_ADDRESS;
use crate::models::{Nft, NftType, Token, Trait, TraitValue, DEFAULT_TOKEN_TYPE};

/// Errors raised while normalizing token records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("Invalid balance for token {contract}: {source}")]
    InvalidEncoding {
        contract: String,
        #[source]
        source: AmountError,
    },
}

/// Source-neutral fungible token record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpstreamAsset {
    pub contract_address: Option<String>,
    pub symbol: String,
    pub name: String,
    pub decimals: Option<u32>,
    pub token_type: Option<String>,
    pub balance: Option<RawBalance>,
    pub price_usd: Option<String>,
    pub balance_usd: Option<String>,
    pub thumbnail: Option<String>,
}

/// One entry of `ankr_getAccountBalance`'s `assets` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalanceAsset {
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_symbol: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_name: String,
    #[serde(default)]
    pub token_decimals: Option<u32>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub balance_raw_integer: Option<String>,
    #[serde(default)]
    pub token_price: Option<String>,
    #[serde(default)]
    pub balance_usd: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// `result` of `ankr_getAccountBalance`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalancePage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub assets: Vec<AccountBalanceAsset>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub next_page_token: String,
}

impl From<AccountBalanceAsset> for UpstreamAsset {
    fn from(asset: AccountBalanceAsset) -> Self {
        UpstreamAsset {
            contract_address: non_empty(asset.contract_address),
            symbol: asset.token_symbol,
            name: asset.token_name,
            decimals: asset.token_decimals,
            token_type: non_empty(asset.token_type),
            balance: asset.balance_raw_integer.map(RawBalance::Decimal),
            price_usd: non_empty(asset.token_price),
            balance_usd: non_empty(asset.balance_usd),
            thumbnail: non_empty(asset.thumbnail),
        }
    }
}

/// One entry of the `qn_getWalletTokenBalance` result list.
///
/// `balance` may arrive as hex or decimal text depending on the endpoint
/// version, so the radix is taken from the prefix.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletTokenRecord {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub balance: Option<String>,
    #[serde(default, rename = "type")]
    pub token_type: Option<String>,
}

impl From<WalletTokenRecord> for UpstreamAsset {
    fn from(record: WalletTokenRecord) -> Self {
        UpstreamAsset {
            contract_address: non_empty(record.address),
            symbol: record.symbol,
            name: record.name,
            decimals: record.decimals,
            token_type: non_empty(record.token_type),
            balance: non_empty(record.balance).map(RawBalance::detect),
            ..Default::default()
        }
    }
}

/// One NFT attribute as upstream sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamTrait {
    #[serde(default, deserialize_with = "null_as_default")]
    pub trait_type: String,
    #[serde(default)]
    pub value: Value,
}

/// One entry of `ankr_getNFTsByOwner`'s `assets` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamNftAsset {
    #[serde(default, deserialize_with = "null_as_default")]
    pub contract_address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contract_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub token_url: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub traits: Vec<UpstreamTrait>,
}

/// `result` of `ankr_getNFTsByOwner`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftsByOwnerPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub assets: Vec<UpstreamNftAsset>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub next_page_token: String,
}

/// Map upstream token records into [`Token`]s, preserving input order.
///
/// With `include_zero == false`, records whose raw balance is literally
/// `"0"` or `"0x0"` are dropped. Records without a balance are kept and
/// carry no balance fields.
pub fn normalize_tokens<I>(assets: I, include_zero: bool) -> Result<Vec<Token>, NormalizeError>
where
    I: IntoIterator<Item = UpstreamAsset>,
{
    let mut tokens = Vec::new();

    for asset in assets {
        if !include_zero && asset.balance.as_ref().is_some_and(RawBalance::is_literal_zero) {
            continue;
        }

        let address = asset
            .contract_address
            .unwrap_or_else(|| NATIVE_TOKEN_ADDRESS.to_string());

        let formatted_balance = match (&asset.balance, asset.decimals) {
            (Some(raw), Some(decimals)) => Some(raw.to_decimal_string(decimals).map_err(
                |source| NormalizeError::InvalidEncoding {
                    contract: address.clone(),
                    source,
                },
            )?),
            _ => None,
        };

        tokens.push(Token {
            address,
            symbol: asset.symbol,
            name: asset.name,
            decimals: asset.decimals,
            token_type: asset
                .token_type
                .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
            balance: asset.balance.map(|raw| raw.as_str().to_string()),
            formatted_balance,
            price_usd: asset.price_usd,
            balance_usd: asset.balance_usd,
            thumbnail: asset.thumbnail,
        });
    }

    Ok(tokens)
}

/// Map upstream NFT records into [`Nft`]s, preserving input order.
///
/// Records whose contract type is not exactly `ERC721` or `ERC1155` are
/// dropped.
pub fn normalize_nfts<I>(assets: I) -> Vec<Nft>
where
    I: IntoIterator<Item = UpstreamNftAsset>,
{
    assets
        .into_iter()
        .filter_map(|asset| {
            let nft_type = NftType::from_contract_type(&asset.contract_type)?;
            Some(Nft {
                contract_address: asset.contract_address,
                token_id: asset.token_id,
                nft_type,
                name: asset.name,
                description: asset.description.unwrap_or_default(),
                image: asset.image_url,
                attributes: asset
                    .traits
                    .into_iter()
                    .map(|t| Trait {
                        trait_type: t.trait_type,
                        value: TraitValue::from(t.value),
                    })
                    .collect(),
                collection: asset.collection_name,
                token_uri: asset.token_url,
                quantity: asset.quantity,
            })
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::upstream::decode_result;
    use serde_json::json;

    fn hex_asset(address: &str, balance: Option<&str>) -> UpstreamAsset {
        UpstreamAsset {
            contract_address: Some(address.to_string()),
            symbol: "TKN".into(),
            name: "Token".into(),
            decimals: Some(18),
            balance: balance.map(|b| RawBalance::Hex(b.to_string())),
            ..Default::default()
        }
    }

    fn nft_asset(contract_type: &str) -> UpstreamNftAsset {
        decode_result(
            "ankr_getNFTsByOwner",
            json!({
                "contractAddress": "0x1111111111111111111111111111111111111111",
                "contractType": contract_type,
                "tokenId": "42",
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_filter_is_textual_and_order_preserving() {
        let assets = vec![
            hex_asset("0xa", Some("0x1")),
            hex_asset("0xb", Some("0x0")),
            hex_asset("0xc", Some("0")),
            hex_asset("0xd", Some("0x00")),
            hex_asset("0xe", None),
            hex_asset("0xf", Some("0x2")),
        ];

        let tokens = normalize_tokens(assets.clone(), false).unwrap();
        let kept: Vec<&str> = tokens.iter().map(|t| t.address.as_str()).collect();
        assert_eq!(kept, vec!["0xa", "0xd", "0xe", "0xf"]);

        let all = normalize_tokens(assets, true).unwrap();
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_token_type_defaults_to_erc20() {
        let mut native = hex_asset("0xa", Some("0x1"));
        native.token_type = Some("NATIVE".into());
        let tokens = normalize_tokens(vec![hex_asset("0xb", Some("0x1")), native], true).unwrap();
        assert_eq!(tokens[0].token_type, "ERC20");
        assert_eq!(tokens[1].token_type, "NATIVE");
    }

    #[test]
    fn test_missing_balance_yields_no_balance_fields() {
        let tokens = normalize_tokens(vec![hex_asset("0xa", None)], false).unwrap();
        assert_eq!(tokens[0].balance, None);
        assert_eq!(tokens[0].formatted_balance, None);
    }

    #[test]
    fn test_missing_decimals_skips_formatting() {
        let mut asset = hex_asset("0xa", Some("0x10"));
        asset.decimals = None;
        let tokens = normalize_tokens(vec![asset], false).unwrap();
        assert_eq!(tokens[0].balance.as_deref(), Some("0x10"));
        assert_eq!(tokens[0].formatted_balance, None);
    }

    #[test]
    fn test_zero_balance_formats_as_zero_when_included() {
        let tokens = normalize_tokens(vec![hex_asset("0xa", Some("0x0"))], true).unwrap();
        assert_eq!(tokens[0].formatted_balance.as_deref(), Some("0"));
    }

    #[test]
    fn test_malformed_balance_is_invalid_encoding() {
        let err = normalize_tokens(vec![hex_asset("0xa", Some("0xnope"))], true).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidEncoding { ref contract, .. } if contract == "0xa"));
    }

    #[test]
    fn test_account_balance_page_decodes_and_normalizes() {
        let page: AccountBalancePage = decode_result(
            "ankr_getAccountBalance",
            json!({
                "totalBalanceUsd": "1.23",
                "nextPageToken": "cursor-1",
                "assets": [
                    {
                        "blockchain": "base",
                        "tokenName": "Ether",
                        "tokenSymbol": "ETH",
                        "tokenDecimals": 18,
                        "tokenType": "NATIVE",
                        "holderAddress": "0x4200000000000000000000000000000000000006",
                        "balance": "0.024897432",
                        "balanceRawInteger": "24897432000000000",
                        "balanceUsd": "61.2",
                        "tokenPrice": "2460.1",
                        "thumbnail": ""
                    },
                    {
                        "blockchain": "base",
                        "tokenName": "USD Base Coin",
                        "tokenSymbol": "USDbC",
                        "tokenDecimals": 6,
                        "tokenType": "ERC20",
                        "contractAddress": "0xd9aAEc86B65D86f6A7B5B1b0c42FFA531710b6CA",
                        "balanceRawInteger": "0",
                        "balanceUsd": "0"
                    }
                ]
            }),
        )
        .unwrap();
        assert_eq!(page.next_page_token, "cursor-1");

        let tokens =
            normalize_tokens(page.assets.into_iter().map(UpstreamAsset::from), false).unwrap();
        assert_eq!(tokens.len(), 1);
        let eth = &tokens[0];
        assert_eq!(eth.address, NATIVE_TOKEN_ADDRESS);
        assert_eq!(eth.token_type, "NATIVE");
        assert_eq!(eth.balance.as_deref(), Some("24897432000000000"));
        assert_eq!(eth.formatted_balance.as_deref(), Some("0.024897432"));
        assert_eq!(eth.price_usd.as_deref(), Some("2460.1"));
        assert_eq!(eth.thumbnail, None);
    }

    #[test]
    fn test_account_balance_page_rejects_wrong_shape() {
        let err = decode_result::<AccountBalancePage>(
            "ankr_getAccountBalance",
            json!({"assets": "not-a-list"}),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::blockchain::upstream::UpstreamError::Decode { .. }
        ));
    }

    #[test]
    fn test_nfts_filtered_by_exact_contract_type() {
        let assets = vec![
            nft_asset("ERC721"),
            nft_asset("erc721"),
            nft_asset(""),
            nft_asset("ERC1155"),
            nft_asset("ERC20"),
        ];
        let nfts = normalize_nfts(assets);
        let types: Vec<NftType> = nfts.iter().map(|n| n.nft_type).collect();
        assert_eq!(types, vec![NftType::Erc721, NftType::Erc1155]);
    }

    #[test]
    fn test_nft_fields_are_carried_over() {
        let page: NftsByOwnerPage = decode_result(
            "ankr_getNFTsByOwner",
            json!({
                "owner": "0x4200000000000000000000000000000000000006",
                "nextPageToken": "",
                "assets": [{
                    "blockchain": "base",
                    "name": "Punk #7",
                    "tokenId": "7",
                    "tokenUrl": "ipfs://meta/7",
                    "imageUrl": "ipfs://img/7",
                    "collectionName": "Punks",
                    "symbol": "PUNK",
                    "contractType": "ERC721",
                    "contractAddress": "0x2222222222222222222222222222222222222222",
                    "quantity": "1",
                    "traits": [
                        {"trait_type": "Hat", "value": "Cap"},
                        {"trait_type": "Level", "value": 5},
                        {"trait_type": "Tags", "value": ["a", "b"]}
                    ]
                }]
            }),
        )
        .unwrap();

        let nfts = normalize_nfts(page.assets);
        assert_eq!(nfts.len(), 1);
        let nft = &nfts[0];
        assert_eq!(nft.contract_address, "0x2222222222222222222222222222222222222222");
        assert_eq!(nft.token_id, "7");
        assert_eq!(nft.name.as_deref(), Some("Punk #7"));
        assert_eq!(nft.description, "");
        assert_eq!(nft.image.as_deref(), Some("ipfs://img/7"));
        assert_eq!(nft.collection.as_deref(), Some("Punks"));
        assert_eq!(nft.token_uri.as_deref(), Some("ipfs://meta/7"));
        assert_eq!(nft.quantity.as_deref(), Some("1"));

        assert_eq!(nft.attributes.len(), 3);
        assert_eq!(nft.attributes[0].value, TraitValue::String("Cap".into()));
        assert!(matches!(nft.attributes[1].value, TraitValue::Number(_)));
        assert_eq!(nft.attributes[2].value.to_display_string(), r#"["a","b"]"#);
    }

    #[test]
    fn test_explicit_nulls_decode_as_defaults() {
        let page: AccountBalancePage = decode_result(
            "ankr_getAccountBalance",
            json!({
                "nextPageToken": null,
                "assets": [{
                    "tokenSymbol": null,
                    "tokenName": null,
                    "tokenDecimals": null,
                    "contractAddress": "0xa",
                    "balanceRawInteger": "5"
                }]
            }),
        )
        .unwrap();
        assert_eq!(page.next_page_token, "");
        assert_eq!(page.assets[0].token_symbol, "");
        assert_eq!(page.assets[0].token_name, "");

        let empty: AccountBalancePage =
            decode_result("ankr_getAccountBalance", json!({"assets": null})).unwrap();
        assert!(empty.assets.is_empty());
    }

    #[test]
    fn test_null_trait_type_and_nft_fields_decode_as_empty() {
        let page: NftsByOwnerPage = decode_result(
            "ankr_getNFTsByOwner",
            json!({
                "nextPageToken": null,
                "assets": [{
                    "contractAddress": null,
                    "contractType": "ERC721",
                    "tokenId": null,
                    "traits": [{"trait_type": null, "value": "Gold"}]
                }, {
                    "contractAddress": "0x1",
                    "contractType": null,
                    "tokenId": "1",
                    "traits": null
                }]
            }),
        )
        .unwrap();
        assert_eq!(page.next_page_token, "");

        let nfts = normalize_nfts(page.assets);
        assert_eq!(nfts.len(), 1);
        assert_eq!(nfts[0].contract_address, "");
        assert_eq!(nfts[0].token_id, "");
        assert_eq!(nfts[0].attributes[0].trait_type, "");
        assert_eq!(nfts[0].attributes[0].value, TraitValue::String("Gold".into()));
    }

    #[test]
    fn test_wallet_token_records_normalize_like_aggregator_assets() {
        let records: Vec<WalletTokenRecord> = decode_result(
            "qn_getWalletTokenBalance",
            json!([
                {
                    "address": "0x4200000000000000000000000000000000000006",
                    "symbol": "WETH",
                    "name": "Wrapped Ether",
                    "decimals": 18,
                    "balance": "0x58c5d239f3c7",
                    "type": ""
                },
                {
                    "address": "0xd9aAEc86B65D86f6A7B5B1b0c42FFA531710b6CA",
                    "symbol": null,
                    "name": "USD Base Coin",
                    "decimals": 6,
                    "balance": "0"
                },
                {
                    "address": "0x3333333333333333333333333333333333333333",
                    "symbol": "BIG",
                    "name": "Big",
                    "decimals": 2,
                    "balance": "12345",
                    "type": "ERC777"
                }
            ]),
        )
        .unwrap();

        let tokens =
            normalize_tokens(records.into_iter().map(UpstreamAsset::from), false).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].symbol, "WETH");
        assert_eq!(tokens[0].token_type, "ERC20");
        assert_eq!(tokens[0].formatted_balance.as_deref(), Some("0.000097606658814919"));
        assert_eq!(tokens[1].token_type, "ERC777");
        assert_eq!(tokens[1].formatted_balance.as_deref(), Some("123.45"));
    }

    #[test]
    fn test_oversized_decimals_are_invalid_encoding() {
        let mut asset = hex_asset("0xa", Some("0x1"));
        asset.decimals = Some(3_000_000);
        let err = normalize_tokens(vec![asset], true).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::InvalidEncoding {
                source: AmountError::InvalidEncoding { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_nft_description_is_kept_when_present() {
        let asset: UpstreamNftAsset = decode_result(
            "ankr_getNFTsByOwner",
            json!({
                "contractAddress": "0x1",
                "contractType": "ERC1155",
                "tokenId": "0x01",
                "description": "A thing",
                "name": ""
            }),
        )
        .unwrap();
        let nft = &normalize_nfts(vec![asset])[0];
        assert_eq!(nft.description, "A thing");
        // provided-but-empty stays as provided
        assert_eq!(nft.name.as_deref(), Some(""));
        assert_eq!(nft.image, None);
    }
}
