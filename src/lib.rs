// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet Assets Server - token balance and NFT read API
//!
//! This crate serves wallet-centric read endpoints for an EVM chain by
//! querying a multichain JSON-RPC aggregator and reshaping its responses
//! into a stable client-facing schema.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - Balance scaling, asset normalization, pagination, upstream client
//! - `services` - Wallet asset queries used by the handlers
//! - `config` - Environment-driven configuration

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
