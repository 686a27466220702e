// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use url::Url;

use crate::services::WalletAssets;

#[derive(Clone)]
pub struct AppState {
    pub assets: Arc<WalletAssets>,
    /// Overrides the request origin when building `nextPageUrl`.
    pub public_base_url: Option<Url>,
}

impl AppState {
    pub fn new(assets: WalletAssets, public_base_url: Option<Url>) -> Self {
        Self {
            assets: Arc::new(assets),
            public_base_url,
        }
    }
}
