//! Stream query: which pairs the screener pushes and in what order
//!
//! The query is encoded entirely in the stream URL. Parameter names use the
//! bracketed form the screener expects and are emitted unescaped, in a fixed
//! order, so the same configuration always yields the same URL.

use crate::service::dexscreener::STREAM_BASE_URL;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| anyhow!("unknown {} {:?}", stringify!($name), s))
            }
        }
    };
}

wire_enum! {
    /// Supported chains
    Chain {
        Solana => "solana",
        Ethereum => "ethereum",
        Base => "base",
        Bsc => "bsc",
        Polygon => "polygon",
        Arbitrum => "arbitrum",
        Optimism => "optimism",
        Avalanche => "avalanche",
    }
}

wire_enum! {
    /// Ranking window of the stream
    Timeframe {
        M5 => "m5",
        H1 => "h1",
        H6 => "h6",
        H24 => "h24",
    }
}

wire_enum! {
    RankBy {
        TrendingScoreH6 => "trendingScoreH6",
        Volume => "volume",
        Transactions => "txns",
        PriceChangeH24 => "priceChangeH24",
        PriceChangeH6 => "priceChangeH6",
        PriceChangeH1 => "priceChangeH1",
        Liquidity => "liquidity",
        Fdv => "fdv",
        MarketCap => "marketCap",
    }
}

wire_enum! {
    Order {
        Desc => "desc",
        Asc => "asc",
    }
}

wire_enum! {
    /// DEX identifiers across the supported chains
    Dex {
        Raydium => "raydium",
        PumpFun => "pumpfun",
        PumpSwap => "pumpswap",
        Orca => "orca",
        Jupiter => "jupiter",
        Meteora => "meteora",
        UniswapV2 => "uniswap",
        UniswapV3 => "uniswapv3",
        SushiSwap => "sushiswap",
        PancakeSwap => "pancakeswap",
        Aerodrome => "aerodrome",
        BaseSwap => "baseswap",
    }
}

/// Optional lower and upper bound of one filter
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: fmt::Display> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    fn push(&self, key: &str, params: &mut Vec<(String, String)>) {
        if let Some(min) = &self.min {
            params.push((format!("{key}[min]"), min.to_string()));
        }
        if let Some(max) = &self.max {
            params.push((format!("{key}[max]"), max.to_string()));
        }
    }
}

/// Bounds for the 24h, 6h and 1h windows of one metric
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct WindowedBounds<T> {
    pub h24: Bounds<T>,
    pub h6: Bounds<T>,
    pub h1: Bounds<T>,
}

impl<T: fmt::Display> WindowedBounds<T> {
    fn push(&self, key: &str, params: &mut Vec<(String, String)>) {
        self.h24.push(&format!("{key}[h24]"), params);
        self.h6.push(&format!("{key}[h6]"), params);
        self.h1.push(&format!("{key}[h1]"), params);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub chain_ids: Vec<Chain>,
    pub dex_ids: Vec<Dex>,

    pub liquidity: Bounds<u64>,
    pub volume: WindowedBounds<u64>,
    pub txns: WindowedBounds<u64>,
    /// Hours
    pub pair_age: Bounds<u64>,
    pub price_change: WindowedBounds<f64>,
    pub fdv: Bounds<u64>,
    pub market_cap: Bounds<u64>,

    pub enhanced_token_info: bool,
    pub active_boosts_min: Option<u64>,
    pub recent_purchased_impressions_min: Option<u64>,

    /// Launchpad filters, hours
    pub max_age: Option<u64>,
    pub profile: Option<u8>,
    pub max_launchpad_progress: Option<f64>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            chain_ids: vec![Chain::Solana],
            dex_ids: Vec::new(),
            liquidity: Bounds::default(),
            volume: WindowedBounds::default(),
            txns: WindowedBounds::default(),
            pair_age: Bounds::default(),
            price_change: WindowedBounds::default(),
            fdv: Bounds::default(),
            market_cap: Bounds::default(),
            enhanced_token_info: false,
            active_boosts_min: None,
            recent_purchased_impressions_min: None,
            max_age: None,
            profile: None,
            max_launchpad_progress: None,
        }
    }
}

impl Filters {
    /// Query parameters in their fixed emission order
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        for (i, chain) in self.chain_ids.iter().enumerate() {
            params.push((format!("filters[chainIds][{i}]"), chain.to_string()));
        }
        for (i, dex) in self.dex_ids.iter().enumerate() {
            params.push((format!("filters[dexIds][{i}]"), dex.to_string()));
        }

        self.liquidity.push("filters[liquidity]", &mut params);
        self.volume.push("filters[volume]", &mut params);
        self.txns.push("filters[txns]", &mut params);
        self.pair_age.push("filters[pairAge]", &mut params);
        self.price_change.push("filters[priceChange]", &mut params);
        self.fdv.push("filters[fdv]", &mut params);
        self.market_cap.push("filters[marketCap]", &mut params);

        if self.enhanced_token_info {
            params.push(("filters[enhancedTokenInfo]".into(), "true".into()));
        }
        if let Some(min) = self.active_boosts_min {
            params.push(("filters[activeBoosts][min]".into(), min.to_string()));
        }
        if let Some(min) = self.recent_purchased_impressions_min {
            params.push(("filters[recentPurchasedImpressions][min]".into(), min.to_string()));
        }

        if let Some(max_age) = self.max_age {
            params.push(("maxAge".into(), max_age.to_string()));
        }
        if let Some(profile) = self.profile {
            params.push(("profile".into(), profile.to_string()));
        }
        if let Some(progress) = self.max_launchpad_progress {
            params.push(("maxLaunchpadProgress".into(), progress.to_string()));
        }

        params
    }
}

/// Ranking and filtering of the pairs stream
///
/// The default is the trending Solana list over 24h, ranked by the 6h
/// trending score, descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub timeframe: Timeframe,
    pub rank_by: RankBy,
    pub order: Order,
    pub filters: Filters,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::H24,
            rank_by: RankBy::TrendingScoreH6,
            order: Order::Desc,
            filters: Filters::default(),
        }
    }
}

impl QueryConfig {
    pub fn build_websocket_url(&self) -> String {
        self.build_url_with_base(STREAM_BASE_URL)
    }

    /// Same query against a different stream endpoint
    pub fn build_url_with_base(&self, base: &str) -> String {
        let mut params = vec![
            ("rankBy[key]".to_string(), self.rank_by.to_string()),
            ("rankBy[order]".to_string(), self.order.to_string()),
        ];
        params.extend(self.filters.to_query_params());

        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}/{}/1?{}",
            base.trim_end_matches('/'),
            self.timeframe,
            query
        )
    }
}
