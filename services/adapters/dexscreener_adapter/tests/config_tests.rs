//! Configuration file loading

use config::{Dex, RankBy};
use dexscreener_adapter::DexScreenerConfig;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[query]
rank_by = "volume"

[query.filters]
dex_ids = ["pumpswap", "raydium"]

[query.filters.liquidity]
min = 25000

[stream]
top_tokens = 3
"#
    )
    .unwrap();

    let config = DexScreenerConfig::from_toml_file(file.path()).unwrap();

    assert_eq!(config.query.rank_by, RankBy::Volume);
    assert_eq!(config.query.filters.dex_ids, vec![Dex::PumpSwap, Dex::Raydium]);
    assert_eq!(config.stream.top_tokens, 3);

    let url = config.websocket_url();
    assert!(url.contains("rankBy[key]=volume"));
    assert!(url.contains("filters[liquidity][min]=25000"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config =
        DexScreenerConfig::from_toml_with_env_overrides(dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.stream.cycle_delay_ms, 5_000);
    assert_eq!(config.stream.top_tokens, 10);
}

#[test]
fn test_malformed_file_reports_path() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[stream\ncycle_delay_ms = ").unwrap();

    let error = DexScreenerConfig::from_toml_file(file.path()).unwrap_err();
    assert!(error
        .to_string()
        .contains(&file.path().display().to_string()));
}

#[test]
fn test_shipped_config_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/dexscreener.toml");
    let config = DexScreenerConfig::from_toml_file(path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config, DexScreenerConfig::default());
}
