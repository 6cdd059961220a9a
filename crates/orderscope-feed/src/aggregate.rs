//! View aggregation: upstream records in, sorted view rows out.
//!
//! Pure functions, no I/O. Unit conversions happen here: open interest
//! arrives in base currency and is priced into USD, 24h change is derived
//! from mark vs open, and builder rows join the sweep results against the
//! broker name roster.

use std::collections::HashMap;

use orderscope_core::records::{AggregateVolumeStats, BrokerName, FuturesTicker, VaultInfo};
use orderscope_core::views::{BuilderRow, MarketRow, NetworkStats};

use crate::sweep::SweepItem;

/// Reshape tickers into market rows, sorted by 24h USD volume descending.
pub fn build_market_rows(tickers: &[FuturesTicker]) -> Vec<MarketRow> {
    let mut rows: Vec<MarketRow> = tickers
        .iter()
        .map(|t| {
            let change_24h = if t.mark_price != 0.0 && t.open_24h != 0.0 {
                (t.mark_price - t.open_24h) / t.open_24h
            } else {
                0.0
            };
            // Open interest is base quantity; price it with mark, falling
            // back to index for markets without a mark yet.
            let price = if t.mark_price != 0.0 {
                t.mark_price
            } else {
                t.index_price
            };

            MarketRow {
                symbol: t.symbol.clone(),
                index_price: t.index_price,
                mark_price: t.mark_price,
                change_24h,
                volume_24h: t.amount_24h,
                open_interest_usd: t.open_interest * price,
                funding_rate: t.est_funding_rate,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.volume_24h.total_cmp(&a.volume_24h));
    rows
}

/// Join sweep results against the broker name roster, sorted by 30d volume
/// descending. Items that failed or came back empty are dropped; brokers
/// missing from the name roster fall back to their id.
pub fn build_builder_rows(names: &[BrokerName], sweep: &[SweepItem]) -> Vec<BuilderRow> {
    let name_map: HashMap<&str, &str> = names
        .iter()
        .map(|n| (n.broker_id.as_str(), n.broker_name.as_str()))
        .collect();

    let mut rows: Vec<BuilderRow> = sweep
        .iter()
        .filter_map(|item| {
            let stats = match &item.outcome {
                Ok(Some(stats)) => stats,
                _ => return None,
            };

            Some(BuilderRow {
                broker_id: item.broker_id.clone(),
                broker_name: name_map
                    .get(item.broker_id.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| item.broker_id.clone()),
                volume_30d: stats.perp_volume_last_30_days,
                volume_7d: stats.perp_volume_last_7_days,
                volume_24h: stats.perp_volume_last_1_day,
                volume_ytd: stats.perp_volume_ytd,
                volume_ltd: stats.perp_volume_ltd,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.volume_30d.total_cmp(&a.volume_30d));
    rows
}

/// Network headline stats from the aggregate volume map.
pub fn build_network_stats(aggregate: &AggregateVolumeStats, symbol_count: usize) -> NetworkStats {
    let total_volume = aggregate.brokers.values().map(|b| b.volume_ltd).sum();
    let builders = aggregate
        .brokers
        .values()
        .filter(|b| b.volume_30d > 0.0)
        .count() as u64;

    NetworkStats {
        total_volume,
        builders,
        markets: symbol_count as u64,
    }
}

/// Sort vaults by TVL descending.
pub fn sort_vaults(mut vaults: Vec<VaultInfo>) -> Vec<VaultInfo> {
    vaults.sort_by(|a, b| b.tvl.total_cmp(&a.tvl));
    vaults
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderscope_core::records::{AggregateBrokerStats, BrokerVolumeStats};

    fn ticker(symbol: &str, mark: f64, open: f64, amount: f64, oi: f64) -> FuturesTicker {
        FuturesTicker {
            symbol: symbol.to_string(),
            index_price: mark * 0.999,
            mark_price: mark,
            est_funding_rate: 0.0001,
            last_funding_rate: 0.0001,
            next_funding_time: 0,
            open_interest: oi,
            open_24h: open,
            close_24h: mark,
            high_24h: mark,
            low_24h: open,
            volume_24h: 0.0,
            amount_24h: amount,
        }
    }

    #[test]
    fn market_rows_sorted_by_usd_volume() {
        let rows = build_market_rows(&[
            ticker("PERP_ETH_USDC", 3400.0, 3300.0, 5.0e8, 100.0),
            ticker("PERP_BTC_USDC", 97000.0, 95000.0, 1.4e9, 10.0),
        ]);

        assert_eq!(rows[0].symbol, "PERP_BTC_USDC");
        assert_eq!(rows[1].symbol, "PERP_ETH_USDC");
    }

    #[test]
    fn change_is_mark_over_open() {
        let rows = build_market_rows(&[ticker("PERP_BTC_USDC", 97000.0, 95000.0, 1.0, 0.0)]);
        let expected = (97000.0 - 95000.0) / 95000.0;
        assert!((rows[0].change_24h - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_open_means_zero_change() {
        let rows = build_market_rows(&[ticker("PERP_NEW_USDC", 5.0, 0.0, 1.0, 0.0)]);
        assert_eq!(rows[0].change_24h, 0.0);
    }

    #[test]
    fn open_interest_priced_with_mark_falls_back_to_index() {
        let mut t = ticker("PERP_BTC_USDC", 97000.0, 95000.0, 1.0, 2.0);
        let rows = build_market_rows(std::slice::from_ref(&t));
        assert_eq!(rows[0].open_interest_usd, 2.0 * 97000.0);

        t.mark_price = 0.0;
        t.index_price = 96000.0;
        let rows = build_market_rows(&[t]);
        assert_eq!(rows[0].open_interest_usd, 2.0 * 96000.0);
    }

    fn sweep_ok(broker_id: &str, volume_30d: f64) -> SweepItem {
        SweepItem {
            broker_id: broker_id.to_string(),
            outcome: Ok(Some(BrokerVolumeStats {
                perp_volume_last_1_day: 0.0,
                perp_volume_last_7_days: 0.0,
                perp_volume_last_30_days: volume_30d,
                perp_volume_ytd: 0.0,
                perp_volume_ltd: 0.0,
            })),
        }
    }

    #[test]
    fn builder_rows_skip_misses_and_sort_by_30d() {
        let names = vec![BrokerName {
            broker_id: "kodiak".to_string(),
            broker_name: "Kodiak".to_string(),
        }];
        let sweep = vec![
            sweep_ok("kodiak", 2.5e8),
            SweepItem {
                broker_id: "vooi".to_string(),
                outcome: Ok(None),
            },
            sweep_ok("unknown_id", 4.0e8),
        ];

        let rows = build_builder_rows(&names, &sweep);

        assert_eq!(rows.len(), 2);
        // Unknown broker id falls back to the id and sorts first on volume.
        assert_eq!(rows[0].broker_id, "unknown_id");
        assert_eq!(rows[0].broker_name, "unknown_id");
        assert_eq!(rows[1].broker_name, "Kodiak");
    }

    #[test]
    fn network_stats_totals_and_active_builders() {
        let mut aggregate = AggregateVolumeStats::default();
        aggregate.brokers.insert(
            "a".to_string(),
            AggregateBrokerStats {
                volume_30d: 1.0e8,
                volume_ltd: 2.0e9,
            },
        );
        aggregate.brokers.insert(
            "b".to_string(),
            AggregateBrokerStats {
                volume_30d: 0.0,
                volume_ltd: 5.0e8,
            },
        );

        let stats = build_network_stats(&aggregate, 97);
        assert_eq!(stats.total_volume, 2.5e9);
        assert_eq!(stats.builders, 1);
        assert_eq!(stats.markets, 97);
    }

    #[test]
    fn vaults_sorted_by_tvl() {
        let vault = |id: &str, tvl: f64| VaultInfo {
            vault_id: id.to_string(),
            vault_name: id.to_string(),
            vault_type: "protocol".to_string(),
            description: String::new(),
            sp_name: String::new(),
            tvl,
            lifetime_apy: 0.0,
            apy_30d: 0.0,
            vault_lifetime_net_pnl: 0.0,
            lp_counts: 0,
            vault_age: 0,
            status: "active".to_string(),
            performance_fee_rate: 0.0,
            supported_chains: vec![],
        };

        let sorted = sort_vaults(vec![vault("small", 1.0e5), vault("big", 9.0e6)]);
        assert_eq!(sorted[0].vault_id, "big");
    }
}
