//! Summary statistics over normalized record sets.

use serde::Serialize;

/// Records carrying a sale amount in 10k KRW.
pub trait SalePriced {
    fn sale_price_10k(&self) -> i64;
}

/// Records carrying lease deposit and monthly rent amounts in 10k KRW.
pub trait RentPriced {
    fn deposit_10k(&self) -> i64;
    fn monthly_rent_10k(&self) -> i64;
}

/// Sale price summary for one (region, month) record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSummary {
    pub median_price_10k: i64,
    pub min_price_10k: i64,
    pub max_price_10k: i64,
    pub sample_count: usize,
}

/// Lease deposit summary for one (region, month) record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentSummary {
    pub median_deposit_10k: i64,
    pub min_deposit_10k: i64,
    pub max_deposit_10k: i64,
    pub monthly_rent_avg_10k: i64,
    /// Deposit-to-sale-price ratio. Requires joining against a separate
    /// trade summary, so it is always `None` here and left to the caller.
    pub jeonse_ratio_pct: Option<f64>,
    pub sample_count: usize,
}

/// Compute sale price statistics. Empty input yields all-zero fields.
pub fn build_trade_summary<T: SalePriced>(records: &[T]) -> TradeSummary {
    if records.is_empty() {
        return TradeSummary {
            median_price_10k: 0,
            min_price_10k: 0,
            max_price_10k: 0,
            sample_count: 0,
        };
    }
    let prices: Vec<i64> = records.iter().map(SalePriced::sale_price_10k).collect();
    TradeSummary {
        median_price_10k: median(&prices),
        min_price_10k: prices.iter().copied().min().unwrap_or(0),
        max_price_10k: prices.iter().copied().max().unwrap_or(0),
        sample_count: prices.len(),
    }
}

/// Compute lease deposit statistics. Empty input yields all-zero numeric
/// fields; the jeonse ratio stays `None` regardless.
pub fn build_rent_summary<T: RentPriced>(records: &[T]) -> RentSummary {
    if records.is_empty() {
        return RentSummary {
            median_deposit_10k: 0,
            min_deposit_10k: 0,
            max_deposit_10k: 0,
            monthly_rent_avg_10k: 0,
            jeonse_ratio_pct: None,
            sample_count: 0,
        };
    }
    let deposits: Vec<i64> = records.iter().map(RentPriced::deposit_10k).collect();
    let rents: Vec<i64> = records.iter().map(RentPriced::monthly_rent_10k).collect();
    RentSummary {
        median_deposit_10k: median(&deposits),
        min_deposit_10k: deposits.iter().copied().min().unwrap_or(0),
        max_deposit_10k: deposits.iter().copied().max().unwrap_or(0),
        monthly_rent_avg_10k: mean(&rents),
        jeonse_ratio_pct: None,
        sample_count: deposits.len(),
    }
}

/// Median with the standard definition: the average of the two middle
/// values for even-length input, truncated to an integer.
fn median(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        ((sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0) as i64
    }
}

/// Arithmetic mean truncated to an integer.
fn mean(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    (values.iter().sum::<i64>() as f64 / values.len() as f64) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sale(i64);
    impl SalePriced for Sale {
        fn sale_price_10k(&self) -> i64 {
            self.0
        }
    }

    struct Lease(i64, i64);
    impl RentPriced for Lease {
        fn deposit_10k(&self) -> i64 {
            self.0
        }
        fn monthly_rent_10k(&self) -> i64 {
            self.1
        }
    }

    #[test]
    fn trade_summary_over_three_records() {
        let records = [Sale(100_000), Sale(200_000), Sale(300_000)];
        let summary = build_trade_summary(&records);
        assert_eq!(summary.median_price_10k, 200_000);
        assert_eq!(summary.min_price_10k, 100_000);
        assert_eq!(summary.max_price_10k, 300_000);
        assert_eq!(summary.sample_count, 3);
    }

    #[test]
    fn trade_summary_empty_input_is_all_zero() {
        let summary = build_trade_summary::<Sale>(&[]);
        assert_eq!(summary.median_price_10k, 0);
        assert_eq!(summary.min_price_10k, 0);
        assert_eq!(summary.max_price_10k, 0);
        assert_eq!(summary.sample_count, 0);
    }

    #[test]
    fn even_length_median_averages_middle_values() {
        let records = [Sale(10), Sale(20), Sale(30), Sale(40)];
        assert_eq!(build_trade_summary(&records).median_price_10k, 25);

        // Average truncates toward zero, matching integer statistics.
        let records = [Sale(10), Sale(15)];
        assert_eq!(build_trade_summary(&records).median_price_10k, 12);
    }

    #[test]
    fn median_is_order_independent() {
        let records = [Sale(300_000), Sale(100_000), Sale(200_000)];
        assert_eq!(build_trade_summary(&records).median_price_10k, 200_000);
    }

    #[test]
    fn rent_summary_statistics() {
        let records = [Lease(10_000, 0), Lease(20_000, 60), Lease(30_000, 90)];
        let summary = build_rent_summary(&records);
        assert_eq!(summary.median_deposit_10k, 20_000);
        assert_eq!(summary.min_deposit_10k, 10_000);
        assert_eq!(summary.max_deposit_10k, 30_000);
        assert_eq!(summary.monthly_rent_avg_10k, 50);
        assert_eq!(summary.jeonse_ratio_pct, None);
        assert_eq!(summary.sample_count, 3);
    }

    #[test]
    fn rent_summary_empty_input() {
        let summary = build_rent_summary::<Lease>(&[]);
        assert_eq!(summary.median_deposit_10k, 0);
        assert_eq!(summary.monthly_rent_avg_10k, 0);
        assert_eq!(summary.jeonse_ratio_pct, None);
        assert_eq!(summary.sample_count, 0);
    }
}
