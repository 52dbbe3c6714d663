use crate::error::Result;
use crate::models::{DailyRecord, DailyTable, MonthlyAggregate};
use crate::utils::is_missing;
use chrono::Datelike;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Running totals for one (city, year, month) group
#[derive(Debug, Default, Clone, Copy)]
struct MonthAccumulator {
    temp_total: f64,
    temp_count: usize,
    precip_total: f64,
    rows: usize,
}

impl MonthAccumulator {
    fn push(&mut self, record: &DailyRecord) {
        self.rows += 1;
        if let Some(temp) = record.temperature_2m_mean {
            self.temp_total += temp;
            self.temp_count += 1;
        }
        if let Some(precip) = record.precipitation_sum {
            self.precip_total += precip;
        }
    }

    fn temp_mean(&self) -> f64 {
        if self.temp_count == 0 {
            f64::NAN
        } else {
            self.temp_total / self.temp_count as f64
        }
    }
}

pub struct MonthlyAggregator;

impl MonthlyAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate daily records into one row per (city, year, month), ordered
    /// by city, then year, then month.
    pub fn aggregate(&self, table: &DailyTable) -> Result<Vec<MonthlyAggregate>> {
        let grouped = self.group_by_city_and_month(&table.records);
        debug!(
            "Grouped {} daily rows into {} months",
            table.len(),
            grouped.len()
        );

        let monthly = grouped
            .into_iter()
            .map(|((city, year, month), acc)| {
                MonthlyAggregate::try_narrow(
                    city.to_string(),
                    year,
                    month,
                    acc.temp_mean(),
                    acc.precip_total,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        info!("[TRANSFORM] monthly rows: {}", monthly.len());
        Ok(monthly)
    }

    fn group_by_city_and_month<'a>(
        &self,
        records: &'a [DailyRecord],
    ) -> BTreeMap<(&'a str, i32, u32), MonthAccumulator> {
        let mut grouped: BTreeMap<(&str, i32, u32), MonthAccumulator> = BTreeMap::new();
        let mut dropped = 0usize;

        for record in records {
            // Rows without a city belong to no group
            if is_missing(&record.city) {
                dropped += 1;
                continue;
            }
            grouped
                .entry((record.city.as_str(), record.date.year(), record.date.month()))
                .or_default()
                .push(record);
        }

        if dropped > 0 {
            debug!("Dropped {} daily rows with no city", dropped);
        }

        grouped
    }
}

impl Default for MonthlyAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn record(city: &str, y: i32, m: u32, d: u32, temp: Option<f64>, precip: Option<f64>) -> DailyRecord {
        DailyRecord::new(city, NaiveDate::from_ymd_opt(y, m, d).unwrap(), temp, precip)
    }

    fn sample_table() -> DailyTable {
        DailyTable::new(vec![
            record("London", 2020, 1, 15, Some(5.0), Some(1.2)),
            record("Leeds", 2020, 1, 3, Some(2.5), Some(4.0)),
            record("London", 2020, 2, 1, Some(4.0), Some(0.0)),
            record("London", 2020, 1, 20, Some(7.0), Some(0.8)),
            record("Leeds", 2019, 12, 30, Some(1.0), Some(2.2)),
            record("Leeds", 2020, 1, 4, Some(3.5), Some(1.0)),
        ])
    }

    #[test]
    fn test_two_day_month() -> Result<()> {
        let table = DailyTable::new(vec![
            record("London", 2020, 1, 15, Some(5.0), Some(1.2)),
            record("London", 2020, 1, 20, Some(7.0), Some(0.8)),
        ]);

        let monthly = MonthlyAggregator::new().aggregate(&table)?;

        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].key(), ("London", 2020, 1));
        assert!((monthly[0].temp_mean - 6.0).abs() < 1e-9);
        assert!((monthly[0].precip_sum - 2.0).abs() < 1e-9);

        Ok(())
    }

    #[test]
    fn test_groups_sorted_and_unique() -> Result<()> {
        let monthly = MonthlyAggregator::new().aggregate(&sample_table())?;

        let keys: Vec<_> = monthly.iter().map(|m| m.key()).collect();
        assert_eq!(
            keys,
            vec![
                ("Leeds", 2019, 12),
                ("Leeds", 2020, 1),
                ("London", 2020, 1),
                ("London", 2020, 2),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_groups_match_input_triples() -> Result<()> {
        let table = sample_table();
        let monthly = MonthlyAggregator::new().aggregate(&table)?;

        let input: BTreeSet<(String, i32, u32)> = table
            .records
            .iter()
            .map(|r| (r.city.clone(), r.date.year(), r.date.month()))
            .collect();
        let output: BTreeSet<(String, i32, u32)> = monthly
            .iter()
            .map(|m| (m.city.clone(), m.year as i32, m.month as u32))
            .collect();

        assert_eq!(input, output);
        assert_eq!(output.len(), monthly.len());

        Ok(())
    }

    #[test]
    fn test_sum_and_mean_per_group() -> Result<()> {
        let table = sample_table();
        let monthly = MonthlyAggregator::new().aggregate(&table)?;

        for aggregate in &monthly {
            let rows: Vec<&DailyRecord> = table
                .records
                .iter()
                .filter(|r| {
                    r.city == aggregate.city
                        && r.date.year() == aggregate.year as i32
                        && r.date.month() == aggregate.month as u32
                })
                .collect();

            let sum: f64 = rows.iter().filter_map(|r| r.precipitation_sum).sum();
            let temps: Vec<f64> = rows.iter().filter_map(|r| r.temperature_2m_mean).collect();
            let mean = temps.iter().sum::<f64>() / temps.len() as f64;

            assert!((aggregate.precip_sum - sum).abs() <= 1e-9 * sum.abs().max(1.0));
            assert!((aggregate.temp_mean - mean).abs() <= 1e-9 * mean.abs().max(1.0));
        }

        Ok(())
    }

    #[test]
    fn test_single_record_group() -> Result<()> {
        let table = DailyTable::new(vec![record("York", 2021, 7, 9, Some(18.25), Some(0.6))]);

        let monthly = MonthlyAggregator::new().aggregate(&table)?;
        assert_eq!(monthly[0].temp_mean, 18.25);
        assert_eq!(monthly[0].precip_sum, 0.6);

        Ok(())
    }

    #[test]
    fn test_missing_values_skipped() -> Result<()> {
        let table = DailyTable::new(vec![
            record("Bath", 2020, 3, 1, Some(6.0), None),
            record("Bath", 2020, 3, 2, None, Some(1.5)),
            record("Bath", 2020, 3, 3, Some(9.0), Some(0.5)),
            record("Hull", 2020, 3, 1, None, None),
        ]);

        let monthly = MonthlyAggregator::new().aggregate(&table)?;

        assert_eq!(monthly[0].temp_mean, 7.5);
        assert_eq!(monthly[0].precip_sum, 2.0);
        assert!(monthly[1].temp_mean.is_nan());
        assert_eq!(monthly[1].precip_sum, 0.0);

        Ok(())
    }

    #[test]
    fn test_rows_without_city_are_dropped() -> Result<()> {
        let table = DailyTable::new(vec![
            record("London", 2020, 1, 15, Some(5.0), Some(1.2)),
            record("", 2020, 1, 16, Some(6.0), Some(1.0)),
            record("NA", 2020, 1, 17, Some(9.0), Some(4.0)),
        ]);

        let monthly = MonthlyAggregator::new().aggregate(&table)?;

        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].key(), ("London", 2020, 1));
        assert_eq!(monthly[0].temp_mean, 5.0);
        assert_eq!(monthly[0].precip_sum, 1.2);

        Ok(())
    }

    #[test]
    fn test_empty_table() -> Result<()> {
        let monthly = MonthlyAggregator::new().aggregate(&DailyTable::default())?;
        assert!(monthly.is_empty());
        Ok(())
    }

    #[test]
    fn test_year_outside_narrowed_range() {
        let table = DailyTable::new(vec![record("Far Future", 40000, 1, 1, Some(1.0), Some(1.0))]);

        let result = MonthlyAggregator::new().aggregate(&table);
        assert!(matches!(
            result,
            Err(ProcessingError::Narrowing { field: "year", .. })
        ));
    }

    #[test]
    fn test_repeatable_output() -> Result<()> {
        let table = sample_table();
        let aggregator = MonthlyAggregator::new();
        assert_eq!(aggregator.aggregate(&table)?, aggregator.aggregate(&table)?);
        Ok(())
    }
}
