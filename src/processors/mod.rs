pub mod monthly_aggregator;

pub use monthly_aggregator::MonthlyAggregator;
