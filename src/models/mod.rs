pub mod daily;
pub mod monthly;

pub use daily::{DailyRecord, DailyTable};
pub use monthly::MonthlyAggregate;
