use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ProcessingError, Result};

/// Per-city monthly summary, one per distinct (city, year, month)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MonthlyAggregate {
    #[validate(length(min = 1))]
    pub city: String,

    pub year: i16,

    #[validate(range(min = 1, max = 12))]
    pub month: i8,

    /// Mean of the present daily mean temperatures, NaN when none were present
    pub temp_mean: f64,

    /// Sum of the present daily precipitation totals
    pub precip_sum: f64,
}

impl MonthlyAggregate {
    pub fn new(city: String, year: i16, month: i8, temp_mean: f64, precip_sum: f64) -> Self {
        Self {
            city,
            year,
            month,
            temp_mean,
            precip_sum,
        }
    }

    /// Build an aggregate from wide calendar fields, refusing values that would
    /// not survive narrowing to the stored widths.
    pub fn try_narrow(
        city: String,
        year: i32,
        month: u32,
        temp_mean: f64,
        precip_sum: f64,
    ) -> Result<Self> {
        let year = i16::try_from(year).map_err(|_| ProcessingError::Narrowing {
            field: "year",
            value: year as i64,
        })?;
        let month = i8::try_from(month).map_err(|_| ProcessingError::Narrowing {
            field: "month",
            value: month as i64,
        })?;

        let aggregate = Self::new(city, year, month, temp_mean, precip_sum);
        aggregate.validate()?;
        Ok(aggregate)
    }

    pub fn key(&self) -> (&str, i16, i8) {
        (self.city.as_str(), self.year, self.month)
    }

    pub fn has_temperature(&self) -> bool {
        !self.temp_mean.is_nan()
    }
}
