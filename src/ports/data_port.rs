//! Price data access port trait.

use crate::domain::error::RiskfoldError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars within the inclusive date range, oldest first. `None` leaves
    /// that side of the range open.
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, RiskfoldError>;
}
