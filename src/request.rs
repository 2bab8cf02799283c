use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub size: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateRange {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl DateRange {
    // bounds are inclusive, so from == to is valid
    pub fn validate(&self) -> Result<(), Error> {
        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if from > to {
                return Err(Error::BadRequest("from_date must not be later than to_date".into()));
            }
        }
        Ok(())
    }
}
