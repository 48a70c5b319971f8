use std::sync::Arc;

use chrono::NaiveDate;
use shared::{CreateHolidayRequest, DateRange, PublicHoliday, SeedHolidaysResponse};
use tracing::{info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::storage::HolidayStorage;

const VIC_REGION: &str = "VIC";

/// Victorian public holidays for the 2025-26 financial year
const VIC_FY26: &[(i32, u32, u32, &str)] = &[
    (2025, 10, 3, "Friday before AFL Grand Final"),
    (2025, 11, 4, "Melbourne Cup Day"),
    (2025, 12, 25, "Christmas Day"),
    (2025, 12, 26, "Boxing Day"),
    (2026, 1, 1, "New Year's Day"),
    (2026, 1, 26, "Australia Day"),
    (2026, 3, 9, "Labour Day"),
    (2026, 4, 3, "Good Friday"),
    (2026, 4, 4, "Saturday before Easter Sunday"),
    (2026, 4, 5, "Easter Sunday"),
    (2026, 4, 6, "Easter Monday"),
    (2026, 4, 25, "Anzac Day"),
    (2026, 6, 8, "Queen's Birthday"),
];

#[derive(Clone)]
pub struct HolidayService {
    holidays: Arc<dyn HolidayStorage>,
    default_region: String,
}

impl HolidayService {
    pub fn new(holidays: Arc<dyn HolidayStorage>, default_region: impl Into<String>) -> Self {
        Self {
            holidays,
            default_region: default_region.into(),
        }
    }

    pub fn default_region(&self) -> &str {
        &self.default_region
    }

    /// Holidays of a region, optionally limited to one calendar year
    pub async fn list_holidays(
        &self,
        year: Option<i32>,
        region: Option<&str>,
    ) -> DomainResult<Vec<PublicHoliday>> {
        let region = region.unwrap_or(&self.default_region).to_uppercase();
        let (start, end) = match year {
            Some(year) => {
                let start = NaiveDate::from_ymd_opt(year, 1, 1);
                let end = NaiveDate::from_ymd_opt(year, 12, 31);
                if start.is_none() || end.is_none() {
                    return Err(DomainError::validation(format!("Invalid year: {}", year)));
                }
                (start, end)
            }
            None => (None, None),
        };

        Ok(self.holidays.list_holidays(Some(&region), start, end).await?)
    }

    /// Default-region holidays falling inside `range`
    pub async fn holidays_in_range(&self, range: DateRange) -> DomainResult<Vec<PublicHoliday>> {
        Ok(self
            .holidays
            .list_holidays(
                Some(&self.default_region),
                Some(range.start()),
                Some(range.end()),
            )
            .await?)
    }

    pub async fn create_holiday(&self, request: CreateHolidayRequest) -> DomainResult<PublicHoliday> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Holiday name cannot be empty"));
        }
        let region = request
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(&self.default_region)
            .to_uppercase();

        info!("Creating holiday {} on {} for {}", name, request.date, region);
        if self.holidays.find_holiday(request.date, &region).await?.is_some() {
            warn!("Holiday already exists on {} for {}", request.date, region);
            return Err(DomainError::conflict(format!(
                "Holiday already exists on {} for {}",
                request.date, region
            )));
        }

        Ok(self.holidays.insert_holiday(request.date, name, &region).await?)
    }

    pub async fn delete_holiday(&self, holiday_id: i64) -> DomainResult<()> {
        if !self.holidays.delete_holiday(holiday_id).await? {
            return Err(DomainError::not_found(format!("Holiday {} not found", holiday_id)));
        }
        info!("Deleted holiday {}", holiday_id);
        Ok(())
    }

    /// Insert the Victorian FY26 list, skipping dates already present
    pub async fn seed_vic_fy26(&self) -> DomainResult<SeedHolidaysResponse> {
        let mut added = 0;
        for &(year, month, day, name) in VIC_FY26 {
            let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                DomainError::Storage(anyhow::anyhow!("Invalid seed date {}-{}-{}", year, month, day))
            })?;
            if self.holidays.find_holiday(date, VIC_REGION).await?.is_none() {
                self.holidays.insert_holiday(date, name, VIC_REGION).await?;
                added += 1;
            }
        }

        info!("Seeded {} of {} VIC FY26 holidays", added, VIC_FY26.len());
        Ok(SeedHolidaysResponse {
            added,
            total: VIC_FY26.len(),
        })
    }
}
