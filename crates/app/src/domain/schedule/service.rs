//! Schedule service: the vendor-slot admission gate.

use async_trait::async_trait;
use jiff::{civil::Date, tz::TimeZone};
use mockall::automock;

use flowline::{
    ids::{TimeslotId, VendorId},
    schedule::{SlotAdmission, evaluate_slot},
};

use crate::{
    database::Db,
    domain::{
        schedule::{
            errors::ScheduleServiceError, models::build_slot_window,
            repositories::PgSchedulesRepository,
        },
        time::local_day_range,
    },
};

#[derive(Debug, Clone)]
pub struct PgScheduleService {
    db: Db,
    schedules: PgSchedulesRepository,
    tz: TimeZone,
}

impl PgScheduleService {
    #[must_use]
    pub fn new(db: Db, tz: TimeZone) -> Self {
        Self {
            db,
            schedules: PgSchedulesRepository::new(),
            tz,
        }
    }
}

#[async_trait]
impl ScheduleService for PgScheduleService {
    #[tracing::instrument(
        name = "schedule.service.can_accept",
        skip(self),
        fields(vendor = %vendor, timeslot = %timeslot, date = %date),
        err
    )]
    async fn can_accept(
        &self,
        vendor: VendorId,
        timeslot: TimeslotId,
        date: Date,
    ) -> Result<SlotAdmission, ScheduleServiceError> {
        let range = local_day_range(date, &self.tz)?;

        let mut tx = self.db.begin().await.map_err(ScheduleServiceError::from)?;

        let window_rows = self
            .schedules
            .slot_windows(&mut tx, vendor.into_uuid())
            .await?;

        let booked = self
            .schedules
            .booked_count(&mut tx, vendor.into_uuid(), timeslot.into_uuid(), range)
            .await?;

        tx.commit().await.map_err(ScheduleServiceError::from)?;

        let windows = window_rows
            .iter()
            .map(build_slot_window)
            .collect::<Result<Vec<_>, _>>()?;

        let booked = u32::try_from(booked).unwrap_or(u32::MAX);

        Ok(evaluate_slot(&windows, timeslot, date, booked))
    }
}

#[automock]
#[async_trait]
pub trait ScheduleService: Send + Sync {
    /// Decide whether a vendor accepts one more booking in a slot on a
    /// date. Saturation is a normal rejection, not an error.
    async fn can_accept(
        &self,
        vendor: VendorId,
        timeslot: TimeslotId,
        date: Date,
    ) -> Result<SlotAdmission, ScheduleServiceError>;
}
