//! Schedule consistency rules
//!
//! Every stop written for a train passes through [`ScheduleConsistencyEngine`]
//! before it reaches storage. The engine only decides accept or reject:
//! gathering the train's current stops and persisting the result belong to
//! the caller.
//!
//! Checks run in a fixed order and stop at the first failure:
//! time format, duplicate station, start window, neighbor ordering,
//! start/end flag uniqueness, stop number uniqueness, and last the
//! arrival/departure order within the stop itself.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::errors::ScheduleRejection;
use super::repositories::{NewStop, Stop, StopPatch};
use super::stop_time::{ScheduledInstant, StopTime};

/// Latest hour at which a train's first stop may be reached.
pub const START_WINDOW_LAST_HOUR: u8 = 12;

/// How arrival/departure of neighboring stops are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeComparison {
    /// Compare `(day_offset, time of day)`, so an early stop on day 1 comes
    /// after a late stop on day 0.
    #[default]
    DayAware,
    /// Compare time of day only and ignore `day_offset`.
    ClockOnly,
}

impl FromStr for TimeComparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "day-aware" | "day_aware" => Ok(Self::DayAware),
            "clock" | "clock-only" | "clock_only" => Ok(Self::ClockOnly),
            other => Err(format!("unknown time comparison mode '{}'", other)),
        }
    }
}

impl fmt::Display for TimeComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DayAware => write!(f, "day-aware"),
            Self::ClockOnly => write!(f, "clock-only"),
        }
    }
}

/// A new stop that passed every check. Times are normalized to `HH:MM:SS`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedStop(NewStop);

impl ValidatedStop {
    pub fn stop(&self) -> &NewStop {
        &self.0
    }

    pub fn into_inner(self) -> NewStop {
        self.0
    }
}

/// A patch that passed every check, together with the record it produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPatch {
    patch: StopPatch,
    merged: Stop,
}

impl ValidatedPatch {
    pub fn patch(&self) -> &StopPatch {
        &self.patch
    }

    /// The existing record with the patch applied
    pub fn merged(&self) -> &Stop {
        &self.merged
    }

    pub fn into_patch(self) -> StopPatch {
        self.patch
    }
}

/// Fully merged stop, with times parsed, as seen by the checks
struct Candidate<'a> {
    station_id: &'a str,
    stop_number: i32,
    arrival: Option<StopTime>,
    departure: Option<StopTime>,
    day_offset: i32,
    is_start: bool,
    is_end: bool,
}

fn parse_time(field: &'static str, value: &str) -> Result<StopTime, ScheduleRejection> {
    value
        .parse::<StopTime>()
        .map_err(|_| ScheduleRejection::InvalidTimeFormat {
            field,
            value: value.to_string(),
        })
}

/// Stored times were validated on the way in; an unreadable one is logged
/// and that side of the neighbor check is skipped.
fn stored_instant(stop: &Stop, time: Option<&str>) -> Option<ScheduledInstant> {
    let raw = time?;
    match raw.parse::<StopTime>() {
        Ok(time) => Some(ScheduledInstant {
            day_offset: stop.day_offset,
            time,
        }),
        Err(e) => {
            tracing::warn!(
                "Stop {} of train {} holds an unreadable time, neighbor check skipped: {}",
                stop.schedule_id,
                stop.train_id,
                e
            );
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleConsistencyEngine {
    comparison: TimeComparison,
}

impl ScheduleConsistencyEngine {
    pub fn new(comparison: TimeComparison) -> Self {
        Self { comparison }
    }

    pub fn comparison(&self) -> TimeComparison {
        self.comparison
    }

    /// Validate a new stop against every stop currently held by its train.
    pub fn validate_create(
        &self,
        mut candidate: NewStop,
        existing: &[Stop],
    ) -> Result<ValidatedStop, ScheduleRejection> {
        let arrival = parse_time("arrivalTime", &candidate.arrival_time)?;
        let departure = parse_time("departureTime", &candidate.departure_time)?;

        let others: Vec<&Stop> = existing.iter().collect();
        self.check(
            &Candidate {
                station_id: &candidate.station_id,
                stop_number: candidate.stop_number,
                arrival: Some(arrival),
                departure: Some(departure),
                day_offset: candidate.day_offset,
                is_start: candidate.is_start,
                is_end: candidate.is_end,
            },
            &others,
        )?;

        candidate.arrival_time = arrival.to_string();
        candidate.departure_time = departure.to_string();
        Ok(ValidatedStop(candidate))
    }

    /// Validate a partial update of `existing` (whose id is `id`).
    ///
    /// The patch is overlaid on the current record and the merged result goes
    /// through the same checks as a create. `siblings` are the train's other
    /// stops; a sibling carrying `id` is ignored.
    pub fn validate_update(
        &self,
        id: &str,
        mut patch: StopPatch,
        existing: &Stop,
        siblings: &[Stop],
    ) -> Result<ValidatedPatch, ScheduleRejection> {
        let is_start = patch.is_start.unwrap_or(existing.is_start);
        let is_end = patch.is_end.unwrap_or(existing.is_end);

        if matches!(patch.arrival_time, Some(None)) && !is_start {
            return Err(ScheduleRejection::NullArrivalWithoutStartFlag);
        }
        if matches!(patch.departure_time, Some(None)) && !is_end {
            return Err(ScheduleRejection::NullDepartureWithoutEndFlag);
        }

        let arrival_raw = match &patch.arrival_time {
            Some(value) => value.as_deref(),
            None => existing.arrival_time.as_deref(),
        };
        let departure_raw = match &patch.departure_time {
            Some(value) => value.as_deref(),
            None => existing.departure_time.as_deref(),
        };
        let arrival = arrival_raw
            .map(|t| parse_time("arrivalTime", t))
            .transpose()?;
        let departure = departure_raw
            .map(|t| parse_time("departureTime", t))
            .transpose()?;

        let station_id = patch
            .station_id
            .as_deref()
            .unwrap_or(&existing.station_id);
        let stop_number = patch.stop_number.unwrap_or(existing.stop_number);
        let day_offset = patch.day_offset.unwrap_or(existing.day_offset);

        let others: Vec<&Stop> = siblings.iter().filter(|s| s.schedule_id != id).collect();
        self.check(
            &Candidate {
                station_id,
                stop_number,
                arrival,
                departure,
                day_offset,
                is_start,
                is_end,
            },
            &others,
        )?;

        if let Some(Some(_)) = patch.arrival_time {
            patch.arrival_time = Some(arrival.map(|t| t.to_string()));
        }
        if let Some(Some(_)) = patch.departure_time {
            patch.departure_time = Some(departure.map(|t| t.to_string()));
        }

        let merged = Stop {
            schedule_id: existing.schedule_id.clone(),
            train_id: patch
                .train_id
                .clone()
                .unwrap_or_else(|| existing.train_id.clone()),
            station_id: station_id.to_string(),
            station_name: patch
                .station_name
                .clone()
                .unwrap_or_else(|| existing.station_name.clone()),
            stop_number,
            platform_number: patch.platform_number.unwrap_or(existing.platform_number),
            arrival_time: arrival.map(|t| t.to_string()),
            departure_time: departure.map(|t| t.to_string()),
            day_offset,
            is_start,
            is_end,
            created_at: existing.created_at.clone(),
            updated_at: existing.updated_at.clone(),
        };

        Ok(ValidatedPatch { patch, merged })
    }

    fn order(&self, a: ScheduledInstant, b: ScheduledInstant) -> Ordering {
        match self.comparison {
            TimeComparison::DayAware => a.cmp(&b),
            TimeComparison::ClockOnly => a.time.cmp(&b.time),
        }
    }

    fn check(&self, c: &Candidate<'_>, others: &[&Stop]) -> Result<(), ScheduleRejection> {
        if let Some(dup) = others.iter().find(|s| s.station_id == c.station_id) {
            return Err(ScheduleRejection::DuplicateStationForTrain {
                station_id: dup.station_id.clone(),
                station_name: dup.station_name.clone(),
            });
        }

        if c.is_start
            && let Some(arrival) = c.arrival
            && arrival.hour() > START_WINDOW_LAST_HOUR
        {
            return Err(ScheduleRejection::InvalidStartWindow { arrival });
        }
        // Terminus departure has no window.

        let arrival = c.arrival.map(|time| ScheduledInstant {
            day_offset: c.day_offset,
            time,
        });
        let departure = c.departure.map(|time| ScheduledInstant {
            day_offset: c.day_offset,
            time,
        });

        let previous = c
            .stop_number
            .checked_sub(1)
            .and_then(|n| others.iter().find(|s| s.stop_number == n));
        if let Some(prev) = previous
            && let Some(arrival) = arrival
            && let Some(prev_departure) =
                stored_instant(prev, prev.departure_time.as_deref())
            && self.order(arrival, prev_departure) != Ordering::Greater
        {
            return Err(ScheduleRejection::ArrivalBeforePreviousDeparture {
                previous_station: prev.station_name.clone(),
                previous_departure: prev_departure,
            });
        }

        let next = c
            .stop_number
            .checked_add(1)
            .and_then(|n| others.iter().find(|s| s.stop_number == n));
        if let Some(next) = next
            && let Some(departure) = departure
            && let Some(next_arrival) = stored_instant(next, next.arrival_time.as_deref())
            && self.order(departure, next_arrival) != Ordering::Less
        {
            return Err(ScheduleRejection::DepartureAfterNextArrival {
                next_station: next.station_name.clone(),
                next_arrival,
            });
        }

        if c.is_start
            && let Some(start) = others.iter().find(|s| s.is_start)
        {
            return Err(ScheduleRejection::DuplicateStartStation {
                station_name: start.station_name.clone(),
            });
        }
        if c.is_end
            && let Some(end) = others.iter().find(|s| s.is_end)
        {
            return Err(ScheduleRejection::DuplicateEndStation {
                station_name: end.station_name.clone(),
            });
        }

        if let Some(taken) = others.iter().find(|s| s.stop_number == c.stop_number) {
            return Err(ScheduleRejection::DuplicateStopNumber {
                stop_number: c.stop_number,
                station_name: taken.station_name.clone(),
            });
        }

        if let (Some(arrival), Some(departure)) = (c.arrival, c.departure)
            && departure < arrival
        {
            return Err(ScheduleRejection::DepartureBeforeArrival { arrival, departure });
        }

        Ok(())
    }
}
