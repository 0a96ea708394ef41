use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::pricing::{self, Price};
use super::shared_booking::ReservationRecord;
use super::slots::minutes_between;
use crate::utils::date::parse_local_datetime;

/// How long before the start a booking can still be cancelled. The backend
/// enforces the same window and has the final word.
pub const CANCELLATION_WINDOW_HOURS: i64 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
    Other(String),
}

impl ReservationStatus {
    pub fn from_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            return ReservationStatus::Other(String::new());
        };
        match tag.trim().to_uppercase().as_str() {
            "CONFIRMED" | "CONFIRMADA" => ReservationStatus::Confirmed,
            "CANCELLED" | "CANCELADA" => ReservationStatus::Cancelled,
            _ => ReservationStatus::Other(tag.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationPhase {
    Upcoming,
    Finished,
    Cancelled,
}

impl ReservationPhase {
    pub fn label(self) -> &'static str {
        match self {
            ReservationPhase::Upcoming => "Próxima",
            ReservationPhase::Finished => "Finalizada",
            ReservationPhase::Cancelled => "Cancelada",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReservationFilter {
    #[default]
    Upcoming,
    Past,
    Cancelled,
    All,
}

impl ReservationFilter {
    pub const ALL: [ReservationFilter; 4] = [
        ReservationFilter::Upcoming,
        ReservationFilter::All,
        ReservationFilter::Past,
        ReservationFilter::Cancelled,
    ];

    pub fn as_value(self) -> &'static str {
        match self {
            ReservationFilter::Upcoming => "UPCOMING",
            ReservationFilter::Past => "PAST",
            ReservationFilter::Cancelled => "CANCELLED",
            ReservationFilter::All => "ALL",
        }
    }

    /// Unknown values fall back to showing everything.
    pub fn from_value(value: &str) -> Self {
        match value {
            "UPCOMING" => ReservationFilter::Upcoming,
            "PAST" => ReservationFilter::Past,
            "CANCELLED" => ReservationFilter::Cancelled,
            _ => ReservationFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReservationFilter::Upcoming => "Próximas",
            ReservationFilter::Past => "Finalizadas",
            ReservationFilter::Cancelled => "Canceladas",
            ReservationFilter::All => "Todas",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub installation_id: Option<i64>,
    pub installation_name: Option<String>,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub duration_minutes: Option<u32>,
    pub status: ReservationStatus,
    pub code: Option<String>,
    pub amount: Option<Price>,
}

impl Reservation {
    /// Records without a readable start cannot be placed on the timeline and
    /// are skipped.
    pub fn from_record(record: &ReservationRecord) -> Option<Self> {
        let start = record.start.as_deref().and_then(parse_local_datetime)?;
        Some(Reservation {
            id: record.id,
            installation_id: record.installation_id,
            installation_name: record.installation_name.clone(),
            start,
            end: record.end.as_deref().and_then(parse_local_datetime),
            duration_minutes: record
                .duration_minutes
                .filter(|m| *m > 0)
                .and_then(|m| u32::try_from(m).ok()),
            status: ReservationStatus::from_tag(record.status.as_deref()),
            code: record.code.clone(),
            amount: record.amount.as_ref().and_then(Price::from_json),
        })
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ReservationStatus::Cancelled
    }

    pub fn phase(&self, now: NaiveDateTime) -> ReservationPhase {
        if self.is_cancelled() {
            ReservationPhase::Cancelled
        } else if self.start >= now {
            ReservationPhase::Upcoming
        } else {
            ReservationPhase::Finished
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        if let Some(minutes) = self.duration_minutes {
            return minutes;
        }
        self.end
            .map(|end| minutes_between(self.start, end))
            .unwrap_or(60)
    }

    /// The charged amount when the backend reports one, else the local
    /// estimate.
    pub fn display_amount(&self) -> Price {
        self.amount
            .unwrap_or_else(|| pricing::price(self.duration_minutes()))
    }

    pub fn end_or_projected(&self) -> NaiveDateTime {
        self.end
            .unwrap_or_else(|| self.start + Duration::minutes(i64::from(self.duration_minutes())))
    }
}

pub fn can_cancel(reservation: &Reservation, now: NaiveDateTime) -> bool {
    !reservation.is_cancelled()
        && reservation.start - now >= Duration::hours(CANCELLATION_WINDOW_HOURS)
}

pub fn normalize(records: &[ReservationRecord]) -> Vec<Reservation> {
    records
        .iter()
        .filter_map(|record| {
            let reservation = Reservation::from_record(record);
            if reservation.is_none() {
                log::warn!("skipping reservation {} without a readable start", record.id);
            }
            reservation
        })
        .collect()
}

pub fn filter_reservations(
    reservations: &[Reservation],
    filter: ReservationFilter,
    now: NaiveDateTime,
) -> Vec<Reservation> {
    let mut filtered: Vec<Reservation> = reservations
        .iter()
        .filter(|r| match filter {
            ReservationFilter::Upcoming => !r.is_cancelled() && r.start >= now,
            ReservationFilter::Past => !r.is_cancelled() && r.start < now,
            ReservationFilter::Cancelled => r.is_cancelled(),
            ReservationFilter::All => true,
        })
        .cloned()
        .collect();
    filtered.sort_by_key(|r| r.start);
    filtered
}

pub fn count_label(n: usize) -> String {
    if n == 1 {
        "1 reserva mostrada".to_string()
    } else {
        format!("{n} reservas mostradas")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> NaiveDateTime {
        parse_local_datetime(raw).unwrap()
    }

    fn reservation(id: i64, start: &str, status: ReservationStatus) -> Reservation {
        Reservation {
            id,
            installation_id: Some(1),
            installation_name: Some("Tenis 1".into()),
            start: at(start),
            end: None,
            duration_minutes: None,
            status,
            code: None,
            amount: None,
        }
    }

    #[test]
    fn cancellation_boundary_is_inclusive() {
        let now = at("2024-01-01T10:00:00");
        let exactly_four = reservation(1, "2024-01-01T14:00:00", ReservationStatus::Confirmed);
        let just_under = reservation(2, "2024-01-01T13:59:00", ReservationStatus::Confirmed);
        assert!(can_cancel(&exactly_four, now));
        assert!(!can_cancel(&just_under, now));
    }

    #[test]
    fn cancelled_reservations_are_never_cancellable() {
        let now = at("2024-01-01T10:00:00");
        let cancelled = reservation(1, "2024-02-01T10:00:00", ReservationStatus::Cancelled);
        assert!(!can_cancel(&cancelled, now));
        let past = reservation(2, "2023-12-31T10:00:00", ReservationStatus::Confirmed);
        assert!(!can_cancel(&past, now));
    }

    #[test]
    fn filters_sort_ascending() {
        let now = at("2024-01-10T12:00:00");
        let list = vec![
            reservation(1, "2024-01-20T10:00:00", ReservationStatus::Confirmed),
            reservation(2, "2024-01-05T10:00:00", ReservationStatus::Confirmed),
            reservation(3, "2024-01-15T10:00:00", ReservationStatus::Confirmed),
            reservation(4, "2024-01-12T10:00:00", ReservationStatus::Cancelled),
            reservation(5, "2024-01-10T12:00:00", ReservationStatus::Confirmed),
        ];
        let ids = |filter| -> Vec<i64> {
            filter_reservations(&list, filter, now).iter().map(|r| r.id).collect()
        };

        assert_eq!(ids(ReservationFilter::Upcoming), vec![5, 3, 1]);
        assert_eq!(ids(ReservationFilter::Past), vec![2]);
        assert_eq!(ids(ReservationFilter::Cancelled), vec![4]);
        assert_eq!(ids(ReservationFilter::All), vec![2, 5, 4, 3, 1]);
    }

    #[test]
    fn phases() {
        let now = at("2024-01-10T12:00:00");
        assert_eq!(
            reservation(1, "2024-01-11T10:00:00", ReservationStatus::Confirmed).phase(now),
            ReservationPhase::Upcoming
        );
        assert_eq!(
            reservation(2, "2024-01-09T10:00:00", ReservationStatus::Confirmed).phase(now),
            ReservationPhase::Finished
        );
        assert_eq!(
            reservation(3, "2024-01-11T10:00:00", ReservationStatus::Cancelled)
                .phase(now)
                .label(),
            "Cancelada"
        );
    }

    #[test]
    fn normalizes_backend_records() {
        let records: Vec<ReservationRecord> = serde_json::from_value(serde_json::json!([
            {
                "id": 9,
                "installationName": "Pádel 1",
                "start": "2024-01-01T10:00:00",
                "end": "2024-01-01T11:30:00",
                "status": "CONFIRMED",
                "code": "AB12CD",
                "amount": 4.5
            },
            { "id": 10, "start": null, "status": "CONFIRMED" },
            { "id": 11, "start": "2024-01-02T10:00:00", "status": "cancelada" }
        ]))
        .unwrap();

        let normalized = normalize(&records);
        assert_eq!(normalized.len(), 2);

        let first = &normalized[0];
        assert_eq!(first.duration_minutes(), 90);
        assert_eq!(first.display_amount(), Price::from_cents(450));
        assert_eq!(first.code.as_deref(), Some("AB12CD"));

        let second = &normalized[1];
        assert!(second.is_cancelled());
        assert_eq!(second.duration_minutes(), 60);
        assert_eq!(second.display_amount(), Price::from_cents(300));
        assert_eq!(second.end_or_projected(), at("2024-01-02T11:00:00"));
    }

    #[test]
    fn backend_duration_wins_over_span() {
        let mut r = reservation(1, "2024-01-01T10:00:00", ReservationStatus::Confirmed);
        r.end = Some(at("2024-01-01T11:00:00"));
        r.duration_minutes = Some(120);
        assert_eq!(r.duration_minutes(), 120);
        assert_eq!(r.display_amount(), Price::from_cents(600));
    }

    #[test]
    fn span_duration_shares_the_hour_fallback() {
        let mut r = reservation(1, "2024-01-01T10:00:00", ReservationStatus::Confirmed);
        r.end = Some(at("2024-01-01T12:30:00"));
        assert_eq!(r.duration_minutes(), 150);

        r.end = Some(at("2024-01-01T09:00:00"));
        assert_eq!(r.duration_minutes(), 60);
        assert_eq!(r.duration_minutes(), minutes_between(r.start, at("2024-01-01T09:00:00")));
    }

    #[test]
    fn filter_values_and_labels() {
        assert_eq!(ReservationFilter::from_value("PAST"), ReservationFilter::Past);
        assert_eq!(ReservationFilter::from_value("whatever"), ReservationFilter::All);
        assert_eq!(ReservationFilter::default(), ReservationFilter::Upcoming);
        assert_eq!(count_label(1), "1 reserva mostrada");
        assert_eq!(count_label(3), "3 reservas mostradas");
    }
}
