//! Availability grid for one installation and day.
//!
//! The backend hands out a flat list of fixed-width slots. Everything the
//! booking page needs (which buttons to show, how long a booking may run,
//! when it ends) is derived here from that list, with slot position as the
//! unit of contiguity.

use std::ops::Sub;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::shared_booking::{DailyAvailability, TimeSlotRecord};
use crate::utils::date::{parse_date, parse_time_of_day};

pub const DEFAULT_SLOT_MINUTES: u32 = 30;
pub const MIN_BOOKING_MINUTES: u32 = 60;
pub const MAX_BOOKING_MINUTES: u32 = 180;
pub const CANDIDATE_DURATIONS: [u32; 5] = [60, 90, 120, 150, 180];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    Available,
    Blocked,
    Reserved,
    Other(String),
}

impl SlotStatus {
    pub fn from_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            return SlotStatus::Other(String::new());
        };
        match tag.trim().to_uppercase().as_str() {
            "DISPONIBLE" | "AVAILABLE" => SlotStatus::Available,
            "BLOQUEADO" | "BLOCKED" => SlotStatus::Blocked,
            "RESERVADO" | "RESERVED" => SlotStatus::Reserved,
            _ => SlotStatus::Other(tag.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SlotStatus::Available)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub status: SlotStatus,
    pub reason: Option<String>,
}

impl TimeSlot {
    fn from_record(record: &TimeSlotRecord) -> Option<Self> {
        let start = parse_time_of_day(record.start.as_deref()?)?;
        let end = parse_time_of_day(record.end.as_deref()?)?;
        Some(TimeSlot {
            start,
            end,
            status: SlotStatus::from_tag(record.status.as_deref()),
            reason: record.reason.clone(),
        })
    }
}

/// Durations offered for one base slot, smallest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationChoice {
    pub allowed: Vec<u32>,
}

impl DurationChoice {
    pub fn default_minutes(&self) -> Option<u32> {
        self.allowed.first().copied()
    }

    pub fn contains(&self, minutes: u32) -> bool {
        self.allowed.contains(&minutes)
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// `{60, 90, 120, 150, 180}` limited to what the run and the 3h cap allow.
pub fn allowed_durations(max_contiguous: u32) -> DurationChoice {
    let cap = max_contiguous.min(MAX_BOOKING_MINUTES);
    DurationChoice {
        allowed: CANDIDATE_DURATIONS
            .iter()
            .copied()
            .filter(|d| *d <= cap)
            .collect(),
    }
}

/// Same-day end time. `None` when the booking would cross midnight.
pub fn project_end(start: NaiveTime, minutes: u32) -> Option<NaiveTime> {
    let (end, wrapped_secs) = start.overflowing_add_signed(Duration::minutes(i64::from(minutes)));
    (wrapped_secs == 0).then_some(end)
}

/// Minutes from `start` to `end`, falling back to an hour when the span is
/// empty or inverted.
pub fn minutes_between<T>(start: T, end: T) -> u32
where
    T: Sub<Output = Duration>,
{
    let diff = (end - start).num_minutes();
    if diff > 0 {
        u32::try_from(diff).unwrap_or(u32::MAX)
    } else {
        60
    }
}

pub fn duration_label(minutes: u32) -> String {
    let (h, m) = (minutes / 60, minutes % 60);
    match (h, m) {
        (1, 0) => "1 hora".to_string(),
        (_, 0) => format!("{h} horas"),
        (0, _) => format!("{m} min"),
        _ => format!("{h} h {m} min"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotIndex {
    pub installation_id: Option<i64>,
    pub installation_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub slots: Vec<TimeSlot>,
    pub slot_minutes: u32,
}

impl SlotIndex {
    pub fn new(slots: Vec<TimeSlot>) -> Self {
        let mut slots = slots;
        slots.sort_by_key(|slot| slot.start);
        let slot_minutes = slots
            .first()
            .map(|first| (first.end - first.start).num_minutes())
            .filter(|span| *span > 0)
            .map(|span| span as u32)
            .unwrap_or(DEFAULT_SLOT_MINUTES);

        SlotIndex {
            installation_id: None,
            installation_name: None,
            date: None,
            slots,
            slot_minutes,
        }
    }

    /// Normalizes a backend availability payload. Entries with unreadable
    /// times are dropped, which leaves a gap the scanner will not cross.
    pub fn from_response(response: &DailyAvailability) -> Self {
        let slots: Vec<TimeSlot> = response
            .slots
            .iter()
            .filter_map(|record| {
                let slot = TimeSlot::from_record(record);
                if slot.is_none() {
                    log::warn!("dropping unreadable availability slot: {:?}", record);
                }
                slot
            })
            .collect();

        SlotIndex {
            installation_id: response.installation_id,
            installation_name: response.installation_name.clone(),
            date: response.date.as_deref().and_then(parse_date),
            ..SlotIndex::new(slots)
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimeSlot> {
        self.slots.get(index)
    }

    /// Reservable minutes starting at `index`: the run of available,
    /// back-to-back slots beginning there.
    pub fn max_contiguous_minutes(&self, index: usize) -> u32 {
        let Some(tail) = self.slots.get(index..) else {
            return 0;
        };

        let mut total = 0;
        let mut previous: Option<&TimeSlot> = None;
        for slot in tail {
            if !slot.status.is_available() {
                break;
            }
            if previous.is_some_and(|prev| prev.end != slot.start) {
                break;
            }
            total += self.slot_minutes;
            previous = Some(slot);
        }
        total
    }

    pub fn is_selectable(&self, index: usize) -> bool {
        self.get(index).is_some_and(|slot| slot.status.is_available())
            && self.max_contiguous_minutes(index) >= MIN_BOOKING_MINUTES
    }

    pub fn selectable_starts(&self) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|index| self.is_selectable(*index))
            .collect()
    }

    pub fn durations_from(&self, index: usize) -> DurationChoice {
        allowed_durations(self.max_contiguous_minutes(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(raw: &str) -> NaiveTime {
        parse_time_of_day(raw).unwrap()
    }

    fn slot(start: &str, end: &str, status: SlotStatus) -> TimeSlot {
        TimeSlot {
            start: t(start),
            end: t(end),
            status,
            reason: None,
        }
    }

    fn gap_scenario() -> SlotIndex {
        SlotIndex::new(vec![
            slot("08:00", "08:30", SlotStatus::Available),
            slot("08:30", "09:00", SlotStatus::Available),
            slot("09:00", "09:30", SlotStatus::Blocked),
            slot("09:30", "10:00", SlotStatus::Available),
        ])
    }

    fn open_day(from: u32, count: u32) -> SlotIndex {
        let slots = (0..count)
            .map(|i| {
                let start = NaiveTime::from_hms_opt(from, 0, 0).unwrap() + Duration::minutes(30 * i as i64);
                TimeSlot {
                    start,
                    end: start + Duration::minutes(30),
                    status: SlotStatus::Available,
                    reason: None,
                }
            })
            .collect();
        SlotIndex::new(slots)
    }

    #[test]
    fn blocked_slot_breaks_the_run() {
        let index = gap_scenario();
        assert_eq!(index.slot_minutes, 30);
        assert_eq!(index.max_contiguous_minutes(0), 60);
        assert_eq!(index.max_contiguous_minutes(1), 30);
        assert_eq!(index.max_contiguous_minutes(2), 0);
        assert_eq!(index.max_contiguous_minutes(3), 30);
        assert_eq!(index.selectable_starts(), vec![0]);
    }

    #[test]
    fn time_gap_breaks_the_run_even_when_available() {
        let index = SlotIndex::new(vec![
            slot("08:00", "08:30", SlotStatus::Available),
            slot("09:00", "09:30", SlotStatus::Available),
            slot("09:30", "10:00", SlotStatus::Available),
        ]);
        assert_eq!(index.max_contiguous_minutes(0), 30);
        assert_eq!(index.max_contiguous_minutes(1), 60);
        assert_eq!(index.selectable_starts(), vec![1]);
    }

    #[test]
    fn empty_and_out_of_range_yield_zero() {
        let empty = SlotIndex::new(Vec::new());
        assert_eq!(empty.slot_minutes, DEFAULT_SLOT_MINUTES);
        assert_eq!(empty.max_contiguous_minutes(0), 0);
        assert!(empty.selectable_starts().is_empty());

        let index = gap_scenario();
        assert_eq!(index.max_contiguous_minutes(4), 0);
        assert_eq!(index.max_contiguous_minutes(usize::MAX), 0);
    }

    #[test]
    fn removing_counted_availability_strictly_decreases() {
        let base = open_day(8, 8);
        let start = 2;
        let before = base.max_contiguous_minutes(start);
        for j in start..base.len() {
            let mut changed = base.clone();
            changed.slots[j].status = SlotStatus::Reserved;
            assert!(changed.max_contiguous_minutes(start) < before, "slot {j}");
        }
    }

    #[test]
    fn selectable_starts_are_available() {
        let index = SlotIndex::new(vec![
            slot("08:00", "08:30", SlotStatus::Reserved),
            slot("08:30", "09:00", SlotStatus::Available),
            slot("09:00", "09:30", SlotStatus::Available),
            slot("09:30", "10:00", SlotStatus::Other("MANTENIMIENTO".into())),
            slot("10:00", "10:30", SlotStatus::Available),
            slot("10:30", "11:00", SlotStatus::Available),
            slot("11:00", "11:30", SlotStatus::Available),
        ]);
        let starts = index.selectable_starts();
        assert_eq!(starts, vec![1, 4, 5]);
        assert!(starts.iter().all(|i| index.slots[*i].status.is_available()));
    }

    #[test]
    fn durations_are_capped_by_run_and_policy() {
        assert_eq!(allowed_durations(60).allowed, vec![60]);
        assert_eq!(allowed_durations(75).allowed, vec![60]);
        assert_eq!(allowed_durations(120).allowed, vec![60, 90, 120]);
        assert_eq!(allowed_durations(600).allowed, CANDIDATE_DURATIONS.to_vec());
        assert!(allowed_durations(30).is_empty());
        assert_eq!(allowed_durations(600).default_minutes(), Some(60));

        let index = open_day(8, 30);
        for i in index.selectable_starts() {
            let max = index.max_contiguous_minutes(i);
            let choice = index.durations_from(i);
            assert!(!choice.is_empty());
            assert!(choice
                .allowed
                .iter()
                .all(|d| *d <= max.min(MAX_BOOKING_MINUTES) && CANDIDATE_DURATIONS.contains(d)));
        }
    }

    #[test]
    fn end_time_projection() {
        assert_eq!(project_end(t("08:00"), 90), Some(t("09:30")));
        assert_eq!(project_end(t("22:30"), 60), Some(t("23:30")));
        assert_eq!(project_end(t("23:30"), 60), None);
    }

    #[test]
    fn granularity_comes_from_first_slot() {
        let hourly = SlotIndex::new(vec![
            slot("08:00", "09:00", SlotStatus::Available),
            slot("09:00", "10:00", SlotStatus::Available),
        ]);
        assert_eq!(hourly.slot_minutes, 60);
        assert_eq!(hourly.max_contiguous_minutes(0), 120);

        let degenerate = SlotIndex::new(vec![slot("08:00", "08:00", SlotStatus::Available)]);
        assert_eq!(degenerate.slot_minutes, DEFAULT_SLOT_MINUTES);
    }

    #[test]
    fn response_is_sorted_and_unreadable_entries_dropped() {
        let response = DailyAvailability {
            installation_id: Some(4),
            installation_name: Some("Pádel 2".into()),
            date: Some("2024-01-01".into()),
            slots: vec![
                TimeSlotRecord {
                    start: Some("2024-01-01T08:30:00".into()),
                    end: Some("2024-01-01T09:00:00".into()),
                    status: Some("DISPONIBLE".into()),
                    reason: None,
                },
                TimeSlotRecord {
                    start: Some("2024-01-01T08:00:00".into()),
                    end: Some("2024-01-01T08:30:00".into()),
                    status: Some("DISPONIBLE".into()),
                    reason: None,
                },
                TimeSlotRecord {
                    start: Some("garbage".into()),
                    end: None,
                    status: Some("DISPONIBLE".into()),
                    reason: None,
                },
            ],
        };

        let index = SlotIndex::from_response(&response);
        assert_eq!(index.len(), 2);
        assert_eq!(index.slots[0].start, t("08:00"));
        assert_eq!(index.date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(index.selectable_starts(), vec![0]);
    }

    #[test]
    fn rerunning_is_idempotent() {
        let index = gap_scenario();
        let first = (index.selectable_starts(), index.durations_from(0));
        let second = (index.selectable_starts(), index.durations_from(0));
        assert_eq!(first, second);
        assert_eq!(SlotIndex::new(index.slots.clone()), index);
    }

    #[test]
    fn status_tags() {
        assert_eq!(SlotStatus::from_tag(Some("disponible")), SlotStatus::Available);
        assert_eq!(SlotStatus::from_tag(Some("BLOQUEADO")), SlotStatus::Blocked);
        assert_eq!(SlotStatus::from_tag(Some("RESERVADO")), SlotStatus::Reserved);
        assert_eq!(SlotStatus::from_tag(None), SlotStatus::Other(String::new()));
        assert!(!SlotStatus::from_tag(Some("DESCONOCIDO")).is_available());
    }

    #[test]
    fn labels() {
        assert_eq!(duration_label(60), "1 hora");
        assert_eq!(duration_label(120), "2 horas");
        assert_eq!(duration_label(90), "1 h 30 min");
        assert_eq!(minutes_between(t("08:00"), t("09:30")), 90);
        assert_eq!(minutes_between(t("09:00"), t("09:00")), 60);
    }
}
