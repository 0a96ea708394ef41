//! State behind the booking page.
//!
//! The page owns exactly one [`BookingState`] inside a signal and only ever
//! changes it through these methods. Availability responses carry the
//! [`AvailabilityRequest`] ticket they were requested with, so a slow answer
//! for a previous installation, date or refresh cannot overwrite the grid
//! the user is looking at.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::installation::Installation;
use super::pricing::{self, Price};
use super::slots::{project_end, DurationChoice, SlotIndex};
use crate::utils::date::format_start_instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilityKey {
    pub installation_id: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedReservation {
    pub installation_id: i64,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub duration_minutes: u32,
}

impl SelectedReservation {
    pub fn to_request(&self, user_id: i64) -> NewReservation {
        NewReservation {
            user_id,
            installation_id: self.installation_id,
            start: format_start_instant(self.date.and_time(self.start)),
            duration_minutes: self.duration_minutes,
        }
    }
}

/// Body of `POST /reservations`, sent as query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub user_id: i64,
    pub installation_id: i64,
    pub start: String,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no availability loaded")]
    NoAvailability,
    #[error("slot {0} is not a valid start time")]
    NotSelectable(usize),
    #[error("no start time selected")]
    NoBaseSlot,
    #[error("{0} minutes is not an allowed duration here")]
    DurationNotAllowed(u32),
    #[error("booking would run past midnight")]
    CrossesMidnight,
}

/// One availability lookup. Two lookups for the same key still differ by
/// `seq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub key: AvailabilityKey,
    pub seq: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingState {
    pub installations: Vec<Installation>,
    current: Option<AvailabilityRequest>,
    next_seq: u64,
    availability: Option<SlotIndex>,
    base_index: Option<usize>,
    duration: Option<u32>,
}

impl BookingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_key(&self) -> Option<AvailabilityKey> {
        self.current.map(|request| request.key)
    }

    pub fn is_current(&self, request: AvailabilityRequest) -> bool {
        self.current == Some(request)
    }

    pub fn availability(&self) -> Option<&SlotIndex> {
        self.availability.as_ref()
    }

    pub fn base_index(&self) -> Option<usize> {
        self.base_index
    }

    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    pub fn installation(&self, id: i64) -> Option<&Installation> {
        self.installations.iter().find(|inst| inst.id == id)
    }

    /// Starts a new (installation, date) lookup. The old grid and selection
    /// are dropped right away.
    pub fn begin_request(&mut self, key: AvailabilityKey) -> AvailabilityRequest {
        self.next_seq += 1;
        let request = AvailabilityRequest {
            key,
            seq: self.next_seq,
        };
        self.current = Some(request);
        self.availability = None;
        self.clear_selection();
        request
    }

    /// Forgets the current lookup, its grid and any selection. Used when the
    /// inputs no longer name an installation and date.
    pub fn reset(&mut self) {
        self.current = None;
        self.availability = None;
        self.clear_selection();
    }

    /// Returns `false` and leaves the state alone when the response belongs
    /// to a request that has since been superseded.
    pub fn apply_availability(&mut self, request: AvailabilityRequest, index: SlotIndex) -> bool {
        if !self.is_current(request) {
            log::debug!("discarding stale availability for {:?}", request);
            return false;
        }
        self.availability = Some(index);
        self.clear_selection();
        true
    }

    /// Marks `request` as failed; a stale failure is ignored.
    pub fn fail_request(&mut self, request: AvailabilityRequest) -> bool {
        if !self.is_current(request) {
            return false;
        }
        self.availability = None;
        self.clear_selection();
        true
    }

    pub fn clear_selection(&mut self) {
        self.base_index = None;
        self.duration = None;
    }

    pub fn selectable_starts(&self) -> Vec<usize> {
        self.availability
            .as_ref()
            .map(SlotIndex::selectable_starts)
            .unwrap_or_default()
    }

    /// Picks the base slot. An index that is no longer a valid start clears
    /// the selection instead of falling back to a neighbour.
    pub fn select_start(&mut self, index: usize) -> Result<DurationChoice, SelectionError> {
        let Some(slots) = self.availability.as_ref() else {
            self.clear_selection();
            return Err(SelectionError::NoAvailability);
        };
        if !slots.is_selectable(index) {
            self.clear_selection();
            return Err(SelectionError::NotSelectable(index));
        }

        let choice = slots.durations_from(index);
        self.base_index = Some(index);
        self.duration = choice.default_minutes();
        Ok(choice)
    }

    pub fn duration_choice(&self) -> Option<DurationChoice> {
        let slots = self.availability.as_ref()?;
        self.base_index.map(|index| slots.durations_from(index))
    }

    pub fn set_duration(&mut self, minutes: u32) -> Result<(), SelectionError> {
        let choice = self.duration_choice().ok_or(SelectionError::NoBaseSlot)?;
        if !choice.contains(minutes) {
            return Err(SelectionError::DurationNotAllowed(minutes));
        }
        self.duration = Some(minutes);
        Ok(())
    }

    pub fn try_selection(&self) -> Result<SelectedReservation, SelectionError> {
        let key = self.current_key().ok_or(SelectionError::NoAvailability)?;
        let slots = self.availability.as_ref().ok_or(SelectionError::NoAvailability)?;
        let index = self.base_index.ok_or(SelectionError::NoBaseSlot)?;
        let minutes = self.duration.ok_or(SelectionError::NoBaseSlot)?;
        let base = slots.get(index).ok_or(SelectionError::NotSelectable(index))?;
        let end = project_end(base.start, minutes).ok_or(SelectionError::CrossesMidnight)?;

        Ok(SelectedReservation {
            installation_id: key.installation_id,
            date: key.date,
            start: base.start,
            end,
            duration_minutes: minutes,
        })
    }

    pub fn selection(&self) -> Option<SelectedReservation> {
        self.try_selection().ok()
    }

    pub fn quote(&self) -> Option<Price> {
        self.selection().map(|s| pricing::price(s.duration_minutes))
    }
}
