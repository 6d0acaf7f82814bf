//! Static bell schedule: eight 45-minute fine slots grouped into four pairs.

use crate::domain::DayOfWeek;
use chrono::NaiveTime;

/// Number of schedulable pairs per day.
pub const PAIR_COUNT: usize = 4;
/// Number of fine (45-minute) slots per day.
pub const FINE_SLOT_COUNT: usize = PAIR_COUNT * 2;
/// Academic hours covered by one pair.
pub const HOURS_PER_PAIR: u32 = 2;

pub const WORKING_DAYS: [DayOfWeek; 5] = [
    DayOfWeek::Monday,
    DayOfWeek::Tuesday,
    DayOfWeek::Wednesday,
    DayOfWeek::Thursday,
    DayOfWeek::Friday,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub index: usize,
    pub start: (u32, u32),
    pub end: (u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairSlot {
    pub pair_index: usize,
    pub start_slot: usize,
    pub end_slot: usize,
}

pub const TIME_SLOTS: [TimeSlot; FINE_SLOT_COUNT] = [
    TimeSlot { index: 0, start: (8, 40), end: (9, 25) },
    TimeSlot { index: 1, start: (9, 30), end: (10, 15) },
    TimeSlot { index: 2, start: (10, 35), end: (11, 20) },
    TimeSlot { index: 3, start: (11, 25), end: (12, 10) },
    TimeSlot { index: 4, start: (12, 20), end: (13, 5) },
    TimeSlot { index: 5, start: (13, 10), end: (13, 55) },
    TimeSlot { index: 6, start: (14, 5), end: (14, 50) },
    TimeSlot { index: 7, start: (14, 55), end: (15, 40) },
];

pub const PAIR_SLOTS: [PairSlot; PAIR_COUNT] = [
    PairSlot { pair_index: 0, start_slot: 0, end_slot: 1 },
    PairSlot { pair_index: 1, start_slot: 2, end_slot: 3 },
    PairSlot { pair_index: 2, start_slot: 4, end_slot: 5 },
    PairSlot { pair_index: 3, start_slot: 6, end_slot: 7 },
];

fn clock((hour, minute): (u32, u32)) -> NaiveTime {
    // Table entries are valid wall-clock times.
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

impl TimeSlot {
    pub fn start_time(&self) -> NaiveTime {
        clock(self.start)
    }

    pub fn end_time(&self) -> NaiveTime {
        clock(self.end)
    }
}

impl PairSlot {
    /// Wall-clock start of the first fine slot.
    pub fn start_time(&self) -> NaiveTime {
        TIME_SLOTS[self.start_slot].start_time()
    }

    /// Wall-clock end of the second fine slot.
    pub fn end_time(&self) -> NaiveTime {
        TIME_SLOTS[self.end_slot].end_time()
    }

    pub fn fine_slots(&self) -> [&'static TimeSlot; 2] {
        [&TIME_SLOTS[self.start_slot], &TIME_SLOTS[self.end_slot]]
    }
}

/// Pair that contains the given fine slot, if the index is in range.
pub fn slot_to_pair(slot_index: usize) -> Option<usize> {
    PAIR_SLOTS
        .iter()
        .find(|p| p.start_slot == slot_index || p.end_slot == slot_index)
        .map(|p| p.pair_index)
}
