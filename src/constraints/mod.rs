//! Hard feasibility rules.
//!
//! The [`checker`] walks a weekly event list in order and flags each event at
//! the first rule it breaks; [`repair`] relocates flagged events to the first
//! feasible (day, pair, classroom) cell or drops them.

pub mod checker;
pub mod ledger;
pub mod repair;

pub use self::checker::{check, is_feasible, Conflict};
pub use self::ledger::{Ledger, Occupancy};
pub use self::repair::{repair, DroppedLesson, RepairOutcome};

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Hard rules, listed in the order the checker evaluates them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    #[strum(to_string = "outside the Mon-Fri teaching grid")]
    OutsideWeekGrid,
    #[strum(to_string = "teacher required-free slot")]
    RequiredFree,
    #[strum(to_string = "teacher daily pair cap")]
    TeacherDailyCap,
    #[strum(to_string = "group daily pair cap")]
    GroupDailyCap,
    #[strum(to_string = "classroom daily pair cap")]
    ClassroomDailyCap,
    #[strum(to_string = "slot already occupied")]
    SlotOccupied,
    #[strum(to_string = "classroom too small")]
    CapacityExceeded,
    #[strum(to_string = "no matching teaching assignment")]
    Unqualified,
}
