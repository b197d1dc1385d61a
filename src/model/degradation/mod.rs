//! Aging models for the bundled cells.

mod sony_lfp_calendar;
mod sony_lfp_cyclic;

pub use sony_lfp_calendar::SonyLfpCalendarDegradation;
pub use sony_lfp_cyclic::SonyLfpCyclicDegradation;
