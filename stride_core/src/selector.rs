//! Two-tap date-range selection state machine.
//!
//! Transient UI selection state: a first tap records a pending start, a
//! second tap at or after it commits the range, and a second tap before it
//! becomes the new pending start. The selector never swaps endpoints.

use chrono::NaiveDate;

/// Which endpoint the next tap selects
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPhase {
    SelectingStart,
    SelectingEnd,
}

/// Range selection state driven by calendar taps
#[derive(Debug)]
pub struct DateRangeSelector {
    phase: SelectionPhase,
    pending_start: Option<NaiveDate>,
    committed: Option<(NaiveDate, NaiveDate)>,
}

impl Default for DateRangeSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl DateRangeSelector {
    pub fn new() -> Self {
        Self {
            phase: SelectionPhase::SelectingStart,
            pending_start: None,
            committed: None,
        }
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn pending_start(&self) -> Option<NaiveDate> {
        self.pending_start
    }

    /// The most recently committed range, if any
    pub fn committed(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.committed
    }

    /// Handle a tap on `day`; returns the committed range when the tap
    /// completes one.
    ///
    /// A tap earlier than the pending start restarts selection from that
    /// day rather than committing a reversed range.
    pub fn tap(&mut self, day: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self.phase {
            SelectionPhase::SelectingStart => {
                self.pending_start = Some(day);
                self.phase = SelectionPhase::SelectingEnd;
                None
            }
            SelectionPhase::SelectingEnd => match self.pending_start {
                Some(start) if day >= start => {
                    let range = (start, day);
                    self.committed = Some(range);
                    self.pending_start = None;
                    self.phase = SelectionPhase::SelectingStart;
                    Some(range)
                }
                _ => {
                    self.pending_start = Some(day);
                    None
                }
            },
        }
    }

    /// Abandon any pending start and return to selecting one
    pub fn reset(&mut self) {
        self.pending_start = None;
        self.phase = SelectionPhase::SelectingStart;
    }
}
