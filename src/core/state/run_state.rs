//! In-memory run accumulator
//!
//! Holds every record collected so far plus the date cursor. It is owned by
//! the run controller for the whole run and handed to the checkpoint store
//! by reference.

use super::checkpoint::Checkpoint;
use crate::config::ResumeMode;
use crate::domain::{Record, TribunalCode};
use chrono::NaiveDate;

/// Records collected so far and the last day they cover
///
/// # Examples
///
/// ```
/// use comunica::core::state::RunState;
/// use comunica::domain::{Record, TribunalCode};
/// use chrono::NaiveDate;
///
/// let mut state = RunState::empty(TribunalCode::new("TJMG").unwrap());
/// let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// state.complete_day(day, vec![Record::from(serde_json::json!({"id": 1}))]);
///
/// assert_eq!(state.len(), 1);
/// assert_eq!(state.last_completed_day(), Some(day));
/// ```
#[derive(Debug, Clone)]
pub struct RunState {
    tribunal: TribunalCode,
    records: Vec<Record>,
    last_completed_day: Option<NaiveDate>,
}

impl RunState {
    /// Fresh state with no records
    pub fn empty(tribunal: TribunalCode) -> Self {
        Self {
            tribunal,
            records: Vec::new(),
            last_completed_day: None,
        }
    }

    /// State recovered from a checkpoint
    ///
    /// A legacy checkpoint without a tribunal is attributed to `tribunal`.
    pub fn from_checkpoint(tribunal: TribunalCode, checkpoint: Checkpoint) -> Self {
        Self {
            tribunal,
            records: checkpoint.items,
            last_completed_day: checkpoint.last_completed_day,
        }
    }

    /// Appends one finished day's records after the existing ones and moves
    /// the cursor to `day`
    pub fn complete_day(&mut self, day: NaiveDate, records: Vec<Record>) {
        self.records.extend(records);
        self.last_completed_day = Some(day);
    }

    /// First day a run over `start..=end` should fetch, or `None` when the
    /// checkpoint already covers the whole range
    ///
    /// The cursor only counts when it falls inside the range; a checkpoint
    /// from an earlier or later period starts the range from `start`.
    pub fn first_day_to_collect(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        mode: ResumeMode,
    ) -> Option<NaiveDate> {
        let first = match (mode, self.last_completed_day) {
            (ResumeMode::AfterCheckpoint, Some(last)) if (start..=end).contains(&last) => {
                last.succ_opt()?
            }
            _ => start,
        };
        (first <= end).then_some(first)
    }

    /// Whether a cursor exists but lies outside `start..=end`
    pub fn cursor_outside(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.last_completed_day
            .is_some_and(|last| !(start..=end).contains(&last))
    }

    pub fn tribunal(&self) -> &TribunalCode {
        &self.tribunal
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last_completed_day(&self) -> Option<NaiveDate> {
        self.last_completed_day
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tjmg() -> TribunalCode {
        TribunalCode::new("TJMG").unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn records(ids: std::ops::Range<i64>) -> Vec<Record> {
        ids.map(|i| Record::from(json!({"id": i}))).collect()
    }

    #[test]
    fn test_complete_day_preserves_order() {
        let mut state = RunState::empty(tjmg());
        state.complete_day(date(1), records(0..3));
        state.complete_day(date(2), records(3..5));

        let ids: Vec<i64> = state
            .records()
            .iter()
            .map(|r| r.as_value()["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(state.last_completed_day(), Some(date(2)));
    }

    #[test]
    fn test_empty_day_moves_cursor() {
        let mut state = RunState::empty(tjmg());
        state.complete_day(date(4), Vec::new());
        assert!(state.is_empty());
        assert_eq!(state.last_completed_day(), Some(date(4)));
    }

    #[test]
    fn test_first_day_without_cursor() {
        let state = RunState::empty(tjmg());
        assert_eq!(
            state.first_day_to_collect(date(1), date(31), ResumeMode::AfterCheckpoint),
            Some(date(1))
        );
    }

    #[test]
    fn test_first_day_resumes_after_cursor() {
        let mut state = RunState::empty(tjmg());
        state.complete_day(date(10), records(0..1));
        assert_eq!(
            state.first_day_to_collect(date(1), date(31), ResumeMode::AfterCheckpoint),
            Some(date(11))
        );
    }

    #[test]
    fn test_restart_ignores_cursor() {
        let mut state = RunState::empty(tjmg());
        state.complete_day(date(10), records(0..1));
        assert_eq!(
            state.first_day_to_collect(date(1), date(31), ResumeMode::Restart),
            Some(date(1))
        );
    }

    #[test]
    fn test_cursor_before_range_is_ignored() {
        let mut state = RunState::empty(tjmg());
        state.complete_day(date(1), records(0..1));
        assert_eq!(
            state.first_day_to_collect(date(5), date(31), ResumeMode::AfterCheckpoint),
            Some(date(5))
        );
    }

    #[test]
    fn test_range_already_covered() {
        let mut state = RunState::empty(tjmg());
        state.complete_day(date(31), records(0..1));
        assert_eq!(
            state.first_day_to_collect(date(1), date(31), ResumeMode::AfterCheckpoint),
            None
        );
    }

    #[test]
    fn test_cursor_after_range_is_ignored() {
        let mut state = RunState::empty(tjmg());
        state.complete_day(
            NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
            records(0..1),
        );
        assert_eq!(
            state.first_day_to_collect(date(1), date(3), ResumeMode::AfterCheckpoint),
            Some(date(1))
        );
    }

    #[test]
    fn test_cursor_outside_range() {
        let mut state = RunState::empty(tjmg());
        state.complete_day(date(3), records(0..1));
        assert!(state.cursor_outside(date(1), date(2)));
        assert!(!state.cursor_outside(date(1), date(3)));
        assert!(state.cursor_outside(date(4), date(9)));
        assert!(!RunState::empty(tjmg()).cursor_outside(date(1), date(3)));
    }
}
