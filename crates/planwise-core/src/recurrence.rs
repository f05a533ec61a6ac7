use chrono::{Days, Months, NaiveDate};
use std::iter::FusedIterator;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{OwnerId, RecurrenceFrequency, Task, TaskTemplate};

/// Steps a date forward by one interval of the given frequency.
///
/// Months use calendar arithmetic: when the day does not exist in the target
/// month the result is clamped to that month's last day (Jan 31 -> Feb 29).
/// Returns `None` only when the result would leave chrono's date range.
#[inline]
pub fn step(date: NaiveDate, frequency: RecurrenceFrequency) -> Option<NaiveDate> {
    match frequency {
        RecurrenceFrequency::Daily => date.checked_add_days(Days::new(1)),
        RecurrenceFrequency::Weekly => date.checked_add_days(Days::new(7)),
        RecurrenceFrequency::Monthly => date.checked_add_months(Months::new(1)),
    }
}

/// Lazy, finite sequence of occurrence dates for one recurrence.
///
/// Each date is derived from the previous occurrence, so a clamped month-end
/// day carries forward: Jan 31, Feb 29, Mar 29, Apr 29.
#[derive(Debug, Clone)]
pub struct Occurrences {
    next: Option<NaiveDate>,
    until: NaiveDate,
    frequency: RecurrenceFrequency,
}

impl Occurrences {
    /// Builds the occurrence sequence from `start` to `until`, both inclusive.
    ///
    /// # Behavior
    /// - Missing `start` or `until`: empty sequence
    /// - `start > until`: empty sequence
    /// - Missing frequency with both dates present: `InvalidFrequency`
    pub fn new(
        start: Option<NaiveDate>,
        until: Option<NaiveDate>,
        frequency: Option<RecurrenceFrequency>,
    ) -> Result<Self, CoreError> {
        let (start, until) = match (start, until) {
            (Some(start), Some(until)) => (start, until),
            _ => return Ok(Self::empty()),
        };
        let frequency = frequency.ok_or_else(|| {
            CoreError::InvalidFrequency("a recurring task needs a frequency".to_string())
        })?;

        Ok(Self {
            next: Some(start),
            until,
            frequency,
        })
    }

    fn empty() -> Self {
        Self {
            next: None,
            until: NaiveDate::MIN,
            frequency: RecurrenceFrequency::Daily,
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|date| *date <= self.until)?;
        self.next = step(current, self.frequency);
        Some(current)
    }
}

impl FusedIterator for Occurrences {}

/// RecurrenceExpander: turns one recurring template into the concrete task
/// rows of its series.
///
/// The expander is pure. It assigns ids and timestamps but never touches
/// the database; persisting the rows (atomically) is the caller's job.
#[derive(Debug, Clone)]
pub struct RecurrenceExpander {
    template: TaskTemplate,
    owner: OwnerId,
    series_id: Uuid,
}

impl RecurrenceExpander {
    /// Creates an expander for a brand new series with a fresh series id.
    pub fn new(template: TaskTemplate, owner: OwnerId) -> Self {
        Self::with_series_id(template, owner, Uuid::new_v4())
    }

    /// Creates an expander that regenerates an existing series under its id.
    pub fn with_series_id(template: TaskTemplate, owner: OwnerId, series_id: Uuid) -> Self {
        Self {
            template,
            owner,
            series_id,
        }
    }

    pub fn series_id(&self) -> Uuid {
        self.series_id
    }

    /// Occurrence dates of the series, due date through recurrence end date.
    pub fn occurrences(&self) -> Result<Occurrences, CoreError> {
        Occurrences::new(
            self.template.due_date,
            self.template.recurrence_end_date,
            self.template.recurrence_frequency,
        )
    }

    /// Generates the series instances in date order.
    ///
    /// # Returns
    /// * `Result<SeriesInstances, CoreError>` - Lazy iterator of task rows or error
    ///
    /// # Behavior
    /// - One row per occurrence, all sharing `series_id`
    /// - Every row is recurring, incomplete and owned by the acting owner
    /// - Title, description, category, parent, frequency and end date are copied
    ///   from the template
    pub fn expand(&self) -> Result<SeriesInstances<'_>, CoreError> {
        Ok(SeriesInstances {
            expander: self,
            occurrences: self.occurrences()?,
        })
    }

    fn instance(&self, due_date: NaiveDate) -> Task {
        let mut task = Task::from_template(&self.template, &self.owner, Some(due_date), self.series_id);
        task.is_recurring = true;
        task.is_completed = false;
        task
    }
}

/// Task rows produced by [`RecurrenceExpander::expand`].
#[derive(Debug)]
pub struct SeriesInstances<'a> {
    expander: &'a RecurrenceExpander,
    occurrences: Occurrences,
}

impl Iterator for SeriesInstances<'_> {
    type Item = Task;

    fn next(&mut self) -> Option<Task> {
        self.occurrences
            .next()
            .map(|due_date| self.expander.instance(due_date))
    }
}

impl FusedIterator for SeriesInstances<'_> {}
