// --- File: crates/reserva_booking/src/flow.rs ---
//! The booking wizard as an explicit state machine.
//!
//! `BookingFlow` is a plain value: every transition takes the flow and returns the next
//! one. It knows nothing about calendars; it only reacts to the outcome of a commit.
//!
//! Commits are asynchronous, so a result can arrive after the user has navigated away.
//! [`BookingFlow::begin_submission`] hands out a [`SubmissionTicket`] tied to the current
//! generation. Navigation, form edits and reset move to a new generation, and a signal
//! carrying an older ticket is dropped.

use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::debug;

use crate::error::{BookingError, SLOT_TAKEN_MESSAGE};
use crate::models::CreateBookingRequest;
use crate::reservation::{BookingConfirmation, ReservationOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BookingStep {
    #[default]
    Service,
    DateTime,
    Email,
    Details,
    Confirmation,
}

impl BookingStep {
    pub const ALL: [BookingStep; 5] = [
        BookingStep::Service,
        BookingStep::DateTime,
        BookingStep::Email,
        BookingStep::Details,
        BookingStep::Confirmation,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<BookingStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<BookingStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

/// What the user has entered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub service_id: Option<String>,
    pub service_title: Option<String>,
    pub duration_minutes: Option<i64>,
    pub date: Option<NaiveDate>,
    /// Start of the chosen slot, with the offset it was shown in.
    pub slot: Option<DateTime<FixedOffset>>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl BookingForm {
    fn clear_date_time(&mut self) {
        self.date = None;
        self.slot = None;
    }

    /// The coordinator's input. Missing fields stay `None` and are reported there.
    pub fn to_submission(&self) -> CreateBookingRequest {
        CreateBookingRequest {
            service_id: self.service_id.clone(),
            service_title: self.service_title.clone(),
            date_time: self.slot.map(|slot| slot.to_rfc3339()),
            duration: self.duration_minutes,
            email: self.email.clone(),
            phone: self.phone.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Proof that a commit was started from a given flow generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    generation: u64,
}

/// Outcome of a commit as seen by the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitSignal {
    Confirmed(Box<BookingConfirmation>),
    Conflict,
    Failed(String),
}

impl From<Result<ReservationOutcome, BookingError>> for CommitSignal {
    fn from(result: Result<ReservationOutcome, BookingError>) -> Self {
        match result {
            Ok(ReservationOutcome::Confirmed(confirmation)) => {
                CommitSignal::Confirmed(Box::new(confirmation))
            }
            Ok(ReservationOutcome::Conflict { .. }) | Err(BookingError::Conflict) => {
                CommitSignal::Conflict
            }
            Err(err) => CommitSignal::Failed(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFlow {
    step: BookingStep,
    form: BookingForm,
    generation: u64,
    pending: Option<u64>,
    confirmation: Option<BookingConfirmation>,
    error: Option<String>,
}

impl BookingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn confirmation(&self) -> Option<&BookingConfirmation> {
        self.confirmation.as_ref()
    }

    /// Message to show on the current step, set by a conflict or a failed commit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    fn moved_to(mut self, step: BookingStep) -> Self {
        self.step = step;
        self.generation += 1;
        self.pending = None;
        self.error = None;
        self
    }

    /// Advances one step. Does nothing while a commit is pending or once confirmed.
    pub fn next_step(self) -> Self {
        if self.is_submitting() || self.step == BookingStep::Confirmation {
            return self;
        }
        match self.step.next() {
            Some(BookingStep::Confirmation) | None => self,
            Some(step) => self.moved_to(step),
        }
    }

    pub fn previous_step(self) -> Self {
        if self.step == BookingStep::Confirmation {
            return self;
        }
        match self.step.previous() {
            Some(step) => self.moved_to(step),
            None => self,
        }
    }

    /// Jumps to any step before confirmation. Confirmation is only reached by a
    /// successful commit and is left only through [`BookingFlow::reset`].
    pub fn go_to_step(self, step: BookingStep) -> Self {
        if self.step == BookingStep::Confirmation || step == BookingStep::Confirmation {
            return self;
        }
        self.moved_to(step)
    }

    /// Applies a partial edit to the form. Invalidates any pending submission.
    pub fn update_form(mut self, edit: impl FnOnce(&mut BookingForm)) -> Self {
        if self.step == BookingStep::Confirmation {
            return self;
        }
        edit(&mut self.form);
        self.generation += 1;
        self.pending = None;
        self
    }

    /// Back to the first step with an empty form.
    pub fn reset(self) -> Self {
        BookingFlow {
            generation: self.generation + 1,
            ..Self::default()
        }
    }

    /// Marks a commit as started. Only possible from `details` with nothing pending.
    pub fn begin_submission(mut self) -> (Self, Option<SubmissionTicket>) {
        if self.step != BookingStep::Details || self.is_submitting() {
            return (self, None);
        }
        self.pending = Some(self.generation);
        self.error = None;
        let ticket = SubmissionTicket {
            generation: self.generation,
        };
        (self, Some(ticket))
    }

    /// Reacts to a commit outcome. Stale tickets are ignored.
    pub fn apply_signal(mut self, ticket: SubmissionTicket, signal: CommitSignal) -> Self {
        if self.pending != Some(ticket.generation) || self.step != BookingStep::Details {
            debug!(
                "Dropping commit signal from generation {} (now {})",
                ticket.generation, self.generation
            );
            return self;
        }
        self.pending = None;

        match signal {
            CommitSignal::Confirmed(confirmation) => {
                self.confirmation = Some(*confirmation);
                self.moved_to(BookingStep::Confirmation)
            }
            CommitSignal::Conflict => {
                self.form.clear_date_time();
                let mut flow = self.moved_to(BookingStep::DateTime);
                flow.error = Some(SLOT_TAKEN_MESSAGE.to_string());
                flow
            }
            CommitSignal::Failed(message) => {
                self.error = Some(message);
                self
            }
        }
    }
}
