//! Profile wizard: the six-step editing flow.
//!
//! The user fills a [`ProfileDraft`](crate::profile::ProfileDraft) across
//! steps. Forward navigation is gated by validation; the last step hands
//! the draft to the submission coordinator.

pub mod manager;
pub mod sequencer;
pub mod step;

pub use manager::{ProfileWizard, WizardProgress};
pub use sequencer::{StepOutcome, StepSequencer, StepStatus};
pub use step::WizardStep;
