//! ProfileWizard: coordinates the draft, step navigation and submission.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{ApiError, SubmissionError, WizardError};
use crate::profile::{BackendProfile, ProfileDraft, ReviewSummary, to_ui_model};
use crate::submission::SubmissionCoordinator;

use super::sequencer::{StepOutcome, StepSequencer, StepStatus};
use super::step::WizardStep;

/// Result of pressing "next" in the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardProgress {
    /// Moved to another step, or stayed with validation feedback.
    Step(StepOutcome),
    /// The profile was saved; the draft now reflects the reconciled profile.
    Submitted(Box<BackendProfile>),
}

pub struct ProfileWizard {
    coordinator: Arc<SubmissionCoordinator>,
    sequencer: StepSequencer,
    draft: ProfileDraft,
}

impl ProfileWizard {
    pub fn new(coordinator: Arc<SubmissionCoordinator>, draft: ProfileDraft) -> Self {
        Self {
            coordinator,
            sequencer: StepSequencer::new(),
            draft,
        }
    }

    /// Build the wizard from the stored profile (empty when none exists).
    pub async fn mount(coordinator: Arc<SubmissionCoordinator>) -> Result<Self, ApiError> {
        let draft = coordinator.load_draft().await?;
        Ok(Self::new(coordinator, draft))
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProfileDraft {
        &mut self.draft
    }

    pub fn current_step(&self) -> WizardStep {
        self.sequencer.current_step()
    }

    pub fn step_statuses(&self) -> Vec<StepStatus> {
        self.sequencer.step_statuses(&self.draft)
    }

    pub fn review(&self) -> ReviewSummary {
        ReviewSummary::from_draft(&self.draft)
    }

    pub fn is_submitting(&self) -> bool {
        self.coordinator.is_submitting()
    }

    /// Advance, submitting from the last step when the draft is complete.
    ///
    /// A failed submission leaves the draft untouched for another attempt.
    pub async fn next(&mut self) -> Result<WizardProgress, SubmissionError> {
        match self.sequencer.next(&self.draft) {
            StepOutcome::ReadyToSubmit => {
                let saved = self.coordinator.submit(&self.draft).await.map_err(|e| {
                    warn!(error = %e, "Profile submission failed, draft kept");
                    e
                })?;
                self.draft = to_ui_model(&saved);
                info!("Profile wizard completed");
                Ok(WizardProgress::Submitted(Box::new(saved)))
            }
            outcome => Ok(WizardProgress::Step(outcome)),
        }
    }

    pub fn back(&mut self) -> WizardStep {
        self.sequencer.back()
    }

    pub fn jump_to(&mut self, index: usize) -> Result<WizardStep, WizardError> {
        self.sequencer.jump_to(index)
    }

    /// Replace the draft with a freshly fetched profile.
    ///
    /// Local edits are discarded without reconciliation.
    pub fn apply_refresh(&mut self, profile: &BackendProfile) {
        self.draft = to_ui_model(profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Section;
    use crate::profile::draft::{EmergencyContact, Gender};
    use crate::submission::tests::{Call, StubApi, coordinator};

    fn fill_required(draft: &mut ProfileDraft) {
        draft.name = "Jane Doe".into();
        draft.phone = "9876543210".into();
        draft.date_of_birth = "1990-05-15".into();
        draft.gender = Some(Gender::Female);
        draft.blood_type = "o+".into();
        draft.height = "165".into();
        draft.weight = "60".into();
        draft.address.street = "12 MG Road".into();
        draft.address.city = "Pune".into();
        draft.address.country = "India".into();
        draft.emergency_contacts.push(EmergencyContact {
            name: "Raj".into(),
            relationship: "Brother".into(),
            phone: "9123456780".into(),
            email: String::new(),
        });
    }

    async fn mounted(api: Arc<StubApi>) -> ProfileWizard {
        ProfileWizard::mount(Arc::new(coordinator(api, "tok")))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn walks_all_steps_and_submits() {
        let api = Arc::new(StubApi::default());
        let mut wizard = mounted(Arc::clone(&api)).await;
        assert_eq!(wizard.draft(), &ProfileDraft::default());

        fill_required(wizard.draft_mut());
        for _ in 0..5 {
            assert!(matches!(
                wizard.next().await.unwrap(),
                WizardProgress::Step(StepOutcome::Advanced(_))
            ));
        }
        assert_eq!(wizard.current_step(), WizardStep::Health);

        let WizardProgress::Submitted(saved) = wizard.next().await.unwrap() else {
            panic!("expected submission");
        };
        assert_eq!(saved.blood_type, "O+");
        assert_eq!(wizard.draft().blood_type, "O+");
        assert_eq!(
            api.calls(),
            vec![Call::Fetch, Call::Fetch, Call::Create, Call::Fetch]
        );
    }

    #[tokio::test]
    async fn blocked_submission_makes_no_calls() {
        let api = Arc::new(StubApi::default());
        let mut wizard = mounted(Arc::clone(&api)).await;
        fill_required(wizard.draft_mut());
        wizard.draft_mut().address.country.clear();
        wizard.jump_to(5).unwrap();

        assert_eq!(
            wizard.next().await.unwrap(),
            WizardProgress::Step(StepOutcome::SubmissionBlocked(vec![Section::Contact]))
        );
        // Only the mount-time load.
        assert_eq!(api.calls(), vec![Call::Fetch]);
    }

    #[tokio::test]
    async fn failed_submission_keeps_draft() {
        let api = Arc::new(StubApi::default());
        let mut wizard = mounted(Arc::clone(&api)).await;
        fill_required(wizard.draft_mut());
        let before = wizard.draft().clone();

        *api.write_error.lock().unwrap() = Some(ApiError::NetworkFailure {
            reason: "reset".into(),
        });
        wizard.jump_to(5).unwrap();
        let err = wizard.next().await.unwrap_err();
        assert!(matches!(err, SubmissionError::Api(ApiError::NetworkFailure { .. })));
        assert_eq!(wizard.draft(), &before);
        assert!(!wizard.is_submitting());
    }

    #[tokio::test]
    async fn refresh_overwrites_local_edits() {
        let api = Arc::new(StubApi::default());
        let mut wizard = mounted(api).await;
        wizard.draft_mut().name = "Edited Locally".into();

        wizard.apply_refresh(&BackendProfile {
            name: "Server Copy".into(),
            ..Default::default()
        });
        assert_eq!(wizard.draft().name, "Server Copy");
    }

    #[tokio::test]
    async fn review_reflects_draft() {
        let api = Arc::new(StubApi::default());
        let mut wizard = mounted(api).await;
        assert!(!wizard.review().is_ready());
        fill_required(wizard.draft_mut());
        assert!(wizard.review().is_ready());
        assert!(wizard.step_statuses().iter().all(|s| s.complete));
    }
}
