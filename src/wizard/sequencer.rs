//! Step sequencer: linear forward navigation with validation gates.
//!
//! `next` validates (personal info on the first step, required sections on
//! the last); `back` and `jump_to` never do. Users may always retreat or
//! jump, but only `next` leads to submission.

use serde::Serialize;

use crate::error::WizardError;
use crate::profile::{
    PersonalInfoErrors, ProfileDraft, Section, incomplete_required_sections, is_section_complete,
    validate_personal_info,
};

use super::step::WizardStep;

/// Result of a `next` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved forward to this step.
    Advanced(WizardStep),
    /// Personal info failed validation; the step did not change.
    Invalid(PersonalInfoErrors),
    /// On the last step with every required section complete.
    ReadyToSubmit,
    /// On the last step but these required sections are incomplete.
    SubmissionBlocked(Vec<Section>),
}

/// Per-step completion indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepStatus {
    pub step: WizardStep,
    pub complete: bool,
    pub current: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepSequencer {
    current: usize,
}

impl StepSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> WizardStep {
        WizardStep::ALL[self.current]
    }

    /// Validate the current step and move forward.
    pub fn next(&mut self, draft: &ProfileDraft) -> StepOutcome {
        let step = self.current_step();

        if step == WizardStep::Personal {
            if let Err(errors) = validate_personal_info(draft) {
                return StepOutcome::Invalid(errors);
            }
        }

        if step.is_last() {
            let incomplete = incomplete_required_sections(draft);
            return if incomplete.is_empty() {
                StepOutcome::ReadyToSubmit
            } else {
                StepOutcome::SubmissionBlocked(incomplete)
            };
        }

        self.current += 1;
        StepOutcome::Advanced(self.current_step())
    }

    /// Move back one step; stays at the first step.
    pub fn back(&mut self) -> WizardStep {
        self.current = self.current.saturating_sub(1);
        self.current_step()
    }

    /// Navigate directly to a step without validation.
    pub fn jump_to(&mut self, index: usize) -> Result<WizardStep, WizardError> {
        let step = WizardStep::from_index(index).ok_or(WizardError::StepOutOfRange {
            index,
            len: WizardStep::COUNT,
        })?;
        self.current = index;
        Ok(step)
    }

    /// Completion indicator for every step.
    pub fn step_statuses(&self, draft: &ProfileDraft) -> Vec<StepStatus> {
        WizardStep::ALL
            .into_iter()
            .map(|step| StepStatus {
                step,
                complete: match step {
                    WizardStep::Personal => validate_personal_info(draft).is_ok(),
                    _ => step.sections().iter().all(|s| is_section_complete(*s, draft)),
                },
                current: step.index() == self.current,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::draft::{EmergencyContact, Gender};

    fn personal_only() -> ProfileDraft {
        ProfileDraft {
            name: "Jane Doe".into(),
            phone: "9876543210".into(),
            ..Default::default()
        }
    }

    fn complete_draft() -> ProfileDraft {
        let mut draft = ProfileDraft {
            date_of_birth: "1990-05-15".into(),
            gender: Some(Gender::Female),
            blood_type: "O+".into(),
            height: "165".into(),
            weight: "60".into(),
            ..personal_only()
        };
        draft.address.street = "12 MG Road".into();
        draft.address.city = "Pune".into();
        draft.address.country = "India".into();
        draft.emergency_contacts.push(EmergencyContact {
            name: "Raj".into(),
            relationship: "Brother".into(),
            phone: "9123456780".into(),
            email: String::new(),
        });
        draft
    }

    #[test]
    fn empty_draft_cannot_leave_first_step() {
        let mut seq = StepSequencer::new();
        match seq.next(&ProfileDraft::default()) {
            StepOutcome::Invalid(errors) => {
                assert!(errors.name.is_some());
                assert!(errors.phone.is_some());
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn valid_personal_info_advances() {
        let mut seq = StepSequencer::new();
        assert_eq!(
            seq.next(&personal_only()),
            StepOutcome::Advanced(WizardStep::BasicInfo)
        );
        assert_eq!(seq.current_index(), 1);
    }

    #[test]
    fn middle_steps_advance_without_validation() {
        let mut seq = StepSequencer::new();
        let draft = personal_only();
        let expected = [
            WizardStep::BasicInfo,
            WizardStep::Contact,
            WizardStep::Emergency,
            WizardStep::Vitals,
            WizardStep::Health,
        ];
        for step in expected {
            assert_eq!(seq.next(&draft), StepOutcome::Advanced(step));
        }
        assert_eq!(seq.current_index(), 5);
    }

    #[test]
    fn last_step_blocks_on_missing_country() {
        let mut draft = complete_draft();
        draft.address.country.clear();

        let mut seq = StepSequencer::new();
        seq.jump_to(5).unwrap();
        assert_eq!(
            seq.next(&draft),
            StepOutcome::SubmissionBlocked(vec![Section::Contact])
        );
        assert_eq!(seq.current_index(), 5);
    }

    #[test]
    fn last_step_ready_when_complete() {
        let mut seq = StepSequencer::new();
        seq.jump_to(5).unwrap();
        assert_eq!(seq.next(&complete_draft()), StepOutcome::ReadyToSubmit);
        assert_eq!(seq.current_index(), 5);
    }

    #[test]
    fn back_is_floored_and_unvalidated() {
        let mut seq = StepSequencer::new();
        assert_eq!(seq.back(), WizardStep::Personal);
        assert_eq!(seq.current_index(), 0);

        seq.jump_to(3).unwrap();
        assert_eq!(seq.back(), WizardStep::Contact);
        assert_eq!(seq.current_index(), 2);
    }

    #[test]
    fn jump_to_skips_validation_but_checks_range() {
        let mut seq = StepSequencer::new();
        // Empty draft would fail personal validation via next().
        assert_eq!(seq.jump_to(4), Ok(WizardStep::Vitals));
        assert_eq!(seq.current_index(), 4);

        assert_eq!(
            seq.jump_to(6),
            Err(WizardError::StepOutOfRange { index: 6, len: 6 })
        );
        assert_eq!(seq.current_index(), 4);
    }

    #[test]
    fn step_statuses_reflect_draft() {
        let mut seq = StepSequencer::new();
        seq.jump_to(2).unwrap();
        let statuses = seq.step_statuses(&personal_only());

        assert_eq!(statuses.len(), WizardStep::COUNT);
        assert!(statuses[0].complete);
        assert!(!statuses[1].complete);
        assert!(!statuses[2].complete);
        assert!(statuses[2].current);
        assert!(statuses[4].complete);
        assert!(statuses[5].complete);
        assert_eq!(statuses.iter().filter(|s| s.current).count(), 1);
    }
}
