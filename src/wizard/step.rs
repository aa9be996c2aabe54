//! Wizard steps, in their fixed order.

use serde::{Deserialize, Serialize};

use crate::profile::Section;

/// The six steps of the profile wizard.
///
/// Progresses linearly: Personal → BasicInfo → Contact → Emergency →
/// Vitals → Health, then submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    Personal,
    BasicInfo,
    Contact,
    Emergency,
    Vitals,
    Health,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        Self::Personal,
        Self::BasicInfo,
        Self::Contact,
        Self::Emergency,
        Self::Vitals,
        Self::Health,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Personal => 0,
            Self::BasicInfo => 1,
            Self::Contact => 2,
            Self::Emergency => 3,
            Self::Vitals => 4,
            Self::Health => 5,
        }
    }

    pub fn is_last(&self) -> bool {
        matches!(self, Self::Health)
    }

    /// Sections whose fields are edited on this step.
    pub fn sections(&self) -> &'static [Section] {
        match self {
            Self::Personal => &[],
            Self::BasicInfo => &[Section::BasicInfo],
            Self::Contact => &[Section::Contact],
            Self::Emergency => &[Section::Emergency],
            Self::Vitals => &[Section::Vitals],
            Self::Health => &[Section::Allergies, Section::Medications],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Personal => "Personal Information",
            Self::BasicInfo => "Basic Health Information",
            Self::Contact => "Contact Details",
            Self::Emergency => "Emergency Contacts",
            Self::Vitals => "Vital Signs",
            Self::Health => "Allergies & Medications",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Personal => "personal",
            Self::BasicInfo => "basic-info",
            Self::Contact => "contact",
            Self::Emergency => "emergency",
            Self::Vitals => "vitals",
            Self::Health => "health",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_position() {
        for (i, step) in WizardStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
            assert_eq!(WizardStep::from_index(i), Some(*step));
        }
        assert_eq!(WizardStep::from_index(WizardStep::COUNT), None);
    }

    #[test]
    fn only_health_is_last() {
        let last: Vec<_> = WizardStep::ALL.iter().filter(|s| s.is_last()).collect();
        assert_eq!(last, [&WizardStep::Health]);
    }

    #[test]
    fn titles_are_distinct() {
        let mut titles: Vec<_> = WizardStep::ALL.iter().map(|s| s.title()).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), WizardStep::COUNT);
        assert_eq!(WizardStep::Health.title(), "Allergies & Medications");
    }

    #[test]
    fn display_matches_serde() {
        for step in WizardStep::ALL {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{step}\""), json, "Display and serde should match for {step:?}");
        }
    }

    #[test]
    fn every_section_belongs_to_one_step() {
        for section in Section::ALL {
            let owners = WizardStep::ALL
                .iter()
                .filter(|s| s.sections().contains(&section))
                .count();
            assert_eq!(owners, 1, "{section} should belong to exactly one step");
        }
    }
}
