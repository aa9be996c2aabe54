//! Section completeness and personal-info validation.
//!
//! All checks are pure predicates over a [`ProfileDraft`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::draft::ProfileDraft;

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").unwrap());

/// A coherent group of fields checked for completeness independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    BasicInfo,
    Contact,
    Emergency,
    Vitals,
    Allergies,
    Medications,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Self::BasicInfo,
        Self::Contact,
        Self::Emergency,
        Self::Vitals,
        Self::Allergies,
        Self::Medications,
    ];

    /// Sections that must be complete before the profile can be submitted.
    pub const REQUIRED: [Section; 3] = [Self::BasicInfo, Self::Contact, Self::Emergency];

    pub fn id(&self) -> &'static str {
        match self {
            Self::BasicInfo => "basic-info",
            Self::Contact => "contact",
            Self::Emergency => "emergency",
            Self::Vitals => "vitals",
            Self::Allergies => "allergies",
            Self::Medications => "medications",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.id() == s)
            .ok_or_else(|| format!("Unknown section: {s}"))
    }
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Whether every required field of `section` is filled in.
///
/// Vitals, allergies and medications are optional and always complete.
pub fn is_section_complete(section: Section, draft: &ProfileDraft) -> bool {
    match section {
        Section::BasicInfo => {
            filled(&draft.date_of_birth)
                && draft.gender.is_some()
                && filled(&draft.blood_type)
                && filled(&draft.height)
                && filled(&draft.weight)
        }
        Section::Contact => {
            filled(&draft.address.street)
                && filled(&draft.address.city)
                && filled(&draft.address.country)
        }
        Section::Emergency => draft
            .main_contact()
            .is_some_and(|c| filled(&c.name) && filled(&c.relationship) && filled(&c.phone)),
        Section::Vitals | Section::Allergies | Section::Medications => true,
    }
}

/// Required sections that are not yet complete, in wizard order.
pub fn incomplete_required_sections(draft: &ProfileDraft) -> Vec<Section> {
    Section::REQUIRED
        .into_iter()
        .filter(|s| !is_section_complete(*s, draft))
        .collect()
}

/// Whether the draft may be submitted.
pub fn can_submit(draft: &ProfileDraft) -> bool {
    incomplete_required_sections(draft).is_empty()
}

/// Field-level errors from the personal-info step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonalInfoErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl PersonalInfoErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none()
    }
}

impl std::fmt::Display for PersonalInfoErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = [self.name.as_deref(), self.phone.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Validate the personal-info step: name required, phone exactly 10 digits.
pub fn validate_personal_info(draft: &ProfileDraft) -> Result<(), PersonalInfoErrors> {
    let mut errors = PersonalInfoErrors::default();

    if !filled(&draft.name) {
        errors.name = Some("Name is required".to_string());
    }

    let phone = draft.phone.trim();
    if phone.is_empty() {
        errors.phone = Some("Phone number is required".to_string());
    } else if !PHONE_PATTERN.is_match(phone) {
        errors.phone = Some("Phone number must be exactly 10 digits".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
