//! Review summary shown on the final wizard step and by the standalone
//! review screen.

use serde::Serialize;

use super::backend::BackendProfile;
use super::draft::{
    BloodPressure, EmergencyContact, HeartRate, OxygenSaturation, ProfileDraft, Temperature,
};
use super::transform::to_ui_model;
use super::validate::{Section, is_section_complete};

/// The most recent reading of each vital sign kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestVitals {
    pub blood_pressure: Option<BloodPressure>,
    pub heart_rate: Option<HeartRate>,
    pub temperature: Option<Temperature>,
    pub oxygen_saturation: Option<OxygenSaturation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionStatus {
    pub section: Section,
    pub complete: bool,
}

/// Condensed view of a draft for review before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub name: String,
    pub phone: String,
    pub main_contact: Option<EmergencyContact>,
    pub latest_vitals: LatestVitals,
    pub vitals_recorded: bool,
    pub allergy_count: usize,
    pub current_medication_count: usize,
    pub past_medication_count: usize,
    pub sections: Vec<SectionStatus>,
}

impl ReviewSummary {
    pub fn from_draft(draft: &ProfileDraft) -> Self {
        let vitals = &draft.vital_signs;
        Self {
            name: draft.name.clone(),
            phone: draft.phone.clone(),
            main_contact: draft.main_contact().cloned(),
            latest_vitals: LatestVitals {
                blood_pressure: vitals.blood_pressure.first().cloned(),
                heart_rate: vitals.heart_rate.first().cloned(),
                temperature: vitals.temperature.first().cloned(),
                oxygen_saturation: vitals.oxygen_saturation.first().cloned(),
            },
            vitals_recorded: !vitals.is_empty(),
            allergy_count: draft.allergies.len(),
            current_medication_count: draft.medications.current.len(),
            past_medication_count: draft.medications.past.len(),
            sections: Section::ALL
                .into_iter()
                .map(|section| SectionStatus {
                    section,
                    complete: is_section_complete(section, draft),
                })
                .collect(),
        }
    }

    /// Summarize a stored profile through the same transformer the wizard uses.
    pub fn from_backend(profile: &BackendProfile) -> Self {
        Self::from_draft(&to_ui_model(profile))
    }

    pub fn is_ready(&self) -> bool {
        self.sections
            .iter()
            .all(|s| s.complete || !s.section.is_required())
    }

    /// Plain-text rendering for terminals and logs.
    pub fn to_text(&self) -> String {
        let mut lines = vec!["# Health Profile".to_string()];
        lines.push(format!("- **Name:** {}", or_dash(&self.name)));
        lines.push(format!("- **Phone:** {}", or_dash(&self.phone)));

        match &self.main_contact {
            Some(c) => lines.push(format!(
                "- **Main contact:** {} ({}) {}",
                c.name, c.relationship, c.phone
            )),
            None => lines.push("- **Main contact:** -".to_string()),
        }

        let v = &self.latest_vitals;
        if !self.vitals_recorded {
            lines.push("- **Vitals:** none recorded".to_string());
        }
        if let Some(bp) = &v.blood_pressure {
            lines.push(format!("- **Blood pressure:** {}/{} mmHg", bp.systolic, bp.diastolic));
        }
        if let Some(hr) = &v.heart_rate {
            lines.push(format!("- **Heart rate:** {} bpm", hr.beats_per_minute));
        }
        if let Some(t) = &v.temperature {
            lines.push(format!("- **Temperature:** {}", t.value));
        }
        if let Some(o) = &v.oxygen_saturation {
            lines.push(format!("- **Oxygen saturation:** {}%", o.percentage));
        }

        lines.push(format!("- **Allergies:** {}", self.allergy_count));
        lines.push(format!(
            "- **Medications:** {} current, {} past",
            self.current_medication_count, self.past_medication_count
        ));

        let incomplete: Vec<String> = self
            .sections
            .iter()
            .filter(|s| !s.complete)
            .map(|s| s.section.to_string())
            .collect();
        if incomplete.is_empty() {
            lines.push("- **Status:** complete".to_string());
        } else {
            lines.push(format!("- **Incomplete:** {}", incomplete.join(", ")));
        }

        lines.join("\n")
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}
