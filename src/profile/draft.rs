//! UI-facing profile model edited across the wizard steps.
//!
//! Field names serialize in camelCase to match the form layer. Every field
//! defaults to empty so partially filled drafts load from JSON.

use serde::{Deserialize, Serialize};

/// Patient gender as shown in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Case-insensitive parse. Unrecognized values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Allergy severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Case-insensitive parse. Unrecognized values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mild" => Some(Self::Mild),
            "moderate" => Some(Self::Moderate),
            "severe" => Some(Self::Severe),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mild => write!(f, "Mild"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Severe => write!(f, "Severe"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// An emergency contact. The first one in the list is the main contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Allergy {
    pub allergen: String,
    pub severity: Option<Severity>,
    /// `YYYY-MM-DD`, or empty.
    pub diagnosed_date: String,
    pub reactions: Vec<String>,
}

/// A medication the patient is actively taking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrentMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub prescribed_by: String,
    pub purpose: String,
    /// `YYYY-MM-DD`, or empty.
    pub start_date: String,
    pub side_effects: Vec<String>,
}

/// A medication the patient no longer takes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PastMedication {
    pub name: String,
    pub dosage: String,
    /// `YYYY-MM-DD`, or empty.
    pub end_date: String,
    pub reason: String,
    pub side_effects: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Medications {
    pub current: Vec<CurrentMedication>,
    pub past: Vec<PastMedication>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloodPressure {
    pub systolic: String,
    pub diastolic: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeartRate {
    pub beats_per_minute: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Temperature {
    pub value: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OxygenSaturation {
    pub percentage: String,
    pub timestamp: String,
}

/// Vital sign history, one list per kind, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VitalSigns {
    pub blood_pressure: Vec<BloodPressure>,
    pub heart_rate: Vec<HeartRate>,
    pub temperature: Vec<Temperature>,
    pub oxygen_saturation: Vec<OxygenSaturation>,
}

impl VitalSigns {
    pub fn is_empty(&self) -> bool {
        self.blood_pressure.is_empty()
            && self.heart_rate.is_empty()
            && self.temperature.is_empty()
            && self.oxygen_saturation.is_empty()
    }
}

/// The in-progress health profile being edited in the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileDraft {
    pub name: String,
    pub phone: String,
    /// Data URI or URL.
    pub photo: String,
    /// `YYYY-MM-DD`, or empty.
    pub date_of_birth: String,
    pub gender: Option<Gender>,
    pub blood_type: String,
    pub height: String,
    pub weight: String,
    pub address: Address,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub allergies: Vec<Allergy>,
    pub medications: Medications,
    pub vital_signs: VitalSigns,
}

impl ProfileDraft {
    /// The main emergency contact, if any.
    pub fn main_contact(&self) -> Option<&EmergencyContact> {
        self.emergency_contacts.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_loads_with_defaults() {
        let draft: ProfileDraft = serde_json::from_str(
            r#"{"name": "Jane Doe", "address": {"city": "Pune"}, "vitalSigns": {"heartRate": [{"beatsPerMinute": "72"}]}}"#,
        )
        .unwrap();
        assert_eq!(draft.name, "Jane Doe");
        assert_eq!(draft.address.city, "Pune");
        assert!(draft.address.street.is_empty());
        assert_eq!(draft.vital_signs.heart_rate[0].beats_per_minute, "72");
        assert!(draft.gender.is_none());
        assert!(draft.medications.current.is_empty());
    }

    #[test]
    fn serializes_camel_case() {
        let draft = ProfileDraft {
            date_of_birth: "1990-05-15".into(),
            blood_type: "O+".into(),
            gender: Some(Gender::Female),
            ..Default::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["dateOfBirth"], "1990-05-15");
        assert_eq!(json["bloodType"], "O+");
        assert_eq!(json["gender"], "Female");
        assert!(json["address"].get("postalCode").is_some());
        assert!(json["vitalSigns"].get("oxygenSaturation").is_some());
    }

    #[test]
    fn gender_and_severity_parse_case_insensitively() {
        assert_eq!(Gender::parse("MALE"), Some(Gender::Male));
        assert_eq!(Gender::parse(" female "), Some(Gender::Female));
        assert_eq!(Gender::parse("unspecified"), None);
        assert_eq!(Severity::parse("moderate"), Some(Severity::Moderate));
        assert_eq!(Severity::parse(""), None);
    }

    #[test]
    fn main_contact_is_first() {
        let mut draft = ProfileDraft::default();
        assert!(draft.main_contact().is_none());
        draft.emergency_contacts.push(EmergencyContact {
            name: "Raj".into(),
            ..Default::default()
        });
        draft.emergency_contacts.push(EmergencyContact {
            name: "Maya".into(),
            ..Default::default()
        });
        assert_eq!(draft.main_contact().unwrap().name, "Raj");
    }
}
