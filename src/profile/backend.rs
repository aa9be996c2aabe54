//! Server-facing profile model (snake_case JSON).

use serde::{Deserialize, Serialize};

use super::lenient;

/// Discriminator for entries of the flat `vital_signs` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VitalKind {
    BloodPressure,
    HeartRate,
    Temperature,
    OxygenSaturation,
}

impl VitalKind {
    pub const ALL: [VitalKind; 4] = [
        Self::BloodPressure,
        Self::HeartRate,
        Self::Temperature,
        Self::OxygenSaturation,
    ];

    /// The `type` tag used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BloodPressure => "bloodPressure",
            Self::HeartRate => "heartRate",
            Self::Temperature => "temperature",
            Self::OxygenSaturation => "oxygenSaturation",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }
}

impl std::fmt::Display for VitalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendAddress {
    #[serde(default, deserialize_with = "lenient::string")]
    pub street: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub city: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendEmergencyContact {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub relationship: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_main_contact: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendAllergy {
    #[serde(default, deserialize_with = "lenient::string")]
    pub allergen: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub allergen_type: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub severity: String,
    /// Comma-joined list.
    #[serde(default, deserialize_with = "lenient::string")]
    pub reactions: String,
    /// ISO-8601.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub diagnosed_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub diagnosed_by: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendMedication {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dosage: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub frequency: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub route_of_admin: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub prescribed_by: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub prescription_num: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub pharmacy: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub purpose: String,
    /// Comma-joined list.
    #[serde(default, deserialize_with = "lenient::string")]
    pub side_effects: String,
    /// ISO-8601.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub start_date: Option<String>,
    /// ISO-8601.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub end_date: Option<String>,
    /// Days.
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub reason_discontinued: String,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_active: bool,
}

/// One entry of the flat vital-sign list, tagged by `type`.
///
/// Blood pressure uses `systolic`/`diastolic`; every other kind uses `value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendVitalSign {
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub systolic: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub diastolic: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub timestamp: String,
}

impl BackendVitalSign {
    pub fn kind(&self) -> Option<VitalKind> {
        VitalKind::from_tag(&self.kind)
    }
}

/// The persisted health profile as the backend stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendProfile {
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub photo: String,
    /// ISO-8601.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date_of_birth: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub gender: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub blood_type: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub height: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub weight: String,
    #[serde(default, deserialize_with = "lenient::nullable")]
    pub address: BackendAddress,
    #[serde(default, deserialize_with = "lenient::nullable")]
    pub emergency_contacts: Vec<BackendEmergencyContact>,
    #[serde(default, deserialize_with = "lenient::nullable")]
    pub allergies: Vec<BackendAllergy>,
    #[serde(default, deserialize_with = "lenient::nullable")]
    pub medications: Vec<BackendMedication>,
    #[serde(default, deserialize_with = "lenient::nullable")]
    pub vital_signs: Vec<BackendVitalSign>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
}
