//! Conversions between the backend profile and the wizard draft.
//!
//! Both directions are total: missing data becomes empty strings or empty
//! lists and malformed dates degrade to empty, never an error. Metadata the
//! draft does not carry is dropped on the way in and re-synthesized from
//! [`BackendDefaults`] on the way out.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat};
use rand::Rng;

use crate::config::BackendDefaults;

use super::backend::{
    BackendAddress, BackendAllergy, BackendEmergencyContact, BackendMedication, BackendProfile,
    BackendVitalSign, VitalKind,
};
use super::draft::{
    Address, Allergy, BloodPressure, CurrentMedication, EmergencyContact, Gender, HeartRate,
    Medications, OxygenSaturation, PastMedication, ProfileDraft, Severity, Temperature, VitalSigns,
};

const LIST_SEPARATOR: &str = ", ";

// ── Backend → UI ────────────────────────────────────────────────────

/// Build a wizard draft from a backend profile.
pub fn to_ui_model(backend: &BackendProfile) -> ProfileDraft {
    ProfileDraft {
        name: backend.name.clone(),
        phone: backend.phone.clone(),
        photo: backend.photo.clone(),
        date_of_birth: to_ui_date(backend.date_of_birth.as_deref()),
        gender: Gender::parse(&backend.gender),
        blood_type: backend.blood_type.clone(),
        height: backend.height.clone(),
        weight: backend.weight.clone(),
        address: Address {
            street: backend.address.street.clone(),
            city: backend.address.city.clone(),
            state: backend.address.state.clone(),
            postal_code: backend.address.postal_code.clone(),
            country: backend.address.country.clone(),
        },
        emergency_contacts: contacts_to_ui(&backend.emergency_contacts),
        allergies: backend
            .allergies
            .iter()
            .map(|a| Allergy {
                allergen: a.allergen.clone(),
                severity: Severity::parse(&a.severity),
                diagnosed_date: to_ui_date(a.diagnosed_date.as_deref()),
                reactions: split_list(&a.reactions),
            })
            .collect(),
        medications: medications_to_ui(&backend.medications),
        vital_signs: vitals_to_ui(&backend.vital_signs),
    }
}

/// Main contact first, remaining contacts in their original order.
fn contacts_to_ui(contacts: &[BackendEmergencyContact]) -> Vec<EmergencyContact> {
    let mut ordered: Vec<&BackendEmergencyContact> = contacts.iter().collect();
    if let Some(pos) = ordered.iter().position(|c| c.is_main_contact) {
        let main = ordered.remove(pos);
        ordered.insert(0, main);
    }
    ordered
        .into_iter()
        .map(|c| EmergencyContact {
            name: c.name.clone(),
            relationship: c.relationship.clone(),
            phone: c.phone.clone(),
            email: c.email.clone(),
        })
        .collect()
}

fn medications_to_ui(medications: &[BackendMedication]) -> Medications {
    let mut out = Medications::default();
    for med in medications {
        if med.is_active {
            out.current.push(CurrentMedication {
                name: med.name.clone(),
                dosage: med.dosage.clone(),
                frequency: med.frequency.clone(),
                prescribed_by: med.prescribed_by.clone(),
                purpose: med.purpose.clone(),
                start_date: to_ui_date(med.start_date.as_deref()),
                side_effects: split_list(&med.side_effects),
            });
        } else {
            out.past.push(PastMedication {
                name: med.name.clone(),
                dosage: med.dosage.clone(),
                end_date: to_ui_date(med.end_date.as_deref()),
                reason: med.reason_discontinued.clone(),
                side_effects: split_list(&med.side_effects),
            });
        }
    }
    out
}

fn vitals_to_ui(vitals: &[BackendVitalSign]) -> VitalSigns {
    let mut out = VitalSigns::default();
    for vital in vitals {
        let value = || vital.value.clone().unwrap_or_default();
        match vital.kind() {
            Some(VitalKind::BloodPressure) => out.blood_pressure.push(BloodPressure {
                systolic: vital.systolic.clone().unwrap_or_default(),
                diastolic: vital.diastolic.clone().unwrap_or_default(),
                timestamp: vital.timestamp.clone(),
            }),
            Some(VitalKind::HeartRate) => out.heart_rate.push(HeartRate {
                beats_per_minute: value(),
                timestamp: vital.timestamp.clone(),
            }),
            Some(VitalKind::Temperature) => out.temperature.push(Temperature {
                value: value(),
                timestamp: vital.timestamp.clone(),
            }),
            Some(VitalKind::OxygenSaturation) => out.oxygen_saturation.push(OxygenSaturation {
                percentage: value(),
                timestamp: vital.timestamp.clone(),
            }),
            None => tracing::debug!(kind = %vital.kind, "Skipping vital sign of unknown type"),
        }
    }
    out
}

// ── UI → Backend ────────────────────────────────────────────────────

/// Build the full replacement payload for the backend from a draft.
pub fn to_backend_model(draft: &ProfileDraft, defaults: &BackendDefaults) -> BackendProfile {
    BackendProfile {
        id: None,
        name: draft.name.clone(),
        phone: draft.phone.clone(),
        photo: draft.photo.clone(),
        date_of_birth: to_backend_date(&draft.date_of_birth),
        gender: draft
            .gender
            .map(|g| g.to_string().to_lowercase())
            .unwrap_or_default(),
        blood_type: draft.blood_type.clone(),
        height: draft.height.clone(),
        weight: draft.weight.clone(),
        address: BackendAddress {
            street: draft.address.street.clone(),
            city: draft.address.city.clone(),
            state: draft.address.state.clone(),
            postal_code: draft.address.postal_code.clone(),
            country: draft.address.country.clone(),
        },
        emergency_contacts: draft
            .emergency_contacts
            .iter()
            .enumerate()
            .map(|(i, c)| BackendEmergencyContact {
                name: c.name.clone(),
                relationship: c.relationship.clone(),
                phone: c.phone.clone(),
                email: c.email.clone(),
                is_main_contact: i == 0,
            })
            .collect(),
        allergies: draft
            .allergies
            .iter()
            .map(|a| BackendAllergy {
                allergen: a.allergen.clone(),
                allergen_type: defaults.allergen_type.clone(),
                severity: a.severity.map(|s| s.to_string()).unwrap_or_default(),
                reactions: join_list(&a.reactions),
                diagnosed_date: to_backend_date(&a.diagnosed_date),
                diagnosed_by: defaults.diagnosed_by.clone(),
                notes: String::new(),
            })
            .collect(),
        medications: medications_to_backend(&draft.medications, defaults),
        vital_signs: vitals_to_backend(&draft.vital_signs),
        created_at: None,
        updated_at: None,
    }
}

fn medications_to_backend(
    medications: &Medications,
    defaults: &BackendDefaults,
) -> Vec<BackendMedication> {
    let base = || BackendMedication {
        route_of_admin: defaults.route_of_admin.clone(),
        prescription_num: prescription_number(defaults),
        pharmacy: defaults.pharmacy.clone(),
        duration: Some(defaults.duration_days),
        ..Default::default()
    };

    let current = medications.current.iter().map(|m| BackendMedication {
        name: m.name.clone(),
        dosage: m.dosage.clone(),
        frequency: m.frequency.clone(),
        prescribed_by: m.prescribed_by.clone(),
        purpose: m.purpose.clone(),
        side_effects: join_list(&m.side_effects),
        start_date: to_backend_date(&m.start_date),
        is_active: true,
        ..base()
    });

    let past = medications.past.iter().map(|m| BackendMedication {
        name: m.name.clone(),
        dosage: m.dosage.clone(),
        side_effects: join_list(&m.side_effects),
        end_date: to_backend_date(&m.end_date),
        reason_discontinued: m.reason.clone(),
        is_active: false,
        ..base()
    });

    current.chain(past).collect()
}

fn prescription_number(defaults: &BackendDefaults) -> String {
    if !defaults.randomize_prescription_numbers {
        return String::new();
    }
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{}-{suffix:06}", defaults.prescription_prefix)
}

fn vitals_to_backend(vitals: &VitalSigns) -> Vec<BackendVitalSign> {
    let tagged = |kind: VitalKind, timestamp: &str| BackendVitalSign {
        kind: kind.as_str().to_string(),
        timestamp: timestamp.to_string(),
        ..Default::default()
    };

    let mut out = Vec::new();
    out.extend(vitals.blood_pressure.iter().map(|bp| BackendVitalSign {
        systolic: non_empty(&bp.systolic),
        diastolic: non_empty(&bp.diastolic),
        ..tagged(VitalKind::BloodPressure, &bp.timestamp)
    }));
    out.extend(vitals.heart_rate.iter().map(|hr| BackendVitalSign {
        value: non_empty(&hr.beats_per_minute),
        ..tagged(VitalKind::HeartRate, &hr.timestamp)
    }));
    out.extend(vitals.temperature.iter().map(|t| BackendVitalSign {
        value: non_empty(&t.value),
        ..tagged(VitalKind::Temperature, &t.timestamp)
    }));
    out.extend(vitals.oxygen_saturation.iter().map(|o| BackendVitalSign {
        value: non_empty(&o.percentage),
        ..tagged(VitalKind::OxygenSaturation, &o.timestamp)
    }));
    out
}

// ── Field helpers ───────────────────────────────────────────────────

/// Blank readings are omitted from the payload rather than sent as `""`.
fn non_empty(raw: &str) -> Option<String> {
    (!raw.trim().is_empty()).then(|| raw.to_string())
}

/// Parse a calendar day out of an ISO-8601 date or datetime.
///
/// The day is taken as written (in the string's own offset), so a round trip
/// never shifts it.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// ISO-8601 (or null) → `YYYY-MM-DD`, empty when missing or unparseable.
pub fn to_ui_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    match parse_day(raw) {
        Some(day) => day.format("%Y-%m-%d").to_string(),
        None => {
            if !raw.trim().is_empty() {
                tracing::debug!(value = raw, "Dropping unparseable date");
            }
            String::new()
        }
    }
}

/// `YYYY-MM-DD` → midnight-UTC ISO-8601, `None` when empty or unparseable.
pub fn to_backend_date(raw: &str) -> Option<String> {
    let day = parse_day(raw)?;
    let midnight = day.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Split a comma-joined backend list. Blank items are dropped.
pub fn split_list(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn join_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}
