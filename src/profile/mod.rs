//! Health profile models and the pure pipeline around them.
//!
//! The wizard edits a [`ProfileDraft`]; the backend stores a
//! [`BackendProfile`]. [`transform`] converts between the two, [`validate`]
//! decides which sections are complete, and [`review`] condenses a draft
//! for the final step.

pub mod backend;
pub mod draft;
mod lenient;
pub mod review;
pub mod transform;
pub mod validate;

pub use backend::{BackendProfile, BackendVitalSign, VitalKind};
pub use draft::{Gender, ProfileDraft, Severity};
pub use review::ReviewSummary;
pub use transform::{to_backend_model, to_ui_model};
pub use validate::{
    PersonalInfoErrors, Section, can_submit, incomplete_required_sections, is_section_complete,
    validate_personal_info,
};
