//! Submission coordinator: load, create-or-update, and reconcile the
//! patient's profile against the backend.
//!
//! The create-vs-update decision is a separate read before the write, not a
//! transaction: two overlapping submissions can both create, and a submit
//! racing a background refresh can lose an update. Neither is guarded here
//! beyond the advisory [`SubmissionCoordinator::is_submitting`] flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::api::ProfileApi;
use crate::auth::CredentialProvider;
use crate::cache::ProfileCache;
use crate::config::BackendDefaults;
use crate::error::{ApiError, SubmissionError};
use crate::profile::{
    BackendProfile, ProfileDraft, incomplete_required_sections, to_backend_model, to_ui_model,
    validate_personal_info,
};

/// Which write the coordinator chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// Every gate the wizard applies before submission, for callers that submit
/// a draft without walking the steps.
pub fn check_ready(draft: &ProfileDraft) -> Result<(), SubmissionError> {
    validate_personal_info(draft).map_err(SubmissionError::InvalidPersonalInfo)?;
    let sections = incomplete_required_sections(draft);
    if sections.is_empty() {
        Ok(())
    } else {
        Err(SubmissionError::Incomplete { sections })
    }
}

/// Clears the submitting flag on every exit path.
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct SubmissionCoordinator {
    api: Arc<dyn ProfileApi>,
    credentials: Arc<dyn CredentialProvider>,
    cache: Arc<ProfileCache>,
    defaults: BackendDefaults,
    submitting: AtomicBool,
}

impl SubmissionCoordinator {
    pub fn new(
        api: Arc<dyn ProfileApi>,
        credentials: Arc<dyn CredentialProvider>,
        cache: Arc<ProfileCache>,
        defaults: BackendDefaults,
    ) -> Self {
        Self {
            api,
            credentials,
            cache,
            defaults,
            submitting: AtomicBool::new(false),
        }
    }

    /// Whether a submission is in flight. Advisory only.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub fn cache(&self) -> &Arc<ProfileCache> {
        &self.cache
    }

    fn require_token(&self) -> Result<SecretString, ApiError> {
        self.credentials.token().ok_or(ApiError::Unauthenticated)
    }

    /// Fetch the stored profile as a draft. A 404 means no profile exists
    /// yet and yields an empty draft.
    pub async fn load_draft(&self) -> Result<ProfileDraft, ApiError> {
        let token = self.require_token()?;
        match self.api.fetch_profile(&token).await {
            Ok(profile) => {
                let draft = to_ui_model(&profile);
                self.cache.store(profile).await;
                Ok(draft)
            }
            Err(e) if e.is_not_found() => {
                debug!("No stored profile, starting from an empty draft");
                Ok(ProfileDraft::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Draft built from the locally mirrored profile, if any.
    pub async fn cached_draft(&self) -> Option<ProfileDraft> {
        self.cache.get().await.map(|p| to_ui_model(&p))
    }

    /// Send the draft as a full replacement and return the reconciled profile.
    ///
    /// One read decides create vs update, one write sends the payload, and a
    /// final read picks up server-side normalization.
    pub async fn submit(&self, draft: &ProfileDraft) -> Result<BackendProfile, SubmissionError> {
        let token = self.require_token()?;

        self.submitting.store(true, Ordering::SeqCst);
        let _guard = SubmittingGuard(&self.submitting);

        let payload = to_backend_model(draft, &self.defaults);

        let mode = match self.api.fetch_profile(&token).await {
            Ok(_) => WriteMode::Update,
            Err(e) => {
                debug!(error = %e, "Existence check failed, creating profile");
                WriteMode::Create
            }
        };

        let written = match mode {
            WriteMode::Create => self.api.create_profile(&token, &payload).await,
            WriteMode::Update => self.api.update_profile(&token, &payload).await,
        };
        if let Err(e) = written {
            warn!(%mode, error = %e, "Profile write failed");
            return Err(e.into());
        }

        let reconciled = self.api.fetch_profile(&token).await.map_err(|e| {
            warn!(%mode, error = %e, "Profile saved but confirmation read failed");
            SubmissionError::from(e)
        })?;

        info!(
            %mode,
            contacts = reconciled.emergency_contacts.len(),
            medications = reconciled.medications.len(),
            vitals = reconciled.vital_signs.len(),
            "Profile submitted"
        );
        self.cache.store(reconciled.clone()).await;
        Ok(reconciled)
    }
}
