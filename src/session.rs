//! Session: wires config, credentials, backend client and cache together.

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{HttpProfileApi, ProfileApi};
use crate::auth::{self, CredentialProvider, StaticToken, TokenStore};
use crate::cache::ProfileCache;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::submission::SubmissionCoordinator;
use crate::wizard::ProfileWizard;

pub struct Session {
    pub config: ClientConfig,
    pub api: Arc<dyn ProfileApi>,
    pub credentials: Arc<dyn CredentialProvider>,
    pub cache: Arc<ProfileCache>,
    pub coordinator: Arc<SubmissionCoordinator>,
    store: Arc<TokenStore>,
}

impl Session {
    /// Open the credential store and profile mirror named by `config`.
    ///
    /// `config.token` takes precedence over any stored token.
    pub async fn open(config: ClientConfig) -> Result<Self> {
        let api: Arc<dyn ProfileApi> = Arc::new(HttpProfileApi::new(&config)?);
        Self::with_api(config, api).await
    }

    /// Same as [`Session::open`] with a caller-supplied backend.
    pub async fn with_api(config: ClientConfig, api: Arc<dyn ProfileApi>) -> Result<Self> {
        let store = Arc::new(match &config.credentials_path {
            Some(path) => TokenStore::open(path)?,
            None => TokenStore::new(),
        });
        let credentials: Arc<dyn CredentialProvider> = match &config.token {
            Some(token) => Arc::new(StaticToken::from_secret(token.clone())),
            None => Arc::clone(&store) as Arc<dyn CredentialProvider>,
        };
        debug!(token = auth::describe(credentials.token().as_ref()), "Credentials resolved");

        let cache = match &config.cache_path {
            Some(path) => ProfileCache::with_file(path).await,
            None => ProfileCache::new(),
        };
        let coordinator = Arc::new(SubmissionCoordinator::new(
            Arc::clone(&api),
            Arc::clone(&credentials),
            Arc::clone(&cache),
            config.defaults.clone(),
        ));

        Ok(Self {
            config,
            api,
            credentials,
            cache,
            coordinator,
            store,
        })
    }

    /// Whether tokens written by `sign_in` outlive the process.
    pub fn persists_credentials(&self) -> bool {
        self.config.credentials_path.is_some()
    }

    pub fn sign_in(&self, token: &str) -> Result<()> {
        self.store.set(auth::TOKEN_KEYS[0], token)?;
        info!("Token stored");
        Ok(())
    }

    /// Remove stored tokens and the local copy of the profile.
    pub async fn sign_out(&self) -> Result<()> {
        self.store.clear_tokens()?;
        self.cache.clear().await?;
        info!("Signed out");
        Ok(())
    }

    /// Wizard seeded from the stored profile.
    pub async fn wizard(&self) -> Result<ProfileWizard> {
        Ok(ProfileWizard::mount(Arc::clone(&self.coordinator)).await?)
    }
}
