use std::sync::{Arc, Mutex};

use pointer_client::{EmailProbe, IdentityClient, PersistedToken, TokenStore, UserDirectoryClient};
use pointer_flux::I18nStore;

use crate::config::HrConfig;
use crate::error::FlowError;
use crate::i18n_strings;
use crate::probe::DebouncedProbe;
use crate::recovery::{Cooldown, RecoveryService};

/// Everything handlers share: clients, message catalog and the two
/// timers that outlive a single request.
pub struct HrContext {
    pub config: HrConfig,
    pub identity: Arc<IdentityClient>,
    pub recovery: Arc<dyn RecoveryService>,
    pub directory: Arc<UserDirectoryClient>,
    pub email_probe: Arc<dyn EmailProbe>,
    pub i18n: Arc<I18nStore>,
    pub(crate) cooldown: Mutex<Cooldown>,
    pub(crate) probe: DebouncedProbe,
}

impl HrContext {
    /// Both clients share `tokens`: the identity client writes it, the
    /// directory client reads it on every request.
    pub fn new(config: HrConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, FlowError> {
        let identity = Arc::new(
            IdentityClient::new(&config.api_url, Arc::clone(&tokens))?
                .with_client_id(config.client_id.clone())
                .with_disabled_statuses(config.account_disabled_statuses.clone()),
        );
        let directory = Arc::new(UserDirectoryClient::new(
            &config.api_url,
            Arc::new(PersistedToken::new(tokens)),
        )?);

        let i18n = Arc::new(I18nStore::new(&config.locale));
        i18n_strings::register_all(&i18n);

        Ok(Self {
            recovery: identity.clone(),
            email_probe: directory.clone(),
            cooldown: Mutex::new(Cooldown::new(config.resend_cooldown())),
            probe: DebouncedProbe::new(config.email_check_debounce()),
            identity,
            directory,
            i18n,
            config,
        })
    }

    pub fn with_recovery_service(mut self, service: Arc<dyn RecoveryService>) -> Self {
        self.recovery = service;
        self
    }

    pub fn with_email_probe(mut self, probe: Arc<dyn EmailProbe>) -> Self {
        self.email_probe = probe;
        self
    }

    pub fn t(&self, url: &str) -> String {
        self.i18n.get(url)
    }

    pub fn message(&self, err: &FlowError) -> String {
        self.t(&err.message_key())
    }
}
