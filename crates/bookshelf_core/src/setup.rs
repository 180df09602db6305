//! Interactive database-connection bootstrap.
//!
//! # Responsibility
//! - Drive the credentials/connect/retry loop without owning any UI.
//!
//! # Invariants
//! - Accepted credentials are saved before the connection attempt.
//! - Declining a retry (or cancelling the prompt) ends the flow cleanly;
//!   the caller treats that as "abort the session".

use crate::config::{ConfigError, ConfigProvider, ConnectionConfig};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failed connection attempt, surfaced to the retry prompt.
///
/// Transport detail below the store contract is deliberately collapsed into
/// this single category.
#[derive(Debug)]
pub struct ConnectionFailure {
    source: Box<dyn Error + Send + Sync>,
}

impl ConnectionFailure {
    pub fn new(source: impl Error + Send + Sync + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }
}

impl Display for ConnectionFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unable to connect to the database: {}", self.source)
    }
}

impl Error for ConnectionFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// UI seam for the setup flow. The front-end owns presentation; the loop
/// owns sequencing.
pub trait SetupPrompt {
    /// Asks the user for credentials, prefilled from `previous` when present.
    /// Returns `None` when the user cancels.
    fn request_credentials(
        &mut self,
        previous: Option<&ConnectionConfig>,
    ) -> Option<ConnectionConfig>;

    /// Asks whether to try again after a failed connection attempt.
    fn confirm_retry(&mut self, failure: &ConnectionFailure) -> bool;
}

/// Runs the credentials/connect/retry loop until a store is opened or the
/// user gives up.
///
/// Returns `Ok(None)` when the user cancels the prompt or declines a retry.
/// Config-file failures are surfaced as `Err`; connection failures are fed
/// back into the prompt instead.
pub fn establish_store<S, F>(
    prompt: &mut dyn SetupPrompt,
    provider: &dyn ConfigProvider,
    mut connect: F,
) -> Result<Option<S>, ConfigError>
where
    F: FnMut(&ConnectionConfig) -> Result<S, ConnectionFailure>,
{
    let mut previous = provider.load()?;

    loop {
        let Some(entered) = prompt.request_credentials(previous.as_ref()) else {
            info!("event=db_setup module=setup status=cancelled");
            return Ok(None);
        };

        provider.save(&entered)?;

        match connect(&entered) {
            Ok(store) => {
                info!(
                    "event=db_setup module=setup status=ok host={}",
                    entered.host
                );
                return Ok(Some(store));
            }
            Err(failure) => {
                warn!(
                    "event=db_setup module=setup status=error host={} error={failure}",
                    entered.host
                );
                if !prompt.confirm_retry(&failure) {
                    info!("event=db_setup module=setup status=aborted");
                    return Ok(None);
                }
                previous = Some(entered);
            }
        }
    }
}
