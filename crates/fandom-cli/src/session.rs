//! Session set-up: decides once per job whether the platform client runs
//! authenticated or anonymously.

use anyhow::Context;
use fandom_core::JobConfig;
use fandom_instagram::PlatformClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionMode {
    Authenticated,
    /// Public endpoints only. Lower rate limits and no follower lists.
    Anonymous,
}

/// A platform client plus the mode it was established in.
pub(crate) struct Session<C> {
    pub client: C,
    pub mode: SessionMode,
}

impl<C> Session<C> {
    pub(crate) fn is_authenticated(&self) -> bool {
        self.mode == SessionMode::Authenticated
    }
}

/// Establishes the session for a job.
///
/// The credential is `job.credential` if set, otherwise `env_credential`.
/// With a credential, `authenticate` is called exactly once; without one it
/// is never called.
///
/// # Errors
///
/// Returns an error if the platform rejects the credential. That is fatal
/// for the job: no target is processed.
pub(crate) async fn init_session<C: PlatformClient>(
    mut client: C,
    job: &JobConfig,
    env_credential: Option<&str>,
) -> anyhow::Result<Session<C>> {
    let credential = job
        .credential
        .as_deref()
        .or(env_credential)
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let Some(credential) = credential else {
        println!("Running in anonymous/public mode (low rate limits)");
        tracing::warn!("no session id configured; using anonymous session with reduced capability");
        return Ok(Session {
            client,
            mode: SessionMode::Anonymous,
        });
    };

    println!("Authenticating with session id...");
    client
        .authenticate(credential)
        .await
        .context("instagram session authentication failed")?;
    tracing::info!("session authenticated");

    Ok(Session {
        client,
        mode: SessionMode::Authenticated,
    })
}
