//! The scrape run: resolve input, set up the session, then process every
//! target in order.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use fandom_core::{
    resolve_job_input, Attributes, InputSource, JobConfig, JobSummary, Mode, ProfileRecord,
    ResolvedInput, RuntimeConfig,
};
use fandom_dataset::RecordSink;
use fandom_instagram::{InstagramClient, PlatformClient};
use serde_json::Value;

use crate::emitter::{build_sink, Emitter};
use crate::session::{init_session, Session};

/// Runs one job end to end against the live platform.
///
/// # Errors
///
/// Returns an error if the platform client cannot be built or the session
/// credential is rejected. Per-target failures are recorded, not returned.
pub(crate) async fn run_job(
    config: &RuntimeConfig,
    input_path: &Path,
    dry_run: bool,
) -> anyhow::Result<()> {
    let resolved = resolve_job_input(input_path);
    println!(
        "Starting Fandom Velocity Scraper in '{}' mode for {} users.",
        resolved.job.mode,
        resolved.job.targets.len()
    );

    if dry_run {
        print_plan(config, &resolved);
        return Ok(());
    }

    let client = InstagramClient::with_base_url(
        config.request_timeout_secs,
        &config.user_agent,
        &config.instagram_base_url,
    )
    .context("failed to build instagram client")?;

    execute(
        client,
        &resolved,
        Duration::from_millis(config.inter_item_delay_ms),
        build_sink(config),
    )
    .await?;

    Ok(())
}

/// Session set-up followed by the item loop. Split from [`run_job`] so the
/// whole pipeline can run against any [`PlatformClient`].
pub(crate) async fn execute<C: PlatformClient>(
    client: C,
    resolved: &ResolvedInput,
    delay: Duration,
    sink: Option<Box<dyn RecordSink>>,
) -> anyhow::Result<JobSummary> {
    let session = init_session(client, &resolved.job, resolved.env_credential.as_deref()).await?;
    let emitter = Emitter::new(sink);
    Ok(process_targets(&session, &resolved.job, delay, emitter).await)
}

/// Produces exactly one record per target, in input order, sleeping `delay`
/// after each one regardless of outcome.
pub(crate) async fn process_targets<C: PlatformClient>(
    session: &Session<C>,
    job: &JobConfig,
    delay: Duration,
    mut emitter: Emitter,
) -> JobSummary {
    for username in &job.targets {
        println!("Scraping @{username}...");
        let record = scrape_target(session, job, username).await;
        if let ProfileRecord::Failed { error, .. } = &record {
            println!("Error scraping {username}: {error}");
            tracing::warn!(username = %username, error = %error, "target failed");
        }
        emitter.emit(username, record).await;
        tokio::time::sleep(delay).await;
    }

    emitter.finalize()
}

async fn scrape_target<C: PlatformClient>(
    session: &Session<C>,
    job: &JobConfig,
    username: &str,
) -> ProfileRecord {
    match fetch_target(session, job, username).await {
        Ok(attributes) => ProfileRecord::scraped(attributes, Utc::now()),
        Err(e) => ProfileRecord::failed(username, format!("{e:#}")),
    }
}

async fn fetch_target<C: PlatformClient>(
    session: &Session<C>,
    job: &JobConfig,
    username: &str,
) -> anyhow::Result<Attributes> {
    let mut attributes = session.client.fetch_profile(username).await?;
    tracing::debug!(username, "profile fetched");

    if job.mode != Mode::Followers {
        return Ok(attributes);
    }

    if !session.is_authenticated() {
        tracing::warn!(
            username,
            "follower lists require an authenticated session; returning profile only"
        );
        return Ok(attributes);
    }

    let pk = attributes
        .get("pk")
        .and_then(profile_id)
        .with_context(|| format!("profile for {username} has no usable pk"))?;
    let followers = session
        .client
        .fetch_followers(&pk, job.follower_limit)
        .await
        .context("failed to fetch followers")?;
    tracing::debug!(username, count = followers.len(), "followers fetched");

    attributes.insert(
        "followers_list".to_owned(),
        Value::Array(followers.into_iter().map(Value::Object).collect()),
    );
    Ok(attributes)
}

fn profile_id(pk: &Value) -> Option<String> {
    match pk {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn print_plan(config: &RuntimeConfig, resolved: &ResolvedInput) {
    let source = match &resolved.source {
        InputSource::File(path) => format!("file {}", path.display()),
        InputSource::Env => "APIFY_INPUT".to_owned(),
        InputSource::Empty => "none".to_owned(),
    };
    let has_credential = resolved.job.credential.is_some() || resolved.env_credential.is_some();
    let sink = config
        .dataset_id
        .as_deref()
        .map_or_else(|| "none".to_owned(), |id| format!("dataset {id}"));

    println!("Dry run: nothing will be fetched.");
    println!("  input:       {source}");
    println!("  mode:        {}", resolved.job.mode);
    println!("  session id:  {}", if has_credential { "set" } else { "not set" });
    println!("  sink:        {sink}");
    if resolved.job.mode == Mode::Followers {
        println!("  followers:   up to {} per profile", resolved.job.follower_limit);
    }
    for username in &resolved.job.targets {
        println!("  - @{username}");
    }
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod tests;
