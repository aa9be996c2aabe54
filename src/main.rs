use std::sync::Arc;

use healthhub_profile::cache::CacheEvent;
use healthhub_profile::config::ClientConfig;
use healthhub_profile::profile::{ProfileDraft, ReviewSummary};
use healthhub_profile::refresh::spawn_refresh_task;
use healthhub_profile::session::Session;
use healthhub_profile::submission::check_ready;
use healthhub_profile::wizard::StepSequencer;
use tracing_subscriber::prelude::*;

const USAGE: &str = "Usage: healthhub-profile <command>

Commands:
  show                 Fetch the stored profile and print a review summary
  submit <draft.json>  Validate a profile draft and save it
  watch                Refresh the profile periodically and print changes
  login <token>        Store a bearer token in the credential file
  logout               Remove stored tokens and the cached profile";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let session = Session::open(ClientConfig::from_env()?).await?;

    match command {
        "login" => {
            let Some(token) = args.get(1) else {
                anyhow::bail!("login requires a token");
            };
            session.sign_in(token)?;
            if !session.persists_credentials() {
                eprintln!("Warning: HEALTHHUB_CREDENTIALS_PATH not set, token not persisted");
            }
            println!("Token stored.");
            return Ok(());
        }
        "logout" => {
            session.sign_out().await?;
            println!("Signed out.");
            return Ok(());
        }
        _ => {}
    }

    let coordinator = &session.coordinator;

    match command {
        "show" => {
            let draft = match coordinator.load_draft().await {
                Ok(draft) => draft,
                Err(e) => match coordinator.cached_draft().await {
                    Some(draft) => {
                        eprintln!("{} Showing cached copy.", e.user_message());
                        draft
                    }
                    None => anyhow::bail!(e.user_message()),
                },
            };
            println!("{}\n", ReviewSummary::from_draft(&draft).to_text());
            for status in StepSequencer::new().step_statuses(&draft) {
                let mark = if status.complete { "x" } else { " " };
                println!("[{mark}] {}", status.step.title());
            }
        }
        "submit" => {
            let Some(path) = args.get(1) else {
                anyhow::bail!("submit requires a path to a draft JSON file");
            };
            let raw = tokio::fs::read_to_string(path).await?;
            let draft: ProfileDraft = serde_json::from_str(&raw)?;

            if let Err(e) = check_ready(&draft) {
                anyhow::bail!(e.user_message());
            }
            match coordinator.submit(&draft).await {
                Ok(saved) => {
                    println!("Profile saved.\n");
                    println!("{}", ReviewSummary::from_backend(&saved).to_text());
                }
                Err(e) => anyhow::bail!(e.user_message()),
            }
        }
        "watch" => {
            eprintln!(
                "Refreshing {} every {}s. Ctrl-C to stop.",
                session.config.api_host,
                session.config.refresh_interval.as_secs()
            );
            let mut events = session.cache.subscribe();
            let handle = spawn_refresh_task(
                Arc::clone(&session.api),
                Arc::clone(&session.credentials),
                Arc::clone(&session.cache),
                session.config.refresh_interval,
            );
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    event = events.recv() => match event {
                        Ok(CacheEvent::Updated { profile }) => {
                            println!("{}\n", ReviewSummary::from_backend(&profile).to_text());
                        }
                        Ok(CacheEvent::RefreshFailed { message }) => eprintln!("{message}"),
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(skipped = n, "Missed profile events");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            handle.abort();
        }
        other => {
            eprintln!("Unknown command: {other}\n\n{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Stderr logging, plus a daily rolling file when `HEALTHHUB_LOG_DIR` is set.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match std::env::var("HEALTHHUB_LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, "healthhub-profile.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}
