//! Command-line front end for the entity views.
//!
//! Each subcommand drives one [`EntityListView`] through the same steps a
//! user takes on screen: load the list, open a dialog, fill the form,
//! submit. Notifications are printed to stderr as they would appear as
//! toasts.

use std::sync::Arc;

use andon_core::entity::EntityKind;
use andon_core::listing::SortOrder;
use andon_core::modal::ModalKind;
use andon_events::{MetricsDelivery, MetricsSink, NoopMetrics, NotificationRelay};
use andon_graphql::{AndonApi, EntityService};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use crate::config::ConsoleConfig;
use crate::view::{EntityListView, SubmitOutcome};

#[derive(Debug, Parser)]
#[command(name = "andon-console", version, about = "Manage Virtual Andon sites, areas, processes, stations, and more")]
pub struct Cli {
    /// Emit logs as JSON.
    #[arg(long, env = "ANDON_LOG_JSON", global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List records of a kind.
    List {
        kind: EntityKind,
        /// Parent record id (required for child kinds).
        #[arg(long)]
        parent: Option<String>,
        /// Only show records whose name contains this keyword.
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "asc")]
        sort: SortOrder,
    },
    /// Register a new record.
    Add {
        kind: EntityKind,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Extra field as `key=value`, e.g. `email=ops@example.com`.
        #[arg(long = "attr", value_parser = parse_attribute)]
        attributes: Vec<(String, String)>,
    },
    /// Change the fields of an existing record.
    Edit {
        kind: EntityKind,
        id: String,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "attr", value_parser = parse_attribute)]
        attributes: Vec<(String, String)>,
    },
    /// Delete a record (and, for hierarchy levels, everything below it).
    Delete {
        kind: EntityKind,
        id: String,
        #[arg(long)]
        parent: Option<String>,
    },
}

fn parse_attribute(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}

/// Build the production service, relay and metrics sink and run `command`.
pub async fn run(command: Command, config: ConsoleConfig) -> anyhow::Result<()> {
    let api = AndonApi::with_timeout(
        config.graphql_endpoint.clone(),
        config.auth.clone(),
        config.request_timeout(),
    )
    .context("Failed to build GraphQL client")?;

    let metrics: Arc<dyn MetricsSink> = match &config.metrics_url {
        Some(url) => Arc::new(
            MetricsDelivery::new(url.clone(), config.solution_uuid)
                .context("Failed to build metrics client")?,
        ),
        None => Arc::new(NoopMetrics),
    };

    let relay = Arc::new(NotificationRelay::default());
    execute(command, api, relay, metrics, config.notification_secs).await
}

/// Run one command against any [`EntityService`].
pub async fn execute<S: EntityService>(
    command: Command,
    service: S,
    relay: Arc<NotificationRelay>,
    metrics: Arc<dyn MetricsSink>,
    notification_secs: u32,
) -> anyhow::Result<()> {
    let mut toasts = relay.subscribe();
    let (kind, parent) = match &command {
        Command::List { kind, parent, .. }
        | Command::Add { kind, parent, .. }
        | Command::Edit { kind, parent, .. }
        | Command::Delete { kind, parent, .. } => (*kind, parent.clone()),
    };

    if kind.parent().is_some() && parent.is_none() {
        bail!(
            "{} records belong to a {}; pass --parent <ID>",
            kind.label(),
            kind.parent().map(EntityKind::as_str).unwrap_or_default()
        );
    }

    let mut view = EntityListView::new(kind, service, relay, metrics)
        .with_notification_secs(notification_secs);
    if let Some(parent) = parent {
        view = view.with_parent(parent);
    }

    view.load().await;
    if let Some(error) = view.error() {
        bail!("{}: {error}", andon_core::messages::ERROR_PREFIX);
    }

    let outcome = match command {
        Command::List { search, sort, .. } => {
            view.on_search_change(search);
            view.on_sort_change(sort);
            println!("{}", view.title());
            for record in view.visible_records() {
                println!("{}\t{}\t{}", record.id, record.name, record.description);
            }
            None
        }
        Command::Add {
            name,
            description,
            attributes,
            ..
        } => {
            view.open_modal(ModalKind::Add, None, None);
            view.set_field("name", name)?;
            view.set_field("description", description)?;
            for (key, value) in attributes {
                view.set_field(&key, value)?;
            }
            Some(view.submit_add().await)
        }
        Command::Edit {
            id,
            name,
            description,
            attributes,
            ..
        } => {
            if !view.open_modal(ModalKind::Edit, Some(&id), None) {
                drain(&mut toasts);
                bail!("Cannot edit {} {id}", kind.as_str());
            }
            if let Some(name) = name {
                view.set_field("name", name)?;
            }
            if let Some(description) = description {
                view.set_field("description", description)?;
            }
            for (key, value) in attributes {
                view.set_field(&key, value)?;
            }
            Some(view.submit_edit().await)
        }
        Command::Delete { id, .. } => {
            if !view.open_modal(ModalKind::Delete, Some(&id), None) {
                drain(&mut toasts);
                bail!("Cannot delete {} {id}", kind.as_str());
            }
            if let Some(warning) = view.delete_warning() {
                eprintln!("[warning] {warning}");
            }
            Some(view.submit_delete().await)
        }
    };

    drain(&mut toasts);

    match outcome {
        None | Some(SubmitOutcome::Completed) => Ok(()),
        Some(SubmitOutcome::Invalid(fields)) => {
            bail!("Invalid value for: {}", fields.join(", "))
        }
        Some(other) => bail!("{} not saved: {other:?}", kind.label()),
    }
}

/// Print every queued notification to stderr.
fn drain(toasts: &mut tokio::sync::broadcast::Receiver<andon_core::notification::Notification>) {
    while let Ok(toast) = toasts.try_recv() {
        eprintln!("[{}] {}", toast.severity, toast.message);
    }
}
