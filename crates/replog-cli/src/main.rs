use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use replog_client::{ApiClient, DEFAULT_BASE_URL, InteractionApi};
use replog_core::{FormData, InteractionDraft};
use replog_store::{StoreEvent, StoreHandle};
use replog_workflow::{PollConfig, SubmissionState, SubmissionWorkflow, ToolInvoker};

mod display;

#[derive(Parser)]
#[command(name = "replog", version, about = "Log HCP interactions and watch backend enrichment")]
struct Cli {
    /// Backend base URL.
    #[arg(long, global = true, env = "REPLOG_API_BASE", default_value = DEFAULT_BASE_URL)]
    api_base: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List known HCPs or register a new one.
    Hcps {
        #[command(subcommand)]
        command: HcpCommand,
    },
    /// Submit an interaction and wait for enrichment to complete.
    Log {
        /// HCP the interaction was with.
        #[arg(long)]
        hcp: Option<i64>,
        /// Acting rep identifier.
        #[arg(long, default_value = "rep_santosh")]
        rep: String,
        /// Free-form narrative; selects chat mode.
        #[arg(long, conflicts_with_all = ["topic", "materials"])]
        text: Option<String>,
        /// Discussion topic; selects form mode.
        #[arg(long)]
        topic: Option<String>,
        /// Materials shared; form mode only.
        #[arg(long, requires = "topic")]
        materials: Option<String>,
        /// Poll cadence in milliseconds.
        #[arg(long, default_value_t = 800)]
        poll_ms: u64,
        /// Poll attempts before giving up.
        #[arg(long, default_value_t = 75)]
        max_attempts: u32,
    },
    /// Fetch one interaction by id.
    Show { id: i64 },
    /// List recent interactions.
    List {
        /// Restrict to one HCP.
        #[arg(long)]
        hcp: Option<i64>,
    },
    /// Apply field updates to a record; it returns to pending and is
    /// re-enriched.
    Edit {
        id: i64,
        /// JSON object of field updates, e.g. '{"raw_text": "revised"}'.
        updates: String,
        #[arg(long, default_value_t = 800)]
        poll_ms: u64,
        #[arg(long, default_value_t = 75)]
        max_attempts: u32,
    },
    /// Force immediate processing of a record.
    Process { id: i64 },
    /// Generate follow-up suggestions for an interaction.
    Followups {
        /// Interaction to act on; defaults to none, which is an error.
        #[arg(long)]
        interaction: Option<i64>,
    },
    /// Summarize recent topics for an HCP.
    Trend { hcp: i64 },
    /// Check backend reachability.
    Health,
}

#[derive(Subcommand)]
enum HcpCommand {
    List,
    Add {
        name: String,
        #[arg(long)]
        speciality: Option<String>,
        #[arg(long)]
        organisation: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let api = Arc::new(ApiClient::new(cli.api_base));

    match cli.command {
        Command::Hcps { command } => match command {
            HcpCommand::List => {
                let hcps = api.list_hcps().await?;
                display::print_hcps(&hcps);
            }
            HcpCommand::Add {
                name,
                speciality,
                organisation,
            } => {
                let receipt = api
                    .create_hcp(&replog_core::HcpDraft {
                        name,
                        speciality,
                        organisation,
                        contact: None,
                    })
                    .await?;
                println!("created HCP {} ({})", receipt.id, receipt.name);
            }
        },
        Command::Log {
            hcp,
            rep,
            text,
            topic,
            materials,
            poll_ms,
            max_attempts,
        } => {
            let draft = match (text, topic) {
                (Some(text), None) => InteractionDraft::chat(hcp, rep, text),
                (None, Some(topic)) => InteractionDraft::form(
                    hcp,
                    rep,
                    FormData {
                        topic: Some(topic),
                        materials,
                        extra: serde_json::Map::new(),
                    },
                ),
                _ => bail!("provide either --text (chat mode) or --topic (form mode)"),
            };

            let store = StoreHandle::new();
            let workflow = SubmissionWorkflow::with_config(
                Arc::clone(&api) as Arc<dyn InteractionApi>,
                store.clone(),
                PollConfig {
                    interval: Duration::from_millis(poll_ms),
                    max_attempts,
                },
            );

            let id = workflow.submit(draft).await?;
            println!("interaction {id} created, waiting for processing...");
            await_outcome(&workflow, &store).await?;
        }
        Command::Show { id } => {
            let record = api.get_interaction(id).await?;
            display::print_interaction(&record);
        }
        Command::List { hcp } => {
            let rows = api.list_interactions(hcp).await?;
            display::print_interaction_list(&rows);
        }
        Command::Edit {
            id,
            updates,
            poll_ms,
            max_attempts,
        } => {
            let updates: serde_json::Value = serde_json::from_str(&updates)
                .context("updates must be a JSON object")?;
            if !updates.is_object() {
                bail!("updates must be a JSON object");
            }

            let store = StoreHandle::new();
            let workflow = SubmissionWorkflow::with_config(
                Arc::clone(&api) as Arc<dyn InteractionApi>,
                store.clone(),
                PollConfig {
                    interval: Duration::from_millis(poll_ms),
                    max_attempts,
                },
            );

            workflow.edit(id, updates).await?;
            println!("interaction {id} updated, waiting for re-processing...");
            await_outcome(&workflow, &store).await?;
        }
        Command::Process { id } => {
            let store = StoreHandle::new();
            let workflow = SubmissionWorkflow::new(
                Arc::clone(&api) as Arc<dyn InteractionApi>,
                store,
            );
            let record = workflow.force_process(id).await?;
            display::print_interaction(&record);
        }
        Command::Followups { interaction } => {
            let store = StoreHandle::new();
            if let Some(id) = interaction {
                let record = api.get_interaction(id).await?;
                store.apply(StoreEvent::InteractionObserved(record));
            }
            let invoker = ToolInvoker::new(
                Arc::clone(&api) as Arc<dyn InteractionApi>,
                store,
            );
            let result = invoker.generate_followups().await?;
            display::print_followups(&result);
        }
        Command::Trend { hcp } => {
            let invoker = ToolInvoker::new(
                Arc::clone(&api) as Arc<dyn InteractionApi>,
                StoreHandle::new(),
            );
            let trend = invoker.generate_trend_summary(Some(hcp)).await?;
            display::print_trend(&trend);
        }
        Command::Health => {
            let health = api.health().await?;
            println!("backend {} at {}", health.status, health.time);
        }
    }

    Ok(())
}

/// Block on the submission outcome and render the enriched record.
async fn await_outcome(workflow: &SubmissionWorkflow, store: &StoreHandle) -> anyhow::Result<()> {
    let outcome = workflow.wait_for_outcome().await;
    workflow.cancel().await;
    match outcome {
        SubmissionState::Resolved { .. } => {
            if let Some(record) = store.snapshot().current {
                display::print_interaction(&record);
            }
            Ok(())
        }
        SubmissionState::TimedOut { id, attempts } => {
            bail!("interaction {id} still pending after {attempts} polls; try `replog process {id}`")
        }
        other => bail!("submission ended unexpectedly in state {other:?}"),
    }
}
