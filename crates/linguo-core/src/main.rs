/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Task listings, dispute narratives and appeal funding runs printed to stdout
[POS]:    Binary entry point
[UPDATE]: When changing CLI commands, startup flow, or shutdown handling
*/

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use console::style;
use linguo_adapter::{Address, AppealSide, LinguoClient, Task, TaskId};
use rust_decimal::Decimal;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use linguo_core::domain::task::{
    TaskView, current_price, current_price_per_word, remaining_time_for_review,
    remaining_time_for_submission, view,
};
use linguo_core::status_details::{Interaction, format_eth};
use linguo_core::{
    Action, AppealFunding, AsyncAction, LinguoConfig, Runtime, SortContext, StatusDetails,
    TaskFilter, TxMeta, list_tasks, task_status_details,
};

#[derive(Parser, Debug)]
#[command(name = "linguo", version, about = "Linguo translation task and dispute orchestration")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, filter and sort the tasks of an account
    Tasks {
        #[arg(long)]
        account: Option<Address>,
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Show the dispute of a task as seen by an account
    Dispute {
        #[arg(long)]
        task_id: TaskId,
        #[arg(long)]
        account: Option<Address>,
    },
    /// Contribute to one side of the current appeal round
    FundAppeal {
        #[arg(long)]
        task_id: TaskId,
        #[arg(long)]
        side: AppealSide,
        /// Amount in wei
        #[arg(long)]
        deposit: Decimal,
        #[arg(long)]
        account: Option<Address>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = LinguoConfig::load(args.config_path.as_deref()).context("load config")?;
    info!(base_url = %config.api.base_url, "configuration loaded");

    let client = LinguoClient::with_config_and_base_url(config.client_config(), &config.api.base_url)
        .context("build API client")?;
    let mut runtime = Runtime::new(Arc::new(client), config.tx_watch_config());

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    match args.command {
        Command::Tasks { account, filter } => {
            let account = resolve_account(account, &config)?;
            let filter = TaskFilter::from_name_or_all(&filter);
            drive(&mut runtime, Action::fetch_tasks(account.clone()), &shutdown).await?;

            let state = &runtime.state().tasks;
            if let Some(err) = state.select_error(&account) {
                bail!("failed to fetch tasks: {err}");
            }
            let context = SortContext {
                account: Some(account.clone()),
                skills: config.skills.clone(),
            };
            let now = Utc::now();
            let tasks = list_tasks(state.select_by_account(&account), filter, &context, now);
            print_tasks(&tasks, filter, now);
        }
        Command::Dispute { task_id, account } => {
            let account = account.or_else(|| config.account.clone());
            drive(&mut runtime, Action::fetch_dispute_by_task_id(task_id), &shutdown).await?;

            let disputes = &runtime.state().disputes;
            if let Some(err) = disputes.select_error(task_id) {
                bail!("failed to fetch dispute for task {task_id}: {err}");
            }
            let dispute = disputes
                .select_by_task_id(task_id)
                .cloned()
                .ok_or_else(|| anyhow!("no dispute loaded for task {task_id}"))?;

            let task = match account.as_ref() {
                Some(account) => {
                    drive(&mut runtime, Action::fetch_tasks(account.clone()), &shutdown).await?;
                    runtime.state().tasks.select_by_id(task_id).cloned()
                }
                None => None,
            };
            match task {
                Some(task) => {
                    let details = task_status_details(&task, Some(&dispute), account.as_ref(), Utc::now());
                    print_details(&details);
                }
                None => {
                    println!("{} {}", style("Dispute").bold(), dispute.id);
                    println!("  status: {:?}, ruling: {:?}", dispute.status, dispute.ruling);
                }
            }
        }
        Command::FundAppeal {
            task_id,
            side,
            deposit,
            account,
        } => {
            let account = resolve_account(account, &config)?;
            let mut events = runtime.subscribe();
            let funding = AppealFunding {
                task_id,
                side,
                deposit,
                account,
            };
            let tx = TxMeta {
                confirmations: config.transactions.confirmations,
            };
            drive(&mut runtime, Action::fund_appeal(funding, tx), &shutdown).await?;
            report_funding(&mut events, &runtime, task_id, side)?;
        }
    }

    Ok(())
}

/// Dispatch `action` and process until every workflow it started is done.
async fn drive(runtime: &mut Runtime, action: Action, shutdown: &CancellationToken) -> Result<()> {
    runtime.dispatch(action).await;
    let interrupted = tokio::select! {
        _ = runtime.run_until_idle() => false,
        _ = shutdown.cancelled() => true,
    };
    if interrupted {
        warn!("interrupted, waiting for running workflows");
        runtime.shutdown_and_wait().await.context("shutdown runtime")?;
        bail!("interrupted");
    }
    Ok(())
}

fn resolve_account(account: Option<Address>, config: &LinguoConfig) -> Result<Address> {
    account
        .or_else(|| config.account.clone())
        .context("an account is required: pass --account or set `account` in the config")
}

fn report_funding(
    events: &mut broadcast::Receiver<Action>,
    runtime: &Runtime,
    task_id: TaskId,
    side: AppealSide,
) -> Result<()> {
    let mut outcome = None;
    while let Ok(action) = events.try_recv() {
        if let Action::FundAppeal(result @ (AsyncAction::Fulfilled(_) | AsyncAction::Rejected(_))) = action {
            outcome = Some(result);
        }
    }

    match outcome {
        Some(AsyncAction::Fulfilled(env)) => {
            println!(
                "{} funded {} of the {} side for task {}",
                style("✔").green(),
                format_eth(env.payload.deposit),
                side,
                task_id
            );
            if let Some(dispute) = runtime.state().disputes.select_by_task_id(task_id) {
                let paid = dispute.current_round.paid_fees.get(side);
                println!("  paid so far: {}", format_eth(*paid));
            }
            Ok(())
        }
        Some(AsyncAction::Rejected(env)) => Err(anyhow::Error::new(env.payload.error))
            .with_context(|| format!("appeal funding for task {task_id} failed")),
        _ => bail!("appeal funding for task {task_id} was not submitted"),
    }
}

fn print_tasks(tasks: &[Task], filter: TaskFilter, now: chrono::DateTime<Utc>) {
    println!("{} ({})", style("Tasks").bold(), filter);
    if tasks.is_empty() {
        println!("  {}", style("no tasks").dim());
        return;
    }
    for task in tasks {
        let task_view = view(task, now);
        let per_word = current_price_per_word(current_price(task, now), task.word_count);
        let remaining = match task_view {
            TaskView::InReview => remaining_time_for_review(task, now),
            _ => remaining_time_for_submission(task, now),
        };
        println!(
            "  #{:<6} {} {:>6} → {:<6} {:>14} wei/word  {}  {}",
            task.id,
            badge(task_view),
            task.source_language,
            task.target_language,
            per_word,
            format_remaining(remaining),
            task.title
        );
    }
}

fn badge(task_view: TaskView) -> String {
    let label = format!("{:<14}", task_view.label());
    match task_view {
        TaskView::Open => style(label).green().to_string(),
        TaskView::InProgress => style(label).cyan().to_string(),
        TaskView::InReview => style(label).yellow().to_string(),
        TaskView::InDispute => style(label).red().to_string(),
        TaskView::Finished => style(label).dim().to_string(),
        TaskView::Incomplete => style(label).magenta().to_string(),
    }
}

fn format_remaining(remaining: Duration) -> String {
    if remaining <= Duration::zero() {
        return "-".to_string();
    }
    format!("{}h {:02}m", remaining.num_hours(), remaining.num_minutes() % 60)
}

fn print_details(details: &StatusDetails) {
    println!("{}", style(&details.title).bold());
    for line in &details.description {
        println!("  {line}");
    }
    match &details.interaction {
        Some(Interaction::FundAppeal { side, deposit }) => println!(
            "  {} fund the {} side with {}",
            style("→").cyan(),
            side,
            format_eth(*deposit)
        ),
        Some(Interaction::Crowdfund {
            translator,
            challenger,
        }) => println!(
            "  {} crowdfund: translator needs {}, challenger needs {}",
            style("→").cyan(),
            format_eth(*translator),
            format_eth(*challenger)
        ),
        Some(Interaction::Reimburse { label }) => {
            println!("  {} {}", style("→").cyan(), label)
        }
        None => {}
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
