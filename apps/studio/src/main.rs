use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    latest::Sequenced, BalanceDisplay, GenerationForm, GenerationResult, ScaffoldForm,
    SelectedFile, StudioClient,
};
use shared::domain::{ContractType, FunctionalRequirement, ShardTarget};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::oneshot,
};
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};
use tracing::{info, warn};

mod config;

#[derive(Parser, Debug)]
#[command(name = "studio", about = "MultiversX contract studio client")]
struct Args {
    #[arg(long, default_value = "studio.toml")]
    config: PathBuf,
    #[arg(long)]
    backend_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Treat each address (or each stdin line when none are given) as an edit
    /// of the address field and print the balance display as it changes.
    Balance { addresses: Vec<String> },
    /// Ask the backend to generate a contract.
    Generate {
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "default")]
        contract_type: ContractType,
        #[arg(long, default_value = "single")]
        shard_target: ShardTarget,
        #[arg(long = "requirement")]
        requirements: Vec<FunctionalRequirement>,
        /// Existing source sent along as the override.
        #[arg(long)]
        rust_file: Option<PathBuf>,
    },
    Upload { file: Option<PathBuf> },
    Refresh,
    /// Render a contract skeleton locally, optionally submitting its endpoints.
    Scaffold {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long = "endpoint")]
        endpoints: Vec<String>,
        #[arg(long)]
        submit: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(&args.config);
    if let Some(backend_url) = args.backend_url {
        settings.backend_url = backend_url;
    }
    info!(
        "studio: backend={} balance_api={}",
        settings.backend_url, settings.balance_api_url
    );
    let client = StudioClient::connect(settings.connect_options()?)?;

    match args.command {
        Command::Balance { addresses } => run_balance(&client, addresses).await,
        Command::Generate {
            description,
            contract_type,
            shard_target,
            requirements,
            rust_file,
        } => {
            if let Some(path) = rust_file {
                if let Err(err) = client.ingestor().ingest(&SelectedFile::from_path(path)).await {
                    warn!("studio: continuing without override source: {err}");
                }
            }
            let form = requirements.into_iter().fold(
                GenerationForm::default()
                    .with_description(description)
                    .with_contract_type(contract_type)
                    .with_shard_target(shard_target),
                |form, requirement| form.with_requirement(requirement, true),
            );
            match client.generate(&form).await {
                GenerationResult::Success { code } => {
                    println!("{code}");
                    Ok(())
                }
                GenerationResult::Failure { message } => bail!(message),
            }
        }
        Command::Upload { file } => {
            let selected = file.map(SelectedFile::from_path);
            let outcome = client.storage().upload_file(selected.as_ref()).await;
            if outcome.is_error() {
                bail!(outcome.status_message().to_string());
            }
            println!("{}", outcome.status_message());
            Ok(())
        }
        Command::Refresh => {
            let outcome = client.storage().refresh_smart_contracts().await;
            if outcome.is_error() {
                bail!(outcome.status_message().to_string());
            }
            println!("{}", outcome.status_message());
            Ok(())
        }
        Command::Scaffold {
            name,
            endpoints,
            submit,
        } => run_scaffold(&client, name, endpoints, submit).await,
    }
}

async fn run_balance(client: &StudioClient, addresses: Vec<String>) -> Result<()> {
    let updates = WatchStream::new(client.balance().subscribe());
    let (stop_tx, stop_rx) = oneshot::channel();
    let printer = tokio::spawn(forward_until_stopped(updates, stop_rx, print_balance_update));

    let mut lookups = Vec::new();
    let mut edit = |address: &str| {
        if let Some(lookup) = client
            .balance()
            .set_address(address)
            .and_then(|edit| edit.lookup)
        {
            lookups.push(lookup);
        }
    };

    if addresses.is_empty() {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            edit(line.trim());
        }
    } else {
        for address in &addresses {
            edit(address.trim());
        }
    }

    for lookup in lookups {
        if let Err(err) = lookup.await {
            warn!("studio: balance lookup task failed: {err}");
        }
    }
    let _ = stop_tx.send(());
    if let Err(err) = printer.await {
        warn!("studio: balance printer failed: {err}");
    }

    println!("final: {}", client.balance().display().text());
    Ok(())
}

/// Emits every observed update until `stop` fires. An update already
/// published when `stop` fires is still emitted first.
async fn forward_until_stopped<S, T>(
    mut updates: S,
    mut stop: oneshot::Receiver<()>,
    mut emit: impl FnMut(T),
) where
    S: Stream<Item = T> + Unpin,
{
    loop {
        tokio::select! {
            biased;
            update = updates.next() => match update {
                Some(update) => emit(update),
                None => break,
            },
            _ = &mut stop => break,
        }
    }
}

fn print_balance_update(update: Sequenced<BalanceDisplay>) {
    let display = update.value;
    let state = if display.pending { " (pending)" } else { "" };
    println!(
        "#{} {}: {}{state}",
        update.sequence,
        display.address,
        display.text()
    );
}

async fn run_scaffold(
    client: &StudioClient,
    name: String,
    endpoints: Vec<String>,
    submit: bool,
) -> Result<()> {
    let mut form = ScaffoldForm::new();
    form.contract_name = name;
    for (index, endpoint) in endpoints.into_iter().enumerate() {
        if index > 0 {
            form.add_endpoint();
        }
        form.set_endpoint(index, endpoint)?;
    }

    let scaffold = form.generate()?;
    println!("{}", scaffold.rendered_source);

    if submit {
        let verdict = client.submit_endpoints(&form).await;
        println!("endpoints: {verdict:?}");
    }
    Ok(())
}
