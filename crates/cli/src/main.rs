//! sitedeploy CLI entry point.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod args;
mod config;
mod output;

use args::{AliasCommands, Cli, Commands};
use sitedeploy_api::ApiClient;
use sitedeploy_pipeline::{
    DeployInput, DeployOptions, LimitsSession, ProgressCallback, SpaOracle, UploadProgress,
    assemble, preflight,
};

const DEFAULT_API: &str = "https://api.sitedeploy.dev";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Completions need no API access.
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "sitedeploy", &mut io::stdout());
        return Ok(());
    }

    let file_config = config::load();
    let api_url = cli
        .api
        .or(file_config.api)
        .unwrap_or_else(|| DEFAULT_API.to_string());
    let token = cli
        .token
        .or(file_config.token)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "no API token configured; pass --token, set SITEDEPLOY_TOKEN, \
                 or add one to {}",
                config::CONFIG_FILENAME
            )
        })?;

    let client = ApiClient::new(api_url, token);

    match cli.command {
        Commands::Deploy {
            paths,
            keep_paths,
            no_spa,
            check,
        } => handle_deploy(&client, paths, keep_paths, no_spa, check, cli.json).await,
        Commands::List => {
            let deployments = client.list_deployments().await?;
            output::print_deployments(&deployments, cli.json);
            Ok(())
        }
        Commands::Info { id } => {
            let deployment = client.get_deployment(&id).await?;
            output::print_deployment(&deployment, cli.json);
            Ok(())
        }
        Commands::Remove { id } => {
            client.delete_deployment(&id).await?;
            println!("Deleted deployment {id}.");
            Ok(())
        }
        Commands::Alias { command } => handle_alias(&client, command, cli.json).await,
        Commands::Account => {
            let account = client.account().await?;
            output::print_account(&account, cli.json);
            Ok(())
        }
        Commands::Completions { .. } => unreachable!("handled before API setup"),
    }
}

async fn handle_deploy(
    client: &ApiClient,
    paths: Vec<PathBuf>,
    keep_paths: bool,
    no_spa: bool,
    check: bool,
    json: bool,
) -> anyhow::Result<()> {
    let on_progress: Option<ProgressCallback> = if json {
        None
    } else {
        Some(Arc::new(|p: UploadProgress| {
            eprintln!("uploading {} ({}/{})", p.path, p.uploaded_files, p.total_files);
        }))
    };
    let options = DeployOptions {
        path_detect: !keep_paths,
        spa_detect: !no_spa,
        on_progress,
        ..Default::default()
    };

    let session = LimitsSession::new();
    session.init(client.fetch_limits().await?);
    let limits = session.get()?;

    let input = DeployInput::Paths(paths);

    if check {
        let report = preflight(input, &options, &limits)?;
        output::print_report(&report, json);
        if !report.can_deploy {
            anyhow::bail!("pre-flight validation failed");
        }
        return Ok(());
    }

    let files = assemble(input, &options, &limits, Some(client as &dyn SpaOracle)).await?;
    tracing::info!(files = files.len(), "assembled deployment");

    let deployment = client.create_deployment(&files, &options).await?;
    output::print_deployment(&deployment, json);
    Ok(())
}

async fn handle_alias(
    client: &ApiClient,
    command: AliasCommands,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        AliasCommands::List => {
            let aliases = client.list_aliases().await?;
            output::print_aliases(&aliases, json);
        }
        AliasCommands::Set {
            name,
            deployment_id,
        } => {
            let alias = client.set_alias(&name, &deployment_id).await?;
            println!("{}  ->  {}  ({})", alias.name, alias.deployment_id, alias.url);
        }
        AliasCommands::Remove { name } => {
            client.delete_alias(&name).await?;
            println!("Deleted alias {name}.");
        }
    }
    Ok(())
}
