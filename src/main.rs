use anyhow::{Context, Result};
use rmk_action::cli::output::{style, CHECK, CROSS, INFO};
use rmk_action::cli::{output::format_dispatch_event, Cli};
use rmk_action::core::{
    config::ActionConfig, credentials::Credentials, AllowList, DispatchState, EnvironmentClassifier,
    ExecutionContext, Operation,
};
use rmk_action::execution::{CommandDispatcher, ShellRunner};
use rmk_action::github::{GitHubContext, GitHubOutput};
use rmk_action::notify::{LogNotifier, Notifier, SlackNotifier};
use rmk_action::setup::{project, ProjectInitializer, RmkInstaller};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() {
    let cli = Cli::from_args();

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }

    if let Err(err) = run(cli.to_config()).await {
        println!("{} {}", CROSS, style("rmk action failed").red());
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")
}

async fn run(config: ActionConfig) -> Result<()> {
    let github = GitHubContext::from_env(&config.github_custom_ref, &config.github_custom_ref_name)?;
    debug!("{}", github.summary());

    // Environment selection needs nothing but git
    let bootstrap = ShellRunner::new(config.command_timeout_secs);
    let branch = github.classification_branch(&bootstrap).await?;
    let environment = EnvironmentClassifier::extended().select_environment(&branch)?;
    AllowList::parse(&config.allowed_environments).validate(environment.as_str())?;
    let operation: Operation = config.command.parse()?;
    println!(
        "{} Branch {} selects environment {} for {}",
        INFO,
        style(&branch).cyan(),
        style(environment).bold(),
        style(operation).bold()
    );

    let workdir = std::env::current_dir().context("Failed to resolve working directory")?;
    let credentials = Credentials::parse(&config.cluster_provider_credentials)?;
    let provider_env = credentials.env_for(environment.as_str(), &config.cluster_provider, &workdir)?;

    RmkInstaller::new(&config.rmk_version, &config.rmk_download_url)
        .install()
        .await?;

    let runner = ShellRunner::new(config.command_timeout_secs)
        .with_envs(provider_env)
        .with_envs(project::rmk_env(&config.github_token, &config.slack));

    let initializer = ProjectInitializer::new(&runner);
    initializer.configure_git().await?;
    initializer.configure_rmk(&config).await?;
    let tenant = initializer.tenant().await?;

    let mut ctx = ExecutionContext::from_config(&config, environment, branch, tenant)?;
    if let Some(message) = initializer.latest_commit_message().await {
        ctx = ctx.with_commit_message(message);
    }

    let notifier: Arc<dyn Notifier> = if config.slack.enabled {
        Arc::new(SlackNotifier::new(
            github.clone(),
            &config.github_token,
            &config.slack.webhook,
        )?)
    } else {
        Arc::new(LogNotifier)
    };

    let mut dispatcher = CommandDispatcher::new(runner, notifier, Arc::new(GitHubOutput::from_env()));
    dispatcher.add_event_handler(|event| {
        println!("{}", format_dispatch_event(event));
    });

    let report = dispatcher.execute(&ctx).await?;
    match report.state {
        DispatchState::Skipped { .. } => println!(
            "{} {} {}",
            INFO,
            style(ctx.operation).bold(),
            style("skipped").dim()
        ),
        _ => println!(
            "{} {} completed {}",
            CHECK,
            style(ctx.operation).bold(),
            style("successfully").green()
        ),
    }

    Ok(())
}
