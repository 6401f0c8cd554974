use std::collections::BTreeMap;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use colored::Colorize;
use kf_env::{
    dashboard::{self, DashboardParams},
    platform::{KubeAppLister, KubeServingFactory},
    EnvOptions, EnvironmentClient,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    verbose: Verbosity,
    /// Kubeconfig context, the current context when unset
    #[arg(short, long)]
    context: Option<String>,
    /// Space (namespace) of the app, the kubeconfig default when unset
    #[arg(short, long, env = "KF_NAMESPACE")]
    namespace: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List the environment variables of an app
    Env { app_name: String },
    /// Set environment variables on an app
    SetEnv {
        app_name: String,
        /// Variables as NAME=VALUE
        #[arg(required = true, value_parser = parse_env_pair)]
        vars: Vec<(String, String)>,
    },
    /// Remove environment variables from an app
    UnsetEnv {
        app_name: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Print the monitoring dashboard for the space
    Dashboard {
        /// Display name of the dashboard
        #[arg(long)]
        name: String,
        /// Cluster the space lives in
        #[arg(long)]
        cluster: String,
    },
}

fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    if name.is_empty() {
        return Err(format!("empty variable name in '{}'", s));
    }
    Ok((name.to_owned(), value.to_owned()))
}

type KubeEnvClient = EnvironmentClient<KubeAppLister, KubeServingFactory>;

async fn env_client(k8s_context: Option<&str>) -> anyhow::Result<KubeEnvClient> {
    let (client, config) = k8s_util::create_client(k8s_context).await?;
    Ok(EnvironmentClient::new(
        KubeAppLister::new(client),
        KubeServingFactory::new(config.clone()),
    )
    .with_default_namespace(config.default_namespace))
}

fn render_dashboard(namespace: Option<&str>, name: &str, cluster: &str) -> anyhow::Result<String> {
    let space = namespace.context("a space is required for the dashboard, pass --namespace")?;
    let doc = dashboard::render(&DashboardParams {
        name,
        space,
        cluster,
    })
    .context("when rendering dashboard")?;
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// `NAME=value` lines, sorted by name.
fn env_lines(env: &BTreeMap<String, String>) -> Vec<String> {
    env.iter()
        .map(|(name, value)| format!("{}={}", name.green(), value))
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let mut opts = EnvOptions::default();
    if let Some(namespace) = &args.namespace {
        opts = opts.namespace(namespace.clone());
    }
    let k8s_context = args.context.as_deref();

    match &args.command {
        Commands::Env { app_name } => {
            let env = env_client(k8s_context)
                .await?
                .list(app_name, &opts)
                .await
                .with_context(|| format!("when listing environment of '{}'", app_name))?;
            if env.is_empty() {
                eprintln!(
                    "{}",
                    format!("! app '{}' has no environment variables", app_name).yellow()
                );
            }
            for line in env_lines(&env) {
                println!("{}", line);
            }
        }
        Commands::SetEnv { app_name, vars } => {
            let values: BTreeMap<String, String> = vars.iter().cloned().collect();
            env_client(k8s_context)
                .await?
                .set(app_name, &values, &opts)
                .await
                .with_context(|| format!("when setting environment of '{}'", app_name))?;
            eprintln!(
                "{}",
                format!("! set {} variable(s) on app '{}'", values.len(), app_name).blue()
            );
        }
        Commands::UnsetEnv { app_name, names } => {
            env_client(k8s_context)
                .await?
                .unset(app_name, names, &opts)
                .await
                .with_context(|| format!("when unsetting environment of '{}'", app_name))?;
            eprintln!(
                "{}",
                format!("! unset {} variable(s) on app '{}'", names.len(), app_name).blue()
            );
        }
        Commands::Dashboard { name, cluster } => {
            println!("{}", render_dashboard(args.namespace.as_deref(), name, cluster)?);
        }
    }

    Ok(())
}
