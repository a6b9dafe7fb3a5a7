use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use dialog_core::config::{EndpointConfig, ServiceConfig};
use dialog_core::types::{ConversationContext, Outcome};
use dialog_engine::{DialogService, SERVICE_ID};
use dialog_runtime::defaults::default_service_config;
use dialog_runtime::{ConfigStore, ConnectorRegistry, secrets};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::oneshot;

#[derive(Debug, Parser)]
#[command(name = "dialog-cli", about = "List, upload and talk to remote dialogs")]
struct Cli {
    /// Service config file (JSON).
    #[arg(long, env = "DIALOG_CONFIG", default_value = "dialog-config.json")]
    config: PathBuf,

    /// Overrides the configured endpoint URL.
    #[arg(long, env = "DIALOG_URL")]
    url: Option<String>,

    #[arg(long, env = "DIALOG_USERNAME")]
    username: Option<String>,

    /// Used instead of the keyring when set.
    #[arg(long, env = "DIALOG_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Save endpoint settings; the password goes to the OS keyring.
    Configure {
        /// Remove the stored password instead of saving one.
        #[arg(long)]
        clear_password: bool,
    },
    /// List the dialogs on the service.
    List,
    /// Upload a new dialog.
    Upload {
        name: String,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Send a single input to a dialog.
    Converse {
        dialog_id: String,
        input: String,
        #[arg(long, default_value_t = 0)]
        conversation_id: i64,
        #[arg(long, default_value_t = 0)]
        client_id: i64,
    },
    /// Talk to a dialog interactively, one line per turn.
    Chat { dialog_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = ConfigStore::at_path(&cli.config);
    let mut cfg = store.load_or(default_service_config)?;
    apply_overrides(&mut cfg, &cli);

    match cli.command {
        Command::Configure { clear_password } => {
            let password = if clear_password {
                if cli.password.is_some() {
                    bail!("--clear-password cannot be combined with a password");
                }
                PasswordChange::Clear
            } else {
                match cli.password.as_deref() {
                    Some(password) => PasswordChange::Set(password),
                    None => PasswordChange::Keep,
                }
            };
            configure(&store, &cfg, password)?
        }
        Command::List => {
            let svc = service(&cfg, cli.password.clone())?;
            let (tx, rx) = oneshot::channel();
            let dispatched = svc.list_dialogs(move |out| {
                let _ = tx.send(out);
            })?;
            let list = await_outcome("list dialogs", dispatched, rx).await?;
            if list.is_empty() {
                eprintln!("no dialogs");
            }
            for dialog in &list.dialogs {
                println!("{}\t{}", dialog.id, dialog.name);
            }
        }
        Command::Upload { name, file } => {
            let svc = service(&cfg, cli.password.clone())?;
            let (tx, rx) = oneshot::channel();
            let dispatched = svc.upload_dialog(&name, file.as_deref(), move |out| {
                let _ = tx.send(out);
            })?;
            let result = await_outcome("upload dialog", dispatched, rx).await?;
            println!("{}", result.dialog_id);
        }
        Command::Converse {
            dialog_id,
            input,
            conversation_id,
            client_id,
        } => {
            let svc = service(&cfg, cli.password.clone())?;
            let context = ConversationContext::new(conversation_id, client_id);
            let (tx, rx) = oneshot::channel();
            let dispatched = svc.converse(&dialog_id, &input, context, move |out| {
                let _ = tx.send(out);
            })?;
            let turn = await_outcome("converse", dispatched, rx).await?;
            println!("{}", serde_json::to_string_pretty(&turn)?);
        }
        Command::Chat { dialog_id } => {
            let svc = service(&cfg, cli.password.clone())?;
            chat(&svc, &dialog_id).await?;
        }
    }

    Ok(())
}

fn apply_overrides(cfg: &mut ServiceConfig, cli: &Cli) {
    if cli.url.is_none() && cli.username.is_none() {
        return;
    }

    let mut endpoint = cfg
        .endpoint(SERVICE_ID)
        .cloned()
        .unwrap_or_else(|| EndpointConfig::new(SERVICE_ID, ""));
    if let Some(url) = &cli.url {
        endpoint.url = url.clone();
    }
    if let Some(username) = &cli.username {
        endpoint.username = Some(username.clone());
    }
    cfg.upsert(endpoint);
}

enum PasswordChange<'a> {
    Keep,
    Set(&'a str),
    Clear,
}

fn configure(store: &ConfigStore, cfg: &ServiceConfig, password: PasswordChange<'_>) -> anyhow::Result<()> {
    let mut cfg = cfg.clone();
    let present = match password {
        PasswordChange::Keep => None,
        PasswordChange::Set(password) => {
            secrets::set_password(SERVICE_ID, password)?;
            Some(true)
        }
        PasswordChange::Clear => {
            secrets::delete_password(SERVICE_ID)?;
            Some(false)
        }
    };
    if let Some(present) = present {
        set_password_present(&mut cfg, present)?;
    }
    store.save(&cfg)?;
    println!("saved {}", store.path().display());
    Ok(())
}

fn set_password_present(cfg: &mut ServiceConfig, present: bool) -> anyhow::Result<()> {
    let mut endpoint = cfg
        .endpoint(SERVICE_ID)
        .cloned()
        .ok_or_else(|| anyhow!("no {SERVICE_ID} endpoint to update"))?;
    endpoint.password_present = present;
    cfg.upsert(endpoint);
    Ok(())
}

fn service(cfg: &ServiceConfig, password: Option<String>) -> anyhow::Result<DialogService> {
    let registry = match password {
        // An explicit password bypasses the keyring entirely.
        Some(password) => {
            let mut registry = ConnectorRegistry::default();
            for endpoint in &cfg.endpoints {
                registry.register(endpoint.clone(), Some(password.clone()));
            }
            registry
        }
        None => ConnectorRegistry::from_config(cfg)?,
    };
    Ok(DialogService::new(Arc::new(registry)))
}

async fn await_outcome<T>(
    what: &str,
    dispatched: bool,
    rx: oneshot::Receiver<Outcome<T>>,
) -> anyhow::Result<T> {
    if !dispatched {
        bail!("{what}: request was not dispatched (check the endpoint configuration)");
    }
    rx.await
        .with_context(|| format!("{what}: completion handler dropped"))?
        .ok_or_else(|| anyhow!("{what} failed"))
}

async fn chat(svc: &DialogService, dialog_id: &str) -> anyhow::Result<()> {
    let mut context = ConversationContext::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (tx, rx) = oneshot::channel();
        let dispatched = svc.converse(dialog_id, input, context, move |out| {
            let _ = tx.send(out);
        })?;
        match await_outcome("converse", dispatched, rx).await {
            Ok(turn) => {
                context = turn.context();
                for utterance in &turn.utterances {
                    println!("{utterance}");
                }
            }
            // Keep the session alive; the next line retries with the same context.
            Err(e) => log::error!("{e:#}"),
        }
    }

    Ok(())
}
