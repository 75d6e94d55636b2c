use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use print2fax::calls::{account_info_or_empty, DirectCalls, FaxApi, RelayClient};
use print2fax::config::{expand_tilde, load_config, Paths};
use print2fax::logging::init_tracing;
use print2fax::request::{build_send_request, FaxOptions};
use print2fax::settings::SettingsStore;
use print2fax::types::Credentials;

#[derive(Debug, Parser)]
#[command(name = "print2fax")]
#[command(about = "Send faxes through the ICT API, directly or via the local relay")]
struct Args {
    /// The directory to work with (config, settings and logs live under `<dir>/bin`)
    #[arg(long, global = true)]
    working_dir: Option<String>,

    /// Call the ICT API in-process instead of going through the relay server
    #[arg(long, global = true)]
    direct: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the loopback relay server
    Serve,
    /// Store credentials for the fax host
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Base URL of the fax host, e.g. https://fax.example.com
        #[arg(long)]
        host: String,
    },
    /// Forget stored credentials
    Logout,
    /// Show the profile of the logged-in user
    Account,
    /// List printed faxes
    Faxes {
        /// Only the most recent N
        #[arg(long)]
        count: Option<usize>,
    },
    /// List accounts usable as sender
    Accounts,
    /// Send a document as a fax
    Send(SendArgs),
}

#[derive(Debug, clap::Args)]
struct SendArgs {
    #[arg(long)]
    file: PathBuf,
    /// Destination fax number
    #[arg(long)]
    to: String,
    #[arg(long)]
    account_id: String,
    #[arg(long)]
    title: Option<String>,
    /// Recipient name
    #[arg(long)]
    name: Option<String>,
    /// Do not flag the fax for printing; it will not show up in `faxes`
    #[arg(long)]
    no_print: bool,
    #[arg(long)]
    cover_page: bool,
    #[arg(long, default_value_t = 1)]
    tries: u32,
}

impl SendArgs {
    fn options(&self) -> FaxOptions {
        FaxOptions {
            to: self.to.clone(),
            account_id: self.account_id.clone(),
            title: self.title.clone(),
            name: self.name.clone(),
            print: !self.no_print,
            cover_page: self.cover_page,
            tries: self.tries,
        }
    }
}

fn resolve_working_dir(arg: Option<&str>) -> anyhow::Result<PathBuf> {
    let dir = match arg {
        Some(dir) if !dir.trim().is_empty() => expand_tilde(dir),
        _ => std::env::current_dir()?,
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("working directory {} not usable", dir.display()))?;
    Ok(dir)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let working_dir = resolve_working_dir(args.working_dir.as_deref())?;
    let paths = Paths::from_working_dir(&working_dir);
    paths.ensure_dirs()?;
    let config = load_config(&paths)?;
    let _guard = init_tracing(config.verbose, &paths.logs_dir)?;
    info!("the server port is: {}", config.server.port);

    match args.command {
        Command::Serve => print2fax::serve(config, &paths).await,
        command => {
            let api: Arc<dyn FaxApi> = if args.direct {
                Arc::new(DirectCalls::new(SettingsStore::new(&paths.settings_file)))
            } else {
                Arc::new(RelayClient::new(config.server.port))
            };
            run_client(api.as_ref(), command).await
        }
    }
}

async fn run_client(api: &dyn FaxApi, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Serve => bail!("serve is not a client command"),
        Command::Login {
            username,
            password,
            host,
        } => {
            let credentials = Credentials {
                username,
                password,
                hostname: host,
            };
            api.save_settings(&credentials).await?;
            let profile = api.get_account_info().await?;
            println!("logged in as {} {}", profile.first_name, profile.last_name);
        }
        Command::Logout => {
            api.logout().await?;
            println!("logged out");
        }
        Command::Account => {
            let profile = account_info_or_empty(api).await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Command::Faxes { count } => {
            for fax in api.get_last_faxes(count).await? {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    fax.last_run.format("%Y-%m-%d %H:%M:%S"),
                    fax.title,
                    fax.contact_phone,
                    fax.account_phone,
                    fax.status
                );
            }
        }
        Command::Accounts => {
            for account in api.get_all_accounts().await? {
                println!(
                    "{}\t{}\t{} {}\t{}",
                    account.account_id,
                    account.account_type,
                    account.first_name,
                    account.last_name,
                    account.phone
                );
            }
        }
        Command::Send(send) => {
            let request = build_send_request(&send.file, send.options())?;
            api.send_fax(request).await?;
            println!("fax sent successfully");
        }
    }
    Ok(())
}
