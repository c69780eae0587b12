use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rental_admin::ConfigError;
use rental_admin::config::ApiConfig;
use rental_admin::net::api::{ApiClient, ApiError};
use rental_admin::router::routes::RouteEntry;
use rental_admin::router::{NavError, Navigator, Role};
use rental_admin::state::session::{
    AUTH_TOKEN_KEY, FileSessionStore, MalformedSessionPolicy, SessionError, SessionFlags, SessionStore,
    USER_INFO_KEY, clear_session,
};
use rental_admin::util::currency::{format_peso, format_with_symbol};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Nav(#[from] NavError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("reading {path} failed: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("expected NAME=VALUE, got `{0}`")]
    InvalidField(String),
}

#[derive(Parser, Debug)]
#[command(name = "rental-admin", about = "Vehicle rental admin API and routing CLI")]
struct Cli {
    /// Overrides `API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, env = "RENTAL_SESSION_FILE", default_value = ".rental-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the backend health endpoint.
    Ping,
    Get {
        path: String,
    },
    Post(BodyArgs),
    Put(BodyArgs),
    Delete {
        path: String,
    },
    /// Send a multipart form.
    Upload(UploadArgs),
    /// Evaluate the navigation guard for a path against the session file.
    Route {
        path: String,
        /// Clear the session when the stored user info is unreadable.
        #[arg(long, default_value_t = false)]
        force_logout: bool,
    },
    /// Print the route table.
    Routes,
    Session(SessionCommand),
    /// Format an amount in pesos.
    Peso {
        amount: String,
        #[arg(long, default_value_t = false)]
        symbol: bool,
    },
}

#[derive(Args, Debug)]
struct BodyArgs {
    path: String,
    #[arg(long, default_value = "{}")]
    data: String,
}

#[derive(Args, Debug)]
struct UploadArgs {
    path: String,
    /// Text field, `NAME=VALUE`. Repeatable.
    #[arg(long = "field")]
    fields: Vec<String>,
    /// File field, `NAME=PATH`. Repeatable.
    #[arg(long = "file")]
    files: Vec<String>,
}

#[derive(Args, Debug)]
struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Subcommand, Debug)]
enum SessionSubcommand {
    Show,
    Set {
        token: String,
        #[arg(long, default_value = "user")]
        role: String,
    },
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = FileSessionStore::new(cli.session_file);

    match cli.command {
        Command::Ping => {
            let client = build_client(cli.base_url.as_deref())?;
            print_json(&client.check_connection().await?)
        }
        Command::Get { path } => {
            let client = build_client(cli.base_url.as_deref())?;
            print_json(&client.get::<Value>(&path).await?)
        }
        Command::Post(args) => {
            let client = build_client(cli.base_url.as_deref())?;
            let body: Value = serde_json::from_str(&args.data)?;
            print_json(&client.post::<_, Value>(&args.path, &body).await?)
        }
        Command::Put(args) => {
            let client = build_client(cli.base_url.as_deref())?;
            let body: Value = serde_json::from_str(&args.data)?;
            print_json(&client.put::<_, Value>(&args.path, &body).await?)
        }
        Command::Delete { path } => {
            let client = build_client(cli.base_url.as_deref())?;
            print_json(&client.delete::<Value>(&path).await?)
        }
        Command::Upload(args) => {
            let client = build_client(cli.base_url.as_deref())?;
            let form = build_form(&args).await?;
            print_json(&client.upload::<Value>(&args.path, form).await?)
        }
        Command::Route { path, force_logout } => run_route(&store, &path, force_logout),
        Command::Routes => {
            print_routes(&Navigator::default());
            Ok(())
        }
        Command::Session(session) => run_session(&store, session),
        Command::Peso { amount, symbol } => {
            let formatted = if symbol { format_with_symbol(amount.as_str()) } else { format_peso(amount.as_str()) };
            println!("{formatted}");
            Ok(())
        }
    }
}

fn build_client(base_url: Option<&str>) -> Result<ApiClient, CliError> {
    let mut config = ApiConfig::from_env()?;
    if let Some(url) = base_url {
        config = config.with_base_url(url)?;
    }
    tracing::debug!(base_url = %config.base_url, "api client configured");
    Ok(ApiClient::new(&config)?)
}

async fn build_form(args: &UploadArgs) -> Result<Form, CliError> {
    let mut form = Form::new();
    for field in &args.fields {
        let (name, value) = split_field(field)?;
        form = form.text(name.to_owned(), value.to_owned());
    }
    for file in &args.files {
        let (name, raw_path) = split_field(file)?;
        let path = Path::new(raw_path);
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| CliError::ReadFile { path: path.to_path_buf(), source })?;
        let file_name = path
            .file_name()
            .map_or_else(|| raw_path.to_owned(), |n| n.to_string_lossy().into_owned());
        form = form.part(name.to_owned(), Part::bytes(bytes).file_name(file_name));
    }
    Ok(form)
}

fn split_field(raw: &str) -> Result<(&str, &str), CliError> {
    raw.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| CliError::InvalidField(raw.to_owned()))
}

fn run_route(store: &FileSessionStore, path: &str, force_logout: bool) -> Result<(), CliError> {
    let policy = if force_logout { MalformedSessionPolicy::ForceLogout } else { MalformedSessionPolicy::KeepSession };
    let session = SessionFlags::load(store, policy);
    let navigation = Navigator::default().navigate(path, &session)?;

    for hop in &navigation.hops {
        println!("  -> {hop}");
    }
    println!(
        "{} ({}) [authenticated={}, role={}]",
        navigation.route.path,
        navigation.title(),
        session.authenticated,
        session.role.as_str()
    );
    Ok(())
}

fn run_session(store: &FileSessionStore, session: SessionCommand) -> Result<(), CliError> {
    match session.command {
        SessionSubcommand::Show => {
            let flags = SessionFlags::load(store, MalformedSessionPolicy::KeepSession);
            println!("authenticated={} role={}", flags.authenticated, flags.role.as_str());
        }
        SessionSubcommand::Set { token, role } => {
            let user_info = serde_json::json!({ "role": Role::parse(&role).as_str() });
            store.set(AUTH_TOKEN_KEY, &token)?;
            store.set(USER_INFO_KEY, &user_info.to_string())?;
            tracing::info!(path = %store.path().display(), "session saved");
        }
        SessionSubcommand::Clear => {
            clear_session(store)?;
            tracing::info!(path = %store.path().display(), "session cleared");
        }
    }
    Ok(())
}

fn print_routes(navigator: &Navigator) {
    for entry in navigator.table() {
        match entry {
            RouteEntry::Route(route) => {
                let meta = route.meta;
                let mut flags = Vec::new();
                if meta.requires_auth {
                    flags.push("auth");
                }
                if meta.requires_admin {
                    flags.push("admin");
                }
                if meta.requires_guest {
                    flags.push("guest");
                }
                println!("{:<18} {:<16} {:<22} {}", route.path, route.name, meta.title, flags.join(","));
            }
            RouteEntry::Redirect { from, to } => println!("{from:<18} -> {to}"),
        }
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
