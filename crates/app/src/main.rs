use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use qshell_core::model::PageName;
use services::navigator::PAGE_QUERY_PARAM;
use services::{AppServices, Clock, ShellConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};
use url::Url;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidUrl { flag: &'static str, raw: String },
    InvalidPage { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidUrl { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidPage { raw } => write!(f, "invalid --page value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_url(flag: &'static str, raw: String) -> Result<Url, ArgsError> {
    Url::parse(raw.trim()).map_err(|_| ArgsError::InvalidUrl { flag, raw })
}

struct Args {
    db_url: String,
    api_url: Option<Url>,
    assets_url: Option<Url>,
    page: Option<PageName>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--db <sqlite_url>] [--api <url>] [--assets <url>] [--page <name>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:qshell.sqlite3");
    eprintln!("  --api http://localhost:8000");
    eprintln!("  --assets http://localhost:8080");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QSHELL_DB_URL, QSHELL_API_URL, QSHELL_ASSETS_URL, QSHELL_DEFAULT_LANGUAGE,");
    eprintln!("  QSHELL_PAGES, QSHELL_LANGUAGES, RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            db_url: std::env::var("QSHELL_DB_URL")
                .ok()
                .map_or_else(|| "sqlite://qshell.sqlite3".into(), normalize_sqlite_url),
            api_url: None,
            assets_url: None,
            page: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                "--api" => {
                    parsed.api_url = Some(parse_url("--api", require_value(args, "--api")?)?);
                }
                "--assets" => {
                    let value = require_value(args, "--assets")?;
                    parsed.assets_url = Some(parse_url("--assets", value)?);
                }
                "--page" => {
                    let value = require_value(args, "--page")?;
                    let page = PageName::new(&value)
                        .map_err(|_| ArgsError::InvalidPage { raw: value.clone() })?;
                    parsed.page = Some(page);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    /// Startup location as the webview would see it, `?page=` included.
    fn location(&self) -> String {
        match &self.page {
            Some(page) => format!("index.html?{PAGE_QUERY_PARAM}={page}"),
            None => "index.html".to_owned(),
        }
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    let mut config = ShellConfig::from_env()?;
    if let Some(url) = parsed.api_url.clone() {
        config = config.with_api_url(url);
    }
    if let Some(url) = parsed.assets_url.clone() {
        config = config.with_assets_url(url);
    }
    info!(api = %config.api_url, assets = %config.assets_url, "starting shell");

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, config, Clock::default_clock()).await?;

    if let Err(err) = services.auth().restore().await {
        warn!(error = %err, "could not restore session");
    }
    let language = services.translations().current_language().await;
    info!(%language, "resolved language");
    drop(services.spawn_listeners());

    let navigator = services.navigator();
    let location = parsed.location();
    tokio::spawn(async move {
        if let Err(err) = navigator.resolve_initial_page(&location).await {
            warn!(error = %err, "initial page failed to load");
        }
    });

    let app: Arc<dyn UiApp> = Arc::new(services);
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    // Explicitly disable it so the app doesn't behave like a modal window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("QShell")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
