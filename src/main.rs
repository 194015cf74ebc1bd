// SPDX-License-Identifier: MPL-2.0
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tripplan_client::bootstrap::ClientSession;
use tripplan_client::config::{self, LoadMode, Registry};
use tripplan_client::detect::BrowserContext;
use tripplan_client::error::{Error, Result};
use tripplan_client::i18n::{EmbeddedResources, FileResources, ResourceLoader};

const HELP: &str = "\
tripplan-client: show the language, labels and locale a client session would use

USAGE:
  tripplan-client [OPTIONS]

OPTIONS:
  --query <SEARCH>     Location search string, e.g. '?setLng=de'
  --cookie <HEADER>    Cookie header, e.g. 'i18next=sl'
  --lang <TAG>         Reported browser language (defaults to the OS locale)
  --config <PATH>      Configuration file (defaults to the user config dir)
  --resources <DIR>    Directory holding catalogs per the configured path template
  --debug              Verbose logging
  -h, --help           Print this help
";

struct Args {
    query: Option<String>,
    cookie: Option<String>,
    lang: Option<String>,
    config: Option<PathBuf>,
    resources: Option<PathBuf>,
    debug: bool,
}

fn parse_args() -> Result<Option<Args>> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{}", HELP);
        return Ok(None);
    }
    let to_config_error = |err: pico_args::Error| Error::Config(err.to_string());
    Ok(Some(Args {
        query: args.opt_value_from_str("--query").map_err(to_config_error)?,
        cookie: args.opt_value_from_str("--cookie").map_err(to_config_error)?,
        lang: args.opt_value_from_str("--lang").map_err(to_config_error)?,
        config: args.opt_value_from_str("--config").map_err(to_config_error)?,
        resources: args.opt_value_from_str("--resources").map_err(to_config_error)?,
        debug: args.contains("--debug"),
    }))
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };
    init_logging(args.debug);

    let config = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load()?,
    };

    let mut context = BrowserContext::from_process();
    context.search = args.query;
    context.cookie = args.cookie;
    if let Some(lang) = args.lang {
        context.language = Some(lang);
    }

    let loader: Arc<dyn ResourceLoader> = match args.resources {
        Some(dir) => Arc::new(FileResources::from_options(dir, &config.i18n)),
        None => Arc::new(EmbeddedResources),
    };
    let registry = Registry::with_builtins();

    let session = match config.i18n.load_mode {
        LoadMode::Sync => ClientSession::start(config, &context, loader.as_ref(), &registry)?,
        LoadMode::Async => ClientSession::start_async(config, &context, loader, &registry).await?,
    };

    let locale = session.locale();
    println!("language: {} ({:?})", session.language(), session.origin());
    println!(
        "locale:   {} [date {}, time {}, {}]",
        locale.display_name,
        locale.time.date_format,
        locale.time.time_format,
        if session.use_metric() { "metric" } else { "imperial" }
    );
    println!("modules:");
    for (id, title) in session.module_titles() {
        println!("  {:<12} {}", id, title);
    }
    println!("modes:");
    for (key, label) in session.mode_labels() {
        println!("  {:<22} {}", key, label);
    }
    println!("languages: {}", session.config().language_chooser());
    Ok(())
}
