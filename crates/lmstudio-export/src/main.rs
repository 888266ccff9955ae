use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use env_flags::env_flags;
use once_cell::sync::OnceCell;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::Registry;

use lmstudio_export::config::{UserConfig, expand_home, home_subdir, load_user_config};
use lmstudio_export::diagnostics::TracingDiagnostics;
use lmstudio_export::export::{default_lmstudio_home, export_config, export_preset};
use lmstudio_export::model::config_file_name;
use lmstudio_export::sink::FsSink;
use lmstudio_export::source::{DEFAULT_OLLAMA_HOST, LocalModelfile, ModelfileSource, OllamaClient};

#[derive(Debug, Parser)]
#[command(
    name = "lmstudio-export",
    version,
    about = "Export Ollama model configuration to LM Studio"
)]
struct Cli {
    /// Ollama server (overrides OLLAMA_HOST and config.toml).
    #[arg(long, global = true)]
    ollama_host: Option<String>,
    /// Read the Modelfile from this file instead of asking Ollama.
    #[arg(long, global = true)]
    modelfile: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a flat LM Studio config (`<model>.json`) per model.
    Config {
        #[arg(required = true)]
        models: Vec<String>,
        /// Output directory (defaults to the current directory).
        #[arg(long, short)]
        output_dir: Option<PathBuf>,
    },
    /// Write an LM Studio preset into `<lmstudio home>/config-presets`.
    Preset {
        model: String,
        /// Preset display name (defaults to the model name).
        #[arg(long)]
        name: Option<String>,
        /// LM Studio data directory (defaults to ~/.lmstudio).
        #[arg(long)]
        lmstudio_home: Option<PathBuf>,
    },
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Clone, Copy)]
enum LogStyle {
    Json,
    Compact,
    Pretty,
    Full,
}

fn fmt_layer<W>(style: LogStyle, ansi: bool, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);
    match style {
        LogStyle::Json => base.json().boxed(),
        LogStyle::Compact => base.compact().boxed(),
        LogStyle::Pretty => base.pretty().boxed(),
        LogStyle::Full => base.boxed(),
    }
}

fn init_tracing(home: &std::path::Path, user_cfg: Option<&UserConfig>) {
    env_flags! {
        /// Tracing filter, e.g. "info", "debug", or targets format.
        RUST_LOG: &str = "info";
        /// Preferred filter env (alias). If set, overrides RUST_LOG.
        TRACING_FILTER: &str = "";
        /// Pretty formatting for logs (ignored if TRACING_JSON=true).
        TRACING_PRETTY: bool = false;
        /// Compact single-line formatting for logs (ignored if TRACING_JSON=true)
        TRACING_COMPACT: bool = true;
        /// JSON formatting for logs
        TRACING_JSON: bool = false;
        /// If true, also log to file under <LMSTUDIO_EXPORT_HOME>/logs or LOG_DIR
        LOG_TO_FILE: bool = false;
        /// Optional explicit log directory (absolute). Defaults to <LMSTUDIO_EXPORT_HOME>/logs
        LOG_DIR: &str = "";
    }

    use tracing_subscriber::{EnvFilter, prelude::*};

    let env_set = |k: &str| std::env::var_os(k).is_some();

    // TRACING_FILTER wins over RUST_LOG; config.toml only fills unset values.
    let mut rust_log = if !(*TRACING_FILTER).is_empty() {
        (*TRACING_FILTER).to_string()
    } else {
        (*RUST_LOG).to_string()
    };
    let mut tracing_json = *TRACING_JSON;
    let mut tracing_compact = *TRACING_COMPACT;
    let mut tracing_pretty = *TRACING_PRETTY;
    let mut log_to_file = *LOG_TO_FILE;
    let mut log_dir: Option<PathBuf> = if !(*LOG_DIR).is_empty() {
        Some(PathBuf::from(*LOG_DIR))
    } else {
        None
    };

    if let Some(cfg) = user_cfg.and_then(|c| c.logging.as_ref()) {
        if !(env_set("TRACING_FILTER") || env_set("RUST_LOG"))
            && let Some(level) = cfg.level.as_ref()
        {
            rust_log = level.clone();
        }
        if !env_set("TRACING_JSON")
            && let Some(v) = cfg.json
        {
            tracing_json = v;
        }
        if !env_set("TRACING_COMPACT")
            && let Some(v) = cfg.compact
        {
            tracing_compact = v;
        }
        if !env_set("TRACING_PRETTY")
            && let Some(v) = cfg.pretty
        {
            tracing_pretty = v;
        }
        if !env_set("LOG_TO_FILE")
            && let Some(v) = cfg.to_file
        {
            log_to_file = v;
        }
        if !env_set("LOG_DIR")
            && let Some(dir) = cfg.dir.as_ref()
        {
            log_dir = Some(expand_home(dir));
        }
    }

    let style = if tracing_json {
        LogStyle::Json
    } else if tracing_compact {
        LogStyle::Compact
    } else if tracing_pretty {
        LogStyle::Pretty
    } else {
        LogStyle::Full
    };
    let filter = EnvFilter::try_new(rust_log).unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout is reserved for command output; logs go to stderr.
    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(style, true, std::io::stderr)];
    static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();
    let mut dir_error = None;
    if log_to_file {
        let dir = log_dir.unwrap_or_else(|| home.join("logs"));
        match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(dir, "lmstudio-export.log");
                let (nb, guard) = tracing_appender::non_blocking(appender);
                let _ = FILE_GUARD.set(guard);
                layers.push(fmt_layer(style, false, nb));
            }
            Err(e) => dir_error = Some((dir, e)),
        }
    }

    if let Err(e) = tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
    {
        tracing::debug!("tracing already set: {:?}", e);
    }
    if let Some((dir, e)) = dir_error {
        tracing::warn!("failed to create log dir {}: {}", dir.display(), e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_flags! {
        /// Home for config.toml and logs. Defaults to $HOME/.lmstudio-export
        LMSTUDIO_EXPORT_HOME: &str = "";
        /// Ollama server address
        OLLAMA_HOST: &str = "";
        /// LM Studio data directory. Defaults to $HOME/.lmstudio
        LMSTUDIO_HOME: &str = "";
    }

    let cli = Cli::parse();

    let home = if !(*LMSTUDIO_EXPORT_HOME).is_empty() {
        PathBuf::from(*LMSTUDIO_EXPORT_HOME)
    } else {
        home_subdir(".lmstudio-export")
    };
    let user_cfg = match load_user_config(&home) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ignoring user config: {e:#}");
            None
        }
    };
    init_tracing(&home, user_cfg.as_ref());
    let export_cfg = user_cfg.as_ref().and_then(|c| c.export.as_ref());

    // Source: local file, or Ollama (flag, env, config, default).
    let source: Arc<dyn ModelfileSource> = if let Some(path) = cli.modelfile.clone() {
        tracing::info!("using local modelfile {}", path.display());
        Arc::new(LocalModelfile { path })
    } else {
        let host = cli
            .ollama_host
            .clone()
            .or_else(|| (!(*OLLAMA_HOST).is_empty()).then(|| (*OLLAMA_HOST).to_string()))
            .or_else(|| export_cfg.and_then(|c| c.ollama_host.clone()))
            .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string());
        let client = OllamaClient::new(&host);
        tracing::info!("using ollama at {}", client.base_url());
        Arc::new(client)
    };

    match cli.command {
        Command::Config { models, output_dir } => {
            let output_dir = match output_dir {
                Some(dir) => dir,
                None => match export_cfg.and_then(|c| c.output_dir.as_deref()) {
                    Some(dir) => expand_home(dir),
                    None => std::env::current_dir().context("failed to resolve current dir")?,
                },
            };
            let total = models.len();
            let mut set = tokio::task::JoinSet::new();
            for model in models {
                let source = Arc::clone(&source);
                let path = output_dir.join(config_file_name(&model));
                set.spawn(async move {
                    let res = export_config(
                        source.as_ref(),
                        &FsSink,
                        &model,
                        &path,
                        &TracingDiagnostics,
                    )
                    .await;
                    (model, res)
                });
            }
            let mut failed = 0usize;
            while let Some(joined) = set.join_next().await {
                match joined {
                    Ok((_, Ok(path))) => println!("{}", path.display()),
                    Ok((model, Err(e))) => {
                        failed += 1;
                        tracing::error!("export failed for {}: {}", model, e);
                    }
                    Err(e) => {
                        failed += 1;
                        tracing::error!("export task join error: {}", e);
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{failed} of {total} export(s) failed");
            }
        }
        Command::Preset {
            model,
            name,
            lmstudio_home,
        } => {
            let lmstudio_home = match lmstudio_home {
                Some(dir) => dir,
                None if !(*LMSTUDIO_HOME).is_empty() => expand_home(*LMSTUDIO_HOME),
                None => match export_cfg.and_then(|c| c.lmstudio_home.as_deref()) {
                    Some(dir) => expand_home(dir),
                    None => default_lmstudio_home()?,
                },
            };
            let display_name = name.unwrap_or_else(|| model.clone());
            let path = export_preset(
                source.as_ref(),
                &FsSink,
                &model,
                &display_name,
                &lmstudio_home,
                &TracingDiagnostics,
            )
            .await
            .with_context(|| format!("failed to export preset for {model}"))?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
