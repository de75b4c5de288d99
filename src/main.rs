//! drawbot - turn prompts into drawings from the command line

use std::fs;
use std::io::{self, IsTerminal, Stdout, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use drawbot::canvas::{Canvas, DrawingSurface, PreviewSurface, TerminalCaps};
use drawbot::command::{parse_commands, Command, LegacyDrawingCommand};
use drawbot::config::{load_config, load_config_from, DrawbotConfig, GeneratorKind};
use drawbot::engine::{render_legacy, Animator};
use drawbot::session::DrawingSession;
use drawbot::store::{DrawingStore, JsonFileStore};

#[derive(Parser)]
#[command(name = "drawbot", version)]
#[command(about = "Draw pictures from short text prompts")]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log everything, including each skipped command
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (TOML, or JSON with a .json extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Drawing store file, overriding the configured one
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Never print the canvas to the terminal
    #[arg(long, global = true)]
    no_preview: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a drawing from a prompt
    Draw {
        /// What to draw, e.g. "a house under a rainbow"
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Write the result as PNG
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Replay the drawing command by command
        #[arg(long)]
        animate: bool,

        /// Pause between commands when animating, in milliseconds
        #[arg(long)]
        delay: Option<u64>,

        /// Ask the remote drawing service instead of the local interpreter
        #[arg(long)]
        remote: bool,

        /// Fall back to the local interpreter if the remote service fails
        #[arg(long)]
        fallback: bool,

        /// Save the drawing under this title
        #[arg(long)]
        save: Option<String>,
    },

    /// Render commands from a JSON file
    Replay {
        file: PathBuf,

        /// The file holds interchange commands ({commandType, parameters, order})
        #[arg(long)]
        legacy: bool,

        #[arg(short, long)]
        out: Option<PathBuf>,

        #[arg(long)]
        animate: bool,

        #[arg(long)]
        delay: Option<u64>,
    },

    /// List saved drawings
    List {
        /// Only drawings of this user
        #[arg(long)]
        user: Option<u64>,
    },

    /// Render a saved drawing
    Show {
        id: u64,

        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print the commands as JSON instead of drawing them
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved drawing
    Delete { id: u64 },

    /// Print the effective configuration as TOML
    Config,
}

/// What a drawing run starts from
enum Source {
    Prompt(String),
    Commands(Vec<Command>),
}

struct RunOptions {
    animate: bool,
    save: Option<String>,
}

fn init_tracing(verbose: bool, debug: bool) {
    let log_level = if debug {
        tracing::Level::DEBUG
    } else if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn effective_config(cli: &Cli) -> Result<DrawbotConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => load_config().context("Failed to load config")?,
    };
    if let Some(store) = &cli.store {
        config.store_path = Some(store.clone());
    }
    Ok(config)
}

fn preview_enabled(cli: &Cli) -> bool {
    !cli.no_preview && io::stdout().is_terminal()
}

fn write_png(canvas: &Canvas, path: &Path) -> Result<()> {
    let png = canvas.to_png().context("Failed to encode PNG")?;
    fs::write(path, png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Generate or load, optionally animate and save; returns the session for output
async fn run_session<S: DrawingSurface>(
    mut session: DrawingSession<S>,
    source: Source,
    options: &RunOptions,
    out: &mut impl Write,
) -> Result<DrawingSession<S>> {
    let report = match source {
        Source::Prompt(prompt) => session
            .generate(&prompt)
            .await
            .with_context(|| format!("Failed to generate a drawing for '{prompt}'"))?,
        Source::Commands(commands) => session.set_commands(commands),
    };

    if options.animate {
        session.animate().await;
    }

    writeln!(
        out,
        "Drew {} command(s), skipped {}",
        report.drawn, report.skipped
    )?;

    if let Some(title) = &options.save {
        let id = session.save(title).context("Failed to save drawing")?;
        writeln!(out, "Saved drawing {id}")?;
    }

    Ok(session)
}

async fn draw(
    cli: &Cli,
    config: &DrawbotConfig,
    source: Source,
    options: RunOptions,
    out_file: Option<&Path>,
) -> Result<()> {
    let canvas = Canvas::new(config.canvas_width, config.canvas_height);
    let mut stdout = io::stdout();

    let canvas = if preview_enabled(cli) {
        let surface = PreviewSurface::new(canvas, TerminalCaps::detect(), io::stdout());
        let session = DrawingSession::from_config(surface, config)?;
        let session = run_session(session, source, &options, &mut stdout).await?;
        let mut surface: PreviewSurface<Stdout> = session.into_surface();
        if !options.animate {
            surface.present();
        }
        surface.into_canvas()
    } else {
        let session = DrawingSession::from_config(canvas, config)?;
        run_session(session, source, &options, &mut stdout)
            .await?
            .into_surface()
    };

    if let Some(path) = out_file {
        write_png(&canvas, path)?;
    }
    Ok(())
}

fn replay_legacy(
    cli: &Cli,
    config: &DrawbotConfig,
    file: &Path,
    out_file: Option<&Path>,
) -> Result<()> {
    let content =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let commands: Vec<LegacyDrawingCommand> = serde_json::from_str(&content)
        .with_context(|| {
            format!("{} is not a JSON array of interchange commands", file.display())
        })?;

    let mut canvas = Canvas::new(config.canvas_width, config.canvas_height);
    let report = render_legacy(&mut canvas, &commands);
    let mut stdout = io::stdout();
    writeln!(
        stdout,
        "Drew {} command(s), skipped {}, ignored {}",
        report.drawn, report.skipped, report.ignored
    )?;

    if preview_enabled(cli) {
        PreviewSurface::new(canvas.clone(), TerminalCaps::detect(), io::stdout()).present();
    }
    if let Some(path) = out_file {
        write_png(&canvas, path)?;
    }
    Ok(())
}

fn open_store(config: &DrawbotConfig) -> JsonFileStore {
    JsonFileStore::new(config.store_path())
}

fn list(config: &DrawbotConfig, user: Option<u64>) -> Result<()> {
    let drawings = open_store(config).list(user)?;
    let mut stdout = io::stdout();
    if drawings.is_empty() {
        writeln!(stdout, "No saved drawings")?;
        return Ok(());
    }
    for drawing in drawings {
        writeln!(
            stdout,
            "{}\t{}\t{} command(s)\tuser {}\t{}",
            drawing.id,
            drawing.title,
            drawing.commands.len(),
            drawing.user_id,
            drawing.created_at.to_rfc3339()
        )?;
    }
    Ok(())
}

async fn show(
    cli: &Cli,
    config: &DrawbotConfig,
    id: u64,
    json: bool,
    out_file: Option<&Path>,
) -> Result<()> {
    let drawing = open_store(config).get(id)?;
    if json {
        writeln!(io::stdout(), "{}", drawbot::command::to_json(&drawing.commands)?)?;
        return Ok(());
    }
    writeln!(io::stdout(), "{}", drawing.title)?;
    let options = RunOptions {
        animate: false,
        save: None,
    };
    draw(cli, config, Source::Commands(drawing.commands), options, out_file).await
}

fn delete(config: &DrawbotConfig, id: u64) -> Result<()> {
    if !open_store(config).delete(id)? {
        bail!("Drawing not found: {id}");
    }
    writeln!(io::stdout(), "Deleted drawing {id}")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.debug);
    tracing::debug!("drawbot {}", env!("CARGO_PKG_VERSION"));

    let mut config = effective_config(&cli)?;

    match &cli.command {
        Commands::Draw {
            prompt,
            out,
            animate,
            delay,
            remote,
            fallback,
            save,
        } => {
            if *remote {
                config.generator = GeneratorKind::Remote;
            }
            config.fallback_to_local |= *fallback;
            if let Some(ms) = delay {
                config.animation_delay_ms = *ms;
            }
            let options = RunOptions {
                animate: *animate,
                save: save.clone(),
            };
            draw(&cli, &config, Source::Prompt(prompt.join(" ")), options, out.as_deref()).await
        }
        Commands::Replay {
            file,
            legacy,
            out,
            animate,
            delay,
        } => {
            if *legacy {
                if *animate {
                    tracing::warn!("--animate is ignored for interchange files");
                }
                return replay_legacy(&cli, &config, file, out.as_deref());
            }
            if let Some(ms) = delay {
                config.animation_delay_ms = *ms;
            }
            let content = fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let commands = parse_commands(&content)
                .with_context(|| format!("{} is not a JSON array of commands", file.display()))?;
            let options = RunOptions {
                animate: *animate,
                save: None,
            };
            draw(&cli, &config, Source::Commands(commands), options, out.as_deref()).await
        }
        Commands::List { user } => list(&config, *user),
        Commands::Show { id, out, json } => show(&cli, &config, *id, *json, out.as_deref()).await,
        Commands::Delete { id } => delete(&config, *id),
        Commands::Config => {
            write!(io::stdout(), "{}", config.to_toml()?)?;
            Ok(())
        }
    }
}
