use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "overprint", version)]
struct Cli {
    /// JSON config file (fonts, server, defaults, logging).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve `POST /api/generate`.
    Serve(ServeArgs),
    /// Render a scene JSON file to PNG.
    Render(RenderArgs),
    /// Print the effective configuration as JSON.
    PrintConfig,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Listen address, overrides `server.bind`.
    #[arg(long)]
    bind: Option<String>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Fail on the first overlay that cannot be decoded instead of skipping it.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => overprint::OverprintConfig::from_path(path)?,
        None => overprint::OverprintConfig::default(),
    };
    overprint::init_logging(&cfg.logging);

    match cli.cmd {
        Command::Serve(args) => cmd_serve(cfg, args),
        Command::Render(args) => cmd_render(cfg, cli.config.is_some(), args),
        Command::PrintConfig => {
            println!("{}", cfg.to_json_pretty()?);
            Ok(())
        }
    }
}

fn cmd_serve(mut cfg: overprint::OverprintConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        cfg.server.bind = bind;
    }
    overprint::serve(cfg)?;
    Ok(())
}

fn cmd_render(
    cfg: overprint::OverprintConfig,
    has_config: bool,
    args: RenderArgs,
) -> anyhow::Result<()> {
    let scene = overprint::Scene::from_path(&args.in_path)?;
    let loader = if has_config {
        cfg.asset_resolver()
    } else {
        let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
        overprint::AssetResolver::new(root)
    };
    let policy = if args.strict {
        overprint::DecodePolicy::FailFast
    } else {
        overprint::DecodePolicy::SkipFailed
    };

    let mut renderer = overprint::Renderer::new(cfg.font_library()?);
    let surface = renderer.render_scene(&scene, &loader, policy)?;
    let png = overprint::encode_png(&surface)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png).with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
