use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use ga_app::cli::{self, Cli, OutputFormat, PRESETS_DIR};
use ga_app::pipeline::{Renderer, Sink};
use ga_app::watch;
use ga_core::config::save_settings;
use ga_export::share;
use ga_source::raw::load_rgba;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // Lien de partage : on affiche le texte et on s'arrête là.
    if let Some(ref link) = cli.open_share {
        print!("{}", share::decode(link)?);
        return Ok(());
    }

    // 3. Résoudre les réglages : preset > config > défauts, puis overrides
    let presets_dir = Path::new(PRESETS_DIR);
    let mut settings = cli::resolve_settings(&cli, presets_dir)?;
    cli.overrides.apply(&mut settings);
    settings
        .to_render_config()
        .context("Réglages invalides")?;

    if let Some(ref path) = cli.save_settings {
        save_settings(path, &settings)?;
    }

    // 4. Charger la source
    let input = cli.input.as_deref().context("--input requis")?;
    let width = cli.width.context("--width requis")?;
    let height = cli.height.context("--height requis")?;
    let source = load_rgba(input, width, height)?;

    let mut sink =
        Sink::new(cli.format, cli.output.clone()).with_share_base(cli.share_base.clone());
    if let Some(ref path) = cli.font {
        let font = std::fs::read(path)
            .with_context(|| format!("Impossible de lire la police {}", path.display()))?;
        sink = sink.with_font(font);
    } else if cli.format == OutputFormat::Png {
        anyhow::bail!("Le format png exige une police (--font)");
    }

    // 5. Rendu unique ou surveillance
    if cli.watch {
        let watched = cli.settings_path(presets_dir);
        return watch::run(
            &watched,
            cli.overrides.clone(),
            settings,
            &source,
            &sink.redrawing(),
        );
    }

    let art = Renderer::new().render(&source, &settings)?;
    sink.emit(&art, settings.zoom)
}
