use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use ga_core::config::{Settings, load_settings};
use ga_core::frame::PixelGrid;
use notify::{Event, EventKind, RecursiveMode, Watcher};

use crate::cli::Overrides;
use crate::pipeline::{Renderer, Sink};

/// Recharge les réglages puis réapplique les overrides CLI.
///
/// Invalid settings are rejected here so the worker never sees them.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed or validated.
pub fn reload(path: &Path, overrides: &Overrides) -> Result<Settings> {
    let mut settings = load_settings(path)?;
    overrides.apply(&mut settings);
    settings.to_render_config()?;
    Ok(settings)
}

/// Lance un watcher qui republie les réglages et signale le worker.
///
/// Each successful reload stores the new settings, then sends its
/// generation number. Retourne le Watcher (doit rester vivant).
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
pub fn spawn_settings_watcher(
    settings_path: &Path,
    overrides: Overrides,
    settings: &Arc<ArcSwap<Settings>>,
    signal: flume::Sender<u64>,
) -> Result<impl Watcher + use<>> {
    let settings = Arc::clone(settings);
    let path = settings_path.to_path_buf();
    let generation = AtomicU64::new(1);

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let Ok(event) = res else { return };
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return;
        }
        match reload(&path, &overrides) {
            Ok(new_settings) => {
                settings.store(Arc::new(new_settings));
                let g = generation.fetch_add(1, Ordering::Relaxed);
                log::info!("Réglages rechargés depuis {} (#{g})", path.display());
                if signal.send(g).is_err() {
                    log::debug!("Worker de rendu arrêté, signal ignoré");
                }
            }
            // On garde les anciens réglages. Pas de panic.
            Err(e) => log::warn!("Erreur de rechargement des réglages : {e:#}"),
        }
    })?;

    watcher
        .watch(settings_path, RecursiveMode::NonRecursive)
        .with_context(|| format!("Impossible de surveiller {}", settings_path.display()))?;
    Ok(watcher)
}

/// Block for one signal, then drain the queue and keep the newest.
///
/// Returns `None` once every sender is gone.
///
/// # Example
/// ```
/// use ga_app::watch::latest;
/// let (tx, rx) = flume::unbounded();
/// for g in 1..=3u64 {
///     tx.send(g).unwrap();
/// }
/// assert_eq!(latest(&rx), Some(3));
/// drop(tx);
/// assert_eq!(latest(&rx), None);
/// ```
pub fn latest<T>(rx: &flume::Receiver<T>) -> Option<T> {
    let first = rx.recv().ok()?;
    Some(rx.try_iter().last().unwrap_or(first))
}

/// Render loop: one render per drained batch of signals, with the settings
/// current at that time.
pub fn render_loop(
    rx: &flume::Receiver<u64>,
    settings: &ArcSwap<Settings>,
    source: &PixelGrid,
    sink: &Sink,
) {
    let mut renderer = Renderer::new();
    while let Some(generation) = latest(rx) {
        let snapshot = settings.load_full();
        let result = renderer
            .render(source, &snapshot)
            .and_then(|art| sink.emit(&art, snapshot.zoom));
        match result {
            Ok(()) => log::debug!("Rendu #{generation} terminé"),
            Err(e) => log::warn!("Rendu #{generation} impossible : {e:#}"),
        }
    }
}

/// Watch mode: first render immediately, then one per settings change.
///
/// Runs until the process is interrupted.
///
/// # Errors
/// Returns an error if the settings file cannot be watched.
pub fn run(
    settings_path: &Path,
    overrides: Overrides,
    settings: Settings,
    source: &PixelGrid,
    sink: &Sink,
) -> Result<()> {
    let shared = Arc::new(ArcSwap::from_pointee(settings));
    let (tx, rx) = flume::unbounded();
    let _watcher = spawn_settings_watcher(settings_path, overrides, &shared, tx.clone())?;
    log::info!("Surveillance de {}", settings_path.display());

    if tx.send(0).is_err() {
        anyhow::bail!("Canal de rendu fermé");
    }
    drop(tx);
    render_loop(&rx, &shared, source, sink);
    Ok(())
}
