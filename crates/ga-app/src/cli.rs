use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, ValueEnum};
use ga_core::color::Rgb;
use ga_core::config::{ColorModeName, ModeName, Settings, load_settings};

/// Répertoire des presets nommés.
pub const PRESETS_DIR: &str = "config/presets";

/// glypha : converts raw RGBA images into ASCII, binary or emoji art.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Buffer RGBA brut (ex. `ffmpeg -i in.jpg -f rawvideo -pix_fmt rgba`), `-` pour stdin.
    #[arg(short, long, required_unless_present = "open_share")]
    pub input: Option<PathBuf>,

    /// Largeur de la source en pixels.
    #[arg(long, required_unless_present = "open_share")]
    pub width: Option<u32>,

    /// Hauteur de la source en pixels.
    #[arg(long, required_unless_present = "open_share")]
    pub height: Option<u32>,

    /// Fichier de réglages TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Charger un preset nommé (ignore --config).
    #[arg(long)]
    pub preset: Option<String>,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Format de sortie.
    #[arg(long, value_enum, default_value_t = OutputFormat::Ansi)]
    pub format: OutputFormat,

    /// Fichier ou répertoire de sortie. Défaut : stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Police TrueType/OpenType du format png.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Page précédant `?art=` dans les liens du format share-url.
    #[arg(long, default_value = "")]
    pub share_base: String,

    /// Afficher le texte contenu dans un lien de partage, sans rendu.
    #[arg(long, value_name = "LINK")]
    pub open_share: Option<String>,

    /// Sauvegarder les réglages résolus dans ce fichier.
    #[arg(long)]
    pub save_settings: Option<PathBuf>,

    /// Re-rendre à chaque modification du fichier de réglages.
    #[arg(long, default_value_t = false)]
    pub watch: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Output format of the art.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Texte brut, une ligne par rangée.
    Text,
    /// Page HTML autonome, un span coloré par symbole.
    Html,
    /// Séquences ANSI truecolor.
    Ansi,
    /// Image PNG rastérisée avec `--font`.
    Png,
    /// Lien `?art=` portant le texte en base64.
    ShareUrl,
}

/// Per-field overrides applied on top of the loaded settings.
///
/// Kept apart from [`Cli`] so watch mode can re-apply them after a reload.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Mode de rendu : ascii, binary, emoji.
    #[arg(long)]
    pub mode: Option<ModeName>,

    /// Colonnes de la grille d'échantillonnage (1-2000).
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Rotation horaire en degrés (0, 90, 180, 270).
    #[arg(long)]
    pub rotate: Option<u16>,

    /// Seuil du mode binaire (0-255).
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Luminosité (-100 à 100).
    #[arg(long, allow_negative_numbers = true)]
    pub brightness: Option<i32>,

    /// Contraste (-100 à 100).
    #[arg(long, allow_negative_numbers = true)]
    pub contrast: Option<i32>,

    /// Couleur des symboles : original, grayscale, bw, custom.
    #[arg(long)]
    pub color_mode: Option<ColorModeName>,

    /// Couleur unique du mode custom, `#rrggbb`.
    #[arg(long)]
    pub custom_color: Option<Rgb>,
}

impl Overrides {
    /// Write every provided field into `settings`, then clamp.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(v) = self.mode {
            settings.mode = v;
        }
        if let Some(v) = self.resolution {
            settings.resolution = v;
        }
        if let Some(v) = self.rotate {
            settings.rotation = v;
        }
        if let Some(v) = self.threshold {
            settings.threshold = v;
        }
        if let Some(v) = self.brightness {
            settings.brightness = v;
        }
        if let Some(v) = self.contrast {
            settings.contrast = v;
        }
        if let Some(v) = self.color_mode {
            settings.color_mode = v;
        }
        if let Some(v) = self.custom_color {
            settings.custom_color = v;
            // Une couleur explicite sans mode explicite implique le mode custom.
            if self.color_mode.is_none() {
                settings.color_mode = ColorModeName::Custom;
            }
        }
        settings.clamp_all();
    }
}

impl Cli {
    /// Settings file actually read: the preset if given, else `--config`.
    #[must_use]
    pub fn settings_path(&self, presets_dir: &Path) -> PathBuf {
        match self.preset {
            Some(ref name) => presets_dir.join(format!("{name}.toml")),
            None => self.config.clone(),
        }
    }
}

/// Resolve settings: preset takes priority over --config.
///
/// Overrides are not applied here.
///
/// # Errors
/// Returns an error if the preset does not exist or a file is invalid.
pub fn resolve_settings(cli: &Cli, presets_dir: &Path) -> Result<Settings> {
    let path = cli.settings_path(presets_dir);
    if let Some(ref name) = cli.preset {
        if path.exists() {
            load_settings(&path)
        } else {
            anyhow::bail!(
                "Preset inconnu : {name}. Voir {} (ex: binary, emoji, matrix)",
                presets_dir.display()
            );
        }
    } else if path.exists() {
        load_settings(&path)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            path.display()
        );
        Ok(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["glypha", "--input", "img.rgba", "--width", "4", "--height", "2"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.format, OutputFormat::Ansi);
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert_eq!(cli.log_level, "warn");
        assert!(!cli.watch);
        assert_eq!(cli.overrides, Overrides::default());
        assert_eq!(cli.input, Some(PathBuf::from("img.rgba")));
        assert_eq!((cli.width, cli.height), (Some(4), Some(2)));
        assert_eq!(cli.share_base, "");
    }

    #[test]
    fn png_and_share_formats() {
        let cli = parse(&["--format", "png", "--font", "mono.ttf"]);
        assert_eq!(cli.format, OutputFormat::Png);
        assert_eq!(cli.font, Some(PathBuf::from("mono.ttf")));

        let cli = parse(&["--format", "share-url", "--share-base", "https://x.org/"]);
        assert_eq!(cli.format, OutputFormat::ShareUrl);
        assert_eq!(cli.share_base, "https://x.org/");
    }

    #[test]
    fn open_share_needs_no_source() {
        let cli = Cli::try_parse_from(["glypha", "--open-share", "?art=MDEK"]).unwrap();
        assert_eq!(cli.open_share.as_deref(), Some("?art=MDEK"));
        assert_eq!(cli.input, None);
    }

    #[test]
    fn dimensions_are_required() {
        assert!(Cli::try_parse_from(["glypha", "--input", "-"]).is_err());
    }

    #[test]
    fn overrides_parse_and_apply() {
        let cli = parse(&[
            "--mode",
            "binary",
            "--threshold",
            "90",
            "--brightness",
            "-150",
            "--contrast",
            "30",
            "--rotate",
            "270",
            "--resolution",
            "5000",
            "--format",
            "html",
        ]);
        assert_eq!(cli.format, OutputFormat::Html);

        let mut s = Settings::default();
        cli.overrides.apply(&mut s);
        assert_eq!(s.mode, ModeName::Binary);
        assert_eq!(s.threshold, 90);
        assert_eq!(s.brightness, -100);
        assert_eq!(s.contrast, 30);
        assert_eq!(s.rotation, 270);
        assert_eq!(s.resolution, 2000);
    }

    #[test]
    fn custom_color_implies_custom_mode() {
        let cli = parse(&["--custom-color", "#ff8800"]);
        let mut s = Settings::default();
        cli.overrides.apply(&mut s);
        assert_eq!(s.color_mode, ColorModeName::Custom);
        assert_eq!(s.custom_color, Rgb::new(255, 136, 0));

        let cli = parse(&["--custom-color", "#ff8800", "--color-mode", "grayscale"]);
        let mut s = Settings::default();
        cli.overrides.apply(&mut s);
        assert_eq!(s.color_mode, ColorModeName::Grayscale);
    }

    #[test]
    fn bad_values_are_rejected() {
        let base = ["glypha", "--input", "-", "--width", "1", "--height", "1"];
        for extra in [
            ["--mode", "braille"],
            ["--custom-color", "#12"],
            ["--threshold", "256"],
            ["--format", "jpeg"],
        ] {
            let argv: Vec<&str> = base.iter().chain(extra.iter()).copied().collect();
            assert!(Cli::try_parse_from(argv).is_err(), "{extra:?} accepté");
        }
    }

    #[test]
    fn preset_wins_over_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("emoji.toml"), "[render]\nmode = \"emoji\"\n").unwrap();
        let cli = parse(&["--preset", "emoji", "--config", "does/not/exist.toml"]);
        let s = resolve_settings(&cli, dir.path()).unwrap();
        assert_eq!(s.mode, ModeName::Emoji);

        let cli = parse(&["--preset", "nope"]);
        assert!(resolve_settings(&cli, dir.path()).is_err());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let cli = parse(&["--config", missing.to_str().unwrap()]);
        assert_eq!(resolve_settings(&cli, dir.path()).unwrap(), Settings::default());
    }
}
