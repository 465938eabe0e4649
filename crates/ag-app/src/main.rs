use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ag_core::Settings;
use ag_export::{Metadata, Project};
use ag_source::MattingCommand;
use anyhow::{Context, Result};
use clap::Parser;

pub mod cli;
pub mod pipeline;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger les settings persistés (défauts écrits au premier lancement)
    let settings = Settings::load(&cli.config)?;

    // 4. Valider toutes les entrées avant de décoder le moindre pixel
    let options = cli.to_options(&settings)?;
    let format = cli.export_format()?;
    ag_source::probe_image(&cli.input, &settings.limits)?;

    // 5. Ouvrir la source (fixe ou animée)
    let matting = MattingCommand::default();
    let mut sequence = pipeline::RenderSequence::open(&cli.input, &options, &matting)?;
    cli.check_project_target(sequence.is_animated())?;

    // 6. Rendu
    if sequence.is_animated() {
        match cli.output.as_deref() {
            // 6a. GIF + sortie : une frame numérotée par fichier
            Some(output) => {
                let dest = resolve_output(output, &settings);
                let stem = dest
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("frame")
                    .to_string();
                let mut written = 0usize;
                for (index, frame) in sequence.enumerate() {
                    let art = frame?;
                    let frame_path = dest.with_file_name(format!("{stem}_{index:04}"));
                    ag_export::export(&art, &frame_path, format)?;
                    written += 1;
                }
                log::info!("{written} frames exportées");
            }
            // 6b. GIF sans sortie : playback terminal à délai fixe
            None => play(sequence, cli.fps)?,
        }
    } else {
        let art = sequence
            .next()
            .context("Source sans aucune frame")?
            .context("Échec du rendu")?;

        match cli.output.as_deref() {
            Some(output) => {
                let dest = resolve_output(output, &settings);
                let written = ag_export::export(&art, &dest, format)?;
                if settings.output.include_metadata {
                    let meta = Metadata::new(cli.input.display().to_string(), &options);
                    meta.save(&Metadata::sidecar_path(&written))?;
                }
            }
            None => println!("{art}"),
        }

        if let Some(ref project_path) = cli.project {
            Project::new(cli.input.display().to_string(), &options, &art).save(project_path)?;
        }
    }

    log::info!("Traitement terminé");
    Ok(())
}

/// Chemins relatifs : résolus dans le répertoire de sortie configuré.
fn resolve_output(output: &Path, settings: &Settings) -> PathBuf {
    if output.is_absolute() {
        output.to_path_buf()
    } else {
        settings.output.output_dir.join(output)
    }
}

/// Rejoue les frames à délai fixe. Le pacing vit ici, côté consommateur :
/// le pipeline ne connaît rien au temps.
fn play(sequence: pipeline::RenderSequence<'_>, fps: u32) -> Result<()> {
    let delay = Duration::from_millis(1000 / u64::from(fps.clamp(1, 60)));
    let mut stdout = std::io::stdout().lock();
    for frame in sequence {
        let art = frame?;
        // Clear + home avant chaque frame
        write!(stdout, "\x1b[2J\x1b[H{art}").context("Écriture terminal")?;
        stdout.flush().context("Flush terminal")?;
        std::thread::sleep(delay);
    }
    Ok(())
}
