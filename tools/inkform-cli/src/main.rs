//! inkform - body proportion and tattoo pipeline
//!
//! Reads an inkform.toml scene, reshapes the body model with the proportion
//! knobs and composites the tattoo decals into its skin texture.

use anyhow::Result;
use clap::{Parser, Subcommand};
use inkform_engine::body::classify;
use inkform_engine::estimate::{Estimate, estimate};
use std::path::PathBuf;

mod pipeline;
mod scene;

use scene::{SceneManifest, manifest_dir};

#[derive(Parser)]
#[command(name = "inkform")]
#[command(about = "Body proportion and tattoo compositing tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the deformed mesh and tattooed texture from a scene manifest
    Build {
        /// Path to inkform.toml manifest
        #[arg(default_value = "inkform.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest and referenced files without building
    Check {
        /// Path to inkform.toml manifest
        #[arg(default_value = "inkform.toml")]
        manifest: PathBuf,
    },

    /// Print parts, counts and body landmarks of an OBJ model
    Inspect {
        /// Input OBJ file
        model: PathBuf,

        /// Keep Z-up models as authored
        #[arg(long)]
        no_z_up_correction: bool,
    },

    /// Price the scene's decals for a client of the given height
    Estimate {
        /// Path to inkform.toml manifest
        #[arg(default_value = "inkform.toml")]
        manifest: PathBuf,

        /// Client height in inches (overrides output.client_height)
        #[arg(long)]
        height: Option<f64>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building scene from {:?}", manifest);
            }
            let config = SceneManifest::load(&manifest)?;
            let built = pipeline::build_scene(&config, &manifest_dir(&manifest), output.as_deref())?;
            if verbose {
                tracing::info!("Mesh: {}", built.mesh_path.display());
                tracing::info!("Texture: {}", built.texture_path.display());
            }
            if let Some(est) = &built.estimate {
                print_estimate(est);
            }
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = SceneManifest::load(&manifest)?;
            config.validate()?;
            let missing: Vec<_> = config
                .referenced_files(&manifest_dir(&manifest))
                .into_iter()
                .filter(|p| !p.exists())
                .collect();
            if !missing.is_empty() {
                for path in &missing {
                    tracing::error!("Missing file: {}", path.display());
                }
                anyhow::bail!("{} referenced file(s) not found", missing.len());
            }
            tracing::info!("Manifest is valid!");
        }

        Commands::Inspect {
            model,
            no_z_up_correction,
        } => {
            let loaded = pipeline::load_model(&model, !no_z_up_correction)?;
            println!("{}", model.display());
            println!(
                "  {} parts, {} vertices, {} triangles, uvs: {}",
                loaded.parts.len(),
                loaded.vertex_count(),
                loaded.triangle_count(),
                if loaded.has_uvs() { "yes" } else { "no" }
            );
            for part in &loaded.parts {
                println!(
                    "  - {}: {} vertices, {} triangles",
                    part.name,
                    part.vertex_count(),
                    part.triangle_count()
                );
            }
            let [r, g, b, _] = loaded.material.diffuse_color;
            println!(
                "  material: #{:02x}{:02x}{:02x}, map: {}",
                r,
                g,
                b,
                match &loaded.material.diffuse_map {
                    Some(tex) => format!("{}x{}", tex.width, tex.height),
                    None => "none".to_string(),
                }
            );

            let lm = classify(&loaded.all_positions());
            println!(
                "  landmarks: head {:.3}, shoulder {:.3}, torso {:.3}, hip {:.3}, knee {:.3}",
                lm.head_threshold, lm.shoulder_level, lm.torso_bottom, lm.hip_level, lm.knee_level
            );
            println!(
                "  height {:.3}, width {:.3}, arm threshold {:.3}, head: {}",
                lm.height(),
                lm.width(),
                lm.arm_threshold,
                if lm.has_head { "yes" } else { "no" }
            );
        }

        Commands::Estimate { manifest, height } => {
            let config = SceneManifest::load(&manifest)?;
            config.validate()?;
            let height = height
                .or(config.output.client_height)
                .ok_or_else(|| anyhow::anyhow!("No client height: pass --height or set output.client_height"))?;
            let decals = pipeline::load_decals(&config, &manifest_dir(&manifest))?;
            match estimate(&decals, height) {
                Some(est) => print_estimate(&est),
                None => anyhow::bail!("Invalid client height {} (must be positive inches)", height),
            }
        }
    }

    Ok(())
}

fn print_estimate(est: &Estimate) {
    for (i, row) in est.rows.iter().enumerate() {
        println!(
            "decal {}: {:.1} x {:.1} in  ${:.2}",
            i + 1,
            row.width_inches,
            row.height_inches,
            row.price
        );
    }
    println!("total: ${:.2}", est.total);
}
