use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueHint};

use melee_trail::atlas::SpriteSheet;
use melee_trail::logging::{LoggingConfig, init_logging};
use melee_trail::{Direction, MeleeWeaponTrail, Sprite, Texture, TrailConfig, TrailError, TrailSprite};

#[derive(Parser)]
#[command(author, version, about = "Bake melee weapon trail sprites from weapon PNGs")]
struct Cli {
    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the trail for one weapon sprite
    Build(BuildArgs),
    /// Build trails for every PNG under a directory
    Batch(BatchArgs),
}

/// Overrides applied on top of the JSON config.
#[derive(Args)]
struct TrailArgs {
    /// Trail config JSON; unset fields use defaults
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Side the trail streams toward: left, right, up or down
    #[arg(long)]
    direction: Option<Direction>,

    /// Maximum trail length in pixels (0..1000)
    #[arg(long)]
    length: Option<f32>,

    /// Bend in degrees per pixel step (0..1)
    #[arg(long)]
    bend: Option<f32>,

    /// Fill one-pixel holes left by bending
    #[arg(long)]
    remove_gaps: bool,
}

#[derive(Args)]
struct BuildArgs {
    /// Weapon PNG, or the sheet texture when --sheet is given
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output PNG; a .json sidecar with pivot data is written next to it
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    out: PathBuf,

    /// Sprite-sheet frame description JSON
    #[arg(long, value_hint = ValueHint::FilePath, requires = "frame")]
    sheet: Option<PathBuf>,

    /// Frame name inside --sheet
    #[arg(long, requires = "sheet")]
    frame: Option<String>,

    #[command(flatten)]
    trail: TrailArgs,
}

#[derive(Args)]
struct BatchArgs {
    /// Directory searched recursively for .png files
    #[arg(value_hint = ValueHint::DirPath)]
    dir: PathBuf,

    /// Directory receiving <stem>_trail.png and <stem>_trail.json, mirroring
    /// the input's subfolders
    #[arg(long, value_hint = ValueHint::DirPath)]
    out_dir: PathBuf,

    #[command(flatten)]
    trail: TrailArgs,
}

impl TrailArgs {
    fn resolve(&self) -> Result<TrailConfig, TrailError> {
        let mut cfg = match &self.config {
            Some(path) => TrailConfig::load(path)?,
            None => TrailConfig::default(),
        };
        if let Some(d) = self.direction {
            cfg.direction = d;
        }
        if let Some(l) = self.length {
            cfg.length = l;
        }
        if let Some(b) = self.bend {
            cfg.bend = b;
        }
        cfg.remove_gaps |= self.remove_gaps;
        Ok(cfg)
    }
}

fn write_trail(trail: &TrailSprite, png: &Path) -> Result<(), TrailError> {
    if let Some(parent) = png.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    trail.pixels.save_png(png)?;
    let meta = serde_json::to_string_pretty(&trail.meta())?;
    fs::write(png.with_extension("json"), meta)?;
    Ok(())
}

fn run_build(args: &BuildArgs) -> Result<(), TrailError> {
    let trail = MeleeWeaponTrail::new(args.trail.resolve()?);
    let texture = Texture::load_png(&args.input)?;

    let sprite = match (&args.sheet, &args.frame) {
        (Some(sheet), Some(frame)) => {
            let json = fs::read_to_string(sheet)?;
            SpriteSheet::from_json(&json, texture)?.sprite(frame)?
        }
        _ => Sprite::from_texture(texture.into()),
    };

    match trail.build(Some(&sprite))? {
        Some(out) => {
            write_trail(&out, &args.out)?;
            log::info!(
                "wrote {} ({}x{}, pivot {:.3},{:.3})",
                args.out.display(),
                out.pixels.width(),
                out.pixels.height(),
                out.pivot.x,
                out.pivot.y
            );
        }
        None => log::info!("trail disabled; nothing written"),
    }
    Ok(())
}

/// Where `batch` writes the trail for `input`: its path relative to `root`,
/// mirrored under `out_dir`, with `_trail` appended to the stem.
fn output_path(root: &Path, out_dir: &Path, input: &Path) -> Option<PathBuf> {
    let rel = input.strip_prefix(root).ok()?;
    let stem = rel.file_stem()?.to_str()?;
    Some(out_dir.join(rel).with_file_name(format!("{stem}_trail.png")))
}

/// Every `.png` under `root`, skipping the `out_root` subtree.
///
/// The walk finishes before anything is written, so trails produced by this
/// run are never picked up as inputs. Walk errors are logged and counted.
fn collect_inputs(root: &Path, out_root: &Path) -> (Vec<PathBuf>, usize) {
    let mut inputs = Vec::new();
    let mut errors = 0usize;

    let walker = walkdir::WalkDir::new(root).into_iter().filter_entry(|e| {
        e.depth() == 0
            || !e.file_type().is_dir()
            || fs::canonicalize(e.path()).map_or(true, |p| p != out_root)
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry: {e}");
                errors += 1;
                continue;
            }
        };
        let path = entry.path();
        let is_png = path.extension().and_then(|s| s.to_str()) == Some("png");
        if entry.file_type().is_file() && is_png {
            inputs.push(path.to_path_buf());
        }
    }
    inputs.sort();
    (inputs, errors)
}

fn run_batch(args: &BatchArgs) -> Result<(), TrailError> {
    let trail = MeleeWeaponTrail::new(args.trail.resolve()?);
    fs::create_dir_all(&args.out_dir)?;
    let out_root = fs::canonicalize(&args.out_dir)?;

    let (inputs, mut failed) = collect_inputs(&args.dir, &out_root);
    let mut built = 0usize;

    for path in &inputs {
        let Some(out) = output_path(&args.dir, &args.out_dir, path) else {
            log::warn!("{}: no usable file name", path.display());
            failed += 1;
            continue;
        };
        let result = Texture::load_png(path)
            .and_then(|tex| trail.build(Some(&Sprite::from_texture(tex.into()))))
            .and_then(|t| t.map_or(Ok(()), |t| write_trail(&t, &out)));

        match result {
            Ok(()) => {
                log::info!("{} -> {}", path.display(), out.display());
                built += 1;
            }
            Err(e) => {
                log::error!("{}: {e}", path.display());
                failed += 1;
            }
        }
    }

    log::info!("batch done: {built} built, {failed} failed");
    Ok(())
}

fn main() -> Result<(), TrailError> {
    let cli = Cli::parse();
    init_logging(LoggingConfig { env_filter: cli.log.clone(), ..LoggingConfig::default() });

    match &cli.command {
        Command::Build(args) => run_build(args),
        Command::Batch(args) => run_batch(args),
    }
}
