use anyhow::{bail, Context};
use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use tuner_calibration::CalibrationSession;
use tuner_core::config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
use tuner_detection::mask_file::encode;
use tuner_detection::{compute_range, SampledColor, Tolerance};

#[derive(Parser)]
#[command(name = "hsv-tuner", about = "Pick a colour, tune an HSV range, export the mask")]
struct Cli {
    /// Config file, `config/default.toml` when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the HSV reading of one pixel
    Sample {
        #[arg(short, long)]
        image: PathBuf,
        #[arg(short, long)]
        x: u32,
        #[arg(short, long)]
        y: u32,
    },
    /// Print the encoded range for a colour and tolerance
    Range {
        #[arg(long, value_parser = parse_triple)]
        hsv: [i64; 3],
        #[arg(long, value_parser = parse_triple)]
        tolerance: Option<[i64; 3]>,
    },
    /// Threshold an image and write the mask
    Mask(MaskArgs),
}

#[derive(Args)]
#[command(group(ArgGroup::new("selection").required(true).args(["hsv", "at", "range"])))]
struct MaskArgs {
    #[arg(short, long)]
    image: PathBuf,

    /// Colour to match, typed in
    #[arg(long, value_parser = parse_triple)]
    hsv: Option<[i64; 3]>,

    /// Colour to match, sampled from the image at X,Y
    #[arg(long, value_parser = parse_point)]
    at: Option<(u32, u32)>,

    /// Previously saved range file
    #[arg(long)]
    range: Option<PathBuf>,

    #[arg(long, value_parser = parse_triple, conflicts_with = "range")]
    tolerance: Option<[i64; 3]>,

    /// Mask image, the format follows the extension
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Also persist the range used
    #[arg(long)]
    save_range: Option<PathBuf>,
}

fn parse_triple(s: &str) -> Result<[i64; 3], String> {
    let fields: Vec<&str> = s.split(',').map(str::trim).collect();
    let &[a, b, c] = fields.as_slice() else {
        return Err(format!("expected three comma separated integers, got `{s}`"));
    };
    let parse = |f: &str| f.parse::<i64>().map_err(|e| format!("`{f}`: {e}"));
    Ok([parse(a)?, parse(b)?, parse(c)?])
}

fn parse_point(s: &str) -> Result<(u32, u32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got `{s}`"))?;
    let parse = |f: &str| f.trim().parse::<u32>().map_err(|e| format!("`{f}`: {e}"));
    Ok((parse(x)?, parse(y)?))
}

// A missing default file falls back to built-in defaults, reported once logging is up.
// A path given with --config must load.
fn load_config(path: Option<&Path>) -> anyhow::Result<(Config, Option<ConfigError>)> {
    match (Config::load(path), path) {
        (Ok(config), _) => Ok((config, None)),
        (Err(e), None) => Ok((Config::default(), Some(e))),
        (Err(e), Some(path)) => {
            Err(e).with_context(|| format!("loading config {}", path.display()))
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.system.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn tolerance_or_default(tolerance: Option<[i64; 3]>, config: &Config) -> Tolerance {
    match tolerance {
        Some([h, s, v]) => Tolerance::new(h, s, v),
        None => config.calibration.tolerance(),
    }
}

fn default_mask_path(image: &Path, config: &Config) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    image.with_file_name(format!("{stem}_mask.{}", config.calibration.mask_extension))
}

fn run_mask(args: MaskArgs, config: &Config) -> anyhow::Result<()> {
    let mut session = CalibrationSession::new(tolerance_or_default(args.tolerance, config));
    session
        .load_image(&args.image)
        .with_context(|| format!("loading {}", args.image.display()))?;

    if let Some(path) = &args.range {
        session
            .load_range(path)
            .with_context(|| format!("loading range {}", path.display()))?;
    } else if let Some([h, s, v]) = args.hsv {
        session.set_manual_hsv(h, s, v);
    } else if let Some((x, y)) = args.at {
        if session.pick_color(x, y).is_none() {
            bail!("({x}, {y}) is outside the image");
        }
    } else {
        bail!("one of --hsv, --at or --range is required");
    }

    let out = args
        .out
        .unwrap_or_else(|| default_mask_path(&args.image, config));
    session
        .export_mask(&out)
        .with_context(|| format!("writing mask {}", out.display()))?;

    if let Some(path) = &args.save_range {
        session
            .save_range(path)
            .with_context(|| format!("saving range {}", path.display()))?;
    }

    if let Some(sample) = session.sample() {
        println!("{sample}");
    }
    println!("{}", out.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, fallback) = load_config(cli.config.as_deref())?;
    init_tracing(&config);
    if let Some(e) = fallback {
        tracing::warn!(error = %e, path = DEFAULT_CONFIG_PATH, "Using default configuration");
    }
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Command::Sample { image, x, y } => {
            let mut session = CalibrationSession::new(config.calibration.tolerance());
            session
                .load_image(&image)
                .with_context(|| format!("loading {}", image.display()))?;
            match session.pick_color(x, y) {
                Some(sample) => println!("{sample}"),
                None => bail!("({x}, {y}) is outside the image"),
            }
        }
        Command::Range { hsv, tolerance } => {
            let [h, s, v] = hsv;
            let range = compute_range(
                SampledColor::new(h, s, v),
                tolerance_or_default(tolerance, &config),
            );
            print!("{}", encode(&range));
        }
        Command::Mask(args) => run_mask(args, &config)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("hsv-tuner").chain(args.iter().copied()))
    }

    #[test]
    fn triples_need_three_integers() {
        assert_eq!(parse_triple("100, 150,-3"), Ok([100, 150, -3]));
        assert!(parse_triple("1,2").is_err());
        assert!(parse_triple("1,2,3,4").is_err());
        assert!(parse_triple("1,x,3").is_err());
    }

    #[test]
    fn points_need_two_unsigned_coordinates() {
        assert_eq!(parse_point("4, 7"), Ok((4, 7)));
        assert!(parse_point("4").is_err());
        assert!(parse_point("-1,2").is_err());
    }

    #[test]
    fn default_mask_sits_next_to_the_input() {
        let config = Config::default();
        assert_eq!(
            default_mask_path(Path::new("/tmp/pics/scene.jpg"), &config),
            PathBuf::from("/tmp/pics/scene_mask.png")
        );
    }

    #[test]
    fn tolerance_comes_from_flag_or_config() {
        let config = Config::default();
        assert_eq!(tolerance_or_default(None, &config).as_array(), [50, 40, 30]);
        assert_eq!(
            tolerance_or_default(Some([500, 3, -1]), &config).as_array(),
            [180, 3, 0]
        );
    }

    #[test]
    fn sample_accepts_long_coordinates() {
        let cli = parse(&["sample", "--image", "a.png", "--x", "3", "--y", "4"]).unwrap();
        assert!(matches!(cli.command, Command::Sample { x: 3, y: 4, .. }));
        assert!(parse(&["sample", "-i", "a.png", "-x", "3", "-y", "4"]).is_ok());
    }

    #[test]
    fn mask_needs_exactly_one_colour_source() {
        assert!(parse(&["mask", "-i", "a.png"]).is_err());
        assert!(parse(&["mask", "-i", "a.png", "--hsv", "1,2,3", "--at", "0,0"]).is_err());
        assert!(parse(&["mask", "-i", "a.png", "--at", "0,0", "--range", "r.txt"]).is_err());
        assert!(parse(&["mask", "-i", "a.png", "--range", "r.txt", "--tolerance", "1,1,1"]).is_err());
        assert!(parse(&["mask", "-i", "a.png", "--at", "0,0", "--tolerance", "1,1,1"]).is_ok());
        assert!(parse(&["mask", "-i", "a.png", "--range", "r.txt"]).is_ok());
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn mask_command_writes_mask_and_range() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("scene.png");
        let range_path = dir.path().join("range.txt");
        image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 0, 255])
            .unwrap()
            .save(&image_path)
            .unwrap();

        let image_arg = image_path.to_string_lossy().into_owned();
        let range_arg = range_path.to_string_lossy().into_owned();
        let cli = parse(&[
            "mask", "-i", image_arg.as_str(), "--at", "0,0", "--tolerance", "10,10,10", "--save-range", range_arg.as_str(),
        ])
        .unwrap();
        let Command::Mask(args) = cli.command else {
            panic!("expected mask subcommand");
        };
        run_mask(args, &Config::default()).unwrap();

        let mask = image::open(dir.path().join("scene_mask.png")).unwrap().into_luma8();
        assert_eq!(mask.into_raw(), vec![255, 0]);
        assert_eq!(fs::read_to_string(&range_path).unwrap(), "0,245,245\n10,255,255\n");
    }
}
