use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use dzt_core::{GenerateOptions, GenerateStats, TypeOverrides};
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "dzt",
    about = "Generate DayZ types.xml / spawnabletypes.xml from mod configs",
    version
)]
struct Cli {
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Check a mission folder for economy files
    Scan(ScanArgs),
    /// Unpack a .pbo with an external extractor
    Extract(ExtractArgs),
    /// Generate (or merge into) types.xml from a mod's CfgVehicles
    Types(TypesArgs),
    /// Generate a spawnabletypes.xml skeleton from a mod's CfgVehicles
    Spawnabletypes(SpawnableArgs),
    /// Generate spawnabletypes.xml from a JSON vehicle spec
    SpawnabletypesFromJson(FromJsonArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Format {
    #[default]
    Text,
    Json,
}

#[derive(ClapArgs, Debug)]
struct ScanArgs {
    mission: PathBuf,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(ClapArgs, Debug)]
struct ExtractArgs {
    pbo: PathBuf,
    /// Output directory
    #[arg(long)]
    to: PathBuf,
    /// Extractor binary (defaults to $DZT_PBO_EXTRACTOR)
    #[arg(long)]
    extractor: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(ClapArgs, Debug)]
struct OutputArgs {
    /// Output path
    #[arg(long)]
    out: Option<PathBuf>,
    /// Replace the output file if it exists
    #[arg(long, default_value_t = false)]
    overwrite: bool,
    /// Zip the existing output before replacing it
    #[arg(long, default_value_t = false)]
    backup: bool,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(ClapArgs, Debug)]
struct TypesArgs {
    /// Mod folder (holding config.cpp) or config file
    mod_path: PathBuf,
    #[command(flatten)]
    output: OutputArgs,
    /// Scope to include; anything non-numeric (e.g. `all`) disables the filter
    #[arg(long, default_value = "2")]
    scope: String,
    /// Comma-separated category names applied to all types
    #[arg(long)]
    category: Option<String>,
    /// Comma-separated usage names applied to all types
    #[arg(long)]
    usage: Option<String>,
    /// Existing types.xml to merge into
    #[arg(long, value_name = "TYPES_XML")]
    base: Option<PathBuf>,
    #[arg(long, allow_hyphen_values = true)]
    nominal: Option<i64>,
    #[arg(long, allow_hyphen_values = true)]
    min: Option<i64>,
    #[arg(long, allow_hyphen_values = true)]
    lifetime: Option<i64>,
    #[arg(long, allow_hyphen_values = true)]
    restock: Option<i64>,
    #[arg(long, allow_hyphen_values = true)]
    quantmin: Option<i64>,
    #[arg(long, allow_hyphen_values = true)]
    quantmax: Option<i64>,
    #[arg(long, allow_hyphen_values = true)]
    cost: Option<i64>,
}

#[derive(ClapArgs, Debug)]
struct SpawnableArgs {
    mod_path: PathBuf,
    #[command(flatten)]
    output: OutputArgs,
    /// Include every class, not just ones with a vehicle-like base
    #[arg(long, default_value_t = false)]
    all_classes: bool,
}

#[derive(ClapArgs, Debug)]
struct FromJsonArgs {
    /// JSON vehicle spec
    json: PathBuf,
    #[command(flatten)]
    output: OutputArgs,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);
    match cli.cmd {
        Cmd::Scan(a) => cmd_scan(a),
        Cmd::Extract(a) => cmd_extract(a),
        Cmd::Types(a) => cmd_types(a),
        Cmd::Spawnabletypes(a) => cmd_spawnable(a),
        Cmd::SpawnabletypesFromJson(a) => cmd_from_json(a),
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(format: Format, code: i32, msg: &str) -> ! {
    match format {
        Format::Json => println!("{}", json!({ "ok": false, "error": msg })),
        Format::Text => eprintln!("error: {}", msg),
    }
    std::process::exit(code);
}

fn print_json(v: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(v).unwrap_or_default());
}

fn cmd_scan(args: ScanArgs) {
    let scan = dzt_core::mission::scan_mission_folder(&args.mission);
    if args.format == Format::Json {
        print_json(&serde_json::to_value(&scan).unwrap_or_default());
        return;
    }
    if !scan.exists {
        fail(args.format, 1, "mission folder not found");
    }
    if !scan.is_directory {
        fail(args.format, 1, "mission path is not a directory");
    }
    let found = |n: &str| {
        if scan.files.get(n).copied().unwrap_or(false) {
            "found"
        } else {
            "missing"
        }
    };
    println!("Mission folder: {}", scan.mission_folder.display());
    println!("Map empty folder: {}", if scan.is_map_empty { "yes" } else { "no" });
    println!("types.xml: {}", found("types.xml"));
    println!("spawnabletypes.xml: {}", found("spawnabletypes.xml"));
}

fn cmd_extract(args: ExtractArgs) {
    let outcome = dzt_core::extract::extract_pbo(&args.pbo, &args.to, args.extractor.as_deref());
    if args.format == Format::Json {
        print_json(&serde_json::to_value(&outcome).unwrap_or_default());
        if !outcome.ok {
            std::process::exit(1);
        }
        return;
    }
    print!("{}", outcome.stdout);
    eprint!("{}", outcome.stderr);
    if !outcome.ok {
        let msg = outcome.error.as_deref().unwrap_or("extraction failed");
        fail(args.format, outcome.exit_code.unwrap_or(1).max(1), msg);
    }
    println!("Extraction completed.");
}

fn parse_list(v: Option<&str>) -> Vec<String> {
    v.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

// Overwrite policy lives here, not in the core.
fn prepare_output(out: &OutputArgs, default_name: &str) -> PathBuf {
    let path = out.out.clone().unwrap_or_else(|| PathBuf::from(default_name));
    if path.exists() {
        if !out.overwrite {
            let msg = format!("{} already exists. Use --overwrite to replace.", path.display());
            fail(out.format, 2, &msg);
        }
        if out.backup {
            dzt_core::backup::zip_backup(&path).unwrap_or_else(|e| {
                fail(out.format, 5, &format!("backup failed: {}", e));
            });
        }
    }
    path
}

fn write_output(out: &OutputArgs, path: &Path, document: &str) {
    std::fs::write(path, document).unwrap_or_else(|e| {
        fail(out.format, 5, &format!("error writing {}: {}", path.display(), e));
    });
}

fn load_error(format: Format, mod_path: &Path, e: dzt_core::Error) -> ! {
    if let dzt_core::Error::ConfigNotFound(_) = e
        && mod_path.is_dir()
    {
        for nested in dzt_core::find_config_files(mod_path) {
            tracing::info!("found nested config: {}", nested.display());
        }
    }
    fail(format, 2, &e.to_string())
}

fn report(out: &OutputArgs, path: &Path, stats: GenerateStats, what: &str) {
    if out.format == Format::Json {
        print_json(&json!({
            "outputPath": path,
            "totalClasses": stats.total_classes,
            "included": stats.included,
            "added": stats.added,
        }));
    } else {
        println!("Wrote {} {} to {}", stats.included, what, path.display());
    }
}

fn cmd_types(args: TypesArgs) {
    let fmt = args.output.format;
    let opts = GenerateOptions {
        scope: args.scope.trim().parse().ok(),
        overrides: TypeOverrides {
            nominal: args.nominal,
            min: args.min,
            lifetime: args.lifetime,
            restock: args.restock,
            quantmin: args.quantmin,
            quantmax: args.quantmax,
            cost: args.cost,
            flags: None,
            categories: parse_list(args.category.as_deref()),
            usages: parse_list(args.usage.as_deref()),
        },
    };
    let base = args.base.as_ref().map(|p| {
        dzt_core::includes::read_text(p).unwrap_or_else(|e| {
            fail(fmt, 3, &format!("error reading {}: {}", p.display(), e));
        })
    });
    let generated = dzt_core::generate_types(&args.mod_path, &opts, base.as_deref())
        .unwrap_or_else(|e| load_error(fmt, &args.mod_path, e));
    let path = prepare_output(&args.output, "types.xml");
    write_output(&args.output, &path, &generated.document);
    if base.is_some() && fmt == Format::Text {
        println!("Merged {} new type(s)", generated.stats.added);
    }
    report(&args.output, &path, generated.stats, "types");
}

fn cmd_spawnable(args: SpawnableArgs) {
    let fmt = args.output.format;
    let generated = dzt_core::generate_spawnable_types(&args.mod_path, !args.all_classes)
        .unwrap_or_else(|e| load_error(fmt, &args.mod_path, e));
    let path = prepare_output(&args.output, "spawnabletypes_output.xml");
    write_output(&args.output, &path, &generated.document);
    report(&args.output, &path, generated.stats, "spawnable types");
}

fn cmd_from_json(args: FromJsonArgs) {
    let fmt = args.output.format;
    let raw = std::fs::read_to_string(&args.json).unwrap_or_else(|e| {
        fail(fmt, 3, &format!("failed to read JSON: {}", e));
    });
    let spec = dzt_core::vehicle_spec::parse_spec_str(&raw)
        .unwrap_or_else(|e| fail(fmt, 4, &e.to_string()));
    let path = prepare_output(&args.output, "spawnabletypes_output.xml");
    write_output(&args.output, &path, &dzt_core::vehicle_spec::emit(&spec));
    if fmt == Format::Json {
        print_json(&json!({ "outputPath": path, "vehicles": spec.vehicles.len() }));
    } else {
        println!(
            "Wrote spawnabletypes for {} vehicle(s) to {}",
            spec.vehicles.len(),
            path.display()
        );
    }
}
