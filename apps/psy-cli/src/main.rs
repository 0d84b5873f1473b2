use clap::{ArgGroup, Args, Parser, Subcommand};
use psy_air::{
    MoistAirState, PsyError, Resolver, ResolverConfig, Secondary, SweepDefinition,
    estimate_dew_point_from_wet_bulb, estimate_wet_bulb_from_dew_point,
    standard_atmosphere_pressure, standard_atmosphere_temperature, sweep_dry_bulb,
};
use psy_core::{Quantity, UnitError, parse_quantity};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Psy(#[from] PsyError),

    #[error("--{arg}: {source}")]
    Input {
        arg: &'static str,
        #[source]
        source: UnitError,
    },

    #[error("{command} requires one of {options}")]
    MissingSecondary {
        command: &'static str,
        options: &'static str,
    },

    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid resolver config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "psy-cli")]
#[command(about = "Psychroflow CLI - moist-air state calculator", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a full moist-air state (saturated when no secondary is given)
    Resolve {
        /// Dry-bulb temperature (e.g. 25, 77F, 298.15K)
        #[arg(long, allow_hyphen_values = true)]
        dry_bulb: String,
        #[command(flatten)]
        site: SiteArgs,
        #[command(flatten)]
        secondary: SecondaryArgs,
        /// YAML file with resolver tolerances
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Standard-atmosphere pressure and temperature at an altitude
    Atmosphere {
        /// Altitude (e.g. 1500, 5000ft)
        #[arg(long, allow_hyphen_values = true)]
        altitude: String,
    },
    /// Quick one-third-rule estimate of wet-bulb or dew point
    Estimate {
        /// Dry-bulb temperature
        #[arg(long, allow_hyphen_values = true)]
        dry_bulb: String,
        /// Wet-bulb temperature (estimates the dew point)
        #[arg(long, allow_hyphen_values = true, conflicts_with = "dew_point")]
        wet_bulb: Option<String>,
        /// Dew-point temperature (estimates the wet-bulb)
        #[arg(long, allow_hyphen_values = true)]
        dew_point: Option<String>,
    },
    /// Resolve states along a range of dry-bulb temperatures
    Sweep {
        /// First dry-bulb temperature
        #[arg(long, allow_hyphen_values = true)]
        from: String,
        /// Last dry-bulb temperature
        #[arg(long, allow_hyphen_values = true)]
        to: String,
        /// Number of points, endpoints included
        #[arg(long, default_value_t = 11)]
        points: usize,
        #[command(flatten)]
        site: SiteArgs,
        #[command(flatten)]
        secondary: SecondaryArgs,
        /// YAML file with resolver tolerances
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the sweep as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct SiteArgs {
    /// Total pressure (e.g. 101.325, 14.7psia); defaults to sea level
    #[arg(long, conflicts_with = "altitude")]
    pressure: Option<String>,
    /// Altitude for the standard-atmosphere pressure
    #[arg(long, allow_hyphen_values = true)]
    altitude: Option<String>,
}

#[derive(Args)]
#[command(group(ArgGroup::new("secondary").args(["wet_bulb", "dew_point", "rh"])))]
struct SecondaryArgs {
    /// Wet-bulb temperature
    #[arg(long, allow_hyphen_values = true)]
    wet_bulb: Option<String>,
    /// Dew-point temperature
    #[arg(long, allow_hyphen_values = true)]
    dew_point: Option<String>,
    /// Relative humidity (0-1 or percent, e.g. 0.5 or 50%)
    #[arg(long)]
    rh: Option<String>,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            dry_bulb,
            site,
            secondary,
            config,
            json,
        } => cmd_resolve(&dry_bulb, &site, &secondary, config.as_deref(), json),
        Commands::Atmosphere { altitude } => cmd_atmosphere(&altitude),
        Commands::Estimate {
            dry_bulb,
            wet_bulb,
            dew_point,
        } => cmd_estimate(&dry_bulb, wet_bulb.as_deref(), dew_point.as_deref()),
        Commands::Sweep {
            from,
            to,
            points,
            site,
            secondary,
            config,
            json,
        } => cmd_sweep(&from, &to, points, &site, &secondary, config.as_deref(), json),
    }
}

fn cmd_resolve(
    dry_bulb: &str,
    site: &SiteArgs,
    secondary: &SecondaryArgs,
    config: Option<&Path>,
    json: bool,
) -> CliResult<()> {
    let resolver = load_resolver(config)?;
    let t_db_c = parse_arg("dry-bulb", dry_bulb, Quantity::Temperature)?;
    let p_kpa = site.pressure_kpa()?;
    let state = resolver.resolve(p_kpa, t_db_c, secondary.parse()?)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_state(&state);
    }
    Ok(())
}

fn cmd_atmosphere(altitude: &str) -> CliResult<()> {
    let z_m = parse_arg("altitude", altitude, Quantity::Altitude)?;
    let p_kpa = standard_atmosphere_pressure(z_m)?;
    let t_c = standard_atmosphere_temperature(z_m)?;
    println!("Standard atmosphere at {:.1} m:", z_m);
    println!("  Pressure:    {:.3} kPa", p_kpa);
    println!("  Temperature: {:.2} °C", t_c);
    Ok(())
}

fn cmd_estimate(dry_bulb: &str, wet_bulb: Option<&str>, dew_point: Option<&str>) -> CliResult<()> {
    let t_db_c = parse_arg("dry-bulb", dry_bulb, Quantity::Temperature)?;
    match (wet_bulb, dew_point) {
        (Some(wb), _) => {
            let t_wb_c = parse_arg("wet-bulb", wb, Quantity::Temperature)?;
            let t_dp_c = estimate_dew_point_from_wet_bulb(t_db_c, t_wb_c);
            println!("Estimated dew point: {:.2} °C", t_dp_c);
        }
        (None, Some(dp)) => {
            let t_dp_c = parse_arg("dew-point", dp, Quantity::Temperature)?;
            let t_wb_c = estimate_wet_bulb_from_dew_point(t_db_c, t_dp_c);
            println!("Estimated wet-bulb: {:.2} °C", t_wb_c);
        }
        (None, None) => {
            return Err(CliError::MissingSecondary {
                command: "estimate",
                options: "--wet-bulb, --dew-point",
            });
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct SweepRow<'a> {
    dry_bulb_c: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a MoistAirState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn cmd_sweep(
    from: &str,
    to: &str,
    points: usize,
    site: &SiteArgs,
    secondary: &SecondaryArgs,
    config: Option<&Path>,
    json: bool,
) -> CliResult<()> {
    let resolver = load_resolver(config)?;
    let start_c = parse_arg("from", from, Quantity::Temperature)?;
    let end_c = parse_arg("to", to, Quantity::Temperature)?;
    let p_kpa = site.pressure_kpa()?;
    let secondary = secondary
        .parse()?
        .ok_or(CliError::MissingSecondary {
            command: "sweep",
            options: "--wet-bulb, --dew-point, --rh",
        })?;

    let sweep = SweepDefinition::new(start_c, end_c, points)?;
    let result = sweep_dry_bulb(&resolver, p_kpa, &sweep, secondary);

    if json {
        let rows: Vec<SweepRow<'_>> = result
            .dry_bulb_c
            .iter()
            .zip(&result.states)
            .map(|(&t, s)| SweepRow {
                dry_bulb_c: t,
                state: s.as_ref().ok(),
                error: s.as_ref().err().map(ToString::to_string),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "Sweep {} at {:.3} kPa, {} = {}",
        sweep,
        p_kpa,
        secondary.label(),
        secondary.value()
    );
    println!(
        "  {:>8} {:>8} {:>8} {:>7} {:>9} {:>8}",
        "Tdb °C", "Twb °C", "Tdp °C", "φ", "W", "h kJ/kg"
    );
    for (t, state) in result.dry_bulb_c.iter().zip(&result.states) {
        match state {
            Ok(s) => println!(
                "  {:>8.2} {:>8.2} {:>8.2} {:>7.3} {:>9.6} {:>8.2}",
                t,
                s.wet_bulb_c(),
                s.dew_point_c(),
                s.relative_humidity(),
                s.humidity_ratio(),
                s.specific_enthalpy_kj_per_kg()
            ),
            Err(e) => println!("  {:>8.2} ✗ {}", t, e),
        }
    }
    println!(
        "✓ {} resolved, {} failed",
        result.num_successful, result.num_failed
    );
    Ok(())
}

impl SiteArgs {
    fn pressure_kpa(&self) -> CliResult<f64> {
        match (&self.pressure, &self.altitude) {
            (Some(p), _) => parse_arg("pressure", p, Quantity::Pressure),
            (None, Some(z)) => {
                let z_m = parse_arg("altitude", z, Quantity::Altitude)?;
                Ok(standard_atmosphere_pressure(z_m)?)
            }
            (None, None) => Ok(psy_core::units::constants::P_STD_KPA),
        }
    }
}

impl SecondaryArgs {
    fn parse(&self) -> CliResult<Option<Secondary>> {
        if let Some(wb) = &self.wet_bulb {
            let t = parse_arg("wet-bulb", wb, Quantity::Temperature)?;
            return Ok(Some(Secondary::WetBulb(t)));
        }
        if let Some(dp) = &self.dew_point {
            let t = parse_arg("dew-point", dp, Quantity::Temperature)?;
            return Ok(Some(Secondary::DewPoint(t)));
        }
        if let Some(rh) = &self.rh {
            let phi = parse_arg("rh", rh, Quantity::Fraction)?;
            return Ok(Some(Secondary::RelativeHumidity(phi)));
        }
        Ok(None)
    }
}

fn parse_arg(arg: &'static str, raw: &str, quantity: Quantity) -> CliResult<f64> {
    parse_quantity(raw, quantity).map_err(|source| CliError::Input { arg, source })
}

fn load_resolver(config: Option<&Path>) -> CliResult<Resolver> {
    let config = match config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_yaml::from_str::<ResolverConfig>(&text)?
        }
        None => ResolverConfig::default(),
    };
    tracing::debug!(?config, "resolver config");
    Ok(Resolver::new(config)?)
}

fn print_state(s: &MoistAirState) {
    println!("Moist-air state at {:.3} kPa:", s.pressure_kpa());
    println!("  Dry-bulb:              {:>10.3} °C", s.dry_bulb_c());
    println!("  Wet-bulb:              {:>10.3} °C", s.wet_bulb_c());
    println!("  Dew point:             {:>10.3} °C", s.dew_point_c());
    println!("  Relative humidity:     {:>10.4}", s.relative_humidity());
    println!("  Humidity ratio:        {:>10.6} kg/kg", s.humidity_ratio());
    println!("  Degree of saturation:  {:>10.4}", s.degree_of_saturation());
    println!("  Vapor pressure:        {:>10.4} kPa", s.vapor_pressure_kpa());
    println!(
        "  Saturation pressure:   {:>10.4} kPa",
        s.saturation_vapor_pressure_kpa()
    );
    println!(
        "  Specific volume:       {:>10.4} m³/kg",
        s.specific_volume_m3_per_kg()
    );
    println!(
        "  Specific enthalpy:     {:>10.2} kJ/kg",
        s.specific_enthalpy_kj_per_kg()
    );
}
