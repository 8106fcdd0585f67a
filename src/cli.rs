use std::env;
use std::path::PathBuf;

pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed_override: Option<u64>,
    pub weeks_override: Option<usize>,
    pub load_out: Option<PathBuf>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut seed_override = None;
    let mut weeks_override = None;
    let mut load_out = None;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.get(i).ok_or_else(|| {
                    "missing value for --scenario (expected a TOML file path)".to_string()
                })?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.get(i).ok_or_else(|| {
                    "missing value for --preset (expected a preset name)".to_string()
                })?;
                if preset.replace(name.clone()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| "missing value for --seed (expected a u64)".to_string())?;
                let parsed: u64 = value
                    .parse()
                    .map_err(|_| format!("--seed value \"{value}\" is not a valid u64"))?;
                if seed_override.replace(parsed).is_some() {
                    return Err("--seed provided more than once".to_string());
                }
            }
            "--weeks" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| "missing value for --weeks (expected a count)".to_string())?;
                let parsed: usize = value
                    .parse()
                    .map_err(|_| format!("--weeks value \"{value}\" is not a valid count"))?;
                if weeks_override.replace(parsed).is_some() {
                    return Err("--weeks provided more than once".to_string());
                }
            }
            "--out" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| "missing value for --out (expected a file path)".to_string())?;
                if load_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--out provided more than once".to_string());
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    Ok(CliOptions {
        scenario,
        preset,
        seed_override,
        weeks_override,
        load_out,
    })
}

pub fn print_usage() {
    eprintln!("appliance-sim — household appliance load synthesis");
    eprintln!();
    eprintln!("Usage: appliance-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Load scenario from TOML config file");
    eprintln!("  --preset <name>     Use a built-in preset (baseline)");
    eprintln!("  --seed <u64>        Override random seed");
    eprintln!("  --weeks <n>         Override number of simulated weeks");
    eprintln!("  --out <path>        Export weekly load grids to CSV");
    eprintln!("  --help              Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}
