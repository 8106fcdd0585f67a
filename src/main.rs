//! Simulator entry point — CLI wiring and config-driven household runs.

use std::path::Path;
use std::process;

use rand::{SeedableRng, rngs::StdRng};

use appliance_sim::appliances::PresenceGrid;
use appliance_sim::cli;
use appliance_sim::config::ScenarioConfig;
use appliance_sim::io::export::{appliance_columns, collect_rows, export_csv};
use appliance_sim::sim::household::Household;
use appliance_sim::sim::report::WeeklyReport;

fn main() {
    let cli = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    // Load config: --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply overrides
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(weeks) = cli.weeks_override {
        scenario.simulation.weeks = weeks;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    let Some(season) = scenario.simulation.season() else {
        // validate() already rejected bad seasons
        process::exit(1);
    };

    // Build
    let mut rng = StdRng::seed_from_u64(scenario.simulation.seed);
    let presence = PresenceGrid::workweek(scenario.household.members);
    let mut household = Household::from_config(&scenario, presence, &mut rng);
    let tariff = scenario.tariff.build();
    let columns = appliance_columns(&household);

    // Run
    let mut all_rows = Vec::new();
    for week in 0..scenario.simulation.weeks {
        if let Err(e) = household.refresh_week(season, &mut rng) {
            eprintln!("error: {e}");
            process::exit(1);
        }

        let report = WeeklyReport::from_household(week, &household);
        println!("{report}");

        let mut shifted_wqh: i64 = 0;
        for day in 0..7 {
            let now = (week * 7 + day) * 24;
            match household.daily_controllable(tariff.as_ref(), now, day, &mut rng) {
                Ok(controllable) => shifted_wqh += controllable.iter().sum::<i64>(),
                Err(e) => {
                    eprintln!("error: {e}");
                    process::exit(1);
                }
            }
        }
        println!(
            "controllable load placed: {:.3} kWh\n",
            shifted_wqh as f64 * 0.25 / 1000.0
        );

        all_rows.extend(collect_rows(week, &household));
    }

    // Export CSV if requested
    if let Some(ref path) = cli.load_out {
        if let Err(e) = export_csv(&columns, &all_rows, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Load grid written to {}", path.display());
    }
}
