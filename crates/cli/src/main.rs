use anyhow::Context;

use stocksim_cli::CliConfig;
use stocksim_simulation::Simulation;

fn main() -> anyhow::Result<()> {
    let cli = match CliConfig::from_env() {
        Ok(cli) => cli,
        Err(err) => {
            stocksim_observability::init();
            tracing::error!(error = %err, "invalid environment configuration");
            return Err(err.into());
        }
    };
    stocksim_observability::init_with(&cli.observability());

    let seed = cli.resolve_seed();
    if cli.seed.is_none() {
        tracing::info!(seed, "STOCKSIM_SEED not set; drew a fresh seed");
    }

    let simulation = Simulation::new(cli.simulation_config(seed))
        .context("invalid simulation configuration")?;
    let report = simulation.run().context("simulation failed")?;

    println!("{report}");
    Ok(())
}
