/*!
 * Memory Simulator - Main Entry Point
 *
 * Reads allocation commands from a script or an interactive prompt and
 * shows how the chosen fit strategy lays out the simulated memory.
 */

use memory_sim::shell::{config::USAGE, prompt_setup, run};
use memory_sim::{init_tracing, InputSource, SimConfig, SimError};
use miette::Result;
use std::fs::File;
use std::io::{self, BufReader};
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let mut config = SimConfig::from_env()?;
    if config.show_help {
        print!("{}", USAGE);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdin = stdin.lock();
    if config.input == InputSource::Interactive && !config.explicit {
        prompt_setup(&mut stdin, &mut io::stdout(), &mut config)?;
    }

    let summary = match config.input.clone() {
        InputSource::File(path) => {
            let file = File::open(&path).map_err(|e| {
                miette::Report::new(SimError::from(e))
                    .wrap_err(format!("cannot open {}", path.display()))
            })?;
            info!(path = %path.display(), "Running command file");
            run(&config, BufReader::new(file), io::stdout(), io::stderr(), false)?
        }
        InputSource::Interactive => run(&config, stdin, io::stdout(), io::stderr(), true)?,
    };

    info!(
        commands = summary.commands,
        allocations = summary.allocations,
        failed_allocations = summary.failed_allocations,
        deallocations = summary.deallocations,
        failed_deallocations = summary.failed_deallocations,
        warnings = summary.warnings,
        "Session finished"
    );
    Ok(())
}
