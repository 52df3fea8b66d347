use std::fs::File;
use std::io::BufReader;

use anyhow::Context;
use cardinal::command::{wirelength, History, Invoker, Output};
use cardinal::router::{Router, RouterConfig};
use cardinal::technology::{AccessTechnology, Technology};
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<(), anyhow::Error> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args = Cli::parse();

    let technology_file = File::open(&args.technology)
        .with_context(|| format!("cannot open {}", args.technology.display()))?;
    let technology = Technology::from_reader(BufReader::new(technology_file))?;

    let config: RouterConfig = match args.config {
        Some(ref path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => RouterConfig::default(),
    };

    let command_file = File::open(&args.commands)
        .with_context(|| format!("cannot open {}", args.commands.display()))?;
    let history: History = serde_json::from_reader(BufReader::new(command_file))?;

    let resolution = technology.resolution();
    let mut invoker = Invoker::new(Router::with_config(&technology, config));
    let (done, _) = history.into_commands();

    for (index, command) in done.into_iter().enumerate() {
        match invoker.execute(command) {
            Ok(output) => {
                let routes = output.routes();
                let kind = match output {
                    Output::Route(..) => "route",
                    Output::Offset(..) => "offset routes",
                };

                println!(
                    "#{}: {} ({} wires), {} segments, {} vias, length {:.3}",
                    index,
                    kind,
                    routes.iter().filter(|route| !route.is_empty()).count(),
                    routes.iter().map(|route| route.segments().count()).sum::<usize>(),
                    routes.iter().map(|route| route.vias().count()).sum::<usize>(),
                    wirelength(output) as f64 * resolution,
                );
            }
            Err(err) => log::warn!("command #{} failed: {}", index, err),
        }
    }

    Ok(())
}
