use clap::Parser;
use lakom_seed_resources::build_resources_from;
use snafu::{ResultExt, Snafu};

mod cli;
mod logging;
mod output;

const APP_NAME: &str = "lakom-seed-manifests";
const ENV_VAR_LOGGING: &str = "LAKOM_SEED_MANIFESTS_LOG";

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to initialize logging"))]
    InitializeLogging { source: logging::Error },

    #[snafu(display("failed to load build parameters"))]
    LoadParameters { source: cli::Error },

    #[snafu(display("failed to build resources"))]
    BuildResources {
        source: lakom_seed_resources::Error,
    },

    #[snafu(display("failed to write manifests"))]
    WriteOutput { source: output::Error },
}

#[snafu::report]
fn main() -> Result<(), Error> {
    let cli = cli::Cli::parse();
    logging::initialize_logging(ENV_VAR_LOGGING, APP_NAME).context(InitializeLoggingSnafu)?;

    let parameters = cli.resource_parameters().context(LoadParametersSnafu)?;
    let resources = build_resources_from(parameters).context(BuildResourcesSnafu)?;

    match &cli.output_dir {
        Some(directory) => output::write_to_directory(&resources, directory),
        None => output::write_to(&resources, std::io::stdout().lock()),
    }
    .context(WriteOutputSnafu)
}
