use stackhut::cli::commands::{CliArgs, Commands};
use stackhut::cli::handlers::{handle_build, handle_stackbuild};
use stackhut::util::logging::{init_logging, parse_level, LoggingConfig};
use stackhut::{StackhutConfig, VERSION};

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    let config = StackhutConfig::default();
    init_logging_from_args(&args);

    debug!("stackhut v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Stackbuild(stackbuild_args) => handle_stackbuild(stackbuild_args, &config),
        Commands::Build(build_args) => handle_build(build_args, &config),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();
    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }
    init_logging(config);
}
