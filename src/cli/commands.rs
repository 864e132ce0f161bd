use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Builds base OS, language stack and service container images
#[derive(Parser, Debug)]
#[command(
    name = "stackhut",
    about = "Builds base OS, language stack and service container images",
    version,
    author,
    long_about = "stackhut builds the catalog of base OS and language stack images, \
                  and builds service images from a project's Hutfile.yaml on top of them."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug output")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Build the default OS and Stack images",
        long_about = "Builds every base OS image, then every supported base OS / stack \
                      combination. Each image is staged in its own directory under the \
                      output directory.\n\n\
                      Examples:\n  \
                      stackhut stackbuild\n  \
                      stackhut stackbuild --outdir build/stacks --push"
    )]
    Stackbuild(StackbuildArgs),

    #[command(
        about = "Build a StackHut service",
        long_about = "Reads Hutfile.yaml from the current directory and builds the service \
                      image on top of its base OS / stack image.\n\n\
                      Examples:\n  \
                      stackhut build\n  \
                      stackhut build --push"
    )]
    Build(BuildArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct StackbuildArgs {
    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        default_value = "stacks",
        help = "Directory to save stacks to"
    )]
    pub outdir: PathBuf,

    #[arg(short = 'p', long, help = "Push image to public after")]
    pub push: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[arg(short = 'p', long, help = "Push image to public after")]
    pub push: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_stackbuild_args() {
        let args = CliArgs::parse_from(["stackhut", "stackbuild"]);
        match args.command {
            Commands::Stackbuild(stackbuild) => {
                assert_eq!(stackbuild.outdir, PathBuf::from("stacks"));
                assert!(!stackbuild.push);
            }
            _ => panic!("Expected Stackbuild command"),
        }
    }

    #[test]
    fn test_stackbuild_short_flags() {
        let args = CliArgs::parse_from(["stackhut", "stackbuild", "-o", "out", "-p"]);
        match args.command {
            Commands::Stackbuild(stackbuild) => {
                assert_eq!(stackbuild.outdir, PathBuf::from("out"));
                assert!(stackbuild.push);
            }
            _ => panic!("Expected Stackbuild command"),
        }
    }

    #[test]
    fn test_build_push() {
        let args = CliArgs::parse_from(["stackhut", "build", "--push"]);
        match args.command {
            Commands::Build(build) => assert!(build.push),
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(["stackhut", "build", "-v", "--log-level", "trace"]);
        assert!(args.verbose);
        assert_eq!(args.log_level.as_deref(), Some("trace"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = CliArgs::try_parse_from(["stackhut", "-v", "-q", "build"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_rejects_outdir() {
        let result = CliArgs::try_parse_from(["stackhut", "build", "--outdir", "x"]);
        assert!(result.is_err());
    }
}
