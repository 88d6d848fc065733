//! Command-line configuration and logging setup.

use crate::commands::Command;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "ringctl",
    version,
    about = "Inspect and exercise consistent hash rings"
)]
pub struct CliConfig {
    /// Log every ring operation (also raises the default log level to debug).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(self) -> anyhow::Result<()> {
        init_tracing(self.verbose);
        let output = self.command.execute(self.verbose)?;
        print!("{output}");
        Ok(())
    }
}

/// Console tracing subscriber. `RUST_LOG` wins over the verbosity flag.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::HashArg;

    #[test]
    fn test_parse_lookup() {
        let config = CliConfig::try_parse_from([
            "ringctl",
            "lookup",
            "--nodes",
            "a,b@10.0.0.2:11211",
            "--replicas",
            "2",
            "--hash",
            "xxh3",
            "k1",
            "k2",
        ])
        .unwrap();
        assert!(!config.verbose);
        match config.command {
            Command::Lookup {
                ring,
                replicas,
                keys,
            } => {
                assert_eq!(ring.nodes, ["a", "b@10.0.0.2:11211"]);
                assert_eq!(ring.hash, HashArg::Xxh3);
                assert_eq!(replicas, 2);
                assert_eq!(keys, ["k1", "k2"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let config = CliConfig::try_parse_from(["ringctl", "demo", "-v"]).unwrap();
        assert!(config.verbose);
    }

    #[test]
    fn test_lookup_requires_nodes() {
        assert!(CliConfig::try_parse_from(["ringctl", "lookup", "k1"]).is_err());
    }
}
