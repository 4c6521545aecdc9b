use clap::Parser;

/// Arguments for the upgrade command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Upgrade one binary:\n    relbin upgrade rg\n\n\
                  Upgrade every GitHub install:\n    relbin upgrade --all")]
pub struct UpgradeArgs {
    /// Installed binary names
    #[arg(value_name = "BINARY", required_unless_present = "all", conflicts_with = "all")]
    pub binaries: Vec<String>,

    /// Upgrade every binary installed from GitHub
    #[arg(long)]
    pub all: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_cli_parsing_upgrade() {
        let cli = Cli::try_parse_from(["relbin", "upgrade", "rg", "fd"]).unwrap();
        match cli.command {
            Commands::Upgrade(args) => {
                assert_eq!(args.binaries, ["rg", "fd"]);
                assert!(!args.all);
            }
            _ => panic!("Expected Upgrade command"),
        }
    }

    #[test]
    fn test_cli_parsing_upgrade_all() {
        let cli = Cli::try_parse_from(["relbin", "upgrade", "--all"]).unwrap();
        match cli.command {
            Commands::Upgrade(args) => {
                assert!(args.all);
                assert!(args.binaries.is_empty());
            }
            _ => panic!("Expected Upgrade command"),
        }
    }

    #[test]
    fn test_cli_parsing_upgrade_needs_target() {
        assert!(Cli::try_parse_from(["relbin", "upgrade"]).is_err());
        assert!(Cli::try_parse_from(["relbin", "upgrade", "rg", "--all"]).is_err());
    }
}
