use clap::Parser;

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Uninstall a binary:\n    relbin uninstall rg\n\n\
                  Uninstall several binaries:\n    relbin uninstall rg fd\n\n\
                  Uninstall everything:\n    relbin uninstall --all")]
pub struct UninstallArgs {
    /// Installed binary names
    #[arg(value_name = "BINARY", required_unless_present = "all", conflicts_with = "all")]
    pub binaries: Vec<String>,

    /// Uninstall every installed binary
    #[arg(long)]
    pub all: bool,
}
