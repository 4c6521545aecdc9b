use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List installed binaries:\n    relbin list\n\n\
                  Include release tags:\n    relbin list --tags")]
pub struct ListArgs {
    /// Show the installed release tag next to each source
    #[arg(long)]
    pub tags: bool,
}
