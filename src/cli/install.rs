use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install the latest release:\n    relbin install BurntSushi/ripgrep\n\n\
                  Install a specific tag:\n    relbin install BurntSushi/ripgrep@14.1.0\n\n\
                  Install a specific asset:\n    relbin install BurntSushi/ripgrep@14.1.0::ripgrep-14.1.0-x86_64-unknown-linux-musl.tar.gz\n\n\
                  Install from a URL:\n    relbin install https://example.com/downloads/tool-linux-amd64.tar.gz\n\n\
                  Install several at once:\n    relbin install sharkdp/fd sharkdp/bat")]
pub struct InstallArgs {
    /// Package references: owner/repo[@tag[::asset]] or a download URL
    #[arg(required = true, value_name = "REF")]
    pub references: Vec<String>,
}
