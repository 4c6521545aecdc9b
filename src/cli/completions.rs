use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    relbin completions bash > ~/.bash_completion.d/relbin\n\n\
                  Generate zsh completions:\n    relbin completions zsh > ~/.zfunc/_relbin\n\n\
                  Generate fish completions:\n    relbin completions fish > ~/.config/fish/completions/relbin.fish")]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
