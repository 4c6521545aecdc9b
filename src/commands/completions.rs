//! Shell completions command

use clap::CommandFactory;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::Result;

/// Generate shell completions
pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "relbin", &mut std::io::stdout().lock());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::Commands;
    use clap::Parser;
    use clap_complete::Shell;

    #[test]
    fn test_completions_shell_parsing() {
        for (name, shell) in [
            ("bash", Shell::Bash),
            ("zsh", Shell::Zsh),
            ("fish", Shell::Fish),
            ("elvish", Shell::Elvish),
            ("powershell", Shell::PowerShell),
            ("BASH", Shell::Bash),
        ] {
            let cli = Cli::try_parse_from(["relbin", "completions", name]).unwrap();
            match cli.command {
                Commands::Completions(args) => assert_eq!(args.shell, shell),
                _ => panic!("Expected Completions command"),
            }
        }
    }

    #[test]
    fn test_completions_unknown_shell() {
        assert!(Cli::try_parse_from(["relbin", "completions", "tcsh"]).is_err());
    }

    #[test]
    fn test_completions_bash() {
        let args = CompletionsArgs { shell: Shell::Bash };
        assert!(run(args).is_ok());
    }
}
