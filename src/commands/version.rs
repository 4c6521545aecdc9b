//! `relbin version`: build details for bug reports

use crate::download::USER_AGENT;
use crate::error::Result;
use crate::paths::StatePaths;

pub fn run() -> Result<()> {
    let profile = if cfg!(debug_assertions) { "debug" } else { "release" };
    let root = StatePaths::default_root()
        .map(|root| root.display().to_string())
        .unwrap_or_else(|_| "unavailable".to_string());

    println!("relbin {} ({profile})", env!("CARGO_PKG_VERSION"));
    println!("  target:      {}-{}", std::env::consts::ARCH, std::env::consts::OS);
    println!("  user agent:  {USER_AGENT}");
    println!("  state root:  {root}");

    Ok(())
}
