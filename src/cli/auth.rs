//! Auth command - test and explain GitHub authentication

use crate::cli::style::{check, Stylize};
use anstream::println;
use ticket2pr::auth::{get_github_auth, test_github_auth};
use ticket2pr::config::AppConfig;
use ticket2pr::error::Result;

/// Resolve the token and ask GitHub who it belongs to
pub async fn run_auth_test() -> Result<()> {
    let config = AppConfig::from_env()?;
    println!("Testing GitHub authentication...");
    let auth = get_github_auth(&config).await?;
    let username = test_github_auth(&auth, config.github_host.as_deref()).await?;
    println!("{} Authenticated as {}", check(), username.accent());
    println!("  {}", format!("Token source: {:?}", auth.source).muted());
    Ok(())
}

/// Print setup instructions
pub fn run_auth_setup() {
    println!("{}", "GitHub Authentication Setup".emphasis());
    println!();
    println!("Option 1: environment variable");
    println!(
        "  Set {} (or {} / {})",
        "TICKET2PR_GITHUB_TOKEN".accent(),
        "GITHUB_TOKEN".accent(),
        "GH_TOKEN".accent()
    );
    println!();
    println!("Option 2: GitHub CLI");
    println!("  Install: https://cli.github.com/");
    println!("  Run: {}", "gh auth login".accent());
    println!(
        "  {}",
        "Disable the fallback with TICKET2PR_USE_GH_CLI=false".muted()
    );
    println!();
    println!("For GitHub Enterprise:");
    println!("  Set {} to your instance hostname", "GH_HOST".accent());
    println!();
    println!("The token needs permission to push branches and open pull requests.");
}
