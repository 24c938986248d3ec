//! escope CLI entry point.

use escope_lib::cli::{self, Cli};
use escope_lib::core::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli::execute(cli).await
}
