use anyhow::Result;
use dotenvy::dotenv;

use vulnsift::cli::RootCommand;

fn main() -> Result<()> {
    dotenv().ok();
    RootCommand::execute()
}
