use anyhow::Result;

fn main() -> Result<()> {
    chatledger::cli::run_cli()
}
