use clap::Parser;
use cogmyra::cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    cogmyra::init_logging();
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    let mut stdin = std::io::stdin().lock();
    run(cli, &mut stdout, &mut stdin)
}
