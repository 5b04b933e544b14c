use anyhow::Context;
use igs::logging::LogTarget;
use igs::prompter::flows::main_flow::MainFlow;
use igs::prompter::prompter::Prompter;
use igs::{AppContext, CliPaths};

fn run() -> anyhow::Result<()> {
    let paths = CliPaths::from_env().map_err(anyhow::Error::msg)?;
    let config_path = paths.config_path.clone();
    let mut ctx = AppContext::new_with_paths(paths)
        .with_context(|| format!("Could not start with '{}'", config_path.display()))?;

    let prompter = Prompter::new();
    let flow = MainFlow::new(&mut ctx);
    if let Err(err) = prompter.run(flow, false) {
        ctx.logger.error(format!("{err}"), LogTarget::ConsoleAndFile);
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
