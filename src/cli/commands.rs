use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, instrument};

use crate::application::GameController;
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::play::play;
use crate::cli::render::TreeRender;
use crate::config::{global_config_path, Settings};
use crate::domain::BstTree;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        None => _play(cli, None, None, None),
        Some(Commands::Play { size, min, max }) => _play(cli, *size, *min, *max),
        Some(Commands::Floor { target, values }) => _floor(*target, values),
        Some(Commands::Tree { values }) => _tree(values),
        Some(Commands::Config) => _config(cli),
        Some(Commands::Completion { shell }) => _completion(*shell),
    }
}

/// Settings from config layers, then command line flags.
pub fn resolve_settings(
    cli: &Cli,
    size: Option<usize>,
    min: Option<i32>,
    max: Option<i32>,
) -> CliResult<Settings> {
    let settings =
        Settings::load(cli.config.as_deref())?.with_overrides(size, min, max, cli.seed);
    settings.validate()?;
    debug!(?settings, "resolved settings");
    Ok(settings)
}

/// Seeded generator when a seed is configured, fresh entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(value) => StdRng::seed_from_u64(value),
        None => StdRng::from_os_rng(),
    }
}

#[instrument(skip(cli))]
fn _play(cli: &Cli, size: Option<usize>, min: Option<i32>, max: Option<i32>) -> CliResult<()> {
    let settings = resolve_settings(cli, size, min, max)?;
    let mut controller = GameController::new(settings.game_params(), make_rng(settings.seed))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    play(&mut controller, stdin.lock(), &mut stdout.lock())?;
    Ok(())
}

#[instrument]
fn _floor(target: i32, values: &[i32]) -> CliResult<()> {
    if values.is_empty() {
        return Err(CliError::InvalidArgs("at least one value required".into()));
    }
    let tree = BstTree::from_values(values.iter().copied());
    let floor = tree.floor(target);
    let highlight = floor.and_then(|value| tree.find(value));

    output::info(&tree.to_termtree(highlight));
    match floor {
        Some(value) => output::action("floor", &format!("{} (target {})", value, target)),
        None => output::action("floor", &format!("none (target {})", target)),
    }
    Ok(())
}

#[instrument]
fn _tree(values: &[i32]) -> CliResult<()> {
    if values.is_empty() {
        return Err(CliError::InvalidArgs("at least one value required".into()));
    }
    let tree = BstTree::from_values(values.iter().copied());
    let dropped = values.len() - tree.len();

    output::info(&tree.to_termtree(None));
    output::detail(&format!("nodes: {}, depth: {}", tree.len(), tree.depth()));
    output::detail(&format!("in-order: {:?}", tree.values()));
    if dropped > 0 {
        output::warning(&format!("{} duplicate value(s) dropped", dropped));
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _config(cli: &Cli) -> CliResult<()> {
    let settings = resolve_settings(cli, None, None, None)?;
    output::header("Effective settings");
    output::info(&settings.to_toml()?);
    if let Some(path) = global_config_path() {
        let status = if path.exists() { "found" } else { "not found" };
        output::detail(&format!("global config: {} ({})", path.display(), status));
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
