//! Run command implementation.

use super::output::{format_round, format_standings, JsonRunResult, RoundSummary};
use super::{CliError, OutputFormat};
use evangel::game::check_invariants;
use evangel::render::render_text;
use evangel::scenario::play_rounds;
use evangel::Scenario;
use std::path::Path;
use tracing::warn;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the scenario cannot be loaded or built, or a scripted
/// move is rejected.
pub(crate) fn execute(
    scenario: Option<&Path>,
    rounds: u32,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let scenario = scenario.map_or_else(|| Ok(Scenario::default()), Scenario::load)?;
    let mut game = scenario.build()?;
    let verbose_text = format == OutputFormat::Text && !quiet;

    if verbose_text {
        println!("Running scenario '{}' for {rounds} rounds...", scenario.name);
        println!();
    }

    let mut summaries = Vec::with_capacity(usize::try_from(rounds).unwrap_or(0));
    play_rounds(&mut game, &scenario.script, rounds, |game| {
        let events = game.take_events();
        let summary = RoundSummary::from_events(game.round(), &events);
        for violation in check_invariants(game) {
            warn!(round = game.round(), %violation, "invariant violated");
        }
        if verbose_text {
            println!("{}", format_round(&summary));
        }
        summaries.push(summary);
    })?;

    let snapshot = game.snapshot();
    match format {
        OutputFormat::Text => {
            if verbose_text {
                println!();
            }
            print!("{}", render_text(&game));
            println!();
            print!("{}", format_standings(&snapshot));
        }
        OutputFormat::Json => {
            let result = JsonRunResult {
                scenario: &scenario.name,
                rounds: &summaries,
                territory: snapshot.territory(),
                snapshot: &snapshot,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
