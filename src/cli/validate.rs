//! Scenario validation command implementation.

use super::CliError;
use evangel::game::check_invariants;
use evangel::Scenario;
use std::path::Path;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the scenario cannot be read, parsed or built, or the
/// built game violates an invariant.
pub(crate) fn execute(path: &Path) -> Result<(), CliError> {
    println!("Validating: {}", path.display());
    println!();

    let scenario = Scenario::load(path);
    print_check("Scenario parses", scenario.is_ok());
    let scenario = scenario?;

    let board = scenario.build_board();
    print_check("Board builds", board.is_ok());
    let board = board?;

    let topology = board.check_topology();
    print_check("Edges mirrored", topology.is_ok());
    topology.map_err(|e| CliError::new(format!("Board topology is broken: {e}")))?;

    let game = scenario.build();
    print_check("Players, prophets and seeds placed", game.is_ok());
    let game = game?;

    let violations = check_invariants(&game);
    print_check("Invariants hold", violations.is_empty());
    if let Some(first) = violations.first() {
        return Err(CliError::new(first.to_string()));
    }

    println!();
    println!("Summary:");
    println!("  Name:     {}", scenario.name);
    println!("  Nodes:    {}", board.len());
    println!("  Edges:    {}", board.edges().len());
    println!("  Players:  {}", game.real_player_count());
    println!("  Seeds:    {}", scenario.seeds.len());
    println!("  Script:   {} moves", scenario.script.len());

    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
