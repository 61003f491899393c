use crate::command::{CommandInput, CommandWord, Context};
use crate::converter::round_two_decimals;
use crate::error::CommandError;
use crate::ingredient::{Ingredient, Measurement, capitalize_each_word};
use crate::recipe::Recipe;
use crate::storage::ExpirySweep;
use crate::unit::IngredientType;
use chrono::{Days, NaiveDate};
use tracing::{debug, info};

/// Commands known to the shell at compile time.
///
/// Each command is a zero-sized type; [`dispatch`] picks one with a single
/// `match` on the parsed [`CommandWord`].
pub(crate) trait BuiltinCommand {
    const WORD: CommandWord;

    /// Handle `<command> <subcommand> [<remainder>]`.
    ///
    /// A subcommand the command does not declare must be answered with
    /// [`CommandError::IllegalCombination`].
    fn run_subcommand(
        subcommand: &str,
        remainder: Option<String>,
        ctx: &mut Context<'_>,
    ) -> Result<(), CommandError>;

    /// Handle the command typed on its own. Shows the command's help.
    fn run_bare(ctx: &mut Context<'_>) -> Result<(), CommandError> {
        ctx.output.help(Self::WORD.name())?;
        Ok(())
    }

    fn execute(input: CommandInput, ctx: &mut Context<'_>) -> Result<(), CommandError> {
        match input.subcommand {
            Some(subcommand) => Self::run_subcommand(&subcommand, input.remainder, ctx),
            None => Self::run_bare(ctx),
        }
    }
}

/// Run one parsed command line against the session in `ctx`.
pub(crate) fn dispatch(input: CommandInput, ctx: &mut Context<'_>) -> Result<(), CommandError> {
    debug!(command = %input.command, subcommand = ?input.subcommand, "dispatching");
    match input.command {
        CommandWord::Add => Add::execute(input, ctx),
        CommandWord::Remove => Remove::execute(input, ctx),
        CommandWord::Find => Find::execute(input, ctx),
        CommandWord::List => List::execute(input, ctx),
        CommandWord::Clear => Clear::execute(input, ctx),
        CommandWord::Go => Go::execute(input, ctx),
        CommandWord::Stats => Stats::execute(input, ctx),
        CommandWord::Help => Help::execute(input, ctx),
        CommandWord::Exit => Exit::execute(input, ctx),
        CommandWord::Unknown => Unknown::execute(input, ctx),
    }
}

/// The name typed after the subcommand, or one asked for.
fn name_or_ask(
    remainder: Option<String>,
    question: &str,
    ctx: &mut Context<'_>,
) -> Result<String, CommandError> {
    if let Some(name) = remainder.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) {
        return Ok(name);
    }
    ctx.output.prompt(question)?;
    Ok(ctx.scanner.collect_valid_string(ctx.output)?)
}

fn expiry_after(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// `add storage|inventory|ingredient|recipe`.
pub struct Add;

impl Add {
    fn storage(name: &str, ctx: &mut Context<'_>) -> Result<(), CommandError> {
        let inventory = &mut ctx.session.inventory;
        inventory.create_storage(name)?;
        if inventory.active().is_err() {
            inventory.select(name)?;
        }
        ctx.output.status(true, "added storage", name)?;
        Ok(())
    }

    fn ingredient(name: &str, ctx: &mut Context<'_>) -> Result<(), CommandError> {
        let today = ctx.session.today();

        ctx.output.prompt("Please enter the amount and unit (e.g. 1.5 kg):")?;
        let quantity = ctx.scanner.collect_valid_unit_input(ctx.output)?;
        ctx.output
            .prompt(&format!("Please enter the price per {}:", quantity.unit))?;
        let price = ctx.scanner.collect_valid_float(ctx.output)?;
        ctx.output
            .prompt("Please enter the number of days until it expires:")?;
        let days = ctx.scanner.collect_valid_integer(ctx.output)?;

        let value = round_two_decimals(quantity.amount * price);
        let ingredient = Ingredient::new(
            name,
            quantity.amount,
            quantity.unit,
            value,
            expiry_after(today, days),
        )?;
        info!(%ingredient, "adding ingredient");
        ctx.session.inventory.active_mut()?.add_ingredient(ingredient)?;
        ctx.output.status(true, "added", name)?;
        Ok(())
    }

    fn recipe(name: &str, ctx: &mut Context<'_>) -> Result<(), CommandError> {
        ctx.output
            .prompt("How many ingredients does the recipe need?")?;
        let count = ctx.scanner.collect_valid_integer(ctx.output)?;

        let mut requirements = Vec::new();
        for position in 1..=count {
            ctx.output
                .prompt(&format!("Name of ingredient {position} of {count}:"))?;
            let ingredient = ctx.scanner.collect_valid_string(ctx.output)?;
            ctx.output
                .prompt(&format!("Amount and unit of {ingredient}:"))?;
            let quantity = ctx.scanner.collect_valid_unit_input(ctx.output)?;
            let requirement = Measurement::new(ingredient, quantity.amount, quantity.unit)?
                .with_type(IngredientType::for_unit(quantity.unit));
            requirements.push(requirement);
        }

        let recipe = Recipe::new(name, requirements)?;
        if ctx.session.recipes.add(recipe).is_some() {
            debug!(recipe = name, "replaced existing recipe");
        }
        ctx.output.status(true, "added recipe", name)?;
        Ok(())
    }
}

impl BuiltinCommand for Add {
    const WORD: CommandWord = CommandWord::Add;

    fn run_subcommand(
        subcommand: &str,
        remainder: Option<String>,
        ctx: &mut Context<'_>,
    ) -> Result<(), CommandError> {
        match subcommand {
            "storage" | "inventory" => {
                let name = name_or_ask(remainder, "Please enter a name for the new storage:", ctx)?;
                Add::storage(&name, ctx)
            }
            "ingredient" => {
                ctx.session.inventory.active()?;
                let name = name_or_ask(remainder, "Please enter a name for the ingredient:", ctx)?;
                Add::ingredient(&name, ctx)
            }
            "recipe" => {
                let name = name_or_ask(remainder, "Please enter a name for the recipe:", ctx)?;
                Add::recipe(&name, ctx)
            }
            other => Err(CommandError::illegal(Self::WORD, other)),
        }
    }
}

/// `remove storage|ingredient|expired|recipe`.
pub struct Remove;

impl Remove {
    fn ingredient(name: &str, ctx: &mut Context<'_>) -> Result<(), CommandError> {
        let lots: Vec<Ingredient> = match ctx.session.inventory.active()?.find_ingredient(name) {
            Some(lots) => lots.into_iter().cloned().collect(),
            None => {
                ctx.output.status(false, "remove", name)?;
                return Ok(());
            }
        };

        let chosen = if lots.len() == 1 {
            &lots[0]
        } else {
            for (position, lot) in lots.iter().enumerate() {
                ctx.output.item(&format!("{}. {lot}", position + 1))?;
            }
            let question = format!("Which entry should be removed? (1-{})", lots.len());
            loop {
                ctx.output.prompt(&question)?;
                let choice = ctx.scanner.collect_valid_integer(ctx.output)? as usize;
                if let Some(lot) = choice.checked_sub(1).and_then(|i| lots.get(i)) {
                    break lot;
                }
            }
        };

        let removed = ctx
            .session
            .inventory
            .active_mut()?
            .remove_ingredient(chosen);
        ctx.output.status(removed, if removed { "removed" } else { "remove" }, name)?;
        Ok(())
    }

    fn expired(ctx: &mut Context<'_>) -> Result<(), CommandError> {
        let today = ctx.session.today();
        match ctx.session.inventory.active_mut()?.remove_expired(today) {
            ExpirySweep::NothingToCheck => {
                ctx.output.notice("The storage is empty, nothing to check.")?;
            }
            ExpirySweep::Removed(removed) if removed.is_empty() => {
                ctx.output.notice("No expired ingredients found.")?;
            }
            ExpirySweep::Removed(removed) => {
                for ingredient in &removed {
                    ctx.output.item(ingredient)?;
                }
                ctx.output.status(
                    true,
                    "removed",
                    &format!("{} expired ingredient(s)", removed.len()),
                )?;
            }
        }
        Ok(())
    }
}

impl BuiltinCommand for Remove {
    const WORD: CommandWord = CommandWord::Remove;

    fn run_subcommand(
        subcommand: &str,
        remainder: Option<String>,
        ctx: &mut Context<'_>,
    ) -> Result<(), CommandError> {
        match subcommand {
            "storage" | "inventory" => {
                let name = name_or_ask(remainder, "Which storage should be removed?", ctx)?;
                ctx.session.inventory.remove_storage(&name)?;
                ctx.output.status(true, "removed storage", &name)?;
                Ok(())
            }
            "ingredient" => {
                ctx.session.inventory.active()?;
                let name = name_or_ask(remainder, "Which ingredient should be removed?", ctx)?;
                Remove::ingredient(&name, ctx)
            }
            "expired" => Remove::expired(ctx),
            "recipe" => {
                let name = name_or_ask(remainder, "Which recipe should be removed?", ctx)?;
                ctx.session
                    .recipes
                    .remove(&name)
                    .ok_or_else(|| CommandError::UnknownRecipe(name.clone()))?;
                ctx.output.status(true, "removed recipe", &name)?;
                Ok(())
            }
            other => Err(CommandError::illegal(Self::WORD, other)),
        }
    }
}

/// `find ingredient|recipe`.
pub struct Find;

impl BuiltinCommand for Find {
    const WORD: CommandWord = CommandWord::Find;

    fn run_subcommand(
        subcommand: &str,
        remainder: Option<String>,
        ctx: &mut Context<'_>,
    ) -> Result<(), CommandError> {
        match subcommand {
            "ingredient" => {
                ctx.session.inventory.active()?;
                let name = name_or_ask(remainder, "Which ingredient are you looking for?", ctx)?;
                match ctx.session.inventory.active()?.find_ingredient(&name) {
                    Some(lots) => {
                        for lot in lots {
                            ctx.output.item(lot)?;
                            let base = lot.unit().family().base();
                            ctx.output.statistic(
                                &format!("    price per {base}"),
                                lot.price_per_standard_unit(),
                            )?;
                        }
                    }
                    None => ctx.output.status(false, "find", &name)?,
                }
                Ok(())
            }
            "recipe" => {
                let name = name_or_ask(remainder, "Which recipe are you looking for?", ctx)?;
                let recipe = ctx
                    .session
                    .recipes
                    .get(&name)
                    .ok_or_else(|| CommandError::UnknownRecipe(name.clone()))?;
                ctx.output.item(recipe)?;
                let storage = ctx.session.inventory.active()?;
                let enough = storage.is_ingredient_enough(recipe.requirements())?;
                let subject = format!(
                    "that {} has everything for {}",
                    storage.name(),
                    capitalize_each_word(recipe.name())
                );
                ctx.output
                    .status(enough, if enough { "verified" } else { "verify" }, &subject)?;
                Ok(())
            }
            other => Err(CommandError::illegal(Self::WORD, other)),
        }
    }
}

/// `list storage|inventory|storages|recipes`.
pub struct List;

impl BuiltinCommand for List {
    const WORD: CommandWord = CommandWord::List;

    fn run_subcommand(
        subcommand: &str,
        _remainder: Option<String>,
        ctx: &mut Context<'_>,
    ) -> Result<(), CommandError> {
        match subcommand {
            "storage" => {
                let storage = ctx.session.inventory.active()?;
                if storage.is_empty() {
                    ctx.output
                        .notice(&format!("{} is empty.", storage.name()))?;
                }
                for lot in storage.iter() {
                    ctx.output.item(lot)?;
                }
                Ok(())
            }
            "inventory" | "storages" => {
                let inventory = &ctx.session.inventory;
                if inventory.is_empty() {
                    ctx.output.notice("There are no storages yet.")?;
                }
                for storage in inventory.iter() {
                    let line = format!("{}: {}", storage.name(), storage.overview().join(", "));
                    ctx.output.item(&line)?;
                }
                Ok(())
            }
            "recipes" => {
                let recipes = &ctx.session.recipes;
                if recipes.is_empty() {
                    ctx.output.notice("There are no recipes yet.")?;
                }
                for recipe in recipes.iter() {
                    ctx.output.item(recipe)?;
                }
                Ok(())
            }
            other => Err(CommandError::illegal(Self::WORD, other)),
        }
    }
}

/// `clear storage|history`.
pub struct Clear;

impl BuiltinCommand for Clear {
    const WORD: CommandWord = CommandWord::Clear;

    fn run_subcommand(
        subcommand: &str,
        _remainder: Option<String>,
        ctx: &mut Context<'_>,
    ) -> Result<(), CommandError> {
        match subcommand {
            "storage" => {
                let storage = ctx.session.inventory.active_mut()?;
                storage.clear();
                ctx.output.status(true, "cleared", storage.name())?;
                Ok(())
            }
            "history" => {
                let forgotten = ctx.session.inventory.clear_history();
                ctx.output.status(
                    true,
                    "cleared",
                    &format!("{forgotten} storage(s) from the history"),
                )?;
                Ok(())
            }
            other => Err(CommandError::illegal(Self::WORD, other)),
        }
    }
}

/// `go storage|back`.
pub struct Go;

impl BuiltinCommand for Go {
    const WORD: CommandWord = CommandWord::Go;

    fn run_subcommand(
        subcommand: &str,
        remainder: Option<String>,
        ctx: &mut Context<'_>,
    ) -> Result<(), CommandError> {
        match subcommand {
            "storage" | "inventory" => {
                let name = name_or_ask(remainder, "Which storage do you want to go to?", ctx)?;
                let storage = ctx.session.inventory.select(&name)?;
                ctx.output.status(true, "moved to", storage.name())?;
                Ok(())
            }
            "back" => {
                match ctx.session.inventory.go_back() {
                    Some(storage) => ctx.output.status(true, "moved back to", storage.name())?,
                    None => ctx
                        .output
                        .notice("There is no previous storage to go back to.")?,
                }
                Ok(())
            }
            other => Err(CommandError::illegal(Self::WORD, other)),
        }
    }
}

/// `stats value|expired`.
pub struct Stats;

impl BuiltinCommand for Stats {
    const WORD: CommandWord = CommandWord::Stats;

    fn run_subcommand(
        subcommand: &str,
        _remainder: Option<String>,
        ctx: &mut Context<'_>,
    ) -> Result<(), CommandError> {
        let today = ctx.session.today();
        let storage = match subcommand {
            "value" | "expired" => ctx.session.inventory.active()?,
            other => return Err(CommandError::illegal(Self::WORD, other)),
        };

        if subcommand == "value" {
            ctx.output.statistic(
                &format!("Total value of {}", storage.name()),
                storage.total_value(),
            )?;
            return Ok(());
        }

        let expired = storage.all_expired(today);
        for lot in &expired {
            ctx.output.item(*lot)?;
        }
        let value = round_two_decimals(expired.iter().map(|lot| lot.value()).sum::<f64>());
        ctx.output
            .notice(&format!("{} expired ingredient(s)", expired.len()))?;
        ctx.output.statistic("Value of expired ingredients", value)?;
        Ok(())
    }
}

/// `help [<command>]`.
pub struct Help;

impl BuiltinCommand for Help {
    const WORD: CommandWord = CommandWord::Help;

    fn run_bare(ctx: &mut Context<'_>) -> Result<(), CommandError> {
        ctx.output.help("general")?;
        Ok(())
    }

    fn run_subcommand(
        subcommand: &str,
        _remainder: Option<String>,
        ctx: &mut Context<'_>,
    ) -> Result<(), CommandError> {
        match CommandWord::from_token(subcommand) {
            CommandWord::Unknown => Err(CommandError::illegal(Self::WORD, subcommand)),
            word => {
                ctx.output.help(word.name())?;
                Ok(())
            }
        }
    }
}

/// `exit`, with or without anything after it.
pub struct Exit;

impl Exit {
    fn leave(ctx: &mut Context<'_>) -> Result<(), CommandError> {
        info!("exit requested");
        ctx.session.should_exit = true;
        ctx.output.notice("Goodbye!")?;
        Ok(())
    }
}

impl BuiltinCommand for Exit {
    const WORD: CommandWord = CommandWord::Exit;

    fn run_bare(ctx: &mut Context<'_>) -> Result<(), CommandError> {
        Exit::leave(ctx)
    }

    fn run_subcommand(
        _subcommand: &str,
        _remainder: Option<String>,
        ctx: &mut Context<'_>,
    ) -> Result<(), CommandError> {
        Exit::leave(ctx)
    }
}

/// Anything that is not a command word.
pub struct Unknown;

impl BuiltinCommand for Unknown {
    const WORD: CommandWord = CommandWord::Unknown;

    fn run_subcommand(
        _subcommand: &str,
        _remainder: Option<String>,
        ctx: &mut Context<'_>,
    ) -> Result<(), CommandError> {
        Self::run_bare(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Interrupt;
    use crate::io_adapters::{LineReader, MemWriter};
    use crate::output::ConsoleReporter;
    use crate::scanner::{InputScanner, parse_command};
    use crate::session::{Clock, Session};
    use crate::unit::ValidUnit;
    use std::io::Cursor;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 10).unwrap()
    }

    fn session_with_storage() -> Session {
        let mut session = Session::new(Clock::Fixed(today()));
        session.inventory.create_storage("Fridge").unwrap();
        session.inventory.select("fridge").unwrap();
        session
    }

    /// Run `line` with `input` as the follow-up answers; returns the result
    /// and everything printed.
    fn run(session: &mut Session, line: &str, input: &str) -> (Result<(), CommandError>, String) {
        let mut scanner =
            InputScanner::new(LineReader::new(Cursor::new(input.as_bytes().to_vec())));
        let (writer, handle) = MemWriter::with_handle();
        let mut output = ConsoleReporter::new(writer);
        let mut ctx = Context {
            session,
            scanner: &mut scanner,
            output: &mut output,
        };
        let result = dispatch(parse_command(line), &mut ctx);
        let printed = String::from_utf8(handle.borrow().clone()).unwrap();
        (result, printed)
    }

    fn stock(session: &mut Session, name: &str, amount: f64, unit: ValidUnit, days: u64) {
        let expiry = today().checked_add_days(Days::new(days)).unwrap();
        let lot = Ingredient::new(name, amount, unit, 10.0, expiry).unwrap();
        session
            .inventory
            .active_mut()
            .unwrap()
            .add_ingredient(lot)
            .unwrap();
    }

    #[test]
    fn test_bare_command_shows_help_and_changes_nothing() {
        let mut session = session_with_storage();
        let (result, printed) = run(&mut session, "add", "");
        assert!(result.is_ok());
        assert!(printed.contains("add storage <name>"));
        assert_eq!(session.inventory.active().unwrap().len(), 0);
    }

    #[test]
    fn test_undeclared_subcommand_is_illegal() {
        let mut session = session_with_storage();
        for line in ["add spaceship", "go forward", "stats nonsense", "help me"] {
            let (result, _) = run(&mut session, line, "");
            assert!(
                matches!(result, Err(CommandError::IllegalCombination { .. })),
                "{line} should be illegal"
            );
        }
    }

    #[test]
    fn test_add_ingredient_wizard() {
        let mut session = session_with_storage();
        let (result, printed) = run(
            &mut session,
            "add ingredient Whole   Milk",
            "1.5 l\n20\n7\n",
        );
        result.unwrap();
        assert!(printed.contains("Successfully added Whole   Milk."));

        let storage = session.inventory.active().unwrap();
        let lot = storage
            .find_ingredient_on("whole milk", NaiveDate::from_ymd_opt(2030, 1, 17).unwrap())
            .unwrap();
        assert_eq!(lot.amount(), 1.5);
        assert_eq!(lot.unit(), ValidUnit::L);
        assert_eq!(lot.value(), 30.0);
    }

    #[test]
    fn test_add_ingredient_asks_for_missing_name_and_retries() {
        let mut session = session_with_storage();
        let (result, printed) = run(
            &mut session,
            "add ingredient",
            "flour\n2 cups\n2 kg\n-1\n3.5\n30\n",
        );
        result.unwrap();
        assert!(printed.contains("unknown unit 'cups'"));
        assert!(printed.contains("cannot be negative"));
        assert!(session.inventory.active().unwrap().is_ingredient_present("Flour"));
    }

    #[test]
    fn test_abort_leaves_storage_untouched() {
        let mut session = session_with_storage();
        let (result, _) = run(&mut session, "add ingredient milk", "1 l\nABoRT\n");
        assert!(matches!(
            result,
            Err(CommandError::Interrupted(Interrupt::Aborted))
        ));
        assert!(session.inventory.active().unwrap().is_empty());
    }

    #[test]
    fn test_add_ingredient_needs_active_storage() {
        let mut session = Session::new(Clock::Fixed(today()));
        let (result, printed) = run(&mut session, "add ingredient milk", "1 l\n");
        assert!(matches!(result, Err(CommandError::NoActiveStorage)));
        assert!(printed.is_empty());
    }

    #[test]
    fn test_add_ingredient_checks_storage_before_asking_for_a_name() {
        let mut session = Session::new(Clock::Fixed(today()));
        let (result, printed) = run(&mut session, "add ingredient", "milk\n1 l\n");
        assert!(matches!(result, Err(CommandError::NoActiveStorage)));
        assert!(printed.is_empty());
    }

    #[test]
    fn test_find_ingredient_shows_price_per_base_unit() {
        let mut session = session_with_storage();
        let expiry = today().checked_add_days(Days::new(4)).unwrap();
        let cheese = Ingredient::new("cheese", 500.0, ValidUnit::G, 60.0, expiry).unwrap();
        session
            .inventory
            .active_mut()
            .unwrap()
            .add_ingredient(cheese)
            .unwrap();

        let (result, printed) = run(&mut session, "find ingredient Cheese", "");
        result.unwrap();
        assert!(printed.contains("Cheese: 500.00 G, value 60.00"));
        assert!(printed.contains("price per KG: 120.00"));
    }

    #[test]
    fn test_clear_history_reports_how_much_was_forgotten() {
        let mut session = session_with_storage();
        session.inventory.create_storage("Pantry").unwrap();
        run(&mut session, "go storage pantry", "").0.unwrap();

        let (_, printed) = run(&mut session, "clear history", "");
        assert!(printed.contains("Successfully cleared 1 storage(s) from the history."));
        let (_, printed) = run(&mut session, "go back", "");
        assert!(printed.contains("no previous storage"));
    }

    #[test]
    fn test_first_storage_becomes_active() {
        let mut session = Session::new(Clock::Fixed(today()));
        run(&mut session, "add storage Pantry", "").0.unwrap();
        run(&mut session, "add inventory", "Cellar\n").0.unwrap();
        assert_eq!(session.inventory.active().unwrap().name(), "Pantry");
        let (result, _) = run(&mut session, "add storage pantry", "");
        assert!(matches!(result, Err(CommandError::DuplicateStorage(_))));
    }

    #[test]
    fn test_remove_ingredient_asks_which_lot() {
        let mut session = session_with_storage();
        stock(&mut session, "milk", 1.0, ValidUnit::L, 3);
        stock(&mut session, "milk", 2.0, ValidUnit::L, 9);

        let (result, printed) = run(&mut session, "remove ingredient milk", "0\n2\n");
        result.unwrap();
        assert!(printed.contains("1. Milk: 1.00 L"));
        assert!(printed.contains("2. Milk: 2.00 L"));

        let lots = session
            .inventory
            .active()
            .unwrap()
            .find_ingredient("milk")
            .unwrap();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].amount(), 1.0);
    }

    #[test]
    fn test_remove_expired() {
        let mut session = session_with_storage();
        let (_, printed) = run(&mut session, "remove expired", "");
        assert!(printed.contains("nothing to check"));

        let yesterday = today().pred_opt().unwrap();
        let old = Ingredient::new("yoghurt", 0.5, ValidUnit::L, 4.0, yesterday).unwrap();
        let storage = session.inventory.active_mut().unwrap();
        storage.add_ingredient(old).unwrap();
        stock(&mut session, "butter", 250.0, ValidUnit::G, 0);

        let (result, printed) = run(&mut session, "remove expired", "");
        result.unwrap();
        assert!(printed.contains("Yoghurt"));
        assert!(printed.contains("Successfully removed 1 expired ingredient(s)."));
        let storage = session.inventory.active().unwrap();
        assert!(!storage.is_ingredient_present("yoghurt"));
        assert!(storage.is_ingredient_present("butter"));
    }

    #[test]
    fn test_recipe_round_trip() {
        let mut session = session_with_storage();
        stock(&mut session, "flour", 1.0, ValidUnit::Kg, 30);
        stock(&mut session, "milk", 5.0, ValidUnit::Dl, 5);

        let (result, _) = run(
            &mut session,
            "add recipe Pancakes",
            "2\nflour\n300 g\nmilk\n0.4 l\n",
        );
        result.unwrap();

        let (result, printed) = run(&mut session, "find recipe pancakes", "");
        result.unwrap();
        assert!(printed.contains("Flour: 0.30 KG"));
        assert!(printed.contains("Successfully verified"));

        run(&mut session, "add recipe Cake", "1\nmilk\n1 l\n").0.unwrap();
        let (_, printed) = run(&mut session, "find recipe cake", "");
        assert!(printed.contains("Failed: could not verify"));

        run(&mut session, "remove recipe CAKE", "").0.unwrap();
        let (result, _) = run(&mut session, "find recipe cake", "");
        assert!(matches!(result, Err(CommandError::UnknownRecipe(_))));
    }

    #[test]
    fn test_go_and_back() {
        let mut session = session_with_storage();
        session.inventory.create_storage("Pantry").unwrap();

        let (_, printed) = run(&mut session, "go storage pantry", "");
        assert!(printed.contains("Successfully moved to Pantry."));
        let (_, printed) = run(&mut session, "go back", "");
        assert!(printed.contains("Successfully moved back to Fridge."));
        let (_, printed) = run(&mut session, "go back", "");
        assert!(printed.contains("no previous storage"));
        assert_eq!(session.inventory.active().unwrap().name(), "Fridge");
    }

    #[test]
    fn test_stats() {
        let mut session = session_with_storage();
        stock(&mut session, "milk", 1.0, ValidUnit::L, 3);
        stock(&mut session, "eggs", 0.5, ValidUnit::Kg, 3);

        let (_, printed) = run(&mut session, "stats value", "");
        assert_eq!(printed, "Total value of Fridge: 20.00\n");

        let (_, printed) = run(&mut session, "stats expired", "");
        assert!(printed.contains("0 expired ingredient(s)"));
        assert!(printed.contains("Value of expired ingredients: 0.00"));
    }

    #[test]
    fn test_help_and_exit_and_unknown() {
        let mut session = session_with_storage();
        let (_, printed) = run(&mut session, "help", "");
        assert!(printed.starts_with("Commands:"));
        let (_, printed) = run(&mut session, "help GO", "");
        assert!(printed.contains("go back"));
        let (_, printed) = run(&mut session, "fly to the moon", "");
        assert!(printed.contains("Unknown command"));
        assert!(!session.should_exit);

        run(&mut session, "exit now please", "").0.unwrap();
        assert!(session.should_exit);
    }
}
