use anyhow::{Context, Result};
use colored::Colorize;
use log::warn;
use std::io::{self, BufRead, Write};

use platte_game::{
    ActionOutcome, CrossingChoice, GameStorage, JourneyHooks, JourneySession, JourneySummary,
    Landmark, RiverPrompt, TradeDesk, TurnAction, TurnReport, game_over_message,
};

const HELP: &str = "Commands:
  travel <direction> <miles>   walk beside the wagon for a day
  rest                         camp for a day
  hunt                         hunt for a day (needs a weapon and ammunition)
  use <item>                   use medicine, food or a spare part
  buy <item> <qty>             trade at a trading post
  sell <item> <qty>
  inventory                    list supplies, the wagon and the oxen
  status | save | quit | help";

/// Invalid answers tolerated before a river prompt falls back to fording.
const MAX_BAD_ANSWERS: u32 = 5;

/// Line-oriented terminal: prompts on `output`, reads answers from `input`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompt and read one trimmed line; `None` at end of input.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn say(&mut self, line: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

struct ConsoleHooks<'a, R, W> {
    console: &'a mut Console<R, W>,
}

impl<R: BufRead, W: Write> ConsoleHooks<'_, R, W> {
    fn ask_crossing(&mut self, prompt: &RiverPrompt) -> io::Result<CrossingChoice> {
        let c = &mut *self.console;
        c.say(format!(
            "{} {} (prompt {})",
            "🌊".blue(),
            prompt.landmark.bold(),
            prompt.attempt
        ))?;
        c.say(format!(
            "   The river is {:.1} feet deep and {:.0} feet wide. Fording succeeds {}% of the time.",
            prompt.conditions.depth, prompt.conditions.width, prompt.ford_chance
        ))?;
        c.say(format!(
            "   1) ford  2) ferry (${})  3) guide (${})  4) wait a day     You have ${}.",
            prompt.ferry_cost, prompt.guide_cost, prompt.money
        ))?;
        for _ in 0..MAX_BAD_ANSWERS {
            let Some(answer) = c.prompt("crossing> ")? else {
                return Ok(CrossingChoice::Ford);
            };
            match answer.to_ascii_lowercase().parse::<CrossingChoice>() {
                Ok(choice) => return Ok(choice),
                Err(()) => c.say("Please answer ford, ferry, guide or wait.")?,
            }
        }
        Ok(CrossingChoice::Ford)
    }

    fn run_trading(&mut self, landmark: &Landmark, desk: &mut TradeDesk<'_>) -> io::Result<()> {
        let c = &mut *self.console;
        c.say(format!("{} {} has a trading post.", "🏪".yellow(), landmark.name.bold()))?;
        for listing in desk.listings() {
            c.say(format!("   {:<18} ${}", listing.name, listing.price))?;
        }
        c.say(format!(
            "   You have ${}. Enter `buy <item> <qty>`, `sell <item> <qty>` or `done`.",
            desk.state().money()
        ))?;
        while let Some(line) = c.prompt("trade> ")? {
            if line.is_empty() || line.eq_ignore_ascii_case("done") {
                break;
            }
            let result = match line.parse::<TurnAction>() {
                Ok(TurnAction::Buy { item, quantity }) => u32::try_from(quantity)
                    .map_err(|_| format!("quantity out of range: {quantity}"))
                    .and_then(|qty| desk.buy(&item, qty).map_err(|err| err.to_string())),
                Ok(TurnAction::Sell { item, quantity }) => u32::try_from(quantity)
                    .map_err(|_| format!("quantity out of range: {quantity}"))
                    .and_then(|qty| desk.sell(&item, qty).map_err(|err| err.to_string())),
                Ok(_) => Err(String::from("only buy, sell or done here")),
                Err(err) => Err(err.to_string()),
            };
            match result {
                Ok(trade) => c.say(trade.to_string().green())?,
                Err(reason) => c.say(reason.red())?,
            }
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> JourneyHooks for ConsoleHooks<'_, R, W> {
    fn choose_crossing(&mut self, prompt: &RiverPrompt) -> CrossingChoice {
        self.ask_crossing(prompt).unwrap_or_else(|err| {
            warn!("console unavailable at {}: {err}; fording", prompt.landmark);
            CrossingChoice::Ford
        })
    }

    fn trade_opportunity(&mut self, landmark: &Landmark, desk: &mut TradeDesk<'_>) {
        if let Err(err) = self.run_trading(landmark, desk) {
            warn!("console unavailable at {}: {err}", landmark.name);
        }
    }
}

fn print_report<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    report: &TurnReport,
) -> io::Result<()> {
    console.say(format!("{} {}", format!("Day {}", report.day).bold(), report.date))?;
    if report.miles > 0 {
        console.say(format!("   You traveled {} miles.", report.miles))?;
    }
    for message in &report.messages {
        console.say(format!("   {message}"))?;
    }
    Ok(())
}

/// Interactive loop over one journey. Ends on quit, end of input, or the journey's end.
///
/// # Errors
///
/// Returns an error when the terminal fails or a save cannot be written.
pub fn play<R, W, S>(
    session: &mut JourneySession,
    console: &mut Console<R, W>,
    storage: &S,
    save_name: &str,
) -> Result<JourneySummary>
where
    R: BufRead,
    W: Write,
    S: GameStorage,
{
    console.say(format!(
        "{} {} sets out from {} on the {}.",
        "🐂".bright_yellow(),
        session.state().player.name.bold(),
        session.state().trail.start(),
        session.state().trail.variant()
    ))?;
    console.say("Type `help` for commands.")?;
    console.say(session.status())?;

    while !session.is_over() {
        let Some(line) = console.prompt("> ")? else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("help") || line == "?" {
            console.say(HELP)?;
            continue;
        }
        let action = match line.parse::<TurnAction>() {
            Ok(action) => action,
            Err(err) => {
                console.say(err.to_string().red())?;
                continue;
            }
        };
        let outcome = session.act(action, &mut ConsoleHooks { console: &mut *console });
        match outcome {
            Ok(ActionOutcome::Turn(report)) => {
                print_report(console, &report)?;
                console.say(session.status())?;
            }
            Ok(ActionOutcome::Traded(trade)) => console.say(trade.to_string().green())?,
            Ok(ActionOutcome::ItemUsed(used)) => console.say(used.describe())?,
            Ok(ActionOutcome::Status(line)) => console.say(line)?,
            Ok(ActionOutcome::Inventory(lines)) => {
                for line in lines {
                    console.say(format!("  {line}"))?;
                }
            }
            Ok(ActionOutcome::SaveRequested) => {
                storage
                    .save_game(save_name, session.state())
                    .with_context(|| format!("failed to save '{save_name}'"))?;
                console.say(format!("Saved as '{save_name}'."))?;
            }
            Ok(ActionOutcome::Quit) => break,
            Err(err) => console.say(err.to_string().red())?,
        }
    }

    if let Some(message) = game_over_message(session.state()) {
        console.say(message.bold())?;
    }
    Ok(JourneySummary::from_state(session.state()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonFileStorage;
    use platte_game::{JourneyCfg, JourneySetup};
    use std::io::Cursor;

    fn run_script(script: &str, seed: u64) -> (JourneySession, String) {
        colored::control::set_override(false);
        let mut session =
            JourneySession::new(&JourneySetup::default(), seed, JourneyCfg::default()).unwrap();
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let storage = JsonFileStorage::new(std::env::temp_dir().join("platte-console-tests"));
        play(&mut session, &mut console, &storage, "console_test").unwrap();
        let text = String::from_utf8(console.into_output()).unwrap();
        (session, text)
    }

    #[test]
    fn scripted_session_travels_and_reports() {
        let (session, text) = run_script("status\nbuy rations 10\ntravel west 10\nquit\n", 3);
        assert!(text.contains("Bought 10 Rations for $10."));
        assert!(text.contains("Day 1"));
        assert_eq!(session.state().day, 1);
    }

    #[test]
    fn inventory_lists_item_names_for_use() {
        let (session, text) = run_script("check inventory
use medicine
", 5);
        assert!(text.contains("  Medicine x3 (3 lbs, worth $15)"));
        assert!(text.contains("  Oxen: Ox 1 (100)"));
        assert_eq!(session.state().inventory.quantity_of("medicine"), 2);
        assert_eq!(session.state().day, 0);
    }

    #[test]
    fn bad_commands_are_reported_and_skipped() {
        let (session, text) = run_script("dance\ntravel west -4\nhelp\n", 4);
        assert!(text.contains("unrecognised command"));
        assert!(text.contains("miles out of range: -4"));
        assert!(text.contains("Commands:"));
        assert_eq!(session.state().day, 0);
    }

    #[test]
    fn end_of_input_at_a_river_fords() {
        let mut prompt_console = Console::new(Cursor::new(Vec::new()), Vec::new());
        let mut hooks = ConsoleHooks {
            console: &mut prompt_console,
        };
        let prompt = RiverPrompt {
            landmark: String::from("Kansas River Crossing"),
            conditions: platte_game::RiverConditions {
                depth: 2.0,
                width: 10.0,
            },
            ford_chance: 70,
            ferry_cost: 5,
            guide_cost: 10,
            money: 100,
            attempt: 1,
        };
        assert_eq!(hooks.choose_crossing(&prompt), CrossingChoice::Ford);
    }

    #[test]
    fn river_prompt_accepts_numbered_answers() {
        let mut console = Console::new(Cursor::new(b"swim\n2\n".to_vec()), Vec::new());
        let mut hooks = ConsoleHooks {
            console: &mut console,
        };
        let prompt = RiverPrompt {
            landmark: String::from("Council Bluffs"),
            conditions: platte_game::RiverConditions {
                depth: 6.0,
                width: 40.0,
            },
            ford_chance: 20,
            ferry_cost: 5,
            guide_cost: 10,
            money: 100,
            attempt: 1,
        };
        assert_eq!(hooks.choose_crossing(&prompt), CrossingChoice::Ferry);
        let text = String::from_utf8(console.into_output()).unwrap();
        assert!(text.contains("Please answer ford, ferry, guide or wait."));
    }
}
