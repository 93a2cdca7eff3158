// DexTracker - shell.rs
//
// Interactive terminal front end. Reads commands line by line, drives the
// Tracker, and supplies the classification prompt on the same input.
//
// Generic over the reader/writer so the whole loop runs in tests against
// in-memory buffers.

use crate::app::tracker::Tracker;
use crate::core::display;
use crate::core::filter::{self, ListFilter};
use crate::core::lookup::{Classification, ClassificationPrompt, LookupOutcome};
use crate::core::model::Side;
use crate::util::constants;
use std::io::{self, BufRead, Write};
use std::path::Path;

const HELP: &str = "\
Commands:
  search <name>         look up an entry (partial names work)
  <name>                same as search
  list [text]           list history and log entries, optionally filtered
  load <path>           load a different stat log
  classify <mine|enemy> <name>
                        classify a log entry without being asked
  clear                 clear player and enemy history
  help                  show this help
  quit                  exit
";

/// Read one trimmed line. `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask whether `display_name` is the user's or an enemy's.
///
/// Blank input or end of input cancels; unrecognised answers re-ask.
pub fn ask_classification<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    display_name: &str,
) -> io::Result<Classification> {
    loop {
        write!(
            output,
            "Is {display_name} your Pokémon or an enemy? [y]ours / [e]nemy / Enter to cancel: "
        )?;
        output.flush()?;

        let Some(answer) = read_line(input)? else {
            writeln!(output)?;
            return Ok(Classification::Cancelled);
        };
        if answer.is_empty() {
            return Ok(Classification::Cancelled);
        }
        match answer.parse::<Side>() {
            Ok(side) => return Ok(side.into()),
            Err(e) => writeln!(output, "{e}")?,
        }
    }
}

/// `ClassificationPrompt` backed by a terminal (or any reader/writer pair).
pub struct TerminalPrompt<'a, R, W> {
    pub input: &'a mut R,
    pub output: &'a mut W,
}

impl<R: BufRead, W: Write> ClassificationPrompt for TerminalPrompt<'_, R, W> {
    fn classify(&mut self, display_name: &str) -> Classification {
        ask_classification(self.input, self.output, display_name).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Prompt failed; treating as cancelled");
            Classification::Cancelled
        })
    }
}

/// Text printed after a lookup, including the save status of a new
/// classification.
pub fn describe_outcome(outcome: &LookupOutcome) -> String {
    let mut text = display::outcome_text(outcome);
    if let LookupOutcome::Classified {
        side, entry, saved, ..
    } = outcome
    {
        let status = if *saved { "" } else { " (not saved)" };
        text = format!("Classified {} as {side}{status}.\n{text}", entry.name());
    }
    text
}

enum Flow {
    Continue,
    Quit,
}

/// The read-eval-print loop.
pub struct Shell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run until `quit` or end of input.
    pub fn run(&mut self, tracker: &mut Tracker) -> io::Result<()> {
        writeln!(
            self.output,
            "{} v{} - {} log entries, {} classified. Type 'help' for commands.",
            constants::APP_NAME,
            constants::APP_VERSION,
            tracker.log().len(),
            tracker.history().len()
        )?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = read_line(&mut self.input)? else {
                writeln!(self.output)?;
                break;
            };
            if line.is_empty() {
                continue;
            }
            if let Flow::Quit = self.execute(tracker, &line)? {
                break;
            }
        }
        Ok(())
    }

    fn execute(&mut self, tracker: &mut Tracker, line: &str) -> io::Result<Flow> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command.to_lowercase().as_str() {
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            "help" | "?" => write!(self.output, "{HELP}")?,
            "list" | "ls" => self.list(tracker, rest)?,
            "load" => self.load(tracker, rest)?,
            "clear" => self.clear(tracker)?,
            "classify" => self.classify(tracker, rest)?,
            "search" | "find" => self.search(tracker, rest)?,
            _ => self.search(tracker, line)?,
        }
        Ok(Flow::Continue)
    }

    fn search(&mut self, tracker: &mut Tracker, query: &str) -> io::Result<()> {
        let mut prompt = TerminalPrompt {
            input: &mut self.input,
            output: &mut self.output,
        };
        let outcome = tracker.lookup(query, &mut prompt);
        write!(self.output, "{}", describe_outcome(&outcome))
    }

    fn classify(&mut self, tracker: &mut Tracker, rest: &str) -> io::Result<()> {
        let Some((side, name)) = rest.split_once(char::is_whitespace) else {
            return writeln!(self.output, "Usage: classify <mine|enemy> <name>");
        };
        match side.parse::<Side>() {
            Ok(side) => {
                let outcome = tracker.classify_name(name.trim(), side);
                write!(self.output, "{}", describe_outcome(&outcome))
            }
            Err(e) => writeln!(self.output, "{e}"),
        }
    }

    fn list(&mut self, tracker: &Tracker, text: &str) -> io::Result<()> {
        let filter = ListFilter {
            text_search: text.to_string(),
            ..Default::default()
        };
        let sections = filter::apply_to_listing(tracker.listing(), &filter);
        write!(self.output, "{}", display::render_listing(&sections))
    }

    fn load(&mut self, tracker: &mut Tracker, path: &str) -> io::Result<()> {
        if path.is_empty() {
            return writeln!(self.output, "Usage: load <path>");
        }
        match tracker.load_log(Path::new(path)) {
            Ok(summary) => writeln!(self.output, "Loaded {} Pokémon.", summary.entries),
            Err(e) => writeln!(self.output, "Failed to load file: {e}"),
        }
    }

    fn clear(&mut self, tracker: &mut Tracker) -> io::Result<()> {
        write!(
            self.output,
            "Clear Player and Enemy history? This cannot be undone. [y/N]: "
        )?;
        self.output.flush()?;
        let confirmed = read_line(&mut self.input)?
            .map(|a| matches!(a.to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false);
        if !confirmed {
            return writeln!(self.output, "Kept history.");
        }
        match tracker.clear_history() {
            Ok(()) => writeln!(self.output, "History cleared."),
            Err(e) => writeln!(self.output, "History cleared in memory but not saved: {e}"),
        }
    }
}
