//! Line-oriented console boundary and the prompt loops built on it.
//!
//! Every interactive flow reads through [`Console`], so the same code runs
//! against the terminal and against a [`ScriptedConsole`] in tests.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Prompt/read/print primitives.
pub trait Console {
    /// Show `prompt` and read one line of input, without the line ending.
    ///
    /// End of input is an error: the session cannot continue without a user.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Print one line.
    fn print(&mut self, line: &str) -> io::Result<()>;

    /// Clear the screen before a new step.
    fn clear(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// stdin/stdout console.
#[derive(Debug, Default)]
pub struct TerminalConsole {
    /// Skip screen clearing (useful when output is piped or logged)
    pub keep_scrollback: bool,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "console input closed",
            ));
        }
        Ok(strip_line_ending(line))
    }

    fn print(&mut self, line: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{}", line)
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.keep_scrollback {
            return Ok(());
        }
        crossterm::execute!(
            io::stdout(),
            crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
            crossterm::cursor::MoveTo(0, 0)
        )
    }
}

fn strip_line_ending(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}

/// Console fed from a fixed list of inputs, capturing everything printed.
///
/// Used by tests and scripted demos. Running out of inputs behaves like a
/// closed terminal.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    output: Vec<String>,
    prompts: Vec<String>,
    clears: usize,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Lines printed so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Prompts shown so far, one per input consumed.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Inputs not consumed yet.
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }

    /// Screen clears requested so far.
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Whether any printed line contains `needle`.
    pub fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        self.inputs.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "scripted input exhausted")
        })
    }

    fn print(&mut self, line: &str) -> io::Result<()> {
        self.output.extend(line.lines().map(str::to_string));
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.clears += 1;
        Ok(())
    }
}

/// Ask a yes/no question. Empty input, `y` and `Y` mean yes.
pub fn confirm(console: &mut dyn Console, msg: &str) -> io::Result<bool> {
    let answer = console.read_line(&format!("{} (Y/n): ", msg))?;
    Ok(matches!(answer.trim(), "" | "y" | "Y"))
}

/// State of a numbered-selection prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickState {
    /// Waiting for a valid answer
    Prompting,
    /// The abort sentinel `0` was entered
    Aborted,
    /// A 1-based index in range was entered
    Selected(usize),
}

/// The abort sentinel in every numbered selection menu.
pub const ABORT_SENTINEL: usize = 0;

impl PickState {
    /// Transition for one line of input against a menu of `1..=count`.
    ///
    /// With `allow_abort`, `0` ends the prompt as [`PickState::Aborted`].
    /// Anything else that is not an in-range number keeps prompting.
    pub fn advance(input: &str, count: usize, allow_abort: bool) -> Self {
        match input.trim().parse::<usize>() {
            Ok(ABORT_SENTINEL) if allow_abort => Self::Aborted,
            Ok(n) if (1..=count).contains(&n) => Self::Selected(n),
            _ => Self::Prompting,
        }
    }
}

/// Prompt until a number in `1..=count` is entered, or `0` when `allow_abort`.
///
/// Returns the 1-based selection, `None` on abort.
pub fn select_index(
    console: &mut dyn Console,
    msg: &str,
    count: usize,
    allow_abort: bool,
) -> io::Result<Option<usize>> {
    let lower = if allow_abort { ABORT_SENTINEL } else { 1 };
    loop {
        let input = console.read_line(msg)?;
        match PickState::advance(&input, count, allow_abort) {
            PickState::Aborted => return Ok(None),
            PickState::Selected(n) => return Ok(Some(n)),
            PickState::Prompting => {
                console.print(&format!(
                    "Invalid input. Please enter a number between {} and {}",
                    lower, count
                ))?;
            }
        }
    }
}

/// Prompt until a number in `1..=count` is entered. Returns the 1-based selection.
pub fn select_in_range(console: &mut dyn Console, msg: &str, count: usize) -> io::Result<usize> {
    loop {
        let input = console.read_line(msg)?;
        if let PickState::Selected(n) = PickState::advance(&input, count, false) {
            return Ok(n);
        }
        console.print(&format!(
            "Invalid input. Please enter a number between 1 and {}",
            count
        ))?;
    }
}
