//! Line-oriented terminal front end.
//!
//! The shell parses one command per input line, runs it against `AppState`, and
//! turns `StateChange` notifications into printable lines. It holds no business
//! state of its own; everything it shows is read back from `AppState`.
//!
//! Commands (verbs are case-insensitive):
//! `search <text>`, `add <SYMBOL>`, `remove <SYMBOL>`, `list`, `quote <SYMBOL>`,
//! `close`, `ok`, `refresh`, `help`, `quit`.
use std::str::FromStr;

use chrono::DateTime;
use strum_macros::{Display, EnumString};
use thiserror::Error;
use watchlist_common::{Quote, Symbol, SymbolSearch};

use crate::app::{AppState, StateChange};

/// Maximum number of search hits printed at once.
pub const SEARCH_LIMIT: usize = 25;

/// Recognised command verbs.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Verb {
    Search,
    Add,
    Remove,
    List,
    Quote,
    Close,
    #[strum(serialize = "ok")]
    Dismiss,
    Refresh,
    Help,
    Quit,
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    /// What to do.
    pub verb: Verb,
    /// Trimmed remainder of the line; may be empty.
    pub argument: String,
}

/// Why an input line could not be turned into a command.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// The line was blank.
    #[error("empty command")]
    Empty,
    /// The first word is not a known verb.
    #[error("unknown command '{0}', type 'help' for the list")]
    UnknownVerb(String),
    /// The verb needs a symbol argument.
    #[error("'{0}' needs a symbol, e.g. '{0} AAPL'")]
    MissingSymbol(Verb),
}

impl FromStr for ShellCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        if head.is_empty() {
            return Err(CommandError::Empty);
        }
        let verb = Verb::from_str(head).map_err(|_| CommandError::UnknownVerb(head.to_string()))?;
        let needs_symbol = matches!(verb, Verb::Add | Verb::Remove | Verb::Quote);
        if needs_symbol && rest.is_empty() {
            return Err(CommandError::MissingSymbol(verb));
        }
        let argument = if needs_symbol {
            rest.to_uppercase()
        } else {
            rest.to_string()
        };
        Ok(ShellCommand { verb, argument })
    }
}

/// What the input loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Print these lines and keep reading.
    Continue(Vec<String>),
    /// Leave the loop.
    Quit,
}

/// Stateless command interpreter.
#[derive(Debug, Default)]
pub struct Shell;

impl Shell {
    /// Creates a shell.
    pub fn new() -> Self {
        Shell
    }

    /// Parses and runs one input line.
    pub fn execute(&self, state: &mut AppState, line: &str) -> Outcome {
        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(CommandError::Empty) => return Outcome::Continue(Vec::new()),
            Err(e) => return Outcome::Continue(vec![format!("Error: {}", e)]),
        };

        if state.has_error() && !matches!(command.verb, Verb::Dismiss | Verb::Help | Verb::Quit) {
            return Outcome::Continue(vec![String::from("Dismiss the error first with 'ok'.")]);
        }

        let lines = match command.verb {
            Verb::Quit => return Outcome::Quit,
            Verb::Help => help_lines(),
            Verb::Search => self.search(state, &command.argument),
            Verb::List => render_watchlist(state.watchlist()),
            Verb::Add => self.add(state, &command.argument),
            Verb::Remove => self.remove(state, &command.argument),
            Verb::Quote => self.quote(state, &command.argument),
            Verb::Close => {
                state.close_detail();
                Vec::new()
            }
            Verb::Dismiss => {
                if state.dismiss_error() {
                    Vec::new()
                } else {
                    vec![String::from("Nothing to dismiss.")]
                }
            }
            Verb::Refresh => {
                if state.fetch_symbol_catalog() {
                    Vec::new()
                } else if state.is_loading_symbols() {
                    vec![String::from("Stocks are still loading.")]
                } else {
                    vec![format!("Catalog already loaded ({} symbols).", state.catalog().len())]
                }
            }
        };
        Outcome::Continue(lines)
    }

    fn search(&self, state: &AppState, query: &str) -> Vec<String> {
        if state.is_loading_symbols() {
            return vec![String::from("Loading stocks...")];
        }
        let hits = state.search(query);
        if hits.is_empty() {
            return vec![String::from("No matching stocks.")];
        }
        let mut lines: Vec<String> = hits
            .iter()
            .take(SEARCH_LIMIT)
            .map(|s| format!("  {:<10} {}", s.symbol, s.description))
            .collect();
        if hits.len() > SEARCH_LIMIT {
            lines.push(format!("  ... and {} more, refine the search", hits.len() - SEARCH_LIMIT));
        }
        lines
    }

    fn add(&self, state: &mut AppState, identity: &str) -> Vec<String> {
        let Some(symbol) = state.catalog().find(identity).cloned() else {
            return vec![format!("Error: {} is not in the {} catalog.", identity, state.exchange())];
        };
        if state.add(symbol) {
            Vec::new()
        } else {
            vec![format!("{} is already in the watchlist.", identity)]
        }
    }

    fn remove(&self, state: &mut AppState, identity: &str) -> Vec<String> {
        let Some(symbol) = state.watchlist().find(identity).cloned() else {
            return vec![format!("Error: {} is not in the watchlist.", identity)];
        };
        state.remove(&symbol);
        Vec::new()
    }

    fn quote(&self, state: &mut AppState, identity: &str) -> Vec<String> {
        let Some(symbol) = state.watchlist().find(identity).cloned() else {
            return vec![format!("Error: add {} to the watchlist first.", identity)];
        };
        state.select(symbol);
        Vec::new()
    }

    /// Lines to print for a state change.
    pub fn describe(&self, state: &AppState, change: &StateChange) -> Vec<String> {
        match change {
            StateChange::CatalogLoading => vec![String::from("Loading stocks...")],
            StateChange::CatalogUpdated { count } => {
                vec![format!("Loaded {} stocks from {}.", count, state.exchange())]
            }
            StateChange::WatchlistUpdated => render_watchlist(state.watchlist()),
            StateChange::QuoteLoading { .. } | StateChange::QuoteUpdated { .. } => match state.selected() {
                Some(symbol) => render_detail(symbol, state.quote()),
                None => Vec::new(),
            },
            StateChange::SelectionCleared => Vec::new(),
            StateChange::ErrorRaised { message, .. } => {
                vec![format!("Error: {}", message), String::from("Type 'ok' to dismiss.")]
            }
            StateChange::ErrorDismissed => Vec::new(),
        }
    }
}

/// The `help` text.
pub fn help_lines() -> Vec<String> {
    [
        "search <text>    list catalog stocks whose symbol or name contains <text>",
        "add <SYMBOL>     add a catalog stock to the watchlist",
        "remove <SYMBOL>  remove a stock from the watchlist",
        "list             show the watchlist",
        "quote <SYMBOL>   show the live quote of a watchlist stock",
        "close            close the quote view",
        "ok               dismiss the current error",
        "refresh          retry loading the catalog if it is empty",
        "quit             exit",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}

/// The "Added Stocks" section.
pub fn render_watchlist(symbols: &[Symbol]) -> Vec<String> {
    let mut lines = vec![String::from("Added Stocks")];
    if symbols.is_empty() {
        lines.push(String::from("  No stocks added yet."));
    } else {
        lines.extend(symbols.iter().map(|s| format!("  {:<10} {}", s.symbol, s.description)));
    }
    lines
}

/// The detail view for `symbol`; shows a loading line until `quote` is present.
pub fn render_detail(symbol: &Symbol, quote: Option<&Quote>) -> Vec<String> {
    let mut lines = vec![
        symbol.description.clone(),
        format!("Symbol: {}", symbol.symbol),
    ];
    let Some(quote) = quote else {
        lines.push(String::from("Loading stock data..."));
        return lines;
    };
    let arrow = if quote.is_up() { "▲" } else { "▼" };
    lines.push(format!("Current Price: ${:.2}", quote.current_price));
    lines.push(format!("Change: {} {:.2}", arrow, quote.change));
    lines.push(format!("Percentage Change: {} {:.2}%", arrow, quote.change_percent));
    lines.push(format!(
        "Open {:.2}  High {:.2}  Low {:.2}  Prev Close {:.2}",
        quote.open, quote.high, quote.low, quote.previous_close
    ));
    if let Some(at) = quote.timestamp.and_then(|t| DateTime::from_timestamp(t, 0)) {
        lines.push(format!("As of {}", at.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    lines
}
