//! Interactive command loop: one blocking prompt per iteration, with
//! fuzzy-matched suggestions over the fixed command set plus the current
//! instance labels. The label map is rebuilt every iteration because a
//! refresh can replace the whole inventory mid-session.

use std::cell::RefCell;
use std::collections::HashMap;

use comfy_table::{modifiers, presets, ContentArrangement, Table};
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32String};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{
    CompletionType, Config as ReadlineConfig, Context, Editor, Helper, Highlighter, Hinter,
    Validator,
};
use terminal_size::{terminal_size, Width};
use yansi::Paint;

use crate::cache;
use crate::config::Config;
use crate::connect;
use crate::error::{JumpError, Result};
use crate::inventory;
use crate::record::InstanceRecord;

/// Fixed commands always offered alongside instance labels.
pub const COMMANDS: &[&str] = &["exit", "quit", "refresh", "list"];

const PROMPT: &str = "Select instance or command (exit, refresh, list): ";

/// What one line of user input asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// `exit` or `quit`.
    Terminate,
    /// `refresh`: force-refetch the inventory.
    Refresh,
    /// `list`: print the inventory table; no state changes.
    List,
    /// Empty input.
    Noop,
    /// Input matched a displayed instance label exactly.
    Connect(InstanceRecord),
    /// Anything else.
    Unknown(String),
}

/// Map normalized input to an action. Command words are matched
/// case-insensitively; instance labels must match as displayed.
pub fn interpret(input: &str, labels: &HashMap<String, InstanceRecord>) -> Action {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Action::Noop;
    }
    match trimmed.to_lowercase().as_str() {
        "exit" | "quit" => return Action::Terminate,
        "refresh" => return Action::Refresh,
        "list" => return Action::List,
        _ => {}
    }
    match labels.get(trimmed) {
        Some(record) => Action::Connect(record.clone()),
        None => Action::Unknown(trimmed.to_string()),
    }
}

/// Display label -> record, valid for one loop iteration only.
pub fn label_map(records: &[InstanceRecord]) -> HashMap<String, InstanceRecord> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| (record.label(i), record.clone()))
        .collect()
}

/// Completion candidates for the current iteration: the command set
/// followed by the instance labels in inventory order.
pub fn suggestions(records: &[InstanceRecord]) -> Vec<String> {
    let mut all: Vec<String> = COMMANDS.iter().map(|c| c.to_string()).collect();
    all.extend(records.iter().enumerate().map(|(i, r)| r.label(i)));
    all
}

/// Case-insensitive fuzzy ranking over a fixed candidate list.
pub struct FuzzyCompleter {
    candidates: Vec<String>,
    matcher: RefCell<Matcher>,
}

impl FuzzyCompleter {
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            matcher: RefCell::new(Matcher::new(nucleo_matcher::Config::DEFAULT)),
        }
    }

    /// Candidates matching `input` as a fuzzy subsequence, best first.
    /// Empty input yields every candidate in original order.
    pub fn ranked(&self, input: &str) -> Vec<String> {
        if input.trim().is_empty() {
            return self.candidates.clone();
        }
        let pattern = Pattern::parse(input, CaseMatching::Ignore, Normalization::Smart);
        let mut matcher = self.matcher.borrow_mut();
        let mut scored: Vec<(u32, &String)> = self
            .candidates
            .iter()
            .filter_map(|candidate| {
                let haystack = Utf32String::from(candidate.as_str());
                pattern
                    .score(haystack.slice(..), &mut matcher)
                    .map(|score| (score, candidate))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, c)| c.clone()).collect()
    }
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct PromptHelper {
    completer: FuzzyCompleter,
}

impl PromptHelper {
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            completer: FuzzyCompleter::new(candidates),
        }
    }
}

impl Completer for PromptHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let pairs = self
            .completer
            .ranked(&line[..pos])
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        // Replace the whole line: labels contain spaces.
        Ok((0, pairs))
    }
}

/// Print one formatted row per record.
pub fn display_instances(records: &[InstanceRecord]) {
    if records.is_empty() {
        println!("No running instance data available.");
        return;
    }
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w - 4);
    }
    table.set_header(vec!["#", "Name", "Instance ID", "Private IP", "User", "Key", "AMI"]);
    for (i, record) in records.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            record.name.clone(),
            record.instance_id.clone(),
            record.private_ip.clone(),
            record.target_user.clone(),
            record.key_name.clone(),
            record.image_name.clone(),
        ]);
    }
    println!("\n{table}\n");
}

/// Run the command loop until the user exits or input ends.
///
/// Ctrl+C aborts only the current read; end-of-input terminates the loop.
/// A connection attempt always returns to the prompt, whatever its outcome.
pub async fn run_loop(
    config: &Config,
    client: &aws_sdk_ec2::Client,
    mut records: Vec<InstanceRecord>,
) -> Result<()> {
    let readline_config = ReadlineConfig::builder()
        .completion_type(CompletionType::List)
        .build();
    let mut editor: Editor<PromptHelper, FileHistory> =
        Editor::with_config(readline_config).map_err(|e| JumpError::Prompt(e.to_string()))?;
    editor.load_history(&config.history_file).ok();

    loop {
        let labels = label_map(&records);
        editor.set_helper(Some(PromptHelper::new(suggestions(&records))));

        match editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                match interpret(&line, &labels) {
                    Action::Noop => continue,
                    Action::Terminate => break,
                    Action::Refresh => {
                        records = cache::load_or_refresh(&config.cache_file, true, || {
                            inventory::fetch(client, &config.region)
                        })
                        .await;
                    }
                    Action::List => display_instances(&records),
                    Action::Connect(record) => connect::connect(&record, config),
                    Action::Unknown(text) => println!(
                        "Unknown command or instance: '{}'. Use Tab for suggestions.",
                        text
                    ),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!(
                    "{}",
                    Paint::new("Operation cancelled (Ctrl+C). Type 'exit' or 'quit' to leave.")
                        .yellow()
                );
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                tracing::error!(%e, "prompt read failed");
                return Err(JumpError::Prompt(e.to_string()));
            }
        }
    }

    editor.save_history(&config.history_file).ok();
    println!("Goodbye!");
    Ok(())
}
