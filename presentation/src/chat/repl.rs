//! REPL (Read-Eval-Print Loop) for an interactive legion session

use crate::ConsoleFormatter;
use crate::config::ReplConfig;
use crate::progress::reporter::{ProgressReporter, SimpleProgress};
use colored::Colorize;
use legion_application::{
    LegionSession, LlmGateway, ProgressNotifier, SessionError, SessionReply,
};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use tracing::error;

const PROMPT: &str = "User: ";

/// Lines the REPL handles itself instead of passing to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Exit,
    ToggleVerbose,
    ToggleSpeech,
    ShowPool,
    Help,
    Unknown,
}

/// Recognise a REPL command. `None` means the line is conversation input.
pub fn parse_command(line: &str) -> Option<ReplCommand> {
    let line = line.trim();
    match line {
        "/quit" | "/exit" | "/q" => return Some(ReplCommand::Exit),
        "/verbose" | "VERBOSE" => return Some(ReplCommand::ToggleVerbose),
        "/tts" | "TTS" => return Some(ReplCommand::ToggleSpeech),
        "/pool" | "SHOW_CURRENT_CHARACTER_GROUP" => return Some(ReplCommand::ShowPool),
        "/help" | "/h" | "/?" => return Some(ReplCommand::Help),
        _ => {}
    }
    if matches!(line.to_lowercase().as_str(), "exit" | "stop" | "abort") {
        return Some(ReplCommand::Exit);
    }
    if line.starts_with('/') {
        return Some(ReplCommand::Unknown);
    }
    None
}

/// Interactive legion REPL
pub struct LegionRepl<G: LlmGateway + 'static> {
    session: LegionSession<G>,
    config: ReplConfig,
}

impl<G: LlmGateway + 'static> LegionRepl<G> {
    pub fn new(session: LegionSession<G>) -> Self {
        Self {
            session,
            config: ReplConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Run until an exit word or end of input, then save the session
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.config.resolved_history_file();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        println!();
        println!("{}", self.session.greeting().yellow());
        println!();

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    if let Some(command) = parse_command(line) {
                        if self.handle_command(command, line) {
                            break;
                        }
                        continue;
                    }

                    if !self.process_input(line).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        self.session.shutdown().await;
        println!("Bye!");

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Handle a REPL command. Returns true if the loop should end.
    fn handle_command(&mut self, command: ReplCommand, line: &str) -> bool {
        match command {
            ReplCommand::Exit => return true,
            ReplCommand::ToggleVerbose => {
                let verbose = !self.session.config().verbose;
                self.session.set_verbose(verbose);
                println!("Verbose mode {}", on_off(verbose));
            }
            ReplCommand::ToggleSpeech => {
                let speech = !self.session.config().speech;
                self.session.set_speech(speech);
                println!("Speech {}", on_off(speech));
            }
            ReplCommand::ShowPool => {
                println!("{}", ConsoleFormatter::format_pool(self.session.pool()));
            }
            ReplCommand::Help => print_help(),
            ReplCommand::Unknown => {
                println!("Unknown command: {}", line);
                println!("Type /help for available commands");
            }
        }
        false
    }

    /// Run one input through the session. Returns false on a hard stop.
    async fn process_input(&mut self, input: &str) -> bool {
        let verbose = self.session.config().verbose;
        let progress: Box<dyn ProgressNotifier> = if self.config.show_progress {
            Box::new(ProgressReporter::new(verbose))
        } else {
            Box::new(SimpleProgress)
        };

        match self.session.handle_input(input, progress.as_ref()).await {
            Ok(SessionReply::Round(report)) => {
                if let Some(reason) = &report.change.refused {
                    println!(
                        "{}",
                        ConsoleFormatter::format_warning(&format!(
                            "{} not applied: {}",
                            report.change.action, reason
                        ))
                    );
                }
                if verbose {
                    println!("{}", ConsoleFormatter::format_decision(&report.decision));
                    print!("{}", ConsoleFormatter::format_round_summary(&report));
                }
            }
            Ok(SessionReply::Panel(verdict)) => {
                println!("{}", ConsoleFormatter::format_verdict(&verdict));
            }
            Err(SessionError::EmptyInput) => {}
            Err(e @ SessionError::PoolExhausted(_)) => {
                error!("Ending session: {}", e);
                eprintln!("{} {}", "Error:".red().bold(), e);
                return false;
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
            }
        }
        println!();
        true
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  /help, /h, /?                       - Show this help");
    println!("  /pool, SHOW_CURRENT_CHARACTER_GROUP - Show the pool and popularity");
    println!("  /verbose, VERBOSE                   - Toggle verbose output");
    println!("  /tts, TTS                           - Toggle speech");
    println!("  exit, stop, abort, /quit            - Save and exit");
    println!();
    println!("Start a line with [MAGI] to ask the judges directly.");
    println!();
}
