//! Progress reporting for legion rounds

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use legion_application::ports::progress::ProgressNotifier;
use legion_domain::{ActionVote, BehaviorKind, JudgeVote, Speaker};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a judging bar and a spinner per backend call.
///
/// Turns are printed as they arrive; the bar or spinner is suspended while
/// a line is written so the two never interleave.
pub struct ProgressReporter {
    verbose: bool,
    judging: Mutex<Option<ProgressBar>>,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            judging: Mutex::new(None),
            spinner: Mutex::new(None),
        }
    }

    fn judging_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:20.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Print a line without tearing the active bar or spinner
    fn print_line(&self, line: &str) {
        let active = [&self.judging, &self.spinner].into_iter().find_map(|slot| {
            slot.lock().ok().and_then(|guard| guard.as_ref().cloned())
        });
        match active {
            Some(bar) => bar.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }

    fn clear(slot: &Mutex<Option<ProgressBar>>) {
        if let Ok(mut guard) = slot.lock()
            && let Some(bar) = guard.take()
        {
            bar.finish_and_clear();
        }
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_judging_start(&self, judges: usize) {
        let bar = ProgressBar::new(judges as u64);
        bar.set_style(Self::judging_style());
        bar.set_prefix("Judges");
        bar.set_message("deliberating...");
        bar.enable_steady_tick(Duration::from_millis(120));
        if let Ok(mut guard) = self.judging.lock() {
            *guard = Some(bar);
        }
    }

    fn on_vote_cast(&self, vote: &JudgeVote) {
        if let Ok(guard) = self.judging.lock()
            && let Some(bar) = guard.as_ref()
        {
            bar.set_message(format!("{} voted", vote.judge));
            bar.inc(1);
        }
        if self.verbose {
            self.print_line(&ConsoleFormatter::format_vote(vote));
        }
    }

    fn on_action_applied(&self, action: &ActionVote, events: &[String]) {
        Self::clear(&self.judging);
        if self.verbose {
            println!("{} {}", "Judges chose".cyan(), action.to_string().bold());
        }
        print!("{}", ConsoleFormatter::format_events(events));
    }

    fn on_turn(&self, speaker: &Speaker, text: &str) {
        self.print_line(&ConsoleFormatter::format_turn(speaker, text));
    }

    fn on_generation_start(&self, who: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_message(format!("{} is thinking...", who));
        spinner.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(previous) = guard.replace(spinner)
        {
            previous.finish_and_clear();
        }
    }

    fn on_generation_end(&self, _who: &str) {
        Self::clear(&self.spinner);
    }

    fn on_behavior(&self, actor: &str, kind: BehaviorKind) {
        if self.verbose {
            self.print_line(&ConsoleFormatter::format_behavior(actor, kind));
        }
    }

    fn on_memory_consolidated(&self, actor: &str, updated: bool) {
        if self.verbose && updated {
            self.print_line(&format!("  {} {} updated memory", "-".dimmed(), actor));
        }
    }

    fn on_warning(&self, message: &str) {
        Self::clear(&self.spinner);
        eprintln!("{}", ConsoleFormatter::format_warning(message));
    }

    fn on_panel_response(&self, judge: &str, _text: &str) {
        if self.verbose {
            self.print_line(&format!("  {} {} answered", "*".cyan(), judge));
        }
    }
}

/// Plain progress for quiet or non-interactive use: turns and warnings only
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_judging_start(&self, _judges: usize) {}

    fn on_vote_cast(&self, _vote: &JudgeVote) {}

    fn on_action_applied(&self, _action: &ActionVote, events: &[String]) {
        print!("{}", ConsoleFormatter::format_events(events));
    }

    fn on_turn(&self, speaker: &Speaker, text: &str) {
        println!("{}", ConsoleFormatter::format_turn(speaker, text));
    }

    fn on_warning(&self, message: &str) {
        eprintln!("{}", ConsoleFormatter::format_warning(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle() {
        let reporter = ProgressReporter::new(false);
        reporter.on_generation_start("Yoda");
        assert!(reporter.spinner.lock().unwrap().is_some());
        reporter.on_generation_start("Karlach");
        reporter.on_generation_end("Karlach");
        assert!(reporter.spinner.lock().unwrap().is_none());
    }

    #[test]
    fn test_judging_bar_counts_votes() {
        let reporter = ProgressReporter::new(false);
        reporter.on_judging_start(3);
        reporter.on_vote_cast(&JudgeVote::new("MELCHIOR", ActionVote::Keep));
        reporter.on_vote_cast(&JudgeVote::new("BALTHASAR", ActionVote::Keep));
        let position = reporter
            .judging
            .lock()
            .unwrap()
            .as_ref()
            .map(|bar| bar.position());
        assert_eq!(position, Some(2));

        reporter.on_action_applied(&ActionVote::Keep, &[]);
        assert!(reporter.judging.lock().unwrap().is_none());
    }
}
