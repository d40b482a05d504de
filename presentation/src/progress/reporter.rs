//! Progress reporting for a running discussion

use crate::output::console::TranscriptFormatter;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use roundtable_application::{DiscussionProgress, StepContext, StepOutcome};
use roundtable_domain::{AgentRegistry, SlotAssignment, StepKind};
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Streams each step's text to stdout as it arrives.
///
/// A spinner stands in for the step until its first fragment shows up.
pub struct StreamingReporter {
    spinner: Mutex<Option<ProgressBar>>,
    mid_line: AtomicBool,
}

impl StreamingReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            mid_line: AtomicBool::new(false),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Heading printed above a step's text
    pub fn heading(step: &StepContext) -> String {
        let title = format!("── {} ({}) ──", step.speaker_label(), step.binding.label());
        match step.kind {
            StepKind::Speaker => title.yellow().bold().to_string(),
            StepKind::MidSummary => title.magenta().bold().to_string(),
            StepKind::Moderator => title.green().bold().to_string(),
        }
    }

    fn clear_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for StreamingReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscussionProgress for StreamingReporter {
    fn on_assignment(&self, registry: &AgentRegistry, assignment: &SlotAssignment) {
        println!("{}", TranscriptFormatter::new(registry).format_assignment(assignment));
    }

    fn on_step_start(&self, step: &StepContext) {
        println!("\n{}", Self::heading(step));
        self.mid_line.store(false, Ordering::Relaxed);

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(format!("{} is thinking...", step.speaker_label()));
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(pb);
        }
    }

    fn on_chunk(&self, _step: &StepContext, chunk: &str) {
        self.clear_spinner();
        print!("{}", chunk);
        let _ = std::io::stdout().flush();
        self.mid_line.store(true, Ordering::Relaxed);
    }

    fn on_step_complete(&self, step: &StepContext, outcome: &StepOutcome) {
        self.clear_spinner();
        if self.mid_line.swap(false, Ordering::Relaxed) {
            println!();
        }
        match outcome {
            StepOutcome::Committed => {}
            StepOutcome::Empty => {
                println!("{}", "(no response)".dimmed());
            }
            StepOutcome::Failed(reason) => {
                println!(
                    "{} {}",
                    "x".red(),
                    format!("{} failed: {}", step.speaker_label(), reason).red()
                );
            }
        }
    }
}

/// Simple line-based progress on stderr (keeps stdout free for the result)
pub struct SimpleProgress;

impl DiscussionProgress for SimpleProgress {
    fn on_step_start(&self, step: &StepContext) {
        let label = match step.turn {
            Some(turn) => format!("Turn {}: {}", turn + 1, step.speaker_label()),
            None => step.speaker_label().to_string(),
        };
        eprintln!("{} {} ({})", "->".cyan(), label.bold(), step.binding.label());
    }

    fn on_step_complete(&self, step: &StepContext, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Committed => eprintln!("  {} {}", "v".green(), step.speaker_label()),
            StepOutcome::Empty => {
                eprintln!("  {} {} (no response)", "-".yellow(), step.speaker_label())
            }
            StepOutcome::Failed(reason) => {
                eprintln!("  {} {} ({})", "x".red(), step.speaker_label(), reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::{BackendBinding, Persona, Provider};

    fn step(kind: StepKind) -> StepContext {
        let persona = (kind == StepKind::Speaker)
            .then(|| Persona::new("optimist", "Sunny", "Be upbeat."));
        StepContext {
            kind,
            turn: persona.as_ref().map(|_| 0),
            persona,
            binding: BackendBinding::new("claude", Provider::Anthropic, "claude-3-5-sonnet-latest")
                .with_display_name("Claude"),
        }
    }

    #[test]
    fn test_heading_names_speaker_and_backend() {
        colored::control::set_override(false);
        assert_eq!(
            StreamingReporter::heading(&step(StepKind::Speaker)),
            "── Sunny (Claude) ──"
        );
        assert_eq!(
            StreamingReporter::heading(&step(StepKind::MidSummary)),
            "── Interim Summary (Claude) ──"
        );
        assert_eq!(
            StreamingReporter::heading(&step(StepKind::Moderator)),
            "── Moderator (Claude) ──"
        );
    }

    #[test]
    fn test_first_chunk_clears_spinner() {
        let reporter = StreamingReporter::new();
        let speaker = step(StepKind::Speaker);

        reporter.on_step_start(&speaker);
        assert!(reporter.spinner.lock().unwrap().is_some());

        reporter.on_chunk(&speaker, "Hello");
        assert!(reporter.spinner.lock().unwrap().is_none());
        assert!(reporter.mid_line.load(Ordering::Relaxed));

        reporter.on_step_complete(&speaker, &StepOutcome::Committed);
        assert!(!reporter.mid_line.load(Ordering::Relaxed));
    }
}
