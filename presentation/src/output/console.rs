//! Console output formatter for discussion results

use colored::Colorize;
use roundtable_application::DiscussionOutcome;
use roundtable_domain::{AgentRegistry, BindingId, RecordRole, SlotAssignment, TurnRecord};

/// Formats discussion outcomes for console display.
///
/// Borrows the registry to turn persona and binding ids back into names.
pub struct TranscriptFormatter<'a> {
    registry: &'a AgentRegistry,
}

impl<'a> TranscriptFormatter<'a> {
    pub fn new(registry: &'a AgentRegistry) -> Self {
        Self { registry }
    }

    /// Format the complete transcript
    pub fn format(&self, outcome: &DiscussionOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Roundtable Transcript"));
        output.push('\n');

        if let Some(topic) = outcome.transcript.topic() {
            output.push_str(&format!("{} {}\n\n", "Topic:".cyan().bold(), topic));
        }

        output.push_str(&self.format_assignment(&outcome.assignment));

        output.push_str(&Self::section_header("Discussion"));
        for record in outcome.transcript.records() {
            if record.role == RecordRole::Topic {
                continue;
            }
            output.push_str(&format!(
                "\n{}\n{}\n",
                self.record_heading(record),
                record.content
            ));
        }

        output.push_str(&self.footer(outcome));
        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &DiscussionOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the closing synthesis only (concise output)
    pub fn format_moderator_only(&self, outcome: &DiscussionOutcome) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Roundtable Conclusion ===".cyan().bold()
        ));

        if let Some(topic) = outcome.transcript.topic() {
            output.push_str(&format!("{} {}\n\n", "Topic:".bold(), topic));
        }

        let moderator = outcome
            .transcript
            .records()
            .iter()
            .rev()
            .find(|r| matches!(r.role, RecordRole::Moderator { .. }));
        match moderator {
            Some(record) => {
                if let Some(binding) = record.role.binding() {
                    output.push_str(&format!(
                        "{} {}\n\n",
                        "Moderated by:".dimmed(),
                        self.binding_label(binding)
                    ));
                }
                output.push_str(&record.content);
                output.push('\n');
            }
            None => {
                output.push_str(&format!(
                    "{}\n",
                    "The moderator did not produce a conclusion.".yellow()
                ));
            }
        }

        output
    }

    /// Which backend speaks for which persona this session
    pub fn format_assignment(&self, assignment: &SlotAssignment) -> String {
        let mut output = format!("{}\n", "Seating:".cyan().bold());
        for entry in assignment.entries() {
            let persona = self
                .registry
                .persona(&entry.persona)
                .map(|p| p.name())
                .unwrap_or(entry.persona.as_str());
            output.push_str(&format!(
                "  {} {} {}\n",
                persona.bold(),
                "<-".dimmed(),
                self.binding_label(&entry.binding)
            ));
        }
        output
    }

    /// Roster and backend pool, for `--list-personas`
    pub fn format_roster(&self) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header("Personas"));
        for persona in self.registry.personas() {
            let tagline = persona
                .tagline()
                .map(|t| format!(" ({})", t))
                .unwrap_or_default();
            output.push_str(&format!(
                "  {}{} {}\n",
                persona.name().bold(),
                tagline.dimmed(),
                format!("[{}]", persona.id()).dimmed()
            ));
        }

        output.push_str(&Self::section_header("Backends"));
        for binding in self.registry.bindings() {
            output.push_str(&format!(
                "  {} {} {}\n",
                binding.id().as_str().bold(),
                binding.provider().as_str().yellow(),
                binding.model()
            ));
        }

        output
    }

    /// Closing line: record counts and failed steps
    pub fn footer(&self, outcome: &DiscussionOutcome) -> String {
        let mut output = format!("\n{}\n", "=".repeat(60).cyan());
        output.push_str(&format!(
            "{} speaker turns recorded",
            outcome.transcript.speaker_count()
        ));
        if outcome.failed_steps > 0 {
            output.push_str(&format!(
                ", {}",
                format!("{} step(s) failed", outcome.failed_steps).red()
            ));
        }
        output.push('\n');
        output
    }

    fn record_heading(&self, record: &TurnRecord) -> String {
        match &record.role {
            RecordRole::Speaker { persona, binding } => {
                let name = self
                    .registry
                    .persona(persona)
                    .map(|p| p.name())
                    .unwrap_or(persona.as_str());
                format!("── {} ({}) ──", name, self.binding_label(binding))
                    .yellow()
                    .bold()
                    .to_string()
            }
            RecordRole::Summary { binding } => {
                format!("── Interim Summary ({}) ──", self.binding_label(binding))
                    .magenta()
                    .bold()
                    .to_string()
            }
            RecordRole::Moderator { binding } => {
                format!("── Moderator ({}) ──", self.binding_label(binding))
                    .green()
                    .bold()
                    .to_string()
            }
            RecordRole::Topic => String::new(),
        }
    }

    fn binding_label(&self, id: &BindingId) -> String {
        self.registry
            .binding(id)
            .map(|b| b.label().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }
}
