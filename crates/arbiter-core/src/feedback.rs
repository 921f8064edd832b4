// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Feedback Builder
// ─────────────────────────────────────────────────────────────────────
//! Renders a [`MismatchReport`] into repair instructions for the next
//! answer-generation attempt.

use std::fmt::Write as _;

use arbiter_types::{Atom, MismatchReport};

pub const REWRITE_RULE: &str =
    "keep answer consistent with Evidence Atoms; do not introduce new factual claims.";
pub const DEFAULT_OUTPUT_FORMAT: &str =
    "First line: FINAL_ANSWER: ... ; Then a short explanation";

/// Rendered feedback. `summary` is the first line of `text`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Feedback {
    pub text: String,
    pub summary: String,
}

/// Feedback renderer with optional forced and forbidden claims.
#[derive(Debug, Clone)]
pub struct FeedbackBuilder {
    force_claims: Vec<Atom>,
    must_not_claim: Vec<Atom>,
    output_format: String,
}

impl Default for FeedbackBuilder {
    fn default() -> Self {
        Self {
            force_claims: Vec::new(),
            must_not_claim: Vec::new(),
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
        }
    }
}

impl FeedbackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atoms appended to MUST ADD regardless of the report.
    pub fn force_claims(mut self, atoms: Vec<Atom>) -> Self {
        self.force_claims = atoms;
        self
    }

    pub fn must_not_claim(mut self, atoms: Vec<Atom>) -> Self {
        self.must_not_claim = atoms;
        self
    }

    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = format.into();
        self
    }

    /// Render `report`. Identical reports always render identical text.
    pub fn build(&self, report: &MismatchReport) -> Feedback {
        let summary = format!(
            "VERIFIER FEEDBACK: score {:.4} below {:.2}; remove={}, add={}, contradictions={}",
            report.score,
            report.threshold,
            report.unsupported_claims.len(),
            report.missing_required.len() + self.force_claims.len(),
            report.contradictions.len()
        );

        let mut text = String::new();
        text.push_str(&summary);
        text.push('\n');

        push_section(&mut text, "MUST REMOVE", &report.unsupported_claims);
        let must_add: Vec<&Atom> = report
            .missing_required
            .iter()
            .chain(self.force_claims.iter())
            .collect();
        push_section(&mut text, "MUST ADD", must_add);
        push_section(&mut text, "MUST NOT CLAIM", &self.must_not_claim);

        text.push_str("CONTRADICTIONS:\n");
        if report.contradictions.is_empty() {
            text.push_str("- none\n");
        }
        for pair in &report.contradictions {
            let _ = writeln!(text, "- {} vs {}", pair.left, pair.right);
        }

        let _ = writeln!(text, "REWRITE RULE: {REWRITE_RULE}");
        let _ = write!(text, "OUTPUT FORMAT: {}", self.output_format);

        Feedback { text, summary }
    }
}

/// Render `report` with default options.
pub fn build_feedback(report: &MismatchReport) -> Feedback {
    FeedbackBuilder::default().build(report)
}

fn push_section<'a, I>(text: &mut String, title: &str, atoms: I)
where
    I: IntoIterator<Item = &'a Atom>,
{
    let _ = writeln!(text, "{title}:");
    let mut any = false;
    for atom in atoms {
        let _ = writeln!(text, "- {atom}");
        any = true;
    }
    if !any {
        text.push_str("- none\n");
    }
}
