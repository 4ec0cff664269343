//! Text rendering of one sentence with aligned spans underlined.
//!
//! ```text
//! John  met  Mary  .
//! ╰──╯[A] PER:Individual
//!            ╰──╯[B] PER:Individual
//!       ╰─╯Contact:Meet
//!         └─Entity─>[A]
//!         └─Entity─>[B]
//! ```

use crate::document::Tokenization;
use std::collections::HashMap;
use std::fmt::Write;
use std::ops::Range;
use unicode_width::UnicodeWidthStr;

/// Convert a zero-based index to a base-26 label: A, B, ..., Z, AA, AB, ...
fn index_to_base26_label(mut n: usize) -> String {
    let mut result = String::new();
    loop {
        let remainder = n % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// A labelled edge from a displayed span to another token range.
#[derive(Debug, Clone)]
pub struct DisplayArrow {
    pub role: String,
    /// Target token range, `None` when it lives in another sentence
    pub target: Option<Range<usize>>,
}

struct IncludedSpan {
    range: Range<usize>,
    label: String,
    arrows: Vec<DisplayArrow>,
}

pub struct SentenceDisplay<'a> {
    tokenization: &'a Tokenization,
    include_spans: Vec<IncludedSpan>,
}

impl<'a> SentenceDisplay<'a> {
    pub fn new(tokenization: &'a Tokenization) -> Self {
        SentenceDisplay {
            tokenization,
            include_spans: Vec::new(),
        }
    }

    /// Underline a token range with a label. Empty or out-of-range spans are ignored.
    pub fn include(&mut self, range: Range<usize>, label: impl Into<String>) {
        self.include_with_arrows(range, label, Vec::new());
    }

    pub fn include_with_arrows(
        &mut self,
        range: Range<usize>,
        label: impl Into<String>,
        arrows: Vec<DisplayArrow>,
    ) {
        if range.start >= range.end || range.end > self.tokenization.len() {
            return;
        }
        self.include_spans.push(IncludedSpan {
            range,
            label: label.into(),
            arrows,
        });
    }

    /// Takes self
    pub fn with(mut self, range: Range<usize>, label: impl Into<String>) -> Self {
        self.include(range, label);
        self
    }

    /// Only ranges that are arrow targets and are themselves displayed get labels.
    fn build_span_labels(&self) -> HashMap<(usize, usize), String> {
        let included: std::collections::HashSet<(usize, usize)> = self
            .include_spans
            .iter()
            .map(|span| (span.range.start, span.range.end))
            .collect();

        let mut targets: Vec<(usize, usize)> = self
            .include_spans
            .iter()
            .flat_map(|span| &span.arrows)
            .filter_map(|arrow| arrow.target.as_ref())
            .map(|range| (range.start, range.end))
            .filter(|range| included.contains(range))
            .collect();
        targets.sort();
        targets.dedup();

        targets
            .into_iter()
            .enumerate()
            .map(|(i, range)| (range, format!("[{}]", index_to_base26_label(i))))
            .collect()
    }
}

impl<'a> std::fmt::Display for SentenceDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        let mut token_start_col = Vec::new();
        let mut token_end_col = Vec::new();

        let mut opening_line = String::new();
        for (idx, token) in self.tokenization.tokens.iter().enumerate() {
            if idx > 0 {
                opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
            }
            token_start_col.push(UnicodeWidthStr::width(&*opening_line));
            opening_line.push_str(&token.text.replace('\n', " "));
            token_end_col.push(UnicodeWidthStr::width(&*opening_line));
        }
        f.write_str(&opening_line)?;

        let span_labels = self.build_span_labels();

        for span in &self.include_spans {
            f.write_char('\n')?;

            let start_col = token_start_col[span.range.start];
            let end_col = token_end_col[span.range.end - 1];
            for _ in 0..start_col {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;
            for _ in (start_col + 1)..end_col.saturating_sub(1) {
                f.write_char('─')?;
            }
            if end_col - start_col > 1 {
                f.write_char('╯')?;
            }

            if let Some(label) = span_labels.get(&(span.range.start, span.range.end)) {
                write!(f, "{} ", label)?;
            }
            f.write_str(&span.label)?;

            for arrow in &span.arrows {
                f.write_char('\n')?;
                for _ in 0..start_col + 2 {
                    f.write_char(' ')?;
                }
                let target = match &arrow.target {
                    Some(range) => span_labels
                        .get(&(range.start, range.end))
                        .cloned()
                        .unwrap_or_else(|| format!("[{}..{}]", range.start, range.end)),
                    None => "[elsewhere]".to_string(),
                };
                write!(f, "└─{}─>{}", arrow.role, target)?;
            }
        }

        Ok(())
    }
}
