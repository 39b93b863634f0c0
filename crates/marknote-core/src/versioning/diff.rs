//! Line-level diff between two snapshots.
//!
//! Myers diff over `str::lines()` in linear space. Within a changed
//! region, removed lines are emitted before added lines.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use similar::{capture_diff_slices_deadline, Algorithm, DiffTag};

/// One line of a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "line", rename_all = "lowercase")]
pub enum DiffLine {
    Unchanged(String),
    Added(String),
    Removed(String),
}

impl DiffLine {
    /// Two-character prefix used when rendering the line.
    pub fn prefix(&self) -> &'static str {
        match self {
            DiffLine::Unchanged(_) => "  ",
            DiffLine::Added(_) => "+ ",
            DiffLine::Removed(_) => "- ",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            DiffLine::Unchanged(s) | DiffLine::Added(s) | DiffLine::Removed(s) => s,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, DiffLine::Unchanged(_))
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix(), self.text())
    }
}

/// Line counts per diff operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    pub fn from_lines(lines: &[DiffLine]) -> Self {
        lines.iter().fold(Self::default(), |mut acc, line| {
            match line {
                DiffLine::Unchanged(_) => acc.unchanged += 1,
                DiffLine::Added(_) => acc.added += 1,
                DiffLine::Removed(_) => acc.removed += 1,
            }
            acc
        })
    }

    pub fn is_identical(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Upper bound on time spent searching for a minimal diff. Past it the
/// remaining region is reported as removed-then-added.
const DIFF_DEADLINE: Duration = Duration::from_secs(2);

/// Compute a line diff from `old` to `new`.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffLine> {
    let old: Vec<&str> = old.lines().collect();
    let new: Vec<&str> = new.lines().collect();
    let deadline = Instant::now() + DIFF_DEADLINE;

    let mut out = Vec::with_capacity(old.len().max(new.len()));
    for op in capture_diff_slices_deadline(Algorithm::Myers, &old, &new, Some(deadline)) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => push_lines(&mut out, &old[old_range], DiffLine::Unchanged),
            DiffTag::Delete => push_lines(&mut out, &old[old_range], DiffLine::Removed),
            DiffTag::Insert => push_lines(&mut out, &new[new_range], DiffLine::Added),
            DiffTag::Replace => {
                push_lines(&mut out, &old[old_range], DiffLine::Removed);
                push_lines(&mut out, &new[new_range], DiffLine::Added);
            }
        }
    }
    out
}

fn push_lines(out: &mut Vec<DiffLine>, lines: &[&str], make: fn(String) -> DiffLine) {
    out.extend(lines.iter().map(|line| make(line.to_string())));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(lines: &[DiffLine]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_identical_inputs_all_unchanged() {
        let text = "one\ntwo\nthree";
        let diff = diff_lines(text, text);
        assert_eq!(diff.len(), 3);
        assert!(diff.iter().all(|l| !l.is_change()));
        assert!(DiffSummary::from_lines(&diff).is_identical());
    }

    #[test]
    fn test_single_line_replacement() {
        let diff = diff_lines("A\nB\nC", "A\nX\nC");
        assert_eq!(render(&diff), vec!["  A", "- B", "+ X", "  C"]);
    }

    #[test]
    fn test_append_and_delete() {
        let diff = diff_lines("a\nb", "a\nb\nc");
        assert_eq!(render(&diff), vec!["  a", "  b", "+ c"]);

        let diff = diff_lines("a\nb\nc", "b");
        assert_eq!(render(&diff), vec!["- a", "  b", "- c"]);
    }

    #[test]
    fn test_empty_sides() {
        assert!(diff_lines("", "").is_empty());
        assert_eq!(render(&diff_lines("", "x\ny")), vec!["+ x", "+ y"]);
        assert_eq!(render(&diff_lines("x", "")), vec!["- x"]);
    }

    #[test]
    fn test_removals_before_additions() {
        let diff = diff_lines("a\nb", "c\nd");
        assert_eq!(render(&diff), vec!["- a", "- b", "+ c", "+ d"]);
    }

    #[test]
    fn test_interleaved_common_lines() {
        let diff = diff_lines("a\nb\nc\nd", "a\nc\nd\ne");
        assert_eq!(render(&diff), vec!["  a", "- b", "  c", "  d", "+ e"]);
    }

    #[test]
    fn test_summary_counts() {
        let diff = diff_lines("A\nB\nC", "A\nX\nY\nC");
        let summary = DiffSummary::from_lines(&diff);
        assert_eq!(
            summary,
            DiffSummary {
                added: 2,
                removed: 1,
                unchanged: 2
            }
        );
    }

    #[test]
    fn test_large_unrelated_snapshots() {
        let old: String = (0..20_000).map(|i| format!("old {}\n", i)).collect();
        let new: String = (0..20_000).map(|i| format!("new {}\n", i)).collect();

        let summary = DiffSummary::from_lines(&diff_lines(&old, &new));
        assert_eq!(summary.removed, 20_000);
        assert_eq!(summary.added, 20_000);
        assert_eq!(summary.unchanged, 0);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(DiffLine::Added("x".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"op": "added", "line": "x"}));
    }
}
