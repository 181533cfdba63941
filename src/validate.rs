//! Structural checks for generated BUILD files.
//!
//! The checks only look for the presence of a few patterns. They catch an
//! empty or truncated file, not a file Bazel would reject.

use regex::Regex;
use std::sync::LazyLock;

/// One structural requirement on a BUILD file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// A `cc_library(` or `cc_binary(` call.
    RuleKeyword,
    /// A `name =` assignment.
    NameAssignment,
    /// A `srcs =` assignment.
    SrcsAssignment,
}

impl Check {
    /// Every check in evaluation order.
    pub const ALL: [Self; 3] = [Self::RuleKeyword, Self::NameAssignment, Self::SrcsAssignment];

    fn pattern(self) -> &'static Regex {
        let [rule, name, srcs] = &*PATTERNS;
        match self {
            Self::RuleKeyword => rule,
            Self::NameAssignment => name,
            Self::SrcsAssignment => srcs,
        }
    }

    fn holds(self, text: &str) -> bool {
        self.pattern().is_match(text)
    }

    /// Message reported when the check fails.
    #[must_use]
    pub const fn diagnostic(self) -> &'static str {
        match self {
            Self::RuleKeyword => "no cc_library or cc_binary rule found",
            Self::NameAssignment => "no `name =` assignment found",
            Self::SrcsAssignment => "no `srcs =` assignment found",
        }
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    failed: Option<Check>,
}

impl Validation {
    /// Whether every check passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.failed.is_none()
    }

    /// The first failing check, if any.
    #[must_use]
    pub const fn failed_check(&self) -> Option<Check> {
        self.failed
    }

    /// Description of the failure; empty on success.
    #[must_use]
    pub fn diagnostic(&self) -> &'static str {
        self.failed.map_or("", Check::diagnostic)
    }
}

/// Run every [`Check`] over `text`, stopping at the first failure.
///
/// # Examples
/// ```
/// use cmake_to_bazel::validate::validate;
///
/// let report = validate("cc_library(\n    name = \"x\",\n)\n");
/// assert!(!report.passed());
/// assert!(report.diagnostic().contains("srcs"));
/// ```
#[must_use]
pub fn validate(text: &str) -> Validation {
    Validation {
        failed: Check::ALL.into_iter().find(|check| !check.holds(text)),
    }
}

/// Compiled patterns, indexed like [`Check::ALL`].
static PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "the patterns are string literals")]
    let compile = |pattern: &str| Regex::new(pattern).expect("valid check pattern");
    [
        compile(r"\bcc_(?:library|binary)\s*\("),
        compile(r"\bname\s*=(?:[^=]|$)"),
        compile(r"\bsrcs\s*=(?:[^=]|$)"),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const GOOD: &str = concat!(
        "cc_binary(\n",
        "    name = \"app\",\n",
        "    srcs = [\"main.c\"],\n",
        "    deps = [],\n",
        ")\n\n",
    );

    #[rstest]
    fn generated_block_passes() {
        let report = validate(GOOD);
        assert!(report.passed());
        assert_eq!(report.diagnostic(), "");
        assert_eq!(report.failed_check(), None);
    }

    #[rstest]
    #[case("", Check::RuleKeyword)]
    #[case("my_cc_library(name = \"x\", srcs = [])", Check::RuleKeyword)]
    #[case("cc_library(srcs = [])", Check::NameAssignment)]
    #[case("cc_library(filename = \"x\", srcs = [])", Check::NameAssignment)]
    #[case("cc_library(name = \"x\")", Check::SrcsAssignment)]
    #[case("cc_library(name = \"x\", srcs == [])", Check::SrcsAssignment)]
    fn first_failing_check_is_reported(#[case] text: &str, #[case] expected: Check) {
        let report = validate(text);
        assert!(!report.passed());
        assert_eq!(report.failed_check(), Some(expected));
        assert_eq!(report.diagnostic(), expected.diagnostic());
    }

    #[rstest]
    fn missing_srcs_diagnostic_mentions_srcs() {
        let report = validate("cc_library(\n    name = \"core\",\n    deps = [],\n)\n");
        assert!(report.diagnostic().contains("srcs"));
    }

    #[rstest]
    #[case("cc_binary(\n    name =\n\"x\",\n    srcs = [],\n)")]
    #[case("cc_library(srcs = [], name =")]
    fn assignments_may_end_a_line_or_the_text(#[case] text: &str) {
        assert_eq!(validate(text).failed_check(), None, "{text:?}");
    }

    #[rstest]
    fn compact_spacing_is_accepted() {
        assert!(validate("cc_library (name=\"x\",srcs=[])").passed());
    }
}
