//! Page outcomes.

/// Tri-state result of reaching a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The reader lost; the story ends here.
    Failure,
    /// The story goes on.
    Ongoing,
    /// The reader won; the story ends here.
    Success,
}

impl Outcome {
    /// Maps a definition file's optional `result` tag to an outcome.
    ///
    /// Only the exact tags `"success"` and `"failure"` are terminal.
    #[must_use]
    pub fn from_result_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("success") => Self::Success,
            Some("failure") => Self::Failure,
            _ => Self::Ongoing,
        }
    }

    /// Interprets a stored outcome code by its sign.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code.signum() {
            -1 => Self::Failure,
            1 => Self::Success,
            _ => Self::Ongoing,
        }
    }

    /// The code persisted in the `pages.outcome` column.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Failure => -1,
            Self::Ongoing => 0,
            Self::Success => 1,
        }
    }

    /// The result label shown to readers; empty while the story goes on.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Failure => "failure",
            Self::Ongoing => "",
            Self::Success => "success",
        }
    }

    /// Whether reaching this outcome ends the story.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self != Self::Ongoing
    }
}
