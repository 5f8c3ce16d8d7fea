use crate::tier::LATENCY_COL_WIDTH;

/// Gap between columns.
pub const COL_GAP: usize = 2;

/// Fewest history cells worth showing.
pub const MIN_HISTORY_LEN: usize = 5;

/// Most history cells a row will hold, however wide the terminal.
pub const MAX_HISTORY_LEN: usize = 120;

const NAME_HEADING: &str = "host";

/// Fixed column widths, computed once at startup and unchanged for the
/// lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub name_width: usize,
    pub history_len: usize,
}

impl Layout {
    /// Derive the layout from the display names and the terminal width.
    /// `override_len` pins the history length instead of deriving it from
    /// the width; both paths clamp to the same bounds.
    pub fn compute<S: AsRef<str>>(names: &[S], term_width: u16, override_len: Option<usize>) -> Self {
        let name_width = names
            .iter()
            .map(|name| name.as_ref().chars().count())
            .max()
            .unwrap_or(0)
            .max(NAME_HEADING.len());

        let history_len = match override_len {
            Some(len) => len,
            None => (term_width as usize)
                .saturating_sub(name_width + COL_GAP + LATENCY_COL_WIDTH + COL_GAP),
        }
        .clamp(MIN_HISTORY_LEN, MAX_HISTORY_LEN);

        Self {
            name_width,
            history_len,
        }
    }

    /// Total width of one rendered row. Every row is exactly this wide so
    /// in-place overwrites leave no stale characters behind.
    pub fn row_width(&self) -> usize {
        self.name_width + COL_GAP + LATENCY_COL_WIDTH + COL_GAP + self.history_len
    }
}
