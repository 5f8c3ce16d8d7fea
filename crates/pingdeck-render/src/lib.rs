//! Fixed-layout dashboard rendering and the terminal capability boundary.

pub mod frame;
pub mod layout;
pub mod screen;
pub mod tier;

pub use frame::{header_line, host_rows, legend_lines, Line, Span};
pub use layout::Layout;
pub use screen::{CrosstermScreen, Screen};
pub use tier::{format_latency, outcome_tier, Tier, LATENCY_COL_WIDTH};
