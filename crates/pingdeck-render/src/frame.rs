use crate::layout::{Layout, COL_GAP};
use crate::tier::{format_latency, outcome_tier};
use crossterm::style::Color;
use pingdeck_model::HostRecord;

/// A run of styled text within one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fg: None,
            bg: None,
        }
    }

    pub fn fg(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            fg: Some(color),
            bg: None,
        }
    }

    pub fn styled(text: impl Into<String>, fg: Color, bg: Color) -> Self {
        Self {
            text: text.into(),
            fg: Some(fg),
            bg: Some(bg),
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// Unstyled text of the whole row.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

fn gap() -> Span {
    Span::plain(" ".repeat(COL_GAP))
}

/// Column headings, drawn once above the host rows.
pub fn header_line(layout: &Layout) -> Line {
    let responses: String = "responses".chars().take(layout.history_len).collect();
    let text = format!(
        "{name:<name_w$}{gap}{rtt:>rtt_w$}{gap}{responses}",
        name = "host",
        name_w = layout.name_width,
        gap = " ".repeat(COL_GAP),
        rtt = "rtt",
        rtt_w = crate::tier::LATENCY_COL_WIDTH,
    );
    Line::new(vec![Span::fg(text, Color::DarkGrey)])
}

/// Symbol key plus the quit hint, drawn once below the host rows.
pub fn legend_lines() -> Vec<Line> {
    vec![
        Line::default(),
        Line::new(vec![Span::fg(
            ". reply   x timeout   ? error   (blank) no probe   any key quits",
            Color::DarkGrey,
        )]),
    ]
}

/// One fixed-width row per host, in stable input order.
pub fn host_rows(records: &[HostRecord], layout: &Layout) -> Vec<Line> {
    records
        .iter()
        .map(|record| host_row(record, layout))
        .collect()
}

fn host_row(record: &HostRecord, layout: &Layout) -> Line {
    let newest = record.history().newest();
    let name_text = format!(
        "{:<width$}",
        record.display_name(),
        width = layout.name_width
    );

    let name = match newest {
        Some(outcome) => {
            let tier = outcome_tier(outcome);
            Span::styled(name_text, Color::Black, tier.color())
        }
        None => Span::fg(name_text, Color::DarkGrey),
    };

    let latency = match newest {
        Some(outcome) => Span::fg(format_latency(Some(outcome)), outcome_tier(outcome).color()),
        None => Span::fg(format_latency(None), Color::DarkGrey),
    };

    let mut spans = vec![name, gap(), latency, gap()];
    spans.extend(history_spans(record, layout.history_len));
    Line::new(spans)
}

/// History cells, oldest to newest, left to right. Only the newest cell
/// keeps its outcome color; older cells are dimmed so the eye lands on the
/// current round.
fn history_spans(record: &HostRecord, width: usize) -> Vec<Span> {
    let history = record.history();
    let len = history.len();
    let mut spans = Vec::new();

    if len > 1 {
        let aged: String = history.iter().take(len - 1).map(|o| o.symbol()).collect();
        spans.push(Span::fg(aged, Color::DarkGrey));
    }
    if let Some(newest) = history.newest() {
        spans.push(Span::fg(
            newest.symbol().to_string(),
            outcome_tier(newest).color(),
        ));
    }
    if len < width {
        spans.push(Span::plain(" ".repeat(width - len)));
    }
    spans
}
