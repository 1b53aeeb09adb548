use crate::ir::ChartType;
use tracing::debug;

/// Keywords checked in this order; the first hit wins regardless of where it sits in the text.
const KEYWORD_PRIORITY: [(&str, ChartType); 6] = [
    ("pie", ChartType::Pie),
    ("line", ChartType::Line),
    ("bar", ChartType::Bar),
    ("donut", ChartType::Donut),
    ("histogram", ChartType::Histogram),
    ("bubble", ChartType::Bubble),
];

/// Chart type used when the text names none.
pub const DEFAULT_CHART_TYPE: ChartType = ChartType::Bar;

/// Resolve the chart type a free-text prompt asks for, falling back to bar.
pub fn resolve_chart_type(text: &str) -> ChartType {
    match match_keyword(text) {
        Some(chart_type) => chart_type,
        None => {
            debug!("no chart keyword in prompt, defaulting to {}", DEFAULT_CHART_TYPE);
            DEFAULT_CHART_TYPE
        }
    }
}

/// The chart type explicitly named in `text`, if any.
///
/// Matching is lexical substring containment on the lower-cased text, so "barely"
/// still counts as "bar".
pub fn match_keyword(text: &str) -> Option<ChartType> {
    let lower = text.to_lowercase();

    for (word, chart_type) in KEYWORD_PRIORITY {
        let phrase = format!("{} chart", word);
        if lower.contains(&phrase) || lower.contains(word) {
            debug!(keyword = word, "resolved chart type {}", chart_type);
            return Some(chart_type);
        }
    }

    None
}
