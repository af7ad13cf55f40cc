// Letter layout: font metrics, page geometry, word-wrap and pagination.
// Pure computation; rendering lives in `render`.

pub mod font_metrics;
pub mod wrap;

// Re-export the public API consumed by other modules (letter, render).
pub use font_metrics::{default_page_config, FontFamily, PageConfig};
pub use wrap::{normalize_text, paginate, wrap_for_page, Paragraph};
