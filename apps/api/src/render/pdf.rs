//! PDF output through `printpdf` using the built-in base-14 fonts.
//!
//! Each line is written in its own text object so the cursor is absolute.
//! Justified lines get PDF word spacing (`Tw`) that stretches every space
//! until the line spans the printable width.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::debug;

use crate::layout::font_metrics::{get_metrics, is_winansi, FontFamily, FontMetricTable, PT_PER_MM};
use crate::layout::{PageConfig, Paragraph};
use crate::letter::LetterDocument;
use crate::render::{DocumentSink, RenderError};

const LAYER_NAME: &str = "Text";

pub struct PdfSink;

fn builtin_font(font: FontFamily) -> BuiltinFont {
    match font {
        FontFamily::Times => BuiltinFont::TimesRoman,
        FontFamily::Helvetica => BuiltinFont::Helvetica,
        FontFamily::Courier => BuiltinFont::Courier,
    }
}

fn pdf_error<E: std::fmt::Debug>(e: E) -> RenderError {
    RenderError::Pdf(format!("{e:?}"))
}

/// Extra points added to each space of a justified line. Zero for flush-left
/// lines, single-word lines and lines that are already full.
pub fn word_spacing(text: &str, justify: bool, metrics: &FontMetricTable, page: &PageConfig) -> f32 {
    if !justify {
        return 0.0;
    }
    let gaps = text.matches(' ').count();
    if gaps == 0 {
        return 0.0;
    }
    let slack = page.text_width_pt() - metrics.measure_pt(text, page.font_size_pt);
    (slack / gaps as f32).max(0.0)
}

/// Fails on the first character the built-in fonts cannot encode. printpdf
/// would otherwise write nothing for it.
fn check_encodable(letter: &LetterDocument) -> Result<(), RenderError> {
    for line in letter.lines() {
        if let Some(ch) = line.chars().find(|c| !is_winansi(*c)) {
            return Err(RenderError::Unencodable {
                line: line.to_string(),
                ch,
            });
        }
    }
    Ok(())
}

/// Baseline of the line in `slot`, in mm from the bottom edge.
///
/// The text sits vertically centred in its line cell.
pub fn baseline_y_mm(page: &PageConfig, slot: usize) -> f32 {
    let font_size_mm = page.font_size_pt / PT_PER_MM;
    let from_top = page.margin_top_mm
        + slot as f32 * page.line_height_mm
        + page.line_height_mm / 2.0
        + 0.3 * font_size_mm;
    page.paper_height_mm - from_top
}

impl DocumentSink for PdfSink {
    fn render(&self, letter: &LetterDocument, page: &PageConfig, path: &Path) -> Result<(), RenderError> {
        check_encodable(letter)?;

        let metrics = get_metrics(&page.font);
        let pages = letter.pages(page);
        let width = Mm(page.paper_width_mm);
        let height = Mm(page.paper_height_mm);

        let (doc, first_page, first_layer) = PdfDocument::new(letter.position.as_str(), width, height, LAYER_NAME);
        let font = doc
            .add_builtin_font(builtin_font(page.font))
            .map_err(pdf_error)?;

        for (index, lines) in pages.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page_ref, layer_ref) = doc.add_page(width, height, LAYER_NAME);
                doc.get_page(page_ref).get_layer(layer_ref)
            };

            for (slot, paragraph) in lines.iter().enumerate() {
                let Paragraph::Line { text, justify } = paragraph else {
                    continue;
                };
                layer.begin_text_section();
                layer.set_font(&font, page.font_size_pt);
                layer.set_word_spacing(word_spacing(text, *justify, metrics, page));
                layer.set_text_cursor(Mm(page.margin_side_mm), Mm(baseline_y_mm(page, slot)));
                layer.write_text(text.as_str(), &font);
                layer.end_text_section();
            }
        }

        let file = File::create(path)?;
        doc.save(&mut BufWriter::new(file)).map_err(pdf_error)?;

        debug!("Wrote {} page(s) to {}", pages.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::default_page_config;

    fn line(text: &str, justify: bool) -> Paragraph {
        Paragraph::Line {
            text: text.to_string(),
            justify,
        }
    }

    #[test]
    fn test_word_spacing_fills_the_line() {
        let page = default_page_config(FontFamily::Times);
        let metrics = get_metrics(&page.font);
        let text = "I am writing to express my strong interest in the role";
        let spacing = word_spacing(text, true, metrics, &page);
        assert!(spacing > 0.0);

        let gaps = text.matches(' ').count() as f32;
        let stretched = metrics.measure_pt(text, page.font_size_pt) + spacing * gaps;
        assert!((stretched - page.text_width_pt()).abs() < 1e-2);
    }

    #[test]
    fn test_word_spacing_zero_for_flush_left_and_single_words() {
        let page = default_page_config(FontFamily::Times);
        let metrics = get_metrics(&page.font);
        assert_eq!(word_spacing("two words", false, metrics, &page), 0.0);
        assert_eq!(word_spacing("Sincerely,", true, metrics, &page), 0.0);
    }

    #[test]
    fn test_word_spacing_never_negative() {
        let page = default_page_config(FontFamily::Times);
        let metrics = get_metrics(&page.font);
        let overfull = "overfull ".repeat(40);
        assert_eq!(word_spacing(overfull.trim(), true, metrics, &page), 0.0);
    }

    #[test]
    fn test_baselines_descend_by_line_height() {
        let page = default_page_config(FontFamily::Times);
        let first = baseline_y_mm(&page, 0);
        let second = baseline_y_mm(&page, 1);
        assert!((first - second - page.line_height_mm).abs() < 1e-4);
        assert!(first < page.paper_height_mm - page.margin_top_mm);
        let last = baseline_y_mm(&page, page.lines_per_page() - 1);
        assert!(last > page.margin_bottom_mm);
    }

    #[test]
    fn test_pdf_sink_writes_multi_page_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Software Engineer.pdf");
        let page = default_page_config(FontFamily::Times);

        let mut paragraphs = Vec::new();
        for i in 0..80 {
            paragraphs.push(line(&format!("Paragraph line {i} with a few words"), i % 2 == 0));
            paragraphs.push(Paragraph::Blank);
        }
        let letter = LetterDocument {
            position: "Software Engineer".to_string(),
            paragraphs,
            format_matched: true,
        };
        assert!(letter.pages(&page).len() > 1);

        PdfSink.render(&letter, &page, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_pdf_sink_refuses_characters_it_cannot_draw() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.pdf");
        let page = default_page_config(FontFamily::Times);
        let letter = LetterDocument {
            position: "default".to_string(),
            paragraphs: vec![line("my r\u{e9}sum\u{e9} and \u{65e5}\u{672c} done", true)],
            format_matched: true,
        };

        let err = PdfSink.render(&letter, &page, &path).unwrap_err();
        assert!(matches!(err, RenderError::Unencodable { ch: '\u{65e5}', .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_pdf_sink_draws_latin1_letters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.pdf");
        let page = default_page_config(FontFamily::Helvetica);
        let letter = LetterDocument {
            position: "default".to_string(),
            paragraphs: vec![line("my r\u{e9}sum\u{e9} and Zo\u{eb} ?? done", true)],
            format_matched: true,
        };

        PdfSink.render(&letter, &page, &path).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
