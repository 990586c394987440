//! Line reconstruction from positioned spans.
//!
//! Renderers hand out spans in content-stream order. Plain page text is
//! rebuilt by grouping spans that share a baseline and ordering the lines
//! top to bottom.

use std::cmp::Ordering;

use crate::model::TextSpan;

/// Spans sharing a baseline, sorted left to right.
#[derive(Debug, Clone)]
pub struct TextLine<'a> {
    pub spans: Vec<&'a TextSpan>,
    /// Bottom edge of the first span, used as the line's vertical key
    pub bottom: f32,
}

impl<'a> TextLine<'a> {
    fn from_spans(mut spans: Vec<&'a TextSpan>) -> Self {
        spans.sort_by(|a, b| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal));
        let bottom = spans.first().map(|s| s.bbox.y1).unwrap_or(0.0);
        Self { spans, bottom }
    }

    /// Combined text with spaces inserted at horizontal gaps.
    ///
    /// No space is inserted between two characters of scripts written
    /// without word spaces.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                result.push_str(&span.text);
                continue;
            }

            let prev = self.spans[i - 1];
            let gap = span.bbox.x0 - prev.bbox.x1;

            let char_count = span.text.chars().count();
            let avg_char_width = if char_count > 0 && span.bbox.width() > 0.0 {
                span.bbox.width() / char_count as f32
            } else {
                span.font_size * 0.5
            };

            let spaceless = prev.text.chars().last().is_some_and(is_spaceless_script_char)
                && span.text.chars().next().is_some_and(is_spaceless_script_char);
            let has_space = prev.text.ends_with([' ', '\u{00A0}'])
                || span.text.starts_with([' ', '\u{00A0}']);

            if gap > avg_char_width * 0.2 && !spaceless && !has_space {
                result.push(' ');
            }
            result.push_str(&span.text);
        }

        result
    }
}

/// Group spans into lines, top to bottom.
pub fn group_into_lines(spans: &[TextSpan]) -> Vec<TextLine<'_>> {
    if spans.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&TextSpan> = spans.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .y1
            .partial_cmp(&b.bbox.y1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal))
    });

    let mut lines = Vec::new();
    let mut current: Vec<&TextSpan> = Vec::new();
    let mut current_bottom: Option<f32> = None;

    for span in sorted {
        let tolerance = span.font_size * 0.3;
        match current_bottom {
            Some(bottom) if (span.bbox.y1 - bottom).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_bottom = Some(span.bbox.y1);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Plain text of one page: one line per baseline, joined with `\n`.
pub fn page_text(spans: &[TextSpan]) -> String {
    group_into_lines(spans)
        .iter()
        .map(|line| line.text())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn span(text: &str, x0: f32, bottom: f32, size: f32) -> TextSpan {
        let width = text.chars().count() as f32 * size * 0.5;
        TextSpan::new(
            text,
            "Helvetica",
            size,
            BoundingBox::new(x0, bottom - size, x0 + width, bottom),
            0,
        )
    }

    #[test]
    fn test_lines_sorted_top_to_bottom() {
        let spans = vec![
            span("second line", 72.0, 140.0, 12.0),
            span("first line", 72.0, 120.0, 12.0),
        ];
        assert_eq!(page_text(&spans), "first line\nsecond line");
    }

    #[test]
    fn test_spans_on_same_baseline_are_joined() {
        let spans = vec![
            span("world", 130.0, 120.0, 12.0),
            span("Hello", 72.0, 120.5, 12.0),
        ];
        let lines = group_into_lines(&spans);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "Hello world");
    }

    #[test]
    fn test_no_space_between_cjk() {
        let spans = vec![span("日本", 72.0, 120.0, 12.0), span("語", 90.0, 120.0, 12.0)];
        assert_eq!(page_text(&spans), "日本語");
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(page_text(&[]), "");
    }

    #[test]
    fn test_spaceless_script() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('あ'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }
}
