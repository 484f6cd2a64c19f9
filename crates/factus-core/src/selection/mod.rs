//! Geometry-driven text selection over a page's word layout.
//!
//! Turns a pointer click or a drag rectangle, given in display pixels, into
//! one composite string built from the page's recognized words.

mod glue;

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One recognized word on a page.
///
/// Coordinates are document units, not display pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordToken {
    pub text: String,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    /// Block (paragraph) id from the layout query.
    pub block_id: u32,
    /// Line id within the block.
    pub line_id: u32,
}

impl WordToken {
    pub fn new(text: impl Into<String>, bbox: [f32; 4], block_id: u32, line_id: u32) -> Self {
        Self {
            text: text.into(),
            x0: bbox[0],
            y0: bbox[1],
            x1: bbox[2],
            y1: bbox[3],
            block_id,
            line_id,
        }
    }

    /// Horizontal centre of the box.
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    /// `(block_id, line_id)` key of the visual line.
    pub fn line_key(&self) -> (u32, u32) {
        (self.block_id, self.line_id)
    }

    /// Check if this token's box overlaps a rectangle.
    pub fn overlaps(&self, rect: &SelectionRect) -> bool {
        self.x0 < rect.x1 && self.x1 > rect.x0 && self.y0 < rect.y1 && self.y1 > rect.y0
    }
}

/// Axis-aligned rectangle with `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl SelectionRect {
    /// Build from two opposite corners in any order.
    pub fn from_corners(a: (f32, f32), b: (f32, f32)) -> Self {
        Self {
            x0: a.0.min(b.0),
            y0: a.1.min(b.1),
            x1: a.0.max(b.0),
            y1: a.1.max(b.1),
        }
    }

    /// Divide all coordinates by the display zoom.
    pub fn to_document(&self, zoom: f32) -> Self {
        Self {
            x0: self.x0 / zoom,
            y0: self.y0 / zoom,
            x1: self.x1 / zoom,
            y1: self.y1 / zoom,
        }
    }

    /// Zero width or height, or non-finite coordinates.
    pub fn is_degenerate(&self) -> bool {
        let finite = [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite());
        !finite || self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

/// Maximum horizontal gaps, in document units, for each glue rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionThresholds {
    /// Currency marker next to the picked word.
    pub currency_gap: f32,
    /// Numeric fragments ("1 234,56").
    pub numeric_gap: f32,
    /// Alphabetic name pieces ("Acme Corp").
    pub name_gap: f32,
}

impl Default for SelectionThresholds {
    fn default() -> Self {
        Self {
            currency_gap: 20.0,
            numeric_gap: 25.0,
            name_gap: 25.0,
        }
    }
}

/// Resolves pointer events against a page's word tokens.
#[derive(Debug, Clone, Default)]
pub struct TextSelector {
    thresholds: SelectionThresholds,
}

impl TextSelector {
    /// Create a selector with the default glue thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the glue thresholds.
    pub fn with_thresholds(mut self, thresholds: SelectionThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn thresholds(&self) -> &SelectionThresholds {
        &self.thresholds
    }

    /// Select the logical value under a click at display position `(x, y)`.
    ///
    /// Picks the visual line closest to the click, snaps to the first word
    /// starting at or right of the click, then glues neighbouring currency,
    /// numeric and name fragments onto it.
    pub fn select_at(&self, tokens: &[WordToken], x: f32, y: f32, zoom: f32) -> Option<String> {
        if !valid_zoom(zoom) {
            return None;
        }
        let (doc_x, doc_y) = (x / zoom, y / zoom);

        let mut line = nearest_line(tokens, doc_y)?;
        line.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal));

        let picked = pick_in_line(&line, doc_x)?;
        let composite = glue::expand(&line, picked, &self.thresholds);

        debug!(
            "Point selection at ({:.1}, {:.1}) picked '{}' -> '{}'",
            doc_x, doc_y, line[picked].text, composite
        );

        non_empty(composite)
    }

    /// Select every word intersecting a display-space rectangle.
    ///
    /// Words are returned in reading order: by block, then line, then `x0`.
    pub fn select_in(&self, tokens: &[WordToken], rect: SelectionRect, zoom: f32) -> Option<String> {
        if !valid_zoom(zoom) {
            return None;
        }
        let area = rect.to_document(zoom);
        if area.is_degenerate() {
            return None;
        }

        let mut picked: Vec<&WordToken> = tokens.iter().filter(|t| t.overlaps(&area)).collect();
        picked.sort_by(|a, b| {
            a.line_key()
                .cmp(&b.line_key())
                .then_with(|| a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal))
        });

        let text = picked
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        debug!("Rectangle selection matched {} words", picked.len());

        non_empty(text)
    }
}

/// Point selection with the default thresholds.
pub fn select_at(tokens: &[WordToken], x: f32, y: f32, zoom: f32) -> Option<String> {
    TextSelector::new().select_at(tokens, x, y, zoom)
}

/// Rectangle selection with the default thresholds.
pub fn select_in(tokens: &[WordToken], rect: SelectionRect, zoom: f32) -> Option<String> {
    TextSelector::new().select_in(tokens, rect, zoom)
}

fn valid_zoom(zoom: f32) -> bool {
    zoom.is_finite() && zoom > 0.0
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Tokens of the line whose vertical midpoint is closest to `y`.
///
/// Lines keep first-encounter order so ties go to the earliest line.
fn nearest_line(tokens: &[WordToken], y: f32) -> Option<Vec<&WordToken>> {
    let mut slots: HashMap<(u32, u32), usize> = HashMap::new();
    let mut lines: Vec<Vec<&WordToken>> = Vec::new();

    for token in tokens {
        let slot = *slots.entry(token.line_key()).or_insert_with(|| {
            lines.push(Vec::new());
            lines.len() - 1
        });
        lines[slot].push(token);
    }

    let mut best: Option<(usize, f32)> = None;
    for (i, line) in lines.iter().enumerate() {
        let top = line.iter().map(|t| t.y0).fold(f32::INFINITY, f32::min);
        let bottom = line.iter().map(|t| t.y1).fold(f32::NEG_INFINITY, f32::max);
        let distance = ((top + bottom) / 2.0 - y).abs();

        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }

    best.map(|(i, _)| lines.swap_remove(i))
}

/// Index of the first word starting at or right of `x`, or failing that the
/// word whose centre is closest to `x`.
fn pick_in_line(line: &[&WordToken], x: f32) -> Option<usize> {
    line.iter().position(|t| t.x0 >= x).or_else(|| {
        line.iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let da = (a.center_x() - x).abs();
                let db = (b.center_x() - x).abs();
                da.partial_cmp(&db).unwrap_or(Ordering::Equal)
            })
            .map(|(i, _)| i)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x0: f32, x1: f32, line: u32) -> WordToken {
        let y0 = 100.0 + line as f32 * 20.0;
        WordToken::new(text, [x0, y0, x1, y0 + 10.0], 0, line)
    }

    #[test]
    fn test_currency_glue_from_either_side() {
        let tokens = vec![word("€", 100.0, 108.0, 0), word("120,50", 112.0, 140.0, 0)];

        assert_eq!(select_at(&tokens, 112.0, 105.0, 1.0).as_deref(), Some("€ 120,50"));
        assert_eq!(select_at(&tokens, 99.0, 105.0, 1.0).as_deref(), Some("€ 120,50"));
    }

    #[test]
    fn test_zoom_converts_display_pixels() {
        let tokens = vec![word("€", 100.0, 108.0, 0), word("120,50", 112.0, 140.0, 0)];

        // (168, 157.5) at zoom 1.5 is (112, 105) in document units
        assert_eq!(select_at(&tokens, 168.0, 157.5, 1.5).as_deref(), Some("€ 120,50"));
    }

    #[test]
    fn test_name_glue_stops_at_gap() {
        let tokens = vec![
            word("Acme", 10.0, 40.0, 0),
            word("Corp", 45.0, 75.0, 0),
            word("Invoice", 200.0, 240.0, 0),
        ];

        assert_eq!(select_at(&tokens, 10.0, 105.0, 1.0).as_deref(), Some("Acme Corp"));
        assert_eq!(select_at(&tokens, 44.0, 105.0, 1.0).as_deref(), Some("Acme Corp"));
        assert_eq!(select_at(&tokens, 150.0, 105.0, 1.0).as_deref(), Some("Invoice"));
    }

    #[test]
    fn test_click_past_line_end_falls_back_to_nearest() {
        let tokens = vec![word("Total", 10.0, 40.0, 0), word("99,00", 200.0, 230.0, 0)];

        assert_eq!(select_at(&tokens, 300.0, 105.0, 1.0).as_deref(), Some("99,00"));
    }

    #[test]
    fn test_nearest_line_wins() {
        let tokens = vec![
            word("Header", 10.0, 50.0, 0),
            word("Acme", 10.0, 40.0, 1),
            word("Footer", 10.0, 50.0, 2),
        ];

        // Line 1 spans y 120..130
        assert_eq!(select_at(&tokens, 5.0, 124.0, 1.0).as_deref(), Some("Acme"));
    }

    #[test]
    fn test_tie_goes_to_first_line() {
        let tokens = vec![word("Upper", 10.0, 50.0, 0), word("Lower", 10.0, 50.0, 1)];

        // Midpoints 105 and 125; y = 115 is equidistant
        assert_eq!(select_at(&tokens, 5.0, 115.0, 1.0).as_deref(), Some("Upper"));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(select_at(&[], 10.0, 10.0, 1.0), None);

        let tokens = vec![word("Acme", 10.0, 40.0, 0)];
        assert_eq!(select_at(&tokens, 10.0, 10.0, 0.0), None);
        assert_eq!(select_at(&tokens, 10.0, 10.0, f32::NAN), None);
    }

    #[test]
    fn test_rectangle_reading_order() {
        // Second line's first word sits left of the first line's words
        let tokens = vec![
            word("Bravo", 60.0, 90.0, 1),
            word("Alpha", 10.0, 40.0, 0),
            word("Delta", 5.0, 30.0, 1),
            word("Charlie", 50.0, 80.0, 0),
        ];
        let rect = SelectionRect::from_corners((0.0, 95.0), (100.0, 135.0));

        assert_eq!(
            select_in(&tokens, rect, 1.0).as_deref(),
            Some("Alpha Charlie Delta Bravo")
        );
    }

    #[test]
    fn test_rectangle_partial_overlap_and_zoom() {
        let tokens = vec![word("Acme", 10.0, 40.0, 0), word("Corp", 45.0, 75.0, 0)];

        // Document rect x 30..42 touches only "Acme"; display coordinates doubled
        let rect = SelectionRect::from_corners((84.0, 200.0), (60.0, 220.0));
        assert_eq!(select_in(&tokens, rect, 2.0).as_deref(), Some("Acme"));
    }

    #[test]
    fn test_rectangle_empty_results() {
        let tokens = vec![word("Acme", 10.0, 40.0, 0)];

        let miss = SelectionRect::from_corners((500.0, 500.0), (600.0, 600.0));
        assert_eq!(select_in(&tokens, miss, 1.0), None);

        let flat = SelectionRect::from_corners((0.0, 105.0), (100.0, 105.0));
        assert_eq!(select_in(&tokens, flat, 1.0), None);
        assert_eq!(select_in(&[], miss, 1.0), None);
    }

    #[test]
    fn test_selection_does_not_mutate_tokens() {
        let tokens = vec![word("Corp", 45.0, 75.0, 0), word("Acme", 10.0, 40.0, 0)];
        let before = tokens.clone();

        let _ = select_at(&tokens, 10.0, 105.0, 1.0);
        assert_eq!(tokens, before);
    }
}
