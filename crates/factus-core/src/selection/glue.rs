//! Glue rules that grow a picked word into a logical field value.

use super::{SelectionThresholds, WordToken};
use crate::invoice::rules::patterns::{NAME_PIECE, NUMERIC_FRAGMENT};

const CURRENCY_MARKERS: [&str; 4] = ["€", "eur", "euro", "euros"];

/// Inclusive window `[left, right]` of line indices being glued.
struct Window<'a> {
    line: &'a [&'a WordToken],
    left: usize,
    right: usize,
}

impl<'a> Window<'a> {
    /// Gap between the token at `i` and the one after it.
    fn gap_after(&self, i: usize) -> f32 {
        self.line[i + 1].x0 - self.line[i].x1
    }

    fn extend_left_once(&mut self, max_gap: f32, accept: impl Fn(&str) -> bool) -> bool {
        if self.left == 0 {
            return false;
        }
        let candidate = self.left - 1;
        if accept(&self.line[candidate].text) && self.gap_after(candidate) < max_gap {
            self.left = candidate;
            true
        } else {
            false
        }
    }

    fn extend_right_once(&mut self, max_gap: f32, accept: impl Fn(&str) -> bool) -> bool {
        let candidate = self.right + 1;
        if candidate >= self.line.len() {
            return false;
        }
        if accept(&self.line[candidate].text) && self.gap_after(self.right) < max_gap {
            self.right = candidate;
            true
        } else {
            false
        }
    }

    fn extend_left_while(&mut self, max_gap: f32, accept: impl Fn(&str) -> bool) {
        while self.extend_left_once(max_gap, &accept) {}
    }

    fn extend_right_while(&mut self, max_gap: f32, accept: impl Fn(&str) -> bool) {
        while self.extend_right_once(max_gap, &accept) {}
    }

    fn text(&self) -> String {
        self.line[self.left..=self.right]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Grow the word at `picked` within an x-sorted line and return the joined text.
///
/// Rules run in order: a single currency marker on each side, then numeric
/// fragments, then alphabetic name pieces, each starting from the boundary
/// the previous rule left behind.
pub(super) fn expand(line: &[&WordToken], picked: usize, thresholds: &SelectionThresholds) -> String {
    let mut window = Window {
        line,
        left: picked,
        right: picked,
    };

    window.extend_left_once(thresholds.currency_gap, is_currency);
    window.extend_right_once(thresholds.currency_gap, is_currency);

    window.extend_left_while(thresholds.numeric_gap, is_numeric_fragment);
    window.extend_right_while(thresholds.numeric_gap, is_numeric_fragment);

    window.extend_left_while(thresholds.name_gap, is_name_piece);
    window.extend_right_while(thresholds.name_gap, is_name_piece);

    window.text().trim().to_string()
}

fn is_currency(text: &str) -> bool {
    let lowered = text.to_lowercase();
    CURRENCY_MARKERS.contains(&lowered.as_str())
}

fn is_numeric_fragment(text: &str) -> bool {
    NUMERIC_FRAGMENT.is_match(text)
}

fn is_name_piece(text: &str) -> bool {
    NAME_PIECE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_of(words: &[(&str, f32, f32)]) -> Vec<WordToken> {
        words
            .iter()
            .map(|(text, x0, x1)| WordToken::new(*text, [*x0, 0.0, *x1, 10.0], 0, 0))
            .collect()
    }

    fn expand_at(tokens: &[WordToken], picked: usize) -> String {
        let refs: Vec<&WordToken> = tokens.iter().collect();
        expand(&refs, picked, &SelectionThresholds::default())
    }

    #[test]
    fn test_currency_on_right() {
        let tokens = line_of(&[("120,50", 0.0, 30.0), ("EUR", 35.0, 55.0)]);
        assert_eq!(expand_at(&tokens, 0), "120,50 EUR");
    }

    #[test]
    fn test_currency_gap_threshold() {
        // The currency rule misses at 20 units, the numeric rule takes a lone €
        let tokens = line_of(&[("€", 0.0, 10.0), ("99", 30.0, 40.0)]);
        assert_eq!(expand_at(&tokens, 1), "€ 99");

        let tokens = line_of(&[("Euros", 0.0, 10.0), ("99", 30.0, 40.0)]);
        // Missed by the currency rule, but still a name piece within 25 units
        assert_eq!(expand_at(&tokens, 1), "Euros 99");
    }

    #[test]
    fn test_numeric_fragments() {
        let tokens = line_of(&[
            ("Total", 0.0, 30.0),
            ("1", 80.0, 85.0),
            ("234,56", 88.0, 120.0),
            ("€", 122.0, 128.0),
        ]);
        assert_eq!(expand_at(&tokens, 2), "1 234,56 €");
    }

    #[test]
    fn test_no_duplicate_currency() {
        let tokens = line_of(&[("120,50", 0.0, 30.0), ("€", 32.0, 38.0)]);
        assert_eq!(expand_at(&tokens, 0), "120,50 €");
    }

    #[test]
    fn test_name_pieces() {
        let tokens = line_of(&[
            ("Café", 0.0, 20.0),
            ("O'Brien", 24.0, 60.0),
            ("&", 62.0, 66.0),
            ("Sons", 70.0, 90.0),
            ("B-12", 95.0, 120.0),
        ]);
        assert_eq!(expand_at(&tokens, 1), "Café O'Brien & Sons");
    }

    #[test]
    fn test_single_word() {
        let tokens = line_of(&[("INV-2023/001", 0.0, 60.0)]);
        assert_eq!(expand_at(&tokens, 0), "INV-2023/001");
    }
}
