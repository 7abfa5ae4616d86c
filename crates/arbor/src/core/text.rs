use std::collections::HashMap;

use arbor_geom::Size;
use unicode_segmentation::UnicodeSegmentation;

/// Measures rendered text extents. Implemented by the host's font backend.
pub trait TextMeasure {
    /// Extent of `text` rendered in `font` at `size` points.
    fn measure(&self, font: &str, size: f32, text: &str) -> Size;
}

/// Fixed-advance metrics, for headless hosts and tests.
///
/// Every grapheme advances `advance * size`; each line is
/// `line_height * size` tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Advance per grapheme as a fraction of the font size.
    pub advance: f32,
    /// Line height as a fraction of the font size.
    pub line_height: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance: 0.5,
            line_height: 1.0,
        }
    }
}

impl TextMeasure for MonospaceMetrics {
    fn measure(&self, _font: &str, size: f32, text: &str) -> Size {
        if text.is_empty() {
            return Size::new(0.0, self.line_height * size);
        }
        let mut widest = 0;
        let mut lines = 0;
        for line in text.split('\n') {
            widest = widest.max(line.graphemes(true).count());
            lines += 1;
        }
        Size::new(
            widest as f32 * self.advance * size,
            lines as f32 * self.line_height * size,
        )
    }
}

/// Cache key for one measurement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MeasureKey {
    /// Font face name.
    font: String,
    /// Font size bit pattern.
    size: u32,
    /// Measured text.
    text: String,
}

/// Memoising front for a [`TextMeasure`] backend.
///
/// The layout pass asks for the same label extents every frame; the cache
/// answers repeats without touching the backend.
pub struct FontCache {
    /// Measurement backend.
    backend: Box<dyn TextMeasure>,
    /// Memoised extents.
    entries: HashMap<MeasureKey, Size>,
    /// Number of backend calls.
    misses: u64,
}

impl FontCache {
    /// Wrap a measurement backend.
    pub fn new(backend: impl TextMeasure + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            entries: HashMap::new(),
            misses: 0,
        }
    }

    /// A cache over default monospace metrics.
    pub fn monospace() -> Self {
        Self::new(MonospaceMetrics::default())
    }

    /// Measure text, consulting the cache first.
    pub fn measure(&mut self, font: &str, size: f32, text: &str) -> Size {
        let key = MeasureKey {
            font: font.into(),
            size: size.to_bits(),
            text: text.into(),
        };
        if let Some(s) = self.entries.get(&key) {
            return *s;
        }
        self.misses += 1;
        let s = self.backend.measure(font, size, text);
        self.entries.insert(key, s);
        s
    }

    /// Drop every cached measurement, e.g. after the host reloads fonts.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached measurements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the cache empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of measurements that reached the backend.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl Default for FontCache {
    fn default() -> Self {
        Self::monospace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monospace_extent() {
        let m = MonospaceMetrics::default();
        assert_eq!(m.measure("sans", 20.0, "abcd"), Size::new(40.0, 20.0));
        assert_eq!(m.measure("sans", 20.0, "ab\nabc"), Size::new(30.0, 40.0));
        assert_eq!(m.measure("sans", 10.0, ""), Size::new(0.0, 10.0));
        // One grapheme, two code points.
        assert_eq!(m.measure("sans", 10.0, "e\u{301}"), Size::new(5.0, 10.0));
    }

    #[test]
    fn cache_hits() {
        let mut fc = FontCache::monospace();
        let a = fc.measure("sans", 16.0, "hello");
        let b = fc.measure("sans", 16.0, "hello");
        assert_eq!(a, b);
        assert_eq!(fc.misses(), 1);
        fc.measure("sans", 18.0, "hello");
        assert_eq!(fc.misses(), 2);
        assert_eq!(fc.len(), 2);
        fc.clear();
        assert!(fc.is_empty());
    }
}
