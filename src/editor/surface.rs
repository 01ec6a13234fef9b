//! Capability interface to the text rendering component
//!
//! The hover detector only ever talks to a `TextSurface`. `BufferSurface`
//! is the headless implementation over a `Document`, recording indicator
//! ranges instead of painting them.

use crate::model::Document;

/// Visual indicator styles a surface can paint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorStyle {
    /// Rounded box shown under a hovered URL
    HoverLink,
}

pub trait TextSurface {
    fn len_chars(&self) -> usize;

    fn char_at(&self, offset: usize) -> Option<char>;

    /// Text of `[start, end)`
    fn text_range(&self, start: usize, end: usize) -> String;

    fn set_indicator_range(&mut self, start: usize, end: usize, style: IndicatorStyle);

    fn clear_indicator_range(&mut self, start: usize, end: usize);

    /// Character offset under a point, or `None` when the point is not over text
    fn position_from_point(&self, x: f32, y: f32) -> Option<usize>;
}

/// A painted indicator range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub start: usize,
    pub end: usize,
    pub style: IndicatorStyle,
}

/// Indicator ranges currently applied to a document view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorLayer {
    ranges: Vec<Indicator>,
}

impl IndicatorLayer {
    pub fn fill(&mut self, start: usize, end: usize, style: IndicatorStyle) {
        if start < end {
            self.ranges.push(Indicator { start, end, style });
        }
    }

    /// Remove every indicator overlapping `[start, end)`
    pub fn clear(&mut self, start: usize, end: usize) {
        self.ranges.retain(|ind| ind.end <= start || ind.start >= end);
    }

    pub fn ranges(&self) -> &[Indicator] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Fixed-pitch geometry for mapping pixels to characters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharGrid {
    pub line_height: f32,
    pub char_width: f32,
    /// X coordinate where text starts (right of the margins)
    pub text_origin_x: f32,
    /// First visible line
    pub top_line: usize,
}

impl Default for CharGrid {
    fn default() -> Self {
        Self {
            line_height: 20.0,
            char_width: 10.0,
            text_origin_x: 0.0,
            top_line: 0,
        }
    }
}

/// `TextSurface` over an in-memory document
pub struct BufferSurface<'a> {
    pub document: &'a Document,
    pub indicators: &'a mut IndicatorLayer,
    pub grid: CharGrid,
}

impl<'a> BufferSurface<'a> {
    pub fn new(document: &'a Document, indicators: &'a mut IndicatorLayer, grid: CharGrid) -> Self {
        Self {
            document,
            indicators,
            grid,
        }
    }
}

impl TextSurface for BufferSurface<'_> {
    fn len_chars(&self) -> usize {
        self.document.len_chars()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.document.char_at(offset)
    }

    fn text_range(&self, start: usize, end: usize) -> String {
        self.document.text_range(start, end)
    }

    fn set_indicator_range(&mut self, start: usize, end: usize, style: IndicatorStyle) {
        self.indicators.fill(start, end, style);
    }

    fn clear_indicator_range(&mut self, start: usize, end: usize) {
        self.indicators.clear(start, end);
    }

    fn position_from_point(&self, x: f32, y: f32) -> Option<usize> {
        let grid = &self.grid;
        if x < grid.text_origin_x || y < 0.0 || grid.line_height <= 0.0 || grid.char_width <= 0.0 {
            return None;
        }

        let line = grid.top_line.saturating_add((y / grid.line_height) as usize);
        let column = ((x - grid.text_origin_x) / grid.char_width) as usize;

        // Only points over an actual character count as "close"
        let line_len = self.document.line_text(line)?.chars().count();
        if column >= line_len {
            return None;
        }
        Some(self.document.buffer.line_to_char(line) + column)
    }
}
