//! Line-number margin sizing

/// Horizontal padding added to the widest line number, in pixels
pub const MARGIN_PADDING_LINE_NUMBERS: u32 = 8;

/// Font parameters the margin needs for measuring digits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub point_size: f32,
    /// Digit advance as a fraction of the point size (monospace)
    pub char_aspect: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            point_size: 10.0,
            char_aspect: 0.6,
        }
    }
}

impl FontSpec {
    pub fn with_point_size(point_size: f32) -> Self {
        Self {
            point_size,
            ..Self::default()
        }
    }

    /// Digit advance after applying `zoom` points, never below a 1pt font
    pub fn digit_width(&self, zoom: i32) -> f32 {
        let size = (self.point_size + zoom as f32).max(1.0);
        size * self.char_aspect
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineNumberMargin {
    width: u32,
}

impl LineNumberMargin {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn is_visible(&self) -> bool {
        self.width > 0
    }

    /// Size the margin to fit `line_count`
    pub fn update_width(&mut self, zoom: i32, font: &FontSpec, line_count: usize) {
        let digits = line_count.max(1).to_string().len() as f32;
        self.width = (digits * font.digit_width(zoom)).ceil() as u32 + MARGIN_PADDING_LINE_NUMBERS;
    }

    /// Show and resize the margin, or hide it
    pub fn update_visibility(&mut self, enabled: bool, zoom: i32, font: &FontSpec, line_count: usize) {
        if !enabled && !self.is_visible() {
            return;
        }

        if enabled {
            self.update_width(zoom, font, line_count);
        } else {
            self.width = 0;
        }
    }
}
