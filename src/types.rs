//! Core types for spark-typewriter.
//!
//! Colors, text attributes and rectangles. These flow from the props through
//! the typewriter state into the renderer.

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Using integers for exact comparison - no floating point epsilon needed.
/// Alpha 255 = fully opaque, 0 = fully transparent.
/// Special value: r=-1 means "terminal default" (let terminal pick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Check if this is the terminal default color.
    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    /// Dim the color by a factor (0.0 = black, 1.0 = unchanged).
    ///
    /// Terminals have no per-glyph alpha, so cursor opacity is rendered by
    /// dimming. The terminal default has no known channels and maps to gray
    /// once it is dimmed at all.
    #[inline]
    pub fn dim(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        if self.is_terminal_default() {
            return if factor >= 1.0 { self } else { Self::GRAY.dim(factor) };
        }
        Self {
            r: (self.r as f32 * factor).clamp(0.0, 255.0) as i16,
            g: (self.g as f32 * factor).clamp(0.0, 255.0) as i16,
            b: (self.b as f32 * factor).clamp(0.0, 255.0) as i16,
            a: self.a,
        }
    }

    /// Parse hex color string (#RGB, #RRGGBB, #RRGGBBAA).
    ///
    /// Returns None for invalid format.
    ///
    /// # Examples
    ///
    /// ```
    /// use spark_typewriter::types::Rgba;
    ///
    /// let red = Rgba::from_hex("#ff0000").unwrap();
    /// assert_eq!(red, Rgba::rgb(255, 0, 0));
    ///
    /// // #RGB shorthand (expands each digit)
    /// let white = Rgba::from_hex("#fff").unwrap();
    /// assert_eq!(white, Rgba::rgb(255, 255, 255));
    ///
    /// assert!(Rgba::from_hex("#gg0000").is_none());
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        fn hex_digit(c: u8) -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        }

        fn hex_byte(s: &[u8], i: usize) -> Option<u8> {
            let high = hex_digit(s[i])?;
            let low = hex_digit(s[i + 1])?;
            Some((high << 4) | low)
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = hex_digit(bytes[0])?;
                let g = hex_digit(bytes[1])?;
                let b = hex_digit(bytes[2])?;
                Some(Self::rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
            }
            6 => {
                let r = hex_byte(bytes, 0)?;
                let g = hex_byte(bytes, 2)?;
                let b = hex_byte(bytes, 4)?;
                Some(Self::rgb(r, g, b))
            }
            8 => {
                let r = hex_byte(bytes, 0)?;
                let g = hex_byte(bytes, 2)?;
                let b = hex_byte(bytes, 4)?;
                let a = hex_byte(bytes, 6)?;
                Some(Self::new(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Parse a color from a hex string, a basic color name or `default`.
    ///
    /// ```
    /// use spark_typewriter::types::Rgba;
    ///
    /// assert_eq!(Rgba::parse("#00ff00"), Some(Rgba::GREEN));
    /// assert_eq!(Rgba::parse("Cyan"), Some(Rgba::CYAN));
    /// assert!(Rgba::parse("default").unwrap().is_terminal_default());
    /// assert!(Rgba::parse("chartreuse-ish").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let lower = input.to_lowercase();
        let named = match lower.as_str() {
            "default" | "inherit" | "currentcolor" => Some(Self::TERMINAL_DEFAULT),
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::RED),
            "green" => Some(Self::GREEN),
            "blue" => Some(Self::BLUE),
            "yellow" => Some(Self::YELLOW),
            "cyan" => Some(Self::CYAN),
            "magenta" => Some(Self::MAGENTA),
            "gray" | "grey" => Some(Self::GRAY),
            _ => None,
        };
        if named.is_some() {
            return named;
        }

        if input.starts_with('#') || input.chars().all(|c| c.is_ascii_hexdigit()) {
            return Self::from_hex(input);
        }

        None
    }

    /// Convert to a crossterm color for terminal output.
    pub fn to_crossterm(self) -> crossterm::style::Color {
        if self.is_terminal_default() {
            crossterm::style::Color::Reset
        } else {
            crossterm::style::Color::Rgb {
                r: self.r.clamp(0, 255) as u8,
                g: self.g.clamp(0, 255) as u8,
                b: self.b.clamp(0, 255) as u8,
            }
        }
    }
}

// =============================================================================
// Text Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE = 1 << 5;
        const STRIKETHROUGH = 1 << 7;
    }
}

impl Attr {
    /// Parse a single attribute name as used in config files.
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "bold" => Some(Self::BOLD),
            "dim" => Some(Self::DIM),
            "italic" => Some(Self::ITALIC),
            "underline" => Some(Self::UNDERLINE),
            "inverse" => Some(Self::INVERSE),
            "strikethrough" => Some(Self::STRIKETHROUGH),
            _ => None,
        }
    }
}

// =============================================================================
// Rect - Element and viewport geometry
// =============================================================================

/// A rectangle in terminal cells.
///
/// `y` is signed so an element scrolled above the viewport keeps its
/// geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Area in cells.
    #[inline]
    pub fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Exclusive right edge (saturating at `i32::MAX`).
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    /// Exclusive bottom edge (saturating at `i32::MAX`).
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    /// Check if a point is inside this rect.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Compute intersection of two rects.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 > x1 && y2 > y1 {
            Some(Rect {
                x: x1,
                y: y1,
                width: (x2 - x1) as u16,
                height: (y2 - y1) as u16,
            })
        } else {
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_from_hex_rrggbb() {
        assert_eq!(Rgba::from_hex("#ff0000"), Some(Rgba::RED));
        assert_eq!(Rgba::from_hex("00ff00"), Some(Rgba::GREEN));
        assert_eq!(Rgba::from_hex("#abc"), Some(Rgba::rgb(0xaa, 0xbb, 0xcc)));
        assert_eq!(Rgba::from_hex("#ff000080"), Some(Rgba::new(255, 0, 0, 128)));
    }

    #[test]
    fn test_rgba_from_hex_invalid() {
        assert!(Rgba::from_hex("").is_none());
        assert!(Rgba::from_hex("#ff00").is_none());
        assert!(Rgba::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn test_rgba_parse_names_case_insensitive() {
        assert_eq!(Rgba::parse("RED"), Some(Rgba::RED));
        assert_eq!(Rgba::parse(" grey "), Some(Rgba::GRAY));
        assert!(Rgba::parse("currentColor").unwrap().is_terminal_default());
        assert!(Rgba::parse("").is_none());
        assert!(Rgba::parse("salmon").is_none());
    }

    #[test]
    fn test_rgba_dim() {
        assert_eq!(Rgba::WHITE.dim(0.5), Rgba::rgb(127, 127, 127));
        assert_eq!(Rgba::WHITE.dim(0.0), Rgba::BLACK);
        assert_eq!(Rgba::RED.dim(2.0), Rgba::RED);
        assert!(Rgba::TERMINAL_DEFAULT.dim(1.0).is_terminal_default());
        assert_eq!(Rgba::TERMINAL_DEFAULT.dim(0.0), Rgba::BLACK);
    }

    #[test]
    fn test_rgba_to_crossterm() {
        use crossterm::style::Color;
        assert_eq!(Rgba::TERMINAL_DEFAULT.to_crossterm(), Color::Reset);
        assert_eq!(Rgba::rgb(1, 2, 3).to_crossterm(), Color::Rgb { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn test_attr_from_config_name() {
        assert_eq!(Attr::from_config_name("Bold"), Some(Attr::BOLD));
        assert_eq!(Attr::from_config_name("blink"), None);
    }

    #[test]
    fn test_rect_intersect() {
        let viewport = Rect::new(0, 0, 80, 24);
        let element = Rect::new(10, 20, 20, 10);
        let hit = viewport.intersect(&element).unwrap();
        assert_eq!(hit, Rect::new(10, 20, 20, 4));
        assert_eq!(hit.area(), 80);

        let above = Rect::new(0, -5, 10, 5);
        assert!(viewport.intersect(&above).is_none());
        assert!(viewport.contains(0, 0));
        assert!(!viewport.contains(80, 0));
    }

    #[test]
    fn test_rect_edges_saturate() {
        let far = Rect::new(i32::MAX - 1, i32::MAX, 10, 10);
        assert_eq!(far.right(), i32::MAX);
        assert_eq!(far.bottom(), i32::MAX);
        assert!(!far.contains(i32::MAX, i32::MAX));
        assert!(far.intersect(&Rect::new(0, 0, 80, 24)).is_none());

        let near_min = Rect::new(i32::MIN, i32::MIN, 5, 5);
        assert!(near_min.contains(i32::MIN, i32::MIN + 4));
        assert!(near_min.intersect(&Rect::new(0, 0, 80, 24)).is_none());
    }
}
