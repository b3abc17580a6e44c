//! Text layers with fixed capacity text buffers

use core::fmt;

use embedded_graphics::{
    geometry::AnchorPoint,
    mono_font::MonoTextStyle,
    pixelcolor::{Rgb565, RgbColor},
    prelude::*,
    primitives::Rectangle,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use super::Font;

/// Text stored in place, at most `N` bytes
#[derive(Debug, Clone)]
pub struct Label<const N: usize> {
    str_buf: [u8; N],
    len: usize,
}

impl<const N: usize> Default for Label<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Label<N> {
    /// Create new empty label
    pub const fn new() -> Self {
        Self {
            str_buf: [0; N],
            len: 0,
        }
    }

    pub fn as_str(&self) -> &str {
        // Only whole `str`s are ever copied into the buffer
        core::str::from_utf8(&self.str_buf[..self.len]).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Replace the content with formatted text.
    ///
    /// On overflow the label is left empty.
    pub fn show(&mut self, args: fmt::Arguments) -> fmt::Result {
        let written = format_no_std::show(&mut self.str_buf, args).map(str::len);
        match written {
            Ok(len) => {
                self.len = len;
                Ok(())
            }
            Err(e) => {
                self.len = 0;
                Err(e)
            }
        }
    }

    /// Replace the content with `text`
    pub fn set(&mut self, text: &str) -> fmt::Result {
        self.show(format_args!("{}", text))
    }

    /// Append a single character behind the current content
    pub fn push(&mut self, c: char) -> fmt::Result {
        let mut utf8 = [0; 4];
        let bytes = c.encode_utf8(&mut utf8).as_bytes();
        let end = self.len + bytes.len();
        if end > N {
            return Err(fmt::Error);
        }

        self.str_buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }
}

/// Positioned, styled text element
#[derive(Debug, Clone)]
pub struct TextLayer<const N: usize> {
    /// Position and size on the face
    frame: Rectangle,
    /// Fill color, `None` leaves the pixels behind untouched
    background: Option<Rgb565>,
    text_color: Rgb565,
    font: Font,
    alignment: Alignment,
    text: Label<N>,
    dirty: bool,
}

impl<const N: usize> TextLayer<N> {
    /// Create new layer with white background and black system text
    pub fn new(frame: Rectangle) -> Self {
        Self {
            frame,
            background: Some(Rgb565::WHITE),
            text_color: Rgb565::BLACK,
            font: Font::System,
            alignment: Alignment::Left,
            text: Label::new(),
            dirty: true,
        }
    }

    pub fn with_background(mut self, background: Option<Rgb565>) -> Self {
        self.background = background;
        self
    }

    pub fn with_text_color(mut self, color: Rgb565) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn frame(&self) -> Rectangle {
        self.frame
    }

    pub fn background(&self) -> Option<Rgb565> {
        self.background
    }

    pub fn text_color(&self) -> Rgb565 {
        self.text_color
    }

    pub fn font(&self) -> Font {
        self.font
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn set_text_color(&mut self, color: Rgb565) {
        self.text_color = color;
        self.dirty = true;
    }

    pub fn set_text(&mut self, text: &str) -> fmt::Result {
        self.dirty = true;
        self.text.set(text)
    }

    /// Text buffer for rewriting in place, marks the layer dirty
    pub fn label_mut(&mut self) -> &mut Label<N> {
        self.dirty = true;
        &mut self.text
    }

    /// Draw background and text, clipped to the frame
    pub fn draw<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let mut clipped = target.clipped(&self.frame);

        if let Some(background) = self.background {
            clipped.fill_solid(&self.frame, background)?;
        }

        if !self.text.is_empty() {
            let anchor = match self.alignment {
                Alignment::Left => AnchorPoint::TopLeft,
                Alignment::Center => AnchorPoint::TopCenter,
                Alignment::Right => AnchorPoint::TopRight,
            };
            let character_style = MonoTextStyle::new(self.font.mono_font(), self.text_color);
            let text_style = TextStyleBuilder::new()
                .alignment(self.alignment)
                .baseline(Baseline::Top)
                .build();

            Text::with_text_style(
                self.text.as_str(),
                self.frame.anchor_point(anchor),
                character_style,
                text_style,
            )
            .draw(&mut clipped)?;
        }

        self.dirty = false;
        Ok(())
    }
}
