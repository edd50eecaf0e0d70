//! Drawing surface abstraction
//!
//! The driver only needs three things from whatever it draws on: a clearable
//! region of known pixel size, a fill colour, and filled rectangles.

/// Linear RGBA colour, components in `0.0..=1.0`
pub type Rgba = [f32; 4];

/// A 2D surface the frame driver can paint particles onto
pub trait DrawSurface {
    /// Drawable size in pixels
    fn size(&self) -> (u32, u32);

    /// Erase a rectangle back to transparent
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Colour used by subsequent [`fill_rect`](Self::fill_rect) calls
    fn set_fill_color(&mut self, color: Rgba);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Erase the whole drawable region
    fn clear(&mut self) {
        let (w, h) = self.size();
        self.clear_rect(0.0, 0.0, w as f32, h as f32);
    }

    /// Called once per frame after every particle has been drawn.
    /// Immediate-mode surfaces have nothing to do here.
    fn present(&mut self) {}
}

impl<T: DrawSurface + ?Sized> DrawSurface for &mut T {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        (**self).clear_rect(x, y, width, height);
    }

    fn set_fill_color(&mut self, color: Rgba) {
        (**self).set_fill_color(color);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        (**self).fill_rect(x, y, width, height);
    }

    fn present(&mut self) {
        (**self).present();
    }
}

/// Convert a colour to a CSS `rgba()` string (canvas 2D fill style)
pub fn css_color(color: Rgba) -> String {
    let [r, g, b, a] = color;
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("rgba({}, {}, {}, {})", channel(r), channel(g), channel(b), a.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_color() {
        assert_eq!(css_color([1.0, 1.0, 1.0, 1.0]), "rgba(255, 255, 255, 1)");
        assert_eq!(css_color([0.0, 0.5, 2.0, 0.5]), "rgba(0, 128, 255, 0.5)");
    }
}
