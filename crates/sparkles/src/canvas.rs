//! 2D drawing-context abstraction
//!
//! Mirrors the subset of the HTML canvas 2D API the sparkle renderers use, so
//! particles can paint into a browser canvas or an in-memory recorder alike.

/// Immediate-mode 2D drawing context
pub trait SparkleCanvas {
    /// Push the current drawing state
    fn save(&mut self);
    /// Pop the most recently saved drawing state
    fn restore(&mut self);
    fn set_global_alpha(&mut self, alpha: f64);
    /// Set the fill style as a CSS color string
    fn set_fill_style(&mut self, style: &str);
    /// Set the stroke style as a CSS color string
    fn set_stroke_style(&mut self, style: &str);
    fn set_line_width(&mut self, width: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Add a circular arc (angles in radians, clockwise)
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}

/// A viewport-sized drawing surface the pen overlays on the page
pub trait OverlaySurface: SparkleCanvas {
    /// Backing size in pixels
    fn size(&self) -> (u32, u32);

    /// Set the backing size in pixels
    fn resize(&mut self, width: u32, height: u32);

    /// Erase all visible content
    fn clear(&mut self) {
        let (width, height) = self.size();
        self.clear_rect(0.0, 0.0, width as f64, height as f64);
    }
}

/// Run `draw` between a `save`/`restore` pair so no state change leaks out.
pub fn scoped<C, F>(canvas: &mut C, draw: F)
where
    C: SparkleCanvas + ?Sized,
    F: FnOnce(&mut C),
{
    canvas.save();
    draw(canvas);
    canvas.restore();
}
