//! Off-screen surface, compositing and the host display seam.

pub mod compositor;
pub mod surface;

/// Narrow seam through which the host displays the composited surface.
///
/// The crate never schedules repaints itself; it hands the persistent surface
/// to whatever the host uses as a display target once per repaint request.
pub trait RenderTarget {
    /// Receives the composited surface as premultiplied RGBA8 rows.
    fn blit(&mut self, width: u32, height: u32, premultiplied_rgba: &[u8]);
}
