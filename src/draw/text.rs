//! Text measurement for node auto-sizing.
//!
//! Node boxes grow to fit their text, so the engine needs real font metrics
//! rather than per-character estimates. Measurement goes through a
//! process-wide [`TextManager`] that owns a reusable `cosmic_text`
//! [`FontSystem`]; creating one is expensive, so it is initialized once and
//! shared.

use std::sync::{Arc, Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use crate::geometry::Size;

const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Measures the rendered extent of a piece of text at the given font size.
///
/// Empty text measures zero in both dimensions.
pub fn measure_text(text: &str, font_size: f32) -> Size {
    text_manager().calculate_text_size(text, font_size)
}

fn text_manager() -> &'static TextManager {
    static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();
    TEXT_MANAGER.get_or_init(TextManager::new)
}

/// TextManager handles text measurement and font operations.
/// It maintains a reusable FontSystem instance to avoid expensive recreation.
struct TextManager {
    font_system: Arc<Mutex<FontSystem>>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Arc::new(Mutex::new(FontSystem::new())),
        }
    }

    /// Calculate the actual size of text in pixels using cosmic-text.
    /// This provides a measurement based on real font metrics and shaping.
    fn calculate_text_size(&self, text: &str, font_size: f32) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self.font_system.lock().expect("failed to lock FontSystem");

        // Convert font size from points to pixels (roughly 1.33x multiplier
        // for standard DPI)
        let font_size_px = font_size * 1.33;
        let line_height = font_size_px * 1.15;
        let metrics = Metrics::new(font_size_px, line_height);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(DEFAULT_FONT_FAMILY));

        // Unlimited buffer size lets the text flow naturally instead of
        // wrapping at an arbitrary width
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        let layout_runs: Vec<_> = buffer.layout_runs().collect();
        if !layout_runs.is_empty() {
            for last in layout_runs.iter().map(|run| run.glyphs.last()) {
                // Rightmost glyph position decides the run width
                if let Some(last) = last {
                    let run_width = last.x + last.w;
                    max_width = max_width.max(run_width);
                }
                total_height += metrics.line_height;
            }
        } else {
            // Fallback estimate when no font produced layout runs
            max_width = text.len() as f32 * (font_size_px * 0.55);
            total_height = metrics.line_height;
        }

        Size::new(max_width, total_height)
    }
}
