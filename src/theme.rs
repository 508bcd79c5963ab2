//! Black canvas, greyscale chrome, red sparks

use egui::Color32;

pub mod colors {
    use super::Color32;

    pub const BG_CANVAS: Color32 = Color32::from_rgb(0, 0, 0);
    pub const BG_PANEL: Color32 = Color32::from_rgb(10, 10, 10);
    pub const BG_HOVER: Color32 = Color32::from_rgb(28, 28, 28);

    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 240);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 160, 160);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(90, 90, 90);

    pub const BORDER: Color32 = Color32::from_rgb(40, 40, 40);

    /// Spark color for the CPU painter; matches the fragment shader
    pub const SPARK: [u8; 3] = [255, 0, 0];
}

/// Dark visuals with a pure black canvas
pub fn canvas_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = BG_CANVAS;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_CANVAS;
    visuals.faint_bg_color = BG_PANEL;
    visuals.override_text_color = Some(TEXT_PRIMARY);

    visuals.widgets.noninteractive.bg_fill = BG_PANEL;
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);
    visuals.widgets.inactive.weak_bg_fill = BG_PANEL;
    visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.hovered.weak_bg_fill = BG_HOVER;
    visuals.widgets.active.weak_bg_fill = BG_HOVER;

    visuals.selection.bg_fill = Color32::from_rgb(90, 20, 20);
    visuals.selection.stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);

    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}

/// CPU-painted spark color for a given point size
pub fn spark_color(size: f32, fade_size: f32) -> Color32 {
    let alpha = (size / fade_size).clamp(0.0, 1.0);
    let [r, g, b] = colors::SPARK;
    Color32::from_rgba_unmultiplied(r, g, b, (alpha * 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spark_alpha_follows_size() {
        assert_eq!(spark_color(20.0, 20.0).a(), 255);
        assert_eq!(spark_color(40.0, 20.0).a(), 255);
        assert_eq!(spark_color(10.0, 20.0).a(), 127);
        assert_eq!(spark_color(0.0, 20.0).a(), 0);
    }
}
