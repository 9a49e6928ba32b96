use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, pos2};

/// Maps layout coordinates onto the canvas. The layout center lands on the
/// canvas center, shifted by `pan` and scaled by `zoom`.
#[derive(Clone, Copy, Debug)]
pub(super) struct ViewTransform {
    pub(super) rect: Rect,
    pub(super) pan: Vec2,
    pub(super) zoom: f32,
    pub(super) origin: Vec2,
}

impl ViewTransform {
    pub(super) fn to_screen(self, world: Vec2) -> Pos2 {
        self.rect.center() + self.pan + (world - self.origin) * self.zoom
    }

    pub(super) fn to_world(self, screen: Pos2) -> Vec2 {
        (screen - self.rect.center() - self.pan) / self.zoom + self.origin
    }
}

pub(super) fn node_screen_radius(zoom: f32) -> f32 {
    (7.0 * zoom.powf(0.5)).clamp(2.5, 24.0)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * amount) as u8;

    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.4 + factor * 0.6)) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, view: ViewTransform) {
    let rect = view.rect;
    painter.rect_filled(rect, 0.0, Color32::from_rgb(17, 21, 28));

    let step = (80.0 * view.zoom).clamp(24.0, 160.0);
    let origin = view.to_screen(view.origin);
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(58, 68, 82, 60));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    rect.expand(radius).contains(position)
}

/// Cheap segment culling on the bounding box; long diagonals that only cross
/// a corner may still be drawn.
pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    Rect::from_two_pos(start, end)
        .expand(padding)
        .intersects(rect)
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn view() -> ViewTransform {
        ViewTransform {
            rect: Rect::from_min_size(pos2(10.0, 20.0), vec2(800.0, 600.0)),
            pan: vec2(15.0, -5.0),
            zoom: 1.5,
            origin: vec2(400.0, 300.0),
        }
    }

    #[test]
    fn screen_and_world_round_trip() {
        let view = view();
        let world = vec2(123.0, 456.0);
        let back = view.to_world(view.to_screen(world));
        assert!((back - world).length() < 1e-3);
        assert_eq!(view.to_screen(view.origin), view.rect.center() + view.pan);
    }

    #[test]
    fn culling() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(100.0, 100.0));
        assert!(circle_visible(rect, pos2(105.0, 50.0), 6.0));
        assert!(!circle_visible(rect, pos2(120.0, 50.0), 6.0));
        assert!(segment_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0), 1.0));
        assert!(!segment_visible(rect, pos2(-50.0, -50.0), pos2(-10.0, -10.0), 1.0));
    }

    #[test]
    fn blend_endpoints() {
        let a = Color32::from_rgb(0, 0, 0);
        let b = Color32::from_rgb(200, 100, 50);
        assert_eq!(blend_color(a, b, 0.0), a);
        assert_eq!(blend_color(a, b, 1.0), b);
    }
}
