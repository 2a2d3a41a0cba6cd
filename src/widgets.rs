use std::f32::consts::TAU;

use eframe::egui::{
    Align2, Color32, FontId, Painter, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2, Widget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Bell,
    Hourglass,
    Stopwatch,
    Speaker,
}

impl Icon {
    /// draws the icon inside `rect` with simple strokes
    pub fn paint(self, painter: &Painter, rect: Rect, stroke: Stroke) {
        let c = rect.center();
        let r = rect.width().min(rect.height()) / 2.;
        match self {
            Self::Bell => {
                let top = c + Vec2::new(0., -r * 0.7);
                let left = c + Vec2::new(-r * 0.6, r * 0.45);
                let right = c + Vec2::new(r * 0.6, r * 0.45);
                painter.line_segment([top, left], stroke);
                painter.line_segment([top, right], stroke);
                painter.line_segment(
                    [left + Vec2::new(-r * 0.15, 0.), right + Vec2::new(r * 0.15, 0.)],
                    stroke,
                );
                // clapper
                painter.circle_filled(
                    c + Vec2::new(0., r * 0.7),
                    stroke.width * 1.5,
                    stroke.color,
                );
                painter.circle_filled(top, stroke.width, stroke.color);
            }
            Self::Hourglass => {
                let tl = c + Vec2::new(-r * 0.5, -r * 0.75);
                let tr = c + Vec2::new(r * 0.5, -r * 0.75);
                let bl = c + Vec2::new(-r * 0.5, r * 0.75);
                let br = c + Vec2::new(r * 0.5, r * 0.75);
                painter.line_segment([tl, tr], stroke);
                painter.line_segment([bl, br], stroke);
                painter.line_segment([tl, br], stroke);
                painter.line_segment([tr, bl], stroke);
            }
            Self::Stopwatch => {
                let face = r * 0.65;
                let center = c + Vec2::new(0., r * 0.15);
                painter.circle_stroke(center, face, stroke);
                // crown
                let crown = center + Vec2::new(0., -face);
                painter.line_segment([crown, crown + Vec2::new(0., -r * 0.2)], stroke);
                // hand pointing at two o'clock
                let angle = TAU / 6. - TAU / 4.;
                painter.line_segment([center, center + Vec2::angled(angle) * face * 0.7], stroke);
            }
            Self::Speaker => {
                let body = Rect::from_center_size(
                    c + Vec2::new(-r * 0.45, 0.),
                    Vec2::new(r * 0.35, r * 0.6),
                );
                painter.rect_stroke(body, 1., stroke);
                let cone_top = c + Vec2::new(0., -r * 0.65);
                let cone_bottom = c + Vec2::new(0., r * 0.65);
                painter.line_segment([body.right_top(), cone_top], stroke);
                painter.line_segment([body.right_bottom(), cone_bottom], stroke);
                painter.line_segment([cone_top, cone_bottom], stroke);
                // sound waves
                for wave in 1..=2 {
                    let radius = r * 0.25 * wave as f32;
                    let origin = c + Vec2::new(r * 0.1, 0.);
                    let points: Vec<Pos2> = (-3..=3)
                        .map(|step| origin + Vec2::angled(step as f32 * TAU / 24.) * radius)
                        .collect();
                    for pair in points.windows(2) {
                        painter.line_segment([pair[0], pair[1]], stroke);
                    }
                }
            }
        }
    }
}

/// a navigation button made of a painted icon above a label
pub struct NavButton<'a> {
    icon: Icon,
    label: &'a str,
    selected: bool,
    accent: Option<Color32>,
}

impl<'a> NavButton<'a> {
    pub const fn new(icon: Icon, label: &'a str, selected: bool) -> Self {
        Self {
            icon,
            label,
            selected,
            accent: None,
        }
    }

    #[must_use]
    pub fn accent(mut self, color: Color32) -> Self {
        self.accent = Some(color);
        self
    }
}

impl Widget for NavButton<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let Self {
            icon,
            label,
            selected,
            accent,
        } = self;

        let desired_size = Vec2::new(ui.available_width().min(110.), 62.);
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click());
        let visuals = ui.style().interact_selectable(&response, selected);
        let painter = ui.painter();
        if selected || response.hovered() {
            painter.rect_filled(rect, 6., visuals.weak_bg_fill);
        }
        let color = if selected {
            accent.unwrap_or(visuals.fg_stroke.color)
        } else {
            visuals.fg_stroke.color
        };
        let icon_rect = Rect::from_center_size(
            rect.center_top() + Vec2::new(0., 20.),
            Vec2::splat(28.),
        );
        icon.paint(painter, icon_rect, Stroke::new(2., color));
        painter.text(
            rect.center_bottom() - Vec2::new(0., 8.),
            Align2::CENTER_BOTTOM,
            label,
            FontId::proportional(14.),
            color,
        );
        response
    }
}
