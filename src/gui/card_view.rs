use std::{
    f32::consts::{
        FRAC_PI_2,
        PI,
    },
    time::{
        Duration,
        Instant,
    },
};

use eframe::egui::{
    self,
    Align2,
    FontId,
    Pos2,
    Rect,
    Sense,
    StrokeKind,
    Vec2,
};
use rand::Rng;

use super::{
    actions::ActionQueue,
    theme::Theme,
};
use crate::core::{
    Intent,
    StudySession,
    TransitionHandle,
};

const CARD_MAX_WIDTH: f32 = 440.0;
const CARD_HEIGHT: f32 = 280.0;
const CORNER_RADIUS: f32 = 14.0;
const EXIT_DURATION: Duration = Duration::from_millis(350);
const SNAP_DURATION: Duration = Duration::from_millis(180);
const FLIP_SECONDS: f32 = 0.3;

struct Exit {
    handle: TransitionHandle,
    from_x: f32,
}

struct SnapBack {
    from_x: f32,
    started_at: Instant,
}

/// Draws the current card and turns pointer input on it into intents.
///
/// The exit animation of a pending transition is driven from the
/// transition's start time; once it has run its course the view reports
/// `TransitionFinished` so the controller can move the cursor.
#[derive(Default)]
pub struct CardView {
    exit: Option<Exit>,
    snap: Option<SnapBack>,
    last_offset: f32,
    was_dragging: bool,
}

impl CardView {
    pub fn show<R: Rng>(
        &mut self,
        ui: &mut egui::Ui,
        session: &StudySession<R>,
        theme: &Theme,
        actions: &mut ActionQueue,
    ) {
        let nav = session.navigation();
        let gesture = session.gesture();
        let ctx = ui.ctx().clone();
        let now = Instant::now();

        let width = ui.available_width().min(CARD_MAX_WIDTH);
        let (slot, _) =
            ui.allocate_exact_size(Vec2::new(ui.available_width(), CARD_HEIGHT), Sense::hover());

        let (Some(record), Some(card)) = (nav.current(), nav.card()) else {
            self.reset();
            let message = nav.empty_state().map_or("", |state| state.message());
            ui.painter().text(
                slot.center(),
                Align2::CENTER_CENTER,
                message,
                FontId::proportional(18.0),
                theme.muted(&ctx),
            );
            return;
        };

        let home = Rect::from_center_size(slot.center(), Vec2::new(width, CARD_HEIGHT));
        let response = ui.interact(home, ui.id().with("flashcard"), Sense::click_and_drag());
        let press_origin = ui.input(|i| i.pointer.press_origin());
        Self::handle_input(&response, press_origin, gesture.is_dragging(), actions);

        if self.was_dragging && !gesture.is_dragging() && nav.pending().is_none() {
            self.snap = Some(SnapBack { from_x: self.last_offset, started_at: now });
        }

        let mut animating = false;
        let (offset, alpha) = match nav.pending() {
            Some(transition) => {
                if self.exit.as_ref().map(|exit| exit.handle) != Some(transition.handle) {
                    self.exit = Some(Exit { handle: transition.handle, from_x: self.last_offset });
                }
                let from_x = self.exit.as_ref().map_or(0.0, |exit| exit.from_x);
                let t = progress(transition.started_at, now, EXIT_DURATION);
                if t >= 1.0 {
                    actions.push(Intent::TransitionFinished(transition.handle));
                }
                animating = true;
                let target = transition.direction.exit_sign() * (width + 40.0);
                (lerp(from_x, target, t * t), 1.0 - t)
            }
            None if gesture.is_dragging() => {
                self.exit = None;
                self.snap = None;
                (gesture.transform(card.flipped).translate_x, 1.0)
            }
            None => {
                self.exit = None;
                match &self.snap {
                    Some(snap) => {
                        let t = progress(snap.started_at, now, SNAP_DURATION);
                        let offset = lerp(snap.from_x, 0.0, 1.0 - (1.0 - t) * (1.0 - t));
                        if t >= 1.0 {
                            self.snap = None;
                        } else {
                            animating = true;
                        }
                        (offset, 1.0)
                    }
                    None => (0.0, 1.0),
                }
            }
        };

        let flip_t = ctx.animate_bool_with_time(
            ui.id().with(("flip", card.generation)),
            card.flipped,
            FLIP_SECONDS,
        );
        let rotation = if gesture.is_dragging() {
            gesture.transform(card.flipped).rotate_y.to_radians()
        } else {
            flip_t * PI
        };
        let showing_back = rotation > FRAC_PI_2;
        let scale_x = rotation.cos().abs().max(0.02);

        let rect = Rect::from_center_size(
            home.center() + Vec2::new(offset, 0.0),
            Vec2::new(width * scale_x, CARD_HEIGHT),
        );
        let painter = ui.painter();
        let fill = if showing_back { theme.card_back(&ctx) } else { theme.card_front(&ctx) };
        let mut stroke = theme.card_stroke(&ctx);
        stroke.color = stroke.color.gamma_multiply(alpha);
        painter.rect_filled(rect, CORNER_RADIUS, fill.gamma_multiply(alpha));
        painter.rect_stroke(rect, CORNER_RADIUS, stroke, StrokeKind::Inside);

        let text_color = theme.foreground(&ctx).gamma_multiply(alpha);
        if scale_x > 0.2 {
            if showing_back {
                let galley = painter.layout(
                    record.back_text(),
                    FontId::proportional(22.0),
                    text_color,
                    (rect.width() - 48.0).max(1.0),
                );
                let pos = rect.center() - galley.size() / 2.0;
                painter.galley(pos, galley, text_color);
            } else {
                painter.text(
                    rect.center() - Vec2::new(0.0, 12.0),
                    Align2::CENTER_CENTER,
                    &record.term,
                    FontId::proportional(60.0),
                    text_color,
                );
                if !record.category.is_empty() {
                    painter.text(
                        rect.center_bottom() - Vec2::new(0.0, 28.0),
                        Align2::CENTER_CENTER,
                        format!("({})", record.category),
                        FontId::proportional(15.0),
                        theme.muted(&ctx).gamma_multiply(alpha),
                    );
                }
            }
        }

        // Added after the card so it wins the click.
        if showing_back && !animating && flip_t >= 1.0 {
            let button_rect =
                Rect::from_min_size(rect.right_bottom() - Vec2::new(56.0, 50.0), Vec2::new(40.0, 36.0));
            let button = egui::Button::new(egui::RichText::new("🔊").size(18.0));
            if ui.put(button_rect, button).on_hover_text("Play pronunciation").clicked() {
                actions.push(Intent::Speak);
            }
        }

        self.last_offset = offset;
        self.was_dragging = gesture.is_dragging();

        if animating {
            ctx.request_repaint();
        }
    }

    fn handle_input(
        response: &egui::Response,
        press_origin: Option<Pos2>,
        dragging: bool,
        actions: &mut ActionQueue,
    ) {
        if response.drag_started() {
            // egui reports the drag only after the pointer left the click
            // radius, so the swipe is measured from where the press began.
            if let Some(origin) = press_origin.or_else(|| response.interact_pointer_pos()) {
                actions.push(Intent::DragStart(origin.x));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                actions.push(Intent::DragUpdate(pos.x));
            }
        }

        if response.drag_stopped() {
            actions.push(Intent::DragEnd);
            if response.clicked() {
                actions.push(Intent::Click);
            }
            actions.push(Intent::PointerReleased);
        } else if dragging && !response.dragged() {
            actions.push(Intent::DragCancel);
            actions.push(Intent::PointerReleased);
        } else if response.clicked() {
            actions.push(Intent::Click);
        }
    }

    fn reset(&mut self) {
        self.exit = None;
        self.snap = None;
        self.last_offset = 0.0;
        self.was_dragging = false;
    }
}

fn progress(started_at: Instant, now: Instant, duration: Duration) -> f32 {
    let elapsed = now.saturating_duration_since(started_at).as_secs_f32();
    (elapsed / duration.as_secs_f32()).clamp(0.0, 1.0)
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
