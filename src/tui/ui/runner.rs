use crate::variants::{RunState, RunnerGame};
use ratatui::prelude::*;
use ratatui::widgets::canvas::{Canvas, Rectangle};
use ratatui::widgets::*;

pub(super) fn draw_runner(f: &mut Frame, area: Rect, game: &RunnerGame) {
    let cfg = game.config();
    let title = match game.state() {
        RunState::Start => " Geometry Runner: press Space to start ".to_string(),
        RunState::Paused => " Geometry Runner (paused) ".to_string(),
        RunState::Ended => format!(" Game over! Score {}: Space to run again ", game.score()),
        _ => format!(" Geometry Runner  score {}  level {} ", game.score(), game.level()),
    };

    // Lane y grows downwards; the canvas y grows upwards.
    let flip = |y: f32, h: f32| f64::from(cfg.lane_height - y - h);
    let canvas = Canvas::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_bounds([0.0, f64::from(cfg.lane_width)])
        .y_bounds([0.0, f64::from(cfg.lane_height)])
        .paint(|ctx| {
            let a = game.actor().rect;
            ctx.draw(&Rectangle {
                x: f64::from(a.x),
                y: flip(a.y, a.h),
                width: f64::from(a.w),
                height: f64::from(a.h),
                color: Color::Cyan,
            });
            for o in game.obstacles() {
                ctx.draw(&Rectangle {
                    x: f64::from(o.rect.x),
                    y: flip(o.rect.y, o.rect.h),
                    width: f64::from(o.rect.w),
                    height: f64::from(o.rect.h),
                    color: Color::Red,
                });
            }
        });
    f.render_widget(canvas, area);
}
