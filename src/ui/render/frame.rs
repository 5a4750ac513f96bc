use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::{Backend, Frame},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::ui::model::{ControlApp, Focus};

use super::theme::{
    BUTTON_HEIGHT, INPUT_HEIGHT, INPUT_WIDTH, PANEL_MUTED_RGB, STATUS_HEIGHT, UI_MARGIN,
    alert_style, app_background_style, border_style, rgb, style_color, tone_style,
};

const TITLE: &str = "ytloop";
const HELP: &str = "Tab/Shift-Tab focus | digits edit | Enter press | q quit";
const BUTTON_WIDTH: u16 = 18;

pub fn draw_control<B: Backend>(f: &mut Frame<'_, B>, app: &ControlApp) {
    let size = f.size();
    f.render_widget(
        Block::default().style(app_background_style(app.no_color)),
        size,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(UI_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(BUTTON_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(size);

    let [title, inputs, buttons, status, alert, help] = chunks.as_ref() else {
        return;
    };

    let heading = format!("{} v{} | loop the video on screen", TITLE, env!("CARGO_PKG_VERSION"));
    f.render_widget(Paragraph::new(heading), *title);
    render_inputs(f, app, *inputs);
    render_buttons(f, app, *buttons);
    render_status(f, app, *status);
    if let Some(message) = app.alert.as_deref() {
        let text = format!("{}  (press any key)", message);
        f.render_widget(
            Paragraph::new(text)
                .style(alert_style(app.no_color))
                .wrap(Wrap { trim: true }),
            *alert,
        );
    }
    f.render_widget(
        Paragraph::new(Span::styled(
            HELP,
            style_color(app.no_color, rgb(PANEL_MUTED_RGB)),
        )),
        *help,
    );
}

fn render_inputs<B: Backend>(f: &mut Frame<'_, B>, app: &ControlApp, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(INPUT_WIDTH),
            Constraint::Length(INPUT_WIDTH),
            Constraint::Min(0),
        ])
        .split(area);
    let [minutes_area, seconds_area, _] = columns.as_ref() else {
        return;
    };
    let enabled = app.status.controls_enabled;
    let fields = [
        (&app.minutes, "Minutes", Focus::Minutes, *minutes_area),
        (&app.seconds, "Seconds", Focus::Seconds, *seconds_area),
    ];
    for (input, label, focus, field_area) in fields {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(label)
            .border_style(border_style(app.no_color, app.focus == focus, enabled));
        let text = if app.focus == focus && enabled {
            format!("{}_", input.text())
        } else {
            input.text().to_owned()
        };
        f.render_widget(Paragraph::new(text).block(block), field_area);
    }
}

fn render_buttons<B: Backend>(f: &mut Frame<'_, B>, app: &ControlApp, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Min(0),
        ])
        .split(area);
    let [set_area, current_area, disable_area, _] = columns.as_ref() else {
        return;
    };
    let enabled = app.status.controls_enabled;
    let buttons = [
        ("Set loop", Focus::SetLoop, *set_area),
        ("Use current", Focus::UseCurrent, *current_area),
        ("Disable", Focus::Disable, *disable_area),
    ];
    for (label, focus, button_area) in buttons {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(app.no_color, app.focus == focus, enabled));
        f.render_widget(
            Paragraph::new(label)
                .alignment(Alignment::Center)
                .block(block),
            button_area,
        );
    }
}

fn render_status<B: Backend>(f: &mut Frame<'_, B>, app: &ControlApp, area: Rect) {
    let lines = vec![
        Line::from(app.status.video_line.clone()),
        Line::from(Span::styled(
            app.status.loop_line.clone(),
            tone_style(app.no_color, app.status.tone),
        )),
    ];
    let block = Block::default().borders(Borders::ALL).title("Status");
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
