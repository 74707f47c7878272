//! Draws a [`Presentation`] into a ratatui frame.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Gauge, Paragraph, Tabs};

use crate::pomodoro::Presentation;

fn accent(view: &Presentation) -> Color {
    let (r, g, b) = view.mode.color();
    Color::Rgb(r, g, b)
}

pub fn draw(frame: &mut Frame, view: &Presentation) {
    let color = accent(view);
    let block = Block::bordered()
        .title(format!(" {} Tomato Timer ", view.mode.emoji()))
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(color));
    let inner = block.inner(frame.area());
    frame.render_widget(block, frame.area());

    let [tabs_area, time_area, status_area, gauge_area, counters_area, controls_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .areas(inner);

    draw_tabs(frame, tabs_area, view, color);

    let time = Paragraph::new(Line::from(Span::styled(
        view.time_text.clone(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(time, centered_row(time_area));

    frame.render_widget(
        Paragraph::new(view.status_text).alignment(Alignment::Center),
        status_area,
    );

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio(view.progress.clamp(0.0, 1.0))
        .label(format!("{:.0}%", view.progress * 100.0));
    frame.render_widget(gauge, gauge_area);

    let counters = Line::from(vec![
        Span::raw("Completed: "),
        Span::styled(
            view.completed_focus_text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   Cycles: "),
        Span::styled(
            view.cycle_text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(counters).alignment(Alignment::Center),
        counters_area,
    );

    let notify_style = if view.notification_control_enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let controls = Line::from(vec![
        Span::raw(format!("[space] {}  ", view.start_pause_label)),
        Span::raw("[r] Reset  "),
        Span::styled(format!("[n] {}", view.notification_label), notify_style),
    ]);
    frame.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center),
        controls_area,
    );
}

fn draw_tabs(frame: &mut Frame, area: Rect, view: &Presentation, color: Color) {
    let selected = view.tabs.iter().position(|t| t.active).unwrap_or(0);
    let titles: Vec<String> = view
        .tabs
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{} {}", i + 1, t.label))
        .collect();
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    frame.render_widget(tabs, area);
}

// Middle line of a three-line area
fn centered_row(area: Rect) -> Rect {
    if area.height < 3 {
        return area;
    }
    Rect {
        y: area.y + 1,
        height: 1,
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::notify::Permission;
    use crate::pomodoro::render::present;
    use crate::pomodoro::{PomodoroMode, TimerState};
    use ratatui::{Terminal, backend::TestBackend};

    fn rendered(view: &Presentation) -> String {
        let backend = TestBackend::new(60, 14);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, view)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_idle_screen() {
        let content = rendered(&present(&TimerState::new(), Permission::NotRequested));
        assert!(content.contains("25:00"));
        assert!(content.contains("Ready to focus"));
        assert!(content.contains("Focus"));
        assert!(content.contains("Short Break"));
        assert!(content.contains("Long Break"));
        assert!(content.contains("Start"));
        assert!(content.contains("Enable Notifications"));
        assert!(content.contains("Completed: 0"));
    }

    #[test]
    fn test_running_break_screen() {
        let mut state = TimerState::new();
        state.switch_mode(PomodoroMode::ShortBreak);
        state.set_running(true);
        let content = rendered(&present(&state, Permission::Granted));
        assert!(content.contains("05:00"));
        assert!(content.contains("Taking a break..."));
        assert!(content.contains("Pause"));
        assert!(content.contains("Notifications Enabled"));
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let backend = TestBackend::new(10, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let view = present(&TimerState::new(), Permission::Unsupported);
        terminal.draw(|f| draw(f, &view)).unwrap();
    }
}
