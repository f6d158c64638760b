use ratatui::{prelude::*, widgets::*};

use crate::app::{App, InputField};
use crate::config::ThemeName;
use crate::timer::{Notice, Phase};

#[derive(Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub work_color: Color,
    pub break_color: Color,
    pub border_color: Color,
    pub accent_color: Color,
}

impl Theme {
    pub fn phase_color(&self, phase: Phase) -> Color {
        match phase {
            Phase::Work => self.work_color,
            Phase::Break => self.break_color,
        }
    }
}

pub fn get_theme(name: ThemeName) -> Theme {
    match name {
        ThemeName::Dark => Theme {
            background: Color::Rgb(44, 44, 44),
            foreground: Color::Rgb(255, 255, 255),
            work_color: Color::Rgb(255, 99, 71),
            break_color: Color::Rgb(50, 205, 50),
            border_color: Color::Rgb(120, 120, 120),
            accent_color: Color::Rgb(233, 30, 99),
        },
        ThemeName::Light => Theme {
            background: Color::Rgb(255, 250, 240),
            foreground: Color::Rgb(51, 51, 51),
            work_color: Color::Rgb(255, 99, 71),
            break_color: Color::Rgb(50, 205, 50),
            border_color: Color::Rgb(0, 140, 186),
            accent_color: Color::Rgb(233, 30, 99),
        },
    }
}

// ============================================================================
// UI Rendering
// ============================================================================

pub fn render(f: &mut Frame, app: &App) {
    let theme = get_theme(app.theme);
    render_timer(f, app, &theme);

    if app.show_help {
        render_help(f, &theme);
    }
    if let Some(notice) = app.screen.notice {
        render_notice(f, notice, &theme);
    }
}

fn render_timer(f: &mut Frame, app: &App, theme: &Theme) {
    let base = Style::default().bg(theme.background).fg(theme.foreground);
    f.render_widget(Block::default().style(base), f.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(2)])
        .split(f.size());

    let header = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_color))
        .title(Span::styled(" 🍅 Pomodoro Timer ", Style::default()
            .fg(theme.accent_color).add_modifier(Modifier::BOLD)))
        .title_alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(3), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(chunks[1]);

    let accent = theme.phase_color(app.screen.accent);
    let timer = app.timer();

    f.render_widget(
        Paragraph::new(timer.phase().name())
            .style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[1]
    );

    f.render_widget(
        Paragraph::new(app.screen.countdown.as_str())
            .style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[3]
    );

    let status = if timer.is_running() {
        let ends = chrono::Local::now() + chrono::Duration::seconds(i64::from(timer.remaining_secs()));
        format!("▶ RUNNING  •  ends at {}", ends.format("%H:%M"))
    } else {
        format!(
            "⏸ STOPPED  •  work {} min / break {} min",
            timer.work_duration_secs() / 60,
            timer.break_duration_secs() / 60
        )
    };
    f.render_widget(
        Paragraph::new(status)
            .style(Style::default()
                .fg(if timer.is_running() { Color::Green } else { Color::Yellow })
                .add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[5]
    );

    let gauge_area = centered_cols(60, sections[7]);
    f.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.border_color)))
            .gauge_style(Style::default().fg(accent).bg(theme.background))
            .percent(app.screen.progress.clamp(0.0, 100.0) as u16),
        gauge_area
    );

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Work (min): "),
            input_span(&app.work_input, app.focus == InputField::Work, theme),
            Span::raw("    Break (min): "),
            input_span(&app.break_input, app.focus == InputField::Break, theme),
        ]))
        .alignment(Alignment::Center),
        sections[9]
    );

    f.render_widget(
        Paragraph::new(format!("Completed Sessions: {}", app.screen.sessions))
            .alignment(Alignment::Center),
        sections[11]
    );

    let controls = vec![
        Line::from(vec![
            span_key("S", theme), Span::raw(" Start  •  "),
            span_key("P", theme), Span::raw(" Stop  •  "),
            span_key("R", theme), Span::raw(" Reset  •  "),
            span_key("U", theme), Span::raw(" Update"),
        ]),
        Line::from(vec![
            span_key("Tab", theme), Span::raw(" Field  •  "),
            span_key("T", theme), Span::raw(" Theme  •  "),
            span_key("?", theme), Span::raw(" Help  •  "),
            span_key("Q", theme), Span::raw(" Quit"),
        ]),
    ];
    f.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center).style(Style::default().fg(Color::DarkGray)),
        chunks[2]
    );
}

fn input_span<'a>(text: &'a str, focused: bool, theme: &Theme) -> Span<'a> {
    let style = if focused {
        Style::default().fg(theme.accent_color).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().add_modifier(Modifier::UNDERLINED)
    };
    let text = if text.is_empty() { "  " } else { text };
    Span::styled(text, style)
}

fn span_key<'a>(text: &'a str, theme: &Theme) -> Span<'a> {
    Span::styled(text, Style::default().fg(theme.accent_color).add_modifier(Modifier::BOLD))
}

fn render_help(f: &mut Frame, theme: &Theme) {
    let area = centered_rect(60, 70, f.size());

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("⌨️  KEYBOARD SHORTCUTS", Style::default().fg(theme.accent_color).add_modifier(Modifier::BOLD))),
        Line::from(""),
        help_line("S", "Start the countdown"),
        help_line("P / X", "Stop the countdown"),
        help_line("R", "Reset the current phase"),
        help_line("Tab", "Switch between work and break minutes"),
        help_line("0-9 / ⌫", "Edit the selected minutes"),
        help_line("U / Enter", "Apply work and break minutes"),
        help_line("T", "Toggle light/dark theme"),
        help_line("Q / Esc", "Quit"),
        help_line("Ctrl+C", "Force quit"),
    ];

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(help_text)
            .style(Style::default().bg(theme.background).fg(theme.foreground))
            .block(Block::default()
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.border_color))),
        area
    );
}

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("    "),
        Span::styled(key, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}", desc)),
    ])
}

fn render_notice(f: &mut Frame, notice: Notice, theme: &Theme) {
    let area = centered_rect(60, 30, f.size());
    let border = match notice {
        Notice::InvalidConfiguration => Color::Red,
        Notice::WorkComplete => theme.break_color,
        Notice::BreakOver => theme.work_color,
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(notice.message(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled("Press Enter to continue", Style::default()
            .fg(Color::DarkGray).add_modifier(Modifier::ITALIC))),
    ];

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(theme.background).fg(theme.foreground))
            .block(Block::default()
                .title(format!(" {} ", notice.title()))
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border))),
        area
    );
}

fn centered_cols(w: u16, r: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w) / 2),
            Constraint::Percentage(w),
            Constraint::Percentage((100 - w) / 2),
        ])
        .split(r)[1]
}

fn centered_rect(w: u16, h: u16, r: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h) / 2),
            Constraint::Percentage(h),
            Constraint::Percentage((100 - h) / 2),
        ])
        .split(r);

    centered_cols(w, v[1])
}
