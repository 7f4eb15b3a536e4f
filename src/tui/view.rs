// File: src/tui/view.rs
use crate::autoscroll::ScrollMode;
use crate::color_utils;
use crate::model::{ItemStatus, ScheduleItem};
use crate::tui::state::{AppState, InputMode, Row};

use chrono::Timelike;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::time::Instant as MonotonicInstant;

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let full_help_text = vec![
        Line::from(vec![
            Span::styled(
                " GLOBAL ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ?:Toggle Help  q:Quit  i:Import sheet  d:Dismiss problems"),
        ]),
        Line::from(vec![
            Span::styled(
                " NAVIGATION ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" j/k:Up/Down  PgUp/PgDn/Wheel:Scroll (pauses auto-scroll)"),
        ]),
        Line::from(vec![
            Span::styled(
                " ITEMS ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Space/Enter:Toggle Done  a:Auto-scroll on/off"),
        ]),
    ];

    let footer_height = if state.show_full_help {
        Constraint::Length(full_help_text.len() as u16 + 2)
    } else {
        Constraint::Length(3)
    };

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), footer_height])
        .split(f.area());

    draw_clock(f, state, v_chunks[0]);

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(v_chunks[1]);

    draw_timeline(f, state, h_chunks[0]);

    // Details
    let details = Paragraph::new(details_lines(state.get_selected_item(), state))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    f.render_widget(details, h_chunks[1]);

    // Footer
    let footer_area = v_chunks[2];
    f.render_widget(Clear, footer_area);

    match state.mode {
        InputMode::Importing => {
            let prefix = "> ";
            let input = Paragraph::new(Line::from(vec![
                Span::styled(prefix, Style::default().fg(Color::Yellow)),
                Span::raw(&state.input_buffer),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Import sheet (CSV path) "),
            )
            .wrap(Wrap { trim: false });
            f.render_widget(input, footer_area);

            let cursor_x =
                footer_area.x + 1 + prefix.chars().count() as u16 + state.cursor_position as u16;
            f.set_cursor_position((
                cursor_x.min(footer_area.x + footer_area.width.saturating_sub(2)),
                footer_area.y + 1,
            ));
        }
        InputMode::Normal => {
            if state.show_full_help {
                let p = Paragraph::new(full_help_text)
                    .block(Block::default().borders(Borders::ALL).title(" Help "))
                    .wrap(Wrap { trim: false });
                f.render_widget(p, footer_area);
            } else {
                let status = Paragraph::new(state.message.clone())
                    .style(Style::default().fg(Color::Cyan))
                    .block(
                        Block::default()
                            .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                            .title(" Status "),
                    );
                let help = Paragraph::new("?:Help q:Quit i:Import Spc:Done a:Auto d:Dismiss")
                    .alignment(Alignment::Right)
                    .block(
                        Block::default()
                            .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                            .title(" Actions "),
                    );

                let chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(footer_area);
                f.render_widget(status, chunks[0]);
                f.render_widget(help, chunks[1]);
            }
        }
    }

    if !state.diagnostics.is_empty() {
        let area = centered_rect(70, 50, f.area());
        let lines: Vec<Line> = state
            .diagnostics
            .iter()
            .map(|d| Line::from(Span::raw(d.to_string())))
            .collect();
        let p = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::LightRed))
                    .title(format!(
                        " {} row(s) skipped, d to dismiss ",
                        state.diagnostics.len()
                    )),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(Clear, area);
        f.render_widget(p, area);
    }
}

/// Wall clock, a seconds bar and the scroll mode.
fn draw_clock(f: &mut Frame, state: &AppState, area: Rect) {
    let now = state.run.now;
    let second = now.second() as usize;

    let bar: String = (0..60)
        .map(|i| match (i <= second, i % 15 == 0) {
            (true, _) => '#',
            (false, true) => '|',
            (false, false) => '.',
        })
        .collect();

    let auto = &state.run.autoscroll;
    let (mode_label, mode_style) = if !auto.is_enabled() {
        ("AUTO OFF".to_string(), Style::default().fg(Color::DarkGray))
    } else {
        match auto.mode() {
            ScrollMode::Auto => ("AUTO".to_string(), Style::default().fg(Color::Green)),
            ScrollMode::ManualOverride => {
                let label = match auto.resume_deadline() {
                    Some(deadline) => format!(
                        "MANUAL {}s",
                        deadline
                            .saturating_duration_since(MonotonicInstant::now())
                            .as_secs()
                            + 1
                    ),
                    None => "MANUAL".to_string(),
                };
                (label, Style::default().fg(Color::Yellow))
            }
        }
    };

    let counts = state.run.counts();
    let line = Line::from(vec![
        Span::styled(
            now.format(" %H:%M:%S ").to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(bar, Style::default().fg(Color::Blue)),
        Span::raw("  "),
        Span::styled(mode_label, mode_style.add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(
                "  on air {} | next {} | past {} | done {}",
                counts.active, counts.upcoming, counts.past, counts.completed
            ),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let p = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(now.format(" %A %d %B ").to_string()),
    );
    f.render_widget(p, area);
}

fn draw_timeline(f: &mut Frame, state: &mut AppState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(format!(
        " Run-down ({}) ",
        state.run.items.len()
    ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    state.viewport.set_height(inner.height as usize);

    let now = state.run.now;
    let selected = state.selected_id.as_deref();
    let lines: Vec<Line> = state
        .rows
        .iter()
        .skip(state.viewport.offset)
        .take(inner.height as usize)
        .map(|row| match row {
            Row::Hour(label) => Line::from(Span::styled(
                format!("-- {} ", label),
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            )),
            Row::Item(item) => item_line(item, item.status_at(now), selected == Some(&item.id)),
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn item_line(item: &ScheduleItem, status: ItemStatus, selected: bool) -> Line<'_> {
    let mut base = match status {
        ItemStatus::Active => Style::default().fg(Color::LightGreen),
        ItemStatus::Past => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM),
        ItemStatus::Upcoming => Style::default(),
    };
    if item.completed {
        base = base.add_modifier(Modifier::CROSSED_OUT | Modifier::DIM);
    }
    if selected {
        base = base.add_modifier(Modifier::REVERSED);
    }

    let marker = match (item.completed, status) {
        (true, _) => "[x] ",
        (false, ItemStatus::Active) => " >  ",
        (false, _) => "    ",
    };

    let mut spans = vec![
        Span::styled(marker, base),
        Span::styled(format!("{:<16}", item.time_range()), base),
        Span::styled(item.title.clone(), base.add_modifier(Modifier::BOLD)),
    ];
    if !item.location.is_empty() {
        spans.push(Span::styled(
            format!("  @ {}", item.location),
            base.fg(Color::Cyan),
        ));
    }
    if !item.description.is_empty() {
        spans.push(Span::styled(
            format!("  {}", item.description),
            base.fg(Color::Gray),
        ));
    }
    if let Some(special) = &item.special {
        spans.push(Span::styled(
            format!("  !{}", special),
            base.fg(Color::Yellow),
        ));
    }
    if let Some(category) = &item.category {
        let (r, g, b) = color_utils::generate_color_u8(category);
        spans.push(Span::styled(
            format!("  #{}", category),
            base.fg(Color::Rgb(r, g, b)),
        ));
    }
    Line::from(spans)
}

fn details_lines<'a>(item: Option<&'a ScheduleItem>, state: &AppState) -> Vec<Line<'a>> {
    let Some(item) = item else {
        return vec![Line::from("No item selected.")];
    };
    let status = item.status_at(state.run.now);
    let mut lines = vec![
        Line::from(Span::styled(
            item.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{}  ({})", item.time_range(), status.label())),
        Line::from(""),
    ];
    if !item.location.is_empty() {
        lines.push(Line::from(format!("Location: {}", item.location)));
    }
    if let Some(category) = &item.category {
        lines.push(Line::from(format!("Category: {}", category)));
    }
    if let Some(special) = &item.special {
        lines.push(Line::from(Span::styled(
            format!("Special: {}", special),
            Style::default().fg(Color::Yellow),
        )));
    }
    if item.completed {
        lines.push(Line::from(Span::styled(
            "Done",
            Style::default().fg(Color::Green),
        )));
    }
    if !item.description.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(item.description.as_str()));
    }
    lines
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
