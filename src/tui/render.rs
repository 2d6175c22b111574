//! TUI Rendering
//!
//! Draws the home screen and, over it, the onboarding dialog from its
//! [`StepView`].

use super::app::{App, AppMode};
use crate::onboarding::{InputView, OnboardingStep, StepView, render_step};
use crate::onboarding::view::CatalogView;
use crate::utils::truncate_to_width;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const BRAND_BLUE: Color = Color::Rgb(70, 130, 180);
const BRAND_GOLD: Color = Color::Rgb(218, 165, 32);
const ACCENT_GOLD: Color = Color::Rgb(184, 134, 11);

/// Width of the dialog, including borders
const DIALOG_WIDTH: u16 = 64;

/// Render the entire UI
pub fn render(f: &mut Frame, app: &App) {
    render_home(f, app, f.area());

    if app.mode == AppMode::Onboarding && app.wizard.is_visible() {
        render_dialog(f, &render_step(&app.wizard));
    }
}

fn render_home(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "48th Ave Neighbor Hub",
            Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Between Lincoln & Irving, Outer Sunset",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(BRAND_BLUE),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("[n] ", Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD)),
        Span::styled("I'm new here  ", Style::default().fg(Color::White)),
        Span::styled("[q] ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::styled("Quit", Style::default().fg(Color::White)),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BRAND_BLUE)),
        )
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

/// Center a `width` x `height` box inside `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height.saturating_sub(2))),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width.min(area.width.saturating_sub(2))),
            Constraint::Min(0),
        ])
        .split(v_chunks[1])[1]
}

fn render_dialog(f: &mut Frame, view: &StepView) {
    let inner_width = DIALOG_WIDTH.saturating_sub(4) as usize;
    let lines = step_lines(view, inner_width);
    let height = (lines.len() as u16 + 2).max(12);
    let area = centered(f.area(), DIALOG_WIDTH, height);

    let title = if view.step.is_terminal() {
        " Welcome Aboard ".to_string()
    } else {
        format!(
            " New Neighbor ({}/{}) ",
            view.step.number(),
            OnboardingStep::total()
        )
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BRAND_BLUE))
                .title(Span::styled(
                    title,
                    Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD),
                )),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

/// Progress dots (filled for reached steps, hollow for the rest)
fn progress_dots(indicator: &[bool]) -> String {
    indicator
        .iter()
        .map(|filled| if *filled { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

/// All lines of the dialog body, top to bottom
pub fn step_lines(view: &StepView, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    lines.push(Line::from(""));
    if !view.indicator.is_empty() {
        lines.push(Line::from(Span::styled(
            progress_dots(&view.indicator),
            Style::default().fg(BRAND_BLUE),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        view.title.to_string(),
        Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        view.subtitle.to_string(),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    for paragraph in &view.body {
        lines.push(Line::from(Span::styled(
            paragraph.clone(),
            Style::default().fg(Color::White),
        )));
    }

    if !view.inputs.is_empty() {
        lines.push(Line::from(""));
        for input in &view.inputs {
            push_input(&mut lines, input, width);
        }
    }

    if let Some(catalog) = &view.catalog {
        lines.push(Line::from(""));
        push_catalog(&mut lines, catalog, width);
    }

    if let Some(notice) = &view.notice {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  ! {}: {}", notice.title, notice.description),
            Style::default().fg(Color::Red),
        )));
    }

    lines.push(Line::from(""));
    lines.push(footer(view));
    lines
}

fn push_input(lines: &mut Vec<Line<'static>>, input: &InputView, width: usize) {
    match input {
        InputView::Text {
            label,
            value,
            placeholder,
            focused,
            ..
        } => {
            let focused = *focused;
            lines.push(Line::from(Span::styled(
                label.to_string(),
                Style::default().fg(if focused { BRAND_BLUE } else { Color::DarkGray }),
            )));
            let content = if value.is_empty() && !focused {
                Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
            } else {
                let cursor = if focused { "_" } else { "" };
                let shown = truncate_to_width(value, width.saturating_sub(1));
                Span::styled(
                    format!("{}{}", shown, cursor),
                    Style::default().fg(if focused { Color::White } else { Color::Gray }),
                )
            };
            lines.push(Line::from(content));
        }
        InputView::Toggle {
            label,
            checked,
            focused,
        } => {
            lines.push(Line::from(vec![
                Span::styled(
                    if *focused { " > " } else { "   " },
                    Style::default().fg(ACCENT_GOLD),
                ),
                Span::styled(
                    if *checked { "[x]" } else { "[ ]" },
                    Style::default().fg(if *checked { BRAND_GOLD } else { Color::DarkGray }),
                ),
                Span::styled(
                    format!(" {}", label),
                    Style::default().fg(if *focused { Color::White } else { Color::DarkGray }),
                ),
            ]));
        }
    }
}

fn push_catalog(lines: &mut Vec<Line<'static>>, catalog: &CatalogView, width: usize) {
    if catalog.loading {
        lines.push(Line::from(Span::styled(
            "Loading coupons...",
            Style::default().fg(Color::DarkGray),
        )));
        return;
    }
    if catalog.rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "No coupons available right now. You can skip this step.",
            Style::default().fg(Color::DarkGray),
        )));
        return;
    }

    for row in &catalog.rows {
        let heading = truncate_to_width(&format!(" {} {}", row.icon, row.title), width.saturating_sub(8));
        lines.push(Line::from(vec![
            Span::styled(
                if row.highlighted { " > " } else { "   " },
                Style::default().fg(ACCENT_GOLD),
            ),
            Span::styled(
                if row.selected { "[x]" } else { "[ ]" },
                Style::default().fg(if row.selected { BRAND_GOLD } else { Color::DarkGray }),
            ),
            Span::styled(
                heading,
                Style::default()
                    .fg(if row.highlighted { Color::White } else { Color::Gray })
                    .add_modifier(if row.selected { Modifier::BOLD } else { Modifier::empty() }),
            ),
        ]));
        if row.highlighted && !row.description.is_empty() {
            lines.push(Line::from(Span::styled(
                truncate_to_width(&row.description, width),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
}

fn footer(view: &StepView) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();

    let esc_label = if view.back_enabled {
        "Back  "
    } else if view.step == OnboardingStep::first() || view.step.is_terminal() {
        "Close  "
    } else {
        ""
    };
    if !esc_label.is_empty() {
        spans.push(Span::styled(
            " [Esc] ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(esc_label, Style::default().fg(Color::White)));
    }

    if view.inputs.len() > 1 {
        spans.push(Span::styled(
            "[Tab] ",
            Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled("Next Field  ", Style::default().fg(Color::White)));
    }

    if view.catalog.is_some() {
        spans.push(Span::styled(
            "[Space] ",
            Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled("Claim  ", Style::default().fg(Color::White)));
    }

    let (key_style, label_style) = if view.primary_enabled {
        (
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::White),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        )
    };
    spans.push(Span::styled("[Enter] ", key_style));
    spans.push(Span::styled(view.primary.label(), label_style));

    Line::from(spans)
}
