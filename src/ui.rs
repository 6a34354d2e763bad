//! Terminal rendering.
//!
//! Draws the [`Surface`](crate::render::Surface) the renderer maintains.
//! Nothing here reads [`AppState`](crate::state::AppState) or decides what
//! to show; it only decides how.
//!
//! ## For contributors
//!
//! * Layout, top to bottom: the add-feed form, one feedback line, the
//!   content area (sources | posts, or the start prompt), the help line.
//! * Toasts and the post detail are drawn last, over everything else.
//! * Colours and styles are defined inline.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::render::{Content, FeedbackKind};

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [form_area, feedback_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_form(app, frame, form_area);
    draw_feedback(app, frame, feedback_area);
    if app.surface().content == Content::Start {
        draw_start(app, frame, main_area);
    } else {
        let [sources_area, posts_area] =
            Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
                .areas(main_area);
        draw_sources(app, frame, sources_area);
        draw_posts(app, frame, posts_area);
    }
    draw_status_bar(app, frame, status_area);

    draw_toast(app, frame);
    draw_detail(app, frame);
}

fn focus_block(title: &str, focused: bool) -> Block<'static> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn draw_form(app: &App, frame: &mut Frame, area: Rect) {
    let surface = app.surface();
    let labels = &surface.labels;

    let input = if surface.input.is_empty() {
        Span::styled(&labels.placeholder, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(&surface.input)
    };

    let submit = &surface.submit;
    let button = if submit.loading {
        Span::styled(format!("[ {}… ]", labels.loading), Style::default().fg(Color::Yellow))
    } else if submit.enabled {
        Span::styled(
            format!("[ {} ]", labels.submit),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!("[ {} ]", labels.submit), Style::default().fg(Color::DarkGray))
    };

    let [input_area, button_area] =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(18)]).areas(area);

    let block = focus_block(&labels.form_title, app.focus == Focus::Input);
    frame.render_widget(Paragraph::new(Line::from(input)).block(block), input_area);
    frame.render_widget(
        Paragraph::new(Line::from(button)).block(Block::default().borders(Borders::ALL)),
        button_area,
    );
}

fn draw_feedback(app: &App, frame: &mut Frame, area: Rect) {
    let Some(feedback) = &app.surface().feedback else {
        return;
    };
    let color = match feedback.kind {
        FeedbackKind::Success => Color::Green,
        FeedbackKind::Invalid => Color::Red,
    };
    let line = Line::from(Span::styled(
        format!(" {}", feedback.text),
        Style::default().fg(color),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_start(app: &App, frame: &mut Frame, area: Rect) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage(45),
        Constraint::Length(1),
        Constraint::Percentage(45),
    ])
    .areas(area);
    let prompt = Paragraph::new(Line::from(Span::styled(
        &app.surface().labels.start_prompt,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .centered();
    frame.render_widget(prompt, middle);
}

fn draw_sources(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Sources;
    let highlighted = app.source_cursor.selected();
    let surface = app.surface();

    let items: Vec<ListItem> = surface
        .source_cards()
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let marker = if card.active { "● " } else { "  " };
            let title_style = if card.active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            let mut header = vec![Span::raw(marker), Span::styled(card.title.clone(), title_style)];
            if let Some(count) = card.badge {
                header.push(Span::raw(" "));
                header.push(Span::styled(
                    format!(" {count} "),
                    Style::default().fg(Color::White).bg(Color::Red),
                ));
            }
            if focused && highlighted == Some(i) {
                header.push(Span::raw("  "));
                header.push(Span::styled(
                    surface.labels.delete.clone(),
                    Style::default().fg(Color::Red),
                ));
            }

            ListItem::new(vec![
                Line::from(header),
                Line::from(Span::styled(
                    format!("  {}", card.description),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(focus_block(&surface.labels.sources_title, focused))
        .highlight_style(Style::default().bg(Color::DarkGray));

    frame.render_stateful_widget(list, area, &mut app.source_cursor);
}

fn draw_posts(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Posts;
    let surface = app.surface();

    let block = focus_block(&surface.labels.posts_title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let list_area = match &surface.banner {
        Some(banner) => {
            let [banner_area, rest] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
            let notice = Paragraph::new(Line::from(Span::styled(
                format!("{} (n)", banner.text()),
                Style::default().fg(Color::White).bg(Color::Blue),
            )))
            .centered();
            frame.render_widget(notice, banner_area);
            rest
        }
        None => inner,
    };

    let items: Vec<ListItem> = surface
        .post_cards()
        .iter()
        .map(|card| {
            let mut header = vec![Span::styled(
                card.title.clone(),
                if card.unread {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                },
            )];
            if let Some(new) = &card.new_label {
                header.push(Span::raw(" "));
                header.push(Span::styled(
                    format!(" {new} "),
                    Style::default().fg(Color::White).bg(Color::Red),
                ));
            }

            let mut actions = vec![Span::styled(
                format!("  [Enter] {}", card.view_label),
                Style::default().fg(Color::Gray),
            )];
            if let Some(mark) = &card.mark_read_label {
                actions.push(Span::styled(
                    format!("  [m] {mark}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }

            ListItem::new(vec![
                Line::from(header),
                Line::from(Span::styled(
                    format!("  {}", card.preview),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(actions),
            ])
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, list_area, &mut app.post_cursor);
}

fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", app.surface().labels.app_title),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("[{}] ", app.state().language),
            Style::default().fg(Color::Green),
        ),
        Span::raw(app.surface().labels.help.clone()),
    ]));
    frame.render_widget(status, area);
}

fn draw_toast(app: &App, frame: &mut Frame) {
    let Some(toast) = &app.surface().toast else {
        return;
    };
    let full = frame.area();
    let width = full.width.min(50);
    let area = Rect::new(full.right().saturating_sub(width), full.y, width, full.height.min(4));

    let body = Paragraph::new(toast.message.as_str())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {} ", toast.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(body, area);
}

fn draw_detail(app: &App, frame: &mut Frame) {
    let Some(detail) = &app.surface().detail else {
        return;
    };
    let area = centered(frame.area(), 80, 70);

    let text = vec![
        Line::from(detail.body.clone()),
        Line::from(""),
        Line::from(Span::styled(detail.link.clone(), Style::default().fg(Color::Cyan))),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}  {}", detail.open_hint, detail.close_hint),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let popup = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(format!(" {} ", detail.title))
            .borders(Borders::ALL),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}

// ---------------------------------------------------------------------------
// Tests (smoke tests against an in-memory backend)
// ---------------------------------------------------------------------------
