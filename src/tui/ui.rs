use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::catalog::CardRow;
use crate::services::VodService;

const TITLE_LINES: usize = 2;

pub fn draw<S: VodService>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Cards
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_cards(frame, app, chunks[1]);
    render_status(frame, app, chunks[2]);

    if app.show_help {
        render_help(frame);
    }
}

fn render_header<S: VodService>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let snapshot = &app.snapshot;
    let total = if snapshot.exhausted {
        format!("{}", snapshot.rows.len())
    } else {
        format!("{}+", snapshot.rows.len())
    };
    let stats = format!(
        " {} Videos | {} Sports | {} Schools",
        total, snapshot.sports_count, snapshot.schools_count
    );

    let block = Block::default()
        .title(" Video on Demand ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(stats).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_cards<S: VodService>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let width = (area.width as usize).saturating_sub(4).max(10);

    let items: Vec<ListItem> = (0..app.list_len())
        .map(|index| match app.snapshot.rows.get(index) {
            Some(row) => card_item(row, index, width, app.show_row_numbers),
            None => ListItem::new(Line::from(Span::styled(
                "Loading more videos...",
                Style::default().fg(Color::DarkGray),
            ))),
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn card_item(row: &CardRow, index: usize, width: usize, show_row_numbers: bool) -> ListItem<'static> {
    let mut lines = Vec::with_capacity(TITLE_LINES + 4);

    let mut header = Vec::new();
    if show_row_numbers {
        header.push(Span::styled(
            format!("#{} ", index + 1),
            Style::default().fg(Color::Red),
        ));
    }
    header.push(Span::styled(
        row.school_names.clone(),
        Style::default().fg(Color::Yellow),
    ));
    lines.push(Line::from(header));
    lines.push(Line::from(Span::styled(
        row.sport_names.clone(),
        Style::default().fg(Color::White),
    )));

    for line in textwrap::wrap(&row.program.title, width).into_iter().take(TITLE_LINES) {
        lines.push(Line::from(Span::styled(
            line.into_owned(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(Span::styled(
        format!("[{}]", row.duration),
        Style::default().fg(Color::Black).bg(Color::Gray),
    )));
    lines.push(Line::from(""));

    ListItem::new(lines)
}

fn render_status<S: VodService>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let (text, color) = if let Some(message) = &app.status_message {
        (message.clone(), Color::Red)
    } else if app.catalog.is_fetching() {
        (format!("{} Loading videos...", app.spinner()), Color::DarkGray)
    } else {
        (
            format!(
                "j/k:nav  o:open image  r:reload  ?:help  q:quit  (updated {})",
                app.snapshot.updated_at.format("%H:%M:%S")
            ),
            Color::DarkGray,
        )
    };

    let paragraph = Paragraph::new(text).style(Style::default().fg(color));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        "",
        " Navigation:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   g        Jump to top",
        "   G        Jump to bottom",
        "",
        " Actions:",
        "   o        Open card image",
        "   r        Reload everything",
        "   n        Toggle card numbers",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(paragraph, area);
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
