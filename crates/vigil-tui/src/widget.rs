//! Widgets applying view models to ratatui frames.
//!
//! This is the thin presentation layer: everything shown here was already
//! decided by the pure builders in [`crate::render`]; these functions
//! only lay out and style.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use vigil_core::countdown::CountdownDisplay;

use crate::board::TimerBoard;
use crate::chart::PingChart;
use crate::render::{CardView, DetailViewModel, ListViewModel};
use crate::theme::Theme;

const LIST_HINTS: &str = " j/k select | enter open | r refresh | q quit";
const DETAIL_HINTS: &str = " esc back | r refresh | q quit";

fn draw_header(frame: &mut Frame<'_>, area: Rect, theme: &Theme, title: &str, right: Vec<Span<'_>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_dim));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(40)])
        .split(inner);

    let title = Paragraph::new(Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(theme.header)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, halves[0]);

    let clock = Paragraph::new(Line::from(right)).alignment(Alignment::Right);
    frame.render_widget(clock, halves[1]);
}

fn stat_cell(frame: &mut Frame<'_>, area: Rect, theme: &Theme, label: &str, value: Span<'_>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_dim));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = Paragraph::new(Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(theme.text_dim)),
        value,
    ]));
    frame.render_widget(text, inner);
}

fn countdown_span<'a>(
    display: Option<&CountdownDisplay>,
    text: &'a str,
    theme: &Theme,
) -> Span<'a> {
    let style = match display {
        Some(CountdownDisplay::Ready) => Style::default().fg(theme.healthy),
        Some(CountdownDisplay::Claiming) => Style::default().fg(theme.accent),
        Some(CountdownDisplay::Counting(_)) => Style::default().fg(theme.text),
        None => Style::default().fg(theme.text_dim),
    };
    Span::styled(text, style)
}

fn card_row<'a>(
    card: &'a CardView,
    board: &'a TimerBoard,
    theme: &Theme,
    selected: bool,
) -> Row<'a> {
    let bucket_style = Style::default().fg(theme.bucket_color(card.bucket));

    let countdown = match &card.timer {
        Some(timer) => countdown_span(
            board.display(&timer.element_key),
            board.text(&timer.element_key),
            theme,
        ),
        None => Span::styled("--", Style::default().fg(theme.text_dim)),
    };

    let row = Row::new(vec![
        Cell::from(card.title.as_str()),
        Cell::from(Line::from(vec![
            Span::styled(card.bucket.indicator(), bucket_style),
            Span::raw(" "),
            Span::styled(card.status.as_str(), bucket_style),
        ])),
        Cell::from(card.metric.as_str()),
        Cell::from(Line::from(countdown)),
    ]);

    if selected {
        row.style(Style::default().add_modifier(Modifier::REVERSED))
    } else {
        row
    }
}

/// Draw the fleet-list screen.
pub fn draw_list(
    frame: &mut Frame<'_>,
    vm: &ListViewModel,
    board: &TimerBoard,
    theme: &Theme,
    selected: usize,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let mut right = vec![Span::styled(
        vm.clock.clone(),
        Style::default().fg(theme.text),
    )];
    if let Some(last_sync) = &vm.last_sync {
        right.insert(
            0,
            Span::styled(
                format!("{last_sync}  "),
                Style::default().fg(theme.text_dim),
            ),
        );
    }
    draw_header(frame, chunks[0], theme, " VIGIL Fleet Monitor", right);

    let stats = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);

    stat_cell(
        frame,
        stats[0],
        theme,
        "MONITORS",
        Span::styled(vm.stats.total.to_string(), Style::default().fg(theme.text)),
    );
    let down_color = if vm.stats.unhealthy > 0 {
        theme.unhealthy
    } else {
        theme.healthy
    };
    stat_cell(
        frame,
        stats[1],
        theme,
        "DOWN",
        Span::styled(
            vm.stats.unhealthy.to_string(),
            Style::default().fg(down_color),
        ),
    );
    let avg = match vm.stats.avg_ping_ms {
        Some(ms) => format!("{ms} ms"),
        None => "-- ms".to_string(),
    };
    stat_cell(
        frame,
        stats[2],
        theme,
        "AVG PING",
        Span::styled(avg, Style::default().fg(theme.accent)),
    );

    if vm.cards.is_empty() {
        let placeholder = if vm.loading {
            "Awaiting first sync..."
        } else {
            "No monitors reported."
        };
        let text = Paragraph::new(placeholder)
            .style(Style::default().fg(theme.text_dim))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border_dim)),
            );
        frame.render_widget(text, chunks[2]);
    } else {
        let header = Row::new(vec!["Name", "Status", "Balance/Uptime", "Next Claim"])
            .style(Style::default().fg(theme.text_dim))
            .bottom_margin(1);

        let rows = vm
            .cards
            .iter()
            .enumerate()
            .map(|(i, card)| card_row(card, board, theme, i == selected));

        let widths = [
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(22),
            Constraint::Percentage(18),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border_dim)),
            );
        frame.render_widget(table, chunks[2]);
    }

    let footer = Paragraph::new(LIST_HINTS).style(Style::default().fg(theme.text_dim));
    frame.render_widget(footer, chunks[3]);
}

/// Draw the per-entity detail screen.
pub fn draw_detail(
    frame: &mut Frame<'_>,
    vm: &DetailViewModel,
    board: &TimerBoard,
    chart: &PingChart,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let badge_style = Style::default()
        .fg(theme.bucket_color(vm.bucket))
        .add_modifier(Modifier::BOLD);
    let right = vec![
        Span::styled(format!("{} {}  ", vm.bucket.indicator(), vm.status), badge_style),
        Span::styled(vm.clock.clone(), Style::default().fg(theme.text)),
    ];
    draw_header(frame, chunks[0], theme, &format!(" {}", vm.title), right);

    let info = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    let field_lines: Vec<Line<'_>> = vm
        .fields
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:>10}: "), Style::default().fg(theme.text_dim)),
                Span::styled(value.as_str(), Style::default().fg(theme.text)),
            ])
        })
        .collect();
    let fields = Paragraph::new(field_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_dim))
            .title(" Details "),
    );
    frame.render_widget(fields, info[0]);

    let avg = match vm.avg_ping_ms {
        Some(ms) => format!("{ms} ms"),
        None => "-- ms".to_string(),
    };
    let countdown = match &vm.timer {
        Some(timer) => countdown_span(
            board.display(&timer.element_key),
            board.text(&timer.element_key),
            theme,
        ),
        None => Span::styled("--", Style::default().fg(theme.text_dim)),
    };
    let live_lines = vec![
        Line::from(vec![
            Span::styled("  Avg Ping: ", Style::default().fg(theme.text_dim)),
            Span::styled(avg, Style::default().fg(theme.accent)),
        ]),
        Line::from(vec![
            Span::styled("Next Claim: ", Style::default().fg(theme.text_dim)),
            countdown,
        ]),
    ];
    let live = Paragraph::new(live_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_dim))
            .title(" Live "),
    );
    frame.render_widget(live, info[1]);

    chart.draw(frame, chunks[2], theme);

    let footer = Paragraph::new(DETAIL_HINTS).style(Style::default().fg(theme.text_dim));
    frame.render_widget(footer, chunks[3]);
}
