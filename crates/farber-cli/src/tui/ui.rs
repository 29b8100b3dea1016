//! UI rendering

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
        Wrap,
    },
    Frame,
};

use farber_core::view::{Control, FieldKind};
use farber_core::{ToastKind, ToastPhase};

use super::app::{ActivePane, App, InputMode};

const SIDEBAR_WIDTH: u16 = 22;
const TOAST_WIDTH: u16 = 40;

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    if app.is_loading() {
        draw_loader(frame);
        return;
    }

    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(outer_chunks[0]);

    draw_sidebar(frame, app, pane_chunks[0]);
    draw_content(frame, app, pane_chunks[1]);
    draw_status_bar(frame, app, outer_chunks[1]);

    draw_toasts(frame, app, Instant::now());

    if let Some(pending) = &app.confirm {
        draw_confirm(frame, &pending.prompt);
    }

    if app.show_help {
        draw_help_overlay(frame);
    }
}

fn pane_block(title: &str, active: bool) -> Block<'_> {
    let border_style = if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn draw_loader(frame: &mut Frame) {
    let area = centered_rect(36, 5, frame.area());
    let text = vec![
        Line::from(Span::styled(
            "Farber Panel",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Loading...", Style::default().fg(Color::DarkGray))),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Sidebar;

    let items: Vec<ListItem> = app
        .router
        .sidebar()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let marker = if entry.active { "●" } else { " " };
            let style = if entry.active {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(format!("{} {} {}", marker, i + 1, entry.label)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(pane_block("Farber", is_active))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if is_active {
        state.select(Some(app.sidebar_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_content(frame: &mut Frame, app: &App, area: Rect) {
    let container = app.router.container();

    let mut constraints = vec![Constraint::Length(container.cards().len() as u16 + 2)];
    if !container.controls().is_empty() {
        constraints.push(Constraint::Length(3));
    }
    let fields = app.visible_fields();
    if container.form().is_some() && !fields.is_empty() {
        constraints.push(Constraint::Length(fields.len() as u16 + 3));
    }
    if container.table().is_some() {
        constraints.push(Constraint::Min(5));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut chunks = chunks.iter().copied();

    if let Some(area) = chunks.next() {
        draw_header(frame, app, area);
    }
    if !container.controls().is_empty() {
        if let Some(area) = chunks.next() {
            draw_controls(frame, app, area);
        }
    }
    if container.form().is_some() && !fields.is_empty() {
        if let Some(area) = chunks.next() {
            draw_form(frame, app, area);
        }
    }
    if container.table().is_some() {
        if let Some(area) = chunks.next() {
            draw_table(frame, app, area);
        }
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let container = app.router.container();
    let lines: Vec<Line> = container
        .cards()
        .iter()
        .map(|card| Line::from(card.as_str()))
        .collect();

    let block = Block::default()
        .title(Span::styled(
            container.title(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_controls(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Controls;
    let controls = app.router.container().controls();

    let mut spans = Vec::new();
    for (i, control) in controls.iter().enumerate() {
        let selected = is_active && i == app.control_index;
        let editing = selected && app.input_mode == InputMode::Editing;
        let style = if selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        let text = match control {
            Control::Search {
                placeholder, value, ..
            } => {
                let shown = if value.is_empty() && !editing {
                    placeholder.as_str()
                } else {
                    value.as_str()
                };
                format!(" 🔍 {}{} ", shown, if editing { "▏" } else { "" })
            }
            Control::Select {
                label,
                options,
                selected,
                ..
            } => {
                let current = options
                    .iter()
                    .find(|o| &o.value == selected)
                    .map(|o| o.label.as_str())
                    .unwrap_or("");
                format!(" {}: ◀ {} ▶ ", label, current)
            }
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::raw("  "));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(pane_block("Filters", is_active)),
        area,
    );
}

fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Form;
    let Some(form) = app.router.container().form() else {
        return;
    };

    let label_width = form
        .fields
        .iter()
        .filter(|f| f.kind != FieldKind::Hidden)
        .map(|f| f.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<Line> = app
        .visible_fields()
        .into_iter()
        .enumerate()
        .map(|(position, index)| {
            let field = &form.fields[index];
            let selected = is_active && position == app.field_index;
            let editing = selected && app.input_mode == InputMode::Editing;

            let value = match field.kind {
                FieldKind::Checkbox if field.is_checked() => "[x]".to_string(),
                FieldKind::Checkbox => "[ ]".to_string(),
                _ => format!("{}{}", field.value, if editing { "▏" } else { "" }),
            };
            let marker = if field.required { "*" } else { " " };
            let value_style = if selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };

            Line::from(vec![
                Span::styled(
                    format!("{:>width$}{} ", field.label, marker, width = label_width),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(value, value_style),
            ])
        })
        .collect();

    lines.push(Line::from(Span::styled(
        format!("[s] {}   [r] Clear", form.current_submit_label()),
        Style::default().fg(Color::Cyan),
    )));

    frame.render_widget(
        Paragraph::new(lines).block(pane_block(&form.heading, is_active)),
        area,
    );
}

fn draw_table(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Table;
    let Some(table) = app.router.container().table() else {
        return;
    };

    // Legend of the selected row's actions
    let title = match app.selected_row() {
        Some(row) if is_active && !row.actions.is_empty() => {
            let keys: Vec<String> = row
                .actions
                .iter()
                .map(|a| format!("[{}] {}", a.key, a.label))
                .collect();
            format!("Records  {}", keys.join(" "))
        }
        _ => "Records".to_string(),
    };
    let block = pane_block(&title, is_active);

    if table.rows.is_empty() {
        let empty = Paragraph::new(Span::styled(
            table.empty_message.as_str(),
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(
        table
            .headers
            .iter()
            .map(|h| Cell::from(h.as_str()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|row| Row::new(row.cells.iter().map(|c| Cell::from(c.as_str())).collect::<Vec<_>>()))
        .collect();

    let columns = table.headers.len().max(1) as u32;
    let widths: Vec<Constraint> = (0..columns).map(|_| Constraint::Ratio(1, columns)).collect();

    let widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    if is_active {
        state.select(Some(app.row_index));
    }
    frame.render_stateful_widget(widget, area, &mut state);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hint = match (app.input_mode, app.active_pane) {
        (InputMode::Editing, _) => "Typing - Enter/Esc: done",
        (_, ActivePane::Sidebar) => "Enter: open  1-7: jump  Tab: next pane  ?: help  q: quit",
        (_, ActivePane::Controls) => "Enter: edit/next  h/l: change option  Tab: next pane",
        (_, ActivePane::Form) => "Enter: edit  s: save  r: clear  Tab: next pane",
        (_, ActivePane::Table) => "j/k: move  action keys in the title  Tab: next pane",
    };
    let paragraph =
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)));
    frame.render_widget(paragraph, area);
}

/// Stack visible toasts in the top-right corner
fn draw_toasts(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();
    let width = TOAST_WIDTH.min(area.width);
    let x = area.width.saturating_sub(width + 1);
    let mut y = area.y + 1;

    for (toast, phase) in app.toasts.shown(now) {
        if y + 3 > area.height {
            break;
        }
        let color = match toast.kind {
            ToastKind::Default => Color::White,
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
        };
        let mut style = Style::default().fg(color);
        if phase == ToastPhase::Leaving {
            style = style.add_modifier(Modifier::DIM);
        }

        let toast_area = Rect::new(x, y, width, 3);
        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(Span::styled(toast.message.as_str(), style))
                .block(Block::default().borders(Borders::ALL).border_style(style)),
            toast_area,
        );
        y += 3;
    }
}

fn draw_confirm(frame: &mut Frame, prompt: &str) {
    let area = centered_rect(44, 5, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(prompt),
        Line::from(""),
        Line::from(Span::styled(
            "[y] Yes   [n] No",
            Style::default().fg(Color::Cyan),
        )),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .title("Confirm")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            ),
        area,
    );
}

fn draw_help_overlay(frame: &mut Frame) {
    let area = centered_rect(50, 18, frame.area());
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  Tab         Next pane"),
        Line::from("  Shift+Tab   Previous pane"),
        Line::from("  1-7         Jump to section"),
        Line::from("  Enter       Open section / edit field"),
        Line::from(""),
        Line::from("Form:"),
        Line::from("  s           Save"),
        Line::from("  r           Clear"),
        Line::from(""),
        Line::from("Table: press the key shown next to an action"),
        Line::from(""),
        Line::from("Press any key to close"),
    ];

    frame.render_widget(
        Paragraph::new(help_text).block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        area,
    );
}

/// A `width` x `height` rect centered in `area`, clipped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
