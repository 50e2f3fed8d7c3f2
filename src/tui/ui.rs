use crate::records::{Client, Order, PickRecord, Resource};
use crate::selection::SelectionState;
use crate::tui::app::{App, PickerKind, PickerPane};
use crate::tui::colors;
use crate::tui::table::TableState;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use unicode_width::UnicodeWidthStr;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(3), // Filter bar
            Constraint::Min(5),    // Client list
            Constraint::Length(3), // Appointment form
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(frame, app, chunks[0]);
    draw_filter_bar(frame, app, chunks[1]);
    draw_client_list(frame, app, chunks[2]);
    draw_form(frame, app, chunks[3]);
    draw_status_bar(frame, app, chunks[4]);

    match app.active {
        Some(PickerKind::Client) => {
            draw_picker(frame, &mut app.client_pane, PickerKind::Client, area)
        }
        Some(PickerKind::Order) => {
            draw_picker(frame, &mut app.order_pane, PickerKind::Order, area)
        }
        Some(PickerKind::Resource) => {
            draw_picker(frame, &mut app.resource_pane, PickerKind::Resource, area)
        }
        None => {
            // Border (1) + space (1) + search icon (approx 3 display cols)
            let cursor_x = chunks[1].x + 1 + 4 + app.list_filter.cursor_column();
            let cursor_y = chunks[1].y + 1;
            frame.set_cursor_position(Position::new(cursor_x, cursor_y));
        }
    }
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let user = app.session.user().unwrap_or("front desk");
    let text = format!(
        " CliniPick v{}  \u{2502}  {}  \u{2502}  {}",
        crate::VERSION,
        app.session.clinic(),
        user
    );
    let bar = Paragraph::new(text).style(
        Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(40, 40, 50))
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(bar, area);
}

fn draw_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.active.is_none() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Filter clients ");

    let text = format!(" \u{1F50D} {}", app.list_filter.value);
    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(Color::White)),
        area,
    );
}

fn draw_client_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let page = app.clients.page();
    let title = format!(
        " Clients \u{2502} page {} of {} \u{2502} {} per page ",
        page.current_page,
        page.total_pages.max(1),
        page.page_size
    );
    let block = Block::default().borders(Borders::ALL).title(title);

    // Borders plus header row
    app.list_table.visible_rows = area.height.saturating_sub(3) as usize;

    let header = Row::new(["Name", "Email", "Phone"].map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(Color::White)
                .bg(colors::BAR_BG)
                .add_modifier(Modifier::BOLD),
        )
    }));

    if app.clients.is_loading() {
        let loading = Paragraph::new(" \u{23F3} Loading...").block(block);
        frame.render_widget(loading, area);
        return;
    }
    if let Some(err) = app.clients.error() {
        let alert = Paragraph::new(format!(" \u{26A0} {}  (Ctrl+R to retry)", err))
            .style(Style::default().fg(Color::LightRed))
            .block(block);
        frame.render_widget(alert, area);
        return;
    }

    let visible = app.clients.visible();
    if visible.is_empty() {
        let empty = Paragraph::new(" No clients match this filter")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .skip(app.list_table.scroll_offset)
        .take(app.list_table.visible_rows)
        .map(|(i, client)| {
            let bg = row_background(&app.list_table, i);
            Row::new(vec![
                Cell::from(format!("{} {}", colors::icon_for_kind(Client::KIND), client.label())),
                Cell::from(client.email.clone().unwrap_or_default())
                    .style(Style::default().fg(Color::Gray)),
                Cell::from(client.phone.clone().unwrap_or_default())
                    .style(Style::default().fg(Color::Green)),
            ])
            .style(Style::default().bg(bg))
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Fill(2), Constraint::Fill(2), Constraint::Length(14)],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

fn row_background(table: &TableState, index: usize) -> Color {
    if table.selected == Some(index) {
        colors::ROW_HIGHLIGHT_BG
    } else if index % 2 == 1 {
        colors::ROW_ALT_BG
    } else {
        Color::Reset
    }
}

fn selection_line(label: &str, state: &SelectionState) -> Line<'static> {
    let value = match &state.selected_label {
        Some(selected) => Span::styled(
            selected.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("\u{2014}", Style::default().fg(Color::DarkGray)),
    };
    Line::from(vec![
        Span::styled(format!(" {}: ", label), Style::default().fg(Color::Cyan)),
        value,
        Span::raw("   "),
    ])
}

fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = app.form_snapshot();
    let mut spans = Vec::new();
    spans.extend(selection_line("Client", &form.client).spans);
    spans.extend(selection_line("Order", &form.order).spans);
    spans.extend(selection_line("Resource", &form.resource).spans);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Appointment ");
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = format!(" {}", app.status_message);
    let right_text = " F2:Client  F3:Order  F4:Resource  PgUp/PgDn:Page  F5/F6:Rows  Ctrl+Q:Quit ";

    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        format!("{:width$}", left_text, width = available_width)
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(Color::White).bg(colors::BAR_BG));
    frame.render_widget(status, area);
}

/// Helper to create a centered popup area
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Extra coloring per record kind; only orders carry a status today
trait OptionAccent {
    fn accent(&self) -> Option<Color> {
        None
    }
}

impl OptionAccent for Client {}
impl OptionAccent for Resource {}
impl OptionAccent for Order {
    fn accent(&self) -> Option<Color> {
        Some(colors::order_status_color(self.status))
    }
}

fn draw_picker<R: PickRecord + OptionAccent>(
    frame: &mut Frame,
    pane: &mut PickerPane<R>,
    kind: PickerKind,
    area: Rect,
) {
    let width = area.width.saturating_sub(8).clamp(30, 72);
    let height = area.height.saturating_sub(4).clamp(8, 20);
    let popup = centered_rect(width, height, area);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(kind.title())
        .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Current value
            Constraint::Length(1), // Query
            Constraint::Length(1), // Status
            Constraint::Min(1),    // Options
        ])
        .split(inner);

    let current = pane
        .picker
        .selection()
        .selected_label
        .clone()
        .unwrap_or_else(|| "none".to_string());
    frame.render_widget(
        Paragraph::new(format!(" Current: {}", current)).style(Style::default().fg(Color::Gray)),
        parts[0],
    );

    let query = format!(" \u{1F50D} {}", pane.input.value);
    frame.render_widget(
        Paragraph::new(query).style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        parts[1],
    );

    let status = pane.status();
    frame.render_widget(
        Paragraph::new(format!(" {}", colors::status_text(&status)))
            .style(colors::status_style(&status)),
        parts[2],
    );

    pane.table.visible_rows = (parts[3].height / 2).max(1) as usize;
    let rendered = pane.picker.rendered();
    let lines: Vec<Line> = rendered
        .iter()
        .enumerate()
        .skip(pane.table.scroll_offset)
        .take(pane.table.visible_rows)
        .flat_map(|(i, view)| {
            let bg = row_background(&pane.table, i);
            let marker = if view.is_selected { "\u{2714} " } else { "  " };
            let label_style = Style::default()
                .fg(view.option.source.accent().unwrap_or(Color::White))
                .bg(bg)
                .add_modifier(if pane.table.selected == Some(i) {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });
            [
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Green).bg(bg)),
                    Span::styled(view.option.label.clone(), label_style),
                ]),
                Line::from(Span::styled(
                    format!("    {}", view.option.subtitle),
                    Style::default().fg(Color::DarkGray).bg(bg),
                )),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), parts[3]);

    let cursor_x = parts[1].x + 4 + pane.input.cursor_column();
    frame.set_cursor_position(Position::new(cursor_x, parts[1].y));
}
