//! Drawing the dashboard

use allgit_core::{ErrorDetail, RowState, SelectionView};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::keys::Pane;
use super::App;

const KEY_HELP: &str = "r refresh  R refresh all  p pull  P push  X clear errors  1-5 focus  q quit";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let [table_area, detail_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    draw_table(frame, app, table_area);
    draw_details(frame, app, detail_area);

    let status = match app.coordinator.status_message() {
        "" => KEY_HELP.to_string(),
        message => format!("{}  |  {}", message, KEY_HELP),
    };
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
        status_area,
    );
}

fn draw_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .coordinator
        .rows()
        .iter()
        .map(|row| {
            let columns = row.table_row();
            let style = match row.state {
                RowState::Error(_) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                RowState::Pending => Style::default().fg(Color::DarkGray),
                _ if row.busy => Style::default().fg(Color::Yellow),
                _ => Style::default(),
            };
            Row::new(vec![
                Cell::from(columns.name),
                Cell::from(columns.branch),
                Cell::from(columns.badge),
            ])
            .style(style)
        })
        .collect();

    let title = format!(
        "{} {} ({})",
        Pane::Table.number(),
        Pane::Table.title(),
        app.coordinator.root().display()
    );
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(50),
            Constraint::Percentage(35),
            Constraint::Percentage(15),
        ],
    )
    .header(
        Row::new(vec!["Repository", "Branch", "Changes"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(pane_block(&title, app.focus == Pane::Table))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    app.table_state.select(app.coordinator.selected_index());
    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn draw_details(frame: &mut Frame, app: &App, area: Rect) {
    let [left, right] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .areas(area);
    let [errors_area, working_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .areas(left);
    let [local_area, remote_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .areas(right);

    let areas = [errors_area, working_area, local_area, remote_area];
    let view = app.coordinator.selection_view();

    for (i, (pane, area)) in Pane::DETAIL.iter().zip(areas).enumerate() {
        // two border columns
        let inner_width = usize::from(area.width.saturating_sub(2));
        let lines = pane_lines(&view, *pane, inner_width);
        let title = format!("{} {}", pane.number(), pane.title());

        let paragraph = Paragraph::new(lines.into_iter().map(Line::from).collect::<Vec<_>>())
            .block(pane_block(&title, app.focus == *pane))
            .scroll((app.scroll[i], 0));
        frame.render_widget(paragraph, area);
    }
}

fn pane_block(title: &str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title.to_string())
}

/// Text lines for one detail pane
pub fn pane_lines(view: &SelectionView, pane: Pane, width: usize) -> Vec<String> {
    match (view, pane) {
        (SelectionView::Error(detail), Pane::Errors) => error_lines(detail, width),
        (SelectionView::Changes { working, .. }, Pane::Working) => working.clone(),
        (SelectionView::Changes { local, .. }, Pane::Local) => local
            .iter()
            .flat_map(|entry| frame_lines(std::slice::from_ref(entry), width))
            .collect(),
        (SelectionView::Changes { remote, .. }, Pane::Remote) => remote
            .iter()
            .flat_map(|entry| frame_lines(std::slice::from_ref(entry), width))
            .collect(),
        _ => Vec::new(),
    }
}

fn error_lines(detail: &ErrorDetail, width: usize) -> Vec<String> {
    let mut body = vec![
        format!("{} ({})", detail.repository, detail.returncode),
        detail.command.clone(),
        String::new(),
    ];
    body.extend(detail.output.lines().map(str::to_string));
    body.push(String::new());
    frame_lines(&body, width)
}

/// Draw a rounded box `width` columns wide around `lines`
///
/// Lines longer than the box are truncated.
pub fn frame_lines(lines: &[String], width: usize) -> Vec<String> {
    let width = width.max(4);
    let inner = width - 4;
    let rule = "─".repeat(width - 2);

    let mut framed = Vec::with_capacity(lines.len() + 2);
    framed.push(format!("╭{}╮", rule));
    for line in lines {
        let text: String = line.chars().take(inner).collect();
        let padding = inner - text.chars().count();
        framed.push(format!("│ {}{} │", text, " ".repeat(padding)));
    }
    framed.push(format!("╰{}╯", rule));
    framed
}
