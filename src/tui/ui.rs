use crate::suite::route::Route;
use crate::tui::app::{App, PageView, StatusKind};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Route tabs
            Constraint::Min(0),    // Tool page
            Constraint::Length(3), // Status
        ])
        .split(frame.size());

    let view = app.page_view();
    draw_header(frame, chunks[0], app);
    draw_page(frame, chunks[1], app, &view);
    draw_footer(frame, chunks[2], app);

    if app.help_mode {
        draw_help_window(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Route::ALL
        .iter()
        .enumerate()
        .map(|(i, route)| Line::from(format!("{} {}", i + 1, route.label())))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" SEO Studio "))
        .select(app.route.index())
        .style(Style::default().fg(Color::Cyan))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn draw_page(frame: &mut Frame, area: Rect, app: &App, view: &PageView) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(view.fields.len() as u16 + 4),
            Constraint::Min(0),
        ])
        .split(columns[0]);

    draw_form(frame, left[0], app, view);
    draw_result(frame, left[1], app, view);
    draw_saved_list(frame, columns[1], app, view);
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App, view: &PageView) {
    let mut lines = vec![Line::from(Span::styled(
        app.route.description(),
        Style::default().fg(Color::DarkGray),
    ))];

    for (i, (label, value)) in view.fields.iter().enumerate() {
        let is_current = i == app.field_index;
        let is_editing = is_current && app.edit.edit_mode;

        let shown = if is_editing {
            let (before_cursor, after_cursor) = app.edit.edit_buffer.split_at(app.edit.edit_cursor_position);
            format!("{}█{}", before_cursor, after_cursor)
        } else {
            value.clone()
        };

        let style = if is_editing {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else if is_current {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let marker = if is_current { "›" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(format!("{} {:<18}", marker, label), style),
            Span::styled(shown, style),
        ]));
    }

    let mut title = format!(" {} - {} ", app.route.title(), view.title);
    if app.route.tools().len() > 1 {
        title.push_str("(t: switch tool) ");
    }

    let form = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(form, area);
}

fn draw_result(frame: &mut Frame, area: Rect, app: &App, view: &PageView) {
    let text = if app.is_loading() {
        vec![Line::from(Span::styled(
            "Working...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        ))]
    } else if view.result.is_empty() {
        vec![Line::from(Span::styled(
            "Fill in the form and press g to generate.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        view.result.iter().map(|line| Line::from(line.as_str())).collect()
    };

    let result = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Result "))
        .wrap(Wrap { trim: false });
    frame.render_widget(result, area);
}

fn draw_saved_list(frame: &mut Frame, area: Rect, app: &App, view: &PageView) {
    let items: Vec<ListItem> = view
        .saved
        .iter()
        .map(|row| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    row.summary.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  #{}  {}", row.id, row.saved_at),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Saved ({}) ", view.saved.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );

    let mut list_state = ListState::default().with_offset(app.nav.scroll_offset);
    if !view.saved.is_empty() {
        list_state.select(Some(app.nav.selected_index));
    }

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn history_hint(app: &App) -> String {
    let undo = if app.history.can_undo() {
        format!("u: undo {}", app.history.undo_label().unwrap_or_default())
    } else {
        "nothing to undo".to_string()
    };
    let redo = if app.history.can_redo() {
        format!("r: redo {}", app.history.redo_label().unwrap_or_default())
    } else {
        "nothing to redo".to_string()
    };
    format!("{} | {}", undo, redo)
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let (text, color) = match &app.status {
        Some(status) if status.kind == StatusKind::Error => (status.text.clone(), Color::Red),
        Some(status) => (status.text.clone(), Color::Green),
        None if app.edit.edit_mode => (
            "EDIT MODE | Enter: confirm | Esc: cancel | ←→: cursor | Ctrl+W: delete word".to_string(),
            Color::Yellow,
        ),
        None => (
            format!("{} | Tab: next page | e: edit | g: generate | ?: help | q: quit", history_hint(app)),
            Color::Yellow,
        ),
    };

    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(color));

    frame.render_widget(footer, area);
}

fn draw_help_window(frame: &mut Frame) {
    let help_text = [
        "SEO Studio - Keyboard Commands",
        "",
        "PAGES:",
        "  Tab / Shift+Tab   Next / previous page (clears undo history)",
        "  1-6               Jump to page",
        "  t                 Switch tool on pages with two tools",
        "",
        "FORM:",
        "  f / F             Next / previous field",
        "  e                 Edit field (Enter to confirm, Esc to cancel)",
        "  g / Enter         Generate and save",
        "",
        "SAVED RESULTS:",
        "  ↑↓ / j/k          Move through saved results",
        "  v                 View saved result",
        "  d                 Delete saved result",
        "",
        "HISTORY:",
        "  u                 Undo last save or delete",
        "  r / Ctrl+R        Redo",
        "",
        "EXPORT:",
        "  x / X             Export shown result as JSON / CSV",
        "",
        "OTHER:",
        "  Esc               Clear status message",
        "  ?                 Show this help (press ? or Esc to close)",
        "  q / Ctrl+C        Quit application",
    ];

    let help_paragraph = Paragraph::new(help_text.join("\n"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help - Keyboard Commands ")
                .style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });

    let area = centered_rect(80, 70, frame.size());

    frame.render_widget(Clear, area);
    frame.render_widget(help_paragraph, area);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::suite::ToolSuite;
    use crate::suite::backend::MockBackend;
    use crate::suite::models::Keywords;
    use crate::suite::tools::{KeywordQuery, KeywordResearchTool};
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Arc;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        App::new(
            ToolSuite::new(Box::new(MemoryStore::new())),
            Arc::new(MockBackend::default()),
            std::env::temp_dir(),
        )
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(80, 70, outer);
        assert_eq!(inner.width, 80);
        assert!(inner.x >= outer.x && inner.right() <= outer.right());
    }

    #[test]
    fn test_draw_shows_routes_and_form() {
        let screen = render(&app());

        assert!(screen.contains("1 Keyword Research"));
        assert!(screen.contains("6 Audit"));
        assert!(screen.contains("Topic"));
        assert!(screen.contains("Saved (0)"));
        assert!(screen.contains("nothing to undo"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = app();
        app.help_mode = true;

        let screen = render(&app);

        assert!(screen.contains("Help - Keyboard Commands"));
    }

    #[test]
    fn test_footer_offers_undo_after_save() {
        let mut app = app();
        let query = KeywordQuery {
            topic: "vegan baking".to_string(),
        };
        let id = app
            .suite
            .commit::<KeywordResearchTool>(&mut app.history, query, Keywords::default())
            .unwrap();

        let screen = render(&app);

        assert!(screen.contains("u: undo"));
        assert!(screen.contains("nothing to redo"));
        assert!(screen.contains(&format!("#{}", id)));
    }
}
