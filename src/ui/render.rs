use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, AppState, DraftField};
use crate::utils::truncate;

use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(2), // Search line
            Constraint::Min(5),    // User table
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_search_line(frame, app, chunks[1]);
    render_user_table(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::AddingUser) {
        render_add_user_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, _app: &App, area: Rect) {
    let title = "  User Directory";
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_search_line(frame: &mut Frame, app: &App, area: Rect) {
    let searching = matches!(app.state, AppState::Searching);

    let line = if searching || !app.search_query.is_empty() {
        let cursor = if searching { "▌" } else { "" };
        Line::from(vec![
            Span::styled(" Search: ", styles::muted_style()),
            Span::styled(
                format!("{}{}", app.search_query, cursor),
                styles::search_style(),
            ),
        ])
    } else {
        Line::from(Span::styled(
            " [/] search  [a] add  [d] delete",
            styles::muted_style(),
        ))
    };

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_user_table(frame: &mut Frame, app: &App, area: Rect) {
    let users = app.filtered_users();

    let header = Row::new([
        Cell::from("ID"),
        Cell::from("Name"),
        Cell::from("Username"),
        Cell::from("Email"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new([
                Cell::from(user.id.to_string()),
                Cell::from(truncate(&user.name, 28)),
                Cell::from(truncate(&user.username, 20)),
                Cell::from(truncate(&user.email, 32)),
            ])
            .style(style)
        })
        .collect();

    let count_title = if app.search_query.is_empty() {
        format!(" Users ({}) ", users.len())
    } else {
        format!(" Users ({} of {}) ", users.len(), app.store.len())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .title(Span::styled(count_title, styles::title_style()));

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Percentage(32),
            Constraint::Percentage(24),
            Constraint::Percentage(38),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);

    // Empty-state hint inside the table area
    if users.is_empty() && area.height > 4 {
        let hint = if app.store.is_empty() {
            "No users yet - press [a] to add one"
        } else {
            "No users match the search"
        };
        let inner = Rect::new(
            area.x + 2,
            area.y + 2,
            area.width.saturating_sub(4),
            1,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(hint, styles::muted_style())),
            inner,
        );
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[q]uit";

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        match app.cache_age {
            Some(ref age) => format!(" Cached {} ", age),
            None => " Cache: never ".to_string(),
        }
    };

    let right_text = format!(" {} ", shortcuts);

    let padding_len = status_padding(area.width as usize, &left_text, &right_text);

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

/// Spaces between the left and right status segments. Status messages can
/// carry multibyte text, so this counts chars rather than bytes.
fn status_padding(width: usize, left: &str, right: &str) -> usize {
    width
        .saturating_sub(left.chars().count())
        .saturating_sub(right.chars().count())
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 19, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("        User Directory", styles::title_style())),
        Line::from(Span::styled(
            format!("          version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  ↑/↓ j/k   ", styles::help_key_style()),
            Span::styled("Move selection", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  PgUp/PgDn ", styles::help_key_style()),
            Span::styled("Scroll a page", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  /         ", styles::help_key_style()),
            Span::styled("Search by name", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  a         ", styles::help_key_style()),
            Span::styled("Add a user", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  d         ", styles::help_key_style()),
            Span::styled("Delete selected user", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  q         ", styles::help_key_style()),
            Span::styled("Quit", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("     Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_add_user_overlay(frame: &mut Frame, app: &App) {
    let height = if app.draft_error.is_some() { 13 } else { 11 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("          Add User", styles::title_style())),
        Line::from(""),
    ];

    for field in [DraftField::Name, DraftField::Username, DraftField::Email] {
        let focused = app.draft_focus == field;
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let value = match field {
            DraftField::Name => &app.draft.name,
            DraftField::Username => &app.draft.username,
            DraftField::Email => &app.draft.email,
        };
        let cursor = if focused { "▌" } else { "" };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{:<9}: [", field.label()), styles::muted_style()),
            Span::styled(format!("{:<26}{}", value, cursor), style),
            Span::styled("]", styles::muted_style()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Tab", styles::help_key_style()),
        Span::styled(" next field  ", styles::muted_style()),
        Span::styled("Enter", styles::help_key_style()),
        Span::styled(" add  ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" cancel", styles::muted_style()),
    ]));

    if let Some(ref error) = app.draft_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_padding_counts_chars() {
        assert_eq!(status_padding(40, " Cache: never ", " [q]uit "), 18);
        // "Café" is 5 bytes but 4 chars; byte-based math would under-pad
        assert_eq!(
            status_padding(40, " Café ", " [q]uit "),
            status_padding(40, " Cafe ", " [q]uit "),
        );
        // Narrow terminals never underflow
        assert_eq!(status_padding(4, " a long message ", " [q]uit "), 0);
    }
}
