//! Terminal rendering - a pure function of [`RenderState`]

use ratatui::{prelude::*, widgets::*};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::constants::{APP_NAME, APP_VERSION, CARD_HEIGHT, GRID_COLUMNS, HEADER_TITLE};
use crate::messages::RenderState;
use crate::models::Product;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Rows taken by everything except the grid: header, footer and status bar
const CHROME_HEIGHT: u16 = 5;

/// Lines a card title may occupy before it is cut off
const TITLE_LINES: usize = 2;

/// Number of card rows that fit in a terminal of the given height
pub fn grid_rows_for(terminal_height: u16) -> u16 {
    (terminal_height.saturating_sub(CHROME_HEIGHT) / CARD_HEIGHT).max(1)
}

pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Word-wrap `title` into at most `max_lines` lines of `width` columns,
/// ending the last kept line with an ellipsis when text was cut.
pub fn wrap_title(title: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in title.split_whitespace() {
        let mut word = word;
        loop {
            let sep = usize::from(!current.is_empty());
            if current.width() + sep + word.width() <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                break;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                continue;
            }
            // Longer than a whole line
            let (head, tail) = split_at_width(word, width);
            lines.push(head.to_string());
            word = tail;
            if word.is_empty() {
                break;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = with_ellipsis(last, width);
        }
    }
    lines
}

/// Split so the head is at most `width` columns, always taking at least one char
fn split_at_width(s: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    let mut end = 0;
    for (i, ch) in s.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > width && end > 0 {
            break;
        }
        used += w;
        end = i + ch.len_utf8();
    }
    s.split_at(end)
}

fn with_ellipsis(line: &str, width: usize) -> String {
    let mut out = line.to_string();
    while !out.is_empty() && out.width() + 1 > width {
        out.pop();
    }
    out.push('…');
    out
}

/// Last path segment of an image URI
pub fn image_label(uri: &str) -> &str {
    uri.rsplit('/').find(|s| !s.is_empty()).unwrap_or(uri)
}

// ============================================================================
// Drawing
// ============================================================================

pub fn draw_ui(f: &mut Frame, state: &RenderState, tick: usize) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Grid or details
            Constraint::Length(1), // Footer
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(f, state, chunks[0], tick);

    match &state.details {
        Some(product) => draw_details(f, product, state.details_scroll, chunks[1]),
        None => draw_grid(f, state, chunks[1]),
    }

    if !state.on_details() {
        draw_footer(f, state, chunks[2], tick);
    }
    draw_status_bar(f, state, chunks[3]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_header(f: &mut Frame, state: &RenderState, area: Rect, tick: usize) {
    let mut info = vec![Span::styled(
        format!(" {} items ", state.products.len()),
        Style::default().fg(Color::DarkGray),
    )];
    if state.is_refreshing {
        info.push(Span::styled(
            format!("{} Refreshing ", spinner_frame(tick)),
            Style::default().fg(Color::Cyan),
        ));
    } else if let Some(at) = &state.loaded_at {
        info.push(Span::styled(
            format!("updated {} ", at),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .title_bottom(Line::from(info).right_aligned());

    let title = Paragraph::new(Line::from(Span::styled(
        HEADER_TITLE,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(block);
    f.render_widget(title, area);
}

fn draw_grid(f: &mut Frame, state: &RenderState, area: Rect) {
    if state.products.is_empty() {
        let hint = if state.is_loading {
            ""
        } else {
            "No items. Press 'r' to refresh."
        };
        let empty = Paragraph::new(hint)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(empty, area);
        return;
    }

    let visible = (area.height / CARD_HEIGHT).max(1) as usize;
    let mut constraints = vec![Constraint::Length(CARD_HEIGHT); visible];
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (slot, row_area) in rows.iter().take(visible).enumerate() {
        let row = state.scroll_row + slot;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row_area);

        for (col, cell) in columns.iter().enumerate() {
            let index = row * GRID_COLUMNS + col;
            if let Some(product) = state.products.get(index) {
                draw_card(f, product, index == state.selected, *cell);
            }
        }
    }
}

fn draw_card(f: &mut Frame, product: &Product, selected: bool, area: Rect) {
    let border_style = if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                 // Image box
            Constraint::Length(TITLE_LINES as u16), // Title
            Constraint::Length(1),                 // Price
        ])
        .split(inner);

    let image = Paragraph::new(image_label(&product.image))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(" img "));
    f.render_widget(image, parts[0]);

    let title_lines: Vec<Line> = wrap_title(&product.title, parts[1].width as usize, TITLE_LINES)
        .into_iter()
        .map(Line::from)
        .collect();
    let title_style = if selected {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().bold()
    };
    let title = Paragraph::new(title_lines)
        .alignment(Alignment::Center)
        .style(title_style);
    f.render_widget(title, parts[1]);

    let price = Paragraph::new(product.price_label())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    f.render_widget(price, parts[2]);
}

fn draw_footer(f: &mut Frame, state: &RenderState, area: Rect, tick: usize) {
    // The refresh spinner lives in the header instead
    if state.is_loading && !state.is_refreshing {
        let footer = Paragraph::new(format!("{} Loading more...", spinner_frame(tick)))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Blue));
        f.render_widget(footer, area);
    }
}

fn draw_details(f: &mut Frame, product: &Product, scroll: u16, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(product.title.clone(), Style::default().bold())),
        Line::from(Span::styled(product.price_label(), Style::default().fg(Color::Green))),
    ];
    if let Some(category) = &product.category {
        lines.push(Line::from(format!("Category: {}", category)));
    }
    if let Some(rating) = &product.rating {
        lines.push(Line::from(format!("Rating: {:.1} ({} reviews)", rating.rate, rating.count)));
    }
    lines.push(Line::from(Span::styled(
        format!("Image: {}", product.image),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    if let Some(description) = &product.description {
        lines.push(Line::from(description.clone()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Product #{} (Esc: back) ", product.id));
    let details = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(details, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.on_details() {
        " Esc:back | ↑/↓:scroll | ?:help | q:quit ".to_string()
    } else if !state.has_more && !state.products.is_empty() {
        " arrows:move | Enter:open | r:refresh | end of list | q:quit ".to_string()
    } else {
        format!(
            " arrows:move | Enter:open | r:refresh | page {} | ?:help | q:quit ",
            state.page_cursor.saturating_sub(1)
        )
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = format!(
        r#"
 {} v{} - Keyboard Shortcuts

 GRID
   ←/→/↑/↓ or h/l/k/j   Move selection
   PgUp / PgDn          Move a screenful
   Home / End           First / last item
   Enter                Open item details
   r / F5               Refresh from the first page

 DETAILS
   ↑ / ↓                Scroll description
   Esc / Backspace      Back to the list

 GENERAL
   ?                    Toggle this help
   q / Ctrl+C           Quit

 Press any key to close...
"#,
        APP_NAME, APP_VERSION
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
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
    use ratatui::backend::TestBackend;

    fn render(state: &RenderState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw_ui(f, state, 0)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn backpack() -> Product {
        let mut product = Product::new(
            1,
            "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
            109.95,
            "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
        );
        product.description = Some("Your perfect pack for everyday use".into());
        product
    }

    #[test]
    fn test_wrap_title_truncates_to_two_lines() {
        let lines = wrap_title("Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops", 16, 2);
        assert_eq!(lines, vec!["Fjallraven -".to_string(), "Foldsack No. 1…".to_string()]);
    }

    #[test]
    fn test_wrap_title_short_and_long_words() {
        assert_eq!(wrap_title("Mug", 10, 2), vec!["Mug".to_string()]);
        assert_eq!(
            wrap_title("Supercalifragilistic", 8, 2),
            vec!["Supercal".to_string(), "ifragil…".to_string()]
        );
        assert!(wrap_title("anything", 0, 2).is_empty());
    }

    #[test]
    fn test_grid_rows_for_height() {
        assert_eq!(grid_rows_for(30), 3);
        assert_eq!(grid_rows_for(5), 1);
        assert_eq!(grid_rows_for(0), 1);
    }

    #[test]
    fn test_image_label() {
        assert_eq!(image_label("https://x.test/img/a.jpg"), "a.jpg");
        assert_eq!(image_label("plain"), "plain");
    }

    #[test]
    fn test_card_shows_title_and_price() {
        let state = RenderState {
            products: vec![backpack(), Product::new(2, "Mens Casual T-Shirt", 22.3, "t.png")],
            has_more: true,
            page_cursor: 2,
            ..RenderState::default()
        };
        let screen = render(&state);
        assert!(screen.contains("Item List"));
        assert!(screen.contains("$109.95"));
        assert!(screen.contains("$22.30"));
        assert!(screen.contains("Mens Casual T-Shirt"));
        assert!(screen.contains("81fPKd-2AYL._AC_SL1500_.jpg"));
    }

    #[test]
    fn test_footer_spinner_only_when_loading_without_refresh() {
        let mut state = RenderState {
            products: vec![backpack()],
            is_loading: true,
            ..RenderState::default()
        };
        assert!(render(&state).contains("Loading more"));

        state.is_refreshing = true;
        let screen = render(&state);
        assert!(!screen.contains("Loading more"));
        assert!(screen.contains("Refreshing"));

        state.is_loading = false;
        state.is_refreshing = false;
        assert!(!render(&state).contains("Loading more"));
    }

    #[test]
    fn test_details_screen() {
        let state = RenderState {
            products: vec![backpack()],
            details: Some(backpack()),
            ..RenderState::default()
        };
        let screen = render(&state);
        assert!(screen.contains("Product #1"));
        assert!(screen.contains("Your perfect pack for everyday use"));
    }

    #[test]
    fn test_empty_grid_hint() {
        let screen = render(&RenderState::default());
        assert!(screen.contains("No items"));
    }
}
