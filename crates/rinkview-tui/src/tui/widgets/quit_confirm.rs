// Quit confirmation overlay, drawn over the dashboard while
// `ViewState::confirm_quit` is set.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const DIALOG_WIDTH: u16 = 30;
const DIALOG_HEIGHT: u16 = 3;

pub fn render(frame: &mut Frame, area: Rect) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " rinkview ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));

    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let text = Line::from(vec![
        Span::raw(" Really quit? "),
        Span::styled("y", key),
        Span::raw(" yes / "),
        Span::styled("n", key),
        Span::raw(" no"),
    ]);

    frame.render_widget(
        Paragraph::new(text).block(block).style(Style::default().bg(Color::Black)),
        dialog_area,
    );
}

/// A `width` x `height` rect centered in `area`, shrunk to fit if needed.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        assert_eq!((rect.width, rect.height), (DIALOG_WIDTH, DIALOG_HEIGHT));
        let left = rect.x - area.x;
        let right = area.width - (rect.x + rect.width);
        assert!(left.abs_diff(right) <= 1);
        let top = rect.y;
        let bottom = area.height - (rect.y + rect.height);
        assert!(top.abs_diff(bottom) <= 1);
    }

    #[test]
    fn centered_rect_clamps_to_small_area() {
        let area = Rect::new(0, 0, 10, 2);
        let rect = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        assert!(rect.width <= area.width);
        assert!(rect.height <= area.height);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, frame.area())).unwrap();
    }
}
