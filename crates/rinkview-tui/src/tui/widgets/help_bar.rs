// Help bar: key hints for the current input mode.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

const NORMAL_HINTS: &str =
    " q:Quit | \u{2191}\u{2193}/jk:Player | \u{2190}\u{2192}/hl:Season | /:Search | Esc:Clear | r:Reload";
const FILTER_HINTS: &str = " Type to search | Enter:Select | Esc:Cancel | Backspace:Delete";

pub fn hints(state: &ViewState) -> &'static str {
    if state.filter_mode {
        FILTER_HINTS
    } else {
        NORMAL_HINTS
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        hints(state),
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
