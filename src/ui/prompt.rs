//! Modal overlay asking whether a modified buffer may be killed.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::layout::centered_fixed;
use super::theme::Theme;

/// Kill confirmation popup for one buffer.
pub struct KillPromptPopup<'a> {
    /// Name of the buffer being asked about.
    pub name: &'a str,
    /// How many more questions are queued after this one.
    pub remaining: usize,
}

impl<'a> Widget for KillPromptPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let question = format!("Buffer {} modified; kill anyway?", self.name);
        let width = (question.len() as u16 + 6).clamp(30.min(area.width), area.width);
        let popup = centered_fixed(width, 5, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Kill buffer ")
            .title_style(
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let hint = if self.remaining > 0 {
            format!("y: kill  n: keep  Esc: keep all ({} more)", self.remaining)
        } else {
            "y: kill  n: keep  Esc: keep".to_string()
        };

        let lines = vec![
            Line::from(Span::styled(format!("  {question}"), Theme::prompt_style())),
            Line::raw(""),
            Line::from(Span::styled(
                format!("  {hint}"),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}
