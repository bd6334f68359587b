use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Theme;
use crate::ui::Keybinding;

/// Centered popup listing the active keybindings.
#[derive(Default)]
pub struct HelpOverlay {
    visible: bool,
}

impl HelpOverlay {
    pub const fn new() -> Self {
        Self { visible: false }
    }

    pub const fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub const fn hide(&mut self) {
        self.visible = false;
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        sections: &[(&str, Vec<Keybinding>)],
    ) {
        if !self.visible {
            return;
        }

        let popup_area = area.centered(Constraint::Percentage(60), Constraint::Percentage(70));
        frame.render_widget(Clear, popup_area);

        let key_width = sections
            .iter()
            .flat_map(|(_, bindings)| bindings.iter().map(|kb| kb.key.chars().count()))
            .max()
            .unwrap_or(1);

        let key_style = Style::default()
            .fg(theme.peach())
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(theme.text());
        let section_style = Style::default()
            .fg(theme.mauve())
            .add_modifier(Modifier::BOLD);

        let mut lines = Vec::new();
        for (title, bindings) in sections {
            if bindings.is_empty() {
                continue;
            }
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(title.to_string(), section_style)));
            for kb in bindings {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:>key_width$}", kb.key), key_style),
                    Span::styled(" │ ", Style::default().fg(theme.surface2())),
                    Span::styled(kb.description.clone(), desc_style),
                ]));
            }
        }

        let block = Block::default()
            .title(" Help ")
            .title_style(section_style)
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.lavender()))
            .style(Style::default().bg(theme.base()));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup_area);
    }
}
