use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::ui::{Component, Keybinding, Spinner};

const BREADCRUMB_SEPARATOR: &str = " › ";

/// Header (breadcrumb, running commands) and footer (key hints) lines.
#[derive(Default)]
pub struct StatusBar {
    spinner: Spinner,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_tick(&mut self) {
        self.spinner.handle_tick();
    }

    pub fn render_header(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        breadcrumbs: &[String],
        running: &[String],
    ) {
        let status = match running {
            [] => String::new(),
            [only] => only.clone(),
            [first, rest @ ..] => format!("{first} (+{})", rest.len()),
        };
        let status_width = if status.is_empty() {
            0
        } else {
            u16::try_from(status.chars().count() + 3).unwrap_or(u16::MAX)
        };

        let [crumbs_area, status_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(status_width)]).areas(area);

        let mut spans = vec![Span::styled(
            " cloudnav ",
            Style::default()
                .fg(theme.base())
                .bg(theme.mauve())
                .add_modifier(Modifier::BOLD),
        )];
        let last = breadcrumbs.len().saturating_sub(1);
        for (i, crumb) in breadcrumbs.iter().enumerate() {
            spans.push(Span::styled(
                if i == 0 { " " } else { BREADCRUMB_SEPARATOR },
                Style::default().fg(theme.overlay0()),
            ));
            let style = if i == last {
                Style::default()
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.subtext0())
            };
            spans.push(Span::styled(crumb.clone(), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), crumbs_area);

        if status_width > 0 {
            let [glyph_area, text_area] =
                Layout::horizontal([Constraint::Length(2), Constraint::Min(0)]).areas(status_area);
            self.spinner.render_glyph(frame, glyph_area, theme);
            let text = truncate_str(&status, usize::from(text_area.width));
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(theme.subtext0())),
                text_area,
            );
        }
    }

    pub fn render_hints(&self, frame: &mut Frame, area: Rect, theme: &Theme, hints: &[Keybinding]) {
        let mut spans = Vec::new();
        let mut used = 0usize;
        let width = usize::from(area.width);

        for kb in hints.iter().filter(|kb| kb.hint) {
            let entry = kb.key.chars().count() + kb.description.chars().count() + 4;
            if used + entry > width {
                break;
            }
            used += entry;
            spans.push(Span::styled(format!(" {}", kb.key), Style::default().fg(theme.peach())));
            spans.push(Span::styled(
                format!(" {} ", kb.description),
                Style::default().fg(theme.subtext0()),
            ));
            spans.push(Span::styled("·", Style::default().fg(theme.surface2())));
        }
        spans.pop();

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Join breadcrumb segments the way the header renders them.
pub fn breadcrumb_text(breadcrumbs: &[String]) -> String {
    breadcrumbs.join(BREADCRUMB_SEPARATOR)
}

/// Truncate a string to fit within a given width, adding "..." if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
    let len = s.chars().count();
    if len <= max_width {
        s.to_string()
    } else if max_width > 3 {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_width).collect()
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("instances", 20), "instances");
        assert_eq!(truncate_str("instances", 7), "inst...");
        assert_eq!(truncate_str("instances", 2), "in");
        assert_eq!(truncate_str("ütf-ßtring", 6), "ütf...");
    }

    #[test]
    fn test_breadcrumb_text() {
        let crumbs = vec!["Compute".to_string(), "web-1".to_string()];
        assert_eq!(breadcrumb_text(&crumbs), "Compute › web-1");
    }

    #[test]
    fn test_header_renders_breadcrumbs_and_status() {
        let mut bar = StatusBar::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        let crumbs = vec!["Resources".to_string(), "Compute".to_string()];
        let running = vec!["Loading instances".to_string(), "Copying id".to_string()];
        terminal
            .draw(|frame| {
                let area = frame.area();
                bar.render_header(frame, area, &Theme::default(), &crumbs, &running);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Resources › Compute"));
        assert!(text.contains("Loading instances (+1)"));
    }
}
