use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use rpi_core::FeedbackSignal;

use crate::theme::Theme;
use crate::view::spinner_char;

/// Render the feedback banner over the second-to-last row, if one is visible.
pub fn render(f: &mut Frame, theme: &Theme, feedback: &FeedbackSignal, tick: usize) {
    let Some(banner) = feedback.current() else {
        return;
    };
    let area = f.area();
    if area.height < 3 {
        return;
    }
    // keep the footer row readable
    let row = Rect::new(area.x, area.y + area.height - 2, area.width, 1);

    let bg = theme.feedback_color(banner.kind);
    let style = Style::default()
        .fg(Color::Black)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let prefix = if banner.processing {
        format!(" {} ", spinner_char(tick))
    } else if banner.is_error() {
        " \u{2717} ".to_string()
    } else {
        " \u{2713} ".to_string()
    };

    let line = Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(format!("{} ", banner.message), style),
    ]);

    f.render_widget(Clear, row);
    f.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), row);
}
