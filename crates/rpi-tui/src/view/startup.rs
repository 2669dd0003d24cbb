use std::time::Duration;

use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::{centered_rect, spinner_char};

const BANNER_ART: &[&str] = &[
    r"  ____  ____ ___   ____        __           _     _           ",
    r" |  _ \|  _ \_ _| |  _ \  ___ / _| ___ _ __(_) __| | ___  ___ ",
    r" | |_) | |_) | |  | | | |/ _ \ |_ / _ \ '__| |/ _` |/ _ \/ __|",
    r" |  _ <|  __/| |  | |_| |  __/  _|  __/ |  | | (_| | (_) \__ \",
    r" |_| \_\_|  |___| |____/ \___|_|  \___|_|  |_|\__,_|\___/|___/",
];

/// Render the "waiting for backend" screen shown while the readiness gate polls.
pub fn render_waiting(f: &mut Frame, theme: &Theme, tick: usize, elapsed: Duration, budget: Duration) {
    let area = f.area();
    let width = 66.min(area.width);
    let popup = centered_rect(width, 11, area);

    let mut lines: Vec<Line> = vec![Line::from("")];

    // Art only when it fits
    if area.width >= 66 {
        for art_line in BANNER_ART {
            lines.push(Line::from(Span::styled(
                *art_line,
                Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
            )));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "  RPI Deferidos",
            Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {} ", spinner_char(tick)),
            Style::default().fg(theme.spinner),
        ),
        Span::styled(
            format!(
                "Aguardando backend... {:.1}s / {:.0}s",
                elapsed.as_secs_f64().min(budget.as_secs_f64()),
                budget.as_secs_f64()
            ),
            Style::default().fg(theme.dim),
        ),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.active)),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

/// Render the fatal panel shown once the gate has given up.
pub fn render_unavailable(f: &mut Frame, theme: &Theme, message: &str) {
    let area = f.area();
    let popup = centered_rect(60.min(area.width), 8, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Backend não disponível.",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("  {message}"), Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  q",
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            ),
            Span::styled(": sair", Style::default().fg(theme.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error))
                .title(" Erro "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
