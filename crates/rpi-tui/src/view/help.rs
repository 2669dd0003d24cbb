use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let popup = centered_rect(64, 30, f.area());

    let lines = vec![
        Line::from(Span::styled(" Atalhos ", theme.header_style())),
        Line::from(""),
        section_header("Navegação", theme),
        key_line("j / \u{2193}", "Próximo registro", theme),
        key_line("k / \u{2191}", "Registro anterior", theme),
        key_line("l / \u{2192}", "Próxima página", theme),
        key_line("h / \u{2190}", "Página anterior", theme),
        key_line("g / Home", "Primeira página", theme),
        key_line("G / End", "Última página", theme),
        Line::from(""),
        section_header("Arquivo", theme),
        key_line("o", "Selecionar PDF", theme),
        key_line("(arrastar)", "Soltar um PDF no terminal", theme),
        Line::from(""),
        section_header("Resultados", theme),
        key_line("y / Enter", "Copiar registro (OSC 52)", theme),
        key_line("Y", "Copiar todos", theme),
        key_line("e", "Exportar CSV", theme),
        Line::from(""),
        section_header("Seletor de arquivos", theme),
        key_line("Enter / l", "Abrir pasta / escolher PDF", theme),
        key_line("h", "Pasta acima", theme),
        key_line("Esc", "Cancelar", theme),
        Line::from(""),
        section_header("Geral", theme),
        key_line("?", "Mostrar/ocultar ajuda", theme),
        key_line("q", "Sair", theme),
        key_line("Ctrl+c", "Sair imediatamente", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Ajuda "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<14}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
