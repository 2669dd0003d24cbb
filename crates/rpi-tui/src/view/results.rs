use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use rpi_core::render::{PageView, PaginationInfo, RenderedItem};

use crate::app::App;
use crate::theme::Theme;
use crate::view::{one_line, spinner_char};

/// Render the results screen into the given area.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let view = app.session.view();
    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Min(6),    // list / drop zone
        Constraint::Length(1), // pagination
        Constraint::Length(1), // feedback row
        Constraint::Length(1), // footer
    ])
    .split(area);

    render_header(f, app, &view, chunks[0]);

    if view.is_visible() {
        render_list(f, &app.theme, &view.items, app.cursor, chunks[1]);
    } else {
        render_drop_zone(f, &app.theme, chunks[1]);
    }

    if let Some(info) = view.pagination {
        render_pagination(f, &app.theme, &info, chunks[2]);
    }

    let footer = Line::from(Span::styled(
        " o:abrir PDF  j/k:registro  h/l:página  y:copiar  Y:copiar todos  e:CSV  ?:ajuda  q:sair",
        app.theme.footer_style(),
    ));
    f.render_widget(Paragraph::new(footer), chunks[4]);
}

fn render_header(f: &mut Frame, app: &App, view: &PageView, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![
        Span::styled(" RPI Deferidos ", theme.header_style()),
        Span::styled(
            " > Marcas deferidas sem procurador",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ];

    let total = app.session.store().len();
    if view.is_visible() {
        spans.push(Span::styled(
            format!("  {total} registros"),
            Style::default().fg(theme.dim),
        ));
    }
    if app.session.is_busy() {
        spans.push(Span::styled(
            format!("  {} processando", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    } else if let Some(path) = &app.last_export {
        spans.push(Span::styled(
            format!("  CSV: {}", path.display()),
            Style::default().fg(theme.dim),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_list(f: &mut Frame, theme: &Theme, items: &[RenderedItem], cursor: usize, area: Rect) {
    // borders plus the label column
    let value_width = (area.width as usize).saturating_sub(2 + 20);

    let list_items: Vec<ListItem> = items
        .iter()
        .map(|item| {
            let field = |label: &'static str, value: &str| {
                Line::from(vec![
                    Span::styled(format!("      {label:<15}"), theme.label_style()),
                    Span::styled(one_line(value, value_width), Style::default().fg(theme.text)),
                ])
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        format!(" {:>3}. ", item.number),
                        Style::default().fg(theme.dim),
                    ),
                    Span::styled("Processo: ", theme.label_style()),
                    Span::styled(
                        item.processo.clone(),
                        Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
                    ),
                ]),
                field("Titular:", &item.titular),
                field("NCL:", &item.ncl),
                field("Especificação:", &item.especificacao),
            ])
        })
        .collect();

    let list = List::new(list_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Resultados "),
        )
        .highlight_style(theme.highlight_style());

    let mut state = ListState::default();
    state.select(Some(cursor.min(items.len().saturating_sub(1))));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_drop_zone(f: &mut Frame, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Arquivo ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(
            "Arraste um PDF da RPI para esta janela",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("ou pressione ", Style::default().fg(theme.dim)),
            Span::styled("o", theme.label_style()),
            Span::styled(" para selecionar um arquivo", Style::default().fg(theme.dim)),
        ]),
    ];
    let [centered] = Layout::vertical([Constraint::Length(lines.len() as u16)])
        .flex(Flex::Center)
        .areas(inner);
    f.render_widget(
        Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center),
        centered,
    );
}

fn render_pagination(f: &mut Frame, theme: &Theme, info: &PaginationInfo, area: Rect) {
    let arrow = |enabled: bool, glyph: &'static str| {
        let style = if enabled {
            Style::default().fg(theme.active).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        Span::styled(glyph, style)
    };
    let line = Line::from(vec![
        arrow(info.has_prev, " \u{25C0} Anterior "),
        Span::styled(format!(" {} ", info.label()), Style::default().fg(theme.text)),
        arrow(info.has_next, " Próxima \u{25B6} "),
    ]);
    f.render_widget(
        Paragraph::new(line).alignment(ratatui::layout::Alignment::Center),
        area,
    );
}
