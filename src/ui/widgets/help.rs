//! Help view widget showing all keybindings.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

/// Help categories
const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navegación",
        &[
            ("↑/k  ↓/j", "Mover selección"),
            ("←/h  →/l", "Columna anterior / siguiente (Kanban)"),
            ("g / G", "Ir al inicio / final"),
            ("Tab / S-Tab", "Vista siguiente / anterior"),
            ("1-6", "Tablero, Kanban, Tabla, Línea de tiempo, Gantt, Backlog"),
        ],
    ),
    (
        "Proyectos",
        &[
            ("Enter", "Abrir detalle del proyecto"),
            ("n", "Nuevo proyecto / ítem de backlog"),
            ("o / O", "Cambiar orden / invertir orden (Tabla)"),
            ("x", "Exportar planilla y reporte"),
            ("F5", "Recargar colecciones"),
        ],
    ),
    (
        "Detalle",
        &[
            ("Space/Enter", "Marcar etapa o sub-etapa"),
            ("p", "Cambiar prioridad"),
            ("t", "Cambiar tipo de desarrollo"),
            ("c", "Agregar comentario"),
            ("s / Ctrl+S", "Guardar cambios"),
            ("d", "Eliminar proyecto (administrador)"),
            ("Esc", "Cerrar y descartar cambios"),
        ],
    ),
    (
        "Backlog",
        &[
            ("P", "Promover a proyecto (administrador)"),
            ("d", "Eliminar ítem (administrador)"),
        ],
    ),
    (
        "General",
        &[("?", "Mostrar esta ayuda"), ("q / Ctrl+C", "Salir")],
    ),
];

/// Help view widget
pub struct HelpWidget {
    scroll_offset: usize,
}

impl HelpWidget {
    /// Create a help widget scrolled down by `scroll_offset` lines
    pub fn new(scroll_offset: usize) -> Self {
        Self { scroll_offset }
    }

    /// Number of lines in the help text
    pub fn line_count() -> usize {
        Self::build_lines().len()
    }

    /// Build help text lines
    fn build_lines() -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![Span::styled(
                "  planboard  ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(Span::styled(
                "Seguimiento de proyectos por etapas.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
        ];

        for (section_name, bindings) in HELP_SECTIONS {
            lines.push(Line::from(Span::styled(
                format!("─── {} ───", section_name),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));

            for (key, description) in *bindings {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:14}", key), Style::default().fg(Color::Green)),
                    Span::raw(*description),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![
            Span::styled("  Presiona ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Green)),
            Span::styled(" o ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Green)),
            Span::styled(" para cerrar", Style::default().fg(Color::DarkGray)),
        ]));

        lines
    }
}

impl Widget for HelpWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let lines = Self::build_lines();
        let total_lines = lines.len();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Ayuda (?) ");

        let inner = block.inner(area);
        block.render(area, buf);

        let visible_height = usize::from(inner.height);
        let offset = self
            .scroll_offset
            .min(total_lines.saturating_sub(visible_height));
        let visible_lines: Vec<Line> = lines
            .into_iter()
            .skip(offset)
            .take(visible_height)
            .collect();

        Paragraph::new(visible_lines).render(inner, buf);

        if total_lines > visible_height {
            let mut scrollbar_state = ScrollbarState::new(total_lines).position(offset);

            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"));

            let scrollbar_area = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y + 1,
                width: 1,
                height: area.height.saturating_sub(2),
            };

            scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);
        }
    }
}
