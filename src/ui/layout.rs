//! Main layout rendering for the TUI.

use crate::app::{App, AppView, Tab};
use crate::ui::widgets::dashboard::DashboardWidget;
use crate::ui::widgets::gantt::GanttWidget;
use crate::ui::widgets::help::HelpWidget;
use crate::ui::widgets::kanban::KanbanWidget;
use crate::ui::widgets::project_table::ProjectTableWidget;
use crate::ui::widgets::stage_checklist::StageChecklistWidget;
use crate::ui::widgets::text_input::InputDialog;
use crate::ui::widgets::timeline::TimelineWidget;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

/// Draw the main application UI
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(2), // Footer
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);

    match app.view {
        AppView::Detail | AppView::DeleteProject | AppView::Comment | AppView::ConfirmNotify => {
            draw_detail(frame, app, chunks[1])
        }
        _ => draw_tab(frame, app, chunks[1]),
    }

    draw_footer(frame, app, chunks[2]);

    match app.view {
        AppView::NewProject => draw_create_dialog(frame, app, area, "Nuevo proyecto", "Nombre"),
        AppView::NewBacklogItem => {
            draw_create_dialog(frame, app, area, "Nuevo ítem de backlog", "Título")
        }
        AppView::DeleteProject => {
            let name = app
                .draft
                .as_ref()
                .map_or(String::new(), |d| d.project().name.clone());
            draw_delete_dialog(frame, app, area, &format!("Eliminar \"{name}\""));
        }
        AppView::DeleteBacklogItem => {
            let title = app
                .selected_backlog_item()
                .map_or(String::new(), |i| i.title.clone());
            draw_delete_dialog(frame, app, area, &format!("Eliminar \"{title}\""));
        }
        AppView::Comment => {
            if let Some(editor) = &app.comment_editor {
                frame.render_widget(editor, centered_rect(70, 50, area));
            }
        }
        AppView::ConfirmNotify => draw_confirm_dialog(frame, app, area),
        AppView::Help => frame.render_widget(HelpWidget::new(app.help_scroll), area),
        AppView::Main | AppView::Detail => {}
    }

    // Draw error message overlay if present
    if let Some(ref error) = app.error_message {
        draw_error_overlay(frame, error, area);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(idx, tab)| Line::from(format!("{} {}", idx + 1, tab.title())))
        .collect();

    let role = if app.identity.current_is_admin() {
        " (admin)"
    } else {
        ""
    };
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .title(Span::styled(
                    " planboard ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ))
                .title(
                    Line::from(format!(" {}{} ", app.identity.current_user(), role))
                        .right_aligned(),
                ),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.view {
        AppView::Detail => {
            " j/k: Mover | Space: Marcar | p: Prioridad | t: Tipo | c: Comentar | s: Guardar | d: Eliminar | Esc: Cerrar "
        }
        AppView::Help => " j/k: Desplazar | Esc: Cerrar ",
        AppView::ConfirmNotify => " s/Enter: Enviar | n/Esc: Omitir ",
        AppView::Main => match app.tab {
            Tab::Kanban => " h/l: Columna | j/k: Tarjeta | Enter: Abrir | n: Nuevo | x: Exportar | ?: Ayuda | q: Salir ",
            Tab::Table => " j/k: Mover | Enter: Abrir | o/O: Ordenar | n: Nuevo | x: Exportar | ?: Ayuda | q: Salir ",
            Tab::Backlog => " j/k: Mover | n: Nuevo | P: Promover | d: Eliminar | ?: Ayuda | q: Salir ",
            _ => " Tab/1-6: Vistas | j/k: Mover | Enter: Abrir | n: Nuevo | x: Exportar | ?: Ayuda | q: Salir ",
        },
        _ => "",
    };

    let line = match &app.status_message {
        Some(message) => Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))),
    };
    let footer = Paragraph::new(line).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}

fn draw_tab(frame: &mut Frame, app: &App, area: Rect) {
    match app.tab {
        Tab::Dashboard => frame.render_widget(DashboardWidget::new(&app.kpis), area),
        Tab::Kanban => frame.render_widget(
            KanbanWidget::new(&app.board, app.kanban_column, app.kanban_card),
            area,
        ),
        Tab::Table => frame.render_widget(
            ProjectTableWidget::new(&app.rows, app.table_index)
                .sort(app.sort_key, app.sort_descending),
            area,
        ),
        Tab::Timeline => {
            if app.timeline.is_empty() {
                draw_empty(frame, area, " Línea de tiempo ");
            } else {
                frame.render_widget(TimelineWidget::new(&app.timeline, app.timeline_index), area);
            }
        }
        Tab::Gantt => frame.render_widget(
            GanttWidget::new(&app.gantt, app.gantt_index, app.today),
            area,
        ),
        Tab::Backlog => draw_backlog(frame, app, area),
    }
}

fn draw_empty(frame: &mut Frame, area: Rect, title: &str) {
    let empty_msg = Paragraph::new("No hay proyectos.\n\nPresiona 'n' para crear uno.")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .alignment(Alignment::Center);
    frame.render_widget(empty_msg, area);
}

fn draw_backlog(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .backlog
        .iter()
        .map(|item| {
            let development = crate::domain::DevelopmentType::parse(&item.development_type);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<40}", item.title),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:<26}", development.label())),
                Span::styled(
                    format!("{}  {}", item.created_by, item.created_at.format("%Y-%m-%d")),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Backlog ({}) ", app.backlog.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !app.backlog.is_empty() {
        state.select(Some(app.backlog_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(draft) = &app.draft else {
        return;
    };
    let widget = StageChecklistWidget::new(draft.project(), app.policy, app.detail_cursor)
        .dirty(draft.is_dirty())
        .can_edit_stages(app.identity.current_is_admin());
    frame.render_widget(widget, area);
}

fn draw_create_dialog(frame: &mut Frame, app: &App, area: Rect, title: &str, field: &str) {
    let popup_area = centered_rect(60, 40, area);
    let prompt = format!(
        "Tipo: {} (Tab para cambiar)",
        app.new_development_type.label()
    );
    let dialog = InputDialog::new(&app.text_input, title)
        .prompt(&prompt)
        .field(field, "")
        .error(app.input_error.as_deref());
    frame.render_widget(dialog, popup_area);
}

fn draw_delete_dialog(frame: &mut Frame, app: &App, area: Rect, title: &str) {
    let popup_area = centered_rect(60, 40, area);
    let dialog = InputDialog::new(&app.text_input, title)
        .prompt("Indica el motivo de la eliminación:")
        .field("Justificación", "obligatoria")
        .error(app.input_error.as_deref())
        .accent(Color::Red);
    frame.render_widget(dialog, popup_area);
}

fn draw_confirm_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let Some(notification) = &app.pending_notification else {
        return;
    };
    let popup_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(format!("¿Enviar correo a {}?", notification.recipient)),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} → {} ({}%)",
                notification.previous_status.as_deref().unwrap_or("-"),
                notification.current_status,
                notification.progress
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "s: Enviar   n: Omitir",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let dialog = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(format!(" Notificar cambio de etapa: {} ", notification.project_code)),
        );
    frame.render_widget(dialog, popup_area);
}

/// Draw error overlay
fn draw_error_overlay(frame: &mut Frame, error: &str, area: Rect) {
    let popup_area = centered_rect(60, 20, area);

    frame.render_widget(Clear, popup_area);

    let error_widget = Paragraph::new(error)
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Error"),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(error_widget, popup_area);
}

/// Create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_within_bounds() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 40, outer);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 20);
        assert_eq!(inner.y, 15);
    }
}
