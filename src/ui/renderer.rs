use crate::core::app::{App, Mode, NamePurpose, Section};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

const LABEL_WIDTH: usize = 12;
const BROWSE_HELP: &str =
    "↑/↓ field • Tab character • Enter edit • Del clear • Ctrl+N new • Ctrl+R rename • Ctrl+D delete • q quit";
const EDIT_HELP: &str = "Enter save • Esc cancel • ↑/↓ suggestions • Tab accept suggestion";

pub fn ui(f: &mut Frame, app: &App) {
    let editor_open = !app.ui.mode.is_browsing();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(if editor_open { 3 } else { 0 }),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_tabs(f, app, chunks[0]);
    if app.roster.is_empty() {
        render_empty_roster(f, chunks[1]);
    } else {
        render_sheet(f, app, chunks[1]);
    }
    if editor_open {
        render_editor(f, app, chunks[2]);
    }
    render_status(f, app, chunks[3]);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .roster
        .iter()
        .map(|record| Line::from(record.name.clone()))
        .collect();
    let title = format!("sheetkeep v{}", env!("CARGO_PKG_VERSION"));
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .select(app.roster.active_index().unwrap_or(0))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_empty_roster(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from("No characters yet."),
        Line::from(""),
        Line::from("Press Ctrl+N (or Enter) to create one."),
    ];
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_sheet(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_fields(f, app, columns[0]);

    let suggestion_height = app
        .ui
        .suggestions
        .as_ref()
        .map(|picker| picker.items.len() as u16 + 2)
        .unwrap_or(0);
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(suggestion_height),
        ])
        .split(columns[1]);

    render_armor_class(f, app, side[0]);
    render_tooltip(f, app, side[1]);
    if suggestion_height > 0 {
        render_suggestions(f, app, side[2]);
    }
}

/// Field rows interleaved with section headers. Returns the items and the
/// item index of the selected field.
fn field_items(app: &App) -> (Vec<ListItem<'static>>, Option<usize>) {
    let Some(record) = app.active() else {
        return (Vec::new(), None);
    };
    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut items = Vec::new();
    let mut selected = None;
    let mut current_section: Option<Section> = None;
    for (index, (section, field)) in app.fields().into_iter().enumerate() {
        if current_section != Some(section) {
            items.push(ListItem::new(Line::from(Span::styled(
                section.title().to_string(),
                header_style,
            ))));
            current_section = Some(section);
        }
        if index == app.ui.selected {
            selected = Some(items.len());
        }
        let label = format!("  {:<width$}", field.label(), width = LABEL_WIDTH);
        items.push(ListItem::new(Line::from(vec![
            Span::styled(label, Style::default().fg(Color::DarkGray)),
            Span::raw(field.display_value(record)),
        ])));
    }
    (items, selected)
}

fn render_fields(f: &mut Frame, app: &App, area: Rect) {
    let title = app
        .active()
        .map(|record| {
            let summary = [record.race.as_str(), record.class.as_str()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            format!(" {} • Level {} {} ", record.name, record.level, summary)
        })
        .unwrap_or_default();

    let (items, selected) = field_items(app);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn render_armor_class(f: &mut Frame, app: &App, area: Rect) {
    let Some(breakdown) = app.armor_class() else {
        return;
    };
    let lines = vec![
        Line::from(Span::styled(
            format!("AC {}", breakdown.total),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(breakdown.terms().join(" + ")),
    ];
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Armor class"))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_tooltip(f: &mut Frame, app: &App, area: Rect) {
    let loading = if app.tooltips.is_loading() {
        " (loading…)"
    } else {
        ""
    };
    let (title, lines) = match app.selected_tooltip() {
        Some(tooltip) => {
            let mut lines = Vec::new();
            for (index, paragraph) in tooltip.body.iter().enumerate() {
                if index > 0 {
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(paragraph.clone()));
            }
            (format!("{}{loading}", tooltip.title), lines)
        }
        None => (
            format!("Rules{loading}"),
            vec![Line::from(Span::styled(
                "Select equipment or a list entry to see its rules text.",
                Style::default().fg(Color::DarkGray),
            ))],
        ),
    };
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_suggestions(f: &mut Frame, app: &App, area: Rect) {
    let Some(picker) = app.ui.suggestions.as_ref() else {
        return;
    };
    let items: Vec<ListItem> = picker
        .items
        .iter()
        .map(|item| ListItem::new(item.clone()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Suggestions"))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow),
        );
    let mut state = ListState::default().with_selected(picker.selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn render_editor(f: &mut Frame, app: &App, area: Rect) {
    let input_style = Style::default().fg(Color::Cyan);
    match &app.ui.mode {
        Mode::EditField { field, editor } => {
            let title = format!("Edit {}", field.label());
            render_input(f, area, &title, &editor.text, editor.cursor_column(), input_style);
        }
        Mode::NameCharacter { purpose, editor } => {
            let title = match purpose {
                NamePurpose::Create => "New character name".to_string(),
                NamePurpose::Rename { from } => format!("Rename {from}"),
            };
            render_input(f, area, &title, &editor.text, editor.cursor_column(), input_style);
        }
        Mode::ConfirmDelete { name } => {
            let prompt = Paragraph::new(format!("Delete {name}? This cannot be undone. (y/N)"))
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL).title("Confirm"));
            f.render_widget(prompt, area);
        }
        Mode::Browse => {}
    }
}

fn render_input(f: &mut Frame, area: Rect, title: &str, text: &str, column: usize, style: Style) {
    let inner_width = area.width.saturating_sub(2) as usize;
    // Scroll horizontally so the cursor stays visible.
    let offset = column.saturating_sub(inner_width.saturating_sub(1));
    let paragraph = Paragraph::new(text.to_string())
        .style(style)
        .scroll((0, offset as u16))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, area);

    let x = area.x + 1 + (column - offset) as u16;
    f.set_cursor_position((x, area.y + 1));
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.ui.status {
        Some(status) => Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => {
            let help = match app.ui.mode {
                Mode::EditField { .. } => EDIT_HELP,
                Mode::NameCharacter { .. } => "Enter save • Esc cancel",
                Mode::ConfirmDelete { .. } => "y delete • n keep",
                Mode::Browse => BROWSE_HELP,
            };
            Line::from(Span::styled(help, Style::default().fg(Color::DarkGray)))
        }
    };
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::record::EquipmentSlot;
    use crate::character::roster::Roster;
    use crate::core::app::{apply_action, AppAction, AppOptions};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn options() -> AppOptions {
        AppOptions {
            enrich: false,
            max_suggestions: 5,
            default_character: None,
        }
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn empty_roster_prompts_for_a_character() {
        let app = App::new(Roster::new(), options());
        let text = screen(&app);
        assert!(text.contains("No characters yet."));
        assert!(text.contains("Ctrl+N"));
    }

    #[test]
    fn tabs_list_every_character_and_sheet_shows_armor() {
        let mut roster = Roster::new();
        let tess = roster.create("Tess").unwrap();
        tess.abilities.dexterity = 14;
        tess.equip(EquipmentSlot::Armor, "Leather Armor");
        roster.create("Brom").unwrap();
        roster.set_active("Tess").unwrap();
        let app = App::new(roster, options());

        let text = screen(&app);
        assert!(text.contains("Tess"));
        assert!(text.contains("Brom"));
        assert!(text.contains("AC 13"));
        assert!(text.contains("Leather Armor 11 + dex +2"));
        assert!(text.contains("Equipment"));
    }

    #[test]
    fn editor_and_delete_prompt_are_drawn() {
        let mut roster = Roster::new();
        roster.create("Tess").unwrap();
        let mut app = App::new(roster, options());

        apply_action(&mut app, AppAction::BeginRename);
        assert!(screen(&app).contains("Rename Tess"));

        apply_action(&mut app, AppAction::Edit(crate::utils::line_editor::LineEditAction::Cancel));
        apply_action(&mut app, AppAction::BeginDelete);
        assert!(screen(&app).contains("Delete Tess?"));
    }

    #[test]
    fn status_replaces_help_line() {
        let mut roster = Roster::new();
        roster.create("Tess").unwrap();
        let mut app = App::new(roster, options());
        assert!(screen(&app).contains("Ctrl+D delete"));
        app.ui.set_status("⚠️ Save failed: disk full");
        assert!(screen(&app).contains("Save failed: disk full"));
    }
}
