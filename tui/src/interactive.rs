use anyhow::Result;
use chrono::{Local, Utc};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use tokio::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use pitchdeck_api::ApiClient;
use pitchdeck_common::Persona;
use pitchdeck_core::SubmitState;

use crate::app::{Action, Field, FormApp};

pub async fn run_interactive(api: ApiClient) -> Result<()> {
    let mut app = FormApp::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // First health check happens at mount, like the web widget.
    app.refresh_connection(&api).await;

    let result = run_loop(&mut terminal, &mut app, &api).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut FormApp,
    api: &ApiClient,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| draw(f, app, api.base_url()))?;

        // Non-blocking poll in a blocking thread, keeping the runtime free.
        let has_event =
            tokio::task::spawn_blocking(|| event::poll(Duration::from_millis(100))).await??;
        if !has_event {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            match app.handle_key(key.code, key.modifiers) {
                Action::Quit => app.running = false,
                Action::Submit => {
                    // Render the in-flight state before awaiting the network.
                    if let Some(request) = app.begin_submit().await {
                        terminal.draw(|f| draw(f, app, api.base_url()))?;
                        app.finish_submit(api, request).await;
                    }
                }
                Action::Download => app.download(api).await,
                Action::CheckConnection => {
                    app.connection = pitchdeck_core::ConnectionState::Unknown;
                    terminal.draw(|f| draw(f, app, api.base_url()))?;
                    app.refresh_connection(api).await;
                }
                Action::None => {}
            }
        }
    }
    Ok(())
}

fn draw(f: &mut Frame, app: &FormApp, base_url: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_connection(f, app, base_url, chunks[0]);

    if app.showing_result() {
        draw_result(f, app, chunks[1]);
        draw_status(f, app, chunks[2]);
        draw_help(f, "d download  n create another  q quit", chunks[3]);
    } else {
        draw_form(f, app, chunks[1]);
        draw_status(f, app, chunks[2]);
        draw_help(
            f,
            "Up/Down move  Left/Right cycle  Space toggle persona  Ctrl-S generate  Ctrl-R recheck  Esc quit",
            chunks[3],
        );
    }
}

fn draw_connection(f: &mut Frame, app: &FormApp, base_url: &str, area: Rect) {
    use pitchdeck_core::ConnectionState;

    let (text, style) = match &app.connection {
        ConnectionState::Unknown => (
            "Checking connection...".to_string(),
            Style::default().fg(Color::Yellow),
        ),
        ConnectionState::Connected { last_checked } => (
            format!(
                "Backend connected (last checked {})",
                last_checked.with_timezone(&Local).format("%H:%M:%S")
            ),
            Style::default().fg(Color::Green),
        ),
        ConnectionState::Disconnected => (
            format!("Unable to reach backend at: {base_url}"),
            Style::default().fg(Color::Red),
        ),
    };

    let widget = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Connection"));
    f.render_widget(widget, area);
}

fn draw_form(f: &mut Frame, app: &FormApp, area: Rect) {
    let form = &app.controller.form;
    let width = area.width.saturating_sub(4) as usize;

    let mut lines: Vec<Line> = Vec::new();
    for field in Field::ORDER {
        let selected = app.field == field;
        let marker = if selected { "> " } else { "  " };
        let text = match field {
            Field::Company => format!("{marker}Company name: {}", fit(&form.company_name, width)),
            Field::Industry => format!(
                "{marker}Industry: {}",
                form.industry
                    .map(|i| i.label())
                    .unwrap_or("(Left/Right to select)")
            ),
            Field::Personas => format!("{marker}Buyer personas: {}", persona_row(app)),
            Field::PainPoint => format!(
                "{marker}Main pain point: {}",
                fit(&form.pain_point, width)
            ),
            Field::UseCase => format!(
                "{marker}Use case: {}",
                form.use_case
                    .map(|u| u.label())
                    .unwrap_or("(Left/Right to select)")
            ),
            Field::Logo => format!("{marker}Logo path: {}", fit(&app.logo_path, width)),
            Field::Submit => {
                if app.controller.state().is_submitting() {
                    format!("{marker}[ Generating... ]")
                } else {
                    format!("{marker}[ Generate Deck ]")
                }
            }
        };
        let style = if selected {
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan)
        } else {
            Style::default()
        };
        lines.push(Line::styled(text, style));
        lines.push(Line::raw(""));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Create Your Sales Deck"),
        );
    f.render_widget(widget, area);
}

fn persona_row(app: &FormApp) -> String {
    let mut parts = Vec::with_capacity(Persona::ALL.len());
    for (index, persona) in Persona::ALL.iter().enumerate() {
        let checked = if app.controller.form.has_persona(*persona) {
            "x"
        } else {
            " "
        };
        if app.field == Field::Personas && index == app.persona_cursor {
            parts.push(format!("<[{checked}] {persona}>"));
        } else {
            parts.push(format!("[{checked}] {persona}"));
        }
    }
    parts.join("  ")
}

fn draw_result(f: &mut Frame, app: &FormApp, area: Rect) {
    let Some(handle) = app.controller.handle() else {
        return;
    };
    let expired = handle.is_expired(Utc::now());

    let mut lines = vec![
        Line::styled(
            "Your deck is ready!",
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Green),
        ),
        Line::raw(""),
        Line::raw(format!("Filename: {}", handle.filename)),
        Line::raw(format!("Slides: {}", handle.slides_generated)),
        Line::raw(format!("File id: {}", handle.file_id)),
        Line::raw(format!("Download URL: {}", handle.download_url)),
        Line::raw(format!(
            "Expires: {}",
            handle.expires_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        )),
    ];
    if expired {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "This download link has expired. Please generate a new deck.",
            Style::default().fg(Color::Red),
        ));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Result"));
    f.render_widget(widget, area);
}

fn draw_status(f: &mut Frame, app: &FormApp, area: Rect) {
    let (text, style) = match (&app.status, app.controller.state()) {
        (Some(status), _) => (status.clone(), Style::default().fg(Color::Yellow)),
        (None, SubmitState::Failed(message)) => {
            (message.clone(), Style::default().fg(Color::Red))
        }
        _ => (String::new(), Style::default()),
    };
    let widget = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(widget, area);
}

fn draw_help(f: &mut Frame, help: &str, area: Rect) {
    let widget = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

/// Truncate to the pane width, by display columns rather than bytes.
fn fit(value: &str, max: usize) -> String {
    if value.width() <= max {
        return value.to_string();
    }
    let budget = max.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in value.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str("...");
    out
}
