use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use billed_common::constants::{BILLS_TITLE, NEW_BILL_TITLE};
use billed_common::types::BillStatus;
use billed_utils::format::format_amount;

use super::state::{App, View};

// ─── Color palette ──────────────────────────────────────────────────

const ACCENT: Color = Color::Cyan;
const GREEN: Color = Color::Green;
const RED: Color = Color::Red;
const DIM: Color = Color::DarkGray;
const YELLOW: Color = Color::Yellow;
const WHITE: Color = Color::White;
const BG_HEADER: Color = Color::Rgb(20, 20, 40);
const BG_SELECTED: Color = Color::Rgb(40, 40, 70);

// ─── Main render ────────────────────────────────────────────────────

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Root layout: header(3) + body(flex) + status(1)
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, root[0]);

    match app.view {
        View::Bills if app.last_error.is_some() => render_error(frame, app, root[1]),
        View::Bills => render_bills(frame, app, root[1]),
        View::NewBill => render_new_bill(frame, root[1]),
    }

    render_status_bar(frame, app, root[2]);

    if app.modal_open() {
        render_receipt(frame, app, area);
    }
    if app.show_help {
        render_help(frame, area);
    }
}

// ─── Header ─────────────────────────────────────────────────────────

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(DIM))
        .style(Style::default().bg(BG_HEADER));

    let (bills_style, form_style) = match app.view {
        View::Bills => (Style::default().fg(ACCENT).bold(), Style::default().fg(DIM)),
        View::NewBill => (Style::default().fg(DIM), Style::default().fg(ACCENT).bold()),
    };

    let user = app
        .router
        .bills_container()
        .session()
        .map(|s| s.email.clone())
        .unwrap_or_else(|| "not connected".into());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " BILLED ",
            Style::default().fg(Color::Black).bg(ACCENT).bold(),
        ),
        Span::raw("  "),
        Span::styled("▤ Notes de frais", bills_style),
        Span::raw("  "),
        Span::styled("✉ Nouvelle", form_style),
        Span::raw("  │  "),
        Span::styled(user, Style::default().fg(YELLOW)),
    ]))
    .block(block);

    frame.render_widget(header, area);
}

// ─── Bills table ────────────────────────────────────────────────────

fn status_color(raw_status: &str) -> Color {
    match BillStatus::from_code(raw_status) {
        Some(BillStatus::Accepted) => GREEN,
        Some(BillStatus::Refused) => RED,
        Some(BillStatus::Pending) => YELLOW,
        None => DIM,
    }
}

fn render_bills(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" {BILLS_TITLE} "))
        .title_style(Style::default().fg(ACCENT).bold())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(DIM));

    if app.bills().is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  No bills yet. Press n to send one.",
            Style::default().fg(DIM),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Type", "Nom", "Date", "Montant", "Statut", "Justificatif"])
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .bills()
        .iter()
        .enumerate()
        .map(|(i, bill)| {
            let receipt = if bill.receipt_url().is_some() { "👁" } else { "—" };
            let row = Row::new(vec![
                Cell::from(bill.expense_type.clone()),
                Cell::from(bill.name.clone()).style(Style::default().fg(WHITE).bold()),
                Cell::from(bill.date.clone()),
                Cell::from(format_amount(bill.amount)),
                Cell::from(bill.status.clone()).style(Style::default().fg(status_color(&bill.raw_status))),
                Cell::from(receipt),
            ]);
            if i == app.selected {
                row.style(Style::default().bg(BG_SELECTED))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(22),
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(13),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

// ─── Error panel ────────────────────────────────────────────────────

fn render_error(frame: &mut Frame, app: &App, area: Rect) {
    let message = app.last_error.as_deref().unwrap_or_default();
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {message}"), Style::default().fg(RED).bold())),
        Line::from(""),
        Line::from(Span::styled("  Press r to try again.", Style::default().fg(DIM))),
    ];
    let panel = Paragraph::new(text).block(
        Block::default()
            .title(" Erreur ")
            .title_style(Style::default().fg(RED).bold())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(RED)),
    );
    frame.render_widget(panel, area);
}

// ─── New bill ───────────────────────────────────────────────────────

fn render_new_bill(frame: &mut Frame, area: Rect) {
    let field = |label: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {label:<20}"), Style::default().fg(DIM)),
            Span::raw("________________"),
        ])
    };
    let text = vec![
        Line::from(""),
        field("Type de dépense"),
        field("Nom de la dépense"),
        field("Date"),
        field("Montant TTC"),
        field("TVA"),
        field("Commentaire"),
        field("Justificatif"),
        Line::from(""),
        Line::from(Span::styled(
            "  Submit the form from the web app. Esc returns to your bills.",
            Style::default().fg(DIM),
        )),
    ];
    let form = Paragraph::new(text).block(
        Block::default()
            .title(format!(" {NEW_BILL_TITLE} "))
            .title_style(Style::default().fg(ACCENT).bold())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT)),
    );
    frame.render_widget(form, area);
}

// ─── Receipt modal ──────────────────────────────────────────────────

fn render_receipt(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(60, 40, area);
    frame.render_widget(Clear, popup);

    let bill = app.selected_bill();
    let url = bill.and_then(|b| b.receipt_url()).unwrap_or("(no receipt)");
    let name = bill
        .and_then(|b| b.file_name.as_deref())
        .unwrap_or("—");

    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  File  ", Style::default().fg(DIM)),
            Span::styled(name.to_string(), Style::default().fg(WHITE).bold()),
        ]),
        Line::from(vec![
            Span::styled("  URL   ", Style::default().fg(DIM)),
            Span::raw(url.to_string()),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Esc to close", Style::default().fg(DIM))),
    ];

    let modal = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Justificatif ")
                .title_style(Style::default().fg(ACCENT).bold())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT)),
        )
        .style(Style::default().bg(Color::Rgb(15, 15, 30)));

    frame.render_widget(modal, popup);
}

// ─── Status bar ─────────────────────────────────────────────────────

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let conn = if app.last_error.is_none() {
        Span::styled(" STORE:OK", Style::default().fg(GREEN).bold())
    } else {
        Span::styled(" STORE:ERR", Style::default().fg(RED).bold())
    };

    let feedback = match &app.status {
        Some(msg) => Span::styled(format!("  │  {msg}"), Style::default().fg(YELLOW)),
        None => Span::raw(""),
    };

    let line = Line::from(vec![
        conn,
        feedback,
        Span::styled(
            format!("  │  {} bills  │  refreshed {}  ", app.bills().len(), app.last_refresh),
            Style::default().fg(DIM),
        ),
        Span::styled(
            "?",
            Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" Help ", Style::default().fg(DIM)),
        Span::styled(
            "q",
            Style::default()
                .fg(Color::Black)
                .bg(RED)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" Quit", Style::default().fg(DIM)),
    ]);

    let bar = Paragraph::new(line).style(Style::default().bg(BG_HEADER));
    frame.render_widget(bar, area);
}

// ─── Help overlay ───────────────────────────────────────────────────

fn render_help(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(55, 60, area);

    frame.render_widget(Clear, popup);

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("  Bills", Style::default().fg(ACCENT).bold())),
        Line::from(""),
        Line::from("  j / ↓         Select next bill"),
        Line::from("  k / ↑         Select previous bill"),
        Line::from("  Enter         Preview receipt"),
        Line::from("  n             New bill"),
        Line::from("  r             Fetch bills again"),
        Line::from(""),
        Line::from(Span::styled("  General", Style::default().fg(ACCENT).bold())),
        Line::from(""),
        Line::from("  Esc           Close receipt / back to bills"),
        Line::from("  ?             Toggle help"),
        Line::from("  q / Ctrl+C    Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "  Press ? or Esc to close",
            Style::default().fg(DIM),
        )),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .title_style(Style::default().fg(ACCENT).bold())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT)),
        )
        .style(Style::default().bg(Color::Rgb(15, 15, 30)));

    frame.render_widget(help, popup);
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Create a centered rectangle for overlay popups.
fn centered_rect(pct_x: u16, pct_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
