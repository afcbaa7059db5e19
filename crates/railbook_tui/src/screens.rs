//! Screen rendering functions for the TUI.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
};
use railbook_core::lookup::BookingDetails;
use railbook_core::models::{BookingStatus, Train};

use crate::app::AppState;
use crate::feedback::Feedback;
use crate::form::FormState;
use crate::router::{navbar, Route};
use crate::views::admin::{AdminTab, AdminView};
use crate::views::home::home_content;
use crate::views::locations::LocationManager;
use crate::views::search::SearchView;
use crate::views::trains::TrainManager;

/// Draw the whole frame
pub fn draw(frame: &mut Frame, app: &AppState) {
    let area = frame.size();

    let Some(route) = app.route else {
        draw_loading(frame, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Navbar
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    draw_navbar(frame, chunks[0], app, route);

    let content = match &app.notice {
        Some(notice) => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(chunks[1]);
            let banner = Paragraph::new(notice.as_str())
                .style(Style::default().fg(Color::Green))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(banner, parts[0]);
            parts[1]
        }
        None => chunks[1],
    };

    match route {
        Route::Login => draw_form(
            frame,
            content,
            " Login ",
            &app.login.form,
            &app.login.feedback,
            if app.login.loading { "Logging in..." } else { "Login" },
        ),
        Route::Register => draw_form(
            frame,
            content,
            " Register ",
            &app.register.form,
            &app.register.feedback,
            if app.register.loading { "Registering..." } else { "Register" },
        ),
        Route::Home => draw_home(frame, content, app),
        Route::Search => draw_search(frame, content, &app.search),
        Route::Book => draw_booking(frame, content, app),
        Route::MyBookings => draw_bookings_table(
            frame,
            content,
            " My Bookings ",
            &app.my_bookings.rows(),
            app.my_bookings.selected,
            &app.my_bookings.feedback,
            app.my_bookings.loading,
        ),
        Route::Admin => draw_admin(frame, content, &app.admin),
    }

    draw_footer(frame, chunks[2], route);

    if let Some(prompt) = app.pending_prompt() {
        draw_confirm(frame, area, prompt);
    }
}

fn draw_loading(frame: &mut Frame, area: Rect) {
    let loading = Paragraph::new("Loading...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(loading, centered(area, 30, 3));
}

/// Draw navbar
fn draw_navbar(frame: &mut Frame, area: Rect, app: &AppState, route: Route) {
    let nav = navbar(app.session.state());

    let mut spans = vec![Span::styled(
        " Railbook ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for (label, target) in &nav.links {
        let style = if *target == route {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(*label, style));
    }
    if let Some(greeting) = &nav.greeting {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(greeting.clone(), Style::default().fg(Color::Green)));
    }
    if nav.can_logout {
        spans.push(Span::raw(" | Logout"));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().title(format!(" {} ", route.title())).borders(Borders::ALL));
    frame.render_widget(header, area);
}

/// Draw footer with keybindings
fn draw_footer(frame: &mut Frame, area: Rect, route: Route) {
    let keys = match route {
        Route::Login | Route::Register => {
            " [Tab]Next field [Enter]Submit [Space]Toggle | [F5]Login [F6]Register | [F10]Quit "
        }
        Route::Home => " [F2]Search [F3]My Bookings [F4]Admin | [F9]Logout [F10]Quit ",
        Route::Search => {
            " [Tab]Field [Left/Right]Station [Enter]Search [Up/Down]Select [b]Book | [F10]Quit "
        }
        Route::Book => " [Tab]Next field [Left/Right]Gender [Enter]Confirm [Esc]Back | [F10]Quit ",
        Route::MyBookings => " [Up/Down]Select [c]Cancel booking [r]Refresh | [F9]Logout [F10]Quit ",
        Route::Admin => {
            " [PgUp/PgDn]Tab [Up/Down]Select [Enter]Save [^E]Edit [^D]Delete [Esc]Clear | [F10]Quit "
        }
    };
    let footer = Paragraph::new(keys)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Error line in red, success line in green
fn feedback_lines(feedback: &Feedback) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(error) = feedback.error() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }
    if let Some(success) = feedback.success() {
        lines.push(Line::from(Span::styled(
            success.to_string(),
            Style::default().fg(Color::Green),
        )));
    }
    lines
}

fn form_lines(form: &FormState) -> Vec<Line<'static>> {
    form.fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let focused = idx == form.focus();
            let marker = if focused { "> " } else { "  " };
            let value_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<26}", field.label), Style::default().fg(Color::Cyan)),
                Span::styled(field.display(), value_style),
            ])
        })
        .collect()
}

/// Draw a form with its feedback and submit hint
fn draw_form(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    form: &FormState,
    feedback: &Feedback,
    submit: &str,
) {
    let mut lines = feedback_lines(feedback);
    if !lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines.extend(form_lines(form));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("[ {} ]", submit),
        Style::default().add_modifier(Modifier::REVERSED),
    )));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Draw home screen
fn draw_home(frame: &mut Frame, area: Rect, app: &AppState) {
    let Some(user) = app.session.user() else {
        return;
    };
    let content = home_content(user);

    let mut lines = vec![
        Line::from(Span::styled(
            content.greeting,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (text, route) in content.pointers {
        let key = match route {
            Route::Admin => "F4",
            Route::Search => "F2",
            Route::MyBookings => "F3",
            _ => "",
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}] ", key), Style::default().fg(Color::Yellow)),
            Span::raw(text),
        ]));
    }

    let home = Paragraph::new(lines).block(Block::default().title(" Home ").borders(Borders::ALL));
    frame.render_widget(home, area);
}

fn train_rows<'a>(
    trains: &'a [Train],
    selected: usize,
    station: impl Fn(i64) -> String + 'a,
) -> impl Iterator<Item = Row<'a>> + 'a {
    trains.iter().enumerate().map(move |(idx, train)| {
        let style = if idx == selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let seats = if train.is_sold_out() {
            Cell::from("Sold Out").style(Style::default().fg(Color::Red))
        } else {
            Cell::from(train.seat_summary()).style(Style::default().fg(Color::Green))
        };
        Row::new(vec![
            Cell::from(format!("{} (#{})", train.train_name, train.train_number)),
            Cell::from(format!(
                "{} → {}",
                station(train.source_id),
                station(train.destination_id)
            )),
            Cell::from(train.schedule()),
            seats,
            Cell::from(format!("₹{}", train.fare)),
        ])
        .style(style)
    })
}

fn train_table<'a>(rows: impl Iterator<Item = Row<'a>>, title: String) -> Table<'a> {
    let header = Row::new(
        ["Train", "Route", "Schedule", "Seats", "Fare"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow))),
    )
    .height(1);
    let widths = [
        Constraint::Min(24),
        Constraint::Min(30),
        Constraint::Length(15),
        Constraint::Length(10),
        Constraint::Length(8),
    ];
    Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
}

/// Draw search screen
fn draw_search(frame: &mut Frame, area: Rect, view: &SearchView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    let submit = if view.loading { "Searching..." } else { "Search" };
    draw_form(frame, chunks[0], " Search Trains ", &view.form, &view.feedback, submit);

    if !view.searched {
        return;
    }
    if view.trains.is_empty() {
        let empty = Paragraph::new("No trains found for the selected route.")
            .block(Block::default().title(" Results ").borders(Borders::ALL));
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let rows = train_rows(&view.trains, view.selected, |id| view.station(id));
    let table = train_table(rows, format!(" {} ", view.result_heading()));
    frame.render_widget(table, chunks[1]);
}

/// Draw booking form screen
fn draw_booking(frame: &mut Frame, area: Rect, app: &AppState) {
    let view = &app.booking;
    let Some(train) = &view.train else {
        let missing = Paragraph::new(vec![
            Line::from("No train selected."),
            Line::from(""),
            Line::from("Press [Esc] or [Enter] to go to Search."),
        ])
        .block(Block::default().title(" Book Ticket ").borders(Borders::ALL));
        frame.render_widget(missing, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let summary = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("{} (#{})", train.train_name, train.train_number),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {}", train.schedule())),
        ]),
        Line::from(format!(
            "Seats available: {}   Fare: ₹{}",
            train.seat_summary(),
            train.fare
        )),
    ])
    .block(Block::default().title(" Train ").borders(Borders::ALL));
    frame.render_widget(summary, chunks[0]);

    let submit = if view.loading {
        "Booking...".to_string()
    } else {
        view.submit_label()
    };
    draw_form(
        frame,
        chunks[1],
        " Passenger Details ",
        &view.form,
        &view.feedback,
        &submit,
    );
}

fn status_style(status: BookingStatus) -> Style {
    match status {
        BookingStatus::Confirmed => Style::default().fg(Color::Green),
        BookingStatus::Pending => Style::default().fg(Color::Yellow),
        BookingStatus::Cancelled => Style::default().fg(Color::Red),
    }
}

/// Draw a joined bookings table
fn draw_bookings_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[BookingDetails<'_>],
    selected: usize,
    feedback: &Feedback,
    loading: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);
    frame.render_widget(Paragraph::new(feedback_lines(feedback)), chunks[0]);

    if loading {
        frame.render_widget(
            Paragraph::new("Loading bookings...")
                .block(Block::default().title(title.to_string()).borders(Borders::ALL)),
            chunks[1],
        );
        return;
    }
    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new("No bookings yet.")
                .block(Block::default().title(title.to_string()).borders(Borders::ALL)),
            chunks[1],
        );
        return;
    }

    let header = Row::new(
        ["Reference", "Train", "Route", "Journey", "Passenger", "Seat", "Fare", "Status"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow))),
    )
    .height(1);

    let table_rows = rows.iter().enumerate().map(|(idx, row)| {
        let booking = row.booking;
        let style = if idx == selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(booking.booking_reference.clone()),
            Cell::from(row.train_label()),
            Cell::from(row.route()),
            Cell::from(booking.journey_date.format("%Y-%m-%d").to_string()),
            Cell::from(format!(
                "{} ({}, {})",
                booking.passenger_name, booking.passenger_age, booking.passenger_gender
            )),
            Cell::from(booking.seat_number.clone().unwrap_or_else(|| "-".to_string())),
            Cell::from(format!("₹{}", booking.total_fare)),
            Cell::from(booking.status.label()).style(status_style(booking.status)),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(13),
        Constraint::Min(20),
        Constraint::Min(30),
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(10),
    ];

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(table, chunks[1]);
}

/// Draw admin dashboard
fn draw_admin(frame: &mut Frame, area: Rect, view: &AdminView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let titles: Vec<&str> = AdminTab::ALL.iter().map(|t| t.title()).collect();
    let selected = AdminTab::ALL
        .iter()
        .position(|t| *t == view.tab)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    match view.tab {
        AdminTab::Locations => draw_location_manager(frame, chunks[1], &view.locations),
        AdminTab::Trains => draw_train_manager(frame, chunks[1], &view.trains),
        AdminTab::Bookings => draw_bookings_table(
            frame,
            chunks[1],
            " All Bookings ",
            &view.bookings.rows(),
            view.bookings.selected,
            &view.bookings.feedback,
            view.bookings.loading,
        ),
        AdminTab::Users => draw_users(frame, chunks[1], view),
    }
}

fn draw_location_manager(frame: &mut Frame, area: Rect, view: &LocationManager) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let header = Row::new(
        ["ID", "Name", "Code", "City", "State"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow))),
    );
    let rows = view.locations.iter().enumerate().map(|(idx, loc)| {
        let style = if idx == view.selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(loc.id.to_string()),
            Cell::from(loc.name.clone()),
            Cell::from(loc.code.clone()),
            Cell::from(loc.city.clone()),
            Cell::from(loc.state.clone()),
        ])
        .style(style)
    });
    let widths = [
        Constraint::Length(4),
        Constraint::Min(18),
        Constraint::Length(6),
        Constraint::Min(10),
        Constraint::Min(10),
    ];
    let title = if view.loading { " Locations (loading...) " } else { " Locations " };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, chunks[0]);

    let (title, submit) = match view.editing {
        Some(_) => (" Edit Location ", "Update Location"),
        None => (" Add New Location ", "Add Location"),
    };
    draw_form(frame, chunks[1], title, &view.form, &view.feedback, submit);
}

fn draw_train_manager(frame: &mut Frame, area: Rect, view: &TrainManager) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let rows = train_rows(&view.trains, view.selected, |id| view.station(id));
    let title = if view.loading { " Trains (loading...) " } else { " Trains " };
    let table = train_table(rows, title.to_string());
    frame.render_widget(table, chunks[0]);

    let (title, submit) = match view.editing {
        Some(_) => (" Edit Train ", "Update Train"),
        None => (" Add New Train ", "Add Train"),
    };
    draw_form(frame, chunks[1], title, &view.form, &view.feedback, submit);
}

fn draw_users(frame: &mut Frame, area: Rect, view: &AdminView) {
    let list = &view.users;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);
    frame.render_widget(Paragraph::new(feedback_lines(&list.feedback)), chunks[0]);

    let header = Row::new(
        ["ID", "Username", "Email", "Full Name", "Role", "Active"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow))),
    );
    let rows = list.users.iter().enumerate().map(|(idx, user)| {
        let style = if idx == list.selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(user.id.to_string()),
            Cell::from(user.username.clone()),
            Cell::from(user.email.clone()),
            Cell::from(user.full_name.clone().unwrap_or_default()),
            Cell::from(if user.is_admin { "Admin" } else { "User" }),
            Cell::from(if user.is_active { "Yes" } else { "No" }),
        ])
        .style(style)
    });
    let widths = [
        Constraint::Length(4),
        Constraint::Min(12),
        Constraint::Min(20),
        Constraint::Min(16),
        Constraint::Length(6),
        Constraint::Length(7),
    ];
    let title = if list.loading { " Users (loading...) " } else { " Users " };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, chunks[1]);
}

/// Draw a yes/no prompt over the current screen
fn draw_confirm(frame: &mut Frame, area: Rect, prompt: &str) {
    let popup = centered(area, 60, 7);
    frame.render_widget(Clear, popup);
    let text = vec![
        Line::from(prompt.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "[y] Yes   [n] No",
            Style::default().fg(Color::Yellow),
        )),
    ];
    let dialog = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Confirm ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(dialog, popup);
}

/// A `width` x `height` rectangle centred in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
