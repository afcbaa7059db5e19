//! TUI Application state and event handling.

use std::future::Future;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use railbook_client::{BookingApi, LocalStorage};
use railbook_core::models::Train;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::form::FormState;
use crate::router::{landing, Route};
use crate::screens;
use crate::session::SessionController;
use crate::views::admin::{AdminTab, AdminView};
use crate::views::booking::BookingView;
use crate::views::login::LoginView;
use crate::views::my_bookings::MyBookingsView;
use crate::views::register::RegisterView;
use crate::views::search::SearchView;
use crate::views::Outcome;

/// A finished backend task with the view copy it worked on
enum Reply {
    Session {
        session: SessionController,
        then: Route,
    },
    Login(LoginView, Outcome),
    Register(RegisterView, Outcome),
    Search(SearchView),
    Booking(BookingView, Outcome),
    MyBookings(MyBookingsView),
    Admin(AdminView),
}

/// A reply tagged with the generation it was spawned in
struct Envelope {
    generation: u64,
    reply: Reply,
}

/// Application state without the terminal
///
/// Backend calls never run on the input path. A key that needs the backend
/// marks the view as loading, hands a copy of the view to a spawned task and
/// returns. The task sends the updated copy back over a channel and
/// [`AppState::drain`] swaps it in. Replies for a view that has since been
/// remounted are dropped.
pub struct AppState {
    api: Arc<dyn BookingApi>,
    storage: Arc<dyn LocalStorage>,
    /// Who is logged in
    pub session: SessionController,
    /// Rendered route; `None` while the session is loading
    pub route: Option<Route>,
    /// Banner carried across a navigation
    pub notice: Option<String>,
    /// Train picked in search, consumed by the booking form
    pending_train: Option<Train>,
    /// `/login`
    pub login: LoginView,
    /// `/register`
    pub register: RegisterView,
    /// `/search`
    pub search: SearchView,
    /// `/book`
    pub booking: BookingView,
    /// `/my-bookings`
    pub my_bookings: MyBookingsView,
    /// `/admin`
    pub admin: AdminView,
    /// Exit flag
    pub should_quit: bool,
    /// Bumped on every mount
    mount_generation: u64,
    /// Bumped on logout so an older session check cannot log back in
    session_generation: u64,
    /// A task owns a copy of the mounted view
    busy: bool,
    /// Spawned tasks whose reply has not been applied
    in_flight: usize,
    replies_tx: mpsc::UnboundedSender<Envelope>,
    replies_rx: mpsc::UnboundedReceiver<Envelope>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl AppState {
    /// Create the state; the session starts out loading
    pub fn new(api: Arc<dyn BookingApi>, storage: Arc<dyn LocalStorage>) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        Self {
            session: SessionController::new(api.clone(), storage.clone()),
            api,
            storage,
            route: None,
            notice: None,
            pending_train: None,
            login: LoginView::default(),
            register: RegisterView::default(),
            search: SearchView::default(),
            booking: BookingView::new(None, today()),
            my_bookings: MyBookingsView::default(),
            admin: AdminView::default(),
            should_quit: false,
            mount_generation: 0,
            session_generation: 0,
            busy: false,
            in_flight: 0,
            replies_tx,
            replies_rx,
        }
    }

    /// Resolve the stored session in the background, then open `path`.
    ///
    /// Unknown paths land on home.
    pub fn start(&mut self, path: &str) {
        let route = Route::from_path(path).unwrap_or(Route::Home);
        self.check_session(route);
    }

    /// Whether a backend task is still running for the mounted view
    #[cfg(test)]
    pub(crate) fn is_busy(&self) -> bool {
        self.busy
    }

    fn spawn(&mut self, generation: u64, task: impl Future<Output = Reply> + Send + 'static) {
        let sender = self.replies_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let reply = task.await;
            if sender.send(Envelope { generation, reply }).is_err() {
                debug!("app closed before reply arrived");
            }
        });
    }

    /// Run `task` against the mounted view; its keys wait until the reply lands
    fn spawn_view<F, Fut>(&mut self, task: F)
    where
        F: FnOnce(Arc<dyn BookingApi>) -> Fut,
        Fut: Future<Output = Reply> + Send + 'static,
    {
        self.busy = true;
        let task = task(self.api.clone());
        self.spawn(self.mount_generation, task);
    }

    fn check_session(&mut self, then: Route) {
        let mut session = self.session.clone();
        self.spawn(self.session_generation, async move {
            session.check_auth().await;
            Reply::Session { session, then }
        });
    }

    /// Apply every reply that has arrived, without waiting
    pub fn drain(&mut self) {
        while let Ok(envelope) = self.replies_rx.try_recv() {
            self.receive(envelope);
        }
    }

    /// Wait until every spawned task has replied
    #[cfg(test)]
    pub(crate) async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.replies_rx.recv().await {
                Some(envelope) => self.receive(envelope),
                None => break,
            }
        }
    }

    fn receive(&mut self, envelope: Envelope) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let Envelope { generation, reply } = envelope;

        match reply {
            Reply::Session { session, then } => {
                if generation == self.session_generation {
                    self.session = session;
                    self.navigate(then);
                } else {
                    debug!("dropping session check from before logout");
                }
            }
            _ if generation != self.mount_generation => {
                debug!("dropping reply for a view that is no longer mounted");
            }
            Reply::Login(view, outcome) => {
                self.login = view;
                self.finish(outcome);
            }
            Reply::Register(view, outcome) => {
                self.register = view;
                self.finish(outcome);
            }
            Reply::Search(view) => {
                self.search = view;
                self.finish(Outcome::Stay);
            }
            Reply::Booking(view, outcome) => {
                self.booking = view;
                self.finish(outcome);
            }
            Reply::MyBookings(view) => {
                self.my_bookings = view;
                self.finish(Outcome::Stay);
            }
            Reply::Admin(view) => {
                self.admin = view;
                self.finish(Outcome::Stay);
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.busy = false;
        self.apply(outcome);
    }

    /// Open a route through the guards and mount its view
    pub fn navigate(&mut self, route: Route) {
        self.notice = None;
        match landing(route, self.session.state()) {
            Some(target) => {
                if target != route {
                    debug!(from = route.path(), to = target.path(), "redirect");
                }
                self.mount(target);
            }
            None => self.route = None,
        }
    }

    fn mount(&mut self, route: Route) {
        self.route = Some(route);
        self.mount_generation += 1;
        self.busy = false;
        match route {
            Route::Login => self.login = LoginView::default(),
            Route::Register => self.register = RegisterView::default(),
            Route::Home => {}
            Route::Search => {
                self.search = SearchView::default();
                let mut view = self.search.clone();
                self.spawn_view(move |api| async move {
                    view.load(api.as_ref()).await;
                    Reply::Search(view)
                });
            }
            Route::Book => self.booking = BookingView::new(self.pending_train.take(), today()),
            Route::MyBookings => {
                self.my_bookings = MyBookingsView::default();
                self.load_my_bookings();
            }
            Route::Admin => {
                self.admin = AdminView::default();
                self.load_admin();
            }
        }
    }

    fn load_my_bookings(&mut self) {
        self.my_bookings.loading = true;
        let mut view = self.my_bookings.clone();
        self.spawn_view(move |api| async move {
            view.load(api.as_ref()).await;
            Reply::MyBookings(view)
        });
    }

    fn load_admin(&mut self) {
        self.admin.mark_loading();
        let mut view = self.admin.clone();
        self.spawn_view(move |api| async move {
            view.load(api.as_ref()).await;
            Reply::Admin(view)
        });
    }

    /// Carry out a view's outcome
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Stay => {}
            Outcome::Navigate { route, notice } => {
                self.navigate(route);
                self.notice = notice;
            }
            Outcome::Book(train) => {
                self.pending_train = Some(train);
                self.navigate(Route::Book);
            }
            Outcome::LoggedIn => {
                // Keep the form disabled until the profile is known
                self.login.loading = true;
                self.busy = true;
                self.check_session(Route::Home);
            }
        }
    }

    /// Log out and show the login view
    pub fn logout(&mut self) {
        self.session_generation += 1;
        self.session.logout();
        self.navigate(Route::Login);
    }

    /// Expire transient messages
    pub fn tick(&mut self, now: Instant) {
        self.my_bookings.tick(now);
        self.admin.tick(now);
    }

    /// Confirmation prompt of the current view, if one is waiting for an answer
    pub fn pending_prompt(&self) -> Option<&str> {
        if self.busy {
            return None;
        }
        match self.route? {
            Route::MyBookings => self.my_bookings.confirm.as_ref().map(|c| c.prompt.as_str()),
            Route::Admin => self.admin.pending_prompt(),
            _ => None,
        }
    }

    fn resolve_prompt(&mut self, accepted: bool) {
        let now = Instant::now();
        match self.route {
            Some(Route::MyBookings) => {
                let mut view = self.my_bookings.clone();
                self.spawn_view(move |api| async move {
                    view.resolve_confirmation(api.as_ref(), accepted, now).await;
                    Reply::MyBookings(view)
                });
            }
            Some(Route::Admin) => {
                let mut view = self.admin.clone();
                self.spawn_view(move |api| async move {
                    view.resolve_confirmation(api.as_ref(), accepted, now).await;
                    Reply::Admin(view)
                });
            }
            _ => {}
        }
    }

    /// Handle keyboard input. Never waits on the backend.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::F(10) || (ctrl && key.code == KeyCode::Char('c')) {
            self.should_quit = true;
            return;
        }

        let Some(route) = self.route else {
            return;
        };

        if self.pending_prompt().is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.resolve_prompt(true)
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.resolve_prompt(false)
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::F(1) => return self.navigate(Route::Home),
            KeyCode::F(2) => return self.navigate(Route::Search),
            KeyCode::F(3) => return self.navigate(Route::MyBookings),
            KeyCode::F(4) => return self.navigate(Route::Admin),
            KeyCode::F(5) => return self.navigate(Route::Login),
            KeyCode::F(6) => return self.navigate(Route::Register),
            KeyCode::F(9) if self.session.state().is_authenticated() => return self.logout(),
            _ => {}
        }

        if self.busy {
            return;
        }

        let outcome = match route {
            Route::Login => {
                if key.code == KeyCode::Enter {
                    self.login.loading = true;
                    let mut view = self.login.clone();
                    let storage = self.storage.clone();
                    self.spawn_view(move |api| async move {
                        let outcome = view.submit(api.as_ref(), storage.as_ref()).await;
                        Reply::Login(view, outcome)
                    });
                } else {
                    edit_form(&mut self.login.form, key);
                }
                Outcome::Stay
            }
            Route::Register => {
                if key.code == KeyCode::Enter {
                    self.register.loading = true;
                    let mut view = self.register.clone();
                    self.spawn_view(move |api| async move {
                        let outcome = view.submit(api.as_ref()).await;
                        Reply::Register(view, outcome)
                    });
                } else {
                    edit_form(&mut self.register.form, key);
                }
                Outcome::Stay
            }
            Route::Home => Outcome::Stay,
            Route::Search => match key.code {
                KeyCode::Enter => {
                    self.search.loading = true;
                    let mut view = self.search.clone();
                    self.spawn_view(move |api| async move {
                        view.search(api.as_ref()).await;
                        Reply::Search(view)
                    });
                    Outcome::Stay
                }
                KeyCode::Up => {
                    self.search.select(false);
                    Outcome::Stay
                }
                KeyCode::Down => {
                    self.search.select(true);
                    Outcome::Stay
                }
                KeyCode::Char('b') => self.search.book_selected(),
                _ => {
                    edit_form(&mut self.search.form, key);
                    Outcome::Stay
                }
            },
            Route::Book => match key.code {
                KeyCode::Enter => {
                    self.booking.loading = true;
                    let mut view = self.booking.clone();
                    let today = today();
                    self.spawn_view(move |api| async move {
                        let outcome = view.submit(api.as_ref(), today).await;
                        Reply::Booking(view, outcome)
                    });
                    Outcome::Stay
                }
                KeyCode::Esc => self.booking.cancel(),
                _ => {
                    edit_form(&mut self.booking.form, key);
                    Outcome::Stay
                }
            },
            Route::MyBookings => {
                match key.code {
                    KeyCode::Up => self.my_bookings.select(false),
                    KeyCode::Down => self.my_bookings.select(true),
                    KeyCode::Char('c') => self.my_bookings.request_cancel(),
                    KeyCode::Char('r') => self.load_my_bookings(),
                    _ => {}
                }
                Outcome::Stay
            }
            Route::Admin => {
                self.handle_admin_key(key);
                Outcome::Stay
            }
        };

        self.apply(outcome);
    }

    fn handle_admin_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::PageDown | KeyCode::PageUp => {
                self.admin.cycle_tab(key.code == KeyCode::PageDown);
                return self.load_admin();
            }
            KeyCode::Up => return self.admin.select(false),
            KeyCode::Down => return self.admin.select(true),
            KeyCode::Char('r') if ctrl => return self.load_admin(),
            _ => {}
        }

        if key.code == KeyCode::Enter
            && matches!(self.admin.tab, AdminTab::Locations | AdminTab::Trains)
        {
            let mut view = self.admin.clone();
            let now = Instant::now();
            self.spawn_view(move |api| async move {
                match view.tab {
                    AdminTab::Locations => view.locations.submit(api.as_ref(), now).await,
                    _ => view.trains.submit(api.as_ref(), now).await,
                }
                Reply::Admin(view)
            });
            return;
        }

        let form = match self.admin.tab {
            AdminTab::Locations => {
                let view = &mut self.admin.locations;
                match key.code {
                    KeyCode::Esc => return view.cancel_edit(),
                    KeyCode::Char('e') if ctrl => return view.begin_edit(),
                    KeyCode::Char('d') if ctrl => return view.request_delete(),
                    _ => &mut view.form,
                }
            }
            AdminTab::Trains => {
                let view = &mut self.admin.trains;
                match key.code {
                    KeyCode::Esc => return view.cancel_edit(),
                    KeyCode::Char('e') if ctrl => return view.begin_edit(),
                    KeyCode::Char('d') if ctrl => return view.request_delete(),
                    _ => &mut view.form,
                }
            }
            AdminTab::Bookings | AdminTab::Users => return,
        };
        edit_form(form, key);
    }
}

/// Apply an editing key to a form; returns whether it was consumed
fn edit_form(form: &mut FormState, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left => form.cycle(false),
        KeyCode::Right => form.cycle(true),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.input(c),
        _ => return false,
    }
    true
}

/// TUI Application
pub struct TuiApp {
    /// View state
    state: AppState,
    /// Terminal
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TuiApp {
    /// Create a new TUI application
    pub fn new(api: Arc<dyn BookingApi>, storage: Arc<dyn LocalStorage>) -> Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            state: AppState::new(api, storage),
            terminal,
        })
    }

    /// Run the TUI event loop starting at `path`
    ///
    /// Replies from backend tasks are applied between frames, so loading
    /// states are drawn and keys keep working while requests are in flight.
    pub async fn run(&mut self, path: &str) -> Result<()> {
        self.state.start(path);
        info!(path, "tui started");

        loop {
            self.state.drain();
            self.state.tick(Instant::now());
            self.terminal
                .draw(|frame| screens::draw(frame, &self.state))?;

            // Short poll; the runtime's worker threads drive the requests
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.state.handle_key(key);
                    }
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
