use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap,
};
use ratatui::{Frame, Terminal};
use tokio::runtime::{Handle, Runtime};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use villa_core::chat::{Sender as Author, QUICK_OPTIONS};
use villa_core::compare::{CellValue, ToggleOutcome, COMPARE_CAPACITY};
use villa_core::lead::LeadForm;
use villa_core::price::format_lakhs;
use villa_core::router::{Navigation, View};
use villa_core::site::SiteState;
use villa_core::types::{BlogItem, Property};

use crate::error::CliResult;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Property(Property),
    Blog(BlogItem),
    SeeMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    None,
    Compare,
    Chat,
    Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeadField {
    Name,
    Phone,
    Interest,
}

impl LeadField {
    fn next(self) -> Self {
        match self {
            LeadField::Name => LeadField::Phone,
            LeadField::Phone => LeadField::Interest,
            LeadField::Interest => LeadField::Name,
        }
    }
}

struct AppState {
    site: SiteState,
    cursor: usize,
    overlay: Overlay,
    chat_input: String,
    quick_option: usize,
    location_input: String,
    lead_form: LeadForm,
    lead_field: LeadField,
    status: String,
    notice: Option<String>,
    replies_tx: Sender<String>,
    replies_rx: Receiver<String>,
}

impl AppState {
    fn new(site: SiteState) -> Self {
        let (replies_tx, replies_rx) = mpsc::channel();
        Self {
            site,
            cursor: 0,
            overlay: Overlay::None,
            chat_input: String::new(),
            quick_option: 0,
            location_input: String::new(),
            lead_form: LeadForm::default(),
            lead_field: LeadField::Name,
            status: "Ready".to_string(),
            notice: None,
            replies_tx,
            replies_rx,
        }
    }

    fn navigated(&mut self, navigation: Navigation) {
        match navigation {
            Navigation::ScrollToTop => self.cursor = 0,
        }
        self.status = self.site.view().name().to_string();
    }

    fn drain_replies(&mut self) {
        while let Ok(reply) = self.replies_rx.try_recv() {
            self.site.chat_mut().finish(&reply);
        }
    }
}

pub fn run_tui(runtime: &Runtime, site: SiteState, token: CancellationToken) -> CliResult<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    let mut app = AppState::new(site);

    let res = run_loop(&mut terminal, runtime.handle(), &token, &mut app);
    token.cancel();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Storefront closed with {} leads", app.site.leads().len());
    res
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    handle: &Handle,
    token: &CancellationToken,
    app: &mut AppState,
) -> CliResult<()> {
    loop {
        app.drain_replies();
        if app.site.tick(Instant::now()) {
            debug!("Lead modal changed phase");
        }
        terminal.draw(|frame| render(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(key, handle, token, app) {
                    return Ok(());
                }
            }
        }
    }
}

fn entries(site: &SiteState) -> Vec<Entry> {
    match site.view() {
        View::Home => {
            let home = site.home();
            home.highlighted
                .into_iter()
                .chain(home.popular)
                .map(Entry::Property)
                .chain(home.blogs.into_iter().map(Entry::Blog))
                .chain(std::iter::once(Entry::SeeMore))
                .collect()
        }
        View::Listing => site
            .visible_listing()
            .into_iter()
            .map(Entry::Property)
            .collect(),
        View::PropertyDetail(_) => site.similar().into_iter().map(Entry::Property).collect(),
        View::BlogDetail(_) => Vec::new(),
    }
}

/// Returns true when the user asked to quit.
fn handle_key(
    key: KeyEvent,
    handle: &Handle,
    token: &CancellationToken,
    app: &mut AppState,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return true;
    }
    app.notice = None;
    if app.site.lead_modal().is_open() {
        handle_lead_key(key, app);
        return false;
    }
    match app.overlay {
        Overlay::Chat => handle_chat_key(key, handle, token, app),
        Overlay::Compare => handle_compare_key(key, app),
        Overlay::Location => handle_location_key(key, app),
        Overlay::None => handle_page_key(key, app),
    }
    false
}

fn handle_page_key(key: KeyEvent, app: &mut AppState) {
    let entries = entries(&app.site);
    match key.code {
        KeyCode::Up => app.cursor = app.cursor.saturating_sub(1),
        KeyCode::Down => {
            if app.cursor + 1 < entries.len() {
                app.cursor += 1;
            }
        }
        KeyCode::Enter => {
            let navigation = match entries.get(app.cursor) {
                Some(Entry::Property(p)) => app.site.select_property(&p.id),
                Some(Entry::Blog(b)) => app.site.select_blog(&b.id),
                Some(Entry::SeeMore) => app.site.see_more(),
                None => return,
            };
            app.navigated(navigation);
        }
        KeyCode::Esc | KeyCode::Backspace => {
            let navigation = app.site.back();
            app.navigated(navigation);
        }
        KeyCode::Char('c') => toggle_compare(app, &entries),
        KeyCode::Char('C') => {
            app.site.open_compare();
            app.overlay = Overlay::Compare;
        }
        KeyCode::Char('h') => app.overlay = Overlay::Chat,
        KeyCode::Char('l') => app.site.lead_modal_mut().open(),
        KeyCode::Char(ch) if *app.site.view() == View::Listing => handle_filter_key(ch, app),
        _ => {}
    }
}

fn handle_filter_key(ch: char, app: &mut AppState) {
    let query = app.site.listing_mut();
    match ch {
        't' => query.filter.property_type = query.filter.property_type.next(),
        's' => query.sort = query.sort.next(),
        '+' | '=' => query.raise_max_price(),
        '-' => query.lower_max_price(),
        'r' => query.reset(),
        '/' => {
            app.location_input = query.filter.location.clone();
            app.overlay = Overlay::Location;
            return;
        }
        _ => return,
    }
    app.cursor = 0;
}

fn toggle_compare(app: &mut AppState, entries: &[Entry]) {
    let id = match app.site.view() {
        View::PropertyDetail(id) => Some(id.clone()),
        _ => match entries.get(app.cursor) {
            Some(Entry::Property(p)) => Some(p.id.clone()),
            _ => None,
        },
    };
    let Some(id) = id else {
        return;
    };
    let outcome = app.site.toggle_compare(&id);
    app.notice = outcome.notice().map(str::to_string);
    app.status = match outcome {
        ToggleOutcome::Added => format!("Added {id} to compare"),
        ToggleOutcome::Removed => format!("Removed {id} from compare"),
        ToggleOutcome::Rejected => "Compare set is full".to_string(),
    };
}

fn handle_compare_key(key: KeyEvent, app: &mut AppState) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('C') => {
            app.site.close_compare();
            app.overlay = Overlay::None;
        }
        KeyCode::Char('f') => {
            let next = app.site.compare_category().next();
            app.site.set_compare_category(next);
        }
        KeyCode::Char('x') => app.site.clear_compare(),
        KeyCode::Char(digit @ '1'..='3') => {
            let idx = digit as usize - '1' as usize;
            let id = app.site.compare_selection().ids().get(idx).cloned();
            if let Some(id) = id {
                app.site.remove_compare(&id);
            }
        }
        _ => {}
    }
}

fn send_chat(app: &mut AppState, handle: &Handle, token: &CancellationToken, text: &str) {
    let Some(pending) = app.site.chat_mut().begin(text) else {
        return;
    };
    let tx = app.replies_tx.clone();
    let token = token.clone();
    handle.spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            reply = pending.resolve() => {
                // The receiver is gone only after the storefront closed.
                let _ = tx.send(reply);
            }
        }
    });
}

fn handle_chat_key(key: KeyEvent, handle: &Handle, token: &CancellationToken, app: &mut AppState) {
    match key.code {
        KeyCode::Esc => app.overlay = Overlay::None,
        KeyCode::Tab => app.quick_option = (app.quick_option + 1) % QUICK_OPTIONS.len(),
        KeyCode::Enter => {
            let text = if app.chat_input.trim().is_empty()
                && app.site.chat().transcript().quick_options_visible()
            {
                QUICK_OPTIONS[app.quick_option].to_string()
            } else {
                std::mem::take(&mut app.chat_input)
            };
            send_chat(app, handle, token, &text);
        }
        KeyCode::Backspace => {
            app.chat_input.pop();
        }
        KeyCode::Char(ch) => app.chat_input.push(ch),
        _ => {}
    }
}

fn handle_location_key(key: KeyEvent, app: &mut AppState) {
    match key.code {
        KeyCode::Esc => app.overlay = Overlay::None,
        KeyCode::Enter => {
            app.site.listing_mut().filter.location = app.location_input.trim().to_string();
            app.overlay = Overlay::None;
            app.cursor = 0;
        }
        KeyCode::Backspace => {
            app.location_input.pop();
        }
        KeyCode::Char(ch) => app.location_input.push(ch),
        _ => {}
    }
}

fn handle_lead_key(key: KeyEvent, app: &mut AppState) {
    if key.code == KeyCode::Esc {
        app.site.lead_modal_mut().close();
        return;
    }
    if app.site.lead_modal().is_submitted() {
        return;
    }
    match (key.code, app.lead_field) {
        (KeyCode::Tab, _) => app.lead_field = app.lead_field.next(),
        (KeyCode::Enter, _) => {
            match app.site.submit_lead(app.lead_form.clone(), Instant::now()) {
                Ok(lead) => {
                    app.status = format!("Enquiry {} received", lead.id);
                    app.lead_form = LeadForm::default();
                    app.lead_field = LeadField::Name;
                }
                Err(err) => app.notice = Some(err.to_string()),
            }
        }
        (KeyCode::Left | KeyCode::Right | KeyCode::Char(' '), LeadField::Interest) => {
            app.lead_form.interest = app.lead_form.interest.next();
        }
        (KeyCode::Backspace, LeadField::Name) => {
            app.lead_form.name.pop();
        }
        (KeyCode::Backspace, LeadField::Phone) => {
            app.lead_form.phone.pop();
        }
        (KeyCode::Char(ch), LeadField::Name) => app.lead_form.name.push(ch),
        (KeyCode::Char(ch), LeadField::Phone) => app.lead_form.phone.push(ch),
        _ => {}
    }
}

fn entry_label(entry: &Entry, site: &SiteState) -> String {
    match entry {
        Entry::Property(p) => {
            let mark = if site.is_compared(&p.id) { "[x]" } else { "[ ]" };
            format!(
                "{mark} {} | {} | {} | {}",
                p.title, p.location, p.price, p.property_type
            )
        }
        Entry::Blog(b) => format!("    Blog: {} ({})", b.title, b.date),
        Entry::SeeMore => "    See more properties".to_string(),
    }
}

fn render(frame: &mut Frame, app: &AppState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = format!(
        "{} | {} | Compare {}/{}",
        app.site.config().brand,
        app.site.view().name(),
        app.site.compare_selection().len(),
        COMPARE_CAPACITY
    );
    let header_block = Paragraph::new(header)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header_block, layout[0]);

    match app.site.view() {
        View::Home => render_home(frame, layout[1], app),
        View::Listing => render_listing(frame, layout[1], app),
        View::PropertyDetail(_) => render_property(frame, layout[1], app),
        View::BlogDetail(_) => render_blog(frame, layout[1], app),
    }

    render_status(frame, layout[2], app);

    if app.site.lead_modal().is_open() {
        render_lead(frame, app);
        return;
    }
    match app.overlay {
        Overlay::Compare => render_compare(frame, app),
        Overlay::Chat => render_chat(frame, app),
        Overlay::Location => render_location(frame, app),
        Overlay::None => {}
    }
}

fn render_entries(frame: &mut Frame, area: Rect, title: &str, app: &AppState) {
    let entries = entries(&app.site);
    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| ListItem::new(entry_label(entry, &app.site)))
        .collect();
    let selected = if entries.is_empty() {
        None
    } else {
        Some(app.cursor.min(entries.len() - 1))
    };
    let mut state = ListState::default().with_selected(selected);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_home(frame: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);
    let hero = app
        .site
        .catalog()
        .hero_slides
        .first()
        .map(|slide| format!("{}\n{}", slide.title, slide.subtitle))
        .unwrap_or_default();
    let hero_block = Paragraph::new(hero)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(hero_block, chunks[0]);
    render_entries(frame, chunks[1], "Highlighted, popular and blogs", app);
}

fn render_listing(frame: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);
    let query = app.site.listing();
    let location = if query.filter.location.is_empty() {
        "any"
    } else {
        query.filter.location.as_str()
    };
    let filters = format!(
        "Type: {} | Max price: {} | Location: {location} | Sort: {}",
        query.filter.property_type,
        format_lakhs(query.filter.max_price),
        query.sort
    );
    let filter_block = Paragraph::new(filters).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Filters (t type, s sort, +/- price, / location, r reset)"),
    );
    frame.render_widget(filter_block, chunks[0]);
    render_entries(frame, chunks[1], "Properties", app);
}

fn render_property(frame: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(5)])
        .split(area);
    let text = match app.site.current_property() {
        Ok(Some(p)) => {
            let mut lines = vec![
                format!("{} ({})", p.title, p.property_type),
                format!("Location: {}", p.location),
                format!("Price: {}", p.price),
            ];
            if let Some(size) = &p.size {
                lines.push(format!("Size: {size}"));
            }
            if let Some(bed_bath) = &p.bed_bath {
                lines.push(format!("Configuration: {bed_bath}"));
            }
            lines.push(format!("Status: {}", p.status.as_deref().unwrap_or("For Sale")));
            if !p.amenities.is_empty() {
                lines.push(format!("Amenities: {}", p.amenities.join(", ")));
            }
            lines.push(format!("Gallery: {} image(s)", p.gallery().len()));
            if let Some(video) = &p.video_url {
                lines.push(format!("Video: {video}"));
            }
            if let Some(description) = &p.description {
                lines.push(String::new());
                lines.push(description.clone());
            }
            lines.join("\n")
        }
        Ok(None) => String::new(),
        Err(err) => err.to_string(),
    };
    let detail = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Property (c compare)"))
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, chunks[0]);
    render_entries(frame, chunks[1], "Similar properties", app);
}

/// Drops markup, turning block-level tags into line breaks.
fn strip_tags(html: &str) -> String {
    let mut out = String::new();
    let mut tag = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name = tag.trim_start_matches('/');
                if ["p", "h", "br", "li"].iter().any(|t| name.starts_with(t)) {
                    out.push('\n');
                }
            }
            _ if in_tag => tag.push(ch),
            _ => out.push(ch),
        }
    }
    out.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_blog(frame: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.site.current_blog() {
        Ok(Some(blog)) => {
            let body = blog
                .content
                .as_deref()
                .map(strip_tags)
                .unwrap_or_else(|| blog.excerpt.clone());
            format!("{}\n{}\n\n{body}", blog.title, blog.date)
        }
        Ok(None) => String::new(),
        Err(err) => err.to_string(),
    };
    let block = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Blog"))
        .wrap(Wrap { trim: false });
    frame.render_widget(block, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &AppState) {
    let (text, style) = match &app.notice {
        Some(notice) => (notice.clone(), Style::default().add_modifier(Modifier::BOLD)),
        None => (
            format!(
                "{} | Enter open, Esc back, c compare, C table, h chat, l enquire, Ctrl+Q quit",
                app.status
            ),
            Style::default(),
        ),
    };
    let block = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(block, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn render_compare(frame: &mut Frame, app: &AppState) {
    let area = centered_rect(90, 70, frame.area());
    frame.render_widget(Clear, area);
    let title = format!(
        "Compare: {} (f category, 1-3 remove, x clear, Esc close)",
        app.site.compare_category()
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    let table = app.site.comparison();
    if table.properties.is_empty() {
        let empty = Paragraph::new("Nothing to compare. Press c on a property to add it.")
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(
        std::iter::once(String::new())
            .chain(table.properties.iter().map(|p| p.title.clone()))
            .collect::<Vec<String>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|row| {
            let cells = row.cells.iter().map(|cell| match cell {
                CellValue::Text(text) => text.clone(),
                CellValue::List(items) => items.join(", "),
            });
            Row::new(std::iter::once(row.label.clone()).chain(cells).collect::<Vec<String>>())
        })
        .collect();
    let column = 100 / table.properties.len() as u16;
    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(14))
        .chain(table.properties.iter().map(|_| Constraint::Percentage(column)))
        .collect();
    let widget = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(widget, area);
}

fn render_chat(frame: &mut Frame, app: &AppState) {
    let area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, area);
    let transcript = app.site.chat().transcript();
    let mut lines: Vec<Line> = transcript
        .messages()
        .iter()
        .map(|m| {
            let who = match m.sender {
                Author::Bot => "Bot",
                Author::User => "You",
            };
            Line::from(format!("{who} {}: {}", m.time, m.text))
        })
        .collect();
    if transcript.is_typing() {
        lines.push(Line::from("Bot is typing..."));
    }
    if transcript.quick_options_visible() {
        lines.push(Line::from(format!(
            "Quick option (Tab to change, Enter on empty input): {}",
            QUICK_OPTIONS[app.quick_option]
        )));
    }
    lines.push(Line::from(format!("> {}", app.chat_input)));
    let chat = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Chat (Esc close)"))
        .wrap(Wrap { trim: false });
    frame.render_widget(chat, area);
}

fn render_location(frame: &mut Frame, app: &AppState) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);
    let input = Paragraph::new(format!("> {}", app.location_input)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Location contains (Enter apply, Esc cancel)"),
    );
    frame.render_widget(input, area);
}

fn render_lead(frame: &mut Frame, app: &AppState) {
    let area = centered_rect(50, 40, frame.area());
    frame.render_widget(Clear, area);
    let text = if app.site.lead_modal().is_submitted() {
        "Thank You!\nOur expert will contact you shortly.".to_string()
    } else {
        let marker = |field: LeadField| if app.lead_field == field { ">" } else { " " };
        format!(
            "Get the best deals on Plots & Villas.\n\n{} Name: {}\n{} Mobile Number: {}\n{} Interested In: {}",
            marker(LeadField::Name),
            app.lead_form.name,
            marker(LeadField::Phone),
            app.lead_form.phone,
            marker(LeadField::Interest),
            app.lead_form.interest
        )
    };
    let block = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Enquire Now (Tab next field, Enter submit, Esc close)"),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(block, area);
}
