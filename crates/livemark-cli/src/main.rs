mod motion;
mod view;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use livemark_config::Config;
use livemark_engine::{
    Change, Key, LinkActivation, LinkWidget, LivePreview, Mode, Modifiers, WidgetEvent,
    find_wiki_links,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    cell::RefCell,
    env, fs,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
    rc::Rc,
};
use view::View;

const SCROLL_STEP: usize = 3;

#[derive(Debug, PartialEq)]
struct Options {
    path: PathBuf,
    preview: bool,
    caret: usize,
    dump: bool,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut path = None;
        let mut preview = false;
        let mut caret = 0;
        let mut dump = false;
        let mut args = args.iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--preview" => preview = true,
                "--dump" => dump = true,
                "--caret" => {
                    let value = args.next().ok_or("--caret needs a byte offset")?;
                    caret = value
                        .parse()
                        .map_err(|_| format!("Invalid caret offset '{value}'"))?;
                }
                flag if flag.starts_with("--") => return Err(format!("Unknown option '{flag}'")),
                file if path.is_none() => path = Some(PathBuf::from(file)),
                extra => return Err(format!("Unexpected argument '{extra}'")),
            }
        }
        let path = path.ok_or("No markdown file provided")?;
        Ok(Self {
            path,
            preview,
            caret,
            dump,
        })
    }
}

struct App {
    path: PathBuf,
    preview: LivePreview,
    view: View,
    area: Rect,
    scroll: usize,
    follow_caret: bool,
    opened: Rc<RefCell<Option<LinkActivation>>>,
    status: String,
}

impl App {
    fn new(path: PathBuf, preview: LivePreview) -> Self {
        let opened = Rc::new(RefCell::new(None));
        let sink = opened.clone();
        preview.set_link_handler(move |activation| {
            *sink.borrow_mut() = Some(activation.clone());
        });
        let mut app = Self {
            path,
            preview,
            view: View::default(),
            area: Rect::default(),
            scroll: 0,
            follow_caret: true,
            opened,
            status: String::new(),
        };
        app.refresh();
        app
    }

    fn refresh(&mut self) {
        self.view = View::build(
            self.preview.text(),
            self.preview.decorations(),
            self.preview.caret(),
        );
    }

    fn move_caret(&mut self, caret: usize) {
        self.preview.apply([Change::Selection(caret)]);
        self.follow_caret = true;
    }

    /// Returns `false` when the viewer should quit.
    fn on_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Tab => {
                let mode = self.preview.mode().toggled();
                self.preview.set_mode(mode);
                self.status = format!("{mode} mode");
            }
            KeyCode::Enter => self.activate_widget(Key::Enter, modifiers(key.modifiers)),
            KeyCode::Char(' ') => self.activate_widget(Key::Space, modifiers(key.modifiers)),
            KeyCode::Char('o') => self.open_link_under_caret(),
            code => {
                if let Some(caret) = caret_motion(code, self.preview.text(), self.preview.caret()) {
                    self.move_caret(caret);
                }
            }
        }
        self.refresh();
        true
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(offset) = self.offset_at(mouse.column, mouse.row) else {
                    return;
                };
                let outcome = self.preview.click(offset, modifiers(mouse.modifiers));
                if !outcome.intercepted() {
                    self.move_caret(offset);
                }
            }
            MouseEventKind::ScrollDown => {
                let max = self.view.rows.len().saturating_sub(1);
                self.scroll = (self.scroll + SCROLL_STEP).min(max);
                self.follow_caret = false;
            }
            MouseEventKind::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(SCROLL_STEP);
                self.follow_caret = false;
            }
            _ => return,
        }
        self.refresh();
    }

    fn offset_at(&self, column: u16, row: u16) -> Option<usize> {
        if !self.area.contains(Position::new(column, row)) {
            return None;
        }
        let index = self.scroll + usize::from(row - self.area.y);
        self.view
            .rows
            .get(index)
            .map(|r| r.offset_at(usize::from(column - self.area.x)))
    }

    fn activate_widget(&mut self, key: Key, modifiers: Modifiers) {
        let caret = self.preview.caret();
        let event = WidgetEvent::key(key, modifiers);
        if !self.preview.dispatch(caret, &event).intercepted() {
            self.status = "No link widget at the caret (o opens the link under it)".to_string();
        }
    }

    /// Opens the wiki link containing the caret, even while its source is revealed.
    fn open_link_under_caret(&mut self) {
        let caret = self.preview.caret();
        let found = find_wiki_links(self.preview.text())
            .into_iter()
            .find(|link| link.span.start <= caret && caret <= link.span.end);
        match found {
            Some(link) => {
                let activation = LinkWidget::from(&link).activation();
                self.preview.navigation().activate(&activation);
            }
            None => self.status = "No wiki link under the caret".to_string(),
        }
    }

    /// Follows a navigation request to `<target>.md` next to the current file.
    fn follow_link(&mut self) {
        let Some(activation) = self.opened.borrow_mut().take() else {
            return;
        };
        let path = self.path.with_file_name(format!("{}.md", activation.target));
        match fs::read_to_string(&path) {
            Ok(text) => {
                log::info!("Opening {}", path.display());
                let caret = activation
                    .heading
                    .as_deref()
                    .and_then(|heading| motion::heading_line(&text, heading))
                    .unwrap_or(0);
                self.preview.apply([Change::Text(text), Change::Selection(caret)]);
                self.path = path;
                self.scroll = 0;
                self.follow_caret = true;
                self.status = describe(&activation);
            }
            Err(e) => {
                log::warn!("Could not open {}: {e}", path.display());
                self.status = format!("{} (no file {})", describe(&activation), path.display());
            }
        }
        self.refresh();
    }

    /// Lays out against the content area, keeping the caret in view and the
    /// engine's viewport in step with what is on screen.
    fn fit(&mut self, area: Rect) {
        self.area = area;
        let height = usize::from(area.height);
        if self.follow_caret && height > 0 {
            let row = self.view.caret_row(self.preview.caret());
            if row < self.scroll {
                self.scroll = row;
            } else if row >= self.scroll + height {
                self.scroll = row + 1 - height;
            }
        }
        if let Some(visible) = self.view.visible(self.scroll, height.max(1))
            && self.preview.apply([Change::Viewport(visible)])
        {
            self.refresh();
        }
    }
}

fn describe(activation: &LinkActivation) -> String {
    match &activation.heading {
        Some(heading) => format!("Opened {}#{}", activation.target, heading),
        None => format!("Opened {}", activation.target),
    }
}

fn modifiers(held: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: held.contains(KeyModifiers::CONTROL),
        meta: held.intersects(KeyModifiers::SUPER | KeyModifiers::META),
        shift: held.contains(KeyModifiers::SHIFT),
        alt: held.contains(KeyModifiers::ALT),
    }
}

fn caret_motion(code: KeyCode, text: &str, caret: usize) -> Option<usize> {
    let target = match code {
        KeyCode::Left | KeyCode::Char('h') => motion::prev_char(text, caret),
        KeyCode::Right | KeyCode::Char('l') => motion::next_char(text, caret),
        KeyCode::Up | KeyCode::Char('k') => motion::line_up(text, caret),
        KeyCode::Down | KeyCode::Char('j') => motion::line_down(text, caret),
        KeyCode::Home => motion::line_start(text, caret),
        KeyCode::End => motion::line_end(text, caret),
        _ => return None,
    };
    Some(target)
}

fn usage(program: &str) -> String {
    format!("Usage: {program} [--preview] [--caret <offset>] [--dump] <file.md>")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("livemark-cli", String::as_str);
    let options = match Options::parse(args.get(1..).unwrap_or_default()) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", usage(program));
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    let mut settings = config.preview_settings();
    if options.preview {
        settings.mode = Mode::Preview;
    }

    let text = fs::read_to_string(&options.path)
        .with_context(|| format!("Failed to read '{}'", options.path.display()))?;
    let mut preview = LivePreview::new(text, settings);
    preview.apply([Change::Selection(options.caret)]);

    if options.dump {
        print!("{}", preview.decorations().set().dump(preview.text()));
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(options.path, preview);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !app.on_key(key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => app.on_mouse(mouse),
            _ => {}
        }
        app.follow_link();
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let title = format!(
        "{} ({})",
        app.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        app.preview.mode()
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    app.fit(block.inner(chunks[0]));

    let scroll = u16::try_from(app.scroll).unwrap_or(u16::MAX);
    let content = Paragraph::new(app.view.lines.clone())
        .block(block)
        .scroll((scroll, 0));
    f.render_widget(content, chunks[0]);

    let mut help = vec![
        Span::styled(
            format!(" {} ", app.preview.mode()),
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        Span::raw(format!(" @{} | ", app.preview.caret())),
    ];
    if !app.status.is_empty() {
        help.push(Span::raw(format!("{} | ", app.status)));
    }
    help.push(Span::raw(
        "q: Quit | Tab: Mode | ←↑↓→/hjkl: Move | Enter/Space: Activate | o: Open link",
    ));
    f.render_widget(Paragraph::new(Line::from(help)), chunks[1]);
}
