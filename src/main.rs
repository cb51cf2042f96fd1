use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use indoc::indoc;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};

use panel_layout::config::LayoutConfig;
use panel_layout::event_loop::{ControlFlow, CrosstermSource, EventLoop};
use panel_layout::layout::{DockSlot, PositionOptions, TargetRect, fitted_position};
use panel_layout::preview::render_layout;
use panel_layout::tracing_sub::{self, LogBuffer};
use panel_layout::window::{Owner, WindowEvent, WindowId, WindowManager, WindowOptions};

const HELP: &str = indoc! {"
    1/2/3 static/left/right  n detached  c child  m menu
    arrows drag  p pin  x close  r reopen  tab raise  e unload extensions  q quit
"};

const DRAG_STEP: f64 = 20.0;
const MENU_SIZE: (f64, f64) = (240.0, 160.0);
const NOTES: &str = "notes";
const TOOLS: &str = "tools";

#[derive(Parser, Debug)]
#[command(
    name = "panel-layout",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interactive preview of docked and floating panel layout"
)]
struct Cli {
    /// Width of the virtual viewport in pixels.
    #[arg(long, value_name = "PX", default_value_t = 1280.0)]
    width: f64,

    /// Height of the virtual viewport in pixels.
    #[arg(long, value_name = "PX", default_value_t = 800.0)]
    height: f64,

    /// JSON layout config. Missing keys keep their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Input poll interval.
    #[arg(long = "poll-ms", value_name = "MS", default_value_t = 16)]
    poll_ms: u64,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    if !(cli.width > 0.0 && cli.height > 0.0) {
        return Err(io::Error::other("viewport width and height must be positive"));
    }
    let config = match &cli.config {
        Some(path) => LayoutConfig::load(path).map_err(io::Error::other)?,
        None => LayoutConfig::default(),
    };

    let logs = LogBuffer::default();
    tracing_sub::init_default(logs.clone());
    let mut app = App::new(config, TargetRect::new(0.0, 0.0, cli.width, cli.height));

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    terminal::enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let mut event_loop = EventLoop::new(CrosstermSource, Duration::from_millis(cli.poll_ms));

    let result = event_loop.run(|event| match event {
        None => {
            terminal.draw(|frame| app.draw(frame, &logs))?;
            Ok(ControlFlow::Continue)
        }
        Some(Event::Key(key)) if key.kind == KeyEventKind::Press => Ok(app.handle_key(key.code)),
        Some(_) => Ok(ControlFlow::Continue),
    });

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelKind {
    Tool,
    Note,
    Child,
    Menu,
}

/// What `r` needs to bring the last closed panel back.
#[derive(Debug, Clone)]
struct Closed {
    id: WindowId,
    slot: DockSlot,
    owner: Owner,
    kind: PanelKind,
}

struct App {
    windows: WindowManager<PanelKind>,
    target: TargetRect,
    last_closed: Rc<RefCell<Option<Closed>>>,
    next_panel: usize,
    status: String,
}

impl App {
    fn new(config: LayoutConfig, target: TargetRect) -> Self {
        let mut windows = WindowManager::with_config(config);
        let last_closed = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&last_closed);
        windows.subscribe(move |_, event| {
            if let WindowEvent::Removed(entry) = event {
                *sink.borrow_mut() = Some(Closed {
                    id: entry.id().clone(),
                    slot: entry.home_slot(),
                    owner: entry.owner().clone(),
                    kind: entry.content,
                });
            }
        });
        Self {
            windows,
            target,
            last_closed,
            next_panel: 0,
            status: String::from("ready"),
        }
    }

    fn top(&self) -> Option<WindowId> {
        self.windows.ids().last().cloned()
    }

    fn handle_key(&mut self, code: KeyCode) -> ControlFlow {
        match code {
            KeyCode::Char('q') => return ControlFlow::Quit,
            KeyCode::Char('1') => self.open_docked("static", DockSlot::Static),
            KeyCode::Char('2') => self.open_docked("left", DockSlot::DynamicLeft),
            KeyCode::Char('3') => self.open_docked("right", DockSlot::DynamicRight),
            KeyCode::Char('n') => self.open_note(),
            KeyCode::Char('c') => self.open_child(),
            KeyCode::Char('m') => self.open_menu(),
            KeyCode::Left => self.drag(-DRAG_STEP, 0.0),
            KeyCode::Right => self.drag(DRAG_STEP, 0.0),
            KeyCode::Up => self.drag(0.0, -DRAG_STEP),
            KeyCode::Down => self.drag(0.0, DRAG_STEP),
            KeyCode::Char('p') => {
                if let Some(id) = self.top() {
                    self.windows.pin(id.as_str());
                    self.status = format!("pinned {id}");
                }
            }
            KeyCode::Char('x') => {
                if let Some(id) = self.top() {
                    self.windows.remove(id.as_str());
                    self.status = format!("closed {id}");
                }
            }
            KeyCode::Char('r') => self.reopen(),
            KeyCode::Tab => {
                if let Some(id) = self.windows.ids().first().cloned() {
                    self.windows.bring_to_front(id.as_str());
                }
            }
            KeyCode::Char('e') => {
                let removed: usize = [NOTES, TOOLS]
                    .into_iter()
                    .map(|name| self.windows.remove_owner(&Owner::extension(name)))
                    .sum();
                self.status = format!("unloaded {removed} extension panels");
            }
            _ => {}
        }
        ControlFlow::Continue
    }

    fn open(&mut self, options: WindowOptions<PanelKind>, owner: Owner) {
        self.status = match self.windows.add(options, owner) {
            Ok(id) => format!("opened {id}"),
            Err(err) => {
                tracing::warn!(error = %err, "could not open panel");
                err.to_string()
            }
        };
    }

    fn open_docked(&mut self, id: &str, slot: DockSlot) {
        self.open(
            WindowOptions::new(PanelKind::Tool).id(id).slot(slot),
            Owner::Host,
        );
    }

    fn open_note(&mut self) {
        let n = self.next_panel;
        self.next_panel += 1;
        let step = (n % 8) as f64 * 40.0;
        let position = PositionOptions::new().left(240.0 + step).top(120.0 + step);
        self.open(
            WindowOptions::new(PanelKind::Note)
                .id(format!("note-{n}"))
                .position(position),
            Owner::extension(NOTES),
        );
    }

    fn open_child(&mut self) {
        let Some(parent) = self.top() else {
            self.status = String::from("no panel to attach a child to");
            return;
        };
        let n = self.next_panel;
        self.next_panel += 1;
        self.open(
            WindowOptions::new(PanelKind::Child)
                .id(format!("child-{n}"))
                .parent(parent)
                .target(self.target),
            Owner::extension(TOOLS),
        );
    }

    fn open_menu(&mut self) {
        self.windows.remove("menu");
        let (width, height) = MENU_SIZE;
        let position = fitted_position(
            self.target.width / 2.0,
            self.target.height / 2.0,
            width,
            height,
            Some(&self.target),
        );
        self.open(
            WindowOptions::new(PanelKind::Menu).id("menu").position(position),
            Owner::extension(TOOLS),
        );
    }

    fn drag(&mut self, dx: f64, dy: f64) {
        if let Some(id) = self.top() {
            self.windows.move_by(id.as_str(), dx, dy, Some(&self.target));
        }
    }

    fn reopen(&mut self) {
        let Some(closed) = self.last_closed.borrow_mut().take() else {
            self.status = String::from("nothing to reopen");
            return;
        };
        self.open(
            WindowOptions::new(closed.kind)
                .id(closed.id)
                .slot(closed.slot),
            closed.owner,
        );
    }

    fn draw(&self, frame: &mut Frame, logs: &LogBuffer) {
        let [canvas, footer] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(6)]).areas(frame.area());
        render_layout(&self.windows, &self.target, canvas, frame.buffer_mut());

        let top = self
            .top()
            .and_then(|id| self.windows.get(id.as_str()).map(|entry| entry.content));
        let mut lines: Vec<Line> = HELP.lines().map(Line::from).collect();
        lines.push(Line::from(format!("{} | top: {top:?}", self.status)));
        lines.extend(logs.tail(2).into_iter().map(Line::from));
        frame.render_widget(Paragraph::new(lines), footer);
    }
}
