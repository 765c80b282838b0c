use chrono::{Local, NaiveDateTime};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Modifier, Rect, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs, Wrap},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::io;

use crate::db::kv_store::KeyValueStore;
use crate::db::repository::TransactionRepository;
use crate::error::{Result, TrackerError};
use crate::models::category::CategoryConfig;
use crate::models::transaction::{Transaction, TransactionType};
use crate::models::window::TimeWindow;
use crate::operations::aggregate::{
    CategoryTotal, TimeBucket, aggregate_by_bucket, aggregate_by_category, totals_for_categories,
};
use crate::operations::filter::filter_by_window;
use crate::operations::overview::{format_amount, scaled_length, short_id};
use crate::operations::summary::{Summary, summarize};
use crate::settings::AppConfig;

const INCOME_COLOR: Color = Color::Green;
const EXPENSE_COLOR: Color = Color::Red;
const PALETTE: [Color; 7] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::LightRed,
    Color::LightCyan,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Overview,
    Transactions,
    Categories,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Overview, Tab::Transactions, Tab::Categories];

    fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Transactions => "Transactions",
            Tab::Categories => "Categories",
        }
    }

    fn index(self) -> usize {
        match self {
            Tab::Overview => 0,
            Tab::Transactions => 1,
            Tab::Categories => 2,
        }
    }

    fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn previous(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

struct DashboardState {
    tab: Tab,
    window: TimeWindow,
    table_state: TableState,
    status: Option<String>,
}

impl DashboardState {
    fn new(window: TimeWindow) -> Self {
        Self {
            tab: Tab::Overview,
            window,
            table_state: TableState::default(),
            status: None,
        }
    }

    fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let selected = self.table_state.selected().unwrap_or(0).min(len - 1);
        self.table_state.select(Some(selected));
    }

    fn move_selection(&mut self, delta: i32, len: usize) {
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i32;
        let next = (current + delta).clamp(0, len as i32 - 1) as usize;
        self.table_state.select(Some(next));
    }
}

/// Everything one frame shows, derived from the repository for the active window.
struct DashboardData<'a> {
    filtered: Vec<&'a Transaction>,
    summary: Summary,
    buckets: Vec<TimeBucket>,
    income_share: Vec<CategoryTotal>,
    expense_share: Vec<CategoryTotal>,
    income_configured: Vec<CategoryTotal>,
    expense_configured: Vec<CategoryTotal>,
}

impl<'a> DashboardData<'a> {
    fn build(
        transactions: &'a [Transaction],
        window: TimeWindow,
        now: NaiveDateTime,
        categories: &CategoryConfig,
    ) -> Self {
        let filtered = filter_by_window(transactions, window, now);
        let rows = || filtered.iter().copied();
        Self {
            summary: summarize(rows()),
            buckets: aggregate_by_bucket(rows(), window),
            income_share: aggregate_by_category(rows(), TransactionType::Income),
            expense_share: aggregate_by_category(rows(), TransactionType::Expense),
            income_configured: totals_for_categories(
                rows(),
                TransactionType::Income,
                &categories.income,
            ),
            expense_configured: totals_for_categories(
                rows(),
                TransactionType::Expense,
                &categories.expense,
            ),
            filtered,
        }
    }
}

/// Runs the full-screen dashboard until the user quits. Returns the window that
/// was active on exit.
pub fn run_dashboard<S: KeyValueStore>(
    repository: &mut TransactionRepository<S>,
    settings: &AppConfig,
    window: TimeWindow,
) -> Result<TimeWindow> {
    enable_raw_mode().map_err(|e| TrackerError::Terminal(format!("Failed to enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| TrackerError::Terminal(format!("Failed to enter alternate screen: {}", e)))?;

    let mut state = DashboardState::new(window);
    let result = (|| -> Result<()> {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| TrackerError::Terminal(format!("Failed to initialize terminal: {}", e)))?;

        loop {
            let now = Local::now().naive_local();
            {
                let data = DashboardData::build(
                    repository.transactions(),
                    state.window,
                    now,
                    &settings.categories,
                );
                state.clamp_selection(data.filtered.len());
                terminal
                    .draw(|frame| render(frame, &mut state, &data, &settings.currency_symbol))
                    .map_err(|e| TrackerError::Terminal(format!("Failed to draw terminal UI: {}", e)))?;
            }

            if event::poll(std::time::Duration::from_millis(250))
                .map_err(|e| TrackerError::Terminal(format!("Failed to poll input: {}", e)))?
            {
                match event::read()
                    .map_err(|e| TrackerError::Terminal(format!("Failed to read input: {}", e)))?
                {
                    Event::Key(key) => {
                        if handle_key(repository, &mut state, key, now) {
                            break;
                        }
                    }
                    Event::Resize(_, _) => continue,
                    _ => {}
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| TrackerError::Terminal(format!("Failed to disable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| TrackerError::Terminal(format!("Failed to leave alternate screen: {}", e)))?;

    result.map(|_| state.window)
}

/// Applies one key press. Returns `true` when the dashboard should close.
fn handle_key<S: KeyValueStore>(
    repository: &mut TransactionRepository<S>,
    state: &mut DashboardState,
    key: KeyEvent,
    now: NaiveDateTime,
) -> bool {
    // Some terminals report both press and release.
    if key.kind == KeyEventKind::Release {
        return false;
    }

    let visible = filter_by_window(repository.transactions(), state.window, now).len();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Tab | KeyCode::Right => state.tab = state.tab.next(),
        KeyCode::BackTab | KeyCode::Left => state.tab = state.tab.previous(),
        KeyCode::Char('1') => state.tab = Tab::Overview,
        KeyCode::Char('2') => state.tab = Tab::Transactions,
        KeyCode::Char('3') => state.tab = Tab::Categories,
        KeyCode::Char('w') => {
            state.window = state.window.next();
            state.table_state.select(None);
            state.status = Some(format!("Window: {}", state.window.title()));
        }
        KeyCode::Up if state.tab == Tab::Transactions => state.move_selection(-1, visible),
        KeyCode::Down if state.tab == Tab::Transactions => state.move_selection(1, visible),
        KeyCode::Home if state.tab == Tab::Transactions => state.move_selection(i32::MIN / 2, visible),
        KeyCode::End if state.tab == Tab::Transactions => state.move_selection(i32::MAX / 2, visible),
        KeyCode::Char('d') | KeyCode::Delete if state.tab == Tab::Transactions => {
            delete_selected(repository, state, now);
        }
        _ => {}
    }
    false
}

fn delete_selected<S: KeyValueStore>(
    repository: &mut TransactionRepository<S>,
    state: &mut DashboardState,
    now: NaiveDateTime,
) {
    let Some(selected) = state.table_state.selected() else {
        return;
    };
    let id = filter_by_window(repository.transactions(), state.window, now)
        .get(selected)
        .map(|t| t.id.clone());
    if let Some(id) = id {
        if repository.delete(&id) {
            state.status = Some(format!("Deleted {}", short_id(&id)));
        }
    }
    let remaining = filter_by_window(repository.transactions(), state.window, now).len();
    state.clamp_selection(remaining);
}

fn render(frame: &mut ratatui::Frame, state: &mut DashboardState, data: &DashboardData, symbol: &str) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()).collect::<Vec<_>>())
        .select(state.tab.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Daily income - {}", state.window.title())),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, layout[0]);

    match state.tab {
        Tab::Overview => render_overview(frame, layout[1], data, symbol),
        Tab::Transactions => render_transactions(frame, layout[1], state, data, symbol),
        Tab::Categories => render_categories(frame, layout[1], data, symbol),
    }

    render_footer(frame, layout[2], state);
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, state: &DashboardState) {
    let hint = match state.tab {
        Tab::Transactions => "↑/↓ move  d delete  w window  Tab/1-3 switch  q/Esc exit",
        _ => "w window  Tab/1-3 switch  q/Esc exit",
    };
    let mut spans = vec![Span::raw(hint)];
    if let Some(ref status) = state.status {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(status.clone(), Style::default().fg(Color::Yellow)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_overview(frame: &mut ratatui::Frame, area: Rect, data: &DashboardData, symbol: &str) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(12),
        ])
        .split(area);

    render_summary_cards(frame, rows[0], &data.summary, symbol);
    render_bucket_chart(frame, rows[1], &data.buckets);

    let pies = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    render_category_share(frame, pies[0], "Income by category", &data.income_share, symbol);
    render_category_share(frame, pies[1], "Expense by category", &data.expense_share, symbol);
}

fn render_summary_cards(frame: &mut ratatui::Frame, area: Rect, summary: &Summary, symbol: &str) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let balance_color = if summary.balance < Decimal::ZERO {
        EXPENSE_COLOR
    } else {
        INCOME_COLOR
    };
    let values = [
        ("Income", format_amount(symbol, summary.total_income), INCOME_COLOR),
        ("Expense", format_amount(symbol, summary.total_expense), EXPENSE_COLOR),
        ("Balance", format_amount(symbol, summary.balance), balance_color),
        ("Transactions", summary.count.to_string(), Color::White),
    ];
    for ((title, value, color), card) in values.into_iter().zip(cards.iter()) {
        let paragraph = Paragraph::new(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(paragraph, *card);
    }
}

fn render_bucket_chart(frame: &mut ratatui::Frame, area: Rect, buckets: &[TimeBucket]) {
    let block = Block::default()
        .title(Line::from(vec![
            Span::raw("Income "),
            Span::styled("█", Style::default().fg(INCOME_COLOR)),
            Span::raw(" vs expense "),
            Span::styled("█", Style::default().fg(EXPENSE_COLOR)),
        ]))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if buckets.is_empty() {
        frame.render_widget(
            Paragraph::new("No data in this window").alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let bar_height = inner.height.saturating_sub(1) as usize;
    if bar_height == 0 {
        return;
    }
    let bucket_width = std::cmp::max(3, inner.width as usize / buckets.len());
    let column_width = std::cmp::max(1, (bucket_width - 1) / 2);
    let max_total = buckets
        .iter()
        .map(|b| b.income_total.max(b.expense_total))
        .max()
        .unwrap_or(Decimal::ZERO);

    let mut lines: Vec<Line> = Vec::new();
    for row in 0..bar_height {
        let level = bar_height - row;
        let mut spans: Vec<Span> = Vec::new();
        for bucket in buckets {
            for (value, color) in [
                (bucket.income_total, INCOME_COLOR),
                (bucket.expense_total, EXPENSE_COLOR),
            ] {
                if scaled_length(value, max_total, bar_height) >= level {
                    spans.push(Span::styled("█".repeat(column_width), Style::default().fg(color)));
                } else {
                    spans.push(Span::raw(" ".repeat(column_width)));
                }
            }
            spans.push(Span::raw(" ".repeat(bucket_width - 2 * column_width)));
        }
        lines.push(Line::from(spans));
    }

    let mut labels: Vec<Span> = Vec::new();
    for bucket in buckets {
        let label: String = bucket.label.chars().take(bucket_width).collect();
        let padding = bucket_width.saturating_sub(label.chars().count());
        labels.push(Span::raw(format!("{}{}", label, " ".repeat(padding))));
    }
    lines.push(Line::from(labels));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
}

fn render_category_share(
    frame: &mut ratatui::Frame,
    area: Rect,
    title: &str,
    totals: &[CategoryTotal],
    symbol: &str,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let grand_total = totals
        .iter()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.total));
    if grand_total <= Decimal::ZERO {
        frame.render_widget(
            Paragraph::new("No data in this window").alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(inner);

    let total = grand_total.to_f64().unwrap_or(1.0).max(f64::EPSILON);
    let mut slices = Vec::new();
    let mut start_angle = 0.0_f64;
    for (idx, entry) in totals.iter().enumerate() {
        let sweep = entry.total.to_f64().unwrap_or(0.0) / total * std::f64::consts::TAU;
        slices.push((start_angle, start_angle + sweep, PALETTE[idx % PALETTE.len()]));
        start_angle += sweep;
    }

    let canvas = Canvas::default()
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            for (start, end, color) in &slices {
                let mut points = Vec::new();
                let mut r = 0.0;
                while r <= 1.0 {
                    let mut angle = *start;
                    while angle <= *end {
                        points.push((r * angle.cos(), r * angle.sin()));
                        angle += 0.05;
                    }
                    r += 0.04;
                }
                if !points.is_empty() {
                    ctx.draw(&Points {
                        coords: &points,
                        color: *color,
                    });
                }
            }
        });
    frame.render_widget(canvas, halves[0]);

    let legend: Vec<Line> = totals
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let percent = (entry.total / grand_total * Decimal::from(100)).round();
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(PALETTE[idx % PALETTE.len()])),
                Span::raw(format!(
                    "{} {}% ({})",
                    entry.category,
                    percent,
                    format_amount(symbol, entry.total)
                )),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(legend).wrap(Wrap { trim: true }), halves[1]);
}

fn render_transactions(
    frame: &mut ratatui::Frame,
    area: Rect,
    state: &mut DashboardState,
    data: &DashboardData,
    symbol: &str,
) {
    let block = Block::default()
        .title(format!("Transactions ({})", data.filtered.len()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if data.filtered.is_empty() {
        frame.render_widget(
            Paragraph::new("No transactions in this window")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new([
        Cell::from("Date").style(bold),
        Cell::from("Amount").style(bold),
        Cell::from("Category").style(bold),
        Cell::from("Description").style(bold),
        Cell::from("Id").style(bold),
    ]);

    let rows = data.filtered.iter().map(|tx| {
        let (sign, color) = match tx.transaction_type {
            TransactionType::Income => ("+", INCOME_COLOR),
            TransactionType::Expense => ("-", EXPENSE_COLOR),
        };
        Row::new([
            Cell::from(tx.date.format("%Y-%m-%d %H:%M").to_string()),
            Cell::from(format!("{}{}", sign, format_amount(symbol, tx.amount)))
                .style(Style::default().fg(color)),
            Cell::from(tx.category.clone()),
            Cell::from(if tx.description.is_empty() {
                "(no description)".to_string()
            } else {
                tx.description.clone()
            }),
            Cell::from(short_id(&tx.id).to_string()),
        ])
    });

    let widths = [
        Constraint::Length(16),
        Constraint::Length(14),
        Constraint::Length(16),
        Constraint::Min(10),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("➤ ")
        .column_spacing(1);

    frame.render_stateful_widget(table, inner, &mut state.table_state);
}

fn render_categories(frame: &mut ratatui::Frame, area: Rect, data: &DashboardData, symbol: &str) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (column, title, totals, color) in [
        (columns[0], "Income categories", &data.income_configured, INCOME_COLOR),
        (columns[1], "Expense categories", &data.expense_configured, EXPENSE_COLOR),
    ] {
        let lines: Vec<Line> = totals
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::raw(format!("{:20}", entry.category)),
                    Span::styled(
                        format!("{:>14}", format_amount(symbol, entry.total)),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                ])
            })
            .collect();
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .title(Span::styled(title, Style::default().fg(color)))
                    .borders(Borders::ALL),
            ),
            column,
        );
    }
}
