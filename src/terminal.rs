//! Terminal rendering
//!
//! Implements the view and host traits on stdout/stdin so the CLI can drive
//! the same controllers as the browser frontend.
//!
//! Table output streams as regions render. JSON output is collected into a
//! single document written by [`TerminalView::finish`]. Outside table mode,
//! status lines go to stderr so stdout stays machine-readable.

use serde::Serialize;
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::io::{BufRead, Write};

use crate::api::PieDimension;
use crate::chart::{ChartHandle, ChartRenderer};
use crate::filters::{FilterControl, FilterState, TopN};
use crate::model::{ChartDataset, KpiSet, PendingRow, Section, SelectOption, StatusTable};
use crate::view::{DashboardView, Navigator, Notifier, Page, PendingView};

/// Width of the widest pie bar
const BAR_WIDTH: f64 = 30.0;

/// Output format for rendered regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// stdout/stdin implementation of every view trait
pub struct TerminalView {
    format: OutputFormat,
    filters: FilterState,
    head_top: Option<TopN>,
    office_top: Option<TopN>,
    assume_yes: bool,
    out: RefCell<Box<dyn Write>>,
    err: RefCell<Box<dyn Write>>,
    input: RefCell<Box<dyn BufRead>>,
    pending_header: Cell<bool>,
    document: RefCell<Map<String, Value>>,
}

impl TerminalView {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            filters: FilterState::default(),
            head_top: None,
            office_top: None,
            assume_yes: false,
            out: RefCell::new(Box::new(std::io::stdout())),
            err: RefCell::new(Box::new(std::io::stderr())),
            input: RefCell::new(Box::new(std::io::BufReader::new(std::io::stdin()))),
            pending_header: Cell::new(false),
            document: RefCell::new(Map::new()),
        }
    }

    pub fn with_filters(mut self, filters: FilterState) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_top(mut self, dimension: PieDimension, top: Option<TopN>) -> Self {
        match dimension {
            PieDimension::Head => self.head_top = top,
            PieDimension::Office => self.office_top = top,
        }
        self
    }

    /// Answer yes to every confirmation
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn with_output(mut self, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        self.out = RefCell::new(out);
        self.err = RefCell::new(err);
        self
    }

    pub fn with_input(mut self, input: Box<dyn BufRead>) -> Self {
        self.input = RefCell::new(input);
        self
    }

    /// Progress or outcome line: stdout for tables, stderr otherwise
    pub fn status(&self, text: &str) {
        match self.format {
            OutputFormat::Table => self.emit(text),
            _ => self.emit_err(text),
        }
    }

    /// Write the collected JSON document, if any
    pub fn finish(&self) {
        if self.format != OutputFormat::Json {
            return;
        }
        let document = std::mem::take(&mut *self.document.borrow_mut());
        if !document.is_empty() {
            self.emit_json(&Value::Object(document));
        }
    }

    /// Store `value` at `region` (or `region.key`) of the JSON document
    fn collect(&self, region: &str, key: Option<&str>, value: Value) {
        let mut document = self.document.borrow_mut();
        match key {
            None => {
                document.insert(region.to_string(), value);
            }
            Some(key) => {
                let entry = document
                    .entry(region.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(map) = entry {
                    map.insert(key.to_string(), value);
                }
            }
        }
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        if let Err(e) = writeln!(out, "{}", text) {
            tracing::warn!("Failed to write output: {}", e);
        }
    }

    fn emit_err(&self, text: &str) {
        let mut err = self.err.borrow_mut();
        if let Err(e) = writeln!(err, "{}", text) {
            tracing::warn!("Failed to write output: {}", e);
        }
    }

    fn emit_json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => self.emit(&json),
            Err(e) => tracing::error!("Failed to encode JSON: {}", e),
        }
    }

    fn emit_csv(&self, header: &[&str], rows: &[Vec<String>]) {
        match csv_text(header, rows) {
            Ok(text) => self.emit(text.trim_end()),
            Err(e) => tracing::error!("Failed to encode CSV: {}", e),
        }
    }

    fn emit_grid(&self, region: &str, key: Option<&str>, header: &[&str], rows: &[Vec<String>]) {
        match self.format {
            OutputFormat::Table => self.emit(&format_table(header, rows)),
            OutputFormat::Csv => self.emit_csv(header, rows),
            OutputFormat::Json => self.collect(region, key, records(header, rows)),
        }
    }
}

/// Rows as an array of `{header: cell}` objects
fn records(header: &[&str], rows: &[Vec<String>]) -> Value {
    rows.iter()
        .map(|row| {
            header
                .iter()
                .zip(row)
                .map(|(h, v)| (h.to_string(), Value::String(v.clone())))
                .collect::<Map<String, Value>>()
        })
        .map(Value::Object)
        .collect()
}

/// Left-aligned plain-text table with a separator under the header
pub fn format_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![line(header.to_vec())];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(line(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

fn csv_text(header: &[&str], rows: &[Vec<String>]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Share of each slice, in percent
pub fn slice_percentages(data: &ChartDataset) -> Vec<f64> {
    let total = data.total();
    data.slices
        .iter()
        .map(|s| if total > 0.0 { s.value / total * 100.0 } else { 0.0 })
        .collect()
}

/// A pie chart printed to the terminal
struct TextChart {
    canvas_id: String,
}

impl ChartHandle for TextChart {
    fn destroy(self: Box<Self>) {
        tracing::trace!(canvas = %self.canvas_id, "Chart released");
    }
}

impl ChartRenderer for TerminalView {
    fn draw_pie(&self, canvas_id: &str, data: &ChartDataset) -> Box<dyn ChartHandle> {
        let percentages = slice_percentages(data);
        let header = ["Label", "Value", "Share"];
        let rows: Vec<Vec<String>> = data
            .slices
            .iter()
            .zip(&percentages)
            .map(|(s, p)| vec![s.label.clone(), s.value.to_string(), format!("{:.1}%", p)])
            .collect();

        match self.format {
            OutputFormat::Table => {
                self.emit(&format!("\n[{}]", canvas_id));
                if data.is_empty() {
                    self.emit("No data");
                } else {
                    let label_width = data.slices.iter().map(|s| s.label.chars().count()).max().unwrap_or(0);
                    for (slice, pct) in data.slices.iter().zip(&percentages) {
                        let bar = "#".repeat((pct / 100.0 * BAR_WIDTH).round() as usize);
                        self.emit(&format!(
                            "{:<width$}  {:<30}  {} ({:.1}%)",
                            slice.label,
                            bar,
                            slice.value,
                            pct,
                            width = label_width
                        ));
                    }
                }
            }
            _ => self.emit_grid("charts", Some(canvas_id), &header, &rows),
        }

        Box::new(TextChart { canvas_id: canvas_id.to_string() })
    }
}

impl Navigator for TerminalView {
    fn navigate(&self, page: Page) {
        tracing::info!(path = page.path(), "Navigate");
        self.emit_err(&format!("-> {}", page.path()));
    }
}

impl Notifier for TerminalView {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        {
            let mut err = self.err.borrow_mut();
            let _ = write!(err, "{} [y/N] ", message);
            let _ = err.flush();
        }

        let mut answer = String::new();
        match self.input.borrow_mut().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }

    fn notify(&self, message: &str) {
        self.emit_err(message);
    }
}

impl DashboardView for TerminalView {
    fn filters(&self) -> FilterState {
        self.filters.clone()
    }

    fn top_n(&self, dimension: PieDimension) -> Option<TopN> {
        match dimension {
            PieDimension::Head => self.head_top,
            PieDimension::Office => self.office_top,
        }
    }

    fn show_section(&self, section: Section) {
        let title = match section {
            Section::Admin => "Admin overview",
            Section::User => "My expenses",
        };
        match self.format {
            OutputFormat::Table => self.emit(&format!("\n== {} ==", title)),
            OutputFormat::Json => self.collect("section", None, Value::String(title.to_string())),
            OutputFormat::Csv => {}
        }
    }

    fn render_kpis(&self, kpis: &KpiSet) {
        let rows: Vec<Vec<String>> = kpis
            .cards
            .iter()
            .map(|k| vec![k.label.to_string(), k.value.clone()])
            .collect();
        self.emit_grid("kpis", None, &["Metric", "Value"], &rows);
    }

    fn render_status_table(&self, table: &StatusTable) {
        if self.format == OutputFormat::Table {
            self.emit(&format!("\n[{}]", table.status));
            if table.empty_visible {
                self.emit(&format!("No {} expenses", table.status));
                return;
            }
        }

        let rows: Vec<Vec<String>> = table.rows.iter().map(|r| r.to_vec()).collect();
        let status = table.status.to_string();
        self.emit_grid("tables", Some(&status), &StatusTable::HEADER, &rows);
    }

    fn render_filter_options(&self, control: FilterControl, options: &[SelectOption]) {
        let choices: Vec<&str> = options
            .iter()
            .filter(|o| !o.is_sentinel())
            .map(|o| o.label.as_str())
            .collect();
        tracing::debug!(control = control.element_id(), count = choices.len(), "Filter options");

        if self.format == OutputFormat::Table {
            let name = control.sentinel_label().unwrap_or(control.element_id());
            self.emit(&format!("{}: {}", name, choices.join(", ")));
        }
    }

    fn enable_pending_click(&self) {
        self.emit_err("Review pending approvals with `expense-dash pending`");
    }
}

impl PendingView for TerminalView {
    fn clear_rows(&self) {
        self.pending_header.set(false);
        if self.format == OutputFormat::Json {
            self.collect("pending", None, Value::Array(Vec::new()));
        }
    }

    fn append_row(&self, row: &PendingRow) {
        let mut cells = vec![row.pending_id.to_string()];
        cells.extend(row.cells.iter().cloned());

        let mut header = vec!["ID"];
        header.extend(PendingRow::HEADER);

        match self.format {
            OutputFormat::Json => match serde_json::to_value(row) {
                Ok(value) => {
                    let mut document = self.document.borrow_mut();
                    let entry = document
                        .entry("pending")
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if let Value::Array(rows) = entry {
                        rows.push(value);
                    }
                }
                Err(e) => tracing::error!("Failed to encode JSON: {}", e),
            },
            OutputFormat::Csv => match csv_text(&header, &[cells]) {
                Ok(text) => {
                    let mut lines = text.lines();
                    let head = lines.next().unwrap_or_default();
                    if !self.pending_header.replace(true) {
                        self.emit(head);
                    }
                    for line in lines {
                        self.emit(line);
                    }
                }
                Err(e) => tracing::error!("Failed to encode CSV: {}", e),
            },
            OutputFormat::Table => {
                if !self.pending_header.replace(true) {
                    self.emit(&header.join(" | "));
                }
                self.emit(&cells.join(" | "));
            }
        }
    }

    fn remove_row(&self, pending_id: i64) {
        if let Some(Value::Array(rows)) = self.document.borrow_mut().get_mut("pending") {
            rows.retain(|row| row["pending_id"].as_i64() != Some(pending_id));
        }
        self.status(&format!("Removed pending expense #{}", pending_id));
    }

    fn set_empty_visible(&self, visible: bool) {
        if visible {
            self.status("No pending expenses");
        }
    }
}
