use serde::Serialize;
use stock_etl_lib::{Bar, ExtractedBatch, FetchWindow, RunReport, TickerOutcome};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Markdown,
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Rows")]
    rows: usize,
    #[tabled(rename = "Detail")]
    detail: String,
}

#[derive(Tabled)]
struct BarRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Open")]
    open: f64,
    #[tabled(rename = "High")]
    high: f64,
    #[tabled(rename = "Low")]
    low: f64,
    #[tabled(rename = "Close")]
    close: f64,
    #[tabled(rename = "Volume")]
    volume: i64,
}

/// JSON shape for `extract`: the fetch summary plus the cleaned bars.
#[derive(Serialize)]
struct ExtractSummary<'a> {
    window: &'a FetchWindow,
    outcomes: &'a [TickerOutcome],
    fetched: usize,
    cleaned: usize,
    bars: &'a [Bar],
}

// -- Row builders --

fn build_outcome_rows(outcomes: &[TickerOutcome]) -> Vec<OutcomeRow> {
    outcomes
        .iter()
        .map(|o| match o {
            TickerOutcome::Fetched { ticker, rows } => OutcomeRow {
                ticker: ticker.clone(),
                status: "fetched".to_string(),
                rows: *rows,
                detail: String::new(),
            },
            TickerOutcome::Failed { ticker, reason } => OutcomeRow {
                ticker: ticker.clone(),
                status: "failed".to_string(),
                rows: 0,
                detail: reason.clone(),
            },
        })
        .collect()
}

fn build_bar_rows(bars: &[Bar]) -> Vec<BarRow> {
    bars.iter()
        .map(|b| BarRow {
            ticker: b.ticker.clone(),
            timestamp: b.timestamp.format(stock_etl_lib::bar::TIMESTAMP_FORMAT).to_string(),
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            volume: b.volume,
        })
        .collect()
}

fn render_table<T: Tabled>(rows: &[T], format: &OutputFormat) -> String {
    let mut table = Table::new(rows);
    if let OutputFormat::Markdown = format {
        table.with(Style::markdown());
    }
    table.to_string()
}

fn window_line(window: &FetchWindow) -> String {
    format!(
        "Window: {} to {}",
        window.start,
        window.end.format(stock_etl_lib::bar::TIMESTAMP_FORMAT)
    )
}

// -- Printers --

pub fn print_run_report(report: &RunReport, format: &OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table | OutputFormat::Markdown => {
            println!("{}", window_line(&report.window));
            println!("{}", render_table(&build_outcome_rows(&report.outcomes), format));
            println!(
                "Fetched {} rows, kept {} after cleaning, loaded {}",
                report.fetched, report.cleaned, report.loaded
            );
        }
    }
}

pub fn print_extracted(batch: &ExtractedBatch, format: &OutputFormat) {
    let bars = batch.cleaned.as_deref().unwrap_or_default();
    match format {
        OutputFormat::Json => print_json(&ExtractSummary {
            window: &batch.report.window,
            outcomes: &batch.report.outcomes,
            fetched: batch.report.bars.len(),
            cleaned: batch.cleaned_len(),
            bars,
        }),
        OutputFormat::Table | OutputFormat::Markdown => {
            println!("{}", window_line(&batch.report.window));
            println!("{}", render_table(&build_outcome_rows(&batch.report.outcomes), format));
            if !bars.is_empty() {
                println!("{}", render_table(&build_bar_rows(bars), format));
            }
            println!(
                "Fetched {} rows, kept {} after cleaning",
                batch.report.bars.len(),
                batch.cleaned_len()
            );
        }
    }
}

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
