//! Output formatting for the status matrix and progress messages.

use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use lbfleet_haproxy::{ServerRecord, StatusEmphasis, StatusMatrix, TargetState};

/// Print the matrix under a bold title.
pub fn print_matrix(title: &str, matrix: &StatusMatrix) {
    println!("{}", title.white().bold());
    println!("{}", render_matrix(matrix));
}

/// Render the matrix as an ASCII table: one row per server, one column per
/// node in cluster order.
pub fn render_matrix(matrix: &StatusMatrix) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["Server".to_string()];
    header.extend(matrix.nodes().iter().cloned());
    builder.push_record(header);

    for server in matrix.server_names() {
        let mut row = vec![server.clone()];
        for node in matrix.nodes() {
            row.push(match matrix.record(&server, node) {
                Some(record) => format_cell(record),
                None => "-".dimmed().to_string(),
            });
        }
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::ascii());
    table.to_string()
}

fn format_cell(record: &ServerRecord) -> String {
    let status = style_status(&record.status);
    if record.check_status.is_empty() {
        status
    } else {
        format!("{} ({})", status, record.check_status)
    }
}

/// Apply the display emphasis for a raw status string.
///
/// Cosmetic only; nothing here feeds back into control decisions.
pub fn style_status(status: &str) -> String {
    match StatusEmphasis::classify(status) {
        StatusEmphasis::Up => status.green().bold().to_string(),
        StatusEmphasis::UpTransitional => status.green().to_string(),
        StatusEmphasis::Drain => status.yellow().to_string(),
        StatusEmphasis::Maint => status.yellow().bold().to_string(),
        StatusEmphasis::Down => status.red().bold().to_string(),
        StatusEmphasis::Other => status.red().to_string(),
    }
}

fn style_target(state: TargetState) -> String {
    let label = state.to_string();
    match state {
        TargetState::Ready => label.green().bold().to_string(),
        TargetState::Drain => label.yellow().to_string(),
        TargetState::Maint => label.yellow().bold().to_string(),
    }
}

/// One progress line per (node, server) pair while applying.
pub fn print_apply_progress(node: &str, server: &str, state: TargetState) {
    println!(
        "{}{} setting {} to {}",
        node.cyan().bold(),
        ":".cyan(),
        server.cyan().bold(),
        style_target(state)
    );
}

/// Print a non-fatal warning.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

/// Print an informational notice.
pub fn print_notice(message: &str) {
    println!("{}", message.yellow());
}
