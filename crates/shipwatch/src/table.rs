use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use shipwatch_core::Deployment;

use crate::color;

const HEADERS: [&str; 6] = ["State", "Project", "Branch", "Target", "Age", "Link"];

/// Widest a branch cell may get before it is truncated.
const MAX_BRANCH_WIDTH: usize = 32;

/// Deployment table: state, project, branch, target, age, link.
pub struct DeploymentTable {
    rows: Vec<[String; 6]>,
    widths: [usize; 6],
}

impl DeploymentTable {
    pub fn new(deployments: &[Deployment], now_ms: i64) -> Self {
        let rows: Vec<[String; 6]> = deployments
            .iter()
            .map(|d| {
                [
                    d.state.to_string(),
                    d.project.clone(),
                    truncate(non_empty(d.branch()), MAX_BRANCH_WIDTH),
                    non_empty(d.target.as_deref().unwrap_or("")).to_string(),
                    format_age(d.created_at, now_ms),
                    d.link(),
                ]
            })
            .collect();

        // Minimum widths = header label lengths
        let mut widths = HEADERS.map(display_width);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(display_width(cell));
            }
        }

        Self { rows, widths }
    }

    pub fn print_table(&self) {
        println!("{}", self.border('┌', '┬', '┐'));
        println!("{}", self.header_row());
        println!("{}", self.border('├', '┼', '┤'));
        for row in &self.rows {
            println!("{}", self.data_row(row));
        }
        println!("{}", self.border('└', '┴', '┘'));
    }

    fn header_row(&self) -> String {
        let cells: Vec<String> = HEADERS
            .iter()
            .zip(self.widths.iter())
            .map(|(label, width)| color::bold(&pad(label, *width)))
            .collect();
        join_cells(&cells)
    }

    fn data_row(&self, row: &[String; 6]) -> String {
        let w = &self.widths;
        let cells = [
            color::state(&pad(&row[0], w[0])),
            color::ice(&pad(&row[1], w[1])),
            pad(&row[2], w[2]),
            color::target(&pad(&row[3], w[3])),
            pad(&row[4], w[4]),
            color::muted(&pad(&row[5], w[5])),
        ];
        join_cells(&cells)
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        color::muted(&border_line(&self.widths, left, mid, right))
    }
}

/// Two-column-or-more plain table for teams and projects.
pub fn print_simple_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(display_width(cell));
        }
    }

    println!("{}", color::muted(&border_line(&widths, '┌', '┬', '┐')));
    let header_cells: Vec<String> = headers
        .iter()
        .zip(widths.iter())
        .map(|(h, w)| color::bold(&pad(h, *w)))
        .collect();
    println!("{}", join_cells(&header_cells));
    println!("{}", color::muted(&border_line(&widths, '├', '┼', '┤')));
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| pad(cell, *w))
            .collect();
        println!("{}", join_cells(&cells));
    }
    println!("{}", color::muted(&border_line(&widths, '└', '┴', '┘')));
}

fn border_line(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", segments.join(&mid.to_string()))
}

fn join_cells(cells: &[String]) -> String {
    let sep = color::muted("│");
    let mut line = sep.clone();
    for cell in cells {
        line.push(' ');
        line.push_str(cell);
        line.push(' ');
        line.push_str(&sep);
    }
    line
}

fn non_empty(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

/// Compact age: `42s`, `7m`, `3h`, `2d`. Future timestamps read as `0s`.
pub(crate) fn format_age(created_at_ms: i64, now_ms: i64) -> String {
    let secs = (now_ms - created_at_ms).max(0) / 1000;
    match secs {
        s if s < 60 => format!("{}s", s),
        s if s < 3600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3600),
        s => format!("{}d", s / 86_400),
    }
}

/// Compute the terminal display width of a string.
///
/// Wide characters (CJK, emoji) count as 2 columns.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Pad a string to a minimum display width without truncating.
pub(crate) fn pad(s: &str, min_width: usize) -> String {
    let width = display_width(s);
    if width >= min_width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(min_width - width))
    }
}

/// Truncate to at most `max_width` display columns, ending in `…` when cut.
pub(crate) fn truncate(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out.push('…');
    out
}
