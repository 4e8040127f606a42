//! Box-drawn table rendering for monospace chat code blocks.

/// Cells longer than this many characters get shortened.
pub const MAX_CELL_CHARS: usize = 15;
const KEPT_CELL_CHARS: usize = 12;

/// Shorten `value` to 12 characters plus `...` when it is longer than 15.
pub fn truncate_cell(value: &str) -> String {
    if value.chars().count() > MAX_CELL_CHARS {
        let kept: String = value.chars().take(KEPT_CELL_CHARS).collect();
        format!("{kept}...")
    } else {
        value.to_string()
    }
}

/// Render `rows` under `headers` as a "fancy grid":
///
/// ```text
/// ╒═══════╤═══════╕
/// │ User  │ Date  │
/// ╞═══════╪═══════╡
/// │ maow  │ 01/02 │
/// ╘═══════╧═══════╛
/// ```
///
/// Every row must have one cell per header.
pub fn render_fancy_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let rule = |left: char, fill: char, mid: char, right: char| -> String {
        let segments: Vec<String> = widths
            .iter()
            .map(|w| fill.to_string().repeat(w + 2))
            .collect();
        format!("{left}{}{right}", segments.join(&mid.to_string()))
    };
    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let pad = w - cell.chars().count();
                format!(" {cell}{} ", " ".repeat(pad))
            })
            .collect();
        format!("│{}│", padded.join("│"))
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = vec![rule('╒', '═', '╤', '╕'), line(&header_cells), rule('╞', '═', '╪', '╡')];
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push(rule('├', '─', '┼', '┤'));
        }
        out.push(line(row));
    }
    out.push(rule('╘', '═', '╧', '╛'));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_cell() {
        assert_eq!(truncate_cell("short"), "short");
        assert_eq!(truncate_cell("exactly15chars!"), "exactly15chars!");
        assert_eq!(truncate_cell("America/Argentina/Buenos_Aires"), "America/Arge...");
    }

    #[test]
    fn test_render_fancy_grid() {
        let rows = vec![
            vec!["maow".to_string(), "01/02".to_string()],
            vec!["kittyn".to_string(), "3/4".to_string()],
        ];
        let table = render_fancy_grid(&["User", "Date"], &rows);
        let expected = [
            "╒════════╤═══════╕",
            "│ User   │ Date  │",
            "╞════════╪═══════╡",
            "│ maow   │ 01/02 │",
            "├────────┼───────┤",
            "│ kittyn │ 3/4   │",
            "╘════════╧═══════╛",
        ]
        .join("\n");
        assert_eq!(table, expected);
    }
}
