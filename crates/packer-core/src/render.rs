use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::item::Item;
use crate::stats::PackingStats;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self {
            color: color && io::stdout().is_terminal(),
        })
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip(self, items))]
    pub fn print_items(&self, items: &[&Item]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_items(&mut out, items)
    }

    pub fn write_items<W: Write>(&self, mut writer: W, items: &[&Item]) -> anyhow::Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let headers = vec!["ID".to_string(), "".to_string(), "Item".to_string()];
        let rows = items
            .iter()
            .map(|item| {
                let check = if item.packed { "[x]" } else { "[ ]" };
                let label = if item.packed {
                    self.paint(&item.label(), "9")
                } else {
                    item.label()
                };
                vec![self.paint(&item.id.to_string(), "33"), check.to_string(), label]
            })
            .collect();

        write_table(&mut writer, headers, rows)
    }

    pub fn print_stats(&self, stats: &PackingStats) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", stats.message())?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{Renderer, strip_ansi};
    use crate::item::Item;

    #[test]
    fn rows_show_quantity_then_description() {
        let mut socks = Item::new(2, "Socks".to_string(), 6);
        socks.packed = true;
        let items = [Item::new(1, "Toothbrush".to_string(), 2), socks];
        let view: Vec<&Item> = items.iter().collect();

        let mut buf = Vec::new();
        Renderer::plain()
            .write_items(&mut buf, &view)
            .expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("[ ]"));
        assert!(lines[2].contains("2 Toothbrush"));
        assert!(lines[3].contains("[x]"));
        assert!(lines[3].contains("6 Socks"));
    }

    #[test]
    fn ansi_codes_do_not_count_toward_width() {
        assert_eq!(strip_ansi("\x1b[9m2 Socks\x1b[0m"), "2 Socks");
    }
}
