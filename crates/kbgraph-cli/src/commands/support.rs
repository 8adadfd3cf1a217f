use std::io::{self, Write};

use anyhow::Result;
use kbgraph_core::ResolvedName;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Everything one command produces: the stdout body plus the stderr notices
/// for names that were rewritten on the way in.
#[derive(Debug, Default)]
pub(crate) struct Output {
    body: Vec<u8>,
    notices: Vec<String>,
}

impl Output {
    pub(super) fn notice(&mut self, name: Option<&ResolvedName>) {
        if let Some(message) = name.and_then(ResolvedName::notice) {
            self.notices.push(message);
        }
    }

    pub(super) fn json<T: serde::Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.body, value)?;
        writeln!(self.body)?;
        Ok(())
    }

    pub(super) fn line(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.body, "{}", text.as_ref())?;
        Ok(())
    }

    pub(super) fn blank_line(&mut self) -> Result<()> {
        writeln!(self.body)?;
        Ok(())
    }

    /// Whitespace-aligned table with the row type's upper-case headers.
    pub(super) fn table<T: Tabled>(&mut self, rows: Vec<T>) -> Result<()> {
        let mut table = Table::new(rows);
        table.with(Style::blank());
        writeln!(self.body, "{table}")?;
        Ok(())
    }

    #[cfg(test)]
    pub(super) fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    #[cfg(test)]
    pub(super) fn notices(&self) -> &[String] {
        &self.notices
    }

    pub(super) fn emit(&self) -> Result<()> {
        if !self.notices.is_empty() {
            let mut stderr = io::stderr().lock();
            for notice in &self.notices {
                writeln!(stderr, "{notice}")?;
            }
        }
        let mut stdout = io::stdout().lock();
        stdout.write_all(&self.body)?;
        stdout.flush()?;
        Ok(())
    }
}

pub(super) fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        return "-".to_string();
    }
    values.join(", ")
}

pub(super) fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => "-".to_string(),
    }
}

pub(super) fn yes_or_blank(flag: bool) -> String {
    if flag { "yes".to_string() } else { String::new() }
}
