use std::io::{self, Write};

/// Filenames saved since the process started, in save order.
#[derive(Debug, Default, Clone)]
pub struct SessionRecord {
    saved: Vec<String>,
}

impl SessionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.saved.iter().any(|s| s == filename)
    }

    pub fn record(&mut self, filename: impl Into<String>) {
        self.saved.push(filename.into());
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.saved.iter().map(String::as_str)
    }

    /// Writes the end-of-run summary. The list of names is omitted when
    /// nothing was saved.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "All downloads processed.")?;
        writeln!(out, "Faith in the web restored. The spirit of Ubuntu lives on.")?;
        if self.is_empty() {
            return Ok(());
        }
        writeln!(out)?;
        writeln!(out, "Summary of successful downloads:")?;
        for name in self.iter() {
            writeln!(out, "  - {name}")?;
        }
        Ok(())
    }
}
