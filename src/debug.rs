use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Line-oriented JSON debug sink.
///
/// Threaded through parse and apply as `Option<&DebugLogger>`; every
/// event is one JSON object per line so logs can be grepped and replayed.
pub struct DebugLogger {
    inner: Mutex<DebugState>,
}

struct DebugState {
    writer: BufWriter<File>,
    counters: BTreeMap<String, u64>,
}

impl DebugLogger {
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            inner: Mutex::new(DebugState {
                writer: BufWriter::new(file),
                counters: BTreeMap::new(),
            }),
        })
    }

    pub fn event(&self, kind: &str, detail: &str) {
        if let Ok(mut state) = self.inner.lock() {
            let line = format!(
                "{{\"type\":\"{}\",\"detail\":\"{}\"}}",
                json_escape(kind),
                json_escape(detail)
            );
            let _ = writeln!(state.writer, "{line}");
        }
    }

    pub fn count(&self, key: &str, amount: u64) {
        if let Ok(mut state) = self.inner.lock() {
            let entry = state.counters.entry(key.to_string()).or_insert(0);
            *entry = entry.saturating_add(amount);
        }
    }

    /// Write the accumulated counters as a single summary line and reset them.
    pub fn summary(&self, context: &str) {
        if let Ok(mut state) = self.inner.lock() {
            let counters = std::mem::take(&mut state.counters);
            let mut counts = String::from("{");
            for (idx, (key, value)) in counters.iter().enumerate() {
                if idx > 0 {
                    counts.push(',');
                }
                counts.push_str(&format!("\"{}\":{}", json_escape(key), value));
            }
            counts.push('}');
            let line = format!(
                "{{\"type\":\"summary\",\"context\":\"{}\",\"counts\":{}}}",
                json_escape(context),
                counts
            );
            let _ = writeln!(state.writer, "{line}");
        }
    }

    pub fn flush(&self) {
        if let Ok(mut state) = self.inner.lock() {
            let _ = state.writer.flush();
        }
    }
}

fn json_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

impl Drop for DebugLogger {
    fn drop(&mut self) {
        if let Ok(mut state) = self.inner.lock() {
            let _ = state.writer.flush();
        }
    }
}
