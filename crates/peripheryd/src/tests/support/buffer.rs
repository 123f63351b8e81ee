//! In-memory output stream shared between the daemon and assertions.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde_json::Value;

/// Cloneable writer whose clones append to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Returns everything written so far as UTF-8 text.
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().expect("buffer mutex poisoned");
        String::from_utf8(bytes.clone()).expect("responses are UTF-8")
    }

    /// Parses every written line as JSON.
    #[must_use]
    pub fn json_lines(&self) -> Vec<Value> {
        self.contents()
            .lines()
            .map(|line| serde_json::from_str(line).expect("response line is JSON"))
            .collect()
    }

    /// Counts lines whose `kind` field equals `kind`.
    #[must_use]
    pub fn count_kind(&self, kind: &str) -> usize {
        self.json_lines()
            .iter()
            .filter(|line| line["kind"] == kind)
            .count()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .expect("buffer mutex poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
