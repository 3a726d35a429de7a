//! Line splitting for subprocess output.
//!
//! FFmpeg redraws its progress line with a bare `\r`, so `\r`, `\n` and
//! `\r\n` all end a line here.

use std::io::{self, BufRead};

/// Reads lines terminated by `\n`, `\r` or `\r\n`.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    skip_lf: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            skip_lf: false,
        }
    }

    /// Next line without its terminator, or `None` at end of stream.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            let available = match self.inner.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(self.take_line()));
            }

            let mut consumed = 0;
            let mut complete = false;
            for &byte in available {
                consumed += 1;
                if self.skip_lf {
                    self.skip_lf = false;
                    if byte == b'\n' {
                        continue;
                    }
                }
                match byte {
                    b'\n' => {
                        complete = true;
                        break;
                    }
                    b'\r' => {
                        self.skip_lf = true;
                        complete = true;
                        break;
                    }
                    _ => self.buf.push(byte),
                }
            }
            self.inner.consume(consumed);

            if complete {
                return Ok(Some(self.take_line()));
            }
        }
    }

    fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        line
    }
}
