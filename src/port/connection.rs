//! Serial connection and timeout-aware line reading

use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

use super::PortError;
use crate::protocol::decode_line;

/// Open the device at the given baud rate (8N1, no flow control).
///
/// Reads on the returned port give up after `read_timeout`, which is what
/// lets the bridge loop notice a shutdown request.
pub fn open(path: &Path, baud_rate: u32, read_timeout: Duration) -> Result<Box<dyn SerialPort>, PortError> {
    let port = serialport::new(path.to_string_lossy(), baud_rate)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .flow_control(serialport::FlowControl::None)
        .timeout(read_timeout)
        .open()
        .map_err(|source| PortError::Open {
            path: path.to_owned(),
            source,
        })?;

    info!(?path, baud_rate, "serial port opened");
    Ok(port)
}

/// Reads newline-terminated lines from a byte stream with read timeouts
///
/// Bytes received before a timeout are kept and completed by later reads,
/// so a line split across a timeout is never lost or duplicated.
pub struct LineReader<R> {
    inner: BufReader<R>,
    pending: Vec<u8>,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            pending: Vec::with_capacity(64),
        }
    }

    /// Read the next complete line.
    ///
    /// Returns `Ok(None)` when the read timed out before a full line
    /// arrived. End of stream is reported as `UnexpectedEof` once any
    /// trailing partial line has been returned.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        match self.inner.read_until(b'\n', &mut self.pending) {
            Ok(0) if self.pending.is_empty() => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "serial connection closed",
            )),
            Ok(_) => {
                let raw = std::mem::take(&mut self.pending);
                Ok(Some(decode_line(&raw)))
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                if !self.pending.is_empty() {
                    debug!(buffered = self.pending.len(), "read timed out mid-line");
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::Cursor;

    use super::*;

    /// Reader that replays a script of chunks and errors
    struct ScriptedReader {
        script: VecDeque<io::Result<Vec<u8>>>,
    }

    impl ScriptedReader {
        fn new(script: Vec<io::Result<Vec<u8>>>) -> Self {
            Self {
                script: script.into(),
            }
        }
    }

    impl Read for ScriptedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.script.pop_front() {
                None => Ok(0),
                Some(Err(e)) => Err(e),
                Some(Ok(chunk)) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
            }
        }
    }

    fn timed_out() -> io::Error {
        io::Error::new(io::ErrorKind::TimedOut, "Operation timed out")
    }

    #[test]
    fn test_reads_lines_in_order() {
        let mut reader = LineReader::new(Cursor::new(b"B1:1\r\nB1:0\n".to_vec()));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("B1:1"));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("B1:0"));
        let err = reader.next_line().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_timeout_yields_none() {
        let mut reader = LineReader::new(ScriptedReader::new(vec![Err(timed_out())]));
        assert_eq!(reader.next_line().unwrap(), None);
    }

    #[test]
    fn test_line_split_across_timeout() {
        let mut reader = LineReader::new(ScriptedReader::new(vec![
            Ok(b"B3".to_vec()),
            Err(timed_out()),
            Ok(b":1\nB4".to_vec()),
        ]));

        assert_eq!(reader.next_line().unwrap(), None);
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("B3:1"));
        // Trailing partial line is flushed at end of stream
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("B4"));
        assert!(reader.next_line().is_err());
    }

    #[test]
    fn test_other_errors_propagate() {
        let mut reader = LineReader::new(ScriptedReader::new(vec![Err(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "device unplugged",
        ))]));
        let err = reader.next_line().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_open_missing_device() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cu.usbmodem-missing");
        assert!(matches!(
            open(&path, 115_200, Duration::from_secs(1)),
            Err(PortError::Open { .. })
        ));
    }
}
