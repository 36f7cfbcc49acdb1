mod atomic;

pub use atomic::{write_bytes_atomic, write_json_atomic};

use std::io::Write;
use std::path::Path;

use crate::CliError;

/// Write `data` to `path`, or to stdout when no path is given.
pub fn emit(path: Option<&Path>, data: &[u8]) -> Result<(), CliError> {
    match path {
        Some(path) => write_bytes_atomic(path, data),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(data)?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
            Ok(())
        }
    }
}
