//! Command implementations.

pub mod graph;
pub mod ingest;
pub mod report;

pub use self::graph::execute_graph;
pub use self::ingest::execute_ingest;
pub use self::report::execute_report;

use crate::error::Result;
use std::io::Read;
use std::path::Path;

/// Read a JSON input file, or stdin when the path is `-`.
pub(crate) fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}
