#![forbid(unsafe_code)]

//! Plain-text 3x3 matrix files and numbered GT folders.
//!
//! A matrix file is three lines of three space separated numbers with ten
//! decimal places. A GT folder is `<root>/GT/` holding `0000.txt`,
//! `0001.txt`, ... where the counter always moves past files that already
//! exist, so nothing is overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use crate::session::Matrix3;

#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected 3 numbers")]
    BadRow { line: usize },
    #[error("expected 3 matrix rows, found {found}")]
    RowCount { found: usize },
}

impl MatrixError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Format a matrix the way it is written to disk.
#[must_use]
pub fn format(matrix: &Matrix3) -> String {
    matrix
        .iter()
        .map(|row| format!("{:.10} {:.10} {:.10}\n", row[0], row[1], row[2]))
        .collect()
}

/// Parse the text written by [`format`]. Blank lines are ignored.
pub fn parse(text: &str) -> Result<Matrix3, MatrixError> {
    let mut matrix = [[0.0; 3]; 3];
    let mut rows = 0;
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if rows == 3 {
            return Err(MatrixError::RowCount { found: rows + 1 });
        }
        let values: Vec<f64> = line
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<Result<_, _>>()
            .map_err(|_| MatrixError::BadRow { line: line_no + 1 })?;
        let row: [f64; 3] = values
            .try_into()
            .map_err(|_| MatrixError::BadRow { line: line_no + 1 })?;
        matrix[rows] = row;
        rows += 1;
    }
    if rows != 3 {
        return Err(MatrixError::RowCount { found: rows });
    }
    Ok(matrix)
}

pub fn write(path: impl AsRef<Path>, matrix: &Matrix3) -> Result<(), MatrixError> {
    let path = path.as_ref();
    fs::write(path, format(matrix)).map_err(|e| MatrixError::io(path, e))?;
    tracing::info!(target: "rigidlabel.io", path = %path.display(), "matrix written");
    Ok(())
}

pub fn read(path: impl AsRef<Path>) -> Result<Matrix3, MatrixError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| MatrixError::io(path, e))?;
    parse(&text)
}

/// Writes successive matrices into `<root>/GT/NNNN.txt`.
#[derive(Debug, Clone)]
pub struct GtExporter {
    dir: PathBuf,
    counter: u32,
}

impl GtExporter {
    /// Create the exporter for `root`. The `GT` folder is created on first
    /// export.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join("GT"),
            counter: 0,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, counter: u32) -> PathBuf {
        self.dir.join(format!("{counter:04}.txt"))
    }

    /// Path the next export would use.
    #[must_use]
    pub fn peek_next(&self) -> PathBuf {
        let mut counter = self.counter;
        while self.file_for(counter).exists() {
            counter += 1;
        }
        self.file_for(counter)
    }

    /// Write `matrix` to the next free file and advance the counter.
    pub fn export(&mut self, matrix: &Matrix3) -> Result<PathBuf, MatrixError> {
        fs::create_dir_all(&self.dir).map_err(|e| MatrixError::io(&self.dir, e))?;
        while self.file_for(self.counter).exists() {
            self.counter += 1;
        }
        let path = self.file_for(self.counter);
        write(&path, matrix)?;
        self.counter += 1;
        Ok(path)
    }
}
