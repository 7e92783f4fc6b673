//! Points-file reading
//!
//! The input format is plain text, one point per line as two
//! whitespace-separated f64 literals (`x y`). Blank lines are skipped.

use std::path::Path;

use thiserror::Error;

use crate::point::Point;

/// Errors reading or parsing a points file
#[derive(Debug, Error)]
pub enum InputError {
    /// IO error reading the file
    #[error("failed to read points file: {0}")]
    Io(#[from] std::io::Error),

    /// A line that is not two numeric coordinates
    #[error("malformed point on line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },
}

fn point_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Number of points in the file.
pub fn total_points(path: impl AsRef<Path>) -> Result<usize, InputError> {
    let content = std::fs::read_to_string(path)?;
    Ok(point_lines(&content).count())
}

/// Read the whole file into a point vector, allocated once.
pub fn read_points(path: impl AsRef<Path>) -> Result<Vec<Point>, InputError> {
    let content = std::fs::read_to_string(path)?;

    let mut points = Vec::with_capacity(point_lines(&content).count());
    for (line, text) in point_lines(&content) {
        points.push(parse_point(line, text)?);
    }
    Ok(points)
}

fn parse_point(line: usize, text: &str) -> Result<Point, InputError> {
    let malformed = || InputError::MalformedLine {
        line,
        content: text.to_string(),
    };

    let mut fields = text.split_whitespace();
    let x: f64 = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or_else(malformed)?;
    let y: f64 = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or_else(malformed)?;
    if fields.next().is_some() {
        return Err(malformed());
    }

    Ok(Point::new(x, y))
}
