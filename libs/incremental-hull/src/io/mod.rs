//! # Point Loading
//!
//! Reads point sets from plain text: one point per line, three coordinates
//! separated by whitespace and/or commas. Blank lines and `#` comments are
//! skipped.
//!
//! ```text
//! # unit tetrahedron
//! 0 0 0
//! 1, 0, 0
//! 0 1 0   # trailing comment
//! 0,0,1
//! ```

use crate::core::vec3::Vec3;
use crate::error::{HullError, HullResult};
use std::path::Path;

/// Parses points from text.
///
/// # Examples
/// ```
/// use incremental_hull::io::parse_points;
/// let points = parse_points("0 0 0\n1,2,3\n")?;
/// assert_eq!(points.len(), 2);
/// # Ok::<(), incremental_hull::HullError>(())
/// ```
pub fn parse_points(text: &str) -> HullResult<Vec<Vec3>> {
    let mut points = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<&str> = content
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .collect();
        if fields.len() != 3 {
            return Err(HullError::parse(
                line,
                format!("expected 3 coordinates, found {}", fields.len()),
            ));
        }

        let mut coords = [0.0; 3];
        for (slot, field) in coords.iter_mut().zip(&fields) {
            *slot = field
                .parse::<f64>()
                .map_err(|err| HullError::parse(line, format!("`{field}`: {err}")))?;
        }
        let point = Vec3::from_array(coords);
        if !point.is_finite() {
            return Err(HullError::parse(line, "coordinates must be finite"));
        }
        points.push(point);
    }
    Ok(points)
}

/// Reads and parses a point file.
pub fn read_points(path: impl AsRef<Path>) -> HullResult<Vec<Vec3>> {
    let text = std::fs::read_to_string(path)?;
    parse_points(&text)
}
