//! Reading vertex coordinates from Graphviz' `plain` output format.
//!
//! `dot -Tplain` prints one line per graph element:
//! ```text
//! graph scale width height
//! node name x y width height label style shape color fillcolor
//! edge tail head n x1 y1 .. xn yn [label xl yl] style color
//! stop
//! ```
//! Coordinates are in inches with the origin in the lower left corner, so the root of a tree
//! laid out top to bottom has the largest `y`.

use crate::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Coordinates of every vertex, indexed like the records the graph was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub positions: Vec<Point>,
}

impl Layout {
    /// Parse `plain` output for a graph with `vertex_count` vertices named `<prefix><index>`.
    pub fn from_plain(plain: &str, prefix: &str, vertex_count: usize) -> Result<Self, RenderError> {
        let mut width = 0.0;
        let mut height = 0.0;
        let mut positions: Vec<Option<Point>> = vec![None; vertex_count];

        for line in plain.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                ["graph", _scale, w, h, ..] => {
                    width = number(w, line)?;
                    height = number(h, line)?;
                }
                ["node", name, x, y, ..] => {
                    let index = name
                        .trim_matches('"')
                        .strip_prefix(prefix)
                        .and_then(|i| i.parse::<usize>().ok())
                        .filter(|&i| i < vertex_count)
                        .ok_or_else(|| RenderError::Layout(format!("unknown vertex in '{}'", line)))?;
                    positions[index] = Some(Point {
                        x: number(x, line)?,
                        y: number(y, line)?,
                    });
                }
                ["stop"] => break,
                _ => (),
            }
        }

        let positions = positions
            .into_iter()
            .enumerate()
            .map(|(i, p)| p.ok_or_else(|| RenderError::Layout(format!("no position for vertex {}", i))))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            width,
            height,
            positions,
        })
    }
}

fn number(s: &str, line: &str) -> Result<f64, RenderError> {
    s.parse::<f64>()
        .map_err(|_| RenderError::Layout(format!("bad number '{}' in '{}'", s, line)))
}
