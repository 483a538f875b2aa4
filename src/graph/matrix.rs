//! Distance-matrix ingestion.
//!
//! A labelled square matrix where any non-positive entry (conventionally
//! `-1`) means "no edge". The diagonal is ignored. Labels whose row and
//! column hold no edge become isolated nodes.

use super::distance::GraphBuilder;
use super::edge::Edge;
use crate::error::{Error, Result};

/// Converts a labelled matrix into a graph builder.
///
/// Entries are read row by row; when `rows[i][j]` and `rows[j][i]` disagree
/// the later one (`rows[j][i]` for `j > i`) wins.
///
/// # Examples
///
/// ```
/// use u_tour::graph::from_matrix;
///
/// let labels = vec!["a".to_string(), "b".to_string(), "c".to_string()];
/// let rows = vec![
///     vec![-1.0, 2.0, -1.0],
///     vec![2.0, -1.0, -1.0],
///     vec![-1.0, -1.0, -1.0],
/// ];
/// let graph = from_matrix(&labels, &rows).unwrap().build().unwrap();
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.node_count(), 3);
/// ```
pub fn from_matrix(labels: &[String], rows: &[Vec<f64>]) -> Result<GraphBuilder> {
    if labels.is_empty() {
        return Err(Error::invalid_matrix("no labels"));
    }
    if rows.len() != labels.len() {
        return Err(Error::invalid_matrix(format!(
            "expected {} rows, got {}",
            labels.len(),
            rows.len()
        )));
    }

    let mut builder = GraphBuilder::default();
    for label in labels {
        builder = builder.node(label.clone());
    }

    let mut edges = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        if row.len() != labels.len() {
            return Err(Error::invalid_matrix(format!(
                "row {} has {} columns, expected {}",
                labels[i],
                row.len(),
                labels.len()
            )));
        }
        for (j, &value) in row.iter().enumerate() {
            if i == j || value.is_nan() || value <= 0.0 {
                continue;
            }
            edges.push(Edge::new(labels[i].clone(), labels[j].clone(), value));
        }
    }

    Ok(builder.edges(edges))
}

/// Parses a comma-separated matrix with a header row of labels.
///
/// The first header cell and the first cell of every row are row labels
/// (the header's first cell is usually empty). Row labels must match the
/// header order.
///
/// ```text
/// ,l1,l2,l3
/// l1,-1,3,-1
/// l2,3,-1,4
/// l3,-1,4,-1
/// ```
pub fn parse_matrix_csv(text: &str) -> Result<GraphBuilder> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let header = lines
        .next()
        .ok_or_else(|| Error::invalid_matrix("missing header row"))?;
    let labels: Vec<String> = header
        .split(',')
        .skip(1)
        .map(|s| s.trim().to_string())
        .collect();

    let mut rows = Vec::with_capacity(labels.len());
    for (i, line) in lines.enumerate() {
        let mut cells = line.split(',').map(str::trim);
        let label = cells.next().unwrap_or_default();
        match labels.get(i) {
            Some(expected) if expected == label => {}
            Some(expected) => {
                return Err(Error::invalid_matrix(format!(
                    "row {} is labelled {label:?}, expected {expected:?}",
                    i + 1
                )))
            }
            None => {
                return Err(Error::invalid_matrix(format!(
                    "unexpected extra row {label:?}"
                )))
            }
        }
        let row = cells
            .map(|cell| {
                cell.parse::<f64>().map_err(|e| {
                    Error::invalid_matrix(format!("row {label}: cannot parse {cell:?}: {e}"))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    from_matrix(&labels, &rows)
}
