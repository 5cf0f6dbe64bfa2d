//! Labeled instances: edge-list parsing and solution formatting.
//!
//! # Input format
//!
//! ```text
//! n m
//! <label> <label> <weight>     (m lines, each undirected edge once)
//! ```
//!
//! Labels are arbitrary whitespace-free strings, mapped to dense indices
//! in order of first appearance. The graph must be complete, so
//! `m = n(n-1)/2`. Blank lines are ignored.
//!
//! # Output format
//!
//! The tour cost with four decimals on the first line, then the tour as
//! space-separated labels beginning and ending with the same label.

use crate::distance::DistanceMatrix;
use crate::error::{TspError, TspResult};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::BufRead;

/// A distance matrix together with the labels of its vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    labels: Vec<String>,
    matrix: DistanceMatrix,
}

impl Instance {
    /// Pairs labels with a matrix.
    ///
    /// Fails if the label count differs from the matrix size or a label
    /// repeats.
    pub fn new(labels: Vec<String>, matrix: DistanceMatrix) -> TspResult<Self> {
        if labels.len() != matrix.size() {
            return Err(TspError::InvalidMatrix(format!(
                "{} labels for a {n}x{n} matrix",
                labels.len(),
                n = matrix.size()
            )));
        }
        let mut seen = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if seen.insert(label.as_str(), i).is_some() {
                return Err(TspError::InvalidMatrix(format!("duplicate label '{label}'")));
            }
        }
        Ok(Self { labels, matrix })
    }

    /// Parses the edge-list format.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::instance::Instance;
    ///
    /// let inst = Instance::parse("3 3\na b 3.0\nb c 4.2\na c 5.4\n").unwrap();
    /// assert_eq!(inst.labels(), ["a", "b", "c"]);
    /// assert!((inst.matrix().get(0, 2) - 5.4).abs() < 1e-12);
    /// ```
    pub fn parse(input: &str) -> TspResult<Self> {
        let mut lines = input
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (header_line, header) = lines
            .next()
            .ok_or_else(|| TspError::malformed(0, "empty input"))?;
        let (n, m) = parse_header(header_line, header)?;

        let expected = n
            .checked_mul(n.saturating_sub(1))
            .map(|x| x / 2)
            .ok_or_else(|| TspError::malformed(header_line, format!("vertex count {n} too large")))?;
        if m != expected {
            return Err(TspError::malformed(
                header_line,
                format!("a complete graph on {n} vertices has {expected} edges, header declares {m}"),
            ));
        }

        // Allocate from the edges actually read, never from the header.
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut labels: Vec<String> = Vec::new();
        let mut edges: Vec<(usize, usize, usize, f64)> = Vec::new();

        for read in 0..m {
            let (line_no, line) = lines.next().ok_or_else(|| {
                TspError::malformed(0, format!("expected {m} edges, found {read}"))
            })?;

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(TspError::malformed(
                    line_no,
                    format!("expected 3 fields, got {}", fields.len()),
                ));
            }

            let mut intern = |label: &str| -> TspResult<usize> {
                if let Some(&i) = index.get(label) {
                    return Ok(i);
                }
                if labels.len() == n {
                    return Err(TspError::malformed(
                        line_no,
                        format!("label '{label}' exceeds the declared {n} vertices"),
                    ));
                }
                index.insert(label.to_string(), labels.len());
                labels.push(label.to_string());
                Ok(labels.len() - 1)
            };
            let i = intern(fields[0])?;
            let j = intern(fields[1])?;

            let w: f64 = fields[2].parse().map_err(|_| {
                TspError::malformed(line_no, format!("invalid weight '{}'", fields[2]))
            })?;
            if !w.is_finite() || w < 0.0 {
                return Err(TspError::malformed(
                    line_no,
                    format!("weight {w} is not a finite non-negative number"),
                ));
            }

            if i == j {
                if w != 0.0 {
                    return Err(TspError::malformed(
                        line_no,
                        format!("self-loop on '{}' with non-zero weight {w}", fields[0]),
                    ));
                }
                continue;
            }
            edges.push((line_no, i, j, w));
        }

        if let Some((line_no, _)) = lines.next() {
            return Err(TspError::malformed(
                line_no,
                format!("unexpected data after {m} edges"),
            ));
        }

        if labels.len() < n {
            // A lone vertex has no edge to name it.
            if n == 1 {
                labels.push("0".to_string());
            } else {
                return Err(TspError::malformed(
                    0,
                    format!("declared {n} vertices but only {} labels appear", labels.len()),
                ));
            }
        }

        let mut matrix = DistanceMatrix::zeroed(n);
        let mut present = vec![false; n * n];
        for &(line_no, i, j, w) in &edges {
            if present[i * n + j] {
                return Err(TspError::malformed(
                    line_no,
                    format!("duplicate edge {} {}", labels[i], labels[j]),
                ));
            }
            present[i * n + j] = true;
            present[j * n + i] = true;
            matrix.set_symmetric(i, j, w);
        }

        for i in 0..n {
            for j in (i + 1)..n {
                if !present[i * n + j] {
                    return Err(TspError::malformed(
                        0,
                        format!("missing edge {} {}", labels[i], labels[j]),
                    ));
                }
            }
        }

        Ok(Self { labels, matrix })
    }

    /// Reads and parses an instance from a buffered reader.
    pub fn from_reader<R: BufRead>(mut reader: R) -> TspResult<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::parse(&input)
    }

    /// Vertex labels, indexed by vertex.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The distance matrix.
    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// Number of vertices.
    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    /// Index of a label, if present.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Formats a solution: cost with four decimals, then the tour labels.
    ///
    /// # Panics
    ///
    /// Panics if the tour contains an index outside `0..n`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::instance::Instance;
    ///
    /// let inst = Instance::parse("3 3\na b 3.0\nb c 4.2\na c 5.4\n").unwrap();
    /// assert_eq!(inst.format_solution(12.6, &[0, 1, 2, 0]), "12.6000\na b c a");
    /// ```
    pub fn format_solution(&self, cost: f64, tour: &[usize]) -> String {
        let names: Vec<&str> = tour.iter().map(|&v| self.labels[v].as_str()).collect();
        format!("{cost:.4}\n{}", names.join(" "))
    }

    /// Writes the instance back in edge-list form, weights with four
    /// decimals.
    pub fn to_edge_list(&self) -> String {
        let n = self.size();
        let m = n * n.saturating_sub(1) / 2;
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{n} {m}");
        for i in 0..n {
            for j in (i + 1)..n {
                let _ = writeln!(
                    out,
                    "{} {} {:.4}",
                    self.labels[i],
                    self.labels[j],
                    self.matrix.get(i, j)
                );
            }
        }
        out
    }
}

fn parse_header(line_no: usize, header: &str) -> TspResult<(usize, usize)> {
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(TspError::malformed(
            line_no,
            format!("header must be 'n m', got '{header}'"),
        ));
    }
    let parse = |s: &str, what: &str| {
        s.parse::<usize>()
            .map_err(|_| TspError::malformed(line_no, format!("invalid {what} '{s}'")))
    };
    Ok((parse(fields[0], "vertex count")?, parse(fields[1], "edge count")?))
}
