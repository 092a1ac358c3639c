//! Parser for the plain-text network description format.
//!
//! ```text
//! # ring of three routers, one class
//! network ring3
//! nodes 3
//! matrix
//! 0;   0; 0.6; 0.4
//! 0.2; 0; 0;   -      # '-' entries share the remaining mass
//! 1;   0; 0;   0
//! stream 0
//! mu ethernet gigabit max
//! lambda 5; 5; 5
//! ```
//!
//! One `row` of the matrix holds `nodes + 1` values; column 0 is the
//! sink. `mu` accepts a per-node list, a scalar applied to every node,
//! or `ethernet <type> <frame>`. `lambda` accepts a list, a scalar, or
//! `rand`, which draws per-node integer rates below the service rate
//! from the supplied random source.

use std::fs;
use std::path::Path;

use log::debug;
use rand::Rng;

use super::capacity::{link_capacity, EthernetType, MAX_FRAME_LENGTH, MIN_FRAME_LENGTH};
use crate::error::{QnetError, Result};
use crate::model::NetworkSpec;
use crate::numeric::{Matrix, Vector};
use crate::ROW_SUM_TOLERANCE;

/// Read and parse a network description file.
pub fn load<R: Rng>(
    path: &Path,
    start_node: usize,
    target_node: usize,
    rng: &mut R,
) -> Result<NetworkSpec> {
    let text = fs::read_to_string(path).map_err(|source| QnetError::FileRead {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text, start_node, target_node, rng)
}

/// Parse a network description.
///
/// The random source is only consulted for `lambda rand` lines, so
/// deterministic descriptions parse identically under any `rng`.
pub fn parse<R: Rng>(
    input: &str,
    start_node: usize,
    target_node: usize,
    rng: &mut R,
) -> Result<NetworkSpec> {
    let mut parser = Parser {
        rng,
        name: None,
        nodes: None,
        matrix_rows: Vec::new(),
        in_matrix: false,
        current_stream: None,
        mu: Vec::new(),
        lambda: Vec::new(),
    };

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let text = strip_comment(raw).trim();
        if text.is_empty() {
            continue;
        }
        parser.directive(line, text)?;
    }

    parser.finish(start_node, target_node)
}

struct Parser<'r, R: Rng> {
    rng: &'r mut R,
    name: Option<String>,
    nodes: Option<usize>,
    matrix_rows: Vec<Vector>,
    in_matrix: bool,
    current_stream: Option<usize>,
    mu: Vec<Option<Vector>>,
    lambda: Vec<Option<Vector>>,
}

impl<R: Rng> Parser<'_, R> {
    fn directive(&mut self, line: usize, text: &str) -> Result<()> {
        let (keyword, rest) = match text.split_once(char::is_whitespace) {
            Some((k, r)) => (k, r.trim()),
            None => (text, ""),
        };

        match keyword {
            "network" => {
                self.in_matrix = false;
                if rest.is_empty() {
                    return Err(QnetError::parse(line, "network directive needs a name"));
                }
                self.name = Some(rest.to_string());
                Ok(())
            }
            "nodes" => {
                self.in_matrix = false;
                let count: usize = rest
                    .parse()
                    .map_err(|_| QnetError::parse(line, format!("invalid node count '{rest}'")))?;
                if count == 0 {
                    return Err(QnetError::parse(line, "node count must be positive"));
                }
                self.nodes = Some(count);
                Ok(())
            }
            "matrix" => {
                let nodes = self.nodes_declared(line)?;
                if !self.matrix_rows.is_empty() {
                    return Err(QnetError::parse(line, "matrix specified twice"));
                }
                self.in_matrix = true;
                debug!("reading {nodes} routing rows");
                Ok(())
            }
            "stream" => {
                self.in_matrix = false;
                let index: usize = rest.parse().map_err(|_| {
                    QnetError::parse(line, format!("invalid stream index '{rest}'"))
                })?;
                if index != self.mu.len() {
                    return Err(QnetError::parse(
                        line,
                        format!("stream indices must be consecutive, expected {}", self.mu.len()),
                    ));
                }
                self.current_stream = Some(index);
                self.mu.push(None);
                self.lambda.push(None);
                Ok(())
            }
            "mu" => {
                let nodes = self.nodes_declared(line)?;
                let stream = self.stream_open(line)?;
                let rates = self.parse_mu(line, rest, nodes)?;
                self.mu[stream] = Some(rates);
                Ok(())
            }
            "lambda" => {
                let nodes = self.nodes_declared(line)?;
                let stream = self.stream_open(line)?;
                let rates = self.parse_lambda(line, rest, nodes, stream)?;
                self.lambda[stream] = Some(rates);
                Ok(())
            }
            _ if self.in_matrix => self.matrix_row(line, text),
            _ => Err(QnetError::parse(
                line,
                format!("unknown directive '{keyword}'"),
            )),
        }
    }

    /// One routing row; `-` entries evenly share the mass the
    /// specified entries leave over.
    fn matrix_row(&mut self, line: usize, text: &str) -> Result<()> {
        let nodes = self.nodes_declared(line)?;
        if self.matrix_rows.len() == nodes {
            return Err(QnetError::parse(
                line,
                format!("matrix already has {nodes} rows"),
            ));
        }

        let entries: Vec<&str> = text.split(';').map(str::trim).collect();
        if entries.len() != nodes + 1 {
            return Err(QnetError::parse(
                line,
                format!(
                    "routing row needs {} entries (sink column first), got {}",
                    nodes + 1,
                    entries.len()
                ),
            ));
        }

        let mut specified_mass = 0.0;
        let mut unspecified = 0usize;
        for &entry in &entries {
            if entry == "-" {
                unspecified += 1;
            } else {
                specified_mass += parse_number(line, entry)?;
            }
        }
        let fill = if unspecified == 0 {
            0.0
        } else {
            (1.0 - specified_mass) / unspecified as f64
        };

        let row: Vector = entries
            .iter()
            .map(|&entry| {
                if entry == "-" {
                    Ok(fill)
                } else {
                    parse_number(line, entry)
                }
            })
            .collect::<Result<Vec<f64>>>()?
            .into();

        let sum = row.sum();
        if !sum.is_finite() || (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
            return Err(QnetError::parse(
                line,
                format!("routing row sums to {sum}, must be 1"),
            ));
        }

        self.matrix_rows.push(row);
        Ok(())
    }

    fn parse_mu(&self, line: usize, rest: &str, nodes: usize) -> Result<Vector> {
        if let Some(link) = rest.strip_prefix("ethernet") {
            let mut words = link.split_whitespace();
            let ethernet: EthernetType = words
                .next()
                .ok_or_else(|| QnetError::parse(line, "ethernet needs a type and frame length"))?
                .parse()
                .map_err(|message: String| QnetError::parse(line, message))?;
            let frame = match words.next() {
                Some("min") => MIN_FRAME_LENGTH,
                Some("max") => MAX_FRAME_LENGTH,
                Some(word) => word.parse().map_err(|_| {
                    QnetError::parse(line, format!("invalid frame length '{word}'"))
                })?,
                None => {
                    return Err(QnetError::parse(line, "ethernet needs a frame length"));
                }
            };
            let rate = link_capacity(ethernet, frame)?;
            return Ok(Vector::filled(nodes, rate));
        }

        parse_rates(line, rest, nodes)
    }

    fn parse_lambda(
        &mut self,
        line: usize,
        rest: &str,
        nodes: usize,
        stream: usize,
    ) -> Result<Vector> {
        if rest.eq_ignore_ascii_case("rand") {
            let mu = self.mu[stream].as_ref().ok_or_else(|| {
                QnetError::parse(line, "lambda rand requires mu earlier in the stream block")
            })?;
            let mut rates = Vector::zeros(nodes);
            for node in 0..nodes {
                let ceiling = mu[node].floor() as u64;
                if ceiling <= 1 {
                    return Err(QnetError::parse(
                        line,
                        format!("service rate {} at node {node} too small for lambda rand", mu[node]),
                    ));
                }
                rates[node] = self.rng.gen_range(1..ceiling) as f64;
            }
            return Ok(rates);
        }

        parse_rates(line, rest, nodes)
    }

    fn nodes_declared(&self, line: usize) -> Result<usize> {
        self.nodes
            .ok_or_else(|| QnetError::parse(line, "nodes count must be declared first"))
    }

    fn stream_open(&self, line: usize) -> Result<usize> {
        self.current_stream
            .ok_or_else(|| QnetError::parse(line, "no stream block open"))
    }

    fn finish(self, start_node: usize, target_node: usize) -> Result<NetworkSpec> {
        let nodes = self.nodes.ok_or_else(|| QnetError::parse(0, "missing nodes directive"))?;
        if self.matrix_rows.len() != nodes {
            return Err(QnetError::parse(
                0,
                format!("matrix has {} rows, expected {nodes}", self.matrix_rows.len()),
            ));
        }
        if self.mu.is_empty() {
            return Err(QnetError::parse(0, "at least one stream block required"));
        }

        let mut mu = Vec::with_capacity(self.mu.len());
        let mut lambda = Vec::with_capacity(self.lambda.len());
        for (stream, (m, l)) in self.mu.into_iter().zip(self.lambda).enumerate() {
            mu.push(m.ok_or_else(|| QnetError::parse(0, format!("stream {stream} missing mu")))?);
            lambda.push(
                l.ok_or_else(|| QnetError::parse(0, format!("stream {stream} missing lambda")))?,
            );
        }

        Ok(NetworkSpec {
            name: self.name.unwrap_or_else(|| "unnamed".to_string()),
            routing: Matrix::from_rows(self.matrix_rows)?,
            lambda,
            mu,
            start_node,
            target_node,
        })
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_number(line: usize, text: &str) -> Result<f64> {
    text.parse()
        .map_err(|_| QnetError::parse(line, format!("invalid number '{text}'")))
}

/// A `;`-separated per-node list, or a scalar applied to every node.
fn parse_rates(line: usize, text: &str, nodes: usize) -> Result<Vector> {
    if text.contains(';') {
        let rates: Vec<f64> = text
            .split(';')
            .map(|entry| parse_number(line, entry.trim()))
            .collect::<Result<_>>()?;
        if rates.len() != nodes {
            return Err(QnetError::parse(
                line,
                format!("expected {nodes} rates, got {}", rates.len()),
            ));
        }
        Ok(rates.into())
    } else {
        Ok(Vector::filled(nodes, parse_number(line, text)?))
    }
}
