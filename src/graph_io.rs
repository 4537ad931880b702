//! Readers for the graph formats accepted by the binary (edge lists, PACE `.gr` files and
//! sparse6) and writers for covers.

use std::io::{self, BufRead, Read, Write};
use std::path::Path;
use std::str::FromStr;
use fxhash::FxHashSet;
use crate::cust_error::{ImportError, ProcessingError};
use crate::graph::UGraph;

/// Supported input formats.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GraphFormat {
    /// One `u v` pair per line.
    EdgeList,
    /// PACE format: `p td <n> <m>` followed by `m` 1-based edges.
    Gr,
    /// The sparse6 encoding from nauty, starting with `:`.
    Sparse6,
}

impl GraphFormat {

    /// Guesses the format from the extension of `path`, defaulting to an edge list.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("gr") => GraphFormat::Gr,
            Some("s6") => GraphFormat::Sparse6,
            _ => GraphFormat::EdgeList,
        }
    }

    /// Reads a graph in this format from `input`.
    pub fn read<R: BufRead>(&self, input: R) -> Result<UGraph, ImportError> {
        match self {
            GraphFormat::EdgeList => UGraph::read_edge_list(input),
            GraphFormat::Gr => UGraph::read_gr(input),
            GraphFormat::Sparse6 => UGraph::read_sparse6(input),
        }
    }

}

impl FromStr for GraphFormat {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edges" | "edge-list" | "el" => Ok(GraphFormat::EdgeList),
            "gr" => Ok(GraphFormat::Gr),
            "s6" | "sparse6" => Ok(GraphFormat::Sparse6),
            _ => Err(ProcessingError::InvalidParameter(format!("unknown graph format `{}`", s))),
        }
    }
}

impl UGraph {

    /// Reads an edge list. Empty lines and lines starting with `#` or `%` are skipped, tokens
    /// after the first two of a line are ignored and self-loops are discarded.
    pub fn read_edge_list<R: BufRead>(input: R) -> Result<Self, ImportError> {
        let mut graph = UGraph::new();
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
                continue
            }
            let mut s = line.split_whitespace();
            let src: usize = s.next().ok_or(ImportError::InputMalformedError)?.parse()?;
            let trg: usize = s.next().ok_or(ImportError::InputMalformedError)?.parse()?;
            if src == trg {
                graph.add_vertex(src);
            } else {
                graph.add_edge(src, trg);
            }
        }
        Ok(graph)
    }

    /// Reads a `.gr` input and creates a `UGraph` on the nodes `0..n`.
    pub fn read_gr<R: BufRead>(gr: R) -> Result<Self, ImportError> {
        let (lines, _): (Vec<_>, Vec<_>) = gr.lines()
            .partition(|l| {
                if let Ok(line) = l {
                    // ignore empty lines and comment lines
                    !line.starts_with('c') && !line.trim().is_empty()
                } else {
                    true
                }
            });
        let mut lines = lines.into_iter();
        // p td <n> <m>
        let (n, m) = {
            let line = lines.next().ok_or(ImportError::InputMalformedError)??;
            let mut s = line.split_whitespace();
            if let Some("p") = s.next() {} else { return Err(ImportError::InputMalformedError); }
            if s.next().is_none() { return Err(ImportError::InputMalformedError); }
            let n: usize = s.next().ok_or(ImportError::InputMalformedError)?.parse()?;
            let m: usize = s.next().ok_or(ImportError::InputMalformedError)?.parse()?;
            if s.next().is_some() { return Err(ImportError::InputMalformedError); }
            (n, m)
        };
        let mut graph = UGraph::new();
        for node in 0..n {
            graph.add_vertex(node);
        }
        let mut num_edges = 0;
        for line in lines {
            // <src> <trg>
            let line = line?;
            let mut s = line.split_whitespace();
            let src = s.next().ok_or(ImportError::InputMalformedError)?.parse::<usize>()?;
            let trg = s.next().ok_or(ImportError::InputMalformedError)?.parse::<usize>()?;
            if s.next().is_some() { return Err(ImportError::InputMalformedError); }
            if src == 0 || trg == 0 || src > n || trg > n {
                return Err(ImportError::InputMalformedError);
            }
            graph.add_edge(src - 1, trg - 1);
            num_edges += 1;
        }
        if num_edges != m { return Err(ImportError::InputMalformedError); }
        Ok(graph)
    }

    /// Reads a single sparse6 graph on the nodes `0..n`.
    pub fn read_sparse6<R: Read>(mut input: R) -> Result<Self, ImportError> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        while let Some(last) = bytes.last() {
            if last.is_ascii_whitespace() {
                bytes.pop();
            } else {
                break
            }
        }
        let mut data = bytes.as_slice();
        if let Some(b':') = data.first() {
            data = &data[1..];
        } else {
            return Err(ImportError::Sparse6Error("missing `:` prefix".to_owned()));
        }
        if data.iter().any(|b| *b < 63 || *b > 126) {
            return Err(ImportError::Sparse6Error("byte outside of printable range".to_owned()));
        }
        let (n, header) = sparse6_size(data)?;
        data = &data[header..];

        let mut graph = UGraph::new();
        for node in 0..n {
            graph.add_vertex(node);
        }
        let k = bits_for(n);
        let mut bits = BitReader::new(data);
        let mut v = 0;
        while let Some(b) = bits.take(1) {
            let x = match bits.take(k) {
                Some(x) => x,
                None => break,
            };
            if b == 1 {
                v += 1;
            }
            if x >= n || v >= n {
                break
            } else if x > v {
                v = x;
            } else {
                graph.add_edge(x, v);
            }
        }
        Ok(graph)
    }

}

/// Decodes the `N(n)` header. Returns `n` and the number of consumed bytes.
fn sparse6_size(data: &[u8]) -> Result<(usize, usize), ImportError> {
    let digit = |i: usize| -> Result<usize, ImportError> {
        data.get(i)
            .map(|b| (*b - 63) as usize)
            .ok_or_else(|| ImportError::Sparse6Error("truncated header".to_owned()))
    };
    if digit(0)? < 63 {
        return Ok((digit(0)?, 1))
    }
    if digit(1)? < 63 {
        let n = (digit(1)? << 12) + (digit(2)? << 6) + digit(3)?;
        return Ok((n, 4))
    }
    let mut n = 0;
    for i in 2..8 {
        n = (n << 6) + digit(i)?;
    }
    Ok((n, 8))
}

/// Smallest `k` with `2^k >= n`.
fn bits_for(n: usize) -> usize {
    let mut k = 0;
    while (1usize << k) < n {
        k += 1;
    }
    k
}

/// Reads big-endian bit groups out of sparse6 bytes, six bits per byte.
struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
    buffer: usize,
    available: usize,
}

impl<'a> BitReader<'a> {

    fn new(data: &'a [u8]) -> Self {
        BitReader { data, position: 0, buffer: 0, available: 0 }
    }

    /// Takes the next `k` bits, or `None` if the input runs out.
    fn take(&mut self, k: usize) -> Option<usize> {
        while self.available < k {
            let byte = *self.data.get(self.position)?;
            self.position += 1;
            self.buffer = (self.buffer << 6) | (byte - 63) as usize;
            self.available += 6;
        }
        self.available -= k;
        let value = self.buffer >> self.available;
        self.buffer &= (1 << self.available) - 1;
        Some(value)
    }

}

/// Reads a prescribed octset, one vertex id per line.
pub fn read_octset<R: BufRead>(input: R) -> Result<FxHashSet<usize>, ImportError> {
    let mut octset = FxHashSet::default();
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue
        }
        octset.insert(line.parse()?);
    }
    Ok(octset)
}

/// Writes a cover to a `Write` type, one vertex per line in increasing order.
pub fn write_cover<W: Write>(cover: &FxHashSet<usize>, mut out: W) -> Result<(), io::Error> {
    let mut nodes: Vec<_> = cover.iter().copied().collect();
    nodes.sort_unstable();
    for node in nodes {
        writeln!(out, "{}", node)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_gr_test() {
        let gr = Cursor::new("c comment\np td 7 9\n1 2\n1 3\n2 3\n4 5\n4 6\n4 7\n5 6\n5 7\n6 7\n");
        let graph = UGraph::read_gr(gr);
        assert!(graph.is_ok());
        let graph = graph.unwrap();
        assert_eq!(graph.num_nodes(), 7);
        assert_eq!(graph.num_edges(), 9);
        assert!(graph.adjacent(0, 2));
    }

    #[test]
    fn read_gr_bad_count_test() {
        let gr = Cursor::new("p td 3 3\n1 2\n2 3\n");
        assert!(UGraph::read_gr(gr).is_err());
    }

    #[test]
    fn read_edge_list_test() {
        let el = Cursor::new("# header\n1 2\n2 3 0.5\n\n3 3\n3 1\n");
        let graph = UGraph::read_edge_list(el).unwrap();
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_edges(), 3);
        assert!(UGraph::read_edge_list(Cursor::new("1\n")).is_err());
        assert!(UGraph::read_edge_list(Cursor::new("a b\n")).is_err());
    }

    #[test]
    fn read_sparse6_test() {
        // Example from the nauty format description: 7 nodes, edges 0-1 0-2 1-2 5-6.
        let s6 = Cursor::new(":Fa@x^\n");
        let graph = UGraph::read_sparse6(s6).unwrap();
        assert_eq!(graph.num_nodes(), 7);
        assert_eq!(graph.num_edges(), 4);
        assert!(graph.adjacent(0, 1));
        assert!(graph.adjacent(0, 2));
        assert!(graph.adjacent(1, 2));
        assert!(graph.adjacent(5, 6));
        assert!(UGraph::read_sparse6(Cursor::new("Fa@x^")).is_err());
    }

    #[test]
    fn octset_and_cover_io_test() {
        let octset = read_octset(Cursor::new("3\n\n1\n")).unwrap();
        assert_eq!(octset, vec![1, 3].into_iter().collect());
        let mut out = Vec::new();
        write_cover(&octset, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n3\n");
        assert_eq!("s6".parse::<GraphFormat>(), Ok(GraphFormat::Sparse6));
        assert!("xml".parse::<GraphFormat>().is_err());
    }

}
