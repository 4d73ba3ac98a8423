//! Matrix I/O: the plain-text exchange format shared with the artifact under test.
//!
//! ```text
//! <rows> <cols>
//! <re_00> <im_00> <re_01> <im_01> ...
//! ...
//! ```
//!
//! The same format is used for the input file handed to the artifact and for
//! the artifact's stdout, so reading and writing are symmetric.

use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use dft_core::{Complex32, ComplexMatrix, FormatError, Result, Shape};
use tracing::{debug, warn};

/// Display adapter rendering a matrix in exchange format.
///
/// Values use the shortest decimal representation that parses back to the
/// same `f32`, so a write/parse cycle is lossless.
pub struct Exchange<'a>(pub &'a ComplexMatrix);

impl fmt::Display for Exchange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        writeln!(f, "{} {}", m.rows(), m.cols())?;
        for row in 0..m.rows() {
            for (col, v) in m.row(row).iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{} {}", v.re, v.im)?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Serialize a matrix to exchange-format text.
pub fn to_exchange_string(m: &ComplexMatrix) -> String {
    Exchange(m).to_string()
}

/// Write a matrix in exchange format.
pub fn write_matrix<W: Write>(w: &mut W, m: &ComplexMatrix) -> std::io::Result<()> {
    write!(w, "{}", Exchange(m))
}

/// Write a matrix to `path`, replacing any existing file.
pub fn write_matrix_file(path: &Path, m: &ComplexMatrix) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut w = BufWriter::new(file);
    write_matrix(&mut w, m)?;
    w.flush()?;
    debug!(path = %path.display(), shape = %m.shape(), "wrote exchange file");
    Ok(())
}

/// Read an exchange-format file.
pub fn read_matrix_file(path: &Path) -> Result<ComplexMatrix> {
    let text = fs::read_to_string(path)?;
    parse_matrix(&text)
}

/// Parse exchange-format text into a matrix.
///
/// Leading blank lines are skipped. Extra tokens on a row and trailing lines
/// after the last row are ignored with a warning.
pub fn parse_matrix(text: &str) -> Result<ComplexMatrix> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .skip_while(|(_, l)| l.trim().is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| FormatError::MissingHeader.at_line(1))?;
    let shape = parse_header(header).map_err(|k| k.at_line(header_line))?;

    // The header is untrusted: every value takes at least two bytes of text.
    let mut data = Vec::with_capacity(shape.numel().min(text.len() / 4));
    let mut last_line = header_line;
    for row in 0..shape.rows() {
        let (line_no, line) = lines.next().ok_or_else(|| {
            FormatError::MissingRow {
                expected: shape.rows(),
                found: row,
            }
            .at_line(last_line + 1)
        })?;
        last_line = line_no;
        parse_row(line, shape.cols(), &mut data).map_err(|k| k.at_line(line_no))?;
    }

    let trailing = lines.filter(|(_, l)| !l.trim().is_empty()).count();
    if trailing > 0 {
        warn!(trailing, after_line = last_line, "ignoring lines after last matrix row");
    }

    ComplexMatrix::from_vec(shape, data)
}

fn parse_header(line: &str) -> std::result::Result<Shape, FormatError> {
    let bad = || FormatError::BadHeader {
        found: line.trim().to_string(),
    };
    let mut tokens = line.split_whitespace();
    let (Some(r), Some(c), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(bad());
    };
    let rows: usize = r.parse().map_err(|_| bad())?;
    let cols: usize = c.parse().map_err(|_| bad())?;
    if rows == 0 || cols == 0 {
        return Err(FormatError::ZeroDimension { rows, cols });
    }
    Shape::new(rows, cols).map_err(|_| bad())
}

fn parse_row(
    line: &str,
    cols: usize,
    out: &mut Vec<Complex32>,
) -> std::result::Result<(), FormatError> {
    let expected = cols.saturating_mul(2);
    let short = || FormatError::TokenCount {
        expected,
        found: line.split_whitespace().count(),
    };
    let mut tokens = line.split_whitespace();
    for _ in 0..cols {
        let re = parse_number(tokens.next().ok_or_else(short)?)?;
        let im = parse_number(tokens.next().ok_or_else(short)?)?;
        out.push(Complex32::new(re, im));
    }
    let extra = tokens.count();
    if extra > 0 {
        warn!(expected, extra, "ignoring extra tokens on matrix row");
    }
    Ok(())
}

fn parse_number(token: &str) -> std::result::Result<f32, FormatError> {
    token.parse::<f32>().map_err(|_| FormatError::BadNumber {
        token: token.to_string(),
    })
}
