use anyhow::Context;
use std::io::{BufRead, Write};
use tradecheck_core::error::InvalidUserInput;

/// Writes `label`, then reads one trimmed line. A closed input stream counts as missing input.
pub fn ask<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    field: &'static str,
) -> anyhow::Result<String> {
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    let n = input
        .read_line(&mut line)
        .with_context(|| format!("failed to read {field}"))?;
    if n == 0 {
        return Err(InvalidUserInput::Missing { field }.into());
    }
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_trimmed_line_after_label() {
        let mut input = Cursor::new("  tsla \nignored\n");
        let mut out = Vec::new();
        let got = ask(&mut input, &mut out, "Ticker: ", "ticker").unwrap();
        assert_eq!(got, "tsla");
        assert_eq!(String::from_utf8(out).unwrap(), "Ticker: ");
    }

    #[test]
    fn eof_is_missing_input() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        let err = ask(&mut input, &mut out, "Target: ", "target price").unwrap_err();
        assert_eq!(
            err.downcast_ref::<InvalidUserInput>(),
            Some(&InvalidUserInput::Missing {
                field: "target price"
            })
        );
    }
}
