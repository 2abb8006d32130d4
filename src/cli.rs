//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim: configuration
//! layering, input parsing, the one-shot `find`/`inspect` commands and the
//! interactive loop.

use anyhow::Result;
use gfprim::config::{parse_modulus, SearchConfig};
use gfprim::report::{FieldInfo, Report};
use gfprim::{run_query, FieldError, PrimitiveElementSet};
use rug::Integer;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

use super::Cli;

/// Prompt printed before every line read by `repl`.
pub const PROMPT: &str = "Enter a prime number or a prime power (\"quit\" to exit): ";

// ── Configuration ───────────────────────────────────────────────

/// Defaults, then the TOML file, then env/CLI overrides.
pub fn resolve_config(cli: &Cli, first: bool, modulus: Option<&str>) -> Result<SearchConfig> {
    let mut config = match &cli.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };
    if let Some(max_order) = cli.max_order {
        config.max_order = max_order;
    }
    if let Some(mr_rounds) = cli.mr_rounds {
        config.mr_rounds = mr_rounds;
    }
    if let Some(check) = cli.check {
        config.check = check;
    }
    if first {
        config.first_only = true;
    }
    if let Some(m) = modulus {
        config.modulus = Some(parse_modulus(m)?);
    }
    config.validate()?;
    debug!(?config, "configuration resolved");
    Ok(config)
}

// ── Commands ────────────────────────────────────────────────────

/// Parse a field order as typed by the user.
pub fn parse_order(input: &str) -> Result<Integer, FieldError> {
    input
        .trim()
        .parse::<Integer>()
        .map_err(|_| FieldError::InvalidInput {
            input: input.trim().to_string(),
        })
}

fn render(set: &PrimitiveElementSet, json: bool) -> Result<String> {
    let report = Report::from_set(set);
    if json {
        Ok(report.to_json()? + "\n")
    } else {
        Ok(report.to_text())
    }
}

pub fn run_find(n: &str, config: &SearchConfig, json: bool) -> Result<()> {
    let n = parse_order(n)?;
    let set = run_query(&n, config)?;
    print!("{}", render(&set, json)?);
    Ok(())
}

pub fn run_inspect(n: &str, config: &SearchConfig, json: bool) -> Result<()> {
    let n = parse_order(n)?;
    let info = FieldInfo::inspect(&n, config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print!("{}", info.to_text());
    }
    Ok(())
}

pub fn run_repl(config: &SearchConfig, json: bool) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    repl(stdin.lock(), stdout.lock(), config, json)
}

/// Interactive loop: one query per line until `quit`, `exit` or EOF.
/// Failed queries are reported and the loop continues.
fn repl<R: BufRead, W: Write>(
    input: R,
    mut out: W,
    config: &SearchConfig,
    json: bool,
) -> Result<()> {
    write!(out, "{}", PROMPT)?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }
        if !trimmed.is_empty() {
            match trimmed.parse::<Integer>() {
                Err(_) => writeln!(out, "invalid input: expected an integer or \"quit\"")?,
                Ok(n) => match run_query(&n, config) {
                    Ok(set) => write!(out, "{}", render(&set, json)?)?,
                    Err(e) => {
                        warn!(input = trimmed, error = %e, "query failed");
                        writeln!(out, "{}", e)?;
                    }
                },
            }
        }
        write!(out, "{}", PROMPT)?;
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session(input: &str, config: &SearchConfig) -> String {
        let mut out = Vec::new();
        repl(Cursor::new(input), &mut out, config, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_order_accepts_integers() {
        assert_eq!(parse_order(" 49 ").unwrap(), 49);
        assert_eq!(parse_order("-3").unwrap(), -3);
    }

    #[test]
    fn parse_order_rejects_text() {
        assert!(matches!(
            parse_order("seven"),
            Err(FieldError::InvalidInput { .. })
        ));
        assert!(matches!(parse_order(""), Err(FieldError::InvalidInput { .. })));
    }

    #[test]
    fn repl_answers_until_quit() {
        let out = session("5\n9\nquit\n7\n", &SearchConfig::default());
        assert!(out.contains("Found 2 primitive elements in GF(5):\n2\n3\n"));
        assert!(out.contains("Found 4 primitive elements in GF(3^2):"));
        assert!(!out.contains("GF(7)"), "input after quit must be ignored");
        assert_eq!(out.matches(PROMPT).count(), 3);
    }

    #[test]
    fn repl_recovers_from_bad_input() {
        let out = session("abc\n12\n1\n\n7\n", &SearchConfig::default());
        assert!(out.contains("invalid input: expected an integer or \"quit\""));
        assert!(out.contains("must be a prime number or a prime power"));
        assert!(out.contains("invalid input \"1\""));
        assert!(out.contains("Found 2 primitive elements in GF(7):\n3\n5\n"));
    }

    #[test]
    fn repl_stops_at_eof_and_exit() {
        let out = session("", &SearchConfig::default());
        assert_eq!(out, PROMPT);
        let out = session("EXIT\n5\n", &SearchConfig::default());
        assert!(!out.contains("GF(5)"));
    }

    #[test]
    fn repl_reports_too_large_fields() {
        let config = SearchConfig {
            max_order: 10,
            ..SearchConfig::default()
        };
        let out = session("11\n", &config);
        assert!(out.contains("exceeds the search limit of 10"));
    }

    #[test]
    fn repl_first_only() {
        let config = SearchConfig {
            first_only: true,
            ..SearchConfig::default()
        };
        let out = session("41\nquit\n", &config);
        assert!(out.contains("Primitive element in GF(41): 6\n"));
    }
}
