//! Line-oriented command shell
//!
//! Parses one text command per line and runs it against a [`Db`]. Used by the
//! `memdb` binary; kept here so it can be exercised without stdin.
//!
//! Syntax:
//! - `set key value`, `get key`, `has key`, `del key`
//! - `scan [start] [end]`, `rscan [start] [end]` (`-` leaves a bound open)
//! - `batch set k v ; del k ; ...`
//! - `stats`, `quit`

use crate::db::Db;
use crate::error::Error;
use bytes::Bytes;
use tracing::debug;

/// Outcome of one shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Lines to print
    Lines(Vec<String>),

    /// Stop reading input
    Quit,
}

impl Reply {
    fn line(s: impl Into<String>) -> Self {
        Reply::Lines(vec![s.into()])
    }

    fn ok() -> Self {
        Reply::line("OK")
    }
}

/// Execute a single command line
///
/// Malformed commands produce an `ERR ...` reply; only database errors are
/// returned as `Err`.
pub fn execute(db: &dyn Db, line: &str) -> Result<Reply, Error> {
    let args: Vec<&str> = line.split_whitespace().collect();
    let Some((command, args)) = args.split_first() else {
        return Ok(Reply::Lines(Vec::new()));
    };
    let command = command.to_lowercase();
    debug!(command = %command, args = args.len(), "executing shell command");

    match (command.as_str(), args) {
        ("set", [key, value]) => {
            db.set(key.as_bytes(), value.as_bytes())?;
            Ok(Reply::ok())
        }
        ("get", [key]) => match db.get(key.as_bytes())? {
            Some(value) => Ok(Reply::line(display(&value))),
            None => Ok(Reply::line("(nil)")),
        },
        ("has", [key]) => {
            let found = db.has(key.as_bytes())?;
            Ok(Reply::line(if found { "1" } else { "0" }))
        }
        ("del", [key]) => {
            db.delete(key.as_bytes())?;
            Ok(Reply::ok())
        }
        ("scan" | "rscan", bounds) if bounds.len() <= 2 => {
            let start = bounds.first().and_then(|b| bound(b));
            let end = bounds.get(1).and_then(|b| bound(b));
            scan(db, start, end, command == "rscan")
        }
        ("batch", _) => {
            let rest = line.trim_start()[command.len()..].trim();
            run_batch(db, rest)
        }
        ("stats", []) => {
            let stats = db.stats();
            let json = serde_json::to_string(&stats)
                .unwrap_or_else(|e| format!("ERR {}", e));
            Ok(Reply::line(json))
        }
        ("quit" | "exit", []) => Ok(Reply::Quit),
        ("set" | "get" | "has" | "del" | "scan" | "rscan" | "stats" | "quit" | "exit", _) => Ok(
            Reply::line(format!("ERR wrong number of arguments for '{}' command", command)),
        ),
        _ => Ok(Reply::line(format!("ERR unknown command '{}'", command))),
    }
}

/// `-` stands for an open bound
fn bound(arg: &str) -> Option<&[u8]> {
    if arg == "-" {
        None
    } else {
        Some(arg.as_bytes())
    }
}

fn display(bytes: &Bytes) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn scan(
    db: &dyn Db,
    start: Option<&[u8]>,
    end: Option<&[u8]>,
    reverse: bool,
) -> Result<Reply, Error> {
    let mut itr = if reverse {
        db.reverse_iterator(start, end)?
    } else {
        db.iterator(start, end)?
    };

    let mut lines = Vec::new();
    while itr.valid() {
        lines.push(format!("{}={}", display(&itr.key()), display(&itr.value())));
        itr.next();
    }
    let result = itr.error();
    itr.close();
    result?;

    if lines.is_empty() {
        lines.push("(empty)".to_string());
    }
    Ok(Reply::Lines(lines))
}

fn run_batch(db: &dyn Db, ops: &str) -> Result<Reply, Error> {
    let mut batch = db.new_batch();
    let mut count = 0;

    for op in ops.split(';').map(str::trim).filter(|op| !op.is_empty()) {
        let args: Vec<&str> = op.split_whitespace().collect();
        match args.as_slice() {
            [cmd, key, value] if cmd.eq_ignore_ascii_case("set") => {
                batch.set(key.as_bytes(), value.as_bytes())
            }
            [cmd, key] if cmd.eq_ignore_ascii_case("del") => batch.delete(key.as_bytes()),
            _ => {
                batch.close();
                return Ok(Reply::line(format!("ERR invalid batch operation '{}'", op)));
            }
        }
        count += 1;
    }

    batch.write()?;
    Ok(Reply::line(format!("OK ({} ops)", count)))
}
