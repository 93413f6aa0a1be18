//! Line-oriented interaction loop.
//!
//! Reads one question per line, answers from the engine, and keeps going
//! until an exit keyword or end of input. A provider failure is reported on
//! its own line and the loop continues; it never masquerades as "no match".

use std::io::{BufRead, Write};

use tracing::error;

use trafficlaw_ai::EmbeddingProvider;
use trafficlaw_query::QueryEngine;

use crate::display::{NO_MATCH_MESSAGE, SEPARATOR, format_answer};

pub const BANNER: &str = "Chatbot Giao Thông Việt Nam (gõ 'exit' để thoát)";
pub const PROMPT: &str = "Bạn hỏi: ";
pub const FAREWELL: &str = "Tạm biệt!";

const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "thoát"];

/// Run the loop to completion. Exit keyword and end of input both end it
/// normally.
pub fn run<P, R, W>(engine: &mut QueryEngine<P>, input: R, output: &mut W) -> anyhow::Result<()>
where
    P: EmbeddingProvider,
    R: BufRead,
    W: Write,
{
    writeln!(output, "{BANNER}")?;
    writeln!(output)?;

    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let question = line.trim();

        if EXIT_KEYWORDS.contains(&question.to_lowercase().as_str()) {
            break;
        }

        match engine.find_violation(question) {
            Ok(Some(record)) => {
                write!(output, "{}", format_answer(record))?;
            }
            Ok(None) => {
                writeln!(output, "{NO_MATCH_MESSAGE}")?;
            }
            Err(err) => {
                error!(%err, "query failed");
                writeln!(output, "Lỗi truy vấn: {err}")?;
            }
        }
        writeln!(output, "{SEPARATOR}")?;
    }

    writeln!(output, "{FAREWELL}")?;
    Ok(())
}
