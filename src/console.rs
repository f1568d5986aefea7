//! Console front end - drive the engine from stdin without a bot token
//!
//! `/cmd` is a command, `#ID` presses a menu button, anything else is text.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::engine::{ConversationEngine, ConversationHandler, InboundEvent, OutboundReply};
use crate::store::ChatIdentity;

/// Map one console line to an event; blank lines are skipped
pub fn parse_line(line: &str) -> Option<InboundEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match line.strip_prefix('#') {
        Some(id) => Some(InboundEvent::ButtonPress(id.trim().to_string())),
        None => Some(InboundEvent::from_text(line)),
    }
}

pub fn render_reply(reply: &OutboundReply) -> String {
    let mut out = reply.text.clone();
    if let Some(menu) = &reply.menu {
        out.push('\n');
        for row in &menu.rows {
            let line: Vec<String> = row
                .iter()
                .map(|button| format!("[#{}] {}", button.action.id(), button.label))
                .collect();
            out.push_str(&format!("\n{}", line.join("   ")));
        }
    }
    out
}

/// Read events until EOF, printing every reply
pub fn run_console(chat: ChatIdentity, input: impl BufRead, mut output: impl Write) -> Result<()> {
    let engine = ConversationEngine::new();
    writeln!(output, "Чат {}. Начни с /start, выход - Ctrl-D.", chat)?;

    for line in input.lines() {
        let Some(event) = parse_line(&line?) else {
            continue;
        };
        let reply = engine.handle(chat, event);
        writeln!(output, "{}\n", render_reply(&reply))?;
    }

    Ok(())
}
