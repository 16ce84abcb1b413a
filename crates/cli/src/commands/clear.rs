// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, BufRead, Write};

use kiosk_core::{Area, LocalStore, RecordKind};

use super::Context;
use crate::error::{Error, Result};

pub fn run(ctx: &Context, kind: RecordKind, demo: bool, yes: bool) -> Result<()> {
    let mut store = ctx.open_store()?;
    let area = if demo { Area::Demo } else { Area::Pending };
    let place = if demo { "demo records" } else { "pending sync" };

    let count = store.count(area, kind)?;
    if count == 0 {
        println!("No {} in {}", kind.plural(), place);
        return Ok(());
    }
    if !yes {
        let prompt = format!("Discard {} {} from {}? [y/N] ", count, kind.plural(), place);
        if !confirm(&prompt, &mut io::stdin().lock())? {
            return Err(Error::Cancelled);
        }
    }

    let cleared = run_impl(&mut store, area, kind)?;
    println!("Cleared {} {}", cleared, kind.plural());
    Ok(())
}

/// Empties one queue; returns how many records were dropped.
pub(crate) fn run_impl(store: &mut LocalStore, area: Area, kind: RecordKind) -> Result<usize> {
    let count = store.count(area, kind)?;
    store.save(area, kind, &[])?;
    tracing::warn!(kind = kind.as_str(), ?area, count, "local records discarded");
    Ok(count)
}

pub(crate) fn confirm(prompt: &str, input: &mut impl BufRead) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
