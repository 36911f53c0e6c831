use crate::curve::Day;
use crate::store::{EnvelopeId, EnvelopeSet};
use std::fmt::Write;

/// Audit breakdown of one envelope at `day`: every entry with its source
/// event, activation day and value, then the total.
pub fn format_breakdown(set: &EnvelopeSet, envelope: &str, day: Day) -> String {
    let mut output = String::new();
    let Some(id) = set.id(envelope) else {
        let _ = writeln!(output, "Error: Unknown envelope '{}'", envelope);
        return output;
    };

    let _ = writeln!(output, "AUDIT TRACE for envelope '{}' at day {}:", envelope, day);
    let _ = writeln!(output, "--------------------------------------------------");
    write_entries(&mut output, set, id, day);
    output
}

/// Breakdown of every envelope followed by net worth.
pub fn format_all(set: &EnvelopeSet, day: Day) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "NET WORTH at day {}: [{:.2}]", day, set.total_at(day));
    for id in set.ids() {
        let _ = writeln!(output, "|");
        let _ = writeln!(output, "|-- {} [{:.2}]", set.name(id), set.balance_at(id, day));
        let mut block = String::new();
        write_entries(&mut block, set, id, day);
        for line in block.lines() {
            let _ = writeln!(output, "|   {}", line);
        }
    }
    output
}

fn write_entries(output: &mut String, set: &EnvelopeSet, id: EnvelopeId, day: Day) {
    let entries = set.entries(id);
    if entries.is_empty() {
        let _ = writeln!(output, "`-- (no entries)");
        return;
    }

    for entry in entries {
        let value = entry.curve.eval(day);
        // Entries not yet active at `day` are listed but flagged.
        let status = if day < entry.active_from { " (pending)" } else { "" };
        let _ = writeln!(
            output,
            "|-- event {} {} from day {} [{:.2}]{}",
            entry.source, entry.label, entry.active_from, value, status
        );
    }
    if let Some(corrected_at) = set.correction_day(id) {
        let _ = writeln!(output, "|   corrected at day {}", corrected_at);
    }
    let _ = writeln!(output, "`-- Total: {:.2}", set.balance_at(id, day));
}
