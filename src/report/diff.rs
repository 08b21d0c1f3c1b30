//! Sentence chunking and unified diff generation.
//!
//! The diff is taken over *sentences*, not lines — captured selections are
//! usually a single paragraph, and a per-sentence diff shows exactly which
//! sentences the correction touched. Output follows the unified format:
//!
//! ```text
//! --- original
//! +++ corrected
//! @@ -1 +1 @@
//! -Their going to the store.
//! +They're going to the store.
//! ```

// ---------------------------------------------------------------------------
// Sentence chunking
// ---------------------------------------------------------------------------

/// Split `text` into trimmed sentence chunks.
///
/// A sentence ends at `.`, `!` or `?` when followed by whitespace (or the end
/// of the text). Runs of terminators (`...`, `?!`) stay inside one chunk.
/// Empty chunks are dropped.
pub fn chunk_sentences(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        let at_boundary = matches!(c, '.' | '!' | '?')
            && chars.peek().map_or(true, |next| next.is_whitespace());
        if at_boundary {
            push_trimmed(&mut chunks, &current);
            current.clear();
        }
    }
    push_trimmed(&mut chunks, &current);

    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

// ---------------------------------------------------------------------------
// Unified diff
// ---------------------------------------------------------------------------

/// Edit operations, in order from the start of both sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EditOp {
    Equal(usize, usize), // old_idx, new_idx
    Delete(usize),       // old_idx
    Insert(usize),       // new_idx
}

/// Generate unified-diff lines between two chunk sequences.
///
/// `context` controls how many unchanged chunks surround each change.
/// Returns an empty vec when the sequences are identical; otherwise the first
/// two lines are the `--- original` / `+++ corrected` headers.
pub fn unified_diff(old: &[String], new: &[String], context: usize) -> Vec<String> {
    if old == new {
        return Vec::new();
    }

    let ops = compute_edit_ops(old, new);
    let changes: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| !matches!(op, EditOp::Equal(..)))
        .map(|(i, _)| i)
        .collect();
    if changes.is_empty() {
        return Vec::new();
    }

    // Positions into old/new reached *before* each op, plus one final entry
    // for the end of both sequences.
    let mut old_pos = Vec::with_capacity(ops.len() + 1);
    let mut new_pos = Vec::with_capacity(ops.len() + 1);
    let (mut o, mut n) = (0usize, 0usize);
    for op in &ops {
        old_pos.push(o);
        new_pos.push(n);
        match op {
            EditOp::Equal(..) => {
                o += 1;
                n += 1;
            }
            EditOp::Delete(_) => o += 1,
            EditOp::Insert(_) => n += 1,
        }
    }
    old_pos.push(o);
    new_pos.push(n);

    // Group nearby changes into hunks: each change claims ±context ops, and
    // overlapping claims merge.
    let mut hunks: Vec<(usize, usize)> = Vec::new();
    for &c in &changes {
        let start = c.saturating_sub(context);
        let end = (c + context + 1).min(ops.len());
        match hunks.last_mut() {
            Some((_, prev_end)) if start <= *prev_end => *prev_end = end,
            _ => hunks.push((start, end)),
        }
    }

    let mut lines = vec!["--- original".to_string(), "+++ corrected".to_string()];
    for (start, end) in hunks {
        let old_count = old_pos[end] - old_pos[start];
        let new_count = new_pos[end] - new_pos[start];
        lines.push(format!(
            "@@ -{} +{} @@",
            format_range(old_pos[start], old_count),
            format_range(new_pos[start], new_count)
        ));
        for op in &ops[start..end] {
            match op {
                EditOp::Equal(i, _) => lines.push(format!(" {}", old[*i])),
                EditOp::Delete(i) => lines.push(format!("-{}", old[*i])),
                EditOp::Insert(j) => lines.push(format!("+{}", new[*j])),
            }
        }
    }
    lines
}

/// Unified-format range: 1-based start, count elided when 1, and the
/// zero-count form anchored to the preceding line.
fn format_range(start: usize, count: usize) -> String {
    match count {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, count),
    }
}

/// Compute edit operations via an LCS table and backtrack.
fn compute_edit_ops(old: &[String], new: &[String]) -> Vec<EditOp> {
    let old_len = old.len();
    let new_len = new.len();

    let mut dp = vec![vec![0u32; new_len + 1]; old_len + 1];
    for (i, old_chunk) in old.iter().enumerate() {
        for (j, new_chunk) in new.iter().enumerate() {
            dp[i + 1][j + 1] = if old_chunk == new_chunk {
                dp[i][j] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let mut ops = Vec::new();
    let mut i = old_len;
    let mut j = new_len;
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1] == new[j - 1] {
            ops.push(EditOp::Equal(i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i][j - 1] >= dp[i - 1][j]) {
            ops.push(EditOp::Insert(j - 1));
            j -= 1;
        } else {
            ops.push(EditOp::Delete(i - 1));
            i -= 1;
        }
    }
    ops.reverse();
    ops
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ---- chunk_sentences ---

    #[test]
    fn chunks_split_after_terminators() {
        let got = chunk_sentences("First one. Second one! Third one?");
        assert_eq!(got, vec!["First one.", "Second one!", "Third one?"]);
    }

    #[test]
    fn trailing_text_without_terminator_is_kept() {
        let got = chunk_sentences("Done here. still typing");
        assert_eq!(got, vec!["Done here.", "still typing"]);
    }

    #[test]
    fn abbreviation_dots_inside_words_do_not_split() {
        // Only a terminator followed by whitespace closes a chunk.
        let got = chunk_sentences("See e.g.the docs. Fin.");
        assert_eq!(got, vec!["See e.g.the docs.", "Fin."]);
    }

    #[test]
    fn empty_and_whitespace_inputs_yield_nothing() {
        assert!(chunk_sentences("").is_empty());
        assert!(chunk_sentences("   \n  ").is_empty());
    }

    #[test]
    fn ellipsis_stays_in_one_chunk() {
        let got = chunk_sentences("Well... maybe. Sure.");
        assert_eq!(got, vec!["Well...", "maybe.", "Sure."]);
    }

    // ---- unified_diff ---

    #[test]
    fn identical_sequences_produce_no_diff() {
        let old = chunks(&["Same.", "Thing."]);
        assert!(unified_diff(&old, &old, 3).is_empty());
    }

    #[test]
    fn single_replacement_shows_removed_added_pair() {
        let old = chunks(&["Their going to the store."]);
        let new = chunks(&["They're going to the store."]);

        let lines = unified_diff(&old, &new, 3);
        assert_eq!(lines[0], "--- original");
        assert_eq!(lines[1], "+++ corrected");
        assert_eq!(lines[2], "@@ -1 +1 @@");
        assert_eq!(lines[3], "-Their going to the store.");
        assert_eq!(lines[4], "+They're going to the store.");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn unchanged_sentences_appear_as_context() {
        let old = chunks(&["Keep me.", "Fix me bad.", "Keep me too."]);
        let new = chunks(&["Keep me.", "Fixed me well.", "Keep me too."]);

        let lines = unified_diff(&old, &new, 3);
        assert!(lines.contains(&" Keep me.".to_string()));
        assert!(lines.contains(&"-Fix me bad.".to_string()));
        assert!(lines.contains(&"+Fixed me well.".to_string()));
        assert!(lines.contains(&" Keep me too.".to_string()));
    }

    #[test]
    fn distant_changes_split_into_two_hunks() {
        let mut old: Vec<String> = (0..12).map(|i| format!("Line {i}.")).collect();
        let mut new = old.clone();
        old[0] = "Old start.".into();
        new[0] = "New start.".into();
        old[11] = "Old end.".into();
        new[11] = "New end.".into();

        let lines = unified_diff(&old, &new, 1);
        let hunk_headers = lines.iter().filter(|l| l.starts_with("@@")).count();
        assert_eq!(hunk_headers, 2);
    }

    #[test]
    fn pure_insertion_has_zero_count_range() {
        let old = chunks(&[]);
        let new = chunks(&["Brand new."]);

        let lines = unified_diff(&old, &new, 3);
        assert_eq!(lines[2], "@@ -0,0 +1 @@");
        assert_eq!(lines[3], "+Brand new.");
    }

    #[test]
    fn multi_sentence_hunk_uses_count_ranges() {
        let old = chunks(&["One bad.", "Two bad."]);
        let new = chunks(&["One good.", "Two good."]);

        let lines = unified_diff(&old, &new, 3);
        assert_eq!(lines[2], "@@ -1,2 +1,2 @@");
    }
}
