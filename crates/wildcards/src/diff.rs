//! Line diff between an expectation and the actual text.
//!
//! Hunks are printed in unified format without context lines. A hunk whose
//! expected lines match its actual lines once wildcards are applied is not
//! a real difference and is left out.

use crate::{is_match, WildcardError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal,
    Delete,
    Insert,
}

/// Longest common subsequence of lines, as a sequence of ops.
fn diff_lines(src: &[&str], dst: &[&str]) -> Vec<Op> {
    let (n, m) = (src.len(), dst.len());
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i][j] = if src[i] == dst[j] {
                1 + dp[i + 1][j + 1]
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let mut out = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if src[i] == dst[j] {
            out.push(Op::Equal);
            i += 1;
            j += 1;
        } else if dp[i + 1][j] >= dp[i][j + 1] {
            out.push(Op::Delete);
            i += 1;
        } else {
            out.push(Op::Insert);
            j += 1;
        }
    }
    out.extend(std::iter::repeat(Op::Delete).take(n - i));
    out.extend(std::iter::repeat(Op::Insert).take(m - j));
    out
}

struct Hunk<'a> {
    src_start: usize,
    dst_start: usize,
    deleted: Vec<&'a str>,
    inserted: Vec<&'a str>,
}

fn hunks<'a>(src: &[&'a str], dst: &[&'a str]) -> Vec<Hunk<'a>> {
    let mut out = Vec::new();
    let mut current: Option<Hunk<'a>> = None;
    let (mut i, mut j) = (0, 0);
    for op in diff_lines(src, dst) {
        match op {
            Op::Equal => {
                out.extend(current.take());
                i += 1;
                j += 1;
            }
            Op::Delete => {
                current
                    .get_or_insert_with(|| Hunk::starting_at(i, j))
                    .deleted
                    .push(src[i]);
                i += 1;
            }
            Op::Insert => {
                current
                    .get_or_insert_with(|| Hunk::starting_at(i, j))
                    .inserted
                    .push(dst[j]);
                j += 1;
            }
        }
    }
    out.extend(current);
    out
}

impl Hunk<'_> {
    fn starting_at(src_start: usize, dst_start: usize) -> Self {
        Self {
            src_start,
            dst_start,
            deleted: Vec::new(),
            inserted: Vec::new(),
        }
    }
}

/// Range of a hunk side: `start` alone for one line, `start,len` otherwise.
/// An empty side points at the line before it.
fn range(start: usize, len: usize) -> String {
    match len {
        1 => format!("{}", start + 1),
        0 => format!("{start},0"),
        _ => format!("{},{len}", start + 1),
    }
}

/// Unified diff of `expected` and `actual`, without hunks the wildcards
/// account for.
pub(crate) fn unified(expected: &str, actual: &str) -> Result<String, WildcardError> {
    let src: Vec<&str> = expected.lines().collect();
    let dst: Vec<&str> = actual.lines().collect();
    let mut out = String::new();
    for hunk in hunks(&src, &dst) {
        if is_match(&hunk.deleted.join("\n"), &hunk.inserted.join("\n"))? {
            continue;
        }
        out.push_str(&format!(
            "@@ -{} +{} @@\n",
            range(hunk.src_start, hunk.deleted.len()),
            range(hunk.dst_start, hunk.inserted.len())
        ));
        for line in &hunk.deleted {
            out.push('-');
            out.push_str(line);
            out.push('\n');
        }
        for line in &hunk.inserted {
            out.push('+');
            out.push_str(line);
            out.push('\n');
        }
    }
    Ok(out)
}
