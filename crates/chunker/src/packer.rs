use crate::config::JoinStyle;
use crate::error::{ChunkerError, Result};
use crate::types::{Group, Unit};

const UNREACHABLE: usize = usize::MAX;

/// Pack an ordered sequence of units into the fewest contiguous groups whose token sums
/// lie in `[min_tokens, max_tokens]`.
///
/// `cost[i]` is the minimum number of groups covering units `0..=i`; `start[i]` is the first
/// unit of the last group in that cover. For every `i` the candidate start `j` is scanned from
/// `i` down to `0` while the running sum stays under the ceiling, and a candidate only replaces
/// the current best when it strictly lowers the group count. Ties therefore keep the candidate
/// met first in the backward scan (the shortest trailing group).
///
/// Returns an error instead of partial output when some prefix cannot be covered.
pub fn group_chunks(
    units: &[Unit],
    min_tokens: usize,
    max_tokens: usize,
    style: JoinStyle,
) -> Result<Vec<Group>> {
    let n = units.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut cost = vec![UNREACHABLE; n];
    let mut start: Vec<Option<usize>> = vec![None; n];

    for i in 0..n {
        let mut size = 0usize;
        for j in (0..=i).rev() {
            size = size.saturating_add(units[j].tokens);
            if size > max_tokens {
                break;
            }
            if size < min_tokens {
                continue;
            }

            let candidate = if j == 0 {
                1
            } else if cost[j - 1] == UNREACHABLE {
                continue;
            } else {
                cost[j - 1] + 1
            };

            if candidate < cost[i] {
                cost[i] = candidate;
                start[i] = Some(j);
            }
        }
    }

    let mut groups = Vec::with_capacity(cost[n - 1].min(n));
    let mut end = n;
    while end > 0 {
        let last = end - 1;
        let Some(first) = start[last] else {
            return Err(infeasible(units, last, min_tokens, max_tokens));
        };

        let members = &units[first..=last];
        let text = members
            .iter()
            .map(|unit| unit.text.as_str())
            .collect::<Vec<_>>()
            .join(style.separator());
        let tokens = members.iter().map(|unit| unit.tokens).sum();

        groups.push(Group {
            tokens,
            text,
            start: first,
            end: last,
        });
        end = first;
    }
    groups.reverse();

    log::trace!(
        "Packed {n} {} units into {} groups (bounds [{min_tokens}, {max_tokens}])",
        style.as_str(),
        groups.len()
    );
    Ok(groups)
}

/// Explain why the prefix ending at `index` has no cover
fn infeasible(units: &[Unit], index: usize, min_tokens: usize, max_tokens: usize) -> ChunkerError {
    units[..=index]
        .iter()
        .position(|unit| !unit.fits(max_tokens))
        .map_or(
            ChunkerError::InfeasiblePartition {
                index,
                min_tokens,
                max_tokens,
            },
            |pos| ChunkerError::UnpackableUnit {
                index: pos,
                tokens: units[pos].tokens,
                max_tokens,
            },
        )
}
