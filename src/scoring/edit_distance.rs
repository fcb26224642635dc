//! 挿入・削除・置換・ブロック移動（シフト）を許す編集距離。
//!
//! シフト探索は貪欲法で行う。参照文に現れる連続区間を候補文中で移動させ、
//! 移動1回のコストを含めても通常の編集距離が厳密に減る場合のみ適用する。
//! これを改善がなくなるまで繰り返す。

/// シフト探索の上限。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftLimits {
    /// 一度に移動できる区間の最大トークン数。
    pub max_shift_size: usize,
    /// 区間を移動できる最大距離（トークン数）。
    pub max_shift_distance: usize,
}

impl Default for ShiftLimits {
    fn default() -> Self {
        Self {
            max_shift_size: 10,
            max_shift_distance: 50,
        }
    }
}

/// 編集操作の内訳。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditCount {
    pub shifts: usize,
    /// シフト適用後に残る挿入・削除・置換の数。
    pub edits: usize,
}

impl EditCount {
    #[must_use]
    pub fn total(self) -> usize {
        self.shifts + self.edits
    }
}

/// 通常のレーベンシュタイン距離（単位コスト）。
#[must_use]
pub fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, item_a) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, item_b) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(item_a != item_b);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// 候補文を参照文へ変換する最小コストの編集（シフト込み）を求める。
#[must_use]
pub fn edit_distance_with_shifts<T>(candidate: &[T], reference: &[T], limits: ShiftLimits) -> EditCount
where
    T: PartialEq + Clone,
{
    let mut current = candidate.to_vec();
    let mut distance = levenshtein(&current, reference);
    let mut shifts = 0usize;

    while distance > 1 {
        let Some(shifted) = best_shift(&current, reference, distance, limits) else {
            break;
        };
        current = shifted.sequence;
        distance = shifted.distance;
        shifts += 1;
    }

    EditCount {
        shifts,
        edits: distance,
    }
}

struct ShiftedSequence<T> {
    sequence: Vec<T>,
    distance: usize,
}

/// 利得（`distance - (新距離 + 1)`）が最大のシフトを1つ返す。利得が正のものがなければ`None`。
///
/// 移動先は、区間が参照文中の出現位置と同じ位置に来る場所だけを試す。
fn best_shift<T>(
    current: &[T],
    reference: &[T],
    distance: usize,
    limits: ShiftLimits,
) -> Option<ShiftedSequence<T>>
where
    T: PartialEq + Clone,
{
    let mut best: Option<ShiftedSequence<T>> = None;
    let mut destinations: Vec<usize> = Vec::new();

    for start in 0..current.len() {
        let max_size = limits.max_shift_size.min(current.len() - start);
        for size in 1..=max_size {
            let span = &current[start..start + size];
            let in_place = reference.get(start..start + size) == Some(span);
            if in_place {
                continue;
            }

            let remaining = current.len() - size;
            destinations.clear();
            for (position, window) in reference.windows(size).enumerate() {
                if window != span {
                    continue;
                }
                let dest = position.min(remaining);
                if dest != start
                    && dest.abs_diff(start) <= limits.max_shift_distance
                    && !destinations.contains(&dest)
                {
                    destinations.push(dest);
                }
            }
            if destinations.is_empty() && !reference.windows(size).any(|window| window == span) {
                // 長い区間も参照文には現れない
                break;
            }

            for &dest in &destinations {
                let sequence = shift_span(current, start, size, dest);
                let shifted_distance = levenshtein(&sequence, reference);
                let threshold = best.as_ref().map_or(distance, |b| b.distance + 1);
                if shifted_distance + 1 < threshold {
                    best = Some(ShiftedSequence {
                        sequence,
                        distance: shifted_distance,
                    });
                }
            }
        }
    }

    best
}

/// `current[start..start + size]`を取り除き、残りの列の`dest`位置へ挿入する。
fn shift_span<T: Clone>(current: &[T], start: usize, size: usize, dest: usize) -> Vec<T> {
    let span = &current[start..start + size];
    let mut rest: Vec<T> = Vec::with_capacity(current.len());
    rest.extend_from_slice(&current[..start]);
    rest.extend_from_slice(&current[start + size..]);

    let mut shifted = Vec::with_capacity(current.len());
    shifted.extend_from_slice(&rest[..dest]);
    shifted.extend_from_slice(span);
    shifted.extend_from_slice(&rest[dest..]);
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["a", "b", "c"], &["a", "b", "d"], 1)]
    #[case(&["a", "b", "c"], &["a", "b", "c"], 0)]
    #[case(&[], &["a", "b"], 2)]
    #[case(&["a", "b"], &[], 2)]
    #[case(&["k", "i", "t"], &["s", "i", "t", "s"], 2)]
    fn levenshtein_counts_unit_edits(
        #[case] a: &[&str],
        #[case] b: &[&str],
        #[case] expected: usize,
    ) {
        assert_eq!(levenshtein(a, b), expected);
    }

    #[test]
    fn shift_moves_span_to_destination() {
        let seq = ["a", "b", "c", "d"];
        assert_eq!(shift_span(&seq, 0, 2, 2), vec!["c", "d", "a", "b"]);
        assert_eq!(shift_span(&seq, 3, 1, 0), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn single_shift_beats_plain_edits() {
        let candidate = ["b", "c", "a"];
        let reference = ["a", "b", "c"];
        assert_eq!(levenshtein(&candidate, &reference), 2);

        let count = edit_distance_with_shifts(&candidate, &reference, ShiftLimits::default());
        assert_eq!(count, EditCount { shifts: 1, edits: 0 });
    }

    #[test]
    fn block_shift_of_long_span() {
        let candidate = ["d", "e", "f", "a", "b", "c"];
        let reference = ["a", "b", "c", "d", "e", "f"];
        let count = edit_distance_with_shifts(&candidate, &reference, ShiftLimits::default());
        assert_eq!(count.total(), 1);
    }

    #[test]
    fn no_shift_when_it_does_not_pay_off() {
        let candidate = ["a", "b", "c"];
        let reference = ["a", "b", "d"];
        let count = edit_distance_with_shifts(&candidate, &reference, ShiftLimits::default());
        assert_eq!(count, EditCount { shifts: 0, edits: 1 });
    }

    #[test]
    fn shift_lands_span_on_its_reference_position() {
        let reference: Vec<String> = (0..120).map(|i| format!("t{i}")).collect();
        let mut candidate = reference.clone();
        let block: Vec<String> = candidate.drain(40..45).collect();
        candidate.splice(60..60, block);

        let count = edit_distance_with_shifts(&candidate, &reference, ShiftLimits::default());
        assert_eq!(count, EditCount { shifts: 1, edits: 0 });
    }

    #[test]
    fn shift_distance_limit_is_respected() {
        let reference: Vec<String> = (0..120).map(|i| format!("t{i}")).collect();
        let mut candidate = reference.clone();
        let block: Vec<String> = candidate.drain(0..5).collect();
        candidate.extend(block);

        let limits = ShiftLimits {
            max_shift_size: 10,
            max_shift_distance: 50,
        };
        let count = edit_distance_with_shifts(&candidate, &reference, limits);
        assert_eq!(count.shifts, 0);
        assert_eq!(count.total(), levenshtein(&candidate, &reference));
    }

    #[test]
    fn shift_size_limit_is_respected() {
        let candidate = ["d", "e", "f", "a", "b", "c"];
        let reference = ["a", "b", "c", "d", "e", "f"];
        let limits = ShiftLimits {
            max_shift_size: 1,
            max_shift_distance: 50,
        };
        let count = edit_distance_with_shifts(&candidate, &reference, limits);
        assert!(count.total() > 1);
        assert!(count.total() <= levenshtein(&candidate, &reference));
    }
}
