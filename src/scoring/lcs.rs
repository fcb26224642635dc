//! 最長共通部分列（LCS）の長さ計算。

/// 2系列のLCS長を動的計画法で求める。経路の復元は行わない。
///
/// 表は`O(len(a)·len(b))`の計算量で埋めるが、保持するのは直前の行のみ。
#[must_use]
pub fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for item_a in a {
        for (j, item_b) in b.iter().enumerate() {
            curr[j + 1] = if item_a == item_b {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
