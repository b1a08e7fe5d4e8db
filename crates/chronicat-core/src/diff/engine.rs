//! Structural diff computation.
//!
//! The core entry point is [`compute_diff`], which compares an optional
//! predecessor tree with the incoming tree and produces an ordered list of
//! [`PatchOp`]s.

use crate::diff::model::PatchOp;
use crate::diff::pointer::{child_index, child_key};
use crate::tree::Tree;

/// Compute the patch operations that turn `previous` into `current`.
///
/// When `previous` is `None` the document is new: every leaf of `current`
/// (scalars, plus empty arrays and objects) yields one `add` at its path, and
/// array elements are addressed by index. A scalar root yields a single `add`
/// at the empty path.
///
/// When `previous` is present:
/// - equal subtrees produce nothing
/// - a value whose type changed is replaced wholesale
/// - object members are compared key by key, removed members first, then
///   members that exist only in `current` are added
/// - arrays are aligned on their longest common subsequence; unmatched source
///   elements are removed, unmatched target elements are added, and elements
///   that occupy the same slot but differ are diffed recursively
pub fn compute_diff(previous: Option<&Tree>, current: &Tree) -> Vec<PatchOp> {
    let mut ops = Vec::new();
    match previous {
        None => add_leaves(&mut ops, "", current),
        Some(previous) => diff_nodes(&mut ops, "", previous, current),
    }
    ops
}

fn add_leaves(ops: &mut Vec<PatchOp>, path: &str, node: &Tree) {
    match node {
        Tree::Object(members) if !members.is_empty() => {
            for (key, value) in members {
                add_leaves(ops, &child_key(path, key), value);
            }
        }
        Tree::Array(items) if !items.is_empty() => {
            for (index, item) in items.iter().enumerate() {
                add_leaves(ops, &child_index(path, index), item);
            }
        }
        // An empty root carries no information of its own
        _ if path.is_empty() && node.is_container() => {}
        _ => ops.push(PatchOp::add(path, node)),
    }
}

fn diff_nodes(ops: &mut Vec<PatchOp>, path: &str, source: &Tree, target: &Tree) {
    if source == target {
        return;
    }
    match (source, target) {
        (Tree::Object(_), Tree::Object(_)) => diff_objects(ops, path, source, target),
        (Tree::Array(src), Tree::Array(dst)) => diff_arrays(ops, path, src, dst),
        _ => ops.push(PatchOp::replace(path, target)),
    }
}

fn diff_objects(ops: &mut Vec<PatchOp>, path: &str, source: &Tree, target: &Tree) {
    let (Some(src), Some(dst)) = (source.as_object(), target.as_object()) else {
        return;
    };

    for (key, src_value) in src {
        let member_path = child_key(path, key);
        match dst.get(key) {
            Some(dst_value) => diff_nodes(ops, &member_path, src_value, dst_value),
            None => ops.push(PatchOp::remove(member_path)),
        }
    }

    for (key, dst_value) in dst {
        if !src.contains_key(key) {
            ops.push(PatchOp::add(child_key(path, key), dst_value));
        }
    }
}

fn diff_arrays(ops: &mut Vec<PatchOp>, path: &str, source: &[Tree], target: &[Tree]) {
    let lcs = longest_common_subsequence(source, target);

    let mut src_idx = 0;
    let mut dst_idx = 0;
    let mut pos = 0;

    // `pos` tracks the index in the partially patched array
    for common in &lcs {
        loop {
            let src_matches = source.get(src_idx) == Some(*common);
            let dst_matches = target.get(dst_idx) == Some(*common);
            match (src_matches, dst_matches) {
                (true, true) => {
                    src_idx += 1;
                    dst_idx += 1;
                    pos += 1;
                    break;
                }
                (true, false) => {
                    ops.push(PatchOp::add(child_index(path, pos), &target[dst_idx]));
                    dst_idx += 1;
                    pos += 1;
                }
                (false, true) => {
                    ops.push(PatchOp::remove(child_index(path, pos)));
                    src_idx += 1;
                }
                (false, false) => {
                    diff_nodes(ops, &child_index(path, pos), &source[src_idx], &target[dst_idx]);
                    src_idx += 1;
                    dst_idx += 1;
                    pos += 1;
                }
            }
        }
    }

    while src_idx < source.len() && dst_idx < target.len() {
        diff_nodes(ops, &child_index(path, pos), &source[src_idx], &target[dst_idx]);
        src_idx += 1;
        dst_idx += 1;
        pos += 1;
    }

    for item in &target[dst_idx..] {
        ops.push(PatchOp::add(child_index(path, pos), item));
        pos += 1;
    }

    for _ in src_idx..source.len() {
        ops.push(PatchOp::remove(child_index(path, pos)));
    }
}

/// Longest common subsequence of two element slices, by structural equality.
fn longest_common_subsequence<'a>(source: &'a [Tree], target: &[Tree]) -> Vec<&'a Tree> {
    let rows = source.len();
    let cols = target.len();
    let mut table = vec![vec![0usize; cols + 1]; rows + 1];

    for i in (0..rows).rev() {
        for j in (0..cols).rev() {
            table[i][j] = if source[i] == target[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut result = Vec::with_capacity(table[0][0]);
    let (mut i, mut j) = (0, 0);
    while i < rows && j < cols {
        if source[i] == target[j] {
            result.push(&source[i]);
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    result
}
