//! Reduces the distinct per-trip stop sequences of one line family down to a
//! minimal set of canonical routes. No feed table says "these trips are the
//! same line", so the line identities have to be reconstructed by merging
//! partial, possibly-overlapping orderings while preserving every observed
//! order.
//!
//! Three passes, each run to a fixed point before the next starts:
//! 1. strict absorption: a shorter sequence disappears into a longer one that
//!    contains it as one contiguous block
//! 2. shared-endpoint merge: two sequences with the same first and last stop
//!    become one interleaved sequence
//! 3. lenient absorption: like pass 1, but the shorter sequence only has to be
//!    an order-preserving subsequence, not a contiguous one

use std::collections::{BTreeMap, BTreeSet};

use gtfs::StopID;

use super::collect::Sequence;
use super::error::TrainError;

/// One canonical route in the making: the current merged sequence plus every
/// original sequence absorbed into it.
#[derive(Debug)]
pub struct Group {
    /// Replaced wholesale when groups merge, never edited in place.
    pub sequence: Sequence,
    pub members: Vec<Sequence>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct GroupId(usize);

pub struct Merger {
    groups: BTreeMap<GroupId, Group>,
    next_id: usize,
    /// Witness pool for resolving branch divergence: every distinct sequence
    /// observed in this line family.
    observed: Vec<Sequence>,
}

impl Merger {
    /// One group per distinct sequence, each seeded with itself as its sole
    /// member.
    pub fn new(sequences: BTreeSet<Sequence>) -> Self {
        let mut merger = Self {
            groups: BTreeMap::new(),
            next_id: 0,
            observed: sequences.iter().cloned().collect(),
        };
        for seq in sequences {
            merger.insert(Group {
                members: vec![seq.clone()],
                sequence: seq,
            });
        }
        merger
    }

    pub fn run(mut self) -> Result<Vec<Group>, TrainError> {
        self.absorb(true);
        self.merge_same_endpoints()?;
        self.absorb(false);
        Ok(self.groups.into_values().collect())
    }

    fn insert(&mut self, group: Group) {
        let id = GroupId(self.next_id);
        self.next_id += 1;
        self.groups.insert(id, group);
    }

    /// Longest sequence first, ties broken lexicographically, so the merge
    /// order is reproducible.
    fn scan_order(&self) -> Vec<GroupId> {
        let mut ids: Vec<GroupId> = self.groups.keys().copied().collect();
        ids.sort_by(|a, b| {
            let sa = &self.groups[a].sequence;
            let sb = &self.groups[b].sequence;
            sb.len().cmp(&sa.len()).then_with(|| sa.cmp(sb))
        });
        ids
    }

    /// Absorb every sequence that is a sub-sequence of some longer one, until
    /// nothing changes. Groups vanish mid-pass, so the snapshot order is
    /// re-checked against the live store before each comparison.
    fn absorb(&mut self, strict: bool) {
        loop {
            let mut changed = false;
            for id in self.scan_order() {
                if !self.groups.contains_key(&id) {
                    // already merged away in this pass
                    continue;
                }
                let long = self.groups[&id].sequence.clone();
                let absorbed: Vec<GroupId> = self
                    .groups
                    .iter()
                    .filter(|(other_id, other)| {
                        **other_id != id
                            && other.sequence.len() < long.len()
                            && is_sub_sequence(&other.sequence, &long, strict)
                    })
                    .map(|(other_id, _)| *other_id)
                    .collect();
                for other_id in absorbed {
                    let other = self.groups.remove(&other_id).unwrap();
                    self.groups
                        .get_mut(&id)
                        .unwrap()
                        .members
                        .extend(other.members);
                    changed = true;
                }
            }
            if !changed {
                return;
            }
        }
    }

    /// Combine any two groups whose sequences share both endpoints. Merging
    /// replaces both groups with a new one, so the scan restarts from a fresh
    /// snapshot after every merge.
    fn merge_same_endpoints(&mut self) -> Result<(), TrainError> {
        'scan: loop {
            let order = self.scan_order();
            for (i, &id) in order.iter().enumerate() {
                for &other_id in &order[i + 1..] {
                    let a = &self.groups[&id].sequence;
                    let b = &self.groups[&other_id].sequence;
                    if a.first() != b.first() || a.last() != b.last() {
                        continue;
                    }
                    let a = self.groups.remove(&id).unwrap();
                    let b = self.groups.remove(&other_id).unwrap();
                    let sequence = interleave(&a.sequence, &b.sequence, &self.observed)?;
                    let mut members = a.members;
                    members.extend(b.members);
                    self.insert(Group { sequence, members });
                    continue 'scan;
                }
            }
            return Ok(());
        }
    }
}

/// Is `short` a sub-sequence of `long`? Strict means it must appear as one
/// contiguous block; lenient only requires that `long`, filtered down to the
/// stops of `short`, reads exactly as `short`.
fn is_sub_sequence(short: &[StopID], long: &[StopID], strict: bool) -> bool {
    if short.iter().any(|stop| !long.contains(stop)) {
        return false;
    }
    if strict {
        let i = position(long, short[0]).unwrap();
        let j = position(long, *short.last().unwrap()).unwrap();
        j + 1 >= i && long[i..j + 1] == *short
    } else {
        let filtered: Vec<StopID> = long
            .iter()
            .copied()
            .filter(|stop| short.contains(stop))
            .collect();
        filtered == short
    }
}

fn position(seq: &[StopID], stop: StopID) -> Option<usize> {
    seq.iter().position(|s| *s == stop)
}

/// Order-preserving interleave of two sequences that share both endpoints.
/// Walks both with cursors; where exactly one sequence has extra stops, they
/// are spliced in; where both diverge (a true branch), the relative order of
/// the two divergent runs is settled by a witness sequence that contains all
/// of the stops involved.
fn interleave(x: &[StopID], y: &[StopID], observed: &[Sequence]) -> Result<Sequence, TrainError> {
    let shared: BTreeSet<StopID> = x
        .iter()
        .copied()
        .filter(|stop| y.contains(stop))
        .collect();

    debug_assert_eq!(
        x.iter().collect::<BTreeSet<_>>().len(),
        x.len(),
        "sequence should have no repeats"
    );
    debug_assert_eq!(
        y.iter().collect::<BTreeSet<_>>().len(),
        y.len(),
        "sequence should have no repeats"
    );

    // The input data is self-contradictory if two trips serve the same stops
    // in different orders; refuse to invent an order.
    let shared_in_x: Vec<StopID> = x.iter().copied().filter(|s| shared.contains(s)).collect();
    let shared_in_y: Vec<StopID> = y.iter().copied().filter(|s| shared.contains(s)).collect();
    if shared_in_x != shared_in_y {
        return Err(TrainError::InconsistentOrder {
            a: x.to_vec(),
            b: y.to_vec(),
        });
    }

    let mut merged = Vec::new();
    let mut i = 0;
    let mut j = 0;
    while i < x.len() && j < y.len() {
        let vx = x[i];
        let vy = y[j];
        if vx == vy {
            merged.push(vx);
            i += 1;
            j += 1;
        } else if let Some(k) = position(y, vx) {
            // y has stops that x doesn't
            merged.extend_from_slice(&y[j..k]);
            j = k;
        } else if let Some(k) = position(x, vy) {
            // x has stops that y doesn't
            merged.extend_from_slice(&x[i..k]);
            i = k;
        } else {
            // Both diverge. Find where they rejoin, then ask a witness for the
            // order of the two runs in between. The endpoints are shared, so a
            // next shared stop always exists.
            let next = x[i..]
                .iter()
                .copied()
                .find(|stop| shared.contains(stop))
                .unwrap();
            let rejoin_x = position(x, next).unwrap();
            let rejoin_y = position(y, next).unwrap();
            let mut runs: Vec<StopID> = x[i..rejoin_x].to_vec();
            runs.extend_from_slice(&y[j..rejoin_y]);
            merged.extend(order_by_witness(&runs, observed)?);
            i = rejoin_x;
            j = rejoin_y;
        }
    }

    // check our work
    debug_assert_eq!(merged.first(), x.first());
    debug_assert_eq!(merged.last(), x.last());
    debug_assert_eq!(merged.len(), {
        let mut union: BTreeSet<StopID> = x.iter().copied().collect();
        union.extend(y.iter().copied());
        union.len()
    });
    debug_assert!(is_sub_sequence(x, &merged, false));
    debug_assert!(is_sub_sequence(y, &merged, false));

    Ok(merged)
}

/// Look for an already-known sequence that visits all of these stops; its
/// order wins. By all accounts such a sequence exists in real feeds; if not,
/// the merge cannot be completed honestly.
fn order_by_witness(stops: &[StopID], observed: &[Sequence]) -> Result<Vec<StopID>, TrainError> {
    for seq in observed {
        if stops.iter().all(|stop| seq.contains(stop)) {
            return Ok(seq
                .iter()
                .copied()
                .filter(|stop| stops.contains(stop))
                .collect());
        }
    }
    Err(TrainError::NoWitnessSequence {
        stops: stops.to_vec(),
    })
}
