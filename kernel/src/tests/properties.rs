//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!

// 性质测试：随机操作序列与简单模型（VecDeque / BTreeMap）对比
use std::collections::{BTreeMap, VecDeque};

use proptest::prelude::*;

use super::{alloc_n, new_pool};
use crate::errno::Errno;
use crate::process::{PcbHandle, ProcQueue};
use crate::sync::{Asl, SemAddr};

const NR_PCBS: usize = 8;
const NR_QUEUES: usize = 2;
const NR_SEMDS: usize = 4;
const KEYS: [usize; 5] = [0x10, 0x20, 0x30, 0x40, 0x50];

#[derive(Debug, Clone)]
enum QueueOp {
    Insert(usize, usize),
    Remove(usize),
    RemoveSpecific(usize, usize),
}

fn queue_op() -> impl Strategy<Value = QueueOp> {
    prop_oneof![
        (0..NR_QUEUES, 0..NR_PCBS).prop_map(|(q, p)| QueueOp::Insert(q, p)),
        (0..NR_QUEUES).prop_map(QueueOp::Remove),
        (0..NR_QUEUES, 0..NR_PCBS).prop_map(|(q, p)| QueueOp::RemoveSpecific(q, p)),
    ]
}

#[derive(Debug, Clone)]
enum AslOp {
    Block(usize, usize),
    RemoveBlocked(usize),
    Out(usize),
}

fn asl_op() -> impl Strategy<Value = AslOp> {
    prop_oneof![
        (0..KEYS.len(), 0..NR_PCBS).prop_map(|(k, p)| AslOp::Block(k, p)),
        (0..KEYS.len()).prop_map(AslOp::RemoveBlocked),
        (0..NR_PCBS).prop_map(AslOp::Out),
    ]
}

proptest! {
    #[test]
    fn queues_match_model(ops in prop::collection::vec(queue_op(), 0..64)) {
        let mut pcbs = new_pool::<NR_PCBS>();
        let v = alloc_n(&mut pcbs, NR_PCBS);
        let mut queues = [ProcQueue::new(); NR_QUEUES];
        let mut model: [VecDeque<PcbHandle>; NR_QUEUES] = Default::default();

        for op in ops {
            match op {
                QueueOp::Insert(q, p) => {
                    queues[q].insert(&mut pcbs, v[p]);
                    if !model.iter().any(|m| m.contains(&v[p])) {
                        model[q].push_back(v[p]);
                    }
                }
                QueueOp::Remove(q) => {
                    prop_assert_eq!(queues[q].remove(&mut pcbs), model[q].pop_front());
                }
                QueueOp::RemoveSpecific(q, p) => {
                    let expected = model[q].iter().position(|&x| x == v[p]).and_then(|i| model[q].remove(i));
                    prop_assert_eq!(queues[q].remove_specific(&mut pcbs, v[p]), expected);
                }
            }

            for (q, m) in queues.iter().zip(&model) {
                prop_assert!(q.is_well_formed(&pcbs));
                prop_assert_eq!(q.len(&pcbs), m.len());
                prop_assert_eq!(q.iter(&pcbs).collect::<Vec<_>>(), m.iter().copied().collect::<Vec<_>>());
                prop_assert_eq!(q.head(&pcbs), m.front().copied());
            }
            for &p in &v {
                let queued = model.iter().any(|m| m.contains(&p));
                prop_assert_eq!(pcbs[p].is_queued(), queued);
            }
        }
    }

    #[test]
    fn fifo_law(n in 1..=NR_PCBS) {
        let mut pcbs = new_pool::<NR_PCBS>();
        let v = alloc_n(&mut pcbs, n);
        let mut q = ProcQueue::new();
        for &p in &v {
            q.insert(&mut pcbs, p);
        }
        let out: Vec<_> = core::iter::from_fn(|| q.remove(&mut pcbs)).collect();
        prop_assert_eq!(out, v);
        prop_assert!(q.is_empty());
    }

    #[test]
    fn asl_matches_model(ops in prop::collection::vec(asl_op(), 0..64)) {
        let mut pcbs = new_pool::<NR_PCBS>();
        let v = alloc_n(&mut pcbs, NR_PCBS);
        let mut asl = Asl::<NR_SEMDS>::new();
        asl.init_asl();
        let mut model: BTreeMap<usize, VecDeque<PcbHandle>> = BTreeMap::new();

        for op in ops {
            match op {
                AslOp::Block(k, p) => {
                    let key = KEYS[k];
                    let expected = if model.values().any(|m| m.contains(&v[p])) {
                        Err(Errno::DeviceOrResourceBusy)
                    } else if !model.contains_key(&key) && model.len() == NR_SEMDS {
                        Err(Errno::TryAgain)
                    } else {
                        model.entry(key).or_default().push_back(v[p]);
                        Ok(())
                    };
                    prop_assert_eq!(asl.try_insert_blocked(&mut pcbs, SemAddr::new(key), v[p]), expected);
                }
                AslOp::RemoveBlocked(k) => {
                    let key = KEYS[k];
                    let expected = model.get_mut(&key).and_then(VecDeque::pop_front);
                    if model.get(&key).is_some_and(VecDeque::is_empty) {
                        model.remove(&key);
                    }
                    prop_assert_eq!(asl.remove_blocked(&mut pcbs, SemAddr::new(key)), expected);
                }
                AslOp::Out(p) => {
                    let mut expected = None;
                    for m in model.values_mut() {
                        if let Some(i) = m.iter().position(|&x| x == v[p]) {
                            expected = m.remove(i);
                        }
                    }
                    model.retain(|_, m| !m.is_empty());
                    prop_assert_eq!(asl.out_blocked(&mut pcbs, v[p]), expected);
                }
            }

            prop_assert!(asl.is_well_formed());
            prop_assert_eq!(
                asl.active_keys().map(SemAddr::addr).collect::<Vec<_>>(),
                model.keys().copied().collect::<Vec<_>>()
            );
            prop_assert_eq!(asl.free_count(), NR_SEMDS - model.len());
            for (&key, m) in &model {
                let q = asl.blocked_on(SemAddr::new(key));
                prop_assert!(q.is_some());
                let blocked: Vec<_> = q.map(|q| q.iter(&pcbs).collect()).unwrap_or_default();
                prop_assert_eq!(blocked, m.iter().copied().collect::<Vec<_>>());
            }
            for &p in &v {
                let key = model
                    .iter()
                    .find(|(_, m)| m.contains(&p))
                    .map(|(&key, _)| SemAddr::new(key));
                prop_assert_eq!(pcbs[p].sem_addr(), key);
            }
        }
    }
}
