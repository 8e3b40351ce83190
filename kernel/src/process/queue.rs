//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 进程队列
//!
//! 对应 PandOS 的 `mkEmptyProcQ` / `insertProcQ` / `removeProcQ` /
//! `outProcQ` / `headProcQ`
//!
//! 设计特点：
//! - 侵入式循环双向链表：链接字段 (`next`/`prev`) 直接嵌在 PCB 中
//! - 队列对外只有一个尾指针，`tail.next` 就是队头；空队列即 `tail == None`
//! - 没有哨兵节点：只有一个元素时它的 `next`/`prev` 都指向自己
//! - 插入在队尾 O(1)，移除队头 O(1)，移除任意元素 O(n)

use super::pcb::{PcbFlags, PcbHandle};
use super::table::PcbTable;

/// 进程队列（尾指针句柄）
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ProcQueue {
    tail: Option<PcbHandle>,
}

impl ProcQueue {
    /// 创建空队列
    pub const fn new() -> Self {
        Self { tail: None }
    }

    /// 队列是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tail.is_none()
    }

    /// 队尾
    #[inline]
    pub fn tail(&self) -> Option<PcbHandle> {
        self.tail
    }

    /// 队头（不移除）
    pub fn head<const N: usize>(&self, pcbs: &PcbTable<N>) -> Option<PcbHandle> {
        self.tail.and_then(|tail| pcbs[tail].next)
    }

    /// 把 `p` 插入队尾
    ///
    /// 空队列插入后形成一个指向自己的单元素环。
    /// `p` 未分配或已经在某个队列中时不做任何修改。
    pub fn insert<const N: usize>(&mut self, pcbs: &mut PcbTable<N>, p: PcbHandle) {
        let pcb = &pcbs[p];
        if !pcb.is_allocated() {
            log::warn!("procq: insert of free pcb #{}", p.index());
            return;
        }
        if pcb.is_queued() {
            log::warn!("procq: pcb #{} is already queued", p.index());
            return;
        }

        match self.tail {
            None => {
                pcbs[p].next = Some(p);
                pcbs[p].prev = Some(p);
            }
            Some(tail) => {
                // 插入到 tail 和 head 之间
                let head = pcbs[tail].next.unwrap_or(tail);
                pcbs[p].next = Some(head);
                pcbs[p].prev = Some(tail);
                pcbs[tail].next = Some(p);
                pcbs[head].prev = Some(p);
            }
        }

        pcbs[p].flags.insert(PcbFlags::QUEUED);
        self.tail = Some(p);

        crate::list_trace!("procq: insert #{}", p.index());
        debug_assert!(self.is_well_formed(pcbs));
    }

    /// 移除并返回队头，空队列返回 `None`
    pub fn remove<const N: usize>(&mut self, pcbs: &mut PcbTable<N>) -> Option<PcbHandle> {
        let head = self.head(pcbs)?;
        self.unlink(pcbs, head);
        Some(head)
    }

    /// 从队列任意位置移除 `p`
    ///
    /// 需要线性扫描确认 `p` 确实在本队列中；不在时返回 `None`，
    /// 绝不会摘除属于其他队列的 PCB。
    pub fn remove_specific<const N: usize>(
        &mut self,
        pcbs: &mut PcbTable<N>,
        p: PcbHandle,
    ) -> Option<PcbHandle> {
        if !self.contains(pcbs, p) {
            return None;
        }
        self.unlink(pcbs, p);
        Some(p)
    }

    /// `p` 是否在本队列中
    pub fn contains<const N: usize>(&self, pcbs: &PcbTable<N>, p: PcbHandle) -> bool {
        self.iter(pcbs).any(|q| q == p)
    }

    /// 队列长度
    pub fn len<const N: usize>(&self, pcbs: &PcbTable<N>) -> usize {
        self.iter(pcbs).count()
    }

    /// 从队头到队尾遍历
    pub fn iter<'a, const N: usize>(&self, pcbs: &'a PcbTable<N>) -> Iter<'a, N> {
        Iter {
            pcbs,
            next: self.head(pcbs),
            tail: self.tail,
            remaining: N,
        }
    }

    /// 检查循环链表是否完整
    ///
    /// 每个节点都满足 `next.prev == node`，并且沿 `next` 走不超过 N 步回到队尾。
    pub fn is_well_formed<const N: usize>(&self, pcbs: &PcbTable<N>) -> bool {
        let Some(tail) = self.tail else {
            return true;
        };

        let mut node = tail;
        for _ in 0..N {
            let pcb = &pcbs[node];
            if !pcb.is_queued() {
                return false;
            }
            let Some(next) = pcb.next else {
                return false;
            };
            if pcbs[next].prev != Some(node) {
                return false;
            }
            if next == tail {
                return true;
            }
            node = next;
        }
        false
    }

    /// 把 `p` 从环中摘下并清空其链接，调用者保证 `p` 在本队列中
    fn unlink<const N: usize>(&mut self, pcbs: &mut PcbTable<N>, p: PcbHandle) {
        let (prev, next) = (pcbs[p].prev, pcbs[p].next);

        if next == Some(p) {
            // 唯一的元素
            self.tail = None;
        } else if let (Some(prev), Some(next)) = (prev, next) {
            pcbs[prev].next = Some(next);
            pcbs[next].prev = Some(prev);
            if self.tail == Some(p) {
                self.tail = Some(prev);
            }
        }

        let pcb = &mut pcbs[p];
        pcb.next = None;
        pcb.prev = None;
        pcb.flags.remove(PcbFlags::QUEUED);

        crate::list_trace!("procq: remove #{}", p.index());
        debug_assert!(self.is_well_formed(pcbs));
    }
}

/// 进程队列迭代器
pub struct Iter<'a, const N: usize> {
    pcbs: &'a PcbTable<N>,
    next: Option<PcbHandle>,
    tail: Option<PcbHandle>,
    /// 防止链表损坏时无限循环
    remaining: usize,
}

impl<'a, const N: usize> Iterator for Iter<'a, N> {
    type Item = PcbHandle;

    fn next(&mut self) -> Option<PcbHandle> {
        let current = self.next?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        self.next = if Some(current) == self.tail {
            None
        } else {
            self.pcbs[current].next
        };
        Some(current)
    }
}
