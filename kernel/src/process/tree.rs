//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 进程树管理
//!
//! 对应 PandOS 的 `emptyChild` / `insertChild` / `removeChild` / `outChild`
//!
//! 每个 PCB 至多有一个父进程；父进程的所有子进程通过 `sib_next`/`sib_prev`
//! 组成双向兄弟链表，链表头是 `parent.child`。新插入的子进程放在最前面，
//! 因此 `remove_first_child` 总是先取出最近插入的子进程。
//!
//! 进程树链接与队列链接互不影响；摘除节点时不会改动它自己的子树。

use super::pcb::PcbHandle;
use super::table::PcbTable;

impl<const N: usize> PcbTable<N> {
    /// `p` 是否没有子进程
    #[inline]
    pub fn empty_child(&self, p: PcbHandle) -> bool {
        self[p].child.is_none()
    }

    /// 第一个子进程（最近插入的那个）
    #[inline]
    pub fn first_child(&self, p: PcbHandle) -> Option<PcbHandle> {
        self[p].child
    }

    /// 父进程
    #[inline]
    pub fn parent_of(&self, p: PcbHandle) -> Option<PcbHandle> {
        self[p].parent
    }

    /// 把 `p` 作为 `parent` 的第一个子进程插入
    ///
    /// `p` 已有父进程、或者 `p == parent` 时不做任何修改。
    pub fn insert_child(&mut self, parent: PcbHandle, p: PcbHandle) {
        if parent == p {
            log::warn!("tree: pcb #{} cannot be its own child", p.index());
            return;
        }
        if let Some(old) = self[p].parent {
            log::warn!(
                "tree: pcb #{} already has parent #{}",
                p.index(),
                old.index()
            );
            return;
        }

        let first = self[parent].child;
        if let Some(first) = first {
            self[first].sib_prev = Some(p);
        }

        let pcb = &mut self[p];
        pcb.parent = Some(parent);
        pcb.sib_next = first;
        pcb.sib_prev = None;
        self[parent].child = Some(p);

        crate::list_trace!("tree: #{} -> child of #{}", p.index(), parent.index());
    }

    /// 摘下并返回 `parent` 的第一个子进程，没有子进程时返回 `None`
    pub fn remove_first_child(&mut self, parent: PcbHandle) -> Option<PcbHandle> {
        let child = self[parent].child?;
        self.remove_from_parent(child)
    }

    /// 把 `p` 从其父进程的兄弟链表中摘下（可位于任意位置）
    ///
    /// `p` 没有父进程时返回 `None`。
    pub fn remove_from_parent(&mut self, p: PcbHandle) -> Option<PcbHandle> {
        let parent = self[p].parent?;
        let (prev, next) = (self[p].sib_prev, self[p].sib_next);

        match prev {
            Some(prev) => self[prev].sib_next = next,
            // p 是第一个子进程
            None => self[parent].child = next,
        }
        if let Some(next) = next {
            self[next].sib_prev = prev;
        }

        let pcb = &mut self[p];
        pcb.parent = None;
        pcb.sib_next = None;
        pcb.sib_prev = None;

        crate::list_trace!("tree: #{} detached from #{}", p.index(), parent.index());
        Some(p)
    }

    /// 按兄弟链表顺序遍历 `parent` 的子进程
    pub fn children(&self, parent: PcbHandle) -> Children<'_, N> {
        Children {
            pcbs: self,
            next: self[parent].child,
            remaining: N,
        }
    }
}

/// 子进程迭代器
pub struct Children<'a, const N: usize> {
    pcbs: &'a PcbTable<N>,
    next: Option<PcbHandle>,
    remaining: usize,
}

impl<'a, const N: usize> Iterator for Children<'a, N> {
    type Item = PcbHandle;

    fn next(&mut self) -> Option<PcbHandle> {
        let current = self.next?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.next = self.pcbs[current].sib_next;
        Some(current)
    }
}
