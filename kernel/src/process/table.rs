//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! PCB 池与分配器
//!
//! 对应 PandOS 的 `initPcbs` / `allocPcb` / `freePcb` (phase1/pcb.c)
//!
//! 所有 PCB 预先放在一个容量为 `N` 的数组中（没有动态内存分配），
//! 空闲的 PCB 通过各自的 `next` 字段串成一个 LIFO 栈。

use core::ops::{Index, IndexMut};

use super::pcb::{Pcb, PcbFlags, PcbHandle};
use crate::config::MAXPROC;
use crate::errno::Errno;

/// PCB 池
///
/// `N` 默认取自 Kernel.toml 的 `process.max_proc`。
pub struct PcbTable<const N: usize = MAXPROC> {
    pcbs: [Pcb; N],
    /// 空闲链表栈顶
    free_head: Option<PcbHandle>,
    nr_free: usize,
}

impl<const N: usize> PcbTable<N> {
    const CAPACITY_OK: () = assert!(N > 0 && N <= u16::MAX as usize, "PCB 池容量超出句柄范围");

    /// 创建 PCB 池
    ///
    /// 空闲链表为空，使用前必须调用 [`init_pool`](Self::init_pool)。
    pub const fn new() -> Self {
        let () = Self::CAPACITY_OK;
        Self {
            pcbs: [Pcb::EMPTY; N],
            free_head: None,
            nr_free: 0,
        }
    }

    /// 初始化 PCB 池
    ///
    /// 把全部 `N` 个槽位压入空闲链表。重复调用会丢弃所有已分配的 PCB。
    pub fn init_pool(&mut self) {
        self.free_head = None;
        self.nr_free = 0;

        // 逆序压栈，使下标 0 位于栈顶
        for index in (0..N).rev() {
            self.pcbs[index].reset();
            self.push_free(PcbHandle::new(index));
        }

        log::debug!("pcb: pool initialized with {} entries", N);
    }

    /// 分配一个 PCB
    ///
    /// 从空闲链表弹出栈顶并清空其所有字段（队列链接、进程树链接、
    /// 处理器状态、CPU 时间、信号量）。池耗尽时返回 `None`。
    pub fn alloc_pcb(&mut self) -> Option<PcbHandle> {
        let Some(p) = self.free_head else {
            log::warn!("pcb: pool exhausted ({} entries in use)", N);
            return None;
        };

        let pcb = &mut self.pcbs[p.index()];
        self.free_head = pcb.next;
        self.nr_free -= 1;

        pcb.reset();
        pcb.flags = PcbFlags::ALLOCATED;

        crate::list_trace!("pcb: alloc #{} ({} free)", p.index(), self.nr_free);
        Some(p)
    }

    /// 分配一个 PCB，池耗尽时返回 `OutOfMemory`
    ///
    /// 供需要把失败原因返回给调用者的系统调用路径使用。
    pub fn try_alloc_pcb(&mut self) -> Result<PcbHandle, Errno> {
        self.alloc_pcb().ok_or(Errno::OutOfMemory)
    }

    /// 归还一个 PCB
    ///
    /// 压入空闲链表栈顶。调用者必须先把它从所有进程队列和进程树中摘除，
    /// 这里不做检查；重复释放会被忽略。
    pub fn free_pcb(&mut self, p: PcbHandle) {
        if !self.pcbs[p.index()].is_allocated() {
            log::warn!("pcb: double free of #{}", p.index());
            return;
        }

        self.push_free(p);
        crate::list_trace!("pcb: free #{} ({} free)", p.index(), self.nr_free);
    }

    fn push_free(&mut self, p: PcbHandle) {
        let pcb = &mut self.pcbs[p.index()];
        pcb.flags = PcbFlags::empty();
        pcb.next = self.free_head;
        pcb.prev = None;
        self.free_head = Some(p);
        self.nr_free += 1;
    }

    /// 池容量
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// 空闲 PCB 个数
    #[inline]
    pub fn free_count(&self) -> usize {
        self.nr_free
    }

    #[inline]
    pub fn is_allocated(&self, p: PcbHandle) -> bool {
        self.pcbs[p.index()].is_allocated()
    }

    #[inline]
    pub fn get(&self, p: PcbHandle) -> &Pcb {
        &self.pcbs[p.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, p: PcbHandle) -> &mut Pcb {
        &mut self.pcbs[p.index()]
    }
}

impl<const N: usize> Default for PcbTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Index<PcbHandle> for PcbTable<N> {
    type Output = Pcb;

    fn index(&self, p: PcbHandle) -> &Pcb {
        self.get(p)
    }
}

impl<const N: usize> IndexMut<PcbHandle> for PcbTable<N> {
    fn index_mut(&mut self, p: PcbHandle) -> &mut Pcb {
        self.get_mut(p)
    }
}
