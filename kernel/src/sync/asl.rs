//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 活动信号量链表 (Active Semaphore List, ASL)
//!
//! 对应 PandOS 的 `initASL` / `insertBlocked` / `removeBlocked` /
//! `outBlocked` / `headBlocked` (phase1/asl.c)
//!
//! 核心概念：
//! - 每个“活动”信号量（至少阻塞了一个进程）对应一个信号量描述符
//! - 描述符按信号量地址严格升序组成单向链表
//! - 链表两端是两个永不移除的哨兵：头哨兵地址为 0，尾哨兵地址为 `usize::MAX`，
//!   因此线性查找永远不会越界，也不需要判空
//! - 描述符的阻塞队列变空时立即归还到描述符空闲链表
//!
//! 描述符统一编号：`0..N` 是描述符池，`N` 是头哨兵，`N + 1` 是尾哨兵。

use core::fmt;

use crate::config::MAXPROC;
use crate::errno::Errno;
use crate::process::{PcbHandle, PcbTable, ProcQueue};

/// 信号量地址
///
/// ASL 的排序和查找键，按整数值比较。
/// 0 和 `usize::MAX` 留给哨兵使用。
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemAddr(usize);

impl SemAddr {
    /// 头哨兵地址
    pub const MIN: SemAddr = SemAddr(0);
    /// 尾哨兵地址
    pub const MAX: SemAddr = SemAddr(usize::MAX);

    #[inline]
    pub const fn new(addr: usize) -> Self {
        Self(addr)
    }

    /// 信号量变量的地址
    #[inline]
    pub fn of<T>(sem: &T) -> Self {
        Self(sem as *const T as usize)
    }

    #[inline]
    pub const fn addr(self) -> usize {
        self.0
    }

    /// 是否为哨兵保留的地址
    #[inline]
    pub const fn is_reserved(self) -> bool {
        self.0 == Self::MIN.0 || self.0 == Self::MAX.0
    }
}

impl fmt::Debug for SemAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SemAddr({:#x})", self.0)
    }
}

/// 信号量描述符
///
/// 对应 PandOS 的 `semd_t`
struct Semd {
    next: Option<usize>,
    sem_addr: SemAddr,
    proc_q: ProcQueue,
}

impl Semd {
    const EMPTY: Semd = Semd {
        next: None,
        sem_addr: SemAddr::MIN,
        proc_q: ProcQueue::new(),
    };
}

/// 活动信号量链表
///
/// 描述符池容量 `N` 默认与 PCB 池相同：每个被阻塞的进程最多占用一个描述符。
pub struct Asl<const N: usize = MAXPROC> {
    semds: [Semd; N],
    /// [头哨兵, 尾哨兵]
    sentinels: [Semd; 2],
    /// 描述符空闲链表栈顶
    free_head: Option<usize>,
    nr_free: usize,
}

impl<const N: usize> Asl<N> {
    const HEAD: usize = N;
    const TAIL: usize = N + 1;

    /// 创建 ASL
    ///
    /// 使用前必须调用 [`init_asl`](Self::init_asl)。
    pub const fn new() -> Self {
        Self {
            semds: [Semd::EMPTY; N],
            sentinels: [Semd::EMPTY; 2],
            free_head: None,
            nr_free: 0,
        }
    }

    /// 初始化 ASL
    ///
    /// 把全部 `N` 个描述符放入空闲链表，并安装两个哨兵作为链表的唯一内容。
    pub fn init_asl(&mut self) {
        self.free_head = None;
        self.nr_free = 0;
        for id in (0..N).rev() {
            self.push_free(id);
        }

        self.sentinels[0] = Semd {
            next: Some(Self::TAIL),
            sem_addr: SemAddr::MIN,
            proc_q: ProcQueue::new(),
        };
        self.sentinels[1] = Semd {
            next: None,
            sem_addr: SemAddr::MAX,
            proc_q: ProcQueue::new(),
        };

        log::debug!("asl: initialized with {} descriptors", N);
    }

    /// 把进程 `p` 阻塞到信号量 `sem_addr` 上，失败时返回 `true`
    ///
    /// 失败原因见 [`try_insert_blocked`](Self::try_insert_blocked)。
    pub fn insert_blocked<const M: usize>(
        &mut self,
        pcbs: &mut PcbTable<M>,
        sem_addr: SemAddr,
        p: PcbHandle,
    ) -> bool {
        self.try_insert_blocked(pcbs, sem_addr, p).is_err()
    }

    /// 把进程 `p` 阻塞到信号量 `sem_addr` 上
    ///
    /// 信号量已活动时直接把 `p` 加到其阻塞队列尾部；
    /// 否则从空闲链表取一个描述符，按地址顺序插入 ASL。
    ///
    /// # 错误
    /// - `InvalidArgument`: `sem_addr` 是哨兵地址，或 `p` 未分配
    /// - `DeviceOrResourceBusy`: `p` 已经阻塞或在其他队列中
    /// - `TryAgain`: 描述符池耗尽
    ///
    /// 失败时不修改任何状态。
    pub fn try_insert_blocked<const M: usize>(
        &mut self,
        pcbs: &mut PcbTable<M>,
        sem_addr: SemAddr,
        p: PcbHandle,
    ) -> Result<(), Errno> {
        if sem_addr.is_reserved() || !pcbs.is_allocated(p) {
            return Err(Errno::InvalidArgument);
        }
        if pcbs[p].sem_addr.is_some() || pcbs[p].is_queued() {
            log::warn!("asl: pcb #{} is already queued", p.index());
            return Err(Errno::DeviceOrResourceBusy);
        }

        let pred = self.locate(sem_addr);
        let succ = self.semd(pred).next;
        let id = match succ {
            Some(next) if self.semd(next).sem_addr == sem_addr => next,
            _ => {
                let Some(id) = self.free_head else {
                    log::warn!("asl: no free descriptor for {:?}", sem_addr);
                    return Err(Errno::TryAgain);
                };
                self.free_head = self.semds[id].next;
                self.nr_free -= 1;

                self.semds[id] = Semd {
                    next: succ,
                    sem_addr,
                    proc_q: ProcQueue::new(),
                };
                self.semd_mut(pred).next = Some(id);

                log::trace!("asl: {:?} activated", sem_addr);
                id
            }
        };

        self.semds[id].proc_q.insert(pcbs, p);
        pcbs[p].sem_addr = Some(sem_addr);

        debug_assert!(self.is_well_formed());
        Ok(())
    }

    /// 移除并返回阻塞在 `sem_addr` 上的第一个进程
    ///
    /// 信号量不活动时返回 `None`。
    pub fn remove_blocked<const M: usize>(
        &mut self,
        pcbs: &mut PcbTable<M>,
        sem_addr: SemAddr,
    ) -> Option<PcbHandle> {
        let p = self.head_blocked(pcbs, sem_addr)?;
        self.out_blocked(pcbs, p)
    }

    /// 把进程 `p` 从它所阻塞的信号量队列中移除（可位于队列任意位置）
    ///
    /// `p` 未阻塞、对应描述符不存在或 `p` 不在其队列中时返回 `None`。
    pub fn out_blocked<const M: usize>(
        &mut self,
        pcbs: &mut PcbTable<M>,
        p: PcbHandle,
    ) -> Option<PcbHandle> {
        let sem_addr = pcbs[p].sem_addr?;
        let pred = self.locate(sem_addr);
        let id = self.semd(pred).next.filter(|&id| self.is_active_at(id, sem_addr))?;

        let removed = self.semds[id].proc_q.remove_specific(pcbs, p)?;
        pcbs[removed].sem_addr = None;

        if self.semds[id].proc_q.is_empty() {
            self.recycle(pred, id);
        }

        debug_assert!(self.is_well_formed());
        Some(removed)
    }

    /// 阻塞在 `sem_addr` 上的第一个进程（不移除）
    pub fn head_blocked<const M: usize>(
        &self,
        pcbs: &PcbTable<M>,
        sem_addr: SemAddr,
    ) -> Option<PcbHandle> {
        self.blocked_on(sem_addr)?.head(pcbs)
    }

    /// `sem_addr` 的阻塞队列，信号量不活动时返回 `None`
    pub fn blocked_on(&self, sem_addr: SemAddr) -> Option<&ProcQueue> {
        let id = self.find(sem_addr)?;
        Some(&self.semds[id].proc_q)
    }

    /// 信号量是否活动
    pub fn is_active(&self, sem_addr: SemAddr) -> bool {
        self.find(sem_addr).is_some()
    }

    /// 活动信号量个数
    #[inline]
    pub fn active_count(&self) -> usize {
        N - self.nr_free
    }

    /// 空闲描述符个数
    #[inline]
    pub fn free_count(&self) -> usize {
        self.nr_free
    }

    /// 头、尾哨兵的地址
    pub fn sentinel_keys(&self) -> (SemAddr, SemAddr) {
        (self.sentinels[0].sem_addr, self.sentinels[1].sem_addr)
    }

    /// 按地址升序遍历所有活动信号量
    pub fn active_keys(&self) -> ActiveKeys<'_, N> {
        ActiveKeys {
            asl: self,
            next: self.semd(Self::HEAD).next,
            remaining: N,
        }
    }

    /// 检查 ASL 是否完整
    ///
    /// - 从头哨兵出发，地址严格升序，最终到达尾哨兵
    /// - 哨兵地址保持为 0 / `usize::MAX`
    /// - 中间的每个描述符阻塞队列非空
    /// - 活动描述符个数与空闲链表一致
    pub fn is_well_formed(&self) -> bool {
        let (head_key, tail_key) = self.sentinel_keys();
        if head_key != SemAddr::MIN || tail_key != SemAddr::MAX {
            return false;
        }

        let mut node = Self::HEAD;
        let mut active = 0;
        // 最多 N 个描述符加尾哨兵
        for _ in 0..=N {
            let Some(next) = self.semd(node).next else {
                return false;
            };
            if self.semd(next).sem_addr <= self.semd(node).sem_addr {
                return false;
            }
            if next == Self::TAIL {
                return active == self.active_count();
            }
            if self.semd(next).proc_q.is_empty() {
                return false;
            }
            active += 1;
            node = next;
        }
        false
    }

    /// 查找 `sem_addr` 的插入/查找位置，返回其前驱描述符
    ///
    /// 从头哨兵开始，只要下一个描述符的地址小于 `sem_addr`
    /// 且当前描述符不是尾哨兵就继续前进。
    fn locate(&self, sem_addr: SemAddr) -> usize {
        let mut iter = Self::HEAD;
        while iter != Self::TAIL {
            match self.semd(iter).next {
                Some(next) if self.semd(next).sem_addr < sem_addr => iter = next,
                _ => break,
            }
        }
        iter
    }

    /// 活动描述符的编号
    fn find(&self, sem_addr: SemAddr) -> Option<usize> {
        self.semd(self.locate(sem_addr))
            .next
            .filter(|&id| self.is_active_at(id, sem_addr))
    }

    fn is_active_at(&self, id: usize, sem_addr: SemAddr) -> bool {
        id < N && self.semds[id].sem_addr == sem_addr && !self.semds[id].proc_q.is_empty()
    }

    /// 把队列已空的描述符 `id` 从 ASL 摘下并归还空闲链表
    fn recycle(&mut self, pred: usize, id: usize) {
        let sem_addr = self.semds[id].sem_addr;
        self.semd_mut(pred).next = self.semds[id].next;
        self.push_free(id);
        log::trace!("asl: {:?} deactivated", sem_addr);
    }

    fn push_free(&mut self, id: usize) {
        self.semds[id] = Semd {
            next: self.free_head,
            sem_addr: SemAddr::MIN,
            proc_q: ProcQueue::new(),
        };
        self.free_head = Some(id);
        self.nr_free += 1;
    }

    #[inline]
    fn semd(&self, id: usize) -> &Semd {
        if id < N {
            &self.semds[id]
        } else {
            &self.sentinels[id - N]
        }
    }

    #[inline]
    fn semd_mut(&mut self, id: usize) -> &mut Semd {
        if id < N {
            &mut self.semds[id]
        } else {
            &mut self.sentinels[id - N]
        }
    }
}

impl<const N: usize> Default for Asl<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// 活动信号量迭代器
pub struct ActiveKeys<'a, const N: usize> {
    asl: &'a Asl<N>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, const N: usize> Iterator for ActiveKeys<'a, N> {
    type Item = SemAddr;

    fn next(&mut self) -> Option<SemAddr> {
        let id = self.next.filter(|&id| id < N)?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let semd = &self.asl.semds[id];
        self.next = semd.next;
        Some(semd.sem_addr)
    }
}
