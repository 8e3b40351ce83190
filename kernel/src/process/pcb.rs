//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 进程控制块 (Process Control Block)
//!
//! 对应 PandOS 的 `pcb_t` (h/pcb.h)
//!
//! 关键设计要点：
//! 1. PCB 存放在固定容量的静态池中，用 `PcbHandle`（槽位下标）代替裸指针
//! 2. `next`/`prev` 既用于空闲链表，也用于进程队列，两者互斥
//! 3. 进程树链接 (`parent`/`child`/`sib_*`) 与队列链接相互独立
//! 4. `sem_addr` 非空当且仅当 PCB 挂在某个信号量的阻塞队列上

use bitflags::bitflags;

use crate::sync::SemAddr;

/// 处理器状态中通用寄存器的个数
///
/// 对应 uMPS3 的 STATEREGNUM
pub const STATE_REG_NUM: usize = 31;

/// CPU 时间（微秒）
///
/// 对应 PandOS 的 `cpu_t`
pub type CpuTime = u64;

/// PCB 句柄
///
/// 指向 PCB 池中的一个槽位，只能由 [`PcbTable`](super::PcbTable) 分配得到，
/// 因此不存在“空句柄”。
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PcbHandle(u16);

impl PcbHandle {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u16)
    }

    /// 在 PCB 池中的下标
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// 处理器状态快照
///
/// 对应 uMPS3 的 `state_t`。本层不解释其内容，
/// 只在 PCB 分配时清零，由异常处理程序和调度器读写。
#[repr(C)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorState {
    /// EntryHi (ASID)
    pub entry_hi: u32,
    /// Cause 寄存器
    pub cause: u32,
    /// Status 寄存器
    pub status: u32,
    /// 程序计数器
    pub pc: u32,
    /// 通用寄存器 + hi/lo
    pub regs: [u32; STATE_REG_NUM],
}

impl ProcessorState {
    pub const fn new() -> Self {
        Self {
            entry_hi: 0,
            cause: 0,
            status: 0,
            pc: 0,
            regs: [0; STATE_REG_NUM],
        }
    }
}

impl Default for ProcessorState {
    fn default() -> Self {
        Self::new()
    }
}

bitflags! {
    /// PCB 簿记标志
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct PcbFlags: u8 {
        /// 已从空闲链表中分配出去
        const ALLOCATED = 1 << 0;
        /// 当前挂在某个进程队列上
        const QUEUED = 1 << 1;
    }
}

/// 进程控制块
pub struct Pcb {
    // 进程队列字段（空闲链表复用 next）
    pub(crate) next: Option<PcbHandle>,
    pub(crate) prev: Option<PcbHandle>,

    // 进程树字段
    pub(crate) parent: Option<PcbHandle>,
    pub(crate) child: Option<PcbHandle>,
    pub(crate) sib_next: Option<PcbHandle>,
    pub(crate) sib_prev: Option<PcbHandle>,

    /// 处理器状态
    pub state: ProcessorState,

    /// 已使用的 CPU 时间
    pub time: CpuTime,

    /// 阻塞所在的信号量
    pub(crate) sem_addr: Option<SemAddr>,

    /// 支持层结构地址（由支持层解释）
    pub support: Option<usize>,

    pub(crate) flags: PcbFlags,
}

impl Pcb {
    pub const EMPTY: Pcb = Pcb::new();

    pub const fn new() -> Self {
        Self {
            next: None,
            prev: None,
            parent: None,
            child: None,
            sib_next: None,
            sib_prev: None,
            state: ProcessorState::new(),
            time: 0,
            sem_addr: None,
            support: None,
            flags: PcbFlags::empty(),
        }
    }

    /// 清空所有字段，分配时调用
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }

    /// 阻塞所在的信号量，未阻塞时为 `None`
    #[inline]
    pub fn sem_addr(&self) -> Option<SemAddr> {
        self.sem_addr
    }

    #[inline]
    pub fn parent(&self) -> Option<PcbHandle> {
        self.parent
    }

    #[inline]
    pub fn flags(&self) -> PcbFlags {
        self.flags
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.flags.contains(PcbFlags::ALLOCATED)
    }

    #[inline]
    pub fn is_queued(&self) -> bool {
        self.flags.contains(PcbFlags::QUEUED)
    }

    /// 所有队列和进程树链接是否都为空
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none()
            && self.prev.is_none()
            && self.parent.is_none()
            && self.child.is_none()
            && self.sib_next.is_none()
            && self.sib_prev.is_none()
    }
}

impl Default for Pcb {
    fn default() -> Self {
        Self::new()
    }
}
