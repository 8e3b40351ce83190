//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 内核状态
//!
//! 把 PCB 池和 ASL 放进同一个结构体，代替 C 实现中的全局空闲链表头和
//! ASL 头指针。单元测试可以各自创建独立的 `KernelState`。
//!
//! 整个内核共享的实例是 [`KERNEL`]。本层不做任何内部加锁：
//! 持有 `KERNEL` 的锁即满足“调用者独占内核状态”的前提。

use spin::Mutex;

use crate::config::{KERNEL_NAME, KERNEL_VERSION, LOG_LEVEL, MAXPROC};
use crate::errno::Errno;
use crate::process::{PcbHandle, PcbTable};
use crate::sync::{Asl, SemAddr};

/// 全局内核状态
///
/// 启动时调用一次 `KERNEL.lock().init()`。
pub static KERNEL: Mutex<KernelState> = Mutex::new(KernelState::new());

/// 进程与信号量簿记状态
pub struct KernelState<const N: usize = MAXPROC> {
    pub pcbs: PcbTable<N>,
    pub asl: Asl<N>,
}

impl<const N: usize> KernelState<N> {
    pub const fn new() -> Self {
        Self {
            pcbs: PcbTable::new(),
            asl: Asl::new(),
        }
    }

    /// 初始化 PCB 池和 ASL，并应用配置的日志级别
    pub fn init(&mut self) {
        log::set_max_level(LOG_LEVEL);

        self.pcbs.init_pool();
        self.asl.init_asl();

        log::info!(
            "{} v{}: {} pcbs, {} semaphore descriptors",
            KERNEL_NAME,
            KERNEL_VERSION,
            self.pcbs.capacity(),
            self.asl.free_count()
        );
    }

    pub fn alloc_pcb(&mut self) -> Option<PcbHandle> {
        self.pcbs.alloc_pcb()
    }

    pub fn free_pcb(&mut self, p: PcbHandle) {
        self.pcbs.free_pcb(p)
    }

    /// 阻塞 `p`，失败时返回 `true`
    pub fn insert_blocked(&mut self, sem_addr: SemAddr, p: PcbHandle) -> bool {
        self.asl.insert_blocked(&mut self.pcbs, sem_addr, p)
    }

    pub fn try_insert_blocked(&mut self, sem_addr: SemAddr, p: PcbHandle) -> Result<(), Errno> {
        self.asl.try_insert_blocked(&mut self.pcbs, sem_addr, p)
    }

    pub fn remove_blocked(&mut self, sem_addr: SemAddr) -> Option<PcbHandle> {
        self.asl.remove_blocked(&mut self.pcbs, sem_addr)
    }

    pub fn out_blocked(&mut self, p: PcbHandle) -> Option<PcbHandle> {
        self.asl.out_blocked(&mut self.pcbs, p)
    }

    pub fn head_blocked(&self, sem_addr: SemAddr) -> Option<PcbHandle> {
        self.asl.head_blocked(&self.pcbs, sem_addr)
    }
}

impl<const N: usize> Default for KernelState<N> {
    fn default() -> Self {
        Self::new()
    }
}
