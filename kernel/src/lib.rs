//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! PandOS 第一阶段：进程控制块与活动信号量链表
//!
//! 模块划分（自底向上）：
//! - `process::table`: PCB 池与空闲链表分配器
//! - `process::queue`: 循环双向进程队列（就绪队列、阻塞队列）
//! - `process::tree`: 进程树
//! - `sync::asl`: 活动信号量链表
//! - `state`: 把以上状态组合在一起的内核上下文
//!
//! 所有存储都是固定容量的数组，不使用动态内存分配。
//! 本层是单线程、不可重入的，调用者负责保证独占访问。

#![cfg_attr(not(test), no_std)]

/// 队列/链表级别的 trace 日志，只在 `debug_log` 特性下输出
#[macro_export]
macro_rules! list_trace {
    ($($arg:tt)*) => {
        if cfg!(feature = "debug_log") {
            log::trace!($($arg)*);
        }
    };
}

pub mod config;
pub mod errno;
pub mod process;
pub mod state;
pub mod sync;

#[cfg(test)]
mod tests;

pub use errno::Errno;
pub use process::{Pcb, PcbHandle, PcbTable, ProcQueue};
pub use state::{KernelState, KERNEL};
pub use sync::{Asl, SemAddr};
