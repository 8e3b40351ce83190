//! 同步原语 (Synchronization Primitives)
//!
//! 本层只负责信号量的簿记：
//! - `asl` - 活动信号量链表，记录每个信号量上阻塞的进程
//!
//! P/V 操作本身（计数加减、调度）由系统调用处理程序实现，
//! 它们通过 `insert_blocked` / `remove_blocked` 在就绪与阻塞之间移动 PCB。

pub mod asl;

pub use asl::{ActiveKeys, Asl, SemAddr};
