//! 进程管理模块
//!
//! - `pcb`: 进程控制块 (pcb_t)
//! - `table`: PCB 池与空闲链表分配器
//! - `queue`: 循环双向进程队列
//! - `tree`: 进程树 (parent/child/sibling)

pub mod pcb;
pub mod queue;
pub mod table;
pub mod tree;

pub use pcb::{CpuTime, Pcb, PcbFlags, PcbHandle, ProcessorState, STATE_REG_NUM};
pub use queue::ProcQueue;
pub use table::PcbTable;
pub use tree::Children;
