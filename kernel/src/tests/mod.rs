//! 单元测试模块
//!
//! 每个子系统一个文件：
//! - `pcb_table`: PCB 池分配/释放
//! - `proc_queue`: 进程队列
//! - `process_tree`: 进程树
//! - `asl`: 活动信号量链表
//! - `scenario`: 端到端场景
//! - `properties`: 基于模型的性质测试 (proptest)
//!
//! 运行测试：
//! ```bash
//! cargo test --package pandos
//! ```

mod properties;

use crate::process::{PcbHandle, PcbTable};

/// 创建并初始化一个容量为 N 的 PCB 池
fn new_pool<const N: usize>() -> PcbTable<N> {
    let mut pcbs = PcbTable::new();
    pcbs.init_pool();
    pcbs
}

/// 连续分配 n 个 PCB
fn alloc_n<const N: usize>(pcbs: &mut PcbTable<N>, n: usize) -> Vec<PcbHandle> {
    (0..n)
        .map(|i| pcbs.alloc_pcb().unwrap_or_else(|| panic!("alloc #{} failed", i)))
        .collect()
}
