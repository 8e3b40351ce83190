//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 错误代码定义
//!
//! 数值与 include/uapi/asm-generic/errno-base.h 一致，
//! 便于 P/V 系统调用处理程序直接把失败原因返回给用户态。
//!
//! 本层的大部分操作按约定只返回 `Option` / `bool`；
//! 需要区分失败原因时（例如阻塞进程）使用 `Result<T, Errno>`。

use core::fmt;

/// 错误代码
///
/// 使用方法：
/// ```
/// use pandos::errno::Errno;
///
/// // 系统调用风格，返回负数
/// assert_eq!(Errno::InvalidArgument.as_neg_i32(), -22);
/// ```
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Errno {
    /// Try again (EAGAIN, 11)
    ///
    /// 信号量描述符池耗尽：同时被阻塞的不同信号量已达上限
    TryAgain = 11,

    /// Out of memory (ENOMEM, 12)
    ///
    /// PCB 池耗尽
    OutOfMemory = 12,

    /// Device or resource busy (EBUSY, 16)
    ///
    /// PCB 已经挂在某个队列上
    DeviceOrResourceBusy = 16,

    /// Invalid argument (EINVAL, 22)
    InvalidArgument = 22,
}

impl Errno {
    /// 获取错误代码的正数值（用于比较）
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// 获取错误代码的负数值（用于系统调用返回）
    #[inline]
    pub const fn as_neg_i32(self) -> i32 {
        -(self as i32)
    }

    /// 错误名称
    pub const fn name(self) -> &'static str {
        match self {
            Errno::TryAgain => "EAGAIN",
            Errno::OutOfMemory => "ENOMEM",
            Errno::DeviceOrResourceBusy => "EBUSY",
            Errno::InvalidArgument => "EINVAL",
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_i32())
    }
}

pub const EAGAIN: i32 = Errno::TryAgain.as_i32();
pub const ENOMEM: i32 = Errno::OutOfMemory.as_i32();
pub const EBUSY: i32 = Errno::DeviceOrResourceBusy.as_i32();
pub const EINVAL: i32 = Errno::InvalidArgument.as_i32();
