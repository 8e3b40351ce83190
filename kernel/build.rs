//! PandOS 内核构建脚本
//!
//! 这个脚本在编译前运行，负责：
//! 1. 解析 Kernel.toml（或 build/.config）配置文件
//! 2. 校验进程池容量等关键参数
//! 3. 在 OUT_DIR 中生成 config.rs，由 src/config.rs 引入

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

/// PCB 句柄和描述符索引的上限
const MAX_PROC_LIMIT: i64 = u16::MAX as i64;

/// 解析 build/.config 文件（简单 key=value 格式）
///
/// 键名形如 `process_max_proc=20`，第一个下划线之前是 section 名
fn parse_dot_config(content: &str) -> toml::Value {
    let mut sections: HashMap<String, toml::map::Map<String, toml::Value>> = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        // 跳过注释和空行
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let Some((section, config_key)) = key.trim().split_once('_') else {
            continue;
        };

        let value = value.trim().trim_matches('"');
        let parsed_value = if value == "true" {
            toml::Value::Boolean(true)
        } else if value == "false" {
            toml::Value::Boolean(false)
        } else if let Ok(int_val) = value.parse::<i64>() {
            toml::Value::Integer(int_val)
        } else {
            toml::Value::String(value.to_string())
        };

        sections
            .entry(section.to_string())
            .or_default()
            .insert(config_key.to_string(), parsed_value);
    }

    let mut root_map = toml::map::Map::new();
    for (section_name, section_data) in sections {
        root_map.insert(section_name, toml::Value::Table(section_data));
    }

    toml::Value::Table(root_map)
}

fn main() {
    println!("cargo:rerun-if-changed=../Kernel.toml");
    println!("cargo:rerun-if-changed=../build/.config");
    println!("cargo:rerun-if-changed=build.rs");

    // 优先读取 build/.config（menuconfig 生成的配置），否则回退到 Kernel.toml
    let config = if let Ok(content) = fs::read_to_string("../build/.config") {
        println!("cargo:warning=Using build/.config configuration");
        parse_dot_config(&content)
    } else if let Ok(content) = fs::read_to_string("../Kernel.toml") {
        toml::from_str(&content).expect("Kernel.toml 解析失败")
    } else {
        // 没有配置文件时使用内置默认值
        toml::Value::Table(toml::map::Map::new())
    };

    generate_config_code(&config);
}

fn generate_config_code(config: &toml::Value) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR 未设置"));

    let kernel_name = config
        .get("general")
        .and_then(|g| g.get("name"))
        .and_then(|v| v.as_str())
        .unwrap_or("PandOS");

    let kernel_version = config
        .get("general")
        .and_then(|g| g.get("version"))
        .and_then(|v| v.as_str())
        .unwrap_or("0.1.0");

    let max_proc = config
        .get("process")
        .and_then(|p| p.get("max_proc"))
        .and_then(|v| v.as_integer())
        .unwrap_or(20);

    if max_proc <= 0 || max_proc > MAX_PROC_LIMIT {
        panic!(
            "process.max_proc = {} 超出范围，必须在 1..={} 之间",
            max_proc, MAX_PROC_LIMIT
        );
    }

    let log_level = match config
        .get("debug")
        .and_then(|d| d.get("log_level"))
        .and_then(|v| v.as_str())
        .unwrap_or("info")
    {
        "off" => "Off",
        "error" => "Error",
        "warn" => "Warn",
        "debug" => "Debug",
        "trace" => "Trace",
        _ => "Info",
    };

    let config_code = format!(
        r#"// PandOS 内核配置（自动生成）
//
// 此文件由 build.rs 根据 Kernel.toml 自动生成，请勿手动修改

/// 内核名称
pub const KERNEL_NAME: &str = "{}";

/// 内核版本
pub const KERNEL_VERSION: &str = "{}";

/// 进程控制块池容量（同时也是信号量描述符池容量）
pub const MAXPROC: usize = {};

/// 默认日志级别
pub const LOG_LEVEL: log::LevelFilter = log::LevelFilter::{};
"#,
        kernel_name, kernel_version, max_proc, log_level,
    );

    fs::write(out_dir.join("config.rs"), config_code).expect("无法写入 config.rs");
}
