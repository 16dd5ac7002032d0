//! Regrade System - 成绩重新评分（recalificación）申请管理后端服务
//!
//! 基于 Actix Web 构建的成绩复核申请系统后端：学生对某次成绩提出复核申请，
//! 管理员审批后由系统（或管理员手动）指派另一位具备该科目资格的教师进行
//! 双盲复核，并在每个环节向相关方发送站内通知。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层（含申请生命周期引擎）
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
