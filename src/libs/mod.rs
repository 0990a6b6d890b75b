//! Core library modules for the haatkhata application.
//!
//! ## Features
//!
//! - **Core Infrastructure**: configuration, data storage, errors, messaging
//! - **Task Model**: task records, patches and filter criteria
//! - **Query Engine**: task filtering and dashboard statistics over a [`store::TaskStore`]
//! - **User Interface**: console tables
//!
//! ## Usage
//!
//! ```rust,no_run
//! use haatkhata::db::tasks::Tasks;
//! use haatkhata::libs::config::Config;
//! use haatkhata::libs::filter::{list_tasks, FilterArgs};
//! use haatkhata::libs::stats::dashboard_stats;
//!
//! let config = Config::load()?;
//! let filter = FilterArgs::default().parse()?;
//! let mut tasks = Tasks::new(&config.database)?;
//! let (views, stats) = tasks.read(|store| Ok((list_tasks(store, 1, &filter)?, dashboard_stats(store, 1)?)))?;
//! # Ok::<(), haatkhata::libs::error::AppError>(())
//! ```

pub mod config;
pub mod data_storage;
pub mod error;
pub mod filter;
pub mod messages;
pub mod password;
pub mod stats;
pub mod store;
pub mod task;
pub mod view;
